//! User-facing output: notices, tables and standalone charts.

use std::io::{self, Write};

use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
    Terminal, TerminalOptions, Viewport,
};

use futureslab_core::{Cell, Table};

use crate::surface::ChartSurface;

/// Severity of a console notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Where display operations send everything the user sees.
pub trait Console {
    fn notice(&self, level: Level, message: &str);
    fn print_table(&self, table: &Table);
    /// Finalize a standalone chart for display.
    fn show_chart(&self, chart: &ChartSurface) -> io::Result<()>;
}

/// Console writing to the process stdout (errors go to stderr).
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn notice(&self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{message}"),
            Level::Warning => println!("{}", message.yellow()),
            Level::Error => eprintln!("{}", message.red()),
        }
    }

    fn print_table(&self, table: &Table) {
        if let Some(title) = table.title() {
            println!("{}", title.bold());
        }
        print!("{}", format_table(table));
    }

    fn show_chart(&self, chart: &ChartSurface) -> io::Result<()> {
        let stdout = io::stdout();
        if !stdout.is_tty() {
            // Redirected output gets the chart as plain text.
            return write_plain_chart(chart, &mut stdout.lock());
        }

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(chart.height()),
            },
        )?;
        terminal.draw(|frame| {
            let area = frame.area();
            let area = Rect {
                width: area.width.min(chart.width()),
                ..area
            };
            frame.render_widget(chart, area);
        })?;
        println!();
        Ok(())
    }
}

/// Render a chart off-screen and return its rows with trailing blanks trimmed.
pub fn render_plain_chart(chart: &ChartSurface) -> String {
    let area = Rect::new(0, 0, chart.width(), chart.height());
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);

    let mut out = String::new();
    for y in 0..area.height {
        let row: String = (0..area.width)
            .filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol()))
            .collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn write_plain_chart(chart: &ChartSurface, out: &mut impl Write) -> io::Result<()> {
    out.write_all(render_plain_chart(chart).as_bytes())?;
    out.flush()
}

/// Plain-text rendering of a table body (the title is printed separately).
///
/// Numeric columns are right aligned, everything else left aligned.
pub fn format_table(table: &Table) -> String {
    let names = table.column_names();
    let records = table.records();

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    let rendered: Vec<Vec<(String, bool)>> = records
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| (cell.to_string(), cell.is_numeric()))
                .collect()
        })
        .collect();
    for row in &rendered {
        for (i, (text, _)) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.chars().count());
        }
    }

    let numeric: Vec<bool> = (0..names.len())
        .map(|col| {
            records.iter().any(|r| r[col].is_numeric())
                && records.iter().all(|r| r[col].is_numeric() || r[col] == Cell::Empty)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| pad(name, widths[i], numeric[i]))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &rendered {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, (text, is_num))| pad(text, widths[i], *is_num || numeric[i]))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_index_and_aligns_numbers() {
        let mut table = Table::new(["Futures"]).with_index("Contract");
        table.push_row(Some(Cell::text("Dec-2024")), vec![Cell::Number(70.8)]);
        table.push_row(Some(Cell::text("Jan-2025")), vec![Cell::Number(101.25)]);

        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Contract  Futures");
        assert!(lines[1].starts_with("────────"));
        assert_eq!(lines[2], "Dec-2024    70.80");
        assert_eq!(lines[3], "Jan-2025   101.25");
    }

    fn small_chart() -> ChartSurface {
        use crate::surface::{DrawSurface, LineSeries, LineStyle};
        use crate::theme::Theme;

        let mut chart = ChartSurface::new(Theme::default(), 60, 16);
        chart.plot(LineSeries {
            points: vec![(0.0, 70.8), (1.0, 71.4), (2.0, 72.0)],
            style: LineStyle::DASHED_WITH_MARKERS,
        });
        chart.set_title("Crude Oil");
        chart
    }

    #[test]
    fn plain_chart_has_one_line_per_row() {
        let chart = small_chart();
        let text = render_plain_chart(&chart);

        assert_eq!(text.lines().count(), usize::from(chart.height()));
        assert!(text.contains("Crude Oil"));
        assert!(text.lines().all(|l| l.chars().count() <= usize::from(chart.width())));
    }

    #[test]
    fn plain_chart_is_written_without_a_terminal() {
        let chart = small_chart();
        let mut out = Vec::new();

        write_plain_chart(&chart, &mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert_eq!(written, render_plain_chart(&chart));
    }

    #[test]
    fn empty_cells_render_blank() {
        let mut table = Table::new(["Ticker", "Adj Close"]);
        table.push_row(None, vec![Cell::text("CL"), Cell::Empty]);

        let text = format_table(&table);
        assert_eq!(text.lines().nth(2), Some("CL"));
    }
}

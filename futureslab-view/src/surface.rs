//! Drawable surfaces and the terminal line chart.
//!
//! `DrawSurface` is the minimal capability the display operations draw
//! through: plot a line, set title/legend/x-axis, apply theme styling.
//! Callers may hand in their own surface; otherwise a standalone
//! `ChartSurface` is created and shown once drawing is complete.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use futureslab_core::ChartSettings;

use crate::theme::Theme;

/// How a line is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStyle {
    pub dashed: bool,
    pub markers: bool,
}

impl LineStyle {
    pub const SOLID: Self = Self {
        dashed: false,
        markers: false,
    };

    pub const DASHED_WITH_MARKERS: Self = Self {
        dashed: true,
        markers: true,
    };
}

/// One line on a chart, in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub points: Vec<(f64, f64)>,
    pub style: LineStyle,
}

impl LineSeries {
    /// Date-indexed series; x is the day number of each date.
    pub fn from_dates(points: &[(NaiveDate, f64)], style: LineStyle) -> Self {
        Self {
            points: points.iter().map(|(d, v)| (date_to_x(*d), *v)).collect(),
            style,
        }
    }

    /// Category-indexed series; x is the position of each value.
    pub fn from_values(values: impl IntoIterator<Item = f64>, style: LineStyle) -> Self {
        Self {
            points: values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i as f64, v))
                .collect(),
            style,
        }
    }
}

/// Chart x coordinate of a date.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Horizontal axis definition and limits.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Date axis clipped to `[from, to]`.
    Dates { from: NaiveDate, to: NaiveDate },
    /// Evenly spaced labelled positions `0..n`.
    Categories(Vec<String>),
}

/// Capability the display operations draw through.
pub trait DrawSurface {
    fn plot(&mut self, series: LineSeries);
    fn set_title(&mut self, title: &str);
    fn set_legend(&mut self, labels: &[String]);
    fn set_x_axis(&mut self, axis: XAxis);
    fn style_primary_axis(&mut self, theme: &Theme);
}

/// Size of a standalone chart: configured cells, or fitted to the terminal.
pub fn autoscale(settings: ChartSettings) -> (u16, u16) {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((100, 36));
    let width = if settings.width > 0 { settings.width } else { cols };
    let height = if settings.height > 0 {
        settings.height
    } else {
        (rows.saturating_mul(2) / 3).clamp(12, 40)
    };
    (width, height)
}

/// Line chart rendered with ratatui.
#[derive(Debug, Clone)]
pub struct ChartSurface {
    title: Option<String>,
    series: Vec<LineSeries>,
    legend: Vec<String>,
    x_axis: Option<XAxis>,
    theme: Theme,
    styled: bool,
    width: u16,
    height: u16,
}

impl ChartSurface {
    pub fn new(theme: Theme, width: u16, height: u16) -> Self {
        Self {
            title: None,
            series: Vec::new(),
            legend: Vec::new(),
            x_axis: None,
            theme,
            styled: false,
            width,
            height,
        }
    }

    /// Surface for standalone display, sized per `settings`.
    pub fn standalone(theme: Theme, settings: ChartSettings) -> Self {
        let (width, height) = autoscale(settings);
        Self::new(theme, width, height)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn series(&self) -> &[LineSeries] {
        &self.series
    }

    pub fn legend(&self) -> &[String] {
        &self.legend
    }

    pub fn x_axis(&self) -> Option<&XAxis> {
        self.x_axis.as_ref()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn x_bounds(&self) -> [f64; 2] {
        let [lo, hi] = match &self.x_axis {
            Some(XAxis::Dates { from, to }) => [date_to_x(*from), date_to_x(*to)],
            Some(XAxis::Categories(labels)) => [0.0, labels.len().saturating_sub(1) as f64],
            None => {
                let xs = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
                extent(xs).unwrap_or([0.0, 1.0])
            }
        };
        if hi > lo {
            [lo, hi]
        } else {
            [lo - 0.5, lo + 0.5]
        }
    }

    fn x_labels(&self, [lo, hi]: [f64; 2]) -> Vec<String> {
        match &self.x_axis {
            Some(XAxis::Categories(labels)) => {
                let n = labels.len();
                if n <= 3 {
                    labels.clone()
                } else {
                    vec![labels[0].clone(), labels[n / 2].clone(), labels[n - 1].clone()]
                }
            }
            Some(XAxis::Dates { .. }) => [lo, (lo + hi) / 2.0, hi]
                .into_iter()
                .filter_map(x_to_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
            None => vec![format!("{lo:.0}"), format!("{hi:.0}")],
        }
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

impl DrawSurface for ChartSurface {
    fn plot(&mut self, series: LineSeries) {
        self.series.push(series);
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_legend(&mut self, labels: &[String]) {
        self.legend = labels.to_vec();
    }

    fn set_x_axis(&mut self, axis: XAxis) {
        self.x_axis = Some(axis);
    }

    fn style_primary_axis(&mut self, theme: &Theme) {
        self.theme = *theme;
        self.styled = true;
    }
}

impl Widget for &ChartSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let x_bounds = self.x_bounds();
        let [x_lo, x_hi] = x_bounds;

        let visible: Vec<Vec<(f64, f64)>> = self
            .series
            .iter()
            .map(|s| {
                s.points
                    .iter()
                    .copied()
                    .filter(|(x, _)| *x >= x_lo && *x <= x_hi)
                    .collect()
            })
            .collect();

        let [y_min, y_max] = extent(visible.iter().flatten().map(|p| p.1)).unwrap_or([0.0, 1.0]);
        let y_range = y_max - y_min;
        let y_pad = if y_range > 0.0 {
            y_range * 0.05
        } else {
            (y_max.abs() * 0.05).max(1.0)
        };
        let y_lower = y_min - y_pad;
        let y_upper = y_max + y_pad;

        let (axis_style, label_style) = if self.styled {
            (
                Style::default().fg(self.theme.muted),
                Style::default().fg(self.theme.text_secondary),
            )
        } else {
            (Style::default(), Style::default())
        };

        let mut datasets = Vec::with_capacity(visible.len() * 2);
        for (i, (series, points)) in self.series.iter().zip(&visible).enumerate() {
            let color = self.theme.series_color(i);
            let marker = if series.style.dashed {
                symbols::Marker::Dot
            } else {
                symbols::Marker::Braille
            };
            let mut line = Dataset::default()
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(points);
            if let Some(label) = self.legend.get(i) {
                line = line.name(label.clone());
            }
            datasets.push(line);

            if series.style.markers {
                datasets.push(
                    Dataset::default()
                        .marker(symbols::Marker::Block)
                        .graph_type(GraphType::Scatter)
                        .style(Style::default().fg(color))
                        .data(points),
                );
            }
        }

        let x_labels: Vec<Span> = self
            .x_labels(x_bounds)
            .into_iter()
            .map(|l| Span::styled(l, label_style))
            .collect();
        let y_labels: Vec<Span> = [y_lower, (y_lower + y_upper) / 2.0, y_upper]
            .into_iter()
            .map(|v| Span::styled(format!("{v:.2}"), label_style))
            .collect();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        if let Some(title) = &self.title {
            block = block.title(Span::styled(
                format!(" {title} "),
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([x_lo, x_hi])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds([y_lower, y_upper])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

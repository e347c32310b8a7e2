//! Table-or-chart decisions.
//!
//! These functions only look at data shape, flags and reference metadata and
//! return a `Presentation` describing what to draw. Nothing here prints or
//! touches a surface, so every branch can be tested without a terminal.

use std::fmt;

use chrono::NaiveDate;

use futureslab_core::{CurveDataset, Expiry, HistoricalDataset, ReferenceTable, Table};

use crate::surface::{LineSeries, LineStyle, XAxis};

pub const HISTORICAL_TITLE: &str = "Futures timeseries";
pub const CURVE_TITLE: &str = "Futures curve";

/// Explanation printed above a table shown in place of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    /// The whole dataset has a single row.
    SinglePointOverall,
    /// One ticker has a single adjusted close.
    SinglePoint { ticker: String },
    /// One ticker of a chart has no adjusted close at all.
    NoData { ticker: String },
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::SinglePointOverall => f.write_str(
                "A single datapoint is not enough to depict a chart, data is presented below.",
            ),
            Note::SinglePoint { ticker } => write!(
                f,
                "A single datapoint on {ticker} is not enough to depict a chart, data shown below."
            ),
            Note::NoData { ticker } => write!(f, "No data was found for {ticker}, skipping it."),
        }
    }
}

/// A table to print, optionally preceded by a note.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub note: Option<Note>,
    pub table: Option<Table>,
}

impl TableView {
    pub fn plain(table: Table) -> Self {
        Self {
            note: None,
            table: Some(table),
        }
    }

    pub fn noted(note: Note, table: Table) -> Self {
        Self {
            note: Some(note),
            table: Some(table),
        }
    }

    /// A note with nothing to print under it.
    pub fn note_only(note: Note) -> Self {
        Self { note: Some(note), table: None }
    }
}

/// Everything needed to draw a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub title: Option<String>,
    pub series: Vec<LineSeries>,
    /// Empty when the chart carries no legend.
    pub legend: Vec<String>,
    pub x_axis: XAxis,
    /// Tickers pulled out of the chart, printed alongside it.
    pub side_tables: Vec<TableView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    ShowTable(TableView),
    ShowChart(ChartPlan),
}

/// Decide how to present a non-empty historical dataset.
pub fn plan_historical(
    data: &HistoricalDataset,
    reference: &ReferenceTable,
    expiry: Option<Expiry>,
    start: NaiveDate,
    raw: bool,
) -> Presentation {
    if raw || data.len() == 1 {
        let table = data.since(start).to_table(HISTORICAL_TITLE);
        return Presentation::ShowTable(if raw {
            TableView::plain(table)
        } else {
            TableView::noted(Note::SinglePointOverall, table)
        });
    }

    let tickers = data.tickers();
    let grouped = tickers.len() > 1;

    let mut series = Vec::new();
    let mut legend = Vec::new();
    let mut side_tables = Vec::new();
    let mut title = None;

    for ticker in tickers {
        let description = reference.description(ticker).unwrap_or(ticker);
        let points = data.adj_close(ticker).unwrap_or_default();

        match points.len() {
            0 => side_tables.push(TableView::note_only(Note::NoData {
                ticker: ticker.to_string(),
            })),
            1 => side_tables.push(TableView::noted(
                Note::SinglePoint {
                    ticker: ticker.to_string(),
                },
                data.adj_close_table(ticker, description, start, HISTORICAL_TITLE),
            )),
            _ => {
                series.push(LineSeries::from_dates(&points, LineStyle::SOLID));
                if grouped {
                    legend.push(description.to_string());
                } else {
                    title = Some(match expiry {
                        Some(e) => format!("{description} with expiry {e}"),
                        None => description.to_string(),
                    });
                }
            }
        }
    }

    let x_axis = match (data.first_date(), data.last_date()) {
        (Some(first), Some(last)) => XAxis::Dates {
            from: start.max(first),
            to: last,
        },
        _ => XAxis::Dates {
            from: start,
            to: start,
        },
    };

    Presentation::ShowChart(ChartPlan {
        title,
        series,
        legend,
        x_axis,
        side_tables,
    })
}

/// Decide how to present a non-empty curve.
pub fn plan_curve(curve: &CurveDataset, description: &str, raw: bool) -> Presentation {
    if raw {
        return Presentation::ShowTable(TableView::plain(curve.to_table(CURVE_TITLE)));
    }

    let points = curve.points();
    Presentation::ShowChart(ChartPlan {
        title: Some(description.to_string()),
        series: vec![LineSeries::from_values(
            points.iter().map(|p| p.price),
            LineStyle::DASHED_WITH_MARKERS,
        )],
        legend: Vec::new(),
        x_axis: XAxis::Categories(points.iter().map(|p| p.label.clone()).collect()),
        side_tables: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futureslab_core::{CurvePoint, DailyBar, TickerBars};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> ReferenceTable {
        ReferenceTable::from_csv_str(
            "Ticker,Description,Exchange,Category\n\
             CL,Crude Oil,NYM,energy\n\
             NG,Natural Gas,NYM,energy\n",
        )
        .unwrap()
    }

    fn bars(ticker: &str, days: &[(NaiveDate, f64)]) -> TickerBars {
        TickerBars {
            ticker: ticker.into(),
            bars: days
                .iter()
                .map(|(d, v)| DailyBar::adj_close_only(*d, *v))
                .collect(),
        }
    }

    fn daily(from: NaiveDate, n: usize) -> Vec<(NaiveDate, f64)> {
        (0..n)
            .map(|i| (from + chrono::Days::new(i as u64), 70.0 + i as f64))
            .collect()
    }

    #[test]
    fn raw_flag_forces_plain_table() {
        let data = HistoricalDataset::from_series(vec![bars("CL", &daily(date(2022, 1, 3), 5))]);
        let plan = plan_historical(&data, &reference(), None, date(2022, 1, 4), true);

        let Presentation::ShowTable(view) = plan else {
            panic!("expected a table");
        };
        assert_eq!(view.note, None);
        let table = view.table.unwrap();
        assert_eq!(table.title(), Some(HISTORICAL_TITLE));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn single_row_forces_noted_table() {
        let data = HistoricalDataset::from_series(vec![
            bars("CL", &[(date(2022, 1, 3), 76.0)]),
            bars("NG", &[(date(2022, 1, 3), 4.0)]),
        ]);
        let plan = plan_historical(&data, &reference(), None, date(2021, 1, 1), false);

        assert!(matches!(
            plan,
            Presentation::ShowTable(TableView {
                note: Some(Note::SinglePointOverall),
                ..
            })
        ));
    }

    #[test]
    fn single_ticker_chart_titled_with_expiry() {
        let data = HistoricalDataset::from_series(vec![bars("CL", &daily(date(2022, 1, 3), 10))]);
        let expiry: Expiry = "2024-12".parse().unwrap();
        let plan = plan_historical(&data, &reference(), Some(expiry), date(2021, 1, 1), false);

        let Presentation::ShowChart(chart) = plan else {
            panic!("expected a chart");
        };
        assert_eq!(chart.title.as_deref(), Some("Crude Oil with expiry 2024-12"));
        assert!(chart.legend.is_empty());
        assert_eq!(chart.series.len(), 1);
        assert_eq!(
            chart.x_axis,
            XAxis::Dates {
                from: date(2022, 1, 3),
                to: date(2022, 1, 12),
            }
        );
    }

    #[test]
    fn x_axis_starts_at_later_of_start_and_first_date() {
        let data = HistoricalDataset::from_series(vec![bars("CL", &daily(date(2022, 1, 3), 10))]);
        let plan = plan_historical(&data, &reference(), None, date(2022, 1, 6), false);

        let Presentation::ShowChart(chart) = plan else {
            panic!("expected a chart");
        };
        assert_eq!(chart.title.as_deref(), Some("Crude Oil"));
        assert_eq!(
            chart.x_axis,
            XAxis::Dates {
                from: date(2022, 1, 6),
                to: date(2022, 1, 12),
            }
        );
    }

    #[test]
    fn single_point_ticker_pulled_out_of_multi_chart() {
        let data = HistoricalDataset::from_series(vec![
            bars("CL", &daily(date(2022, 1, 3), 10)),
            bars("NG", &[(date(2022, 1, 5), 4.2)]),
        ]);
        let plan = plan_historical(&data, &reference(), None, date(2022, 1, 1), false);

        let Presentation::ShowChart(chart) = plan else {
            panic!("expected a chart");
        };
        assert_eq!(chart.title, None);
        assert_eq!(chart.legend, vec!["Crude Oil"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.side_tables.len(), 1);

        let side = &chart.side_tables[0];
        assert_eq!(side.note, Some(Note::SinglePoint { ticker: "NG".into() }));
        let table = side.table.as_ref().unwrap();
        assert_eq!(table.headers(), ["Natural Gas"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn ticker_without_prices_is_noted() {
        let data = HistoricalDataset::from_series(vec![
            bars("CL", &daily(date(2022, 1, 3), 4)),
            bars("NG", &[]),
        ]);
        let Presentation::ShowChart(chart) =
            plan_historical(&data, &reference(), None, date(2022, 1, 1), false)
        else {
            panic!("expected a chart");
        };
        assert_eq!(
            chart.side_tables,
            vec![TableView::note_only(Note::NoData { ticker: "NG".into() })]
        );
    }

    #[test]
    fn curve_plans() {
        let curve = CurveDataset::new(
            "CL",
            vec![
                CurvePoint { label: "Nov-2024".into(), price: 71.0 },
                CurvePoint { label: "Dec-2024".into(), price: 70.5 },
            ],
        );

        let Presentation::ShowTable(view) = plan_curve(&curve, "Crude Oil", true) else {
            panic!("expected a table");
        };
        assert_eq!(view.table.unwrap().title(), Some(CURVE_TITLE));

        let Presentation::ShowChart(chart) = plan_curve(&curve, "Crude Oil", false) else {
            panic!("expected a chart");
        };
        assert_eq!(chart.title.as_deref(), Some("Crude Oil"));
        assert_eq!(chart.series[0].style, LineStyle::DASHED_WITH_MARKERS);
        assert_eq!(chart.series[0].points, vec![(0.0, 71.0), (1.0, 70.5)]);
        assert_eq!(
            chart.x_axis,
            XAxis::Categories(vec!["Nov-2024".into(), "Dec-2024".into()])
        );
    }

    #[test]
    fn note_messages() {
        assert_eq!(
            Note::SinglePoint { ticker: "NG".into() }.to_string(),
            "A single datapoint on NG is not enough to depict a chart, data shown below."
        );
        assert_eq!(
            Note::SinglePointOverall.to_string(),
            "A single datapoint is not enough to depict a chart, data is presented below."
        );
    }
}

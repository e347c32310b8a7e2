//! Historical and curve datasets produced by a provider.
//!
//! `HistoricalDataset` is a date-indexed table with one grouped block of
//! price columns per ticker. The index is the sorted union of every ticker's
//! dates; a ticker without a bar on a given date holds `None` there.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::{Cell, Table};

/// Name of the adjusted close column.
pub const ADJ_CLOSE: &str = "Adj Close";

/// Column names of one ticker's block, in display order.
pub const PRICE_FIELDS: [&str; 6] = ["Open", "High", "Low", "Close", ADJ_CLOSE, "Volume"];

/// One daily bar as delivered by a provider. Any field may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl DailyBar {
    /// Bar carrying only an adjusted close.
    pub fn adj_close_only(date: NaiveDate, adj_close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            adj_close: Some(adj_close),
            volume: None,
        }
    }

    fn cells(&self) -> [Cell; 6] {
        [
            Cell::number(self.open),
            Cell::number(self.high),
            Cell::number(self.low),
            Cell::number(self.close),
            Cell::number(self.adj_close),
            self.volume.map_or(Cell::Empty, |v| Cell::Integer(v as i64)),
        ]
    }
}

/// Bars fetched for one ticker, before alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerBars {
    pub ticker: String,
    pub bars: Vec<DailyBar>,
}

#[derive(Debug, Clone, PartialEq)]
struct TickerColumn {
    ticker: String,
    values: Vec<Option<DailyBar>>,
}

/// Date-indexed price table for one or more tickers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalDataset {
    index: Vec<NaiveDate>,
    columns: Vec<TickerColumn>,
}

impl HistoricalDataset {
    /// Outer-join per-ticker bars on date. Ticker order is preserved; a
    /// ticker with no bars keeps an all-missing column.
    pub fn from_series(series: Vec<TickerBars>) -> Self {
        let index: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.bars.iter().map(|b| b.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let positions: HashMap<NaiveDate, usize> =
            index.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let columns = series
            .into_iter()
            .map(|s| {
                let mut values = vec![None; index.len()];
                for bar in s.bars {
                    values[positions[&bar.date]] = Some(bar);
                }
                TickerColumn {
                    ticker: s.ticker,
                    values,
                }
            })
            .collect();

        Self { index, columns }
    }

    /// Number of rows (dates) across all tickers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.ticker.as_str()).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.index.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.index.last().copied()
    }

    /// Adjusted close series of a ticker with missing values dropped.
    pub fn adj_close(&self, ticker: &str) -> Option<Vec<(NaiveDate, f64)>> {
        let column = self.columns.iter().find(|c| c.ticker == ticker)?;
        Some(
            self.index
                .iter()
                .zip(&column.values)
                .filter_map(|(date, bar)| {
                    bar.as_ref()
                        .and_then(|b| b.adj_close)
                        .filter(|v| v.is_finite())
                        .map(|v| (*date, v))
                })
                .collect(),
        )
    }

    /// Rows dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        let from = self.index.partition_point(|d| *d < start);
        Self {
            index: self.index[from..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| TickerColumn {
                    ticker: c.ticker.clone(),
                    values: c.values[from..].to_vec(),
                })
                .collect(),
        }
    }

    /// Full table: one block of price columns per ticker, indexed by date.
    ///
    /// Single-ticker tables use the bare field names; with several tickers
    /// each header is suffixed by its ticker, e.g. `Adj Close (CL)`.
    pub fn to_table(&self, title: &str) -> Table {
        let grouped = self.columns.len() > 1;
        let headers: Vec<String> = self
            .columns
            .iter()
            .flat_map(|c| {
                PRICE_FIELDS.iter().map(move |field| {
                    if grouped {
                        format!("{field} ({})", c.ticker)
                    } else {
                        field.to_string()
                    }
                })
            })
            .collect();

        let mut table = Table::new(headers).with_title(title).with_index("Date");
        for (row, date) in self.index.iter().enumerate() {
            let cells = self
                .columns
                .iter()
                .flat_map(|c| match c.values[row] {
                    Some(bar) => bar.cells(),
                    None => std::array::from_fn(|_| Cell::Empty),
                })
                .collect();
            table.push_row(Some(Cell::Date(*date)), cells);
        }
        table
    }

    /// One-column table of a ticker's adjusted close on or after `start`,
    /// missing values dropped.
    pub fn adj_close_table(&self, ticker: &str, header: &str, start: NaiveDate, title: &str) -> Table {
        let mut table = Table::new([header]).with_title(title).with_index("Date");
        for (date, value) in self.adj_close(ticker).unwrap_or_default() {
            if date >= start {
                table.push_row(Some(Cell::Date(date)), vec![Cell::Number(value)]);
            }
        }
        table
    }
}

/// One contract on a futures curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Contract label, e.g. `Dec-2024`.
    pub label: String,
    pub price: f64,
}

/// Prices across successive expiries of one underlying.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveDataset {
    ticker: String,
    points: Vec<CurvePoint>,
}

impl CurveDataset {
    pub fn new(ticker: impl Into<String>, points: Vec<CurvePoint>) -> Self {
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Vec::new())
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Table indexed by contract label with a single `Futures` price column.
    pub fn to_table(&self, title: &str) -> Table {
        let mut table = Table::new(["Futures"]).with_title(title).with_index("Contract");
        for p in &self.points {
            table.push_row(Some(Cell::text(&p.label)), vec![Cell::Number(p.price)]);
        }
        table
    }
}

//! Data provider trait and structured error types.
//!
//! The FuturesProvider trait abstracts over data sources so the display
//! layer can be driven by Yahoo Finance in production and by fixtures in
//! tests. Providers own the reference table they validate against.

use thiserror::Error;

use crate::dataset::{CurveDataset, HistoricalDataset};
use crate::expiry::Expiry;
use crate::reference::{ReferenceTable, SearchFilter, SearchResult};

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output as-is.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("ticker '{0}' is not in the reference table")]
    UnknownTicker(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Source of futures reference, historical and curve data.
///
/// Calls are blocking. An unknown symbol or a contract with no trading
/// history yields an empty dataset, not an error.
pub trait FuturesProvider {
    /// Reference table this provider resolves tickers against.
    fn reference(&self) -> &ReferenceTable;

    /// Reference rows matching the filters.
    fn search(&self, filter: &SearchFilter) -> Result<SearchResult, DataError> {
        Ok(self.reference().search(filter))
    }

    /// Daily history for the tickers: continuous front-month series, or the
    /// dated contract when `expiry` is given.
    fn historical(
        &self,
        tickers: &[String],
        expiry: Option<Expiry>,
    ) -> Result<HistoricalDataset, DataError>;

    /// Latest price of each upcoming contract of `ticker`.
    fn curve(&self, ticker: &str) -> Result<CurveDataset, DataError>;
}

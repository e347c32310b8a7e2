//! FuturesLab Core — reference data, datasets and the provider seam.
//!
//! This crate holds everything the display layer consumes:
//! - The futures reference table (ticker → description, exchange, category)
//! - Expiry parsing and exchange symbol construction
//! - Historical and curve datasets, and the neutral `Table` view
//! - The `FuturesProvider` trait and its Yahoo Finance implementation
//! - Ticker validation and TOML configuration

pub mod config;
pub mod dataset;
pub mod expiry;
pub mod provider;
pub mod reference;
pub mod table;
pub mod validate;
pub mod yahoo;

pub use config::{ChartSettings, ConfigError, FuturesLabConfig, HistoricalSettings, ProviderSettings};
pub use dataset::{CurveDataset, CurvePoint, DailyBar, HistoricalDataset, TickerBars, ADJ_CLOSE};
pub use expiry::{Expiry, ExpiryError};
pub use provider::{DataError, FuturesProvider};
pub use reference::{FutureContract, ReferenceError, ReferenceTable, SearchFilter, SearchResult};
pub use table::{Cell, Table};
pub use validate::{validate_tickers, ValidatedTickers};
pub use yahoo::YahooFuturesProvider;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn reference_table_is_send_sync() {
        assert_send::<ReferenceTable>();
        assert_sync::<ReferenceTable>();
    }

    #[test]
    fn datasets_are_send_sync() {
        assert_send::<HistoricalDataset>();
        assert_sync::<HistoricalDataset>();
        assert_send::<CurveDataset>();
        assert_sync::<CurveDataset>();
        assert_send::<Table>();
        assert_sync::<Table>();
    }

    #[test]
    fn yahoo_provider_is_send_sync() {
        assert_send::<YahooFuturesProvider>();
        assert_sync::<YahooFuturesProvider>();
    }
}

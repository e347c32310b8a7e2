//! Futures reference table — ticker → description, exchange, category.
//!
//! The table is loaded once at startup (embedded CSV by default, or a
//! user-supplied file) and is read-only afterwards. Every component that
//! needs it receives it explicitly; there is no process-wide global.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{Cell, Table};

/// Reference data shipped with the crate.
const EMBEDDED_CSV: &str = include_str!("../data/futures.csv");

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureContract {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Exchange")]
    pub exchange: String,
    #[serde(rename = "Category")]
    pub category: String,
}

/// Errors raised while loading a reference table.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed reference table: {0}")]
    Csv(#[from] csv::Error),

    #[error("duplicate ticker '{0}' in reference table")]
    DuplicateTicker(String),

    #[error("reference table is empty")]
    Empty,
}

/// Free-text filters for a reference search. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub category: String,
    pub exchange: String,
    pub description: String,
}

impl SearchFilter {
    fn matches(&self, contract: &FutureContract) -> bool {
        let category = self.category.trim();
        let exchange = self.exchange.trim();
        let description = self.description.trim().to_lowercase();

        (category.is_empty() || contract.category.eq_ignore_ascii_case(category))
            && (exchange.is_empty() || contract.exchange.eq_ignore_ascii_case(exchange))
            && (description.is_empty()
                || contract.description.to_lowercase().contains(&description))
    }
}

/// Immutable lookup table of known futures series.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    contracts: Vec<FutureContract>,
    by_ticker: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Load the table embedded in the binary.
    pub fn embedded() -> Result<Self, ReferenceError> {
        Self::from_csv_str(EMBEDDED_CSV)
    }

    /// Load a table from a CSV file with `Ticker,Description,Exchange,Category` columns.
    pub fn from_file(path: &Path) -> Result<Self, ReferenceError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_str(&content)
    }

    /// Parse a table from CSV text.
    pub fn from_csv_str(content: &str) -> Result<Self, ReferenceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut contracts = Vec::new();
        for record in reader.deserialize() {
            let contract: FutureContract = record?;
            contracts.push(contract);
        }
        Self::from_contracts(contracts)
    }

    /// Build a table from already-parsed rows. Row order is preserved.
    pub fn from_contracts(contracts: Vec<FutureContract>) -> Result<Self, ReferenceError> {
        if contracts.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let mut by_ticker = HashMap::with_capacity(contracts.len());
        for (i, contract) in contracts.iter().enumerate() {
            if by_ticker.insert(contract.ticker.clone(), i).is_some() {
                return Err(ReferenceError::DuplicateTicker(contract.ticker.clone()));
            }
        }

        Ok(Self {
            contracts,
            by_ticker,
        })
    }

    pub fn get(&self, ticker: &str) -> Option<&FutureContract> {
        self.by_ticker.get(ticker).map(|&i| &self.contracts[i])
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.by_ticker.contains_key(ticker)
    }

    /// Human-readable description of a ticker.
    pub fn description(&self, ticker: &str) -> Option<&str> {
        self.get(ticker).map(|c| c.description.as_str())
    }

    /// Exchange code of a ticker (used to build dated contract symbols).
    pub fn exchange(&self, ticker: &str) -> Option<&str> {
        self.get(ticker).map(|c| c.exchange.as_str())
    }

    pub fn contracts(&self) -> &[FutureContract] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// All rows matching every non-empty filter, in table order.
    pub fn search(&self, filter: &SearchFilter) -> SearchResult {
        SearchResult::new(
            self.contracts
                .iter()
                .filter(|c| filter.matches(c))
                .cloned()
                .collect(),
        )
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.contracts
            .iter()
            .map(|c| c.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct exchanges, sorted.
    pub fn exchanges(&self) -> Vec<&str> {
        self.contracts
            .iter()
            .map(|c| c.exchange.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Flat list of reference rows returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    contracts: Vec<FutureContract>,
}

impl SearchResult {
    pub fn new(contracts: Vec<FutureContract>) -> Self {
        Self { contracts }
    }

    pub fn contracts(&self) -> &[FutureContract] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Tabular view: Ticker, Description, Exchange, Category (no index column).
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(["Ticker", "Description", "Exchange", "Category"]);
        for c in &self.contracts {
            table.push_row(
                None,
                vec![
                    Cell::text(&c.ticker),
                    Cell::text(&c.description),
                    Cell::text(&c.exchange),
                    Cell::text(&c.category),
                ],
            );
        }
        table
    }
}

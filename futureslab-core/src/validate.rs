//! Ticker validation against the reference table.

use crate::reference::ReferenceTable;

/// Outcome of validating a requested ticker list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedTickers {
    /// Known tickers in request order, first occurrence only.
    pub valid: Vec<String>,
    /// Unknown tickers in request order.
    pub invalid: Vec<String>,
}

impl ValidatedTickers {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}

/// Split `tickers` into known and unknown symbols.
///
/// Surrounding whitespace is ignored and blank entries are skipped.
/// Duplicated valid tickers are kept once.
pub fn validate_tickers<S: AsRef<str>>(reference: &ReferenceTable, tickers: &[S]) -> ValidatedTickers {
    let mut out = ValidatedTickers::default();
    for ticker in tickers {
        let ticker = ticker.as_ref().trim();
        if ticker.is_empty() {
            continue;
        }
        if reference.contains(ticker) {
            if !out.valid.iter().any(|t| t == ticker) {
                out.valid.push(ticker.to_string());
            }
        } else {
            out.invalid.push(ticker.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::FutureContract;
    use proptest::prelude::*;

    fn reference() -> ReferenceTable {
        let rows = [("CL", "Crude Oil"), ("NG", "Natural Gas"), ("GC", "Gold"), ("ES", "E-mini S&P 500")];
        ReferenceTable::from_contracts(
            rows.iter()
                .map(|(t, d)| FutureContract {
                    ticker: t.to_string(),
                    description: d.to_string(),
                    exchange: "NYM".into(),
                    category: "energy".into(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn drops_unknown_ticker() {
        let v = validate_tickers(&reference(), &["CL", "ZZZ"]);
        assert_eq!(v.valid, vec!["CL"]);
        assert_eq!(v.invalid, vec!["ZZZ"]);
    }

    #[test]
    fn all_invalid_is_empty() {
        let v = validate_tickers(&reference(), &["AAA", "BBB"]);
        assert!(v.is_empty());
        assert_eq!(v.invalid.len(), 2);
    }

    #[test]
    fn trims_and_dedups() {
        let v = validate_tickers(&reference(), &[" NG ", "", "NG", "CL"]);
        assert_eq!(v.valid, vec!["NG", "CL"]);
        assert!(v.invalid.is_empty());
    }

    proptest! {
        /// Valid output is exactly the known inputs, in input order; every
        /// unknown input is reported.
        #[test]
        fn partitions_preserving_order(
            picks in prop::collection::vec(
                prop::sample::select(vec!["CL", "NG", "GC", "ES", "ZZZ", "QQQ", "XX"]),
                0..12,
            )
        ) {
            let table = reference();
            let v = validate_tickers(&table, &picks);

            let mut expected_valid: Vec<String> = Vec::new();
            for p in &picks {
                if table.contains(p) && !expected_valid.iter().any(|t| t == p) {
                    expected_valid.push(p.to_string());
                }
            }
            let expected_invalid: Vec<String> = picks
                .iter()
                .filter(|p| !table.contains(p))
                .map(|p| p.to_string())
                .collect();

            prop_assert_eq!(v.valid, expected_valid);
            prop_assert_eq!(v.invalid, expected_invalid);
        }
    }
}

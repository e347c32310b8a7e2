//! Contract expiries and exchange symbol construction.
//!
//! A dated contract is addressed as `<ticker><month code><yy>.<exchange>`
//! (e.g. `CLZ24.NYM`); the continuous front-month series is `<ticker>=F`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Futures month codes, January through December.
pub const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    #[error("invalid expiry '{0}': expected YYYY-MM")]
    Format(String),

    #[error("invalid expiry month {0}: expected 1-12")]
    Month(u32),
}

/// Year-month identifying one contract within a futures series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expiry {
    year: i32,
    month: u32,
}

impl Expiry {
    pub fn new(year: i32, month: u32) -> Result<Self, ExpiryError> {
        if !(1..=12).contains(&month) {
            return Err(ExpiryError::Month(month));
        }
        Ok(Self { year, month })
    }

    /// Expiry month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn month_code(&self) -> char {
        MONTH_CODES[(self.month - 1) as usize]
    }

    /// The expiry `months` months later.
    pub fn add_months(self, months: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }

    /// Exchange symbol of the dated contract, e.g. `CLZ24.NYM`.
    pub fn contract_symbol(&self, ticker: &str, exchange: &str) -> String {
        format!(
            "{ticker}{}{:02}.{exchange}",
            self.month_code(),
            self.year.rem_euclid(100)
        )
    }

    /// Short label used to index curve points, e.g. `Dec-2024`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b-%Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Expiry {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map_err(|_| ExpiryError::Format(s.to_string()))?;
        Ok(Self::from_date(date))
    }
}

/// Symbol of the continuous front-month series.
pub fn continuous_symbol(ticker: &str) -> String {
    format!("{ticker}=F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_month() {
        let e: Expiry = "2024-12".parse().unwrap();
        assert_eq!(e.year(), 2024);
        assert_eq!(e.month(), 12);
        assert_eq!(e.to_string(), "2024-12");
    }

    #[test]
    fn rejects_bad_formats() {
        assert!("2024".parse::<Expiry>().is_err());
        assert!("2024-13".parse::<Expiry>().is_err());
        assert!("Dec-2024".parse::<Expiry>().is_err());
        assert_eq!(Expiry::new(2024, 0), Err(ExpiryError::Month(0)));
    }

    #[test]
    fn contract_symbol_uses_month_code_and_two_digit_year() {
        let e = Expiry::new(2024, 12).unwrap();
        assert_eq!(e.contract_symbol("CL", "NYM"), "CLZ24.NYM");

        let e = Expiry::new(2030, 3).unwrap();
        assert_eq!(e.contract_symbol("ZC", "CBT"), "ZCH30.CBT");
    }

    #[test]
    fn add_months_rolls_over_year() {
        let e = Expiry::new(2024, 11).unwrap();
        assert_eq!(e.add_months(0), e);
        assert_eq!(e.add_months(2), Expiry::new(2025, 1).unwrap());
        assert_eq!(e.add_months(26), Expiry::new(2027, 1).unwrap());
    }

    #[test]
    fn label_is_short_month_and_year() {
        assert_eq!(Expiry::new(2024, 12).unwrap().label(), "Dec-2024");
    }

    #[test]
    fn continuous_symbol_suffix() {
        assert_eq!(continuous_symbol("NG"), "NG=F");
    }
}

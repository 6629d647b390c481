//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// ISO 4217 currency codes.
///
/// Ordering follows declaration order, which keeps per-currency maps in a
/// stable, reproducible order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Swedish Krona
    SEK,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Currency; 8] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::CAD,
        Currency::AUD,
        Currency::SEK,
    ];

    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::SEK => "SEK",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == upper)
            .ok_or_else(|| CoreError::unknown_currency(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for ccy in Currency::ALL {
            assert_eq!(ccy.code().parse::<Currency>().unwrap(), ccy);
        }
    }

    #[test]
    fn test_parse_lowercase() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "XYZ".parse::<Currency>().unwrap_err();
        assert_eq!(err, CoreError::unknown_currency("XYZ"));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Currency::GBP).unwrap();
        assert_eq!(json, "\"GBP\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Currency::GBP);
    }
}

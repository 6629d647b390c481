//! Rate indices used to look up forward curves.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::Currency;

/// A term rate index such as USD LIBOR 3M.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IborIndex {
    name: String,
    currency: Currency,
    tenor_months: u32,
}

impl IborIndex {
    /// Creates an index.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: Currency, tenor_months: u32) -> Self {
        Self {
            name: name.into(),
            currency,
            tenor_months,
        }
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Tenor in months.
    pub fn tenor_months(&self) -> u32 {
        self.tenor_months
    }
}

impl fmt::Display for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An overnight index such as Fed Funds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OvernightIndex {
    name: String,
    currency: Currency,
}

impl OvernightIndex {
    /// Creates an index.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Self {
            name: name.into(),
            currency,
        }
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl fmt::Display for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

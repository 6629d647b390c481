//! # Strata Core
//!
//! Core types shared by every layer of the Strata rates analytics library.
//!
//! This crate provides:
//!
//! - **Currency**: ISO 4217 currency codes used to key amounts and curves
//! - **Amounts**: [`CurrencyAmount`] and [`MultipleCurrencyAmount`], the result
//!   type of every present-value computation
//! - **Errors**: [`CoreError`] for malformed inputs to the types above
//!
//! ## Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let usd = MultipleCurrencyAmount::of(Currency::USD, 100.0);
//! let eur = MultipleCurrencyAmount::of(Currency::EUR, 25.0);
//! let total = usd.plus(&eur);
//!
//! assert_eq!(total.len(), 2);
//! assert_eq!(total.amount(Currency::USD), 100.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

pub mod amount;
pub mod currency;
pub mod error;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::amount::{CurrencyAmount, MultipleCurrencyAmount};
    pub use crate::currency::Currency;
    pub use crate::error::{CoreError, CoreResult};
}

pub use amount::{CurrencyAmount, MultipleCurrencyAmount};
pub use currency::Currency;
pub use error::{CoreError, CoreResult};

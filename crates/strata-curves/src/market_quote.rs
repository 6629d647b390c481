//! Market-quote sensitivities through curve building blocks.

use crate::building_block::CurveBuildingBlockBundle;
use crate::error::{CurveError, CurveResult};
use crate::parameter_sensitivity::MultipleCurrencyParameterSensitivity;

/// Maps parameter sensitivities to sensitivities with respect to the market
/// quotes of the instruments the curves were built from.
///
/// For every `(curve, currency)` entry the parameter sensitivity row vector
/// is multiplied by the curve's Jacobian in the bundle. The product has one
/// entry per instrument of the curve's block and is split back by curve
/// using the block layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketQuoteSensitivityBlockCalculator;

impl MarketQuoteSensitivityBlockCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Market-quote sensitivity of a parameter sensitivity.
    ///
    /// Fails with [`CurveError::CurveNotFound`] if a curve of the
    /// sensitivity has no entry in the bundle.
    pub fn from_parameter_sensitivity(
        &self,
        sensitivity: &MultipleCurrencyParameterSensitivity,
        bundle: &CurveBuildingBlockBundle,
    ) -> CurveResult<MultipleCurrencyParameterSensitivity> {
        let mut result = MultipleCurrencyParameterSensitivity::new();
        for (name, ccy, vector) in sensitivity.iter() {
            let (block, matrix) = bundle
                .block(name)
                .ok_or_else(|| CurveError::curve_not_found(name))?;
            if matrix.nrows() != vector.len() {
                return Err(CurveError::invalid_value(format!(
                    "curve {name} has {} parameter sensitivities but its Jacobian has {} rows",
                    vector.len(),
                    matrix.nrows()
                )));
            }
            let quotes = matrix.tr_mul(vector);
            for other in block.all_names() {
                let (start, length) = block.slice(other)?;
                if start + length > quotes.len() {
                    return Err(CurveError::invalid_value(format!(
                        "block slice of {other} exceeds the {} columns of the Jacobian of {name}",
                        quotes.len()
                    )));
                }
                let part = quotes.rows(start, length).into_owned();
                result = result.plus(other, ccy, &part)?;
            }
        }
        Ok(result)
    }
}

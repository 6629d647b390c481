//! The multi-curve builder.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use strata_config::{CalibrationTarget, StrataConfig};
use strata_curves::{
    CurveBuildingBlock, CurveBuildingBlockBundle, MulticurveProvider,
    ParameterSensitivityCalculator,
};
use strata_math::linear_algebra::{Decomposition, DecompositionResult};
use strata_math::rootfinding::NewtonVectorRootFinder;
use strata_math::{MathError, MathResult};
use strata_pricing::InstrumentDerivative;
use tracing::{debug, info, warn};

use super::target::TargetCalculator;
use super::CalibrationUnit;
use crate::error::{CalibrationError, CalibrationResult};

/// Builds curves unit by unit with a Newton-type root finder and records the
/// building blocks of each calibrated curve.
///
/// For each unit the residual is the calibration target of every instrument,
/// and the Jacobian is the sensitivity of those targets to the unit's curve
/// parameters. Once a unit is solved, each of its curves is stored in the
/// block bundle with the derivative of its parameters with respect to the
/// market quotes of every curve built so far.
#[derive(Debug)]
pub struct MulticurveBuilder {
    root_finder: NewtonVectorRootFinder,
    decomposition: Arc<dyn Decomposition>,
    target: TargetCalculator,
    sensitivity: ParameterSensitivityCalculator,
}

impl MulticurveBuilder {
    /// Creates a builder.
    ///
    /// `decomposition` inverts the Jacobians stored in the block bundle.
    pub fn new(
        root_finder: NewtonVectorRootFinder,
        decomposition: Arc<dyn Decomposition>,
        target: CalibrationTarget,
    ) -> Self {
        Self {
            root_finder,
            decomposition,
            target: TargetCalculator::new(target),
            sensitivity: ParameterSensitivityCalculator::new(),
        }
    }

    /// Creates a builder from the root finder and curve building settings.
    pub fn from_config(config: &StrataConfig) -> CalibrationResult<Self> {
        Ok(Self::new(
            config.root_finder.root_finder()?,
            config.root_finder.decomposition.decomposition(),
            config.curve_building.target,
        ))
    }

    /// Builder with default settings: full Newton, SVD, par spread target.
    pub fn with_defaults() -> CalibrationResult<Self> {
        Self::from_config(&StrataConfig::default())
    }

    /// Calibration target.
    pub fn target(&self) -> CalibrationTarget {
        self.target.target()
    }

    /// Decomposition used for the stored inverse Jacobians.
    pub fn decomposition_kind(&self) -> &'static str {
        self.decomposition.name()
    }

    /// Calibrates `units` in order on top of `known_data`.
    ///
    /// Returns the provider holding the known and the calibrated curves, and
    /// `known_block_bundle` extended with one entry per calibrated curve.
    pub fn make_curves_from_derivatives(
        &self,
        units: &[CalibrationUnit],
        known_data: &MulticurveProvider,
        known_block_bundle: &CurveBuildingBlockBundle,
    ) -> CalibrationResult<(MulticurveProvider, CurveBuildingBlockBundle)> {
        let mut provider = known_data.clone();
        let mut bundle = known_block_bundle.clone();

        for (index, unit) in units.iter().enumerate() {
            unit.validate()?;
            let context = UnitContext { index, unit };
            let instruments: Vec<&InstrumentDerivative> = unit.instruments().collect();

            let mut layout = Vec::with_capacity(unit.curves.len());
            let mut guess = Vec::with_capacity(unit.number_of_parameters());
            for curve in &unit.curves {
                let parameters = curve.initial_parameters();
                layout.push((curve.name(), (guess.len(), parameters.len())));
                guess.extend_from_slice(&parameters);
                curve.install(&mut provider, parameters)?;
            }
            let unit_block = CurveBuildingBlock::new(layout)?;
            let start = DVector::from_vec(guess);

            // Pricing errors at the initial guess are returned with their type.
            let initial = self.residuals_at(&instruments, &provider)?;
            let first_jacobian = Cell::new(Some(self.jacobian_at(
                &instruments,
                &provider,
                &unit_block,
            )?));
            debug!(
                unit = index,
                curves = %context,
                residual = initial.norm(),
                "starting curve unit"
            );

            let base = &provider;
            let failure = EvaluationFailure::default();
            let function = |x: &DVector<f64>| -> MathResult<DVector<f64>> {
                let market = with_parameters(base, unit, x).map_err(|e| failure.capture(e))?;
                self.residuals_at(&instruments, &market)
                    .map_err(|e| failure.capture(e))
            };
            let jacobian = |x: &DVector<f64>| -> MathResult<DMatrix<f64>> {
                if let Some(first) = first_jacobian.take() {
                    if *x == start {
                        return Ok(first);
                    }
                }
                let market = with_parameters(base, unit, x).map_err(|e| failure.capture(e))?;
                self.jacobian_at(&instruments, &market, &unit_block)
                    .map_err(|e| failure.capture(e))
            };
            let result = self
                .root_finder
                .solve_with_jacobian(function, jacobian, &start)
                .map_err(|source| {
                    warn!(unit = index, curves = %context, error = %source, "curve unit failed");
                    failure.take().unwrap_or_else(|| {
                        CalibrationError::root_finding(context.to_string(), source)
                    })
                })?;
            if let Some(skipped) = failure.take() {
                debug!(unit = index, error = %skipped, "line search stepped over a failing point");
            }

            provider = with_parameters(&provider, unit, &result.root)?;
            info!(
                unit = index,
                curves = %context,
                iterations = result.iterations,
                residual = result.residual_norm(),
                state = %result.state,
                "calibrated curve unit"
            );

            self.update_block_bundle(&instruments, &provider, unit, &mut bundle)?;
        }

        Ok((provider, bundle))
    }

    /// Calibration target of each instrument of `unit` on `market`.
    pub fn residuals(
        &self,
        unit: &CalibrationUnit,
        market: &MulticurveProvider,
    ) -> CalibrationResult<Vec<f64>> {
        let instruments: Vec<&InstrumentDerivative> = unit.instruments().collect();
        Ok(self
            .residuals_at(&instruments, market)?
            .iter()
            .copied()
            .collect())
    }

    fn residuals_at(
        &self,
        instruments: &[&InstrumentDerivative],
        market: &MulticurveProvider,
    ) -> CalibrationResult<DVector<f64>> {
        let values = instruments
            .iter()
            .map(|instrument| self.target.value(*instrument, market))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(values))
    }

    /// Sensitivity of each instrument's target to the parameters laid out by
    /// `block`, one row per instrument.
    fn jacobian_at(
        &self,
        instruments: &[&InstrumentDerivative],
        market: &MulticurveProvider,
        block: &CurveBuildingBlock,
    ) -> CalibrationResult<DMatrix<f64>> {
        let mut jacobian = DMatrix::zeros(instruments.len(), block.total_parameters());
        for (row, instrument) in instruments.iter().enumerate() {
            let point = self.target.sensitivity(*instrument, market)?;
            let vector = self.sensitivity.sensitivity_vector(market, &point, block)?;
            jacobian.row_mut(row).copy_from(&vector.transpose());
        }
        Ok(jacobian)
    }

    /// Stores the building block of each curve of the unit just calibrated.
    ///
    /// The block lays out the previously built curves first and the unit's
    /// curves last. The stored matrix is `dp/dm` for the unit's parameters:
    /// the inverse Jacobian on the unit's own quotes and
    /// `−(∂v/∂p_current)⁻¹ (∂v/∂p_before) (dp_before/dm_before)` on the quotes
    /// of the earlier curves.
    fn update_block_bundle(
        &self,
        instruments: &[&InstrumentDerivative],
        provider: &MulticurveProvider,
        unit: &CalibrationUnit,
        bundle: &mut CurveBuildingBlockBundle,
    ) -> CalibrationResult<()> {
        let current: Vec<&str> = unit.curve_names().collect();
        let before: Vec<&str> = provider
            .all_curve_names()
            .filter(|name| !current.contains(name) && bundle.block(name).is_some())
            .collect();

        let mut layout = Vec::with_capacity(before.len() + current.len());
        let mut start = 0;
        for name in &before {
            let n = provider.number_of_parameters(name)?;
            layout.push((*name, (start, n)));
            start += n;
        }
        let n_before = start;
        for curve in &unit.curves {
            let n = curve.number_of_parameters();
            layout.push((curve.name(), (start, n)));
            start += n;
        }
        let n_current = start - n_before;
        let block = CurveBuildingBlock::new(layout)?;

        let full = self.jacobian_at(instruments, provider, &block)?;
        let direct = full.columns(n_before, n_current).into_owned();
        let inverse = self.decomposition.decompose(&direct)?.inverse()?;

        let mut dp_dm = DMatrix::zeros(n_current, start);
        dp_dm.columns_mut(n_before, n_current).copy_from(&inverse);
        if n_before > 0 {
            let transition = transition_matrix(&before, n_before, &block, bundle)?;
            let non_direct = full.columns(0, n_before).into_owned();
            let indirect = -(&inverse * non_direct) * transition;
            dp_dm.columns_mut(0, n_before).copy_from(&indirect);
        }

        for curve in &unit.curves {
            let (first, n) = block.slice(curve.name())?;
            let rows = dp_dm.rows(first - n_before, n).into_owned();
            bundle.add(curve.name(), block.clone(), rows);
        }
        debug!(
            curves = ?current,
            earlier = before.len(),
            "updated curve building blocks"
        );
        Ok(())
    }
}

/// Derivatives of the earlier curves' parameters with respect to the earlier
/// curves' quotes, assembled from their stored blocks.
fn transition_matrix(
    before: &[&str],
    n_before: usize,
    block: &CurveBuildingBlock,
    bundle: &CurveBuildingBlockBundle,
) -> CalibrationResult<DMatrix<f64>> {
    let mut transition = DMatrix::zeros(n_before, n_before);
    for row_name in before {
        let Some((row_block, matrix)) = bundle.block(row_name) else {
            continue;
        };
        let (row_start, row_len) = block.slice(row_name)?;
        if matrix.nrows() != row_len {
            return Err(CalibrationError::invalid_unit(format!(
                "stored block of {row_name} has {} rows for {row_len} parameters",
                matrix.nrows()
            )));
        }
        for column_name in before {
            if !row_block.contains(column_name) {
                continue;
            }
            let (column_start, column_len) = block.slice(column_name)?;
            let source = row_block.start(column_name)?;
            if source + column_len > matrix.ncols() {
                return Err(CalibrationError::invalid_unit(format!(
                    "stored block of {row_name} does not cover the parameters of {column_name}"
                )));
            }
            transition
                .view_mut((row_start, column_start), (row_len, column_len))
                .copy_from(&matrix.view((0, source), (row_len, column_len)));
        }
    }
    Ok(transition)
}

/// Copy of `base` with the unit's curves set to the parameters in `x`.
fn with_parameters(
    base: &MulticurveProvider,
    unit: &CalibrationUnit,
    x: &DVector<f64>,
) -> CalibrationResult<MulticurveProvider> {
    let mut market = base.clone();
    let mut offset = 0;
    for curve in &unit.curves {
        let n = curve.number_of_parameters();
        let parameters = x.rows(offset, n).iter().copied().collect();
        market.update_curve_parameters(curve.name(), parameters)?;
        offset += n;
    }
    Ok(market)
}

/// First non-numerical error raised while the root finder evaluates a unit.
///
/// The root finder only sees [`MathError`]s, and treats an invalid point as a
/// failed line search step. The original error is kept here so that a unit
/// that does not converge reports it instead of a bare root finding failure.
#[derive(Debug, Default)]
struct EvaluationFailure {
    first: RefCell<Option<CalibrationError>>,
}

impl EvaluationFailure {
    fn capture(&self, err: CalibrationError) -> MathError {
        match err {
            CalibrationError::Math(e) => e,
            other => {
                debug!(error = %other, "curve unit evaluation failed");
                let math = MathError::invalid_input(other.to_string());
                let mut slot = self.first.borrow_mut();
                if slot.is_none() {
                    *slot = Some(other);
                }
                math
            }
        }
    }

    fn take(&self) -> Option<CalibrationError> {
        self.first.borrow_mut().take()
    }
}

struct UnitContext<'a> {
    index: usize,
    unit: &'a CalibrationUnit,
}

impl fmt::Display for UnitContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.unit.curve_names().collect();
        write!(f, "unit {} [{}]", self.index, names.join(", "))
    }
}

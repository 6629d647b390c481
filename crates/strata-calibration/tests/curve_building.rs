//! Integration tests for simultaneous curve building.

use approx::assert_abs_diff_eq;
use strata_calibration::prelude::*;
use strata_core::Currency;
use strata_curves::{
    CurveBuildingBlockBundle, IborIndex, MarketBundle, MulticurveProvider, OvernightIndex,
};
use strata_pricing::instrument::builder::{fixed_ibor_swap, fixed_overnight_swap};
use strata_pricing::{
    Cash, FixingPeriod, Fra, InstrumentDerivative, ParSpreadMarketQuoteDiscountingCalculator,
};

const DISC_TIMES: [f64; 4] = [0.5, 1.0, 2.0, 3.0];
const FWD_TIMES: [f64; 4] = [0.5, 1.0, 2.0, 3.0];

fn fed_funds() -> OvernightIndex {
    OvernightIndex::new("USD_FEDFUND", Currency::USD)
}

fn libor_3m() -> IborIndex {
    IborIndex::new("USD_LIBOR_3M", Currency::USD, 3)
}

fn discounting_curve(quotes: [f64; 4]) -> CurveDefinition {
    let instruments: Vec<InstrumentDerivative> = vec![
        Cash::new(Currency::USD, 0.0, 0.5, 1.0, quotes[0], 0.5)
            .unwrap()
            .into(),
        Cash::new(Currency::USD, 0.0, 1.0, 1.0, quotes[1], 1.0)
            .unwrap()
            .into(),
        fixed_overnight_swap(&fed_funds(), 0.0, 2.0, 1.0, 1.0, quotes[2], true)
            .unwrap()
            .into(),
        fixed_overnight_swap(&fed_funds(), 0.0, 3.0, 1.0, 1.0, quotes[3], true)
            .unwrap()
            .into(),
    ];
    CurveDefinition::new(
        "USD_DISC",
        DISC_TIMES.to_vec(),
        vec![
            CurveRole::Discounting {
                currency: Currency::USD,
            },
            CurveRole::Overnight { index: fed_funds() },
        ],
        instruments,
    )
}

fn forward_curve(quotes: [f64; 4]) -> CurveDefinition {
    let index = libor_3m();
    let fra = |start: f64, rate: f64| -> InstrumentDerivative {
        let fixing = FixingPeriod::new(start, start + 0.25, 0.25).unwrap();
        Fra::new(start, 0.25, 1.0, index.clone(), fixing, rate)
            .unwrap()
            .into()
    };
    let instruments = vec![
        fra(0.25, quotes[0]),
        fra(0.75, quotes[1]),
        fixed_ibor_swap(&index, 0.0, 2.0, 1.0, 1.0, quotes[2], true)
            .unwrap()
            .into(),
        fixed_ibor_swap(&index, 0.0, 3.0, 1.0, 1.0, quotes[3], true)
            .unwrap()
            .into(),
    ];
    CurveDefinition::new(
        "USD_FWD3M",
        FWD_TIMES.to_vec(),
        vec![CurveRole::Ibor { index }],
        instruments,
    )
}

const DISC_QUOTES: [f64; 4] = [0.018, 0.019, 0.021, 0.022];
const FWD_QUOTES: [f64; 4] = [0.023, 0.024, 0.026, 0.027];

fn build(
    disc: [f64; 4],
    fwd: [f64; 4],
) -> (MulticurveProvider, CurveBuildingBlockBundle) {
    let units = [
        CalibrationUnit::single(discounting_curve(disc)),
        CalibrationUnit::single(forward_curve(fwd)),
    ];
    MulticurveBuilder::with_defaults()
        .unwrap()
        .make_curves_from_derivatives(
            &units,
            &MulticurveProvider::new(),
            &CurveBuildingBlockBundle::new(),
        )
        .unwrap()
}

#[test]
fn test_calibrated_curves_reprice_every_instrument() {
    let (market, _) = build(DISC_QUOTES, FWD_QUOTES);
    let calculator = ParSpreadMarketQuoteDiscountingCalculator::new();

    for curve in [discounting_curve(DISC_QUOTES), forward_curve(FWD_QUOTES)] {
        for instrument in &curve.instruments {
            let spread = calculator.par_spread(instrument, &market).unwrap();
            assert_abs_diff_eq!(spread, 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_discounting_curve_matches_deposits() {
    let (market, _) = build(DISC_QUOTES, FWD_QUOTES);
    let df = market.discount_factor(Currency::USD, 1.0).unwrap();
    assert_abs_diff_eq!(df, 1.0 / (1.0 + DISC_QUOTES[1]), epsilon = 1e-10);
}

#[test]
fn test_block_bundle_layout() {
    let (_, bundle) = build(DISC_QUOTES, FWD_QUOTES);

    let (disc_block, disc_matrix) = bundle.block("USD_DISC").unwrap();
    assert_eq!(disc_block.total_parameters(), 4);
    assert_eq!(disc_matrix.shape(), (4, 4));
    assert!(!disc_block.contains("USD_FWD3M"));

    let (fwd_block, fwd_matrix) = bundle.block("USD_FWD3M").unwrap();
    assert_eq!(fwd_block.total_parameters(), 8);
    assert_eq!(fwd_block.slice("USD_DISC").unwrap(), (0, 4));
    assert_eq!(fwd_block.slice("USD_FWD3M").unwrap(), (4, 4));
    assert_eq!(fwd_matrix.shape(), (4, 8));
}

#[test]
fn test_direct_block_matches_finite_difference() {
    let shift = 1e-5;
    let (base, bundle) = build(DISC_QUOTES, FWD_QUOTES);
    let (_, matrix) = bundle.block("USD_DISC").unwrap();

    for quote in 0..4 {
        let mut bumped_quotes = DISC_QUOTES;
        bumped_quotes[quote] += shift;
        let (bumped, _) = build(bumped_quotes, FWD_QUOTES);
        let before = base.curve("USD_DISC").unwrap().parameters().to_vec();
        let after = bumped.curve("USD_DISC").unwrap().parameters().to_vec();
        for parameter in 0..4 {
            let fd = (after[parameter] - before[parameter]) / shift;
            assert_abs_diff_eq!(matrix[(parameter, quote)], fd, epsilon = 1e-3);
        }
    }
}

#[test]
fn test_indirect_block_matches_finite_difference() {
    let shift = 1e-5;
    let (base, bundle) = build(DISC_QUOTES, FWD_QUOTES);
    let (_, matrix) = bundle.block("USD_FWD3M").unwrap();

    for quote in 0..4 {
        let mut bumped_quotes = DISC_QUOTES;
        bumped_quotes[quote] += shift;
        let (bumped, _) = build(bumped_quotes, FWD_QUOTES);
        let before = base.curve("USD_FWD3M").unwrap().parameters().to_vec();
        let after = bumped.curve("USD_FWD3M").unwrap().parameters().to_vec();
        for parameter in 0..4 {
            let fd = (after[parameter] - before[parameter]) / shift;
            assert_abs_diff_eq!(matrix[(parameter, quote)], fd, epsilon = 1e-3);
        }
    }
}

#[test]
fn test_present_value_target_builds_the_same_curves() {
    let config = strata_config::StrataConfig {
        curve_building: strata_config::CurveBuildingConfig {
            target: strata_config::CalibrationTarget::PresentValue,
        },
        ..Default::default()
    };
    let builder = MulticurveBuilder::from_config(&config).unwrap();
    let units = [
        CalibrationUnit::single(discounting_curve(DISC_QUOTES)),
        CalibrationUnit::single(forward_curve(FWD_QUOTES)),
    ];
    let (pv_market, _) = builder
        .make_curves_from_derivatives(
            &units,
            &MulticurveProvider::new(),
            &CurveBuildingBlockBundle::new(),
        )
        .unwrap();
    let (ps_market, _) = build(DISC_QUOTES, FWD_QUOTES);

    for name in ["USD_DISC", "USD_FWD3M"] {
        let pv = pv_market.curve(name).unwrap().parameters();
        let ps = ps_market.curve(name).unwrap().parameters();
        for (a, b) in pv.iter().zip(ps) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_mismatched_instrument_count_is_rejected() {
    let mut curve = discounting_curve(DISC_QUOTES);
    curve.instruments.pop();
    let result = MulticurveBuilder::with_defaults()
        .unwrap()
        .make_curves_from_derivatives(
            &[CalibrationUnit::single(curve)],
            &MulticurveProvider::new(),
            &CurveBuildingBlockBundle::new(),
        );
    assert!(matches!(result, Err(CalibrationError::InvalidUnit { .. })));
}

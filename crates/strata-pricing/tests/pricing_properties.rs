//! Properties of the discounting calculators over composite instruments.

use approx::assert_relative_eq;
use proptest::prelude::*;
use strata_core::Currency;
use strata_curves::{IborIndex, MulticurveProvider, ParameterSensitivityCalculator, YieldCurve};
use strata_pricing::prelude::*;

fn libor3m() -> IborIndex {
    IborIndex::new("USD_LIBOR_3M", Currency::USD, 3)
}

fn market() -> MulticurveProvider {
    let mut m = MulticurveProvider::new();
    m.set_discount_curve(
        Currency::USD,
        YieldCurve::new("USD_DISC", vec![1.0, 2.0, 5.0, 10.0], vec![0.010, 0.014, 0.020, 0.024])
            .unwrap(),
    );
    m.set_ibor_curve(
        libor3m(),
        YieldCurve::new("USD_FWD3M", vec![1.0, 2.0, 5.0, 10.0], vec![0.015, 0.018, 0.025, 0.028])
            .unwrap(),
    );
    m
}

fn pv(instrument: &InstrumentDerivative, market: &MulticurveProvider) -> f64 {
    PresentValueDiscountingCalculator::new()
        .present_value(instrument, market)
        .unwrap()
        .amount(Currency::USD)
}

fn swap(is_payer: bool) -> Swap<CouponFixed, Payment> {
    fixed_ibor_swap(&libor3m(), 0.5, 5.0, 0.5, 10_000_000.0, 0.02, is_payer).unwrap()
}

#[test]
fn swap_value_is_sum_of_legs() {
    let m = market();
    let s = swap(true);
    let whole = pv(&s.clone().into(), &m);
    let fixed = pv(&InstrumentDerivative::AnnuityCouponFixed(s.first_leg().clone()), &m);
    let floating = pv(&InstrumentDerivative::Annuity(s.second_leg().clone()), &m);
    assert_relative_eq!(whole, fixed + floating, max_relative = 1e-12);
}

#[test]
fn mirrored_legs_flip_the_sign() {
    let m = market();
    let payer = pv(&swap(true).into(), &m);
    let receiver = pv(&swap(false).into(), &m);
    assert_relative_eq!(payer, -receiver, max_relative = 1e-12);
}

#[test]
fn swap_at_par_rate_is_worth_zero() {
    let m = market();
    let s: InstrumentDerivative = swap(true).into();
    let spread = ParSpreadMarketQuoteDiscountingCalculator::new()
        .par_spread(&s, &m)
        .unwrap();
    let par = fixed_ibor_swap(&libor3m(), 0.5, 5.0, 0.5, 10_000_000.0, 0.02 + spread, true)
        .unwrap();
    assert!(pv(&par.into(), &m).abs() < 1e-6);
}

#[test]
fn par_spread_sensitivity_matches_finite_difference() {
    let m = market();
    let s: InstrumentDerivative = swap(true).into();
    let calculator = ParSpreadMarketQuoteDiscountingCalculator::new();
    let point = ParSpreadMarketQuoteCurveSensitivityDiscountingCalculator::new()
        .par_spread_curve_sensitivity(&s, &m)
        .unwrap();
    let analytic = ParameterSensitivityCalculator::new()
        .curve_sensitivities(&m, &point)
        .unwrap();

    let shift = 1e-6;
    for name in ["USD_DISC", "USD_FWD3M"] {
        let base = m.curve(name).unwrap().parameters().to_vec();
        for i in 0..base.len() {
            let mut up = m.clone();
            let mut bumped = base.clone();
            bumped[i] += shift;
            up.update_curve_parameters(name, bumped).unwrap();
            let mut down = m.clone();
            let mut bumped = base.clone();
            bumped[i] -= shift;
            down.update_curve_parameters(name, bumped).unwrap();

            let fd = (calculator.par_spread(&s, &up).unwrap()
                - calculator.par_spread(&s, &down).unwrap())
                / (2.0 * shift);
            assert_relative_eq!(analytic[name][i], fd, epsilon = 1e-7, max_relative = 1e-5);
        }
    }
}

#[test]
fn unquoted_instruments_have_no_par_spread() {
    let m = market();
    let payment: InstrumentDerivative = PaymentFixed::new(Currency::USD, 1.0, 1.0).unwrap().into();
    let err = ParSpreadMarketQuoteDiscountingCalculator::new()
        .par_spread(&payment, &m)
        .unwrap_err();
    assert!(matches!(err, PricingError::InvalidInstrument { .. }));
}

#[test]
fn lmm_price_is_close_to_black_at_matching_volatility() {
    let m = market();
    let swap = fixed_ibor_swap(&libor3m(), 2.0, 3.0, 1.0, 10_000_000.0, 0.025, true).unwrap();
    let swaption = SwaptionPhysicalFixedIbor::new(2.0, 2.0, swap, true).unwrap();
    let black = SwaptionPhysicalBlackMethod::new(0.2)
        .unwrap()
        .present_value(&swaption, &m)
        .unwrap();
    let parameters =
        LmmDdParameters::from_ibor_leg(swaption.underlying().second_leg(), 0.0, 0.0, &[0.2])
            .unwrap();
    let lmm = SwaptionPhysicalLmmDdMethod::new()
        .present_value(&swaption, &parameters, &m)
        .unwrap();
    assert!(lmm.amount() > 0.0);
    assert_relative_eq!(lmm.amount(), black.amount(), max_relative = 0.25);
}

fn fixed_coupons() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.1_f64..15.0, -1.0e6_f64..1.0e6), 1..12)
}

proptest! {
    #[test]
    fn annuity_value_is_sum_of_payments(coupons in fixed_coupons()) {
        let m = market();
        let payments: Vec<Payment> = coupons
            .iter()
            .map(|&(t, notional)| {
                CouponFixed::new(Currency::USD, t, 0.25, notional, 0.03).unwrap().into()
            })
            .collect();
        let total: f64 = payments
            .iter()
            .map(|p| pv(&p.clone().into(), &m))
            .sum();
        let annuity = pv(&Annuity::new(payments.clone()).unwrap().into(), &m);
        prop_assert!((annuity - total).abs() <= 1e-9 * (1.0 + total.abs()));

        let mut reversed = payments;
        reversed.reverse();
        let annuity_reversed = pv(&Annuity::new(reversed).unwrap().into(), &m);
        prop_assert!((annuity - annuity_reversed).abs() <= 1e-9 * (1.0 + annuity.abs()));
    }
}

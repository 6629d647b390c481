//! Property-based tests for multi-currency amount arithmetic.

use proptest::prelude::*;
use strata_core::{Currency, CurrencyAmount, MultipleCurrencyAmount};

fn currency_strategy() -> impl Strategy<Value = Currency> {
    (0..Currency::ALL.len()).prop_map(|i| Currency::ALL[i])
}

fn amounts_strategy() -> impl Strategy<Value = Vec<CurrencyAmount>> {
    prop::collection::vec(
        (currency_strategy(), -1.0e6..1.0e6f64).prop_map(|(c, a)| CurrencyAmount::of(c, a)),
        0..12,
    )
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn prop_plus_is_commutative(a in amounts_strategy(), b in amounts_strategy()) {
        let ma = MultipleCurrencyAmount::of_amounts(&a);
        let mb = MultipleCurrencyAmount::of_amounts(&b);
        let ab = ma.plus(&mb);
        let ba = mb.plus(&ma);

        prop_assert_eq!(ab.len(), ba.len());
        for ccy in Currency::ALL {
            prop_assert!(close(ab.amount(ccy), ba.amount(ccy)));
        }
    }

    #[test]
    fn prop_sum_is_order_independent(mut a in amounts_strategy()) {
        let forward = MultipleCurrencyAmount::of_amounts(&a);
        a.reverse();
        let backward = MultipleCurrencyAmount::of_amounts(&a);

        for ccy in Currency::ALL {
            prop_assert!(close(forward.amount(ccy), backward.amount(ccy)));
        }
    }

    #[test]
    fn prop_negation_cancels(a in amounts_strategy()) {
        let m = MultipleCurrencyAmount::of_amounts(&a);
        let zero = m.plus(&m.multiplied_by(-1.0));
        for ccy in zero.currencies() {
            prop_assert!(zero.amount(ccy).abs() < 1e-6);
        }
    }
}

//! Properties of curve building blocks and bundles.

use nalgebra::DMatrix;
use proptest::prelude::*;
use strata_curves::{CurveBuildingBlock, CurveBuildingBlockBundle};

/// Contiguous `(name, (start, length))` layouts with distinct names.
fn layout(prefix: &'static str) -> impl Strategy<Value = Vec<(String, (usize, usize))>> {
    prop::collection::vec(1usize..8, 1..6).prop_map(move |lengths| {
        let mut start = 0;
        lengths
            .into_iter()
            .enumerate()
            .map(|(i, length)| {
                let entry = (format!("{prefix}{i}"), (start, length));
                start += length;
                entry
            })
            .collect()
    })
}

fn bundle_from(layout: &[(String, (usize, usize))], fill: f64) -> CurveBuildingBlockBundle {
    let block = CurveBuildingBlock::new(layout.iter().cloned()).unwrap();
    let columns = block.total_parameters();
    let mut bundle = CurveBuildingBlockBundle::new();
    for (name, (_, length)) in layout {
        bundle.add(
            name.clone(),
            block.clone(),
            DMatrix::from_element(*length, columns, fill),
        );
    }
    bundle
}

#[test]
fn usd_discounting_and_forward_block() {
    let block = CurveBuildingBlock::new([("USD_DISC", (0, 5)), ("USD_FWD3M", (5, 7))]).unwrap();
    assert_eq!(block.start("USD_FWD3M").unwrap(), 5);
    assert_eq!(block.number_of_parameters("USD_FWD3M").unwrap(), 7);
    assert_eq!(block.start("USD_DISC").unwrap(), 0);
    assert_eq!(block.number_of_parameters("USD_DISC").unwrap(), 5);
}

#[test]
fn slice_end_overflow_is_rejected() {
    assert!(CurveBuildingBlock::new([("A", (usize::MAX, 2))]).is_err());
    assert!(CurveBuildingBlock::new([("A", (0, 3)), ("B", (usize::MAX - 1, 2))]).is_err());
    let edge = CurveBuildingBlock::new([("A", (usize::MAX - 2, 2))]).unwrap();
    assert_eq!(edge.total_parameters(), usize::MAX);
}

proptest! {
    #[test]
    fn block_round_trips_its_layout(entries in layout("C")) {
        let block = CurveBuildingBlock::new(entries.iter().cloned()).unwrap();
        for (name, (start, length)) in &entries {
            prop_assert_eq!(block.start(name).unwrap(), *start);
            prop_assert_eq!(block.number_of_parameters(name).unwrap(), *length);
        }
        let names: Vec<&str> = block.all_names().collect();
        let expected: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn add_all_with_itself_is_idempotent(entries in layout("C"), fill in -5.0f64..5.0) {
        let bundle = bundle_from(&entries, fill);
        let mut merged = bundle.clone();
        merged.add_all(&bundle);
        prop_assert_eq!(merged, bundle);
    }

    #[test]
    fn add_all_of_disjoint_bundles_is_the_union(
        left in layout("L"),
        right in layout("R"),
    ) {
        let a = bundle_from(&left, 1.0);
        let b = bundle_from(&right, 2.0);
        let mut merged = a.clone();
        merged.add_all(&b);

        prop_assert_eq!(merged.len(), a.len() + b.len());
        for name in a.names() {
            prop_assert_eq!(merged.block(name), a.block(name));
        }
        for name in b.names() {
            prop_assert_eq!(merged.block(name), b.block(name));
        }
    }
}

// Property-based tests for A1 addressing and evaluation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use plangrid_engine::address::{col_to_letters, letters_to_col, MAX_COL, MAX_ROW};
use plangrid_engine::{evaluate_formula, CellAddress, CellGrid, CellRange, EvalContext};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_address() -> impl Strategy<Value = CellAddress> {
    (1..=MAX_ROW, 1..=MAX_COL).prop_map(|(row, col)| CellAddress::new(row, col).unwrap())
}

/// Small addresses so ranges stay cheap to expand.
fn arb_small_address() -> impl Strategy<Value = CellAddress> {
    (1u32..=12, 1u32..=6).prop_map(|(row, col)| CellAddress::new(row, col).unwrap())
}

/// Arithmetic formula over integers and cells A1:C3, always well formed.
fn arb_formula() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (1u32..=3, 0usize..3).prop_map(|(row, col)| format!("{}{}", ["A", "B", "C"][col], row)),
        Just("SUM(A1:C3)".to_string()),
        Just("AVERAGE(A1:C3)".to_string()),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        (inner.clone(), prop_oneof![Just('+'), Just('-'), Just('*')], inner)
            .prop_map(|(a, op, b)| format!("({a}{op}{b})"))
    })
    .prop_map(|body| format!("={body}"))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn column_letters_roundtrip(col in 1u32..=u32::MAX / 26) {
        let letters = col_to_letters(col);
        prop_assert_eq!(letters_to_col(&letters), Ok(col));
        prop_assert_eq!(col_to_letters(letters_to_col(&letters).unwrap()), letters);
    }

    #[test]
    fn address_roundtrip(addr in arb_address()) {
        let text = addr.to_a1();
        prop_assert!(text.chars().next().unwrap().is_ascii_uppercase());
        prop_assert!(!text.trim_start_matches(|c: char| c.is_ascii_uppercase()).starts_with('0'));
        prop_assert_eq!(CellAddress::from_a1(&text), Ok(addr));
    }

    #[test]
    fn range_expansion_ignores_corner_order(a in arb_small_address(), b in arb_small_address()) {
        let forward = CellRange::new(a, b);
        let backward = CellRange::new(b, a);
        let cells: Vec<_> = forward.cells().collect();

        prop_assert_eq!(cells.len() as u64, forward.cell_count());
        prop_assert_eq!(backward.cells().collect::<Vec<_>>(), cells.clone());
        prop_assert!(cells.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(cells.iter().all(|c| forward.contains(c)));
    }

    #[test]
    fn evaluation_is_idempotent(formula in arb_formula(), values in prop::collection::vec(-50i32..50, 9)) {
        let mut grid = CellGrid::new();
        for (i, v) in values.iter().enumerate() {
            let addr = CellAddress::new(i as u32 / 3 + 1, i as u32 % 3 + 1).unwrap();
            grid.set_number(addr, f64::from(*v));
        }

        let first = evaluate_formula(&formula, &grid);
        let second = evaluate_formula(&formula, &grid);
        prop_assert!(first.is_ok(), "{} failed: {:?}", formula, first);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sum_matches_range_values(a in arb_small_address(), b in arb_small_address()) {
        let mut grid = CellGrid::new();
        for (i, addr) in CellRange::new(a, b).cells().enumerate() {
            if i % 2 == 0 {
                grid.set_number(addr, i as f64);
            }
        }
        let range = CellRange::new(a, b);
        let expected: f64 = grid.range_values(&range).iter().sum();
        prop_assert_eq!(evaluate_formula(&format!("=SUM({range})"), &grid), Ok(expected));
    }
}

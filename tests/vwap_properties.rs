//! Property-based tests over the public VWAP surface (spec §8).
//!
//! These complement the seed-scenario unit tests inside `vwap::engine`
//! with randomized trade sequences, checking the invariants spec §8 states
//! in general form rather than for fixed inputs.

use bigdecimal::BigDecimal;
use proptest::prelude::*;

use vwap_engine::vwap::pool::SlotPool;
use vwap_engine::vwap::window::Window;
use vwap_engine::PairId;

fn engine(window_size: u16) -> vwap_engine::vwap::engine::PairEngine {
    vwap_engine::vwap::engine::PairEngine::new(PairId::from("TEST-PAIR"), window_size)
}

/// Recomputes VWAP from scratch over the last `min(k+1, window_size)`
/// trades, independent of the engine's incremental bookkeeping.
fn naive_vwap(trades: &[(i64, i64)], upto: usize, window_size: usize) -> BigDecimal {
    let start = upto.saturating_sub(window_size.saturating_sub(1));
    let mut sum_pv = BigDecimal::from(0);
    let mut sum_v = BigDecimal::from(0);
    for &(price, size) in &trades[start..=upto] {
        let price = BigDecimal::from(price);
        let size = BigDecimal::from(size);
        sum_pv += &price * &size;
        sum_v += size;
    }
    if sum_v == BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        sum_pv / sum_v
    }
}

proptest! {
    /// The engine's incrementally-maintained VWAP matches a from-scratch
    /// recomputation over exactly the trades currently in the window, for
    /// any window size and any sequence of non-negative price/size pairs.
    #[test]
    fn incremental_vwap_matches_naive_recomputation(
        window_size in 1u16..8,
        trades in proptest::collection::vec((0i64..50, 0i64..50), 1..40),
    ) {
        let e = engine(window_size);
        let pool = SlotPool::new();

        for (k, &(price, size)) in trades.iter().enumerate() {
            let result = e.ingest(BigDecimal::from(price), BigDecimal::from(size), &pool);
            let expected = naive_vwap(&trades, k, window_size as usize);
            // Naive recomputation divides without the engine's fixed
            // rounding scale; compare at a coarser, shared precision.
            let lhs = result.vwap.with_scale(10);
            let rhs = expected.with_scale(10);
            prop_assert_eq!(lhs, rhs, "mismatch at trade {}", k);
        }
    }

    /// Two independent engines fed disjoint trade histories never affect
    /// each other's output, regardless of how their ingests interleave in
    /// wall-clock time (spec invariant: per-pair independence).
    #[test]
    fn independent_pairs_never_cross_contaminate(
        window_size in 1u16..6,
        a_trades in proptest::collection::vec((1i64..20, 1i64..20), 1..15),
        b_trades in proptest::collection::vec((1i64..20, 1i64..20), 1..15),
    ) {
        let pool = SlotPool::new();
        let a = vwap_engine::vwap::engine::PairEngine::new(PairId::from("A"), window_size);
        let b = vwap_engine::vwap::engine::PairEngine::new(PairId::from("B"), window_size);

        let mut a_out = Vec::new();
        let mut b_out = Vec::new();
        let longest = a_trades.len().max(b_trades.len());
        for i in 0..longest {
            if let Some(&(p, v)) = a_trades.get(i) {
                a_out.push(a.ingest(BigDecimal::from(p), BigDecimal::from(v), &pool).vwap.with_scale(10));
            }
            if let Some(&(p, v)) = b_trades.get(i) {
                b_out.push(b.ingest(BigDecimal::from(p), BigDecimal::from(v), &pool).vwap.with_scale(10));
            }
        }

        let expected_a: Vec<BigDecimal> = (0..a_trades.len())
            .map(|k| naive_vwap(&a_trades, k, window_size as usize).with_scale(10))
            .collect();
        let expected_b: Vec<BigDecimal> = (0..b_trades.len())
            .map(|k| naive_vwap(&b_trades, k, window_size as usize).with_scale(10))
            .collect();

        prop_assert_eq!(a_out, expected_a);
        prop_assert_eq!(b_out, expected_b);
    }

    /// The ring buffer's length never exceeds its configured size, and
    /// always equals `min(number of pushes so far, size)` once pops only
    /// ever happen to make room for a push (the pair engine's usage
    /// pattern).
    #[test]
    fn window_length_never_exceeds_capacity(
        size in 1usize..16,
        pushes in 0usize..64,
    ) {
        let mut w = Window::new(size);
        let mut pushed = 0usize;
        for i in 0..pushes {
            if w.is_full() {
                w.pop();
            }
            if w.push(vwap_engine::vwap::types::Slot {
                pv: BigDecimal::from(i as i64),
                v: BigDecimal::from(1),
            }) {
                pushed += 1;
            }
            prop_assert!(w.len() <= size);
            prop_assert_eq!(w.len(), pushed.min(size));
        }
    }
}

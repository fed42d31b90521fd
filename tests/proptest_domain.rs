//! Property-Based Tests — Sizing Invariants
//!
//! Uses `proptest` to verify that the Kelly engine and the portfolio
//! allocator hold their invariants across random inputs.

use proptest::prelude::*;

use axiom::domain::kelly::{KellyResult, compute_kelly, half_kelly, quarter_kelly};
use axiom::domain::portfolio::{MarketInput, allocate_portfolio};

// ── Kelly Engine Properties ─────────────────────────────────

proptest! {
    /// The fraction is always a valid share of bankroll.
    #[test]
    fn kelly_fraction_in_unit_interval(
        p in 0.0f64..=1.0,
        c in 0.0f64..1.0,
        bankroll in 1.0f64..1e6,
    ) {
        let r = compute_kelly(p, c, bankroll);
        prop_assert!(r.optimal_fraction >= 0.0, "fraction {} < 0", r.optimal_fraction);
        prop_assert!(r.optimal_fraction <= 1.0, "fraction {} > 1", r.optimal_fraction);
        prop_assert!(r.optimal_bet_size <= bankroll);
    }

    /// No stake when the user does not beat the market.
    #[test]
    fn no_edge_when_user_at_or_below_market(
        c in 0.0f64..=1.0,
        gap in 0.0f64..=1.0,
        bankroll in 1.0f64..1e6,
    ) {
        let p = c * (1.0 - gap);
        let r = compute_kelly(p, c, bankroll);
        prop_assert!(!r.has_edge);
        prop_assert_eq!(r.optimal_bet_size, 0.0);
        prop_assert_eq!(r.optimal_fraction, 0.0);
    }

    /// has_edge == false always implies a zero stake.
    #[test]
    fn no_edge_implies_zero_stake(
        p in -0.5f64..1.5,
        c in -0.5f64..1.5,
        bankroll in -100.0f64..1e4,
    ) {
        let r = compute_kelly(p, c, bankroll);
        if !r.has_edge {
            prop_assert_eq!(r.optimal_fraction, 0.0);
            prop_assert_eq!(r.optimal_bet_size, 0.0);
        }
    }

    /// Non-positive bankrolls never produce a stake.
    #[test]
    fn non_positive_bankroll_is_no_edge(
        p in 0.0f64..=1.0,
        c in 0.0f64..=1.0,
        bankroll in -1e6f64..=0.0,
    ) {
        prop_assert_eq!(compute_kelly(p, c, bankroll), KellyResult::no_edge());
    }

    /// A market price of exactly 1 never produces a stake.
    #[test]
    fn price_one_is_degenerate(p in 0.0f64..=1.0) {
        let r = compute_kelly(p, 1.0, 1000.0);
        prop_assert_eq!(r.optimal_fraction, 0.0);
        prop_assert_eq!(r.optimal_bet_size, 0.0);
    }

    /// Bet size is fraction times bankroll.
    #[test]
    fn bet_size_is_fraction_times_bankroll(
        p in 0.0f64..=1.0,
        c in 0.0f64..1.0,
        bankroll in 1.0f64..1e6,
    ) {
        let r = compute_kelly(p, c, bankroll);
        prop_assert_eq!(r.optimal_bet_size, r.optimal_fraction * bankroll);
    }

    /// Half and quarter Kelly divide the stake exactly.
    #[test]
    fn conservative_variants_divide_exactly(
        c in 0.01f64..0.95,
        lift in 0.01f64..0.5,
        bankroll in 1.0f64..1e6,
    ) {
        let p = (c + lift).min(1.0);
        let full = compute_kelly(p, c, bankroll);
        prop_assume!(full.has_edge);

        let half = half_kelly(p, c, bankroll);
        let quarter = quarter_kelly(p, c, bankroll);
        prop_assert_eq!(half.optimal_fraction, full.optimal_fraction / 2.0);
        prop_assert_eq!(quarter.optimal_fraction, full.optimal_fraction / 4.0);
        prop_assert_eq!(half.optimal_bet_size, full.optimal_bet_size / 2.0);
        prop_assert_eq!(half.edge, full.edge);
        prop_assert_eq!(quarter.expected_value, full.expected_value);
    }

    /// Identical inputs give bit-identical results.
    #[test]
    fn kelly_is_deterministic(
        p in 0.0f64..=1.0,
        c in 0.0f64..=1.0,
        bankroll in 0.0f64..1e6,
    ) {
        let a = compute_kelly(p, c, bankroll);
        let b = compute_kelly(p, c, bankroll);
        prop_assert_eq!(a.optimal_fraction.to_bits(), b.optimal_fraction.to_bits());
        prop_assert_eq!(a.optimal_bet_size.to_bits(), b.optimal_bet_size.to_bits());
        prop_assert_eq!(a.expected_value.to_bits(), b.expected_value.to_bits());
        prop_assert_eq!(a.edge.to_bits(), b.edge.to_bits());
        prop_assert_eq!(a.recommendation, b.recommendation);
    }
}

// ── Portfolio Allocator Properties ──────────────────────────

proptest! {
    /// Over the cap, fractions sum to exactly 1 with the ratio preserved.
    #[test]
    fn portfolio_scales_to_exactly_one(
        c1 in 0.0f64..0.9,
        f1 in 0.5f64..=1.0,
        c2 in 0.0f64..0.9,
        f2 in 0.55f64..=1.0,
        bankroll in 1.0f64..1e6,
    ) {
        // p = C + f(1 - C) has a raw Kelly fraction of f.
        let p1 = (c1 + f1 * (1.0 - c1)).min(1.0);
        let p2 = (c2 + f2 * (1.0 - c2)).min(1.0);

        let k1 = compute_kelly(p1, c1, bankroll);
        let k2 = compute_kelly(p2, c2, bankroll);
        prop_assume!(k1.optimal_fraction + k2.optimal_fraction > 1.0);

        let r = allocate_portfolio(MarketInput::new(p1, c1), MarketInput::new(p2, c2), bankroll);
        prop_assert!(r.is_scaled());
        prop_assert_eq!(r.market1.optimal_fraction + r.market2.optimal_fraction, 1.0);

        let raw_share = k1.optimal_fraction / (k1.optimal_fraction + k2.optimal_fraction);
        prop_assert!((r.market1.optimal_fraction - raw_share).abs() < 1e-12);
        prop_assert!((r.total_allocation - bankroll).abs() <= bankroll * 1e-12);
    }

    /// Under the cap, each side equals a direct Kelly call.
    #[test]
    fn portfolio_unchanged_below_cap(
        p1 in 0.0f64..=1.0,
        c1 in 0.0f64..1.0,
        p2 in 0.0f64..=1.0,
        c2 in 0.0f64..1.0,
        bankroll in 1.0f64..1e6,
    ) {
        let k1 = compute_kelly(p1, c1, bankroll);
        let k2 = compute_kelly(p2, c2, bankroll);
        prop_assume!(k1.optimal_fraction + k2.optimal_fraction <= 1.0);

        let r = allocate_portfolio(MarketInput::new(p1, c1), MarketInput::new(p2, c2), bankroll);
        prop_assert!(!r.is_scaled());
        prop_assert_eq!(r.market1, k1);
        prop_assert_eq!(r.market2, k2);
        prop_assert_eq!(r.total_allocation, k1.optimal_bet_size + k2.optimal_bet_size);
    }
}

//! Two-market portfolio allocation under a shared bankroll.
//!
//! Each market is sized independently with full Kelly. The two markets are
//! assumed uncorrelated (no covariance term). When the combined fractions
//! would stake more than the whole bankroll, both are scaled down by a
//! common factor so the joint stake is exactly 100%.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::format::format_percent;
use super::kelly::{KellyResult, compute_kelly};

/// One side of a portfolio: the bettor's belief and the market's price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketInput {
    /// Subjective probability of YES (0.0 – 1.0).
    pub user_probability: f64,
    /// YES price / implied probability (0.0 – 1.0).
    pub market_price: f64,
}

impl MarketInput {
    pub const fn new(user_probability: f64, market_price: f64) -> Self {
        Self {
            user_probability,
            market_price,
        }
    }
}

/// Joint advice for a two-market allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortfolioRecommendation {
    /// Combined Kelly exceeded the bankroll and both stakes were scaled.
    ScaledToBankroll { scale_factor: f64 },
    /// Both markets have edge and fit within the bankroll as-is.
    DualEdge { first_fraction: f64, second_fraction: f64 },
    /// Only the first market has edge.
    FirstOnly,
    /// Only the second market has edge.
    SecondOnly,
    /// Neither market has edge.
    NoEdge,
}

impl PortfolioRecommendation {
    /// Renders the advice using the given market labels.
    pub fn describe(&self, first: &str, second: &str) -> String {
        match self {
            Self::ScaledToBankroll { .. } => {
                "STRONG PORTFOLIO: Both bets have edge! Scaled to 100% allocation for safety."
                    .to_string()
            }
            Self::DualEdge {
                first_fraction,
                second_fraction,
            } => format!(
                "DUAL EDGE: Allocate {} to {first} and {} to {second}.",
                format_percent(*first_fraction, 1),
                format_percent(*second_fraction, 1),
            ),
            Self::FirstOnly => {
                format!("{first} ONLY: Only {first} shows positive edge. Skip {second}.")
            }
            Self::SecondOnly => {
                format!("{second} ONLY: Only {second} shows positive edge. Skip {first}.")
            }
            Self::NoEdge => {
                "NO EDGE: Neither market shows positive edge. Do not bet.".to_string()
            }
        }
    }
}

impl fmt::Display for PortfolioRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe("market 1", "market 2"))
    }
}

/// Output of a two-market allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioResult {
    /// Sizing for the first market (post-scaling).
    pub market1: KellyResult,
    /// Sizing for the second market (post-scaling).
    pub market2: KellyResult,
    /// Sum of both bet sizes.
    pub total_allocation: f64,
    /// Joint advice.
    pub recommendation: PortfolioRecommendation,
}

impl PortfolioResult {
    /// Combined fraction of bankroll staked.
    pub fn total_fraction(&self) -> f64 {
        self.market1.optimal_fraction + self.market2.optimal_fraction
    }

    /// Recommendation text with named markets.
    pub fn describe(&self, first: &str, second: &str) -> String {
        self.recommendation.describe(first, second)
    }

    /// Whether the joint stake was scaled to fit the bankroll.
    pub const fn is_scaled(&self) -> bool {
        matches!(
            self.recommendation,
            PortfolioRecommendation::ScaledToBankroll { .. }
        )
    }
}

/// Sizes two independent markets against one bankroll.
pub fn allocate_portfolio(
    market1: MarketInput,
    market2: MarketInput,
    bankroll: f64,
) -> PortfolioResult {
    let kelly1 = compute_kelly(market1.user_probability, market1.market_price, bankroll);
    let kelly2 = compute_kelly(market2.user_probability, market2.market_price, bankroll);

    let total_fraction = kelly1.optimal_fraction + kelly2.optimal_fraction;

    let (market1, market2, recommendation) = if total_fraction > 1.0 {
        let scale_factor = 1.0 / total_fraction;
        let first_fraction = kelly1.optimal_fraction * scale_factor;
        // Pinned so the two fractions sum to exactly 1.
        let second_fraction = 1.0 - first_fraction;

        (
            kelly1.with_stake(first_fraction, first_fraction * bankroll),
            kelly2.with_stake(second_fraction, second_fraction * bankroll),
            PortfolioRecommendation::ScaledToBankroll { scale_factor },
        )
    } else {
        let recommendation = match (kelly1.has_edge, kelly2.has_edge) {
            (true, true) => PortfolioRecommendation::DualEdge {
                first_fraction: kelly1.optimal_fraction,
                second_fraction: kelly2.optimal_fraction,
            },
            (true, false) => PortfolioRecommendation::FirstOnly,
            (false, true) => PortfolioRecommendation::SecondOnly,
            (false, false) => PortfolioRecommendation::NoEdge,
        };
        (kelly1, kelly2, recommendation)
    };

    PortfolioResult {
        total_allocation: market1.optimal_bet_size + market2.optimal_bet_size,
        market1,
        market2,
        recommendation,
    }
}

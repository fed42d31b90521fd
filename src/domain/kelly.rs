//! Kelly Criterion position sizing for binary contracts.
//!
//! For a contract priced at `C` that pays 1 on YES, a bettor who believes
//! the true probability is `p` should stake
//!
//!   f* = (p - C) / (1 - C)
//!
//! of their bankroll. The engine never fails: out-of-range or degenerate
//! inputs collapse to a "no edge" result so interactive callers always
//! have something to display.
//!
//! Conservative variants (half / quarter Kelly) are derived from the full
//! result by `KellyResult::scaled`.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Text shown whenever no stake is recommended.
pub const NO_EDGE_MESSAGE: &str = "No edge detected. Do not bet.";

/// Which multiple of the full Kelly stake to recommend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KellySizing {
    /// Full Kelly (maximum long-run growth, highest variance).
    #[default]
    Full,
    /// Half the full Kelly stake.
    Half,
    /// A quarter of the full Kelly stake.
    Quarter,
}

impl KellySizing {
    /// Divisor applied to the full-Kelly fraction and bet size.
    pub const fn divisor(self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Half => 2.0,
            Self::Quarter => 4.0,
        }
    }

    const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Full => None,
            Self::Half => Some("Half-Kelly (Conservative): "),
            Self::Quarter => Some("Quarter-Kelly (Very Conservative): "),
        }
    }
}

impl fmt::Display for KellySizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Half => write!(f, "half"),
            Self::Quarter => write!(f, "quarter"),
        }
    }
}

impl FromStr for KellySizing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "1" => Ok(Self::Full),
            "half" | "0.5" => Ok(Self::Half),
            "quarter" | "0.25" => Ok(Self::Quarter),
            other => Err(format!(
                "unknown Kelly sizing '{other}' (expected full, half or quarter)"
            )),
        }
    }
}

/// Qualitative strength of an edge, bucketed on the Kelly fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTier {
    /// Fraction >= 0.50.
    Strong,
    /// Fraction >= 0.25.
    Good,
    /// Fraction >= 0.10.
    Small,
    /// Fraction > 0.
    Tiny,
    /// Nothing to stake.
    NoEdge,
}

impl EdgeTier {
    /// Buckets a (full) Kelly fraction.
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction >= 0.5 {
            Self::Strong
        } else if fraction >= 0.25 {
            Self::Good
        } else if fraction >= 0.10 {
            Self::Small
        } else if fraction > 0.0 {
            Self::Tiny
        } else {
            Self::NoEdge
        }
    }
}

/// Human-facing advice attached to a `KellyResult`.
///
/// Kept structured so callers can branch on the tier; `Display` renders
/// the message shown to users. Serialized output carries the rendered
/// `message` next to the structured fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    /// Edge bucket derived from the full Kelly fraction.
    pub tier: EdgeTier,
    /// Raw edge (p - C) quoted in the message.
    pub edge: f64,
    /// Sizing variant the result was scaled to.
    pub sizing: KellySizing,
}

impl Recommendation {
    /// The "do not bet" recommendation.
    pub const fn no_edge() -> Self {
        Self {
            tier: EdgeTier::NoEdge,
            edge: 0.0,
            sizing: KellySizing::Full,
        }
    }

    fn for_fraction(kelly_fraction: f64, edge: f64) -> Self {
        Self {
            tier: EdgeTier::from_fraction(kelly_fraction),
            edge,
            sizing: KellySizing::Full,
        }
    }

    /// Rendered advice text.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Recommendation", 4)?;
        state.serialize_field("tier", &self.tier)?;
        state.serialize_field("edge", &self.edge)?;
        state.serialize_field("sizing", &self.sizing)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tier == EdgeTier::NoEdge {
            return f.write_str(NO_EDGE_MESSAGE);
        }

        if let Some(prefix) = self.sizing.prefix() {
            f.write_str(prefix)?;
        }

        let edge_pct = self.edge * 100.0;
        match self.tier {
            EdgeTier::Strong => write!(
                f,
                "STRONG EDGE ({edge_pct:+.1}%): Large position recommended. \
                 Consider half-Kelly for safety."
            ),
            EdgeTier::Good => write!(
                f,
                "GOOD EDGE ({edge_pct:+.1}%): Moderate position recommended."
            ),
            EdgeTier::Small => write!(
                f,
                "SMALL EDGE ({edge_pct:+.1}%): Small position recommended."
            ),
            EdgeTier::Tiny => write!(
                f,
                "TINY EDGE ({edge_pct:+.1}%): Very small position. Consider skipping."
            ),
            EdgeTier::NoEdge => f.write_str(NO_EDGE_MESSAGE),
        }
    }
}

/// Output of a Kelly sizing calculation.
///
/// Invariant: `has_edge == false` implies a zero fraction and bet size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KellyResult {
    /// Fraction of bankroll to stake, in [0, 1].
    pub optimal_fraction: f64,
    /// `optimal_fraction * bankroll`.
    pub optimal_bet_size: f64,
    /// Expected profit per unit staked.
    pub expected_value: f64,
    /// Whether a positive stake is recommended.
    pub has_edge: bool,
    /// Raw edge (p - C). Signed when the edge is non-positive.
    pub edge: f64,
    /// Qualitative advice.
    pub recommendation: Recommendation,
}

impl KellyResult {
    /// Canonical no-edge result used for invalid or degenerate inputs.
    ///
    /// Edge and expected value are both zeroed.
    pub const fn no_edge() -> Self {
        Self {
            optimal_fraction: 0.0,
            optimal_bet_size: 0.0,
            expected_value: 0.0,
            has_edge: false,
            edge: 0.0,
            recommendation: Recommendation::no_edge(),
        }
    }

    /// No-edge result that keeps the signed edge (user at or below market).
    const fn non_positive_edge(edge: f64) -> Self {
        Self {
            optimal_fraction: 0.0,
            optimal_bet_size: 0.0,
            expected_value: edge,
            has_edge: false,
            edge,
            recommendation: Recommendation::no_edge(),
        }
    }

    /// Copies this result scaled down to a conservative variant.
    ///
    /// Only the fraction, bet size and recommendation change; edge,
    /// expected value and `has_edge` are carried over unchanged.
    #[must_use]
    pub fn scaled(&self, sizing: KellySizing) -> Self {
        let divisor = sizing.divisor();
        Self {
            optimal_fraction: self.optimal_fraction / divisor,
            optimal_bet_size: self.optimal_bet_size / divisor,
            recommendation: Recommendation {
                sizing,
                ..self.recommendation
            },
            ..*self
        }
    }

    /// Copies this result with a different stake, everything else kept.
    #[must_use]
    pub const fn with_stake(&self, optimal_fraction: f64, optimal_bet_size: f64) -> Self {
        Self {
            optimal_fraction,
            optimal_bet_size,
            ..*self
        }
    }
}

impl Default for KellyResult {
    fn default() -> Self {
        Self::no_edge()
    }
}

fn is_valid_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn is_valid_bankroll(bankroll: f64) -> bool {
    bankroll.is_finite() && bankroll > 0.0
}

/// Computes the full-Kelly stake for a binary contract.
///
/// * `user_probability` - your estimate that YES resolves (0.0 – 1.0)
/// * `market_price` - YES price, read as implied probability (0.0 – 1.0)
/// * `bankroll` - capital available for this decision
pub fn compute_kelly(user_probability: f64, market_price: f64, bankroll: f64) -> KellyResult {
    if !is_valid_probability(user_probability) || !is_valid_probability(market_price) {
        return KellyResult::no_edge();
    }

    if !is_valid_bankroll(bankroll) {
        return KellyResult::no_edge();
    }

    let edge = user_probability - market_price;
    if edge <= 0.0 {
        return KellyResult::non_positive_edge(edge);
    }

    let denominator = 1.0 - market_price;
    if denominator <= 0.0 {
        return KellyResult::no_edge();
    }

    let kelly_fraction = (edge / denominator).min(1.0);
    if kelly_fraction < 0.0 {
        return KellyResult::no_edge();
    }

    // Binary payout odds: a winning unit returns 1/C - 1 profit.
    let win_multiplier = 1.0 / market_price - 1.0;
    let expected_value = user_probability * win_multiplier - (1.0 - user_probability);

    KellyResult {
        optimal_fraction: kelly_fraction,
        optimal_bet_size: kelly_fraction * bankroll,
        expected_value,
        has_edge: true,
        edge,
        recommendation: Recommendation::for_fraction(kelly_fraction, edge),
    }
}

/// Half-Kelly: half the full stake.
pub fn half_kelly(user_probability: f64, market_price: f64, bankroll: f64) -> KellyResult {
    compute_kelly(user_probability, market_price, bankroll).scaled(KellySizing::Half)
}

/// Quarter-Kelly: a quarter of the full stake.
pub fn quarter_kelly(user_probability: f64, market_price: f64, bankroll: f64) -> KellyResult {
    compute_kelly(user_probability, market_price, bankroll).scaled(KellySizing::Quarter)
}

/// Computes the stake for the requested sizing variant.
pub fn compute_sized(
    user_probability: f64,
    market_price: f64,
    bankroll: f64,
    sizing: KellySizing,
) -> KellyResult {
    let full = compute_kelly(user_probability, market_price, bankroll);
    match sizing {
        KellySizing::Full => full,
        scaled => full.scaled(scaled),
    }
}

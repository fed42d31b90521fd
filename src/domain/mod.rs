//! Domain layer - Position sizing and market models.
//!
//! Pure logic only: no I/O, no clocks, no global state. Every function
//! here is deterministic in its arguments, which is what lets the sizing
//! engine be re-run on every keystroke without coordination.

pub mod format;
pub mod kelly;
pub mod market;
pub mod portfolio;

// Re-export core types for convenience
pub use format::{decimal_to_percent, format_currency, format_percent, percent_to_decimal};
pub use kelly::{
    EdgeTier, KellyResult, KellySizing, Recommendation, compute_kelly, compute_sized, half_kelly,
    quarter_kelly,
};
pub use market::{InvalidPrice, MarketQuote, QuoteSource, format_market_price};
pub use portfolio::{MarketInput, PortfolioRecommendation, PortfolioResult, allocate_portfolio};

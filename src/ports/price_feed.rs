//! Price Feed Port - Market Quote Interface
//!
//! Defines the trait the calculator uses to obtain the current YES price
//! of a market. Implementations may read a live order book, synthesise a
//! price, or serve a configured fallback; the sizing engine treats every
//! quote identically.

use chrono::{DateTime, Utc};

use crate::domain::market::{InvalidPrice, MarketQuote};

/// Errors surfaced by price feed implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
  /// No market is configured under this key.
  #[error("unknown market key: {0}")]
  UnknownMarket(String),

  /// The source returned something that is not a probability.
  #[error(transparent)]
  InvalidPrice(#[from] InvalidPrice),

  /// The source could not produce a quote right now.
  #[error("price source unavailable for {market}: {reason}")]
  Unavailable { market: String, reason: String },
}

/// Trait for market price providers.
///
/// `now` is supplied by the caller so quotes are stamped with an
/// injectable clock and tests stay deterministic.
pub trait PriceFeed {
  /// Get the current quote for the market registered under `market_key`.
  fn quote(&self, market_key: &str, now: DateTime<Utc>) -> Result<MarketQuote, FeedError>;

  /// Market keys this feed can quote.
  fn market_keys(&self) -> Vec<String>;
}

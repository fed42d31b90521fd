//! Calculator - Quote Resolution and Position Sizing
//!
//! Ties the domain sizing engine to a price feed:
//! - Resolves market quotes through the expiring quote cache
//! - Converts user percentages (0 – 100) into probabilities
//! - Runs single-market Kelly or the two-market allocator
//! - Logs each recommendation and warns on stale quotes

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::adapters::feeds::QuoteCache;
use crate::config::CalculatorConfig;
use crate::domain::format::percent_to_decimal;
use crate::domain::kelly::{KellyResult, KellySizing, compute_sized};
use crate::domain::market::{MarketQuote, QuoteSource};
use crate::domain::portfolio::{MarketInput, PortfolioResult, allocate_portfolio};
use crate::ports::price_feed::PriceFeed;

/// A request to size a single market.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRequest {
  /// Market key understood by the feed.
  pub market_key: String,
  /// Subjective probability of YES, in percent.
  pub user_percent: f64,
  /// Bankroll; the configured default when `None`.
  pub bankroll: Option<f64>,
  /// Kelly variant; the configured default when `None`.
  pub sizing: Option<KellySizing>,
  /// Use this price instead of asking the feed.
  pub price_override: Option<f64>,
}

impl PositionRequest {
  pub fn new(market_key: impl Into<String>, user_percent: f64) -> Self {
    Self {
      market_key: market_key.into(),
      user_percent,
      bankroll: None,
      sizing: None,
      price_override: None,
    }
  }
}

/// One side of a portfolio request: `KEY=PERCENT`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegRequest {
  pub market_key: String,
  pub user_percent: f64,
}

impl FromStr for LegRequest {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (key, pct) = s
      .split_once('=')
      .ok_or_else(|| format!("expected KEY=PERCENT, got '{s}'"))?;

    let key = key.trim();
    if key.is_empty() {
      return Err(format!("missing market key in '{s}'"));
    }

    let user_percent = pct
      .trim()
      .parse::<f64>()
      .map_err(|e| format!("invalid percent in '{s}': {e}"))?;

    Ok(Self {
      market_key: key.to_string(),
      user_percent,
    })
  }
}

/// A quoted market together with the probability the user assigned it.
#[derive(Debug, Clone, Serialize)]
pub struct QuotedLeg {
  pub market_key: String,
  pub quote: MarketQuote,
  pub user_probability: f64,
  pub stale: bool,
}

/// Outcome of sizing a single market.
#[derive(Debug, Clone, Serialize)]
pub struct Sizing {
  pub leg: QuotedLeg,
  pub bankroll: f64,
  pub sizing: KellySizing,
  pub result: KellyResult,
}

/// Outcome of a two-market allocation.
#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
  pub first: QuotedLeg,
  pub second: QuotedLeg,
  pub bankroll: f64,
  pub result: PortfolioResult,
  /// Recommendation text naming both markets.
  pub message: String,
}

/// Position-sizing calculator over a price feed.
pub struct Calculator<F: PriceFeed> {
  /// Quote source with expiry.
  quotes: QuoteCache<F>,
  /// Bankroll used when a request has none.
  default_bankroll: f64,
  /// Kelly variant used when a request has none.
  default_sizing: KellySizing,
  /// Quotes older than this are flagged.
  stale_after: Duration,
}

impl<F: PriceFeed> Calculator<F> {
  /// Create a calculator from config.
  pub fn new(feed: F, config: &CalculatorConfig) -> Self {
    Self {
      quotes: QuoteCache::new(feed, seconds(config.cache_ttl_seconds)),
      default_bankroll: config.default_bankroll,
      default_sizing: config.sizing,
      stale_after: seconds(config.stale_after_seconds),
    }
  }

  /// Size a single market.
  ///
  /// Feed failures propagate; invalid user inputs do not (the engine
  /// turns them into a no-edge result).
  #[instrument(skip(self, request), fields(market = %request.market_key))]
  pub fn size_position(&mut self, request: &PositionRequest, now: DateTime<Utc>) -> Result<Sizing> {
    let bankroll = request.bankroll.unwrap_or(self.default_bankroll);
    let sizing = request.sizing.unwrap_or(self.default_sizing);

    let leg = match request.price_override {
      Some(price) => self.manual_leg(&request.market_key, request.user_percent, price, now)?,
      None => self.quoted_leg(&request.market_key, request.user_percent, now)?,
    };

    let result = compute_sized(leg.user_probability, leg.quote.price, bankroll, sizing);

    info!(
      price = leg.quote.price,
      source = %leg.quote.source,
      user_probability = leg.user_probability,
      bankroll,
      sizing = %sizing,
      fraction = result.optimal_fraction,
      bet = result.optimal_bet_size,
      edge = result.edge,
      has_edge = result.has_edge,
      "Position sized"
    );

    Ok(Sizing {
      leg,
      bankroll,
      sizing,
      result,
    })
  }

  /// Allocate one bankroll across two markets.
  #[instrument(
    skip(self, first, second),
    fields(first_market = %first.market_key, second_market = %second.market_key)
  )]
  pub fn allocate(
    &mut self,
    first: &LegRequest,
    second: &LegRequest,
    bankroll: Option<f64>,
    now: DateTime<Utc>,
  ) -> Result<Allocation> {
    let bankroll = bankroll.unwrap_or(self.default_bankroll);

    let first = self.quoted_leg(&first.market_key, first.user_percent, now)?;
    let second = self.quoted_leg(&second.market_key, second.user_percent, now)?;

    let result = allocate_portfolio(
      MarketInput::new(first.user_probability, first.quote.price),
      MarketInput::new(second.user_probability, second.quote.price),
      bankroll,
    );

    if result.is_scaled() {
      warn!(
        total_fraction = result.total_fraction(),
        "Combined Kelly exceeded bankroll, stakes scaled down"
      );
    }

    info!(
      bankroll,
      first_bet = result.market1.optimal_bet_size,
      second_bet = result.market2.optimal_bet_size,
      total = result.total_allocation,
      "Portfolio allocated"
    );

    let message = result.describe(&first.quote.market, &second.quote.market);

    Ok(Allocation {
      first,
      second,
      bankroll,
      result,
      message,
    })
  }

  /// Market keys the underlying feed can quote.
  pub fn market_keys(&self) -> Vec<String> {
    self.quotes.feed().market_keys()
  }

  /// Quote a market through the cache.
  pub fn quote(&mut self, market_key: &str, now: DateTime<Utc>) -> Result<MarketQuote> {
    self
      .quotes
      .quote_at(market_key, now)
      .with_context(|| format!("Failed to quote market {market_key}"))
  }

  fn quoted_leg(&mut self, market_key: &str, user_percent: f64, now: DateTime<Utc>) -> Result<QuotedLeg> {
    let quote = self.quote(market_key, now)?;
    Ok(self.leg(market_key, user_percent, quote, now))
  }

  fn manual_leg(
    &self,
    market_key: &str,
    user_percent: f64,
    price: f64,
    now: DateTime<Utc>,
  ) -> Result<QuotedLeg> {
    let quote = MarketQuote::new(market_key, price, QuoteSource::Manual, now)
      .context("Manual price override rejected")?;
    Ok(self.leg(market_key, user_percent, quote, now))
  }

  fn leg(&self, market_key: &str, user_percent: f64, quote: MarketQuote, now: DateTime<Utc>) -> QuotedLeg {
    let stale = quote.is_stale(now, self.stale_after);
    if stale {
      warn!(
        market = %market_key,
        age_secs = quote.age(now).num_seconds(),
        "Quote is stale"
      );
    }

    QuotedLeg {
      market_key: market_key.to_string(),
      quote,
      user_probability: percent_to_decimal(user_percent),
      stale,
    }
  }
}

fn seconds(secs: u64) -> Duration {
  i64::try_from(secs)
    .ok()
    .and_then(Duration::try_seconds)
    .unwrap_or(Duration::MAX)
}

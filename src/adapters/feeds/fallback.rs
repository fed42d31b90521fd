//! Fallback Feed - Configured Static Prices
//!
//! Serves the `fallback_price` of each configured market as a
//! `QuoteSource::Fallback` quote. Used when no live source is wired in,
//! and as the reference price for markets that cannot be fetched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::market::{MarketQuote, QuoteSource};
use crate::ports::price_feed::{FeedError, PriceFeed};

#[derive(Debug, Clone)]
struct FallbackMarket {
    name: String,
    price: f64,
}

/// `PriceFeed` backed by a fixed table of fallback prices.
///
/// Keys are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FallbackFeed {
    markets: BTreeMap<String, FallbackMarket>,
}

impl FallbackFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a feed from the active markets in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        config
            .active_markets()
            .fold(Self::new(), |feed, m| {
                feed.with_market(&m.key, &m.name, m.fallback_price)
            })
    }

    /// Adds (or replaces) a market.
    #[must_use]
    pub fn with_market(mut self, key: &str, name: &str, price: f64) -> Self {
        self.markets.insert(
            key.to_ascii_uppercase(),
            FallbackMarket {
                name: name.to_string(),
                price,
            },
        );
        self
    }

    /// Number of markets this feed can quote.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

impl PriceFeed for FallbackFeed {
    fn quote(&self, market_key: &str, now: DateTime<Utc>) -> Result<MarketQuote, FeedError> {
        let market = self
            .markets
            .get(&market_key.to_ascii_uppercase())
            .ok_or_else(|| FeedError::UnknownMarket(market_key.to_string()))?;

        debug!(
            market = %market_key,
            price = market.price,
            "Serving fallback price"
        );

        MarketQuote::new(market.name.clone(), market.price, QuoteSource::Fallback, now)
            .map_err(FeedError::from)
    }

    fn market_keys(&self) -> Vec<String> {
        self.markets.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    #[test]
    fn test_quotes_configured_market() {
        let feed = FallbackFeed::new().with_market("BTC_100K", "Bitcoin > $100k", 0.65);
        let now = Utc::now();
        let q = feed.quote("btc_100k", now).unwrap();
        assert_eq!(q.price, 0.65);
        assert_eq!(q.source, QuoteSource::Fallback);
        assert_eq!(q.market, "Bitcoin > $100k");
        assert_eq!(q.fetched_at, now);
    }

    #[test]
    fn test_unknown_market() {
        let feed = FallbackFeed::new();
        let err = feed.quote("DOGE", Utc::now()).unwrap_err();
        assert_eq!(err, FeedError::UnknownMarket("DOGE".to_string()));
    }

    #[test]
    fn test_invalid_price_surfaces() {
        let feed = FallbackFeed::new().with_market("BAD", "Bad", 1.5);
        let err = feed.quote("BAD", Utc::now()).unwrap_err();
        assert!(matches!(err, FeedError::InvalidPrice(_)));
    }

    #[test]
    fn test_from_config_skips_inactive() {
        let config = parse_config(
            r#"
[app]
name = "axiom"

[[markets]]
key = "BTC_100K"
name = "Bitcoin > $100k"
fallback_price = 0.65

[[markets]]
key = "OLD"
name = "Retired"
fallback_price = 0.5
active = false
"#,
        )
        .unwrap();

        let feed = FallbackFeed::from_config(&config);
        assert_eq!(feed.market_keys(), vec!["BTC_100K".to_string()]);
    }
}

//! Quote Cache - Expiring Per-Market Quote Reuse
//!
//! Wraps any `PriceFeed` and reuses a quote for `ttl` after it was
//! fetched. The cache is an ordinary owned value: callers construct it,
//! inject the feed and the expiry policy, and pass the clock in on every
//! lookup. Nothing is process-global.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::domain::market::MarketQuote;
use crate::ports::price_feed::{FeedError, PriceFeed};

/// Default time a quote is reused before refetching.
pub const DEFAULT_TTL_SECS: i64 = 10;

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: MarketQuote,
    cached_at: DateTime<Utc>,
}

/// Expiring cache in front of a `PriceFeed`.
///
/// Failed lookups are never cached; the next call retries the feed.
#[derive(Debug)]
pub struct QuoteCache<F> {
    feed: F,
    ttl: Duration,
    entries: HashMap<String, CachedQuote>,
}

impl<F: PriceFeed> QuoteCache<F> {
    /// Creates a cache with the given expiry.
    pub fn new(feed: F, ttl: Duration) -> Self {
        Self {
            feed,
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Creates a cache with the default 10 s expiry.
    pub fn with_default_ttl(feed: F) -> Self {
        Self::new(feed, Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Returns the quote for `market_key`, refetching once the cached
    /// entry is at least `ttl` old.
    pub fn quote_at(&mut self, market_key: &str, now: DateTime<Utc>) -> Result<MarketQuote, FeedError> {
        let cache_key = market_key.to_ascii_uppercase();

        if let Some(entry) = self.entries.get(&cache_key) {
            if now - entry.cached_at < self.ttl {
                debug!(market = %market_key, "Quote cache hit");
                return Ok(entry.quote.clone());
            }
        }

        let quote = match self.feed.quote(market_key, now) {
            Ok(quote) => quote,
            Err(e) => {
                warn!(market = %market_key, error = %e, "Quote fetch failed");
                return Err(e);
            }
        };

        debug!(
            market = %market_key,
            price = quote.price,
            source = %quote.source,
            "Quote cache refreshed"
        );

        self.entries.insert(
            cache_key,
            CachedQuote {
                quote: quote.clone(),
                cached_at: now,
            },
        );

        Ok(quote)
    }

    /// Drops the cached quote for `market_key`. Returns whether one existed.
    pub fn invalidate(&mut self, market_key: &str) -> bool {
        self.entries.remove(&market_key.to_ascii_uppercase()).is_some()
    }

    /// Drops every cached quote.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The wrapped feed.
    pub const fn feed(&self) -> &F {
        &self.feed
    }
}

//! Market quotes consumed by the sizing engine.
//!
//! A quote is the YES price of a binary market read as an implied
//! probability, tagged with where it came from and when. The engine does
//! not care whether a price is live or a fallback; callers use the source
//! and age to decide what to show.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::format::decimal_to_percent;

/// A market reported a price that is not a probability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price '{raw}' for {market}")]
pub struct InvalidPrice {
    pub market: String,
    pub raw: String,
}

/// Provenance of a market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    /// Read from the market's order book.
    Live,
    /// Static fallback from configuration.
    Fallback,
    /// Entered by hand, bypassing any feed.
    Manual,
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Fallback => write!(f, "fallback"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Colour hint for a quote status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
}

/// Human-readable status of a quote's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteStatus {
    pub text: &'static str,
    pub color: StatusColor,
}

/// YES price of a binary market at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Display name, e.g. "Bitcoin > $100k".
    pub market: String,
    /// Price in [0, 1].
    pub price: f64,
    /// Where the price came from.
    pub source: QuoteSource,
    /// When the price was obtained.
    pub fetched_at: DateTime<Utc>,
}

impl MarketQuote {
    /// Builds a quote, rejecting prices outside [0, 1] (and NaN).
    pub fn new(
        market: impl Into<String>,
        price: f64,
        source: QuoteSource,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, InvalidPrice> {
        let market = market.into();
        if !(0.0..=1.0).contains(&price) {
            return Err(InvalidPrice {
                market,
                raw: price.to_string(),
            });
        }

        Ok(Self {
            market,
            price,
            source,
            fetched_at,
        })
    }

    /// Parses a textual price as reported by market APIs (e.g. `"0.65"`).
    pub fn parse(
        market: impl Into<String>,
        raw: &str,
        source: QuoteSource,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, InvalidPrice> {
        let market = market.into();
        match raw.trim().parse::<f64>() {
            Ok(price) => Self::new(market, price, source, fetched_at).map_err(|e| InvalidPrice {
                raw: raw.to_string(),
                ..e
            }),
            Err(_) => Err(InvalidPrice {
                market,
                raw: raw.to_string(),
            }),
        }
    }

    /// Price as a percentage (0 – 100).
    pub fn price_percent(&self) -> f64 {
        decimal_to_percent(self.price)
    }

    /// Age of the quote at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// True when the quote is older than `max_age`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) > max_age
    }

    pub const fn status(&self) -> QuoteStatus {
        match self.source {
            QuoteSource::Live => QuoteStatus {
                text: "Live from Polymarket",
                color: StatusColor::Green,
            },
            QuoteSource::Fallback => QuoteStatus {
                text: "Using Fallback Price",
                color: StatusColor::Yellow,
            },
            QuoteSource::Manual => QuoteStatus {
                text: "Manual Price",
                color: StatusColor::Yellow,
            },
        }
    }
}

/// Formats a quote's price as a percentage with one decimal, e.g. `65.0%`.
pub fn format_market_price(quote: &MarketQuote) -> String {
    format!("{:.1}%", quote.price_percent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_valid_price() {
        let q = MarketQuote::parse("BTC", " 0.65 ", QuoteSource::Live, t0()).unwrap();
        assert_eq!(q.price, 0.65);
        assert_eq!(format_market_price(&q), "65.0%");
    }

    #[test]
    fn test_parse_rejects_garbage_and_range() {
        for raw in ["abc", "", "1.01", "-0.2", "NaN"] {
            let err = MarketQuote::parse("BTC", raw, QuoteSource::Live, t0()).unwrap_err();
            assert_eq!(err.raw, raw, "raw={raw}");
        }
    }

    #[test]
    fn test_boundary_prices_accepted() {
        assert!(MarketQuote::new("x", 0.0, QuoteSource::Fallback, t0()).is_ok());
        assert!(MarketQuote::new("x", 1.0, QuoteSource::Fallback, t0()).is_ok());
    }

    #[test]
    fn test_staleness() {
        let q = MarketQuote::new("BTC", 0.5, QuoteSource::Live, t0()).unwrap();
        let max_age = Duration::seconds(60);
        assert!(!q.is_stale(t0() + Duration::seconds(60), max_age));
        assert!(q.is_stale(t0() + Duration::seconds(61), max_age));
        assert!(q.is_stale(t0() + Duration::seconds(11), Duration::seconds(10)));
    }

    #[test]
    fn test_status() {
        let live = MarketQuote::new("BTC", 0.5, QuoteSource::Live, t0()).unwrap();
        let fallback = MarketQuote::new("BTC", 0.5, QuoteSource::Fallback, t0()).unwrap();
        assert_eq!(live.status().color, StatusColor::Green);
        assert_eq!(fallback.status().color, StatusColor::Yellow);
    }
}

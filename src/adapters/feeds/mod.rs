//! Market Price Adapters
//!
//! - `FallbackFeed`: configured static prices
//! - `QuoteCache`: expiring cache in front of any `PriceFeed`

pub mod cache;
pub mod fallback;

pub use cache::QuoteCache;
pub use fallback::FallbackFeed;

//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `PriceFeed`: Current YES price of a binary market

pub mod price_feed;

pub use price_feed::{FeedError, PriceFeed};

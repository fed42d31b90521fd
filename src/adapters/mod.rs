//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports`.
//!
//! Adapter categories:
//! - `feeds`: Market price sources and quote caching

pub mod feeds;

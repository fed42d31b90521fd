//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces.
//!
//! Use cases:
//! - `Calculator`: Quote a market and size a position or a two-market portfolio

pub mod calculator;

pub use calculator::{Allocation, Calculator, LegRequest, PositionRequest, QuotedLeg, Sizing};

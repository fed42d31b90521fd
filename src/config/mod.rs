//! Configuration Module - TOML-based Calculator Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Market keys, display names and fallback prices are externalized
//! here - nothing market-specific is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::kelly::KellySizing;

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup and validated before any
/// calculation runs.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Application identity and logging.
  pub app: AppSection,
  /// Sizing defaults and quote cache policy.
  #[serde(default)]
  pub calculator: CalculatorConfig,
  /// Markets that can be quoted by key.
  pub markets: Vec<MarketConfig>,
}

impl AppConfig {
  /// Look up a market by key (case-insensitive).
  pub fn market(&self, key: &str) -> Option<&MarketConfig> {
    self.markets.iter().find(|m| m.key.eq_ignore_ascii_case(key))
  }

  /// Markets enabled for quoting.
  pub fn active_markets(&self) -> impl Iterator<Item = &MarketConfig> {
    self.markets.iter().filter(|m| m.active)
  }
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable application name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Calculator defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
  /// Bankroll used when none is given on the command line.
  #[serde(default = "default_bankroll")]
  pub default_bankroll: f64,
  /// Kelly variant used when none is requested.
  #[serde(default)]
  pub sizing: KellySizing,
  /// How long a fetched quote is reused (seconds).
  #[serde(default = "default_cache_ttl")]
  pub cache_ttl_seconds: u64,
  /// Age after which a quote is reported as stale (seconds).
  #[serde(default = "default_stale_after")]
  pub stale_after_seconds: u64,
}

impl Default for CalculatorConfig {
  fn default() -> Self {
    Self {
      default_bankroll: default_bankroll(),
      sizing: KellySizing::default(),
      cache_ttl_seconds: default_cache_ttl(),
      stale_after_seconds: default_stale_after(),
    }
  }
}

/// Individual market configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
  /// Lookup key used on the command line, e.g. `BTC_100K`.
  pub key: String,
  /// Display name, e.g. "Bitcoin > $100k".
  pub name: String,
  /// Market slug on the exchange, informational only.
  #[serde(default)]
  pub slug: Option<String>,
  /// YES price served when no live quote is available.
  pub fallback_price: f64,
  /// Whether this market can be quoted.
  #[serde(default = "default_true")]
  pub active: bool,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_bankroll() -> f64 {
  1000.0
}

fn default_cache_ttl() -> u64 {
  10
}

fn default_stale_after() -> u64 {
  60
}

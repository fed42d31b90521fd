//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty, unique market keys
/// - Fallback prices that are valid probabilities
/// - A positive default bankroll
/// - A positive cache TTL
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.markets.is_empty(),
    "At least one market must be configured"
  );

  let mut seen = HashSet::new();
  for (i, market) in config.markets.iter().enumerate() {
    anyhow::ensure!(
      !market.key.trim().is_empty(),
      "Market {} ({}) has empty key",
      i,
      market.name
    );
    anyhow::ensure!(
      seen.insert(market.key.to_ascii_uppercase()),
      "Duplicate market key: {}",
      market.key
    );
    anyhow::ensure!(
      (0.0..=1.0).contains(&market.fallback_price),
      "Market {} fallback_price must be in [0, 1], got {}",
      market.key,
      market.fallback_price
    );
  }

  let calc = &config.calculator;
  anyhow::ensure!(
    calc.default_bankroll.is_finite() && calc.default_bankroll > 0.0,
    "default_bankroll must be positive, got {}",
    calc.default_bankroll
  );
  anyhow::ensure!(
    calc.cache_ttl_seconds > 0,
    "cache_ttl_seconds must be positive"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::kelly::KellySizing;

  const VALID: &str = r#"
[app]
name = "axiom"

[calculator]
default_bankroll = 500.0
sizing = "half"

[[markets]]
key = "BTC_100K"
name = "Bitcoin > $100k"
fallback_price = 0.65
"#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("axiom-loader-{}.toml", std::process::id()));
    std::fs::write(&path, VALID).unwrap();

    let loaded = load_config(&path);
    std::fs::remove_file(&path).unwrap();

    let config = loaded.unwrap();
    assert_eq!(config.calculator.default_bankroll, 500.0);
    assert_eq!(config.markets.len(), 1);
    assert_eq!(config.markets[0].key, "BTC_100K");
  }

  #[test]
  fn test_parse_valid_config() {
    let config = parse_config(VALID).unwrap();
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.calculator.sizing, KellySizing::Half);
    assert_eq!(config.calculator.cache_ttl_seconds, 10);
    assert!(config.market("btc_100k").is_some());
    assert!(config.markets[0].active);
  }

  #[test]
  fn test_calculator_section_optional() {
    let toml = r#"
[app]
name = "axiom"

[[markets]]
key = "ETH_4K"
name = "Ethereum > $4k"
fallback_price = 0.55
"#;
    let config = parse_config(toml).unwrap();
    assert_eq!(config.calculator.default_bankroll, 1000.0);
    assert_eq!(config.calculator.sizing, KellySizing::Full);
  }

  #[test]
  fn test_rejects_out_of_range_fallback() {
    let toml = VALID.replace("0.65", "1.65");
    let err = parse_config(&toml).unwrap_err();
    assert!(format!("{err:#}").contains("fallback_price"));
  }

  #[test]
  fn test_rejects_duplicate_keys() {
    let toml = format!(
      "{VALID}\n[[markets]]\nkey = \"btc_100k\"\nname = \"dup\"\nfallback_price = 0.5\n"
    );
    let err = parse_config(&toml).unwrap_err();
    assert!(format!("{err:#}").contains("Duplicate market key"));
  }

  #[test]
  fn test_rejects_non_positive_bankroll() {
    let toml = VALID.replace("500.0", "0.0");
    assert!(parse_config(&toml).is_err());
  }
}

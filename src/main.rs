//! Axiom — Entry Point
//!
//! Command-line front end for the Kelly position-sizing engine.
//!
//! Wiring sequence:
//! 1. Parse CLI arguments
//! 2. Load config.toml + validate
//! 3. Init tracing (JSON structured logging on stderr)
//! 4. Build the fallback price feed from the configured markets
//! 5. Run the requested calculation and print the result on stdout

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use axiom::adapters::feeds::FallbackFeed;
use axiom::config::{self, AppConfig};
use axiom::domain::format::{format_currency, format_percent};
use axiom::domain::kelly::KellySizing;
use axiom::domain::market::format_market_price;
use axiom::usecases::{Allocation, Calculator, LegRequest, PositionRequest, QuotedLeg, Sizing};

#[derive(Parser)]
#[command(name = "axiom", version, about = "Kelly criterion sizing for binary prediction markets")]
struct Cli {
    /// Path to config file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Size a single market
    Kelly {
        /// Market key, e.g. BTC_100K
        #[arg(long)]
        market: String,

        /// Your probability that YES resolves, in percent (0-100)
        #[arg(long)]
        probability: f64,

        /// Bankroll (defaults to the configured value)
        #[arg(long)]
        bankroll: Option<f64>,

        /// Kelly variant: full, half or quarter
        #[arg(long)]
        sizing: Option<KellySizing>,

        /// Use this YES price (0-1) instead of the market's quote
        #[arg(long)]
        price: Option<f64>,
    },

    /// Allocate one bankroll across two markets
    Portfolio {
        /// First market as KEY=PERCENT
        #[arg(long)]
        first: LegRequest,

        /// Second market as KEY=PERCENT
        #[arg(long)]
        second: LegRequest,

        /// Bankroll (defaults to the configured value)
        #[arg(long)]
        bankroll: Option<f64>,
    },

    /// List configured markets
    Markets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&cli.config).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        markets = config.markets.len(),
        "Starting Axiom"
    );
    info!(
        path = %cli.config,
        bankroll = config.calculator.default_bankroll,
        sizing = %config.calculator.sizing,
        cache_ttl_secs = config.calculator.cache_ttl_seconds,
        "Configuration loaded successfully"
    );

    // ── 3. Wire the feed and calculator ─────────────────────
    let feed = FallbackFeed::from_config(&config);
    let mut calculator = Calculator::new(feed, &config.calculator);
    let now = Utc::now();

    match cli.command {
        Command::Kelly {
            market,
            probability,
            bankroll,
            sizing,
            price,
        } => {
            let request = PositionRequest {
                market_key: market,
                user_percent: probability,
                bankroll,
                sizing,
                price_override: price,
            };
            let sizing = calculator.size_position(&request, now)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&sizing)?);
            } else {
                print_sizing(&sizing);
            }
        }
        Command::Portfolio {
            first,
            second,
            bankroll,
        } => {
            let allocation = calculator.allocate(&first, &second, bankroll, now)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&allocation)?);
            } else {
                print_allocation(&allocation);
            }
        }
        Command::Markets => print_markets(&config, cli.json)?,
    }

    Ok(())
}

fn print_leg(leg: &QuotedLeg) {
    let status = leg.quote.status();
    println!(
        "{} [{}]: market {} ({}{}), you {}",
        leg.quote.market,
        leg.market_key,
        format_market_price(&leg.quote),
        status.text,
        if leg.stale { ", stale" } else { "" },
        format_percent(leg.user_probability, 1),
    );
}

fn print_sizing(sizing: &Sizing) {
    let r = &sizing.result;
    print_leg(&sizing.leg);
    println!("Bankroll:       {}", format_currency(sizing.bankroll));
    println!("Sizing:         {}", sizing.sizing);
    println!("Edge:           {}", format_percent(r.edge, 1));
    println!("Kelly fraction: {}", format_percent(r.optimal_fraction, 2));
    println!("Bet size:       {}", format_currency(r.optimal_bet_size));
    println!("Expected value: {}", format_percent(r.expected_value, 1));
    println!("{}", r.recommendation);
}

fn print_allocation(allocation: &Allocation) {
    let r = &allocation.result;
    println!("Bankroll: {}", format_currency(allocation.bankroll));
    for (leg, kelly) in [(&allocation.first, &r.market1), (&allocation.second, &r.market2)] {
        print_leg(leg);
        println!(
            "  stake {} ({}), edge {}",
            format_currency(kelly.optimal_bet_size),
            format_percent(kelly.optimal_fraction, 1),
            format_percent(kelly.edge, 1),
        );
    }
    println!("Total allocation: {}", format_currency(r.total_allocation));
    println!("{}", allocation.message);
}

fn print_markets(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        let rows: Vec<_> = config
            .markets
            .iter()
            .map(|m| {
                serde_json::json!({
                    "key": m.key,
                    "name": m.name,
                    "slug": m.slug,
                    "fallback_price": m.fallback_price,
                    "active": m.active,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for m in &config.markets {
        println!(
            "{:<12} {:<24} fallback {}{}",
            m.key,
            m.name,
            format_percent(m.fallback_price, 1),
            if m.active { "" } else { " (inactive)" },
        );
    }
    Ok(())
}

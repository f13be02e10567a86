//! CLI command implementations

pub mod config;
pub mod demo;
pub mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bankline_core::{BankContext, EntryPoint};
use rust_decimal::Decimal;

/// Get the bankline directory from environment or default
pub fn get_bankline_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BANKLINE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".bankline"))
}

/// Create a fresh banking context from the user's settings
pub fn get_context() -> Result<BankContext> {
    let bankline_dir = get_bankline_dir()?;
    BankContext::new(&bankline_dir, EntryPoint::Cli)
        .with_context(|| format!("Failed to load settings from {:?}", bankline_dir))
}

/// Parse a user-entered amount, accepting a comma as decimal separator
pub fn parse_amount(input: &str) -> Result<Decimal> {
    input
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", input.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), Decimal::new(100, 0));
        assert_eq!(parse_amount(" 12,50 ").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("-5").unwrap(), Decimal::new(-5, 0));
        assert!(parse_amount("ten").is_err());
    }
}

//! Configuration management
//!
//! Settings live in `settings.json` inside the bankline directory:
//! ```json
//! {
//!   "checking": { "withdrawalLimit": "500.00", "dailyWithdrawals": 3 },
//!   "logging": { "maxEntries": 500 }
//! }
//! ```
//! Fields this crate does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;
use crate::domain::CheckingLimits;
use crate::services::logging::DEFAULT_MAX_ENTRIES;

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    checking: CheckingSettings,
    #[serde(default)]
    logging: LoggingSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    withdrawal_limit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    daily_withdrawals: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_entries: Option<usize>,
}

/// Bankline configuration (simplified view of settings)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Default ceiling of a single checking withdrawal
    pub withdrawal_limit: Decimal,
    /// Default number of checking withdrawals per calendar day
    pub daily_withdrawals: u32,
    /// Size of the in-memory event log
    pub max_log_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        let limits = CheckingLimits::default();
        Self {
            withdrawal_limit: limits.per_withdrawal,
            daily_withdrawals: limits.daily_withdrawals,
            max_log_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Load config from the bankline directory
    ///
    /// A missing or unreadable settings file yields the defaults, and so does
    /// a non-positive withdrawal limit stored in it. Limits can
    /// be overridden with BANKLINE_WITHDRAWAL_LIMIT and
    /// BANKLINE_DAILY_WITHDRAWALS.
    pub fn load(bankline_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(bankline_dir)?;
        let defaults = Self::default();

        let withdrawal_limit = match std::env::var("BANKLINE_WITHDRAWAL_LIMIT").ok() {
            Some(value) => value.trim().parse::<Decimal>().map_err(|_| {
                Error::config(format!("BANKLINE_WITHDRAWAL_LIMIT is not a number: {}", value))
            })?,
            // A non-positive limit in the file is treated like a missing one
            None => raw
                .checking
                .withdrawal_limit
                .filter(|limit| *limit > Decimal::ZERO)
                .unwrap_or(defaults.withdrawal_limit),
        };
        let daily_withdrawals = match std::env::var("BANKLINE_DAILY_WITHDRAWALS").ok() {
            Some(value) => value.trim().parse::<u32>().map_err(|_| {
                Error::config(format!("BANKLINE_DAILY_WITHDRAWALS is not a count: {}", value))
            })?,
            None => raw.checking.daily_withdrawals.unwrap_or(defaults.daily_withdrawals),
        };

        let config = Self {
            withdrawal_limit,
            daily_withdrawals,
            max_log_entries: raw.logging.max_entries.unwrap_or(defaults.max_log_entries),
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to the bankline directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, bankline_dir: &Path) -> Result<()> {
        self.validate()?;

        let mut settings = Self::read_settings(bankline_dir)?;
        settings.checking.withdrawal_limit = Some(self.withdrawal_limit);
        settings.checking.daily_withdrawals = Some(self.daily_withdrawals);
        settings.logging.max_entries = Some(self.max_log_entries);

        std::fs::create_dir_all(bankline_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(bankline_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Limits applied to new checking accounts
    pub fn checking_limits(&self) -> CheckingLimits {
        CheckingLimits::new(self.withdrawal_limit, self.daily_withdrawals)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.withdrawal_limit <= Decimal::ZERO {
            return Err(Error::config("withdrawal limit must be positive"));
        }
        Ok(())
    }

    fn read_settings(bankline_dir: &Path) -> Result<SettingsFile> {
        let settings_path = bankline_dir.join(SETTINGS_FILE);
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }
}

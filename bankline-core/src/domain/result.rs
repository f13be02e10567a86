//! Result and error types for the core library

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// The first four variants are business rejections: expected outcomes of a
/// deposit or withdrawal that leave the account untouched. Everything else is
/// a contract or infrastructure failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Decimal, available: Decimal },

    #[error("exceeds per-withdrawal limit of {:.2}", two_places(.limit))]
    LimitExceeded { amount: Decimal, limit: Decimal },

    #[error("daily withdrawal limit exceeded: at most {limit} withdrawals per day")]
    DailyQuotaExceeded { limit: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for the recoverable business outcomes of deposit/withdraw
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InsufficientFunds { .. }
                | Self::LimitExceeded { .. }
                | Self::DailyQuotaExceeded { .. }
        )
    }

    /// Stable, amount-free identifier used in event logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::DailyQuotaExceeded { .. } => "daily_quota_exceeded",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }
}

/// Round half away from zero to cents, for messages
fn two_places(amount: &Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Success flag plus human-readable reason, for callers that present outcomes
///
/// A failed result carries the error's display text as `error` and its
/// stable code under `context["code"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// A failed outcome describing `error`
    pub fn rejected(error: &Error) -> Self {
        let context = HashMap::from([("code".to_string(), serde_json::Value::from(error.code()))]);
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            context: Some(context),
        }
    }

    /// The failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.context.as_ref()?.get("code")?.as_str()
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::rejected(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_rejected_result() {
        let err = Error::InsufficientFunds {
            requested: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let result: OperationResult<i32> = OperationResult::rejected(&err);
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.reason().unwrap().starts_with("insufficient funds"));
        assert_eq!(result.code(), Some("insufficient_funds"));
    }

    #[test]
    fn test_from_rejection_carries_code() {
        let err: Result<i32> = Err(Error::DailyQuotaExceeded { limit: 3 });
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert!(result.reason().unwrap().contains("daily withdrawal limit"));
        let context = result.context.unwrap();
        assert_eq!(context["code"], "daily_quota_exceeded");
    }

    #[test]
    fn test_rejection_classification() {
        assert!(Error::InvalidAmount { amount: Decimal::ZERO }.is_rejection());
        assert!(Error::LimitExceeded {
            amount: Decimal::new(600, 0),
            limit: Decimal::new(500, 0),
        }
        .is_rejection());
        assert!(!Error::not_found("account 9").is_rejection());
        assert!(!Error::validation("bad input").is_rejection());
    }

    #[test]
    fn test_limit_message_formats_two_places() {
        let err = Error::LimitExceeded {
            amount: Decimal::new(600, 0),
            limit: Decimal::new(500, 0),
        };
        assert_eq!(err.to_string(), "exceeds per-withdrawal limit of 500.00");

        let err = Error::LimitExceeded {
            amount: Decimal::new(20, 0),
            limit: Decimal::new(12345, 3),
        };
        assert_eq!(err.to_string(), "exceeds per-withdrawal limit of 12.35");
    }
}

//! # Validation Configuration
//!
//! Runtime knobs for the request validation middleware, loaded from the
//! environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `AGREE_REJECTION_STATUS` | `422` | Status for rule violations (4xx only) |
//! | `AGREE_MAX_BODY_BYTES` | `2097152` | Largest body read for validation |
//! | `AGREE_EXPOSE_VALUES` | `true` | Echo offending values in violations |

use axum::http::StatusCode;
use thiserror::Error;

/// Default body limit: 2 MiB, matching axum's own JSON extractor.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Invalid validation configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held something that is not a number.
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A variable held something that is not a boolean.
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBool {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// The rejection status is not a client error.
    #[error("rejection status must be a 4xx code, got {0}")]
    StatusNotClientError(u16),
}

/// Middleware configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Status returned when rules are violated.
    pub rejection_status: StatusCode,
    /// Bodies larger than this are answered with 413.
    pub max_body_bytes: usize,
    /// When false, `actual` values are stripped from reported violations.
    pub expose_values: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rejection_status: StatusCode::UNPROCESSABLE_ENTITY,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            expose_values: true,
        }
    }
}

impl ValidationConfig {
    /// Load from `AGREE_*` environment variables. Unset variables keep
    /// their defaults; set but invalid ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), but logs and falls back to the
    /// defaults instead of failing.
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid validation config, using defaults");
            Self::default()
        })
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("AGREE_REJECTION_STATUS") {
            let code = parse_number("AGREE_REJECTION_STATUS", &raw)?;
            config.rejection_status = u16::try_from(code)
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(StatusCode::is_client_error)
                .ok_or(ConfigError::StatusNotClientError(code.min(u16::MAX as usize) as u16))?;
        }
        if let Some(raw) = lookup("AGREE_MAX_BODY_BYTES") {
            config.max_body_bytes = parse_number("AGREE_MAX_BODY_BYTES", &raw)?;
        }
        if let Some(raw) = lookup("AGREE_EXPOSE_VALUES") {
            config.expose_values = parse_bool("AGREE_EXPOSE_VALUES", &raw)?;
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}

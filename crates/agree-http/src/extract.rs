//! # Handler-Level Validation
//!
//! Helpers for handlers that validate their own JSON body instead of (or as
//! well as) using the middleware:
//!
//! ```ignore
//! async fn handler(body: Result<Json<Value>, JsonRejection>) -> Result<..., ValidationRejection> {
//!     let user: NewUser = extract_validated(body, &user_schema(), &ValidationConfig::default())?;
//!     // use user...
//! }
//! ```

use agree_core::{Context, Evaluate, Path};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ValidationConfig;
use crate::error::ValidationRejection;

/// Extract a JSON body, mapping extractor failures to
/// [`ValidationRejection::MalformedBody`].
pub fn extract_json(result: Result<Json<Value>, JsonRejection>) -> Result<Value, ValidationRejection> {
    result
        .map(|Json(v)| v)
        .map_err(|err| ValidationRejection::MalformedBody(err.body_text()))
}

/// Extract a JSON body and evaluate it against `rule`. Violation paths
/// start at `body`, as in the middleware.
pub fn extract_validated_json<R: Evaluate + ?Sized>(
    result: Result<Json<Value>, JsonRejection>,
    rule: &R,
    config: &ValidationConfig,
) -> Result<Value, ValidationRejection> {
    let value = extract_json(result)?;
    let outcome = rule.evaluate_in(&value, &Context::root().at(Path::root().child("body")));
    if outcome.is_valid() {
        Ok(value)
    } else {
        Err(ValidationRejection::invalid(outcome, config))
    }
}

/// Validate, then deserialize into `T`. A valid body that does not fit `T`
/// is reported as malformed.
pub fn extract_validated<T: DeserializeOwned, R: Evaluate + ?Sized>(
    result: Result<Json<Value>, JsonRejection>,
    rule: &R,
    config: &ValidationConfig,
) -> Result<T, ValidationRejection> {
    let value = extract_validated_json(result, rule, config)?;
    serde_json::from_value(value).map_err(|err| ValidationRejection::MalformedBody(err.to_string()))
}

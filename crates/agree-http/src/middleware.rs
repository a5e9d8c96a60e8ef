//! # Request Validation Middleware
//!
//! [`RequestContract`] pairs optional body and query rules with a
//! [`ValidationConfig`]. [`validate_request`] is the `from_fn_with_state`
//! middleware that enforces it: the body is buffered (up to the configured
//! limit), parsed as JSON, evaluated, and handed on unchanged when every
//! rule holds.
//!
//! Query strings decode into a JSON object of strings. A key given more
//! than once becomes an array of strings. Use schema coercion hooks to
//! check numeric parameters.

use std::sync::Arc;

use agree_core::{Context, Evaluate, Path, Rule, ValidationResult};
use axum::body::{Body, Bytes};
use axum::extract::{Query, Request, State};
use axum::http::Uri;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::config::ValidationConfig;
use crate::error::ValidationRejection;

/// Rules a request must satisfy before reaching its handler.
#[derive(Debug, Clone, Default)]
pub struct RequestContract {
    body: Option<Rule>,
    query: Option<Rule>,
    config: ValidationConfig,
}

impl RequestContract {
    /// No rules, default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the JSON body against `rule`.
    pub fn body(mut self, rule: impl Into<Rule>) -> Self {
        self.body = Some(rule.into());
        self
    }

    /// Check the decoded query string against `rule`.
    pub fn query(mut self, rule: impl Into<Rule>) -> Self {
        self.query = Some(rule.into());
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn validation_config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Layer this contract over every route of `router`.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(from_fn_with_state(Arc::new(self), validate_request))
    }

    /// Validate `request`, returning it (body restored) when it passes.
    pub async fn check(&self, request: Request) -> Result<Request, ValidationRejection> {
        let query = match &self.query {
            Some(_) => Some(query_value(request.uri())?),
            None => None,
        };

        let (request, body) = match &self.body {
            Some(_) => {
                let (parts, body) = request.into_parts();
                let bytes = read_body(body, self.config.max_body_bytes).await?;
                let value = parse_body(&bytes)?;
                (Request::from_parts(parts, Body::from(bytes)), Some(value))
            }
            None => (request, None),
        };

        let env = environment(query.as_ref(), body.as_ref());
        let root = Context::with_env(&env);
        let mut result = ValidationResult::valid();
        if let (Some(rule), Some(value)) = (&self.query, &query) {
            result.merge(rule.evaluate_in(value, &root.at(Path::root().child("query"))));
        }
        if let (Some(rule), Some(value)) = (&self.body, &body) {
            result.merge(rule.evaluate_in(value, &root.at(Path::root().child("body"))));
        }

        if result.is_valid() {
            Ok(request)
        } else {
            Err(ValidationRejection::invalid(result, &self.config))
        }
    }
}

/// Middleware entry point for `axum::middleware::from_fn_with_state`.
pub async fn validate_request(
    State(contract): State<Arc<RequestContract>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    match contract.check(request).await {
        Ok(request) => next.run(request).await,
        Err(rejection) => {
            let (status, code) = rejection.status_and_code();
            tracing::debug!(
                %method,
                %uri,
                status = status.as_u16(),
                code,
                violations = rejection.result().map_or(0, ValidationResult::len),
                "request rejected"
            );
            rejection.into_response()
        }
    }
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, ValidationRejection> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        let too_large = std::error::Error::source(&err)
            .is_some_and(|source| source.is::<LengthLimitError>());
        if too_large {
            ValidationRejection::BodyTooLarge { limit }
        } else {
            ValidationRejection::MalformedBody(format!("failed to read body: {err}"))
        }
    })
}

/// An empty body is checked as `null`.
fn parse_body(bytes: &Bytes) -> Result<Value, ValidationRejection> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|err| ValidationRejection::MalformedBody(err.to_string()))
}

fn query_value(uri: &Uri) -> Result<Value, ValidationRejection> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|err| ValidationRejection::MalformedQuery(err.body_text()))?;

    let mut object = Map::new();
    for (key, value) in pairs {
        match object.get_mut(&key) {
            None => {
                object.insert(key, Value::String(value));
            }
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        }
    }
    Ok(Value::Object(object))
}

fn environment(query: Option<&Value>, body: Option<&Value>) -> Value {
    let mut env = Map::new();
    if let Some(query) = query {
        env.insert("query".to_string(), query.clone());
    }
    if let Some(body) = body {
        env.insert("body".to_string(), body.clone());
    }
    Value::Object(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_strings_decode_to_objects() {
        let uri: Uri = "/items?page=2&tag=a&tag=b&name=big%20box".parse().unwrap();
        assert_eq!(
            query_value(&uri).unwrap(),
            json!({"page": "2", "tag": ["a", "b"], "name": "big box"})
        );
    }

    #[test]
    fn missing_query_is_an_empty_object() {
        let uri: Uri = "/items".parse().unwrap();
        assert_eq!(query_value(&uri).unwrap(), json!({}));
    }

    #[test]
    fn blank_body_is_null() {
        assert_eq!(parse_body(&Bytes::from_static(b"  \n")).unwrap(), Value::Null);
        assert!(matches!(
            parse_body(&Bytes::from_static(b"{\"a\":")),
            Err(ValidationRejection::MalformedBody(_))
        ));
    }

    #[test]
    fn environment_holds_both_documents() {
        let env = environment(Some(&json!({"page": "1"})), Some(&json!({"a": 1})));
        assert_eq!(env.pointer("/query/page"), Some(&json!("1")));
        assert_eq!(env.pointer("/body/a"), Some(&json!(1)));
    }
}

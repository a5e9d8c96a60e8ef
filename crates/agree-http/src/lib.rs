//! # agree-http — Request Validation Middleware
//!
//! Wraps an axum router so that request bodies and query strings are
//! evaluated against agree rules before any handler runs. A request that
//! fails is answered directly and never reaches the handler.
//!
//! ## Response Format
//!
//! Rejections use the structured error body shared with the rest of the
//! stack:
//!
//! ```json
//! { "error": { "code": "VALIDATION_ERROR", "message": "...",
//!              "details": { "violations": [ ... ] } } }
//! ```
//!
//! | Condition | Status | Code |
//! |-----------|--------|------|
//! | Rule violations | 422 (configurable 4xx) | `VALIDATION_ERROR` |
//! | Body is not JSON | 400 | `MALFORMED_BODY` |
//! | Query string cannot be decoded | 400 | `MALFORMED_QUERY` |
//! | Body over the size limit | 413 | `BODY_TOO_LARGE` |
//!
//! ## Paths
//!
//! Violation paths start with `body` or `query`, so a failing field reads
//! `body.user.email`. Both documents are also available to
//! environment-aware conditions as `/body/..` and `/query/..`.
//!
//! ## Usage
//!
//! ```ignore
//! let app = RequestContract::new()
//!     .body(user_schema)
//!     .query(paging_schema)
//!     .apply(Router::new().route("/users", post(create_user)));
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;

pub use config::{ConfigError, ValidationConfig};
pub use error::{ErrorBody, ErrorDetail, ValidationRejection};
pub use extract::{extract_json, extract_validated, extract_validated_json};
pub use middleware::{validate_request, RequestContract};

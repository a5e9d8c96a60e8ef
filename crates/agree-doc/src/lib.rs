//! # agree-doc — Contract Documentation
//!
//! Read-only renderers over agree rule trees and contracts:
//!
//! - [`expression`]: one-line rule expressions, `all(string, length(1..=64))`.
//! - [`markdown`]: reference pages with parameter tables and nested schema
//!   bullet lists.
//! - [`json`]: serializable description documents.
//!
//! Renderers never evaluate anything and never mutate the trees they walk.

pub mod expression;
pub mod json;
pub mod markdown;

pub use json::{ContractDoc, EntryDoc, RuleDoc, SchemaDoc};
pub use markdown::MarkdownPage;

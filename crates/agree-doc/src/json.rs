//! # JSON Description Documents
//!
//! Serializable mirrors of rule trees and contracts for tooling that wants
//! structure rather than prose (API catalogues, UI form generators).
//! Every node also carries its one-line [`expression`](crate::expression).

use agree_core::{ConditionKind, Contract, Layout, ParameterDescriptor, PathSegment, Rule, Schema};
use serde::Serialize;

use crate::expression;

/// One node of a described rule tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDoc {
    /// Leaf predicate.
    Condition {
        /// Reported condition or schema name.
        name: String,
        /// One-line expression for the node.
        expression: String,
        /// Message template, when one is set.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// AND.
    All {
        /// Reported condition or schema name.
        name: String,
        /// One-line expression for the node.
        expression: String,
        /// Child nodes in declared order.
        children: Vec<RuleDoc>,
    },
    /// OR.
    Any {
        /// Reported condition or schema name.
        name: String,
        /// One-line expression for the node.
        expression: String,
        /// Child nodes in declared order.
        children: Vec<RuleDoc>,
    },
    /// NOT.
    Not {
        /// Reported condition or schema name.
        name: String,
        /// One-line expression for the node.
        expression: String,
        /// The wrapped node.
        child: Box<RuleDoc>,
    },
    /// AT_LEAST_N.
    AtLeast {
        /// Reported condition or schema name.
        name: String,
        /// One-line expression for the node.
        expression: String,
        /// Children that must hold.
        required: usize,
        /// Child nodes in declared order.
        children: Vec<RuleDoc>,
    },
    /// Element-wise.
    Each {
        /// Reported condition or schema name.
        name: String,
        /// One-line expression for the node.
        expression: String,
        /// The wrapped node.
        child: Box<RuleDoc>,
    },
    /// Nested schema.
    Schema(SchemaDoc),
}

/// A described schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDoc {
    /// Schema name.
    pub name: String,
    /// Inline expression such as `{name: string}`.
    pub expression: String,
    /// Keyed or positional.
    pub layout: Layout,
    /// Whether undeclared keys are rejected.
    pub strict: bool,
    /// Entries in declared order.
    pub entries: Vec<EntryDoc>,
}

/// A described schema entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDoc {
    /// Object key or argument position.
    pub key: PathSegment,
    /// Whether the key must be present.
    pub required: bool,
    /// Whether the entry absorbs remaining arguments.
    pub variadic: bool,
    /// Name of the coercion hook, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coerce: Option<String>,
    /// Rule checked against the value.
    pub rule: RuleDoc,
}

/// A described contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDoc {
    /// Contract name.
    pub name: String,
    /// Described parameters in order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Argument rule, absent when calls are unchecked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<RuleDoc>,
    /// Return rule, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<RuleDoc>,
}

/// Describe a rule tree.
pub fn rule(rule: &Rule) -> RuleDoc {
    let c = match rule {
        Rule::Node(s) => return RuleDoc::Schema(schema(s)),
        Rule::Leaf(c) => c,
    };
    let name = c.name().to_string();
    let expression = expression::condition(c);
    match c.kind() {
        ConditionKind::Predicate(_) => RuleDoc::Condition {
            name,
            expression,
            message: c.message().map(|m| m.source().to_string()),
        },
        ConditionKind::All(children) => RuleDoc::All {
            name,
            expression,
            children: children.iter().map(self::rule).collect(),
        },
        ConditionKind::Any(children) => RuleDoc::Any {
            name,
            expression,
            children: children.iter().map(self::rule).collect(),
        },
        ConditionKind::Not(child) => RuleDoc::Not {
            name,
            expression,
            child: Box::new(self::rule(child)),
        },
        ConditionKind::AtLeast { required, children } => RuleDoc::AtLeast {
            name,
            expression,
            required: *required,
            children: children.iter().map(self::rule).collect(),
        },
        ConditionKind::Each(child) => RuleDoc::Each {
            name,
            expression,
            child: Box::new(self::rule(child)),
        },
    }
}

/// Describe a schema.
pub fn schema(s: &Schema) -> SchemaDoc {
    SchemaDoc {
        name: s.name().to_string(),
        expression: expression::inline(s),
        layout: s.layout(),
        strict: s.is_strict(),
        entries: s
            .entries()
            .iter()
            .map(|e| EntryDoc {
                key: e.key().clone(),
                required: e.is_required(),
                variadic: e.is_variadic(),
                coerce: e.coercion().map(|c| c.name().to_string()),
                rule: rule(e.rule()),
            })
            .collect(),
    }
}

/// Describe a contract-wrapped function.
pub fn contract<F>(c: &Contract<F>) -> ContractDoc {
    ContractDoc {
        name: c.name().to_string(),
        parameters: c.descriptors().to_vec(),
        arguments: c.precondition().as_ref().map(rule),
        returns: c.postcondition().map(rule),
    }
}

/// Pretty-printed JSON for a set of contract descriptions.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn to_string_pretty(docs: &[ContractDoc]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agree_core::coerce::number_from_string;
    use agree_core::conditions::{is_string, positive};
    use agree_core::{any_of, EntryDef, Signature};
    use serde_json::{json, Value};

    #[test]
    fn schema_document_shape() {
        let s = Schema::keyed()
            .named("query")
            .entry(EntryDef::optional("limit", positive()).coerce(number_from_string()))
            .strict()
            .build()
            .unwrap();
        let doc = serde_json::to_value(rule(&s.into())).unwrap();
        assert_eq!(
            doc,
            json!({
                "kind": "schema",
                "name": "query",
                "expression": "{limit?: positive}",
                "layout": "keyed",
                "strict": true,
                "entries": [{
                    "key": "limit",
                    "required": false,
                    "variadic": false,
                    "coerce": "number",
                    "rule": {"kind": "condition", "name": "positive", "expression": "positive",
                             "message": "expected a positive number, found {value}"}
                }]
            })
        );
    }

    #[test]
    fn combinator_children_are_nested() {
        let doc = rule(&any_of([is_string(), positive()]).unwrap().into());
        match doc {
            RuleDoc::Any { children, expression, .. } => {
                assert_eq!(expression, "any(string, positive)");
                assert_eq!(children.len(), 2);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn contract_document_lists_parameters() {
        let c = Contract::builder("scale", |_: &[Value]| -> Result<f64, String> { Ok(1.0) })
            .signature(Signature::declared("x, factor = 2"))
            .annotate("x", positive())
            .build()
            .unwrap();
        let doc = serde_json::to_value(contract(&c)).unwrap();
        assert_eq!(doc["parameters"][1]["name"], "factor");
        assert_eq!(doc["parameters"][1]["has_default"], true);
        assert_eq!(doc["arguments"]["kind"], "schema");
        assert_eq!(doc["arguments"]["layout"], "positional");
        assert!(doc.get("returns").is_none());
    }
}

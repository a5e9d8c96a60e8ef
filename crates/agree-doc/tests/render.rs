//! # Rendering a Small API
//!
//! Documents a pair of contracts end to end and checks that Markdown and
//! JSON agree on what is declared.

use agree_core::conditions::{in_range, is_string, length_between, matches};
use agree_core::{all, each, Contract, Schema, Signature};
use agree_doc::{json, markdown, MarkdownPage, RuleDoc};
use serde_json::{json, Value};

fn create_user() -> Contract<fn(&[Value]) -> Result<Value, String>> {
    fn body(args: &[Value]) -> Result<Value, String> {
        Ok(args[0].clone())
    }
    let user = Schema::keyed()
        .named("user")
        .field("name", all([is_string(), length_between(1, 64)]).unwrap())
        .field("age", in_range(0.0, 130.0))
        .optional_field("tags", each(is_string()))
        .build()
        .unwrap();
    Contract::builder("create_user", body as fn(&[Value]) -> Result<Value, String>)
        .signature(Signature::declared("fn create_user(user: User)"))
        .annotate("user", user.clone())
        .returns(user)
        .build()
        .unwrap()
}

#[test]
fn markdown_page_documents_parameters_and_nested_fields() {
    let page = MarkdownPage::new("Users").contract(&create_user()).render();
    assert!(page.starts_with("# Users\n\n## `create_user`\n"));
    assert!(page.contains("| 0 | `user` | required | `user` |"));
    assert!(page.contains("#### `user`\n\n- `name` (required): `all(string, length(1..=64))`\n"));
    assert!(page.contains("- `tags` (optional): `each(string)`\n"));
    assert!(page.contains("**Returns:** `user`"));
}

#[test]
fn json_document_matches_markdown() {
    let c = create_user();
    let doc = json::contract(&c);
    assert_eq!(doc.parameters.len(), 1);
    let Some(RuleDoc::Schema(args)) = &doc.arguments else {
        panic!("arguments should be a positional schema");
    };
    let RuleDoc::Schema(user) = &args.entries[0].rule else {
        panic!("the user parameter should be a keyed schema");
    };
    let keys: Vec<String> = user.entries.iter().map(|e| e.key.to_string()).collect();
    assert_eq!(keys, vec!["name", "age", "tags"]);
    for key in &keys {
        assert!(markdown::contract(&c).contains(&format!("`{key}`")));
    }

    let rendered = json::to_string_pretty(&[doc]).unwrap();
    let parsed: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed[0]["returns"]["name"], json!("user"));
}

#[test]
fn pattern_descriptions_survive_rendering() {
    let slug = matches("^[a-z-]+$").unwrap();
    assert_eq!(agree_doc::expression::condition(&slug), "matches(/^[a-z-]+$/)");
}

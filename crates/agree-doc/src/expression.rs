//! Compact one-line rendering of rule trees, e.g.
//! `all(string, length(1..=64))`.

use agree_core::schema::DEFAULT_SCHEMA_NAME;
use agree_core::{Condition, ConditionKind, Entry, Rule, Schema};

/// Render any rule node.
pub fn rule(rule: &Rule) -> String {
    match rule {
        Rule::Leaf(c) => condition(c),
        Rule::Node(s) => schema(s),
    }
}

/// Render a condition. An attached description wins over the structure.
pub fn condition(c: &Condition) -> String {
    if let Some(description) = c.description() {
        return description.to_string();
    }
    match c.kind() {
        ConditionKind::Predicate(_) => c.name().to_string(),
        ConditionKind::All(children) | ConditionKind::Any(children) => {
            format!("{}({})", c.name(), list(children))
        }
        ConditionKind::Not(child) => {
            if c.name() == format!("not({})", child.name()) {
                format!("not({})", rule(child))
            } else {
                format!("{}({})", c.name(), rule(child))
            }
        }
        ConditionKind::AtLeast { required, children } => {
            format!("{}({required}, {})", c.name(), list(children))
        }
        ConditionKind::Each(child) => format!("{}({})", c.name(), rule(child)),
    }
}

/// Render a schema: its name when it has one, otherwise its entries inline.
pub fn schema(s: &Schema) -> String {
    if s.name() != DEFAULT_SCHEMA_NAME {
        return s.name().to_string();
    }
    inline(s)
}

/// Render a schema's entries inline, `{name: string, age?: positive}`.
pub fn inline(s: &Schema) -> String {
    let entries: Vec<String> = s.entries().iter().map(entry).collect();
    format!("{{{}}}", entries.join(", "))
}

fn entry(e: &Entry) -> String {
    let marker = if e.is_variadic() {
        "..."
    } else if e.is_required() {
        ""
    } else {
        "?"
    };
    format!("{}{marker}: {}", e.key(), rule(e.rule()))
}

fn list(children: &[Rule]) -> String {
    children.iter().map(rule).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agree_core::conditions::{is_string, length_between, optional, positive};
    use agree_core::schema as build_schema;
    use agree_core::{all, at_least, each, not, EntryDef, SchemaOptions};

    #[test]
    fn nested_combinators() {
        let name = all([is_string(), length_between(1, 64)]).unwrap();
        assert_eq!(condition(&name), "all(string, length(1..=64))");
        assert_eq!(condition(&not(positive())), "not(positive)");
        assert_eq!(condition(&each(optional(is_string()))), "each(optional(string))");
        let two = at_least(2, [positive(), is_string(), not(is_string())]).unwrap();
        assert_eq!(condition(&two), "at-least(2, positive, string, not(string))");
    }

    #[test]
    fn renamed_and_described_conditions() {
        let name = all([is_string(), length_between(1, 64)])
            .unwrap()
            .with_name("display-name")
            .unwrap();
        assert_eq!(condition(&name), "display-name(string, length(1..=64))");
        assert_eq!(condition(&name.describe("a display name")), "a display name");
    }

    #[test]
    fn schemas_render_by_name_or_inline() {
        let anonymous = build_schema(
            [
                EntryDef::required("name", is_string()),
                EntryDef::optional("age", positive()),
            ],
            SchemaOptions::default(),
        )
        .unwrap();
        assert_eq!(rule(&anonymous.clone().into()), "{name: string, age?: positive}");
        let named = agree_core::Schema::keyed().named("user").field("name", is_string()).build().unwrap();
        assert_eq!(schema(&named), "user");
        assert_eq!(inline(&named), "{name: string}");
    }
}

//! # Parameter Introspection
//!
//! Describes the parameters of a wrapped function as an ordered list of
//! [`ParameterDescriptor`]s, from which the contract wrapper derives a
//! positional argument schema.
//!
//! Metadata is attached explicitly through a [`Signature`]:
//!
//! - [`Signature::declared`] parses a textual declaration. Accepted shapes
//!   are a bare list (`a, b = 2, ...rest`), `fn name(a: i64, b: i64 = 2)`,
//!   `function(a, b = 2, ...rest) {}` and closure pipes `|a, b|`.
//! - [`Signature::builder`] registers the same metadata programmatically.
//! - [`Signature::Dynamic`] carries no information and describes as an
//!   empty list.
//!
//! ## Cache
//!
//! Descriptions are cached process-wide by [`FunctionId`] and
//! [`Signature`]. Function pointers of one type registered under one name
//! share a `FunctionId`, so the signature is part of the key: two such
//! functions with different parameters are described separately. The cache
//! is populated on first use, never evicted, and concurrent first calls for
//! the same key race benignly: the first inserted list wins and every
//! caller receives that list.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::condition::Rule;
use crate::conditions::anything;
use crate::error::ConfigurationError;
use crate::schema::{EntryDef, Schema};

/// One declared parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Declared name.
    pub name: String,
    /// Zero-based position in the argument list.
    pub position: usize,
    /// Whether the parameter declares a default value.
    pub has_default: bool,
    /// Whether the parameter absorbs all remaining arguments.
    pub is_variadic: bool,
}

impl ParameterDescriptor {
    /// Whether a call must supply this parameter.
    pub fn is_required(&self) -> bool {
        !self.has_default && !self.is_variadic
    }
}

/// Cache identity of a described function.
///
/// Combines the Rust type of the callable with its contract name. Closures
/// and function items have unique types; function pointers share one, and
/// the cache tells those apart by [`Signature`] as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId {
    type_id: TypeId,
    name: String,
}

impl FunctionId {
    /// Identity of a callable of type `F` registered under `name`.
    pub fn of<F: 'static>(name: impl Into<String>) -> Self {
        Self {
            type_id: TypeId::of::<F>(),
            name: name.into(),
        }
    }

    /// Identity of `callable` registered under `name`.
    pub fn of_val<F: 'static>(_callable: &F, name: impl Into<String>) -> Self {
        Self::of::<F>(name)
    }

    /// Identity by name alone, for callables without a usable type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::of::<()>(name)
    }

    /// Contract name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// One parameter registered through [`SignatureBuilder`] or parsed from a
/// declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredParameter {
    name: String,
    has_default: bool,
    is_variadic: bool,
}

/// Parameter metadata attached to a wrapped function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Textual declaration, parsed on first describe.
    Declared(String),
    /// Programmatically registered parameters.
    Parameters(Vec<DeclaredParameter>),
    /// No static information available.
    Dynamic,
}

impl Signature {
    /// A textual declaration such as `"a, b = 2, ...rest"`.
    pub fn declared(text: impl Into<String>) -> Self {
        Self::Declared(text.into())
    }

    /// Start registering parameters one by one.
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    /// Describe the parameters without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MalformedSignature`] for unparseable
    /// declarations, invalid or duplicate names and misplaced variadics.
    pub fn describe(&self) -> Result<Vec<ParameterDescriptor>, ConfigurationError> {
        match self {
            Self::Declared(text) => {
                let params = parse_declaration(text)?;
                into_descriptors(text, params)
            }
            Self::Parameters(params) => {
                for param in params {
                    if !is_identifier(&param.name) {
                        return Err(ConfigurationError::malformed_signature(
                            &render(params),
                            format!("`{}` is not a valid parameter name", param.name),
                        ));
                    }
                }
                into_descriptors(&render(params), params.clone())
            }
            Self::Dynamic => Ok(Vec::new()),
        }
    }
}

fn render(params: &[DeclaredParameter]) -> String {
    params
        .iter()
        .map(|p| match (p.is_variadic, p.has_default) {
            (true, _) => format!("...{}", p.name),
            (false, true) => format!("{} = ..", p.name),
            (false, false) => p.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn into_descriptors(
    declaration: &str,
    params: Vec<DeclaredParameter>,
) -> Result<Vec<ParameterDescriptor>, ConfigurationError> {
    let count = params.len();
    let mut descriptors: Vec<ParameterDescriptor> = Vec::with_capacity(count);
    for (position, param) in params.into_iter().enumerate() {
        if descriptors.iter().any(|d| d.name == param.name) {
            return Err(ConfigurationError::malformed_signature(
                declaration,
                format!("parameter `{}` is declared more than once", param.name),
            ));
        }
        if param.is_variadic {
            if param.has_default {
                return Err(ConfigurationError::malformed_signature(
                    declaration,
                    format!("variadic parameter `{}` cannot have a default", param.name),
                ));
            }
            if position + 1 != count {
                return Err(ConfigurationError::malformed_signature(
                    declaration,
                    format!("variadic parameter `{}` must be the last parameter", param.name),
                ));
            }
        }
        descriptors.push(ParameterDescriptor {
            name: param.name,
            position,
            has_default: param.has_default,
            is_variadic: param.is_variadic,
        });
    }
    Ok(descriptors)
}

/// Programmatic parameter registration.
#[derive(Debug, Clone, Default)]
pub struct SignatureBuilder {
    params: Vec<DeclaredParameter>,
}

impl SignatureBuilder {
    /// A required parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(DeclaredParameter {
            name: name.into(),
            has_default: false,
            is_variadic: false,
        });
        self
    }

    /// A parameter with a default value.
    pub fn param_with_default(mut self, name: impl Into<String>) -> Self {
        self.params.push(DeclaredParameter {
            name: name.into(),
            has_default: true,
            is_variadic: false,
        });
        self
    }

    /// The variadic tail.
    pub fn variadic(mut self, name: impl Into<String>) -> Self {
        self.params.push(DeclaredParameter {
            name: name.into(),
            has_default: false,
            is_variadic: true,
        });
        self
    }

    /// Finish registration. Validation happens when the signature is
    /// described.
    pub fn build(self) -> Signature {
        Signature::Parameters(self.params)
    }
}

// ---------------------------------------------------------------------------
// Declaration parser
// ---------------------------------------------------------------------------

fn parse_declaration(text: &str) -> Result<Vec<DeclaredParameter>, ConfigurationError> {
    let list = parameter_list(text)?;
    let pieces = split_top_level(list, ',', text)?;
    let last = pieces.len().saturating_sub(1);
    let mut params = Vec::with_capacity(pieces.len());
    for (index, piece) in pieces.iter().enumerate() {
        let piece = piece.trim();
        if piece.is_empty() {
            // `()` and a trailing comma are fine, a hole in the middle is not.
            if index == last {
                continue;
            }
            return Err(ConfigurationError::malformed_signature(text, "empty parameter"));
        }
        if let Some(param) = parse_parameter(piece, text)? {
            params.push(param);
        }
    }
    Ok(params)
}

/// Extract the text between the delimiters of a wrapped declaration, or the
/// whole text for a bare list.
fn parameter_list(text: &str) -> Result<&str, ConfigurationError> {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('|') {
        let end = rest
            .find('|')
            .ok_or_else(|| ConfigurationError::malformed_signature(text, "unterminated closure parameters"))?;
        return Ok(&rest[..end]);
    }
    let Some(open) = trimmed.find('(') else {
        return Ok(trimmed);
    };
    if !is_declaration_head(&trimmed[..open]) {
        return Ok(trimmed);
    }
    let mut depth = 0usize;
    let mut quote = Scanner::default();
    for (offset, ch) in trimmed[open..].char_indices() {
        if quote.skip(ch, &trimmed[..open + offset]) {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&trimmed[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    Err(ConfigurationError::malformed_signature(text, "unbalanced parentheses"))
}

/// `fn name`, `async fn name<T: Clone>`, `function`, `name` or nothing.
fn is_declaration_head(head: &str) -> bool {
    let head = head.split('<').next().unwrap_or_default().trim();
    head.split_whitespace().all(is_identifier)
}

/// Quote tracking shared by the scanners.
#[derive(Default)]
struct Scanner {
    open: Option<char>,
    escaped: bool,
}

impl Scanner {
    /// Whether `ch` belongs to a string literal. `before` is the text that
    /// precedes `ch`; single quotes only open a literal in value position so
    /// that lifetimes (`&'a str`) are not mistaken for strings.
    fn skip(&mut self, ch: char, before: &str) -> bool {
        if let Some(open) = self.open {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == open {
                self.open = None;
            }
            return true;
        }
        let opens = match ch {
            '"' | '`' => true,
            '\'' => matches!(
                before.trim_end().chars().last(),
                None | Some('=' | ',' | '(' | '[' | '{')
            ),
            _ => false,
        };
        if opens {
            self.open = Some(ch);
        }
        opens
    }
}

/// Bracket nesting outside string literals.
///
/// `<` only opens a generic argument list directly after a path (`Vec<`,
/// `::<`), so comparisons such as `x < 2` do not nest. `->` and `=>` never
/// close one.
#[derive(Default)]
struct Nesting {
    depth: usize,
    angles: usize,
}

impl Nesting {
    /// Track `ch`; returns the offending closer when nesting goes negative.
    fn step(&mut self, ch: char, previous: Option<char>) -> Result<(), char> {
        match ch {
            '(' | '[' | '{' => self.depth += 1,
            '<' if previous.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == ':') => {
                self.depth += 1;
                self.angles += 1;
            }
            '>' if self.angles > 0 && !matches!(previous, Some('-' | '=')) => {
                self.depth = self.depth.saturating_sub(1);
                self.angles -= 1;
            }
            ')' | ']' | '}' => self.depth = self.depth.checked_sub(1).ok_or(ch)?,
            _ => {}
        }
        Ok(())
    }

    fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

/// Split on `separator` outside brackets and string literals.
fn split_top_level<'t>(
    list: &'t str,
    separator: char,
    declaration: &str,
) -> Result<Vec<&'t str>, ConfigurationError> {
    let mut pieces = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;
    let mut quote = Scanner::default();
    let mut previous = None;
    for (offset, ch) in list.char_indices() {
        if quote.skip(ch, &list[..offset]) {
            previous = Some(ch);
            continue;
        }
        if ch == separator && nesting.is_top_level() {
            pieces.push(&list[start..offset]);
            start = offset + ch.len_utf8();
        } else {
            nesting.step(ch, previous).map_err(|closer| {
                ConfigurationError::malformed_signature(declaration, format!("unbalanced `{closer}`"))
            })?;
        }
        previous = Some(ch);
    }
    if quote.open.is_some() {
        return Err(ConfigurationError::malformed_signature(declaration, "unterminated string literal"));
    }
    if !nesting.is_top_level() {
        return Err(ConfigurationError::malformed_signature(declaration, "unbalanced brackets"));
    }
    pieces.push(&list[start..]);
    Ok(pieces)
}

/// Byte offset of the top-level `=` introducing a default value.
fn default_marker(piece: &str) -> Option<usize> {
    let bytes = piece.as_bytes();
    let mut nesting = Nesting::default();
    let mut quote = Scanner::default();
    let mut previous = None;
    for (offset, ch) in piece.char_indices() {
        if quote.skip(ch, &piece[..offset]) {
            previous = Some(ch);
            continue;
        }
        if ch == '=' && nesting.is_top_level() {
            let next = bytes.get(offset + 1).copied();
            let comparison = matches!(previous, Some('=' | '<' | '>' | '!'))
                || matches!(next, Some(b'=' | b'>'));
            if !comparison {
                return Some(offset);
            }
        }
        // Pieces were already checked for balance by the splitter.
        let _ = nesting.step(ch, previous);
        previous = Some(ch);
    }
    None
}

/// Byte offset of the top-level `:` introducing a type annotation.
fn type_marker(decl: &str) -> Option<usize> {
    let bytes = decl.as_bytes();
    decl.char_indices().find_map(|(offset, ch)| {
        let doubled = bytes.get(offset + 1) == Some(&b':')
            || (offset > 0 && bytes[offset - 1] == b':');
        (ch == ':' && !doubled).then_some(offset)
    })
}

fn parse_parameter(piece: &str, declaration: &str) -> Result<Option<DeclaredParameter>, ConfigurationError> {
    let (decl, has_default) = match default_marker(piece) {
        Some(at) => {
            if piece[at + 1..].trim().is_empty() {
                return Err(ConfigurationError::malformed_signature(
                    declaration,
                    format!("parameter `{}` has an empty default", piece[..at].trim()),
                ));
            }
            (&piece[..at], true)
        }
        None => (piece, false),
    };

    let (name_part, type_part) = match type_marker(decl) {
        Some(at) => (&decl[..at], Some(decl[at + 1..].trim())),
        None => (decl, None),
    };

    let mut name = name_part.trim();
    let mut is_variadic = false;
    if let Some(stripped) = name.strip_prefix("...") {
        name = stripped.trim_start();
        is_variadic = true;
    } else if let Some(stripped) = name.strip_suffix("...") {
        name = stripped.trim_end();
        is_variadic = true;
    }
    if type_part.is_some_and(|ty| ty.starts_with("...")) {
        is_variadic = true;
    }

    let name = strip_binding_modifiers(name);
    if name == "self" {
        return Ok(None);
    }
    if !is_identifier(name) {
        return Err(ConfigurationError::malformed_signature(
            declaration,
            format!("`{}` is not a valid parameter name", piece.trim()),
        ));
    }
    Ok(Some(DeclaredParameter {
        name: name.to_string(),
        has_default,
        is_variadic,
    }))
}

/// `&mut x`, `mut x`, `ref x`, `&x` → `x`.
fn strip_binding_modifiers(mut name: &str) -> &str {
    loop {
        let before = name;
        name = name.trim_start_matches('&').trim_start();
        for keyword in ["mut ", "ref "] {
            if let Some(rest) = name.strip_prefix(keyword) {
                name = rest.trim_start();
            }
        }
        if name == before {
            return name;
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

type Described = (Signature, Arc<[ParameterDescriptor]>);
type DescriptorCache = RwLock<HashMap<FunctionId, Vec<Described>>>;

static DESCRIPTORS: OnceLock<DescriptorCache> = OnceLock::new();

fn descriptors() -> &'static DescriptorCache {
    DESCRIPTORS.get_or_init(DescriptorCache::default)
}

/// Describe the parameters of the function identified by `id`.
///
/// The first successful description of an identity and signature is cached
/// for the life of the process; later calls with the same pair return the
/// cached list. Failed descriptions are not cached.
///
/// # Errors
///
/// Propagates [`Signature::describe`] errors.
pub fn describe_parameters(
    id: &FunctionId,
    signature: &Signature,
) -> Result<Arc<[ParameterDescriptor]>, ConfigurationError> {
    if let Some(cached) = lookup(descriptors().read().get(id), signature) {
        return Ok(cached);
    }
    let described: Arc<[ParameterDescriptor]> = signature.describe()?.into();
    let mut cache = descriptors().write();
    let entries = cache.entry(id.clone()).or_default();
    if let Some(cached) = lookup(Some(entries), signature) {
        return Ok(cached);
    }
    entries.push((signature.clone(), Arc::clone(&described)));
    Ok(described)
}

fn lookup(entries: Option<&Vec<Described>>, signature: &Signature) -> Option<Arc<[ParameterDescriptor]>> {
    entries?
        .iter()
        .find(|(cached, _)| cached == signature)
        .map(|(_, params)| Arc::clone(params))
}

/// Whether a description of `id` under `signature` is already cached.
pub fn is_cached(id: &FunctionId, signature: &Signature) -> bool {
    lookup(descriptors().read().get(id), signature).is_some()
}

// ---------------------------------------------------------------------------
// Schema derivation
// ---------------------------------------------------------------------------

/// Derive the positional argument schema of `function`.
///
/// Entry `i` is required iff parameter `i` has no default and is not
/// variadic. Unannotated parameters accept any value. Returns `None` when
/// the function declares no parameters, meaning no precondition applies.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownParameter`] for an annotation that
/// names no declared parameter, and [`ConfigurationError::DuplicateKey`]
/// for a parameter annotated twice.
pub fn positional_schema(
    function: &str,
    params: &[ParameterDescriptor],
    annotations: &[(String, Rule)],
) -> Result<Option<Schema>, ConfigurationError> {
    for (index, (name, _)) in annotations.iter().enumerate() {
        if !params.iter().any(|p| &p.name == name) {
            return Err(ConfigurationError::UnknownParameter {
                function: function.to_string(),
                parameter: name.clone(),
            });
        }
        if annotations[..index].iter().any(|(earlier, _)| earlier == name) {
            return Err(ConfigurationError::DuplicateKey { key: name.clone() });
        }
    }
    if params.is_empty() {
        return Ok(None);
    }

    let mut builder = Schema::positional().named(function);
    for param in params {
        let rule = annotations
            .iter()
            .find(|(name, _)| *name == param.name)
            .map(|(_, rule)| rule.clone())
            .unwrap_or_else(|| anything().into());
        let mut def = EntryDef::new(param.position).rule(rule);
        if param.is_variadic {
            def = def.variadic();
        } else if param.has_default {
            def = def.not_required();
        }
        builder = builder.entry(def);
    }
    builder.build().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(signature: &Signature) -> Vec<(String, bool, bool)> {
        signature
            .describe()
            .unwrap()
            .into_iter()
            .map(|d| (d.name, d.has_default, d.is_variadic))
            .collect()
    }

    fn d(name: &str, has_default: bool, is_variadic: bool) -> (String, bool, bool) {
        (name.to_string(), has_default, is_variadic)
    }

    #[test]
    fn bare_list() {
        assert_eq!(
            names(&Signature::declared("a, b = 2, ...rest")),
            vec![d("a", false, false), d("b", true, false), d("rest", false, true)]
        );
    }

    #[test]
    fn function_expression_with_body() {
        let described = Signature::declared("function(a, b=2, ...rest){}").describe().unwrap();
        assert_eq!(described.len(), 3);
        assert_eq!(described[2].position, 2);
        assert!(described[2].is_variadic);
        assert!(described[1].has_default);
        assert!(described[0].is_required());
    }

    #[test]
    fn rust_style_declaration() {
        assert_eq!(
            names(&Signature::declared(
                "fn transfer<K: Ord>(&self, from: &str, amounts: HashMap<K, u64>, memo: Option<&'a str> = None)"
            )),
            vec![d("from", false, false), d("amounts", false, false), d("memo", true, false)]
        );
    }

    #[test]
    fn closure_pipes_and_binding_modifiers() {
        assert_eq!(
            names(&Signature::declared("|mut acc, &item|")),
            vec![d("acc", false, false), d("item", false, false)]
        );
    }

    #[test]
    fn defaults_with_nested_commas_and_strings() {
        assert_eq!(
            names(&Signature::declared("opts = {a: 1, b: [2, 3]}, sep = ', ', cmp = x >= 2")),
            vec![d("opts", true, false), d("sep", true, false), d("cmp", true, false)]
        );
    }

    #[test]
    fn variadic_markers() {
        assert_eq!(
            names(&Signature::declared("head, tail...")),
            vec![d("head", false, false), d("tail", false, true)]
        );
        assert_eq!(
            names(&Signature::declared("head: i64, tail: ...i64")),
            vec![d("head", false, false), d("tail", false, true)]
        );
    }

    #[test]
    fn empty_lists() {
        assert!(Signature::declared("").describe().unwrap().is_empty());
        assert!(Signature::declared("fn noop()").describe().unwrap().is_empty());
        assert!(Signature::Dynamic.describe().unwrap().is_empty());
        assert_eq!(names(&Signature::declared("a, b,")).len(), 2);
    }

    #[test]
    fn malformed_declarations() {
        for text in [
            "a, a",
            "...rest, a",
            "...rest = []",
            "a, , b",
            "1a",
            "fn f(a, b",
            "a = ",
            "a, b = \"open",
        ] {
            assert!(
                matches!(
                    Signature::declared(text).describe(),
                    Err(ConfigurationError::MalformedSignature { .. })
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn builder_matches_declared_text() {
        let built = Signature::builder()
            .param("a")
            .param_with_default("b")
            .variadic("rest")
            .build();
        assert_eq!(built.describe(), Signature::declared("a, b = 2, ...rest").describe());
        let bad = Signature::builder().variadic("rest").param("a").build();
        assert!(bad.describe().is_err());
        let invalid = Signature::builder().param("not a name").build();
        assert!(invalid.describe().is_err());
    }

    #[test]
    fn cache_keeps_first_description() {
        struct Marker;
        let id = FunctionId::of::<Marker>("cache_keeps_first_description");
        let signature = Signature::declared("a");
        assert!(!is_cached(&id, &signature));
        let first = describe_parameters(&id, &signature).unwrap();
        assert!(is_cached(&id, &signature));
        let second = describe_parameters(&id, &Signature::declared("a")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn one_identity_with_two_signatures_is_described_twice() {
        let id = FunctionId::named("one_identity_with_two_signatures");
        let short = describe_parameters(&id, &Signature::declared("a")).unwrap();
        let long = describe_parameters(&id, &Signature::declared("a, b")).unwrap();
        assert_eq!(short.len(), 1);
        assert_eq!(long.len(), 2);
        assert_eq!(long[1].name, "b");
        assert!(is_cached(&id, &Signature::declared("a")));
    }

    #[test]
    fn failed_descriptions_are_not_cached() {
        let id = FunctionId::named("failed_descriptions_are_not_cached");
        let signature = Signature::declared("a, a");
        assert!(describe_parameters(&id, &signature).is_err());
        assert!(!is_cached(&id, &signature));
    }

    #[test]
    fn same_name_different_types_are_distinct() {
        struct A;
        struct B;
        assert_ne!(FunctionId::of::<A>("f"), FunctionId::of::<B>("f"));
    }

    #[test]
    fn derived_schema_marks_required_entries() {
        let params = Signature::declared("a, b = 2, ...rest").describe().unwrap();
        let s = positional_schema("f", &params, &[]).unwrap().unwrap();
        let flags: Vec<(bool, bool)> = s.entries().iter().map(|e| (e.is_required(), e.is_variadic())).collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
        assert_eq!(s.name(), "f");
    }

    #[test]
    fn unknown_annotation_is_rejected() {
        let params = Signature::declared("a").describe().unwrap();
        let err = positional_schema("f", &params, &[("b".to_string(), anything().into())]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownParameter {
                function: "f".to_string(),
                parameter: "b".to_string()
            }
        );
    }

    #[test]
    fn no_parameters_means_no_schema() {
        assert!(positional_schema("f", &[], &[]).unwrap().is_none());
    }
}

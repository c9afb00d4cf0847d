//! Injection-safe GraphQL argument building.
//!
//! GraphQL documents in this crate are assembled from literal field
//! selections plus argument lists built here. Every dynamic value flows
//! through a single JSON-safe encoder: scalars and lists are rendered with
//! `serde_json`, argument names and enum identifiers must be valid GraphQL
//! names, and an identifier that fails validation is rendered as a quoted
//! JSON string instead of raw text. A slug or symbol can therefore never
//! break out of its literal position in the document.

use std::fmt::Write;

use serde_json::Value;

/// A single argument value.
#[derive(Debug, Clone)]
pub enum ArgValue {
    /// Any JSON scalar, list, or null, rendered through the JSON encoder.
    Json(Value),
    /// A bare GraphQL enum identifier, rendered unquoted.
    ///
    /// Identifiers that are not valid GraphQL names are rendered as JSON
    /// strings instead, which neutralizes them.
    Ident(String),
    /// A nested argument object with unquoted keys.
    Object(Arguments),
}

impl ArgValue {
    /// A JSON value argument.
    pub fn json(value: Value) -> Self {
        ArgValue::Json(value)
    }

    /// A bare enum identifier argument.
    pub fn ident(name: impl Into<String>) -> Self {
        ArgValue::Ident(name.into())
    }

    /// A nested argument object.
    pub fn object(args: Arguments) -> Self {
        ArgValue::Object(args)
    }
}

/// An ordered GraphQL argument list.
///
/// Arguments render as `name: value, ...` in insertion order. Entry names
/// that are not valid GraphQL names are dropped at render time.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    entries: Vec<(String, ArgValue)>,
}

impl Arguments {
    /// An empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no arguments have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an argument.
    pub fn arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    /// Append an argument only when the value is present.
    pub fn arg_opt(self, name: impl Into<String>, value: Option<ArgValue>) -> Self {
        match value {
            Some(value) => self.arg(name, value),
            None => self,
        }
    }

    /// Render the inner `name: value` list without surrounding parentheses.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        for (name, value) in &self.entries {
            if !is_graphql_name(name) {
                // A non-name key cannot be emitted unquoted; drop it rather
                // than emit raw text into the document.
                continue;
            }
            if !first {
                out.push_str(", ");
            }
            first = false;
            let _ = write!(out, "{name}: {}", render_value(value));
        }
        out
    }

    /// Render as a parenthesized argument list, or an empty string when
    /// there are no arguments.
    pub fn render_parenthesized(&self) -> String {
        let inner = self.render();
        if inner.is_empty() {
            String::new()
        } else {
            format!("({inner})")
        }
    }
}

fn render_value(value: &ArgValue) -> String {
    match value {
        // Value serialization with string keys cannot fail.
        ArgValue::Json(json) => {
            serde_json::to_string(json).expect("JSON argument serialization is infallible")
        }
        ArgValue::Ident(name) if is_graphql_name(name) => name.clone(),
        ArgValue::Ident(name) => {
            serde_json::to_string(name).expect("JSON argument serialization is infallible")
        }
        ArgValue::Object(args) => format!("{{{}}}", args.render()),
    }
}

/// True for valid GraphQL names: `[A-Za-z_][A-Za-z0-9_]*`.
fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renders_in_insertion_order() {
        let args = Arguments::new()
            .arg("limit", ArgValue::json(json!(10)))
            .arg("offset", ArgValue::json(json!(0)));
        assert_eq!(args.render(), "limit: 10, offset: 0");
    }

    #[test]
    fn test_string_values_are_json_quoted() {
        let args = Arguments::new().arg("slug", ArgValue::json(json!("solana")));
        assert_eq!(args.render(), r#"slug: "solana""#);
    }

    #[test]
    fn test_hostile_slug_stays_inside_the_literal() {
        let hostile = r#"solana"]}) { secrets } #"#;
        let args = Arguments::new().arg("slugs", ArgValue::json(json!([hostile])));
        let rendered = args.render();
        // The payload must arrive escaped inside one JSON string literal.
        assert_eq!(
            rendered,
            r#"slugs: ["solana\"]}) { secrets } #"]"#.to_string()
        );
    }

    #[test]
    fn test_nested_objects_use_unquoted_keys() {
        let args = Arguments::new().arg(
            "where",
            ArgValue::object(
                Arguments::new().arg("inputAsset", ArgValue::object(
                    Arguments::new().arg("slugs", ArgValue::json(json!(["solana"]))),
                )),
            ),
        );
        assert_eq!(args.render(), r#"where: {inputAsset: {slugs: ["solana"]}}"#);
    }

    #[test]
    fn test_enum_ident_rendered_unquoted() {
        let args = Arguments::new().arg(
            "order",
            ArgValue::object(Arguments::new().arg("createdAt", ArgValue::ident("desc"))),
        );
        assert_eq!(args.render(), "order: {createdAt: desc}");
    }

    #[test]
    fn test_invalid_ident_neutralized_to_json_string() {
        let args = Arguments::new().arg("order", ArgValue::ident("desc) { x }"));
        assert_eq!(args.render(), r#"order: "desc) { x }""#);
    }

    #[test]
    fn test_invalid_argument_name_dropped() {
        let args = Arguments::new()
            .arg("valid", ArgValue::json(json!(1)))
            .arg("in valid", ArgValue::json(json!(2)));
        assert_eq!(args.render(), "valid: 1");
    }

    #[test]
    fn test_null_renders_as_graphql_null() {
        let args = Arguments::new().arg("asset", ArgValue::json(Value::Null));
        assert_eq!(args.render(), "asset: null");
    }

    #[test]
    fn test_empty_arguments_render_nothing() {
        let args = Arguments::new();
        assert_eq!(args.render_parenthesized(), "");
    }

    #[test]
    fn test_parenthesized_wraps_non_empty() {
        let args = Arguments::new().arg("limit", ArgValue::json(json!(1)));
        assert_eq!(args.render_parenthesized(), "(limit: 1)");
    }
}

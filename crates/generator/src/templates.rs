//! Template loading and management

use crate::Target;
use opreg_common::{CompilerError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load the template for `target` under [`Target::template_name`]
pub fn load_templates(target: Target) -> Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("ts_string", ts_string_filter);
    tera.register_filter("ts_key", ts_key_filter);
    tera.register_filter("rust_string", rust_string_filter);
    tera.register_filter("shouty_snake", shouty_snake_filter);
    tera.register_filter("pascal", pascal_filter);

    let source = match target {
        Target::TypeScript => include_str!("../templates/registry.ts.tera"),
        Target::Rust => include_str!("../templates/registry.rs.tera"),
    };

    tera.add_raw_template(target.template_name(), source)
        .map_err(|e| {
            CompilerError::Generation(format!(
                "Failed to load {} template: {}",
                target.template_name(),
                e
            ))
        })?;

    Ok(tera)
}

fn expect_str<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{} filter expects a string", filter)))
}

/// Single-quoted TypeScript string literal
fn ts_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "ts_string")?;
    Ok(Value::String(ts_string(s)))
}

fn ts_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Object key: bare when it is a valid identifier, quoted otherwise
fn ts_key_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "ts_key")?;
    let mut chars = s.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        Ok(Value::String(s.to_string()))
    } else {
        Ok(Value::String(ts_string(s)))
    }
}

/// Double-quoted Rust string literal
fn rust_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "rust_string")?;
    Ok(Value::String(format!("{:?}", s)))
}

/// `personFields` -> `PERSON_FIELDS`
fn shouty_snake_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "shouty_snake")?;
    Ok(Value::String(shouty_snake(s)))
}

fn shouty_snake(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let should_add_underscore = i > 0
                && (chars[i - 1].is_lowercase()
                    || chars[i - 1].is_ascii_digit()
                    || (i + 1 < chars.len() && chars[i + 1].is_lowercase()));
            if should_add_underscore && !result.ends_with('_') {
                result.push('_');
            }
            result.push(ch);
        } else if ch == '-' || ch == ' ' || ch == '.' || ch == '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.extend(ch.to_uppercase());
        }
    }

    result.trim_matches('_').to_string()
}

/// Upper-case the first letter (`personFields` -> `PersonFields`)
fn pascal_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = expect_str(value, "pascal")?;

    let mut chars = s.chars();
    let pascal = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    Ok(Value::String(pascal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(
        filter: fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>,
        input: &str,
    ) -> String {
        filter(&Value::String(input.to_string()), &HashMap::new())
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_shouty_snake() {
        assert_eq!(shouty_snake("persons"), "PERSONS");
        assert_eq!(shouty_snake("personFields"), "PERSON_FIELDS");
        assert_eq!(shouty_snake("organization-fields"), "ORGANIZATION_FIELDS");
        assert_eq!(shouty_snake("HTTPServer"), "HTTP_SERVER");
    }

    #[test]
    fn test_ts_key() {
        assert_eq!(apply(ts_key_filter, "list"), "list");
        assert_eq!(apply(ts_key_filter, "$get_2"), "$get_2");
        assert_eq!(apply(ts_key_filter, "get-all"), "'get-all'");
        assert_eq!(apply(ts_key_filter, "2fa"), "'2fa'");
    }

    #[test]
    fn test_string_literals_escape() {
        assert_eq!(apply(ts_string_filter, "it's"), r"'it\'s'");
        assert_eq!(apply(rust_string_filter, r#"a"b"#), r#""a\"b""#);
    }

    #[test]
    fn test_pascal() {
        assert_eq!(apply(pascal_filter, "personFields"), "PersonFields");
        assert_eq!(apply(pascal_filter, "get"), "Get");
        assert_eq!(apply(pascal_filter, ""), "");
    }

    #[test]
    fn test_filters_reject_non_strings() {
        assert!(pascal_filter(&Value::Bool(true), &HashMap::new()).is_err());
    }

    #[test]
    fn test_templates_load() {
        assert!(load_templates(Target::TypeScript).is_ok());
        assert!(load_templates(Target::Rust).is_ok());
    }
}

//! Failure taxonomy.
//!
//! `ParseFailure` is what an end user sees for bad arguments; it is always
//! returned, never raised. `ConfigError` and `ShapeMismatch` mean the schema
//! author made a mistake and are kept apart from input errors.

use thiserror::Error;

/// Input-side failure produced by a parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The key has no value and nothing above it made it optional.
    #[error("required field '{key}' not specified")]
    MissingRequired { key: String },

    /// A nested schema had some fields bound before a required one went missing.
    #[error("required field '{field}' for '{prefix}' not specified")]
    FieldIncomplete { prefix: String, field: String },

    /// A value was present but did not convert to its scalar kind.
    #[error("value of '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },
}

impl ParseFailure {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingRequired { key: key.into() }
    }

    /// True only for `MissingRequired` at exactly `key`.
    pub fn is_missing_at(&self, key: &str) -> bool {
        matches!(self, Self::MissingRequired { key: k } if k == key)
    }

    /// Key path the failure points at.
    pub fn key(&self) -> &str {
        match self {
            Self::MissingRequired { key } | Self::Malformed { key, .. } => key,
            Self::FieldIncomplete { prefix, .. } => prefix,
        }
    }
}

/// Schema-definition fault detected while compiling or introspecting a descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("optional of optional is not allowed (at '{path}')")]
    NestedOptional { path: String },

    #[error("elements of a list can't be optional (at '{path}')")]
    OptionalListElement { path: String },

    /// The element never reports `MissingRequired` at its own key, so the list
    /// either never ends or always fails past its last element.
    #[error("list elements of type '{element}' can't mark the end of the list (at '{path}')")]
    ListElementNeverAbsent { path: String, element: String },

    #[error("'{ty}' is not a schema")]
    NotASchema { ty: String },

    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("schema '{schema}' has invalid field name '{field}'")]
    InvalidFieldName { schema: String, field: String },
}

/// A `Schema` impl disagrees with the value tree its descriptor produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {found}{}", at_field(.field))]
pub struct ShapeMismatch {
    pub expected: String,
    pub found: String,
    pub field: Option<String>,
}

fn at_field(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" in field '{name}'"),
        None => String::new(),
    }
}

impl ShapeMismatch {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self { expected: expected.into(), found: found.into(), field: None }
    }

    pub fn in_field(mut self, name: &str) -> Self {
        if self.field.is_none() {
            self.field = Some(name.to_string());
        }
        self
    }
}

/// Everything that can go wrong binding a typed `Schema` in one call.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("invalid schema: {0}")]
    Config(#[from] ConfigError),

    #[error("error raised during parse: {0}")]
    Parse(#[from] ParseFailure),

    #[error("schema type mismatch: {0}")]
    Shape(#[from] ShapeMismatch),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_key_paths() {
        let e = ParseFailure::FieldIncomplete { prefix: "item.0".into(), field: "command".into() };
        assert_eq!(e.to_string(), "required field 'command' for 'item.0' not specified");
        assert_eq!(e.key(), "item.0");
        assert_eq!(ParseFailure::missing("target").to_string(), "required field 'target' not specified");
    }

    #[test]
    fn missing_at_is_exact() {
        let e = ParseFailure::missing("item.0");
        assert!(e.is_missing_at("item.0"));
        assert!(!e.is_missing_at("item.0.service"));
        let m = ParseFailure::Malformed { key: "item.0".into(), reason: "not an integer".into() };
        assert!(!m.is_missing_at("item.0"));
    }

    #[test]
    fn shape_mismatch_names_first_field() {
        let e = ShapeMismatch::new("Integer", "String").in_field("replicas").in_field("outer");
        assert_eq!(e.to_string(), "expected Integer, found String in field 'replicas'");
    }
}

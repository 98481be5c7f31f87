//! Compiled parsers.
//!
//! A `Parser` mirrors the `Descriptor` it was compiled from, one variant per
//! shape. Every `parse` call is a synchronous walk over the immutable parser
//! tree; it owns nothing but the `TypedValue` it returns.
pub mod scalar;
pub mod optional;
pub mod list;
pub mod schema;

use crate::descriptor::ScalarKind;
use crate::error::ParseFailure;
use crate::lookup::Lookup;
use crate::value::TypedValue;

pub use schema::SchemaParser;

#[derive(Debug, Clone)]
pub enum Parser {
    Scalar(ScalarKind),
    Optional(Box<Parser>),
    List(Box<Parser>),
    Schema(SchemaParser),
}

impl Parser {
    /// Parse the value rooted at `key`. An empty key is the top level.
    pub fn parse(&self, key: &str, lookup: &dyn Lookup) -> Result<TypedValue, ParseFailure> {
        match self {
            Parser::Scalar(kind) => scalar::parse(*kind, key, lookup),
            Parser::Optional(inner) => optional::parse(inner, key, lookup),
            Parser::List(element) => list::parse(element, key, lookup),
            Parser::Schema(schema) => schema.parse(key, lookup).map(TypedValue::Struct),
        }
    }
}

/// `prefix.segment`, or just `segment` at the top level.
pub fn child_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

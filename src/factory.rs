//! Descriptor → parser compilation.
//!
//! Structural recursion over a (tree-shaped, acyclic) descriptor. Every shape
//! rule is checked here, so a compiled `Parser` can only fail on input.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::descriptor::{Descriptor, SchemaDescriptor};
use crate::error::{BindError, ConfigError};
use crate::lookup::Lookup;
use crate::parser::{Parser, SchemaParser};
use crate::value::Schema;

static FIELD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern is valid")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    /// Compile a top-level schema. Anything but `StructOf` is rejected.
    pub fn from_schema(&self, descriptor: &Descriptor) -> Result<SchemaParser, ConfigError> {
        let Descriptor::StructOf(schema) = descriptor else {
            return Err(ConfigError::NotASchema { ty: descriptor.describe() });
        };
        let parser = self.compile_schema(schema, &schema.name)?;
        tracing::debug!(schema = %schema.name, fields = parser.fields.len(), "compiled schema parser");
        Ok(parser)
    }

    /// Compile any descriptor.
    pub fn compile(&self, descriptor: &Descriptor) -> Result<Parser, ConfigError> {
        self.compile_at(descriptor, &descriptor.describe())
    }

    fn compile_at(&self, descriptor: &Descriptor, path: &str) -> Result<Parser, ConfigError> {
        match descriptor {
            Descriptor::Scalar(kind) => Ok(Parser::Scalar(*kind)),
            Descriptor::OptionalOf(inner) => {
                if inner.is_optional() {
                    return Err(ConfigError::NestedOptional { path: path.to_string() });
                }
                Ok(Parser::Optional(Box::new(self.compile_at(inner, path)?)))
            }
            Descriptor::ListOf(element) => {
                if element.is_optional() {
                    return Err(ConfigError::OptionalListElement { path: path.to_string() });
                }
                if !reports_own_absence(element) {
                    return Err(ConfigError::ListElementNeverAbsent {
                        path: path.to_string(),
                        element: element.describe(),
                    });
                }
                let element_path = format!("{path}[]");
                Ok(Parser::List(Box::new(self.compile_at(element, &element_path)?)))
            }
            Descriptor::StructOf(schema) => Ok(Parser::Schema(self.compile_schema(schema, path)?)),
        }
    }

    fn compile_schema(&self, schema: &SchemaDescriptor, path: &str) -> Result<SchemaParser, ConfigError> {
        let mut seen = HashSet::new();
        let mut fields = IndexMap::with_capacity(schema.fields.len());
        for field in &schema.fields {
            if !FIELD_NAME.is_match(&field.name) {
                return Err(ConfigError::InvalidFieldName {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
            let field_path = format!("{path}.{}", field.name);
            fields.insert(field.name.clone(), self.compile_at(&field.ty, &field_path)?);
        }
        Ok(SchemaParser { name: schema.name.clone(), fields })
    }

    /// Compile `T`'s descriptor, parse from the top level and extract `T`.
    pub fn bind<T: Schema>(&self, lookup: &dyn Lookup) -> Result<T, BindError> {
        let parser = self.from_schema(&T::descriptor())?;
        let fields = parser.parse("", lookup)?;
        Ok(T::from_fields(fields)?)
    }
}

/// Whether a list element fails with `MissingRequired` at its own key when
/// nothing is supplied for it. Without that the list has no clean end: an
/// element that always parses repeats forever, and one that binds a leading
/// optional before a missing required field ends in `FieldIncomplete`.
fn reports_own_absence(descriptor: &Descriptor) -> bool {
    match descriptor {
        Descriptor::Scalar(_) => true,
        Descriptor::OptionalOf(_) | Descriptor::ListOf(_) => false,
        Descriptor::StructOf(schema) => schema
            .fields
            .first()
            .is_some_and(|first| reports_own_absence(&first.ty)),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

//! Declarative schema shapes.
//!
//! A `Descriptor` is the closed vocabulary shared by the parser factory and the
//! introspector. Building one never fails; illegal shapes (nested optionals,
//! optional list elements, bad field names) are rejected when the descriptor is
//! compiled by `factory::ParserFactory`.

use std::fmt;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Scalar(ScalarKind),
    OptionalOf(Box<Descriptor>),
    /// Element must not be `OptionalOf`: an element is present-and-valid or the list ends.
    ListOf(Box<Descriptor>),
    StructOf(SchemaDescriptor),
}

/// A named schema with its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: Descriptor,
}

/// Accumulates fields for `Descriptor::schema`.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: SchemaDescriptor,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Descriptor {
    pub fn string() -> Self {
        Self::Scalar(ScalarKind::String)
    }
    pub fn integer() -> Self {
        Self::Scalar(ScalarKind::Integer)
    }
    pub fn optional(inner: Descriptor) -> Self {
        Self::OptionalOf(Box::new(inner))
    }
    pub fn list(element: Descriptor) -> Self {
        Self::ListOf(Box::new(element))
    }
    pub fn schema(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: SchemaDescriptor { name: name.into(), fields: Vec::new() },
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::OptionalOf(_))
    }

    pub fn as_schema(&self) -> Option<&SchemaDescriptor> {
        match self {
            Self::StructOf(schema) => Some(schema),
            _ => None,
        }
    }

    /// Compact type string, e.g. `List<Optional<Integer>>` or the schema name.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::OptionalOf(inner) => write!(f, "Optional<{inner}>"),
            Self::ListOf(inner) => write!(f, "List<{inner}>"),
            Self::StructOf(schema) => f.write_str(&schema.name),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Integer => f.write_str("Integer"),
        }
    }
}

impl SchemaDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: Descriptor) -> Self {
        self.schema.fields.push(FieldDescriptor { name: name.into(), ty });
        self
    }
    pub fn build(self) -> Descriptor {
        Descriptor::StructOf(self.schema)
    }
}

impl From<SchemaBuilder> for Descriptor {
    fn from(builder: SchemaBuilder) -> Self {
        builder.build()
    }
}

/// Declare a schema descriptor inline.
///
/// ```
/// use pattern_params::{schema, descriptor::Descriptor};
/// let d = schema!(Deployment {
///     "service": Descriptor::string(),
///     "replicas": Descriptor::optional(Descriptor::integer()),
/// });
/// assert_eq!(d.describe(), "Deployment");
/// ```
#[macro_export]
macro_rules! schema {
    ($name:ident {
        $($key:literal : $value:expr),*
        $(,)?
    }) => {{
        $crate::descriptor::Descriptor::schema(stringify!($name))
            $(.field($key, $value))*
            .build()
    }};
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_nests_wrappers() {
        let d = Descriptor::list(Descriptor::optional(Descriptor::integer()));
        assert_eq!(d.describe(), "List<Optional<Integer>>");
    }

    #[test]
    fn macro_keeps_declaration_order() {
        let d = crate::schema!(Item {
            "service": Descriptor::string(),
            "command": Descriptor::string(),
            "onError": Descriptor::string(),
        });
        let schema = d.as_schema().unwrap();
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["service", "command", "onError"]);
        assert_eq!(schema.name, "Item");
    }

    #[test]
    fn builder_and_macro_agree() {
        let a = Descriptor::schema("Proxy").field("target", Descriptor::string()).build();
        let b = crate::schema!(Proxy { "target": Descriptor::string() });
        assert_eq!(a, b);
        assert!(a.as_schema().unwrap().field("target").is_some());
        assert!(a.as_schema().unwrap().field("missing").is_none());
    }
}

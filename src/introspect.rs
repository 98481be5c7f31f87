//! Field metadata for tooling.
//!
//! Walks a descriptor without any values and reports names, optionality and
//! nesting in declaration order. Serializes to the document the editor
//! integration expects: `{name, optional}` or `{name, fields: [...]}`.

use serde::Serialize;

use crate::descriptor::{Descriptor, FieldDescriptor, SchemaDescriptor};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaField {
    Single { name: String, optional: bool },
    Array { name: String, fields: Vec<SchemaField> },
}

impl SchemaField {
    pub fn name(&self) -> &str {
        match self {
            Self::Single { name, .. } | Self::Array { name, .. } => name,
        }
    }
}

/// Field tree of a top-level schema.
pub fn introspect(descriptor: &Descriptor) -> Result<Vec<SchemaField>, ConfigError> {
    match descriptor {
        Descriptor::StructOf(schema) => schema_fields(schema),
        other => Err(ConfigError::NotASchema { ty: other.describe() }),
    }
}

fn schema_fields(schema: &SchemaDescriptor) -> Result<Vec<SchemaField>, ConfigError> {
    schema.fields.iter().map(field).collect()
}

fn field(field: &FieldDescriptor) -> Result<SchemaField, ConfigError> {
    let name = field.name.clone();
    Ok(match &field.ty {
        Descriptor::Scalar(_) => SchemaField::Single { name, optional: false },
        Descriptor::OptionalOf(_) => SchemaField::Single { name, optional: true },
        Descriptor::ListOf(element) => SchemaField::Array { name, fields: element_fields(element)? },
        Descriptor::StructOf(schema) => SchemaField::Array { name, fields: schema_fields(schema)? },
    })
}

// a scalar element is the value at `name.N` itself, shown as field "0"
fn element_fields(element: &Descriptor) -> Result<Vec<SchemaField>, ConfigError> {
    match element {
        Descriptor::Scalar(_) => Ok(vec![SchemaField::Single { name: "0".into(), optional: false }]),
        Descriptor::StructOf(schema) => schema_fields(schema),
        other => Err(ConfigError::NotASchema { ty: other.describe() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn scalar_optional_and_list_fields() {
        let d = schema!(Tagged {
            "name": Descriptor::string(),
            "note": Descriptor::optional(Descriptor::string()),
            "tags": Descriptor::list(Descriptor::string()),
        });
        let fields = introspect(&d).unwrap();
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            serde_json::json!([
                {"name": "name", "optional": false},
                {"name": "note", "optional": true},
                {"name": "tags", "fields": [{"name": "0", "optional": false}]},
            ])
        );
    }

    #[test]
    fn list_of_schema_recurses_in_order() {
        let d = schema!(Saga {
            "orchestrator": Descriptor::string(),
            "item": Descriptor::list(schema!(Item {
                "service": Descriptor::string(),
                "command": Descriptor::string(),
                "onError": Descriptor::optional(Descriptor::string()),
            })),
        });
        let fields = introspect(&d).unwrap();
        assert_eq!(fields[0].name(), "orchestrator");
        let SchemaField::Array { name, fields: inner } = &fields[1] else {
            panic!("expected array field");
        };
        assert_eq!(name, "item");
        let names: Vec<_> = inner.iter().map(SchemaField::name).collect();
        assert_eq!(names, ["service", "command", "onError"]);
        assert_eq!(inner[2], SchemaField::Single { name: "onError".into(), optional: true });
    }

    #[test]
    fn nested_struct_field_is_flattened_like_an_array() {
        let d = schema!(Root { "target": schema!(Target { "host": Descriptor::string() }) });
        assert_eq!(
            introspect(&d).unwrap(),
            vec![SchemaField::Array {
                name: "target".into(),
                fields: vec![SchemaField::Single { name: "host".into(), optional: false }],
            }]
        );
    }

    #[test]
    fn scalar_list_differs_from_list_of_empty_schema() {
        let scalars = schema!(A { "tags": Descriptor::list(Descriptor::string()) });
        let empties = schema!(B { "tags": Descriptor::list(Descriptor::schema("Empty").build()) });
        assert_eq!(
            introspect(&scalars).unwrap(),
            vec![SchemaField::Array {
                name: "tags".into(),
                fields: vec![SchemaField::Single { name: "0".into(), optional: false }],
            }]
        );
        assert_ne!(introspect(&scalars).unwrap(), introspect(&empties).unwrap());
    }

    #[test]
    fn non_schema_is_a_config_error() {
        assert_eq!(
            introspect(&Descriptor::list(Descriptor::string())).unwrap_err(),
            ConfigError::NotASchema { ty: "List<String>".into() }
        );
    }
}

//! Typed value tree produced by a parse, and extraction into Rust types.

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use crate::descriptor::Descriptor;
use crate::error::ShapeMismatch;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Owned result of one parse call. Serializes to plain JSON
/// (`null` for an absent optional, objects in declaration order).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Optional(Option<Box<TypedValue>>),
    List(Vec<TypedValue>),
    Struct(StructValue),
}

/// A bound schema instance: field name → value, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructValue {
    pub name: String,
    pub fields: IndexMap<String, TypedValue>,
}

/// Conversion out of a `TypedValue`.
pub trait FromValue: Sized {
    fn from_value(value: TypedValue) -> Result<Self, ShapeMismatch>;
}

/// A Rust type with a declared argument shape.
///
/// `descriptor()` must return a `StructOf`; `from_fields` receives the bound
/// instance of exactly that descriptor.
pub trait Schema: Sized {
    fn descriptor() -> Descriptor;
    fn from_fields(fields: StructValue) -> Result<Self, ShapeMismatch>;
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypedValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Integer(_) => "Integer",
            Self::Optional(_) => "Optional",
            Self::List(_) => "List",
            Self::Struct(_) => "Struct",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::Optional(None))
    }
}

impl StructValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: IndexMap::new() }
    }

    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.fields.get(field)
    }

    /// Remove `field` and convert it; the field name is attached to any mismatch.
    pub fn take<T: FromValue>(&mut self, field: &str) -> Result<T, ShapeMismatch> {
        let value = self
            .fields
            .shift_remove(field)
            .ok_or_else(|| ShapeMismatch::new("field", "nothing").in_field(field))?;
        T::from_value(value).map_err(|e| e.in_field(field))
    }
}

impl Serialize for StructValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.fields)
    }
}

impl FromValue for TypedValue {
    fn from_value(value: TypedValue) -> Result<Self, ShapeMismatch> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: TypedValue) -> Result<Self, ShapeMismatch> {
        match value {
            TypedValue::String(s) => Ok(s),
            other => Err(ShapeMismatch::new("String", other.kind_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: TypedValue) -> Result<Self, ShapeMismatch> {
        match value {
            TypedValue::Integer(i) => Ok(i),
            other => Err(ShapeMismatch::new("Integer", other.kind_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: TypedValue) -> Result<Self, ShapeMismatch> {
        match value {
            TypedValue::Optional(None) => Ok(None),
            TypedValue::Optional(Some(inner)) => T::from_value(*inner).map(Some),
            other => Err(ShapeMismatch::new("Optional", other.kind_name())),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: TypedValue) -> Result<Self, ShapeMismatch> {
        match value {
            TypedValue::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ShapeMismatch::new("List", other.kind_name())),
        }
    }
}

/// Implements `FromValue` for a `Schema` type so it can appear as a field,
/// list element or optional.
#[macro_export]
macro_rules! impl_from_value_for_schema {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::value::FromValue for $ty {
                fn from_value(
                    value: $crate::value::TypedValue,
                ) -> ::std::result::Result<Self, $crate::error::ShapeMismatch> {
                    match value {
                        $crate::value::TypedValue::Struct(fields) => {
                            <$ty as $crate::value::Schema>::from_fields(fields)
                        }
                        other => Err($crate::error::ShapeMismatch::new(
                            stringify!($ty),
                            other.kind_name(),
                        )),
                    }
                }
            }
        )+
    };
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

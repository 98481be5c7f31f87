//! Schema-driven parameter binding.
//!
//! A flat table of dotted keys (`item.0.service = orders`) is bound into a
//! typed value tree by a parser compiled from a `Descriptor`; the same
//! descriptor can be introspected into a field tree for tooling.
pub mod descriptor;
pub mod error;
pub mod lookup;
pub mod value;
pub mod parser;
pub mod factory;
pub mod introspect;
pub mod pattern;
pub mod builtin;
pub mod params_file;
pub mod cli;

pub use descriptor::{Descriptor, ScalarKind};
pub use error::{BindError, ConfigError, ParseFailure, ShapeMismatch};
pub use factory::ParserFactory;
pub use introspect::{introspect, SchemaField};
pub use lookup::{Lookup, LookupFn};
pub use pattern::{Pattern, PatternInfo, PatternRegistry};
pub use value::{FromValue, Schema, StructValue, TypedValue};

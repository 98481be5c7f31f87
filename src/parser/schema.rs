use indexmap::IndexMap;

use super::{child_key, Parser};
use crate::error::ParseFailure;
use crate::lookup::Lookup;
use crate::value::StructValue;

/// Parser for one nested schema: field name → sub-parser, in declaration order.
#[derive(Debug, Clone)]
pub struct SchemaParser {
    pub name: String,
    pub fields: IndexMap<String, Parser>,
}

impl SchemaParser {
    /// Fields are attempted in declaration order and the first failure wins.
    ///
    /// A missing required field is classified by progress so far:
    /// - top level (empty prefix): reported as-is;
    /// - nothing bound yet: the whole schema is absent, `MissingRequired(prefix)`;
    /// - something bound: `FieldIncomplete(prefix, field)`.
    pub fn parse(&self, prefix: &str, lookup: &dyn Lookup) -> Result<StructValue, ParseFailure> {
        let mut out = StructValue::new(&self.name);
        let mut partly_specified = false;

        for (field_name, field_parser) in &self.fields {
            let field_key = child_key(prefix, field_name);
            match field_parser.parse(&field_key, lookup) {
                Ok(value) => {
                    out.fields.insert(field_name.clone(), value);
                    partly_specified = true;
                }
                Err(failure) if failure.is_missing_at(&field_key) => {
                    if prefix.is_empty() {
                        return Err(failure);
                    }
                    if partly_specified {
                        return Err(ParseFailure::FieldIncomplete {
                            prefix: prefix.to_string(),
                            field: field_name.clone(),
                        });
                    }
                    return Err(ParseFailure::missing(prefix));
                }
                Err(failure) => return Err(failure),
            }
        }

        Ok(out)
    }
}

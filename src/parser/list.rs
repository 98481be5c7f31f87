use super::{child_key, Parser};
use crate::error::ParseFailure;
use crate::lookup::Lookup;
use crate::value::TypedValue;

/// Dense list: elements at `prefix.0`, `prefix.1`, … until the first index
/// whose own key is missing. Any other element failure aborts the list.
pub fn parse(element: &Parser, prefix: &str, lookup: &dyn Lookup) -> Result<TypedValue, ParseFailure> {
    let mut items = Vec::new();
    loop {
        let element_key = child_key(prefix, &items.len().to_string());
        match element.parse(&element_key, lookup) {
            Ok(item) => items.push(item),
            Err(failure) if failure.is_missing_at(&element_key) => break,
            Err(failure) => return Err(failure),
        }
    }
    tracing::trace!(prefix, len = items.len(), "list ended at first missing index");
    Ok(TypedValue::List(items))
}

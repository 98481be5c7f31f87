use crate::descriptor::ScalarKind;
use crate::error::ParseFailure;
use crate::lookup::Lookup;
use crate::value::TypedValue;

pub fn parse(kind: ScalarKind, key: &str, lookup: &dyn Lookup) -> Result<TypedValue, ParseFailure> {
    let Some(raw) = lookup.get(key) else {
        return Err(ParseFailure::missing(key));
    };
    match kind {
        ScalarKind::String => Ok(TypedValue::String(raw.into_owned())),
        ScalarKind::Integer => raw
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|_| ParseFailure::Malformed {
                key: key.to_string(),
                reason: "not an integer".to_string(),
            }),
    }
}

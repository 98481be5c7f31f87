use super::Parser;
use crate::error::ParseFailure;
use crate::lookup::Lookup;
use crate::value::TypedValue;

/// Only a `MissingRequired` for exactly `key` means "not supplied"; anything
/// deeper (a missing nested leaf, a partial struct, a malformed value) is an
/// error in something that *was* supplied and propagates unchanged.
pub fn parse(inner: &Parser, key: &str, lookup: &dyn Lookup) -> Result<TypedValue, ParseFailure> {
    match inner.parse(key, lookup) {
        Ok(value) => Ok(TypedValue::Optional(Some(Box::new(value)))),
        Err(failure) if failure.is_missing_at(key) => Ok(TypedValue::Optional(None)),
        Err(failure) => Err(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ScalarKind;
    use crate::lookup::params;

    fn optional_integer() -> Parser {
        Parser::Optional(Box::new(Parser::Scalar(ScalarKind::Integer)))
    }

    #[test]
    fn absent_key_is_none() {
        let p = params::<&str, &str, _>([]);
        assert_eq!(parse(&Parser::Scalar(ScalarKind::Integer), "n", &p), Ok(TypedValue::Optional(None)));
    }

    #[test]
    fn present_value_is_some() {
        let p = params([("n", "5")]);
        let v = optional_integer().parse("n", &p).unwrap();
        assert_eq!(v, TypedValue::Optional(Some(Box::new(TypedValue::Integer(5)))));
    }

    #[test]
    fn malformed_is_never_swallowed() {
        let p = params([("n", "five")]);
        let alone = Parser::Scalar(ScalarKind::Integer).parse("n", &p).unwrap_err();
        let wrapped = optional_integer().parse("n", &p).unwrap_err();
        assert_eq!(alone, wrapped);
    }
}

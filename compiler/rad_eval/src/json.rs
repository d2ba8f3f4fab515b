//! Converting between [`Value`] and JSON.
//!
//! Object key order is preserved both ways, and integers that fit in an
//! `i64` stay exact ints rather than passing through `f64`.

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::value::{RadMap, Value};

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Cannot convert {type_name} to JSON")]
    Unsupported { type_name: &'static str },
}

/// Parse JSON text into a value.
///
/// # Errors
///
/// The text is not valid JSON.
pub fn parse(text: &str) -> Result<Value, JsonError> {
    let json: Json = serde_json::from_str(text)?;
    Ok(from_json(json))
}

pub fn from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => number(&n),
        Json::String(s) => Value::str(s),
        Json::Array(items) => Value::list(items.into_iter().map(from_json).collect()),
        Json::Object(fields) => {
            let map = RadMap::new();
            for (k, v) in fields {
                map.set_str(&k, from_json(v));
            }
            Value::Map(map)
        }
    }
}

fn number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Int(i);
    }
    match n.as_f64() {
        Some(f) => Value::Float(f),
        // Out of f64 range; arbitrary precision keeps the digits.
        None => Value::str(n.to_string()),
    }
}

/// Convert a value to JSON. Map keys become their printable form.
///
/// # Errors
///
/// Functions have no JSON form.
pub fn to_json(value: &Value) -> Result<Json, JsonError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Str(s) => Json::String(s.plain().into_owned()),
        Value::Error(e) => Json::String(e.message.plain().into_owned()),
        Value::List(list) => Json::Array(
            list.borrow()
                .iter()
                .map(to_json)
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(map) => {
            let mut fields = JsonMap::new();
            for (k, v) in map.borrow().iter() {
                fields.insert(k.to_printable(false), to_json(v)?);
            }
            Json::Object(fields)
        }
        Value::Fn(_) => {
            return Err(JsonError::Unsupported {
                type_name: value.type_name(),
            })
        }
    })
}

/// Compact JSON text.
///
/// # Errors
///
/// See [`to_json`].
pub fn to_string(value: &Value) -> Result<String, JsonError> {
    Ok(serde_json::to_string(&to_json(value)?)?)
}

/// Two-space indented JSON text.
///
/// # Errors
///
/// See [`to_json`].
pub fn to_string_pretty(value: &Value) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(&to_json(value)?)?)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_object_order_preserved() {
        let value = parse(r#"{"b": 1, "a": [true, null, 2.5]}"#).unwrap();
        assert_eq!(value.repr(false), r#"{ "b": 1, "a": [ true, null, 2.5 ] }"#);
        assert_eq!(to_string(&value).unwrap(), r#"{"b":1,"a":[true,null,2.5]}"#);
    }

    #[test]
    fn test_large_int_stays_exact() {
        let value = parse("9007199254740993").unwrap();
        assert!(matches!(value, Value::Int(9_007_199_254_740_993)));
    }

    #[test]
    fn test_pretty_output() {
        let value = parse(r#"{"id": 1, "tags": ["x"]}"#).unwrap();
        assert_eq!(
            to_string_pretty(&value).unwrap(),
            "{\n  \"id\": 1,\n  \"tags\": [\n    \"x\"\n  ]\n}"
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse("{nope"), Err(JsonError::Parse(_))));
    }

    #[test]
    fn test_int_map_keys_become_strings() {
        let map = RadMap::new();
        map.insert(Value::Int(1), Value::str("one"));
        assert_eq!(to_string(&Value::Map(map)).unwrap(), r#"{"1":"one"}"#);
    }
}

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::format::{FormatError, from_epoch_millis, parse_iso};
use crate::value::{Value, ValueType};

/// The name of a node's JSON kind, for error messages.
pub(super) fn json_kind(node: &JsonValue) -> &'static str {
    match node {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Converts a node without a declared type.
///
/// Integral numbers that fit `i64` become [`Value::Int`], other numbers
/// [`Value::Float`], objects [`Value::Map`].
pub(super) fn natural(node: &JsonValue) -> Value {
    match node {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(natural).collect()),
        JsonValue::Object(entries) => Value::Map(
            entries
                .iter()
                .map(|(key, node)| (key.clone(), natural(node)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Converts a node to a scalar type, with lenient coercion.
///
/// `Ok(None)` means the node has the wrong shape.
pub(super) fn coerce(node: &JsonValue, ty: &ValueType) -> Result<Option<Value>, FormatError> {
    if node.is_null() {
        return Ok(Some(ty.default_value()));
    }

    let value = match (ty, node) {
        (ValueType::Bool, JsonValue::Bool(b)) => Some(Value::Bool(*b)),
        (ValueType::Bool, JsonValue::String(s)) => match s.as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },

        (ValueType::Int, JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => Some(Value::Int(i)),
            None => n.as_f64().and_then(truncate).map(Value::Int),
        },
        (ValueType::Int, JsonValue::String(s)) => s.trim().parse().ok().map(Value::Int),

        (ValueType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float),
        (ValueType::Float, JsonValue::String(s)) => s.trim().parse().ok().map(Value::Float),

        (ValueType::String, JsonValue::String(s)) => Some(Value::String(s.clone())),
        (ValueType::String, JsonValue::Number(n)) => Some(Value::String(n.to_string())),
        (ValueType::String, JsonValue::Bool(b)) => Some(Value::String(b.to_string())),

        (ValueType::DateTime, JsonValue::String(s)) => Some(Value::DateTime(parse_iso(s)?)),
        (ValueType::DateTime, JsonValue::Number(n)) => match n.as_i64() {
            Some(millis) => Some(Value::DateTime(from_epoch_millis(millis)?)),
            None => None,
        },

        _ => None,
    };
    Ok(value)
}

/// Drops the fraction of `f`; `None` outside the `i64` range.
fn truncate(f: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    (f.is_finite() && (-BOUND..BOUND).contains(&f)).then(|| f.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{coerce, natural};
    use crate::value::{Value, ValueType};

    #[test]
    fn lenient_scalars() {
        assert_eq!(coerce(&json!("42"), &ValueType::Int), Ok(Some(Value::Int(42))));
        assert_eq!(coerce(&json!(3), &ValueType::Float), Ok(Some(Value::Float(3.0))));
        assert_eq!(coerce(&json!(2.9), &ValueType::Int), Ok(Some(Value::Int(2))));
        assert_eq!(coerce(&json!("false"), &ValueType::Bool), Ok(Some(Value::Bool(false))));
        assert_eq!(coerce(&json!(7), &ValueType::String), Ok(Some(Value::from("7"))));
        assert_eq!(coerce(&json!(null), &ValueType::Int), Ok(Some(Value::Int(0))));
    }

    #[test]
    fn mismatches() {
        assert_eq!(coerce(&json!("many"), &ValueType::Int), Ok(None));
        assert_eq!(coerce(&json!([1]), &ValueType::String), Ok(None));
        assert_eq!(coerce(&json!({}), &ValueType::Bool), Ok(None));
    }

    #[test]
    fn out_of_range_integers() {
        assert_eq!(coerce(&json!(u64::MAX), &ValueType::Int), Ok(None));
        assert_eq!(coerce(&json!(1e300), &ValueType::Int), Ok(None));
        assert_eq!(coerce(&json!(-1e19), &ValueType::Int), Ok(None));
        assert_eq!(coerce(&json!(-2.5), &ValueType::Int), Ok(Some(Value::Int(-2))));
        assert_eq!(coerce(&json!(i64::MIN), &ValueType::Int), Ok(Some(Value::Int(i64::MIN))));
    }

    #[test]
    fn date_times() {
        let parsed = coerce(&json!("2021-11-05T02:30:00"), &ValueType::DateTime).unwrap().unwrap();
        assert_eq!(parsed.as_datetime().unwrap().to_string(), "2021-11-05 02:30:00");

        let epoch = coerce(&json!(0), &ValueType::DateTime).unwrap().unwrap();
        assert_eq!(epoch.as_datetime().unwrap().to_string(), "1970-01-01 00:00:00");

        assert!(coerce(&json!("yesterday"), &ValueType::DateTime).is_err());
    }

    #[test]
    fn natural_values() {
        assert_eq!(natural(&json!(1)), Value::Int(1));
        assert_eq!(natural(&json!(1.5)), Value::Float(1.5));
        let map = natural(&json!({ "a": [true] }));
        assert_eq!(map.as_map().unwrap()["a"], Value::List(vec![Value::Bool(true)]));
    }
}

// src/utils/json.rs

//! Lenient field readers for the JSON payloads returned by AJAX endpoints.
//!
//! The game encodes numbers inconsistently: the same field may arrive as
//! `12`, `"12"` or `"1.234"` depending on the endpoint and version. Payload
//! structs name these functions in `#[serde(deserialize_with = "...")]` so
//! a field of an unexpected shape reads as its zero value instead of
//! failing the whole payload.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::TechId;
use crate::utils::number::parse_int;

/// Integer from a number, numeric string, locale-formatted string or boolean.
///
/// # Examples
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Amount {
///     #[serde(default, deserialize_with = "ogextract::utils::json::int")]
///     amount: i64,
/// }
///
/// let read = |raw: &str| serde_json::from_str::<Amount>(raw).unwrap().amount;
/// assert_eq!(read(r#"{"amount": 12}"#), 12);
/// assert_eq!(read(r#"{"amount": "1.234"}"#), 1_234);
/// assert_eq!(read(r#"{"amount": null}"#), 0);
/// assert_eq!(read("{}"), 0);
/// ```
pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(int_value(&Value::deserialize(deserializer)?))
}

/// Boolean from `true`, `1`, `"1"` or `"true"`.
pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// String content, or the textual form of a number.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Levels of a `{"<id>": level}` object. Anything else, and keys that are
/// not ids, read as nothing.
pub fn levels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<TechId, i64>, D::Error> {
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .iter()
        .filter_map(|(id, level)| Some((id.parse().ok()?, int_value(level))))
        .collect())
}

/// Any `T`, or its default when the value has another shape (an empty
/// player sent as `[]`, a list sent as `false`).
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(T::deserialize(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn int_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "int")]
        count: i64,
        #[serde(deserialize_with = "boolean")]
        flag: bool,
        #[serde(deserialize_with = "string")]
        name: String,
        #[serde(deserialize_with = "levels")]
        levels: BTreeMap<TechId, i64>,
        #[serde(deserialize_with = "or_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_lenient_fields() {
        let sample: Sample = serde_json::from_str(
            r#"{"count": "1.234", "flag": "1", "name": 42, "levels": {"401": "1.200", "x": 3}, "tags": false}"#,
        )
        .unwrap();
        assert_eq!(sample.count, 1_234);
        assert!(sample.flag);
        assert_eq!(sample.name, "42");
        assert_eq!(sample.levels.get(&401), Some(&1_200));
        assert_eq!(sample.levels.len(), 1);
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_odd_shapes_read_as_zero() {
        let sample: Sample =
            serde_json::from_str(r#"{"count": [1], "flag": "yes", "name": null, "levels": []}"#).unwrap();
        assert_eq!(sample.count, 0);
        assert!(!sample.flag);
        assert!(sample.name.is_empty());
        assert!(sample.levels.is_empty());

        let floats: Sample = serde_json::from_str(r#"{"count": 2.9}"#).unwrap();
        assert_eq!(floats.count, 2);
    }
}

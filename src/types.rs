use std::fmt;
use std::hash::{Hash, Hasher};

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value;

/// One flat row: field name to value, in input field order.
pub type Record = serde_json::Map<String, Value>;

/// Text used for the group of records that lack the grouping key.
pub const MISSING_KEY_LABEL: &str = "undefined";

/// The value a record holds under the grouping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValue {
    Present(Value),
    /// Sentinel for records without the grouping key.
    Missing,
}

impl GroupValue {
    /// Look up `key` in `record`.
    pub fn of(record: &Record, key: &str) -> Self {
        match record.get(key) {
            Some(v) => GroupValue::Present(v.clone()),
            None => GroupValue::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, GroupValue::Missing)
    }

    /// Text used as the JSON object key and in human output.
    pub fn label(&self) -> String {
        match self {
            GroupValue::Present(Value::String(s)) => s.clone(),
            GroupValue::Present(other) => other.to_string(),
            GroupValue::Missing => MISSING_KEY_LABEL.to_string(),
        }
    }
}

impl From<&str> for GroupValue {
    fn from(s: &str) -> Self {
        GroupValue::Present(Value::String(s.to_string()))
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Present(Value::String(s)) => f.write_str(s),
            GroupValue::Present(other) => write!(f, "{}", other),
            GroupValue::Missing => f.write_str(MISSING_KEY_LABEL),
        }
    }
}

impl Hash for GroupValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            GroupValue::Present(v) => {
                0u8.hash(state);
                hash_value(v, state);
            }
            GroupValue::Missing => 1u8.hash(state),
        }
    }
}

// Must agree with `Value`'s `PartialEq`. Object equality ignores field order,
// so objects only contribute their length.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            if let Some(u) = n.as_u64() {
                0u8.hash(state);
                u.hash(state);
            } else if let Some(i) = n.as_i64() {
                1u8.hash(state);
                i.hash(state);
            } else if let Some(f) = n.as_f64() {
                2u8.hash(state);
                // 0.0 == -0.0
                let bits = if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() };
                bits.hash(state);
            }
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
        }
    }
}

/// What to do with a record that lacks the grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// Group it under [`GroupValue::Missing`].
    #[default]
    Sentinel,
    /// Fail the whole call with `RegroupError::InvalidRecord`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Default,
    Short,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn of_present_and_missing() {
        let r = record(json!({"make": "ford", "year": 2012}));
        assert_eq!(GroupValue::of(&r, "make"), GroupValue::from("ford"));
        assert_eq!(GroupValue::of(&r, "year"), GroupValue::Present(json!(2012)));
        assert_eq!(GroupValue::of(&r, "color"), GroupValue::Missing);
    }

    #[test]
    fn labels() {
        assert_eq!(GroupValue::from("ford").label(), "ford");
        assert_eq!(GroupValue::Present(json!(2012)).label(), "2012");
        assert_eq!(GroupValue::Present(json!(true)).label(), "true");
        assert_eq!(GroupValue::Present(Value::Null).label(), "null");
        assert_eq!(GroupValue::Missing.label(), "undefined");
        assert_eq!(GroupValue::Missing.to_string(), "undefined");
    }

    #[test]
    fn string_and_number_are_distinct() {
        let mut set = HashSet::new();
        set.insert(GroupValue::from("2012"));
        set.insert(GroupValue::Present(json!(2012)));
        set.insert(GroupValue::from("undefined"));
        set.insert(GroupValue::Missing);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn equal_values_hash_equal() {
        let mut set = HashSet::new();
        set.insert(GroupValue::Present(json!({"a": 1, "b": 2})));
        set.insert(GroupValue::Present(json!({"b": 2, "a": 1})));
        set.insert(GroupValue::Present(json!(-3)));
        set.insert(GroupValue::Present(json!(-3)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn signed_zero_is_one_group_value() {
        let zero: Value = serde_json::from_str("0.0").unwrap();
        let neg_zero: Value = serde_json::from_str("-0.0").unwrap();
        let neg_int_zero: Value = serde_json::from_str("-0").unwrap();
        assert_eq!(zero, neg_zero);

        let mut set = HashSet::new();
        set.insert(GroupValue::Present(zero));
        set.insert(GroupValue::Present(neg_zero));
        set.insert(GroupValue::Present(neg_int_zero));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn is_missing_only_for_sentinel() {
        assert!(GroupValue::Missing.is_missing());
        assert!(!GroupValue::Present(Value::Null).is_missing());
        assert!(!GroupValue::from("undefined").is_missing());
    }

    #[test]
    fn output_format_from_toml_text() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let w: Wrapper = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(w.format, OutputFormat::Json);
    }
}

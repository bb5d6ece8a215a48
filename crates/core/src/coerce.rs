//! Shape coercion for untrusted slide content.
//!
//! Every function here is total: a value of the requested shape always comes
//! back, falling back to the caller's default when nothing usable is found.
//! Strings wrapped in objects are unwrapped through a fixed, ordered list of
//! carrier keys so that every field goes through the same precedence.

use crate::config::{DeckConfig, DEFAULT_CARRIER_KEYS, DEFAULT_MAX_NESTING_DEPTH};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Currency symbols, thousands separators, percent signs, and whitespace.
static NUMERIC_NOISE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,$€£¥%]").unwrap());

static DEFAULT_COERCER: LazyLock<Coercer> = LazyLock::new(Coercer::new);

/// Coerces arbitrary JSON values into strings, string lists, and numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coercer {
    /// Keys searched in order for a wrapped string.
    carrier_keys: Vec<String>,
    /// Values nested deeper than this resolve to the fallback.
    max_depth: usize,
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new()
    }
}

impl Coercer {
    /// Create a coercer with the default carrier-key order.
    pub fn new() -> Self {
        Self {
            carrier_keys: DEFAULT_CARRIER_KEYS.iter().map(|k| k.to_string()).collect(),
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Create a coercer from configuration.
    pub fn from_config(config: &DeckConfig) -> Self {
        Self::new()
            .with_carrier_keys(config.carrier_keys.iter())
            .with_max_depth(config.max_nesting_depth)
    }

    /// Replace the carrier-key priority order.
    pub fn with_carrier_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.carrier_keys = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        self
    }

    /// Set the nesting bound (at least 1).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Force a value into a single trimmed string.
    ///
    /// - strings are trimmed; blank strings and `null` give `fallback`
    /// - numbers and booleans are stringified
    /// - arrays use their first element only
    /// - objects yield the first carrier key holding a non-blank string, else
    ///   the coercion of their first property
    pub fn coerce_to_string(&self, value: &Value, fallback: &str) -> String {
        match self.string_at_depth(value, 0) {
            Some(text) => text,
            None => {
                if !value.is_null() {
                    log::debug!("No string found in {}, using fallback", kind_of(value));
                }
                fallback.to_string()
            }
        }
    }

    /// Force a value into a list of non-blank strings, preserving order.
    ///
    /// A single non-array value becomes a one-element list. An empty result
    /// gives `fallback`.
    pub fn coerce_to_string_list(&self, value: &Value, fallback: &[&str]) -> Vec<String> {
        let items: Vec<String> = match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| self.string_at_depth(item, 0))
                .collect(),
            Value::Null => Vec::new(),
            other => self.string_at_depth(other, 0).into_iter().collect(),
        };

        if items.is_empty() {
            fallback.iter().map(|s| s.to_string()).collect()
        } else {
            items
        }
    }

    /// Force a value into a finite number.
    ///
    /// Numeric strings are parsed after stripping currency symbols, commas,
    /// and percent signs. Anything else gives `fallback`.
    pub fn coerce_to_number(&self, value: &Value, fallback: f64) -> f64 {
        parse_number(value).unwrap_or(fallback)
    }

    /// Coerce a value into a list of records.
    ///
    /// `coerce_item` turns one raw element into a record, returning `None`
    /// when the element reduces to an entirely empty record; such elements
    /// are dropped. A non-array value is treated as a single element.
    /// Nothing usable gives an empty list.
    pub fn coerce_record_list<F>(&self, value: &Value, mut coerce_item: F) -> Vec<Map<String, Value>>
    where
        F: FnMut(&Value) -> Option<Map<String, Value>>,
    {
        match value {
            Value::Array(items) => items.iter().filter_map(&mut coerce_item).collect(),
            Value::Null => Vec::new(),
            other => coerce_item(other).into_iter().collect(),
        }
    }

    /// The string found in `value`, or None when only the fallback would do.
    pub fn find_string(&self, value: &Value) -> Option<String> {
        self.string_at_depth(value, 0)
    }

    fn string_at_depth(&self, value: &Value, depth: usize) -> Option<String> {
        if depth >= self.max_depth {
            return None;
        }

        match value {
            Value::Null => None,
            Value::String(s) => non_blank(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => items
                .first()
                .and_then(|first| self.string_at_depth(first, depth + 1)),
            Value::Object(map) => {
                let carried = self.carrier_keys.iter().find_map(|key| match map.get(key) {
                    Some(Value::String(s)) => non_blank(s),
                    _ => None,
                });
                carried.or_else(|| {
                    map.values()
                        .next()
                        .and_then(|first| self.string_at_depth(first, depth + 1))
                })
            }
        }
    }
}

/// Parse a finite number out of a JSON number or a numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = NUMERIC_NOISE_REGEX.replace_all(s, "");
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// True for null, blank strings, and containers holding only blank values.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        Value::Object(map) => map.values().all(is_blank),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Coerce with the default carrier-key order.
pub fn coerce_to_string(value: &Value, fallback: &str) -> String {
    DEFAULT_COERCER.coerce_to_string(value, fallback)
}

/// Coerce with the default carrier-key order.
pub fn coerce_to_string_list(value: &Value, fallback: &[&str]) -> Vec<String> {
    DEFAULT_COERCER.coerce_to_string_list(value, fallback)
}

pub fn coerce_to_number(value: &Value, fallback: f64) -> f64 {
    DEFAULT_COERCER.coerce_to_number(value, fallback)
}

/// Coerce with the default carrier-key order.
pub fn coerce_record_list<F>(value: &Value, coerce_item: F) -> Vec<Map<String, Value>>
where
    F: FnMut(&Value) -> Option<Map<String, Value>>,
{
    DEFAULT_COERCER.coerce_record_list(value, coerce_item)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "blank string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_passthrough_is_trimmed() {
        assert_eq!(coerce_to_string(&json!("  Q3 Sales "), "x"), "Q3 Sales");
        assert_eq!(coerce_to_string(&json!("Already clean"), "x"), "Already clean");
    }

    #[test]
    fn test_blank_and_null_use_fallback() {
        assert_eq!(coerce_to_string(&json!(null), "Slide 1"), "Slide 1");
        assert_eq!(coerce_to_string(&json!(""), "Slide 1"), "Slide 1");
        assert_eq!(coerce_to_string(&json!("   "), "Slide 1"), "Slide 1");
        assert_eq!(coerce_to_string(&json!({}), "Slide 1"), "Slide 1");
        assert_eq!(coerce_to_string(&json!([]), "Slide 1"), "Slide 1");
    }

    #[test]
    fn test_scalars_are_stringified() {
        assert_eq!(coerce_to_string(&json!(42), ""), "42");
        assert_eq!(coerce_to_string(&json!(2.5), ""), "2.5");
        assert_eq!(coerce_to_string(&json!(true), ""), "true");
    }

    #[test]
    fn test_each_carrier_key_unwraps() {
        for key in DEFAULT_CARRIER_KEYS {
            let mut map = Map::new();
            map.insert(key.to_string(), json!("found"));
            assert_eq!(coerce_to_string(&Value::Object(map), ""), "found", "key {key}");
        }
    }

    #[test]
    fn test_default_carrier_precedence() {
        // Property order is deliberately the reverse of the priority order.
        let value = json!({"number": "7", "amount": "6", "label": "5", "name": "4",
                           "content": "3", "value": "2", "text": "1"});
        assert_eq!(coerce_to_string(&value, ""), "1");

        let value = json!({"label": "Cost", "value": "30%"});
        assert_eq!(coerce_to_string(&value, ""), "30%");

        let value = json!({"amount": "$5,000", "name": "Starter"});
        assert_eq!(coerce_to_string(&value, ""), "Starter");
    }

    #[test]
    fn test_custom_carrier_precedence() {
        let coercer = Coercer::new().with_carrier_keys(["label", "value"]);
        let value = json!({"value": "30%", "label": "Cost", "text": "ignored"});
        assert_eq!(coercer.coerce_to_string(&value, ""), "Cost");

        // "text" is no longer a carrier; the first property wins instead.
        let value = json!({"text": "first", "other": "second"});
        assert_eq!(coercer.coerce_to_string(&value, ""), "first");
    }

    #[test]
    fn test_blank_carrier_is_skipped() {
        let value = json!({"text": "  ", "value": "Kickoff"});
        assert_eq!(coerce_to_string(&value, ""), "Kickoff");
    }

    #[test]
    fn test_object_without_carrier_uses_first_property() {
        let value = json!({"headline": {"text": "Nested"}, "other": "later"});
        assert_eq!(coerce_to_string(&value, ""), "Nested");

        let value = json!({"empty": {}, "other": "later"});
        assert_eq!(coerce_to_string(&value, "fb"), "fb");
    }

    #[test]
    fn test_non_string_carrier_falls_through_to_first_property() {
        let value = json!({"label": {"text": "Cost"}, "value": {"number": "30%"}});
        assert_eq!(coerce_to_string(&value, ""), "Cost");
        assert_eq!(coerce_to_string(&value["value"], ""), "30%");
    }

    #[test]
    fn test_array_uses_first_element() {
        assert_eq!(coerce_to_string(&json!(["one", "two"]), ""), "one");
        assert_eq!(coerce_to_string(&json!([{"text": "wrapped"}, "two"]), ""), "wrapped");
        assert_eq!(coerce_to_string(&json!([["deep"]]), ""), "deep");
        assert_eq!(coerce_to_string(&json!([null, "two"]), "fb"), "fb");
    }

    #[test]
    fn test_depth_limit_gives_fallback() {
        let coercer = Coercer::new().with_max_depth(3);
        assert_eq!(coercer.coerce_to_string(&json!([["ok"]]), "fb"), "ok");
        assert_eq!(coercer.coerce_to_string(&json!([[["too deep"]]]), "fb"), "fb");

        let mut deep = json!("bottom");
        for _ in 0..200 {
            deep = json!({ "x": deep });
        }
        assert_eq!(coerce_to_string(&deep, "fb"), "fb");
    }

    #[test]
    fn test_string_list_from_mixed_array() {
        let value = json!([{"text": "Increase productivity"}, "Reduce costs", {"value": "Improve quality"}]);
        assert_eq!(
            coerce_to_string_list(&value, &[]),
            vec!["Increase productivity", "Reduce costs", "Improve quality"]
        );
    }

    #[test]
    fn test_string_list_drops_blank_items() {
        let value = json!(["a", "", "  ", null, {}, "b", 3]);
        assert_eq!(coerce_to_string_list(&value, &[]), vec!["a", "b", "3"]);
    }

    #[test]
    fn test_string_list_wraps_single_value() {
        assert_eq!(coerce_to_string_list(&json!("solo"), &[]), vec!["solo"]);
        assert_eq!(coerce_to_string_list(&json!({"text": "wrapped"}), &[]), vec!["wrapped"]);
    }

    #[test]
    fn test_string_list_fallback() {
        assert_eq!(coerce_to_string_list(&json!(null), &["none"]), vec!["none"]);
        assert_eq!(coerce_to_string_list(&json!([]), &["none"]), vec!["none"]);
        assert_eq!(coerce_to_string_list(&json!(["", null]), &["none"]), vec!["none"]);
        assert!(coerce_to_string_list(&json!(null), &[]).is_empty());
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(coerce_to_number(&json!(12.5), 0.0), 12.5);
        assert_eq!(coerce_to_number(&json!("30%"), 0.0), 30.0);
        assert_eq!(coerce_to_number(&json!("$1,250,000"), 0.0), 1_250_000.0);
        assert_eq!(coerce_to_number(&json!(" € 99.90 "), 0.0), 99.9);
        assert_eq!(coerce_to_number(&json!("-4"), 0.0), -4.0);
    }

    #[test]
    fn test_number_fallback() {
        assert_eq!(coerce_to_number(&json!("about ten"), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!(""), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!("%"), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!("NaN"), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!("inf"), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!(true), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!({"number": "5"}), 1.0), 1.0);
        assert_eq!(coerce_to_number(&json!(null), 1.0), 1.0);
    }

    #[test]
    fn test_record_list_drops_empty_records() {
        let value = json!([{"name": "a"}, {}, {"name": "b"}]);
        let records = coerce_record_list(&value, |item| {
            let name = coerce_to_string(&item["name"], "");
            if name.is_empty() {
                None
            } else {
                let mut map = Map::new();
                map.insert("name".into(), json!(name));
                Some(map)
            }
        });
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], "b");
    }

    #[test]
    fn test_record_list_wraps_single_object() {
        let records = coerce_record_list(&json!({"name": "solo"}), |item| item.as_object().cloned());
        assert_eq!(records.len(), 1);

        let records = coerce_record_list(&json!(null), |item| item.as_object().cloned());
        assert!(records.is_empty());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!(" ")));
        assert!(is_blank(&json!([[], {"a": ""}])));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!({"a": "x"})));
    }
}

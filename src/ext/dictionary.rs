use chrono::{DateTime, FixedOffset, NaiveTime};
use serde_json::json;

use crate::ext::string::StrExt;
use crate::value::{
    value_as_bool, value_as_date, value_as_float, value_as_integer, value_as_time, value_description,
    Dictionary, TimeInterval, Value,
};

/// Extension trait for dictionaries: defaulted typed reads and
/// default-aware writes.
///
/// Null values are treated exactly like missing keys by every reader.
pub trait DictionaryExt {
    /// The value for `key` unless it is missing or null.
    fn non_null(&self, key: &str) -> Option<&Value>;

    /// The text of the value for `key`, or an empty string.
    fn string_or_empty(&self, key: &str) -> String;

    fn has_key(&self, key: &str) -> bool;

    fn sorted_keys(&self) -> Vec<String>;

    fn bool_for_key(&self, key: &str) -> bool;
    fn integer_for_key(&self, key: &str) -> i64;
    fn float_for_key(&self, key: &str) -> f64;
    fn time_interval_for_key(&self, key: &str) -> TimeInterval;
    fn date_for_key(&self, key: &str) -> Option<DateTime<FixedOffset>>;
    fn time_for_key(&self, key: &str) -> Option<NaiveTime>;

    fn description_for_key(&self, key: &str) -> String;
    /// Length in characters of the text for `key`.
    fn string_length_for_key(&self, key: &str) -> usize;
    fn contains_something_for_key(&self, key: &str) -> bool;

    fn value_or_bool(&self, key: &str, default: bool) -> Value;
    fn value_or_integer(&self, key: &str, default: i64) -> Value;
    fn value_or(&self, key: &str, default: Value) -> Value;

    /// First key (in iteration order) whose value equals `value`.
    fn key_for_value(&self, value: &Value) -> Option<&str>;

    fn set_bool(&mut self, key: &str, value: bool);
    fn set_integer(&mut self, key: &str, value: i64);
    fn set_float(&mut self, key: &str, value: f64);
    fn set_time_interval(&mut self, key: &str, value: TimeInterval);

    /// Stores `default` only when `key` has no value yet.
    fn set_default_value(&mut self, key: &str, default: Value);

    /// Stores `value` unless it equals `default` (or is absent), in which
    /// case the key is removed so readers fall back to the default.
    fn set_value_or_default(&mut self, key: &str, value: Option<Value>, default: &Value);

    /// Stores `value`; an absent value removes the key only when
    /// `remove_if_none` is set.
    fn set_value_remove_if_none(&mut self, key: &str, value: Option<Value>, remove_if_none: bool);

    /// Replaces every value equal to `old` with `new`.
    fn replace_value(&mut self, old: &Value, new: &Value);
}

impl DictionaryExt for Dictionary {
    fn non_null(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| !value.is_null())
    }

    fn string_or_empty(&self, key: &str) -> String {
        self.non_null(key).map(value_description).unwrap_or_default()
    }

    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn bool_for_key(&self, key: &str) -> bool {
        self.non_null(key).and_then(value_as_bool).unwrap_or(false)
    }

    fn integer_for_key(&self, key: &str) -> i64 {
        self.non_null(key).and_then(value_as_integer).unwrap_or(0)
    }

    fn float_for_key(&self, key: &str) -> f64 {
        self.non_null(key).and_then(value_as_float).unwrap_or(0.0)
    }

    fn time_interval_for_key(&self, key: &str) -> TimeInterval {
        self.float_for_key(key)
    }

    fn date_for_key(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        self.non_null(key).and_then(value_as_date)
    }

    fn time_for_key(&self, key: &str) -> Option<NaiveTime> {
        self.non_null(key).and_then(value_as_time)
    }

    fn description_for_key(&self, key: &str) -> String {
        self.string_or_empty(key)
    }

    fn string_length_for_key(&self, key: &str) -> usize {
        self.string_or_empty(key).chars().count()
    }

    fn contains_something_for_key(&self, key: &str) -> bool {
        self.string_or_empty(key).contains_something()
    }

    fn value_or_bool(&self, key: &str, default: bool) -> Value {
        self.value_or(key, Value::Bool(default))
    }

    fn value_or_integer(&self, key: &str, default: i64) -> Value {
        self.value_or(key, json!(default))
    }

    fn value_or(&self, key: &str, default: Value) -> Value {
        self.non_null(key).cloned().unwrap_or(default)
    }

    fn key_for_value(&self, value: &Value) -> Option<&str> {
        self.iter().find(|(_, v)| *v == value).map(|(k, _)| k.as_str())
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.insert(key.to_string(), Value::Bool(value));
    }

    fn set_integer(&mut self, key: &str, value: i64) {
        self.insert(key.to_string(), json!(value));
    }

    fn set_float(&mut self, key: &str, value: f64) {
        self.insert(key.to_string(), json!(value));
    }

    fn set_time_interval(&mut self, key: &str, value: TimeInterval) {
        self.set_float(key, value);
    }

    fn set_default_value(&mut self, key: &str, default: Value) {
        if self.non_null(key).is_none() {
            self.insert(key.to_string(), default);
        }
    }

    fn set_value_or_default(&mut self, key: &str, value: Option<Value>, default: &Value) {
        match value {
            Some(value) if value != *default && !value.is_null() => {
                self.insert(key.to_string(), value);
            }
            _ => {
                self.remove(key);
            }
        }
    }

    fn set_value_remove_if_none(&mut self, key: &str, value: Option<Value>, remove_if_none: bool) {
        match value {
            Some(value) => {
                self.insert(key.to_string(), value);
            }
            None if remove_if_none => {
                self.remove(key);
            }
            None => {}
        }
    }

    fn replace_value(&mut self, old: &Value, new: &Value) {
        for value in self.values_mut().filter(|v| **v == *old) {
            *value = new.clone();
        }
    }
}

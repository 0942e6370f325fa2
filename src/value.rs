//! Dynamic values shared by the dictionary, record and preferences helpers.
//!
//! `Value` plays the part of a property-list object: anything that can be
//! stored in a dictionary, an array or a preferences file.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};

use crate::ext::date::date_with_string;
use crate::ext::string::finder_compare;

pub use serde_json::Value;

/// Key-to-value mapping used throughout the crate.
pub type Dictionary = serde_json::Map<String, Value>;

/// Seconds, possibly fractional or negative.
pub type TimeInterval = f64;

/// Lookup by dot-separated key path, e.g. `"owner.addresses.0.city"`.
///
/// Array elements are addressed by their decimal index.
pub trait KeyPath {
    /// Returns the value at `key_path`, or `None` when any segment is missing.
    fn value_for_key_path(&self, key_path: &str) -> Option<&Value>;

    /// Returns the value at `key_path`, or `default` when it is missing or null.
    fn value_for_key_path_or(&self, key_path: &str, default: Value) -> Value {
        match self.value_for_key_path(key_path) {
            Some(Value::Null) | None => default,
            Some(value) => value.clone(),
        }
    }
}

impl KeyPath for Value {
    fn value_for_key_path(&self, key_path: &str) -> Option<&Value> {
        if key_path.is_empty() {
            return Some(self);
        }
        key_path.split('.').try_fold(self, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

impl KeyPath for Dictionary {
    fn value_for_key_path(&self, key_path: &str) -> Option<&Value> {
        let (head, rest) = match key_path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (key_path, None),
        };
        let value = self.get(head)?;
        match rest {
            Some(rest) => value.value_for_key_path(rest),
            None => Some(value),
        }
    }
}

/// Moving values between records by key.
pub trait KeyValueCoding {
    /// Copies the first non-null value found under `key`, then each of
    /// `alt_keys`, from `source` into `self` under `key`.
    ///
    /// Returns `true` when a value was copied.
    fn set_value_for_key_from(&mut self, key: &str, alt_keys: &[&str], source: &Dictionary) -> bool;

    /// Writes this record's value for `key` into `dict`. A missing value
    /// removes the key from `dict` when `remove_if_none` is set and leaves
    /// it untouched otherwise.
    fn set_value_in_dictionary(&self, dict: &mut Dictionary, key: &str, remove_if_none: bool);
}

impl KeyValueCoding for Dictionary {
    fn set_value_for_key_from(&mut self, key: &str, alt_keys: &[&str], source: &Dictionary) -> bool {
        let found = std::iter::once(key)
            .chain(alt_keys.iter().copied())
            .find_map(|k| source.get(k).filter(|v| !v.is_null()));
        match found {
            Some(value) => {
                self.insert(key.to_string(), value.clone());
                true
            }
            None => false,
        }
    }

    fn set_value_in_dictionary(&self, dict: &mut Dictionary, key: &str, remove_if_none: bool) {
        match self.get(key).filter(|v| !v.is_null()) {
            Some(value) => {
                dict.insert(key.to_string(), value.clone());
            }
            None if remove_if_none => {
                dict.remove(key);
            }
            None => {}
        }
    }
}

/// Loose equality: "the same thing" rather than "the same bits".
///
/// Strings ignore case and surrounding whitespace, numbers compare by
/// numeric value regardless of representation, and containers compare
/// element-wise.
pub trait Equivalent<Rhs: ?Sized = Self> {
    fn is_equivalent(&self, other: &Rhs) -> bool;
}

impl Equivalent for str {
    fn is_equivalent(&self, other: &str) -> bool {
        self.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

impl Equivalent for String {
    fn is_equivalent(&self, other: &String) -> bool {
        self.as_str().is_equivalent(other.as_str())
    }
}

impl Equivalent for i64 {
    fn is_equivalent(&self, other: &i64) -> bool {
        self == other
    }
}

impl Equivalent for f64 {
    fn is_equivalent(&self, other: &f64) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= f64::EPSILON * scale
    }
}

impl Equivalent for bool {
    fn is_equivalent(&self, other: &bool) -> bool {
        self == other
    }
}

impl<T: Equivalent> Equivalent for Option<T> {
    fn is_equivalent(&self, other: &Option<T>) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.is_equivalent(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Equivalent> Equivalent for [T] {
    fn is_equivalent(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.is_equivalent(b))
    }
}

impl<T: Equivalent> Equivalent for Vec<T> {
    fn is_equivalent(&self, other: &Vec<T>) -> bool {
        self.as_slice().is_equivalent(other.as_slice())
    }
}

impl Equivalent for Value {
    fn is_equivalent(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64().unwrap_or(f64::NAN).is_equivalent(&b.as_f64().unwrap_or(f64::NAN)),
            },
            (Value::String(a), Value::String(b)) => a.is_equivalent(b),
            (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
                s.trim() == n.to_string()
            }
            (Value::Array(a), Value::Array(b)) => a.is_equivalent(b),
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|o| v.is_equivalent(o)))
            }
            _ => false,
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over values used by record sorting.
///
/// Null sorts before everything else, then booleans, numbers, strings (in
/// Finder order), arrays and objects.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => finder_compare(a, b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| compare_values(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Reads a value as a boolean: booleans, non-zero numbers and the strings
/// `yes`, `y`, `true` or `1` (any case) are true.
pub fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            Some(matches!(s.as_str(), "yes" | "y" | "true" | "1"))
        }
        _ => None,
    }
}

/// Reads a value as an integer; floats are truncated toward zero.
pub fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

pub fn value_as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads a value as a date: date strings in any format accepted by
/// [`date_with_string`], or seconds since the Unix epoch.
pub fn value_as_date(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => date_with_string(s),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            let millis = (secs * 1000.0).round() as i64;
            DateTime::from_timestamp_millis(millis).map(|d| d.fixed_offset())
        }
        _ => None,
    }
}

/// Reads a time of day from `HH:MM` / `HH:MM:SS` strings or from any date value.
pub fn value_as_time(value: &Value) -> Option<NaiveTime> {
    if let Value::String(s) = value {
        let s = s.trim();
        if let Some(time) = ["%H:%M:%S", "%H:%M"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        {
            return Some(time);
        }
    }
    value_as_date(value).and_then(|d| NaiveTime::from_hms_opt(d.hour(), d.minute(), d.second()))
}

/// Human-readable text for a value: strings without quotes, null as empty.
pub fn value_description(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

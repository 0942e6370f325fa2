//! Key-based helpers for sequences of records (arrays of dictionaries).

use crate::ext::slice::SliceExt;
use crate::value::{compare_values, value_description, Dictionary, KeyPath, Value};

/// Lookups and sorting on `[Value]` where each element is a record and
/// fields are addressed by key path.
pub trait RecordsExt {
    fn object_matching_key(&self, target: &Value, key: &str) -> Option<&Value>;
    fn index_of_matching_key(&self, target: &Value, key: &str) -> Option<usize>;
    fn objects_matching_key(&self, target: &Value, key: &str) -> Vec<Value>;

    /// Stable sort by the value at `key`. Records missing the key sort with
    /// null values: first when ascending, last when descending.
    fn sorted_by_key(&self, key: &str, ascending: bool) -> Vec<Value>;

    /// Indexes records by the text of their `key` value. Records without the
    /// key are skipped; later records replace earlier ones.
    fn dictionary_by_key(&self, key: &str) -> Dictionary;
}

static NULL: Value = Value::Null;

fn field<'a>(record: &'a Value, key: &str) -> &'a Value {
    record.value_for_key_path(key).unwrap_or(&NULL)
}

impl RecordsExt for [Value] {
    fn object_matching_key(&self, target: &Value, key: &str) -> Option<&Value> {
        self.object_matching_by(target, |record| field(record, key).clone())
    }

    fn index_of_matching_key(&self, target: &Value, key: &str) -> Option<usize> {
        self.index_of_matching_by(target, |record| field(record, key).clone())
    }

    fn objects_matching_key(&self, target: &Value, key: &str) -> Vec<Value> {
        self.objects_matching_by(target, |record| field(record, key).clone())
    }

    fn sorted_by_key(&self, key: &str, ascending: bool) -> Vec<Value> {
        let mut sorted = self.to_vec();
        sorted.sort_by(|a, b| {
            let ordering = compare_values(field(a, key), field(b, key));
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        sorted
    }

    fn dictionary_by_key(&self, key: &str) -> Dictionary {
        self.iter()
            .filter_map(|record| match field(record, key) {
                Value::Null => None,
                value => Some((value_description(value), record.clone())),
            })
            .collect()
    }
}

/// Builds a dictionary of records keyed by each record's `key` value.
pub fn dictionary_from_records(records: &[Value], key: &str) -> Dictionary {
    records.dictionary_by_key(key)
}

pub trait RecordsVecExt {
    /// Removes every record whose `key` value equals `target`.
    fn remove_matching_key(&mut self, target: &Value, key: &str);
}

impl RecordsVecExt for Vec<Value> {
    fn remove_matching_key(&mut self, target: &Value, key: &str) {
        self.retain(|record| field(record, key) != target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({"id": "b", "size": 20, "meta": {"tag": "x"}}),
            json!({"id": "a", "size": 5}),
            json!({"id": "c10", "size": null, "meta": {"tag": "y"}}),
            json!({"id": "c9", "size": 5}),
        ]
    }

    #[test]
    fn test_match_by_key_path() {
        let records = records();
        let found = records.object_matching_key(&json!("y"), "meta.tag").unwrap();
        assert_eq!(found["id"], json!("c10"));
        assert_eq!(records.index_of_matching_key(&json!(5), "size"), Some(1));
        assert_eq!(records.objects_matching_key(&json!(5), "size").len(), 2);
        assert!(records.object_matching_key(&json!("zz"), "id").is_none());
    }

    #[test]
    fn test_sorted_by_key_puts_missing_first_ascending() {
        let ids = |values: Vec<Value>| -> Vec<String> {
            values.iter().map(|v| value_description(&v["id"])).collect()
        };
        assert_eq!(ids(records().sorted_by_key("size", true)), vec!["c10", "a", "c9", "b"]);
        assert_eq!(ids(records().sorted_by_key("size", false)), vec!["b", "a", "c9", "c10"]);
        assert_eq!(ids(records().sorted_by_key("id", true)), vec!["a", "b", "c9", "c10"]);
    }

    #[test]
    fn test_dictionary_by_key() {
        let dict = dictionary_from_records(&records(), "meta.tag");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict["x"]["id"], json!("b"));
    }

    #[test]
    fn test_remove_matching_key() {
        let mut records = records();
        records.remove_matching_key(&json!(5), "size");
        assert_eq!(records.len(), 2);
    }
}

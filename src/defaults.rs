//! A file-backed preferences store with registered defaults.
//!
//! Each domain (usually a reverse-DNS bundle identifier) lives in its own
//! `<domain>.json`, `<domain>.yaml` or `<domain>.yml` file inside the
//! preferences directory. Reads fall back to the registered defaults, which
//! are never written to disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use log::{debug, info};
use serde::Serialize;

use crate::constants::{PREFS_DIR_ENV, PREFS_SUBDIR};
use crate::error::{Error, Result};
use crate::ext::dictionary::DictionaryExt;
use crate::ext::path::PathExt;
use crate::ext::string::ensure_filename;
use crate::value::{
    value_as_bool, value_as_date, value_as_float, value_as_integer, value_description, Dictionary,
    TimeInterval, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreFormat {
    Json,
    Yaml,
}

/// Store file extensions per domain, in lookup order.
const STORE_FILES: &[(&str, StoreFormat)] =
    &[("json", StoreFormat::Json), ("yaml", StoreFormat::Yaml), ("yml", StoreFormat::Yaml)];

/// Directory holding preference files: `$VALUEKIT_PREFS_DIR`, or
/// `valuekit/` inside the platform preference directory.
pub fn preferences_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(PREFS_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::preference_dir()
        .map(|dir| dir.join(PREFS_SUBDIR))
        .ok_or_else(|| Error::PreferencesError("no preference directory on this platform".into()))
}

/// Drops nulls from `value`, recursing into arrays and objects.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().filter(|v| !v.is_null()).map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct Preferences {
    domain: String,
    dir: PathBuf,
    path: PathBuf,
    format: StoreFormat,
    values: Dictionary,
    registered: Dictionary,
    dirty: bool,
}

impl Preferences {
    /// Opens `domain` in the default preferences directory.
    pub fn open(domain: &str) -> Result<Self> {
        Self::open_in(preferences_dir()?, domain)
    }

    /// Opens `domain` inside `dir`. A domain without a file starts empty and
    /// is saved as JSON.
    pub fn open_in<P: AsRef<Path>>(dir: P, domain: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let domain = ensure_filename(domain)?.to_string();

        for &(extension, format) in STORE_FILES {
            let path = dir.join(format!("{domain}.{extension}"));
            if !path.is_file() {
                continue;
            }
            let values = Self::load(&path, format)?;
            debug!("Loaded {} preferences from '{}'", values.len(), path.display());
            return Ok(Self { domain, dir, path, format, values, registered: Dictionary::new(), dirty: false });
        }

        let path = dir.join(format!("{domain}.json"));
        debug!("No preferences yet for '{domain}', will write '{}'", path.display());
        Ok(Self {
            domain,
            dir,
            path,
            format: StoreFormat::Json,
            values: Dictionary::new(),
            registered: Dictionary::new(),
            dirty: false,
        })
    }

    fn load(path: &Path, format: StoreFormat) -> Result<Dictionary> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Dictionary::new());
        }
        let value: Value = match format {
            StoreFormat::Json => serde_json::from_str(&content)?,
            StoreFormat::Yaml => serde_yaml::from_str(&content)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Dictionary::new()),
            _ => Err(Error::PreferencesError(format!(
                "'{}' does not contain a mapping",
                path.display()
            ))),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when there are changes not yet written by [`Preferences::synchronize`].
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Writes pending changes through a working file renamed onto the store.
    pub fn synchronize(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let content = match self.format {
            StoreFormat::Json => serde_json::to_string_pretty(&self.values)?,
            StoreFormat::Yaml => serde_yaml::to_string(&self.values)?,
        };
        self.path.validated_file_path()?;
        let working = self.path.working_path();
        let written = std::fs::write(&working, content);
        working.rename_working_file(written.is_ok())?;
        written?;
        self.dirty = false;
        info!("Saved preferences to '{}'", self.path.display());
        Ok(())
    }

    /// Adds `defaults` to the registration domain; later registrations win.
    pub fn register_defaults(&mut self, defaults: Dictionary) {
        self.registered.extend(defaults);
    }

    /// Stored value for `key`, else its registered default.
    pub fn object(&self, key: &str) -> Option<&Value> {
        self.values.non_null(key).or_else(|| self.registered.non_null(key))
    }

    pub fn object_or(&self, key: &str, default: Value) -> Value {
        self.object(key).cloned().unwrap_or(default)
    }

    /// Registered defaults overlaid with stored values.
    pub fn dictionary_representation(&self) -> Dictionary {
        let mut merged = self.registered.clone();
        merged.extend(self.values.clone());
        merged
    }

    /// Stores `value`; null removes the key.
    pub fn set_object(&mut self, key: &str, value: Value) {
        if value.is_null() {
            self.remove_object(key);
            return;
        }
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    pub fn remove_object(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.dirty = true;
        }
    }

    /// Stores `value` unless it equals `default`, in which case the stored
    /// value is removed.
    pub fn set_object_or_default(&mut self, key: &str, value: Option<Value>, default: &Value) {
        self.values.set_value_or_default(key, value, default);
        self.dirty = true;
    }

    pub fn set_object_remove_if_none(&mut self, key: &str, value: Option<Value>, remove_if_none: bool) {
        match value {
            Some(value) => self.set_object(key, value),
            None if remove_if_none => self.remove_object(key),
            None => {}
        }
    }

    /// Stores any serializable value, with nulls dropped.
    pub fn set_arbitrary<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_object(key, sanitize(&value));
        Ok(())
    }

    pub fn bool(&self, key: &str) -> bool {
        self.object(key).and_then(value_as_bool).unwrap_or(false)
    }

    pub fn integer(&self, key: &str) -> i64 {
        self.object(key).and_then(value_as_integer).unwrap_or(0)
    }

    pub fn float(&self, key: &str) -> f64 {
        self.object(key).and_then(value_as_float).unwrap_or(0.0)
    }

    pub fn string(&self, key: &str) -> String {
        self.object(key).map(value_description).unwrap_or_default()
    }

    pub fn date(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        self.object(key).and_then(value_as_date)
    }

    pub fn time_interval(&self, key: &str) -> TimeInterval {
        self.float(key)
    }

    pub fn time_interval_or(&self, key: &str, default: TimeInterval) -> TimeInterval {
        self.object(key).and_then(value_as_float).unwrap_or(default)
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set_object(key, Value::Bool(value));
    }

    pub fn set_integer(&mut self, key: &str, value: i64) {
        self.set_object(key, Value::from(value));
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.set_object(key, Value::from(value));
    }

    pub fn set_time_interval(&mut self, key: &str, value: TimeInterval) {
        self.set_float(key, value);
    }

    /// Adds one to the integer for `key` and returns the new value.
    pub fn increment_integer(&mut self, key: &str) -> i64 {
        let value = self.integer(key).saturating_add(1);
        self.set_integer(key, value);
        value
    }

    /// Registered defaults for `keys`, skipping keys without one.
    pub fn factory_settings(&self, keys: &[&str]) -> Dictionary {
        keys.iter()
            .filter_map(|key| self.registered.non_null(key).map(|v| (key.to_string(), v.clone())))
            .collect()
    }

    /// True when a stored value for `key` differs from its registered default.
    pub fn changed_from_factory_settings(&self, key: &str) -> bool {
        match self.values.non_null(key) {
            Some(value) => self.registered.non_null(key) != Some(value),
            None => false,
        }
    }

    pub fn changed_from_factory_settings_for_keys(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.changed_from_factory_settings(key))
    }

    /// Drops the stored value so reads see the registered default again.
    pub fn restore_factory_settings(&mut self, key: &str) {
        self.remove_object(key);
    }

    pub fn restore_factory_settings_for_keys(&mut self, keys: &[&str]) {
        for key in keys {
            self.restore_factory_settings(key);
        }
    }

    /// Copies the stored value of `old_key` to `new_key`. An existing
    /// `new_key` is only overwritten when `replace` is set.
    pub fn copy_object(&mut self, old_key: &str, new_key: &str, replace: bool) -> bool {
        let Some(value) = self.values.non_null(old_key).cloned() else {
            return false;
        };
        if !replace && self.values.non_null(new_key).is_some() {
            return false;
        }
        self.set_object(new_key, value);
        true
    }

    /// Copies each `(old, new)` pair. True when anything was copied.
    pub fn copy_objects(&mut self, pairs: &[(&str, &str)], replace: bool) -> bool {
        pairs
            .iter()
            .fold(false, |copied, (old, new)| self.copy_object(old, new, replace) || copied)
    }

    /// Copies `key` from the domain `bundle_id` stored next to this one.
    /// When the other domain has no value, the local one is removed if
    /// `remove_if_missing` is set. Returns whether a value was copied.
    pub fn copy_preference_from(&mut self, key: &str, bundle_id: &str, remove_if_missing: bool) -> Result<bool> {
        self.copy_preferences_from(&[key], bundle_id, remove_if_missing)
            .map(|copied| copied > 0)
    }

    /// Like [`Preferences::copy_preference_from`] for several keys. Returns
    /// how many values were copied.
    pub fn copy_preferences_from(&mut self, keys: &[&str], bundle_id: &str, remove_if_missing: bool) -> Result<usize> {
        let other = Self::open_in(&self.dir, bundle_id)?;
        let mut copied = 0;
        for key in keys {
            match other.values.non_null(key) {
                Some(value) => {
                    self.set_object(key, value.clone());
                    copied += 1;
                }
                None if remove_if_missing => self.remove_object(key),
                None => {}
            }
        }
        debug!("Copied {copied} preferences from '{bundle_id}' into '{}'", self.domain);
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn defaults() -> Dictionary {
        json!({"volume": 5, "theme": "light", "interval": 2.5})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_reads_fall_back_to_registered_defaults() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "com.example.app").unwrap();
        assert_eq!(prefs.integer("volume"), 0);
        prefs.register_defaults(defaults());
        assert_eq!(prefs.integer("volume"), 5);
        assert_eq!(prefs.string("theme"), "light");
        assert_eq!(prefs.time_interval("interval"), 2.5);
        assert_eq!(prefs.time_interval_or("missing", 9.0), 9.0);
        assert!(!prefs.bool("missing"));
        assert!(prefs.date("missing").is_none());
        assert_eq!(prefs.object_or("missing", json!("x")), json!("x"));
    }

    #[test]
    fn test_synchronize_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "com.example.app").unwrap();
        prefs.set_bool("enabled", true);
        prefs.set_object("when", json!("2015-03-01T10:30:00Z"));
        assert_eq!(prefs.increment_integer("launches"), 1);
        assert_eq!(prefs.increment_integer("launches"), 2);
        assert!(prefs.has_unsaved_changes());
        prefs.synchronize().unwrap();
        assert!(!prefs.has_unsaved_changes());
        assert!(!prefs.path().with_extension("json.working").exists());

        let reopened = Preferences::open_in(dir.path(), "com.example.app").unwrap();
        assert!(reopened.bool("enabled"));
        assert_eq!(reopened.integer("launches"), 2);
        assert!(reopened.date("when").is_some());
    }

    #[test]
    fn test_yaml_store_is_read_and_written_as_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("org.sample.yaml");
        std::fs::write(&path, "name: sample\ncount: 3\n").unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "org.sample").unwrap();
        assert_eq!(prefs.path(), path);
        assert_eq!(prefs.integer("count"), 3);
        prefs.set_integer("count", 4);
        prefs.synchronize().unwrap();
        let written: Value = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["count"], json!(4));
    }

    #[test]
    fn test_yml_extension_is_read_as_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("org.short.yml");
        std::fs::write(&path, "theme: dark\nsize: 3\n").unwrap();
        let prefs = Preferences::open_in(dir.path(), "org.short").unwrap();
        assert_eq!(prefs.path(), path.as_path());
        assert_eq!(prefs.string("theme"), "dark");
        assert_eq!(prefs.integer("size"), 3);
    }

    #[test]
    fn test_non_mapping_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "[1, 2]").unwrap();
        let err = Preferences::open_in(dir.path(), "bad").unwrap_err();
        assert!(matches!(err, Error::PreferencesError(_)));
        assert!(Preferences::open_in(dir.path(), "../escape").is_err());
    }

    #[test]
    fn test_set_object_or_default_and_remove_if_none() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "d").unwrap();
        prefs.register_defaults(defaults());
        prefs.set_object_or_default("volume", Some(json!(7)), &json!(5));
        assert_eq!(prefs.integer("volume"), 7);
        prefs.set_object_or_default("volume", Some(json!(5)), &json!(5));
        assert!(!prefs.changed_from_factory_settings("volume"));
        prefs.set_object_remove_if_none("theme", None, false);
        prefs.set_object("theme", json!("dark"));
        prefs.set_object_remove_if_none("theme", None, true);
        assert_eq!(prefs.string("theme"), "light");
    }

    #[test]
    fn test_factory_settings() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "d").unwrap();
        prefs.register_defaults(defaults());
        assert_eq!(prefs.factory_settings(&["volume", "nothing"]), dictionary(json!({"volume": 5})));

        prefs.set_integer("volume", 5);
        assert!(!prefs.changed_from_factory_settings("volume"));
        prefs.set_integer("volume", 11);
        prefs.set_object("theme", json!("dark"));
        assert!(prefs.changed_from_factory_settings("volume"));
        assert!(prefs.changed_from_factory_settings_for_keys(&["interval", "theme"]));

        prefs.restore_factory_settings("volume");
        assert_eq!(prefs.integer("volume"), 5);
        prefs.restore_factory_settings_for_keys(&["theme"]);
        assert!(!prefs.changed_from_factory_settings_for_keys(&["volume", "theme"]));
    }

    fn dictionary(value: Value) -> Dictionary {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_copy_objects() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "d").unwrap();
        prefs.set_object("old", json!(1));
        prefs.set_object("taken", json!(2));
        assert!(prefs.copy_object("old", "new", false));
        assert!(!prefs.copy_object("old", "taken", false));
        assert_eq!(prefs.integer("taken"), 2);
        assert!(prefs.copy_objects(&[("missing", "x"), ("old", "taken")], true));
        assert_eq!(prefs.integer("taken"), 1);
        assert!(!prefs.copy_object("missing", "x", true));
    }

    #[test]
    fn test_copy_preferences_from_other_domain() {
        let dir = TempDir::new().unwrap();
        let mut legacy = Preferences::open_in(dir.path(), "com.example.legacy").unwrap();
        legacy.set_object("token", json!("abc"));
        legacy.synchronize().unwrap();

        let mut prefs = Preferences::open_in(dir.path(), "com.example.app").unwrap();
        prefs.set_object("stale", json!(true));
        assert!(prefs.copy_preference_from("token", "com.example.legacy", false).unwrap());
        assert_eq!(prefs.string("token"), "abc");
        let copied = prefs
            .copy_preferences_from(&["token", "stale"], "com.example.legacy", true)
            .unwrap();
        assert_eq!(copied, 1);
        assert!(prefs.object("stale").is_none());
    }

    #[test]
    fn test_set_arbitrary_sanitizes() {
        #[derive(Serialize)]
        struct Window {
            width: u32,
            title: Option<String>,
            tags: Vec<Option<&'static str>>,
        }
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "d").unwrap();
        let window = Window { width: 640, title: None, tags: vec![Some("a"), None] };
        prefs.set_arbitrary("window", &window).unwrap();
        assert_eq!(prefs.object("window"), Some(&json!({"width": 640, "tags": ["a"]})));
        prefs.set_object("gone", Value::Null);
        assert!(!prefs.dictionary_representation().contains_key("gone"));
    }

    #[test]
    fn test_dictionary_representation_overlays_values() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open_in(dir.path(), "d").unwrap();
        prefs.register_defaults(defaults());
        prefs.set_integer("volume", 1);
        let all = prefs.dictionary_representation();
        assert_eq!(all["volume"], json!(1));
        assert_eq!(all["theme"], json!("light"));
    }
}

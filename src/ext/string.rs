use std::cmp::Ordering;
use std::ops::Range;
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use url::Url;

use crate::constants::{DEFAULT_URL_SCHEME, PLIST_FALSE, PLIST_TRUE};
use crate::error::{Error, Result};
use crate::value::{Dictionary, TimeInterval};

/// Characters that may appear unescaped anywhere in a URL.
const URL_SAFE_PUNCTUATION: &str = "-._~:/?#[]@!$&'()*+,;=%";

/// Characters replaced when turning arbitrary text into a filename.
const FILENAME_UNSAFE: &[char] = &['/', '\\', ':', '?', '*', '"', '<', '>', '|'];

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)(?:\.(\d+))?(?:\.(\d+))?\s*([A-Za-z]+)?\s*(\d+)?")
        .expect("version pattern is valid")
});

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

const QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

const BYTE_UNITS: &[&str] = &["KB", "MB", "GB", "TB", "PB"];

pub fn string_with_integer(value: i64) -> String {
    value.to_string()
}

/// Formats `value` with exactly `places` decimal places.
pub fn string_with_float(value: f64, places: usize) -> String {
    format!("{value:.places$}")
}

/// Formats `value` without trailing zeroes: `2.50` becomes `2.5`, `3.0` becomes `3`.
pub fn string_with_truncated_float(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Chooses the `zero`, `singular` or `plural` pattern for `value`; `{}` in the
/// chosen pattern is replaced by the number.
pub fn string_with_integer_plural(value: i64, zero: &str, singular: &str, plural: &str) -> String {
    let pattern = match value {
        0 => zero,
        1 | -1 => singular,
        _ => plural,
    };
    pattern.replace("{}", &value.to_string())
}

pub fn string_with_float_plural(value: f64, zero: &str, singular: &str, plural: &str) -> String {
    let pattern = if value == 0.0 {
        zero
    } else if value.abs() == 1.0 {
        singular
    } else {
        plural
    };
    pattern.replace("{}", &string_with_truncated_float(value))
}

/// Clock-style duration: `1:02:03`, or `2:03` below one hour.
pub fn string_with_time_interval(seconds: TimeInterval) -> String {
    string_with_time_interval_suffix(seconds, "")
}

pub fn string_with_time_interval_suffix(seconds: TimeInterval, suffix: &str) -> String {
    let total = seconds.round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{sign}{hours}:{minutes:02}:{secs:02}{suffix}")
    } else {
        format!("{sign}{minutes}:{secs:02}{suffix}")
    }
}

/// Duration rounded to its largest whole unit, e.g. `3 hours` or `1 day`,
/// followed by `suffix` verbatim.
pub fn string_with_rounded_time_interval(seconds: TimeInterval, suffix: &str) -> String {
    let secs = seconds.abs();
    let (amount, unit) = if secs < 60.0 {
        (secs, "second")
    } else if secs < 3600.0 {
        (secs / 60.0, "minute")
    } else if secs < 86_400.0 {
        (secs / 3600.0, "hour")
    } else if secs < 604_800.0 {
        (secs / 86_400.0, "day")
    } else {
        (secs / 604_800.0, "week")
    };
    let amount = amount.round() as i64;
    let text = string_with_integer_plural(
        amount,
        &format!("{{}} {unit}s"),
        &format!("{{}} {unit}"),
        &format!("{{}} {unit}s"),
    );
    format!("{text}{suffix}")
}

/// Minutes and seconds in words, e.g. `2 minutes, 1 second`.
pub fn string_with_seconds(
    seconds: i64,
    minute_singular: &str,
    minutes_plural: &str,
    second_singular: &str,
    seconds_plural: &str,
) -> String {
    let (minutes, secs) = (seconds / 60, seconds % 60);
    let mut parts = Vec::new();
    if minutes != 0 {
        let word = if minutes == 1 { minute_singular } else { minutes_plural };
        parts.push(format!("{minutes} {word}"));
    }
    if secs != 0 || minutes == 0 {
        let word = if secs == 1 { second_singular } else { seconds_plural };
        parts.push(format!("{secs} {word}"));
    }
    parts.join(", ")
}

pub fn string_with_integer_padded(value: i64, min_length: usize, padding: &str, pad_left: bool) -> String {
    value.to_string().with_minimum_length(min_length, padding, pad_left)
}

pub fn string_with_leading_zeroes(value: i64, digits: usize) -> String {
    format!("{value:0digits$}")
}

/// Byte count in binary units: `512 bytes`, `1.5 KB`, `2 MB`.
pub fn string_as_bytes(bytes: i64) -> String {
    if bytes.unsigned_abs() < 1024 {
        return string_with_integer_plural(bytes, "{} bytes", "{} byte", "{} bytes");
    }
    let mut amount = bytes as f64 / 1024.0;
    let mut unit = BYTE_UNITS[0];
    for &next in &BYTE_UNITS[1..] {
        if amount.abs() < 1024.0 {
            break;
        }
        amount /= 1024.0;
        unit = next;
    }
    let text = string_with_float(amount, 1);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text} {unit}")
}

/// `prefix + keyword + suffix` when `keyword` has content, else `alternative`.
pub fn string_with_prefix_keyword_suffix_or(
    prefix: &str,
    keyword: &str,
    suffix: &str,
    alternative: &str,
) -> String {
    if keyword.contains_something() {
        format!("{prefix}{keyword}{suffix}")
    } else {
        alternative.to_string()
    }
}

/// Property-list spelling of a boolean.
pub fn string_with_bool(value: bool) -> String {
    let text = if value { PLIST_TRUE } else { PLIST_FALSE };
    text.to_string()
}

/// A fresh random UUID in upper-case hyphenated form.
pub fn uuid_string() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

/// Number of characters needed to print `value`, including any minus sign.
pub fn length_of_integer(value: i64) -> usize {
    value.to_string().len()
}

pub fn version_with(major: i64, minor: i64, bug: i64, kind: &str, stage: i64) -> String {
    Version { major, minor, bug, kind: kind.to_string(), stage }.to_string()
}

fn fold_char(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    std::iter::once(lower).nfd().next().unwrap_or(lower)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// File-browser ordering: case and accent insensitive, with digit runs
/// compared by numeric value (`file9` before `file10`).
///
/// Strings that are equal under those rules fall back to plain ordering so
/// the result is total.
pub fn finder_compare(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a.chars().peekable(), b.chars().peekable());
    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right))
            }
            (Some(x), Some(y)) => {
                left.next();
                right.next();
                fold_char(x).cmp(&fold_char(y))
            }
        };
        if ordering.is_ne() {
            return ordering;
        }
    }
}

/// Dotted application version such as `2.1.3b4`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: i64,
    pub minor: i64,
    #[serde(default)]
    pub bug: i64,
    /// Release kind: `d`, `a`, `b`, `fc`, or empty for a final release.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub stage: i64,
}

impl Version {
    pub fn to_dictionary(&self) -> Dictionary {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Dictionary::new(),
        }
    }

    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(dict.clone()))?)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.bug > 0 {
            write!(f, ".{}", self.bug)?;
        }
        if !self.kind.is_empty() {
            write!(f, "{}{}", self.kind, self.stage)?;
        }
        Ok(())
    }
}

/// Extension methods for string slices.
pub trait StrExt {
    /// Returns `self` when it contains something, otherwise `preferred`.
    fn or(&self, preferred: &str) -> String;

    /// Appends ` {index}` for indexes above one: `Copy`, `Copy 2`, `Copy 3`.
    fn indexed_by(&self, index: usize) -> String;

    /// True when the string has at least one non-whitespace character.
    fn contains_something(&self) -> bool;

    fn case_and_space_insensitive_compare(&self, other: &str) -> Ordering;

    fn lowercased_letters_only(&self) -> String;
    fn lowercased_letters_or_digits_only(&self) -> String;
    fn contains_string_letters(&self, other: &str) -> bool;
    fn is_letter_equivalent(&self, other: &str) -> bool;

    fn removing_chars(&self, remove: impl Fn(char) -> bool) -> String;
    fn removing_diacritics(&self) -> String;
    fn removing_quotes_and_spaces(&self) -> String;
    fn removing_prefix(&self, prefix: &str) -> String;
    fn removing_suffix(&self, suffix: &str) -> String;
    fn trimming_spaces(&self, leading: bool, trailing: bool) -> String;

    /// Pads to `min_length` characters by repeating `padding` on the chosen
    /// side. Strings already long enough are returned unchanged.
    fn with_minimum_length(&self, min_length: usize, padding: &str, pad_left: bool) -> String;

    /// Splits into pieces of `length` characters; the last may be shorter.
    fn components_of_length(&self, length: usize) -> Vec<String>;

    fn signed_length(&self) -> i64;
    fn word_count(&self) -> usize;

    /// Parses a version string such as `1.2.3b4`. Missing parts are zero.
    fn version_components(&self) -> Version;

    fn left(&self, length: usize) -> String;
    fn right(&self, length: usize) -> String;
    fn from_position(&self, position: usize, length: usize) -> String;
    /// Characters in `start..end`.
    fn from_to(&self, start: usize, end: usize) -> String;

    /// Text after the first occurrence of `start`.
    fn substring_from(&self, start: &str) -> Option<&str>;
    /// Text before the first occurrence of `end`.
    fn substring_to(&self, end: &str) -> Option<&str>;
    fn substring_between(&self, start: &str, end: &str, default: &str) -> String;
    /// Byte range between the first `start` and the following `end`,
    /// including both delimiters when `inclusive`. Empty delimiters mean
    /// the beginning and end of the string.
    fn range_between(&self, start: &str, end: &str, inclusive: bool) -> Option<Range<usize>>;

    fn reversed(&self) -> String;
    fn checksum(&self) -> u64;

    /// Reversible obfuscation for storing casual secrets.
    fn mask(&self) -> String;
    fn unmask(&self) -> Result<String>;

    fn encode_base64(&self) -> String;
    fn decode_base64(&self) -> Result<String>;
    fn rotate13(&self) -> String;

    /// The receiver holds `key=value` pairs separated by commas or newlines.
    /// Returns the integer key whose value matches `value`.
    fn integer_mapped_from(&self, value: &str, default: i64) -> i64;
    fn string_mapped_from_integer(&self, value: i64, default: &str) -> String;
    fn mapped_from(&self, key: &str, default: &str) -> String;

    fn replacing_percent_escapes(&self) -> String;
    fn adding_percent_escapes(&self) -> String;
    /// Escapes only characters that can never appear in a URL.
    fn making_url_safe(&self) -> String;
    fn stripping_html(&self) -> String;
    fn cleaning_url(&self) -> String;
    fn cleaning_url_with_default_scheme(&self, scheme: &str) -> String;
    fn url_value(&self) -> Option<Url>;

    /// Replaces path separators and other unsafe characters with `-`.
    fn cleaning_filename(&self, default: &str) -> String;
}

fn mapping_pairs(mapping: &str) -> impl Iterator<Item = (&str, &str)> {
    mapping
        .split([',', '\n'])
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
}

impl StrExt for str {
    fn or(&self, preferred: &str) -> String {
        let chosen = if self.contains_something() { self } else { preferred };
        chosen.to_string()
    }

    fn indexed_by(&self, index: usize) -> String {
        if index > 1 {
            format!("{self} {index}")
        } else {
            self.to_string()
        }
    }

    fn contains_something(&self) -> bool {
        !self.trim().is_empty()
    }

    fn case_and_space_insensitive_compare(&self, other: &str) -> Ordering {
        let squash = |s: &str| -> String {
            s.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
        };
        squash(self).cmp(&squash(other))
    }

    fn lowercased_letters_only(&self) -> String {
        self.chars().filter(|c| c.is_alphabetic()).flat_map(char::to_lowercase).collect()
    }

    fn lowercased_letters_or_digits_only(&self) -> String {
        self.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
    }

    fn contains_string_letters(&self, other: &str) -> bool {
        self.lowercased_letters_only().contains(&other.lowercased_letters_only())
    }

    fn is_letter_equivalent(&self, other: &str) -> bool {
        self.lowercased_letters_only() == other.lowercased_letters_only()
    }

    fn removing_chars(&self, remove: impl Fn(char) -> bool) -> String {
        self.chars().filter(|c| !remove(*c)).collect()
    }

    fn removing_diacritics(&self) -> String {
        self.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
    }

    fn removing_quotes_and_spaces(&self) -> String {
        self.removing_chars(|c| c.is_whitespace() || QUOTES.contains(&c))
    }

    fn removing_prefix(&self, prefix: &str) -> String {
        self.strip_prefix(prefix).unwrap_or(self).to_string()
    }

    fn removing_suffix(&self, suffix: &str) -> String {
        self.strip_suffix(suffix).unwrap_or(self).to_string()
    }

    fn trimming_spaces(&self, leading: bool, trailing: bool) -> String {
        let mut text = self;
        if leading {
            text = text.trim_start();
        }
        if trailing {
            text = text.trim_end();
        }
        text.to_string()
    }

    fn with_minimum_length(&self, min_length: usize, padding: &str, pad_left: bool) -> String {
        let length = self.chars().count();
        if length >= min_length || padding.is_empty() {
            return self.to_string();
        }
        let pad: String = padding.chars().cycle().take(min_length - length).collect();
        if pad_left {
            format!("{pad}{self}")
        } else {
            format!("{self}{pad}")
        }
    }

    fn components_of_length(&self, length: usize) -> Vec<String> {
        if length == 0 {
            return vec![self.to_string()];
        }
        let chars: Vec<char> = self.chars().collect();
        chars.chunks(length).map(|chunk| chunk.iter().collect()).collect()
    }

    fn signed_length(&self) -> i64 {
        self.chars().count() as i64
    }

    fn word_count(&self) -> usize {
        self.split_whitespace().count()
    }

    fn version_components(&self) -> Version {
        let Some(caps) = VERSION_PATTERN.captures(self) else {
            return Version::default();
        };
        let number = |i: usize| -> i64 {
            caps.get(i).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
        };
        Version {
            major: number(1),
            minor: number(2),
            bug: number(3),
            kind: caps.get(4).map(|m| m.as_str().to_lowercase()).unwrap_or_default(),
            stage: number(5),
        }
    }

    fn left(&self, length: usize) -> String {
        self.chars().take(length).collect()
    }

    fn right(&self, length: usize) -> String {
        let count = self.chars().count();
        self.chars().skip(count.saturating_sub(length)).collect()
    }

    fn from_position(&self, position: usize, length: usize) -> String {
        self.chars().skip(position).take(length).collect()
    }

    fn from_to(&self, start: usize, end: usize) -> String {
        self.from_position(start, end.saturating_sub(start))
    }

    fn substring_from(&self, start: &str) -> Option<&str> {
        self.find(start).map(|i| &self[i + start.len()..])
    }

    fn substring_to(&self, end: &str) -> Option<&str> {
        self.find(end).map(|i| &self[..i])
    }

    fn substring_between(&self, start: &str, end: &str, default: &str) -> String {
        match self.range_between(start, end, false) {
            Some(range) => self[range].to_string(),
            None => default.to_string(),
        }
    }

    fn range_between(&self, start: &str, end: &str, inclusive: bool) -> Option<Range<usize>> {
        let start_at = if start.is_empty() { 0 } else { self.find(start)? };
        let inner_start = start_at + start.len();
        let inner_end = if end.is_empty() {
            self.len()
        } else {
            inner_start + self[inner_start..].find(end)?
        };
        if inclusive {
            Some(start_at..inner_end + end.len())
        } else {
            Some(inner_start..inner_end)
        }
    }

    fn reversed(&self) -> String {
        self.chars().rev().collect()
    }

    fn checksum(&self) -> u64 {
        self.encode_utf16().fold(0u64, |sum, unit| sum.wrapping_add(u64::from(unit)))
    }

    fn mask(&self) -> String {
        self.reversed().rotate13().encode_base64()
    }

    fn unmask(&self) -> Result<String> {
        Ok(self.decode_base64()?.rotate13().reversed())
    }

    fn encode_base64(&self) -> String {
        BASE64.encode(self.as_bytes())
    }

    fn decode_base64(&self) -> Result<String> {
        let bytes = BASE64.decode(self.trim().as_bytes())?;
        Ok(String::from_utf8(bytes)?)
    }

    fn rotate13(&self) -> String {
        self.chars()
            .map(|c| match c {
                'a'..='z' => (((c as u8 - b'a') + 13) % 26 + b'a') as char,
                'A'..='Z' => (((c as u8 - b'A') + 13) % 26 + b'A') as char,
                _ => c,
            })
            .collect()
    }

    fn integer_mapped_from(&self, value: &str, default: i64) -> i64 {
        mapping_pairs(self)
            .find(|(_, v)| v.eq_ignore_ascii_case(value.trim()))
            .and_then(|(k, _)| k.parse().ok())
            .unwrap_or(default)
    }

    fn string_mapped_from_integer(&self, value: i64, default: &str) -> String {
        self.mapped_from(&value.to_string(), default)
    }

    fn mapped_from(&self, key: &str, default: &str) -> String {
        mapping_pairs(self)
            .find(|(k, _)| *k == key.trim())
            .map_or_else(|| default.to_string(), |(_, v)| v.to_string())
    }

    fn replacing_percent_escapes(&self) -> String {
        urlencoding::decode(self).map(|s| s.into_owned()).unwrap_or_else(|err| {
            warn!("Cannot decode percent escapes in '{self}': {err}");
            self.to_string()
        })
    }

    fn adding_percent_escapes(&self) -> String {
        urlencoding::encode(self).into_owned()
    }

    fn making_url_safe(&self) -> String {
        let mut safe = String::with_capacity(self.len());
        for c in self.trim().chars() {
            if c.is_ascii_alphanumeric() || URL_SAFE_PUNCTUATION.contains(c) {
                safe.push(c);
            } else {
                safe.push_str(&urlencoding::encode(c.encode_utf8(&mut [0; 4])));
            }
        }
        safe
    }

    fn stripping_html(&self) -> String {
        TAG_PATTERN
            .replace_all(self, "")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    fn cleaning_url(&self) -> String {
        self.cleaning_url_with_default_scheme(DEFAULT_URL_SCHEME)
    }

    fn cleaning_url_with_default_scheme(&self, scheme: &str) -> String {
        let url = self
            .trim()
            .trim_matches(|c: char| c == '<' || c == '>' || QUOTES.contains(&c))
            .trim();
        if url.is_empty() || url.contains("://") || url.starts_with("mailto:") {
            return url.making_url_safe();
        }
        format!("{scheme}://{}", url.making_url_safe())
    }

    fn url_value(&self) -> Option<Url> {
        Url::parse(&self.cleaning_url()).ok()
    }

    fn cleaning_filename(&self, default: &str) -> String {
        let cleaned: String = self
            .chars()
            .map(|c| if FILENAME_UNSAFE.contains(&c) || c.is_control() { '-' } else { c })
            .collect();
        let cleaned = cleaned.trim().trim_start_matches('.').trim();
        if cleaned.is_empty() {
            default.to_string()
        } else {
            cleaned.to_string()
        }
    }
}

/// In-place editing helpers for owned strings.
pub trait StringExt {
    fn delete_chars(&mut self, remove: impl Fn(char) -> bool);
    fn replace_all_in_place(&mut self, from: &str, to: &str);
    fn case_insensitive_replace_all(&mut self, from: &str, to: &str);
    fn trim_in_place(&mut self, leading: bool, trailing: bool);
    fn append_or(&mut self, text: &str, alternative: &str);
    fn append_prefix_keyword(&mut self, prefix: &str, keyword: &str);
    fn append_prefix_keyword_suffix_or(&mut self, prefix: &str, keyword: &str, suffix: &str, alternative: &str);
    /// Like [`StringExt::append_prefix_keyword_suffix_or`], placing
    /// `separator` before the new text when the string is not empty.
    fn append_separator_prefix_keyword_suffix_or(
        &mut self,
        separator: &str,
        prefix: &str,
        keyword: &str,
        suffix: &str,
        alternative: &str,
    );
}

impl StringExt for String {
    fn delete_chars(&mut self, remove: impl Fn(char) -> bool) {
        self.retain(|c| !remove(c));
    }

    fn replace_all_in_place(&mut self, from: &str, to: &str) {
        if !from.is_empty() && self.contains(from) {
            *self = self.replace(from, to);
        }
    }

    fn case_insensitive_replace_all(&mut self, from: &str, to: &str) {
        if from.is_empty() {
            return;
        }
        match Regex::new(&format!("(?i){}", regex::escape(from))) {
            Ok(re) => *self = re.replace_all(self.as_str(), regex::NoExpand(to)).into_owned(),
            Err(err) => warn!("Cannot build pattern for '{from}': {err}"),
        }
    }

    fn trim_in_place(&mut self, leading: bool, trailing: bool) {
        *self = self.trimming_spaces(leading, trailing);
    }

    fn append_or(&mut self, text: &str, alternative: &str) {
        self.push_str(&text.or(alternative));
    }

    fn append_prefix_keyword(&mut self, prefix: &str, keyword: &str) {
        self.append_prefix_keyword_suffix_or(prefix, keyword, "", "");
    }

    fn append_prefix_keyword_suffix_or(&mut self, prefix: &str, keyword: &str, suffix: &str, alternative: &str) {
        self.push_str(&string_with_prefix_keyword_suffix_or(prefix, keyword, suffix, alternative));
    }

    fn append_separator_prefix_keyword_suffix_or(
        &mut self,
        separator: &str,
        prefix: &str,
        keyword: &str,
        suffix: &str,
        alternative: &str,
    ) {
        let piece = string_with_prefix_keyword_suffix_or(prefix, keyword, suffix, alternative);
        if piece.is_empty() {
            return;
        }
        if !self.is_empty() {
            self.push_str(separator);
        }
        self.push_str(&piece);
    }
}

/// Checks that `name` is usable as a single path component.
pub(crate) fn ensure_filename(name: &str) -> Result<&str> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidFilename { filename: name.to_string() });
    }
    Ok(name)
}

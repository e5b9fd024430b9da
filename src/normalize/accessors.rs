//! Typed, defaulting reads over loosely shaped JSON payloads.
//!
//! Every "is this field there and of the right type" check lives here so the
//! normalizer can be written as a list of field reads. None of these
//! functions fail: a missing or mistyped field reads as its default.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Walks `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// A finite JSON number at `path`, else `default`.
pub fn read_number(value: &Value, path: &[&str], default: f64) -> f64 {
    lookup(value, path)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(default)
}

/// A counter: finite and non-negative, else 0.
pub fn read_count(value: &Value, path: &[&str]) -> f64 {
    let n = read_number(value, path, 0.0);
    if n >= 0.0 { n } else { 0.0 }
}

/// The array at `path`; anything else reads as empty.
pub fn read_array<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    match lookup(value, path) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

pub fn read_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

/// JSON truthiness: `null`, `false`, `0`, `""` and absence are false.
pub fn read_truthy(value: &Value, path: &[&str]) -> bool {
    lookup(value, path).map(is_truthy).unwrap_or(false)
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A timestamp given as a Twitter date string, RFC 3339, `YYYY-MM-DD`, or
/// epoch milliseconds.
pub fn read_timestamp(value: &Value, path: &[&str]) -> Option<DateTime<Utc>> {
    match lookup(value, path)? {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        _ => None,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_str(raw, TWITTER_DATE_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Describes what sits at `path` when it is present but not of `expected`
/// kind. Used to report shape anomalies.
pub fn shape_mismatch(value: &Value, path: &[&str], expected: Kind) -> Option<String> {
    let found = lookup(value, path)?;
    if found.is_null() || expected.matches(found) {
        return None;
    }
    Some(format!(
        "{}: expected {}, found {}",
        path.join("."),
        expected.as_str(),
        kind_name(found)
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Number,
    Array,
    Object,
}

impl Kind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Kind::Number => value.is_number(),
            Kind::Array => value.is_array(),
            Kind::Object => value.is_object(),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Kind::Number => "number",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use serde_json::json;

    #[test]
    fn test_lookup_through_non_objects() {
        let v = json!({ "a": { "b": [1, 2] }, "n": null });
        assert_eq!(lookup(&v, &["a", "b"]), Some(&json!([1, 2])));
        assert_eq!(lookup(&v, &["a", "b", "c"]), None);
        assert_eq!(lookup(&v, &["n", "x"]), None);
        assert_eq!(lookup(&Value::Null, &["a"]), None);
    }

    #[test]
    fn test_read_count_rejects_wrong_types_and_negatives() {
        let v = json!({ "ok": 42, "neg": -3, "str": "12", "float": 1.5 });
        assert_eq!(read_count(&v, &["ok"]), 42.0);
        assert_eq!(read_count(&v, &["neg"]), 0.0);
        assert_eq!(read_count(&v, &["str"]), 0.0);
        assert_eq!(read_count(&v, &["float"]), 1.5);
        assert_eq!(read_count(&v, &["missing"]), 0.0);
    }

    #[test]
    fn test_read_array_defaults_to_empty() {
        let v = json!({ "list": [1, 2, 3], "obj": { "k": 1 } });
        assert_eq!(read_array(&v, &["list"]).len(), 3);
        assert!(read_array(&v, &["obj"]).is_empty());
        assert!(read_array(&v, &["missing"]).is_empty());
    }

    #[test]
    fn test_truthiness() {
        let v = json!({ "t": true, "f": false, "zero": 0, "one": 1, "empty": "", "s": "x", "obj": {} });
        assert!(read_truthy(&v, &["t"]));
        assert!(!read_truthy(&v, &["f"]));
        assert!(!read_truthy(&v, &["zero"]));
        assert!(read_truthy(&v, &["one"]));
        assert!(!read_truthy(&v, &["empty"]));
        assert!(read_truthy(&v, &["s"]));
        assert!(read_truthy(&v, &["obj"]));
        assert!(!read_truthy(&v, &["missing"]));
    }

    #[test]
    fn test_timestamp_formats() {
        let twitter = parse_timestamp("Wed Oct 10 20:19:24 +0000 2018").unwrap();
        assert_eq!(twitter, Utc.with_ymd_and_hms(2018, 10, 10, 20, 19, 24).unwrap());

        let rfc = parse_timestamp("2020-01-02T03:04:05Z").unwrap();
        assert_eq!(rfc.year(), 2020);

        let day = parse_timestamp("2019-06-01").unwrap();
        assert_eq!(day, Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap());

        let v = json!({ "ms": 1_577_836_800_000i64, "bad": "yesterday" });
        assert_eq!(read_timestamp(&v, &["ms"]), Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(read_timestamp(&v, &["bad"]), None);
    }

    #[test]
    fn test_shape_mismatch_reports_only_wrong_types() {
        let v = json!({ "list": { "not": "array" }, "ok": [], "nil": null });
        assert!(shape_mismatch(&v, &["list"], Kind::Array).is_some());
        assert!(shape_mismatch(&v, &["ok"], Kind::Array).is_none());
        assert!(shape_mismatch(&v, &["nil"], Kind::Array).is_none());
        assert!(shape_mismatch(&v, &["missing"], Kind::Array).is_none());
    }
}

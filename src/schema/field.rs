//! Field declarations and per-field checks

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Longest slug accepted in front-matter
pub const MAX_SLUG_LEN: usize = 200;

/// The type and constraints of a declared field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A string, optionally bounded in characters
    String { max: Option<usize> },
    /// A string restricted to the listed values
    Enum(&'static [&'static str]),
    /// A list of strings
    StringList,
    /// An absolute URL
    Url,
    /// An ISO-8601 date or date-time
    IsoDate,
    /// `true` or `false`
    Boolean,
    /// URL-safe identifier; derived from the file name when absent
    Slug,
    /// The file body, compiled later by the markup compiler
    Markup,
}

/// Whether a field must be present
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    Default(FieldValue),
}

/// One field of a collection schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
        }
    }

    pub fn with_default(name: &'static str, kind: FieldKind, default: FieldValue) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Default(default),
        }
    }

    /// Check a front-matter value against this field's kind.
    /// The error is the violated constraint.
    pub fn check(&self, value: &Value) -> Result<FieldValue, String> {
        match &self.kind {
            FieldKind::String { max } => {
                let s = expect_str(value)?;
                if let Some(max) = max {
                    let len = s.chars().count();
                    if len > *max {
                        return Err(format!(
                            "must be at most {} characters (got {})",
                            max, len
                        ));
                    }
                }
                Ok(FieldValue::Text(s.to_string()))
            }
            FieldKind::Enum(allowed) => {
                let s = expect_str(value)?;
                if allowed.contains(&s) {
                    Ok(FieldValue::Text(s.to_string()))
                } else {
                    Err(format!("must be one of: {}", allowed.join(", ")))
                }
            }
            FieldKind::StringList => {
                let items = value
                    .as_sequence()
                    .ok_or_else(|| "expected a list of strings".to_string())?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| format!("item {} is not a string", i))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::List)
            }
            FieldKind::Url => {
                let s = expect_str(value)?;
                let url = url::Url::parse(s).map_err(|e| format!("is not a valid URL ({})", e))?;
                if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
                    return Err(format!("is not an absolute http(s) URL: {:?}", s));
                }
                Ok(FieldValue::Text(s.to_string()))
            }
            FieldKind::IsoDate => {
                let s = expect_str(value)?;
                parse_date_string(s)
                    .map(FieldValue::Date)
                    .ok_or_else(|| format!("is not an ISO-8601 date: {:?}", s))
            }
            FieldKind::Boolean => value
                .as_bool()
                .map(FieldValue::Bool)
                .ok_or_else(|| "expected true or false".to_string()),
            FieldKind::Slug => {
                let s = expect_str(value)?;
                check_slug(s)?;
                Ok(FieldValue::Text(s.to_string()))
            }
            FieldKind::Markup => Err("is taken from the file body".to_string()),
        }
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| match value {
        Value::Number(n) => format!("expected a string, found number {}", n),
        Value::Bool(b) => format!("expected a string, found {}", b),
        Value::Sequence(_) => "expected a string, found a list".to_string(),
        Value::Mapping(_) => "expected a string, found a mapping".to_string(),
        _ => "expected a string".to_string(),
    })
}

/// Check that a slug is lowercase kebab-case and of acceptable length
pub fn check_slug(slug: &str) -> Result<(), String> {
    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("must be at most {} characters", MAX_SLUG_LEN));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(format!("must be lowercase kebab-case, got {:?}", slug));
    }
    Ok(())
}

/// A validated field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Date(DateTime<Utc>),
    Bool(bool),
    /// Raw body text awaiting compilation
    Markup(String),
}

/// Parse an ISO-8601 date or date-time, normalised to UTC.
/// Date-only values are taken as midnight UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_string_length_bound_counts_chars() {
        let spec = FieldSpec::required("title", FieldKind::String { max: Some(5) });
        assert_eq!(
            spec.check(&yaml("Größe")).unwrap(),
            FieldValue::Text("Größe".to_string())
        );
        let err = spec.check(&yaml("Größen")).unwrap_err();
        assert!(err.contains("at most 5"));
    }

    #[test]
    fn test_string_rejects_numbers() {
        let spec = FieldSpec::required("readTime", FieldKind::String { max: None });
        let err = spec.check(&yaml("8")).unwrap_err();
        assert!(err.contains("found number 8"));
    }

    #[test]
    fn test_enum_values() {
        let spec = FieldSpec::required("trend", FieldKind::Enum(&["up", "down"]));
        assert!(spec.check(&yaml("up")).is_ok());
        assert!(spec.check(&yaml("sideways")).unwrap_err().contains("up, down"));
    }

    #[test]
    fn test_string_list() {
        let spec = FieldSpec::required("techStack", FieldKind::StringList);
        assert_eq!(
            spec.check(&yaml("[Rust, Axum]")).unwrap(),
            FieldValue::List(vec!["Rust".to_string(), "Axum".to_string()])
        );
        assert!(spec.check(&yaml("[Rust, 3]")).unwrap_err().contains("item 1"));
        assert!(spec.check(&yaml("Rust")).is_err());
    }

    #[test]
    fn test_url() {
        let spec = FieldSpec::optional("liveUrl", FieldKind::Url);
        assert!(spec.check(&yaml("https://cg-bibi.de")).is_ok());
        assert!(spec.check(&yaml("not a url")).unwrap_err().contains("valid URL"));
        assert!(spec.check(&yaml("http://localhost:8080/demo")).is_ok());
        for value in ["mailto:x", "javascript:alert(1)", "file:///etc/passwd", "data:text/plain,hi"] {
            assert!(spec
                .check(&yaml(value))
                .unwrap_err()
                .contains("absolute http(s) URL"));
        }
    }

    #[test]
    fn test_iso_dates() {
        let spec = FieldSpec::required("date", FieldKind::IsoDate);
        let date = spec.check(&yaml("2024-04-10")).unwrap();
        match date {
            FieldValue::Date(d) => assert_eq!(d.to_rfc3339(), "2024-04-10T00:00:00+00:00"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(spec.check(&yaml("2025-01-02T10:30:00+02:00")).is_ok());
        assert!(spec.check(&yaml("2025-01-02 10:30:00")).is_ok());
        assert!(spec.check(&yaml("yesterday")).is_err());
        assert!(spec.check(&yaml("2025-13-40")).is_err());
    }

    #[test]
    fn test_boolean() {
        let spec = FieldSpec::with_default("featured", FieldKind::Boolean, FieldValue::Bool(false));
        assert_eq!(spec.check(&yaml("true")).unwrap(), FieldValue::Bool(true));
        assert!(spec.check(&yaml("\"yes\"")).is_err());
    }

    #[test]
    fn test_slug_shape() {
        assert!(check_slug("fes-kirchheim").is_ok());
        assert!(check_slug("clean-code-nextjs-16").is_ok());
        assert!(check_slug("Clean-Code").is_err());
        assert!(check_slug("double--dash").is_err());
        assert!(check_slug("-leading").is_err());
        assert!(check_slug("").is_err());
        assert!(check_slug(&"a".repeat(201)).is_err());
    }
}

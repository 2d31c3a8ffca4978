//! Front-matter parsing

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::error::SchemaViolation;

/// Pseudo-field that front-matter syntax errors are attributed to
pub const FRONTMATTER_FIELD: &str = "frontmatter";

/// A content file split into its front-matter fields and body, not yet
/// validated against any schema
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Path relative to the content root
    pub source: PathBuf,
    pub fields: Mapping,
    pub body: String,
    /// Number of lines in the file before the body starts
    pub body_line: usize,
}

impl RawRecord {
    /// Split a file's text into front-matter and body.
    ///
    /// A file without a YAML block yields no fields and the whole text as
    /// body. A YAML block that fails to parse is reported, not skipped.
    pub fn parse(source: impl Into<PathBuf>, text: &str) -> Result<Self, SchemaViolation> {
        let source = source.into();
        let text = text.trim_start_matches('\u{feff}');
        let (fields, body) = match split_yaml(text) {
            Some((yaml, body)) => (parse_mapping(&source, yaml)?, body),
            None => (Mapping::new(), text.trim_start()),
        };

        let body_line = text[..text.len() - body.len()].matches('\n').count();

        Ok(Self {
            source,
            fields,
            body: body.to_string(),
            body_line,
        })
    }
}

fn parse_mapping(source: &Path, yaml: &str) -> Result<Mapping, SchemaViolation> {
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| {
        SchemaViolation::new(source, FRONTMATTER_FIELD, format!("is not valid YAML: {}", e))
    })?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(SchemaViolation::new(
            source,
            FRONTMATTER_FIELD,
            "must be a mapping of field names to values",
        )),
    }
}

/// Find a `---` fenced YAML block at the start of the text.
/// Returns `(yaml, body)`.
fn split_yaml(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start();
    let rest = content.strip_prefix("---")?;
    let rest = rest.trim_start_matches(['\n', '\r']);

    // empty block: "---\n---"
    if let Some(after) = rest.strip_prefix("---") {
        return Some(("", after.trim_start_matches(['\n', '\r'])));
    }

    let end_pos = rest.find("\n---")?;
    let yaml_content = &rest[..end_pos];
    let remaining = &rest[end_pos + 4..];
    let remaining = remaining.trim_start_matches(['\n', '\r']);

    if yaml_content.trim().is_empty() {
        return Some(("", remaining));
    }

    // A leading thematic break followed by prose is not front-matter.
    // Real front-matter has at least one `key:` line.
    let has_yaml_structure = yaml_content.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        if let Some(colon_pos) = trimmed.find(':') {
            let before_colon = &trimmed[..colon_pos];
            let is_valid_key = !before_colon.is_empty()
                && before_colon
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                && before_colon != "http"
                && before_colon != "https"
                && before_colon != "ftp";
            if is_valid_key {
                let after_colon = &trimmed[colon_pos + 1..];
                return after_colon.is_empty() || after_colon.starts_with(' ');
            }
        }
        false
    });

    if has_yaml_structure {
        Some((yaml_content, remaining))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Clean Code in Next.js 16
date: 2024-04-10
techStack:
  - Next.js 16
  - TypeScript
featured: true
---

This is the content.
"#;

        let record = RawRecord::parse("posts/clean-code.mdx", content).unwrap();
        assert_eq!(
            record.fields.get("title").and_then(Value::as_str),
            Some("Clean Code in Next.js 16")
        );
        assert_eq!(
            record.fields.get("date").and_then(Value::as_str),
            Some("2024-04-10")
        );
        assert_eq!(record.fields.get("featured").and_then(Value::as_bool), Some(true));
        assert_eq!(record.body, "This is the content.\n");
        assert_eq!(record.source, PathBuf::from("posts/clean-code.mdx"));
    }

    #[test]
    fn test_no_frontmatter() {
        let record = RawRecord::parse("posts/bare.mdx", "# Just a heading\n").unwrap();
        assert!(record.fields.is_empty());
        assert_eq!(record.body, "# Just a heading\n");
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

---
More content here.
"#;

        let record = RawRecord::parse("posts/x.mdx", content).unwrap();
        assert!(record.fields.is_empty());
        assert!(record.body.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let record = RawRecord::parse("posts/x.mdx", content).unwrap();
        assert!(record.fields.is_empty());
        assert!(record.body.contains("https://example.com"));
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let content = "---\ntitle: [unclosed\ndate: 2024-01-01\n---\nBody\n";
        let err = RawRecord::parse("posts/broken.mdx", content).unwrap_err();
        assert_eq!(err.field, FRONTMATTER_FIELD);
        assert_eq!(err.file, PathBuf::from("posts/broken.mdx"));
        assert!(err.constraint.contains("not valid YAML"));
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let record = RawRecord::parse("posts/x.mdx", "---\n---\nBody\n").unwrap();
        assert!(record.fields.is_empty());
        assert_eq!(record.body, "Body\n");
        assert_eq!(record.body_line, 2);
    }
}

//! Content schema registry
//!
//! Each collection declares a closed set of front-matter fields with their
//! kind, constraints and presence. Validation is pure: a raw record either
//! becomes a [`ValidatedRecord`] or yields every violation found in it.

mod collections;
mod field;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub use collections::{posts_schema, works_schema};
pub use field::{check_slug, parse_date_string, FieldKind, FieldSpec, FieldValue, Presence};

use crate::content::RawRecord;
use crate::error::SchemaViolation;

/// Declared shape of one content collection
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    /// Collection name, also the directory under the content root
    pub name: &'static str,
    /// Name of the entity type stored in the collection
    pub entity: &'static str,
    /// Glob patterns, relative to the content root, selecting member files
    pub patterns: Vec<glob::Pattern>,
    pub fields: Vec<FieldSpec>,
}

impl CollectionSchema {
    /// Look up a declared field
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a path relative to the content root belongs to this collection
    pub fn matches(&self, relative: &Path) -> bool {
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(relative, options))
    }

    /// Validate a raw record, collecting every violation
    pub fn validate(&self, raw: &RawRecord) -> Result<ValidatedRecord, Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        let mut fields = IndexMap::new();
        let violation =
            |field: &str, constraint: String| SchemaViolation::new(&raw.source, field, constraint);

        for key in raw.fields.keys() {
            match key.as_str() {
                Some(k) if self.field(k).is_some() => {}
                Some(k) => violations.push(violation(k, "is an unknown field".to_string())),
                None => violations.push(violation(
                    "frontmatter",
                    format!("has a non-string key {:?}", key),
                )),
            }
        }

        for spec in &self.fields {
            if spec.kind == FieldKind::Markup {
                if raw.fields.contains_key(spec.name) {
                    violations.push(violation(
                        spec.name,
                        "is taken from the file body and cannot be set in front-matter"
                            .to_string(),
                    ));
                }
                fields.insert(spec.name, FieldValue::Markup(raw.body.clone()));
                continue;
            }

            let value = raw.fields.get(spec.name).filter(|v| !v.is_null());
            match value {
                Some(value) => match spec.check(value) {
                    Ok(checked) => {
                        fields.insert(spec.name, checked);
                    }
                    Err(constraint) => violations.push(violation(spec.name, constraint)),
                },
                None if spec.kind == FieldKind::Slug => match derive_slug(&raw.source) {
                    Some(slug) => {
                        fields.insert(spec.name, FieldValue::Text(slug));
                    }
                    None => violations.push(violation(
                        spec.name,
                        "is missing and cannot be derived from the file name".to_string(),
                    )),
                },
                None => match &spec.presence {
                    Presence::Required => {
                        violations.push(violation(spec.name, "is required".to_string()))
                    }
                    Presence::Optional => {}
                    Presence::Default(default) => {
                        fields.insert(spec.name, default.clone());
                    }
                },
            }
        }

        if violations.is_empty() {
            Ok(ValidatedRecord {
                collection: self.name,
                source: raw.source.clone(),
                fields,
            })
        } else {
            Err(violations)
        }
    }
}

/// Derive a slug from a content path: the file stem, or the parent
/// directory for `index` files.
pub fn derive_slug(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    let name = if stem == "index" {
        source.parent()?.file_name()?.to_str()?
    } else {
        stem
    };
    let slug = slug::slugify(name);
    check_slug(&slug).ok().map(|_| slug)
}

/// A record that passed schema validation
#[derive(Debug, Clone)]
pub struct ValidatedRecord {
    pub collection: &'static str,
    pub source: PathBuf,
    pub fields: IndexMap<&'static str, FieldValue>,
}

impl ValidatedRecord {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.fields.get(name)? {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(name)? {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)? {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The first markup field and its raw body
    pub fn markup(&self) -> Option<(&'static str, &str)> {
        self.fields.iter().find_map(|(name, value)| match value {
            FieldValue::Markup(body) => Some((*name, body.as_str())),
            _ => None,
        })
    }

    pub fn require_text(&self, name: &str) -> Result<String, SchemaViolation> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| self.missing(name))
    }

    pub fn require_list(&self, name: &str) -> Result<Vec<String>, SchemaViolation> {
        self.list(name).map(<[String]>::to_vec).ok_or_else(|| self.missing(name))
    }

    pub fn require_date(&self, name: &str) -> Result<DateTime<Utc>, SchemaViolation> {
        self.date(name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> SchemaViolation {
        SchemaViolation::new(&self.source, name, "is required")
    }
}

/// All collection schemas known to the site
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    collections: IndexMap<&'static str, CollectionSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `posts` and `works` collections of the portfolio
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(posts_schema());
        registry.insert(works_schema());
        registry
    }

    /// Add a schema, replacing any previous one with the same name
    pub fn insert(&mut self, schema: CollectionSchema) {
        self.collections.insert(schema.name, schema);
    }

    pub fn get(&self, collection: &str) -> Option<&CollectionSchema> {
        self.collections.get(collection)
    }

    pub fn collections(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.collections.values()
    }

    /// Validate a raw record against the named collection
    pub fn validate(
        &self,
        collection: &str,
        raw: &RawRecord,
    ) -> Option<Result<ValidatedRecord, Vec<SchemaViolation>>> {
        self.get(collection).map(|schema| schema.validate(raw))
    }
}

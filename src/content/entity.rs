//! Post and Work models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SchemaViolation;
use crate::index::{Collection, Snapshot};
use crate::markup::Document;
use crate::schema::ValidatedRecord;

/// A validated, compiled content entity
pub trait Entry: Serialize + Send + Sync + Sized + 'static {
    /// Name of the collection holding this entity type
    const COLLECTION: &'static str;

    /// Build the entity from a validated record and its compiled body
    fn from_record(record: ValidatedRecord, content: Document) -> Result<Self, SchemaViolation>;

    /// This entity type's collection within a snapshot
    fn select(snapshot: &Snapshot) -> &Collection<Self>;

    fn slug(&self) -> &str;
    fn title(&self) -> &str;
    fn date(&self) -> DateTime<Utc>;
    fn featured(&self) -> bool;
    /// Content file, relative to the content root
    fn source(&self) -> &Path;
    fn content(&self) -> &Document;

    /// Short description for listings and page metadata
    fn description(&self) -> Option<&str> {
        None
    }

    /// Root-relative page path, e.g. `/posts/clean-code/`
    fn path(&self) -> String {
        crate::helpers::entry_path(Self::COLLECTION, self.slug())
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub category: String,
    /// Display string such as `8 min read`
    pub read_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub source: PathBuf,
    pub content: Document,
}

impl Entry for Post {
    const COLLECTION: &'static str = "posts";

    fn from_record(record: ValidatedRecord, content: Document) -> Result<Self, SchemaViolation> {
        Ok(Self {
            slug: record.require_text("slug")?,
            title: record.require_text("title")?,
            date: record.require_date("date")?,
            category: record.require_text("category")?,
            read_time: record.require_text("readTime")?,
            excerpt: record.text("excerpt").map(str::to_string),
            featured: record.flag("featured").unwrap_or(false),
            source: record.source,
            content,
        })
    }

    fn select(snapshot: &Snapshot) -> &Collection<Self> {
        &snapshot.posts
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn featured(&self) -> bool {
        self.featured
    }

    fn source(&self) -> &Path {
        &self.source
    }

    fn content(&self) -> &Document {
        &self.content
    }

    fn description(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }
}

/// A case study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub date: DateTime<Utc>,
    /// Display string such as `2023 - 2024`
    pub timeline: String,
    pub role: String,
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub source: PathBuf,
    pub content: Document,
}

impl Entry for Work {
    const COLLECTION: &'static str = "works";

    fn from_record(record: ValidatedRecord, content: Document) -> Result<Self, SchemaViolation> {
        Ok(Self {
            slug: record.require_text("slug")?,
            title: record.require_text("title")?,
            subtitle: record.require_text("subtitle")?,
            date: record.require_date("date")?,
            timeline: record.require_text("timeline")?,
            role: record.require_text("role")?,
            tech_stack: record.require_list("techStack")?,
            live_url: record.text("liveUrl").map(str::to_string),
            video_url: record.text("videoUrl").map(str::to_string),
            featured: record.flag("featured").unwrap_or(false),
            source: record.source,
            content,
        })
    }

    fn select(snapshot: &Snapshot) -> &Collection<Self> {
        &snapshot.works
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn featured(&self) -> bool {
        self.featured
    }

    fn source(&self) -> &Path {
        &self.source
    }

    fn content(&self) -> &Document {
        &self.content
    }

    fn description(&self) -> Option<&str> {
        Some(&self.subtitle)
    }
}

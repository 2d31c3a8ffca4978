//! Error types for the content pipeline

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A single field of a single content file that failed its declared constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: `{field}` {constraint}", .file.display())]
pub struct SchemaViolation {
    /// Content file, relative to the content root
    pub file: PathBuf,
    /// Field name as written in the front-matter
    pub field: String,
    /// Human readable description of the violated constraint
    pub constraint: String,
}

impl SchemaViolation {
    pub fn new(
        file: impl Into<PathBuf>,
        field: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// A problem found while ingesting one collection
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error(
        "duplicate slug `{slug}` in {collection}: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        collection: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// The content file this problem is attributed to
    pub fn file(&self) -> &Path {
        match self {
            ContentError::Schema(violation) => &violation.file,
            ContentError::DuplicateSlug { second, .. } => second,
            ContentError::Io { path, .. } => path,
        }
    }
}

/// Every problem found by a failed one-shot build
#[derive(Debug, Error)]
#[error("content build failed with {} problem(s):\n{}", .problems.len(), list_problems(.problems))]
pub struct BuildFailure {
    pub problems: Vec<ContentError>,
}

fn list_problems(problems: &[ContentError]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Why an ingestion pass produced no snapshot
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Failed(#[from] BuildFailure),

    #[error("no schema registered for collection `{0}`")]
    UnregisteredCollection(String),

    #[error("content ingestion was cancelled")]
    Cancelled,
}

/// Markup that could not be compiled into a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct MarkupError {
    pub line: usize,
    pub message: String,
}

impl MarkupError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Failures of the render step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no entry `{slug}` in {collection}")]
    NotFound { collection: String, slug: String },

    #[error("no renderer registered for structural tag <{tag}>")]
    UnknownStructuralTag { tag: String },

    #[error("<{tag}>: prop `{prop}` {reason}")]
    InvalidProp {
        tag: String,
        prop: String,
        reason: String,
    },

    #[error("renderer for <{tag}> is already registered")]
    DuplicateComponent { tag: String },
}

impl RenderError {
    pub fn not_found(collection: impl Into<String>, slug: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            slug: slug.into(),
        }
    }

    pub fn invalid_prop(
        tag: impl Into<String>,
        prop: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProp {
            tag: tag.into(),
            prop: prop.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the expected "missing resource" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::NotFound { .. })
    }
}

//! Render binder: resolves entries in a snapshot and renders their
//! documents to HTML
//!
//! Intrinsic nodes are written as standard HTML. Each structural node is
//! handed to the component registered for its tag together with its props
//! and its already rendered children.

mod components;
mod highlight;
mod html;
mod registry;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

pub use components::{standard, ICONS};
pub use highlight::Highlighter;
pub use registry::{Component, ComponentRegistry};

use crate::content::{Entry, Post, Work};
use crate::error::RenderError;
use crate::index::Snapshot;
use crate::markup::Document;
use html::HtmlWriter;

/// Page metadata of a rendered entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub collection: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    /// Root-relative page path
    pub path: String,
}

impl PageMeta {
    pub fn of<T: Entry>(entity: &T) -> Self {
        Self {
            collection: T::COLLECTION.to_string(),
            slug: entity.slug().to_string(),
            title: entity.title().to_string(),
            description: entity.description().map(str::to_string),
            date: entity.date(),
            path: entity.path(),
        }
    }
}

/// A rendered entry
#[derive(Debug, Clone)]
pub struct Rendered<T> {
    pub entity: Arc<T>,
    pub html: String,
    pub meta: PageMeta,
}

/// A rendered entry of any collection
#[derive(Debug, Clone)]
pub enum RenderedEntry {
    Post(Rendered<Post>),
    Work(Rendered<Work>),
}

impl RenderedEntry {
    pub fn html(&self) -> &str {
        match self {
            RenderedEntry::Post(r) => &r.html,
            RenderedEntry::Work(r) => &r.html,
        }
    }

    pub fn meta(&self) -> &PageMeta {
        match self {
            RenderedEntry::Post(r) => &r.meta,
            RenderedEntry::Work(r) => &r.meta,
        }
    }
}

/// Renders entries against one component registry
#[derive(Clone, Copy)]
pub struct RenderBinder<'a> {
    registry: &'a ComponentRegistry,
    highlighter: Option<&'a Highlighter>,
}

impl<'a> RenderBinder<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            registry,
            highlighter: None,
        }
    }

    /// Highlight fenced code; without a highlighter code is only escaped
    pub fn with_highlighter(mut self, highlighter: &'a Highlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn registry(&self) -> &ComponentRegistry {
        self.registry
    }

    pub fn render_document(&self, document: &Document) -> Result<String, RenderError> {
        HtmlWriter {
            registry: self.registry,
            highlighter: self.highlighter,
        }
        .document(document)
    }

    pub fn render_entity<T: Entry>(&self, entity: &Arc<T>) -> Result<Rendered<T>, RenderError> {
        Ok(Rendered {
            html: self.render_document(entity.content())?,
            meta: PageMeta::of(entity.as_ref()),
            entity: entity.clone(),
        })
    }

    /// Look up `slug` in the entity type's collection and render it
    pub fn lookup<T: Entry>(&self, snapshot: &Snapshot, slug: &str) -> Result<Rendered<T>, RenderError> {
        let entity = snapshot
            .collection::<T>()
            .get(slug)
            .ok_or_else(|| RenderError::not_found(T::COLLECTION, slug))?;
        self.render_entity(entity)
    }

    pub fn post(&self, snapshot: &Snapshot, slug: &str) -> Result<Rendered<Post>, RenderError> {
        self.lookup(snapshot, slug)
    }

    pub fn work(&self, snapshot: &Snapshot, slug: &str) -> Result<Rendered<Work>, RenderError> {
        self.lookup(snapshot, slug)
    }

    /// Render by collection name; an unknown collection is not found
    pub fn render(
        &self,
        snapshot: &Snapshot,
        collection: &str,
        slug: &str,
    ) -> Result<RenderedEntry, RenderError> {
        match collection {
            Post::COLLECTION => self.post(snapshot, slug).map(RenderedEntry::Post),
            Work::COLLECTION => self.work(snapshot, slug).map(RenderedEntry::Work),
            _ => Err(RenderError::not_found(collection, slug)),
        }
    }

    /// Structural tags of a document without a registered component
    pub fn unknown_tags<'d>(&self, document: &'d Document) -> Vec<&'d str> {
        document
            .structural_tags()
            .into_iter()
            .filter(|tag| !self.registry.contains(tag))
            .collect()
    }
}

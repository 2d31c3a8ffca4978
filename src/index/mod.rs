//! Collection index: immutable, date-ordered collections and the snapshot
//! that publishes them

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::content::{Entry, Post, Work};
use crate::error::ContentError;

/// The entities of one collection, newest first
#[derive(Debug)]
pub struct Collection<T> {
    entries: Vec<Arc<T>>,
    by_slug: HashMap<String, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_slug: HashMap::new(),
        }
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            by_slug: self.by_slug.clone(),
        }
    }
}

impl<T: Entry> Collection<T> {
    /// Index entities given in source path order.
    ///
    /// Entries are sorted by date descending, ties broken by slug
    /// ascending. Every repeated slug is reported against the first file
    /// that claimed it.
    pub fn build(mut entries: Vec<Arc<T>>) -> Result<Self, Vec<ContentError>> {
        let mut claimed: HashMap<&str, &Path> = HashMap::new();
        let mut duplicates = Vec::new();
        for entry in &entries {
            if let Some(first) = claimed.insert(entry.slug(), entry.source()) {
                duplicates.push(ContentError::DuplicateSlug {
                    collection: T::COLLECTION.to_string(),
                    slug: entry.slug().to_string(),
                    first: first.to_path_buf(),
                    second: entry.source().to_path_buf(),
                });
                claimed.insert(entry.slug(), first);
            }
        }
        if !duplicates.is_empty() {
            return Err(duplicates);
        }

        entries.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then_with(|| a.slug().cmp(b.slug()))
        });
        let by_slug = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.slug().to_string(), i))
            .collect();

        Ok(Self { entries, by_slug })
    }

    /// All entries, newest first
    pub fn list(&self) -> &[Arc<T>] {
        &self.entries
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<T>> {
        self.by_slug.get(slug).map(|&i| &self.entries[i])
    }

    /// The `n` newest entries
    pub fn recent(&self, n: usize) -> &[Arc<T>] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn featured(&self) -> Vec<&Arc<T>> {
        self.entries.iter().filter(|e| e.featured()).collect()
    }

    /// Slugs in listing order, for static path generation
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.slug())
    }

    /// The entries listed before (newer) and after (older) `slug`
    pub fn neighbors(&self, slug: &str) -> (Option<&Arc<T>>, Option<&Arc<T>>) {
        match self.by_slug.get(slug) {
            Some(&i) => (
                i.checked_sub(1).and_then(|p| self.entries.get(p)),
                self.entries.get(i + 1),
            ),
            None => (None, None),
        }
    }

    /// The entity loaded from a content file
    pub fn find_by_source(&self, source: &Path) -> Option<&Arc<T>> {
        self.entries.iter().find(|e| e.source() == source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Collection<Post> {
    /// Posts of one category, case-insensitively
    pub fn by_category(&self, name: &str) -> Vec<&Arc<Post>> {
        self.entries
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(name))
            .collect()
    }

    /// Category names with their post counts
    pub fn categories(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for post in &self.entries {
            *counts.entry(post.category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter().map(|e| e.as_ref()))
    }
}

/// One consistent, immutable view of all collections
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub posts: Collection<Post>,
    pub works: Collection<Work>,
    pub built_at: DateTime<Utc>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Collection::default(), Collection::default())
    }
}

impl Snapshot {
    pub fn new(posts: Collection<Post>, works: Collection<Work>) -> Self {
        Self {
            posts,
            works,
            built_at: Utc::now(),
        }
    }

    /// The collection of an entity type
    pub fn collection<T: Entry>(&self) -> &Collection<T> {
        T::select(self)
    }
}

/// Shared cell publishing the current snapshot.
///
/// Readers get an `Arc` and keep a consistent view for as long as they
/// hold it; writers replace the whole snapshot at once.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn load(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

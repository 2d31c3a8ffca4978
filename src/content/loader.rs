//! Content loader - loads, validates and compiles collections from the
//! content directory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{Entry, Post, RawRecord, Work};
use crate::error::{BuildFailure, ContentError, IngestError, SchemaViolation};
use crate::index::{Collection, Snapshot};
use crate::markup;
use crate::schema::{CollectionSchema, SchemaRegistry};

/// How problems in content files are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Any problem fails the whole build and nothing is published
    OneShot,
    /// Problems are reported; the previous good entity of a broken file
    /// is kept
    Watch,
}

/// Result of a successful ingestion pass
#[derive(Debug)]
pub struct IngestReport {
    pub snapshot: Snapshot,
    /// Problems that were tolerated (watch mode only)
    pub problems: Vec<ContentError>,
}

/// Loads content from the content directory
pub struct ContentLoader {
    content_dir: PathBuf,
    registry: SchemaRegistry,
    mode: BuildMode,
    cancel: Arc<AtomicBool>,
}

impl ContentLoader {
    /// Create a loader over `content_dir` with the standard collections
    pub fn new(content_dir: impl Into<PathBuf>, mode: BuildMode) -> Self {
        Self {
            content_dir: content_dir.into(),
            registry: SchemaRegistry::standard(),
            mode,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Share a cancellation flag; setting it stops ingestion between files
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Load every collection into a new snapshot.
    ///
    /// `previous` is the currently published snapshot; in watch mode its
    /// entities stand in for files that no longer validate.
    pub fn ingest(&self, previous: Option<&Snapshot>) -> Result<IngestReport, IngestError> {
        let mut problems = Vec::new();

        let posts = self.load_collection::<Post>(previous.map(|s| &s.posts), &mut problems)?;
        let works = self.load_collection::<Work>(previous.map(|s| &s.works), &mut problems)?;

        if self.mode == BuildMode::OneShot && !problems.is_empty() {
            return Err(BuildFailure { problems }.into());
        }

        info!(
            "Ingested {} posts and {} works ({} problems)",
            posts.len(),
            works.len(),
            problems.len()
        );

        Ok(IngestReport {
            snapshot: Snapshot::new(posts, works),
            problems,
        })
    }

    /// Load one collection, appending every problem found to `problems`
    pub fn load_collection<T: Entry>(
        &self,
        previous: Option<&Collection<T>>,
        problems: &mut Vec<ContentError>,
    ) -> Result<Collection<T>, IngestError> {
        let schema = self
            .registry
            .get(T::COLLECTION)
            .ok_or_else(|| IngestError::UnregisteredCollection(T::COLLECTION.to_string()))?;

        let mut entries: Vec<Arc<T>> = Vec::new();
        for path in self.discover(schema) {
            if self.cancel.load(Ordering::SeqCst) {
                return Err(IngestError::Cancelled);
            }

            let relative = path
                .strip_prefix(&self.content_dir)
                .unwrap_or(&path)
                .to_path_buf();

            match self.load_entry::<T>(schema, &path, &relative) {
                Ok(entry) => {
                    debug!("Loaded {}", relative.display());
                    entries.push(Arc::new(entry));
                }
                Err(errors) => {
                    if self.mode == BuildMode::Watch {
                        for error in &errors {
                            warn!("{}", error);
                        }
                        if let Some(kept) = previous.and_then(|c| c.find_by_source(&relative)) {
                            warn!(
                                "Keeping previous version of {} ({})",
                                kept.slug(),
                                relative.display()
                            );
                            entries.push(kept.clone());
                        }
                    }
                    problems.extend(errors);
                }
            }
        }

        if self.mode == BuildMode::Watch {
            entries = resolve_duplicates(entries, previous, problems);
        }

        match Collection::build(entries) {
            Ok(collection) => Ok(collection),
            Err(duplicates) => {
                problems.extend(duplicates);
                Ok(Collection::default())
            }
        }
    }

    /// Read, validate and compile a single content file
    fn load_entry<T: Entry>(
        &self,
        schema: &CollectionSchema,
        path: &Path,
        relative: &Path,
    ) -> Result<T, Vec<ContentError>> {
        let text = fs::read_to_string(path).map_err(|source| {
            vec![ContentError::Io {
                path: relative.to_path_buf(),
                source,
            }]
        })?;

        let raw = RawRecord::parse(relative, &text).map_err(|v| vec![v.into()])?;
        let record = schema
            .validate(&raw)
            .map_err(|violations| violations.into_iter().map(ContentError::from).collect::<Vec<_>>())?;

        let (field, body) = record
            .markup()
            .map(|(field, body)| (field, body.to_string()))
            .unwrap_or(("content", String::new()));
        let document = markup::compile(&body).map_err(|e| {
            let line = raw.body_line + e.line;
            vec![SchemaViolation::new(relative, field, format!("line {}: {}", line, e.message)).into()]
        })?;

        T::from_record(record, document).map_err(|v| vec![v.into()])
    }

    /// Files of a collection, in sorted path order
    fn discover(&self, schema: &CollectionSchema) -> Vec<PathBuf> {
        if !self.content_dir.exists() {
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                path.strip_prefix(&self.content_dir)
                    .map(|relative| schema.matches(relative))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    }
}

/// Keep one entity per slug. The holder of the slug in the previous
/// snapshot wins, otherwise the first by source path; the rest are
/// reported and dropped.
fn resolve_duplicates<T: Entry>(
    entries: Vec<Arc<T>>,
    previous: Option<&Collection<T>>,
    problems: &mut Vec<ContentError>,
) -> Vec<Arc<T>> {
    let mut kept: Vec<Arc<T>> = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(pos) = kept.iter().position(|k| k.slug() == entry.slug()) else {
            kept.push(entry);
            continue;
        };

        let incumbent = previous
            .and_then(|c| c.get(entry.slug()))
            .map(|p| p.source().to_path_buf());
        let current = kept[pos].clone();
        let (winner, loser) = if incumbent.as_deref() == Some(entry.source()) {
            (entry, current)
        } else {
            (current, entry)
        };

        let error = ContentError::DuplicateSlug {
            collection: T::COLLECTION.to_string(),
            slug: winner.slug().to_string(),
            first: winner.source().to_path_buf(),
            second: loser.source().to_path_buf(),
        };
        warn!("{}", error);
        problems.push(error);
        kept[pos] = winner;
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ncategory: Engineering\nreadTime: 5 min read\n---\n\nHello from {}.\n",
            title, date, title
        )
    }

    fn post_with_slug(slug: &str, date: &str) -> String {
        format!(
            "---\ntitle: Post\nslug: {}\ndate: {}\ncategory: Engineering\nreadTime: 5 min read\n---\n\nBody.\n",
            slug, date
        )
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/older.mdx", &post("Older", "2024-04-10"));
        write(dir.path(), "posts/newer.mdx", &post("Newer", "2025-01-02"));
        write(
            dir.path(),
            "works/fes/index.mdx",
            "---\ntitle: FES\nsubtitle: Relaunch\ndate: 2024-09-01\ntimeline: \"2024\"\nrole: Lead\ntechStack: [Rust]\n---\n\n<Callout title=\"Note\">\nBuilt fast.\n</Callout>\n",
        );
        dir
    }

    #[test]
    fn test_one_shot_ingest_orders_by_date() {
        let dir = site();
        let loader = ContentLoader::new(dir.path(), BuildMode::OneShot);
        let report = loader.ingest(None).unwrap();

        let slugs: Vec<_> = report.snapshot.posts.slugs().collect();
        assert_eq!(slugs, vec!["newer", "older"]);
        assert!(report.problems.is_empty());

        let work = report.snapshot.works.get("fes").unwrap();
        assert_eq!(
            work.content.structural_tags().into_iter().collect::<Vec<_>>(),
            vec!["Callout"]
        );
        assert_eq!(work.source, Path::new("works/fes/index.mdx"));
    }

    #[test]
    fn test_one_shot_fails_on_any_violation() {
        let dir = site();
        write(dir.path(), "posts/long.mdx", &post(&"x".repeat(150), "2024-01-01"));
        write(dir.path(), "posts/nodate.mdx", "---\ntitle: A\ncategory: A\nreadTime: 1 min\n---\n");

        let loader = ContentLoader::new(dir.path(), BuildMode::OneShot);
        match loader.ingest(None) {
            Err(IngestError::Failed(failure)) => {
                assert_eq!(failure.problems.len(), 2);
                assert!(failure
                    .problems
                    .iter()
                    .any(|p| matches!(p, ContentError::Schema(v) if v.field == "title")));
            }
            other => panic!("expected build failure, got {:?}", other.map(|r| r.problems)),
        }
    }

    #[test]
    fn test_duplicate_slug_fails_one_shot_build() {
        let dir = site();
        write(dir.path(), "posts/a.mdx", &post_with_slug("same", "2024-01-01"));
        write(dir.path(), "posts/b.mdx", &post_with_slug("same", "2024-02-01"));

        let loader = ContentLoader::new(dir.path(), BuildMode::OneShot);
        match loader.ingest(None) {
            Err(IngestError::Failed(failure)) => {
                assert_eq!(failure.problems.len(), 1);
                match &failure.problems[0] {
                    ContentError::DuplicateSlug {
                        slug, first, second, ..
                    } => {
                        assert_eq!(slug, "same");
                        assert_eq!(first, Path::new("posts/a.mdx"));
                        assert_eq!(second, Path::new("posts/b.mdx"));
                    }
                    other => panic!("expected duplicate slug, got {}", other),
                }
            }
            other => panic!("expected build failure, got {:?}", other.map(|r| r.problems)),
        }
    }

    #[test]
    fn test_markup_errors_are_attributed_to_content() {
        let dir = site();
        write(
            dir.path(),
            "posts/broken.mdx",
            "---\ntitle: Broken\ndate: 2024-01-01\ncategory: A\nreadTime: 1 min\n---\n\n<Callout>\nnever closed\n",
        );

        let loader = ContentLoader::new(dir.path(), BuildMode::OneShot);
        let Err(IngestError::Failed(failure)) = loader.ingest(None) else {
            panic!("expected build failure");
        };
        match &failure.problems[0] {
            ContentError::Schema(v) => {
                assert_eq!(v.field, "content");
                assert_eq!(v.file, Path::new("posts/broken.mdx"));
                assert!(v.constraint.contains("line 8"));
            }
            other => panic!("expected schema violation, got {}", other),
        }
    }

    #[test]
    fn test_watch_mode_keeps_previous_good_entity() {
        let dir = site();
        let loader = ContentLoader::new(dir.path(), BuildMode::Watch);
        let first = loader.ingest(None).unwrap().snapshot;
        assert_eq!(first.posts.len(), 2);

        write(dir.path(), "posts/older.mdx", "---\ntitle: [broken\n---\n");
        let report = loader.ingest(Some(&first)).unwrap();

        assert_eq!(report.problems.len(), 1);
        assert_eq!(report.snapshot.posts.len(), 2);
        let kept = report.snapshot.posts.get("older").unwrap();
        assert!(Arc::ptr_eq(kept, first.posts.get("older").unwrap()));
    }

    #[test]
    fn test_watch_mode_without_previous_drops_broken_file() {
        let dir = site();
        write(dir.path(), "posts/broken.mdx", "---\ntitle: A\n---\n");

        let loader = ContentLoader::new(dir.path(), BuildMode::Watch);
        let report = loader.ingest(None).unwrap();
        assert_eq!(report.snapshot.posts.len(), 2);
        assert!(!report.problems.is_empty());
    }

    #[test]
    fn test_watch_mode_duplicate_prefers_previous_holder() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/b.mdx", &post_with_slug("same", "2024-01-01"));
        let loader = ContentLoader::new(dir.path(), BuildMode::Watch);
        let first = loader.ingest(None).unwrap().snapshot;

        write(dir.path(), "posts/a.mdx", &post_with_slug("same", "2024-02-01"));
        let report = loader.ingest(Some(&first)).unwrap();

        assert_eq!(report.snapshot.posts.len(), 1);
        assert_eq!(
            report.snapshot.posts.get("same").unwrap().source,
            Path::new("posts/b.mdx")
        );
        assert!(matches!(
            &report.problems[0],
            ContentError::DuplicateSlug { second, .. } if second == Path::new("posts/a.mdx")
        ));
    }

    #[test]
    fn test_watch_mode_duplicate_without_history_keeps_first_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/b.mdx", &post_with_slug("same", "2024-01-01"));
        write(dir.path(), "posts/a.mdx", &post_with_slug("same", "2024-02-01"));

        let loader = ContentLoader::new(dir.path(), BuildMode::Watch);
        let report = loader.ingest(None).unwrap();
        assert_eq!(
            report.snapshot.posts.get("same").unwrap().source,
            Path::new("posts/a.mdx")
        );
        assert_eq!(report.problems.len(), 1);
    }

    #[test]
    fn test_cancelled_ingest_produces_nothing() {
        let dir = site();
        let loader = ContentLoader::new(dir.path(), BuildMode::OneShot);
        loader.cancel_flag().store(true, Ordering::SeqCst);
        assert!(matches!(loader.ingest(None), Err(IngestError::Cancelled)));
    }

    #[test]
    fn test_unregistered_collection() {
        let dir = site();
        let loader =
            ContentLoader::new(dir.path(), BuildMode::OneShot).with_registry(SchemaRegistry::new());
        assert!(matches!(
            loader.ingest(None),
            Err(IngestError::UnregisteredCollection(name)) if name == "posts"
        ));
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path().join("nope"), BuildMode::OneShot);
        let report = loader.ingest(None).unwrap();
        assert!(report.snapshot.posts.is_empty());
        assert!(report.snapshot.works.is_empty());
    }
}

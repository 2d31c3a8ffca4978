//! Content watcher for the development server
//!
//! Re-ingests the content directory whenever a content file changes and
//! publishes the new snapshot. Files that stop validating keep their last
//! good version.

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::content::ContentLoader;
use crate::error::IngestError;
use crate::index::SnapshotHandle;

/// Quiet period before a burst of file events triggers a rebuild
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// How often the watch loop looks at the cancel flag
const POLL: Duration = Duration::from_millis(200);

/// Ingest against the published snapshot and publish the result.
///
/// Returns the number of problems reported. A cancelled ingestion publishes
/// nothing.
pub fn reingest(loader: &ContentLoader, handle: &SnapshotHandle) -> Result<usize, IngestError> {
    let previous = handle.load();
    let report = loader.ingest(Some(&previous))?;
    let count = report.problems.len();
    handle.publish(report.snapshot);
    Ok(count)
}

/// Whether a changed path can affect the snapshot
fn is_content_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false);
    let content = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("mdx")
    );
    // A removed directory has no extension but drops its entries
    !hidden && (content || path.extension().is_none())
}

fn relevant(events: &[DebouncedEvent]) -> Vec<&Path> {
    events
        .iter()
        .map(|e| e.path.as_path())
        .filter(|p| is_content_file(p))
        .collect()
}

/// Watch the loader's content directory until its cancel flag is set.
///
/// Blocks the calling thread; run it on a blocking task.
pub fn watch(loader: &ContentLoader, handle: &SnapshotHandle) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;
    debouncer
        .watcher()
        .watch(loader.content_dir(), RecursiveMode::Recursive)?;
    info!("Watching {}", loader.content_dir().display());

    let cancel = loader.cancel_flag();
    while !cancel.load(Ordering::Relaxed) {
        match rx.recv_timeout(POLL) {
            Ok(Ok(events)) => {
                let changed = relevant(&events);
                if changed.is_empty() {
                    continue;
                }
                for path in &changed {
                    debug!("Changed: {}", path.display());
                }

                match reingest(loader, handle) {
                    Ok(0) => info!("Content reloaded"),
                    Ok(n) => warn!("Content reloaded with {} problems", n),
                    Err(IngestError::Cancelled) => break,
                    Err(e) => error!("Reload failed: {}", e),
                }
            }
            Ok(Err(e)) => error!("Watch error: {:?}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                error!("Watcher channel closed");
                break;
            }
        }
    }

    debug!("Watcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BuildMode;
    use std::fs;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tempfile::TempDir;

    const POST: &str =
        "---\ntitle: Hello\ndate: 2024-04-10\ncategory: Notes\nreadTime: 2 min read\n---\n\nFirst.\n";

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/hello.mdx"), POST).unwrap();
        dir
    }

    #[test]
    fn test_reingest_publishes_and_retains() {
        let dir = site();
        let loader = ContentLoader::new(dir.path(), BuildMode::Watch);
        let handle = SnapshotHandle::default();

        assert_eq!(reingest(&loader, &handle).unwrap(), 0);
        let first = handle.load();
        assert!(first.posts.get("hello").is_some());

        fs::write(dir.path().join("posts/hello.mdx"), "---\ntitle: [broken\n---\n").unwrap();
        assert_eq!(reingest(&loader, &handle).unwrap(), 1);

        let second = handle.load();
        assert!(Arc::ptr_eq(
            first.posts.get("hello").unwrap(),
            second.posts.get("hello").unwrap()
        ));
    }

    #[test]
    fn test_cancelled_reingest_publishes_nothing() {
        let dir = site();
        let cancel = Arc::new(AtomicBool::new(true));
        let loader = ContentLoader::new(dir.path(), BuildMode::Watch).with_cancel_flag(cancel);
        let handle = SnapshotHandle::default();

        assert!(matches!(
            reingest(&loader, &handle),
            Err(IngestError::Cancelled)
        ));
        assert!(handle.load().posts.is_empty());
    }

    #[test]
    fn test_watch_returns_once_cancelled() {
        let dir = site();
        let cancel = Arc::new(AtomicBool::new(true));
        let loader = ContentLoader::new(dir.path(), BuildMode::Watch).with_cancel_flag(cancel);
        watch(&loader, &SnapshotHandle::default()).unwrap();
    }

    #[test]
    fn test_content_file_filter() {
        assert!(is_content_file(Path::new("content/posts/a.mdx")));
        assert!(is_content_file(Path::new("content/posts/a.md")));
        assert!(is_content_file(Path::new("content/works/fes")));
        assert!(!is_content_file(Path::new("content/posts/.a.mdx.swp")));
        assert!(!is_content_file(Path::new("content/posts/cover.png")));
    }
}

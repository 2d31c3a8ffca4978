//! One-shot build: validate and render all content, then write data and pages

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::check;
use crate::content::{Entry, Post, Work};
use crate::index::Snapshot;
use crate::pages::PageBuilder;
use crate::render::{self, RenderBinder};
use crate::Folio;

/// A generated file, relative to its output directory
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Build the site. Nothing is written unless every file validates and
/// every page renders.
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let snapshot = check::verify(folio)?;
    info!(
        "Validated {} posts and {} works",
        snapshot.posts.len(),
        snapshot.works.len()
    );

    let data = render_data(&snapshot)?;
    let pages = render_pages(folio, &snapshot)?;

    write_data(folio, &data)?;
    write_pages(folio, &pages)?;

    info!(
        "Generated {} pages in {:.2}s",
        pages.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// `posts.json` and `works.json`
pub fn render_data(snapshot: &Snapshot) -> Result<Vec<Artifact>> {
    Ok(vec![
        Artifact::new("posts.json", to_json(&snapshot.posts)?),
        Artifact::new("works.json", to_json(&snapshot.works)?),
    ])
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render every entry plus the landing and 404 pages
pub fn render_pages(folio: &Folio, snapshot: &Snapshot) -> Result<Vec<Artifact>> {
    let registry = render::standard();
    let highlighter = folio.highlighter();
    let mut binder = RenderBinder::new(&registry);
    if let Some(highlighter) = &highlighter {
        binder = binder.with_highlighter(highlighter);
    }
    let pages = PageBuilder::new(&folio.config);

    let mut artifacts = vec![
        Artifact::new("index.html", pages.home_page(snapshot)),
        Artifact::new("404.html", pages.not_found_page()),
    ];

    for post in snapshot.posts.list() {
        let rendered = binder
            .render_entity(post)
            .with_context(|| format!("Failed to render {}", post.source.display()))?;
        artifacts.push(Artifact::new(
            entry_file(Post::COLLECTION, post.slug()),
            pages.post_page(snapshot, &rendered),
        ));
    }

    for work in snapshot.works.list() {
        let rendered = binder
            .render_entity(work)
            .with_context(|| format!("Failed to render {}", work.source.display()))?;
        artifacts.push(Artifact::new(
            entry_file(Work::COLLECTION, work.slug()),
            pages.work_page(&rendered),
        ));
    }

    Ok(artifacts)
}

fn entry_file(collection: &str, slug: &str) -> PathBuf {
    Path::new(collection).join(slug).join("index.html")
}

/// Replace the data directory with `artifacts`
pub fn write_data(folio: &Folio, artifacts: &[Artifact]) -> Result<()> {
    remove_dir(&folio.data_dir)?;
    write_all(&folio.data_dir, artifacts)
}

/// Write pages into the public directory. Entry pages from earlier builds
/// are removed; other files there are left alone.
pub fn write_pages(folio: &Folio, artifacts: &[Artifact]) -> Result<()> {
    for collection in [Post::COLLECTION, Work::COLLECTION] {
        remove_dir(&folio.public_dir.join(collection))?;
    }
    write_all(&folio.public_dir, artifacts)
}

fn remove_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("Failed to clean {}", dir.display()))?;
    }
    Ok(())
}

fn write_all(root: &Path, artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        let path = root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &artifact.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Generated: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "content/posts/hello.mdx",
            "---\ntitle: Hello\ndate: 2024-04-10\ncategory: Notes\nreadTime: 2 min read\n---\n\n## 01 Start\n\nFirst post.\n",
        );
        write(
            dir.path(),
            "content/works/fes/index.mdx",
            "---\ntitle: FES\nsubtitle: Relaunch\ndate: 2024-09-01\ntimeline: 3 months\nrole: Lead\ntechStack: [Rust]\nfeatured: true\n---\n\n<Callout title=\"Result\">\nFaster.\n</Callout>\n",
        );
        dir
    }

    #[test]
    fn test_build_writes_artifacts() {
        let dir = site();
        let folio = Folio::new(dir.path()).unwrap();
        run(&folio).unwrap();

        let public = dir.path().join("public");
        assert!(public.join("index.html").exists());
        assert!(public.join("404.html").exists());
        let post = fs::read_to_string(public.join("posts/hello/index.html")).unwrap();
        assert!(post.contains("<span class=\"heading-number\">01</span>"));
        let work = fs::read_to_string(public.join("works/fes/index.html")).unwrap();
        assert!(work.contains("<p class=\"callout-title\">Result</p>"));

        let posts: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(".folio/posts.json")).unwrap())
                .unwrap();
        assert_eq!(posts[0]["slug"], "hello");
        assert_eq!(posts[0]["readTime"], "2 min read");
        assert!(dir.path().join(".folio/works.json").exists());
    }

    #[test]
    fn test_failed_build_writes_nothing() {
        let dir = site();
        write(
            dir.path(),
            "content/posts/dup.mdx",
            "---\ntitle: Dup\nslug: hello\ndate: 2024-01-01\ncategory: Notes\nreadTime: 1 min\n---\n",
        );
        let folio = Folio::new(dir.path()).unwrap();

        let err = run(&folio).unwrap_err().to_string();
        assert!(err.contains("hello"));
        assert!(!dir.path().join("public").exists());
        assert!(!dir.path().join(".folio").exists());
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let dir = site();
        write(
            dir.path(),
            "content/works/fes/index.mdx",
            "---\ntitle: FES\nsubtitle: Relaunch\ndate: 2024-09-01\ntimeline: 3 months\nrole: Lead\ntechStack: [Rust]\n---\n\n<StatGrid>\n<StatCard label=\"a\" />\n</StatGrid>\n",
        );
        let folio = Folio::new(dir.path()).unwrap();

        let err = format!("{:#}", run(&folio).unwrap_err());
        assert!(err.contains("value"));
        assert!(!dir.path().join("public").exists());
        assert!(!dir.path().join(".folio").exists());
    }

    #[test]
    fn test_removed_entry_page_is_dropped() {
        let dir = site();
        write(dir.path(), "public/style.css", "body {}");
        write(dir.path(), "public/posts/gone/index.html", "<p>old</p>");
        let folio = Folio::new(dir.path()).unwrap();
        run(&folio).unwrap();

        let public = dir.path().join("public");
        assert!(!public.join("posts/gone").exists());
        assert!(public.join("posts/hello/index.html").exists());
        assert!(public.join("style.css").exists());
    }

    #[test]
    fn test_data_dir_is_cleaned() {
        let dir = site();
        write(dir.path(), ".folio/stale.json", "{}");
        let folio = Folio::new(dir.path()).unwrap();
        run(&folio).unwrap();
        assert!(!dir.path().join(".folio/stale.json").exists());
    }
}

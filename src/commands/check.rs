//! Validate content without writing anything

use anyhow::{bail, Result};

use crate::content::{BuildMode, Entry};
use crate::index::{Collection, Snapshot};
use crate::render::{self, ComponentRegistry};
use crate::Folio;

/// Structural tags used by the snapshot's entries that `registry` cannot
/// render, one line per entry and tag
pub fn unknown_components(snapshot: &Snapshot, registry: &ComponentRegistry) -> Vec<String> {
    let mut problems = unknown_in(&snapshot.posts, registry);
    problems.extend(unknown_in(&snapshot.works, registry));
    problems
}

fn unknown_in<T: Entry>(collection: &Collection<T>, registry: &ComponentRegistry) -> Vec<String> {
    collection
        .list()
        .iter()
        .flat_map(|entry| {
            entry
                .content()
                .structural_tags()
                .into_iter()
                .filter(|tag| !registry.contains(tag))
                .map(|tag| {
                    format!(
                        "{}: no renderer registered for structural tag <{}>",
                        entry.source().display(),
                        tag
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Ingest in one-shot mode and verify every component is renderable
pub fn verify(folio: &Folio) -> Result<Snapshot> {
    let report = folio.loader(BuildMode::OneShot).ingest(None)?;

    let unknown = unknown_components(&report.snapshot, &render::standard());
    if !unknown.is_empty() {
        bail!(
            "content uses {} unknown component(s):\n{}",
            unknown.len(),
            unknown
                .iter()
                .map(|line| format!("  - {}", line))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(report.snapshot)
}

/// Run the check command
pub fn run(folio: &Folio) -> Result<()> {
    let snapshot = verify(folio)?;
    println!(
        "Content OK: {} posts, {} works",
        snapshot.posts.len(),
        snapshot.works.len()
    );
    Ok(())
}

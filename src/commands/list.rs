//! List site content

use anyhow::Result;

use crate::content::BuildMode;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let report = folio.loader(BuildMode::Watch).ingest(None)?;
    let snapshot = report.snapshot;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", snapshot.posts.len());
            for post in snapshot.posts.list() {
                println!(
                    "  {} - {} [{}]{}",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.source.display(),
                    if post.featured { " *" } else { "" }
                );
            }
        }
        "work" | "works" => {
            println!("Works ({}):", snapshot.works.len());
            for work in snapshot.works.list() {
                println!(
                    "  {} - {} ({}) [{}]{}",
                    work.date.format("%Y-%m-%d"),
                    work.title,
                    work.tech_stack.join(", "),
                    work.source.display(),
                    if work.featured { " *" } else { "" }
                );
            }
        }
        "category" | "categories" => {
            let categories = snapshot.posts.categories();
            println!("Categories ({}):", categories.len());
            let mut categories: Vec<_> = categories.into_iter().collect();
            categories.sort_by(|a, b| b.1.cmp(&a.1));
            for (category, count) in categories {
                println!("  {} ({})", category, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, works, categories",
                content_type
            );
        }
    }

    if !report.problems.is_empty() {
        println!("\n{} file(s) with problems were skipped", report.problems.len());
    }

    Ok(())
}

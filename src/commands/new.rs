//! Create a new post or case study

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{Entry, Post, Work};
use crate::schema::check_slug;
use crate::Folio;

/// Front-matter and body of a fresh entry
fn scaffold(collection: &str, title: &str, slug: &str, date: &str) -> Result<String> {
    let title = yaml_string(title)?;
    let text = match collection {
        Post::COLLECTION => format!(
            "---\ntitle: {}\nslug: {}\ndate: {}\ncategory: General\nreadTime: 1 min read\n---\n\nStart writing here.\n",
            title, slug, date
        ),
        Work::COLLECTION => format!(
            "---\ntitle: {}\nsubtitle: What the project is about\nslug: {}\ndate: {}\ntimeline: \"1 month\"\nrole: Developer\ntechStack: []\n---\n\n<SectionHeader number=\"01\" title=\"The Challenge\" />\n\nDescribe the problem.\n",
            title, slug, date
        ),
        other => bail!("Unknown collection: {}. Available: posts, works", other),
    };
    Ok(text)
}

/// A scalar safe to embed in front-matter
fn yaml_string(value: &str) -> Result<String> {
    Ok(serde_yaml::to_string(value)?.trim_end().to_string())
}

/// Create a new entry in `collection` and return its path
pub fn run(folio: &Folio, title: &str, collection: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if let Err(reason) = check_slug(&slug) {
        bail!("Cannot derive a slug from {:?}: slug {}", title, reason);
    }

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let content = scaffold(collection, title, &slug, &date)?;

    let target_dir = folio.content_dir.join(collection);
    fs::create_dir_all(&target_dir)?;
    let file_path = target_dir.join(format!("{}.mdx", slug));

    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

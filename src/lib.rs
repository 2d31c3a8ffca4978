//! folio: content pipeline for a personal portfolio site
//!
//! Validates authored content files against their collection schemas,
//! compiles Markdown bodies with embedded components into typed document
//! trees, indexes them into immutable snapshots and renders entries to HTML
//! against a component registry.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod index;
pub mod markup;
pub mod pages;
pub mod render;
pub mod schema;
pub mod server;
pub mod watch;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{BuildMode, ContentLoader};
use render::Highlighter;

/// A portfolio site on disk
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Site root
    pub base_dir: PathBuf,
    /// Content root holding the collections
    pub content_dir: PathBuf,
    /// Build artifacts (`posts.json`, `works.json`)
    pub data_dir: PathBuf,
    /// Rendered pages
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open the site at `base_dir`, reading `folio.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let data_dir = base_dir.join(&config.data_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            data_dir,
            public_dir,
        })
    }

    /// A loader over this site's content
    pub fn loader(&self, mode: BuildMode) -> ContentLoader {
        ContentLoader::new(&self.content_dir, mode)
    }

    /// The configured code highlighter, if highlighting is enabled
    pub fn highlighter(&self) -> Option<Highlighter> {
        self.config
            .highlight
            .enable
            .then(|| Highlighter::from_config(&self.config.highlight))
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Validate content and write all artifacts
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Remove generated output
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Scaffold a new entry in `collection`
    pub fn new_entry(&self, title: &str, collection: &str) -> Result<PathBuf> {
        commands::new::run(self, title, collection)
    }
}

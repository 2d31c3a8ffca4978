//! Content module - handles content files, their entities and loading

mod entity;
mod frontmatter;
pub mod loader;

pub use entity::{Entry, Post, Work};
pub use frontmatter::{RawRecord, FRONTMATTER_FIELD};
pub use loader::{BuildMode, ContentLoader, IngestReport};

//! Helper functions for page shells
//!
//! URL generation, HTML fragments and date formatting shared by the page
//! builders and the renderer.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;

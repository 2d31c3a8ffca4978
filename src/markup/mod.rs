//! Markup: Markdown prose with embedded structural components
//!
//! [`compile`] turns a content body into a [`Document`], a tree of plain
//! serialisable [`Node`]s that knows nothing about how it will be rendered.

mod compiler;
mod node;
mod tag;

pub use compiler::compile;
pub use node::{Alignment, Document, Node, PropValue, Props};
pub use tag::parse_expression;

//! Pretty-printer for SSE item trees.
//!
//! Renders an [`sse_tree::Item`] back to SSE text. Leaf-only lists stay
//! on one line; nesting switches to indented multi-line layout. An
//! optional [`SerializationContext`] abbreviates IRIs through a prefix
//! mapping and re-emits the `(prefix ...)`/`(base ...)` preamble the
//! parser's resolving layer strips on input.

mod context;
mod options;
mod writer;

pub use context::SerializationContext;
pub use options::WriteOptions;
pub use writer::{write_item, write_item_with};

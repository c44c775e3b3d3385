//! Document transformation.
//!
//! - `enrich`: runs the twoslash analysis engine on opted-in blocks.
//! - `highlighter`: run-scoped, lazily loaded highlighter handle.
//! - `walker`: visits code nodes and replaces them with rendered markup.

/// Twoslash enrichment of single code blocks.
pub mod enrich;
/// Lazily loaded highlighter handle.
pub mod highlighter;
/// MDAST walker driving enrichment and rendering.
pub mod walker;

pub use enrich::{Enricher, run_twoslash};
pub use highlighter::LazyHighlighter;
pub use walker::{ProcessReport, Transformer, process, transform_markdown};

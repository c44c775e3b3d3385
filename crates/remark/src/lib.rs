#![deny(missing_docs)]
//! twomark remark layer: twoslash enrichment and highlighted rendering of markdown code blocks.

/// Token/annotation compositor producing `<pre>` markup.
pub mod renderer;
/// Code block enrichment and the document walker.
pub mod transform;

pub use renderer::{RenderContext, render_to_html};
pub use transform::{
    Enricher, LazyHighlighter, ProcessReport, Transformer, process, run_twoslash,
    transform_markdown,
};

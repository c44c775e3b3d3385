//! Token/annotation compositor.
//!
//! Turns the highlighter's per-line runs plus the analysis engine's
//! annotations into a single `<pre>` fragment.
//!
//! # Module Structure
//!
//! - `lines` - offset to line/column mapping
//! - `compose` - annotation validation and per-line merging
//! - `markup` - HTML fragments

mod compose;
pub mod lines;
mod markup;

pub use lines::{Line, LineIndex};

use compose::{AnnotationPlan, check_tokens, compose_line};
use twomark_core::{Annotation, RenderError, Token};

/// Output decoration for a rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Normalized language id, shown in the `language-id` element.
    pub lang_id: &'a str,
    /// Theme background colour.
    pub background: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    /// Context with no background colour.
    pub fn new(lang_id: &'a str) -> Self {
        Self {
            lang_id,
            background: None,
        }
    }
}

/// Renders highlighted tokens, wrapping annotated spans.
///
/// `source` is the text the tokens were produced from; annotation offsets are
/// chars into it. Passing `Some` annotations (even empty) marks the block as a
/// twoslash block.
///
/// # Errors
///
/// Out-of-range or partially overlapping annotations, and tokens that do not
/// reproduce `source`, are reported instead of being clamped.
pub fn render_to_html(
    tokens: &[Vec<Token>],
    source: &str,
    context: &RenderContext<'_>,
    annotations: Option<&[Annotation]>,
) -> Result<String, RenderError> {
    let index = LineIndex::new(source);
    let plan = AnnotationPlan::new(annotations.unwrap_or_default(), &index)?;

    for (number, line) in index.lines().iter().enumerate() {
        let runs = tokens.get(number).map(Vec::as_slice).unwrap_or_default();
        check_tokens(number, line.text, runs)?;
    }
    for (number, runs) in tokens.iter().enumerate().skip(index.lines().len()) {
        check_tokens(number, "", runs)?;
    }

    let mut html = String::with_capacity(source.len() * 4);
    markup::open_pre(&mut html, context, annotations.is_some());
    for (number, line) in index.lines().iter().enumerate() {
        if number > 0 {
            html.push('\n');
        }
        let runs = tokens.get(number).map(Vec::as_slice).unwrap_or_default();
        compose_line(&mut html, &plan, &index, number, line, runs);
    }
    markup::close_pre(&mut html);
    Ok(html)
}

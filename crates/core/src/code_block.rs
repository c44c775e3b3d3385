//! Code blocks as they move through a run.
//!
//! A block starts `Raw`, may be `Enriched` once by the twoslash pass, and ends
//! either `Rendered` (pre-rendered markup) or `Skipped` (left as plain code).

use crate::annotation::{AnalysisResult, Annotation};
use crate::config::TWOSLASH_MARKER;
use crate::error::{BlockLocation, SourceLocation, TwomarkError};
use markdown::mdast::{Code, Html, Node};
use markdown::unist::Position;

/// Splits a fence info string's meta part into directive tokens.
pub fn parse_meta(meta: Option<&str>) -> Vec<String> {
    meta.map(|m| m.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Whether the fence meta tokens opt into the twoslash pass.
pub fn requests_enrichment(meta: &[String]) -> bool {
    meta.iter().any(|token| token == TWOSLASH_MARKER)
}

/// Phase of a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPhase {
    /// As parsed.
    Raw,
    /// Text and language replaced by the analysis engine.
    Enriched,
    /// Replaced by highlighted markup.
    Rendered(String),
    /// Left as a plain code block.
    Skipped,
}

impl BlockPhase {
    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            BlockPhase::Raw => "raw",
            BlockPhase::Enriched => "enriched",
            BlockPhase::Rendered(_) => "rendered",
            BlockPhase::Skipped => "skipped",
        }
    }
}

/// One fenced code block, detached from the tree while it is processed.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Document-order position among code blocks.
    pub index: usize,
    /// Fence language; replaced by the output extension when enriched.
    pub lang: Option<String>,
    /// Block text; replaced by the rewritten sample when enriched.
    pub value: String,
    /// Fence meta tokens.
    pub meta: Vec<String>,
    raw_meta: Option<String>,
    position: Option<Position>,
    phase: BlockPhase,
    analysis: Option<AnalysisResult>,
}

impl CodeBlock {
    /// Creates a raw block.
    pub fn new(index: usize, lang: Option<String>, value: impl Into<String>, meta: Option<&str>) -> Self {
        Self {
            index,
            lang,
            value: value.into(),
            meta: parse_meta(meta),
            raw_meta: meta.map(str::to_string),
            position: None,
            phase: BlockPhase::Raw,
            analysis: None,
        }
    }

    /// Copies a markdown-rs code node into a raw block.
    pub fn from_mdast(index: usize, code: &Code) -> Self {
        Self {
            position: code.position.clone(),
            ..Self::new(index, code.lang.clone(), code.value.clone(), code.meta.as_deref())
        }
    }

    /// Fence meta exactly as written.
    pub fn raw_meta(&self) -> Option<&str> {
        self.raw_meta.as_deref()
    }

    /// Whether the fence asks for the twoslash pass.
    pub fn requests_enrichment(&self) -> bool {
        requests_enrichment(&self.meta)
    }

    /// Current phase.
    pub fn phase(&self) -> &BlockPhase {
        &self.phase
    }

    /// The analysis result, present once enriched.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Annotations from the analysis result, present once enriched.
    pub fn annotations(&self) -> Option<&[Annotation]> {
        self.analysis.as_ref().map(|a| a.annotations.as_slice())
    }

    /// Rendered markup, present once rendered.
    pub fn rendered(&self) -> Option<&str> {
        match &self.phase {
            BlockPhase::Rendered(html) => Some(html),
            _ => None,
        }
    }

    /// Start of the fence in the document.
    pub fn source_location(&self) -> Option<SourceLocation> {
        self.position
            .as_ref()
            .map(|p| SourceLocation::new(p.start.line, p.start.column))
    }

    /// Location used in error reports.
    pub fn location(&self) -> BlockLocation {
        BlockLocation::new(self.index, self.source_location(), &self.value)
    }

    /// Replaces text and language with the engine's output. Only valid on a raw block.
    pub fn apply_analysis(&mut self, result: AnalysisResult) -> Result<(), TwomarkError> {
        self.transition(&[BlockPhase::Raw], BlockPhase::Enriched)?;
        self.value = result.code.clone();
        self.lang = Some(result.extension.clone());
        self.analysis = Some(result);
        Ok(())
    }

    /// Stores the final markup.
    pub fn mark_rendered(&mut self, html: String) -> Result<(), TwomarkError> {
        self.transition(
            &[BlockPhase::Raw, BlockPhase::Enriched],
            BlockPhase::Rendered(html),
        )
    }

    /// Leaves the block as plain code.
    pub fn mark_skipped(&mut self) -> Result<(), TwomarkError> {
        self.transition(&[BlockPhase::Raw, BlockPhase::Enriched], BlockPhase::Skipped)
    }

    fn transition(&mut self, allowed: &[BlockPhase], next: BlockPhase) -> Result<(), TwomarkError> {
        if !allowed.contains(&self.phase) {
            return Err(TwomarkError::InvalidTransition {
                block: self.location(),
                from: self.phase.name(),
                to: next.name(),
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Converts the block back into a tree node.
    ///
    /// Rendered blocks become raw HTML nodes; all other phases stay code nodes.
    pub fn to_node(&self) -> Node {
        match &self.phase {
            BlockPhase::Rendered(html) => Node::Html(Html {
                value: html.clone(),
                position: self.position.clone(),
            }),
            _ => Node::Code(Code {
                value: self.value.clone(),
                position: self.position.clone(),
                lang: self.lang.clone(),
                meta: self.raw_meta.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(code: &str, extension: &str) -> AnalysisResult {
        AnalysisResult {
            code: code.to_string(),
            extension: extension.to_string(),
            annotations: vec![Annotation::hover(6, 7, "const a: 1")],
            diagnostics: Vec::new(),
            playground_url: None,
        }
    }

    #[test]
    fn detects_marker_token() {
        assert!(requests_enrichment(&parse_meta(Some("twoslash"))));
        assert!(requests_enrichment(&parse_meta(Some("title=a.ts  twoslash"))));
        assert!(!requests_enrichment(&parse_meta(Some("twoslasher"))));
        assert!(!requests_enrichment(&parse_meta(None)));
    }

    #[test]
    fn enrichment_replaces_text_and_language() {
        let mut block = CodeBlock::new(0, Some("ts".into()), "const a = 1\n// ^?", Some("twoslash"));
        block.apply_analysis(analysis("const a = 1", "ts")).unwrap();

        assert_eq!(block.phase(), &BlockPhase::Enriched);
        assert_eq!(block.value, "const a = 1");
        assert_eq!(block.lang.as_deref(), Some("ts"));
        assert_eq!(block.annotations().map(<[_]>::len), Some(1));
    }

    #[test]
    fn enrichment_runs_at_most_once() {
        let mut block = CodeBlock::new(0, Some("ts".into()), "x", Some("twoslash"));
        block.apply_analysis(analysis("x", "ts")).unwrap();
        let err = block.apply_analysis(analysis("x", "ts")).unwrap_err();
        assert!(matches!(
            err,
            TwomarkError::InvalidTransition {
                from: "enriched",
                to: "enriched",
                ..
            }
        ));
    }

    #[test]
    fn rendered_blocks_are_terminal() {
        let mut block = CodeBlock::new(1, Some("js".into()), "1", None);
        block.mark_rendered("<pre></pre>".into()).unwrap();
        assert_eq!(block.rendered(), Some("<pre></pre>"));
        assert!(block.mark_skipped().is_err());
        assert!(block.apply_analysis(analysis("1", "js")).is_err());
    }

    #[test]
    fn rendered_block_becomes_html_node() {
        let code = Code {
            value: "let a".into(),
            position: None,
            lang: Some("js".into()),
            meta: None,
        };
        let mut block = CodeBlock::from_mdast(0, &code);
        block.mark_rendered("<pre>let a</pre>".into()).unwrap();
        match block.to_node() {
            Node::Html(html) => assert_eq!(html.value, "<pre>let a</pre>"),
            other => panic!("expected html node, got {other:?}"),
        }
    }

    #[test]
    fn skipped_block_keeps_code_node() {
        let code = Code {
            value: "{ a: 1 }".into(),
            position: None,
            lang: Some("json5".into()),
            meta: Some("title=x".into()),
        };
        let mut block = CodeBlock::from_mdast(0, &code);
        block.mark_skipped().unwrap();
        assert_eq!(block.to_node(), Node::Code(code));
    }

    #[test]
    fn meta_is_written_back_verbatim() {
        let code = Code {
            value: "const a = 1".into(),
            position: None,
            lang: Some("ts".into()),
            meta: Some("twoslash\ttitle=\"a  b\"".into()),
        };
        let mut block = CodeBlock::from_mdast(0, &code);
        assert!(block.requests_enrichment());
        assert_eq!(block.meta, vec!["twoslash", "title=\"a", "b\""]);
        assert_eq!(block.raw_meta(), Some("twoslash\ttitle=\"a  b\""));

        block.apply_analysis(analysis("const a = 1", "ts")).unwrap();
        block.mark_skipped().unwrap();
        match block.to_node() {
            Node::Code(out) => assert_eq!(out.meta.as_deref(), Some("twoslash\ttitle=\"a  b\"")),
            other => panic!("expected code node, got {other:?}"),
        }
    }
}

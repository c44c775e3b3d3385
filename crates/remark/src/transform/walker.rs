//! Document walker: enrich and render every code node of an MDAST tree.

use super::enrich::Enricher;
use super::highlighter::LazyHighlighter;
use crate::renderer::{RenderContext, render_to_html};
use markdown::mdast::Node;
use rayon::prelude::*;
use twomark_core::{
    Analyzer, BlockPhase, CodeBlock, HighlighterLoader, HighlighterOptions, LibraryProvider,
    ParseOptions, Settings, TwomarkError, can_highlight, normalize, parse_document,
};

/// Outcome of a run, one entry per code block in document order.
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    /// Processed blocks.
    pub blocks: Vec<CodeBlock>,
}

impl ProcessReport {
    /// Blocks replaced by highlighted markup.
    pub fn rendered(&self) -> usize {
        self.count(|b| matches!(b.phase(), BlockPhase::Rendered(_)))
    }

    /// Blocks left as plain code.
    pub fn skipped(&self) -> usize {
        self.count(|b| matches!(b.phase(), BlockPhase::Skipped))
    }

    /// Blocks the analysis engine rewrote.
    pub fn enriched(&self) -> usize {
        self.count(|b| b.analysis().is_some())
    }

    fn count(&self, predicate: impl Fn(&CodeBlock) -> bool) -> usize {
        self.blocks.iter().filter(|b| predicate(b)).count()
    }
}

/// Applies twoslash and highlighting to the code nodes of a tree.
///
/// One transformer is one run: the highlighter handle and the type map are
/// created at most once and shared by every block.
#[derive(Debug)]
pub struct Transformer<'a> {
    settings: &'a Settings,
    enricher: Enricher<'a>,
    highlighter: LazyHighlighter<'a>,
}

impl<'a> Transformer<'a> {
    /// Creates a transformer. Resolve environment overrides on `settings` before calling this.
    pub fn new(
        settings: &'a Settings,
        loader: &'a dyn HighlighterLoader,
        highlighter_options: HighlighterOptions,
    ) -> Self {
        Self {
            settings,
            enricher: Enricher::new(settings),
            highlighter: LazyHighlighter::new(loader, highlighter_options),
        }
    }

    /// Sets the twoslash analysis engine.
    pub fn with_analyzer(mut self, analyzer: &'a dyn Analyzer) -> Self {
        self.enricher = self.enricher.with_analyzer(analyzer);
        self
    }

    /// Overrides the default library declarations source.
    pub fn with_library_provider(mut self, libraries: &'a dyn LibraryProvider) -> Self {
        self.enricher = self.enricher.with_library_provider(libraries);
        self
    }

    /// Processes every code node in document order, stopping at the first failure.
    pub fn process(&self, tree: &mut Node) -> Result<ProcessReport, TwomarkError> {
        let blocks = code_nodes(tree)
            .into_iter()
            .enumerate()
            .map(|(index, node)| self.process_node(index, node))
            .collect::<Result<Vec<_>, _>>()?;
        self.finish(blocks)
    }

    /// Like [`Transformer::process`], with code nodes handled on the rayon pool.
    ///
    /// When several blocks fail, which error is returned is unspecified.
    pub fn process_parallel(&self, tree: &mut Node) -> Result<ProcessReport, TwomarkError> {
        let blocks = code_nodes(tree)
            .into_par_iter()
            .enumerate()
            .map(|(index, node)| self.process_node(index, node))
            .collect::<Result<Vec<_>, _>>()?;
        self.finish(blocks)
    }

    /// Runs only the twoslash pass; nodes stay code nodes with rewritten text.
    pub fn enrich_document(&self, tree: &mut Node) -> Result<ProcessReport, TwomarkError> {
        let mut blocks = Vec::new();
        for (index, node) in code_nodes(tree).into_iter().enumerate() {
            let mut block = detach(index, node)?;
            self.enricher.enrich(&mut block)?;
            *node = block.to_node();
            blocks.push(block);
        }
        Ok(ProcessReport { blocks })
    }

    fn finish(&self, blocks: Vec<CodeBlock>) -> Result<ProcessReport, TwomarkError> {
        let report = ProcessReport { blocks };
        log::debug!(
            "Processed {} code blocks: {} rendered, {} skipped, {} enriched",
            report.blocks.len(),
            report.rendered(),
            report.skipped(),
            report.enriched()
        );
        Ok(report)
    }

    fn process_node(&self, index: usize, node: &mut Node) -> Result<CodeBlock, TwomarkError> {
        let mut block = detach(index, node)?;
        self.enricher.enrich(&mut block)?;

        let lang = block.lang.as_deref().map(normalize);
        match lang {
            Some(lang) if !self.settings.disable_highlighting && can_highlight(lang) => {
                let html = self.render(&block, lang)?;
                block.mark_rendered(html)?;
                log::debug!("Rendered code block #{} as {}", index + 1, lang_label(&block));
            }
            _ => {
                block.mark_skipped()?;
                log::debug!("Left code block #{} ({}) unhighlighted", index + 1, lang_label(&block));
            }
        }

        *node = block.to_node();
        Ok(block)
    }

    fn render(&self, block: &CodeBlock, lang: &str) -> Result<String, TwomarkError> {
        let highlighter = self.highlighter.get()?;
        let tokens = highlighter
            .code_to_tokens(&block.value, lang)
            .map_err(|source| TwomarkError::Highlight {
                block: block.location(),
                source,
            })?;
        let context = RenderContext {
            lang_id: lang,
            background: highlighter.background(),
        };
        render_to_html(&tokens, &block.value, &context, block.annotations()).map_err(|source| {
            TwomarkError::Render {
                block: block.location(),
                source,
            }
        })
    }
}

fn lang_label(block: &CodeBlock) -> &str {
    block.lang.as_deref().unwrap_or("no language")
}

fn detach(index: usize, node: &Node) -> Result<CodeBlock, TwomarkError> {
    match node {
        Node::Code(code) => Ok(CodeBlock::from_mdast(index, code)),
        other => Err(TwomarkError::InternalError(format!(
            "expected a code node, found {:?}",
            other
        ))),
    }
}

/// Code nodes of `tree` in document order.
fn code_nodes(tree: &mut Node) -> Vec<&mut Node> {
    let mut nodes = Vec::new();
    collect_code_nodes(tree, &mut nodes);
    nodes
}

fn collect_code_nodes<'n>(node: &'n mut Node, out: &mut Vec<&'n mut Node>) {
    if matches!(node, Node::Code(_)) {
        out.push(node);
        return;
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            collect_code_nodes(child, out);
        }
    }
}

/// Processes a tree with a freshly loaded highlighter and the given analysis engine.
pub fn process(
    tree: &mut Node,
    loader: &dyn HighlighterLoader,
    highlighter_options: &HighlighterOptions,
    settings: &Settings,
    analyzer: &dyn Analyzer,
) -> Result<ProcessReport, TwomarkError> {
    Transformer::new(settings, loader, highlighter_options.clone())
        .with_analyzer(analyzer)
        .process(tree)
}

/// Parses markdown and processes its code blocks.
pub fn transform_markdown(
    input: &str,
    options: &ParseOptions,
    transformer: &Transformer<'_>,
) -> Result<(Node, ProcessReport), TwomarkError> {
    let mut tree = parse_document(input, options)?;
    let report = transformer.process(&mut tree)?;
    Ok((tree, report))
}

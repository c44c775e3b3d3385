//! Markdown parsing into an MDAST tree.

use crate::{SourceLocation, TwomarkError};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable YAML frontmatter parsing.
    pub frontmatter: bool,
    /// Enable MDX constructs (JSX, ESM, expressions).
    pub mdx: bool,
}

impl ParseOptions {
    /// Markdown-friendly defaults (no MDX).
    pub const fn markdown() -> Self {
        Self {
            gfm: true,
            frontmatter: true,
            mdx: false,
        }
    }

    /// MDX-friendly defaults (JSX/ESM/expression enabled).
    pub const fn mdx() -> Self {
        Self {
            gfm: true,
            frontmatter: true,
            mdx: true,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.mdx {
            // Indented code collides with indented JSX children.
            constructs.code_indented = false;
            constructs.html_flow = false;
            constructs.html_text = false;
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Parse markdown into an MDAST tree.
pub fn parse_document(input: &str, options: &ParseOptions) -> Result<Node, TwomarkError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        TwomarkError::MarkdownAdapter {
            message: err.to_string(),
            location: message_location(&err),
        }
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_code_with_meta() {
        let tree = parse_document("# Title\n\n```ts twoslash\nconst a = 1\n```\n", &ParseOptions::default())
            .unwrap();
        let children = tree.children().unwrap();
        match &children[1] {
            Node::Code(code) => {
                assert_eq!(code.lang.as_deref(), Some("ts"));
                assert_eq!(code.meta.as_deref(), Some("twoslash"));
                assert_eq!(code.value, "const a = 1");
                assert_eq!(code.position.as_ref().map(|p| p.start.line), Some(3));
            }
            other => panic!("expected code node, got {other:?}"),
        }
    }

    #[test]
    fn mdx_errors_carry_location() {
        let err = parse_document("a {\n", &ParseOptions::mdx()).unwrap_err();
        match err {
            TwomarkError::MarkdownAdapter { location, .. } => {
                assert_eq!(location, SourceLocation::new(1, 4));
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}

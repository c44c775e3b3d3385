//! HTML fragments emitted by the compositor.

use super::RenderContext;
use html_escape::{encode_double_quoted_attribute, encode_text};
use twomark_core::{Annotation, AnnotationPayload, FontStyle, Token, TokenStyle};

pub(super) fn open_pre(out: &mut String, context: &RenderContext<'_>, twoslash: bool) {
    out.push_str("<pre class=\"shiki");
    if twoslash {
        out.push_str(" twoslash lsp");
    }
    out.push('"');
    if let Some(background) = context.background {
        out.push_str(" style=\"background-color: ");
        out.push_str(&encode_double_quoted_attribute(background));
        out.push('"');
    }
    out.push_str("><div class=\"language-id\">");
    out.push_str(&encode_text(context.lang_id));
    out.push_str("</div><div class=\"code-container\"><code>");
}

pub(super) fn close_pre(out: &mut String) {
    out.push_str("</code></div></pre>");
}

pub(super) fn open_line(out: &mut String) {
    out.push_str("<div class=\"line\">");
}

pub(super) fn close_line(out: &mut String) {
    out.push_str("</div>");
}

/// Writes one styled run holding `text` (a slice of the token's content).
pub(super) fn token_span(out: &mut String, token: &Token, text: &str) {
    let mut declarations = Vec::new();
    out.push_str("<span");
    match &token.style {
        TokenStyle::Plain => {}
        TokenStyle::Color(color) => declarations.push(format!("color: {}", color)),
        TokenStyle::Scope(scope) => {
            out.push_str(" class=\"");
            out.push_str(&encode_double_quoted_attribute(scope));
            out.push('"');
        }
    }
    push_font_style(&mut declarations, token.font_style);
    if !declarations.is_empty() {
        out.push_str(" style=\"");
        out.push_str(&encode_double_quoted_attribute(&declarations.join("; ")));
        out.push('"');
    }
    out.push('>');
    out.push_str(&encode_text(text));
    out.push_str("</span>");
}

fn push_font_style(declarations: &mut Vec<String>, font: FontStyle) {
    if font.italic {
        declarations.push("font-style: italic".to_string());
    }
    if font.bold {
        declarations.push("font-weight: bold".to_string());
    }
    if font.underline {
        declarations.push("text-decoration: underline".to_string());
    }
}

fn tag_name(payload: &AnnotationPayload) -> &'static str {
    match payload {
        AnnotationPayload::Hover { .. } => "data-lsp",
        AnnotationPayload::Error { .. } => "data-err",
        AnnotationPayload::Query { .. } => "data-query",
        AnnotationPayload::Highlight { .. } => "mark",
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}

fn push_payload_attrs(out: &mut String, payload: &AnnotationPayload) {
    match payload {
        AnnotationPayload::Hover { text, docs } => {
            push_attr(out, "lsp", text);
            if let Some(docs) = docs {
                push_attr(out, "data-docs", docs);
            }
        }
        AnnotationPayload::Error { code, message } => {
            push_attr(out, "data-code", &code.to_string());
            push_attr(out, "title", message);
        }
        AnnotationPayload::Query { text } => push_attr(out, "data-text", text),
        AnnotationPayload::Highlight { description } => {
            if let Some(description) = description {
                push_attr(out, "data-description", description);
            }
        }
    }
}

/// Opening wrapper for a ranged annotation.
pub(super) fn open_annotation(out: &mut String, annotation: &Annotation) {
    out.push('<');
    out.push_str(tag_name(&annotation.payload));
    if matches!(annotation.payload, AnnotationPayload::Highlight { .. }) {
        out.push_str(" class=\"highlight\"");
    }
    push_payload_attrs(out, &annotation.payload);
    out.push('>');
}

pub(super) fn close_annotation(out: &mut String, annotation: &Annotation) {
    out.push_str("</");
    out.push_str(tag_name(&annotation.payload));
    out.push('>');
}

/// Zero-width marker for a point annotation.
pub(super) fn marker(out: &mut String, annotation: &Annotation) {
    out.push_str("<span class=\"twoslash-marker twoslash-");
    out.push_str(annotation.kind().as_str());
    out.push('"');
    push_payload_attrs(out, &annotation.payload);
    out.push_str("></span>");
}

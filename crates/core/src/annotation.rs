//! Data produced by the collaborators: analysis results, annotations, and tokens.
//!
//! All offsets are counted in Unicode scalar values (`char`s) of the rewritten
//! source text, end exclusive.

use serde::{Deserialize, Serialize};

/// Closed set of annotation kinds the analysis engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationKind {
    /// Inferred type information for an identifier.
    Hover,
    /// A compiler diagnostic the sample expected.
    Error,
    /// A `^?` query asking for the type at a position.
    Query,
    /// A highlighted range requested by the sample author.
    Highlight,
}

impl AnnotationKind {
    /// Lowercase name used in markup and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::Hover => "hover",
            AnnotationKind::Error => "error",
            AnnotationKind::Query => "query",
            AnnotationKind::Highlight => "highlight",
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-dependent content of an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnnotationPayload {
    /// Quick info for the identifier under the range.
    Hover {
        /// Display text, e.g. `const a: 1`.
        text: String,
        /// JSDoc text attached to the symbol.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        docs: Option<String>,
    },
    /// An expected compiler error.
    Error {
        /// TypeScript error code.
        code: u32,
        /// Rendered message.
        message: String,
    },
    /// The answer to a query.
    Query {
        /// Display text of the answer.
        text: String,
    },
    /// A highlighted range.
    Highlight {
        /// Optional description written next to the highlight directive.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// One structured fact about a span of the rewritten source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Start offset (chars).
    pub start: usize,
    /// End offset (chars, exclusive). Equal to `start` for point annotations.
    pub end: usize,
    /// Kind-dependent content.
    #[serde(flatten)]
    pub payload: AnnotationPayload,
}

impl Annotation {
    /// Creates a hover annotation over `[start, end)`.
    pub fn hover(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            payload: AnnotationPayload::Hover {
                text: text.into(),
                docs: None,
            },
        }
    }

    /// Creates an error annotation over `[start, end)`.
    pub fn error(start: usize, end: usize, code: u32, message: impl Into<String>) -> Self {
        Self {
            start,
            end,
            payload: AnnotationPayload::Error {
                code,
                message: message.into(),
            },
        }
    }

    /// Creates a point query annotation at `offset`.
    pub fn query(offset: usize, text: impl Into<String>) -> Self {
        Self {
            start: offset,
            end: offset,
            payload: AnnotationPayload::Query { text: text.into() },
        }
    }

    /// Creates a highlight annotation over `[start, end)`.
    pub fn highlight(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            payload: AnnotationPayload::Highlight { description: None },
        }
    }

    /// The annotation's kind tag.
    pub fn kind(&self) -> AnnotationKind {
        match self.payload {
            AnnotationPayload::Hover { .. } => AnnotationKind::Hover,
            AnnotationPayload::Error { .. } => AnnotationKind::Error,
            AnnotationPayload::Query { .. } => AnnotationKind::Query,
            AnnotationPayload::Highlight { .. } => AnnotationKind::Highlight,
        }
    }

    /// True when the annotation covers no characters.
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

/// Severity reported for a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticCategory {
    /// Warning.
    Warning,
    /// Error.
    #[default]
    Error,
    /// Suggestion.
    Suggestion,
    /// Message.
    Message,
}

/// A compiler message attached to the analysed sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// TypeScript error code.
    pub code: u32,
    /// Severity.
    #[serde(default)]
    pub category: DiagnosticCategory,
    /// Rendered message.
    pub message: String,
    /// Start offset (chars).
    pub start: usize,
    /// Length (chars).
    pub length: usize,
}

/// Everything the analysis engine returns for one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Rewritten sample with directives and cut sections removed.
    pub code: String,
    /// Extension of the emitted sample (`ts`, `tsx`, `js`, ...), used as the new language.
    pub extension: String,
    /// Positional facts against `code`.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Compiler messages reported for the sample.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    /// Link that opens the sample in the TypeScript playground.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playground_url: Option<String>,
}

/// Styling attached to a token run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenStyle {
    /// No styling.
    #[default]
    Plain,
    /// Theme colour emitted as an inline style.
    Color(String),
    /// Scope name emitted as a class.
    Scope(String),
}

/// Font flags a theme may set on a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    /// Italic.
    pub italic: bool,
    /// Bold.
    pub bold: bool,
    /// Underline.
    pub underline: bool,
}

/// One syntax-highlighting run. Its line is the index of the line vector it sits in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    /// Text of the run.
    pub content: String,
    /// Colour or scope.
    pub style: TokenStyle,
    /// Font flags.
    pub font_style: FontStyle,
}

impl Token {
    /// An unstyled run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// A run coloured with a theme colour.
    pub fn colored(content: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TokenStyle::Color(color.into()),
            font_style: FontStyle::default(),
        }
    }
}

/// Tokenizer output: one vector of runs per source line.
pub type TokenLines = Vec<Vec<Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_engine_output() {
        let json = r#"{
            "code": "const a = 1",
            "extension": "ts",
            "annotations": [
                { "kind": "hover", "start": 6, "end": 7, "text": "const a: 1" },
                { "kind": "query", "start": 6, "end": 6, "text": "const a: 1" },
                { "kind": "error", "start": 0, "end": 5, "code": 2322, "message": "nope" }
            ],
            "diagnostics": [
                { "code": 2322, "message": "nope", "start": 0, "length": 5 }
            ],
            "playgroundUrl": "https://www.typescriptlang.org/play"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.extension, "ts");
        assert_eq!(result.annotations[0], Annotation::hover(6, 7, "const a: 1"));
        assert_eq!(result.annotations[1].kind(), AnnotationKind::Query);
        assert!(result.annotations[1].is_point());
        assert_eq!(result.annotations[2].kind(), AnnotationKind::Error);
        assert_eq!(result.diagnostics[0].category, DiagnosticCategory::Error);
        assert!(result.playground_url.is_some());
    }

    #[test]
    fn annotations_default_to_empty() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{ "code": "", "extension": "js" }"#).unwrap();
        assert!(result.annotations.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn kind_names() {
        assert_eq!(AnnotationKind::Hover.to_string(), "hover");
        assert_eq!(Annotation::highlight(0, 3).kind().as_str(), "highlight");
    }
}

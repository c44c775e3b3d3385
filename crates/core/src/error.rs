use crate::annotation::AnnotationKind;
use std::path::PathBuf;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Identifies a code block inside a document so failures can be traced back to a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    /// Zero-based position of the block among the document's code blocks.
    pub index: usize,
    /// Position of the opening fence, when the parser recorded one.
    pub location: Option<SourceLocation>,
    /// First line of the block's text, truncated.
    pub snippet: String,
}

const SNIPPET_CHARS: usize = 40;

impl BlockLocation {
    /// Builds a location, deriving the snippet from the block text.
    pub fn new(index: usize, location: Option<SourceLocation>, text: &str) -> Self {
        let first_line = text.lines().next().unwrap_or_default();
        let mut snippet: String = first_line.chars().take(SNIPPET_CHARS).collect();
        if first_line.chars().count() > SNIPPET_CHARS {
            snippet.push('…');
        }
        Self {
            index,
            location,
            snippet,
        }
    }
}

impl std::fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code block #{}", self.index + 1)?;
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        write!(f, " (`{}`)", self.snippet)
    }
}

/// Failure reported by the analysis engine for a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AnalysisError {
    /// Human readable failure, usually the unexpected compiler messages.
    pub message: String,
    /// Compiler error codes that caused the failure, if the engine reported them.
    pub codes: Vec<u32>,
}

impl AnalysisError {
    /// Create an analysis error with no error codes attached.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            codes: Vec::new(),
        }
    }
}

/// Failure reported by the syntax highlighter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HighlightError {
    /// Human readable failure.
    pub message: String,
}

impl HighlightError {
    /// Create a highlighter error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Contract violations detected while composing tokens with annotations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// An annotation points outside the rewritten source text.
    #[error(
        "{kind} annotation [{start}, {end}) is outside the source text (length {source_len})"
    )]
    AnnotationOutOfRange {
        /// Kind of the offending annotation.
        kind: AnnotationKind,
        /// Start offset (chars).
        start: usize,
        /// End offset (chars, exclusive).
        end: usize,
        /// Length of the source text in chars.
        source_len: usize,
    },
    /// Two ranged annotations overlap without one containing the other.
    #[error("annotations [{}, {}) and [{}, {}) partially overlap", .first.0, .first.1, .second.0, .second.1)]
    PartialOverlap {
        /// Earlier annotation range.
        first: (usize, usize),
        /// Later annotation range.
        second: (usize, usize),
    },
    /// The tokenizer's view of a line disagrees with the source text.
    #[error("tokens for line {line} do not match the source: expected {expected:?}, found {found:?}")]
    TokenMismatch {
        /// Zero-based line number.
        line: usize,
        /// Line text from the source.
        expected: String,
        /// Concatenated token text.
        found: String,
    },
}

/// Errors that can occur while enriching and rendering code blocks.
#[derive(Debug, Error)]
pub enum TwomarkError {
    /// IO error while reading type declarations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Invalid or unusable settings (for example a missing types directory).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
        /// Path the error refers to, if any.
        path: Option<PathBuf>,
    },
    /// A block asked for twoslash but no analysis engine was supplied.
    #[error("{block} requests twoslash but no analyzer is configured")]
    MissingAnalyzer {
        /// Offending block.
        block: BlockLocation,
    },
    /// The analysis engine rejected a sample.
    #[error("Twoslash failed for {block}: {source}")]
    Analysis {
        /// Offending block.
        block: BlockLocation,
        /// Engine failure.
        source: AnalysisError,
    },
    /// The highlighter could not be constructed.
    #[error("Could not load highlighter: {source}")]
    HighlighterLoad {
        /// Loader failure.
        source: HighlightError,
    },
    /// The highlighter failed on a block.
    #[error("Highlighting failed for {block}: {source}")]
    Highlight {
        /// Offending block.
        block: BlockLocation,
        /// Tokenizer failure.
        source: HighlightError,
    },
    /// Tokens and annotations could not be composed.
    #[error("Rendering failed for {block}: {source}")]
    Render {
        /// Offending block.
        block: BlockLocation,
        /// Contract violation.
        source: RenderError,
    },
    /// A code block was moved through an invalid phase transition.
    #[error("Invalid transition for {block}: {from} -> {to}")]
    InvalidTransition {
        /// Offending block.
        block: BlockLocation,
        /// Phase the block was in.
        from: &'static str,
        /// Phase that was requested.
        to: &'static str,
    },
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TwomarkError {
    /// Create a configuration error tied to a path
    pub fn configuration(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Configuration {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// The block that caused this error, when the error is block-scoped.
    pub fn block(&self) -> Option<&BlockLocation> {
        match self {
            TwomarkError::MissingAnalyzer { block }
            | TwomarkError::Analysis { block, .. }
            | TwomarkError::Highlight { block, .. }
            | TwomarkError::Render { block, .. }
            | TwomarkError::InvalidTransition { block, .. } => Some(block),
            _ => None,
        }
    }
}

#![deny(missing_docs)]
//! twomark core: code blocks, languages, annotations, settings, and collaborator seams.

/// Analysis results, annotations, and highlighter tokens.
pub mod annotation;
/// Code block phases and the twoslash directive detector.
pub mod code_block;
/// Run settings and the twoslash kill-switch.
pub mod config;
/// Traits implemented by the tokenizer, analysis engine, and library provider.
pub mod engine;
/// Core error types.
pub mod error;
/// Language aliases and the highlightable-language catalog.
pub mod language;
/// Markdown parsing into MDAST.
pub mod parse;
/// Virtual type-declarations map.
pub mod vfs;

pub use annotation::{
    AnalysisResult, Annotation, AnnotationKind, AnnotationPayload, Diagnostic, DiagnosticCategory,
    FontStyle, Token, TokenLines, TokenStyle,
};
pub use code_block::{BlockPhase, CodeBlock, parse_meta, requests_enrichment};
pub use config::{DISABLE_ENV_VAR, HighlighterOptions, ScriptTarget, Settings, TWOSLASH_MARKER};
pub use engine::{Analyzer, Highlighter, HighlighterLoader, LibraryProvider};
pub use error::{
    AnalysisError, BlockLocation, HighlightError, RenderError, SourceLocation, TwomarkError,
};
pub use language::{LanguageAlias, can_highlight, normalize};
pub use parse::{ParseOptions, parse_document};
pub use vfs::{
    DirectoryLibraryProvider, TYPES_ROOT, VirtualFileMap, add_files_from_directory,
    build_type_map,
};

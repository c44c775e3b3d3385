//! Seams for the external collaborators: tokenizer, analysis engine, and
//! library-declaration provider.
//!
//! All of them are `Send + Sync` so a run can fan out across threads.

use crate::annotation::{AnalysisResult, TokenLines};
use crate::config::{HighlighterOptions, ScriptTarget};
use crate::error::{AnalysisError, HighlightError, TwomarkError};
use crate::vfs::VirtualFileMap;

/// A loaded syntax highlighter.
pub trait Highlighter: Send + Sync {
    /// Tokenizes `code` as `lang`, one run vector per line.
    ///
    /// Lines end at `\r\n`, `\n` or a lone `\r`; runs exclude the terminator.
    fn code_to_tokens(&self, code: &str, lang: &str) -> Result<TokenLines, HighlightError>;

    /// Background colour of the loaded theme.
    fn background(&self) -> Option<&str> {
        None
    }
}

/// Builds a [`Highlighter`]; called at most once per run.
pub trait HighlighterLoader: Send + Sync {
    /// Loads grammars and theme.
    fn load(&self, options: &HighlighterOptions) -> Result<Box<dyn Highlighter>, HighlightError>;
}

impl<F> HighlighterLoader for F
where
    F: Fn(&HighlighterOptions) -> Result<Box<dyn Highlighter>, HighlightError> + Send + Sync,
{
    fn load(&self, options: &HighlighterOptions) -> Result<Box<dyn Highlighter>, HighlightError> {
        (self)(options)
    }
}

/// The twoslash analysis engine.
pub trait Analyzer: Send + Sync {
    /// Compiles the sample and returns its rewritten text and annotations.
    ///
    /// `lang` is the fence language (empty when the fence has none). An error
    /// means the sample failed in a way it did not declare.
    fn analyze(
        &self,
        code: &str,
        lang: &str,
        type_map: Option<&VirtualFileMap>,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Provides the default TypeScript library declarations.
pub trait LibraryProvider: Send + Sync {
    /// Returns the `lib.*.d.ts` files for `target`, keyed by virtual path.
    fn default_map(&self, target: ScriptTarget) -> Result<VirtualFileMap, TwomarkError>;
}

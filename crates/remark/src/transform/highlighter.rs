//! Run-scoped highlighter handle.

use once_cell::sync::OnceCell;
use twomark_core::{Highlighter, HighlighterLoader, HighlighterOptions, TwomarkError};

/// Loads the highlighter on first use and hands the same handle to every block.
pub struct LazyHighlighter<'a> {
    loader: &'a dyn HighlighterLoader,
    options: HighlighterOptions,
    handle: OnceCell<Box<dyn Highlighter>>,
}

impl<'a> LazyHighlighter<'a> {
    /// Wraps a loader; nothing is loaded yet.
    pub fn new(loader: &'a dyn HighlighterLoader, options: HighlighterOptions) -> Self {
        Self {
            loader,
            options,
            handle: OnceCell::new(),
        }
    }

    /// Returns the handle, loading it on the first call.
    pub fn get(&self) -> Result<&dyn Highlighter, TwomarkError> {
        self.handle
            .get_or_try_init(|| {
                log::debug!("Loading highlighter with theme {}", self.options.theme);
                self.loader.load(&self.options)
            })
            .map(|handle| handle.as_ref())
            .map_err(|source| TwomarkError::HighlighterLoad { source })
    }

    /// Whether the handle has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl std::fmt::Debug for LazyHighlighter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyHighlighter")
            .field("options", &self.options)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

//! Twoslash enrichment of a single code block.

use once_cell::sync::OnceCell;
use twomark_core::{
    Analyzer, CodeBlock, DirectoryLibraryProvider, LibraryProvider, Settings, TwomarkError,
    VirtualFileMap, build_type_map,
};

/// Runs the analysis engine on blocks that opt in.
///
/// The type-declarations map is built at most once, on the first block that
/// needs it, and only when `use_node_modules` is set.
pub struct Enricher<'a> {
    settings: &'a Settings,
    analyzer: Option<&'a dyn Analyzer>,
    libraries: Option<&'a dyn LibraryProvider>,
    type_map: OnceCell<VirtualFileMap>,
}

impl<'a> Enricher<'a> {
    /// Enricher without an analyzer; blocks requesting twoslash will fail.
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            analyzer: None,
            libraries: None,
            type_map: OnceCell::new(),
        }
    }

    /// Sets the analysis engine.
    pub fn with_analyzer(mut self, analyzer: &'a dyn Analyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Overrides where the default library declarations come from.
    pub fn with_library_provider(mut self, libraries: &'a dyn LibraryProvider) -> Self {
        self.libraries = Some(libraries);
        self
    }

    /// Enriches `block` when its fence asks for it and twoslash is not disabled.
    ///
    /// Returns whether the block was enriched. Engine failures are fatal.
    pub fn enrich(&self, block: &mut CodeBlock) -> Result<bool, TwomarkError> {
        if !block.requests_enrichment() {
            return Ok(false);
        }
        if self.settings.disable_twoslash {
            log::debug!(
                "Twoslash disabled; leaving code block #{} unenriched",
                block.index + 1
            );
            return Ok(false);
        }
        let Some(analyzer) = self.analyzer else {
            return Err(TwomarkError::MissingAnalyzer {
                block: block.location(),
            });
        };

        let type_map = self.type_map()?;
        run_twoslash(block, analyzer, type_map)?;
        Ok(true)
    }

    fn type_map(&self) -> Result<Option<&VirtualFileMap>, TwomarkError> {
        if !self.settings.use_node_modules {
            return Ok(None);
        }
        self.type_map
            .get_or_try_init(|| match self.libraries {
                Some(libraries) => build_type_map(self.settings, libraries),
                None => build_type_map(
                    self.settings,
                    &DirectoryLibraryProvider::new(&self.settings.typescript_lib_path),
                ),
            })
            .map(Some)
    }
}

impl std::fmt::Debug for Enricher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("settings", self.settings)
            .field("has_analyzer", &self.analyzer.is_some())
            .field("type_map_files", &self.type_map.get().map(|m| m.len()))
            .finish()
    }
}

/// Calls the engine on the block's current text and language and applies the result.
pub fn run_twoslash(
    block: &mut CodeBlock,
    analyzer: &dyn Analyzer,
    type_map: Option<&VirtualFileMap>,
) -> Result<(), TwomarkError> {
    let lang = block.lang.as_deref().unwrap_or_default();
    let result = analyzer
        .analyze(&block.value, lang, type_map)
        .map_err(|source| TwomarkError::Analysis {
            block: block.location(),
            source,
        })?;
    log::debug!(
        "Enriched code block #{} as {} with {} annotations",
        block.index + 1,
        result.extension,
        result.annotations.len()
    );
    block.apply_analysis(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use twomark_core::{AnalysisError, AnalysisResult, Annotation, BlockPhase, ScriptTarget};

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(String, String, Option<usize>)>>,
    }

    impl Analyzer for Recording {
        fn analyze(
            &self,
            code: &str,
            lang: &str,
            type_map: Option<&VirtualFileMap>,
        ) -> Result<AnalysisResult, AnalysisError> {
            self.calls
                .lock()
                .unwrap()
                .push((code.to_string(), lang.to_string(), type_map.map(|m| m.len())));
            if code.contains("@errors") {
                return Err(AnalysisError::new("Errors were thrown in the sample"));
            }
            Ok(AnalysisResult {
                code: code.lines().next().unwrap_or_default().to_string(),
                extension: "tsx".to_string(),
                annotations: vec![Annotation::hover(0, 1, "x")],
                diagnostics: Vec::new(),
                playground_url: None,
            })
        }
    }

    struct FixedLibs;

    impl LibraryProvider for FixedLibs {
        fn default_map(&self, _target: ScriptTarget) -> Result<VirtualFileMap, TwomarkError> {
            Ok(VirtualFileMap::from([("/lib.d.ts".to_string(), String::new())]))
        }
    }

    #[test]
    fn unmarked_blocks_are_untouched() {
        let settings = Settings::default();
        let analyzer = Recording::default();
        let enricher = Enricher::new(&settings).with_analyzer(&analyzer);
        let mut block = CodeBlock::new(0, Some("ts".into()), "const a = 1", Some("title=a.ts"));
        let before = block.clone();

        assert!(!enricher.enrich(&mut block).unwrap());
        assert_eq!(block, before);
        assert!(analyzer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn marked_blocks_take_engine_output() {
        let settings = Settings::default();
        let analyzer = Recording::default();
        let enricher = Enricher::new(&settings).with_analyzer(&analyzer);
        let mut block = CodeBlock::new(0, Some("ts".into()), "a\n// ^?", Some("twoslash"));

        assert!(enricher.enrich(&mut block).unwrap());
        assert_eq!(block.phase(), &BlockPhase::Enriched);
        assert_eq!(block.value, "a");
        assert_eq!(block.lang.as_deref(), Some("tsx"));
        assert_eq!(block.annotations().map(<[_]>::len), Some(1));
        assert_eq!(
            analyzer.calls.lock().unwrap().as_slice(),
            &[("a\n// ^?".to_string(), "ts".to_string(), None)]
        );
    }

    #[test]
    fn kill_switch_skips_engine() {
        let settings = Settings {
            disable_twoslash: true,
            ..Settings::default()
        };
        let analyzer = Recording::default();
        let enricher = Enricher::new(&settings).with_analyzer(&analyzer);
        let mut block = CodeBlock::new(0, Some("ts".into()), "a", Some("twoslash"));

        assert!(!enricher.enrich(&mut block).unwrap());
        assert_eq!(block.phase(), &BlockPhase::Raw);
        assert!(analyzer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn engine_failure_names_the_block() {
        let settings = Settings::default();
        let analyzer = Recording::default();
        let enricher = Enricher::new(&settings).with_analyzer(&analyzer);
        let mut block = CodeBlock::new(4, Some("ts".into()), "// @errors: 2322", Some("twoslash"));

        let err = enricher.enrich(&mut block).unwrap_err();
        assert_eq!(err.block().map(|b| b.index), Some(4));
        assert!(err.to_string().contains("Errors were thrown in the sample"));
        assert_eq!(block.phase(), &BlockPhase::Raw);
    }

    #[test]
    fn missing_analyzer_is_an_error() {
        let settings = Settings::default();
        let enricher = Enricher::new(&settings);
        let mut block = CodeBlock::new(0, Some("ts".into()), "a", Some("twoslash"));
        assert!(matches!(
            enricher.enrich(&mut block),
            Err(TwomarkError::MissingAnalyzer { .. })
        ));
    }

    #[test]
    fn type_map_is_passed_when_requested() {
        let types = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(types.path().join("node")).unwrap();
        std::fs::write(types.path().join("node/index.d.ts"), "export {}").unwrap();
        let settings = Settings {
            use_node_modules: true,
            node_modules_types_path: types.path().to_path_buf(),
            ..Settings::default()
        };
        let analyzer = Recording::default();
        let enricher = Enricher::new(&settings)
            .with_analyzer(&analyzer)
            .with_library_provider(&FixedLibs);
        let mut block = CodeBlock::new(0, Some("ts".into()), "a", Some("twoslash"));

        enricher.enrich(&mut block).unwrap();
        assert_eq!(analyzer.calls.lock().unwrap()[0].2, Some(2));
    }
}

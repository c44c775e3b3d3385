//! Settings for a processing run.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::PathBuf;

/// Fence meta token that opts a code block into the twoslash pass.
pub const TWOSLASH_MARKER: &str = "twoslash";

/// Environment variable that disables the twoslash pass for a whole run.
pub const DISABLE_ENV_VAR: &str = "TWOSLASH_DISABLE";

/// ECMAScript target the type-declarations map is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    /// ES3
    Es3,
    /// ES5
    Es5,
    /// ES2015 (ES6)
    #[default]
    Es2015,
    /// ES2016
    Es2016,
    /// ES2017
    Es2017,
    /// ES2018
    Es2018,
    /// ES2019
    Es2019,
    /// ES2020
    Es2020,
    /// ES2021
    Es2021,
    /// ES2022
    Es2022,
    /// Latest features
    EsNext,
}

impl ScriptTarget {
    /// Maps a yearly edition (`2015`, `2020`, ...) to its target.
    pub fn from_year(year: u32) -> Option<Self> {
        Some(match year {
            2015 => ScriptTarget::Es2015,
            2016 => ScriptTarget::Es2016,
            2017 => ScriptTarget::Es2017,
            2018 => ScriptTarget::Es2018,
            2019 => ScriptTarget::Es2019,
            2020 => ScriptTarget::Es2020,
            2021 => ScriptTarget::Es2021,
            2022 => ScriptTarget::Es2022,
            _ => return None,
        })
    }
}

/// Twoslash settings, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Provision a virtual map of library type declarations for the analyzer.
    pub use_node_modules: bool,
    /// Directory whose `.ts`/`.tsx` files are mounted under `/node_modules/@types`.
    pub node_modules_types_path: PathBuf,
    /// Directory holding the TypeScript `lib.*.d.ts` files.
    pub typescript_lib_path: PathBuf,
    /// Target the default library map is built for.
    pub target: ScriptTarget,
    /// Skip the twoslash pass regardless of fence markers.
    pub disable_twoslash: bool,
    /// Leave every block as plain code.
    pub disable_highlighting: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_node_modules: false,
            node_modules_types_path: PathBuf::from("node_modules/@types"),
            typescript_lib_path: PathBuf::from("node_modules/typescript/lib"),
            target: ScriptTarget::default(),
            disable_twoslash: false,
            disable_highlighting: false,
        }
    }
}

impl Settings {
    /// Applies `TWOSLASH_DISABLE` from the process environment.
    ///
    /// Call this once at the top of a run; nothing else reads the environment.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var_os(DISABLE_ENV_VAR);
        self.with_disable_value(value.as_deref())
    }

    /// Applies a `TWOSLASH_DISABLE` value. Any non-empty value disables twoslash.
    pub fn with_disable_value(mut self, value: Option<&OsStr>) -> Self {
        if value.is_some_and(|v| !v.is_empty()) {
            self.disable_twoslash = true;
        }
        self
    }
}

/// Options handed to the highlighter loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlighterOptions {
    /// Theme name.
    pub theme: String,
    /// Grammars to load; empty loads the whole catalog.
    pub langs: Vec<String>,
}

impl Default for HighlighterOptions {
    fn default() -> Self {
        Self {
            theme: "nord".to_string(),
            langs: Vec::new(),
        }
    }
}

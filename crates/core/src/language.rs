//! Language normalization and the highlightable-language catalog.
//!
//! The catalog mirrors the tokenizer's own language list: common ids, their
//! aliases, and the remaining grammars it ships.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Frequently used grammar ids.
pub const COMMON_LANG_IDS: &[&str] = &[
    "c",
    "cpp",
    "css",
    "dart",
    "diff",
    "dockerfile",
    "go",
    "graphql",
    "html",
    "java",
    "javascript",
    "json",
    "jsonc",
    "jsx",
    "kotlin",
    "less",
    "markdown",
    "objective-c",
    "php",
    "python",
    "r",
    "ruby",
    "rust",
    "scss",
    "shellscript",
    "sql",
    "swift",
    "tsx",
    "typescript",
    "xml",
    "yaml",
];

/// Aliases the tokenizer accepts for the common ids.
pub const COMMON_LANG_ALIASES: &[&str] = &[
    "bash", "c++", "docker", "js", "md", "objc", "py", "rb", "rs", "sh", "shell", "ts", "yml",
    "zsh",
];

/// Less common grammar ids and their aliases.
pub const OTHER_LANG_IDS: &[&str] = &[
    "abap",
    "actionscript-3",
    "ada",
    "apache",
    "apex",
    "apl",
    "applescript",
    "asm",
    "awk",
    "bat",
    "batch",
    "c#",
    "clj",
    "clojure",
    "cmake",
    "cobol",
    "coffee",
    "crystal",
    "csharp",
    "d",
    "elixir",
    "elm",
    "erb",
    "erlang",
    "f#",
    "fsharp",
    "gherkin",
    "git-commit",
    "git-rebase",
    "glsl",
    "gnuplot",
    "groovy",
    "hack",
    "haml",
    "handlebars",
    "haskell",
    "hbs",
    "hcl",
    "hlsl",
    "ini",
    "jinja-html",
    "jsonnet",
    "julia",
    "latex",
    "lisp",
    "logo",
    "lua",
    "makefile",
    "matlab",
    "nix",
    "ocaml",
    "pascal",
    "perl",
    "plsql",
    "postcss",
    "powershell",
    "prolog",
    "ps1",
    "pug",
    "puppet",
    "purescript",
    "razor",
    "riscv",
    "sas",
    "sass",
    "scala",
    "scheme",
    "shaderlab",
    "smalltalk",
    "stylus",
    "svelte",
    "tcl",
    "tex",
    "toml",
    "vb",
    "viml",
    "vue",
    "wasm",
    "xsl",
    "zig",
];

static SUPPORTED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    COMMON_LANG_IDS
        .iter()
        .chain(COMMON_LANG_ALIASES)
        .chain(OTHER_LANG_IDS)
        .copied()
        .collect()
});

/// Language ids the tokenizer cannot take as-is, mapped to an equivalent it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageAlias {
    /// JSON5 has no grammar; the `json` grammar tolerates its comments.
    Json5,
}

impl LanguageAlias {
    /// Every alias.
    pub const ALL: [LanguageAlias; 1] = [LanguageAlias::Json5];

    /// Looks up an alias by its fence language id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "json5" => Some(LanguageAlias::Json5),
            _ => None,
        }
    }

    /// The fence language id this alias matches.
    pub fn id(self) -> &'static str {
        match self {
            LanguageAlias::Json5 => "json5",
        }
    }

    /// The highlightable id used in place of the alias.
    pub fn canonical(self) -> &'static str {
        match self {
            LanguageAlias::Json5 => "json",
        }
    }
}

/// Maps an alias to its highlightable equivalent; other ids pass through unchanged.
pub fn normalize(lang: &str) -> &str {
    match LanguageAlias::from_id(lang) {
        Some(alias) => alias.canonical(),
        None => lang,
    }
}

/// Whether the tokenizer has a grammar for `lang`.
pub fn can_highlight(lang: &str) -> bool {
    SUPPORTED.contains(lang)
}

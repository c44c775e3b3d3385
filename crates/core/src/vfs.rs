//! Virtual type-declarations map handed to the analysis engine.
//!
//! Keys are absolute virtual paths (`/lib.es2015.d.ts`,
//! `/node_modules/@types/node/index.d.ts`), values are file contents.

use crate::config::{ScriptTarget, Settings};
use crate::engine::LibraryProvider;
use crate::error::TwomarkError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// In-memory file system: virtual path to file content.
pub type VirtualFileMap = BTreeMap<String, String>;

/// Virtual directory the types directory is mounted at.
pub const TYPES_ROOT: &str = "/node_modules/@types";

const DECLARATION_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Adds every `.ts`/`.tsx` file under `dir` to `map`, mounted at [`TYPES_ROOT`].
///
/// Returns the number of files added.
pub fn add_files_from_directory(map: &mut VirtualFileMap, dir: &Path) -> Result<usize, TwomarkError> {
    if !dir.is_dir() {
        return Err(TwomarkError::configuration(
            format!("type declarations directory {} does not exist", dir.display()),
            dir,
        ));
    }

    let mut added = 0;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            TwomarkError::configuration(format!("cannot read {}: {}", dir.display(), err), dir)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_declaration = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DECLARATION_EXTENSIONS.contains(&ext));
        if !is_declaration {
            continue;
        }

        let relative = path.strip_prefix(dir).map_err(|_| {
            TwomarkError::InternalError(format!("{} escaped {}", path.display(), dir.display()))
        })?;
        let key = format!("{}/{}", TYPES_ROOT, virtual_segments(relative));
        map.insert(key, std::fs::read_to_string(path)?);
        added += 1;
    }

    Ok(added)
}

fn virtual_segments(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Reads the default library declarations from a TypeScript `lib` directory.
#[derive(Debug, Clone)]
pub struct DirectoryLibraryProvider {
    lib_dir: PathBuf,
}

impl DirectoryLibraryProvider {
    /// Provider reading from `lib_dir`.
    pub fn new(lib_dir: impl Into<PathBuf>) -> Self {
        Self {
            lib_dir: lib_dir.into(),
        }
    }
}

impl LibraryProvider for DirectoryLibraryProvider {
    fn default_map(&self, target: ScriptTarget) -> Result<VirtualFileMap, TwomarkError> {
        let entries = std::fs::read_dir(&self.lib_dir).map_err(|err| {
            TwomarkError::configuration(
                format!(
                    "cannot read TypeScript lib directory {}: {}",
                    self.lib_dir.display(),
                    err
                ),
                &self.lib_dir,
            )
        })?;

        let mut map = VirtualFileMap::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !entry.file_type()?.is_file() || !lib_applies(&name, target) {
                continue;
            }
            map.insert(format!("/{}", name), std::fs::read_to_string(entry.path())?);
        }
        Ok(map)
    }
}

/// Whether a `lib*.d.ts` file belongs in the map for `target`.
///
/// Non-ES libs (`dom`, `webworker`, ...) always apply; edition libs apply up to the target.
fn lib_applies(name: &str, target: ScriptTarget) -> bool {
    if name == "lib.d.ts" {
        return true;
    }
    let Some(stem) = name
        .strip_prefix("lib.")
        .and_then(|rest| rest.strip_suffix(".d.ts"))
    else {
        return false;
    };
    let edition = stem.split('.').next().unwrap_or_default();
    match edition_level(edition) {
        Some(level) => level <= target,
        None => true,
    }
}

fn edition_level(edition: &str) -> Option<ScriptTarget> {
    match edition {
        "es3" => Some(ScriptTarget::Es3),
        "es5" => Some(ScriptTarget::Es5),
        "es6" => Some(ScriptTarget::Es2015),
        "esnext" => Some(ScriptTarget::EsNext),
        _ => {
            let year: u32 = edition.strip_prefix("es")?.parse().ok()?;
            Some(ScriptTarget::from_year(year).unwrap_or(ScriptTarget::EsNext))
        }
    }
}

/// Builds the full type map: default libs for the target plus the types directory.
pub fn build_type_map(
    settings: &Settings,
    libraries: &dyn LibraryProvider,
) -> Result<VirtualFileMap, TwomarkError> {
    let mut map = libraries.default_map(settings.target)?;
    let libs = map.len();
    let types = add_files_from_directory(&mut map, &settings.node_modules_types_path)?;
    log::debug!(
        "Provisioned type map with {} lib files and {} declarations from {}",
        libs,
        types,
        settings.node_modules_types_path.display()
    );
    Ok(map)
}

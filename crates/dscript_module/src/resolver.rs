//! Config discovery and import resolution.

use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};
use dscript_tsoptions::{parse_tsconfig, ProjectConfig, CONFIG_FILE_NAME};
use dscript_tspath::{combine_paths, get_directory_path, is_rooted, join_paths, normalize_path, trim_wildcard, Extension};
use tracing::{debug, trace};

use crate::fs::FileSystem;

/// Directory searched when a path is not found where it was expected.
const VENDOR_DIR: &str = "vendor";

/// What an import path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A `.d.ts` file: the import only brings types and is dropped.
    TypeDefinition(String),
    /// A `.ts` file to parse.
    File(String),
}

/// The absolute path of the entry file: `path` itself, or `vendor/<path>`
/// when that is missing.
pub fn resolve_entry<F: FileSystem + ?Sized>(fs: &F, path: &str) -> Result<String, ParseError> {
    let absolute = fs.resolve_absolute(path);
    if fs.exists(&absolute) {
        return Ok(absolute);
    }

    let vendored = fs.resolve_absolute(&combine_paths(VENDOR_DIR, path));
    if fs.exists(&vendored) {
        debug!(path, resolved = %vendored, "entry found under vendor");
        return Ok(vendored);
    }
    Err(ParseError::from_message(&messages::FILE_NOT_FOUND, Position::start(), &[path]))
}

/// Find the `tsconfig.json` nearest to `entry`, walking up from its
/// directory. Without one, the entry directory is the base path.
pub fn discover_config<F: FileSystem + ?Sized>(fs: &F, entry: &str) -> Result<ProjectConfig, ParseError> {
    let entry_dir = get_directory_path(&fs.resolve_absolute(entry));
    let mut dir = entry_dir.clone();
    loop {
        let candidate = combine_paths(&dir, CONFIG_FILE_NAME);
        if fs.exists(&candidate) {
            debug!(config = %candidate, "found project config");
            let content = fs.read_to_string(&candidate).map_err(|err| {
                ParseError::from_message(&messages::CANNOT_READ_FILE, Position::start(), &[&candidate, &err.to_string()])
            })?;
            return parse_tsconfig(&content, &candidate);
        }

        let parent = get_directory_path(&dir);
        if parent == dir {
            debug!(base_path = %entry_dir, "no project config, using entry directory");
            return Ok(ProjectConfig::with_base_path(entry_dir));
        }
        dir = parent;
    }
}

/// Resolves import paths against a project configuration.
pub struct Resolver<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    config: &'a ProjectConfig,
}

impl<'a, F: FileSystem + ?Sized> Resolver<'a, F> {
    pub fn new(fs: &'a F, config: &'a ProjectConfig) -> Self {
        Self { fs, config }
    }

    /// The file an import of `path` from a file in `importer_dir` refers
    /// to. Candidates are tried in order and at each one a `.d.ts` wins
    /// over a `.ts`.
    pub fn find_source(&self, path: &str, importer_dir: &str) -> Option<Source> {
        self.candidates(path, importer_dir)
            .into_iter()
            .find_map(|candidate| self.find_source_file(&candidate))
    }

    /// Extension-less locations for `path`, in search order:
    ///
    /// 1. `path` itself when it is absolute
    /// 2. `<base path>/<alias>/<path>` for every search path alias
    /// 3. `<importer dir>/<path>`
    /// 4. `vendor/<path>`
    pub fn candidates(&self, path: &str, importer_dir: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(self.config.search_paths.len() + 3);
        if is_rooted(path) {
            candidates.push(normalize_path(path));
        }
        for alias in &self.config.search_paths {
            candidates.push(join_paths(&[&self.config.base_path, trim_wildcard(alias), path]));
        }
        candidates.push(self.fs.resolve_absolute(&combine_paths(importer_dir, path)));
        candidates.push(self.fs.resolve_absolute(&combine_paths(VENDOR_DIR, path)));
        candidates
    }

    fn find_source_file(&self, candidate: &str) -> Option<Source> {
        let definition = format!("{}{}", candidate, Extension::Dts.as_str());
        if self.fs.exists(&definition) {
            trace!(path = %definition, "type definition");
            return Some(Source::TypeDefinition(definition));
        }

        let source = format!("{}{}", candidate, Extension::Ts.as_str());
        if self.fs.exists(&source) {
            trace!(path = %source, "source file");
            return Some(Source::File(source));
        }

        trace!(candidate, "no match");
        None
    }
}

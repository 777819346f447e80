//! Recursive import loading.
//!
//! Every loaded file gets its cache entry before its own imports are
//! followed. Import cycles terminate on that entry.

use dscript_ast::module::{File, Module};
use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};
use dscript_module::{FileSystem, Resolver, Source};
use dscript_parser::ParserOptions;
use dscript_tsoptions::ProjectConfig;
use dscript_tspath::{get_directory_path, remove_extension, Extension};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

/// An import that resolved to a source file and still has to be loaded.
#[derive(Debug)]
struct PendingImport {
    position: Position,
    /// The path as written.
    path: String,
    /// The `.ts` file it resolved to.
    source_path: String,
    /// `source_path` without extension: the module map key.
    key: String,
    side_effect: bool,
}

/// Loads a file and everything it imports into a [`Module`].
pub struct ModuleLoader<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    config: ProjectConfig,
    options: ParserOptions,
    /// Side-effect imports already loaded, by full path.
    visited: FxHashSet<String>,
}

impl<'a, F: FileSystem + ?Sized> ModuleLoader<'a, F> {
    pub fn new(fs: &'a F, config: ProjectConfig, options: ParserOptions) -> Self {
        Self {
            fs,
            config,
            options,
            visited: FxHashSet::default(),
        }
    }

    /// Build the module rooted at an already parsed entry file.
    pub fn load(mut self, mut entry: File) -> Result<Module, ParseError> {
        let pending = self.resolve_imports(&mut entry)?;
        let mut module = Module::new(entry, self.config.base_path.clone());
        self.load_pending(pending, &mut module.imported_files)?;

        debug!(entry = %module.entry_file.path, imported = module.imported_files.len(), "module loaded");
        Ok(module)
    }

    /// Read and parse the file at the absolute `path`.
    pub fn parse_path(&self, path: &str) -> Result<File, ParseError> {
        debug!(path, "parsing file");
        let source = self.fs.read_to_string(path).map_err(|err| {
            ParseError::from_message(&messages::CANNOT_READ_FILE, Position::start(), &[path, &err.to_string()])
        })?;
        dscript_parser::parse_file(&source, path, self.options)
    }

    /// Resolve the imports of `file` in place: fill in their resolved
    /// paths and drop the ones naming type definitions.
    fn resolve_imports(&self, file: &mut File) -> Result<Vec<PendingImport>, ParseError> {
        let importer_dir = get_directory_path(&file.path);
        let resolver = Resolver::new(self.fs, &self.config);

        let mut pending = Vec::new();
        let mut kept = Vec::with_capacity(file.imports.len());
        for mut import in std::mem::take(&mut file.imports) {
            match resolver.find_source(&import.path, &importer_dir) {
                Some(Source::TypeDefinition(path)) => {
                    trace!(import = %import.path, definition = %path, "dropping type-only import");
                }
                Some(Source::File(source_path)) => {
                    let key = remove_extension(&source_path, Extension::Ts).to_string();
                    import.resolved_path = key.clone();
                    pending.push(PendingImport {
                        position: import.position,
                        path: import.path.clone(),
                        source_path,
                        key,
                        side_effect: import.is_side_effect(),
                    });
                    kept.push(import);
                }
                None => {
                    return Err(ParseError::from_message(
                        &messages::IMPORT_NOT_FOUND,
                        import.position,
                        &[&import.path],
                    ));
                }
            }
        }
        file.imports = kept;
        Ok(pending)
    }

    fn load_pending(
        &mut self,
        pending: Vec<PendingImport>,
        imported_files: &mut FxHashMap<String, File>,
    ) -> Result<(), ParseError> {
        for import in pending {
            let cached = if import.side_effect {
                !self.visited.insert(import.source_path.clone())
            } else {
                imported_files.contains_key(&import.key)
            };
            if cached {
                trace!(path = %import.source_path, "already imported");
                continue;
            }

            let mut file = self.parse_path(&import.source_path).map_err(|err| {
                ParseError::from_message(&messages::IMPORT_ERROR, import.position, &[&import.path, &err.to_string()])
            })?;
            let children = self.resolve_imports(&mut file)?;
            imported_files.insert(import.key, file);
            self.load_pending(children, imported_files)?;
        }
        Ok(())
    }
}

//! dscript_compiler: Front-end entry points.
//!
//! Resolves the entry file, finds its project config, parses it and loads
//! every file it imports into a single [`Module`].

mod loader;

pub use dscript_parser::{parse_expression, ParserOptions};
pub use loader::ModuleLoader;

use dscript_ast::module::Module;
use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};
use dscript_module::{discover_config, resolve_entry, FileSystem};
use dscript_tsoptions::ProjectConfig;
use dscript_tspath::get_directory_path;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Parse the file at `path` and everything it imports.
pub fn parse<F: FileSystem + ?Sized>(fs: &F, path: &str, options: ParserOptions) -> Result<Module, ParseError> {
    let entry_path = resolve_entry(fs, path)?;
    let config = discover_config(fs, &entry_path)?;
    debug!(entry = %entry_path, base_path = %config.base_path, "parsing module");

    let loader = ModuleLoader::new(fs, config, options);
    let entry = loader.parse_path(&entry_path)?;
    loader.load(entry)
}

/// Parse source text that is not backed by a file. The text may not
/// import anything.
pub fn parse_string(source: &str, options: ParserOptions) -> Result<Module, ParseError> {
    let file = dscript_parser::parse_file(source, "", options)?;
    if let Some(import) = file.imports.first() {
        return Err(ParseError::from_message(
            &messages::IMPORTS_WITHOUT_FILESYSTEM,
            import.position,
            &[],
        ));
    }
    Ok(Module::new(file, ""))
}

/// Parse source text named `file_name`, resolving its imports through
/// `fs` from the directory of `file_name`.
pub fn parse_source<F: FileSystem + ?Sized>(
    fs: &F,
    source: &str,
    file_name: &str,
    options: ParserOptions,
) -> Result<Module, ParseError> {
    let path = fs.resolve_absolute(file_name);
    let config = ProjectConfig::with_base_path(get_directory_path(&path));
    let file = dscript_parser::parse_file(source, &path, options)?;
    ModuleLoader::new(fs, config, options).load(file)
}

/// SHA-256 over the bytes of the entry file and every imported file, fed
/// in sorted path order.
pub fn hash<F: FileSystem + ?Sized>(fs: &F, path: &str) -> Result<[u8; 32], ParseError> {
    let module = parse(fs, path, ParserOptions::default())?;

    let mut files: Vec<&str> = std::iter::once(module.entry_file.path.as_str())
        .chain(module.imported_files.values().map(|f| f.path.as_str()))
        .collect();
    files.sort_unstable();
    files.dedup();

    let mut hasher = Sha256::new();
    for file in files {
        let bytes = fs.read(file).map_err(|err| {
            ParseError::from_message(&messages::CANNOT_READ_FILE, Position::start(), &[file, &err.to_string()])
        })?;
        hasher.update(&bytes);
    }

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Ok(digest)
}

//! dscript_module: Source lookup for the module loader.
//!
//! - [`FileSystem`]: the capability the loader reads sources through, with
//!   an OS-backed and an in-memory implementation.
//! - [`discover_config`]: finds the `tsconfig.json` governing an entry file.
//! - [`Resolver`]: maps an import path to the file it names.

mod fs;
mod resolver;

pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use resolver::{discover_config, resolve_entry, Resolver, Source};

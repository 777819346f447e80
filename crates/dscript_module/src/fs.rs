//! File system access.

use std::cell::RefCell;
use std::io;

use dscript_tspath::{combine_paths, is_rooted, normalize_path};
use rustc_hash::FxHashMap;

/// Read access to source files. Paths handed to `exists` and `read` are
/// absolute, as produced by `resolve_absolute`.
pub trait FileSystem {
    /// Make `path` absolute against the working directory and normalize it.
    fn resolve_absolute(&self, path: &str) -> String;

    /// Whether a file exists at the absolute `path`.
    fn exists(&self, path: &str) -> bool;

    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        String::from_utf8(self.read(path)?).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

// ============================================================================
// OS file system
// ============================================================================

/// The host file system, with relative paths resolved against a fixed
/// working directory.
#[derive(Debug, Clone)]
pub struct OsFileSystem {
    cwd: String,
}

impl OsFileSystem {
    /// Use the process working directory.
    pub fn new() -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::with_cwd(&cwd.to_string_lossy()))
    }

    pub fn with_cwd(cwd: &str) -> Self {
        Self {
            cwd: normalize_path(cwd),
        }
    }
}

impl FileSystem for OsFileSystem {
    fn resolve_absolute(&self, path: &str) -> String {
        if is_rooted(path) {
            normalize_path(path)
        } else {
            combine_paths(&self.cwd, path)
        }
    }

    fn exists(&self, path: &str) -> bool {
        std::path::Path::new(path).is_file()
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

// ============================================================================
// In-memory file system
// ============================================================================

/// Files held in memory. Every read is counted, so tests can observe how
/// often the loader touched a file.
#[derive(Debug)]
pub struct MemoryFileSystem {
    cwd: String,
    files: FxHashMap<String, Vec<u8>>,
    reads: RefCell<FxHashMap<String, usize>>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::with_cwd("/")
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cwd(cwd: &str) -> Self {
        Self {
            cwd: normalize_path(cwd),
            files: FxHashMap::default(),
            reads: RefCell::new(FxHashMap::default()),
        }
    }

    /// Add or replace a file. A relative `path` is taken from the working
    /// directory.
    pub fn add_file(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        let path = self.resolve_absolute(path);
        self.files.insert(path, content.into());
    }

    /// Builder form of [`MemoryFileSystem::add_file`].
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, content);
        self
    }

    /// How many times `path` has been read.
    pub fn read_count(&self, path: &str) -> usize {
        let path = self.resolve_absolute(path);
        self.reads.borrow().get(&path).copied().unwrap_or(0)
    }

    /// Total number of reads across all files.
    pub fn total_reads(&self) -> usize {
        self.reads.borrow().values().sum()
    }
}

impl FileSystem for MemoryFileSystem {
    fn resolve_absolute(&self, path: &str) -> String {
        if is_rooted(path) {
            normalize_path(path)
        } else {
            combine_paths(&self.cwd, path)
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} does not exist")))?;
        *self.reads.borrow_mut().entry(path.to_string()).or_insert(0) += 1;
        Ok(content.clone())
    }
}

//! Files and modules: the roots of the tree.

use dscript_core::text::Position;
use rustc_hash::FxHashMap;

use crate::node::Stmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub position: Position,
    pub multi_line: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStmt {
    pub position: Position,
    /// The path as written in the source.
    pub path: String,
    /// Empty for side-effect imports.
    pub alias: String,
    /// Absolute path without extension; the key of the imported file in
    /// [`Module::imported_files`]. Empty until the import is resolved.
    pub resolved_path: String,
}

impl ImportStmt {
    pub fn is_side_effect(&self) -> bool {
        self.alias.is_empty()
    }
}

/// One parsed source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    pub path: String,
    pub imports: Vec<ImportStmt>,
    pub statements: Vec<Stmt>,
    pub attributes: Vec<String>,
    pub comments: Vec<Comment>,
    /// Declarations kept from `declare global { ... }` blocks.
    pub global_declarations: Vec<Stmt>,
}

impl File {
    /// The import bound to `alias`, if any.
    pub fn import(&self, alias: &str) -> Option<&ImportStmt> {
        self.imports.iter().find(|i| i.alias == alias)
    }
}

/// The entry file plus every file it transitively imports.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub entry_file: File,
    /// Imported files keyed by absolute path without extension.
    pub imported_files: FxHashMap<String, File>,
    pub base_path: String,
}

impl Module {
    pub fn new(entry_file: File, base_path: impl Into<String>) -> Self {
        Self {
            entry_file,
            imported_files: FxHashMap::default(),
            base_path: base_path.into(),
        }
    }

    /// Imported files sorted by key, for deterministic traversal.
    pub fn sorted_imports(&self) -> Vec<(&String, &File)> {
        let mut files: Vec<_> = self.imported_files.iter().collect();
        files.sort_by(|a, b| a.0.cmp(b.0));
        files
    }

    /// `declare global` declarations of the entry file, then of every
    /// imported file in key order.
    pub fn global_declarations(&self) -> Vec<&Stmt> {
        let mut stmts: Vec<&Stmt> = self.entry_file.global_declarations.iter().collect();
        for (_, file) in self.sorted_imports() {
            stmts.extend(file.global_declarations.iter());
        }
        stmts
    }
}

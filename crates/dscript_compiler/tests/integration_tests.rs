//! Module loading integration tests.
//!
//! End-to-end runs of entry resolution, config discovery, import
//! resolution and parsing over an in-memory file system.

use dscript_ast::node::Stmt;
use dscript_compiler::{hash, parse, parse_expression, parse_source, parse_string, ParserOptions};
use dscript_core::text::Position;
use dscript_diagnostics::ErrorKind;
use dscript_module::MemoryFileSystem;

/// Helper: an in-memory project rooted at `/project`.
fn project(files: &[(&str, &str)]) -> MemoryFileSystem {
    let mut fs = MemoryFileSystem::with_cwd("/project");
    for (path, content) in files {
        fs.add_file(path, *content);
    }
    fs
}

fn load(fs: &MemoryFileSystem, path: &str) -> dscript_ast::module::Module {
    match parse(fs, path, ParserOptions::default()) {
        Ok(module) => module,
        Err(err) => panic!("unexpected error: {err}"),
    }
}

// ============================================================================
// Single files
// ============================================================================

#[test]
fn test_parse_single_file() {
    let fs = project(&[("main.ts", "let a = 1\nfunction f() {}\n")]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.entry_file.path, "/project/main.ts");
    assert_eq!(module.entry_file.statements.len(), 2);
    assert!(module.imported_files.is_empty());
    assert_eq!(module.base_path, "/project");
}

#[test]
fn test_entry_missing() {
    let fs = project(&[]);
    let err = parse(&fs, "main.ts", ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);
}

#[test]
fn test_entry_under_vendor() {
    let fs = project(&[("vendor/tool/main.ts", "let a = 1\n")]);
    let module = load(&fs, "tool/main.ts");
    assert_eq!(module.entry_file.path, "/project/vendor/tool/main.ts");
}

#[test]
fn test_ignore_marker_and_carriage_returns() {
    let fs = project(&[("main.ts", "let a = 1\r\n//ts:ignore\nthis is not dscript\n")]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.entry_file.statements.len(), 1);
}

#[test]
fn test_parse_string() {
    let module = parse_string("let a = 1\n", ParserOptions::default()).unwrap();
    assert_eq!(module.entry_file.statements.len(), 1);

    let err = parse_string("import \"x\"\n", ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImportResolution);
    assert_eq!(err.position, Position::new(1, 1));
}

#[test]
fn test_parse_expression() {
    assert!(parse_expression("a.b(1, 2) + 3").is_ok());
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn test_module_import() {
    let fs = project(&[
        ("main.ts", "import * as util from \"./lib/util\"\nlet a = util.x\n"),
        ("lib/util.ts", "export let x = 1\n"),
    ]);
    let module = load(&fs, "main.ts");
    let import = module.entry_file.import("util").unwrap();
    assert_eq!(import.resolved_path, "/project/lib/util");
    assert!(module.imported_files.contains_key("/project/lib/util"));
    assert_eq!(module.imported_files["/project/lib/util"].path, "/project/lib/util.ts");
}

#[test]
fn test_side_effect_import() {
    let fs = project(&[("main.ts", "import \"./setup\"\n"), ("setup.ts", "let ready = true\n")]);
    let module = load(&fs, "main.ts");
    assert!(module.entry_file.imports[0].is_side_effect());
    assert!(module.imported_files.contains_key("/project/setup"));
}

#[test]
fn test_type_definition_import_is_dropped() {
    let fs = project(&[
        ("main.ts", "import * as native from \"./native\"\nimport \"./other\"\n"),
        ("native.d.ts", "declare global { const VERSION = 1 }\n"),
        ("native.ts", "this would not parse\n"),
        ("other.ts", "let a = 1\n"),
    ]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.entry_file.imports.len(), 1);
    assert_eq!(module.entry_file.imports[0].path, "./other");
    assert_eq!(fs.read_count("native.d.ts"), 0);
    assert_eq!(fs.read_count("native.ts"), 0);
}

#[test]
fn test_dotted_module_name_keeps_its_stem() {
    let fs = project(&[
        ("main.ts", "import * as gen from \"./schema.d\"\n"),
        ("schema.d.ts", "export let version = 1\n"),
    ]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.entry_file.imports.len(), 1);
    assert_eq!(module.entry_file.imports[0].resolved_path, "/project/schema.d");
    assert_eq!(module.imported_files["/project/schema.d"].path, "/project/schema.d.ts");
}

#[test]
fn test_import_through_search_path() {
    let fs = project(&[
        ("tsconfig.json", "{\n  // aliases\n  \"compilerOptions\": { \"paths\": { \"*\": [\"lib/*\", \"*\"] } }\n}\n"),
        ("src/main.ts", "import * as strings from \"strings\"\n"),
        ("lib/strings.ts", "export function trim(s) { return s }\n"),
    ]);
    let module = load(&fs, "src/main.ts");
    assert_eq!(module.base_path, "/project");
    assert!(module.imported_files.contains_key("/project/lib/strings"));
}

#[test]
fn test_import_not_found() {
    let fs = project(&[("main.ts", "import * as m from \"./missing\"\n")]);
    let err = parse(&fs, "main.ts", ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImportResolution);
    assert_eq!(err.position, Position::new(1, 1));
    assert!(err.message.contains("./missing"));
}

#[test]
fn test_error_in_import_is_wrapped() {
    let fs = project(&[
        ("main.ts", "\nimport \"./bad\"\n"),
        ("bad.ts", "let = 1\n"),
    ]);
    let err = parse(&fs, "main.ts", ParserOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImportResolution);
    assert_eq!(err.position, Position::new(2, 1));
    assert!(err.message.starts_with("Import error './bad'"));
}

#[test]
fn test_optimizations_reach_imported_files() {
    let fs = project(&[
        ("main.ts", "import * as r from \"./rec\"\n"),
        ("rec.ts", "function down(n) {\n return down(n - 1)\n}\n"),
    ]);
    let module = parse(&fs, "main.ts", ParserOptions { optimizations: true }).unwrap();
    let Stmt::FuncDecl(f) = &module.imported_files["/project/rec"].statements[0] else {
        panic!("expected function");
    };
    assert!(matches!(f.body.statements.last(), Some(Stmt::TailCall(_))));
}

// ============================================================================
// De-duplication
// ============================================================================

#[test]
fn test_shared_module_read_once() {
    let fs = project(&[
        ("main.ts", "import * as x from \"./x\"\nimport * as y from \"./y\"\n"),
        ("x.ts", "import * as shared from \"./shared\"\n"),
        ("y.ts", "import * as shared from \"./shared\"\n"),
        ("shared.ts", "export const S = 1\n"),
    ]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.imported_files.len(), 3);
    assert_eq!(fs.read_count("shared.ts"), 1);
}

#[test]
fn test_distinct_paths_to_same_file_read_once() {
    let fs = project(&[
        ("main.ts", "import * as a1 from \"./lib/a\"\nimport * as a2 from \"lib/../lib/a\"\n"),
        ("lib/a.ts", "export let a = 1\n"),
    ]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.imported_files.len(), 1);
    assert_eq!(fs.read_count("lib/a.ts"), 1);
    let imports = &module.entry_file.imports;
    assert_eq!(imports[0].resolved_path, imports[1].resolved_path);
}

#[test]
fn test_side_effect_import_read_once() {
    let fs = project(&[
        ("main.ts", "import \"./polyfill\"\nimport * as x from \"./x\"\n"),
        ("x.ts", "import \"./polyfill\"\n"),
        ("polyfill.ts", "let installed = true\n"),
    ]);
    load(&fs, "main.ts");
    assert_eq!(fs.read_count("polyfill.ts"), 1);
}

#[test]
fn test_import_cycle_terminates() {
    let fs = project(&[
        ("main.ts", "import * as a from \"./a\"\n"),
        ("a.ts", "import * as b from \"./b\"\n"),
        ("b.ts", "import * as a from \"./a\"\n"),
    ]);
    let module = load(&fs, "main.ts");
    assert_eq!(module.imported_files.len(), 2);
    assert_eq!(fs.read_count("a.ts"), 1);
    assert_eq!(fs.read_count("b.ts"), 1);
    assert_eq!(module.imported_files["/project/b"].imports[0].resolved_path, "/project/a");
}

#[test]
fn test_side_effect_cycle_terminates() {
    let fs = project(&[
        ("main.ts", "import \"./a\"\n"),
        ("a.ts", "import \"./b\"\n"),
        ("b.ts", "import \"./a\"\n"),
    ]);
    load(&fs, "main.ts");
    assert_eq!(fs.read_count("a.ts"), 1);
}

// ============================================================================
// Globals
// ============================================================================

#[test]
fn test_global_declarations_in_order() {
    let fs = project(&[
        ("main.ts", "import \"./z\"\nimport \"./b\"\ndeclare global { const MAIN = 1 }\n"),
        ("z.ts", "declare global { const Z = 1 }\n"),
        ("b.ts", "declare global { const B = 1 }\n"),
    ]);
    let module = load(&fs, "main.ts");
    let names: Vec<&str> = module
        .global_declarations()
        .into_iter()
        .map(|stmt| match stmt {
            Stmt::VarDecl(v) => v.name.as_str(),
            other => panic!("unexpected global {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["MAIN", "B", "Z"]);
}

// ============================================================================
// Source text with a file system
// ============================================================================

#[test]
fn test_parse_source_resolves_from_file_dir() {
    let fs = project(&[("scripts/helper.ts", "export let h = 1\n")]);
    let module = parse_source(&fs, "import * as h from \"./helper\"\n", "scripts/run.ts", ParserOptions::default()).unwrap();
    assert_eq!(module.entry_file.path, "/project/scripts/run.ts");
    assert!(module.imported_files.contains_key("/project/scripts/helper"));
}

// ============================================================================
// Hash
// ============================================================================

#[test]
fn test_hash_is_stable() {
    let fs = project(&[("main.ts", "import \"./a\"\n"), ("a.ts", "let a = 1\n")]);
    assert_eq!(hash(&fs, "main.ts").unwrap(), hash(&fs, "main.ts").unwrap());
}

#[test]
fn test_hash_covers_imports() {
    let before = project(&[("main.ts", "import \"./a\"\n"), ("a.ts", "let a = 1\n")]);
    let after = project(&[("main.ts", "import \"./a\"\n"), ("a.ts", "let a = 2\n")]);
    assert_ne!(hash(&before, "main.ts").unwrap(), hash(&after, "main.ts").unwrap());
}

#[test]
fn test_hash_ignores_unrelated_files() {
    let plain = project(&[("main.ts", "let a = 1\n")]);
    let extra = project(&[("main.ts", "let a = 1\n"), ("other.ts", "let b = 2\n")]);
    assert_eq!(hash(&plain, "main.ts").unwrap(), hash(&extra, "main.ts").unwrap());
}

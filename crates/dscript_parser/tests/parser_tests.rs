//! Integration tests for dscript_parser.

use dscript_ast::module::File;
use dscript_ast::node::*;
use dscript_core::text::Position;
use dscript_diagnostics::{ErrorKind, ParseError};
use dscript_parser::{parse_expression, parse_file, ParserOptions};

fn parse(source: &str) -> File {
    match parse_file(source, "test.ts", ParserOptions::default()) {
        Ok(file) => file,
        Err(err) => panic!("unexpected parse error: {err}"),
    }
}

fn parse_optimized(source: &str) -> File {
    match parse_file(source, "test.ts", ParserOptions { optimizations: true }) {
        Ok(file) => file,
        Err(err) => panic!("unexpected parse error: {err}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse_file(source, "test.ts", ParserOptions::default()) {
        Ok(file) => panic!("expected an error, parsed {} statements", file.statements.len()),
        Err(err) => err,
    }
}

fn first(file: &File) -> &Stmt {
    file.statements.first().expect("file has no statements")
}

fn function(file: &File) -> &FuncDeclStmt {
    match first(file) {
        Stmt::FuncDecl(f) => f,
        other => panic!("expected function, got {other:?}"),
    }
}

fn class(file: &File) -> &ClassDeclStmt {
    match first(file) {
        Stmt::ClassDecl(c) => c,
        other => panic!("expected class, got {other:?}"),
    }
}

fn switch(stmt: &Stmt) -> &SwitchStmt {
    match stmt {
        Stmt::Switch(s) => s,
        other => panic!("expected switch, got {other:?}"),
    }
}

/// The initializer of the first statement, which must be a `let`.
fn initializer(file: &File) -> &Expr {
    match first(file) {
        Stmt::VarDecl(v) => &v.value,
        other => panic!("expected variable, got {other:?}"),
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_attribute_directly_above_function() {
    let file = parse("\n// [attribute1]\nfunction bar() {\n\n}\n");
    assert_eq!(function(&file).attributes, vec!["attribute1"]);
    assert!(file.attributes.is_empty());
}

#[test]
fn test_attribute_run_after_gap() {
    let file = parse(
        "// [attribute ignore]\n\n// [attribute1]\n// [attribute2 foo]\nfunction bar() {\n}\n",
    );
    assert_eq!(file.attributes, vec!["attribute ignore"]);
    assert_eq!(function(&file).attributes, vec!["attribute1", "attribute2 foo"]);
}

#[test]
fn test_attribute_on_class() {
    let file = parse("// [test]\nexport class Foo {\n}\n");
    let c = class(&file);
    assert!(c.exported);
    assert_eq!(c.attributes, vec!["test"]);
}

#[test]
fn test_attribute_separated_from_declaration_belongs_to_file() {
    let file = parse("// [header]\n\nfunction bar() {}\n");
    assert_eq!(file.attributes, vec!["header"]);
    assert!(function(&file).attributes.is_empty());
}

#[test]
fn test_attribute_header_before_statement() {
    let file = parse("// [header]\nlet a = 1\n");
    assert_eq!(file.attributes, vec!["header"]);
}

#[test]
fn test_attribute_above_statement_is_invalid() {
    let err = parse_err("let a = 1\n// [bad]\nlet b = 2\n");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.position, Position::new(2, 1));
}

#[test]
fn test_comments_are_collected() {
    let file = parse("// hello\nlet a = 1 /* inline */\n");
    assert_eq!(file.comments.len(), 2);
    assert!(!file.comments[0].multi_line);
    assert!(file.comments[1].multi_line);
}

// ============================================================================
// Selectors and chains
// ============================================================================

#[test]
fn test_selector_chain_marks_outermost_link() {
    let file = parse("let a = b.c.d");
    let Expr::Selector(outer) = initializer(&file) else {
        panic!("expected selector");
    };
    assert!(outer.first_in_chain);
    assert_eq!(outer.member.name, "d");
    let Expr::Selector(inner) = outer.x.as_ref() else {
        panic!("expected inner selector");
    };
    assert!(!inner.first_in_chain);
}

#[test]
fn test_optional_call_is_first_in_chain() {
    let file = parse("let a = b?.()");
    let Expr::Call(call) = initializer(&file) else {
        panic!("expected call");
    };
    assert!(call.optional);
    assert!(call.first_in_chain);
}

#[test]
fn test_optional_index_is_first_in_chain() {
    let file = parse("let a = b?.[0]");
    let Expr::Index(index) = initializer(&file) else {
        panic!("expected index");
    };
    assert!(index.optional);
    assert!(index.first_in_chain);
}

#[test]
fn test_plain_identifier_is_not_a_chain() {
    let file = parse("let a = b");
    assert!(!initializer(&file).is_first_in_chain());
}

// ============================================================================
// Switch
// ============================================================================

#[test]
fn test_fallthrough_into_case_allowed_when_empty() {
    let file = parse("switch (a) {\n case 1:\n case 2:\n foo()\n break\n default:\n bar()\n}\n");
    let s = switch(first(&file));
    assert_eq!(s.blocks.len(), 2);
    assert!(s.blocks[0].statements.is_empty());
    assert!(s.default.is_some());
}

#[test]
fn test_fallthrough_from_non_empty_case() {
    let err = parse_err("switch (a) {\n case 1:\n foo()\n case 2:\n break\n}\n");
    assert_eq!(err.kind, ErrorKind::Fallthrough);
    assert_eq!(err.position, Position::new(2, 2));
}

#[test]
fn test_fallthrough_through_empty_default() {
    let err = parse_err("switch (a) {\n case 1:\n foo()\n default:\n case 2:\n break\n}\n");
    assert_eq!(err.kind, ErrorKind::Fallthrough);
}

#[test]
fn test_last_case_may_fall_out() {
    let file = parse("switch (a) {\n case 1:\n return\n case 2:\n foo()\n}\n");
    assert_eq!(switch(first(&file)).blocks.len(), 2);
}

#[test]
fn test_default_in_the_middle() {
    let file = parse("switch (x) {\n case 1:\n break\n default:\n break\n case 2:\n y()\n}\n");
    let s = switch(first(&file));
    assert_eq!(s.blocks.len(), 2);
    assert!(s.default.is_some());
}

#[test]
fn test_duplicate_case() {
    let err = parse_err("switch (x) {\n case 1:\n break\n case 1:\n break\n}\n");
    assert_eq!(err.kind, ErrorKind::DuplicateCase);
    assert!(err.message.contains('1'));
    assert_eq!(err.position, Position::new(4, 2));
}

#[test]
fn test_same_text_different_kind_is_not_duplicate() {
    let file = parse("switch (x) {\n case 1:\n break\n case \"1\":\n break\n}\n");
    assert_eq!(switch(first(&file)).blocks.len(), 2);
}

#[test]
fn test_duplicate_default() {
    let err = parse_err("switch (x) {\n default:\n break\n default:\n break\n}\n");
    assert_eq!(err.kind, ErrorKind::DuplicateCase);
    assert!(err.message.contains("default"));
}

#[test]
fn test_unclosed_case() {
    let err = parse_err("switch (x) {\n case 1:\n foo()\n");
    assert_eq!(err.message, "Unclosed case");
}

// ============================================================================
// Type erasure
// ============================================================================

#[test]
fn test_index_signature_type_alias() {
    let file = parse("export type V = { [key: string]: X }\n");
    assert!(file.statements.is_empty());
}

#[test]
fn test_union_with_array_type_alias() {
    let file = parse("export type StringOrPlurals = string | string[]\n");
    assert!(file.statements.is_empty());
}

#[test]
fn test_union_with_generic_type_alias() {
    let file = parse("export type Translation = StringOrPlurals | Map<StringOrPlurals>\nlet a = 1\n");
    assert_eq!(file.statements.len(), 1);
}

#[test]
fn test_lambda_type_with_optional_parameter() {
    let file = parse("type foo = (arg?: any) => void\n");
    assert!(file.statements.is_empty());
}

#[test]
fn test_interface_is_erased() {
    let file = parse("interface Foo {\n x: number\n y?: string\n bar(a: number): void\n}\nlet a = 1\n");
    assert_eq!(file.statements.len(), 1);
}

#[test]
fn test_nested_generic_annotation() {
    let file = parse("let a: Array<Array<number>> = []\n");
    assert!(matches!(initializer(&file), Expr::ArrayLiteral(a) if a.elements.is_empty()));
}

#[test]
fn test_type_assertion_and_as_are_erased() {
    let file = parse("let a = <number>b as any\n");
    assert!(matches!(initializer(&file), Expr::Identifier(i) if i.name == "b"));
}

#[test]
fn test_generic_call_vs_less_than() {
    let call = parse_expression("foo<T>()").unwrap();
    assert!(matches!(call, Expr::Call(ref c) if matches!(c.callee.as_ref(), Expr::Identifier(i) if i.name == "foo")));

    let compare = parse_expression("foo < T").unwrap();
    assert!(matches!(compare, Expr::Binary(ref b) if b.op == BinaryOperator::Lt));
}

#[test]
fn test_nested_generic_call_arguments() {
    let call = parse_expression("foo<Map<string, Array<number>>>()").unwrap();
    assert!(matches!(call, Expr::Call(ref c) if c.args.is_empty()));
}

#[test]
fn test_long_comparison_chain_stays_linear() {
    let chain = format!("a{}", "<a".repeat(2000));
    let start = std::time::Instant::now();
    assert!(matches!(parse_expression(&chain).unwrap(), Expr::Binary(ref b) if b.op == BinaryOperator::Lt));

    let call = format!("f{}()", "<a".repeat(2000));
    assert!(parse_expression(&call).is_ok());
    assert!(start.elapsed() < std::time::Duration::from_secs(5));
}

#[test]
fn test_shift_right_is_recombined() {
    let file = parse("let a = b >> 2\n");
    assert!(matches!(initializer(&file), Expr::Binary(b) if b.op == BinaryOperator::Shr));
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn test_class_private_accessors() {
    let file = parse("class foo {\n private get bar() {\n }\n private set bar2(v) {\n }\n}\n");
    let c = class(&file);
    assert_eq!(c.getters.len(), 1);
    assert_eq!(c.getters[0].name, "bar");
    assert_eq!(c.setters.len(), 1);
    assert_eq!(c.setters[0].name, "bar2");
}

#[test]
fn test_class_method_named_get() {
    let file = parse("class foo {\n get() {\n }\n set bar(v) {\n }\n}\n");
    let c = class(&file);
    assert_eq!(c.functions.len(), 1);
    assert_eq!(c.functions[0].name, "get");
    assert_eq!(c.setters.len(), 1);
}

#[test]
fn test_class_fields() {
    let file = parse(
        "class Point implements Shape, Named {\n x: number = 0;\n private y = 1;\n constructor(x: number) {\n this.x = x\n }\n}\n",
    );
    let c = class(&file);
    assert_eq!(c.fields.len(), 2);
    assert!(c.fields[0].exported);
    assert!(!c.fields[1].exported);
    assert_eq!(c.functions.len(), 1);
    assert_eq!(c.functions[0].name, "constructor");
}

#[test]
fn test_generic_method() {
    let file = parse("class List {\n map<U>(f: (x: T) => U): U[] {\n return []\n }\n}\n");
    assert_eq!(class(&file).functions[0].arguments.fields.len(), 1);
}

#[test]
fn test_unclosed_class() {
    let err = parse_err("class A {\n x = 1\n");
    assert_eq!(err.message, "Unclosed class");
}

// ============================================================================
// Functions and arguments
// ============================================================================

#[test]
fn test_variadic_lambda_argument() {
    let file = parse("let foo: any\nfoo.bar((...args: any[]) => { })\n");
    assert_eq!(file.statements.len(), 2);
    let Stmt::Call(call) = &file.statements[1] else {
        panic!("expected call statement");
    };
    let Expr::FuncLiteral(lambda) = &call.args[0] else {
        panic!("expected lambda");
    };
    assert!(lambda.arguments.variadic);
    assert_eq!(lambda.arguments.fields[0].name, "args");
}

#[test]
fn test_arrow_expression_body_returns() {
    let file = parse("let f = x => x * 2\n");
    let Expr::FuncLiteral(lambda) = initializer(&file) else {
        panic!("expected lambda");
    };
    assert!(matches!(&lambda.body.statements[0], Stmt::Return(r) if r.value.is_some()));
}

#[test]
fn test_parenthesized_identifier_is_not_a_lambda() {
    let file = parse("let p = (a) + 1\n");
    assert!(matches!(initializer(&file), Expr::Binary(_)));

    let file = parse("let h = (a) => a\n");
    assert!(matches!(initializer(&file), Expr::FuncLiteral(_)));
}

#[test]
fn test_nested_function_declaration() {
    let file = parse("function outer() {\n function inner(x) {\n return x\n }\n return inner(1)\n}\n");
    let outer = function(&file);
    assert!(matches!(&outer.body.statements[0], Stmt::FuncDecl(inner) if inner.name == "inner" && !inner.exported));
}

#[test]
fn test_optional_parameter() {
    let file = parse("function f(a: number, b?: string) {}\n");
    let args = &function(&file).arguments;
    assert!(!args.fields[0].optional);
    assert!(args.fields[1].optional);
}

#[test]
fn test_parameter_after_variadic() {
    let err = parse_err("function f(...a, b) {}\n");
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.position, Position::new(1, 18));
}

#[test]
fn test_spread_must_be_last() {
    let file = parse("f(a, ...rest)\n");
    assert!(matches!(first(&file), Stmt::Call(c) if c.spread));

    let err = parse_err("f(...rest, a)\n");
    assert_eq!(err.position, Position::new(1, 3));
}

#[test]
fn test_prototype_method() {
    let file = parse("Foo.prototype.bar = function (a) {\n return a\n}\n");
    let f = function(&file);
    assert_eq!(f.name, "bar");
    assert_eq!(f.receiver_type.as_deref(), Some("Foo"));
    assert_eq!(f.position, Position::new(1, 5));
}

// ============================================================================
// Tail calls
// ============================================================================

#[test]
fn test_tail_call_rewrite() {
    let file = parse_optimized("function f(n) {\n if (n == 0) {\n return 0\n }\n return f(n - 1)\n}\n");
    assert!(matches!(function(&file).body.statements.last(), Some(Stmt::TailCall(_))));
}

#[test]
fn test_bare_tail_call_rewrite() {
    let file = parse_optimized("function loop() {\n loop()\n}\n");
    assert!(matches!(function(&file).body.statements.last(), Some(Stmt::TailCall(_))));
}

#[test]
fn test_no_tail_call_without_optimizations() {
    let file = parse("function f(n) {\n return f(n - 1)\n}\n");
    assert!(matches!(function(&file).body.statements.last(), Some(Stmt::Return(_))));
}

#[test]
fn test_tail_call_ignores_other_callees() {
    let file = parse_optimized("function f() {\n return obj.f()\n}\n");
    assert!(matches!(function(&file).body.statements.last(), Some(Stmt::Return(_))));
}

#[test]
fn test_tail_call_matches_shadowing_binding_by_name() {
    let file = parse_optimized("function f() {\n let f = g\n return f()\n}\n");
    assert!(matches!(function(&file).body.statements.last(), Some(Stmt::TailCall(_))));
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn test_enum_implicit_numbering() {
    let file = parse("enum Direction {\n Up,\n Down\n}\n");
    let Stmt::EnumDecl(e) = first(&file) else {
        panic!("expected enum");
    };
    assert_eq!(e.values[0].value, "0");
    assert_eq!(e.values[1].value, "1");
}

#[test]
fn test_enum_counter_starts_at_first_explicit_value() {
    let file = parse("enum E { A = 5, B, C }\n");
    let Stmt::EnumDecl(e) = first(&file) else {
        panic!("expected enum");
    };
    let values: Vec<&str> = e.values.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, vec!["5", "6", "7"]);
}

#[test]
fn test_enum_negative_value() {
    let file = parse("export enum Priority {\n high = 2,\n low = -1,\n}\n");
    let Stmt::EnumDecl(e) = first(&file) else {
        panic!("expected enum");
    };
    assert!(e.exported);
    assert_eq!(e.values[1].value, "-1");
}

#[test]
fn test_enum_string_value() {
    let file = parse("enum S { A = \"a\" }\n");
    let Stmt::EnumDecl(e) = first(&file) else {
        panic!("expected enum");
    };
    assert_eq!(e.values[0].kind, EnumValueKind::String);
    assert_eq!(e.values[0].value, "a");
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_for_forms() {
    let file = parse("for (let i = 0, j = 1; i < 10; i++) {}\nfor (const x of items) {}\nfor (let k in obj) {}\nfor (;;) {}\n");
    assert_eq!(file.statements.len(), 4);
    let kinds: Vec<&ForKind> = file
        .statements
        .iter()
        .map(|s| match s {
            Stmt::For(f) => &f.kind,
            other => panic!("expected for, got {other:?}"),
        })
        .collect();
    assert!(matches!(kinds[0], ForKind::Classic { declarations, condition: Some(_), step: Some(_) } if declarations.len() == 2));
    assert!(matches!(kinds[1], ForKind::Of { binding, .. } if binding.name == "x"));
    assert!(matches!(kinds[2], ForKind::In { binding, .. } if binding.name == "k"));
    assert!(matches!(kinds[3], ForKind::Classic { declarations, condition: None, step: None } if declarations.is_empty()));
}

#[test]
fn test_label_and_break() {
    let file = parse("outer: for (;;) {\n break outer\n}\n");
    let Stmt::Label(label) = first(&file) else {
        panic!("expected label");
    };
    let Stmt::For(f) = label.body.as_ref() else {
        panic!("expected for");
    };
    assert!(matches!(&f.body.statements[0], Stmt::Break(b) if b.label.as_deref() == Some("outer")));
}

#[test]
fn test_label_on_if_is_invalid() {
    let err = parse_err("l: if (x) {}\n");
    assert!(err.message.starts_with("Label can only be used"));
}

#[test]
fn test_compound_assignment() {
    let file = parse("x += 2\n");
    let Stmt::Assign(assign) = first(&file) else {
        panic!("expected assignment");
    };
    let Expr::Binary(b) = &assign.value else {
        panic!("expected binary value");
    };
    assert_eq!(b.op, BinaryOperator::Add);
    assert_eq!(*b.left, assign.left);
}

#[test]
fn test_return_value_must_be_on_same_line() {
    let file = parse("function f() {\n return\n g()\n}\n");
    let body = &function(&file).body.statements;
    assert_eq!(body.len(), 2);
    assert!(matches!(&body[0], Stmt::Return(r) if r.value.is_none()));
}

#[test]
fn test_if_else_chain() {
    let file = parse("if (a) {} else if (b) {} else if (c) {} else {}\n");
    let Stmt::If(s) = first(&file) else {
        panic!("expected if");
    };
    assert_eq!(s.blocks.len(), 3);
    assert!(s.else_block.is_some());
}

#[test]
fn test_try_catch_finally() {
    let file = parse("try { a() } catch (e: any) { b() } finally { c() }\n");
    let Stmt::Try(t) = first(&file) else {
        panic!("expected try");
    };
    assert_eq!(t.catch.as_ref().and_then(|c| c.binding.as_ref()).map(|b| b.name.as_str()), Some("e"));
    assert!(t.finally.is_some());
}

#[test]
fn test_delete() {
    let file = parse("delete a.b\n");
    assert!(matches!(first(&file), Stmt::Delete(d) if d.object == "a" && d.property == "b"));

    let err = parse_err("delete a\n");
    assert_eq!(err.position, Position::new(1, 1));
}

#[test]
fn test_new_statement_needs_call() {
    let file = parse("new Foo().run()\n");
    assert!(matches!(first(&file), Stmt::Call(_)));

    let err = parse_err("new Foo()\n");
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn test_map_literal_keys() {
    let file = parse("let m = { a: 1, \"b\": 2, default: 3, }\n");
    let Expr::MapLiteral(map) = initializer(&file) else {
        panic!("expected map literal");
    };
    let keys: Vec<&str> = map.entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "default"]);
}

#[test]
fn test_expression_is_not_a_statement() {
    let err = parse_err("a.b\n");
    assert_eq!(err.kind, ErrorKind::Syntax);
}

// ============================================================================
// Imports, exports and declarations
// ============================================================================

#[test]
fn test_imports() {
    let file = parse("import * as m from \"./m\"\nimport \"./side\"\nlet a = m.x\n");
    assert_eq!(file.imports.len(), 2);
    assert_eq!(file.imports[0].alias, "m");
    assert!(file.imports[1].is_side_effect());
    assert!(file.import("m").is_some());
}

#[test]
fn test_import_after_statements() {
    let err = parse_err("let a = 1\nimport \"x\"\n");
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn test_unsupported_features() {
    for source in [
        "import { a } from \"p\"\n",
        "namespace X {}\n",
        "export namespace X {}\n",
        "declare namespace X {}\n",
        "let a = typeof x\n",
    ] {
        assert_eq!(parse_err(source).kind, ErrorKind::UnsupportedFeature, "{source}");
    }
}

#[test]
fn test_declare_global() {
    let file = parse(
        "declare global {\n enum Color { Red }\n const MAX = 10;\n interface Window { x: number }\n function alert(msg: string): void;\n let y: number;\n type T = string\n}\n",
    );
    assert!(file.statements.is_empty());
    assert_eq!(file.global_declarations.len(), 2);
    assert!(matches!(file.global_declarations[0], Stmt::EnumDecl(_)));
    assert!(matches!(file.global_declarations[1], Stmt::VarDecl(ref v) if v.is_const));
}

#[test]
fn test_declare_requires_global() {
    let err = parse_err("declare foo {}\n");
    assert_eq!(err.message, "Expected global");
}

#[test]
fn test_exports() {
    let file = parse("export const A = 1\nexport function f() {}\nexport interface I {}\n");
    assert_eq!(file.statements.len(), 2);
    assert!(matches!(&file.statements[0], Stmt::VarDecl(v) if v.exported && v.is_const));
    assert!(matches!(&file.statements[1], Stmt::FuncDecl(f) if f.exported));
}

// ============================================================================
// Expressions and errors
// ============================================================================

#[test]
fn test_standalone_expression() {
    let expr = parse_expression("a + b * c").unwrap();
    let Expr::Binary(add) = expr else {
        panic!("expected binary");
    };
    assert_eq!(add.op, BinaryOperator::Add);
    assert!(matches!(add.right.as_ref(), Expr::Binary(m) if m.op == BinaryOperator::Mul));
}

#[test]
fn test_standalone_expression_rejects_trailing_tokens() {
    assert!(parse_expression("a b").is_err());
}

#[test]
fn test_error_display() {
    let err = parse_err("let = 1\n");
    assert_eq!(err.to_string(), format!("{}\n -> 1:5", err.message));
}

#[test]
fn test_unclosed_block() {
    let err = parse_err("function f() {\n let a = 1\n");
    assert_eq!(err.message, "Unclosed block");
    assert_eq!(err.position, Position::new(1, 14));
}

#[test]
fn test_deep_nesting_is_an_error() {
    let source = format!("let a = {}1", "!".repeat(1000));
    let err = parse_err(&source);
    assert_eq!(err.message, "Maximum nesting depth exceeded");
}

//! Object model rewrites exercised on single expressions.

use swc_ecma_ast as ast;
use tsphp_diagnostics::{DiagnosticCode, Diagnostics, SourceCache};
use tsphp_emitter::features::ObjectFeature;
use tsphp_emitter::{
    default_features, EmitHint, EmitOptions, Feature, PhpPrinter, SourceRef,
};
use tsphp_parser::{parse_typescript_with_cache, ParseResult};
use tsphp_types::ClassIndex;

fn parse(source: &str) -> ParseResult {
    let mut cache = SourceCache::new();
    let mut errors = Diagnostics::new();
    parse_typescript_with_cache(source, "test.ts", &mut cache, &mut errors)
        .expect("test source should parse")
}

fn last_expr(module: &ast::Module) -> &ast::Expr {
    match module.body.last() {
        Some(ast::ModuleItem::Stmt(ast::Stmt::Expr(stmt))) => &stmt.expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

struct Outcome {
    handled: bool,
    php: String,
    diagnostics: Diagnostics,
}

/// Run the object feature on the last expression statement of `source`.
/// `obj` and `this` are class instances when `instance` is set.
fn run_with(source: &str, hint: EmitHint, instance: bool, options: &EmitOptions) -> Outcome {
    let parsed = parse(source);
    let expr = last_expr(&parsed.module);
    let classifier = move |e: &ast::Expr| {
        instance
            && match e {
                ast::Expr::Ident(ident) => &*ident.sym == "obj",
                ast::Expr::This(_) => true,
                _ => false,
            }
    };
    let features = default_features();
    let file = SourceRef::new(parsed.file_id, parsed.start_pos);
    let mut printer = PhpPrinter::new(source, file, options, &classifier, &features);
    let handled = ObjectFeature.emit(hint, expr, &mut printer);
    let (php, diagnostics) = printer.finish();
    Outcome {
        handled,
        php,
        diagnostics,
    }
}

fn run(source: &str, hint: EmitHint, instance: bool) -> Outcome {
    run_with(source, hint, instance, &EmitOptions::default())
}

#[test]
fn test_assign_merges_all_arguments() {
    let out = run("Object.assign({}, defaults, overrides);", EmitHint::Expression, false);
    assert!(out.handled);
    assert_eq!(out.php, "\\array_merge([], $defaults, $overrides)");
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_keys_and_values() {
    let keys = run("Object.keys(obj);", EmitHint::Expression, false);
    assert!(keys.handled);
    assert_eq!(keys.php, "\\array_keys($obj)");

    let values = run("Object.values(obj);", EmitHint::Expression, false);
    assert!(values.handled);
    assert_eq!(values.php, "\\array_values($obj)");
}

#[test]
fn test_keys_ignores_extra_arguments() {
    let out = run("Object.keys(obj, 1);", EmitHint::Expression, false);
    assert_eq!(out.php, "\\array_keys($obj)");
}

#[test]
fn test_freeze_passes_argument_through() {
    let out = run("Object.freeze(config);", EmitHint::Expression, false);
    assert!(out.handled);
    assert_eq!(out.php, "$config");

    let literal = run("Object.freeze({ mode: \"dev\" });", EmitHint::Expression, false);
    assert_eq!(literal.php, "[\"mode\" => \"dev\"]");
}

#[test]
fn test_freeze_rewrites_its_argument() {
    let out = run("Object.freeze(\"k\" in o);", EmitHint::Expression, false);
    assert!(out.handled);
    assert_eq!(out.php, "array_key_exists(\"k\", $o)");
}

#[test]
fn test_freeze_without_argument() {
    let out = run("Object.freeze();", EmitHint::Expression, false);
    assert!(out.handled);
    assert_eq!(out.php, "null");
}

#[test]
fn test_nested_static_calls() {
    let out = run(
        "Object.keys(Object.assign({}, a, b));",
        EmitHint::Expression,
        false,
    );
    assert_eq!(out.php, "\\array_keys(\\array_merge([], $a, $b))");
}

#[test]
fn test_helper_namespace_prefix() {
    let options = EmitOptions {
        helper_namespace: "\\Runtime\\".to_string(),
        ..EmitOptions::default()
    };
    let out = run_with("Object.values(obj);", EmitHint::Expression, false, &options);
    assert_eq!(out.php, "\\Runtime\\array_values($obj)");
}

#[test]
fn test_unknown_static_is_reported() {
    let out = run("Object.entries(x);", EmitHint::Expression, false);
    assert!(!out.handled);
    assert!(out.php.is_empty());
    assert_eq!(out.diagnostics.len(), 1);
    let diagnostic = out.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.code, DiagnosticCode::UnsupportedObjectMethod);
    assert!(diagnostic.message.contains("Object.entries"));
    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.span.start, 0);
}

#[test]
fn test_statement_position_static_call_is_not_rewritten() {
    for source in [
        "Object.assign(target, source);",
        "Object.keys(obj);",
        "Object.entries(obj);",
    ] {
        let out = run(source, EmitHint::Unspecified, false);
        assert!(!out.handled, "{source}");
        assert!(out.php.is_empty(), "{source}");
        assert!(out.diagnostics.is_empty(), "{source}");
    }
}

#[test]
fn test_prototype_reported_for_any_hint() {
    for hint in [EmitHint::Expression, EmitHint::Unspecified] {
        let out = run("Foo.prototype;", hint, false);
        assert!(!out.handled);
        assert!(out.php.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        let diagnostic = out.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.code, DiagnosticCode::PrototypeAccess);
        assert_eq!(diagnostic.message, "Foo.prototype is not supported.");
    }
}

#[test]
fn test_in_on_class_instance() {
    let out = run("\"k\" in obj;", EmitHint::Expression, true);
    assert!(out.handled);
    assert_eq!(out.php, "property_exists($obj, \"k\")");
}

#[test]
fn test_in_on_plain_structure() {
    let out = run("\"k\" in obj;", EmitHint::Expression, false);
    assert!(out.handled);
    assert_eq!(out.php, "array_key_exists(\"k\", $obj)");
}

#[test]
fn test_in_needs_value_position() {
    let out = run("\"k\" in obj;", EmitHint::Unspecified, false);
    assert!(!out.handled);
    assert!(out.php.is_empty());
}

#[test]
fn test_has_own_property_matches_in() {
    for instance in [true, false] {
        let method = run("obj.hasOwnProperty(\"k\");", EmitHint::Expression, instance);
        let operator = run("\"k\" in obj;", EmitHint::Expression, instance);
        assert!(method.handled);
        assert_eq!(method.php, operator.php);
    }
}

#[test]
fn test_has_own_property_in_statement_position() {
    let out = run("obj.hasOwnProperty(key);", EmitHint::Unspecified, false);
    assert!(out.handled);
    assert_eq!(out.php, "array_key_exists($key, $obj)");
}

#[test]
fn test_has_own_property_without_argument() {
    let out = run("obj.hasOwnProperty();", EmitHint::Expression, false);
    assert!(out.handled);
    assert_eq!(out.php, "array_key_exists(null, $obj)");
}

#[test]
fn test_in_with_this_receiver() {
    let out = run("name in this;", EmitHint::Expression, true);
    assert_eq!(out.php, "property_exists($this, $name)");
}

#[test]
fn test_unrelated_expression_is_not_handled() {
    for source in ["a + b;", "foo(1);", "obj.keys(x);", "Objects.keys(x);"] {
        let out = run(source, EmitHint::Expression, false);
        assert!(!out.handled, "{source}");
        assert!(out.php.is_empty(), "{source}");
        assert!(out.diagnostics.is_empty(), "{source}");
    }
}

#[test]
fn test_class_index_classifier() {
    let source = "class User { name = \"\"; }\nconst user = new User();\nconst row = { id: 1 };\n\"name\" in user;";
    let parsed = parse(source);
    let classifier = ClassIndex::from_module(&parsed.module);
    let features = default_features();
    let options = EmitOptions::default();
    let file = SourceRef::new(parsed.file_id, parsed.start_pos);

    let mut printer = PhpPrinter::new(source, file, &options, &classifier, &features);
    let handled = ObjectFeature.emit(EmitHint::Expression, last_expr(&parsed.module), &mut printer);
    assert!(handled);
    assert_eq!(printer.output(), "property_exists($user, \"name\")");
}

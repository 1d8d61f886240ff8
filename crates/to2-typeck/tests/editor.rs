//! Integration tests for the editor side channels: semantic tokens, inlay
//! hints, hover text, go-to-definition and position queries.

mod common;

use common::*;
use serde_json::json;
use to2_common::{InputPosition, InputRange};
use to2_typeck::ast::*;
use to2_typeck::diagnostics::DiagnosticOptions;
use to2_typeck::operator::Operator;
use to2_typeck::side_table::{SemanticTokenModifier as Mod, SemanticTokenType as Token};
use to2_typeck::ValidationResult;

fn token(result: &ValidationResult, ident: &Ident) -> (Token, Vec<Mod>) {
    result
        .semantic_tokens
        .iter()
        .find(|t| t.range == ident.range)
        .map(|t| (t.token_type, t.modifiers.clone()))
        .unwrap_or_else(|| panic!("no token for `{}`", ident.name))
}

fn hover(result: &ValidationResult, ident: &Ident) -> String {
    result
        .hover
        .get(&ident.range)
        .cloned()
        .unwrap_or_else(|| panic!("no hover for `{}`", ident.name))
}

fn at(offset: u32, len: u32) -> InputRange {
    InputRange::new(
        InputPosition::new(offset, 0, offset),
        InputPosition::new(offset + len, 0, offset + len),
    )
}

/// A function that touches one of every kind of symbol.
struct Sample {
    result: ValidationResult,
    module: Ident,
    function: Ident,
    param: Ident,
    param_use: Ident,
    local: Ident,
    local_use: Ident,
    constant: Ident,
    library_constant: Ident,
    library_function: Ident,
    method: Ident,
    field: Ident,
}

/// ```text
/// use ksp::vessel
/// fn main(v: Vessel) -> Unit = {
///     let d = v.distance_to(v)
///     const k = MAX_STAGES
///     find_vessel(v.name)
///     d
/// }
/// ```
fn sample() -> Sample {
    let ast = Ast::new();
    let module = ast.ident("ksp::vessel");
    let function = ast.ident("main");
    let param = ast.ident("v");
    let param_use = ast.ident("v");
    let local = ast.ident("d");
    let local_use = ast.ident("d");
    let constant = ast.ident("k");
    let library_constant = ast.ident("MAX_STAGES");
    let library_function = ast.ident("find_vessel");
    let method = ast.ident("distance_to");
    let field = ast.ident("name");

    let body = ast.block(vec![
        ast.let_at(
            local.clone(),
            None,
            ast.method_at(ast.var_at(param_use.clone()), method.clone(), vec![ast.var("v")]),
        ),
        Expr::new(
            ExprKind::Let {
                is_const: true,
                binding: Binding::Single {
                    name: constant.clone(),
                },
                type_spec: None,
                value: Box::new(ast.var_at(library_constant.clone())),
            },
            ast.span(4),
        ),
        ast.call_at(
            library_function.clone(),
            vec![Expr::new(
                ExprKind::Field {
                    target: Box::new(ast.var("v")),
                    name: field.clone(),
                },
                ast.span(4),
            )],
        ),
        ast.var_at(local_use.clone()),
    ]);
    let items = vec![
        ModuleItem::Use(UseDeclaration {
            module: module.clone(),
            import: UseKind::All,
            range: ast.span(4),
        }),
        ModuleItem::Function(ast.function_at(
            function.clone(),
            vec![FunctionParameterDeclaration {
                name: param.clone(),
                type_spec: Some(ast.ty("Vessel")),
                default_value: None,
            }],
            ast.ty("float"),
            body,
        )),
    ];
    Sample {
        result: validate(items),
        module,
        function,
        param,
        param_use,
        local,
        local_use,
        constant,
        library_constant,
        library_function,
        method,
        field,
    }
}

// ── Semantic Tokens ────────────────────────────────────────────────────

#[test]
fn test_sample_is_clean() {
    let sample = sample();
    assert!(sample.result.diagnostics.is_empty(), "{:#?}", messages(&sample.result));
}

#[test]
fn test_token_kinds_and_modifiers() {
    let s = sample();
    let r = &s.result;
    assert_eq!(token(r, &s.module), (Token::Namespace, vec![]));
    assert_eq!(token(r, &s.function), (Token::Function, vec![Mod::Declaration]));
    assert_eq!(token(r, &s.param), (Token::Parameter, vec![Mod::Declaration]));
    assert_eq!(token(r, &s.param_use), (Token::Parameter, vec![]));
    assert_eq!(token(r, &s.local), (Token::Variable, vec![Mod::Declaration]));
    assert_eq!(token(r, &s.local_use), (Token::Variable, vec![]));
    assert_eq!(
        token(r, &s.constant),
        (Token::Variable, vec![Mod::Declaration, Mod::Readonly])
    );
    assert_eq!(
        token(r, &s.library_constant),
        (Token::Variable, vec![Mod::Readonly, Mod::DefaultLibrary])
    );
    assert_eq!(
        token(r, &s.library_function),
        (Token::Function, vec![Mod::DefaultLibrary])
    );
    assert_eq!(token(r, &s.method), (Token::Method, vec![Mod::DefaultLibrary]));
    assert_eq!(
        token(r, &s.field),
        (Token::Property, vec![Mod::Readonly, Mod::DefaultLibrary])
    );
}

#[test]
fn test_tokens_are_in_document_order() {
    let s = sample();
    let offsets: Vec<u32> = s
        .result
        .semantic_tokens
        .iter()
        .map(|t| t.range.start.offset)
        .collect();
    assert!(!offsets.is_empty());
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "{:?}", offsets);
}

#[test]
fn test_token_serialization() {
    let s = sample();
    let constant = s
        .result
        .semantic_tokens
        .iter()
        .find(|t| t.range == s.constant.range)
        .expect("token for `k`");
    let value = serde_json::to_value(constant).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "variable",
            "modifiers": ["declaration", "readonly"],
            "range": serde_json::to_value(s.constant.range).unwrap(),
        })
    );

    let use_token = s
        .result
        .semantic_tokens
        .iter()
        .find(|t| t.range == s.param_use.range)
        .expect("token for `v`");
    let value = serde_json::to_value(use_token).unwrap();
    assert_eq!(value["type"], "parameter");
    assert!(value.get("modifiers").is_none());
}

#[test]
fn test_unresolved_names_get_no_token() {
    let ast = Ast::new();
    let missing = ast.ident("missing");
    let result = validate(vec![ast.fn_item(
        "main",
        vec![],
        ast.ty("Unit"),
        ast.var_at(missing.clone()),
    )]);
    assert!(result.semantic_tokens.iter().all(|t| t.range != missing.range));
    assert!(result.hover.get(&missing.range).is_none());
    assert!(result.definitions.get(&missing.range).is_none());
}

// ── Inlay Hints ────────────────────────────────────────────────────────

#[test]
fn test_inlay_hints_follow_inferred_names() {
    let ast = Ast::new();
    let x = ast.ident("x");
    let annotated = ast.ident("y");
    let i = ast.ident("i");
    let lambda_param = ast.ident("n");
    let body = ast.block(vec![
        ast.let_at(x.clone(), None, ast.int(1)),
        ast.let_at(annotated.clone(), Some(ast.ty("float")), ast.int(2)),
        ast.for_at(i.clone(), ast.range(ast.int(0), ast.int(3)), ast.block(vec![])),
        ast.method(
            ast.array(vec![ast.string("a")]),
            "map",
            vec![Expr::new(
                ExprKind::Lambda {
                    parameters: vec![LambdaParameter {
                        name: lambda_param.clone(),
                        type_spec: None,
                    }],
                    body: Box::new(ast.field(ast.var("n"), "length")),
                },
                ast.span(4),
            )],
        ),
    ]);
    let result = validate(vec![ast.fn_item("main", vec![], ast.ty("Unit"), body)]);
    assert_clean(&result);

    let hints: Vec<(u32, &str)> = result
        .inlay_hints
        .iter()
        .map(|h| (h.position.offset, h.label.as_str()))
        .collect();
    assert_eq!(
        hints,
        vec![
            (x.range.end.offset, ": int"),
            (i.range.end.offset, ": int"),
            (lambda_param.range.end.offset, ": string"),
        ]
    );
}

#[test]
fn test_const_hint_and_serialization() {
    let ast = Ast::new();
    let name = ast.ident("LIMIT");
    let result = validate(vec![ast.const_item_at(
        name.clone(),
        None,
        ast.binary(ast.int(2), Operator::Mul, ast.float(1.5)),
    )]);
    assert_clean(&result);
    assert_eq!(result.inlay_hints.len(), 1);
    let value = serde_json::to_value(&result.inlay_hints[0]).unwrap();
    assert_eq!(value["label"], ": float");
    assert_eq!(value["position"]["offset"], name.range.end.offset);
    assert_eq!(value["position"]["line"], 0);
}

// ── Hover and Definitions ──────────────────────────────────────────────

#[test]
fn test_hover_texts() {
    let s = sample();
    let r = &s.result;
    insta::assert_snapshot!(
        hover(r, &s.library_function),
        @r###"
    find_vessel: fn(string) -> Option<ksp::vessel::Vessel>

    Look up a vessel by name
    "###
    );
    insta::assert_snapshot!(hover(r, &s.local), @"d: float");
    insta::assert_snapshot!(hover(r, &s.param_use), @"v: ksp::vessel::Vessel");
    insta::assert_snapshot!(hover(r, &s.method), @"distance_to: fn(ksp::vessel::Vessel) -> float");
    insta::assert_snapshot!(hover(r, &s.library_constant), @r###"
    MAX_STAGES: int

    Stage limit
    "###);
    insta::assert_snapshot!(hover(r, &s.module), @"Vessel access");
}

#[test]
fn test_definitions_point_at_declarations() {
    let s = sample();
    let r = &s.result;
    let local = &r.definitions[&s.local_use.range];
    assert_eq!(local.module_name, "main");
    assert_eq!(local.range, s.local.range);
    assert_eq!(r.definitions[&s.param_use.range].range, s.param.range);
    // Registry symbols have no source to jump to.
    assert!(r.definitions.get(&s.library_function.range).is_none());
    assert!(r.definitions.get(&s.method.range).is_none());
}

#[test]
fn test_struct_members_link_to_their_declarations() {
    let ast = Ast::new();
    let field_decl = ast.ident("x");
    let field_use = ast.ident("x");
    let result = validate(vec![
        ast.struct_item("Point", vec![StructField {
            name: field_decl.clone(),
            type_spec: ast.ty("float"),
            description: "Horizontal position".to_string(),
            default_value: None,
        }]),
        ast.fn_item(
            "get_x",
            vec![ast.param("p", ast.ty("Point"))],
            ast.ty("float"),
            Expr::new(
                ExprKind::Field {
                    target: Box::new(ast.var("p")),
                    name: field_use.clone(),
                },
                ast.span(4),
            ),
        ),
    ]);
    assert_clean(&result);
    assert_eq!(result.definitions[&field_use.range].range, field_decl.range);
    assert_eq!(token(&result, &field_use), (Token::Property, vec![]));
    insta::assert_snapshot!(hover(&result, &field_use), @r###"
    x: float

    Horizontal position
    "###);
}

// ── Position Queries ───────────────────────────────────────────────────

#[test]
fn test_queries_pick_the_innermost_node() {
    let ast = Ast::new();
    // `1 + 2.5` laid out by hand so the operands nest inside the binary.
    let left = Expr::new(ExprKind::Int { value: 1 }, at(1000, 1));
    let right = Expr::new(ExprKind::Float { value: 2.5 }, at(1004, 3));
    let sum = Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op: Operator::Add,
            right: Box::new(right),
        },
        at(1000, 7),
    );
    let result = validate(vec![ast.const_item("c", None, sum)]);
    assert_clean(&result);

    assert_eq!(result.type_at(1000).map(ToString::to_string).as_deref(), Some("int"));
    assert_eq!(result.type_at(1002).map(ToString::to_string).as_deref(), Some("float"));
    assert_eq!(result.type_at(1005).map(ToString::to_string).as_deref(), Some("float"));
    assert!(result.type_at(1007).is_none());
}

#[test]
fn test_hover_and_definition_at_offset() {
    let s = sample();
    let r = &s.result;
    let inside = s.local_use.range.start.offset;
    assert_eq!(r.hover_at(inside), Some("d: float"));
    assert_eq!(r.definition_at(inside).map(|d| d.range), Some(s.local.range));
    assert!(r.definition_at(s.library_function.range.start.offset).is_none());
}

// ── Rendering ──────────────────────────────────────────────────────────

#[test]
fn test_render_diagnostics_in_report_order() {
    let ast = Ast::new();
    let result = validate(vec![
        ast.const_item("a", Some(ast.ty("int")), ast.string("one")),
        ast.const_item("b", None, ast.var("nowhere")),
    ]);
    let source = " ".repeat(256);
    let rendered = result.render_diagnostics(&source, "main.to2", &DiagnosticOptions::json_mode());
    let codes: Vec<String> = rendered
        .iter()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            format!("{} {}", value["code"], value["severity"])
        })
        .collect();
    insta::assert_debug_snapshot!(codes, @r###"
    [
        "\"E0004\" \"error\"",
        "\"E0002\" \"error\"",
        "\"E0010\" \"warn\"",
    ]
    "###);
}

//! Integration tests for module-level declarations.
//!
//! These tests exercise:
//! - Two-pass registration: declaration order, duplicates and imports
//! - Structs, their constructors and type aliases
//! - `impl` blocks: methods, `self` receivers and definitions
//! - `impl operators` blocks: operator names, arity and table placement

mod common;

use common::*;
use to2_typeck::ast::*;
use to2_typeck::error::ErrorCategory;
use to2_typeck::operator::Operator;

// ── Helpers ────────────────────────────────────────────────────────────

/// `struct Point(x: int, y: int)`.
fn point(ast: &Ast) -> ModuleItem {
    ast.struct_item(
        "Point",
        vec![
            ast.struct_field("x", ast.ty("int")),
            ast.struct_field("y", ast.ty("int")),
        ],
    )
}

/// `fn name(a: Point, b: Point) -> Point = Point(a.x + b.x, a.y + b.y)`.
fn point_binary(ast: &Ast, name: &str) -> FunctionDeclaration {
    let component = |field: &str| {
        ast.binary(
            ast.field(ast.var("a"), field),
            Operator::Add,
            ast.field(ast.var("b"), field),
        )
    };
    ast.function(
        name,
        vec![ast.param("a", ast.ty("Point")), ast.param("b", ast.ty("Point"))],
        ast.ty("Point"),
        ast.call("Point", vec![component("x"), component("y")]),
    )
}

// ── Operator Overloads ─────────────────────────────────────────────────

#[test]
fn test_binary_operator_lands_in_suffix_table() {
    let ast = Ast::new();
    let result = validate(vec![
        point(&ast),
        ast.impl_operators("Point", vec![point_binary(&ast, "add")]),
    ]);
    assert!(result.diagnostics.is_empty(), "{:#?}", messages(&result));

    let imp = result.context.find_struct("Point").expect("Point is registered");
    let add = &imp.suffix_operators[&Operator::Add];
    assert_eq!(add.len(), 1);
    assert_eq!(add[0].other_type.to_string(), "main::Point");
    assert_eq!(add[0].result_type.to_string(), "main::Point");
    assert!(imp.prefix_operators.is_empty());
}

#[test]
fn test_overloaded_operator_is_used_by_expressions() {
    let ast = Ast::new();
    let sum = ast.binary(
        ast.call("Point", vec![ast.int(1), ast.int(2)]),
        Operator::Add,
        ast.call("Point", vec![ast.int(3), ast.int(4)]),
    );
    let result = validate(vec![
        point(&ast),
        ast.impl_operators("Point", vec![point_binary(&ast, "add")]),
        ast.const_item("origin", None, sum.clone()),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &sum), "main::Point");
}

#[test]
fn test_unknown_operator_name_is_rejected() {
    let ast = Ast::new();
    let weird = ast.ident("weird");
    let function = ast.function_at(
        weird.clone(),
        vec![ast.param("a", ast.ty("Point"))],
        ast.ty("Point"),
        ast.var("a"),
    );
    let result = validate(vec![point(&ast), ast.impl_operators("Point", vec![function])]);

    let errors = errors(&result);
    assert_eq!(errors.len(), 1, "{:#?}", messages(&result));
    assert_eq!(errors[0].category(), ErrorCategory::InvalidOperatorDeclaration);
    assert_eq!(errors[0].range(), weird.range);

    let imp = result.context.find_struct("Point").expect("Point is registered");
    assert!(imp.prefix_operators.is_empty());
    assert!(imp.suffix_operators.is_empty());
}

#[test]
fn test_unary_operator_with_two_parameters_is_rejected() {
    let ast = Ast::new();
    let result = validate(vec![
        point(&ast),
        ast.impl_operators("Point", vec![point_binary(&ast, "unary_minus")]),
    ]);

    let errors = errors(&result);
    assert_eq!(errors.len(), 1, "{:#?}", messages(&result));
    insta::assert_snapshot!(
        errors[0].message(),
        @"unary operator `unary_minus` takes exactly 1 parameter, found 2"
    );
    let imp = result.context.find_struct("Point").expect("Point is registered");
    assert!(imp.prefix_operators.is_empty());
    assert!(imp.suffix_operators.is_empty());
}

#[test]
fn test_unary_operator_lands_in_prefix_table() {
    let ast = Ast::new();
    let negate = ast.function(
        "unary_minus",
        vec![ast.param("p", ast.ty("Point"))],
        ast.ty("Point"),
        ast.call(
            "Point",
            vec![
                ast.unary(Operator::Sub, ast.field(ast.var("p"), "x")),
                ast.unary(Operator::Sub, ast.field(ast.var("p"), "y")),
            ],
        ),
    );
    let negated = ast.unary(Operator::Sub, ast.call("Point", vec![ast.int(1), ast.int(2)]));
    let result = validate(vec![
        point(&ast),
        ast.impl_operators("Point", vec![negate]),
        ast.const_item("flipped", None, negated.clone()),
    ]);
    assert_clean(&result);

    let imp = result.context.find_struct("Point").expect("Point is registered");
    let sub = &imp.prefix_operators[&Operator::Sub];
    assert_eq!(sub.len(), 1);
    assert!(sub[0].other_type.is_unit());
    assert_eq!(type_of(&result, &negated), "main::Point");
}

#[test]
fn test_struct_on_the_right_lands_in_prefix_table() {
    let ast = Ast::new();
    let scale = ast.function(
        "mul",
        vec![ast.param("k", ast.ty("int")), ast.param("p", ast.ty("Point"))],
        ast.ty("Point"),
        ast.var("p"),
    );
    let scaled = ast.binary(
        ast.int(2),
        Operator::Mul,
        ast.call("Point", vec![ast.int(1), ast.int(2)]),
    );
    let result = validate(vec![
        point(&ast),
        ast.impl_operators("Point", vec![scale]),
        ast.const_item("doubled", None, scaled.clone()),
    ]);
    assert_clean(&result);

    let imp = result.context.find_struct("Point").expect("Point is registered");
    assert_eq!(imp.prefix_operators[&Operator::Mul][0].other_type.to_string(), "int");
    assert!(imp.suffix_operators.is_empty());
    assert_eq!(type_of(&result, &scaled), "main::Point");
}

#[test]
fn test_operator_without_struct_operand_is_rejected() {
    let ast = Ast::new();
    let add = ast.function(
        "add",
        vec![ast.param("a", ast.ty("int")), ast.param("b", ast.ty("int"))],
        ast.ty("int"),
        ast.binary(ast.var("a"), Operator::Add, ast.var("b")),
    );
    let result = validate(vec![point(&ast), ast.impl_operators("Point", vec![add])]);

    let errors = errors(&result);
    assert_eq!(errors.len(), 1, "{:#?}", messages(&result));
    insta::assert_snapshot!(
        errors[0].message(),
        @"one parameter of operator `add` must accept `Point`"
    );
}

#[test]
fn test_overloads_keep_registration_order() {
    let ast = Ast::new();
    let with_int = ast.function(
        "add",
        vec![ast.param("a", ast.ty("Point")), ast.param("k", ast.ty("int"))],
        ast.ty("int"),
        ast.var("k"),
    );
    let result = validate(vec![
        point(&ast),
        ast.impl_operators("Point", vec![point_binary(&ast, "add")]),
        ast.impl_operators("Point", vec![with_int]),
    ]);
    assert_clean(&result);

    let imp = result.context.find_struct("Point").expect("Point is registered");
    let others: Vec<String> = imp.suffix_operators[&Operator::Add]
        .iter()
        .map(|e| e.other_type.to_string())
        .collect();
    assert_eq!(others, vec!["main::Point", "int"]);
}

// ── Methods ────────────────────────────────────────────────────────────

/// `struct Vec2(x: int, y: int)` and
/// `impl Vec2 { fn length(self) -> float = self.x.to_float }`.
fn vec2_with_length(ast: &Ast, length: Ident) -> Vec<ModuleItem> {
    let method = ast.function_at(
        length,
        vec![ast.self_param()],
        ast.ty("float"),
        ast.field(ast.field(ast.var("self"), "x"), "to_float"),
    );
    vec![
        ast.struct_item(
            "Vec2",
            vec![
                ast.struct_field("x", ast.ty("int")),
                ast.struct_field("y", ast.ty("int")),
            ],
        ),
        ast.impl_item("Vec2", vec![method]),
    ]
}

#[test]
fn test_method_call_links_to_declaration() {
    let ast = Ast::new();
    let declared = ast.ident("length");
    let used = ast.ident("length");
    let call = ast.method_at(
        ast.call("Vec2", vec![ast.int(1), ast.int(2)]),
        used.clone(),
        vec![],
    );

    let mut items = vec2_with_length(&ast, declared.clone());
    items.push(ast.fn_item("norm", vec![], ast.ty("float"), call.clone()));
    let result = validate(items);

    assert!(result.diagnostics.is_empty(), "{:#?}", messages(&result));
    assert_eq!(type_of(&result, &call), "float");
    let definition = &result.definitions[&used.range];
    assert_eq!(definition.module_name, "main");
    assert_eq!(definition.range, declared.range);
}

#[test]
fn test_impl_may_precede_its_struct() {
    let ast = Ast::new();
    let mut items = vec2_with_length(&ast, ast.ident("length"));
    items.reverse();
    let result = validate(items);
    assert!(result.diagnostics.is_empty(), "{:#?}", messages(&result));
    assert!(result.context.find_struct("Vec2").expect("Vec2").methods.contains_key("length"));
}

#[test]
fn test_impl_of_undefined_struct() {
    let ast = Ast::new();
    let method = ast.function(
        "length",
        vec![ast.self_param()],
        ast.ty("float"),
        ast.field(ast.var("self"), "x"),
    );
    let result = validate(vec![ast.impl_item("Ghost", vec![method])]);

    let errors = errors(&result);
    assert_eq!(errors.len(), 1, "{:#?}", messages(&result));
    insta::assert_snapshot!(errors[0].message(), @"undefined struct `Ghost`");
}

#[test]
fn test_method_requires_self_receiver() {
    let ast = Ast::new();
    let method = ast.function("zero", vec![], ast.ty("float"), ast.float(0.0));
    let result = validate(vec![
        ast.float_struct("Vec2", &["x", "y"]),
        ast.impl_item("Vec2", vec![method]),
    ]);

    assert_eq!(categories(&result), vec![ErrorCategory::InvalidDeclaration]);
    insta::assert_snapshot!(
        messages(&result)[0],
        @"method `zero` of `Vec2` must take `self` as its first parameter"
    );
}

#[test]
fn test_methods_see_self_type() {
    let ast = Ast::new();
    let scaled = ast.function(
        "scaled",
        vec![ast.self_param(), ast.param("k", ast.ty("float"))],
        ast.ty("Self"),
        ast.call(
            "Vec2",
            vec![
                ast.binary(ast.field(ast.var("self"), "x"), Operator::Mul, ast.var("k")),
                ast.binary(ast.field(ast.var("self"), "y"), Operator::Mul, ast.var("k")),
            ],
        ),
    );
    let call = ast.method(
        ast.call("Vec2", vec![ast.float(1.0), ast.float(2.0)]),
        "scaled",
        vec![ast.int(2)],
    );
    let result = validate(vec![
        ast.float_struct("Vec2", &["x", "y"]),
        ast.impl_item("Vec2", vec![scaled]),
        ast.const_item("twice", None, call.clone()),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &call), "main::Vec2");
}

#[test]
fn test_undefined_method() {
    let ast = Ast::new();
    let call = ast.method(ast.call("Vec2", vec![ast.float(1.0), ast.float(2.0)]), "fly", vec![]);
    let result = validate(vec![
        ast.float_struct("Vec2", &["x", "y"]),
        ast.const_item("v", None, call),
    ]);
    assert_eq!(errors(&result).len(), 1);
    insta::assert_snapshot!(messages(&result)[0], @"undefined method `fly` in `Vec2`");
}

// ── Constants and Functions ────────────────────────────────────────────

#[test]
fn test_duplicate_const_reports_second_declaration() {
    let ast = Ast::new();
    let first = ast.ident("A");
    let second = ast.ident("A");
    let usage = ast.ident("A");
    let sum = ast.binary(ast.var_at(usage.clone()), Operator::Add, ast.int(1));
    let result = validate(vec![
        ast.const_item_at(first.clone(), None, ast.int(1)),
        ast.const_item_at(second.clone(), None, ast.int(2)),
        ast.const_item("B", None, sum.clone()),
    ]);

    let errors = errors(&result);
    assert_eq!(errors.len(), 1, "{:#?}", messages(&result));
    assert_eq!(errors[0].category(), ErrorCategory::DuplicateSymbol);
    assert_eq!(errors[0].range(), second.range);
    insta::assert_snapshot!(errors[0].message(), @"duplicate constant `A`");

    assert_eq!(type_of(&result, &sum), "int");
    assert_eq!(result.definitions[&usage.range].range, first.range);
}

#[test]
fn test_duplicate_function() {
    let ast = Ast::new();
    let second = ast.ident("f");
    let result = validate(vec![
        ast.fn_item("f", vec![], ast.ty("int"), ast.int(1)),
        ModuleItem::Function(ast.function_at(second.clone(), vec![], ast.ty("int"), ast.int(2))),
    ]);
    assert_eq!(categories(&result), vec![ErrorCategory::DuplicateSymbol]);
    assert_eq!(result.diagnostics[0].range(), second.range);
}

#[test]
fn test_const_annotation_mismatch() {
    let ast = Ast::new();
    let value = ast.string("ten");
    let result = validate(vec![ast.const_item("N", Some(ast.ty("int")), value.clone())]);
    assert_eq!(categories(&result), vec![ErrorCategory::TypeMismatch]);
    assert_eq!(result.diagnostics[0].range(), value.range);
    insta::assert_snapshot!(
        messages(&result)[0],
        @"type mismatch: expected `int`, found `string`"
    );
}

#[test]
fn test_functions_may_be_called_before_declaration() {
    let ast = Ast::new();
    let call = ast.call("double", vec![ast.int(21)]);
    let result = validate(vec![
        ast.const_item("answer", None, call.clone()),
        ast.fn_item(
            "double",
            vec![ast.param("n", ast.ty("int"))],
            ast.ty("int"),
            ast.binary(ast.var("n"), Operator::Mul, ast.int(2)),
        ),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &call), "int");
}

#[test]
fn test_function_body_must_match_return_type() {
    let ast = Ast::new();
    let last = ast.string("nope");
    let body = ast.block(vec![ast.let_("x", None, ast.int(1)), last.clone()]);
    let result = validate(vec![ast.fn_item("f", vec![], ast.ty("int"), body)]);
    assert_eq!(categories(&result), vec![ErrorCategory::TypeMismatch]);
    assert_eq!(result.diagnostics[0].range(), last.range);
}

#[test]
fn test_parameter_default_must_match() {
    let ast = Ast::new();
    let default = ast.string("one");
    let result = validate(vec![ast.fn_item(
        "f",
        vec![ast.param_default("n", ast.ty("int"), default.clone())],
        ast.ty("int"),
        ast.var("n"),
    )]);
    assert_eq!(categories(&result), vec![ErrorCategory::TypeMismatch]);
    assert_eq!(result.diagnostics[0].range(), default.range);
}

#[test]
fn test_duplicate_parameter() {
    let ast = Ast::new();
    let result = validate(vec![ast.fn_item(
        "f",
        vec![ast.param("n", ast.ty("int")), ast.param("n", ast.ty("int"))],
        ast.ty("int"),
        ast.var("n"),
    )]);
    assert_eq!(categories(&result), vec![ErrorCategory::DuplicateSymbol]);
    insta::assert_snapshot!(messages(&result)[0], @"duplicate parameter `n`");
}

// ── Structs and Type Aliases ───────────────────────────────────────────

#[test]
fn test_struct_constructor_and_fields() {
    let ast = Ast::new();
    let construct = ast.call("Vec2", vec![ast.float(1.0), ast.int(2)]);
    let x = ast.field(ast.var("v"), "x");
    let result = validate(vec![
        ast.float_struct("Vec2", &["x", "y"]),
        ast.const_item("v", None, construct.clone()),
        ast.const_item("vx", None, x.clone()),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &construct), "main::Vec2");
    assert_eq!(type_of(&result, &x), "float");
}

#[test]
fn test_struct_field_defaults_make_arguments_optional() {
    let ast = Ast::new();
    let mut fields = vec![ast.struct_field("name", ast.ty("string"))];
    fields.push(StructField {
        default_value: Some(ast.int(3)),
        ..ast.struct_field("stages", ast.ty("int"))
    });
    let result = validate(vec![
        ast.struct_item("Rocket", fields),
        ast.const_item("r", None, ast.call("Rocket", vec![ast.string("kerbal")])),
        ast.const_item("s", None, ast.call("Rocket", vec![])),
    ]);
    assert_eq!(categories(&result), vec![ErrorCategory::ArityMismatch]);
    insta::assert_snapshot!(messages(&result)[0], @"arguments for `Rocket`: expected 1, found 0");
}

#[test]
fn test_structs_may_reference_later_structs() {
    let ast = Ast::new();
    let nested = ast.field(ast.field(ast.var("o"), "at"), "x");
    let result = validate(vec![
        ast.struct_item("Orbit", vec![ast.struct_field("at", ast.ty("Vec2"))]),
        ast.float_struct("Vec2", &["x", "y"]),
        ast.fn_item(
            "f",
            vec![ast.param("o", ast.ty("Orbit"))],
            ast.ty("float"),
            nested.clone(),
        ),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &nested), "float");
}

#[test]
fn test_later_struct_field_rejects_mismatched_record() {
    let ast = Ast::new();
    let orbit = |ast: &Ast| ast.struct_item("Orbit", vec![ast.struct_field("at", ast.ty("Vec2"))]);
    let bad_orbit = |ast: &Ast| {
        ast.const_item(
            "o",
            None,
            ast.call("Orbit", vec![ast.record(vec![("z", ast.string("nope"))])]),
        )
    };
    let vec2 = |ast: &Ast| ast.float_struct("Vec2", &["x", "y"]);

    let forward = validate(vec![orbit(&ast), vec2(&ast), bad_orbit(&ast)]);
    let backward = validate(vec![vec2(&ast), orbit(&ast), bad_orbit(&ast)]);
    assert_eq!(categories(&forward), vec![ErrorCategory::TypeMismatch]);
    assert_eq!(messages(&forward), messages(&backward));
    insta::assert_snapshot!(
        messages(&forward)[0],
        @"type mismatch: expected `main::Vec2`, found `(z : string)`"
    );
}

#[test]
fn test_duplicate_struct_field() {
    let ast = Ast::new();
    let result = validate(vec![ast.float_struct("Vec2", &["x", "x"])]);
    assert_eq!(categories(&result), vec![ErrorCategory::DuplicateSymbol]);
    insta::assert_snapshot!(messages(&result)[0], @"duplicate field `x`");
}

#[test]
fn test_unknown_field_type() {
    let ast = Ast::new();
    let result = validate(vec![ast.struct_item("S", vec![ast.struct_field("a", ast.ty("Foo"))])]);
    assert_eq!(categories(&result), vec![ErrorCategory::UndefinedSymbol]);
    insta::assert_snapshot!(messages(&result)[0], @"undefined type `Foo`");
}

#[test]
fn test_type_alias_is_transparent() {
    let ast = Ast::new();
    let pair = TypeSpec::new(
        TypeSpecKind::Tuple {
            items: vec![ast.ty("int"), ast.ty("string")],
        },
        ast.span(13),
    );
    let second = ast.field(ast.var("p"), "_2");
    let result = validate(vec![
        ast.type_alias("Pair", pair),
        ast.fn_item(
            "f",
            vec![ast.param("p", ast.ty("Pair"))],
            ast.ty("string"),
            second.clone(),
        ),
        ast.const_item(
            "p",
            Some(ast.ty("Pair")),
            ast.tuple(vec![ast.int(1), ast.string("one")]),
        ),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &second), "string");
}

#[test]
fn test_record_literal_converts_to_struct() {
    let ast = Ast::new();
    let result = validate(vec![
        ast.float_struct("Vec2", &["x", "y"]),
        ast.const_item(
            "v",
            Some(ast.ty("Vec2")),
            ast.record(vec![("x", ast.float(1.0)), ("y", ast.int(2))]),
        ),
        ast.const_item(
            "w",
            Some(ast.ty("Vec2")),
            ast.record(vec![("x", ast.float(1.0))]),
        ),
    ]);
    assert_eq!(categories(&result), vec![ErrorCategory::TypeMismatch]);
}

#[test]
fn test_wrong_generic_argument_count() {
    let ast = Ast::new();
    let spec = ast.generic_ty("Cell", vec![ast.ty("int"), ast.ty("int")]);
    let result = validate(vec![ast.fn_item(
        "f",
        vec![ast.param("c", spec)],
        ast.ty("Unit"),
        ast.block(vec![]),
    )]);
    assert_eq!(categories(&result), vec![ErrorCategory::ArityMismatch]);
    insta::assert_snapshot!(messages(&result)[0], @"type arguments for `Cell`: expected 1, found 2");
}

// ── Imports ────────────────────────────────────────────────────────────

#[test]
fn test_use_names_imports_functions_and_types() {
    let ast = Ast::new();
    let call = ast.call("find_vessel", vec![ast.string("Kerbal X")]);
    let wrapped = ast.call("Some", vec![ast.var("v")]);
    let result = validate(vec![
        ast.use_names("ksp::vessel", &["find_vessel", "Vessel"]),
        ast.fn_item(
            "wrap",
            vec![ast.param("v", ast.ty("Vessel"))],
            ast.option_ty(ast.ty("Vessel")),
            wrapped.clone(),
        ),
        ast.const_item("found", None, call.clone()),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &call), "Option<ksp::vessel::Vessel>");
    assert_eq!(type_of(&result, &wrapped), "Option<ksp::vessel::Vessel>");
}

#[test]
fn test_use_all_imports_every_export() {
    let ast = Ast::new();
    let constant = ast.var("MAX_STAGES");
    let result = validate(vec![
        ast.use_all("ksp::vessel"),
        ast.const_item("limit", None, constant.clone()),
        ast.fn_item(
            "f",
            vec![ast.param("v", ast.ty("Vessel"))],
            ast.ty("bool"),
            ast.call("stage", vec![ast.var("v")]),
        ),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &constant), "int");
}

#[test]
fn test_module_alias_and_qualified_names() {
    let ast = Ast::new();
    let constant = ast.ns_var("v", "MAX_STAGES");
    let call = ast.ns_call("ksp::vessel", "find_vessel", vec![ast.string("x")]);
    let result = validate(vec![
        ast.use_module("ksp::vessel", Some("v")),
        ast.use_module("ksp::vessel", None),
        ast.const_item("limit", None, constant.clone()),
        ast.const_item("found", None, call.clone()),
        ast.fn_item(
            "f",
            vec![ast.param("v", ast.ns_ty("v", "Vessel"))],
            ast.ty("string"),
            ast.field(ast.var("v"), "name"),
        ),
    ]);
    assert_clean(&result);
    assert_eq!(type_of(&result, &constant), "int");
    assert_eq!(type_of(&result, &call), "Option<ksp::vessel::Vessel>");
}

#[test]
fn test_unknown_module_and_symbol() {
    let ast = Ast::new();
    let result = validate(vec![
        ast.use_module("ksp::nowhere", None),
        ast.use_names("ksp::vessel", &["find_vessel", "launch"]),
        ast.const_item("x", None, ast.ns_var("core::none", "PI")),
    ]);
    insta::assert_debug_snapshot!(messages(&result), @r###"
    [
        "undefined module `ksp::nowhere`",
        "undefined symbol `launch` in `ksp::vessel`",
        "undefined module `core::none`",
        "type of `x` could not be inferred",
    ]
    "###);
    assert_eq!(errors(&result).len(), 3);
}

#[test]
fn test_import_colliding_with_local_function() {
    let ast = Ast::new();
    let local = ast.ident("find_vessel");
    let result = validate(vec![
        ast.use_names("ksp::vessel", &["find_vessel"]),
        ModuleItem::Function(ast.function_at(local.clone(), vec![], ast.ty("int"), ast.int(1))),
    ]);
    assert_eq!(categories(&result), vec![ErrorCategory::DuplicateSymbol]);
    assert_eq!(result.diagnostics[0].range(), local.range);
}

#[test]
fn test_importing_a_name_twice() {
    let ast = Ast::new();
    let result = validate(vec![
        ast.use_names("ksp::vessel", &["first"]),
        ast.use_names("ksp::vessel", &["first"]),
    ]);
    assert_eq!(categories(&result), vec![ErrorCategory::DuplicateSymbol]);
    insta::assert_snapshot!(messages(&result)[0], @"duplicate function `first`");
}

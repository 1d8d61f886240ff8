//! Shared helpers: a registry fixture and an AST builder.
//!
//! There is no parser in this workspace, so tests build modules directly.
//! Every node the builder creates gets a fresh range, which keeps the
//! side-table maps unambiguous.

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::Arc;

use to2_common::{InputPosition, InputRange};
use to2_typeck::ast::*;
use to2_typeck::error::{ErrorCategory, ValidationError};
use to2_typeck::operator::Operator;
use to2_typeck::{validate_module, Registry, ValidationResult};

pub const REGISTRY: &str = r#"{
    "ksp::vessel": {
        "description": "Vessel access",
        "constants": [
            { "name": "MAX_STAGES", "description": "Stage limit", "type": { "kind": "Builtin", "name": "int" } }
        ],
        "functions": [
            {
                "name": "find_vessel",
                "description": "Look up a vessel by name",
                "parameters": [{ "name": "name", "type": { "kind": "Builtin", "name": "string" } }],
                "returnType": {
                    "kind": "Option",
                    "param": { "kind": "Standard", "module": "ksp::vessel", "name": "Vessel" }
                }
            },
            {
                "name": "first",
                "genericParameters": ["T"],
                "parameters": [{
                    "name": "items",
                    "type": { "kind": "Array", "param": { "kind": "Generic", "name": "T" } }
                }],
                "returnType": { "kind": "Option", "param": { "kind": "Generic", "name": "T" } }
            },
            {
                "name": "stage",
                "parameters": [
                    { "name": "vessel", "type": { "kind": "Standard", "module": "ksp::vessel", "name": "Vessel" } },
                    { "name": "count", "type": { "kind": "Builtin", "name": "int" }, "hasDefault": true }
                ],
                "returnType": { "kind": "Builtin", "name": "bool" }
            }
        ],
        "types": [
            {
                "name": "Vessel",
                "description": "A vessel in flight",
                "fields": {
                    "name": { "type": { "kind": "Builtin", "name": "string" }, "readOnly": true },
                    "throttle": { "type": { "kind": "Builtin", "name": "float" } }
                },
                "methods": {
                    "distance_to": {
                        "parameters": [{
                            "name": "other",
                            "type": { "kind": "Standard", "module": "ksp::vessel", "name": "Vessel" }
                        }],
                        "returnType": { "kind": "Builtin", "name": "float" }
                    }
                },
                "suffixOperators": {
                    "==": [{
                        "otherType": { "kind": "Standard", "module": "ksp::vessel", "name": "Vessel" },
                        "resultType": { "kind": "Builtin", "name": "bool" }
                    }]
                }
            },
            {
                "name": "Stack",
                "genericParameters": ["T"],
                "fields": {
                    "length": { "type": { "kind": "Builtin", "name": "int" }, "readOnly": true }
                },
                "methods": {
                    "push": {
                        "parameters": [{ "name": "item", "type": { "kind": "Generic", "name": "T" } }],
                        "returnType": { "kind": "Builtin", "name": "Unit" }
                    },
                    "peek": {
                        "returnType": { "kind": "Option", "param": { "kind": "Generic", "name": "T" } }
                    }
                },
                "forInSource": { "kind": "Generic", "name": "T" },
                "indexAccess": { "kind": "Generic", "name": "T" }
            }
        ]
    }
}"#;

pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::from_json(REGISTRY).expect("fixture registry is valid"))
}

pub fn validate(items: Vec<ModuleItem>) -> ValidationResult {
    validate_module(&registry(), &module(items))
}

pub fn module(items: Vec<ModuleItem>) -> TO2Module {
    TO2Module {
        name: "main".to_string(),
        description: String::new(),
        items,
    }
}

pub fn errors(result: &ValidationResult) -> Vec<&ValidationError> {
    result.errors().collect()
}

pub fn categories(result: &ValidationResult) -> Vec<ErrorCategory> {
    result.diagnostics.iter().map(|d| d.category()).collect()
}

pub fn messages(result: &ValidationResult) -> Vec<String> {
    result.diagnostics.iter().map(|d| d.message()).collect()
}

/// Panic with every diagnostic if there are any errors.
pub fn assert_clean(result: &ValidationResult) {
    assert!(
        !result.has_errors(),
        "expected no errors, got: {:#?}",
        messages(result)
    );
}

/// The inferred type of a node, as displayed.
pub fn type_of(result: &ValidationResult, expr: &Expr) -> String {
    result
        .types
        .get(&expr.range)
        .map(ToString::to_string)
        .unwrap_or_else(|| panic!("no type recorded for {:?}", expr.kind))
}

// ── AST builder ────────────────────────────────────────────────────────

/// Hands out consecutive, non-overlapping single-line ranges.
#[derive(Default)]
pub struct Ast {
    next: Cell<u32>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn span(&self, len: u32) -> InputRange {
        let start = self.next.get();
        self.next.set(start + len + 1);
        InputRange::new(
            InputPosition::new(start, 0, start),
            InputPosition::new(start + len, 0, start + len),
        )
    }

    pub fn ident(&self, name: &str) -> Ident {
        Ident::new(name, self.span(name.len() as u32))
    }

    fn expr(&self, kind: ExprKind) -> Expr {
        Expr::new(kind, self.span(4))
    }

    // Types

    pub fn ty(&self, name: &str) -> TypeSpec {
        TypeSpec::named(name, self.span(name.len() as u32))
    }

    pub fn ns_ty(&self, namespace: &str, name: &str) -> TypeSpec {
        TypeSpec::new(
            TypeSpecKind::Named {
                namespace: Some(namespace.to_string()),
                name: name.to_string(),
                generic_args: Vec::new(),
            },
            self.span((namespace.len() + name.len() + 2) as u32),
        )
    }

    pub fn generic_ty(&self, name: &str, args: Vec<TypeSpec>) -> TypeSpec {
        TypeSpec::new(
            TypeSpecKind::Named {
                namespace: None,
                name: name.to_string(),
                generic_args: args,
            },
            self.span(name.len() as u32 + 8),
        )
    }

    pub fn array_ty(&self, element: TypeSpec) -> TypeSpec {
        TypeSpec::new(TypeSpecKind::Array { element: Box::new(element) }, self.span(4))
    }

    pub fn option_ty(&self, inner: TypeSpec) -> TypeSpec {
        TypeSpec::new(TypeSpecKind::Option { inner: Box::new(inner) }, self.span(4))
    }

    pub fn fn_ty(&self, parameters: Vec<TypeSpec>, return_type: TypeSpec) -> TypeSpec {
        TypeSpec::new(
            TypeSpecKind::Function {
                is_async: false,
                parameters,
                return_type: Box::new(return_type),
            },
            self.span(8),
        )
    }

    // Expressions

    pub fn int(&self, value: i64) -> Expr {
        self.expr(ExprKind::Int { value })
    }

    pub fn float(&self, value: f64) -> Expr {
        self.expr(ExprKind::Float { value })
    }

    pub fn bool(&self, value: bool) -> Expr {
        self.expr(ExprKind::Bool { value })
    }

    pub fn string(&self, value: &str) -> Expr {
        self.expr(ExprKind::String {
            value: value.to_string(),
        })
    }

    pub fn var(&self, name: &str) -> Expr {
        self.var_at(self.ident(name))
    }

    /// A variable reference with a caller-provided name, to look up its
    /// side-table entries afterwards.
    pub fn var_at(&self, name: Ident) -> Expr {
        self.expr(ExprKind::Variable {
            namespace: None,
            name,
        })
    }

    pub fn ns_var(&self, namespace: &str, name: &str) -> Expr {
        self.expr(ExprKind::Variable {
            namespace: Some(self.ident(namespace)),
            name: self.ident(name),
        })
    }

    pub fn call(&self, name: &str, args: Vec<Expr>) -> Expr {
        self.call_at(self.ident(name), args)
    }

    pub fn call_at(&self, name: Ident, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            namespace: None,
            name,
            type_args: Vec::new(),
            args,
        })
    }

    pub fn generic_call(&self, name: &str, type_args: Vec<TypeSpec>, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            namespace: None,
            name: self.ident(name),
            type_args,
            args,
        })
    }

    pub fn ns_call(&self, namespace: &str, name: &str, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            namespace: Some(self.ident(namespace)),
            name: self.ident(name),
            type_args: Vec::new(),
            args,
        })
    }

    pub fn method(&self, target: Expr, name: &str, args: Vec<Expr>) -> Expr {
        self.method_at(target, self.ident(name), args)
    }

    pub fn method_at(&self, target: Expr, name: Ident, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::MethodCall {
            target: Box::new(target),
            name,
            args,
        })
    }

    pub fn field(&self, target: Expr, name: &str) -> Expr {
        self.expr(ExprKind::Field {
            target: Box::new(target),
            name: self.ident(name),
        })
    }

    pub fn index(&self, target: Expr, index: Expr) -> Expr {
        self.expr(ExprKind::Index {
            target: Box::new(target),
            index: Box::new(index),
        })
    }

    pub fn unary(&self, op: Operator, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(&self, left: Expr, op: Operator, right: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn block(&self, expressions: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Block { expressions })
    }

    pub fn let_(&self, name: &str, type_spec: Option<TypeSpec>, value: Expr) -> Expr {
        self.let_at(self.ident(name), type_spec, value)
    }

    pub fn let_at(&self, name: Ident, type_spec: Option<TypeSpec>, value: Expr) -> Expr {
        self.expr(ExprKind::Let {
            is_const: false,
            binding: Binding::Single { name },
            type_spec,
            value: Box::new(value),
        })
    }

    pub fn const_(&self, name: &str, value: Expr) -> Expr {
        self.expr(ExprKind::Let {
            is_const: true,
            binding: Binding::Single {
                name: self.ident(name),
            },
            type_spec: None,
            value: Box::new(value),
        })
    }

    pub fn let_tuple(&self, names: &[&str], value: Expr) -> Expr {
        self.expr(ExprKind::Let {
            is_const: false,
            binding: Binding::Tuple {
                names: names.iter().map(|n| self.ident(n)).collect(),
            },
            type_spec: None,
            value: Box::new(value),
        })
    }

    pub fn assign(&self, name: &str, op: Option<Operator>, value: Expr) -> Expr {
        self.expr(ExprKind::Assign {
            name: self.ident(name),
            op,
            value: Box::new(value),
        })
    }

    pub fn field_assign(&self, target: Expr, name: &str, value: Expr) -> Expr {
        self.expr(ExprKind::FieldAssign {
            target: Box::new(target),
            name: self.ident(name),
            op: None,
            value: Box::new(value),
        })
    }

    pub fn if_(&self, condition: Expr, then_branch: Expr, else_branch: Option<Expr>) -> Expr {
        self.expr(ExprKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn while_(&self, condition: Expr, body: Expr) -> Expr {
        self.expr(ExprKind::While {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    pub fn for_(&self, name: &str, source: Expr, body: Expr) -> Expr {
        self.for_at(self.ident(name), source, body)
    }

    pub fn for_at(&self, name: Ident, source: Expr, body: Expr) -> Expr {
        self.expr(ExprKind::For {
            binding: Binding::Single { name },
            source: Box::new(source),
            body: Box::new(body),
        })
    }

    pub fn break_(&self) -> Expr {
        self.expr(ExprKind::Break)
    }

    pub fn continue_(&self) -> Expr {
        self.expr(ExprKind::Continue)
    }

    pub fn return_(&self, value: Option<Expr>) -> Expr {
        self.expr(ExprKind::Return {
            value: value.map(Box::new),
        })
    }

    pub fn lambda(&self, parameters: Vec<(&str, Option<TypeSpec>)>, body: Expr) -> Expr {
        self.expr(ExprKind::Lambda {
            parameters: parameters
                .into_iter()
                .map(|(name, type_spec)| LambdaParameter {
                    name: self.ident(name),
                    type_spec,
                })
                .collect(),
            body: Box::new(body),
        })
    }

    pub fn array(&self, elements: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Array { elements })
    }

    pub fn tuple(&self, items: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Tuple { items })
    }

    pub fn record(&self, items: Vec<(&str, Expr)>) -> Expr {
        self.expr(ExprKind::Record {
            items: items
                .into_iter()
                .map(|(name, value)| RecordItem {
                    name: self.ident(name),
                    value,
                })
                .collect(),
        })
    }

    pub fn range(&self, from: Expr, to: Expr) -> Expr {
        self.expr(ExprKind::Range {
            from: Box::new(from),
            to: Box::new(to),
            inclusive: false,
        })
    }

    // Items

    pub fn use_module(&self, module: &str, alias: Option<&str>) -> ModuleItem {
        ModuleItem::Use(UseDeclaration {
            module: self.ident(module),
            import: UseKind::Module {
                alias: alias.map(|a| self.ident(a)),
            },
            range: self.span(4),
        })
    }

    pub fn use_names(&self, module: &str, names: &[&str]) -> ModuleItem {
        ModuleItem::Use(UseDeclaration {
            module: self.ident(module),
            import: UseKind::Names {
                names: names.iter().map(|n| self.ident(n)).collect(),
            },
            range: self.span(4),
        })
    }

    pub fn use_all(&self, module: &str) -> ModuleItem {
        ModuleItem::Use(UseDeclaration {
            module: self.ident(module),
            import: UseKind::All,
            range: self.span(4),
        })
    }

    pub fn const_item(&self, name: &str, type_spec: Option<TypeSpec>, value: Expr) -> ModuleItem {
        self.const_item_at(self.ident(name), type_spec, value)
    }

    pub fn const_item_at(&self, name: Ident, type_spec: Option<TypeSpec>, value: Expr) -> ModuleItem {
        ModuleItem::Const(ConstDeclaration {
            name,
            is_pub: false,
            description: String::new(),
            type_spec,
            value,
            range: self.span(4),
        })
    }

    pub fn param(&self, name: &str, type_spec: TypeSpec) -> FunctionParameterDeclaration {
        FunctionParameterDeclaration {
            name: self.ident(name),
            type_spec: Some(type_spec),
            default_value: None,
        }
    }

    pub fn param_default(&self, name: &str, type_spec: TypeSpec, default: Expr) -> FunctionParameterDeclaration {
        FunctionParameterDeclaration {
            default_value: Some(default),
            ..self.param(name, type_spec)
        }
    }

    pub fn self_param(&self) -> FunctionParameterDeclaration {
        FunctionParameterDeclaration {
            name: self.ident("self"),
            type_spec: None,
            default_value: None,
        }
    }

    pub fn function(
        &self,
        name: &str,
        parameters: Vec<FunctionParameterDeclaration>,
        return_type: TypeSpec,
        body: Expr,
    ) -> FunctionDeclaration {
        self.function_at(self.ident(name), parameters, return_type, body)
    }

    pub fn function_at(
        &self,
        name: Ident,
        parameters: Vec<FunctionParameterDeclaration>,
        return_type: TypeSpec,
        body: Expr,
    ) -> FunctionDeclaration {
        FunctionDeclaration {
            name,
            is_pub: false,
            is_async: false,
            description: String::new(),
            parameters,
            return_type,
            body,
            range: self.span(4),
        }
    }

    pub fn fn_item(
        &self,
        name: &str,
        parameters: Vec<FunctionParameterDeclaration>,
        return_type: TypeSpec,
        body: Expr,
    ) -> ModuleItem {
        ModuleItem::Function(self.function(name, parameters, return_type, body))
    }

    pub fn struct_field(&self, name: &str, type_spec: TypeSpec) -> StructField {
        StructField {
            name: self.ident(name),
            type_spec,
            description: String::new(),
            default_value: None,
        }
    }

    pub fn struct_item(&self, name: &str, fields: Vec<StructField>) -> ModuleItem {
        ModuleItem::Struct(StructDeclaration {
            name: self.ident(name),
            is_pub: false,
            description: String::new(),
            fields,
            range: self.span(4),
        })
    }

    /// `struct Name(x: float, y: float)`.
    pub fn float_struct(&self, name: &str, fields: &[&str]) -> ModuleItem {
        let fields = fields
            .iter()
            .map(|f| self.struct_field(f, self.ty("float")))
            .collect();
        self.struct_item(name, fields)
    }

    pub fn type_alias(&self, name: &str, type_spec: TypeSpec) -> ModuleItem {
        ModuleItem::TypeAlias(TypeAliasDeclaration {
            name: self.ident(name),
            is_pub: false,
            description: String::new(),
            type_spec,
            range: self.span(4),
        })
    }

    pub fn impl_item(&self, name: &str, methods: Vec<FunctionDeclaration>) -> ModuleItem {
        ModuleItem::Impl(ImplDeclaration {
            name: self.ident(name),
            methods,
            range: self.span(4),
        })
    }

    pub fn impl_operators(&self, name: &str, functions: Vec<FunctionDeclaration>) -> ModuleItem {
        ModuleItem::ImplOperators(ImplOperatorsDeclaration {
            name: self.ident(name),
            functions,
            range: self.span(4),
        })
    }
}

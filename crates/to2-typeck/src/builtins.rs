//! Builtin and prelude type descriptors.
//!
//! Registers the primitive types (`int`, `float`, `bool`, `string`,
//! `Unit`) with their operator tables and the prelude types every module
//! can use without a `use` declaration (`Cell<T>`, `ArrayBuilder<T>`,
//! `Range`). These live outside any registry module and are addressed with
//! an empty module name.

use std::collections::BTreeMap;

use crate::operator::Operator;
use crate::registry::{
    FieldDescriptor, MethodDescriptor, OperatorDescriptor, ParameterDescriptor, TypeDescriptor,
};
use crate::typeref::TypeRef;

/// Names that resolve to builtin or prelude types in type annotations.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "int",
    "float",
    "bool",
    "string",
    "Unit",
    "Cell",
    "ArrayBuilder",
    "Range",
];

/// All builtin and prelude type descriptors.
pub fn builtin_types() -> Vec<TypeDescriptor> {
    vec![
        int_type(),
        float_type(),
        bool_type(),
        string_type(),
        unit_type(),
        cell_type(),
        array_builder_type(),
        range_type(),
    ]
}

// ── Helpers ────────────────────────────────────────────────────────────

fn t(name: &str) -> TypeRef {
    TypeRef::builtin(name)
}

fn ops(
    entries: Vec<(String, Vec<OperatorDescriptor>)>,
) -> BTreeMap<String, Vec<OperatorDescriptor>> {
    entries.into_iter().collect()
}

/// Overloads of one operator as `(other operand, result)` builtin names.
fn overloads(op: Operator, list: &[(&str, &str)]) -> (String, Vec<OperatorDescriptor>) {
    let list = list
        .iter()
        .map(|(other, result)| OperatorDescriptor {
            other_type: t(other),
            result_type: t(result),
        })
        .collect();
    (op.symbol().to_string(), list)
}

fn field(field_type: TypeRef, description: &str) -> FieldDescriptor {
    FieldDescriptor {
        field_type,
        description: description.to_string(),
        read_only: true,
    }
}

fn method(
    parameters: Vec<ParameterDescriptor>,
    return_type: TypeRef,
    description: &str,
) -> MethodDescriptor {
    MethodDescriptor {
        parameters,
        return_type,
        is_async: false,
        description: description.to_string(),
        generic_parameters: Vec::new(),
    }
}

fn to_string_method() -> MethodDescriptor {
    method(Vec::new(), t("string"), "Convert the value to a string")
}

// ── Primitives ─────────────────────────────────────────────────────────

fn int_type() -> TypeDescriptor {
    use Operator::*;

    let arith: &[(&str, &str)] = &[("int", "int"), ("float", "float")];
    let compare: &[(&str, &str)] = &[("int", "bool"), ("float", "bool")];
    let bitwise: &[(&str, &str)] = &[("int", "int")];
    TypeDescriptor {
        description: "Integer number".into(),
        fields: BTreeMap::from([
            ("to_float".to_string(), field(t("float"), "Value converted to float")),
            ("abs".to_string(), field(t("int"), "Absolute value")),
        ]),
        methods: BTreeMap::from([("to_string".to_string(), to_string_method())]),
        prefix_operators: ops(vec![
            overloads(Sub, &[("Unit", "int")]),
            overloads(BitNot, &[("Unit", "int")]),
        ]),
        suffix_operators: ops(vec![
            overloads(Add, arith),
            overloads(Sub, arith),
            overloads(Mul, arith),
            overloads(Div, arith),
            overloads(Mod, arith),
            overloads(Pow, arith),
            overloads(BitAnd, bitwise),
            overloads(BitOr, bitwise),
            overloads(BitXor, bitwise),
            overloads(Eq, compare),
            overloads(NotEq, compare),
            overloads(Lt, compare),
            overloads(Le, compare),
            overloads(Gt, compare),
            overloads(Ge, compare),
        ]),
        ..TypeDescriptor::new("int")
    }
}

fn float_type() -> TypeDescriptor {
    use Operator::*;

    let arith: &[(&str, &str)] = &[("float", "float")];
    let compare: &[(&str, &str)] = &[("float", "bool")];
    TypeDescriptor {
        description: "Floating point number".into(),
        fields: BTreeMap::from([
            ("to_int".to_string(), field(t("int"), "Value truncated to int")),
            ("abs".to_string(), field(t("float"), "Absolute value")),
            ("is_nan".to_string(), field(t("bool"), "Check if value is NaN")),
        ]),
        methods: BTreeMap::from([("to_string".to_string(), to_string_method())]),
        prefix_operators: ops(vec![overloads(Sub, &[("Unit", "float")])]),
        suffix_operators: ops(vec![
            overloads(Add, arith),
            overloads(Sub, arith),
            overloads(Mul, arith),
            overloads(Div, arith),
            overloads(Mod, arith),
            overloads(Pow, arith),
            overloads(Eq, compare),
            overloads(NotEq, compare),
            overloads(Lt, compare),
            overloads(Le, compare),
            overloads(Gt, compare),
            overloads(Ge, compare),
        ]),
        assignable_from: vec![t("int")],
        ..TypeDescriptor::new("float")
    }
}

fn bool_type() -> TypeDescriptor {
    use Operator::*;

    let logic: &[(&str, &str)] = &[("bool", "bool")];
    TypeDescriptor {
        description: "Boolean value".into(),
        methods: BTreeMap::from([("to_string".to_string(), to_string_method())]),
        prefix_operators: ops(vec![overloads(Not, &[("Unit", "bool")])]),
        suffix_operators: ops(vec![
            overloads(Eq, logic),
            overloads(NotEq, logic),
            overloads(BitAnd, logic),
            overloads(BitOr, logic),
            overloads(BitXor, logic),
        ]),
        ..TypeDescriptor::new("bool")
    }
}

fn string_type() -> TypeDescriptor {
    use Operator::*;

    let compare: &[(&str, &str)] = &[("string", "bool")];
    TypeDescriptor {
        description: "String value".into(),
        fields: BTreeMap::from([
            ("length".to_string(), field(t("int"), "Length of the string")),
            ("to_upper".to_string(), field(t("string"), "Upper case copy")),
            ("to_lower".to_string(), field(t("string"), "Lower case copy")),
        ]),
        methods: BTreeMap::from([
            (
                "contains".to_string(),
                method(
                    vec![ParameterDescriptor::new("other", t("string"))],
                    t("bool"),
                    "Check if the string contains a substring",
                ),
            ),
            (
                "split".to_string(),
                method(
                    vec![ParameterDescriptor::new("separator", t("string"))],
                    TypeRef::array(t("string")),
                    "Split the string at a separator",
                ),
            ),
        ]),
        suffix_operators: ops(vec![
            overloads(Add, &[("string", "string")]),
            overloads(Eq, compare),
            overloads(NotEq, compare),
            overloads(Lt, compare),
            overloads(Le, compare),
            overloads(Gt, compare),
            overloads(Ge, compare),
        ]),
        index_access: Some(t("string")),
        ..TypeDescriptor::new("string")
    }
}

fn unit_type() -> TypeDescriptor {
    TypeDescriptor {
        description: "Unit value".into(),
        assignable_from_any: true,
        ..TypeDescriptor::new("Unit")
    }
}

// ── Prelude ────────────────────────────────────────────────────────────

fn cell_type() -> TypeDescriptor {
    let t_param = TypeRef::generic("T");
    let cell_of_t = TypeRef::builtin_with("Cell", vec![t_param.clone()]);
    TypeDescriptor {
        description: "Mutable shared value".into(),
        generic_parameters: vec!["T".into()],
        fields: BTreeMap::from([(
            "value".to_string(),
            FieldDescriptor {
                field_type: t_param.clone(),
                description: "Current value of the cell".into(),
                read_only: false,
            },
        )]),
        methods: BTreeMap::from([(
            "update".to_string(),
            method(
                vec![ParameterDescriptor::new(
                    "updater",
                    TypeRef::function(vec![t_param.clone()], t_param),
                )],
                cell_of_t,
                "Atomically update the value of the cell",
            ),
        )]),
        ..TypeDescriptor::new("Cell")
    }
}

fn array_builder_type() -> TypeDescriptor {
    let t_param = TypeRef::generic("T");
    let builder_of_t = TypeRef::builtin_with("ArrayBuilder", vec![t_param.clone()]);
    TypeDescriptor {
        description: "Builder for arrays of unknown size".into(),
        generic_parameters: vec!["T".into()],
        fields: BTreeMap::from([(
            "length".to_string(),
            field(t("int"), "Number of elements appended so far"),
        )]),
        methods: BTreeMap::from([
            (
                "append".to_string(),
                method(
                    vec![ParameterDescriptor::new("element", t_param.clone())],
                    builder_of_t,
                    "Append an element",
                ),
            ),
            (
                "result".to_string(),
                method(Vec::new(), TypeRef::array(t_param), "Build the resulting array"),
            ),
        ]),
        ..TypeDescriptor::new("ArrayBuilder")
    }
}

fn range_type() -> TypeDescriptor {
    let u_param = TypeRef::generic("U");
    TypeDescriptor {
        description: "Range of integers".into(),
        fields: BTreeMap::from([
            ("from".to_string(), field(t("int"), "Start of the range (inclusive)")),
            ("to".to_string(), field(t("int"), "End of the range")),
            ("length".to_string(), field(t("int"), "Number of elements in the range")),
        ]),
        methods: BTreeMap::from([
            (
                "map".to_string(),
                MethodDescriptor {
                    generic_parameters: vec!["U".into()],
                    ..method(
                        vec![ParameterDescriptor::new(
                            "mapper",
                            TypeRef::function(vec![t("int")], u_param.clone()),
                        )],
                        TypeRef::array(u_param),
                        "Map every element of the range",
                    )
                },
            ),
            (
                "reverse".to_string(),
                method(Vec::new(), TypeRef::array(t("int")), "Reversed elements"),
            ),
        ]),
        for_in_source: Some(t("int")),
        ..TypeDescriptor::new("Range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_has_a_descriptor() {
        let types = builtin_types();
        for name in BUILTIN_TYPE_NAMES {
            assert!(types.iter().any(|t| t.name == *name), "missing {}", name);
        }
        assert_eq!(types.len(), BUILTIN_TYPE_NAMES.len());
    }

    #[test]
    fn int_overloads_prefer_int() {
        let int = int_type();
        let add = &int.suffix_operators["+"];
        assert_eq!(add[0].other_type, t("int"));
        assert_eq!(add[1].result_type, t("float"));
    }
}

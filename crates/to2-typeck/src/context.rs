//! Module-level symbol tables.
//!
//! A [`ModuleContext`] is created fresh for every validated module. Pass 1
//! fills its tables; pass 2 only reads them. [`ModuleScope`] layers the
//! "inside an impl block" view on top of the root context so `Self` resolves
//! to the struct being extended.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use to2_common::InputRange;

use crate::builtins::BUILTIN_TYPE_NAMES;
use crate::operator::Operator;
use crate::registry::{FunctionDescriptor, Registry, RegistryModule};
use crate::side_table::DefinitionRef;
use crate::ty::{FunctionParameter, FunctionType, QualifiedName, RealizedType};
use crate::typeref::resolve_type_ref;

/// A named value visible at module level: constant, function or method.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferencedValue {
    pub ty: RealizedType,
    pub definition: Option<DefinitionRef>,
    pub description: String,
}

impl ReferencedValue {
    pub fn new(ty: RealizedType) -> Self {
        ReferencedValue {
            ty,
            definition: None,
            description: String::new(),
        }
    }

    /// Declared by a registry module rather than the validated module.
    pub fn is_library(&self) -> bool {
        self.definition.is_none()
    }
}

/// A module-local type name: struct, type alias or imported type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAlias {
    pub ty: RealizedType,
    pub definition: Option<DefinitionRef>,
    pub is_struct: bool,
}

/// One operator overload attached by `impl operators`.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorEntry {
    pub other_type: RealizedType,
    pub result_type: RealizedType,
    pub definition: Option<DefinitionRef>,
}

/// Method and operator tables of a module-local struct.
///
/// `fields` is the canonical field list; record types embedded elsewhere
/// may hold an older snapshot when structs reference each other.
#[derive(Clone, Debug, Default)]
pub struct StructImpl {
    pub fields: Vec<(String, RealizedType)>,
    pub field_definitions: FxHashMap<String, DefinitionRef>,
    pub field_descriptions: FxHashMap<String, String>,
    /// Method signatures without the leading `self` parameter.
    pub methods: BTreeMap<String, ReferencedValue>,
    pub prefix_operators: FxHashMap<Operator, Vec<OperatorEntry>>,
    pub suffix_operators: FxHashMap<Operator, Vec<OperatorEntry>>,
}

/// Symbol tables of the module being validated.
#[derive(Debug)]
pub struct ModuleContext {
    pub registry: Arc<Registry>,
    pub module_name: String,
    pub mapped_constants: FxHashMap<String, ReferencedValue>,
    pub mapped_functions: FxHashMap<String, ReferencedValue>,
    /// Alias (or full module name) to registry module name.
    pub module_aliases: FxHashMap<String, String>,
    pub type_aliases: FxHashMap<String, TypeAlias>,
    pub structs: FxHashMap<String, StructImpl>,
}

impl ModuleContext {
    pub fn new(registry: Arc<Registry>, module_name: &str) -> Self {
        ModuleContext {
            registry,
            module_name: module_name.to_string(),
            mapped_constants: FxHashMap::default(),
            mapped_functions: FxHashMap::default(),
            module_aliases: FxHashMap::default(),
            type_aliases: FxHashMap::default(),
            structs: FxHashMap::default(),
        }
    }

    pub fn definition(&self, range: InputRange) -> DefinitionRef {
        DefinitionRef {
            module_name: self.module_name.clone(),
            range,
        }
    }

    /// Qualified name for a struct declared in this module.
    pub fn qualified(&self, name: &str) -> QualifiedName {
        QualifiedName::new(self.module_name.clone(), name)
    }

    /// Resolve a module reference, alias first.
    pub fn find_module(&self, name: &str) -> Option<&RegistryModule> {
        match self.module_aliases.get(name) {
            Some(module) => self.registry.module(module),
            None => self.registry.module(name),
        }
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructImpl> {
        self.structs.get(name)
    }

    /// Impl tables for a struct type, if it belongs to this module.
    pub fn struct_impl(&self, name: &QualifiedName) -> Option<&StructImpl> {
        if name.module == self.module_name {
            self.structs.get(&name.name)
        } else {
            None
        }
    }

    /// Resolve a type name: module-local aliases, then builtins, or a
    /// registry type when a module namespace is given.
    pub fn find_type(&self, namespace: Option<&str>, name: &str) -> Option<RealizedType> {
        match namespace {
            Some(namespace) => {
                let module = self.find_module(namespace)?;
                module.find_type(name)?;
                Some(RealizedType::Standard(QualifiedName::new(module.name(), name)))
            }
            None => {
                if let Some(alias) = self.type_aliases.get(name) {
                    return Some(alias.ty.clone());
                }
                if BUILTIN_TYPE_NAMES.contains(&name) {
                    return Some(RealizedType::Standard(QualifiedName::builtin(name)));
                }
                None
            }
        }
    }

    pub fn find_constant(&self, namespace: Option<&str>, name: &str) -> Option<ReferencedValue> {
        match namespace {
            Some(namespace) => {
                let module = self.find_module(namespace)?;
                let constant = module.find_constant(name)?;
                Some(ReferencedValue {
                    ty: resolve_type_ref(&self.registry, &constant.value_type, None),
                    definition: None,
                    description: constant.description.clone(),
                })
            }
            None => self.mapped_constants.get(name).cloned(),
        }
    }

    /// Resolve a function by name.
    ///
    /// The universally generic pseudo-constructors come first; they read the
    /// expected function type at the call site from `type_hint` to pick
    /// their signature. Then module-qualified functions, then functions
    /// declared in or imported into this module.
    pub fn find_function(
        &self,
        namespace: Option<&str>,
        name: &str,
        type_hint: Option<&RealizedType>,
    ) -> Option<ReferencedValue> {
        match namespace {
            Some(namespace) => {
                let module = self.find_module(namespace)?;
                let function = module.find_function(name)?;
                Some(ReferencedValue {
                    ty: self.library_function_type(function),
                    definition: None,
                    description: function.description.clone(),
                })
            }
            None => pseudo_constructor(name, type_hint)
                .map(ReferencedValue::new)
                .or_else(|| self.mapped_functions.get(name).cloned()),
        }
    }

    /// Realize a registry function descriptor, keeping its own generic
    /// parameters open as placeholders.
    pub fn library_function_type(&self, function: &FunctionDescriptor) -> RealizedType {
        let generics = function
            .generic_parameters
            .iter()
            .map(|g| (g.clone(), RealizedType::Generic(g.clone())))
            .collect();
        RealizedType::Function(FunctionType {
            is_async: function.is_async,
            generic_parameters: function.generic_parameters.clone(),
            parameters: function
                .parameters
                .iter()
                .map(|p| FunctionParameter {
                    name: p.name.clone(),
                    ty: resolve_type_ref(&self.registry, &p.param_type, Some(&generics)),
                    has_default: p.has_default,
                })
                .collect(),
            return_type: Box::new(resolve_type_ref(
                &self.registry,
                &function.return_type,
                Some(&generics),
            )),
        })
    }
}

/// Signature of a pseudo-constructor. With a hint whose return type has
/// the matching shape the signature is concrete; otherwise it is generic
/// and the call site guesses the placeholders from the arguments.
fn pseudo_constructor(name: &str, type_hint: Option<&RealizedType>) -> Option<RealizedType> {
    let expected = type_hint
        .and_then(RealizedType::as_function)
        .map(|f| f.return_type.as_ref());
    let t = || RealizedType::generic("T");
    let e = || RealizedType::generic("E");
    let generic = |params: &[&str], parameters: Vec<FunctionParameter>, ret: RealizedType| {
        RealizedType::Function(FunctionType {
            is_async: false,
            generic_parameters: params.iter().map(|p| p.to_string()).collect(),
            parameters,
            return_type: Box::new(ret),
        })
    };
    let concrete = |parameters: Vec<FunctionParameter>, ret: &RealizedType| {
        RealizedType::Function(FunctionType::new(parameters, ret.clone()))
    };

    let ty = match (name, expected) {
        ("Some", Some(ret @ RealizedType::Option(inner))) => {
            concrete(vec![FunctionParameter::new("value", (**inner).clone())], ret)
        }
        ("Some", _) => generic(
            &["T"],
            vec![FunctionParameter::new("value", t())],
            RealizedType::option(t()),
        ),
        ("None", Some(ret @ RealizedType::Option(_))) => concrete(Vec::new(), ret),
        ("None", _) => generic(&["T"], Vec::new(), RealizedType::option(t())),
        ("Ok", Some(ret @ RealizedType::Result(ok, _))) => {
            concrete(vec![FunctionParameter::new("value", (**ok).clone())], ret)
        }
        ("Ok", _) => generic(
            &["T", "E"],
            vec![FunctionParameter::new("value", t())],
            RealizedType::result(t(), e()),
        ),
        ("Err", Some(ret @ RealizedType::Result(_, err))) => {
            concrete(vec![FunctionParameter::new("error", (**err).clone())], ret)
        }
        ("Err", _) => generic(
            &["T", "E"],
            vec![FunctionParameter::new("error", e())],
            RealizedType::result(t(), e()),
        ),
        ("Cell", Some(ret @ RealizedType::Bound(b)))
            if b.base.is_builtin() && b.base.name == "Cell" =>
        {
            let value = b.arguments.first().cloned().unwrap_or(RealizedType::Unknown);
            concrete(vec![FunctionParameter::new("value", value)], ret)
        }
        ("Cell", _) => generic(
            &["T"],
            vec![FunctionParameter::new("value", t())],
            RealizedType::bound(QualifiedName::builtin("Cell"), vec![t()]),
        ),
        ("ArrayBuilder", Some(ret @ RealizedType::Bound(b)))
            if b.base.is_builtin() && b.base.name == "ArrayBuilder" =>
        {
            concrete(vec![FunctionParameter::new("capacity", RealizedType::int())], ret)
        }
        ("ArrayBuilder", _) => generic(
            &["T"],
            vec![FunctionParameter::new("capacity", RealizedType::int())],
            RealizedType::bound(QualifiedName::builtin("ArrayBuilder"), vec![t()]),
        ),
        _ => return None,
    };
    Some(ty)
}

/// The module-level view used while validating an item.
#[derive(Clone, Copy, Debug)]
pub enum ModuleScope<'a> {
    Root(&'a ModuleContext),
    /// Inside `impl StructName { ... }`.
    Impl {
        root: &'a ModuleContext,
        struct_name: &'a str,
        struct_type: &'a RealizedType,
    },
}

impl<'a> ModuleScope<'a> {
    pub fn root(&self) -> &'a ModuleContext {
        match self {
            ModuleScope::Root(root) | ModuleScope::Impl { root, .. } => root,
        }
    }

    /// The type of `self` inside an impl block.
    pub fn self_type(&self) -> Option<&'a RealizedType> {
        match self {
            ModuleScope::Root(_) => None,
            ModuleScope::Impl { struct_type, .. } => Some(struct_type),
        }
    }

    pub fn struct_name(&self) -> Option<&'a str> {
        match self {
            ModuleScope::Root(_) => None,
            ModuleScope::Impl { struct_name, .. } => Some(struct_name),
        }
    }

    /// Like [`ModuleContext::find_type`], with `Self` bound inside impls.
    pub fn find_type(&self, namespace: Option<&str>, name: &str) -> Option<RealizedType> {
        if namespace.is_none() && name == "Self" {
            return self.self_type().cloned();
        }
        self.root().find_type(namespace, name)
    }
}

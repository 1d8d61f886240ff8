//! The registry: an immutable catalogue of host and library modules.
//!
//! Modules are described by serialized descriptors (usually JSON generated
//! from the host object model). The registry is built once at startup,
//! never mutated afterwards and shared between validation runs behind an
//! `Arc`, so concurrent validations of independent modules are safe.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::builtins;
use crate::typeref::TypeRef;

/// Errors raised while loading registry descriptors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed registry descriptors: {0}")]
    Json(#[from] serde_json::Error),
}

/// A module exported by the host or a library.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Empty in the map form, where the key names the module.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub constants: Vec<ConstantDescriptor>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub value_type: TypeRef,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeRef,
    #[serde(default)]
    pub has_default: bool,
}

impl ParameterDescriptor {
    pub fn new(name: &str, param_type: TypeRef) -> Self {
        ParameterDescriptor {
            name: name.to_string(),
            param_type,
            has_default: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
}

/// One overload of an operator: the type of the other operand and the
/// result type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    pub other_type: TypeRef,
    pub result_type: TypeRef,
}

/// A type exported by a module.
///
/// Operator tables are keyed by the operator symbol. The order of the
/// overload list is significant: lookup takes the first entry whose other
/// operand accepts the actual operand.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDescriptor>,
    #[serde(default)]
    pub methods: BTreeMap<String, MethodDescriptor>,
    #[serde(default)]
    pub prefix_operators: BTreeMap<String, Vec<OperatorDescriptor>>,
    #[serde(default)]
    pub suffix_operators: BTreeMap<String, Vec<OperatorDescriptor>>,
    #[serde(default)]
    pub for_in_source: Option<TypeRef>,
    #[serde(default)]
    pub index_access: Option<TypeRef>,
    #[serde(default)]
    pub assignable_from: Vec<TypeRef>,
    #[serde(default)]
    pub assignable_from_any: bool,
}

impl TypeDescriptor {
    pub fn new(name: &str) -> Self {
        TypeDescriptor {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// A module inside the registry, with name indexes over its exports.
#[derive(Debug)]
pub struct RegistryModule {
    pub descriptor: ModuleDescriptor,
    types: FxHashMap<String, usize>,
    functions: FxHashMap<String, usize>,
    constants: FxHashMap<String, usize>,
}

impl RegistryModule {
    fn new(descriptor: ModuleDescriptor) -> Self {
        let index = |names: Vec<&String>| -> FxHashMap<String, usize> {
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect()
        };
        let types = index(descriptor.types.iter().map(|t| &t.name).collect());
        let functions = index(descriptor.functions.iter().map(|f| &f.name).collect());
        let constants = index(descriptor.constants.iter().map(|c| &c.name).collect());
        RegistryModule {
            descriptor,
            types,
            functions,
            constants,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn description(&self) -> &str {
        &self.descriptor.description
    }

    pub fn find_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name).map(|&i| &self.descriptor.types[i])
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions
            .get(name)
            .map(|&i| &self.descriptor.functions[i])
    }

    pub fn find_constant(&self, name: &str) -> Option<&ConstantDescriptor> {
        self.constants
            .get(name)
            .map(|&i| &self.descriptor.constants[i])
    }
}

/// The registry of all modules available to TO2 scripts.
///
/// The builtin and prelude types live outside any module and are addressed
/// with an empty module name.
#[derive(Debug)]
pub struct Registry {
    modules: FxHashMap<String, RegistryModule>,
    builtins: FxHashMap<String, TypeDescriptor>,
}

impl Registry {
    /// Build a registry from module descriptors. If two descriptors share a
    /// name, the later one wins.
    pub fn new(modules: impl IntoIterator<Item = ModuleDescriptor>) -> Self {
        let builtins = builtins::builtin_types()
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        let mut indexed = FxHashMap::default();
        for module in modules {
            tracing::trace!(module = %module.name, types = module.types.len(), "registering module");
            if let Some(previous) = indexed.insert(module.name.clone(), RegistryModule::new(module)) {
                tracing::warn!(module = %previous.name(), "duplicate module descriptor replaced");
            }
        }
        Registry {
            modules: indexed,
            builtins,
        }
    }

    /// A registry with only the builtin and prelude types.
    pub fn empty() -> Self {
        Registry::new(Vec::new())
    }

    /// Load descriptors from JSON. Accepts either an array of modules or an
    /// object mapping module names to modules.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Descriptors {
            List(Vec<ModuleDescriptor>),
            Map(BTreeMap<String, ModuleDescriptor>),
        }

        let modules = match serde_json::from_str::<Descriptors>(json)? {
            Descriptors::List(modules) => modules,
            Descriptors::Map(modules) => modules
                .into_iter()
                .map(|(name, mut module)| {
                    if module.name.is_empty() {
                        module.name = name;
                    }
                    module
                })
                .collect(),
        };
        tracing::debug!(modules = modules.len(), "loaded registry descriptors");
        Ok(Registry::new(modules))
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Registry::from_json(&json)
    }

    pub fn module(&self, name: &str) -> Option<&RegistryModule> {
        self.modules.get(name)
    }

    /// Module names in sorted order.
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn builtin_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.builtins.get(name)
    }

    /// Look up a type by module and name. An empty module name addresses
    /// the builtin and prelude types.
    pub fn find_type(&self, module: &str, name: &str) -> Option<&TypeDescriptor> {
        if module.is_empty() {
            self.builtin_type(name)
        } else {
            self.module(module)?.find_type(name)
        }
    }
}

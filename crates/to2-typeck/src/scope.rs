//! Lexical scopes for block and function bodies.
//!
//! Scopes live in an arena and point at their parent by index. A child
//! never outlives the walk of its parent, so an index is all the back
//! reference it needs.

use rustc_hash::FxHashMap;

use crate::context::ModuleContext;
use crate::side_table::DefinitionRef;
use crate::ty::RealizedType;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

#[derive(Clone, Debug, PartialEq)]
pub enum ScopeKind {
    Block,
    Loop,
    /// Function or lambda body. `return` inside it checks against
    /// `return_type`.
    Function { return_type: RealizedType },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocalVariable {
    pub ty: RealizedType,
    pub definition: Option<DefinitionRef>,
    pub is_const: bool,
    pub is_parameter: bool,
}

#[derive(Debug)]
pub struct Scope {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    locals: FxHashMap<String, LocalVariable>,
}

/// Where a resolved name came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableSource {
    Local { is_const: bool, is_parameter: bool },
    Constant,
    Function,
}

/// The result of [`ScopeArena::find_variable`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedVariable {
    pub ty: RealizedType,
    pub definition: Option<DefinitionRef>,
    pub description: String,
    pub source: VariableSource,
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent,
            kind,
            locals: FxHashMap::default(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Drop every scope created after the arena had `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.scopes.truncate(len);
    }

    fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    /// Declare a variable in `scope`. Returns the variable it replaces in
    /// that same scope, if any; outer scopes are shadowed, not replaced.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        variable: LocalVariable,
    ) -> Option<LocalVariable> {
        self.scopes[scope.0 as usize]
            .locals
            .insert(name.to_string(), variable)
    }

    /// Innermost local with this name, walking parent links.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&LocalVariable> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let Some(var) = s.locals.get(name) {
                return Some(var);
            }
            current = s.parent;
        }
        None
    }

    /// Resolve a plain name: locals innermost to outermost, then module
    /// constants, then module functions.
    pub fn find_variable(
        &self,
        ctx: &ModuleContext,
        scope: ScopeId,
        name: &str,
        type_hint: Option<&RealizedType>,
    ) -> Option<ResolvedVariable> {
        if let Some(local) = self.lookup_local(scope, name) {
            return Some(ResolvedVariable {
                ty: local.ty.clone(),
                definition: local.definition.clone(),
                description: String::new(),
                source: VariableSource::Local {
                    is_const: local.is_const,
                    is_parameter: local.is_parameter,
                },
            });
        }
        if let Some(constant) = ctx.find_constant(None, name) {
            return Some(ResolvedVariable {
                ty: constant.ty,
                definition: constant.definition,
                description: constant.description,
                source: VariableSource::Constant,
            });
        }
        ctx.find_function(None, name, type_hint)
            .map(|function| ResolvedVariable {
                ty: function.ty,
                definition: function.definition,
                description: function.description,
                source: VariableSource::Function,
            })
    }

    /// Whether `break`/`continue` are legal here: a loop scope is reachable
    /// without crossing a function boundary.
    pub fn in_loop(&self, scope: ScopeId) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            match s.kind {
                ScopeKind::Loop => return true,
                ScopeKind::Function { .. } => return false,
                ScopeKind::Block => current = s.parent,
            }
        }
        false
    }

    /// Declared return type of the innermost enclosing function or lambda.
    pub fn return_type(&self, scope: ScopeId) -> Option<&RealizedType> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let ScopeKind::Function { return_type } = &s.kind {
                return Some(return_type);
            }
            current = s.parent;
        }
        None
    }
}

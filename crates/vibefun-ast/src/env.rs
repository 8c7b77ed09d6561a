//! The checker's environment: value and type namespaces, plus the current
//! `level` that generalization and instantiation are defined relative to.

use crate::types::{Level, Scheme, TOP_LEVEL};
use indexmap::IndexMap;
use vibefun_util::{Span, Symbol};

/// A normal let-bound or constructor value, or an FFI external.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    Value { scheme: Scheme, location: Span },
    External {
        scheme: Scheme,
        js_name: String,
        module: Option<String>,
        /// Arity-indexed overload table; empty for a non-overloaded
        /// external (exactly one entry, whose key is its own arity).
        overloads: IndexMap<usize, Scheme>,
    },
}

impl Binding {
    pub fn scheme(&self) -> &Scheme {
        match self {
            Binding::Value { scheme, .. } => scheme,
            Binding::External { scheme, .. } => scheme,
        }
    }
}

/// A constructor belonging to a declared variant type: its name, argument
/// types (before instantiation), and the generic parameters of its owner.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorInfo {
    pub name: Symbol,
    pub owner: Symbol,
    pub arg_types: Vec<crate::types::Type>,
    pub owner_generics: Vec<Symbol>,
}

/// What a declared type name means: a transparent alias, a closed variant,
/// or an external type known only by name (no further structure).
#[derive(Clone, Debug, PartialEq)]
pub enum TypeInfo {
    /// `generics[i]` names the declaration's `i`-th type parameter;
    /// `generic_ids[i]` is the fresh `TypeVarId` environment construction
    /// allocated for it when resolving `body` (see
    /// `vibefun-check::env::resolve_alias`). A use site applying concrete
    /// arguments substitutes `generic_ids` for those arguments in `body`.
    Alias { generics: Vec<Symbol>, generic_ids: Vec<crate::types::TypeVarId>, body: crate::types::Type },
    Variant { generics: Vec<Symbol>, constructors: Vec<ConstructorInfo> },
    Opaque,
}

/// `(values, types, level)` — the environment threaded through inference.
/// Cloning is cheap: `IndexMap` sharing aside, every environment snapshot
/// taken at a `let`-RHS boundary is a real clone, since entries removed by
/// exiting a scope must not affect the parent.
#[derive(Clone, Debug, Default)]
pub struct Env {
    values: IndexMap<Symbol, Binding>,
    types: IndexMap<Symbol, TypeInfo>,
    level: Level,
}

impl Env {
    pub fn new() -> Self {
        Self { values: IndexMap::new(), types: IndexMap::new(), level: TOP_LEVEL }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Enter a `let`-RHS: increase the level so variables allocated while
    /// inferring the RHS are not generalizable from an outer scope.
    pub fn enter_level(&mut self) {
        self.level += 1;
    }

    pub fn exit_level(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn bind_value(&mut self, name: Symbol, binding: Binding) {
        self.values.insert(name, binding);
    }

    pub fn lookup_value(&self, name: Symbol) -> Option<&Binding> {
        self.values.get(&name)
    }

    pub fn bind_type(&mut self, name: Symbol, info: TypeInfo) {
        self.types.insert(name, info);
    }

    pub fn lookup_type(&self, name: Symbol) -> Option<&TypeInfo> {
        self.types.get(&name)
    }

    /// Every free `TypeVarId` reachable from any binding currently in
    /// scope. `generalize` must not quantify a variable that appears here
    /// even if its level would otherwise allow it.
    pub fn free_type_vars(&self) -> Vec<(crate::types::TypeVarId, Level)> {
        let mut out = Vec::new();
        for binding in self.values.values() {
            match binding {
                Binding::Value { scheme, .. } => collect_scheme_free_vars(scheme, &mut out),
                Binding::External { scheme, overloads, .. } => {
                    collect_scheme_free_vars(scheme, &mut out);
                    overloads.values().for_each(|s| collect_scheme_free_vars(s, &mut out));
                }
            }
        }
        out
    }

    pub fn value_names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.values.keys().copied()
    }

    pub fn type_names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.types.keys().copied()
    }
}

fn collect_scheme_free_vars(scheme: &Scheme, out: &mut Vec<(crate::types::TypeVarId, Level)>) {
    let mut vars = Vec::new();
    scheme.body.free_vars(&mut vars);
    for (id, level) in vars {
        if !scheme.quantified.contains(&id) {
            out.push((id, level));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn level_tracks_enter_and_exit() {
        let mut env = Env::new();
        assert_eq!(env.level(), TOP_LEVEL);
        env.enter_level();
        assert_eq!(env.level(), TOP_LEVEL + 1);
        env.exit_level();
        assert_eq!(env.level(), TOP_LEVEL);
    }

    #[test]
    fn bind_and_lookup_value_round_trips() {
        let mut env = Env::new();
        let name = Symbol::intern("x");
        env.bind_value(
            name,
            Binding::Value { scheme: Scheme::monomorphic(Type::int()), location: Span::DUMMY },
        );
        assert!(env.lookup_value(name).is_some());
        assert!(env.lookup_value(Symbol::intern("y")).is_none());
    }

    #[test]
    fn free_type_vars_excludes_quantified_ones() {
        let mut env = Env::new();
        let quantified_var = Type::Var { id: crate::types::TypeVarId(0), level: 1 };
        let scheme = Scheme { quantified: vec![crate::types::TypeVarId(0)], body: quantified_var };
        env.bind_value(Symbol::intern("id"), Binding::Value { scheme, location: Span::DUMMY });
        assert!(env.free_type_vars().is_empty());
    }
}

//! The unification engine: `fresh`, `instantiate`, `generalize`, `unify`
//! (§4.3 "Key operations"). Everything here is substitution-threaded rather
//! than constraint-collecting: each call resolves immediately against the
//! current substitution, so there is no separate solve phase.

use crate::error::{CheckError, CheckWarning};
use rustc_hash::{FxHashMap, FxHashSet};
use vibefun_ast::{Env, Level, Scheme, Type, TypeVarId};
use vibefun_util::Span;

/// Owns the substitution map and the per-variable level table, plus the
/// counter that mints fresh `TypeVarId`s. Threaded explicitly through
/// inference rather than kept as thread-local or global state (§9 "Global
/// state").
#[derive(Default)]
pub struct InferCtx {
    next_var: u32,
    subst: FxHashMap<TypeVarId, Type>,
    /// Canonical level of every allocated variable. This is the source of
    /// truth for generalization, not the `level` field embedded in a
    /// `Type::Var` occurrence, which can go stale: unifying a variable with
    /// a term lowers the levels of that term's own free variables (the
    /// SML-style level-adjustment rule), and an already-copied `Type::Var`
    /// elsewhere in the tree has no way to observe that after the fact.
    var_levels: FxHashMap<TypeVarId, Level>,
    /// Non-fatal diagnostics accumulated during inference (currently just
    /// unreachable-pattern warnings, §4.5). Threaded the same way as the
    /// substitution itself rather than returned out of every call that
    /// might produce one.
    pub warnings: Vec<CheckWarning>,
}

impl InferCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh unification variable at `level`.
    pub fn fresh(&mut self, level: Level) -> Type {
        let id = TypeVarId(self.next_var);
        self.next_var += 1;
        self.var_levels.insert(id, level);
        Type::Var { id, level }
    }

    fn canonical_level(&self, id: TypeVarId) -> Level {
        self.var_levels.get(&id).copied().unwrap_or(0)
    }

    fn lower_level(&mut self, id: TypeVarId, new_level: Level) {
        let entry = self.var_levels.entry(id).or_insert(new_level);
        if new_level < *entry {
            *entry = new_level;
        }
    }

    /// Shallow resolution: follow one step of the substitution if `ty` is
    /// a bound variable, otherwise return it unchanged. Used internally by
    /// `unify` before pattern-matching on a type's shape.
    fn resolve_shallow<'a>(&'a self, ty: &'a Type) -> &'a Type {
        let mut current = ty;
        while let Type::Var { id, .. } = current {
            match self.subst.get(id) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Fully resolve `ty`, replacing every bound variable (transitively)
    /// with its substitution, and refreshing every remaining free
    /// variable's `level` field from the canonical table.
    pub fn resolve(&self, ty: &Type) -> Type {
        match self.resolve_shallow(ty) {
            Type::Var { id, .. } => Type::Var { id: *id, level: self.canonical_level(*id) },
            Type::Const(name) => Type::Const(*name),
            Type::App { ctor, args } => {
                Type::App { ctor: *ctor, args: args.iter().map(|a| self.resolve(a)).collect() }
            }
            Type::Function { params, result } => Type::Function {
                params: params.iter().map(|p| self.resolve(p)).collect(),
                result: Box::new(self.resolve(result)),
            },
            Type::Record(fields) => {
                Type::Record(fields.iter().map(|(n, t)| (*n, self.resolve(t))).collect())
            }
            Type::Union(members) => Type::Union(members.iter().map(|m| self.resolve(m)).collect()),
        }
    }

    /// Instantiate `scheme` at `level`: every quantified variable is
    /// replaced by a fresh variable allocated at `level`; free variables in
    /// the scheme's body are left untouched.
    pub fn instantiate(&mut self, scheme: &Scheme, level: Level) -> Type {
        if scheme.quantified.is_empty() {
            return scheme.body.clone();
        }
        let mapping: FxHashMap<TypeVarId, Type> =
            scheme.quantified.iter().map(|id| (*id, self.fresh(level))).collect();
        substitute_vars(&scheme.body, &mapping)
    }

    /// Generalize `ty` at `level`: quantify every free variable whose
    /// canonical level is greater than `level` and that does not also
    /// occur free in `env`. Callers are responsible for the value
    /// restriction (only calling this for syntactic values); this function
    /// only implements the level-based quantification rule.
    pub fn generalize(&self, env: &Env, level: Level, ty: &Type) -> Scheme {
        let resolved = self.resolve(ty);
        let env_free: FxHashSet<TypeVarId> =
            env.free_type_vars().into_iter().map(|(id, _)| id).collect();

        let mut occurring = Vec::new();
        resolved.free_vars(&mut occurring);

        let mut quantified = Vec::new();
        let mut seen = FxHashSet::default();
        for (id, _) in occurring {
            let canonical = self.canonical_level(id);
            if canonical > level && !env_free.contains(&id) && seen.insert(id) {
                quantified.push(id);
            }
        }
        Scheme { quantified, body: resolved }
    }

    /// Unify `t1` and `t2`, recording substitutions on success. On failure
    /// returns the first mismatch encountered; no partial unification is
    /// rolled back (the caller discards the whole declaration's derivation
    /// per §4.3 "Failure semantics", so a half-applied substitution is
    /// harmless — it is never consulted again once the error propagates).
    pub fn unify(&mut self, t1: &Type, t2: &Type, span: Span) -> Result<(), CheckError> {
        let a = self.resolve_shallow(t1).clone();
        let b = self.resolve_shallow(t2).clone();

        match (&a, &b) {
            (Type::Var { id: id1, .. }, Type::Var { id: id2, .. }) if id1 == id2 => Ok(()),
            (Type::Var { id, .. }, other) => self.bind(*id, other, span),
            (other, Type::Var { id, .. }) => self.bind(*id, other, span),

            (Type::Const(n1), Type::Const(n2)) => {
                if n1 == n2 {
                    Ok(())
                } else {
                    Err(CheckError::TypeMismatch { expected: a, found: b, span })
                }
            }

            (Type::App { ctor: c1, args: a1 }, Type::App { ctor: c2, args: a2 }) => {
                // Nominal (I7): names must match, not merely structure.
                if c1 != c2 {
                    return Err(CheckError::VariantNameMismatch { expected: *c1, found: *c2, span });
                }
                if a1.len() != a2.len() {
                    return Err(CheckError::TypeApplicationArityMismatch {
                        ctor: *c1,
                        expected: a1.len(),
                        found: a2.len(),
                        span,
                    });
                }
                for (x, y) in a1.iter().zip(a2) {
                    self.unify(x, y, span)?;
                }
                Ok(())
            }

            (Type::Function { .. }, Type::Function { .. }) => self.unify_functions(&a, &b, span),

            (Type::Record(f1), Type::Record(f2)) => self.unify_records_equal(f1, f2, span),

            (Type::Union(members), other) | (other, Type::Union(members)) => {
                if members.len() == 1 {
                    self.unify(&members[0], other, span)
                } else if members.iter().any(|m| self.would_unify(m, other)) {
                    // Accept when `other` matches exactly one member;
                    // narrow by actually unifying with that member.
                    let matching = members
                        .iter()
                        .find(|m| self.would_unify(m, other))
                        .cloned()
                        .expect("just checked existence");
                    self.unify(&matching, other, span)
                } else {
                    Err(CheckError::TypeMismatch { expected: a.clone(), found: b.clone(), span })
                }
            }

            _ => Err(CheckError::TypeMismatch { expected: a, found: b, span }),
        }
    }

    /// Unify a function argument's record type against a parameter's
    /// record type under width subtyping: `arg` must contain at least
    /// every field `param` declares (extra fields are permitted).
    pub fn unify_record_subtype(
        &mut self,
        param: &Type,
        arg: &Type,
        span: Span,
    ) -> Result<(), CheckError> {
        let param_r = self.resolve_shallow(param).clone();
        let arg_r = self.resolve_shallow(arg).clone();
        match (&param_r, &arg_r) {
            (Type::Record(pf), Type::Record(af)) => {
                for (name, pty) in pf {
                    match af.get(name) {
                        Some(aty) => self.unify(pty, aty, span)?,
                        None => {
                            return Err(CheckError::TypeMismatch {
                                expected: param_r.clone(),
                                found: arg_r.clone(),
                                span,
                            })
                        }
                    }
                }
                Ok(())
            }
            _ => self.unify(param, arg, span),
        }
    }

    /// A non-mutating probe: would `t1` and `t2` unify, if attempted? Used
    /// only to pick a `Union` member to narrow against; never used to
    /// decide a final success/failure on its own, since it discards any
    /// substitutions it would have made.
    fn would_unify(&self, t1: &Type, t2: &Type) -> bool {
        let mut probe = InferCtx {
            next_var: self.next_var,
            subst: self.subst.clone(),
            var_levels: self.var_levels.clone(),
            warnings: Vec::new(),
        };
        probe.unify(t1, t2, Span::DUMMY).is_ok()
    }

    /// Unify a callee's type against an application's argument types,
    /// returning the result type. When the callee is already known to be a
    /// `Function` of matching arity, each argument position is checked with
    /// [`Self::unify_record_subtype`] so a record argument may carry extra
    /// fields (width subtyping, §8); otherwise falls back to ordinary
    /// unification against a fresh `Function` shape (curried/polymorphic
    /// callees), which does not get subtyping but still type-checks.
    pub fn unify_application(
        &mut self,
        func_ty: &Type,
        arg_types: &[Type],
        level: Level,
        span: Span,
    ) -> Result<Type, CheckError> {
        let resolved = self.resolve_shallow(func_ty).clone();
        match &resolved {
            Type::Function { params, result } if params.len() == arg_types.len() => {
                let params = params.clone();
                let result = (**result).clone();
                for (p, a) in params.iter().zip(arg_types) {
                    self.unify_record_subtype(p, a, span)?;
                }
                Ok(result)
            }
            _ => {
                let result = self.fresh(level);
                let shape = Type::Function { params: arg_types.to_vec(), result: Box::new(result.clone()) };
                self.unify(&resolved, &shape, span)?;
                Ok(result)
            }
        }
    }

    /// `Function([A1..An], R)` vs `Function([B1..Bm], S)`: unify pointwise
    /// if arities match; otherwise treat both sides as curried chains and
    /// align head-by-head, so `(A,B)->C` unifies with `A->B->C`.
    fn unify_functions(&mut self, a: &Type, b: &Type, span: Span) -> Result<(), CheckError> {
        let (p1, r1) = match a {
            Type::Function { params, result } => (params.clone(), (**result).clone()),
            _ => unreachable!("caller already matched Function"),
        };
        let (p2, r2) = match b {
            Type::Function { params, result } => (params.clone(), (**result).clone()),
            _ => unreachable!("caller already matched Function"),
        };

        if p1.len() == p2.len() {
            for (x, y) in p1.iter().zip(&p2) {
                self.unify(x, y, span)?;
            }
            return self.unify(&r1, &r2, span);
        }

        let curried_a = Type::Function { params: p1, result: Box::new(r1) }.curry();
        let curried_b = Type::Function { params: p2, result: Box::new(r2) }.curry();
        self.unify_curried_chains(&curried_a, &curried_b, span)
    }

    fn unify_curried_chains(&mut self, a: &Type, b: &Type, span: Span) -> Result<(), CheckError> {
        match (a, b) {
            (
                Type::Function { params: pa, result: ra },
                Type::Function { params: pb, result: rb },
            ) if pa.len() == 1 && pb.len() == 1 => {
                self.unify(&pa[0], &pb[0], span)?;
                self.unify_curried_chains(ra, rb, span)
            }
            _ => self.unify(a, b, span),
        }
    }

    /// `Record(f1)` vs `Record(f2)` at a plain unification position (not a
    /// subtype check): intersect field names and require the common ones
    /// to unify. Fields present on only one side are *not* an error here —
    /// width subtyping means a record type is only ever fully pinned down
    /// by the context that consumes it (an annotation, a constructor's
    /// declared field set), not by unifying two record types against each
    /// other.
    fn unify_records_equal(
        &mut self,
        f1: &std::collections::BTreeMap<vibefun_util::Symbol, Type>,
        f2: &std::collections::BTreeMap<vibefun_util::Symbol, Type>,
        span: Span,
    ) -> Result<(), CheckError> {
        for (name, t1) in f1 {
            if let Some(t2) = f2.get(name) {
                self.unify(t1, t2, span)?;
            }
        }
        Ok(())
    }

    fn bind(&mut self, id: TypeVarId, ty: &Type, span: Span) -> Result<(), CheckError> {
        let resolved = self.resolve(ty);
        if resolved.occurs(id) {
            return Err(CheckError::InfiniteType {
                var: Type::Var { id, level: self.canonical_level(id) },
                ty: resolved,
                span,
            });
        }
        let target_level = self.canonical_level(id);
        let mut free = Vec::new();
        resolved.free_vars(&mut free);
        for (other, _) in free {
            self.lower_level(other, target_level);
        }
        self.subst.insert(id, resolved);
        Ok(())
    }
}

/// Replace every `Type::Var` whose id is a key of `mapping` with its image;
/// leaves every other variable untouched. Used by `instantiate`, which
/// only ever substitutes a scheme's quantified variables.
pub(crate) fn substitute_vars(ty: &Type, mapping: &FxHashMap<TypeVarId, Type>) -> Type {
    match ty {
        Type::Var { id, .. } => mapping.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Const(_) => ty.clone(),
        Type::App { ctor, args } => {
            Type::App { ctor: *ctor, args: args.iter().map(|a| substitute_vars(a, mapping)).collect() }
        }
        Type::Function { params, result } => Type::Function {
            params: params.iter().map(|p| substitute_vars(p, mapping)).collect(),
            result: Box::new(substitute_vars(result, mapping)),
        },
        Type::Record(fields) => {
            Type::Record(fields.iter().map(|(n, t)| (*n, substitute_vars(t, mapping))).collect())
        }
        Type::Union(members) => {
            Type::Union(members.iter().map(|m| substitute_vars(m, mapping)).collect())
        }
    }
}

//! Universal traversal utilities over the Core AST: free-variable
//! analysis, capture-avoiding substitution, α-renaming, location-ignoring
//! structural equality, and the size/effect probes the optimizer's
//! invariants (O1-O3) are stated in terms of.

use crate::expr::{BinOp, Expr, FieldPattern, LetRecBinding, MatchCase, Pattern, RecordItem, UnOp};
use std::collections::HashSet;
use vibefun_util::Symbol;

/// Every free variable occurring in `expr`, i.e. every `Var` not bound by
/// an enclosing `Lambda`, `Let`, `LetRecExpr`, or `Match` pattern.
pub fn free_vars(expr: &Expr) -> HashSet<Symbol> {
    let mut out = HashSet::new();
    collect_free_vars(expr, &mut out);
    out
}

fn collect_free_vars(expr: &Expr, out: &mut HashSet<Symbol>) {
    match expr {
        Expr::IntLit { .. }
        | Expr::FloatLit { .. }
        | Expr::StringLit { .. }
        | Expr::BoolLit { .. }
        | Expr::UnitLit { .. } => {}
        Expr::Var { name, .. } => {
            out.insert(*name);
        }
        Expr::Lambda { param, body, .. } => {
            let mut inner = HashSet::new();
            collect_free_vars(body, &mut inner);
            remove_pattern_bindings(param, &mut inner);
            out.extend(inner);
        }
        Expr::App { func, args, .. } => {
            collect_free_vars(func, out);
            args.iter().for_each(|a| collect_free_vars(a, out));
        }
        Expr::Let { pattern, value, body, .. } => {
            collect_free_vars(value, out);
            let mut inner = HashSet::new();
            collect_free_vars(body, &mut inner);
            remove_pattern_bindings(pattern, &mut inner);
            out.extend(inner);
        }
        Expr::LetRecExpr { bindings, body, .. } => {
            let mut inner = HashSet::new();
            collect_free_vars(body, &mut inner);
            for b in bindings {
                collect_free_vars(&b.value, &mut inner);
            }
            for b in bindings {
                remove_pattern_bindings(&b.pattern, &mut inner);
            }
            out.extend(inner);
        }
        Expr::Match { scrutinee, cases, .. } => {
            collect_free_vars(scrutinee, out);
            for case in cases {
                let mut inner = HashSet::new();
                collect_free_vars(&case.body, &mut inner);
                if let Some(guard) = &case.guard {
                    collect_free_vars(guard, &mut inner);
                }
                remove_pattern_bindings(&case.pattern, &mut inner);
                out.extend(inner);
            }
        }
        Expr::Record { fields, .. } => {
            for f in fields {
                match f {
                    RecordItem::Field { value, .. } => collect_free_vars(value, out),
                    RecordItem::Spread { expr } => collect_free_vars(expr, out),
                }
            }
        }
        Expr::RecordAccess { record, .. } => collect_free_vars(record, out),
        Expr::RecordUpdate { record, updates, .. } => {
            collect_free_vars(record, out);
            for f in updates {
                match f {
                    RecordItem::Field { value, .. } => collect_free_vars(value, out),
                    RecordItem::Spread { expr } => collect_free_vars(expr, out),
                }
            }
        }
        Expr::Variant { args, .. } => args.iter().for_each(|a| collect_free_vars(a, out)),
        Expr::BinOp { left, right, .. } => {
            collect_free_vars(left, out);
            collect_free_vars(right, out);
        }
        Expr::UnaryOp { expr, .. } => collect_free_vars(expr, out),
        Expr::TypeAnnotation { expr, .. } => collect_free_vars(expr, out),
        Expr::Unsafe { expr, .. } => collect_free_vars(expr, out),
    }
}

fn remove_pattern_bindings(pattern: &Pattern, set: &mut HashSet<Symbol>) {
    let mut bound = Vec::new();
    pattern.bound_names(&mut bound);
    for name in bound {
        set.remove(&name);
    }
}

/// Capture-avoiding substitution: replaces every free occurrence of `name`
/// in `expr` with `replacement`. Any binder that would capture a name free
/// in `replacement` is α-renamed to a fresh name (via `fresh`) before the
/// substitution descends into its scope (optimizer invariant O3).
pub fn subst(expr: &Expr, name: Symbol, replacement: &Expr, fresh: &mut impl FnMut() -> Symbol) -> Expr {
    let repl_free = free_vars(replacement);
    subst_inner(expr, name, replacement, &repl_free, fresh)
}

fn subst_inner(
    expr: &Expr,
    name: Symbol,
    replacement: &Expr,
    repl_free: &HashSet<Symbol>,
    fresh: &mut impl FnMut() -> Symbol,
) -> Expr {
    match expr {
        Expr::Var { name: v, .. } if *v == name => replacement.clone(),
        Expr::IntLit { .. }
        | Expr::FloatLit { .. }
        | Expr::StringLit { .. }
        | Expr::BoolLit { .. }
        | Expr::UnitLit { .. }
        | Expr::Var { .. } => expr.clone(),
        Expr::Lambda { param, body, id, span } => {
            let (param, body) = subst_under_binder(param, body, name, replacement, repl_free, fresh);
            Expr::Lambda { param: Box::new(param), body: Box::new(body), id: *id, span: *span }
        }
        Expr::App { func, args, id, span } => Expr::App {
            func: Box::new(subst_inner(func, name, replacement, repl_free, fresh)),
            args: args.iter().map(|a| subst_inner(a, name, replacement, repl_free, fresh)).collect(),
            id: *id,
            span: *span,
        },
        Expr::Let { pattern, value, body, mutable, recursive, id, span } => {
            let value = subst_inner(value, name, replacement, repl_free, fresh);
            let (pattern, body) = subst_under_binder(pattern, body, name, replacement, repl_free, fresh);
            Expr::Let {
                pattern: Box::new(pattern),
                value: Box::new(value),
                body: Box::new(body),
                mutable: *mutable,
                recursive: *recursive,
                id: *id,
                span: *span,
            }
        }
        Expr::LetRecExpr { bindings, body, id, span } => {
            let renames = alpha_rename_group(bindings, repl_free, fresh);
            let bindings = bindings
                .iter()
                .map(|b| LetRecBinding {
                    pattern: rename_pattern(&b.pattern, &renames),
                    value: subst_inner(
                        &rename_free_vars(&b.value, &renames),
                        name,
                        replacement,
                        repl_free,
                        fresh,
                    ),
                    mutable: b.mutable,
                })
                .collect();
            let body = subst_inner(&rename_free_vars(body, &renames), name, replacement, repl_free, fresh);
            Expr::LetRecExpr { bindings, body: Box::new(body), id: *id, span: *span }
        }
        Expr::Match { scrutinee, cases, id, span } => Expr::Match {
            scrutinee: Box::new(subst_inner(scrutinee, name, replacement, repl_free, fresh)),
            cases: cases
                .iter()
                .map(|case| {
                    let renames = capturing_renames(&case.pattern, repl_free, fresh);
                    let pattern = rename_pattern(&case.pattern, &renames);
                    let guard = case.guard.as_ref().map(|g| {
                        subst_inner(&rename_free_vars(g, &renames), name, replacement, repl_free, fresh)
                    });
                    let body =
                        subst_inner(&rename_free_vars(&case.body, &renames), name, replacement, repl_free, fresh);
                    MatchCase { pattern, guard, body }
                })
                .collect(),
            id: *id,
            span: *span,
        },
        Expr::Record { fields, id, span } => Expr::Record {
            fields: subst_record_items(fields, name, replacement, repl_free, fresh),
            id: *id,
            span: *span,
        },
        Expr::RecordAccess { record, field, id, span } => Expr::RecordAccess {
            record: Box::new(subst_inner(record, name, replacement, repl_free, fresh)),
            field: *field,
            id: *id,
            span: *span,
        },
        Expr::RecordUpdate { record, updates, id, span } => Expr::RecordUpdate {
            record: Box::new(subst_inner(record, name, replacement, repl_free, fresh)),
            updates: subst_record_items(updates, name, replacement, repl_free, fresh),
            id: *id,
            span: *span,
        },
        Expr::Variant { ctor, args, id, span } => Expr::Variant {
            ctor: *ctor,
            args: args.iter().map(|a| subst_inner(a, name, replacement, repl_free, fresh)).collect(),
            id: *id,
            span: *span,
        },
        Expr::BinOp { op, left, right, id, span } => Expr::BinOp {
            op: *op,
            left: Box::new(subst_inner(left, name, replacement, repl_free, fresh)),
            right: Box::new(subst_inner(right, name, replacement, repl_free, fresh)),
            id: *id,
            span: *span,
        },
        Expr::UnaryOp { op, expr: e, id, span } => Expr::UnaryOp {
            op: *op,
            expr: Box::new(subst_inner(e, name, replacement, repl_free, fresh)),
            id: *id,
            span: *span,
        },
        Expr::TypeAnnotation { expr: e, ty, id, span } => Expr::TypeAnnotation {
            expr: Box::new(subst_inner(e, name, replacement, repl_free, fresh)),
            ty: ty.clone(),
            id: *id,
            span: *span,
        },
        Expr::Unsafe { expr: e, id, span } => {
            // (I3 / O1) Unsafe subtrees are never rewritten; substitution
            // still must happen for correctness (the binder above it is
            // real), but nothing else touches this subtree afterward.
            Expr::Unsafe {
                expr: Box::new(subst_inner(e, name, replacement, repl_free, fresh)),
                id: *id,
                span: *span,
            }
        }
    }
}

fn subst_record_items(
    items: &[RecordItem],
    name: Symbol,
    replacement: &Expr,
    repl_free: &HashSet<Symbol>,
    fresh: &mut impl FnMut() -> Symbol,
) -> Vec<RecordItem> {
    items
        .iter()
        .map(|item| match item {
            RecordItem::Field { name: field, value } => RecordItem::Field {
                name: *field,
                value: subst_inner(value, name, replacement, repl_free, fresh),
            },
            RecordItem::Spread { expr } => {
                RecordItem::Spread { expr: subst_inner(expr, name, replacement, repl_free, fresh) }
            }
        })
        .collect()
}

/// Substitute under a single binder (`Lambda`/`Let`): if the pattern binds
/// a name free in the replacement, rename that binding (and its uses in
/// the body) to a fresh name before substituting into the body.
fn subst_under_binder(
    pattern: &Pattern,
    body: &Expr,
    name: Symbol,
    replacement: &Expr,
    repl_free: &HashSet<Symbol>,
    fresh: &mut impl FnMut() -> Symbol,
) -> (Pattern, Expr) {
    let renames = capturing_renames(pattern, repl_free, fresh);
    let pattern = rename_pattern(pattern, &renames);
    let body = rename_free_vars(body, &renames);
    let body = subst_inner(&body, name, replacement, repl_free, fresh);
    (pattern, body)
}

/// Which of a pattern's bound names shadow a name free in the replacement,
/// each mapped to a freshly minted replacement name.
fn capturing_renames(
    pattern: &Pattern,
    repl_free: &HashSet<Symbol>,
    fresh: &mut impl FnMut() -> Symbol,
) -> Vec<(Symbol, Symbol)> {
    let mut bound = Vec::new();
    pattern.bound_names(&mut bound);
    bound.into_iter().filter(|b| repl_free.contains(b)).map(|b| (b, fresh())).collect()
}

fn alpha_rename_group(
    bindings: &[LetRecBinding],
    repl_free: &HashSet<Symbol>,
    fresh: &mut impl FnMut() -> Symbol,
) -> Vec<(Symbol, Symbol)> {
    let mut renames = Vec::new();
    for b in bindings {
        renames.extend(capturing_renames(&b.pattern, repl_free, fresh));
    }
    renames
}

fn rename_pattern(pattern: &Pattern, renames: &[(Symbol, Symbol)]) -> Pattern {
    match pattern {
        Pattern::Wildcard { .. } | Pattern::Literal { .. } => pattern.clone(),
        Pattern::Var { name, span } => {
            let renamed = renames.iter().find(|(from, _)| from == name).map(|(_, to)| *to);
            Pattern::Var { name: renamed.unwrap_or(*name), span: *span }
        }
        Pattern::Variant { ctor, args, span } => Pattern::Variant {
            ctor: *ctor,
            args: args.iter().map(|p| rename_pattern(p, renames)).collect(),
            span: *span,
        },
        Pattern::Record { fields, span } => Pattern::Record {
            fields: fields
                .iter()
                .map(|f| FieldPattern { name: f.name, pattern: rename_pattern(&f.pattern, renames) })
                .collect(),
            span: *span,
        },
    }
}

/// Rename every free occurrence of a renamed name throughout `expr`
/// (without touching any nested binder that reuses the same name, which
/// `subst_inner`'s own binder handling already takes care of correctly
/// since renames only ever target *this* binder's fresh shadow).
fn rename_free_vars(expr: &Expr, renames: &[(Symbol, Symbol)]) -> Expr {
    if renames.is_empty() {
        return expr.clone();
    }
    let mut result = expr.clone();
    for (from, to) in renames {
        let mut gen = {
            let to = *to;
            move || to
        };
        result = subst_inner(
            &result,
            *from,
            &Expr::Var { name: *to, id: expr.id(), span: expr.span() },
            &HashSet::from([*to]),
            &mut gen,
        );
    }
    result
}

/// α-rename every name bound anywhere in `expr` to a fresh name, used by
/// tests and by passes that need a syntactically distinct copy.
pub fn alpha_rename(expr: &Expr, fresh: &mut impl FnMut() -> Symbol) -> Expr {
    match expr {
        Expr::Lambda { param, body, id, span } => {
            let mut bound = Vec::new();
            param.bound_names(&mut bound);
            let renames: Vec<_> = bound.into_iter().map(|b| (b, fresh())).collect();
            let param = rename_pattern(param, &renames);
            let body = alpha_rename(&rename_free_vars(body, &renames), fresh);
            Expr::Lambda { param: Box::new(param), body: Box::new(body), id: *id, span: *span }
        }
        other => other.clone(),
    }
}

/// Structural equality over Core, ignoring `Span` — the optimizer's fixed
/// point is defined in terms of this, not `Expr`'s derived `PartialEq`
/// (which would treat two α-equivalent or re-spanned trees as different).
pub fn core_eq(a: &Expr, b: &Expr) -> bool {
    use Expr::*;
    match (a, b) {
        (IntLit { value: v1, .. }, IntLit { value: v2, .. }) => v1 == v2,
        (FloatLit { value: v1, .. }, FloatLit { value: v2, .. }) => v1 == v2,
        (StringLit { value: v1, .. }, StringLit { value: v2, .. }) => v1 == v2,
        (BoolLit { value: v1, .. }, BoolLit { value: v2, .. }) => v1 == v2,
        (UnitLit { .. }, UnitLit { .. }) => true,
        (Var { name: n1, .. }, Var { name: n2, .. }) => n1 == n2,
        (Lambda { param: p1, body: b1, .. }, Lambda { param: p2, body: b2, .. }) => {
            pattern_eq(p1, p2) && core_eq(b1, b2)
        }
        (App { func: f1, args: a1, .. }, App { func: f2, args: a2, .. }) => {
            core_eq(f1, f2) && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| core_eq(x, y))
        }
        (
            Let { pattern: p1, value: v1, body: b1, mutable: m1, recursive: r1, .. },
            Let { pattern: p2, value: v2, body: b2, mutable: m2, recursive: r2, .. },
        ) => m1 == m2 && r1 == r2 && pattern_eq(p1, p2) && core_eq(v1, v2) && core_eq(b1, b2),
        (LetRecExpr { bindings: bs1, body: b1, .. }, LetRecExpr { bindings: bs2, body: b2, .. }) => {
            bs1.len() == bs2.len()
                && bs1.iter().zip(bs2).all(|(x, y)| {
                    x.mutable == y.mutable && pattern_eq(&x.pattern, &y.pattern) && core_eq(&x.value, &y.value)
                })
                && core_eq(b1, b2)
        }
        (Match { scrutinee: s1, cases: c1, .. }, Match { scrutinee: s2, cases: c2, .. }) => {
            core_eq(s1, s2)
                && c1.len() == c2.len()
                && c1.iter().zip(c2).all(|(x, y)| {
                    pattern_eq(&x.pattern, &y.pattern)
                        && option_eq(&x.guard, &y.guard, core_eq)
                        && core_eq(&x.body, &y.body)
                })
        }
        (Record { fields: f1, .. }, Record { fields: f2, .. }) => record_items_eq(f1, f2),
        (RecordAccess { record: r1, field: n1, .. }, RecordAccess { record: r2, field: n2, .. }) => {
            n1 == n2 && core_eq(r1, r2)
        }
        (
            RecordUpdate { record: r1, updates: u1, .. },
            RecordUpdate { record: r2, updates: u2, .. },
        ) => core_eq(r1, r2) && record_items_eq(u1, u2),
        (Variant { ctor: c1, args: a1, .. }, Variant { ctor: c2, args: a2, .. }) => {
            c1 == c2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| core_eq(x, y))
        }
        (BinOp { op: o1, left: l1, right: r1, .. }, BinOp { op: o2, left: l2, right: r2, .. }) => {
            o1 == o2 && core_eq(l1, l2) && core_eq(r1, r2)
        }
        (UnaryOp { op: o1, expr: e1, .. }, UnaryOp { op: o2, expr: e2, .. }) => o1 == o2 && core_eq(e1, e2),
        (TypeAnnotation { expr: e1, ty: t1, .. }, TypeAnnotation { expr: e2, ty: t2, .. }) => {
            t1 == t2 && core_eq(e1, e2)
        }
        (Unsafe { expr: e1, .. }, Unsafe { expr: e2, .. }) => core_eq(e1, e2),
        _ => false,
    }
}

fn option_eq<T>(a: &Option<T>, b: &Option<T>, eq: impl Fn(&T, &T) -> bool) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn record_items_eq(a: &[RecordItem], b: &[RecordItem]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| match (x, y) {
            (RecordItem::Field { name: n1, value: v1 }, RecordItem::Field { name: n2, value: v2 }) => {
                n1 == n2 && core_eq(v1, v2)
            }
            (RecordItem::Spread { expr: e1 }, RecordItem::Spread { expr: e2 }) => core_eq(e1, e2),
            _ => false,
        })
}

fn pattern_eq(a: &Pattern, b: &Pattern) -> bool {
    match (a, b) {
        (Pattern::Wildcard { .. }, Pattern::Wildcard { .. }) => true,
        (Pattern::Var { name: n1, .. }, Pattern::Var { name: n2, .. }) => n1 == n2,
        (Pattern::Literal { value: v1, .. }, Pattern::Literal { value: v2, .. }) => v1 == v2,
        (Pattern::Variant { ctor: c1, args: a1, .. }, Pattern::Variant { ctor: c2, args: a2, .. }) => {
            c1 == c2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| pattern_eq(x, y))
        }
        (Pattern::Record { fields: f1, .. }, Pattern::Record { fields: f2, .. }) => {
            f1.len() == f2.len()
                && f1.iter().zip(f2).all(|(x, y)| x.name == y.name && pattern_eq(&x.pattern, &y.pattern))
        }
        _ => false,
    }
}

/// Node count, used by the inliner's size/use policy (`K = 20`, `size <= 5`
/// thresholds) and by `optimize`'s pre/post metrics.
pub fn size(expr: &Expr) -> usize {
    1 + match expr {
        Expr::IntLit { .. }
        | Expr::FloatLit { .. }
        | Expr::StringLit { .. }
        | Expr::BoolLit { .. }
        | Expr::UnitLit { .. }
        | Expr::Var { .. } => 0,
        Expr::Lambda { body, .. } => size(body),
        Expr::App { func, args, .. } => size(func) + args.iter().map(|a| size(a)).sum::<usize>(),
        Expr::Let { value, body, .. } => size(value) + size(body),
        Expr::LetRecExpr { bindings, body, .. } => {
            bindings.iter().map(|b| size(&b.value)).sum::<usize>() + size(body)
        }
        Expr::Match { scrutinee, cases, .. } => {
            size(scrutinee)
                + cases
                    .iter()
                    .map(|c| size(&c.body) + c.guard.as_ref().map(size).unwrap_or(0))
                    .sum::<usize>()
        }
        Expr::Record { fields, .. } => fields.iter().map(record_item_size).sum(),
        Expr::RecordAccess { record, .. } => size(record),
        Expr::RecordUpdate { record, updates, .. } => {
            size(record) + updates.iter().map(record_item_size).sum::<usize>()
        }
        Expr::Variant { args, .. } => args.iter().map(|a| size(a)).sum(),
        Expr::BinOp { left, right, .. } => size(left) + size(right),
        Expr::UnaryOp { expr, .. } => size(expr),
        Expr::TypeAnnotation { expr, .. } => size(expr),
        Expr::Unsafe { expr, .. } => size(expr),
    }
}

fn record_item_size(item: &RecordItem) -> usize {
    match item {
        RecordItem::Field { value, .. } => size(value),
        RecordItem::Spread { expr } => size(expr),
    }
}

/// Whether `expr` contains an `Unsafe` subtree anywhere, including itself.
pub fn contains_unsafe(expr: &Expr) -> bool {
    matches!(expr, Expr::Unsafe { .. }) || any_child(expr, contains_unsafe)
}

/// Whether `expr` contains a `Ref` constructor, a `Deref`, or an `Assign`
/// anywhere — the test optimizer invariant O2 is stated over. `Ref(_)` is
/// a regular `Variant` with that constructor name; `Deref` is the shared
/// `UnaryOp::LogicalNotOrDeref` spelling, which this conservatively treats
/// as a possible deref since disambiguation needs type information this
/// purely-syntactic probe does not have.
pub fn contains_ref_effect(expr: &Expr) -> bool {
    match expr {
        Expr::Variant { ctor, .. } if ctor.as_str() == "Ref" => true,
        Expr::BinOp { op: BinOp::Assign, .. } => true,
        Expr::UnaryOp { op: UnOp::LogicalNotOrDeref, .. } => true,
        _ => any_child(expr, contains_ref_effect),
    }
}

fn any_child(expr: &Expr, pred: impl Fn(&Expr) -> bool + Copy) -> bool {
    match expr {
        Expr::IntLit { .. }
        | Expr::FloatLit { .. }
        | Expr::StringLit { .. }
        | Expr::BoolLit { .. }
        | Expr::UnitLit { .. }
        | Expr::Var { .. } => false,
        Expr::Lambda { body, .. } => pred(body),
        Expr::App { func, args, .. } => pred(func) || args.iter().any(|a| pred(a)),
        Expr::Let { value, body, .. } => pred(value) || pred(body),
        Expr::LetRecExpr { bindings, body, .. } => bindings.iter().any(|b| pred(&b.value)) || pred(body),
        Expr::Match { scrutinee, cases, .. } => {
            pred(scrutinee) || cases.iter().any(|c| pred(&c.body) || c.guard.as_ref().is_some_and(|g| pred(g)))
        }
        Expr::Record { fields, .. } => fields.iter().any(|f| record_item_matches(f, pred)),
        Expr::RecordAccess { record, .. } => pred(record),
        Expr::RecordUpdate { record, updates, .. } => {
            pred(record) || updates.iter().any(|f| record_item_matches(f, pred))
        }
        Expr::Variant { args, .. } => args.iter().any(|a| pred(a)),
        Expr::BinOp { left, right, .. } => pred(left) || pred(right),
        Expr::UnaryOp { expr, .. } => pred(expr),
        Expr::TypeAnnotation { expr, .. } => pred(expr),
        Expr::Unsafe { expr, .. } => pred(expr),
    }
}

fn record_item_matches(item: &RecordItem, pred: impl Fn(&Expr) -> bool) -> bool {
    match item {
        RecordItem::Field { value, .. } => pred(value),
        RecordItem::Spread { expr } => pred(expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprId;
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    fn var(name: &str, n: u32) -> Expr {
        Expr::Var { name: Symbol::intern(name), id: id(n), span: Span::DUMMY }
    }

    #[test]
    fn free_vars_excludes_lambda_parameter() {
        let body = var("x", 0);
        let lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(body),
            id: id(1),
            span: Span::DUMMY,
        };
        assert!(free_vars(&lambda).is_empty());
    }

    #[test]
    fn free_vars_includes_unbound_name() {
        let lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(var("y", 0)),
            id: id(1),
            span: Span::DUMMY,
        };
        let fv = free_vars(&lambda);
        assert!(fv.contains(&Symbol::intern("y")));
        assert!(!fv.contains(&Symbol::intern("x")));
    }

    #[test]
    fn subst_replaces_free_occurrence() {
        let mut counter = 0u32;
        let mut fresh = move || {
            counter += 1;
            Symbol::intern(&format!("fresh{counter}"))
        };
        let expr = var("x", 0);
        let replacement = Expr::IntLit { value: 42, id: id(1), span: Span::DUMMY };
        let result = subst(&expr, Symbol::intern("x"), &replacement, &mut fresh);
        assert!(core_eq(&result, &replacement));
    }

    #[test]
    fn subst_alpha_renames_capturing_binder() {
        // ((y) -> let x = 1 in y) [x := x_outer]   (x_outer is "x" itself)
        let inner_let = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            value: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            body: Box::new(var("y", 1)),
            mutable: false,
            recursive: false,
            id: id(2),
            span: Span::DUMMY,
        };
        let lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("y"), span: Span::DUMMY }),
            body: Box::new(inner_let),
            id: id(3),
            span: Span::DUMMY,
        };

        let mut counter = 0u32;
        let mut fresh = move || {
            counter += 1;
            Symbol::intern(&format!("x${counter}"))
        };
        let outer_x = var("x", 4);
        let result = subst(&lambda, Symbol::intern("x"), &outer_x, &mut fresh);

        // The inner `let x = 1` must have been renamed away from `x`.
        if let Expr::Lambda { body, .. } = result {
            if let Expr::Let { pattern, .. } = *body {
                if let Pattern::Var { name, .. } = *pattern {
                    assert_ne!(name, Symbol::intern("x"));
                } else {
                    panic!("expected Var pattern");
                }
            } else {
                panic!("expected Let body");
            }
        } else {
            panic!("expected Lambda");
        }
    }

    #[test]
    fn core_eq_ignores_span_and_id() {
        let a = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        let b = Expr::IntLit { value: 1, id: id(99), span: Span::new(1, 2, 3, 4, vibefun_util::FileId(0)) };
        assert!(core_eq(&a, &b));
    }

    #[test]
    fn contains_unsafe_detects_nested_subtree() {
        let inner = Expr::Unsafe {
            expr: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            id: id(1),
            span: Span::DUMMY,
        };
        let outer = Expr::Lambda {
            param: Box::new(Pattern::Wildcard { span: Span::DUMMY }),
            body: Box::new(inner),
            id: id(2),
            span: Span::DUMMY,
        };
        assert!(contains_unsafe(&outer));
    }

    #[test]
    fn contains_ref_effect_detects_ref_constructor() {
        let r = Expr::Variant {
            ctor: Symbol::intern("Ref"),
            args: vec![Expr::IntLit { value: 0, id: id(0), span: Span::DUMMY }],
            id: id(1),
            span: Span::DUMMY,
        };
        assert!(contains_ref_effect(&r));
        assert!(!contains_ref_effect(&Expr::IntLit { value: 0, id: id(2), span: Span::DUMMY }));
    }

    #[test]
    fn size_counts_every_node() {
        let e = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            right: Box::new(Expr::IntLit { value: 2, id: id(1), span: Span::DUMMY }),
            id: id(2),
            span: Span::DUMMY,
        };
        assert_eq!(size(&e), 3);
    }
}

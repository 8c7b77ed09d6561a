//! Inline expansion (§4.7): replaces `Let(Var n, v, body, ¬mut, ¬rec)` by
//! `body[n ↦ v]` under a size/use policy. Trivial values (literals,
//! variables) are always inlined; single-use values are inlined up to
//! size 20; at `O2` a multi-use value is inlined only if its size is ≤ 5.
//! Never inlines a value containing `Unsafe` or a `Ref` effect (O2).

use crate::pass::{OptLevel, Pass, PassContext};
use crate::traverse::map_children;
use vibefun_ast::{contains_ref_effect, contains_unsafe, size, subst, Expr, Pattern, RecordItem};
use vibefun_util::Symbol;

const SINGLE_USE_SIZE_CAP: usize = 20;
const MULTI_USE_SIZE_CAP: usize = 5;

pub struct InlineExpansion;

impl Pass for InlineExpansion {
    fn name(&self) -> &'static str {
        "inline-expansion"
    }

    fn can_apply(&self, _expr: &Expr) -> bool {
        true
    }

    fn apply(&self, expr: &Expr, ctx: &mut PassContext) -> Expr {
        sweep(expr, ctx)
    }
}

fn sweep(expr: &Expr, ctx: &mut PassContext) -> Expr {
    let expr = map_children(expr, |child| sweep(child, ctx));
    try_inline(&expr, ctx)
}

fn try_inline(expr: &Expr, ctx: &mut PassContext) -> Expr {
    if let Expr::Let { pattern, value, body, mutable, recursive, .. } = expr {
        if !*mutable && !*recursive {
            if let Pattern::Var { name, .. } = pattern.as_ref() {
                if should_inline(*name, value, body, ctx.level()) {
                    return subst(body, *name, value, &mut || ctx.fresh());
                }
            }
        }
    }
    expr.clone()
}

fn should_inline(name: Symbol, value: &Expr, body: &Expr, level: OptLevel) -> bool {
    if contains_unsafe(value) || contains_ref_effect(value) {
        return false;
    }
    if is_trivial(value) {
        return true;
    }
    match count_free_occurrences(name, body) {
        0 => false, // dead-code elimination's job, not inlining's
        1 => size(value) <= SINGLE_USE_SIZE_CAP,
        _ => level == OptLevel::O2 && size(value) <= MULTI_USE_SIZE_CAP,
    }
}

fn is_trivial(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::IntLit { .. }
            | Expr::FloatLit { .. }
            | Expr::StringLit { .. }
            | Expr::BoolLit { .. }
            | Expr::UnitLit { .. }
            | Expr::Var { .. }
    )
}

/// How many free occurrences of `name` appear in `expr`, respecting
/// shadowing the same way [`vibefun_ast::free_vars`] does — this is its
/// counting cousin, needed only here for the inliner's single-use/
/// multi-use distinction.
fn count_free_occurrences(name: Symbol, expr: &Expr) -> usize {
    match expr {
        Expr::IntLit { .. }
        | Expr::FloatLit { .. }
        | Expr::StringLit { .. }
        | Expr::BoolLit { .. }
        | Expr::UnitLit { .. } => 0,
        Expr::Var { name: v, .. } => usize::from(*v == name),
        Expr::Lambda { param, body, .. } => {
            if binds(param, name) {
                0
            } else {
                count_free_occurrences(name, body)
            }
        }
        Expr::App { func, args, .. } => {
            count_free_occurrences(name, func) + args.iter().map(|a| count_free_occurrences(name, a)).sum::<usize>()
        }
        Expr::Let { pattern, value, body, .. } => {
            count_free_occurrences(name, value)
                + if binds(pattern, name) { 0 } else { count_free_occurrences(name, body) }
        }
        Expr::LetRecExpr { bindings, body, .. } => {
            if bindings.iter().any(|b| binds(&b.pattern, name)) {
                0
            } else {
                bindings.iter().map(|b| count_free_occurrences(name, &b.value)).sum::<usize>()
                    + count_free_occurrences(name, body)
            }
        }
        Expr::Match { scrutinee, cases, .. } => {
            count_free_occurrences(name, scrutinee)
                + cases
                    .iter()
                    .map(|c| {
                        if binds(&c.pattern, name) {
                            0
                        } else {
                            c.guard.as_ref().map(|g| count_free_occurrences(name, g)).unwrap_or(0)
                                + count_free_occurrences(name, &c.body)
                        }
                    })
                    .sum::<usize>()
        }
        Expr::Record { fields, .. } => fields.iter().map(|f| record_item_count(name, f)).sum(),
        Expr::RecordAccess { record, .. } => count_free_occurrences(name, record),
        Expr::RecordUpdate { record, updates, .. } => {
            count_free_occurrences(name, record) + updates.iter().map(|f| record_item_count(name, f)).sum::<usize>()
        }
        Expr::Variant { args, .. } => args.iter().map(|a| count_free_occurrences(name, a)).sum(),
        Expr::BinOp { left, right, .. } => {
            count_free_occurrences(name, left) + count_free_occurrences(name, right)
        }
        Expr::UnaryOp { expr: inner, .. } => count_free_occurrences(name, inner),
        Expr::TypeAnnotation { expr: inner, .. } => count_free_occurrences(name, inner),
        Expr::Unsafe { expr: inner, .. } => count_free_occurrences(name, inner),
    }
}

fn binds(pattern: &Pattern, name: Symbol) -> bool {
    let mut out = Vec::new();
    pattern.bound_names(&mut out);
    out.contains(&name)
}

fn record_item_count(name: Symbol, item: &RecordItem) -> usize {
    match item {
        RecordItem::Field { value, .. } => count_free_occurrences(name, value),
        RecordItem::Spread { expr } => count_free_occurrences(name, expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{core_eq, BinOp, ExprId};
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn always_inlines_a_trivial_value() {
        let body = Expr::Var { name: Symbol::intern("n"), id: id(0), span: Span::DUMMY };
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("n"), span: Span::DUMMY }),
            value: Box::new(Expr::IntLit { value: 7, id: id(1), span: Span::DUMMY }),
            body: Box::new(body),
            mutable: false,
            recursive: false,
            id: id(2),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(OptLevel::O1);
        let result = sweep(&let_expr, &mut ctx);
        assert!(core_eq(&result, &Expr::IntLit { value: 7, id: id(1), span: Span::DUMMY }));
    }

    #[test]
    fn refuses_to_inline_a_ref_carrying_value_used_twice() {
        let value = Expr::Variant {
            ctor: Symbol::intern("Ref"),
            args: vec![Expr::IntLit { value: 0, id: id(0), span: Span::DUMMY }],
            id: id(1),
            span: Span::DUMMY,
        };
        let body = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(Expr::Var { name: Symbol::intern("r"), id: id(2), span: Span::DUMMY }),
            right: Box::new(Expr::Var { name: Symbol::intern("r"), id: id(3), span: Span::DUMMY }),
            id: id(4),
            span: Span::DUMMY,
        };
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("r"), span: Span::DUMMY }),
            value: Box::new(value),
            body: Box::new(body),
            mutable: false,
            recursive: false,
            id: id(5),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(OptLevel::O2);
        let result = sweep(&let_expr, &mut ctx);
        assert!(matches!(result, Expr::Let { .. }));
    }

    #[test]
    fn multi_use_inlining_requires_o2_and_small_size() {
        let value = Expr::IntLit { value: 3, id: id(0), span: Span::DUMMY };
        // not trivial-by-literal path: wrap so it is a BinOp, size 3, used twice.
        let value = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(value),
            right: Box::new(Expr::IntLit { value: 1, id: id(1), span: Span::DUMMY }),
            id: id(2),
            span: Span::DUMMY,
        };
        let body = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(Expr::Var { name: Symbol::intern("n"), id: id(3), span: Span::DUMMY }),
            right: Box::new(Expr::Var { name: Symbol::intern("n"), id: id(4), span: Span::DUMMY }),
            id: id(5),
            span: Span::DUMMY,
        };
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("n"), span: Span::DUMMY }),
            value: Box::new(value),
            body: Box::new(body),
            mutable: false,
            recursive: false,
            id: id(6),
            span: Span::DUMMY,
        };

        let mut o1_ctx = PassContext::new(OptLevel::O1);
        assert!(matches!(sweep(&let_expr, &mut o1_ctx), Expr::Let { .. }));

        let mut o2_ctx = PassContext::new(OptLevel::O2);
        assert!(!matches!(sweep(&let_expr, &mut o2_ctx), Expr::Let { .. }));
    }
}

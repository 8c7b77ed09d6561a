//! A single post-order traversal helper every pass builds its sweep on:
//! rebuild `expr`'s own shape unchanged while handing each child to `f`
//! first. `Unsafe` is returned identically without ever invoking `f` on
//! its contents (optimizer invariant O1) — this is the one place that
//! invariant is enforced, so every pass gets it for free just by routing
//! its recursion through here.

use vibefun_ast::{Expr, LetRecBinding, MatchCase, RecordItem};

pub fn map_children(expr: &Expr, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
    match expr {
        Expr::IntLit { .. }
        | Expr::FloatLit { .. }
        | Expr::StringLit { .. }
        | Expr::BoolLit { .. }
        | Expr::UnitLit { .. }
        | Expr::Var { .. } => expr.clone(),

        Expr::Lambda { param, body, id, span } => {
            Expr::Lambda { param: param.clone(), body: Box::new(f(body)), id: *id, span: *span }
        }

        Expr::App { func, args, id, span } => Expr::App {
            func: Box::new(f(func)),
            args: args.iter().map(&mut f).collect(),
            id: *id,
            span: *span,
        },

        Expr::Let { pattern, value, body, mutable, recursive, id, span } => Expr::Let {
            pattern: pattern.clone(),
            value: Box::new(f(value)),
            body: Box::new(f(body)),
            mutable: *mutable,
            recursive: *recursive,
            id: *id,
            span: *span,
        },

        Expr::LetRecExpr { bindings, body, id, span } => Expr::LetRecExpr {
            bindings: bindings
                .iter()
                .map(|b| LetRecBinding { pattern: b.pattern.clone(), value: f(&b.value), mutable: b.mutable })
                .collect(),
            body: Box::new(f(body)),
            id: *id,
            span: *span,
        },

        Expr::Match { scrutinee, cases, id, span } => Expr::Match {
            scrutinee: Box::new(f(scrutinee)),
            cases: cases
                .iter()
                .map(|c| MatchCase {
                    pattern: c.pattern.clone(),
                    guard: c.guard.as_ref().map(&mut f),
                    body: f(&c.body),
                })
                .collect(),
            id: *id,
            span: *span,
        },

        Expr::Record { fields, id, span } => {
            Expr::Record { fields: map_record_items(fields, f), id: *id, span: *span }
        }

        Expr::RecordAccess { record, field, id, span } => {
            Expr::RecordAccess { record: Box::new(f(record)), field: *field, id: *id, span: *span }
        }

        Expr::RecordUpdate { record, updates, id, span } => Expr::RecordUpdate {
            record: Box::new(f(record)),
            updates: map_record_items(updates, f),
            id: *id,
            span: *span,
        },

        Expr::Variant { ctor, args, id, span } => {
            Expr::Variant { ctor: *ctor, args: args.iter().map(&mut f).collect(), id: *id, span: *span }
        }

        Expr::BinOp { op, left, right, id, span } => {
            Expr::BinOp { op: *op, left: Box::new(f(left)), right: Box::new(f(right)), id: *id, span: *span }
        }

        Expr::UnaryOp { op, expr: inner, id, span } => {
            Expr::UnaryOp { op: *op, expr: Box::new(f(inner)), id: *id, span: *span }
        }

        Expr::TypeAnnotation { expr: inner, ty, id, span } => {
            Expr::TypeAnnotation { expr: Box::new(f(inner)), ty: ty.clone(), id: *id, span: *span }
        }

        Expr::Unsafe { .. } => expr.clone(),
    }
}

fn map_record_items(items: &[RecordItem], mut f: impl FnMut(&Expr) -> Expr) -> Vec<RecordItem> {
    items
        .iter()
        .map(|item| match item {
            RecordItem::Field { name, value } => RecordItem::Field { name: *name, value: f(value) },
            RecordItem::Spread { expr } => RecordItem::Spread { expr: f(expr) },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::ExprId;
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn leaf_nodes_pass_through_untouched() {
        let lit = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        let result = map_children(&lit, |_| panic!("leaf has no children"));
        assert_eq!(result, lit);
    }

    #[test]
    fn unsafe_is_never_handed_to_the_callback() {
        let inner = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        let unsafe_expr = Expr::Unsafe { expr: Box::new(inner), id: id(1), span: Span::DUMMY };
        let result = map_children(&unsafe_expr, |_| panic!("must not descend into Unsafe"));
        assert_eq!(result, unsafe_expr);
    }
}

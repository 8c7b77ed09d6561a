//! Constant folding (§4.7): evaluates `BinOp`/`UnaryOp` nodes whose
//! operands are already literals. Arithmetic uses checked operations —
//! folding never assumes wrap-around on overflow, so an operation that
//! would overflow is simply left unfolded rather than silently wrapped.
//! `&&`/`||` short-circuit on a literal left operand alone, without
//! requiring the right operand to be a literal too.

use crate::pass::{Pass, PassContext};
use crate::traverse::map_children;
use vibefun_ast::{BinOp, Expr, UnOp};

pub struct ConstantFolding;

impl Pass for ConstantFolding {
    fn name(&self) -> &'static str {
        "constant-folding"
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
    try_fold(&expr)
}

fn try_fold(expr: &Expr) -> Expr {
    match expr {
        Expr::BinOp { op, left, right, id, span } => {
            if let Some(short) = try_short_circuit(*op, left) {
                return short;
            }
            match (as_int(left), as_int(right)) {
                (Some(a), Some(b)) => {
                    if let Some(value) = fold_int(*op, a, b) {
                        Expr::IntLit { value, id: *id, span: *span }
                    } else if let Some(value) = fold_bool_from_int_cmp(*op, a, b) {
                        Expr::BoolLit { value, id: *id, span: *span }
                    } else {
                        expr.clone()
                    }
                }
                _ => match (as_bool(left), as_bool(right)) {
                    (Some(a), Some(b)) => match fold_bool(*op, a, b) {
                        Some(value) => Expr::BoolLit { value, id: *id, span: *span },
                        None => expr.clone(),
                    },
                    _ => expr.clone(),
                },
            }
        }
        Expr::UnaryOp { op, expr: inner, id, span } => match op {
            UnOp::Neg => match as_int(inner) {
                Some(v) => match v.checked_neg() {
                    Some(n) => Expr::IntLit { value: n, id: *id, span: *span },
                    None => expr.clone(),
                },
                None => expr.clone(),
            },
            // A `Ref` value is never a `BoolLit`, so folding `!` only when
            // the operand literally is one never misfires on a dereference.
            UnOp::LogicalNotOrDeref => match as_bool(inner) {
                Some(v) => Expr::BoolLit { value: !v, id: *id, span: *span },
                None => expr.clone(),
            },
        },
        _ => expr.clone(),
    }
}

fn try_short_circuit(op: BinOp, left: &Expr) -> Option<Expr> {
    let left_bool = as_bool(left)?;
    match (op, left_bool) {
        (BinOp::And, false) | (BinOp::Or, true) => Some(left.clone()),
        _ => None,
    }
}

fn as_int(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::IntLit { value, .. } => Some(*value),
        _ => None,
    }
}

fn as_bool(expr: &Expr) -> Option<bool> {
    match expr {
        Expr::BoolLit { value, .. } => Some(*value),
        _ => None,
    }
}

fn fold_int(op: BinOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div if b != 0 => a.checked_div(b),
        BinOp::Mod if b != 0 => a.checked_rem(b),
        _ => None,
    }
}

fn fold_bool_from_int_cmp(op: BinOp, a: i64, b: i64) -> Option<bool> {
    match op {
        BinOp::Eq => Some(a == b),
        BinOp::NotEq => Some(a != b),
        BinOp::Lt => Some(a < b),
        BinOp::LtEq => Some(a <= b),
        BinOp::Gt => Some(a > b),
        BinOp::GtEq => Some(a >= b),
        _ => None,
    }
}

fn fold_bool(op: BinOp, a: bool, b: bool) -> Option<bool> {
    match op {
        BinOp::And => Some(a && b),
        BinOp::Or => Some(a || b),
        BinOp::Eq => Some(a == b),
        BinOp::NotEq => Some(a != b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{core_eq, ExprId};
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    fn int(v: i64, n: u32) -> Expr {
        Expr::IntLit { value: v, id: id(n), span: Span::DUMMY }
    }

    #[test]
    fn folds_checked_addition() {
        let expr = Expr::BinOp { op: BinOp::Add, left: Box::new(int(3, 0)), right: Box::new(int(4, 1)), id: id(2), span: Span::DUMMY };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&expr, &mut ctx);
        assert!(core_eq(&result, &int(7, 2)));
    }

    #[test]
    fn leaves_overflowing_addition_unfolded() {
        let expr = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(int(i64::MAX, 0)),
            right: Box::new(int(1, 1)),
            id: id(2),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&expr, &mut ctx);
        assert!(matches!(result, Expr::BinOp { .. }));
    }

    #[test]
    fn short_circuits_and_without_evaluating_right_operand() {
        let left = Expr::BoolLit { value: false, id: id(0), span: Span::DUMMY };
        let right = Expr::Var { name: vibefun_util::Symbol::intern("unbound"), id: id(1), span: Span::DUMMY };
        let expr = Expr::BinOp { op: BinOp::And, left: Box::new(left.clone()), right: Box::new(right), id: id(2), span: Span::DUMMY };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&expr, &mut ctx);
        assert!(core_eq(&result, &left));
    }

    #[test]
    fn refuses_to_treat_a_division_by_zero_as_foldable() {
        let expr = Expr::BinOp { op: BinOp::Div, left: Box::new(int(1, 0)), right: Box::new(int(0, 1)), id: id(2), span: Span::DUMMY };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&expr, &mut ctx);
        assert!(matches!(result, Expr::BinOp { .. }));
    }
}

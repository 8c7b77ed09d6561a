//! Common-subexpression elimination: reserved for a future pass (§4.7's
//! table lists it but leaves the sharing analysis out of scope for now).
//! Registered so the table's row count and ordering match the driver's
//! registry, but `can_apply` always reports `false` — the identity `apply`
//! body is never reached through the normal driver loop.

use crate::pass::{Pass, PassContext};
use vibefun_ast::Expr;

pub struct CommonSubexpressionElimination;

impl Pass for CommonSubexpressionElimination {
    fn name(&self) -> &'static str {
        "common-subexpression-elimination"
    }

    fn can_apply(&self, _expr: &Expr) -> bool {
        false
    }

    fn apply(&self, expr: &Expr, _ctx: &mut PassContext) -> Expr {
        expr.clone()
    }
}

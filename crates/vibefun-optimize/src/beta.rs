//! Beta reduction (§4.7): `App(Lambda(Var x, body), [arg])` → `body[x ↦
//! arg]`, restricted to single-argument applications of a plain variable
//! pattern. Multi-argument applications wait for an eventual α-conversion
//! to single-arg form rather than getting a direct rule of their own, per
//! the table's note.

use crate::pass::{Pass, PassContext};
use crate::traverse::map_children;
use vibefun_ast::{contains_ref_effect, size, subst, Expr, Pattern};

/// Beta-reducible argument size cap (§4.7's `K = 20`).
const MAX_ARG_SIZE: usize = 20;

pub struct BetaReduction;

impl Pass for BetaReduction {
    fn name(&self) -> &'static str {
        "beta-reduction"
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
    try_reduce(&expr, ctx)
}

fn try_reduce(expr: &Expr, ctx: &mut PassContext) -> Expr {
    if let Expr::App { func, args, .. } = expr {
        if args.len() == 1 {
            if let Expr::Lambda { param, body, .. } = func.as_ref() {
                if let Pattern::Var { name, .. } = param.as_ref() {
                    let arg = &args[0];
                    // (O2) a redex whose argument contains a `Ref`/deref/
                    // assign effect is never reduced here: `x` may occur
                    // zero, one, or many times in `body`, and substitution
                    // would duplicate that effect wherever it occurs more
                    // than once.
                    if size(arg) <= MAX_ARG_SIZE && !contains_ref_effect(arg) {
                        return subst(body, *name, arg, &mut || ctx.fresh());
                    }
                }
            }
        }
    }
    expr.clone()
}

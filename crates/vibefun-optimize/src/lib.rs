//! The optimizer (§4.7): a fixed-point driver over a registry of
//! independent, order-sensitive passes. At `O0` the input tree is
//! returned unchanged; at `O1` each registered pass runs exactly once,
//! in registration order; at `O2` that one sweep repeats until the tree
//! stops changing (by [`vibefun_ast::core_eq`]) or a configured iteration
//! cap is hit. Hitting the cap is not an error — it is a normal way for
//! `optimize` to return, same as reaching a fixed point.

mod beta;
mod cse;
mod dce;
mod eta;
mod fold;
mod inline;
mod pass;
mod reorder;
mod traverse;

pub use pass::{registry, OptLevel, Pass, PassContext};

use std::time::{Duration, Instant};
use vibefun_ast::{core_eq, Expr};

/// Tunables for a single [`optimize_with_config`] call.
#[derive(Clone, Copy, Debug)]
pub struct OptimizerConfig {
    pub level: OptLevel,
    /// Hard cap on fixed-point sweeps at `O2`; ignored at `O0`/`O1`.
    pub max_iterations: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { level: OptLevel::default(), max_iterations: 100 }
    }
}

/// What a single [`optimize_with_config`] call did, for callers that want
/// to log or assert on optimizer behavior without re-deriving it from the
/// returned tree.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub pre_nodes: usize,
    pub post_nodes: usize,
    pub iterations: u32,
    pub wall_time: Duration,
    /// `true` unless `O2` hit `max_iterations` before reaching a fixed
    /// point.
    pub converged: bool,
}

/// Optimize `expr` at the given level with the default iteration cap.
pub fn optimize(expr: &Expr, level: OptLevel) -> (Expr, Metrics) {
    optimize_with_config(expr, OptimizerConfig { level, ..OptimizerConfig::default() })
}

pub fn optimize_with_config(expr: &Expr, config: OptimizerConfig) -> (Expr, Metrics) {
    let start = Instant::now();
    let pre_nodes = vibefun_ast::size(expr);

    let (result, iterations, converged) = match config.level {
        OptLevel::O0 => (expr.clone(), 0, true),
        OptLevel::O1 => {
            let mut ctx = PassContext::new(config.level);
            (run_sweep(expr, &mut ctx), 1, true)
        }
        OptLevel::O2 => run_fixed_point(expr, config.max_iterations),
    };

    let post_nodes = vibefun_ast::size(&result);
    let metrics = Metrics { pre_nodes, post_nodes, iterations, wall_time: start.elapsed(), converged };
    (result, metrics)
}

/// One pass over `expr` through every registered pass whose `can_apply`
/// predicate accepts the current tree, in registration order.
pub fn run_sweep(expr: &Expr, ctx: &mut PassContext) -> Expr {
    let mut current = expr.clone();
    for pass in registry() {
        if pass.can_apply(&current) {
            current = pass.apply(&current, ctx);
        }
    }
    current
}

fn run_fixed_point(expr: &Expr, max_iterations: u32) -> (Expr, u32, bool) {
    let mut ctx = PassContext::new(OptLevel::O2);
    let mut current = expr.clone();
    let mut iterations = 0;

    loop {
        if iterations >= max_iterations {
            return (current, iterations, false);
        }
        let next = run_sweep(&current, &mut ctx);
        iterations += 1;
        if core_eq(&next, &current) {
            return (next, iterations, true);
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{BinOp, Expr, ExprId, Pattern};
    use vibefun_util::{Span, Symbol};

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn o0_leaves_the_tree_untouched() {
        let expr = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            right: Box::new(Expr::IntLit { value: 1, id: id(1), span: Span::DUMMY }),
            id: id(2),
            span: Span::DUMMY,
        };
        let (result, metrics) = optimize(&expr, OptLevel::O0);
        assert!(core_eq(&result, &expr));
        assert_eq!(metrics.iterations, 0);
        assert!(metrics.converged);
    }

    #[test]
    fn o2_fully_reduces_a_beta_then_fold_chain() {
        // ((x) => x * 2)(3 + 4)
        let lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(Expr::BinOp {
                op: BinOp::Mul,
                left: Box::new(Expr::Var { name: Symbol::intern("x"), id: id(0), span: Span::DUMMY }),
                right: Box::new(Expr::IntLit { value: 2, id: id(1), span: Span::DUMMY }),
                id: id(2),
                span: Span::DUMMY,
            }),
            id: id(3),
            span: Span::DUMMY,
        };
        let arg = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(Expr::IntLit { value: 3, id: id(4), span: Span::DUMMY }),
            right: Box::new(Expr::IntLit { value: 4, id: id(5), span: Span::DUMMY }),
            id: id(6),
            span: Span::DUMMY,
        };
        let app = Expr::App { func: Box::new(lambda), args: vec![arg], id: id(7), span: Span::DUMMY };

        let (result, metrics) = optimize(&app, OptLevel::O2);
        assert!(core_eq(&result, &Expr::IntLit { value: 14, id: id(1), span: Span::DUMMY }));
        assert!(metrics.converged);
        assert!(metrics.iterations <= 3);
    }

    #[test]
    fn o2_inlines_a_single_use_function_binding() {
        // let inc = (x) => x + 1 in let y = inc(5) in y
        let inc_lambda = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(Expr::BinOp {
                op: BinOp::Add,
                left: Box::new(Expr::Var { name: Symbol::intern("x"), id: id(0), span: Span::DUMMY }),
                right: Box::new(Expr::IntLit { value: 1, id: id(1), span: Span::DUMMY }),
                id: id(2),
                span: Span::DUMMY,
            }),
            id: id(3),
            span: Span::DUMMY,
        };
        let call = Expr::App {
            func: Box::new(Expr::Var { name: Symbol::intern("inc"), id: id(4), span: Span::DUMMY }),
            args: vec![Expr::IntLit { value: 5, id: id(5), span: Span::DUMMY }],
            id: id(6),
            span: Span::DUMMY,
        };
        let inner_let = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("y"), span: Span::DUMMY }),
            value: Box::new(call),
            body: Box::new(Expr::Var { name: Symbol::intern("y"), id: id(7), span: Span::DUMMY }),
            mutable: false,
            recursive: false,
            id: id(8),
            span: Span::DUMMY,
        };
        let outer_let = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("inc"), span: Span::DUMMY }),
            value: Box::new(inc_lambda),
            body: Box::new(inner_let),
            mutable: false,
            recursive: false,
            id: id(9),
            span: Span::DUMMY,
        };

        let (result, _metrics) = optimize(&outer_let, OptLevel::O2);
        assert!(core_eq(&result, &Expr::IntLit { value: 6, id: id(1), span: Span::DUMMY }));
    }

    #[test]
    fn never_descends_into_unsafe_at_any_level() {
        let inner = Expr::BinOp {
            op: BinOp::Add,
            left: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            right: Box::new(Expr::IntLit { value: 1, id: id(1), span: Span::DUMMY }),
            id: id(2),
            span: Span::DUMMY,
        };
        let unsafe_expr = Expr::Unsafe { expr: Box::new(inner), id: id(3), span: Span::DUMMY };
        let (result, _) = optimize(&unsafe_expr, OptLevel::O2);
        assert!(core_eq(&result, &unsafe_expr));
    }

    #[test]
    fn a_low_iteration_cap_still_returns_a_result() {
        let expr = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        let (result, metrics) =
            optimize_with_config(&expr, OptimizerConfig { level: OptLevel::O2, max_iterations: 0 });
        assert!(core_eq(&result, &expr));
        assert!(!metrics.converged);
        assert_eq!(metrics.iterations, 0);
    }
}

//! The optimizer pass interface (§9 "Dynamic dispatch"): the only runtime
//! polymorphism the optimizer needs is a pass — a name, a `can_apply`
//! predicate, and an `apply` transform — so it is modeled as a trait
//! object rather than reached for generics or an enum of closures.

use vibefun_ast::Expr;
use vibefun_util::Symbol;

/// How aggressively `optimize` runs the registered passes (§4.7 "Driver").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptLevel {
    /// No passes.
    O0,
    /// One sweep of each registered pass, in registration order.
    O1,
    /// Fixed-point iteration: repeat one sweep until the tree stops
    /// changing or `max_iterations` is reached.
    O2,
}

impl Default for OptLevel {
    fn default() -> Self {
        OptLevel::O1
    }
}

pub trait Pass {
    fn name(&self) -> &'static str;

    /// Cheap pre-check the driver consults before running `apply` at all.
    /// Every pass but the reserved CSE stub reports `true` unconditionally
    /// — a whole-tree sweep that finds nothing to do is a correct no-op,
    /// so the predicate exists for the one pass that is *never* supposed
    /// to run its (identity) body rather than as a required optimization.
    fn can_apply(&self, expr: &Expr) -> bool;

    fn apply(&self, expr: &Expr, ctx: &mut PassContext) -> Expr;
}

/// State threaded across one pass's sweep: the level in effect (the
/// inliner's multi-use threshold depends on it) and a fresh-name counter
/// for capture-avoiding substitution's α-renaming step. Threaded
/// explicitly through the call chain rather than kept as process-wide
/// state (§9 "Global state"), the same way the desugarer threads its own
/// counters.
pub struct PassContext {
    level: OptLevel,
    next_fresh: u32,
}

impl PassContext {
    pub fn new(level: OptLevel) -> Self {
        Self { level, next_fresh: 0 }
    }

    pub fn level(&self) -> OptLevel {
        self.level
    }

    /// A name no surface or desugared program could have written.
    pub fn fresh(&mut self) -> Symbol {
        let n = self.next_fresh;
        self.next_fresh += 1;
        Symbol::intern(&format!("$opt_{n}"))
    }
}

/// The passes in registration order (§4.7's table; §5 "Optimizer passes
/// run in the order they were registered").
pub fn registry() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(crate::beta::BetaReduction),
        Box::new(crate::eta::EtaReduction),
        Box::new(crate::inline::InlineExpansion),
        Box::new(crate::dce::DeadCodeElimination),
        Box::new(crate::reorder::PatternMatchReordering),
        Box::new(crate::fold::ConstantFolding),
        Box::new(crate::cse::CommonSubexpressionElimination),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_entry_per_table_row() {
        let passes = registry();
        assert_eq!(passes.len(), 7);
        assert_eq!(passes[0].name(), "beta-reduction");
        assert_eq!(passes.last().unwrap().name(), "common-subexpression-elimination");
    }

    #[test]
    fn default_level_is_one_sweep() {
        assert_eq!(OptLevel::default(), OptLevel::O1);
    }
}

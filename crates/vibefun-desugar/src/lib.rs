//! vibefun-desugar — surface-to-core translation (spec §4.1).
//!
//! Shrinks the surface grammar's ~40 node kinds down to the ~20 Core kinds
//! in [`vibefun_ast::Expr`]. Every rewrite here is semantics-preserving;
//! none of them consult type information (that is the checker's job, one
//! crate downstream).

mod error;
mod expr;
mod module;
mod pattern;
mod types;

pub use error::DesugarError;

use vibefun_ast::ExprId;
use vibefun_util::Symbol;

/// Owns the two counters a desugaring pass needs: fresh `ExprId`s for every
/// Core node it mints, and fresh names for synthesized binders (unused
/// block-statement results, `if`-as-`match` has none, but the block and
/// `and`-group rewrites both need one). Threaded through explicitly rather
/// than kept as global/thread-local state (§9 "Global state").
pub struct Desugarer {
    next_expr_id: u32,
    next_fresh: u32,
}

impl Default for Desugarer {
    fn default() -> Self {
        Self::new()
    }
}

impl Desugarer {
    pub fn new() -> Self {
        Self { next_expr_id: 0, next_fresh: 0 }
    }

    fn next_id(&mut self) -> ExprId {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        id
    }

    /// A name no surface program could have written, for a binder whose
    /// result is discarded (a block statement's value) or that exists only
    /// to thread an intermediate rewrite (an `and`-group's shared value).
    fn fresh_name(&mut self, hint: &str) -> Symbol {
        let n = self.next_fresh;
        self.next_fresh += 1;
        Symbol::intern(&format!("$desugar_{hint}_{n}"))
    }
}

/// Desugar a whole module, continuing past a failing declaration so every
/// error in the module is reported once (mirrors the checker's
/// declaration-boundary recovery policy in §4.3 "Failure semantics").
pub fn desugar_module(
    module: &vibefun_surface::Module,
) -> Result<vibefun_ast::CoreModule, Vec<DesugarError>> {
    let mut desugarer = Desugarer::new();
    let mut decls = Vec::new();
    let mut errors = Vec::new();

    for item in &module.items {
        match module::desugar_item(&mut desugarer, item) {
            Ok(mut new_decls) => decls.append(&mut new_decls),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(vibefun_ast::CoreModule { decls })
    } else {
        Err(errors)
    }
}

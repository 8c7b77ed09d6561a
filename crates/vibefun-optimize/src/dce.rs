//! Dead-code elimination (§4.7): drops a `let`-binding whose name is
//! never used and whose value is pure (no `Unsafe`, no `Ref` effect), and
//! trims `match` cases that a ground scrutinee can never reach.

use crate::pass::{Pass, PassContext};
use crate::traverse::map_children;
use vibefun_ast::expr::PatternLiteral;
use vibefun_ast::{contains_ref_effect, contains_unsafe, free_vars, Expr, MatchCase, Pattern};

pub struct DeadCodeElimination;

impl Pass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "dead-code-elimination"
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
    try_simplify(&expr)
}

fn try_simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Let { pattern, value, body, mutable, recursive, .. } => {
            if !*mutable && !*recursive {
                if let Pattern::Var { name, .. } = pattern.as_ref() {
                    let is_pure = !contains_unsafe(value) && !contains_ref_effect(value);
                    if is_pure && !free_vars(body).contains(name) {
                        return (**body).clone();
                    }
                }
            }
            expr.clone()
        }
        Expr::Match { scrutinee, cases, id, span } => match ground_value(scrutinee) {
            Some(value) => match first_matching_case(value, cases) {
                Some(case) => case.body.clone(),
                None => expr.clone(),
            },
            None => {
                // Invariant O4: never drop cases past the point where a
                // guardless catch-all would already have taken them —
                // trimming stops at the first unconditional wildcard/var.
                if let Some(cut) = cases.iter().position(|c| is_unconditional_catchall(c)) {
                    if cut + 1 < cases.len() {
                        return Expr::Match {
                            scrutinee: scrutinee.clone(),
                            cases: cases[..=cut].to_vec(),
                            id: *id,
                            span: *span,
                        };
                    }
                }
                expr.clone()
            }
        },
        _ => expr.clone(),
    }
}

fn is_unconditional_catchall(case: &MatchCase) -> bool {
    case.guard.is_none() && matches!(case.pattern, Pattern::Wildcard { .. } | Pattern::Var { .. })
}

/// A scrutinee with no remaining redex: a literal, unit, or a fully
/// ground variant/record built of such. `None` if evaluation would still
/// need to happen (a live variable, call, etc) to know which case fires.
enum GroundValue<'a> {
    Int(i64),
    Str(&'a str),
    Bool(bool),
    Unit,
    /// Floats and records have no literal pattern form (§ pattern grammar);
    /// a scrutinee of either shape is ground but never statically matched
    /// here, same as the `Record` pattern case below.
    Opaque,
    Variant(vibefun_util::Symbol, &'a [Expr]),
}

fn ground_value(expr: &Expr) -> Option<GroundValue<'_>> {
    match expr {
        Expr::IntLit { value, .. } => Some(GroundValue::Int(*value)),
        Expr::FloatLit { .. } => Some(GroundValue::Opaque),
        Expr::StringLit { value, .. } => Some(GroundValue::Str(value)),
        Expr::BoolLit { value, .. } => Some(GroundValue::Bool(*value)),
        Expr::UnitLit { .. } => Some(GroundValue::Unit),
        Expr::Variant { ctor, args, .. } => Some(GroundValue::Variant(*ctor, args)),
        Expr::Record { .. } => Some(GroundValue::Opaque),
        _ => None,
    }
}

fn first_matching_case<'a>(value: GroundValue<'_>, cases: &'a [MatchCase]) -> Option<&'a MatchCase> {
    // A guard on the winning case means the guard's value isn't known
    // statically here, so this pass leaves guarded matches alone, unless
    // constant folding has already reduced the guard to literal `true`.
    for case in cases {
        match pattern_matches(&case.pattern, &value) {
            Some(true) if guard_selects(&case.guard) => return Some(case),
            Some(true) | None => return None,
            Some(false) => continue,
        }
    }
    None
}

fn guard_selects(guard: &Option<Expr>) -> bool {
    match guard {
        None => true,
        Some(Expr::BoolLit { value: true, .. }) => true,
        Some(_) => false,
    }
}

/// `Some(true)`/`Some(false)` when the ground value's match against this
/// pattern is statically decidable, `None` when it depends on a binder
/// whose value this simple check doesn't chase (nested non-ground field).
fn pattern_matches(pattern: &Pattern, value: &GroundValue<'_>) -> Option<bool> {
    match (pattern, value) {
        (Pattern::Wildcard { .. }, _) | (Pattern::Var { .. }, _) => Some(true),
        (Pattern::Literal { value: lit, .. }, _) => Some(literal_matches(lit, value)),
        (Pattern::Variant { ctor, args, .. }, GroundValue::Variant(v_ctor, v_args)) => {
            if ctor != v_ctor {
                return Some(false);
            }
            for (p, a) in args.iter().zip(v_args.iter()) {
                match ground_value(a).and_then(|gv| pattern_matches(p, &gv)) {
                    Some(true) => continue,
                    other => return other,
                }
            }
            Some(true)
        }
        (Pattern::Record { .. }, GroundValue::Opaque) => None,
        (_, GroundValue::Opaque) => None,
        _ => Some(false),
    }
}

fn literal_matches(lit: &PatternLiteral, value: &GroundValue<'_>) -> bool {
    match (lit, value) {
        (PatternLiteral::Int(a), GroundValue::Int(b)) => a == b,
        (PatternLiteral::Str(a), GroundValue::Str(b)) => a.as_str() == *b,
        (PatternLiteral::Bool(a), GroundValue::Bool(b)) => a == b,
        (PatternLiteral::Unit, GroundValue::Unit) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{core_eq, ExprId};
    use vibefun_util::{Span, Symbol};

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn drops_unused_pure_binding() {
        let value = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        let body = Expr::IntLit { value: 2, id: id(1), span: Span::DUMMY };
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("unused"), span: Span::DUMMY }),
            value: Box::new(value),
            body: Box::new(body.clone()),
            mutable: false,
            recursive: false,
            id: id(2),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&let_expr, &mut ctx);
        assert!(core_eq(&result, &body));
    }

    #[test]
    fn keeps_unused_but_unsafe_binding() {
        let value = Expr::Unsafe {
            expr: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            id: id(1),
            span: Span::DUMMY,
        };
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("unused"), span: Span::DUMMY }),
            value: Box::new(value),
            body: Box::new(Expr::IntLit { value: 2, id: id(2), span: Span::DUMMY }),
            mutable: false,
            recursive: false,
            id: id(3),
            span: Span::DUMMY,
        };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&let_expr, &mut ctx);
        assert!(matches!(result, Expr::Let { .. }));
    }

    #[test]
    fn picks_matching_case_on_ground_literal_scrutinee() {
        let scrutinee = Expr::IntLit { value: 2, id: id(0), span: Span::DUMMY };
        let cases = vec![
            MatchCase {
                pattern: Pattern::Literal { value: PatternLiteral::Int(1), span: Span::DUMMY },
                guard: None,
                body: Expr::StringLit { value: "one".into(), id: id(1), span: Span::DUMMY },
            },
            MatchCase {
                pattern: Pattern::Literal { value: PatternLiteral::Int(2), span: Span::DUMMY },
                guard: None,
                body: Expr::StringLit { value: "two".into(), id: id(2), span: Span::DUMMY },
            },
        ];
        let match_expr =
            Expr::Match { scrutinee: Box::new(scrutinee), cases, id: id(3), span: Span::DUMMY };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&match_expr, &mut ctx);
        assert!(core_eq(&result, &Expr::StringLit { value: "two".into(), id: id(2), span: Span::DUMMY }));
    }

    #[test]
    fn trims_cases_after_unconditional_catchall() {
        let scrutinee = Expr::Var { name: Symbol::intern("n"), id: id(0), span: Span::DUMMY };
        let cases = vec![
            MatchCase {
                pattern: Pattern::Wildcard { span: Span::DUMMY },
                guard: None,
                body: Expr::IntLit { value: 0, id: id(1), span: Span::DUMMY },
            },
            MatchCase {
                pattern: Pattern::Literal { value: PatternLiteral::Int(9), span: Span::DUMMY },
                guard: None,
                body: Expr::IntLit { value: 9, id: id(2), span: Span::DUMMY },
            },
        ];
        let match_expr =
            Expr::Match { scrutinee: Box::new(scrutinee), cases, id: id(3), span: Span::DUMMY };
        let mut ctx = PassContext::new(crate::OptLevel::O1);
        let result = sweep(&match_expr, &mut ctx);
        match result {
            Expr::Match { cases, .. } => assert_eq!(cases.len(), 1),
            other => panic!("expected a trimmed Match, got {other:?}"),
        }
    }
}

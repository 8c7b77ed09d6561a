//! Exhaustiveness and usefulness (§4.5): does a `match` cover every value of
//! its scrutinee's type, and does every arm have a chance of running?
//!
//! Both checks work over the scrutinee's *top-level shape* only — the set
//! of constructors (or literal values) a `match` must cover, not a full
//! decision tree over nested sub-patterns. That is enough for every
//! testable property in §8 (`Option<Int>` missing `None`, a redundant
//! wildcard) and keeps the residual-tracking model simple: a finite type's
//! residual is the set of constructor names not yet covered by an
//! unguarded arm; an open type's residual is just "has a catch-all been
//! seen yet".
//!
//! Guards never contribute to either check: a guarded arm can fail at
//! runtime, so it neither removes a shape from the residual (exhaustiveness)
//! nor renders a later arm unreachable (usefulness).

use crate::error::{CheckError, CheckWarning};
use crate::infer::InferCtx;
use vibefun_ast::expr::PatternLiteral;
use vibefun_ast::{Env, MatchCase, Pattern, Type, TypeInfo};
use vibefun_util::{Span, Symbol};

/// Run both checks over one `match`'s cases. Exhaustiveness failures stop
/// inference (`CheckError`); usefulness failures are recorded as warnings on
/// `ctx` and never block it.
pub fn check_match(
    ctx: &mut InferCtx,
    env: &Env,
    scrutinee_ty: &Type,
    cases: &[MatchCase],
    span: Span,
) -> Result<(), CheckError> {
    check_usefulness(ctx, cases);
    check_exhaustiveness(ctx, env, scrutinee_ty, cases, span)
}

fn check_usefulness(ctx: &mut InferCtx, cases: &[MatchCase]) {
    let mut catch_all_seen = false;
    for case in cases {
        if catch_all_seen {
            ctx.warnings.push(CheckWarning::UnreachablePattern { span: case.pattern.span() });
        }
        if case.guard.is_none() && is_catch_all(&case.pattern) {
            catch_all_seen = true;
        }
    }
}

fn is_catch_all(pattern: &Pattern) -> bool {
    matches!(pattern, Pattern::Wildcard { .. } | Pattern::Var { .. })
}

/// The finite shapes exhaustiveness can reason about by enumeration. Any
/// other resolved scrutinee type is "open": only a catch-all can exhaust it.
enum Shape<'a> {
    Bool,
    Unit,
    Variant(&'a [vibefun_ast::ConstructorInfo]),
    Open,
}

fn classify(env: &Env, ty: &Type) -> Shape<'_> {
    match ty {
        Type::Const(name) if *name == Symbol::intern("Bool") => Shape::Bool,
        Type::Const(name) if *name == Symbol::intern("Unit") => Shape::Unit,
        Type::Const(name) | Type::App { ctor: name, .. } => match env.lookup_type(*name) {
            Some(TypeInfo::Variant { constructors, .. }) => Shape::Variant(constructors),
            _ => Shape::Open,
        },
        _ => Shape::Open,
    }
}

fn check_exhaustiveness(
    ctx: &mut InferCtx,
    env: &Env,
    scrutinee_ty: &Type,
    cases: &[MatchCase],
    span: Span,
) -> Result<(), CheckError> {
    let resolved = ctx.resolve(scrutinee_ty);
    if matches!(resolved, Type::Var { .. }) {
        return Err(CheckError::RequiresAnnotation { span });
    }

    let unguarded: Vec<&Pattern> =
        cases.iter().filter(|c| c.guard.is_none()).map(|c| &c.pattern).collect();

    if unguarded.iter().any(|p| is_catch_all(p)) {
        return Ok(());
    }

    match classify(env, &resolved) {
        Shape::Bool => {
            let mut missing: Vec<&str> = vec!["True", "False"];
            for p in &unguarded {
                if let Pattern::Literal { value: PatternLiteral::Bool(b), .. } = p {
                    missing.retain(|name| *name != if *b { "True" } else { "False" });
                }
            }
            if missing.is_empty() {
                Ok(())
            } else {
                Err(CheckError::NonExhaustiveMatch { missing: missing[0].to_string(), span })
            }
        }
        Shape::Unit => {
            let covered = unguarded.iter().any(|p| matches!(p, Pattern::Literal { value: PatternLiteral::Unit, .. }));
            if covered {
                Ok(())
            } else {
                Err(CheckError::NonExhaustiveMatch { missing: "()".to_string(), span })
            }
        }
        Shape::Variant(ctors) => {
            let mut missing: Vec<Symbol> = ctors.iter().map(|c| c.name).collect();
            for p in &unguarded {
                if let Pattern::Variant { ctor, .. } = p {
                    missing.retain(|name| name != ctor);
                }
            }
            if missing.is_empty() {
                Ok(())
            } else {
                Err(CheckError::NonExhaustiveMatch {
                    missing: format!("{}(..)", missing[0]),
                    span,
                })
            }
        }
        Shape::Open => Err(CheckError::NonExhaustiveMatch { missing: "_".to_string(), span }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{Expr, ExprId};

    fn dummy_body() -> Expr {
        Expr::UnitLit { id: ExprId(0), span: Span::DUMMY }
    }

    fn wildcard_case() -> MatchCase {
        MatchCase { pattern: Pattern::Wildcard { span: Span::DUMMY }, guard: None, body: dummy_body() }
    }

    fn ctor_case(name: &str) -> MatchCase {
        MatchCase {
            pattern: Pattern::Variant { ctor: Symbol::intern(name), args: vec![], span: Span::DUMMY },
            guard: None,
            body: dummy_body(),
        }
    }

    #[test]
    fn option_missing_none_is_non_exhaustive() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let cases = vec![ctor_case("Some")];
        let ty = Type::option(Type::int());
        let err = check_match(&mut ctx, &env, &ty, &cases, Span::DUMMY).unwrap_err();
        assert!(matches!(err, CheckError::NonExhaustiveMatch { .. }));
    }

    #[test]
    fn option_with_wildcard_is_exhaustive() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let cases = vec![ctor_case("Some"), wildcard_case()];
        let ty = Type::option(Type::int());
        assert!(check_match(&mut ctx, &env, &ty, &cases, Span::DUMMY).is_ok());
    }

    #[test]
    fn wildcard_after_wildcard_is_unreachable() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let cases = vec![wildcard_case(), wildcard_case()];
        let ty = Type::int();
        check_match(&mut ctx, &env, &ty, &cases, Span::DUMMY).unwrap();
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn unresolved_scrutinee_requires_annotation() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let var = ctx.fresh(vibefun_ast::TOP_LEVEL);
        let cases = vec![wildcard_case()];
        let err = check_match(&mut ctx, &env, &var, &cases, Span::DUMMY).unwrap_err();
        assert!(matches!(err, CheckError::RequiresAnnotation { .. }));
    }

    #[test]
    fn guard_never_contributes_to_exhaustion() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let guarded_wildcard = MatchCase {
            pattern: Pattern::Wildcard { span: Span::DUMMY },
            guard: Some(Expr::BoolLit { value: true, id: ExprId(0), span: Span::DUMMY }),
            body: dummy_body(),
        };
        let cases = vec![ctor_case("Some"), guarded_wildcard];
        let ty = Type::option(Type::int());
        let err = check_match(&mut ctx, &env, &ty, &cases, Span::DUMMY).unwrap_err();
        assert!(matches!(err, CheckError::NonExhaustiveMatch { .. }));
    }
}

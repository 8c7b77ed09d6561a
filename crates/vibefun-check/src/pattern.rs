//! Pattern checking (§4.4): binding collection against an expected type,
//! plus the linearity check (I5) that no name is bound twice within one
//! pattern.

use crate::error::CheckError;
use crate::infer::InferCtx;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use vibefun_ast::{Env, Pattern, Type};
use vibefun_util::Symbol;

/// Check `pattern` against `expected`, returning the names it binds (each
/// paired with its monomorphic type — patterns never introduce polymorphism;
/// see the value-restriction notes on `Expr::Let`/`Expr::LetRecExpr`).
pub fn infer_pattern(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &Pattern,
    expected: &Type,
) -> Result<Vec<(Symbol, Type)>, CheckError> {
    let mut bindings = Vec::new();
    infer_pattern_inner(ctx, env, pattern, expected, &mut bindings)?;
    check_linearity(&bindings, pattern)?;
    Ok(bindings)
}

fn check_linearity(bindings: &[(Symbol, Type)], pattern: &Pattern) -> Result<(), CheckError> {
    let mut seen = FxHashSet::default();
    for (name, _) in bindings {
        if !seen.insert(*name) {
            return Err(CheckError::DuplicatePatternBinding { name: *name, span: pattern.span() });
        }
    }
    Ok(())
}

fn infer_pattern_inner(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &Pattern,
    expected: &Type,
    bindings: &mut Vec<(Symbol, Type)>,
) -> Result<(), CheckError> {
    match pattern {
        Pattern::Wildcard { .. } => Ok(()),

        Pattern::Var { name, .. } => {
            bindings.push((*name, expected.clone()));
            Ok(())
        }

        Pattern::Literal { value, span } => {
            let lit_ty = match value {
                vibefun_ast::expr::PatternLiteral::Int(_) => Type::int(),
                vibefun_ast::expr::PatternLiteral::Str(_) => Type::string(),
                vibefun_ast::expr::PatternLiteral::Bool(_) => Type::bool(),
                vibefun_ast::expr::PatternLiteral::Unit => Type::unit(),
            };
            ctx.unify(expected, &lit_ty, *span)
        }

        Pattern::Variant { ctor, args, span } => {
            let binding = env.lookup_value(*ctor).ok_or_else(|| {
                let candidates: Vec<&str> = env.value_names().map(|n| n.as_str()).collect();
                let suggestion =
                    vibefun_util::diagnostic::did_you_mean(ctor.as_str(), candidates).map(Symbol::intern);
                CheckError::UndefinedConstructor { name: *ctor, suggestion, span: *span }
            })?;
            let scheme = binding.scheme().clone();
            let instantiated = ctx.instantiate(&scheme, env.level());
            let (param_types, owner_ty) = match &instantiated {
                Type::Function { params, result } => (params.clone(), (**result).clone()),
                other => (Vec::new(), other.clone()),
            };
            ctx.unify(expected, &owner_ty, *span)?;
            if param_types.len() != args.len() {
                return Err(CheckError::FunctionArityMismatch {
                    expected: param_types.len(),
                    found: args.len(),
                    span: *span,
                });
            }
            for (param_ty, arg_pattern) in param_types.iter().zip(args) {
                infer_pattern_inner(ctx, env, arg_pattern, param_ty, bindings)?;
            }
            Ok(())
        }

        Pattern::Record { fields, span } => {
            let mut required: BTreeMap<Symbol, Type> = BTreeMap::new();
            let field_vars: Vec<Type> = fields.iter().map(|_| ctx.fresh(env.level())).collect();
            for (field, var) in fields.iter().zip(&field_vars) {
                required.insert(field.name, var.clone());
            }
            ctx.unify_record_subtype(&Type::Record(required), expected, *span)?;
            for (field, var) in fields.iter().zip(&field_vars) {
                infer_pattern_inner(ctx, env, &field.pattern, var, bindings)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{FieldPattern, TOP_LEVEL};
    use vibefun_util::Span;

    #[test]
    fn var_pattern_binds_expected_type() {
        let mut ctx = InferCtx::new();
        let env = Env::new();
        let pattern = Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY };
        let bindings = infer_pattern(&mut ctx, &env, &pattern, &Type::int()).unwrap();
        assert_eq!(bindings, vec![(Symbol::intern("x"), Type::int())]);
    }

    #[test]
    fn duplicate_names_in_one_pattern_are_rejected() {
        let mut ctx = InferCtx::new();
        let env = Env::new();
        let pattern = Pattern::Record {
            fields: vec![
                FieldPattern {
                    name: Symbol::intern("a"),
                    pattern: Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY },
                },
                FieldPattern {
                    name: Symbol::intern("b"),
                    pattern: Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY },
                },
            ],
            span: Span::DUMMY,
        };
        let expected = ctx.fresh(TOP_LEVEL);
        let err = infer_pattern(&mut ctx, &env, &pattern, &expected).unwrap_err();
        assert!(matches!(err, CheckError::DuplicatePatternBinding { .. }));
    }

    #[test]
    fn record_pattern_allows_extra_fields_on_scrutinee() {
        let mut ctx = InferCtx::new();
        let env = Env::new();
        let pattern = Pattern::Record {
            fields: vec![FieldPattern {
                name: Symbol::intern("x"),
                pattern: Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY },
            }],
            span: Span::DUMMY,
        };
        let scrutinee = Type::Record(
            [(Symbol::intern("x"), Type::int()), (Symbol::intern("y"), Type::bool())].into_iter().collect(),
        );
        let bindings = infer_pattern(&mut ctx, &env, &pattern, &scrutinee).unwrap();
        assert_eq!(bindings, vec![(Symbol::intern("x"), Type::int())]);
    }
}

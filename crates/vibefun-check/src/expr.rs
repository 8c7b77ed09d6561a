//! Expression inference (§4.3): one rule per `Expr` variant, threading an
//! [`Env`] snapshot through each subexpression the way `Env::clone` makes
//! cheap — a new binding never leaks past the scope that introduced it.

use crate::error::CheckError;
use crate::infer::InferCtx;
use std::collections::BTreeMap;
use vibefun_ast::{BinOp, Binding, Env, Expr, RecordItem, Scheme, Type, UnOp};
use vibefun_util::Symbol;

pub fn infer_expr(ctx: &mut InferCtx, env: &Env, expr: &Expr) -> Result<Type, CheckError> {
    match expr {
        Expr::IntLit { .. } => Ok(Type::int()),
        Expr::FloatLit { .. } => Ok(Type::float()),
        Expr::StringLit { .. } => Ok(Type::string()),
        Expr::BoolLit { .. } => Ok(Type::bool()),
        Expr::UnitLit { .. } => Ok(Type::unit()),

        Expr::Var { name, span, .. } => infer_var(ctx, env, *name, *span),

        Expr::Lambda { param, body, .. } => {
            let param_ty = ctx.fresh(env.level());
            let bindings = crate::pattern::infer_pattern(ctx, env, param, &param_ty)?;
            let mut inner = env.clone();
            for (name, ty) in bindings {
                inner.bind_value(name, Binding::Value { scheme: Scheme::monomorphic(ty), location: expr.span() });
            }
            let body_ty = infer_expr(ctx, &inner, body)?;
            Ok(Type::Function { params: vec![param_ty], result: Box::new(body_ty) })
        }

        Expr::App { func, args, span, .. } => infer_app(ctx, env, func, args, *span),

        Expr::Let { pattern, value, body, mutable, recursive, span, .. } => {
            infer_let(ctx, env, pattern, value, body, *mutable, *recursive, *span)
        }

        Expr::LetRecExpr { bindings, body, .. } => infer_let_rec(ctx, env, bindings, body),

        Expr::Match { scrutinee, cases, span, .. } => {
            if cases.is_empty() {
                return Err(CheckError::EmptyMatch { span: *span });
            }
            let scrutinee_ty = infer_expr(ctx, env, scrutinee)?;
            let mut result_ty: Option<Type> = None;
            for case in cases {
                let bindings = crate::pattern::infer_pattern(ctx, env, &case.pattern, &scrutinee_ty)?;
                let mut inner = env.clone();
                for (name, ty) in &bindings {
                    inner.bind_value(
                        *name,
                        Binding::Value { scheme: Scheme::monomorphic(ty.clone()), location: case.pattern.span() },
                    );
                }
                if let Some(guard) = &case.guard {
                    let guard_ty = infer_expr(ctx, &inner, guard)?;
                    ctx.unify(&guard_ty, &Type::bool(), guard.span())?;
                }
                let body_ty = infer_expr(ctx, &inner, &case.body)?;
                match &result_ty {
                    None => result_ty = Some(body_ty),
                    Some(prev) => ctx.unify(prev, &body_ty, case.body.span())?,
                }
            }
            crate::exhaustive::check_match(ctx, env, &scrutinee_ty, cases, *span)?;
            Ok(result_ty.expect("cases non-empty"))
        }

        Expr::Record { fields, .. } => {
            let mut out = BTreeMap::new();
            for field in fields {
                match field {
                    RecordItem::Field { name, value } => {
                        out.insert(*name, infer_expr(ctx, env, value)?);
                    }
                    RecordItem::Spread { expr: spread } => {
                        let spread_ty = ctx.resolve(&infer_expr(ctx, env, spread)?);
                        match spread_ty {
                            Type::Record(spread_fields) => out.extend(spread_fields),
                            other => {
                                return Err(CheckError::TypeMismatch {
                                    expected: Type::Record(BTreeMap::new()),
                                    found: other,
                                    span: spread.span(),
                                })
                            }
                        }
                    }
                }
            }
            Ok(Type::Record(out))
        }

        Expr::RecordAccess { record, field, span, .. } => {
            let record_ty = infer_expr(ctx, env, record)?;
            let field_ty = ctx.fresh(env.level());
            let required = Type::Record([(*field, field_ty.clone())].into_iter().collect());
            ctx.unify_record_subtype(&required, &record_ty, *span)?;
            Ok(field_ty)
        }

        Expr::RecordUpdate { record, updates, span, .. } => {
            let base_ty = infer_expr(ctx, env, record)?;
            let mut overrides = BTreeMap::new();
            for update in updates {
                match update {
                    RecordItem::Field { name, value } => {
                        overrides.insert(*name, infer_expr(ctx, env, value)?);
                    }
                    RecordItem::Spread { expr: spread } => {
                        let spread_ty = ctx.resolve(&infer_expr(ctx, env, spread)?);
                        match spread_ty {
                            Type::Record(spread_fields) => overrides.extend(spread_fields),
                            other => {
                                return Err(CheckError::TypeMismatch {
                                    expected: Type::Record(BTreeMap::new()),
                                    found: other,
                                    span: spread.span(),
                                })
                            }
                        }
                    }
                }
            }
            ctx.unify_record_subtype(&Type::Record(overrides.clone()), &base_ty, *span)?;
            match ctx.resolve(&base_ty) {
                Type::Record(mut base_fields) => {
                    base_fields.extend(overrides);
                    Ok(Type::Record(base_fields))
                }
                _ => Ok(Type::Record(overrides)),
            }
        }

        Expr::Variant { ctor, args, span, .. } => infer_variant(ctx, env, *ctor, args, *span),

        Expr::BinOp { op, left, right, span, .. } => infer_binop(ctx, env, *op, left, right, *span),

        Expr::UnaryOp { op, expr: operand, span, .. } => infer_unaryop(ctx, env, *op, operand, *span),

        Expr::TypeAnnotation { expr: inner, ty, span, .. } => {
            let resolved_ty = crate::env::resolve_type_expr(env, ty)?;
            let inner_ty = infer_expr(ctx, env, inner)?;
            ctx.unify(&inner_ty, &resolved_ty, *span)?;
            Ok(resolved_ty)
        }

        Expr::Unsafe { expr: inner, .. } => {
            infer_expr(ctx, env, inner)?;
            Ok(ctx.fresh(env.level()))
        }
    }
}

fn infer_var(ctx: &mut InferCtx, env: &Env, name: Symbol, span: vibefun_util::Span) -> Result<Type, CheckError> {
    let binding = env.lookup_value(name).ok_or_else(|| undefined_variable(env, name, span))?;
    if let Binding::External { overloads, .. } = binding {
        if overloads.len() > 1 {
            return Err(CheckError::FFIOverloadNotSupported { name, span });
        }
    }
    Ok(ctx.instantiate(binding.scheme(), env.level()))
}

fn undefined_variable(env: &Env, name: Symbol, span: vibefun_util::Span) -> CheckError {
    let candidates: Vec<&str> = env.value_names().map(|n| n.as_str()).collect();
    let suggestion = vibefun_util::diagnostic::did_you_mean(name.as_str(), candidates).map(Symbol::intern);
    CheckError::UndefinedVariable { name, suggestion, span }
}

/// Infers the callee first unless it is a directly-named overloaded
/// external, which must be resolved by call-site arity instead of going
/// through the ordinary `Var` rule (which rejects overloaded externals
/// outright, since they are not a single first-class value).
fn infer_app(
    ctx: &mut InferCtx,
    env: &Env,
    func: &Expr,
    args: &[Expr],
    span: vibefun_util::Span,
) -> Result<Type, CheckError> {
    let arg_types: Vec<Type> =
        args.iter().map(|a| infer_expr(ctx, env, a)).collect::<Result<_, _>>()?;

    if let Expr::Var { name, span: var_span, .. } = func {
        if let Some(Binding::External { overloads, .. }) = env.lookup_value(*name) {
            if overloads.len() > 1 {
                let scheme = crate::ffi::resolve_overload(overloads, args.len(), *name, *var_span)?;
                let inst = ctx.instantiate(&scheme, env.level());
                return ctx.unify_application(&inst, &arg_types, env.level(), span);
            }
        }
    }

    let func_ty = infer_expr(ctx, env, func)?;
    ctx.unify_application(&func_ty, &arg_types, env.level(), span)
}

#[allow(clippy::too_many_arguments)]
fn infer_let(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &vibefun_ast::Pattern,
    value: &Expr,
    body: &Expr,
    mutable: bool,
    recursive: bool,
    span: vibefun_util::Span,
) -> Result<Type, CheckError> {
    let mut rhs_env = env.clone();
    rhs_env.enter_level();

    let value_ty = if recursive {
        let name = match pattern {
            vibefun_ast::Pattern::Var { name, .. } => *name,
            _ => return Err(CheckError::CannotGeneralizeNonValue { span }),
        };
        let placeholder = ctx.fresh(rhs_env.level());
        rhs_env.bind_value(
            name,
            Binding::Value { scheme: Scheme::monomorphic(placeholder.clone()), location: span },
        );
        let inferred = infer_expr(ctx, &rhs_env, value)?;
        ctx.unify(&placeholder, &inferred, span)?;
        inferred
    } else {
        infer_expr(ctx, &rhs_env, value)?
    };
    rhs_env.exit_level();

    let mut outer = env.clone();
    match pattern {
        vibefun_ast::Pattern::Var { name, .. } => {
            let scheme = if !mutable && value.is_syntactic_value() {
                ctx.generalize(&outer, outer.level(), &value_ty)
            } else {
                Scheme::monomorphic(ctx.resolve(&value_ty))
            };
            outer.bind_value(*name, Binding::Value { scheme, location: span });
        }
        _ => {
            let bindings = crate::pattern::infer_pattern(ctx, &outer, pattern, &value_ty)?;
            for (name, ty) in bindings {
                outer.bind_value(name, Binding::Value { scheme: Scheme::monomorphic(ty), location: span });
            }
        }
    }

    infer_expr(ctx, &outer, body)
}

fn infer_let_rec(
    ctx: &mut InferCtx,
    env: &Env,
    bindings: &[vibefun_ast::LetRecBinding],
    body: &Expr,
) -> Result<Type, CheckError> {
    let mut rhs_env = env.clone();
    rhs_env.enter_level();

    let mut placeholders = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let name = match &binding.pattern {
            vibefun_ast::Pattern::Var { name, .. } => *name,
            _ => return Err(CheckError::CannotGeneralizeNonValue { span: binding.pattern.span() }),
        };
        let placeholder = ctx.fresh(rhs_env.level());
        rhs_env.bind_value(
            name,
            Binding::Value { scheme: Scheme::monomorphic(placeholder.clone()), location: binding.pattern.span() },
        );
        placeholders.push((name, placeholder));
    }

    for (binding, (_, placeholder)) in bindings.iter().zip(&placeholders) {
        let inferred = infer_expr(ctx, &rhs_env, &binding.value)?;
        ctx.unify(placeholder, &inferred, binding.value.span())?;
    }
    rhs_env.exit_level();

    let mut outer = env.clone();
    for (binding, (name, placeholder)) in bindings.iter().zip(&placeholders) {
        let scheme = if !binding.mutable && binding.value.is_syntactic_value() {
            ctx.generalize(&outer, outer.level(), placeholder)
        } else {
            Scheme::monomorphic(ctx.resolve(placeholder))
        };
        outer.bind_value(*name, Binding::Value { scheme, location: binding.value.span() });
    }

    infer_expr(ctx, &outer, body)
}

fn infer_variant(
    ctx: &mut InferCtx,
    env: &Env,
    ctor: Symbol,
    args: &[Expr],
    span: vibefun_util::Span,
) -> Result<Type, CheckError> {
    let binding = env.lookup_value(ctor).ok_or_else(|| {
        let candidates: Vec<&str> = env.value_names().map(|n| n.as_str()).collect();
        let suggestion = vibefun_util::diagnostic::did_you_mean(ctor.as_str(), candidates).map(Symbol::intern);
        CheckError::UndefinedConstructor { name: ctor, suggestion, span }
    })?;
    let scheme = binding.scheme().clone();
    let instantiated = ctx.instantiate(&scheme, env.level());

    if args.is_empty() {
        return Ok(instantiated);
    }
    let arg_types: Vec<Type> = args.iter().map(|a| infer_expr(ctx, env, a)).collect::<Result<_, _>>()?;
    ctx.unify_application(&instantiated, &arg_types, env.level(), span)
}

fn infer_binop(
    ctx: &mut InferCtx,
    env: &Env,
    op: BinOp,
    left: &Expr,
    right: &Expr,
    span: vibefun_util::Span,
) -> Result<Type, CheckError> {
    let left_ty = infer_expr(ctx, env, left)?;
    let right_ty = infer_expr(ctx, env, right)?;

    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            ctx.unify(&left_ty, &right_ty, span)?;
            require_numeric(ctx, &left_ty, span)
        }
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
            ctx.unify(&left_ty, &right_ty, span)?;
            require_numeric(ctx, &left_ty, span)?;
            Ok(Type::bool())
        }
        BinOp::Eq | BinOp::NotEq => {
            ctx.unify(&left_ty, &right_ty, span)?;
            Ok(Type::bool())
        }
        BinOp::And | BinOp::Or => {
            ctx.unify(&left_ty, &Type::bool(), span)?;
            ctx.unify(&right_ty, &Type::bool(), span)?;
            Ok(Type::bool())
        }
        BinOp::Concat => {
            ctx.unify(&left_ty, &Type::string(), span)?;
            ctx.unify(&right_ty, &Type::string(), span)?;
            Ok(Type::string())
        }
        BinOp::Assign => {
            let inner = ctx.fresh(env.level());
            ctx.unify(&left_ty, &Type::reference(inner.clone()), span)?;
            ctx.unify(&right_ty, &inner, span)?;
            Ok(Type::unit())
        }
    }
}

/// Arithmetic and comparison operators accept `Int` or `Float`, defaulting
/// an operand that is still an unresolved type variable to `Int` (the
/// literal `1 + 1` should check without an explicit annotation).
fn require_numeric(ctx: &mut InferCtx, ty: &Type, span: vibefun_util::Span) -> Result<Type, CheckError> {
    let resolved = ctx.resolve(ty);
    match resolved {
        Type::Const(name) if name == Symbol::intern("Int") => Ok(Type::int()),
        Type::Const(name) if name == Symbol::intern("Float") => Ok(Type::float()),
        Type::Var { .. } => {
            ctx.unify(ty, &Type::int(), span)?;
            Ok(Type::int())
        }
        other => Err(CheckError::TypeMismatch { expected: Type::int(), found: other, span }),
    }
}

fn infer_unaryop(
    ctx: &mut InferCtx,
    env: &Env,
    op: UnOp,
    operand: &Expr,
    span: vibefun_util::Span,
) -> Result<Type, CheckError> {
    let operand_ty = infer_expr(ctx, env, operand)?;
    match op {
        UnOp::Neg => require_numeric(ctx, &operand_ty, span),
        UnOp::LogicalNotOrDeref => {
            let resolved = ctx.resolve(&operand_ty);
            match resolved {
                Type::Const(name) if name == Symbol::intern("Bool") => Ok(Type::bool()),
                Type::App { ctor, mut args } if ctor == Symbol::intern("Ref") && args.len() == 1 => {
                    Ok(args.remove(0))
                }
                Type::Var { .. } => {
                    ctx.unify(&operand_ty, &Type::bool(), span)?;
                    Ok(Type::bool())
                }
                other => Err(CheckError::TypeMismatch { expected: Type::bool(), found: other, span }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{ExprId, Pattern};
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn int_literal_has_int_type() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let expr = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        assert_eq!(infer_expr(&mut ctx, &env, &expr).unwrap(), Type::int());
    }

    #[test]
    fn identity_lambda_generalizes_at_let() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let identity = Expr::Lambda {
            param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            body: Box::new(Expr::Var { name: Symbol::intern("x"), id: id(0), span: Span::DUMMY }),
            id: id(1),
            span: Span::DUMMY,
        };
        let body = Expr::App {
            func: Box::new(Expr::Var { name: Symbol::intern("id"), id: id(2), span: Span::DUMMY }),
            args: vec![Expr::IntLit { value: 1, id: id(3), span: Span::DUMMY }],
            id: id(4),
            span: Span::DUMMY,
        };
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("id"), span: Span::DUMMY }),
            value: Box::new(identity),
            body: Box::new(body),
            mutable: false,
            recursive: false,
            id: id(5),
            span: Span::DUMMY,
        };
        assert_eq!(infer_expr(&mut ctx, &env, &let_expr).unwrap(), Type::int());
    }

    #[test]
    fn applying_non_function_is_a_type_error() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let let_expr = Expr::Let {
            pattern: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
            value: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
            body: Box::new(Expr::App {
                func: Box::new(Expr::Var { name: Symbol::intern("x"), id: id(1), span: Span::DUMMY }),
                args: vec![],
                id: id(2),
                span: Span::DUMMY,
            }),
            mutable: false,
            recursive: false,
            id: id(3),
            span: Span::DUMMY,
        };
        assert!(infer_expr(&mut ctx, &env, &let_expr).is_err());
    }

    #[test]
    fn record_access_accepts_width_subtyping() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let record = Expr::Record {
            fields: vec![
                RecordItem::Field { name: Symbol::intern("x"), value: Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY } },
                RecordItem::Field { name: Symbol::intern("y"), value: Expr::BoolLit { value: true, id: id(1), span: Span::DUMMY } },
            ],
            id: id(2),
            span: Span::DUMMY,
        };
        let access = Expr::RecordAccess { record: Box::new(record), field: Symbol::intern("x"), id: id(3), span: Span::DUMMY };
        assert_eq!(infer_expr(&mut ctx, &env, &access).unwrap(), Type::int());
    }

    #[test]
    fn dereference_of_ref_unwraps_inner_type() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let r = Expr::TypeAnnotation {
            expr: Box::new(Expr::Unsafe { expr: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }), id: id(1), span: Span::DUMMY }),
            ty: Type::reference(Type::int()),
            id: id(2),
            span: Span::DUMMY,
        };
        let deref = Expr::UnaryOp { op: UnOp::LogicalNotOrDeref, expr: Box::new(r), id: id(3), span: Span::DUMMY };
        assert_eq!(infer_expr(&mut ctx, &env, &deref).unwrap(), Type::int());
    }

    #[test]
    fn mismatched_branch_types_are_rejected() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let if_like = Expr::Match {
            scrutinee: Box::new(Expr::BoolLit { value: true, id: id(0), span: Span::DUMMY }),
            cases: vec![
                vibefun_ast::MatchCase {
                    pattern: Pattern::Literal { value: vibefun_ast::expr::PatternLiteral::Bool(true), span: Span::DUMMY },
                    guard: None,
                    body: Expr::IntLit { value: 1, id: id(1), span: Span::DUMMY },
                },
                vibefun_ast::MatchCase {
                    pattern: Pattern::Literal { value: vibefun_ast::expr::PatternLiteral::Bool(false), span: Span::DUMMY },
                    guard: None,
                    body: Expr::StringLit { value: "no".to_string(), id: id(2), span: Span::DUMMY },
                },
            ],
            id: id(3),
            span: Span::DUMMY,
        };
        assert!(infer_expr(&mut ctx, &env, &if_like).is_err());
    }
}

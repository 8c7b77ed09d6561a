//! Module-level checking (§4.2/§4.3): build the environment once, then
//! thread it left-to-right across top-level declarations the same way
//! `Expr::Let`/`Expr::LetRecExpr` thread it through a nested scope, except
//! there is no enclosing `body` — each later declaration sees everything
//! bound so far, and the loop itself plays the role `body` would.
//!
//! A declaration that fails to check does not stop the module: the checker
//! records the error and binds every name the declaration would have bound
//! to a fresh, unconstrained placeholder, so later declarations can still
//! reference the name instead of cascading into spurious `UndefinedVariable`
//! errors for everything downstream (§4.3 "Failure semantics").

use crate::error::{CheckError, CheckWarning};
use crate::infer::InferCtx;
use indexmap::IndexMap;
use vibefun_ast::{Binding, CoreModule, Decl, Env, LetRecBinding, Pattern, Scheme, Type};
use vibefun_util::Symbol;

pub struct TypedModule {
    pub env: Env,
    pub types: IndexMap<Symbol, Type>,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

pub fn check_module(module: &CoreModule) -> TypedModule {
    let mut ctx = InferCtx::new();
    let (mut env, mut errors) = crate::env::build_env(module, &mut ctx);
    let mut types = IndexMap::new();

    for decl in &module.decls {
        match decl {
            Decl::Let { pattern, value, mutable, recursive, span } => {
                match infer_decl_let(&mut ctx, &env, pattern, value, *mutable, *recursive, *span) {
                    Ok(bound) => {
                        for (name, scheme) in bound {
                            types.insert(name, scheme.body.clone());
                            env.bind_value(name, Binding::Value { scheme, location: *span });
                        }
                    }
                    Err(e) => {
                        errors.push(e);
                        bind_placeholders(&mut ctx, &mut env, &mut types, pattern, *span);
                    }
                }
            }
            Decl::LetRec { bindings, span } => {
                match infer_decl_let_rec(&mut ctx, &env, bindings) {
                    Ok(bound) => {
                        for (name, scheme) in bound {
                            types.insert(name, scheme.body.clone());
                            env.bind_value(name, Binding::Value { scheme, location: *span });
                        }
                    }
                    Err(e) => {
                        errors.push(e);
                        for binding in bindings {
                            bind_placeholders(&mut ctx, &mut env, &mut types, &binding.pattern, *span);
                        }
                    }
                }
            }
            Decl::Type(_) | Decl::External(_) => {}
        }
    }

    TypedModule { env, types, errors, warnings: ctx.warnings }
}

fn bind_placeholders(
    ctx: &mut InferCtx,
    env: &mut Env,
    types: &mut IndexMap<Symbol, Type>,
    pattern: &Pattern,
    span: vibefun_util::Span,
) {
    let mut names = Vec::new();
    pattern.bound_names(&mut names);
    for name in names {
        let placeholder = ctx.fresh(env.level());
        types.insert(name, placeholder.clone());
        env.bind_value(name, Binding::Value { scheme: Scheme::monomorphic(placeholder), location: span });
    }
}

/// Mirrors `Expr::Let`'s rule, but with no `body` to infer afterward — the
/// caller binds the result into the module's running environment instead.
fn infer_decl_let(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &Pattern,
    value: &vibefun_ast::Expr,
    mutable: bool,
    recursive: bool,
    span: vibefun_util::Span,
) -> Result<Vec<(Symbol, Scheme)>, CheckError> {
    let mut rhs_env = env.clone();
    rhs_env.enter_level();

    let value_ty = if recursive {
        let name = match pattern {
            Pattern::Var { name, .. } => *name,
            _ => return Err(CheckError::CannotGeneralizeNonValue { span }),
        };
        let placeholder = ctx.fresh(rhs_env.level());
        rhs_env.bind_value(
            name,
            Binding::Value { scheme: Scheme::monomorphic(placeholder.clone()), location: span },
        );
        let inferred = crate::expr::infer_expr(ctx, &rhs_env, value)?;
        ctx.unify(&placeholder, &inferred, span)?;
        inferred
    } else {
        crate::expr::infer_expr(ctx, &rhs_env, value)?
    };
    rhs_env.exit_level();

    match pattern {
        Pattern::Var { name, .. } => {
            let scheme = if !mutable && value.is_syntactic_value() {
                ctx.generalize(env, env.level(), &value_ty)
            } else {
                Scheme::monomorphic(ctx.resolve(&value_ty))
            };
            Ok(vec![(*name, scheme)])
        }
        _ => {
            let bindings = crate::pattern::infer_pattern(ctx, env, pattern, &value_ty)?;
            Ok(bindings.into_iter().map(|(name, ty)| (name, Scheme::monomorphic(ty))).collect())
        }
    }
}

fn infer_decl_let_rec(
    ctx: &mut InferCtx,
    env: &Env,
    bindings: &[LetRecBinding],
) -> Result<Vec<(Symbol, Scheme)>, CheckError> {
    let mut rhs_env = env.clone();
    rhs_env.enter_level();

    let mut placeholders = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let name = match &binding.pattern {
            Pattern::Var { name, .. } => *name,
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
        let inferred = crate::expr::infer_expr(ctx, &rhs_env, &binding.value)?;
        ctx.unify(placeholder, &inferred, binding.value.span())?;
    }
    rhs_env.exit_level();

    let mut out = Vec::with_capacity(bindings.len());
    for (binding, (name, placeholder)) in bindings.iter().zip(&placeholders) {
        let scheme = if !binding.mutable && binding.value.is_syntactic_value() {
            ctx.generalize(env, env.level(), placeholder)
        } else {
            Scheme::monomorphic(ctx.resolve(placeholder))
        };
        out.push((*name, scheme));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{Expr, ExprId};
    use vibefun_util::Span;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn later_declaration_sees_earlier_binding() {
        let module = CoreModule {
            decls: vec![
                Decl::Let {
                    pattern: Pattern::Var { name: Symbol::intern("one"), span: Span::DUMMY },
                    value: Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY },
                    mutable: false,
                    recursive: false,
                    span: Span::DUMMY,
                },
                Decl::Let {
                    pattern: Pattern::Var { name: Symbol::intern("two"), span: Span::DUMMY },
                    value: Expr::BinOp {
                        op: vibefun_ast::BinOp::Add,
                        left: Box::new(Expr::Var { name: Symbol::intern("one"), id: id(1), span: Span::DUMMY }),
                        right: Box::new(Expr::Var { name: Symbol::intern("one"), id: id(2), span: Span::DUMMY }),
                        id: id(3),
                        span: Span::DUMMY,
                    },
                    mutable: false,
                    recursive: false,
                    span: Span::DUMMY,
                },
            ],
        };
        let typed = check_module(&module);
        assert!(typed.errors.is_empty());
        assert_eq!(typed.types.get(&Symbol::intern("two")), Some(&Type::int()));
    }

    #[test]
    fn failed_declaration_binds_placeholder_for_later_references() {
        let module = CoreModule {
            decls: vec![
                Decl::Let {
                    pattern: Pattern::Var { name: Symbol::intern("bad"), span: Span::DUMMY },
                    value: Expr::App {
                        func: Box::new(Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY }),
                        args: vec![],
                        id: id(1),
                        span: Span::DUMMY,
                    },
                    mutable: false,
                    recursive: false,
                    span: Span::DUMMY,
                },
                Decl::Let {
                    pattern: Pattern::Var { name: Symbol::intern("uses_bad"), span: Span::DUMMY },
                    value: Expr::Var { name: Symbol::intern("bad"), id: id(2), span: Span::DUMMY },
                    mutable: false,
                    recursive: false,
                    span: Span::DUMMY,
                },
            ],
        };
        let typed = check_module(&module);
        assert_eq!(typed.errors.len(), 1);
        assert!(typed.types.contains_key(&Symbol::intern("uses_bad")));
    }

    #[test]
    fn recursive_function_may_call_itself() {
        let module = CoreModule {
            decls: vec![Decl::Let {
                pattern: Pattern::Var { name: Symbol::intern("loop_") , span: Span::DUMMY },
                value: Expr::Lambda {
                    param: Box::new(Pattern::Var { name: Symbol::intern("x"), span: Span::DUMMY }),
                    body: Box::new(Expr::App {
                        func: Box::new(Expr::Var { name: Symbol::intern("loop_"), id: id(0), span: Span::DUMMY }),
                        args: vec![Expr::Var { name: Symbol::intern("x"), id: id(1), span: Span::DUMMY }],
                        id: id(2),
                        span: Span::DUMMY,
                    }),
                    id: id(3),
                    span: Span::DUMMY,
                },
                mutable: false,
                recursive: true,
                span: Span::DUMMY,
            }],
        };
        let typed = check_module(&module);
        assert!(typed.errors.is_empty());
    }
}

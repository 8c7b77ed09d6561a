//! FFI overload resolution (§4.6): merging same-named `external` declarations
//! into an arity-indexed table during environment construction, and looking
//! an arity up again at an application site.

use crate::error::CheckError;
use crate::infer::InferCtx;
use indexmap::IndexMap;
use vibefun_ast::{Binding, Env, ExternalDecl, Scheme, Type};
use vibefun_util::{Span, Symbol};

/// Group `externals` by name and merge each group into one arity-indexed
/// overload table, checking the merge-time invariants: every overload must
/// be a function type, no two overloads of the same name may share a
/// parameter count, and every overload of the same name must agree on the
/// underlying `js_name`/`module` it binds to (they dispatch to the same
/// foreign function by arity, not to unrelated ones).
pub fn merge_externals(
    _ctx: &mut InferCtx,
    env: &Env,
    externals: &[&ExternalDecl],
    errors: &mut Vec<CheckError>,
) -> Vec<(Symbol, Binding)> {
    let mut by_name: IndexMap<Symbol, Vec<&ExternalDecl>> = IndexMap::new();
    for decl in externals {
        by_name.entry(decl.name).or_default().push(decl);
    }

    let mut out = Vec::new();
    for (name, decls) in by_name {
        let mut overloads: IndexMap<usize, Scheme> = IndexMap::new();
        let mut canonical: Option<(String, Option<String>)> = None;

        for decl in &decls {
            let resolved = match crate::env::resolve_type_expr(env, &decl.ty) {
                Ok(t) => t,
                Err(e) => {
                    errors.push(e);
                    continue;
                }
            };
            let arity = match &resolved {
                Type::Function { params, .. } => params.len(),
                _ => {
                    errors.push(CheckError::OverloadNotAFunction { name, span: decl.span });
                    continue;
                }
            };

            match &canonical {
                None => canonical = Some((decl.js_name.clone(), decl.module.clone())),
                Some((js_name, module)) => {
                    if js_name != &decl.js_name {
                        errors.push(CheckError::InconsistentOverloadSignature {
                            name,
                            detail: "js_name",
                            span: decl.span,
                        });
                        continue;
                    }
                    if module != &decl.module {
                        errors.push(CheckError::InconsistentOverloadSignature {
                            name,
                            detail: "module",
                            span: decl.span,
                        });
                        continue;
                    }
                }
            }

            if overloads.contains_key(&arity) {
                errors.push(CheckError::InconsistentOverloadSignature {
                    name,
                    detail: "duplicate arity among overloads",
                    span: decl.span,
                });
                continue;
            }
            overloads.insert(arity, Scheme::monomorphic(resolved));
        }

        if overloads.is_empty() {
            continue;
        }
        let (js_name, module) = canonical.expect("overloads non-empty implies canonical was set");
        let scheme = overloads.get_index(0).expect("just checked non-empty").1.clone();
        out.push((name, Binding::External { scheme, js_name, module, overloads }));
    }
    out
}

/// Look an application's argument count up in an overload table. Used by
/// `crate::expr::infer_expr`'s `App` rule once the callee is known to be an
/// overloaded external.
pub fn resolve_overload(
    overloads: &IndexMap<usize, Scheme>,
    arity: usize,
    name: Symbol,
    span: Span,
) -> Result<Scheme, CheckError> {
    overloads.get(&arity).cloned().ok_or_else(|| {
        let mut available: Vec<usize> = overloads.keys().copied().collect();
        available.sort_unstable();
        CheckError::NoMatchingOverload { name, found: arity, available, span }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::TOP_LEVEL;

    fn ext(name: &str, params: Vec<Type>, js_name: &str, module: &str, span: Span) -> ExternalDecl {
        ExternalDecl {
            name: Symbol::intern(name),
            ty: Type::Function { params, result: Box::new(Type::unit()) },
            js_name: js_name.to_string(),
            module: Some(module.to_string()),
            span,
        }
    }

    #[test]
    fn overloads_of_same_arity_are_rejected() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let a = ext("log", vec![Type::int()], "log", "console", Span::DUMMY);
        let b = ext("log", vec![Type::string()], "log", "console", Span::DUMMY);
        let mut errors = Vec::new();
        let bound = merge_externals(&mut ctx, &env, &[&a, &b], &mut errors);
        assert!(errors.iter().any(|e| matches!(e, CheckError::InconsistentOverloadSignature { .. })));
        assert_eq!(bound.len(), 1);
    }

    #[test]
    fn distinct_arities_merge_cleanly() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let a = ext("log", vec![Type::int()], "log", "console", Span::DUMMY);
        let b = ext("log", vec![Type::int(), Type::string()], "log", "console", Span::DUMMY);
        let mut errors = Vec::new();
        let bound = merge_externals(&mut ctx, &env, &[&a, &b], &mut errors);
        assert!(errors.is_empty());
        match &bound[0].1 {
            Binding::External { overloads, .. } => assert_eq!(overloads.len(), 2),
            _ => panic!("expected External binding"),
        }
    }

    #[test]
    fn mismatched_js_name_is_rejected() {
        let mut ctx = InferCtx::new();
        let env = crate::env::prelude_env(&mut ctx);
        let a = ext("log", vec![Type::int()], "log", "console", Span::DUMMY);
        let b = ext("log", vec![Type::int(), Type::string()], "warn", "console", Span::DUMMY);
        let mut errors = Vec::new();
        merge_externals(&mut ctx, &env, &[&a, &b], &mut errors);
        assert!(errors.iter().any(|e| matches!(e, CheckError::InconsistentOverloadSignature { detail: "js_name", .. })));
    }

    #[test]
    fn resolve_overload_reports_available_arities_on_miss() {
        let mut ctx = InferCtx::new();
        let _ = ctx.fresh(TOP_LEVEL);
        let mut overloads = IndexMap::new();
        overloads.insert(1usize, Scheme::monomorphic(Type::unit()));
        overloads.insert(2usize, Scheme::monomorphic(Type::unit()));
        let err = resolve_overload(&overloads, 3, Symbol::intern("f"), Span::DUMMY).unwrap_err();
        match err {
            CheckError::NoMatchingOverload { available, .. } => assert_eq!(available, vec![1, 2]),
            other => panic!("expected NoMatchingOverload, got {other:?}"),
        }
    }
}

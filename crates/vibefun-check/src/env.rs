//! Environment construction (§4.2): seed the built-in prelude, then walk a
//! module's declarations top-to-bottom once to register every type
//! declaration (aliases and variants), merge `external` declarations into
//! overload tables, and hand back an [`Env`] ready for top-level declaration
//! threading. Top-level `let`/`let rec` *names* are not pre-registered here
//! — ordinary lets thread left-to-right during inference itself (see
//! `crate::module::check_module`), and a `let rec` group pre-binds its own
//! names the same way `Expr::LetRecExpr` does.

use crate::error::CheckError;
use crate::infer::InferCtx;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use vibefun_ast::{
    Binding, ConstructorInfo, CoreModule, Decl, Env, ExternalDecl, Scheme, Type, TypeDecl,
    TypeDeclGroup, TypeDeclKind, TypeInfo, TOP_LEVEL,
};
use vibefun_util::{Span, Symbol};

/// Arity every type constructor in scope is declared with: builtins plus
/// every user `type` declaration in the module, collected before any type
/// expression is resolved so forward and mutually-recursive references
/// (among variants; see the module-level doc comment on alias cycles) can
/// be arity-checked regardless of declaration order.
struct TypeArities(FxHashMap<Symbol, usize>);

impl TypeArities {
    fn get(&self, name: Symbol) -> Option<usize> {
        self.0.get(&name).copied()
    }
}

fn builtin_arities() -> FxHashMap<Symbol, usize> {
    [
        ("Int", 0),
        ("Float", 0),
        ("String", 0),
        ("Bool", 0),
        ("Unit", 0),
        ("List", 1),
        ("Option", 1),
        ("Ref", 1),
        ("Result", 2),
    ]
    .into_iter()
    .map(|(n, a)| (Symbol::intern(n), a))
    .collect()
}

/// Every declared type name's raw (unresolved) definition, keyed by name,
/// gathered in a first pass over the whole module regardless of which
/// `TypeDeclGroup` it appears in.
struct DeclIndex<'a> {
    aliases: FxHashMap<Symbol, (&'a [Symbol], &'a Type)>,
    variants: FxHashMap<Symbol, &'a TypeDecl>,
}

/// Seed the built-in types and constructors (§6): `Bool`, `Unit`, `List<T>`,
/// `Option<T>`, `Result<T, E>`, `Ref<T>`.
pub fn prelude_env(ctx: &mut InferCtx) -> Env {
    let mut env = Env::new();

    env.bind_type(Symbol::intern("Bool"), TypeInfo::Opaque);
    env.bind_type(Symbol::intern("Unit"), TypeInfo::Opaque);
    env.bind_type(Symbol::intern("String"), TypeInfo::Opaque);
    env.bind_type(Symbol::intern("Int"), TypeInfo::Opaque);
    env.bind_type(Symbol::intern("Float"), TypeInfo::Opaque);
    env.bind_type(Symbol::intern("Ref"), TypeInfo::Opaque);

    bind_bool_ctors(&mut env);
    bind_unit_ctor(&mut env);
    bind_list_ctors(ctx, &mut env);
    bind_option_ctors(ctx, &mut env);
    bind_result_ctors(ctx, &mut env);

    env
}

fn bind_bool_ctors(env: &mut Env) {
    env.bind_value(
        Symbol::intern("True"),
        Binding::Value { scheme: Scheme::monomorphic(Type::bool()), location: Span::DUMMY },
    );
    env.bind_value(
        Symbol::intern("False"),
        Binding::Value { scheme: Scheme::monomorphic(Type::bool()), location: Span::DUMMY },
    );
    env.bind_type(
        Symbol::intern("Bool"),
        TypeInfo::Variant {
            generics: Vec::new(),
            constructors: vec![
                ConstructorInfo {
                    name: Symbol::intern("True"),
                    owner: Symbol::intern("Bool"),
                    arg_types: Vec::new(),
                    owner_generics: Vec::new(),
                },
                ConstructorInfo {
                    name: Symbol::intern("False"),
                    owner: Symbol::intern("Bool"),
                    arg_types: Vec::new(),
                    owner_generics: Vec::new(),
                },
            ],
        },
    );
}

fn bind_unit_ctor(env: &mut Env) {
    env.bind_type(
        Symbol::intern("Unit"),
        TypeInfo::Variant {
            generics: Vec::new(),
            constructors: vec![ConstructorInfo {
                name: Symbol::intern("()"),
                owner: Symbol::intern("Unit"),
                arg_types: Vec::new(),
                owner_generics: Vec::new(),
            }],
        },
    );
}

fn bind_list_ctors(ctx: &mut InferCtx, env: &mut Env) {
    let t = ctx.fresh(TOP_LEVEL);
    let t_id = var_id(&t);
    let list_t = Type::list(t.clone());

    env.bind_value(
        Symbol::intern("Nil"),
        Binding::Value {
            scheme: Scheme { quantified: vec![t_id], body: list_t.clone() },
            location: Span::DUMMY,
        },
    );
    env.bind_value(
        Symbol::intern("Cons"),
        Binding::Value {
            scheme: Scheme {
                quantified: vec![t_id],
                body: Type::Function { params: vec![t.clone(), list_t.clone()], result: Box::new(list_t) },
            },
            location: Span::DUMMY,
        },
    );
    env.bind_type(
        Symbol::intern("List"),
        TypeInfo::Variant {
            generics: vec![Symbol::intern("T")],
            constructors: vec![
                ConstructorInfo {
                    name: Symbol::intern("Nil"),
                    owner: Symbol::intern("List"),
                    arg_types: Vec::new(),
                    owner_generics: vec![Symbol::intern("T")],
                },
                ConstructorInfo {
                    name: Symbol::intern("Cons"),
                    owner: Symbol::intern("List"),
                    arg_types: vec![t.clone(), Type::list(t)],
                    owner_generics: vec![Symbol::intern("T")],
                },
            ],
        },
    );
}

fn bind_option_ctors(ctx: &mut InferCtx, env: &mut Env) {
    let t = ctx.fresh(TOP_LEVEL);
    let t_id = var_id(&t);
    let option_t = Type::option(t.clone());

    env.bind_value(
        Symbol::intern("None"),
        Binding::Value {
            scheme: Scheme { quantified: vec![t_id], body: option_t.clone() },
            location: Span::DUMMY,
        },
    );
    env.bind_value(
        Symbol::intern("Some"),
        Binding::Value {
            scheme: Scheme {
                quantified: vec![t_id],
                body: Type::Function { params: vec![t.clone()], result: Box::new(option_t) },
            },
            location: Span::DUMMY,
        },
    );
    env.bind_type(
        Symbol::intern("Option"),
        TypeInfo::Variant {
            generics: vec![Symbol::intern("T")],
            constructors: vec![
                ConstructorInfo {
                    name: Symbol::intern("None"),
                    owner: Symbol::intern("Option"),
                    arg_types: Vec::new(),
                    owner_generics: vec![Symbol::intern("T")],
                },
                ConstructorInfo {
                    name: Symbol::intern("Some"),
                    owner: Symbol::intern("Option"),
                    arg_types: vec![t],
                    owner_generics: vec![Symbol::intern("T")],
                },
            ],
        },
    );
}

fn bind_result_ctors(ctx: &mut InferCtx, env: &mut Env) {
    let t = ctx.fresh(TOP_LEVEL);
    let e = ctx.fresh(TOP_LEVEL);
    let t_id = var_id(&t);
    let e_id = var_id(&e);
    let result_t = Type::result(t.clone(), e.clone());

    env.bind_value(
        Symbol::intern("Ok"),
        Binding::Value {
            scheme: Scheme {
                quantified: vec![t_id, e_id],
                body: Type::Function { params: vec![t.clone()], result: Box::new(result_t.clone()) },
            },
            location: Span::DUMMY,
        },
    );
    env.bind_value(
        Symbol::intern("Err"),
        Binding::Value {
            scheme: Scheme {
                quantified: vec![t_id, e_id],
                body: Type::Function { params: vec![e.clone()], result: Box::new(result_t) },
            },
            location: Span::DUMMY,
        },
    );
    env.bind_type(
        Symbol::intern("Result"),
        TypeInfo::Variant {
            generics: vec![Symbol::intern("T"), Symbol::intern("E")],
            constructors: vec![
                ConstructorInfo {
                    name: Symbol::intern("Ok"),
                    owner: Symbol::intern("Result"),
                    arg_types: vec![t],
                    owner_generics: vec![Symbol::intern("T"), Symbol::intern("E")],
                },
                ConstructorInfo {
                    name: Symbol::intern("Err"),
                    owner: Symbol::intern("Result"),
                    arg_types: vec![e],
                    owner_generics: vec![Symbol::intern("T"), Symbol::intern("E")],
                },
            ],
        },
    );
}

fn var_id(ty: &Type) -> vibefun_ast::TypeVarId {
    match ty {
        Type::Var { id, .. } => *id,
        _ => unreachable!("fresh() always returns Type::Var"),
    }
}

/// Build the full environment for `module`: the prelude, every declared
/// type, and every external's merged overload table. Errors are collected
/// rather than returned early so the caller can report every problem in
/// one pass; a type or external that fails to resolve is simply omitted
/// from the environment (a later reference to it becomes `UndefinedType`
/// or `UndefinedVariable`, which is itself informative).
pub fn build_env(module: &CoreModule, ctx: &mut InferCtx) -> (Env, Vec<CheckError>) {
    let mut env = prelude_env(ctx);
    let mut errors = Vec::new();

    let groups: Vec<&TypeDeclGroup> =
        module.decls.iter().filter_map(|d| match d { Decl::Type(g) => Some(g), _ => None }).collect();

    let arities = collect_arities(&groups, &mut errors);
    let decl_index = build_decl_index(&groups);

    for group in &groups {
        for decl in &group.decls {
            match &decl.kind {
                TypeDeclKind::Alias(_) => {
                    match resolve_alias(decl.name, &decl_index, &arities, &mut FxHashMap::default(), &mut Vec::new(), ctx) {
                        Ok((generic_ids, body)) => {
                            env.bind_type(
                                decl.name,
                                TypeInfo::Alias { generics: decl.generics.clone(), generic_ids, body },
                            );
                        }
                        Err(e) => errors.push(e),
                    }
                }
                TypeDeclKind::Variant(ctors) => {
                    match build_variant(ctx, decl, ctors, &decl_index, &arities) {
                        Ok((type_info, bindings)) => {
                            env.bind_type(decl.name, type_info);
                            for (name, scheme) in bindings {
                                env.bind_value(name, Binding::Value { scheme, location: decl.span });
                            }
                        }
                        Err(mut e) => errors.append(&mut e),
                    }
                }
            }
        }
    }

    let externals: Vec<&ExternalDecl> =
        module.decls.iter().filter_map(|d| match d { Decl::External(e) => Some(e), _ => None }).collect();
    crate::ffi::merge_externals(ctx, &env, &externals, &mut errors)
        .into_iter()
        .for_each(|(name, binding)| env.bind_value(name, binding));

    (env, errors)
}

fn collect_arities(groups: &[&TypeDeclGroup], errors: &mut Vec<CheckError>) -> TypeArities {
    let mut table = builtin_arities();
    for group in groups {
        for decl in &group.decls {
            if table.contains_key(&decl.name) {
                errors.push(CheckError::DuplicateDeclaration { name: decl.name, span: decl.span });
                continue;
            }
            table.insert(decl.name, decl.generics.len());
        }
    }
    TypeArities(table)
}

fn build_decl_index<'a>(groups: &[&'a TypeDeclGroup]) -> DeclIndex<'a> {
    let mut aliases = FxHashMap::default();
    let mut variants = FxHashMap::default();
    for group in groups {
        for decl in &group.decls {
            match &decl.kind {
                TypeDeclKind::Alias(body) => {
                    aliases.insert(decl.name, (decl.generics.as_slice(), body));
                }
                TypeDeclKind::Variant(_) => {
                    variants.insert(decl.name, *decl);
                }
            }
        }
    }
    DeclIndex { aliases, variants }
}

/// Resolve alias `name` to `(its canonical generic ids, its fully-expanded
/// body)`, expanding nested alias references on demand (so forward and
/// backward references among aliases both work) and memoizing the result.
/// `in_progress` detects a genuine cycle: an alias whose expansion depends,
/// transitively, on itself, with no variant constructor in between to stop
/// it (§1 "mutually recursive aliases ... are rejected").
fn resolve_alias(
    name: Symbol,
    decls: &DeclIndex,
    arities: &TypeArities,
    memo: &mut FxHashMap<Symbol, (Vec<vibefun_ast::TypeVarId>, Type)>,
    in_progress: &mut Vec<Symbol>,
    ctx: &mut InferCtx,
) -> Result<(Vec<vibefun_ast::TypeVarId>, Type), CheckError> {
    if let Some(cached) = memo.get(&name) {
        return Ok(cached.clone());
    }
    if in_progress.contains(&name) {
        return Err(CheckError::CyclicTypeAlias { name, span: Span::DUMMY });
    }
    let (generics, raw_body) =
        *decls.aliases.get(&name).expect("resolve_alias only called for known aliases");

    in_progress.push(name);
    let generics_map: FxHashMap<Symbol, Type> =
        generics.iter().map(|g| (*g, ctx.fresh(TOP_LEVEL))).collect();
    let resolved = resolve_type_ref(raw_body, &generics_map, decls, arities, memo, in_progress, ctx);
    in_progress.pop();
    let resolved = resolved?;

    let generic_ids: Vec<vibefun_ast::TypeVarId> =
        generics.iter().map(|g| var_id(&generics_map[g])).collect();
    memo.insert(name, (generic_ids.clone(), resolved.clone()));
    Ok((generic_ids, resolved))
}

/// Resolve every name occurring in `ty` (as produced by the desugarer)
/// against the declarations known in this module: a declaration's own
/// generic parameters substitute to the fresh variable `generics_map` holds
/// for them; an alias name expands to its body; a variant or builtin name
/// is left as a nominal reference once its arity is checked.
#[allow(clippy::too_many_arguments)]
fn resolve_type_ref(
    ty: &Type,
    generics_map: &FxHashMap<Symbol, Type>,
    decls: &DeclIndex,
    arities: &TypeArities,
    memo: &mut FxHashMap<Symbol, (Vec<vibefun_ast::TypeVarId>, Type)>,
    in_progress: &mut Vec<Symbol>,
    ctx: &mut InferCtx,
) -> Result<Type, CheckError> {
    match ty {
        Type::Const(name) => {
            if let Some(t) = generics_map.get(name) {
                return Ok(t.clone());
            }
            if decls.aliases.contains_key(name) {
                let (ids, body) = resolve_alias(*name, decls, arities, memo, in_progress, ctx)?;
                return Ok(substitute_generic(&body, &ids, &[]));
            }
            match arities.get(*name) {
                Some(0) => Ok(Type::Const(*name)),
                Some(expected) => Err(CheckError::TypeApplicationArityMismatch {
                    ctor: *name,
                    expected,
                    found: 0,
                    span: Span::DUMMY,
                }),
                None => Err(undefined_type(*name, arities)),
            }
        }
        Type::App { ctor, args } => {
            let resolved_args = args
                .iter()
                .map(|a| resolve_type_ref(a, generics_map, decls, arities, memo, in_progress, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            if decls.aliases.contains_key(ctor) {
                let (ids, body) = resolve_alias(*ctor, decls, arities, memo, in_progress, ctx)?;
                if ids.len() != resolved_args.len() {
                    return Err(CheckError::TypeApplicationArityMismatch {
                        ctor: *ctor,
                        expected: ids.len(),
                        found: resolved_args.len(),
                        span: Span::DUMMY,
                    });
                }
                return Ok(substitute_generic(&body, &ids, &resolved_args));
            }
            match arities.get(*ctor) {
                Some(expected) if expected == resolved_args.len() => {
                    Ok(Type::App { ctor: *ctor, args: resolved_args })
                }
                Some(expected) => Err(CheckError::TypeApplicationArityMismatch {
                    ctor: *ctor,
                    expected,
                    found: resolved_args.len(),
                    span: Span::DUMMY,
                }),
                None => Err(undefined_type(*ctor, arities)),
            }
        }
        Type::Function { params, result } => Ok(Type::Function {
            params: params
                .iter()
                .map(|p| resolve_type_ref(p, generics_map, decls, arities, memo, in_progress, ctx))
                .collect::<Result<_, _>>()?,
            result: Box::new(resolve_type_ref(result, generics_map, decls, arities, memo, in_progress, ctx)?),
        }),
        Type::Record(fields) => {
            let mut out = BTreeMap::new();
            for (name, field_ty) in fields {
                out.insert(
                    *name,
                    resolve_type_ref(field_ty, generics_map, decls, arities, memo, in_progress, ctx)?,
                );
            }
            Ok(Type::Record(out))
        }
        Type::Union(members) => Ok(Type::Union(
            members
                .iter()
                .map(|m| resolve_type_ref(m, generics_map, decls, arities, memo, in_progress, ctx))
                .collect::<Result<_, _>>()?,
        )),
        Type::Var { .. } => Ok(ty.clone()),
    }
}

fn undefined_type(name: Symbol, arities: &TypeArities) -> CheckError {
    let candidates: Vec<&str> = arities.0.keys().map(|s| s.as_str()).collect();
    let suggestion = vibefun_util::diagnostic::did_you_mean(name.as_str(), candidates).map(Symbol::intern);
    CheckError::UndefinedType { name, suggestion, span: Span::DUMMY }
}

fn substitute_generic(body: &Type, ids: &[vibefun_ast::TypeVarId], args: &[Type]) -> Type {
    if ids.is_empty() {
        return body.clone();
    }
    let mapping: FxHashMap<vibefun_ast::TypeVarId, Type> =
        ids.iter().copied().zip(args.iter().cloned()).collect();
    crate::infer::substitute_vars(body, &mapping)
}

#[allow(clippy::type_complexity)]
fn build_variant(
    ctx: &mut InferCtx,
    decl: &TypeDecl,
    ctors: &[vibefun_ast::VariantCtor],
    decls: &DeclIndex,
    arities: &TypeArities,
) -> Result<(TypeInfo, Vec<(Symbol, Scheme)>), Vec<CheckError>> {
    let generics_map: FxHashMap<Symbol, Type> =
        decl.generics.iter().map(|g| (*g, ctx.fresh(TOP_LEVEL))).collect();
    let generic_ids: Vec<vibefun_ast::TypeVarId> =
        decl.generics.iter().map(|g| var_id(&generics_map[g])).collect();
    let owner_ty = if generics_map.is_empty() {
        Type::Const(decl.name)
    } else {
        Type::App { ctor: decl.name, args: decl.generics.iter().map(|g| generics_map[g].clone()).collect() }
    };

    let mut ctor_infos = Vec::new();
    let mut bindings = Vec::new();
    let mut errors = Vec::new();

    for ctor in ctors {
        let mut memo = FxHashMap::default();
        let mut in_progress = Vec::new();
        let field_types: Result<Vec<Type>, CheckError> = ctor
            .fields
            .iter()
            .map(|f| resolve_type_ref(f, &generics_map, decls, arities, &mut memo, &mut in_progress, ctx))
            .collect();
        let field_types = match field_types {
            Ok(ts) => ts,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        ctor_infos.push(ConstructorInfo {
            name: ctor.name,
            owner: decl.name,
            arg_types: field_types.clone(),
            owner_generics: decl.generics.clone(),
        });

        let ctor_ty = if field_types.is_empty() {
            owner_ty.clone()
        } else {
            Type::Function { params: field_types, result: Box::new(owner_ty.clone()) }
        };
        bindings.push((ctor.name, Scheme { quantified: generic_ids.clone(), body: ctor_ty }));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok((TypeInfo::Variant { generics: decl.generics.clone(), constructors: ctor_infos }, bindings))
}

/// Resolve a type expression appearing outside a type declaration (a
/// `TypeAnnotation`'s declared type, an `external`'s declared type): no
/// generics are in scope, so any otherwise-undeclared name is `UndefinedType`.
pub fn resolve_type_expr(env: &Env, ty: &Type) -> Result<Type, CheckError> {
    let arities = env_arities(env);
    let decls = DeclIndex { aliases: FxHashMap::default(), variants: FxHashMap::default() };
    // Aliases already live fully-resolved in `env`; expand them by looking
    // there instead of re-deriving from raw declarations (those are gone
    // by the time this is called — this runs during inference, long after
    // `build_env` finished).
    resolve_against_env(ty, env, &arities, &decls)
}

fn env_arities(env: &Env) -> TypeArities {
    let mut table = builtin_arities();
    for name in env.type_names() {
        let arity = match env.lookup_type(name) {
            Some(TypeInfo::Alias { generics, .. }) => generics.len(),
            Some(TypeInfo::Variant { generics, .. }) => generics.len(),
            Some(TypeInfo::Opaque) | None => 0,
        };
        table.insert(name, arity);
    }
    TypeArities(table)
}

fn resolve_against_env(
    ty: &Type,
    env: &Env,
    arities: &TypeArities,
    decls: &DeclIndex,
) -> Result<Type, CheckError> {
    match ty {
        Type::Const(name) => match env.lookup_type(*name) {
            Some(TypeInfo::Alias { generic_ids, body, .. }) => {
                if !generic_ids.is_empty() {
                    return Err(CheckError::TypeApplicationArityMismatch {
                        ctor: *name,
                        expected: generic_ids.len(),
                        found: 0,
                        span: Span::DUMMY,
                    });
                }
                Ok(body.clone())
            }
            Some(_) => Ok(Type::Const(*name)),
            None => Err(undefined_type(*name, arities)),
        },
        Type::App { ctor, args } => {
            let resolved_args =
                args.iter().map(|a| resolve_against_env(a, env, arities, decls)).collect::<Result<Vec<_>, _>>()?;
            match env.lookup_type(*ctor) {
                Some(TypeInfo::Alias { generic_ids, body, .. }) => {
                    if generic_ids.len() != resolved_args.len() {
                        return Err(CheckError::TypeApplicationArityMismatch {
                            ctor: *ctor,
                            expected: generic_ids.len(),
                            found: resolved_args.len(),
                            span: Span::DUMMY,
                        });
                    }
                    Ok(substitute_generic(body, generic_ids, &resolved_args))
                }
                Some(_) => Ok(Type::App { ctor: *ctor, args: resolved_args }),
                None => Err(undefined_type(*ctor, arities)),
            }
        }
        Type::Function { params, result } => Ok(Type::Function {
            params: params.iter().map(|p| resolve_against_env(p, env, arities, decls)).collect::<Result<_, _>>()?,
            result: Box::new(resolve_against_env(result, env, arities, decls)?),
        }),
        Type::Record(fields) => {
            let mut out = BTreeMap::new();
            for (name, field_ty) in fields {
                out.insert(*name, resolve_against_env(field_ty, env, arities, decls)?);
            }
            Ok(Type::Record(out))
        }
        Type::Union(members) => Ok(Type::Union(
            members.iter().map(|m| resolve_against_env(m, env, arities, decls)).collect::<Result<_, _>>()?,
        )),
        Type::Var { .. } => Ok(ty.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibefun_ast::{Decl, TypeDecl, TypeDeclGroup, TypeDeclKind, VariantCtor};

    fn span() -> Span {
        Span::DUMMY
    }

    #[test]
    fn prelude_binds_option_constructors() {
        let mut ctx = InferCtx::new();
        let env = prelude_env(&mut ctx);
        assert!(env.lookup_value(Symbol::intern("Some")).is_some());
        assert!(env.lookup_value(Symbol::intern("None")).is_some());
    }

    #[test]
    fn self_recursive_variant_resolves() {
        let decl = TypeDecl {
            name: Symbol::intern("IntList"),
            generics: vec![],
            kind: TypeDeclKind::Variant(vec![
                VariantCtor { name: Symbol::intern("Empty"), fields: vec![], span: span() },
                VariantCtor {
                    name: Symbol::intern("More"),
                    fields: vec![Type::int(), Type::Const(Symbol::intern("IntList"))],
                    span: span(),
                },
            ]),
            span: span(),
        };
        let module = CoreModule { decls: vec![Decl::Type(TypeDeclGroup { decls: vec![decl], span: span() })] };
        let mut ctx = InferCtx::new();
        let (env, errors) = build_env(&module, &mut ctx);
        assert!(errors.is_empty());
        assert!(env.lookup_value(Symbol::intern("More")).is_some());
    }

    #[test]
    fn mutually_recursive_aliases_are_rejected() {
        let a = TypeDecl {
            name: Symbol::intern("A"),
            generics: vec![],
            kind: TypeDeclKind::Alias(Type::Const(Symbol::intern("B"))),
            span: span(),
        };
        let b = TypeDecl {
            name: Symbol::intern("B"),
            generics: vec![],
            kind: TypeDeclKind::Alias(Type::Const(Symbol::intern("A"))),
            span: span(),
        };
        let module =
            CoreModule { decls: vec![Decl::Type(TypeDeclGroup { decls: vec![a, b], span: span() })] };
        let mut ctx = InferCtx::new();
        let (_, errors) = build_env(&module, &mut ctx);
        assert!(errors.iter().any(|e| matches!(e, CheckError::CyclicTypeAlias { .. })));
    }

    #[test]
    fn forward_referencing_alias_resolves() {
        let a = TypeDecl {
            name: Symbol::intern("Pair"),
            generics: vec![],
            kind: TypeDeclKind::Alias(Type::Const(Symbol::intern("Coord"))),
            span: span(),
        };
        let b = TypeDecl {
            name: Symbol::intern("Coord"),
            generics: vec![],
            kind: TypeDeclKind::Alias(Type::int()),
            span: span(),
        };
        let module =
            CoreModule { decls: vec![Decl::Type(TypeDeclGroup { decls: vec![a, b], span: span() })] };
        let mut ctx = InferCtx::new();
        let (env, errors) = build_env(&module, &mut ctx);
        assert!(errors.is_empty());
        match env.lookup_type(Symbol::intern("Pair")) {
            Some(TypeInfo::Alias { body, .. }) => assert_eq!(*body, Type::int()),
            other => panic!("expected resolved alias, got {other:?}"),
        }
    }
}

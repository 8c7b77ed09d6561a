//! Expression desugaring: rewrites 1-8 of §4.1 (lambdas, `if`, pipe/compose,
//! blocks, list sugar, record update, the `ref`/`!`/`:=` mutable-reference
//! sugar). Rewrites 9-10 (`let rec ... and ...`, external blocks) operate
//! at module granularity and live in `module.rs`.

use crate::error::DesugarError;
use crate::pattern::desugar_pattern;
use crate::types::lower_type_expr;
use crate::Desugarer;
use vibefun_ast::expr::{BinOp as CoreBinOp, RecordItem, UnOp as CoreUnOp};
use vibefun_ast::{Expr as CoreExpr, LetRecBinding, MatchCase, Pattern as CorePattern};
use vibefun_surface::ast as surf;
use vibefun_util::{Span, Symbol};

pub fn desugar_expr(d: &mut Desugarer, expr: &surf::Expr) -> Result<CoreExpr, DesugarError> {
    match expr {
        surf::Expr::Int(v, span) => Ok(CoreExpr::IntLit { value: *v, id: d.next_id(), span: *span }),
        surf::Expr::Float(bits, span) => {
            Ok(CoreExpr::FloatLit { value: *bits, id: d.next_id(), span: *span })
        }
        surf::Expr::Str(s, span) => {
            Ok(CoreExpr::StringLit { value: s.clone(), id: d.next_id(), span: *span })
        }
        surf::Expr::Bool(v, span) => Ok(CoreExpr::BoolLit { value: *v, id: d.next_id(), span: *span }),
        surf::Expr::Unit(span) => Ok(CoreExpr::UnitLit { id: d.next_id(), span: *span }),

        surf::Expr::Var(path) => Ok(CoreExpr::Var { name: path.tail(), id: d.next_id(), span: path.span }),

        surf::Expr::Lambda { params, ret_type, body, span } => {
            desugar_lambda(d, params, ret_type.as_ref(), body, *span)
        }

        surf::Expr::App { func, args, span } => {
            if let Some(arg) = ref_call_argument(func, args) {
                let inner = desugar_expr(d, arg)?;
                return Ok(CoreExpr::Variant {
                    ctor: Symbol::intern("Ref"),
                    args: vec![inner],
                    id: d.next_id(),
                    span: *span,
                });
            }
            let func = Box::new(desugar_expr(d, func)?);
            let args = args.iter().map(|a| desugar_expr(d, a)).collect::<Result<_, _>>()?;
            Ok(CoreExpr::App { func, args, id: d.next_id(), span: *span })
        }

        surf::Expr::If { cond, then_branch, else_branch, span } => {
            let scrutinee = Box::new(desugar_expr(d, cond)?);
            let then_case = MatchCase {
                pattern: CorePattern::Variant { ctor: Symbol::intern("True"), args: vec![], span: *span },
                guard: None,
                body: desugar_expr(d, then_branch)?,
            };
            let else_case = MatchCase {
                pattern: CorePattern::Variant { ctor: Symbol::intern("False"), args: vec![], span: *span },
                guard: None,
                body: desugar_expr(d, else_branch)?,
            };
            Ok(CoreExpr::Match { scrutinee, cases: vec![then_case, else_case], id: d.next_id(), span: *span })
        }

        surf::Expr::Match { scrutinee, arms, span } => {
            let scrutinee = Box::new(desugar_expr(d, scrutinee)?);
            let cases = arms
                .iter()
                .map(|arm| {
                    Ok(MatchCase {
                        pattern: desugar_pattern(&arm.pattern),
                        guard: arm.guard.as_deref().map(|g| desugar_expr(d, g)).transpose()?,
                        body: desugar_expr(d, &arm.body)?,
                    })
                })
                .collect::<Result<_, DesugarError>>()?;
            Ok(CoreExpr::Match { scrutinee, cases, id: d.next_id(), span: *span })
        }

        surf::Expr::Let { decl, body, span } => {
            let (pattern, value, mutable) = lower_let_decl(d, decl)?;
            let body = Box::new(desugar_expr(d, body)?);
            Ok(CoreExpr::Let {
                pattern: Box::new(pattern),
                value: Box::new(value),
                body,
                mutable,
                recursive: false,
                id: d.next_id(),
                span: *span,
            })
        }

        surf::Expr::LetRec { bindings, body, span } => {
            let bindings = bindings
                .iter()
                .map(|b| lower_let_rec_binding(d, b))
                .collect::<Result<Vec<_>, _>>()?;
            let body = Box::new(desugar_expr(d, body)?);
            Ok(CoreExpr::LetRecExpr { bindings, body, id: d.next_id(), span: *span })
        }

        surf::Expr::Block { stmts, trailing, span } => desugar_block(d, stmts, trailing.as_deref(), *span),

        surf::Expr::List { elements, tail, span } => {
            let mut acc = match tail {
                Some(t) => desugar_expr(d, t)?,
                None => CoreExpr::Variant { ctor: Symbol::intern("Nil"), args: vec![], id: d.next_id(), span: *span },
            };
            for el in elements.iter().rev() {
                let head = desugar_expr(d, el)?;
                acc = CoreExpr::Variant {
                    ctor: Symbol::intern("Cons"),
                    args: vec![head, acc],
                    id: d.next_id(),
                    span: *span,
                };
            }
            Ok(acc)
        }

        surf::Expr::Cons { head, tail, span } => Ok(CoreExpr::Variant {
            ctor: Symbol::intern("Cons"),
            args: vec![desugar_expr(d, head)?, desugar_expr(d, tail)?],
            id: d.next_id(),
            span: *span,
        }),

        surf::Expr::Record { fields, span } => {
            check_record_field_syntax(fields)?;
            let fields = fields
                .iter()
                .map(|f| {
                    let value = match &f.value {
                        Some(e) => desugar_expr(d, e)?,
                        None => CoreExpr::Var { name: f.name, id: d.next_id(), span: f.span },
                    };
                    Ok(RecordItem::Field { name: f.name, value })
                })
                .collect::<Result<_, DesugarError>>()?;
            Ok(CoreExpr::Record { fields, id: d.next_id(), span: *span })
        }

        surf::Expr::RecordUpdate { base, fields, span } => {
            check_record_field_syntax(fields)?;
            let record = Box::new(desugar_expr(d, base)?);
            let updates = fields
                .iter()
                .map(|f| {
                    let value = match &f.value {
                        Some(e) => desugar_expr(d, e)?,
                        None => CoreExpr::Var { name: f.name, id: d.next_id(), span: f.span },
                    };
                    Ok(RecordItem::Field { name: f.name, value })
                })
                .collect::<Result<_, DesugarError>>()?;
            Ok(CoreExpr::RecordUpdate { record, updates, id: d.next_id(), span: *span })
        }

        surf::Expr::RecordAccess { record, field, span } => Ok(CoreExpr::RecordAccess {
            record: Box::new(desugar_expr(d, record)?),
            field: *field,
            id: d.next_id(),
            span: *span,
        }),

        surf::Expr::Variant { ctor, args, span } => Ok(CoreExpr::Variant {
            ctor: ctor.tail(),
            args: args.iter().map(|a| desugar_expr(d, a)).collect::<Result<_, _>>()?,
            id: d.next_id(),
            span: *span,
        }),

        surf::Expr::BinOp { op, left, right, span } => desugar_binop(d, *op, left, right, *span),

        surf::Expr::UnaryOp { op, operand, span } => {
            let op = match op {
                surf::UnOp::Neg => CoreUnOp::Neg,
                surf::UnOp::Not | surf::UnOp::Deref => CoreUnOp::LogicalNotOrDeref,
            };
            Ok(CoreExpr::UnaryOp { op, expr: Box::new(desugar_expr(d, operand)?), id: d.next_id(), span: *span })
        }

        surf::Expr::Assign { target, value, span } => Ok(CoreExpr::BinOp {
            op: CoreBinOp::Assign,
            left: Box::new(desugar_expr(d, target)?),
            right: Box::new(desugar_expr(d, value)?),
            id: d.next_id(),
            span: *span,
        }),

        surf::Expr::TypeAnnotation { expr, ty, span } => Ok(CoreExpr::TypeAnnotation {
            expr: Box::new(desugar_expr(d, expr)?),
            ty: lower_type_expr(ty),
            id: d.next_id(),
            span: *span,
        }),

        surf::Expr::Unsafe { expr, span } => {
            Ok(CoreExpr::Unsafe { expr: Box::new(desugar_expr(d, expr)?), id: d.next_id(), span: *span })
        }
    }
}

fn desugar_binop(
    d: &mut Desugarer,
    op: surf::BinOp,
    left: &surf::Expr,
    right: &surf::Expr,
    span: Span,
) -> Result<CoreExpr, DesugarError> {
    use surf::BinOp::*;
    match op {
        Pipe => {
            // `x |> f` ⇒ `App f [x]`.
            let func = Box::new(desugar_expr(d, right)?);
            let arg = desugar_expr(d, left)?;
            Ok(CoreExpr::App { func, args: vec![arg], id: d.next_id(), span })
        }
        ComposeForward => {
            // `f >> g` ⇒ `Lambda x . App g [App f [x]]`.
            let f = desugar_expr(d, left)?;
            let g = desugar_expr(d, right)?;
            Ok(build_composition(d, g, f, span))
        }
        ComposeBackward => {
            // `f << g` ⇒ `Lambda x . App f [App g [x]]`.
            let f = desugar_expr(d, left)?;
            let g = desugar_expr(d, right)?;
            Ok(build_composition(d, f, g, span))
        }
        _ => {
            let op = match op {
                Add => CoreBinOp::Add,
                Sub => CoreBinOp::Sub,
                Mul => CoreBinOp::Mul,
                Div => CoreBinOp::Div,
                Mod => CoreBinOp::Mod,
                Eq => CoreBinOp::Eq,
                NotEq => CoreBinOp::NotEq,
                Lt => CoreBinOp::Lt,
                LtEq => CoreBinOp::LtEq,
                Gt => CoreBinOp::Gt,
                GtEq => CoreBinOp::GtEq,
                And => CoreBinOp::And,
                Or => CoreBinOp::Or,
                Concat => CoreBinOp::Concat,
                Pipe | ComposeForward | ComposeBackward => unreachable!("handled above"),
            };
            Ok(CoreExpr::BinOp {
                op,
                left: Box::new(desugar_expr(d, left)?),
                right: Box::new(desugar_expr(d, right)?),
                id: d.next_id(),
                span,
            })
        }
    }
}

/// `outer(App(inner, [x]))` under a fresh `x`, i.e. `Lambda x . outer(inner(x))`.
fn build_composition(d: &mut Desugarer, outer: CoreExpr, inner: CoreExpr, span: Span) -> CoreExpr {
    let param_name = d.fresh_name("compose");
    let param_id = d.next_id();
    let var = CoreExpr::Var { name: param_name, id: param_id, span };
    let inner_app =
        CoreExpr::App { func: Box::new(inner), args: vec![var], id: d.next_id(), span };
    let outer_app =
        CoreExpr::App { func: Box::new(outer), args: vec![inner_app], id: d.next_id(), span };
    CoreExpr::Lambda {
        param: Box::new(CorePattern::Var { name: param_name, span }),
        body: Box::new(outer_app),
        id: d.next_id(),
        span,
    }
}

fn desugar_lambda(
    d: &mut Desugarer,
    params: &[surf::Pattern],
    ret_type: Option<&surf::TypeExpr>,
    body: &surf::Expr,
    span: Span,
) -> Result<CoreExpr, DesugarError> {
    if params.is_empty() {
        if ret_type.is_some() {
            return Err(DesugarError::UnexpectedReturnTypeAnnotation { span });
        }
        return desugar_expr(d, body);
    }

    let mut inner_body = desugar_expr(d, body)?;
    if let Some(ret) = ret_type {
        inner_body = CoreExpr::TypeAnnotation {
            expr: Box::new(inner_body),
            ty: lower_type_expr(ret),
            id: d.next_id(),
            span,
        };
    }

    // Curry right-to-left: the last surface parameter becomes the
    // innermost `Lambda`.
    let mut result = inner_body;
    for param in params.iter().rev() {
        result = CoreExpr::Lambda {
            param: Box::new(desugar_pattern(param)),
            body: Box::new(result),
            id: d.next_id(),
            span,
        };
    }
    Ok(result)
}

fn desugar_block(
    d: &mut Desugarer,
    stmts: &[surf::Stmt],
    trailing: Option<&surf::Expr>,
    span: Span,
) -> Result<CoreExpr, DesugarError> {
    let mut result = match trailing {
        Some(e) => desugar_expr(d, e)?,
        // A trailing semicolon with no final expression forces `Unit`.
        None => CoreExpr::UnitLit { id: d.next_id(), span },
    };

    for stmt in stmts.iter().rev() {
        result = match stmt {
            surf::Stmt::Expr(e) => {
                let value = desugar_expr(d, e)?;
                let wildcard_span = e.span();
                CoreExpr::Let {
                    pattern: Box::new(CorePattern::Wildcard { span: wildcard_span }),
                    value: Box::new(value),
                    body: Box::new(result),
                    mutable: false,
                    recursive: false,
                    id: d.next_id(),
                    span,
                }
            }
            surf::Stmt::Let(decl) => {
                let (pattern, value, mutable) = lower_let_decl(d, decl)?;
                CoreExpr::Let {
                    pattern: Box::new(pattern),
                    value: Box::new(value),
                    body: Box::new(result),
                    mutable,
                    recursive: false,
                    id: d.next_id(),
                    span,
                }
            }
        };
    }
    Ok(result)
}

/// Shared by block-statement `let`s, expression-position `let`s, and
/// top-level `let` items: attaches a declared type as an inference
/// boundary, then enforces the mutable-binding shape (rewrite 8).
pub(crate) fn lower_let_decl(
    d: &mut Desugarer,
    decl: &surf::LetDecl,
) -> Result<(CorePattern, CoreExpr, bool), DesugarError> {
    let mut value = desugar_expr(d, &decl.value)?;
    if let Some(ty) = &decl.ty {
        value = CoreExpr::TypeAnnotation {
            expr: Box::new(value),
            ty: lower_type_expr(ty),
            id: d.next_id(),
            span: decl.span,
        };
    }

    if decl.mutable {
        if !matches!(decl.pattern, surf::Pattern::Var { .. }) {
            return Err(DesugarError::MutableBindingMustUseSimplePattern { span: decl.span });
        }
        if !is_ref_construction(&value) {
            return Err(DesugarError::MutableBindingMustUseRef { span: decl.span });
        }
    }

    Ok((desugar_pattern(&decl.pattern), value, decl.mutable))
}

pub(crate) fn lower_let_rec_binding(
    d: &mut Desugarer,
    binding: &surf::LetRecBinding,
) -> Result<LetRecBinding, DesugarError> {
    let mut value = desugar_expr(d, &binding.value)?;
    if let Some(ty) = &binding.ty {
        value = CoreExpr::TypeAnnotation {
            expr: Box::new(value),
            ty: lower_type_expr(ty),
            id: d.next_id(),
            span: binding.span,
        };
    }
    if !is_function_shaped(&value) {
        return Err(DesugarError::AndRequiresLetRec { span: binding.span });
    }
    Ok(LetRecBinding {
        pattern: CorePattern::Var { name: binding.name, span: binding.span },
        value,
        mutable: false,
    })
}

/// Whether `func(args)` is exactly the builtin `ref(e)` pseudo-call.
fn ref_call_argument<'a>(func: &surf::Expr, args: &'a [surf::Expr]) -> Option<&'a surf::Expr> {
    if let surf::Expr::Var(path) = func {
        if path.segments.len() == 1 && path.tail().as_str() == "ref" && args.len() == 1 {
            return Some(&args[0]);
        }
    }
    None
}

fn is_ref_construction(expr: &CoreExpr) -> bool {
    match expr {
        CoreExpr::Variant { ctor, .. } => ctor.as_str() == "Ref",
        CoreExpr::TypeAnnotation { expr, .. } => is_ref_construction(expr),
        _ => false,
    }
}

fn is_function_shaped(expr: &CoreExpr) -> bool {
    match expr {
        CoreExpr::Lambda { .. } => true,
        CoreExpr::TypeAnnotation { expr, .. } => is_function_shaped(expr),
        _ => false,
    }
}

fn check_record_field_syntax(fields: &[surf::RecordFieldExpr]) -> Result<(), DesugarError> {
    use std::collections::HashMap;
    let mut seen: HashMap<Symbol, bool> = HashMap::new();
    for f in fields {
        let shorthand = f.value.is_none();
        match seen.get(&f.name) {
            Some(prev) if *prev != shorthand => {
                return Err(DesugarError::RecordMixedSyntax { span: f.span });
            }
            _ => {
                seen.insert(f.name, shorthand);
            }
        }
    }
    Ok(())
}

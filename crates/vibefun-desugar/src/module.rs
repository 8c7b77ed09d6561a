//! Item-level desugaring (rewrites 9-10 of §4.1): `let rec ... and ...`
//! groups, type declaration groups, and `external` / `external from "..." {}`
//! blocks. Everything here produces zero or more [`vibefun_ast::Decl`]s from
//! one surface [`vibefun_surface::ast::Item`].

use crate::error::DesugarError;
use crate::expr::{lower_let_decl, lower_let_rec_binding};
use crate::types::lower_type_expr;
use crate::Desugarer;
use vibefun_ast::{Decl, ExternalDecl, TypeDecl, TypeDeclGroup, TypeDeclKind, VariantCtor};
use vibefun_surface::ast as surf;
use vibefun_util::Span;

pub fn desugar_item(d: &mut Desugarer, item: &surf::Item) -> Result<Vec<Decl>, DesugarError> {
    match item {
        surf::Item::Let(decl) => {
            let (pattern, value, mutable) = lower_let_decl(d, decl)?;
            Ok(vec![Decl::Let { pattern, value, mutable, recursive: false, span: decl.span }])
        }

        surf::Item::LetRec(bindings) => {
            let span = group_span(bindings.iter().map(|b| b.span));
            let bindings =
                bindings.iter().map(|b| lower_let_rec_binding(d, b)).collect::<Result<Vec<_>, _>>()?;
            Ok(vec![Decl::LetRec { bindings, span }])
        }

        surf::Item::Type(decls) => {
            let span = group_span(decls.iter().map(|t| t.span));
            let decls = decls.iter().map(lower_type_decl).collect();
            Ok(vec![Decl::Type(TypeDeclGroup { decls, span })])
        }

        surf::Item::External(decl) => Ok(vec![Decl::External(lower_external_decl(decl, None))]),

        surf::Item::ExternalBlock(block) => Ok(block
            .decls
            .iter()
            .map(|decl| Decl::External(lower_external_decl(decl, Some(&block.from))))
            .collect()),
    }
}

fn lower_type_decl(decl: &surf::TypeDecl) -> TypeDecl {
    let kind = match &decl.kind {
        surf::TypeDeclKind::Alias(ty) => TypeDeclKind::Alias(lower_type_expr(ty)),
        surf::TypeDeclKind::Variant(ctors) => TypeDeclKind::Variant(
            ctors
                .iter()
                .map(|c| VariantCtor {
                    name: c.name,
                    fields: c.fields.iter().map(lower_type_expr).collect(),
                    span: c.span,
                })
                .collect(),
        ),
    };
    TypeDecl { name: decl.name, generics: decl.generics.clone(), kind, span: decl.span }
}

/// Each member of an `external from "js-module" { ... }` block inherits the
/// block's module unless it names its own (rewrite 10).
fn lower_external_decl(decl: &surf::ExternalDecl, block_from: Option<&str>) -> ExternalDecl {
    let module = decl.from.clone().or_else(|| block_from.map(str::to_owned));
    ExternalDecl {
        name: decl.name,
        ty: lower_type_expr(&decl.ty),
        js_name: decl.js_name.clone(),
        module,
        span: decl.span,
    }
}

fn group_span(mut spans: impl Iterator<Item = Span>) -> Span {
    let first = spans.next().unwrap_or(Span::DUMMY);
    spans.fold(first, Span::merge)
}

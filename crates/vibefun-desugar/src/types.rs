//! Lowering of surface type expressions to the Core type language.
//!
//! This is purely syntactic: a bare name becomes `Type::Const`, applied
//! names become `Type::App`. Nothing here decides whether a given name is
//! a declared type, a builtin, or one of the enclosing declaration's own
//! generic parameters — that distinction needs the declaration table and
//! is made by `vibefun-check`'s environment construction, which rewrites
//! the matching `Type::Const`s to `Type::Var` (see `vibefun_ast::module`).

use vibefun_ast::Type;
use vibefun_surface::ast::TypeExpr;
use vibefun_util::Symbol;

pub fn lower_type_expr(ty: &TypeExpr) -> Type {
    match ty {
        TypeExpr::Named { path, args, .. } if args.is_empty() => Type::Const(path.tail()),
        TypeExpr::Named { path, args, .. } => {
            Type::App { ctor: path.tail(), args: args.iter().map(lower_type_expr).collect() }
        }
        TypeExpr::Function { params, ret, .. } => Type::Function {
            params: params.iter().map(lower_type_expr).collect(),
            result: Box::new(lower_type_expr(ret)),
        },
        TypeExpr::Record { fields, .. } => {
            let map: std::collections::BTreeMap<Symbol, Type> =
                fields.iter().map(|(name, t)| (*name, lower_type_expr(t))).collect();
            Type::Record(map)
        }
        TypeExpr::Union { members, .. } => Type::Union(members.iter().map(lower_type_expr).collect()),
    }
}

//! Pattern lowering. Mechanical node-for-node translation; linearity (I5)
//! and exhaustiveness are checker concerns, not desugaring ones.

use vibefun_ast::{FieldPattern, Pattern as CorePattern};
use vibefun_ast::expr::PatternLiteral;
use vibefun_surface::ast::{FieldPattern as SurfaceFieldPattern, Pattern as SurfacePattern};
use vibefun_util::Symbol;

pub fn desugar_pattern(pattern: &SurfacePattern) -> CorePattern {
    match pattern {
        SurfacePattern::Wildcard(span) => CorePattern::Wildcard { span: *span },
        // `mut` on a pattern binder only matters at the enclosing `let`
        // (tracked on `Expr::Let::mutable`); the Core pattern language has
        // no per-binding mutability of its own.
        SurfacePattern::Var { name, mutable: _, span } => CorePattern::Var { name: *name, span: *span },
        SurfacePattern::Int(v, span) => {
            CorePattern::Literal { value: PatternLiteral::Int(*v), span: *span }
        }
        SurfacePattern::Str(s, span) => {
            CorePattern::Literal { value: PatternLiteral::Str(Symbol::intern(s)), span: *span }
        }
        SurfacePattern::Bool(v, span) => {
            CorePattern::Literal { value: PatternLiteral::Bool(*v), span: *span }
        }
        SurfacePattern::Unit(span) => CorePattern::Literal { value: PatternLiteral::Unit, span: *span },
        SurfacePattern::Variant { ctor, args, span } => CorePattern::Variant {
            ctor: ctor.tail(),
            args: args.iter().map(desugar_pattern).collect(),
            span: *span,
        },
        SurfacePattern::Record { fields, span } => {
            CorePattern::Record { fields: fields.iter().map(desugar_field_pattern).collect(), span: *span }
        }
    }
}

fn desugar_field_pattern(field: &SurfaceFieldPattern) -> FieldPattern {
    let pattern = match &field.pattern {
        Some(p) => desugar_pattern(p),
        // `{ x }` binds the field `x` to a variable also named `x`.
        None => CorePattern::Var { name: field.name, span: field.span },
    };
    FieldPattern { name: field.name, pattern }
}

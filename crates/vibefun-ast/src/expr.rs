//! The Core AST: ~20 node kinds with well-defined evaluation and scoping,
//! produced by the desugarer and consumed by the checker and optimizer.
//!
//! Core nodes are immutable after desugaring (see the data model's
//! lifecycle note): the checker annotates a side table keyed by [`ExprId`]
//! rather than mutating nodes in place, and the optimizer always returns a
//! fresh tree rather than aliasing rewritten subtrees.

use vibefun_util::{define_idx, Span, Symbol};

define_idx!(ExprId);

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    IntLit { value: i64, id: ExprId, span: Span },
    FloatLit { value: u64, id: ExprId, span: Span },
    StringLit { value: String, id: ExprId, span: Span },
    BoolLit { value: bool, id: ExprId, span: Span },
    UnitLit { id: ExprId, span: Span },

    /// A free variable, resolved against the environment at check time.
    Var { name: Symbol, id: ExprId, span: Span },

    /// Single-parameter; n-ary surface lambdas are curried into nested
    /// `Lambda`s by the desugarer.
    Lambda { param: Box<Pattern>, body: Box<Expr>, id: ExprId, span: Span },

    /// A single node regardless of `args.len()`; multi-arg application is
    /// not currying at the AST level; only its *type* is curried.
    App { func: Box<Expr>, args: Vec<Expr>, id: ExprId, span: Span },

    Let {
        pattern: Box<Pattern>,
        value: Box<Expr>,
        body: Box<Expr>,
        mutable: bool,
        recursive: bool,
        id: ExprId,
        span: Span,
    },

    /// A mutual-recursion group; every binding is in scope for every RHS.
    LetRecExpr { bindings: Vec<LetRecBinding>, body: Box<Expr>, id: ExprId, span: Span },

    Match { scrutinee: Box<Expr>, cases: Vec<MatchCase>, id: ExprId, span: Span },

    /// Later fields/spreads override earlier ones (I4).
    Record { fields: Vec<RecordItem>, id: ExprId, span: Span },
    RecordAccess { record: Box<Expr>, field: Symbol, id: ExprId, span: Span },
    RecordUpdate { record: Box<Expr>, updates: Vec<RecordItem>, id: ExprId, span: Span },

    /// Nominal; resolved against the constructor's declaring type.
    Variant { ctor: Symbol, args: Vec<Expr>, id: ExprId, span: Span },

    BinOp { op: BinOp, left: Box<Expr>, right: Box<Expr>, id: ExprId, span: Span },
    UnaryOp { op: UnOp, expr: Box<Expr>, id: ExprId, span: Span },

    TypeAnnotation { expr: Box<Expr>, ty: crate::types::Type, id: ExprId, span: Span },

    /// Opaque to the type checker after its internal checks, and opaque to
    /// every optimizer pass (I3 / invariant O1).
    Unsafe { expr: Box<Expr>, id: ExprId, span: Span },
}

impl Expr {
    pub fn id(&self) -> ExprId {
        match self {
            Expr::IntLit { id, .. }
            | Expr::FloatLit { id, .. }
            | Expr::StringLit { id, .. }
            | Expr::BoolLit { id, .. }
            | Expr::UnitLit { id, .. }
            | Expr::Var { id, .. }
            | Expr::Lambda { id, .. }
            | Expr::App { id, .. }
            | Expr::Let { id, .. }
            | Expr::LetRecExpr { id, .. }
            | Expr::Match { id, .. }
            | Expr::Record { id, .. }
            | Expr::RecordAccess { id, .. }
            | Expr::RecordUpdate { id, .. }
            | Expr::Variant { id, .. }
            | Expr::BinOp { id, .. }
            | Expr::UnaryOp { id, .. }
            | Expr::TypeAnnotation { id, .. }
            | Expr::Unsafe { id, .. } => *id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit { span, .. }
            | Expr::FloatLit { span, .. }
            | Expr::StringLit { span, .. }
            | Expr::BoolLit { span, .. }
            | Expr::UnitLit { span, .. }
            | Expr::Var { span, .. }
            | Expr::Lambda { span, .. }
            | Expr::App { span, .. }
            | Expr::Let { span, .. }
            | Expr::LetRecExpr { span, .. }
            | Expr::Match { span, .. }
            | Expr::Record { span, .. }
            | Expr::RecordAccess { span, .. }
            | Expr::RecordUpdate { span, .. }
            | Expr::Variant { span, .. }
            | Expr::BinOp { span, .. }
            | Expr::UnaryOp { span, .. }
            | Expr::TypeAnnotation { span, .. }
            | Expr::Unsafe { span, .. } => *span,
        }
    }

    /// Whether this node, taken alone, is a *syntactic value* under the
    /// value restriction: a variable, a literal, a lambda, a variant
    /// applied to values, or a record of values. `Let`/`App`/`Match`/etc.
    /// are never values even if they happen to reduce to one.
    pub fn is_syntactic_value(&self) -> bool {
        match self {
            Expr::IntLit { .. }
            | Expr::FloatLit { .. }
            | Expr::StringLit { .. }
            | Expr::BoolLit { .. }
            | Expr::UnitLit { .. }
            | Expr::Var { .. }
            | Expr::Lambda { .. } => true,
            Expr::Variant { args, .. } => args.iter().all(Expr::is_syntactic_value),
            Expr::Record { fields, .. } => fields.iter().all(|f| match f {
                RecordItem::Field { value, .. } => value.is_syntactic_value(),
                RecordItem::Spread { expr, .. } => expr.is_syntactic_value(),
            }),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetRecBinding {
    pub pattern: Pattern,
    pub value: Expr,
    pub mutable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RecordItem {
    Field { name: Symbol, value: Expr },
    Spread { expr: Expr },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Concat,
    /// `r := v`; left must be `Ref<T>`, right `T`, result `Unit`.
    Assign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    /// Both logical-NOT and dereference are spelled `!` at the surface;
    /// the desugarer keeps them as one node and the checker disambiguates
    /// by the operand's type (see the `UnaryOp !` inference rule).
    LogicalNotOrDeref,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Wildcard { span: Span },
    Var { name: Symbol, span: Span },
    Literal { value: PatternLiteral, span: Span },
    Variant { ctor: Symbol, args: Vec<Pattern>, span: Span },
    Record { fields: Vec<FieldPattern>, span: Span },
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Wildcard { span }
            | Pattern::Var { span, .. }
            | Pattern::Literal { span, .. }
            | Pattern::Variant { span, .. }
            | Pattern::Record { span, .. } => *span,
        }
    }

    /// The names this pattern binds, in left-to-right order. Linearity
    /// (I5) is a separate check over this list, not enforced by the shape.
    pub fn bound_names(&self, out: &mut Vec<Symbol>) {
        match self {
            Pattern::Wildcard { .. } | Pattern::Literal { .. } => {}
            Pattern::Var { name, .. } => out.push(*name),
            Pattern::Variant { args, .. } => args.iter().for_each(|p| p.bound_names(out)),
            Pattern::Record { fields, .. } => {
                fields.iter().for_each(|f| f.pattern.bound_names(out))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldPattern {
    pub name: Symbol,
    pub pattern: Pattern,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatternLiteral {
    Int(i64),
    Str(StrLitId),
    Bool(bool),
    Unit,
}

/// Interned handle for string literal patterns, since `PatternLiteral`
/// derives `Copy` and a raw `String` would prevent that. Resolved back to
/// text through [`vibefun_util::symbol`] the same way any other
/// interned identifier is.
pub type StrLitId = Symbol;

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ExprId {
        ExprId(n)
    }

    #[test]
    fn literals_and_vars_are_syntactic_values() {
        let lit = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        assert!(lit.is_syntactic_value());
    }

    #[test]
    fn application_is_never_a_syntactic_value() {
        let func = Box::new(Expr::Var { name: Symbol::intern("f"), id: id(0), span: Span::DUMMY });
        let app = Expr::App { func, args: vec![], id: id(1), span: Span::DUMMY };
        assert!(!app.is_syntactic_value());
    }

    #[test]
    fn variant_is_a_value_only_if_its_args_are() {
        let value_arg = Expr::IntLit { value: 1, id: id(0), span: Span::DUMMY };
        let variant = Expr::Variant {
            ctor: Symbol::intern("Some"),
            args: vec![value_arg],
            id: id(1),
            span: Span::DUMMY,
        };
        assert!(variant.is_syntactic_value());

        let non_value_arg = Expr::App {
            func: Box::new(Expr::Var { name: Symbol::intern("f"), id: id(2), span: Span::DUMMY }),
            args: vec![],
            id: id(3),
            span: Span::DUMMY,
        };
        let non_value_variant = Expr::Variant {
            ctor: Symbol::intern("Some"),
            args: vec![non_value_arg],
            id: id(4),
            span: Span::DUMMY,
        };
        assert!(!non_value_variant.is_syntactic_value());
    }

    #[test]
    fn pattern_bound_names_collects_in_order() {
        let pattern = Pattern::Variant {
            ctor: Symbol::intern("Pair"),
            args: vec![
                Pattern::Var { name: Symbol::intern("a"), span: Span::DUMMY },
                Pattern::Var { name: Symbol::intern("b"), span: Span::DUMMY },
            ],
            span: Span::DUMMY,
        };
        let mut names = Vec::new();
        pattern.bound_names(&mut names);
        assert_eq!(names, vec![Symbol::intern("a"), Symbol::intern("b")]);
    }
}

//! Surface AST: the shape of a Vibefun module immediately after parsing,
//! before desugaring. Every node carries a [`Span`] for diagnostics. Node
//! kinds here track the language's actual surface grammar rather than a
//! general-purpose systems-language grammar: there are no structs, traits,
//! impls, method calls, loops, or casts, because Vibefun has none of those —
//! it is an expression-oriented ML dialect whose only compound forms are
//! `let`, `match`, `if`, lambdas, application, and literal construction.

use vibefun_util::{Span, Symbol};

/// A dotted name, e.g. `List.map` or a bare `x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<Symbol>,
    pub span: Span,
}

impl Path {
    pub fn single(name: Symbol, span: Span) -> Self {
        Self { segments: vec![name], span }
    }

    /// The last segment, e.g. `map` in `List.map`.
    pub fn tail(&self) -> Symbol {
        *self.segments.last().expect("Path always has at least one segment")
    }
}

/// A parsed module: a flat sequence of top-level items, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub items: Vec<Item>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    /// `let x = e` or `let (a, b) = e` at module scope.
    Let(LetDecl),
    /// `let rec f = ... and g = ...`
    LetRec(Vec<LetRecBinding>),
    /// `type Name<T> = ...` or a mutually-recursive `and`-chained group.
    Type(Vec<TypeDecl>),
    /// A single `external` declaration.
    External(ExternalDecl),
    /// `external from "module" { ... }` — a group sharing one JS module.
    ExternalBlock(ExternalBlock),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetDecl {
    pub pattern: Pattern,
    pub mutable: bool,
    pub ty: Option<TypeExpr>,
    pub value: Box<Expr>,
    pub span: Span,
}

/// One binding in a `let rec ... and ...` group. Each binding must itself
/// desugar to a function (enforced by the desugarer, not the grammar).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetRecBinding {
    pub name: Symbol,
    pub ty: Option<TypeExpr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: Symbol,
    pub generics: Vec<Symbol>,
    pub kind: TypeDeclKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDeclKind {
    /// `type Id = Int` — transparent at the surface; the desugarer erases
    /// the alias and substitutes its body at every use site.
    Alias(TypeExpr),
    /// `type Option<T> = None | Some(T)`
    Variant(Vec<VariantDef>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDef {
    pub name: Symbol,
    pub fields: Vec<TypeExpr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalDecl {
    pub name: Symbol,
    pub ty: TypeExpr,
    pub js_name: String,
    pub from: Option<String>,
    pub span: Span,
}

/// `external from "js-module" { name: Type = "jsName", ... }` — every
/// member inherits `from` unless it names its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalBlock {
    pub from: String,
    pub decls: Vec<ExternalDecl>,
    pub span: Span,
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Int(i64, Span),
    Float(OrderedFloatBits, Span),
    Str(String, Span),
    Bool(bool, Span),
    Unit(Span),

    Var(Path),

    /// `fn(a, b) -> body` or `\a b -> body`; n-ary at the surface, curried
    /// by the desugarer into nested single-parameter lambdas.
    Lambda {
        params: Vec<Pattern>,
        ret_type: Option<TypeExpr>,
        body: Box<Expr>,
        span: Span,
    },

    /// `f(a, b, c)` — n-ary at the surface, curried by the desugarer.
    App {
        func: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        span: Span,
    },

    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
        span: Span,
    },

    /// `let pat = value in body`, `let mut pat = value in body`.
    Let {
        decl: LetDecl,
        body: Box<Expr>,
        span: Span,
    },

    /// `let rec f = ... and g = ... in body`.
    LetRec {
        bindings: Vec<LetRecBinding>,
        body: Box<Expr>,
        span: Span,
    },

    /// `{ s1; s2; ...; e }` — desugars to a chain of `Let`s per the block
    /// rewrite; the surface keeps it as its own node so diagnostics can
    /// point at the brace-delimited form the author actually wrote.
    Block {
        stmts: Vec<Stmt>,
        trailing: Option<Box<Expr>>,
        span: Span,
    },

    /// `[a, b, ...xs]` — a spine of elements with an optional spread tail.
    List {
        elements: Vec<Expr>,
        tail: Option<Box<Expr>>,
        span: Span,
    },

    /// `x :: xs`
    Cons {
        head: Box<Expr>,
        tail: Box<Expr>,
        span: Span,
    },

    /// `{ x: 1, y: 2 }` or shorthand `{ x, y }`.
    Record {
        fields: Vec<RecordFieldExpr>,
        span: Span,
    },

    /// `{ ...r, y: 2 }`
    RecordUpdate {
        base: Box<Expr>,
        fields: Vec<RecordFieldExpr>,
        span: Span,
    },

    /// `r.field`
    RecordAccess {
        record: Box<Expr>,
        field: Symbol,
        span: Span,
    },

    /// `Ctor(a, b)` or a bare `Ctor` (zero-arg) construction. Parsed as a
    /// distinct node rather than folded into `App` because the desugarer
    /// needs to tell "apply a function" from "construct a variant" apart
    /// without a symbol table.
    Variant {
        ctor: Path,
        args: Vec<Expr>,
        span: Span,
    },

    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// `r := v` — reference assignment sugar.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },

    TypeAnnotation {
        expr: Box<Expr>,
        ty: TypeExpr,
        span: Span,
    },

    /// `unsafe { e }`
    Unsafe {
        expr: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, s)
            | Expr::Float(_, s)
            | Expr::Str(_, s)
            | Expr::Bool(_, s)
            | Expr::Unit(s) => *s,
            Expr::Var(path) => path.span,
            Expr::Lambda { span, .. }
            | Expr::App { span, .. }
            | Expr::If { span, .. }
            | Expr::Match { span, .. }
            | Expr::Let { span, .. }
            | Expr::LetRec { span, .. }
            | Expr::Block { span, .. }
            | Expr::List { span, .. }
            | Expr::Cons { span, .. }
            | Expr::Record { span, .. }
            | Expr::RecordUpdate { span, .. }
            | Expr::RecordAccess { span, .. }
            | Expr::Variant { span, .. }
            | Expr::BinOp { span, .. }
            | Expr::UnaryOp { span, .. }
            | Expr::Assign { span, .. }
            | Expr::TypeAnnotation { span, .. }
            | Expr::Unsafe { span, .. } => *span,
        }
    }
}

/// A field in a record literal or update: `x: e`, or shorthand `x` for
/// `x: x`, or `...base` inside a literal that mixes spread with fields
/// (rejected later by the desugarer's `RecordMixedSyntax` check only when
/// the mix is inconsistent, per the surface grammar it is legal to write).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordFieldExpr {
    pub name: Symbol,
    /// `None` for shorthand `{ x }`.
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Box<Expr>>,
    pub body: Box<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// A bare expression statement, evaluated for effect.
    Expr(Expr),
    /// A `let` inside a block, binding the remainder of the block.
    Let(LetDecl),
}

/// Bit pattern of an `f64`, so that `Expr` can derive `Eq`/`Hash` without
/// running afoul of `f64`'s lack of a total order. Comparisons between
/// literals are by bit pattern, which is adequate for AST structural
/// equality; arithmetic never operates on this type directly.
pub type OrderedFloatBits = u64;

pub fn float_bits(value: f64) -> OrderedFloatBits {
    value.to_bits()
}

pub fn float_value(bits: OrderedFloatBits) -> f64 {
    f64::from_bits(bits)
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
    /// `&` — string concatenation.
    Concat,
    /// `|>` — forward pipe: `x |> f` means `f(x)`.
    Pipe,
    /// `>>` — left-to-right function composition.
    ComposeForward,
    /// `<<` — right-to-left function composition.
    ComposeBackward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    /// `!r` — dereference.
    Deref,
}

// ---------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Wildcard(Span),
    /// `x` or `mut x`.
    Var { name: Symbol, mutable: bool, span: Span },
    Int(i64, Span),
    Str(String, Span),
    Bool(bool, Span),
    Unit(Span),
    /// `Some(x)`, `Nil`, `x :: xs` desugars to `Cons(x, xs)` at parse time
    /// already, so the surface pattern grammar only needs constructor
    /// application, not a separate cons-pattern node.
    Variant {
        ctor: Path,
        args: Vec<Pattern>,
        span: Span,
    },
    Record {
        fields: Vec<FieldPattern>,
        span: Span,
    },
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Wildcard(s)
            | Pattern::Var { span: s, .. }
            | Pattern::Int(_, s)
            | Pattern::Str(_, s)
            | Pattern::Bool(_, s)
            | Pattern::Unit(s)
            | Pattern::Variant { span: s, .. }
            | Pattern::Record { span: s, .. } => *s,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPattern {
    pub name: Symbol,
    /// `None` for shorthand `{ x }` binding `x` to the field named `x`.
    pub pattern: Option<Pattern>,
    pub span: Span,
}

// ---------------------------------------------------------------------
// Surface type syntax
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// A named type, possibly applied to arguments: `Int`, `List<T>`,
    /// `Map<K, V>`. A bare lowercase identifier with no arguments that
    /// resolves to a generic in scope is a type variable reference.
    Named { path: Path, args: Vec<TypeExpr>, span: Span },
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
        span: Span,
    },
    Record {
        fields: Vec<(Symbol, TypeExpr)>,
        span: Span,
    },
    /// `A | B | C` — a general union, legal only in `external` signatures.
    Union {
        members: Vec<TypeExpr>,
        span: Span,
    },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named { span, .. }
            | TypeExpr::Function { span, .. }
            | TypeExpr::Record { span, .. }
            | TypeExpr::Union { span, .. } => *span,
        }
    }
}

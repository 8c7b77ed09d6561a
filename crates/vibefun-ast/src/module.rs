//! Module-level Core declarations: the output of the desugarer's item
//! translation, and the input to the checker's environment construction
//! (§4.2) and top-level declaration threading (§4.3 "Top-level declaration
//! threading").
//!
//! A `CoreModule` is a flat, source-ordered list of declarations. Ordering
//! is observable (later declarations may reference earlier ones), so this
//! is a `Vec`, not a map.

use crate::expr::{Expr, LetRecBinding, Pattern};
use crate::types::Type;
use vibefun_util::{Span, Symbol};

#[derive(Clone, Debug)]
pub struct CoreModule {
    pub decls: Vec<Decl>,
}

#[derive(Clone, Debug)]
pub enum Decl {
    /// A top-level `let`; `recursive` mirrors `Expr::Let`'s flag and is
    /// only meaningful together with a `VarPattern` (I6).
    Let {
        pattern: Pattern,
        value: Expr,
        mutable: bool,
        recursive: bool,
        span: Span,
    },
    /// `let rec f = ... and g = ...` at module scope.
    LetRec { bindings: Vec<LetRecBinding>, span: Span },
    /// One `type ... and ...` group. A lone `type Id = Int` is a
    /// single-element group.
    Type(TypeDeclGroup),
    /// One `external` declaration, already split out of any enclosing
    /// `external from "..." { ... }` block by the desugarer (rewrite 10).
    /// Overload-table merging happens later, during environment
    /// construction, not here.
    External(ExternalDecl),
}

#[derive(Clone, Debug)]
pub struct TypeDeclGroup {
    pub decls: Vec<TypeDecl>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: Symbol,
    pub generics: Vec<Symbol>,
    pub kind: TypeDeclKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum TypeDeclKind {
    /// Transparent; the desugarer does not erase aliases (that would lose
    /// the declared name for diagnostics), but every consumer treats an
    /// alias as interchangeable with its `body` (§1 "Type aliases are
    /// transparent").
    Alias(Type),
    Variant(Vec<VariantCtor>),
}

#[derive(Clone, Debug)]
pub struct VariantCtor {
    pub name: Symbol,
    /// Occurrences of this type's own generics inside `fields` are
    /// represented as `Type::Const(generic_name)` placeholders until
    /// environment construction resolves them to `Type::Var` (see
    /// `vibefun-check::build_env`); the desugarer has no level-aware
    /// variable allocator of its own (§9 "Global state").
    pub fields: Vec<Type>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ExternalDecl {
    pub name: Symbol,
    pub ty: Type,
    pub js_name: String,
    pub module: Option<String>,
    pub span: Span,
}

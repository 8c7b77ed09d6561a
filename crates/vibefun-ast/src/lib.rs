//! vibefun-ast — the Core AST, its type language, the checking
//! environment, and the traversal utilities (free variables,
//! capture-avoiding substitution, α-renaming, location-ignoring
//! structural equality) that the desugarer, checker, and optimizer all
//! build on.

pub mod env;
pub mod expr;
pub mod module;
pub mod subst;
pub mod types;

pub use env::{Binding, ConstructorInfo, Env, TypeInfo};
pub use expr::{BinOp, Expr, ExprId, FieldPattern, LetRecBinding, MatchCase, Pattern, RecordItem, UnOp};
pub use module::{CoreModule, Decl, ExternalDecl, TypeDecl, TypeDeclGroup, TypeDeclKind, VariantCtor};
pub use subst::{alpha_rename, contains_ref_effect, contains_unsafe, core_eq, free_vars, size, subst};
pub use types::{Level, Scheme, Type, TypeVarId, TOP_LEVEL};

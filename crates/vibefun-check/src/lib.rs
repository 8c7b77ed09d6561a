//! The Vibefun type checker: Hindley-Milner inference over the Core AST
//! with level-based let-polymorphism, nominal variants, structural
//! width-subtyped records, the value restriction, exhaustiveness checking,
//! and FFI overload resolution (§4).
//!
//! Entry point: [`check_module`], which builds an [`Env`](vibefun_ast::Env)
//! from a module's type and external declarations and then threads it
//! across top-level `let`/`let rec` declarations in source order.

mod env;
mod error;
mod expr;
mod exhaustive;
mod ffi;
mod infer;
mod module;
mod pattern;

pub use env::{build_env, prelude_env, resolve_type_expr};
pub use error::{CheckError, CheckWarning};
pub use expr::infer_expr;
pub use ffi::{merge_externals, resolve_overload};
pub use infer::InferCtx;
pub use module::{check_module, TypedModule};
pub use pattern::infer_pattern;

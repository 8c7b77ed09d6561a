//! vibefun-surface — the surface AST produced by parsing.
//!
//! Parsing itself (lexing and building these nodes from source text) is out
//! of scope for this workspace; the type definitions here are the contract
//! between a hypothetical parser and [`vibefun_desugar`](../vibefun_desugar),
//! which lowers a [`ast::Module`] into `vibefun_ast::Expr`.

pub mod ast;
pub mod precedence;

pub use ast::*;

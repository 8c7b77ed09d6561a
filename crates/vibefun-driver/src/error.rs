//! Driver-level error conditions (§11 "Error handling"). Phase crates
//! report their own typed errors (`DesugarError`, `CheckError`); this enum
//! only covers the driver's own summary judgment over a finished
//! [`crate::CompileResult`], mirroring the teacher's
//! `Session::compile() -> Result<(), CompileError>` shape.

use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum CompileError {
    #[error("desugaring failed with {count} error(s)")]
    DesugarFailed { count: usize },

    #[error("compilation failed with {count} error(s)")]
    CompilationFailed { count: usize },
}

//! Converts each phase's typed errors/warnings into the shared
//! [`Diagnostic`] shape (§7), the one place the driver aggregates across
//! phase boundaries.

use vibefun_check::{CheckError, CheckWarning};
use vibefun_desugar::DesugarError;
use vibefun_util::diagnostic::Diagnostic;

pub fn from_desugar_error(err: &DesugarError) -> Diagnostic {
    Diagnostic::error(err.to_string(), err.span()).with_code(err.code())
}

pub fn from_check_error(err: &CheckError) -> Diagnostic {
    Diagnostic::error(err.to_string(), err.span()).with_code(err.code())
}

pub fn from_check_warning(warning: &CheckWarning) -> Diagnostic {
    Diagnostic::warning(warning.to_string(), warning.span()).with_code(warning.code())
}

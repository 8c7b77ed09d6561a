//! Desugaring error conditions (§4.1), each carrying the `VF2xxx` code it
//! reports as.

use thiserror::Error;
use vibefun_util::diagnostic::DiagnosticCode;
use vibefun_util::Span;

#[derive(Clone, Debug, Error)]
pub enum DesugarError {
    #[error("`let mut` binding must wrap its initializer in `ref(...)`")]
    MutableBindingMustUseRef { span: Span },

    #[error("`let mut` requires a simple variable pattern, not a compound one")]
    MutableBindingMustUseSimplePattern { span: Span },

    #[error("`and`-chained bindings must be introduced with `let rec`")]
    AndRequiresLetRec { span: Span },

    #[error("record literal mixes shorthand and explicit field syntax inconsistently")]
    RecordMixedSyntax { span: Span },

    #[error("operator sections are not supported")]
    OperatorSectionNotSupported { span: Span },

    #[error("return-type annotation cannot be attached to a function here")]
    UnexpectedReturnTypeAnnotation { span: Span },
}

impl DesugarError {
    pub fn span(&self) -> Span {
        match self {
            DesugarError::MutableBindingMustUseRef { span }
            | DesugarError::MutableBindingMustUseSimplePattern { span }
            | DesugarError::AndRequiresLetRec { span }
            | DesugarError::RecordMixedSyntax { span }
            | DesugarError::OperatorSectionNotSupported { span }
            | DesugarError::UnexpectedReturnTypeAnnotation { span } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            DesugarError::MutableBindingMustUseRef { .. } => DiagnosticCode::MUTABLE_BINDING_MUST_USE_REF,
            DesugarError::MutableBindingMustUseSimplePattern { .. } => {
                DiagnosticCode::MUTABLE_BINDING_MUST_USE_SIMPLE_PATTERN
            }
            DesugarError::AndRequiresLetRec { .. } => DiagnosticCode::AND_REQUIRES_LET_REC,
            DesugarError::RecordMixedSyntax { .. } => DiagnosticCode::RECORD_MIXED_SYNTAX,
            DesugarError::OperatorSectionNotSupported { .. } => DiagnosticCode::OPERATOR_SECTION_NOT_SUPPORTED,
            DesugarError::UnexpectedReturnTypeAnnotation { .. } => {
                DiagnosticCode::UNEXPECTED_RETURN_TYPE_ANNOTATION
            }
        }
    }
}

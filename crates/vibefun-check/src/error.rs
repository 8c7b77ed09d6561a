//! Checker error taxonomy (§7), one variant per `VF4xxx` code this crate can
//! raise. `CheckError` never unwinds the checker: every fallible operation
//! below returns `Result<_, CheckError>` and callers at a declaration
//! boundary convert a failure into a diagnostic and a placeholder scheme
//! rather than propagating further (§4.3 "Failure semantics").

use thiserror::Error;
use vibefun_ast::Type;
use vibefun_util::diagnostic::DiagnosticCode;
use vibefun_util::{Span, Symbol};

#[derive(Clone, Debug, Error)]
pub enum CheckError {
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: Type, found: Type, span: Span },

    #[error("incompatible kinds between `{a}` and `{b}`")]
    KindMismatch { a: Type, b: Type, span: Span },

    #[error("function expects {expected} argument(s), found {found}")]
    FunctionArityMismatch { expected: usize, found: usize, span: Span },

    #[error("type `{ctor}` expects {expected} argument(s), found {found}")]
    TypeApplicationArityMismatch { ctor: Symbol, expected: usize, found: usize, span: Span },

    #[error("expected a tuple of {expected} element(s), found {found}")]
    TupleArityMismatch { expected: usize, found: usize, span: Span },

    #[error("variant `{found}` does not match expected constructor `{expected}`")]
    VariantNameMismatch { expected: Symbol, found: Symbol, span: Span },

    #[error("infinite type: `{var}` occurs in `{ty}`")]
    InfiniteType { var: Type, ty: Type, span: Span },

    #[error("undefined variable `{name}`{}", did_you_mean_suffix(.suggestion))]
    UndefinedVariable { name: Symbol, suggestion: Option<Symbol>, span: Span },

    #[error("undefined type `{name}`{}", did_you_mean_suffix(.suggestion))]
    UndefinedType { name: Symbol, suggestion: Option<Symbol>, span: Span },

    #[error("undefined constructor `{name}`{}", did_you_mean_suffix(.suggestion))]
    UndefinedConstructor { name: Symbol, suggestion: Option<Symbol>, span: Span },

    #[error("undefined field `{name}`{}", did_you_mean_suffix(.suggestion))]
    UndefinedField { name: Symbol, suggestion: Option<Symbol>, span: Span },

    #[error("`{name}` is declared more than once")]
    DuplicateDeclaration { name: Symbol, span: Span },

    #[error("`{name}` is bound more than once in this pattern")]
    DuplicatePatternBinding { name: Symbol, span: Span },

    #[error("field `{name}` appears more than once in this record")]
    DuplicateRecordField { name: Symbol, span: Span },

    #[error("non-exhaustive match; missing pattern: `{missing}`")]
    NonExhaustiveMatch { missing: String, span: Span },

    #[error("match has no cases")]
    EmptyMatch { span: Span },

    #[error("type of this scrutinee is not yet resolved; add a type annotation")]
    RequiresAnnotation { span: Span },

    #[error("guard must have type `Bool`, found `{found}`")]
    InvalidGuard { found: Type, span: Span },

    #[error("or-pattern branches bind different names")]
    OrPatternBindingMismatch { span: Span },

    #[error("cannot generalize a non-value binding; its type remains monomorphic")]
    CannotGeneralizeNonValue { span: Span },

    #[error("type variable would escape its scope")]
    EscapingTypeVariable { span: Span },

    #[error("overloads of `{name}` disagree on {detail}")]
    InconsistentOverloadSignature { name: Symbol, detail: &'static str, span: Span },

    #[error("overload of `{name}` is not a function type")]
    OverloadNotAFunction { name: Symbol, span: Span },

    #[error("no overload of `{name}` accepts {found} argument(s); available arities: {available:?}")]
    NoMatchingOverload { name: Symbol, found: usize, available: Vec<usize>, span: Span },

    #[error("call to `{name}` is ambiguous between overloads")]
    AmbiguousOverload { name: Symbol, span: Span },

    #[error("overloaded external `{name}` cannot be used as a first-class value")]
    FFIOverloadNotSupported { name: Symbol, span: Span },

    #[error("type alias `{name}` is cyclic (aliases are transparent, so this would expand forever)")]
    CyclicTypeAlias { name: Symbol, span: Span },
}

/// Non-fatal checker diagnostics (§4.5 "Usefulness"). These never block
/// inference; they accumulate on [`crate::infer::InferCtx`] and the caller
/// decides how to surface them (a host application may turn them into
/// warnings-as-errors per its own policy, not this crate's).
#[derive(Clone, Debug, Error)]
pub enum CheckWarning {
    #[error("this pattern can never be reached; an earlier arm already covers it")]
    UnreachablePattern { span: Span },
}

impl CheckWarning {
    pub fn span(&self) -> Span {
        match self {
            CheckWarning::UnreachablePattern { span } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            CheckWarning::UnreachablePattern { .. } => DiagnosticCode::UNREACHABLE_PATTERN,
        }
    }
}

fn did_you_mean_suffix(suggestion: &Option<Symbol>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean `{s}`?)"),
        None => String::new(),
    }
}

impl CheckError {
    pub fn span(&self) -> Span {
        use CheckError::*;
        match self {
            TypeMismatch { span, .. }
            | KindMismatch { span, .. }
            | FunctionArityMismatch { span, .. }
            | TypeApplicationArityMismatch { span, .. }
            | TupleArityMismatch { span, .. }
            | VariantNameMismatch { span, .. }
            | InfiniteType { span, .. }
            | UndefinedVariable { span, .. }
            | UndefinedType { span, .. }
            | UndefinedConstructor { span, .. }
            | UndefinedField { span, .. }
            | DuplicateDeclaration { span, .. }
            | DuplicatePatternBinding { span, .. }
            | DuplicateRecordField { span, .. }
            | NonExhaustiveMatch { span, .. }
            | EmptyMatch { span, .. }
            | RequiresAnnotation { span, .. }
            | InvalidGuard { span, .. }
            | OrPatternBindingMismatch { span, .. }
            | CannotGeneralizeNonValue { span, .. }
            | EscapingTypeVariable { span, .. }
            | InconsistentOverloadSignature { span, .. }
            | OverloadNotAFunction { span, .. }
            | NoMatchingOverload { span, .. }
            | AmbiguousOverload { span, .. }
            | FFIOverloadNotSupported { span, .. }
            | CyclicTypeAlias { span, .. } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        use CheckError::*;
        match self {
            TypeMismatch { .. } => DiagnosticCode::TYPE_MISMATCH,
            KindMismatch { .. } => DiagnosticCode::KIND_MISMATCH,
            FunctionArityMismatch { .. } => DiagnosticCode::FUNCTION_ARITY_MISMATCH,
            TypeApplicationArityMismatch { .. } => DiagnosticCode::TYPE_APPLICATION_ARITY_MISMATCH,
            TupleArityMismatch { .. } => DiagnosticCode::TUPLE_ARITY_MISMATCH,
            VariantNameMismatch { .. } => DiagnosticCode::VARIANT_NAME_MISMATCH,
            InfiniteType { .. } => DiagnosticCode::INFINITE_TYPE,
            UndefinedVariable { .. } => DiagnosticCode::UNDEFINED_VARIABLE,
            UndefinedType { .. } => DiagnosticCode::UNDEFINED_TYPE,
            UndefinedConstructor { .. } => DiagnosticCode::UNDEFINED_CONSTRUCTOR,
            UndefinedField { .. } => DiagnosticCode::UNDEFINED_FIELD,
            DuplicateDeclaration { .. } => DiagnosticCode::DUPLICATE_DECLARATION,
            DuplicatePatternBinding { .. } => DiagnosticCode::DUPLICATE_PATTERN_BINDING,
            DuplicateRecordField { .. } => DiagnosticCode::DUPLICATE_RECORD_FIELD,
            NonExhaustiveMatch { .. } => DiagnosticCode::NON_EXHAUSTIVE_MATCH,
            EmptyMatch { .. } => DiagnosticCode::EMPTY_MATCH,
            RequiresAnnotation { .. } => DiagnosticCode::REQUIRES_ANNOTATION,
            InvalidGuard { .. } => DiagnosticCode::INVALID_GUARD,
            OrPatternBindingMismatch { .. } => DiagnosticCode::OR_PATTERN_BINDING_MISMATCH,
            CannotGeneralizeNonValue { .. } => DiagnosticCode::CANNOT_GENERALIZE_NON_VALUE,
            EscapingTypeVariable { .. } => DiagnosticCode::ESCAPING_TYPE_VARIABLE,
            InconsistentOverloadSignature { .. } => DiagnosticCode::INCONSISTENT_OVERLOAD_SIGNATURE,
            OverloadNotAFunction { .. } => DiagnosticCode::OVERLOAD_NOT_A_FUNCTION,
            NoMatchingOverload { .. } => DiagnosticCode::NO_MATCHING_OVERLOAD,
            AmbiguousOverload { .. } => DiagnosticCode::AMBIGUOUS_OVERLOAD,
            FFIOverloadNotSupported { .. } => DiagnosticCode::OVERLOADED_EXTERNAL_USED_AS_VALUE,
            CyclicTypeAlias { .. } => DiagnosticCode::CYCLIC_TYPE_ALIAS,
        }
    }
}

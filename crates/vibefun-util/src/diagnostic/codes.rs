//! Stable `VF`-prefixed diagnostic codes, partitioned by phase:
//!
//! - `VF1xxx` — lexer (produced by the external lexer; reserved here so the
//!   numbering space lines up for a host application aggregating both).
//! - `VF2xxx` — desugarer (surface → core rewrites).
//! - `VF4xxx` — type checker; `VF4900`+ are checker warnings.
//! - `VF5xxx` — module-level concerns the driver surfaces; `VF5900`+ are
//!   module warnings.

/// A stable four-digit diagnostic code, e.g. `VF4020`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode(pub u32);

impl DiagnosticCode {
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn as_str(&self) -> String {
        format!("VF{:04}", self.0)
    }

    // ---- VF2xxx: desugarer -------------------------------------------------

    /// `let mut x = ...` bound a non-`ref` value; mutable bindings must wrap
    /// their initializer in `ref(...)`.
    pub const MUTABLE_BINDING_MUST_USE_REF: Self = Self::new(2001);
    /// `let mut` was used with a pattern other than a bare variable.
    pub const MUTABLE_BINDING_MUST_USE_SIMPLE_PATTERN: Self = Self::new(2002);
    /// An `and`-chained binding group contained a non-function binding.
    pub const AND_REQUIRES_LET_REC: Self = Self::new(2003);
    /// A record literal mixed shorthand (`{ x }`) and explicit (`{ x: e }`)
    /// field syntax inconsistently.
    pub const RECORD_MIXED_SYNTAX: Self = Self::new(2004);
    /// `(+)`-style operator sections are not supported.
    pub const OPERATOR_SECTION_NOT_SUPPORTED: Self = Self::new(2005);
    /// A return-type annotation appeared somewhere the desugarer cannot
    /// attach it to a function.
    pub const UNEXPECTED_RETURN_TYPE_ANNOTATION: Self = Self::new(2006);

    // ---- VF4xxx: type checker -----------------------------------------------

    pub const TYPE_MISMATCH: Self = Self::new(4001);
    pub const KIND_MISMATCH: Self = Self::new(4002);
    pub const FUNCTION_ARITY_MISMATCH: Self = Self::new(4003);
    pub const TYPE_APPLICATION_ARITY_MISMATCH: Self = Self::new(4004);
    pub const TUPLE_ARITY_MISMATCH: Self = Self::new(4005);
    pub const VARIANT_NAME_MISMATCH: Self = Self::new(4006);
    pub const INFINITE_TYPE: Self = Self::new(4007);

    pub const UNDEFINED_VARIABLE: Self = Self::new(4010);
    pub const UNDEFINED_TYPE: Self = Self::new(4011);
    pub const UNDEFINED_CONSTRUCTOR: Self = Self::new(4012);
    pub const UNDEFINED_FIELD: Self = Self::new(4013);
    pub const DUPLICATE_DECLARATION: Self = Self::new(4014);
    pub const DUPLICATE_PATTERN_BINDING: Self = Self::new(4015);
    pub const DUPLICATE_RECORD_FIELD: Self = Self::new(4016);
    /// A type alias's body expands back into itself with no intervening
    /// variant constructor to stop the expansion.
    pub const CYCLIC_TYPE_ALIAS: Self = Self::new(4017);

    pub const NON_EXHAUSTIVE_MATCH: Self = Self::new(4020);
    pub const EMPTY_MATCH: Self = Self::new(4021);
    /// The scrutinee's type still contains an unresolved type variable at
    /// the point exhaustiveness is checked; per the accepted known
    /// limitation, this is reported instead of attempting bidirectional
    /// inference.
    pub const REQUIRES_ANNOTATION: Self = Self::new(4022);

    pub const INVALID_GUARD: Self = Self::new(4030);
    pub const OR_PATTERN_BINDING_MISMATCH: Self = Self::new(4031);

    pub const CANNOT_GENERALIZE_NON_VALUE: Self = Self::new(4040);
    pub const ESCAPING_TYPE_VARIABLE: Self = Self::new(4041);

    pub const INCONSISTENT_OVERLOAD_SIGNATURE: Self = Self::new(4050);
    pub const OVERLOAD_NOT_A_FUNCTION: Self = Self::new(4051);
    pub const NO_MATCHING_OVERLOAD: Self = Self::new(4052);
    pub const AMBIGUOUS_OVERLOAD: Self = Self::new(4053);
    pub const OVERLOADED_EXTERNAL_USED_AS_VALUE: Self = Self::new(4054);

    /// `VF4900`: a `match` arm can never be reached because an earlier,
    /// unguarded arm already covers every value it would match.
    pub const UNREACHABLE_PATTERN: Self = Self::new(4900);

    // ---- VF5xxx: modules -----------------------------------------------------

    pub const MODULE_NOT_FOUND: Self = Self::new(5001);
    pub const IMPORT_NOT_EXPORTED: Self = Self::new(5002);
    pub const DUPLICATE_IMPORT: Self = Self::new(5003);
    pub const SHADOWED_IMPORT: Self = Self::new(5004);
    pub const RE_EXPORT_CONFLICT: Self = Self::new(5005);

    /// `VF5900`: a dependency cycle among modules (warning, not fatal).
    pub const CIRCULAR_DEPENDENCY: Self = Self::new(5900);
    pub const CASE_SENSITIVITY_MISMATCH: Self = Self::new(5901);

    /// Whether this code's number falls in the `VF4900`+ / `VF5900`+ warning
    /// bands. Codes below those thresholds within their phase are errors.
    pub fn is_warning_by_convention(&self) -> bool {
        (4900..5000).contains(&self.0) || (5900..6000).contains(&self.0)
    }
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_pads_to_four_digits() {
        assert_eq!(DiagnosticCode::new(1).as_str(), "VF0001");
        assert_eq!(DiagnosticCode::UNREACHABLE_PATTERN.as_str(), "VF4900");
    }

    #[test]
    fn warning_band_detection() {
        assert!(DiagnosticCode::UNREACHABLE_PATTERN.is_warning_by_convention());
        assert!(DiagnosticCode::CIRCULAR_DEPENDENCY.is_warning_by_convention());
        assert!(!DiagnosticCode::NON_EXHAUSTIVE_MATCH.is_warning_by_convention());
        assert!(!DiagnosticCode::MODULE_NOT_FOUND.is_warning_by_convention());
    }

    #[test]
    fn codes_partition_by_phase() {
        assert!(DiagnosticCode::MUTABLE_BINDING_MUST_USE_REF.0 / 1000 == 2);
        assert!(DiagnosticCode::TYPE_MISMATCH.0 / 1000 == 4);
        assert!(DiagnosticCode::MODULE_NOT_FOUND.0 / 1000 == 5);
    }
}

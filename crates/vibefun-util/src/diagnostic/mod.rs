//! Diagnostic construction and collection.
//!
//! # Examples
//!
//! ```
//! use vibefun_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use vibefun_util::span::Span;
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("undefined variable `xs`")
//!     .code(DiagnosticCode::UNDEFINED_VARIABLE)
//!     .span(Span::DUMMY)
//!     .with_help("did you mean `xss`?")
//!     .emit(&handler);
//!
//! assert!(handler.has_errors());
//! ```

mod builder;
mod codes;
mod level;

pub use builder::{DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;
pub use level::Level;

use crate::span::Span;
use std::cell::RefCell;

/// One error, warning, note, or help message: a severity, a location, a
/// templated message, and the optional supporting detail the checker
/// attaches (notes, a fix-it hint, related codes for did-you-mean).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub snippets: Vec<SourceSnippet>,
    pub related: Vec<DiagnosticCode>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
            related: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }
}

/// Collects diagnostics emitted over the course of compiling one module.
///
/// `vibefun-driver` owns one `Handler` per `compile_module` call; nothing in
/// this workspace shares a `Handler` across threads, so it uses interior
/// mutability (`RefCell`) rather than a lock.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn build_error(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::error(message).span(span)
    }

    pub fn build_warning(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::warning(message).span(span)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level.is_warning()).count()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

/// Find the best did-you-mean candidate for `name` among `candidates`, by
/// Levenshtein distance. Returns `None` if nothing is close enough to be a
/// plausible typo (distance more than a third of the name's length, and
/// always more than 3).
pub fn did_you_mean<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let max_distance = (name.chars().count() / 3).max(1).min(3);
    candidates
        .into_iter()
        .map(|c| (c, levenshtein(name, c)))
        .filter(|(c, d)| *d <= max_distance && !c.is_empty())
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut prev_diag = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let tmp = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                prev_diag
            } else {
                1 + prev_diag.min(row[j]).min(row[j - 1])
            };
            prev_diag = tmp;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_starts_empty() {
        let h = Handler::new();
        assert!(!h.has_errors());
        assert_eq!(h.error_count(), 0);
        assert_eq!(h.warning_count(), 0);
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let h = Handler::new();
        h.emit_diagnostic(Diagnostic::warning("unused", Span::DUMMY));
        assert!(!h.has_errors());
        assert_eq!(h.warning_count(), 1);
    }

    #[test]
    fn errors_are_counted_and_retrievable() {
        let h = Handler::new();
        h.build_error(Span::DUMMY, "boom")
            .code(DiagnosticCode::TYPE_MISMATCH)
            .emit(&h);
        assert!(h.has_errors());
        assert_eq!(h.diagnostics()[0].code, Some(DiagnosticCode::TYPE_MISMATCH));
    }

    #[test]
    fn clear_removes_all_diagnostics() {
        let h = Handler::new();
        h.emit_diagnostic(Diagnostic::error("x", Span::DUMMY));
        h.clear();
        assert!(!h.has_errors());
    }

    #[test]
    fn did_you_mean_finds_close_typo() {
        let candidates = ["length", "width", "height"];
        assert_eq!(did_you_mean("lenght", candidates), Some("length"));
    }

    #[test]
    fn did_you_mean_rejects_far_candidates() {
        let candidates = ["apple", "banana"];
        assert_eq!(did_you_mean("zzzzzzzz", candidates), None);
    }

    #[test]
    fn did_you_mean_handles_empty_candidates() {
        let candidates: Vec<&str> = vec![];
        assert_eq!(did_you_mean("anything", candidates), None);
    }
}

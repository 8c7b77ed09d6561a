//! Fluent construction of [`super::Diagnostic`]s.

use super::{Diagnostic, DiagnosticCode, Handler, Level};
use crate::span::Span;

/// A single source line to display under a diagnostic, with the column
/// range to underline.
#[derive(Clone, Debug)]
pub struct SourceSnippet {
    pub line: String,
    pub line_number: u32,
    pub start_column: u32,
    pub end_column: u32,
    pub label: Option<String>,
}

impl SourceSnippet {
    pub fn new(
        line: impl Into<String>,
        line_number: u32,
        start_column: u32,
        end_column: u32,
    ) -> Self {
        Self {
            line: line.into(),
            line_number,
            start_column,
            end_column,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Fluent builder for a [`Diagnostic`]. Obtained from [`DiagnosticBuilder::error`]
/// / [`DiagnosticBuilder::warning`], or from [`Handler::build_error`].
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            diagnostic: Diagnostic::new(Level::Error, message, Span::DUMMY),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            diagnostic: Diagnostic::new(Level::Warning, message, Span::DUMMY),
        }
    }

    pub fn span(mut self, span: Span) -> Self {
        self.diagnostic.span = span;
        self
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.diagnostic.code = Some(code);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.diagnostic.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic.helps.push(help.into());
        self
    }

    pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
        self.diagnostic.snippets.push(snippet);
        self
    }

    /// Attach a did-you-mean suggestion, computed by the caller via proximity
    /// over in-scope names.
    pub fn with_related(mut self, code: DiagnosticCode) -> Self {
        self.diagnostic.related.push(code);
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }

    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.diagnostic);
    }
}

//! Crate-local error types shared by the rest of the workspace.

use thiserror::Error;

/// Errors arising from [`crate::span::SourceMap`] lookups.
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("file not found: {0:?}")]
    FileNotFound(crate::span::FileId),

    #[error("invalid span: start {start} > end {end}")]
    InvalidSpan { start: usize, end: usize },

    #[error("span out of bounds: file has {file_len} bytes, span is {span_start}..{span_end}")]
    SpanOutOfBounds {
        file_len: usize,
        span_start: usize,
        span_end: usize,
    },
}

/// Result alias for source-map operations.
pub type SourceMapResult<T> = std::result::Result<T, SourceMapError>;

//! Source location tracking.
//!
//! Every diagnosable unit of the compiler — a Core node, a diagnostic, a
//! FFI overload candidate — carries a [`Span`] pinpointing the location that
//! produced it: file, line, column, and byte offset, per the location model
//! the diagnostic taxonomy is built on.

mod source_map;

pub use source_map::{SourceFile, SourceMap};

/// Identifies one source file registered with a [`SourceMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

impl FileId {
    pub const DUMMY: FileId = FileId(0);
}

impl Default for FileId {
    fn default() -> Self {
        Self::DUMMY
    }
}

/// A byte range in a source file, with the line/column of its start for
/// human-facing display.
///
/// # Examples
///
/// ```
/// use vibefun_util::span::Span;
///
/// let a = Span::new(0, 3, 1, 1, Default::default());
/// let b = Span::new(3, 7, 1, 4, Default::default());
/// let merged = a.merge(b);
/// assert_eq!((merged.start, merged.end), (0, 7));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    /// A placeholder span for nodes synthesized by the compiler (e.g. a
    /// desugaring rewrite's intermediate bindings) that have no source text
    /// of their own.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
        file_id: FileId::DUMMY,
    };

    pub fn new(start: usize, end: usize, line: u32, column: u32, file_id: FileId) -> Self {
        Self {
            start,
            end,
            line,
            column,
            file_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The smallest span covering both `self` and `other`. Used when a Core
    /// node synthesized during desugaring (e.g. a `match` built from an
    /// `if`/`else` chain) needs a span covering its whole source extent.
    pub fn merge(self, other: Span) -> Span {
        let leading = if self.start <= other.start { self } else { other };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: leading.line,
            column: leading.column,
            file_id: leading.file_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_span_is_empty() {
        assert!(Span::DUMMY.is_empty());
    }

    #[test]
    fn len_is_end_minus_start() {
        let s = Span::new(10, 20, 1, 1, FileId::DUMMY);
        assert_eq!(s.len(), 10);
    }

    #[test]
    fn contains_is_half_open() {
        let s = Span::new(10, 20, 1, 1, FileId::DUMMY);
        assert!(s.contains(10));
        assert!(!s.contains(20));
    }

    #[test]
    fn merge_takes_min_start_max_end() {
        let a = Span::new(5, 10, 1, 6, FileId::DUMMY);
        let b = Span::new(20, 30, 2, 1, FileId::DUMMY);
        let m = a.merge(b);
        assert_eq!(m.start, 5);
        assert_eq!(m.end, 30);
    }
}

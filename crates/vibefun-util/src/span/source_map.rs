//! Registry of source files, used to turn a [`Span`] into line/column text
//! for diagnostic rendering (the rendering itself stays out of scope; this
//! only resolves the coordinates).

use std::sync::Arc;

use super::{FileId, Span};

/// A registered source file: its name, its content, and precomputed line
/// start offsets so byte-offset-to-line/column lookups are `O(log n)`.
#[derive(Clone)]
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self {
            id,
            name: name.into(),
            content,
            line_starts,
        }
    }

    fn compute_line_starts(content: &str) -> Arc<[usize]> {
        let mut starts = vec![0];
        for (i, ch) in content.char_indices() {
            if ch == '\n' {
                starts.push(i + 1);
            }
        }
        starts.into()
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Convert a byte offset into a 1-based `(line, column)` pair.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col as u32 + 1)
    }

    /// The full text of the line containing `line` (1-based), without its
    /// trailing newline. Used to build a [`crate::diagnostic::SourceSnippet`].
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e - 1)
            .unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches('\r'))
    }
}

/// Owns every [`SourceFile`] seen during a compilation and assigns them
/// sequential [`FileId`]s.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile::new(id, name, content));
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    /// Build a span from a byte range, resolving its line/column against the
    /// registered file.
    pub fn span(&self, file_id: FileId, start: usize, end: usize) -> Span {
        let (line, column) = self
            .get(file_id)
            .map(|f| f.line_col(start))
            .unwrap_or((0, 0));
        Span {
            start,
            end,
            line,
            column,
            file_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_of_first_byte_is_one_one() {
        let f = SourceFile::new(FileId(0), "t.vf", "abc\ndef");
        assert_eq!(f.line_col(0), (1, 1));
    }

    #[test]
    fn line_col_after_newline_is_line_two() {
        let f = SourceFile::new(FileId(0), "t.vf", "abc\ndef");
        assert_eq!(f.line_col(4), (2, 1));
    }

    #[test]
    fn line_text_strips_newline() {
        let f = SourceFile::new(FileId(0), "t.vf", "abc\ndef\n");
        assert_eq!(f.line_text(1), Some("abc"));
        assert_eq!(f.line_text(2), Some("def"));
    }

    #[test]
    fn source_map_assigns_sequential_ids() {
        let mut sm = SourceMap::new();
        let a = sm.add_file("a.vf", "x");
        let b = sm.add_file("b.vf", "y");
        assert_eq!(a, FileId(0));
        assert_eq!(b, FileId(1));
    }

    #[test]
    fn source_map_span_resolves_line_column() {
        let mut sm = SourceMap::new();
        let id = sm.add_file("t.vf", "abc\ndef");
        let span = sm.span(id, 4, 7);
        assert_eq!((span.line, span.column), (2, 1));
    }
}

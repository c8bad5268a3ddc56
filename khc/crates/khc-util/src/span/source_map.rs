//! Source map - mapping byte offsets back to lines and columns.
//!
//! The front-end itself only deals in byte offsets; anything user-facing
//! (the driver, error listings) goes through a [`SourceMap`] to turn a
//! [`Span`] into `file:line:column` form and to extract snippets.

use std::sync::Arc;

use super::{FileId, Span};
use crate::error::{SourceMapError, SourceMapResult};

/// A single source file registered with the [`SourceMap`].
///
/// Stores the file content together with a precomputed table of line
/// start offsets, so offset-to-line lookups are a binary search.
///
/// # Examples
///
/// ```
/// use khc_util::span::SourceFile;
///
/// let file = SourceFile::new(0, "demo.kh", "def main() {\n}\n");
/// assert_eq!(file.line_count(), 3);
/// assert_eq!(file.offset_to_line_col(13), (2, 1));
/// ```
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file and index its line starts.
    pub fn new(id: usize, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content: Arc<str> = content.into();
        let mut line_starts = vec![0];
        for (offset, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            id: FileId::new(id),
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// The file's identifier.
    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// The file's name as registered.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full file content.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of lines in the file. An empty file has one line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset at which the given 1-based line starts.
    pub fn line_start(&self, line: usize) -> SourceMapResult<usize> {
        self.line_starts
            .get(line.wrapping_sub(1))
            .copied()
            .ok_or(SourceMapError::InvalidLineNumber {
                line,
                max_lines: self.line_count(),
            })
    }

    /// Convert a byte offset to a `(line, column)` pair, both 1-based.
    ///
    /// Offsets past the end of the file clamp to the last line.
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.content[line_start..offset.min(self.content.len())]
            .chars()
            .count()
            + 1;
        (line_idx + 1, column)
    }

    /// The text of the 1-based line, without its trailing newline.
    pub fn line_at(&self, line: usize) -> SourceMapResult<&str> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.content.len());
        Ok(&self.content[start..end.max(start)])
    }

    /// Extract the source text covered by a byte range.
    pub fn extract(&self, range: std::ops::Range<usize>) -> SourceMapResult<&str> {
        if range.start > range.end {
            return Err(SourceMapError::InvalidSpan {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > self.content.len() {
            return Err(SourceMapError::SpanOutOfBounds {
                file_len: self.content.len(),
                span_start: range.start,
                span_end: range.end,
            });
        }
        Ok(&self.content[range])
    }
}

/// Registry of source files keyed by [`FileId`].
///
/// # Examples
///
/// ```
/// use khc_util::span::{SourceMap, Span};
///
/// let mut map = SourceMap::new();
/// let id = map.add_file("main.kh", "x: int = 3\n");
/// let span = Span::new(0, 1, 1, 1).with_file_id(id);
/// assert_eq!(map.format_span(span).unwrap(), "main.kh:1:1");
/// ```
#[derive(Default)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = self.files.len();
        let file = Arc::new(SourceFile::new(id, name, content));
        self.files.push(file);
        FileId::new(id)
    }

    /// Look up a file by id.
    pub fn get(&self, id: FileId) -> Option<Arc<SourceFile>> {
        self.files.get(id.index()).cloned()
    }

    /// Number of registered files.
    #[inline]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Render a span as `name:line:column`.
    pub fn format_span(&self, span: Span) -> Option<String> {
        let file = self.get(span.file_id)?;
        let (line, column) = file.offset_to_line_col(span.start);
        Some(format!("{}:{}:{}", file.name(), line, column))
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

use std::fmt;

/// Interned handle to a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId(pub u32);

impl SourceId {
    /// Sentinel for "no file".
    pub const UNKNOWN: SourceId = SourceId(u32::MAX);
}

/// A line/column range in a source file. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub source: SourceId,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    /// Sentinel for "location not known". Lines are 1-based, so the
    /// all-zero span never names a real location.
    pub const UNKNOWN: Span = Span {
        source: SourceId::UNKNOWN,
        start_line: 0,
        start_col: 0,
        end_line: 0,
        end_col: 0,
    };

    pub fn new(
        source: SourceId,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> Self {
        Self {
            source,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Whether this span names a real location rather than the sentinel.
    pub fn is_known(&self) -> bool {
        self.start_line != 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_known() {
            return write!(f, "<unknown>");
        }
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
///
/// Builders track byte offsets while scanning source; node spans are
/// line/column ranges. This is the bridge between the two.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based. O(log n).
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Build a [`Span`] for the byte range `start..end` in `source`.
    pub fn span(&self, source: SourceId, start: usize, end: usize) -> Span {
        let (start_line, start_col) = self.offset_to_line_col(start);
        let (end_line, end_col) = self.offset_to_line_col(end);
        Span::new(source, start_line, start_col, end_line, end_col)
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

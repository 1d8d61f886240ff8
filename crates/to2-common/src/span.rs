use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// `offset` is a byte offset into the original source string. `line` and
/// `character` are 0-based and follow the editor convention (character is
/// counted in UTF-16 code units), so a position can be handed to an editor
/// host without re-scanning the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputPosition {
    pub offset: u32,
    pub line: u32,
    pub character: u32,
}

impl InputPosition {
    pub fn new(offset: u32, line: u32, character: u32) -> Self {
        Self {
            offset,
            line,
            character,
        }
    }
}

/// A half-open range of source text. Start is inclusive, end is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputRange {
    pub start: InputPosition,
    pub end: InputPosition,
}

impl InputRange {
    pub fn new(start: InputPosition, end: InputPosition) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "range start ({}) must be <= end ({})",
            start.offset,
            end.offset
        );
        Self { start, end }
    }

    /// Length of the range in bytes. Zero for a reversed range.
    pub fn len(&self) -> u32 {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Merge two ranges into one that covers both.
    pub fn merge(self, other: InputRange) -> InputRange {
        InputRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The first `len` bytes of a range that starts on a single line, such
    /// as the name in front of `Name<Args>`. Clamped to the range.
    pub fn prefix(self, len: u32) -> InputRange {
        let len = len.min(self.len());
        InputRange {
            start: self.start,
            end: InputPosition {
                offset: self.start.offset + len,
                line: self.start.line,
                character: self.start.character + len,
            },
        }
    }

    /// Whether the byte offset falls inside this range.
    pub fn contains(&self, offset: u32) -> bool {
        self.start.offset <= offset && offset < self.end.offset
    }

    /// Byte offsets as a `Range<usize>`, the form ariadne expects.
    pub fn to_byte_range(&self) -> std::ops::Range<usize> {
        self.start.offset as usize..self.end.offset as usize
    }
}

/// Pre-computed index of line start positions.
///
/// Constructed once per source file, then used to convert byte offsets into
/// [`InputPosition`]s via binary search.
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a position. Offsets past the end of the
    /// source are clamped to the end.
    pub fn position(&self, offset: u32) -> InputPosition {
        let offset = offset.min(self.source.len() as u32);
        // partition_point returns the index of the first line start > offset,
        // so the line index is one less than that.
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line_idx] as usize;
        let character = self
            .source
            .get(line_start..offset as usize)
            .map(|text| text.chars().map(|c| c.len_utf16() as u32).sum())
            .unwrap_or(offset - line_start as u32);
        InputPosition {
            offset,
            line: line_idx as u32,
            character,
        }
    }

    pub fn range(&self, start: u32, end: u32) -> InputRange {
        InputRange::new(self.position(start), self.position(end))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

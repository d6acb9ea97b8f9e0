//! Locations in command input.

use std::fmt;
use std::ops::Range;

use crate::files::FileId;

/// Byte offsets into source files.
pub type BytePos = u32;

/// Byte ranges in source files.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct ByteRange {
    start: BytePos,
    end: BytePos,
}

impl fmt::Debug for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteRange({}..{})", self.start, self.end)
    }
}

impl ByteRange {
    pub const fn new(start: BytePos, end: BytePos) -> ByteRange {
        ByteRange { start, end }
    }

    /// An empty range at `pos`.
    pub const fn at(pos: BytePos) -> ByteRange {
        ByteRange::new(pos, pos)
    }

    pub const fn start(&self) -> BytePos {
        self.start
    }

    pub const fn end(&self) -> BytePos {
        self.end
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(self, other: ByteRange) -> ByteRange {
        ByteRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Shift the range right by `offset` bytes.
    pub fn offset(self, offset: BytePos) -> ByteRange {
        ByteRange::new(self.start + offset, self.end + offset)
    }
}

impl From<ByteRange> for Range<usize> {
    fn from(range: ByteRange) -> Range<usize> {
        (range.start as usize)..(range.end as usize)
    }
}

/// A byte range in a specific file.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct FileRange {
    file_id: FileId,
    byte_range: ByteRange,
}

impl fmt::Debug for FileRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FileRange({}, {}..{})",
            self.file_id, self.byte_range.start, self.byte_range.end
        )
    }
}

impl FileRange {
    pub const fn new(file_id: FileId, byte_range: ByteRange) -> FileRange {
        FileRange {
            file_id,
            byte_range,
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub const fn byte_range(&self) -> ByteRange {
        self.byte_range
    }
}

impl From<FileRange> for Range<usize> {
    fn from(file_range: FileRange) -> Range<usize> {
        file_range.byte_range.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// `ByteRange` is stored in every AST node. Ensure it doesn't grow accidentally.
    fn byte_range_size() {
        assert_eq!(std::mem::size_of::<ByteRange>(), 8);
    }

    #[test]
    fn file_range_size() {
        assert_eq!(std::mem::size_of::<FileRange>(), 12);
    }

    #[test]
    fn merge_and_offset() {
        let range = ByteRange::new(4, 6).merge(ByteRange::new(1, 5));
        assert_eq!(range, ByteRange::new(1, 6));
        assert_eq!(range.offset(10), ByteRange::new(11, 16));
        assert!(ByteRange::at(3).is_empty());
    }
}

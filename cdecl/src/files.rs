//! The sources that diagnostics point into.
//!
//! Every command cdecl reads is stored here, so diagnostics can show the
//! offending line. A file can start part way through a longer input, in which
//! case its reported line numbers are shifted accordingly.

use std::fmt;
use std::num::NonZeroU32;
use std::ops::Range;

use codespan_reporting::files::{line_starts, Error};

/// File id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FileId(NonZeroU32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for FileId {
    type Error = <NonZeroU32 as TryFrom<u32>>::Error;

    fn try_from(value: u32) -> Result<FileId, Self::Error> {
        let id = NonZeroU32::try_from(value)?;
        Ok(FileId(id))
    }
}

impl From<FileId> for u32 {
    fn from(value: FileId) -> u32 {
        value.0.get()
    }
}

impl From<FileId> for usize {
    fn from(value: FileId) -> usize {
        value.0.get() as usize
    }
}

pub struct SourceFile {
    name: String,
    source: String,
    line_starts: Vec<usize>,
    /// Lines before the first line of `source`.
    first_line: usize,
}

impl SourceFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn line_start(&self, line_index: usize) -> Result<usize, Error> {
        use std::cmp::Ordering;

        match line_index.cmp(&self.line_starts.len()) {
            Ordering::Less => Ok(self.line_starts[line_index]),
            Ordering::Equal => Ok(self.source.len()),
            Ordering::Greater => Err(Error::LineTooLarge {
                given: line_index,
                max: self.line_starts.len() - 1,
            }),
        }
    }
}

#[derive(Default)]
pub struct Files {
    files: Vec<SourceFile>,
}

impl Files {
    /// Create a new files database.
    pub fn new() -> Files {
        Files { files: Vec::new() }
    }

    /// Add a file to the database, returning the handle that can be used to
    /// refer to it again.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> FileId {
        self.add_at_line(name, source, 0)
    }

    /// Add a file whose first line is line `first_line + 1` of `name`.
    pub fn add_at_line(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        first_line: usize,
    ) -> FileId {
        let source = source.into();
        self.files.push(SourceFile {
            name: name.into(),
            line_starts: line_starts(&source).collect(),
            source,
            first_line,
        });
        // More than `u32::MAX` commands would exhaust memory long before this.
        let len = u32::try_from(self.files.len()).unwrap_or(u32::MAX);
        FileId::try_from(len).unwrap_or(FileId(NonZeroU32::MIN))
    }

    /// Get the file corresponding to the given id.
    pub fn get(&self, file_id: FileId) -> Result<&SourceFile, Error> {
        let index = usize::from(file_id) - 1;
        self.files.get(index).ok_or(Error::FileMissing)
    }
}

impl<'a> codespan_reporting::files::Files<'a> for Files {
    type FileId = FileId;
    type Name = &'a str;
    type Source = &'a str;

    fn name(&'a self, file_id: FileId) -> Result<&'a str, Error> {
        Ok(self.get(file_id)?.name())
    }

    fn source(&'a self, file_id: FileId) -> Result<&'a str, Error> {
        Ok(self.get(file_id)?.source())
    }

    fn line_index(&self, file_id: FileId, byte_index: usize) -> Result<usize, Error> {
        let file = self.get(file_id)?;
        let index = file
            .line_starts
            .binary_search(&byte_index)
            .unwrap_or_else(|next_line| next_line - 1);
        Ok(index + file.first_line)
    }

    fn line_range(&self, file_id: FileId, line_index: usize) -> Result<Range<usize>, Error> {
        let file = self.get(file_id)?;
        let line_index = line_index.saturating_sub(file.first_line);
        let start = file.line_start(line_index)?;
        let end = file.line_start(line_index + 1)?;
        Ok(start..end)
    }
}

#[cfg(test)]
mod tests {
    use codespan_reporting::files::Files as _;

    use super::*;

    #[test]
    fn lines_are_shifted() {
        let mut files = Files::new();
        let file_id = files.add_at_line("script.cdecl", "explain int x\nexplain int y\n", 9);
        assert_eq!(files.line_index(file_id, 16).unwrap(), 10);
        assert_eq!(files.line_number(file_id, 10).unwrap(), 11);
        assert_eq!(files.line_range(file_id, 10).unwrap(), 14..28);
    }

    #[test]
    fn ids_start_at_one() {
        let mut files = Files::new();
        let first = files.add("<command line>", "explain int x");
        let second = files.add("<stdin>", "explain int y");
        assert_eq!(u32::from(first), 1);
        assert_eq!(u32::from(second), 2);
        assert_eq!(files.get(second).unwrap().source(), "explain int y");
    }
}

//! Source code representation for the Calla front end.
//!
//! The scanner walks raw bytes and stamps every token with a [`Location`];
//! everything downstream — the preparser, the diagnostic renderer — answers
//! position questions through the types in this module instead of re-reading
//! the source. Key types:
//!
//! - `FileID`: a session-scoped handle to one source file
//! - `Position` and `Location`: a point and a range in a file, with the
//!   open/closed discipline the scanner builds locations under
//! - `LineIndex`: offset-to-line/column queries over precomputed line starts
//! - `SourceFile` and `SourceManager`: the files of a compilation session

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// A handle to one source file within a [`SourceManager`].
///
/// Ids are dense, assigned in registration order starting at 1; 0 is left
/// unassigned so a zeroed id never resolves to a real file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileID(usize);

impl FileID {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(&self) -> usize { self.0 }
}

impl fmt::Display for FileID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "file#{}", self.0) }
}

/// A point in a source file: 1-indexed line and column plus the 0-indexed
/// byte offset.
///
/// The offset is the authoritative coordinate; line and column exist so
/// diagnostics never have to recompute them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from the start of the file (0-indexed)
    pub offset: usize,
}

impl Position {
    /// Creates a position from its three coordinates.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// The first position of any file: line 1, column 1, offset 0.
    #[must_use]
    pub const fn start_of_file() -> Self { Self { line: 1, column: 1, offset: 0 } }

    /// Returns true if this position comes strictly before `other`.
    #[must_use]
    pub const fn precedes(&self, other: &Self) -> bool { self.offset < other.offset }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A location in a source file, representing a range between two positions.
///
/// The scanner builds locations incrementally: [`Location::open`] creates a
/// location whose end is not yet meaningful, [`Location::start_at`] pins the
/// start of the construct being scanned, and [`Location::end_at`] *closes* the
/// location once the construct's last byte is known. Tokens and declarations
/// always carry closed locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Starting position of the location
    pub start: Position,
    /// Ending position of the location (exclusive)
    pub end: Position,
    /// File identifier
    pub file_id: FileID,
}

impl Location {
    /// Creates a new closed location with the given start and end positions.
    #[must_use]
    pub const fn new(start: Position, end: Position, file_id: FileID) -> Self {
        Self { start, end, file_id }
    }

    /// Creates an open location at the start of the given file.
    ///
    /// The end position is initialised to the start; the location is not
    /// meaningful until [`Location::end_at`] has been called.
    #[must_use]
    pub const fn open(file_id: FileID) -> Self {
        Self {
            start: Position::start_of_file(),
            end: Position::start_of_file(),
            file_id,
        }
    }

    /// Pins the start of this location.
    pub const fn start_at(&mut self, line: usize, column: usize, offset: usize) {
        self.start = Position::new(line, column, offset);
    }

    /// Closes this location at the given end position.
    pub const fn end_at(&mut self, line: usize, column: usize, offset: usize) {
        self.end = Position::new(line, column, offset);
    }

    /// Returns the byte range of this location.
    #[must_use]
    pub const fn byte_range(&self) -> Range<usize> { self.start.offset..self.end.offset }

    /// Returns true if `other` lies entirely within this location.
    #[must_use]
    pub const fn covers(&self, other: &Self) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// Creates a new location that encompasses both input locations.
    ///
    /// ## Panics
    ///
    /// Panics if the locations are from different files.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        assert_eq!(self.file_id, other.file_id, "locations span different files");

        let start = if self.start.precedes(&other.start) { self.start } else { other.start };
        let end = if self.end.precedes(&other.end) { other.end } else { self.end };

        Self { start, end, file_id: self.file_id }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.file_id, self.start, self.end)
    }
}

/// Offset-to-line/column queries over one file's content.
///
/// The index records where every line begins, so a lookup is one
/// `partition_point` over a sorted vector rather than a rescan of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of each line's first byte; entry 0 is always 0
    starts: Vec<usize>,
}

impl LineIndex {
    /// Indexes the line starts of `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut starts = vec![0];

        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(offset + 1);
            }
        }

        Self { starts }
    }

    /// Returns how many lines the indexed text has.
    #[must_use]
    pub fn line_count(&self) -> usize { self.starts.len() }

    /// Returns the line number (1-indexed) containing the byte offset.
    ///
    /// An offset past the end of the text answers with the last line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    /// Returns the byte offset where the given line (1-indexed) begins.
    ///
    /// ## Panics
    ///
    /// Panics if the line number exceeds [`LineIndex::line_count`].
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize { self.starts[line - 1] }

    /// Resolves a byte offset into a full [`Position`].
    #[must_use]
    pub fn position_of(&self, offset: usize) -> Position {
        let line = self.line_of(offset);

        Position::new(line, offset - self.line_start(line) + 1, offset)
    }
}

/// One source file of a compilation session.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Identifier of the file
    pub id: FileID,
    /// Name of the file, as shown in diagnostics
    pub name: String,
    /// Filesystem path, when the file came from disk
    pub path: Option<PathBuf>,
    /// Content of the file
    pub content: String,
    /// Line index over the content
    pub lines: LineIndex,
}

impl SourceFile {
    /// Creates a source file, indexing its lines.
    #[must_use]
    pub fn new(id: FileID, name: String, content: String) -> Self {
        let lines = LineIndex::of(&content);

        Self { id, name, path: None, content, lines }
    }

    /// Records the filesystem path the content came from.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Returns the content as raw bytes, the view the scanner's cursor walks.
    #[must_use]
    pub fn bytes(&self) -> &[u8] { self.content.as_bytes() }

    /// Resolves a byte offset into a [`Position`], clamping offsets past the
    /// end of the content to the end.
    #[must_use]
    pub fn position_from_offset(&self, offset: usize) -> Position {
        self.lines.position_of(offset.min(self.content.len()))
    }

    /// Returns the text covered by a location.
    ///
    /// ## Panics
    ///
    /// Panics if the location's byte range falls outside the content.
    #[must_use]
    pub fn text_at_location(&self, location: Location) -> &str {
        &self.content[location.byte_range()]
    }

    /// Returns the full line of text containing the given position, without
    /// its newline.
    ///
    /// ## Panics
    ///
    /// Panics if the position's line is not in this file.
    #[must_use]
    pub fn line_at_position(&self, position: Position) -> &str {
        &self.content[self.line_range(position.line)]
    }

    /// Returns the byte range of one line (1-indexed), newline excluded.
    fn line_range(&self, line: usize) -> Range<usize> {
        let start = self.lines.line_start(line);

        let end = if line < self.lines.line_count() {
            self.lines.line_start(line + 1) - 1
        } else {
            self.content.len()
        };

        start..end
    }
}

/// The source files of one compilation session.
///
/// Files are stored in registration order; a file's [`FileID`] is its
/// 1-based slot in that order, so resolving an id is an index, not a hash
/// lookup. A name table over [`FxHashMap`] answers the reverse question.
#[derive(Debug, Default, Clone)]
pub struct SourceManager {
    /// The files, in registration order; id N lives at slot N - 1
    files: Vec<SourceFile>,
    /// Reverse lookup from file name to id
    ids_by_name: FxHashMap<String, FileID>,
}

impl SourceManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a source file and returns its id.
    pub fn add_file(&mut self, name: String, content: String) -> FileID {
        let id = FileID::new(self.files.len() + 1);

        drop(self.ids_by_name.insert(name.clone(), id));
        self.files.push(SourceFile::new(id, name, content));

        id
    }

    /// Registers a source file that came from disk and returns its id.
    pub fn add_file_with_path(&mut self, name: String, path: PathBuf, content: String) -> FileID {
        let id = FileID::new(self.files.len() + 1);

        drop(self.ids_by_name.insert(name.clone(), id));
        self.files.push(SourceFile::new(id, name, content).with_path(path));

        id
    }

    /// Returns the file behind an id, if the id was issued by this manager.
    #[must_use]
    pub fn get_file(&self, id: FileID) -> Option<&SourceFile> {
        self.files.get(id.value().checked_sub(1)?)
    }

    /// Returns the id registered under a file name.
    #[must_use]
    pub fn file_id_of(&self, name: &str) -> Option<FileID> {
        self.ids_by_name.get(name).copied()
    }

    /// Returns how many files are registered.
    #[must_use]
    pub fn len(&self) -> usize { self.files.len() }

    /// Returns true if no file is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.files.is_empty() }

    /// Resolves a byte offset in the given file into a [`Position`].
    #[must_use]
    pub fn position_from_offset(&self, file_id: FileID, offset: usize) -> Option<Position> {
        self.get_file(file_id).map(|file| file.position_from_offset(offset))
    }

    /// Returns the text covered by a location, if its file exists.
    #[must_use]
    pub fn text_at_location(&self, location: Location) -> Option<&str> {
        self.get_file(location.file_id).map(|file| file.text_at_location(location))
    }

    /// Returns the line of text containing the given position, if the file
    /// exists.
    #[must_use]
    pub fn line_at_position(&self, file_id: FileID, position: Position) -> Option<&str> {
        self.get_file(file_id).map(|file| file.line_at_position(position))
    }
}

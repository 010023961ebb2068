//! Line-oriented text buffer backing a Terraform file.
//!
//! The buffer stores one entry per physical line without terminators and
//! remembers the line-ending convention and trailing newline of the source,
//! so an unmodified buffer serialises back to the exact bytes it was loaded
//! from.
//!
//! Structural edits ([`TextBuffer::insert_before`], [`TextBuffer::delete`])
//! shift every later line. Indices recorded before such an edit are stale for
//! positions at or after the edit point.

use std::fs;
use std::io::Write as IoWrite;
use std::path::Path;

use crate::error::TfError;

/// Line terminator convention of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix line endings (`\n`).
    #[default]
    Lf,
    /// Windows line endings (`\r\n`).
    CrLf,
}

impl LineEnding {
    /// Detects the convention from the first terminator in `text`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(offset) if offset > 0 && text.as_bytes().get(offset - 1) == Some(&b'\r') => {
                Self::CrLf
            }
            _ => Self::Lf,
        }
    }

    /// Returns the terminator as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// One stored line and the terminator it was read with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: String,
    ending: LineEnding,
}

impl Line {
    fn terminated(segment: &str) -> Self {
        segment.strip_suffix('\r').map_or_else(
            || Self {
                text: segment.to_owned(),
                ending: LineEnding::Lf,
            },
            |text| Self {
                text: text.to_owned(),
                ending: LineEnding::CrLf,
            },
        )
    }

    fn with_ending(text: impl Into<String>, ending: LineEnding) -> Self {
        Self {
            text: text.into(),
            ending,
        }
    }
}

/// An ordered, mutable sequence of lines.
///
/// Each line keeps its own terminator, so files mixing `\n` and `\r\n`
/// serialise back unchanged. Inserted lines use the convention of the
/// file's first terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<Line>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl TextBuffer {
    /// Builds a buffer from in-memory text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let line_ending = LineEnding::detect(text);
        if text.is_empty() {
            return Self {
                lines: Vec::new(),
                line_ending,
                trailing_newline: false,
            };
        }

        let (body, trailing_newline) = text
            .strip_suffix('\n')
            .map_or((text, false), |body| (body, true));
        let count = body.split('\n').count();
        let lines = body
            .split('\n')
            .enumerate()
            .map(|(index, segment)| {
                // An unterminated final line keeps any trailing `\r` as text.
                if !trailing_newline && index + 1 == count {
                    Line::with_ending(segment, line_ending)
                } else {
                    Line::terminated(segment)
                }
            })
            .collect();

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    /// Reads a file into a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::ReadError`] when the file cannot be read and
    /// [`TfError::InvalidEncoding`] when it is not UTF-8.
    pub fn load(path: &Path) -> Result<Self, TfError> {
        let bytes = fs::read(path).map_err(|source| TfError::read(path, source))?;
        let text = String::from_utf8(bytes).map_err(|_| TfError::InvalidEncoding {
            path: path.to_path_buf(),
        })?;
        Ok(Self::from_text(&text))
    }

    /// Number of lines in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when the buffer holds no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Convention of the first terminator, used for inserted lines.
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Returns the line at `index`, if any.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.text.as_str())
    }

    /// Iterates over all lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    /// Overwrites the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::LineOutOfRange`] when `index` is past the end.
    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> Result<(), TfError> {
        let len = self.lines.len();
        let slot = self
            .lines
            .get_mut(index)
            .ok_or_else(|| TfError::line_out_of_range(index, len))?;
        slot.text = text.into();
        Ok(())
    }

    /// Inserts a line so that it occupies `index`, shifting later lines down.
    ///
    /// `index == len()` appends.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::LineOutOfRange`] when `index` is greater than the
    /// line count.
    pub fn insert_before(&mut self, index: usize, text: impl Into<String>) -> Result<(), TfError> {
        if index > self.lines.len() {
            return Err(TfError::line_out_of_range(index, self.lines.len()));
        }
        self.lines
            .insert(index, Line::with_ending(text, self.line_ending));
        Ok(())
    }

    /// Removes the line at `index`, shifting later lines up, and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::LineOutOfRange`] when `index` is past the end.
    pub fn delete(&mut self, index: usize) -> Result<String, TfError> {
        if index >= self.lines.len() {
            return Err(TfError::line_out_of_range(index, self.lines.len()));
        }
        Ok(self.lines.remove(index).text)
    }

    /// Serialises the buffer using its original conventions.
    #[must_use]
    pub fn to_text(&self) -> String {
        let last = self.lines.len().saturating_sub(1);
        let mut text = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            text.push_str(&line.text);
            if index < last || self.trailing_newline {
                text.push_str(line.ending.as_str());
            }
        }
        text
    }

    /// Writes the buffer to `path`.
    ///
    /// Content goes to a temporary file in the target directory which is then
    /// renamed over the target, so readers never observe a half-written file.
    /// Permissions of an existing target are carried over.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::WriteError`] when any step of the write fails.
    pub fn write(&self, path: &Path) -> Result<(), TfError> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp_file =
            tempfile::NamedTempFile::new_in(parent).map_err(|err| TfError::write(path, err))?;
        temp_file
            .write_all(self.to_text().as_bytes())
            .map_err(|err| TfError::write(path, err))?;

        if let Ok(metadata) = fs::metadata(path) {
            temp_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|err| TfError::write(path, err))?;
        }

        temp_file
            .persist(path)
            .map_err(|err| TfError::write(path, err.error))?;
        Ok(())
    }
}

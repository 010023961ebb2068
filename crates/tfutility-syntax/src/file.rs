//! A Terraform file: its text buffer plus the scanned block index.
//!
//! The file owns its buffer exclusively. Blocks are line ranges into that
//! buffer, so every structural edit must go through
//! [`StructuredFile::edit_block`], which keeps the ranges of the edited block
//! and of every later block in step with the live buffer.

use std::path::{Path, PathBuf};

use crate::block::{Block, BlockId};
use crate::buffer::TextBuffer;
use crate::diagnostic::ScanDiagnostic;
use crate::error::TfError;
use crate::scanner::{BraceTracker, ScanOutcome, scan};

/// A scanned Terraform file.
#[derive(Debug, Clone)]
pub struct StructuredFile {
    path: PathBuf,
    buffer: TextBuffer,
    blocks: Vec<Block>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl StructuredFile {
    /// Reads and scans the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read as UTF-8 text.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, TfError> {
        let path = path.into();
        let buffer = TextBuffer::load(&path)?;
        Ok(Self::from_buffer(path, buffer))
    }

    /// Scans in-memory text, associating it with `path` for write-back.
    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::from_buffer(path.into(), TextBuffer::from_text(text))
    }

    fn from_buffer(path: PathBuf, buffer: TextBuffer) -> Self {
        let ScanOutcome {
            blocks,
            diagnostics,
        } = scan(&buffer);
        Self {
            path,
            buffer,
            blocks,
            diagnostics,
        }
    }

    /// Path the file was loaded from and will be written back to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live text buffer.
    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// All blocks in file order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Non-fatal problems found while scanning.
    #[must_use]
    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    /// Returns the block with `id`, if any.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Blocks carrying a directive named `name`, in file order.
    pub fn blocks_with_decorator<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Block> {
        self.blocks
            .iter()
            .filter(move |block| block.has_directive(name))
    }

    /// Runs `edit` against the live line range of block `id`.
    ///
    /// Once `edit` returns, successfully or not, the net number of inserted
    /// and deleted lines is applied to the block's end and to the range of
    /// every later block.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::UnknownBlock`] (converted into `E`) when `id` does
    /// not name a block, or whatever error `edit` returns.
    pub fn edit_block<T, E, F>(&mut self, id: BlockId, edit: F) -> Result<T, E>
    where
        E: From<TfError>,
        F: FnOnce(&mut BlockEdit<'_>) -> Result<T, E>,
    {
        let block = self.block(id).ok_or(TfError::UnknownBlock { id })?;
        let (start, end) = (block.start(), block.end());

        let mut editor = BlockEdit::new(&mut self.buffer, start, end);
        let result = edit(&mut editor);
        let delta = editor.delta;

        self.apply_delta(id, delta);
        result
    }

    fn apply_delta(&mut self, id: BlockId, delta: isize) {
        if delta == 0 {
            return;
        }
        for block in &mut self.blocks {
            if block.id() == id {
                block.resize(delta);
            } else if block.id() > id {
                block.shift(delta);
            }
        }
    }

    /// Serialises the current buffer.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.buffer.to_text()
    }

    /// Persists the buffer to the file's path.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::WriteError`] when the write fails.
    pub fn write_back(&self) -> Result<(), TfError> {
        self.buffer.write(&self.path)
    }
}

/// Mutable access to one block's lines.
///
/// Every operation is confined to the block's current range, which grows and
/// shrinks as lines are inserted and deleted. The declaration line can be
/// rewritten but never deleted.
#[derive(Debug)]
pub struct BlockEdit<'a> {
    buffer: &'a mut TextBuffer,
    start: usize,
    end: usize,
    delta: isize,
}

impl<'a> BlockEdit<'a> {
    const fn new(buffer: &'a mut TextBuffer, start: usize, end: usize) -> Self {
        Self {
            buffer,
            start,
            end,
            delta: 0,
        }
    }

    /// Zero-based index of the declaration line.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Zero-based index of the closing line, reflecting edits so far.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns a line of the block, or `None` outside its range.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        if index < self.start || index > self.end {
            return None;
        }
        self.buffer.line(index)
    }

    /// Iterates the block's lines with their buffer indices.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.buffer
            .lines()
            .enumerate()
            .skip(self.start)
            .take(self.end.saturating_sub(self.start).saturating_add(1))
    }

    /// Iterates the block's direct member lines with their buffer indices.
    ///
    /// Lines nested inside maps, sub-blocks, heredocs or block comments are
    /// skipped, as is the declaration line.
    pub fn member_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let mut tracker = BraceTracker::default();
        self.lines().filter(move |&(_, line)| {
            let member = tracker.depth() == 1 && !tracker.in_multiline_construct();
            tracker.feed(line);
            member
        })
    }

    /// Overwrites a line of the block.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::LineOutsideBlock`] for indices outside the block.
    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> Result<(), TfError> {
        self.ensure_within(index)?;
        self.buffer.replace(index, text)
    }

    /// Inserts a line directly after `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::LineOutsideBlock`] for indices outside the block.
    pub fn insert_after(&mut self, index: usize, text: impl Into<String>) -> Result<(), TfError> {
        self.ensure_within(index)?;
        self.buffer.insert_before(index.saturating_add(1), text)?;
        self.end = self.end.saturating_add(1);
        self.delta = self.delta.saturating_add(1);
        Ok(())
    }

    /// Deletes a line of the block and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TfError::LineOutsideBlock`] for indices outside the block and
    /// [`TfError::DeclarationLine`] for the block's first line.
    pub fn delete(&mut self, index: usize) -> Result<String, TfError> {
        self.ensure_within(index)?;
        if index == self.start {
            return Err(TfError::DeclarationLine { index });
        }
        let removed = self.buffer.delete(index)?;
        self.end = self.end.saturating_sub(1);
        self.delta = self.delta.saturating_sub(1);
        Ok(removed)
    }

    const fn ensure_within(&self, index: usize) -> Result<(), TfError> {
        if index < self.start || index > self.end {
            return Err(TfError::LineOutsideBlock {
                index,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

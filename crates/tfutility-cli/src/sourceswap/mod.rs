//! The `sourceswap` command.
//!
//! Module blocks annotated with
//! `# @sourceswap(remote_source="...", remote_version="...", local_source="...")`
//! are switched between their local and remote source. Switching to remote
//! installs a `version` pin; switching to local removes it.
//!
//! Files are processed strictly in order and each file is written once after
//! all of its blocks have been swapped. The first invalid block stops the run:
//! files already written stay written, and the offending file is left
//! untouched.

mod direction;
mod error;
mod fields;
mod params;

use camino::{Utf8Path, Utf8PathBuf};
use tfutility_syntax::{Block, BlockId, StructuredFile, TfError, display_line};
use tracing::{debug, info, warn};

pub use direction::SwitchDirection;
pub use error::SwapError;
pub use fields::FieldChange;
use fields::ModuleFields;
pub use params::{DECORATOR, SourceSwapParams};

/// Per-file outcome of a swap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    path: Utf8PathBuf,
    blocks: usize,
}

impl FileReport {
    /// The processed file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Number of decorated blocks swapped in the file.
    #[must_use]
    pub const fn blocks(&self) -> usize {
        self.blocks
    }
}

/// Outcome of a complete swap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapReport {
    files: Vec<FileReport>,
}

impl SwapReport {
    /// Reports for every processed file, in processing order.
    #[must_use]
    pub fn files(&self) -> &[FileReport] {
        &self.files
    }

    /// Total number of blocks swapped across all files.
    #[must_use]
    pub fn blocks_swapped(&self) -> usize {
        self.files.iter().map(FileReport::blocks).sum()
    }
}

/// Rewrites `@sourceswap` module blocks towards one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSwap {
    direction: SwitchDirection,
}

impl SourceSwap {
    /// Creates a swap towards `direction`.
    #[must_use]
    pub const fn new(direction: SwitchDirection) -> Self {
        Self { direction }
    }

    /// The direction blocks are swapped towards.
    #[must_use]
    pub const fn direction(&self) -> SwitchDirection {
        self.direction
    }

    /// Swaps every file in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`SwapError`] encountered.
    pub fn run(&self, files: &[Utf8PathBuf]) -> Result<SwapReport, SwapError> {
        let mut report = SwapReport::default();
        for path in files {
            report.files.push(self.swap_file(path)?);
        }
        info!(
            files = report.files.len(),
            blocks = report.blocks_swapped(),
            direction = %self.direction,
            "source swap finished"
        );
        Ok(report)
    }

    /// Loads, swaps and writes back one file.
    ///
    /// Files without decorated blocks are not rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or written, or when a
    /// decorated block is invalid. Nothing is written in the latter case.
    pub fn swap_file(&self, path: &Utf8Path) -> Result<FileReport, SwapError> {
        let mut file = StructuredFile::load(path.as_std_path())?;
        for diagnostic in file.diagnostics() {
            warn!(path = %path, "{diagnostic}");
        }

        let blocks = self.swap_blocks(path, &mut file)?;
        if blocks > 0 {
            file.write_back()?;
        }
        info!(path = %path, blocks, "processed file");
        Ok(FileReport {
            path: path.to_owned(),
            blocks,
        })
    }

    /// Swaps every decorated block of an in-memory file, in file order.
    ///
    /// Returns the number of blocks swapped. `path` is used for error
    /// reporting only.
    ///
    /// # Errors
    ///
    /// Returns the first invalid block's [`SwapError`]. Blocks earlier in the
    /// file have already been rewritten in the buffer by then.
    pub fn swap_blocks(
        &self,
        path: &Utf8Path,
        file: &mut StructuredFile,
    ) -> Result<usize, SwapError> {
        let ids: Vec<BlockId> = file.blocks_with_decorator(DECORATOR).map(Block::id).collect();
        for &id in &ids {
            self.swap_block(path, file, id)?;
        }
        Ok(ids.len())
    }

    fn swap_block(
        &self,
        path: &Utf8Path,
        file: &mut StructuredFile,
        id: BlockId,
    ) -> Result<FieldChange, SwapError> {
        let block = file.block(id).ok_or(TfError::UnknownBlock { id })?;
        let params = SourceSwapParams::from_block(path, block)?;
        let line = block.start();
        if !block.is_module() {
            return Err(SwapError::WrongBlockType {
                path: path.to_owned(),
                line,
                type_id: block.type_id().to_owned(),
            });
        }

        let direction = self.direction;
        let change = file.edit_block(id, |edit| {
            fields::expand_inline_block(edit)?;
            let fields = ModuleFields::scan(edit).ok_or_else(|| SwapError::MissingSource {
                path: path.to_owned(),
                line,
            })?;
            Ok::<_, SwapError>(fields.apply(edit, direction, &params)?)
        })?;

        debug!(
            path = %path,
            line = display_line(line),
            direction = %direction,
            change = ?change,
            "swapped module source"
        );
        Ok(change)
    }
}

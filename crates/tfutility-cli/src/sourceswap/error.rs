//! Failures raised while swapping module sources.

use camino::Utf8PathBuf;
use tfutility_syntax::{TfError, display_line};
use thiserror::Error;

/// Errors that stop a source swap run.
///
/// Line numbers are zero-based buffer indices; messages render them
/// one-based.
#[derive(Debug, Error)]
pub enum SwapError {
    /// The decorator lacks one or more required parameters.
    #[error(
        "decorator @sourceswap at {path}:{line_display} is missing required parameters: {missing}",
        line_display = display_line(*.line),
        missing = .missing.join(", ")
    )]
    MissingParameters {
        /// File containing the block.
        path: Utf8PathBuf,
        /// Declaration line of the block.
        line: usize,
        /// Missing parameter names, in declaration order.
        missing: Vec<&'static str>,
    },

    /// The decorator is attached to something other than a module.
    #[error(
        "the decorator @sourceswap is applied to the wrong block type {type_id} at {path}:{line_display}",
        line_display = display_line(*.line)
    )]
    WrongBlockType {
        /// File containing the block.
        path: Utf8PathBuf,
        /// Declaration line of the block.
        line: usize,
        /// Type identifier of the offending block.
        type_id: String,
    },

    /// A decorated module has no `source` assignment.
    #[error(
        "module block at {path}:{line_display} has no source assignment",
        line_display = display_line(*.line)
    )]
    MissingSource {
        /// File containing the block.
        path: Utf8PathBuf,
        /// Declaration line of the block.
        line: usize,
    },

    /// Reading, editing, or writing the file failed.
    #[error(transparent)]
    File(#[from] TfError),
}

impl SwapError {
    /// Emits the failure as `error` events.
    ///
    /// Missing parameters are logged one event per parameter so each gap in a
    /// decorator is visible on its own line.
    pub fn log(&self) {
        match self {
            Self::MissingParameters {
                path,
                line,
                missing,
            } => {
                let line = display_line(*line);
                for parameter in missing {
                    tracing::error!(
                        path = %path,
                        line,
                        parameter,
                        "decorator @sourceswap at {path}:{line} requires the parameter {parameter}"
                    );
                }
            }
            Self::WrongBlockType { path, line, .. } | Self::MissingSource { path, line } => {
                tracing::error!(path = %path, line = display_line(*line), "{self}");
            }
            Self::File(source) => tracing::error!("{source}"),
        }
    }
}

//! Line-oriented Terraform file model for the tfutility toolchain.
//!
//! This crate does not parse HCL. It treats a `.tf` file as a sequence of
//! lines and layers a light structure on top:
//!
//! - **Text buffers** via [`TextBuffer`], which round-trip a file's line
//!   endings and trailing newline byte for byte
//! - **Blocks** via [`Block`], the line ranges of top-level declarations such
//!   as `module "network" { ... }`
//! - **Directives** via [`Directive`], comment annotations of the form
//!   `# @name(key="value")` attached to the block directly below them
//! - **Structured files** via [`StructuredFile`], which owns the buffer and
//!   keeps every block's range correct across edits made through
//!   [`StructuredFile::edit_block`]
//!
//! # Directive syntax
//!
//! ```text
//! # @sourceswap(local_source="../modules/network", remote_version="1.2.0")
//! // @pin
//! module "network" {
//!   source = "../modules/network"
//! }
//! ```
//!
//! Annotations may be separated from their block by plain comments, but a
//! blank line or any other content orphans them. Orphaned, malformed and
//! duplicated annotations are reported through [`StructuredFile::diagnostics`]
//! rather than failing the scan.

mod block;
mod buffer;
mod diagnostic;
mod directive;
mod error;
mod file;
mod position;
mod scanner;

pub use block::{Block, BlockId};
pub use buffer::{LineEnding, TextBuffer};
pub use diagnostic::{DiagnosticKind, ScanDiagnostic};
pub use directive::Directive;
pub use error::TfError;
pub use file::{BlockEdit, StructuredFile};
pub use position::display_line;

#[cfg(test)]
mod tests;

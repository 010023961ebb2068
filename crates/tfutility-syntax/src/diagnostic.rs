//! Non-fatal problems discovered while scanning a file for blocks.

use std::fmt;

use crate::position::display_line;

/// The category of a scan problem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// An annotation that no block followed.
    OrphanDirective {
        /// Name of the orphaned directive.
        name: String,
    },
    /// An annotation whose parameter list could not be parsed.
    MalformedDirective {
        /// Name of the malformed directive.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A second annotation with a name already attached to the same block.
    DuplicateDirective {
        /// Name of the repeated directive.
        name: String,
        /// Block the directive was attached to.
        type_id: String,
    },
    /// A block whose closing brace was never found.
    UnterminatedBlock {
        /// Type identifier of the open block.
        type_id: String,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanDirective { name } => {
                write!(f, "decorator @{name} is not followed by a block")
            }
            Self::MalformedDirective { name, reason } => {
                write!(f, "decorator @{name} is malformed: {reason}")
            }
            Self::DuplicateDirective { name, type_id } => {
                write!(f, "decorator @{name} repeated on {type_id}; the last one wins")
            }
            Self::UnterminatedBlock { type_id } => {
                write!(f, "block {type_id} is never closed")
            }
        }
    }
}

/// A scan problem anchored to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    line: usize,
    kind: DiagnosticKind,
}

impl ScanDiagnostic {
    /// Creates a diagnostic for a zero-based line.
    #[must_use]
    pub const fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }

    /// Zero-based line the problem was found on.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", display_line(self.line), self.kind)
    }
}

//! Top-level declaration blocks and their attached directives.

use std::fmt;

use crate::directive::Directive;

/// Identifies a block by its position in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(usize);

impl BlockId {
    /// Creates an identifier from a file-order position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the block in file order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A contiguous line range holding one top-level declaration.
///
/// Blocks are views into the owning file's buffer: they record line indices,
/// never the lines themselves. `type_id` is fixed at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    kind: String,
    labels: Vec<String>,
    type_id: String,
    start: usize,
    end: usize,
    directives: Vec<Directive>,
}

impl Block {
    pub(crate) fn new(
        id: BlockId,
        kind: String,
        labels: Vec<String>,
        span: (usize, usize),
        directives: Vec<Directive>,
    ) -> Self {
        let type_id = type_id_of(&kind, &labels);
        let (start, end) = span;
        Self {
            id,
            kind,
            labels,
            type_id,
            start,
            end,
            directives,
        }
    }

    /// Identifier of this block within its file.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Block keyword, for example `module` or `resource`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Labels following the keyword, without quotes.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Keyword and labels joined with `.`, for example `module.network`.
    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Returns true for `module` declarations.
    #[must_use]
    pub fn is_module(&self) -> bool {
        self.kind == "module"
    }

    /// Zero-based index of the declaration line.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Zero-based index of the closing line.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns true when `index` falls within the block.
    #[must_use]
    pub const fn contains_line(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Directives attached to this block, in annotation order.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Returns the directive with `name`, if attached.
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives
            .iter()
            .find(|directive| directive.name() == name)
    }

    /// Returns true when a directive with `name` is attached.
    #[must_use]
    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }

    pub(crate) const fn resize(&mut self, delta: isize) {
        self.end = self.end.saturating_add_signed(delta);
    }

    pub(crate) const fn shift(&mut self, delta: isize) {
        self.start = self.start.saturating_add_signed(delta);
        self.end = self.end.saturating_add_signed(delta);
    }
}

/// Joins a block keyword and its labels into a type identifier.
pub(crate) fn type_id_of(kind: &str, labels: &[String]) -> String {
    std::iter::once(kind)
        .chain(labels.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(".")
}

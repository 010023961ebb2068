//! Shared position conversion helpers.
//!
//! Buffer indices are zero-based. For user-facing messages, we prefer
//! one-based line numbers.

/// Converts a zero-based line index to a one-based display line.
#[must_use]
pub const fn display_line(index: usize) -> usize {
    index.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_LINE: usize = display_line(0);

    #[test]
    fn display_lines_are_one_based() {
        assert_eq!(FIRST_LINE, 1);
        assert_eq!(display_line(41), 42);
        assert_eq!(display_line(usize::MAX), usize::MAX);
    }
}

//! Line scanner that locates top-level blocks and their annotations.
//!
//! The scanner does not parse HCL. It recognises block-opening lines at
//! nesting depth zero, follows brace depth until the block closes, and
//! collects annotation lines directly above each opening line. Braces inside
//! string literals, comments and heredoc bodies are ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{Block, BlockId, type_id_of};
use crate::buffer::TextBuffer;
use crate::diagnostic::{DiagnosticKind, ScanDiagnostic};
use crate::directive::{Directive, parse_annotation};

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_-]*)((?:\s+(?:"[^"]*"|[A-Za-z_][A-Za-z0-9_-]*))*)\s*\{"#)
        .expect("block opener pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]*)"|([A-Za-z_][A-Za-z0-9_-]*)"#).expect("block label pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static HEREDOC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<<-?([A-Za-z_][A-Za-z0-9_]*)").expect("heredoc pattern"));

/// Blocks and diagnostics produced by a scan.
#[derive(Debug, Default)]
pub(crate) struct ScanOutcome {
    pub(crate) blocks: Vec<Block>,
    pub(crate) diagnostics: Vec<ScanDiagnostic>,
}

/// Scans a buffer for top-level blocks.
pub(crate) fn scan(buffer: &TextBuffer) -> ScanOutcome {
    let mut scanner = Scanner::default();
    for (index, line) in buffer.lines().enumerate() {
        scanner.visit(index, line);
    }
    scanner.finish()
}

/// Follows brace nesting across lines.
#[derive(Debug, Default)]
pub(crate) struct BraceTracker {
    depth: usize,
    in_block_comment: bool,
    heredoc: Option<String>,
}

impl BraceTracker {
    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) const fn in_multiline_construct(&self) -> bool {
        self.in_block_comment || self.heredoc.is_some()
    }

    pub(crate) fn feed(&mut self, line: &str) {
        if let Some(marker) = &self.heredoc {
            if line.trim() == marker {
                self.heredoc = None;
            }
            return;
        }

        let mut in_string = false;
        let mut chars = line.char_indices().peekable();
        while let Some((offset, ch)) = chars.next() {
            if self.in_block_comment {
                if ch == '*' && chars.peek().is_some_and(|&(_, next)| next == '/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }
            if in_string {
                match ch {
                    '\\' => {
                        chars.next();
                    }
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }

            let next = chars.peek().map(|&(_, next)| next);
            match (ch, next) {
                ('"', _) => in_string = true,
                ('#', _) | ('/', Some('/')) => break,
                ('/', Some('*')) => {
                    chars.next();
                    self.in_block_comment = true;
                }
                ('<', Some('<')) => {
                    let marker = line
                        .get(offset..)
                        .and_then(|rest| HEREDOC.captures(rest))
                        .and_then(|captures| captures.get(1));
                    if let Some(marker) = marker {
                        self.heredoc = Some(marker.as_str().to_owned());
                        break;
                    }
                    chars.next();
                }
                ('{', _) => self.depth += 1,
                ('}', _) => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
        }
    }
}

struct OpenBlock {
    kind: String,
    labels: Vec<String>,
    start: usize,
    directives: Vec<Directive>,
}

#[derive(Default)]
struct Scanner {
    tracker: BraceTracker,
    pending: Vec<Directive>,
    open: Option<OpenBlock>,
    blocks: Vec<Block>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl Scanner {
    fn visit(&mut self, index: usize, line: &str) {
        if self.open.is_some() {
            self.tracker.feed(line);
            self.close_if_balanced(index);
            return;
        }
        if self.tracker.in_multiline_construct() {
            self.tracker.feed(line);
            return;
        }

        if let Some(parsed) = parse_annotation(line, index) {
            match parsed {
                Ok(directive) => self.pending.push(directive),
                Err(error) => self.diagnostics.push(ScanDiagnostic::new(
                    index,
                    DiagnosticKind::MalformedDirective {
                        name: error.name,
                        reason: error.reason,
                    },
                )),
            }
            return;
        }

        if is_comment(line) {
            self.tracker.feed(line);
            return;
        }

        if let Some((kind, labels)) = parse_opener(line) {
            let directives = self.attach_pending(&type_id_of(&kind, &labels));
            self.open = Some(OpenBlock {
                kind,
                labels,
                start: index,
                directives,
            });
            self.tracker.feed(line);
            self.close_if_balanced(index);
            return;
        }

        self.orphan_pending();
        self.tracker.feed(line);
    }

    fn close_if_balanced(&mut self, index: usize) {
        if self.tracker.depth() > 0 {
            return;
        }
        if let Some(open) = self.open.take() {
            let id = BlockId::new(self.blocks.len());
            self.blocks.push(Block::new(
                id,
                open.kind,
                open.labels,
                (open.start, index),
                open.directives,
            ));
        }
    }

    fn attach_pending(&mut self, type_id: &str) -> Vec<Directive> {
        let mut attached: Vec<Directive> = Vec::new();
        for directive in std::mem::take(&mut self.pending) {
            if let Some(existing) = attached
                .iter_mut()
                .find(|existing| existing.name() == directive.name())
            {
                self.diagnostics.push(ScanDiagnostic::new(
                    directive.line(),
                    DiagnosticKind::DuplicateDirective {
                        name: directive.name().to_owned(),
                        type_id: type_id.to_owned(),
                    },
                ));
                *existing = directive;
            } else {
                attached.push(directive);
            }
        }
        attached
    }

    fn orphan_pending(&mut self) {
        for directive in std::mem::take(&mut self.pending) {
            self.diagnostics.push(ScanDiagnostic::new(
                directive.line(),
                DiagnosticKind::OrphanDirective {
                    name: directive.name().to_owned(),
                },
            ));
        }
    }

    fn finish(mut self) -> ScanOutcome {
        if let Some(open) = self.open.take() {
            self.diagnostics.push(ScanDiagnostic::new(
                open.start,
                DiagnosticKind::UnterminatedBlock {
                    type_id: type_id_of(&open.kind, &open.labels),
                },
            ));
        }
        self.orphan_pending();
        self.diagnostics.sort_by_key(ScanDiagnostic::line);
        ScanOutcome {
            blocks: self.blocks,
            diagnostics: self.diagnostics,
        }
    }
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with("//") || trimmed.starts_with("/*")
}

fn parse_opener(line: &str) -> Option<(String, Vec<String>)> {
    let captures = OPENER.captures(line)?;
    let kind = captures.get(1)?.as_str().to_owned();
    let labels = captures
        .get(2)
        .map(|labels| {
            LABEL
                .captures_iter(labels.as_str())
                .filter_map(|label| label.get(1).or_else(|| label.get(2)))
                .map(|label| label.as_str().to_owned())
                .collect()
        })
        .unwrap_or_default();
    Some((kind, labels))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn scan_text(text: &str) -> ScanOutcome {
        scan(&TextBuffer::from_text(text))
    }

    fn spans(outcome: &ScanOutcome) -> Vec<(String, usize, usize)> {
        outcome
            .blocks
            .iter()
            .map(|block| (block.type_id().to_owned(), block.start(), block.end()))
            .collect()
    }

    #[test]
    fn finds_top_level_blocks_with_spans() {
        let outcome = scan_text(concat!(
            "terraform {\n",
            "  required_version = \">= 1.5\"\n",
            "}\n",
            "\n",
            "module \"network\" {\n",
            "  source = \"./modules/network\"\n",
            "  tags = {\n",
            "    team = \"core\"\n",
            "  }\n",
            "}\n",
            "locals { region = \"eu-west-1\" }\n",
        ));
        assert_eq!(
            spans(&outcome),
            vec![
                ("terraform".to_owned(), 0, 2),
                ("module.network".to_owned(), 4, 9),
                ("locals".to_owned(), 10, 10),
            ]
        );
        assert!(outcome.diagnostics.is_empty());
    }

    #[rstest]
    #[case::brace_in_string("  name = \"}{\"\n")]
    #[case::brace_in_hash_comment("  # }\n")]
    #[case::brace_in_slash_comment("  // }\n")]
    #[case::brace_in_block_comment("  /* }\n  } */\n")]
    #[case::brace_in_heredoc("  policy = <<-EOT\n  }\n  EOT\n")]
    #[case::escaped_quote_in_string("  name = \"a\\\"}\"\n")]
    fn ignores_braces_outside_code(#[case] body: &str) {
        let text = format!("resource \"x\" \"y\" {{\n{body}}}\nlocals {{}}\n");
        let outcome = scan_text(&text);
        assert_eq!(outcome.blocks.len(), 2, "blocks: {:?}", spans(&outcome));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn attaches_annotations_through_plain_comments() {
        let outcome = scan_text(concat!(
            "# @sourceswap(local_source=\"../a\")\n",
            "# explains the module\n",
            "# @pin\n",
            "module \"a\" {\n",
            "}\n",
        ));
        let block = outcome.blocks.first().expect("one block");
        let names: Vec<_> = block.directives().iter().map(Directive::name).collect();
        assert_eq!(names, vec!["sourceswap", "pin"]);
    }

    #[test]
    fn blank_line_orphans_pending_annotations() {
        let outcome = scan_text(concat!(
            "# @sourceswap(local_source=\"../a\")\n",
            "\n",
            "module \"a\" {\n",
            "}\n",
            "# @pin\n",
        ));
        assert!(
            outcome
                .blocks
                .first()
                .is_some_and(|block| block.directives().is_empty())
        );
        let lines: Vec<_> = outcome.diagnostics.iter().map(ScanDiagnostic::line).collect();
        assert_eq!(lines, vec![0, 4]);
        assert!(outcome.diagnostics.iter().all(|diagnostic| matches!(
            diagnostic.kind(),
            DiagnosticKind::OrphanDirective { .. }
        )));
    }

    #[test]
    fn duplicate_annotation_keeps_the_last_one() {
        let outcome = scan_text(concat!(
            "# @note(v=\"1\")\n",
            "# @note(v=\"2\")\n",
            "module \"a\" {\n",
            "}\n",
        ));
        let block = outcome.blocks.first().expect("one block");
        assert_eq!(block.directives().len(), 1);
        assert_eq!(
            block.directive("note").and_then(|d| d.parameter("v")),
            Some("2")
        );
        assert!(matches!(
            outcome.diagnostics.first().map(ScanDiagnostic::kind),
            Some(DiagnosticKind::DuplicateDirective { .. })
        ));
    }

    #[test]
    fn unterminated_block_is_reported_not_recorded() {
        let outcome = scan_text("module \"a\" {\n  source = \"./a\"\n");
        assert!(outcome.blocks.is_empty());
        assert!(matches!(
            outcome.diagnostics.first().map(ScanDiagnostic::kind),
            Some(DiagnosticKind::UnterminatedBlock { type_id }) if type_id == "module.a"
        ));
    }

    #[test]
    fn nested_annotations_are_not_attached() {
        let outcome = scan_text(concat!(
            "resource \"a\" \"b\" {\n",
            "  # @sourceswap(local_source=\"../a\")\n",
            "  lifecycle {\n",
            "  }\n",
            "}\n",
        ));
        assert_eq!(spans(&outcome), vec![("resource.a.b".to_owned(), 0, 4)]);
        assert!(outcome.blocks.iter().all(|block| block.directives().is_empty()));
    }
}

//! Line-level rewrites of a module block's `source` and `version` fields.
//!
//! Fields are found with a textual `key = value` match over the block's
//! current lines. Rewrites replace only the quoted value, so the key, the
//! spacing around `=` and any trailing comment survive untouched.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tfutility_syntax::{BlockEdit, TfError};

use super::direction::SwitchDirection;
use super::params::SourceSwapParams;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([A-Za-z_][A-Za-z0-9_-]*)\s*=(?:[^=]|$)").expect("assignment pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static QUOTED_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\s*[A-Za-z_][A-Za-z0-9_-]*\s*=\s*)"(?:[^"\\]|\\.)*""#)
        .expect("quoted value pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static RIGHT_HAND_SIDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*[A-Za-z_][A-Za-z0-9_-]*\s*=\s*).*$").expect("right-hand side pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static INLINE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([^{#]*\{)\s*(.*?)\s*\}(\s*(?:#.*|//.*)?)$")
        .expect("inline block pattern")
});

const SOURCE: &str = "source";
const VERSION: &str = "version";

/// What a swap did to the block's line structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    /// Fields were rewritten in place; the line count is unchanged.
    Rewritten,
    /// A `version` line was added after `source`.
    VersionInserted,
    /// The `version` line was removed.
    VersionRemoved,
}

/// Positions of the `source` and `version` assignments inside one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleFields {
    source: usize,
    indent: String,
    version: Option<usize>,
}

impl ModuleFields {
    /// Scans the block's direct member lines. The first assignment of each
    /// key wins; assignments inside nested maps or blocks are ignored.
    ///
    /// Returns `None` when the block has no `source` assignment.
    pub(crate) fn scan(edit: &BlockEdit<'_>) -> Option<Self> {
        let mut source: Option<(usize, String)> = None;
        let mut version = None;

        for (index, line) in edit.member_lines() {
            let Some(captures) = ASSIGNMENT.captures(line) else {
                continue;
            };
            let indent = captures.get(1).map_or("", |m| m.as_str());
            match captures.get(2).map(|m| m.as_str()) {
                Some(SOURCE) if source.is_none() => source = Some((index, indent.to_owned())),
                Some(VERSION) if version.is_none() => version = Some(index),
                _ => {}
            }
        }

        source.map(|(source, indent)| Self {
            source,
            indent,
            version,
        })
    }

    /// Installs the parameter set selected by `direction`.
    ///
    /// At most one structural edit is made, and it is the last operation, so
    /// the recorded indices stay valid throughout.
    pub(crate) fn apply(
        &self,
        edit: &mut BlockEdit<'_>,
        direction: SwitchDirection,
        params: &SourceSwapParams,
    ) -> Result<FieldChange, TfError> {
        match direction {
            SwitchDirection::Remote => {
                rewrite_field(edit, self.source, params.remote_source())?;
                if let Some(version) = self.version {
                    rewrite_field(edit, version, params.remote_version())?;
                    return Ok(FieldChange::Rewritten);
                }
                let pin = format!(
                    "{}{VERSION} = {}",
                    self.indent,
                    quote(params.remote_version())
                );
                edit.insert_after(self.source, pin)?;
                Ok(FieldChange::VersionInserted)
            }
            SwitchDirection::Local => {
                rewrite_field(edit, self.source, params.local_source())?;
                if let Some(version) = self.version {
                    edit.delete(version)?;
                    return Ok(FieldChange::VersionRemoved);
                }
                Ok(FieldChange::Rewritten)
            }
        }
    }
}

/// Splits a one-line block such as `module "m" { source = "./m" }` over
/// three lines so its fields can be edited line by line.
///
/// Returns whether the block was expanded.
pub(crate) fn expand_inline_block(edit: &mut BlockEdit<'_>) -> Result<bool, TfError> {
    let start = edit.start();
    if edit.end() != start {
        return Ok(false);
    }
    let Some([opener, body, close]) = edit.line(start).and_then(split_inline) else {
        return Ok(false);
    };
    edit.replace(start, opener)?;
    edit.insert_after(start, body)?;
    edit.insert_after(start.saturating_add(1), close)?;
    Ok(true)
}

fn split_inline(line: &str) -> Option<[String; 3]> {
    let captures = INLINE_BLOCK.captures(line)?;
    let part = |group: usize| captures.get(group).map_or("", |m| m.as_str());
    let (indent, opener, body, tail) = (part(1), part(2), part(3), part(4));
    if !ASSIGNMENT.is_match(body) {
        return None;
    }
    Some([
        format!("{indent}{}", opener.trim_end()),
        format!("{indent}  {body}"),
        format!("{indent}}}{tail}"),
    ])
}

fn rewrite_field(edit: &mut BlockEdit<'_>, index: usize, value: &str) -> Result<(), TfError> {
    let Some(line) = edit.line(index) else {
        return Err(TfError::LineOutsideBlock {
            index,
            start: edit.start(),
            end: edit.end(),
        });
    };
    let rewritten = match rewrite_value(line, value) {
        Cow::Borrowed(_) => return Ok(()),
        Cow::Owned(rewritten) => rewritten,
    };
    edit.replace(index, rewritten)
}

/// Replaces the value assigned on `line` with the quoted `value`.
///
/// Only the first string literal after `=` is replaced. A line whose
/// right-hand side is not a literal (a variable reference, say) has the whole
/// right-hand side replaced.
pub(crate) fn rewrite_value<'a>(line: &'a str, value: &str) -> Cow<'a, str> {
    let replacement = |captures: &Captures<'_>| {
        let prefix = captures.get(1).map_or("", |m| m.as_str());
        format!("{prefix}{}", quote(value))
    };
    if QUOTED_VALUE.is_match(line) {
        let rewritten = QUOTED_VALUE.replacen(line, 1, replacement);
        return unchanged_if_equal(line, rewritten);
    }
    let rewritten = RIGHT_HAND_SIDE.replacen(line, 1, replacement);
    unchanged_if_equal(line, rewritten)
}

fn unchanged_if_equal<'a>(line: &'a str, rewritten: Cow<'a, str>) -> Cow<'a, str> {
    if rewritten == line {
        Cow::Borrowed(line)
    } else {
        rewritten
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len().saturating_add(2));
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

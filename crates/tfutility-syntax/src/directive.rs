//! Decorator annotations attached to Terraform blocks.
//!
//! An annotation is a comment line whose content starts with `@`:
//!
//! ```text
//! # @sourceswap(remote_source="git::https://x/y.git", remote_version="1.2.0", local_source="../y")
//! module "y" {
//! ```
//!
//! Both `#` and `//` comment markers are accepted. The parameter list is
//! optional; values are double-quoted and may contain `\"` and `\\` escapes.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:#|//)\s*@([A-Za-z_][A-Za-z0-9_-]*)(.*)$").expect("annotation pattern")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static PARAMETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*"((?:[^"\\]|\\.)*)"\s*"#)
        .expect("parameter pattern")
});

/// A parsed decorator: a name plus its `key="value"` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    parameters: BTreeMap<String, String>,
    line: usize,
}

impl Directive {
    /// Creates a directive found on `line` (zero-based).
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: BTreeMap<String, String>, line: usize) -> Self {
        Self {
            name: name.into(),
            parameters,
            line,
        }
    }

    /// Decorator name, without the leading `@`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based line of the annotation in the file it was scanned from.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the value of a parameter, if present.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// All parameters, ordered by key.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}(", self.name)?;
        for (position, (key, value)) in self.parameters.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}=\"{}\"", escape(value))?;
        }
        f.write_str(")")
    }
}

/// Why an annotation line could not be turned into a [`Directive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnnotationError {
    pub(crate) name: String,
    pub(crate) reason: String,
}

/// Parses an annotation line found at `line`.
///
/// Returns `None` when the line is not an annotation at all.
pub(crate) fn parse_annotation(
    text: &str,
    line: usize,
) -> Option<Result<Directive, AnnotationError>> {
    let captures = ANNOTATION.captures(text)?;
    let name = captures.get(1)?.as_str();
    let rest = captures.get(2).map_or("", |m| m.as_str()).trim();

    let result = parse_parameter_list(rest)
        .map(|parameters| Directive::new(name, parameters, line))
        .map_err(|reason| AnnotationError {
            name: name.to_owned(),
            reason,
        });
    Some(result)
}

fn parse_parameter_list(rest: &str) -> Result<BTreeMap<String, String>, String> {
    let mut parameters = BTreeMap::new();
    if rest.is_empty() {
        return Ok(parameters);
    }

    let inner = rest
        .strip_prefix('(')
        .and_then(|open| open.strip_suffix(')'))
        .ok_or_else(|| format!("expected a parenthesised parameter list, found `{rest}`"))?;

    let mut remaining = inner.trim_start();
    while !remaining.is_empty() {
        let captures = PARAMETER
            .captures(remaining)
            .ok_or_else(|| format!("expected key=\"value\", found `{}`", remaining.trim()))?;
        let (Some(whole), Some(key), Some(value)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            return Err(format!("expected key=\"value\", found `{}`", remaining.trim()));
        };
        parameters.insert(key.as_str().to_owned(), unescape(value.as_str()));

        let after = remaining.get(whole.end()..).unwrap_or_default();
        remaining = match after.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if after.trim().is_empty() => "",
            None => return Err(format!("expected `,` before `{}`", after.trim())),
        };
    }

    Ok(parameters)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }
        out.push(ch);
    }
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

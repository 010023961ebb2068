//! Validation of `@sourceswap` decorator parameters.

use camino::Utf8Path;
use tfutility_syntax::Block;

use super::error::SwapError;

/// Name of the decorator selecting blocks for a source swap.
pub const DECORATOR: &str = "sourceswap";

const REMOTE_SOURCE: &str = "remote_source";
const REMOTE_VERSION: &str = "remote_version";
const LOCAL_SOURCE: &str = "local_source";

/// Parameters are required in both directions so the opposite swap always
/// succeeds later.
const REQUIRED: [&str; 3] = [REMOTE_SOURCE, REMOTE_VERSION, LOCAL_SOURCE];

/// Validated `@sourceswap` parameters for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSwapParams {
    remote_source: String,
    remote_version: String,
    local_source: String,
}

impl SourceSwapParams {
    /// Reads and validates the decorator attached to `block`.
    ///
    /// Empty values count as missing. Every missing parameter is reported at
    /// once, in the order `remote_source`, `remote_version`, `local_source`.
    ///
    /// # Errors
    ///
    /// Returns [`SwapError::MissingParameters`] when the decorator is absent
    /// or lacks a non-empty value for any required parameter.
    pub fn from_block(path: &Utf8Path, block: &Block) -> Result<Self, SwapError> {
        let directive = block.directive(DECORATOR);
        let value = |key: &str| {
            directive
                .and_then(|directive| directive.parameter(key))
                .filter(|value| !value.is_empty())
        };

        let missing: Vec<&'static str> = REQUIRED
            .into_iter()
            .filter(|&key| value(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SwapError::MissingParameters {
                path: path.to_owned(),
                line: block.start(),
                missing,
            });
        }

        let owned = |key: &str| value(key).map(str::to_owned).unwrap_or_default();
        Ok(Self {
            remote_source: owned(REMOTE_SOURCE),
            remote_version: owned(REMOTE_VERSION),
            local_source: owned(LOCAL_SOURCE),
        })
    }

    /// Source installed when switching to remote.
    #[must_use]
    pub fn remote_source(&self) -> &str {
        &self.remote_source
    }

    /// Version pin installed when switching to remote.
    #[must_use]
    pub fn remote_version(&self) -> &str {
        &self.remote_version
    }

    /// Source installed when switching to local.
    #[must_use]
    pub fn local_source(&self) -> &str {
        &self.local_source
    }
}

//! Direction selector for the `sourceswap` command.

use std::fmt;

use clap::ValueEnum;

/// Which parameter set a swap installs into decorated module blocks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SwitchDirection {
    /// Point modules at `local_source` and drop any version pin.
    #[value(alias = "l")]
    Local,
    /// Point modules at `remote_source` pinned to `remote_version`.
    #[value(alias = "r")]
    Remote,
}

impl fmt::Display for SwitchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

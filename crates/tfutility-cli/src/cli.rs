//! CLI argument definitions for the tfutility toolchain.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::sourceswap::SwitchDirection;

/// Command-line interface for the tfutility Terraform toolchain.
#[derive(Parser, Debug)]
#[command(
    name = "tfutility",
    version,
    about = "Annotation-driven rewrites for Terraform files",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// The operation to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Structured subcommands for the tfutility CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Allows to switch module sources between a local and a remote path.
    Sourceswap(SourceSwapArgs),
}

/// Arguments accepted by `tfutility sourceswap`.
#[derive(Args, Debug, Clone)]
pub(crate) struct SourceSwapArgs {
    /// Defines to which reference all decorated modules should be swapped.
    #[arg(short = 's', long = "switch-to", value_enum)]
    pub(crate) switch_to: Option<SwitchDirection>,
    /// Files or directories to process; directories are searched for `.tf` files.
    #[arg(value_name = "PATH", default_value = ".")]
    pub(crate) paths: Vec<Utf8PathBuf>,
}

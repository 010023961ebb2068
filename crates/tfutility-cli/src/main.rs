//! CLI entrypoint for the tfutility Terraform toolchain.
//!
//! The binary delegates to [`tfutility_cli::run`], which loads configuration,
//! initialises logging, parses the subcommand and rewrites the selected files.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    tfutility_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

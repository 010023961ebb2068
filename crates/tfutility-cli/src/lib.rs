//! Command-line interface runtime for the tfutility toolchain.
//!
//! The module owns argument parsing, configuration bootstrapping, logging
//! initialisation, and dispatch to the subcommands. The runtime is exercised
//! both from the binary entrypoint and from tests where configuration loading
//! and IO streams can be substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

mod cli;
mod config;
mod errors;
pub mod paths;
pub mod sourceswap;
mod telemetry;

use cli::{Cli, CliCommand, SourceSwapArgs};
use config::{prepare_cli_arguments, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
use sourceswap::SourceSwap;

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    stdout: &'a mut W,
    stderr: &'a mut E,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(stdout: &'a mut W, stderr: &'a mut E, loader: &'a L) -> Self {
        Self {
            stdout,
            stderr,
            loader,
        }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let cli = match Cli::try_parse_from(cli_arguments) {
            Ok(cli) => cli,
            // Help and version requests surface as clap errors bound for stdout.
            Err(error) if !error.use_stderr() => {
                write!(self.stdout, "{error}").ok();
                return ExitCode::SUCCESS;
            }
            Err(error) => return self.fail(&AppError::CliUsage(error)),
        };

        let result = self
            .loader
            .load(&split.config_arguments)
            .and_then(|config| telemetry::initialise(&config).map_err(AppError::from))
            .and_then(|()| dispatch(&cli.command));

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => self.fail(&error),
        }
    }

    fn fail(&mut self, error: &AppError) -> ExitCode {
        // Swap failures are reported through `SwapError::log` before they
        // reach the runner.
        if !matches!(error, AppError::Swap(_)) {
            writeln!(self.stderr, "{error}").ok();
        }
        ExitCode::FAILURE
    }
}

fn dispatch(command: &CliCommand) -> Result<(), AppError> {
    match command {
        CliCommand::Sourceswap(args) => run_sourceswap(args),
    }
}

fn run_sourceswap(args: &SourceSwapArgs) -> Result<(), AppError> {
    let direction = args.switch_to.ok_or(AppError::MissingDirection)?;
    let files = paths::collect_tf_files(&args.paths)?;
    debug!(files = files.len(), direction = %direction, "starting source swap");

    SourceSwap::new(direction)
        .run(&files)
        .map(drop)
        .map_err(|error| {
            error.log();
            AppError::Swap(error)
        })
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(stdout, stderr, loader).run(args)
}

#[cfg(test)]
mod tests;

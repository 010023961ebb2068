//! Error types for the CLI runtime.

use std::sync::Arc;

use thiserror::Error;

use crate::paths::PathError;
use crate::sourceswap::SwapError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("Please use --switch-to argument with the keywords local or remote")]
    MissingDirection,
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to collect input files: {0}")]
    CollectPaths(#[from] PathError),
    #[error("sourceswap failed: {0}")]
    Swap(#[from] SwapError),
}

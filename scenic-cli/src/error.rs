//! Errors emitted by the scenic CLI.

use std::sync::Arc;

use scenic_data::routing::ProviderBuildError;
use scenic_selector::SelectionError;
use thiserror::Error;

/// Errors emitted by the scenic CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate option is not a `lon,lat` pair on the globe.
    #[error("{field} must be LON,LAT in degrees, got {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
    /// The service dialect is neither `osrm` nor `mapbox`.
    #[error("{field} must be osrm or mapbox, got {value:?}")]
    InvalidDialect { field: &'static str, value: String },
    /// The HTTP routing provider could not be constructed.
    #[error("failed to build routing provider for {base_url}: {source}")]
    BuildRouteProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Candidate collection or selection failed.
    #[error(transparent)]
    Select(#[from] SelectionError),
    /// Serialising the selection report failed.
    #[error("failed to serialise selection: {0}")]
    SerialiseSelection(#[source] serde_json::Error),
    /// Writing the selection report failed.
    #[error("failed to write selection output: {0}")]
    WriteSelectionOutput(#[source] std::io::Error),
}

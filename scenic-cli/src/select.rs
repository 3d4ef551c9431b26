//! Select command implementation for the scenic CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use geo::Coord;
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use scenic_core::{RoutePreferences, RouteProfile, RouteProvider, UNKNOWN_ROAD_NAME, Waypoint};
use scenic_data::routing::{HttpRouteProvider, HttpRouteProviderConfig, ServiceDialect};
use scenic_selector::{CandidateOrchestrator, SelectableRoute, Selection};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    ARG_ACCESS_TOKEN, ARG_AVOID_MOTORWAYS, ARG_BASE_URL, ARG_CANONICAL_PROFILE, ARG_DESTINATION,
    ARG_DIALECT, ARG_ORIGIN, ARG_PROFILES, ARG_SERVICE_PATH, ARG_TIMEOUT_SECS, CliError, ENV_DESTINATION,
    ENV_ORIGIN,
};

/// CLI arguments for the `select` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Request candidate routes between two points under several \
                 routing profiles, score each for scenic desirability and \
                 print the winner as JSON. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Select the most scenic route between two points"
)]
#[ortho_config(prefix = "SCENIC")]
pub(crate) struct SelectArgs {
    /// Start of the journey as `LON,LAT`.
    #[arg(long = ARG_ORIGIN, value_name = "lon,lat", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// End of the journey as `LON,LAT`.
    #[arg(long = ARG_DESTINATION, value_name = "lon,lat", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Base URL for the routing service (e.g. "http://localhost:5000").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Route service path below the base URL (e.g. "route/v1").
    #[arg(long = ARG_SERVICE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) service_path: Option<String>,
    /// Access token for services that require one.
    #[arg(long = ARG_ACCESS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    /// Query dialect of the service: `osrm` or `mapbox`.
    #[arg(long = ARG_DIALECT, value_name = "osrm|mapbox")]
    #[serde(default)]
    pub(crate) dialect: Option<String>,
    /// Profile whose results the winner is addressed against.
    #[arg(long = ARG_CANONICAL_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) canonical_profile: Option<String>,
    /// Comma-separated additional profiles to request.
    #[arg(long = ARG_PROFILES, value_name = "name,...")]
    #[serde(default)]
    pub(crate) profiles: Option<String>,
    /// Ask the service to avoid motorways.
    #[arg(long = ARG_AVOID_MOTORWAYS, value_name = "bool")]
    #[serde(default)]
    pub(crate) avoid_motorways: Option<bool>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl SelectArgs {
    pub(crate) fn into_config(self) -> Result<SelectConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SelectConfig::try_from(merged)
    }
}

/// Resolved `select` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct SelectConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) canonical_profile: RouteProfile,
    pub(crate) profiles: Vec<RouteProfile>,
    pub(crate) preferences: RoutePreferences,
    pub(crate) provider: HttpRouteProviderConfig,
}

impl TryFrom<SelectArgs> for SelectConfig {
    type Error = CliError;

    fn try_from(args: SelectArgs) -> Result<Self, Self::Error> {
        let origin = args.origin.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN,
            env: ENV_ORIGIN,
        })?;
        let destination = args.destination.ok_or(CliError::MissingArgument {
            field: ARG_DESTINATION,
            env: ENV_DESTINATION,
        })?;

        let canonical_profile = args
            .canonical_profile
            .map_or_else(RouteProfile::automobile, RouteProfile::new);
        let profiles = args.profiles.as_deref().map_or_else(
            || vec![RouteProfile::traffic_avoiding()],
            parse_profiles,
        );

        let mut preferences = RoutePreferences::default();
        if let Some(avoid) = args.avoid_motorways {
            preferences = preferences.with_avoid_motorways(avoid);
        }

        let mut provider = HttpRouteProviderConfig::default();
        if let Some(base_url) = args.base_url {
            provider.base_url = base_url;
        }
        if let Some(service_path) = args.service_path {
            provider = provider.with_service_path(service_path);
        }
        if let Some(token) = args.access_token {
            provider = provider.with_access_token(token);
        }
        if let Some(dialect) = args.dialect {
            provider = provider.with_dialect(parse_dialect(&dialect)?);
        }
        if let Some(secs) = args.timeout_secs {
            provider = provider.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            origin: parse_coordinate(ARG_ORIGIN, &origin)?,
            destination: parse_coordinate(ARG_DESTINATION, &destination)?,
            canonical_profile,
            profiles,
            preferences,
            provider,
        })
    }
}

pub(crate) fn parse_dialect(raw: &str) -> Result<ServiceDialect, CliError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "osrm" => Ok(ServiceDialect::Osrm),
        "mapbox" => Ok(ServiceDialect::Mapbox),
        _ => Err(CliError::InvalidDialect {
            field: ARG_DIALECT,
            value: raw.to_owned(),
        }),
    }
}

/// Parse `LON,LAT` in degrees.
pub(crate) fn parse_coordinate(field: &'static str, value: &str) -> Result<Coord<f64>, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        field,
        value: value.to_owned(),
    };
    let (lon, lat) = value.split_once(',').ok_or_else(invalid)?;
    let x: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let y: f64 = lat.trim().parse().map_err(|_| invalid())?;
    if !(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y) {
        return Err(invalid());
    }
    Ok(Coord { x, y })
}

fn parse_profiles(raw: &str) -> Vec<RouteProfile> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(RouteProfile::new)
        .collect()
}

/// Builds a route provider for the current select invocation.
pub(super) trait SelectProviderBuilder {
    fn build(&self, config: &SelectConfig) -> Result<Box<dyn RouteProvider>, CliError>;
}

pub(super) struct DefaultSelectProviderBuilder;

impl SelectProviderBuilder for DefaultSelectProviderBuilder {
    fn build(&self, config: &SelectConfig) -> Result<Box<dyn RouteProvider>, CliError> {
        let provider = HttpRouteProvider::with_config(config.provider.clone()).map_err(|source| {
            CliError::BuildRouteProvider {
                base_url: config.provider.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(provider))
    }
}

pub(super) fn run_select(args: SelectArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSelectProviderBuilder;
    run_select_with(args, &builder, &mut stdout)
}

pub(super) fn run_select_with(
    args: SelectArgs,
    builder: &dyn SelectProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let provider = builder.build(&config)?;
    let selection = execute_select(&config, provider)?;
    write_selection(writer, &SelectionReport::from(&selection))
}

fn execute_select(
    config: &SelectConfig,
    provider: Box<dyn RouteProvider>,
) -> Result<Selection, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let orchestrator = config
        .profiles
        .iter()
        .cloned()
        .fold(
            CandidateOrchestrator::new(provider, config.canonical_profile.clone()),
            |orchestrator, profile| orchestrator.with_profile(profile),
        )
        .with_preferences(config.preferences.clone());
    let origin = Waypoint::new(config.origin);
    let destination = Waypoint::new(config.destination);

    let selection = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(cancel_on_interrupt(cancel.clone()));
        let outcome = orchestrator
            .select_route(origin, destination, &cancel)
            .await;
        watcher.abort();
        outcome
    })?;
    Ok(selection)
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("interrupted; cancelling outstanding route requests");
        cancel.cancel();
    }
}

/// JSON view of a [`Selection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SelectionReport {
    pub(crate) profile: String,
    pub(crate) index: usize,
    pub(crate) target: TargetReport,
    pub(crate) score: f64,
    pub(crate) components: Vec<ComponentReport>,
    pub(crate) distance_m: f64,
    pub(crate) travel_time_secs: f64,
    pub(crate) roads: Vec<String>,
}

/// How the presentation layer should address the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum TargetReport {
    Canonical,
    Alternative { index: usize },
    ByValue,
}

/// One named factor value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ComponentReport {
    pub(crate) name: String,
    pub(crate) value: f64,
}

impl From<SelectableRoute> for TargetReport {
    fn from(target: SelectableRoute) -> Self {
        match target {
            SelectableRoute::Canonical => Self::Canonical,
            SelectableRoute::Alternative(index) => Self::Alternative { index },
            SelectableRoute::ByValue => Self::ByValue,
        }
    }
}

impl From<&Selection> for SelectionReport {
    fn from(selection: &Selection) -> Self {
        let route = &selection.winner.route;
        Self {
            profile: route.provenance.profile.to_string(),
            index: route.provenance.index,
            target: selection.target.into(),
            score: selection.winner.score.value(),
            components: selection
                .winner
                .score
                .components()
                .iter()
                .map(|component| ComponentReport {
                    name: component.name.to_owned(),
                    value: component.value,
                })
                .collect(),
            distance_m: route.distance_m,
            travel_time_secs: route.expected_travel_time.as_secs_f64(),
            roads: route
                .steps()
                .map(|step| step.first_road_name().unwrap_or(UNKNOWN_ROAD_NAME).to_owned())
                .collect(),
        }
    }
}

fn write_selection(writer: &mut dyn Write, report: &SelectionReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseSelection)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSelectionOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WriteSelectionOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SelectConfig, CliError> {
    let merged = SelectArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SelectConfig::try_from(merged)
}

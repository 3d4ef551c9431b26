//! HTTP route providers for OSRM-compatible routing services.
//!
//! This module provides [`HttpRouteProvider`], an implementation of
//! [`scenic_core::RouteProvider`] that fetches candidate routes from the
//! Route service of an OSRM server, or from Mapbox Directions when pointed at
//! its service path with an access token.
//!
//! # Architecture
//!
//! Each request covers one profile and maps onto one `GET` against the Route
//! service. The preferences in the request select alternatives, step
//! metadata, geometry resolution and motorway exclusion. Responses are
//! converted into [`scenic_core::CandidateRoute`]s tagged with the requested
//! profile and their position in the response.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use scenic_data::routing::{HttpRouteProvider, HttpRouteProviderConfig, ServiceDialect};
//!
//! let config = HttpRouteProviderConfig::new("https://api.mapbox.com")
//!     .with_service_path("directions/v5/mapbox")
//!     .with_dialect(ServiceDialect::Mapbox)
//!     .with_access_token("pk.example")
//!     .with_timeout(Duration::from_secs(10));
//! let provider = HttpRouteProvider::with_config(config)?;
//! # Ok::<(), scenic_data::routing::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_SERVICE_PATH, DEFAULT_USER_AGENT, HttpRouteProvider, HttpRouteProviderConfig,
    ProviderBuildError, ServiceDialect,
};

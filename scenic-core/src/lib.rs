//! Core domain types for the scenic route engine.
//!
//! The crate models the candidate routes a routing provider hands back, the
//! road attributes projected out of them for scoring, and the two seams the
//! rest of the workspace plugs into:
//!
//! - [`RouteProvider`], the asynchronous boundary to an external routing
//!   service that computes candidates under a [`RouteProfile`].
//! - [`ScoringFactor`], a single named sub-score over a candidate route.
//!
//! Nothing here performs I/O or scoring on its own; see `scenic-scorer` and
//! `scenic-selector` for the engine and the orchestration built on top.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attributes;
pub mod factor;
pub mod profile;
pub mod provider;
pub mod route;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use attributes::{RoadAttributes, UNKNOWN_ROAD_NAME, UnscoreableRoute};
pub use factor::ScoringFactor;
pub use profile::RouteProfile;
pub use provider::{
    ProviderError, RoutePreferences, RouteProvider, RouteRequest, ShapeResolution, StepAttribute,
};
pub use route::{
    CandidateRoute, Provenance, RoadClasses, RouteGeometry, RouteLeg, RouteStep, TransportMode,
    Waypoint,
};

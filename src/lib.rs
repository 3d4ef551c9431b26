//! Facade crate for the scenic route engine.
//!
//! This crate re-exports the domain model, the scoring engine and the
//! candidate orchestrator, and exposes the HTTP routing provider behind the
//! `http` feature flag.

#![forbid(unsafe_code)]

pub use scenic_core::{
    CandidateRoute, Provenance, ProviderError, RoadAttributes, RoadClasses, RouteGeometry,
    RouteLeg, RoutePreferences, RouteProfile, RouteProvider, RouteRequest, RouteStep,
    ScoringFactor, ShapeResolution, StepAttribute, TransportMode, UnscoreableRoute, Waypoint,
};
pub use scenic_scorer::{
    Contribution, FactorScore, MainRoadKeywords, RouteScore, ScenicWeights, ScoredCandidate,
    ScoredPool, ScoringEngine,
};
pub use scenic_selector::{
    CandidateOrchestrator, CandidatePool, ProfileFailure, SelectableRoute, Selection,
    SelectionError, resolve_selectable_index, select_best, select_route,
};

#[cfg(feature = "http")]
pub use scenic_data::routing::{
    HttpRouteProvider, HttpRouteProviderConfig, ProviderBuildError, ServiceDialect,
};

#[cfg(feature = "test-support")]
pub use scenic_core::test_support;

//! Scenic desirability scoring for candidate routes.
//!
//! [`ScoringEngine::scenic`] reproduces the shipped composite:
//!
//! ```text
//! (road_change × 0.4 + turn × 0.2 + road_variety × 0.2)
//!     × (1 − same_road) × (1 − main_road)
//! ```
//!
//! Every term is a [`ScoringFactor`](scenic_core::ScoringFactor) registered
//! with the engine, so callers can swap weights, remove terms or opt in to
//! the geometry and overlap factors in [`inactive`] without touching the
//! aggregation. Scoring is pure and never consults other pool members.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use scenic_core::{CandidateRoute, Provenance, RouteLeg, RouteProfile, RouteStep};
//! use scenic_scorer::{Contribution, ScoringEngine, inactive::CurvinessFactor};
//!
//! let engine = ScoringEngine::scenic()
//!     .with_factor(CurvinessFactor::default(), Contribution::Weighted(0.1));
//! let route = CandidateRoute::new(
//!     vec![RouteLeg::new(vec![RouteStep::new(vec!["Coast Road".into()], 800.0)])],
//!     800.0,
//!     Duration::from_secs(60),
//!     Provenance::new(RouteProfile::automobile(), 0),
//! );
//!
//! let pool = engine.score_pool(vec![route]);
//! assert_eq!(pool.len(), 1);
//! ```

#![forbid(unsafe_code)]

mod engine;
pub mod factors;
pub mod inactive;
mod weights;

pub use engine::{
    Contribution, FactorScore, RouteScore, ScoredCandidate, ScoredPool, ScoringEngine, aggregate,
};
pub use weights::{MainRoadKeywords, ScenicWeights};

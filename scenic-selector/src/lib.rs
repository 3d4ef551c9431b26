//! Candidate orchestration and route selection.
//!
//! [`CandidateOrchestrator`] asks a [`RouteProvider`](scenic_core::RouteProvider)
//! for routes under several profiles at once, tolerates individual profile
//! failures, and pools whatever came back. The pool is scored by a
//! [`ScoringEngine`](scenic_scorer::ScoringEngine) and [`select_best`] picks
//! the highest composite, breaking ties by pool order. Finally the winner is
//! addressed as a [`SelectableRoute`] relative to the canonical profile's
//! results.

#![forbid(unsafe_code)]

mod error;
mod orchestrator;
mod selector;

pub use error::{ProfileFailure, SelectionError};
pub use orchestrator::{CandidateOrchestrator, CandidatePool};
pub use selector::{
    SelectableRoute, Selection, resolve_selectable_index, select_best, select_route,
    try_resolve_selectable_index,
};

//! Failures raised while collecting and selecting candidate routes.

use std::fmt;

use scenic_core::{ProviderError, RouteProfile};
use thiserror::Error;

/// A profile whose route request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFailure {
    /// Profile that was requested.
    pub profile: RouteProfile,
    /// Why the request failed.
    pub error: ProviderError,
}

impl fmt::Display for ProfileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.profile, self.error)
    }
}

/// Errors surfaced by candidate collection and route selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Every profile failed, returned nothing, or returned only routes
    /// without steps.
    #[error(
        "no candidate routes available: {failed_count} of {attempted} profile request(s) failed, \
         {unscoreable} route(s) unscoreable",
        failed_count = .failed.len()
    )]
    NoCandidatesAvailable {
        /// Number of profiles requested.
        attempted: usize,
        /// Profiles whose request failed.
        failed: Vec<ProfileFailure>,
        /// Routes dropped because they had no steps.
        unscoreable: usize,
    },

    /// A candidate had no steps and was left out of the pool.
    #[error("route {index} from profile {profile} has no steps")]
    UnscoreableRoute {
        /// Profile that produced the route.
        profile: RouteProfile,
        /// Position within that profile's results.
        index: usize,
    },

    /// The winning candidate has no position in the canonical profile's
    /// results.
    #[error("route {index} from profile {profile} has no alternative index")]
    AlternativeIndexUnresolvable {
        /// Profile that produced the route.
        profile: RouteProfile,
        /// Position within that profile's results.
        index: usize,
    },

    /// The cancellation signal fired before every request resolved.
    #[error("route selection was cancelled")]
    Cancelled,
}

impl SelectionError {
    /// A pool-level failure with nothing requested and nothing failed.
    pub(crate) const fn empty_pool(unscoreable: usize) -> Self {
        Self::NoCandidatesAvailable {
            attempted: 0,
            failed: Vec::new(),
            unscoreable,
        }
    }
}

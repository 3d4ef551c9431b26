//! Request candidates under several profiles and pool whatever succeeds.

use futures_util::future::join_all;
use log::{debug, warn};
use scenic_core::{
    CandidateRoute, Provenance, RoutePreferences, RouteProfile, RouteProvider, RouteRequest,
    Waypoint,
};
use scenic_scorer::ScoringEngine;
use tokio_util::sync::CancellationToken;

use crate::selector::{Selection, select_route};
use crate::{ProfileFailure, SelectionError};

/// Candidates collected for one selection request.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool {
    canonical_profile: RouteProfile,
    candidates: Vec<CandidateRoute>,
    failed: Vec<ProfileFailure>,
}

impl CandidatePool {
    /// Profile whose results anchor alternative indices.
    #[must_use]
    pub const fn canonical_profile(&self) -> &RouteProfile {
        &self.canonical_profile
    }

    /// Every candidate, grouped by profile in request order, each group in
    /// provider order.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateRoute] {
        &self.candidates
    }

    /// Profiles whose requests failed but were tolerated.
    #[must_use]
    pub fn failed(&self) -> &[ProfileFailure] {
        &self.failed
    }

    /// Candidates produced by the canonical profile, in provider order.
    #[must_use]
    pub fn canonical_routes(&self) -> Vec<CandidateRoute> {
        self.candidates
            .iter()
            .filter(|route| route.provenance.profile == self.canonical_profile)
            .cloned()
            .collect()
    }

    /// Consume the pool, returning its candidates.
    #[must_use]
    pub fn into_candidates(self) -> Vec<CandidateRoute> {
        self.candidates
    }
}

/// Issues concurrent route requests and selects the most scenic result.
///
/// The provider handle is owned by the orchestrator and supplied by its
/// caller; nothing is shared through process-wide state.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use scenic_core::{RouteProfile, Waypoint};
/// use scenic_core::{CandidateRoute, ProviderError, RouteProvider, RouteRequest};
/// use scenic_selector::{CandidateOrchestrator, SelectionError};
/// use tokio_util::sync::CancellationToken;
///
/// struct Offline;
///
/// #[async_trait::async_trait]
/// impl RouteProvider for Offline {
///     async fn request_routes(
///         &self,
///         request: &RouteRequest,
///     ) -> Result<Vec<CandidateRoute>, ProviderError> {
///         Err(ProviderError::Unavailable { profile: request.profile.to_string() })
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let orchestrator = CandidateOrchestrator::new(Offline, RouteProfile::automobile())
///     .with_profile(RouteProfile::traffic_avoiding());
/// let result = orchestrator
///     .select_route(
///         Waypoint::new(Coord { x: -3.19, y: 55.95 }),
///         Waypoint::new(Coord { x: -2.97, y: 56.46 }),
///         &CancellationToken::new(),
///     )
///     .await;
/// assert!(matches!(result, Err(SelectionError::NoCandidatesAvailable { attempted: 2, .. })));
/// # });
/// ```
#[derive(Debug)]
pub struct CandidateOrchestrator<P> {
    provider: P,
    canonical_profile: RouteProfile,
    additional_profiles: Vec<RouteProfile>,
    preferences: RoutePreferences,
    engine: ScoringEngine,
}

impl<P> CandidateOrchestrator<P>
where
    P: RouteProvider,
{
    /// Request routes from `provider` under `canonical_profile` only, with
    /// the default preferences and the scenic scoring engine.
    pub fn new(provider: P, canonical_profile: RouteProfile) -> Self {
        Self {
            provider,
            canonical_profile,
            additional_profiles: Vec::new(),
            preferences: RoutePreferences::default(),
            engine: ScoringEngine::scenic(),
        }
    }

    /// Also request routes under `profile`. Duplicate profiles are ignored.
    #[must_use]
    pub fn with_profile(mut self, profile: RouteProfile) -> Self {
        if profile != self.canonical_profile && !self.additional_profiles.contains(&profile) {
            self.additional_profiles.push(profile);
        }
        self
    }

    /// Replace the preferences sent with every request.
    #[must_use]
    pub fn with_preferences(mut self, preferences: RoutePreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Replace the scoring engine.
    #[must_use]
    pub fn with_engine(mut self, engine: ScoringEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Profiles requested, canonical first.
    pub fn profiles(&self) -> impl Iterator<Item = &RouteProfile> {
        std::iter::once(&self.canonical_profile).chain(self.additional_profiles.iter())
    }

    /// The provider handle.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Request routes under every profile concurrently and pool the results.
    ///
    /// Each candidate is stamped with its profile and position in that
    /// profile's results. Failed profiles are logged and recorded in
    /// [`CandidatePool::failed`].
    ///
    /// # Errors
    /// Returns [`SelectionError::Cancelled`] if `cancel` fires before every
    /// request resolves, or [`SelectionError::NoCandidatesAvailable`] when no
    /// profile produced a candidate.
    pub async fn collect_candidates(
        &self,
        origin: Waypoint,
        destination: Waypoint,
        cancel: &CancellationToken,
    ) -> Result<CandidatePool, SelectionError> {
        let requests: Vec<RouteRequest> = self
            .profiles()
            .map(|profile| {
                RouteRequest::new(
                    origin.clone(),
                    destination.clone(),
                    profile.clone(),
                    self.preferences.clone(),
                )
            })
            .collect();
        let pending = join_all(
            requests
                .iter()
                .map(|request| self.provider.request_routes(request)),
        );

        let outcomes = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!("route selection cancelled before all profiles answered");
                return Err(SelectionError::Cancelled);
            }
            outcomes = pending => outcomes,
        };

        let mut candidates = Vec::new();
        let mut failed = Vec::new();
        for (request, outcome) in requests.into_iter().zip(outcomes) {
            match outcome {
                Ok(routes) => {
                    debug!(
                        "profile {} returned {} candidate(s)",
                        request.profile,
                        routes.len()
                    );
                    candidates.extend(routes.into_iter().enumerate().map(|(index, route)| {
                        route.with_provenance(Provenance::new(request.profile.clone(), index))
                    }));
                }
                Err(error) => {
                    warn!("profile {} failed: {error}", request.profile);
                    failed.push(ProfileFailure {
                        profile: request.profile,
                        error,
                    });
                }
            }
        }

        if candidates.is_empty() {
            return Err(SelectionError::NoCandidatesAvailable {
                attempted: self.additional_profiles.len() + 1,
                failed,
                unscoreable: 0,
            });
        }
        Ok(CandidatePool {
            canonical_profile: self.canonical_profile.clone(),
            candidates,
            failed,
        })
    }

    /// Collect, score and select in one call.
    ///
    /// # Errors
    /// Returns [`SelectionError::Cancelled`] when `cancel` fires during
    /// collection, or [`SelectionError::NoCandidatesAvailable`] when no
    /// scoreable candidate remains.
    pub async fn select_route(
        &self,
        origin: Waypoint,
        destination: Waypoint,
        cancel: &CancellationToken,
    ) -> Result<Selection, SelectionError> {
        let pool = self.collect_candidates(origin, destination, cancel).await?;
        let canonical = pool.canonical_routes();
        let failed = pool.failed.clone();
        let scored = self.engine.score_pool(pool.into_candidates());
        for provenance in scored.excluded() {
            let excluded = SelectionError::UnscoreableRoute {
                profile: provenance.profile.clone(),
                index: provenance.index,
            };
            debug!("{excluded}; left out of the pool");
        }
        if scored.is_empty() {
            return Err(SelectionError::NoCandidatesAvailable {
                attempted: self.additional_profiles.len() + 1,
                failed,
                unscoreable: scored.excluded().len(),
            });
        }
        select_route(&scored, &canonical)
    }
}

//! Test doubles and route builders shared by unit and behaviour tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;

use crate::{
    CandidateRoute, Provenance, ProviderError, RouteGeometry, RouteLeg, RouteProfile,
    RouteProvider, RouteRequest, RouteStep, TransportMode,
};

/// Average speed used to derive travel times for built routes, in m/s.
const BUILDER_SPEED_M_PER_S: f64 = 12.5;

/// Build a single-leg driving route whose steps carry `names`, splitting
/// `distance_m` evenly between them.
#[must_use]
pub fn route_from_names(names: &[&str], distance_m: f64) -> CandidateRoute {
    let per_step = if names.is_empty() {
        0.0
    } else {
        distance_m / names.len() as f64
    };
    names
        .iter()
        .fold(RouteBuilder::new(), |builder, name| builder.step(name, per_step))
        .distance(distance_m)
        .build()
}

/// Incrementally assemble a [`CandidateRoute`].
///
/// Distances are summed from the steps unless overridden with
/// [`RouteBuilder::distance`].
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    legs: Vec<RouteLeg>,
    distance_m: Option<f64>,
    geometry: Option<RouteGeometry>,
    provenance: Provenance,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteBuilder {
    /// Start an automobile route with one empty leg.
    #[must_use]
    pub fn new() -> Self {
        Self {
            legs: vec![RouteLeg::default()],
            distance_m: None,
            geometry: None,
            provenance: Provenance::new(RouteProfile::automobile(), 0),
        }
    }

    /// Append a named driving step to the current leg.
    #[must_use]
    pub fn step(self, name: &str, distance_m: f64) -> Self {
        self.push(RouteStep::new(vec![name.to_owned()], distance_m))
    }

    /// Append a step with no road names.
    #[must_use]
    pub fn unnamed_step(self, distance_m: f64) -> Self {
        self.push(RouteStep::new(Vec::new(), distance_m))
    }

    /// Append a named step travelled with `mode`.
    #[must_use]
    pub fn step_with_mode(self, name: &str, distance_m: f64, mode: TransportMode) -> Self {
        self.push(RouteStep::new(vec![name.to_owned()], distance_m).with_mode(mode))
    }

    /// Append an arbitrary step.
    #[must_use]
    pub fn push(mut self, step: RouteStep) -> Self {
        if let Some(leg) = self.legs.last_mut() {
            leg.steps.push(step);
        } else {
            self.legs.push(RouteLeg::new(vec![step]));
        }
        self
    }

    /// Start a new leg.
    #[must_use]
    pub fn next_leg(mut self) -> Self {
        self.legs.push(RouteLeg::default());
        self
    }

    /// Override the total distance.
    #[must_use]
    pub const fn distance(mut self, distance_m: f64) -> Self {
        self.distance_m = Some(distance_m);
        self
    }

    /// Attach geometry from `(longitude, latitude)` pairs.
    #[must_use]
    pub fn geometry(mut self, coords: &[(f64, f64)]) -> Self {
        self.geometry = Some(
            coords
                .iter()
                .map(|&(x, y)| Coord { x, y })
                .collect::<Vec<_>>()
                .into(),
        );
        self
    }

    /// Tag the route with a profile and result position.
    #[must_use]
    pub fn provenance(mut self, profile: RouteProfile, index: usize) -> Self {
        self.provenance = Provenance::new(profile, index);
        self
    }

    /// Finish the route.
    #[must_use]
    pub fn build(self) -> CandidateRoute {
        let distance_m = self.distance_m.unwrap_or_else(|| {
            self.legs
                .iter()
                .flat_map(|leg| leg.steps.iter())
                .map(|step| step.distance_m)
                .sum()
        });
        let travel_time = Duration::from_secs_f64((distance_m / BUILDER_SPEED_M_PER_S).max(0.0));
        let route = CandidateRoute::new(self.legs, distance_m, travel_time, self.provenance);
        match self.geometry {
            Some(geometry) => route.with_geometry(geometry),
            None => route,
        }
    }

    /// Finish the route with its legs removed, as a malformed provider might.
    #[must_use]
    pub fn build_without_legs(self) -> CandidateRoute {
        let mut route = self.build();
        route.legs.clear();
        route
    }
}

/// Stub [`RouteProvider`] returning pre-configured responses per profile.
///
/// Profiles without a configured response fail with
/// [`ProviderError::Unavailable`]. Every request is recorded so tests can
/// inspect what was asked for.
#[derive(Debug, Default)]
pub struct StubRouteProvider {
    responses: HashMap<RouteProfile, StubResponse>,
    requests: Mutex<Vec<RouteRequest>>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Routes(Vec<CandidateRoute>),
    Error(ProviderError),
    Pending,
}

impl StubRouteProvider {
    /// Create a provider with no configured profiles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `profile` with `routes`.
    #[must_use]
    pub fn with_routes(mut self, profile: RouteProfile, routes: Vec<CandidateRoute>) -> Self {
        self.responses.insert(profile, StubResponse::Routes(routes));
        self
    }

    /// Answer `profile` with `error`.
    #[must_use]
    pub fn with_error(mut self, profile: RouteProfile, error: ProviderError) -> Self {
        self.responses.insert(profile, StubResponse::Error(error));
        self
    }

    /// Never answer `profile`.
    #[must_use]
    pub fn with_pending(mut self, profile: RouteProfile) -> Self {
        self.responses.insert(profile, StubResponse::Pending);
        self
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
    async fn request_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<CandidateRoute>, ProviderError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }
        match self.responses.get(&request.profile).cloned() {
            Some(StubResponse::Routes(routes)) => Ok(routes),
            Some(StubResponse::Error(error)) => Err(error),
            Some(StubResponse::Pending) => std::future::pending().await,
            None => Err(ProviderError::Unavailable {
                profile: request.profile.to_string(),
            }),
        }
    }
}

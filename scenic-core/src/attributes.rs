//! Project a candidate route into the road attributes the scorer consumes.
//!
//! Extraction keeps exactly one road name per step so that step-count based
//! denominators line up with the name sequence. Steps without a usable name
//! contribute [`UNKNOWN_ROAD_NAME`] instead of being dropped.

use std::collections::HashSet;

use thiserror::Error;

use crate::CandidateRoute;

/// Name recorded for a step whose road name is missing or blank.
pub const UNKNOWN_ROAD_NAME: &str = "unknown";

/// A route with no steps cannot be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("route has no steps to score")]
pub struct UnscoreableRoute;

/// Ordered road names and counts for one candidate route.
///
/// Values can only be built through [`RoadAttributes::extract`], which
/// guarantees at least one step.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use scenic_core::{CandidateRoute, Provenance, RoadAttributes, RouteLeg, RouteProfile, RouteStep};
///
/// let steps = ["A", "A", "B", "C"]
///     .iter()
///     .map(|name| RouteStep::new(vec![(*name).to_owned()], 1_000.0))
///     .collect();
/// let route = CandidateRoute::new(
///     vec![RouteLeg::new(steps)],
///     4_000.0,
///     Duration::from_secs(300),
///     Provenance::new(RouteProfile::automobile(), 0),
/// );
/// let attributes = RoadAttributes::extract(&route)?;
/// assert_eq!(attributes.step_count(), 4);
/// assert_eq!(attributes.unique_road_name_count(), 3);
/// # Ok::<(), scenic_core::UnscoreableRoute>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadAttributes {
    road_names: Vec<String>,
    unique_road_name_count: usize,
}

impl RoadAttributes {
    /// Extract road attributes from `route`.
    ///
    /// # Errors
    ///
    /// Returns [`UnscoreableRoute`] when the route has no legs or none of its
    /// legs contain steps.
    pub fn extract(route: &CandidateRoute) -> Result<Self, UnscoreableRoute> {
        let road_names: Vec<String> = route
            .steps()
            .map(|step| step.first_road_name().unwrap_or(UNKNOWN_ROAD_NAME).to_owned())
            .collect();
        if road_names.is_empty() {
            return Err(UnscoreableRoute);
        }
        let unique_road_name_count = road_names
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len();
        Ok(Self {
            road_names,
            unique_road_name_count,
        })
    }

    /// First road name of every step, in travel order across legs.
    #[must_use]
    pub fn road_names(&self) -> &[String] {
        &self.road_names
    }

    /// Total number of steps; always at least one.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.road_names.len()
    }

    /// Number of distinct road names, counting the unknown marker once.
    #[must_use]
    pub const fn unique_road_name_count(&self) -> usize {
        self.unique_road_name_count
    }

    /// Distinct road names as a set.
    #[must_use]
    pub fn unique_road_names(&self) -> HashSet<&str> {
        self.road_names.iter().map(String::as_str).collect()
    }
}

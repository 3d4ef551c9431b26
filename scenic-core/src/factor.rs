//! Pluggable sub-scores over a candidate route.

use crate::{CandidateRoute, RoadAttributes};

/// Compute one named sub-score for a candidate route.
///
/// Factors are pure: the same route and attributes must always produce the
/// same value, independent of which other candidates are being scored.
/// Implementations must be `Send + Sync` so engines can be shared across
/// threads. How a sub-score feeds the composite is decided by the engine that
/// registers the factor, not by the factor itself.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use scenic_core::{
///     CandidateRoute, Provenance, RoadAttributes, RouteLeg, RouteProfile, RouteStep, ScoringFactor,
/// };
///
/// struct StepCount;
///
/// impl ScoringFactor for StepCount {
///     fn name(&self) -> &'static str {
///         "step_count"
///     }
///
///     fn score(&self, _route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
///         attributes.step_count() as f64
///     }
/// }
///
/// let leg = RouteLeg::new(vec![
///     RouteStep::new(vec!["A".into()], 500.0),
///     RouteStep::new(vec!["B".into()], 500.0),
/// ]);
/// let route = CandidateRoute::new(
///     vec![leg],
///     1_000.0,
///     Duration::from_secs(90),
///     Provenance::new(RouteProfile::automobile(), 0),
/// );
/// let attributes = RoadAttributes::extract(&route)?;
/// assert_eq!(StepCount.score(&route, &attributes), 2.0);
/// # Ok::<(), scenic_core::UnscoreableRoute>(())
/// ```
pub trait ScoringFactor: Send + Sync {
    /// Stable identifier used to register, deregister and report the factor.
    fn name(&self) -> &'static str;

    /// Return the sub-score for `route`.
    ///
    /// `attributes` were extracted from `route` and guarantee at least one
    /// step.
    fn score(&self, route: &CandidateRoute, attributes: &RoadAttributes) -> f64;
}

//! Factors computable from a candidate route but absent from the default
//! composite.
//!
//! None of these are registered by [`ScoringEngine::scenic`]. Callers opt in
//! with [`ScoringEngine::register`], choosing whether each one feeds the
//! composite as a weighted term or a penalty.
//!
//! [`ScoringEngine::scenic`]: crate::ScoringEngine::scenic
//! [`ScoringEngine::register`]: crate::ScoringEngine::register
#![forbid(unsafe_code)]

use std::collections::HashSet;

use geo::{Bearing, Distance, Haversine, Line};
use scenic_core::{CandidateRoute, RoadAttributes, RouteGeometry, ScoringFactor};

/// Name of the curviness factor.
pub const CURVINESS: &str = "curviness";
/// Name of the longest-straight factor.
pub const LONGEST_STRAIGHT: &str = "longest_straight";
/// Name of the drivability factor.
pub const DRIVABILITY: &str = "drivability";
/// Name of the road-overlap factor.
pub const ROAD_OVERLAP: &str = "road_overlap";

/// Variance of bearing change, in degrees squared, at which curviness
/// saturates.
pub const DEFAULT_CURVINESS_SATURATION_DEG2: f64 = 900.0;
/// Largest bearing change, in degrees, still treated as straight ahead.
pub const DEFAULT_STRAIGHT_TOLERANCE_DEG: f64 = 10.0;

/// Bearing and length of one non-degenerate geometry segment.
#[derive(Debug, Clone, Copy)]
struct Segment {
    bearing_deg: f64,
    length_m: f64,
}

fn segments(geometry: &RouteGeometry) -> Vec<Segment> {
    geometry
        .lines()
        .filter(|line| line.start != line.end)
        .map(|line: Line<f64>| Segment {
            bearing_deg: Haversine.bearing(line.start_point(), line.end_point()),
            length_m: Haversine.distance(line.start_point(), line.end_point()),
        })
        .collect()
}

/// Fold a bearing difference into `[-180, 180)`.
#[expect(
    clippy::float_arithmetic,
    reason = "angular wrapping is modular float arithmetic"
)]
fn wrap_degrees(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// Signed bearing change between consecutive segments of `geometry`.
///
/// Zero-length segments are skipped so repeated coordinates do not register
/// as turns.
#[expect(clippy::float_arithmetic, reason = "bearing deltas are float differences")]
#[must_use]
pub fn bearing_changes(geometry: &RouteGeometry) -> Vec<f64> {
    segments(geometry)
        .windows(2)
        .filter_map(|pair| match pair {
            [previous, current] => Some(wrap_degrees(current.bearing_deg - previous.bearing_deg)),
            _ => None,
        })
        .collect()
}

/// Population variance of the bearing changes along `geometry`.
///
/// Returns `0.0` when fewer than two segments remain.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "variance is computed in floating point"
)]
#[must_use]
pub fn bearing_variance(geometry: &RouteGeometry) -> f64 {
    let changes = bearing_changes(geometry);
    if changes.is_empty() {
        return 0.0;
    }
    let count = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / count;
    changes
        .iter()
        .map(|change| (change - mean).powi(2))
        .sum::<f64>()
        / count
}

/// Length, in metres, of the longest run of segments whose heading drifts by
/// at most `tolerance_deg` between neighbours.
#[expect(
    clippy::float_arithmetic,
    reason = "segment lengths are accumulated in floating point"
)]
#[must_use]
pub fn longest_straight_m(geometry: &RouteGeometry, tolerance_deg: f64) -> f64 {
    let mut longest = 0.0_f64;
    let mut run = 0.0_f64;
    let mut previous: Option<f64> = None;
    for segment in segments(geometry) {
        run = match previous {
            Some(bearing) if wrap_degrees(segment.bearing_deg - bearing).abs() <= tolerance_deg => {
                run + segment.length_m
            }
            _ => segment.length_m,
        };
        longest = longest.max(run);
        previous = Some(segment.bearing_deg);
    }
    longest
}

/// Share of step distance travelled in a mode that carries cars.
///
/// Step counts stand in for distance when every step has zero length.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "shares are ratios in floating point"
)]
#[must_use]
pub fn drivable_share(route: &CandidateRoute) -> f64 {
    let (total, drivable) = route.steps().fold((0.0_f64, 0.0_f64), |(total, drivable), step| {
        let length = step.distance_m.max(0.0);
        let drivable_length = if step.mode.carries_cars() { length } else { 0.0 };
        (total + length, drivable + drivable_length)
    });
    if total > 0.0 {
        return drivable / total;
    }
    let steps = route.step_count();
    if steps == 0 {
        return 0.0;
    }
    let driving_steps = route.steps().filter(|step| step.mode.carries_cars()).count();
    driving_steps as f64 / steps as f64
}

/// Whether every step of `route` can be driven.
#[must_use]
pub fn is_drivable(route: &CandidateRoute) -> bool {
    route.step_count() > 0 && route.steps().all(|step| step.mode.carries_cars())
}

/// Share of `candidate`'s distinct roads also used by `reference`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "overlap is a ratio of set sizes"
)]
#[must_use]
pub fn road_overlap_ratio(candidate: &RoadAttributes, reference: &HashSet<String>) -> f64 {
    let names = candidate.unique_road_names();
    let shared = names.iter().filter(|name| reference.contains(**name)).count();
    shared as f64 / names.len() as f64
}

/// Rewards winding geometry.
///
/// Scores the bearing-change variance against a saturation point, capped at
/// `1.0`. Routes without geometry score `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct CurvinessFactor {
    saturation_deg2: f64,
}

impl Default for CurvinessFactor {
    fn default() -> Self {
        Self::new(DEFAULT_CURVINESS_SATURATION_DEG2)
    }
}

impl CurvinessFactor {
    /// Saturate at a variance of `saturation_deg2`.
    #[must_use]
    pub const fn new(saturation_deg2: f64) -> Self {
        Self { saturation_deg2 }
    }
}

impl ScoringFactor for CurvinessFactor {
    fn name(&self) -> &'static str {
        CURVINESS
    }

    #[expect(clippy::float_arithmetic, reason = "saturating ratio")]
    fn score(&self, route: &CandidateRoute, _attributes: &RoadAttributes) -> f64 {
        match &route.geometry {
            Some(geometry) if self.saturation_deg2 > 0.0 => {
                (bearing_variance(geometry) / self.saturation_deg2).min(1.0)
            }
            _ => 0.0,
        }
    }
}

/// Penalises long straight stretches.
///
/// Scores the longest straight as a share of the route's distance; register
/// it as a penalty to prefer routes that keep turning.
#[derive(Debug, Clone, Copy)]
pub struct LongestStraightFactor {
    tolerance_deg: f64,
}

impl Default for LongestStraightFactor {
    fn default() -> Self {
        Self::new(DEFAULT_STRAIGHT_TOLERANCE_DEG)
    }
}

impl LongestStraightFactor {
    /// Treat heading drift up to `tolerance_deg` as straight.
    #[must_use]
    pub const fn new(tolerance_deg: f64) -> Self {
        Self { tolerance_deg }
    }
}

impl ScoringFactor for LongestStraightFactor {
    fn name(&self) -> &'static str {
        LONGEST_STRAIGHT
    }

    #[expect(clippy::float_arithmetic, reason = "share of route distance")]
    fn score(&self, route: &CandidateRoute, _attributes: &RoadAttributes) -> f64 {
        match &route.geometry {
            Some(geometry) if route.distance_m > 0.0 => {
                (longest_straight_m(geometry, self.tolerance_deg) / route.distance_m).min(1.0)
            }
            _ => 0.0,
        }
    }
}

/// Rewards routes that stay in car-carrying modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrivabilityFactor;

impl ScoringFactor for DrivabilityFactor {
    fn name(&self) -> &'static str {
        DRIVABILITY
    }

    fn score(&self, route: &CandidateRoute, _attributes: &RoadAttributes) -> f64 {
        drivable_share(route)
    }
}

/// Measures how many of a route's roads a reference route also uses.
///
/// Register as a penalty to favour candidates that diverge from the
/// reference, typically the canonical profile's primary route.
#[derive(Debug, Clone, Default)]
pub struct RoadOverlapFactor {
    reference: HashSet<String>,
}

impl RoadOverlapFactor {
    /// Compare candidates against the roads of `reference`.
    #[must_use]
    pub fn against(reference: &RoadAttributes) -> Self {
        Self {
            reference: reference
                .unique_road_names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl ScoringFactor for RoadOverlapFactor {
    fn name(&self) -> &'static str {
        ROAD_OVERLAP
    }

    fn score(&self, _route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
        road_overlap_ratio(attributes, &self.reference)
    }
}

//! Sub-scores wired into the default scenic composite.
//!
//! Each sub-score is exposed both as a pure function and as a
//! [`ScoringFactor`] so engines can register it under a stable name.
#![forbid(unsafe_code)]

use scenic_core::{CandidateRoute, RoadAttributes, ScoringFactor};

use crate::MainRoadKeywords;

/// Name of the road-change factor.
pub const ROAD_CHANGE: &str = "road_change";
/// Name of the same-road penalty.
pub const SAME_ROAD: &str = "same_road";
/// Name of the turn-density factor.
pub const TURN_DENSITY: &str = "turn_density";
/// Name of the road-variety factor.
pub const ROAD_VARIETY: &str = "road_variety";
/// Name of the main-road penalty.
pub const MAIN_ROAD: &str = "main_road";

/// Share of adjacent step pairs whose road names differ.
///
/// Pairs span leg boundaries. A single-step route scores `0.0`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "ratios of step counts are computed in floating point"
)]
#[must_use]
pub fn road_change_score(attributes: &RoadAttributes) -> f64 {
    let changes = attributes
        .road_names()
        .windows(2)
        .filter(|pair| matches!(pair, [previous, current] if previous != current))
        .count();
    changes as f64 / attributes.step_count() as f64
}

/// Longest run of consecutive steps on one road, as a share of all steps.
///
/// A single-step route is penalised fully with `1.0`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "ratios of step counts are computed in floating point"
)]
#[must_use]
pub fn same_road_penalty(attributes: &RoadAttributes) -> f64 {
    let mut names = attributes.road_names().iter();
    let Some(mut previous) = names.next() else {
        return 0.0;
    };
    let mut current_run = 1_usize;
    let mut longest_run = 1_usize;
    for name in names {
        if name == previous {
            current_run += 1;
        } else {
            current_run = 1;
            previous = name;
        }
        longest_run = longest_run.max(current_run);
    }
    longest_run as f64 / attributes.step_count() as f64
}

/// Turns per kilometre relative to `saturation_per_km`, capped at `1.0`.
///
/// Non-positive or non-finite distances give a density of zero, as does a
/// non-positive saturation point.
///
/// # Examples
/// ```
/// use scenic_scorer::factors::turn_score;
///
/// assert_eq!(turn_score(4, 4_000.0, 0.5), 1.0);
/// assert_eq!(turn_score(1, 4_000.0, 0.5), 0.5);
/// assert_eq!(turn_score(3, 0.0, 0.5), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "density is a ratio of steps to kilometres"
)]
#[must_use]
pub fn turn_score(step_count: usize, distance_m: f64, saturation_per_km: f64) -> f64 {
    if !(distance_m.is_finite() && distance_m > 0.0) || saturation_per_km <= 0.0 {
        return 0.0;
    }
    let density = step_count as f64 / (distance_m / 1_000.0);
    (density / saturation_per_km).min(1.0)
}

/// Distinct road names as a share of all steps.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "ratios of step counts are computed in floating point"
)]
#[must_use]
pub fn road_variety_score(attributes: &RoadAttributes) -> f64 {
    attributes.unique_road_name_count() as f64 / attributes.step_count() as f64
}

/// `per_step` times the number of steps on a main road.
///
/// The penalty is not normalised, so long motorway routes can exceed `1.0`
/// and flip the sign of the composite.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the penalty scales a step count"
)]
#[must_use]
pub fn main_road_penalty(
    attributes: &RoadAttributes,
    keywords: &MainRoadKeywords,
    per_step: f64,
) -> f64 {
    let main_road_steps = attributes
        .road_names()
        .iter()
        .filter(|name| keywords.matches(name))
        .count();
    per_step * main_road_steps as f64
}

/// Rewards frequent switches between roads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadChangeFactor;

impl ScoringFactor for RoadChangeFactor {
    fn name(&self) -> &'static str {
        ROAD_CHANGE
    }

    fn score(&self, _route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
        road_change_score(attributes)
    }
}

/// Penalises long stretches on a single road.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameRoadPenalty;

impl ScoringFactor for SameRoadPenalty {
    fn name(&self) -> &'static str {
        SAME_ROAD
    }

    fn score(&self, _route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
        same_road_penalty(attributes)
    }
}

/// Rewards routes with many manoeuvres per kilometre.
#[derive(Debug, Clone, Copy)]
pub struct TurnDensityFactor {
    saturation_per_km: f64,
}

impl TurnDensityFactor {
    /// Saturate at `saturation_per_km` turns per kilometre.
    #[must_use]
    pub const fn new(saturation_per_km: f64) -> Self {
        Self { saturation_per_km }
    }
}

impl ScoringFactor for TurnDensityFactor {
    fn name(&self) -> &'static str {
        TURN_DENSITY
    }

    fn score(&self, route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
        turn_score(
            attributes.step_count(),
            route.distance_m,
            self.saturation_per_km,
        )
    }
}

/// Rewards routes touching many distinct roads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadVarietyFactor;

impl ScoringFactor for RoadVarietyFactor {
    fn name(&self) -> &'static str {
        ROAD_VARIETY
    }

    fn score(&self, _route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
        road_variety_score(attributes)
    }
}

/// Penalises steps on highways, expressways and similar roads.
#[derive(Debug, Clone)]
pub struct MainRoadPenalty {
    keywords: MainRoadKeywords,
    per_step: f64,
}

impl MainRoadPenalty {
    /// Charge `per_step` for every step matching `keywords`.
    #[must_use]
    pub const fn new(keywords: MainRoadKeywords, per_step: f64) -> Self {
        Self { keywords, per_step }
    }
}

impl ScoringFactor for MainRoadPenalty {
    fn name(&self) -> &'static str {
        MAIN_ROAD
    }

    fn score(&self, _route: &CandidateRoute, attributes: &RoadAttributes) -> f64 {
        main_road_penalty(attributes, &self.keywords, self.per_step)
    }
}

//! Aggregate registered factors into one composite score per route.
//!
//! The engine keeps an ordered registry of [`ScoringFactor`]s, each tagged
//! with a [`Contribution`]. Weighted factors are summed in registration order
//! and the sum is then multiplied by `1 - p` for every penalty `p`, again in
//! registration order. Adding or removing a factor never changes how the
//! others are combined.
#![forbid(unsafe_code)]

use std::fmt;

use log::debug;
use scenic_core::{CandidateRoute, Provenance, RoadAttributes, ScoringFactor, UnscoreableRoute};

use crate::factors::{
    MainRoadPenalty, RoadChangeFactor, RoadVarietyFactor, SameRoadPenalty, TurnDensityFactor,
};
use crate::{MainRoadKeywords, ScenicWeights};

/// How a factor's value feeds the composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contribution {
    /// Added to the base sum after multiplying by the weight.
    Weighted(f64),
    /// Scales the base sum by `1 - value`.
    Penalty,
}

/// One factor's value within a [`RouteScore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScore {
    /// Registered factor name.
    pub name: &'static str,
    /// Raw sub-score returned by the factor.
    pub value: f64,
    /// How the value entered the composite.
    pub contribution: Contribution,
}

/// Combine factor values into a composite.
///
/// The weighted terms are summed in slice order, then every penalty is
/// applied as `composite * (1 - value)` in slice order. An empty slice
/// scores `0.0`.
///
/// # Examples
/// ```
/// use scenic_scorer::{Contribution, FactorScore, aggregate};
///
/// let components = [
///     FactorScore { name: "a", value: 0.5, contribution: Contribution::Weighted(0.4) },
///     FactorScore { name: "b", value: 0.5, contribution: Contribution::Penalty },
/// ];
/// assert!((aggregate(&components) - 0.1).abs() < 1e-12);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "the composite is a weighted sum scaled by penalties"
)]
#[must_use]
pub fn aggregate(components: &[FactorScore]) -> f64 {
    let base: f64 = components
        .iter()
        .filter_map(|component| match component.contribution {
            Contribution::Weighted(weight) => Some(component.value * weight),
            Contribution::Penalty => None,
        })
        .sum();
    components
        .iter()
        .filter(|component| component.contribution == Contribution::Penalty)
        .fold(base, |composite, penalty| composite * (1.0 - penalty.value))
}

/// Composite score plus the factor values it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteScore {
    composite: f64,
    components: Vec<FactorScore>,
}

impl RouteScore {
    /// Build a score from factor values, computing the composite with
    /// [`aggregate`].
    #[must_use]
    pub fn from_components(components: Vec<FactorScore>) -> Self {
        let composite = aggregate(&components);
        Self {
            composite,
            components,
        }
    }

    /// The composite value. Only relative ordering is meaningful; the value
    /// may be negative.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.composite
    }

    /// Factor values in registration order.
    #[must_use]
    pub fn components(&self) -> &[FactorScore] {
        &self.components
    }

    /// Value of the factor registered as `name`, if any.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|component| component.name == name)
            .map(|component| component.value)
    }
}

/// A candidate paired with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The scored route.
    pub route: CandidateRoute,
    /// Its score.
    pub score: RouteScore,
}

/// Scored candidates for one selection request, in pool order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredPool {
    entries: Vec<ScoredCandidate>,
    excluded: Vec<Provenance>,
}

impl ScoredPool {
    /// Build a pool from already scored entries.
    #[must_use]
    pub const fn new(entries: Vec<ScoredCandidate>) -> Self {
        Self {
            entries,
            excluded: Vec::new(),
        }
    }

    /// Scored entries in the order the candidates were supplied.
    #[must_use]
    pub fn entries(&self) -> &[ScoredCandidate] {
        &self.entries
    }

    /// Provenance of candidates dropped because they had no steps.
    #[must_use]
    pub fn excluded(&self) -> &[Provenance] {
        &self.excluded
    }

    /// Number of scored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate could be scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the pool, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<ScoredCandidate> {
        self.entries
    }
}

struct Registration {
    factor: Box<dyn ScoringFactor>,
    contribution: Contribution,
}

/// Scores candidate routes with an ordered set of factors.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use scenic_core::{CandidateRoute, Provenance, RouteLeg, RouteProfile, RouteStep};
/// use scenic_scorer::ScoringEngine;
///
/// let steps = ["A", "A", "B", "C"]
///     .iter()
///     .map(|name| RouteStep::new(vec![(*name).to_owned()], 1_000.0))
///     .collect();
/// let route = CandidateRoute::new(
///     vec![RouteLeg::new(steps)],
///     4_000.0,
///     Duration::from_secs(320),
///     Provenance::new(RouteProfile::automobile(), 0),
/// );
///
/// let score = ScoringEngine::scenic().score_route(&route)?;
/// assert!((score.value() - 0.275).abs() < 1e-12);
/// # Ok::<(), scenic_core::UnscoreableRoute>(())
/// ```
pub struct ScoringEngine {
    registrations: Vec<Registration>,
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.registrations
                    .iter()
                    .map(|registration| (registration.factor.name(), registration.contribution)),
            )
            .finish()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::scenic()
    }
}

impl ScoringEngine {
    /// An engine with no factors; every route scores `0.0`.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// The shipped scenic composite with default weights and keywords.
    #[must_use]
    pub fn scenic() -> Self {
        Self::with_weights(&ScenicWeights::default(), MainRoadKeywords::default())
    }

    /// The scenic composite with custom weights and main-road keywords.
    #[must_use]
    pub fn with_weights(weights: &ScenicWeights, keywords: MainRoadKeywords) -> Self {
        Self::empty()
            .with_factor(RoadChangeFactor, Contribution::Weighted(weights.road_change))
            .with_factor(
                TurnDensityFactor::new(weights.turn_saturation_per_km),
                Contribution::Weighted(weights.turn),
            )
            .with_factor(RoadVarietyFactor, Contribution::Weighted(weights.road_variety))
            .with_factor(SameRoadPenalty, Contribution::Penalty)
            .with_factor(
                MainRoadPenalty::new(keywords, weights.main_road_step_penalty),
                Contribution::Penalty,
            )
    }

    /// Register `factor`, consuming and returning the engine.
    #[must_use]
    pub fn with_factor<F>(mut self, factor: F, contribution: Contribution) -> Self
    where
        F: ScoringFactor + 'static,
    {
        self.register(Box::new(factor), contribution);
        self
    }

    /// Register `factor`.
    ///
    /// A factor already registered under the same name is replaced in place,
    /// keeping its position in the evaluation order.
    pub fn register(&mut self, factor: Box<dyn ScoringFactor>, contribution: Contribution) {
        let registration = Registration {
            factor,
            contribution,
        };
        let name = registration.factor.name();
        match self
            .registrations
            .iter_mut()
            .find(|existing| existing.factor.name() == name)
        {
            Some(existing) => *existing = registration,
            None => self.registrations.push(registration),
        }
    }

    /// Remove the factor registered as `name`, reporting whether one was
    /// found.
    pub fn deregister(&mut self, name: &str) -> bool {
        let before = self.registrations.len();
        self.registrations
            .retain(|registration| registration.factor.name() != name);
        self.registrations.len() != before
    }

    /// Registered factor names in evaluation order.
    pub fn factor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registrations
            .iter()
            .map(|registration| registration.factor.name())
    }

    /// Score `route` from already extracted `attributes`.
    #[must_use]
    pub fn score(&self, route: &CandidateRoute, attributes: &RoadAttributes) -> RouteScore {
        RouteScore::from_components(
            self.registrations
                .iter()
                .map(|registration| FactorScore {
                    name: registration.factor.name(),
                    value: registration.factor.score(route, attributes),
                    contribution: registration.contribution,
                })
                .collect(),
        )
    }

    /// Extract attributes from `route` and score it.
    ///
    /// # Errors
    /// Returns [`UnscoreableRoute`] when the route has no steps.
    pub fn score_route(&self, route: &CandidateRoute) -> Result<RouteScore, UnscoreableRoute> {
        let attributes = RoadAttributes::extract(route)?;
        Ok(self.score(route, &attributes))
    }

    /// Score every candidate, dropping those without steps.
    ///
    /// Entries keep the order of `candidates`. Dropped candidates are listed
    /// in [`ScoredPool::excluded`].
    #[must_use]
    pub fn score_pool(&self, candidates: Vec<CandidateRoute>) -> ScoredPool {
        let mut pool = ScoredPool::default();
        for route in candidates {
            match self.score_route(&route) {
                Ok(score) => pool.entries.push(ScoredCandidate { route, score }),
                Err(UnscoreableRoute) => {
                    debug!(
                        "excluding unscoreable candidate {} #{}",
                        route.provenance.profile, route.provenance.index
                    );
                    pool.excluded.push(route.provenance);
                }
            }
        }
        pool
    }
}

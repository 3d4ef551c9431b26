//! Candidate routes as returned by a routing provider.
//!
//! A [`CandidateRoute`] is an ordered sequence of [`RouteLeg`]s, each an
//! ordered sequence of [`RouteStep`]s. Coordinates are WGS84 with
//! `x = longitude` and `y = latitude`.

use std::time::Duration;

use bitflags::bitflags;
use geo::{Coord, LineString};

use crate::RouteProfile;

/// Tolerance, in metres, when comparing the distances of two routes that lack
/// geometry.
const SAME_PATH_DISTANCE_TOLERANCE_M: f64 = 1.0;

/// Ordered coordinates tracing the path of a route.
pub type RouteGeometry = LineString<f64>;

/// A geographic coordinate with an optional name and accuracy radius.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use scenic_core::Waypoint;
///
/// let waypoint = Waypoint::new(Coord { x: -3.19, y: 55.95 }).with_name("Edinburgh");
/// assert_eq!(waypoint.name(), Some("Edinburgh"));
/// assert!(waypoint.accuracy_m().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    location: Coord<f64>,
    name: Option<String>,
    accuracy_m: Option<f64>,
}

impl Waypoint {
    /// Construct an unnamed waypoint.
    #[must_use]
    pub const fn new(location: Coord<f64>) -> Self {
        Self {
            location,
            name: None,
            accuracy_m: None,
        }
    }

    /// Attach a human-readable name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an accuracy radius in metres.
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Geographic position.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Human-readable name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Accuracy radius in metres, if known.
    #[must_use]
    pub const fn accuracy_m(&self) -> Option<f64> {
        self.accuracy_m
    }
}

/// How a step is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    /// Travelled by car.
    #[default]
    Driving,
    /// Travelled on foot, including pushing a bike.
    Walking,
    /// Travelled by bicycle.
    Cycling,
    /// Carried on a ferry.
    Ferry,
    /// Carried on a train.
    Train,
    /// Any mode the provider reports that the engine does not distinguish.
    Other,
}

impl TransportMode {
    /// Whether a car can complete the step under its own power or aboard a
    /// vehicle ferry.
    #[must_use]
    pub const fn carries_cars(self) -> bool {
        matches!(self, Self::Driving | Self::Ferry)
    }
}

bitflags! {
    /// Road-class attributes attached to a step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RoadClasses: u8 {
        /// Part of the step runs on a motorway.
        const MOTORWAY = 1;
        /// Part of the step is tolled.
        const TOLL = 1 << 1;
        /// Part of the step runs through a tunnel.
        const TUNNEL = 1 << 2;
        /// Part of the step is a ferry crossing.
        const FERRY = 1 << 3;
        /// Part of the step has access restrictions.
        const RESTRICTED = 1 << 4;
        /// Part of the step is a high-occupancy vehicle lane.
        const HIGH_OCCUPANCY = 1 << 5;
    }
}

impl RoadClasses {
    /// Parse a provider class label such as `"motorway"` or `"toll"`.
    ///
    /// Unknown labels yield an empty set.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "motorway" => Self::MOTORWAY,
            "toll" => Self::TOLL,
            "tunnel" => Self::TUNNEL,
            "ferry" => Self::FERRY,
            "restricted" => Self::RESTRICTED,
            "hov" => Self::HIGH_OCCUPANCY,
            _ => Self::empty(),
        }
    }
}

/// One manoeuvre segment of a route.
///
/// # Examples
/// ```
/// use scenic_core::{RoadClasses, RouteStep, TransportMode};
///
/// let step = RouteStep::new(vec!["Coast Road".into()], 1_200.0)
///     .with_classes(RoadClasses::TOLL);
/// assert_eq!(step.first_road_name(), Some("Coast Road"));
/// assert_eq!(step.mode, TransportMode::Driving);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    /// Road names traversed, in order. May be empty when unknown.
    pub road_names: Vec<String>,
    /// Step length in metres.
    pub distance_m: f64,
    /// How the step is travelled.
    pub mode: TransportMode,
    /// Road-class attributes.
    pub classes: RoadClasses,
}

impl RouteStep {
    /// Construct a driving step with no road-class attributes.
    #[must_use]
    pub fn new(road_names: Vec<String>, distance_m: f64) -> Self {
        Self {
            road_names,
            distance_m,
            mode: TransportMode::Driving,
            classes: RoadClasses::empty(),
        }
    }

    /// Set the transport mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the road-class attributes.
    #[must_use]
    pub const fn with_classes(mut self, classes: RoadClasses) -> Self {
        self.classes = classes;
        self
    }

    /// The first named road of the step.
    ///
    /// Returns `None` when the name list is empty or its first entry is blank.
    #[must_use]
    pub fn first_road_name(&self) -> Option<&str> {
        self.road_names
            .first()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }
}

/// Steps between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteLeg {
    /// Ordered manoeuvre segments.
    pub steps: Vec<RouteStep>,
}

impl RouteLeg {
    /// Construct a leg from its steps.
    #[must_use]
    pub const fn new(steps: Vec<RouteStep>) -> Self {
        Self { steps }
    }
}

/// Where a candidate came from: the profile that produced it and its position
/// within that profile's result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provenance {
    /// Profile the provider was asked to route with.
    pub profile: RouteProfile,
    /// Zero-based position in the profile's results; `0` is the primary route.
    pub index: usize,
}

impl Provenance {
    /// Construct a provenance tag.
    #[must_use]
    pub const fn new(profile: RouteProfile, index: usize) -> Self {
        Self { profile, index }
    }

    /// Whether the candidate is the profile's primary route.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.index == 0
    }
}

/// One fully computed path option between origin and destination.
///
/// Identity is carried by [`Provenance`]: two candidates following the same
/// roads are still distinct values. Use [`CandidateRoute::follows_same_path`]
/// for the explicit content comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRoute {
    /// Ordered legs; never empty for a route the provider produced.
    pub legs: Vec<RouteLeg>,
    /// Total distance in metres.
    pub distance_m: f64,
    /// Total expected travel time.
    pub expected_travel_time: Duration,
    /// Full-resolution path, when the provider returned one.
    pub geometry: Option<RouteGeometry>,
    /// Source profile and result position.
    pub provenance: Provenance,
}

impl CandidateRoute {
    /// Construct a candidate without geometry.
    #[must_use]
    pub const fn new(
        legs: Vec<RouteLeg>,
        distance_m: f64,
        expected_travel_time: Duration,
        provenance: Provenance,
    ) -> Self {
        Self {
            legs,
            distance_m,
            expected_travel_time,
            geometry: None,
            provenance,
        }
    }

    /// Attach the path geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: RouteGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Replace the provenance tag.
    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Iterate over every step across all legs, in travel order.
    pub fn steps(&self) -> impl Iterator<Item = &RouteStep> {
        self.legs.iter().flat_map(|leg| leg.steps.iter())
    }

    /// Total number of steps across all legs.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.legs.iter().map(|leg| leg.steps.len()).sum()
    }

    /// Whether `other` traces the same path as `self`.
    ///
    /// When both routes carry geometry the coordinates must match exactly.
    /// Otherwise the first road name of every step must match in order and
    /// the total distances must agree to within a metre.
    #[must_use]
    pub fn follows_same_path(&self, other: &Self) -> bool {
        if let (Some(lhs), Some(rhs)) = (&self.geometry, &other.geometry) {
            return lhs == rhs;
        }
        (self.distance_m - other.distance_m).abs() <= SAME_PATH_DISTANCE_TOLERANCE_M
            && self.step_count() == other.step_count()
            && self
                .steps()
                .zip(other.steps())
                .all(|(lhs, rhs)| lhs.first_road_name() == rhs.first_road_name())
    }
}

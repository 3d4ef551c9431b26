//! Request candidate routes from an external routing provider.
//!
//! The [`RouteProvider`] trait is the only boundary through which routes enter
//! the engine. Providers are passed explicitly to whoever orchestrates the
//! requests; the engine keeps no process-wide provider instance.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{CandidateRoute, RouteProfile, Waypoint};

/// Resolution of the path geometry requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeResolution {
    /// Every coordinate the provider has.
    #[default]
    Full,
    /// A generalised shape suitable for overview rendering.
    Simplified,
    /// No geometry.
    Omitted,
}

/// Per-step metadata requested alongside each route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepAttribute {
    /// Live congestion levels.
    Congestion,
    /// Expected travel time.
    TravelTime,
    /// Segment distance.
    Distance,
    /// Posted speed limit.
    SpeedLimit,
}

impl StepAttribute {
    /// Every attribute the extractor may need.
    pub const ALL: [Self; 4] = [
        Self::Congestion,
        Self::TravelTime,
        Self::Distance,
        Self::SpeedLimit,
    ];
}

/// Preference knobs sent with every route request.
///
/// The default prefers non-motorway roads, asks for alternatives, requests
/// full-resolution geometry and every [`StepAttribute`].
///
/// # Examples
/// ```
/// use scenic_core::{RoutePreferences, ShapeResolution};
///
/// let preferences = RoutePreferences::default().with_alternatives(false);
/// assert!(preferences.avoid_motorways);
/// assert!(!preferences.include_alternatives);
/// assert_eq!(preferences.shape_resolution, ShapeResolution::Full);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePreferences {
    /// Ask the provider to steer away from motorways.
    pub avoid_motorways: bool,
    /// Ask for alternative routes besides the primary one.
    pub include_alternatives: bool,
    /// Requested geometry resolution.
    pub shape_resolution: ShapeResolution,
    /// Requested per-step metadata.
    pub step_attributes: Vec<StepAttribute>,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            avoid_motorways: true,
            include_alternatives: true,
            shape_resolution: ShapeResolution::Full,
            step_attributes: StepAttribute::ALL.to_vec(),
        }
    }
}

impl RoutePreferences {
    /// Set whether motorways should be avoided.
    #[must_use]
    pub const fn with_avoid_motorways(mut self, avoid: bool) -> Self {
        self.avoid_motorways = avoid;
        self
    }

    /// Set whether alternatives are requested.
    #[must_use]
    pub const fn with_alternatives(mut self, include: bool) -> Self {
        self.include_alternatives = include;
        self
    }

    /// Set the geometry resolution.
    #[must_use]
    pub const fn with_shape_resolution(mut self, resolution: ShapeResolution) -> Self {
        self.shape_resolution = resolution;
        self
    }

    /// Replace the requested step attributes.
    #[must_use]
    pub fn with_step_attributes(mut self, attributes: impl Into<Vec<StepAttribute>>) -> Self {
        self.step_attributes = attributes.into();
        self
    }
}

/// One route request for a single profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Start of the journey.
    pub origin: Waypoint,
    /// End of the journey.
    pub destination: Waypoint,
    /// Profile the provider should route with.
    pub profile: RouteProfile,
    /// Preference knobs.
    pub preferences: RoutePreferences,
}

impl RouteRequest {
    /// Construct a request.
    #[must_use]
    pub const fn new(
        origin: Waypoint,
        destination: Waypoint,
        profile: RouteProfile,
        preferences: RoutePreferences,
    ) -> Self {
        Self {
            origin,
            destination,
            profile,
            preferences,
        }
    }
}

/// Errors from [`RouteProvider::request_routes`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request had nothing to route between.
    #[error("origin and destination are required")]
    EmptyInput,

    /// Network-level failure (connection refused, DNS error, etc.).
    #[error("network error contacting {url}: {message}")]
    Network {
        /// URL that was requested.
        url: String,
        /// Error description.
        message: String,
    },

    /// Request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// URL that was requested.
        url: String,
        /// Timeout duration in seconds.
        timeout_secs: u64,
    },

    /// The routing service answered with an HTTP error status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The routing service reported a failure in its response body.
    #[error("routing service error ({code}): {message}")]
    Service {
        /// Service-specific error code.
        code: String,
        /// Error message from the service.
        message: String,
    },

    /// The response could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Error description.
        message: String,
    },

    /// The provider does not serve the requested profile.
    #[error("profile {profile} is not available")]
    Unavailable {
        /// Requested profile name.
        profile: String,
    },
}

/// Compute candidate routes between two waypoints.
///
/// Requests are independent and may run concurrently with different
/// profiles. Implementations return every candidate the service produced, in
/// the service's order, with the primary route first. An empty vector means
/// the service found no route for this profile.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use scenic_core::{CandidateRoute, ProviderError, RouteProvider, RouteRequest};
///
/// struct Offline;
///
/// #[async_trait]
/// impl RouteProvider for Offline {
///     async fn request_routes(
///         &self,
///         request: &RouteRequest,
///     ) -> Result<Vec<CandidateRoute>, ProviderError> {
///         Err(ProviderError::Unavailable {
///             profile: request.profile.to_string(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Return the candidates computed for `request`.
    async fn request_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<CandidateRoute>, ProviderError>;
}

#[async_trait]
impl<P> RouteProvider for Arc<P>
where
    P: RouteProvider + ?Sized,
{
    async fn request_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<CandidateRoute>, ProviderError> {
        (**self).request_routes(request).await
    }
}

#[async_trait]
impl<P> RouteProvider for Box<P>
where
    P: RouteProvider + ?Sized,
{
    async fn request_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<CandidateRoute>, ProviderError> {
        (**self).request_routes(request).await
    }
}

//! HTTP-based `RouteProvider` using the OSRM Route service.
//!
//! This module provides [`HttpRouteProvider`], an implementation of the
//! [`RouteProvider`] trait that requests candidate routes from an OSRM (or
//! Mapbox Directions) service over HTTP and converts them into
//! [`CandidateRoute`]s.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use scenic_core::{RoutePreferences, RouteProfile, RouteProvider, RouteRequest, Waypoint};
//! use scenic_data::routing::HttpRouteProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HttpRouteProvider::new("http://localhost:5000")?;
//! let request = RouteRequest::new(
//!     Waypoint::new(Coord { x: -0.1, y: 51.5 }),
//!     Waypoint::new(Coord { x: -0.2, y: 51.6 }),
//!     RouteProfile::automobile(),
//!     RoutePreferences::default(),
//! );
//!
//! let routes = provider.request_routes(&request).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use geo::LineString;
use log::debug;
use reqwest::Client;
use scenic_core::{
    CandidateRoute, Provenance, ProviderError, RoadClasses, RouteLeg, RoutePreferences,
    RouteProvider, RouteRequest, RouteStep, ShapeResolution, StepAttribute, TransportMode,
    Waypoint,
};
use thiserror::Error;

use super::osrm::{ResponseGeometry, ResponseRoute, ResponseStep, RouteResponse};

/// Error type for [`HttpRouteProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Query dialect spoken by the Route service.
///
/// OSRM and Mapbox Directions share a response shape but accept different
/// `annotations` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceDialect {
    /// An OSRM server: `duration`, `distance` and `speed` annotations.
    #[default]
    Osrm,
    /// Mapbox Directions: adds `congestion` and `maxspeed`.
    Mapbox,
}

impl ServiceDialect {
    /// Query value for a requested step attribute, if this dialect has one.
    #[must_use]
    pub const fn annotation(self, attribute: StepAttribute) -> Option<&'static str> {
        match (self, attribute) {
            (_, StepAttribute::TravelTime) => Some("duration"),
            (_, StepAttribute::Distance) => Some("distance"),
            (Self::Osrm, StepAttribute::SpeedLimit) => Some("speed"),
            (Self::Mapbox, StepAttribute::SpeedLimit) => Some("maxspeed"),
            (Self::Osrm, StepAttribute::Congestion) => None,
            (Self::Mapbox, StepAttribute::Congestion) => Some("congestion"),
        }
    }
}

/// Default user agent for route requests.
pub const DEFAULT_USER_AGENT: &str = "scenic-routing/0.1";

/// Default path of the Route service below the base URL.
pub const DEFAULT_SERVICE_PATH: &str = "route/v1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone)]
pub struct HttpRouteProviderConfig {
    /// Base URL for the routing service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Path of the Route service below the base URL, e.g. `"route/v1"` for
    /// OSRM or `"directions/v5/mapbox"` for Mapbox.
    pub service_path: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Access token sent as the percent-encoded `access_token` query
    /// parameter, when the service needs one.
    pub access_token: Option<String>,
    /// Which `annotations` values the service accepts.
    pub dialect: ServiceDialect,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            service_path: DEFAULT_SERVICE_PATH.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            access_token: None,
            dialect: ServiceDialect::Osrm,
        }
    }
}

impl HttpRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the Route service path.
    #[must_use]
    pub fn with_service_path(mut self, service_path: impl Into<String>) -> Self {
        self.service_path = service_path.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the access token.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Set the query dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: ServiceDialect) -> Self {
        self.dialect = dialect;
        self
    }
}

/// HTTP-based route provider using the OSRM Route service.
///
/// Each call issues one `GET` request for one profile. The underlying
/// [`Client`] pools connections, so concurrent calls for different profiles
/// share it cheaply.
#[derive(Debug, Clone)]
pub struct HttpRouteProvider {
    client: Client,
    config: HttpRouteProviderConfig,
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpRouteProviderConfig {
        &self.config
    }

    /// Build the Route service URL for `request`.
    ///
    /// The URL format is:
    /// `{base_url}/{service_path}/{profile}/{lon},{lat};{lon},{lat}?{query}`.
    fn build_route_url(&self, request: &RouteRequest) -> String {
        let coords = [&request.origin, &request.destination]
            .iter()
            .map(|waypoint| {
                let location = waypoint.location();
                format!("{},{}", location.x, location.y)
            })
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/{}/{}?{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.service_path.trim_matches('/'),
            request.profile,
            coords,
            self.build_query(&request.preferences)
        )
    }

    fn build_query(&self, preferences: &RoutePreferences) -> String {
        let overview = match preferences.shape_resolution {
            ShapeResolution::Full => "full",
            ShapeResolution::Simplified => "simplified",
            ShapeResolution::Omitted => "false",
        };
        let mut params = vec![
            format!("alternatives={}", preferences.include_alternatives),
            "steps=true".to_owned(),
            format!("overview={overview}"),
            "geometries=geojson".to_owned(),
        ];
        let annotations = preferences
            .step_attributes
            .iter()
            .filter_map(|attribute| {
                let name = self.config.dialect.annotation(*attribute);
                if name.is_none() {
                    debug!("{attribute:?} annotations are not served by this dialect; skipping");
                }
                name
            })
            .collect::<Vec<_>>();
        if !annotations.is_empty() {
            params.push(format!("annotations={}", annotations.join(",")));
        }
        if preferences.avoid_motorways {
            params.push("exclude=motorway".to_owned());
        }
        params.join("&")
    }

    /// Convert a reqwest error to a `ProviderError`.
    ///
    /// The message drops reqwest's copy of the URL, which would carry the
    /// access token.
    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        let status = error.status();
        let message = error.without_url().to_string();
        if let Some(status) = status {
            return ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message,
            };
        }

        ProviderError::Network {
            url: url.to_owned(),
            message,
        }
    }

    /// Convert a Route service response into candidates for `request`.
    fn convert_response(
        request: &RouteRequest,
        response: RouteResponse,
    ) -> Result<Vec<CandidateRoute>, ProviderError> {
        if response.is_no_route() {
            debug!("profile {} found no route", request.profile);
            return Ok(Vec::new());
        }
        if !response.is_ok() {
            return Err(ProviderError::Service {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        Ok(response
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| {
                convert_route(route, Provenance::new(request.profile.clone(), index))
            })
            .collect())
    }
}

fn convert_route(route: ResponseRoute, provenance: Provenance) -> CandidateRoute {
    // Invalid values (negative, NaN, infinite) would panic in
    // Duration::from_secs_f64, so they are recorded as zero.
    let travel_time = Some(route.duration)
        .filter(|&seconds| seconds >= 0.0 && seconds.is_finite())
        .map_or(Duration::ZERO, Duration::from_secs_f64);
    let legs = route
        .legs
        .into_iter()
        .map(|leg| RouteLeg::new(leg.steps.into_iter().map(convert_step).collect()))
        .collect();
    let candidate = CandidateRoute::new(legs, route.distance, travel_time, provenance);
    match route.geometry {
        Some(ResponseGeometry::GeoJson { coordinates }) => {
            candidate.with_geometry(LineString::from(coordinates))
        }
        Some(ResponseGeometry::Encoded(_)) => {
            debug!("ignoring encoded polyline geometry");
            candidate
        }
        None => candidate,
    }
}

fn convert_step(step: ResponseStep) -> RouteStep {
    let mut road_names = split_names(&step.name);
    if road_names.is_empty() {
        road_names = step.reference.as_deref().map(split_names).unwrap_or_default();
    }
    let classes = step
        .intersections
        .iter()
        .flat_map(|intersection| intersection.classes.iter())
        .fold(RoadClasses::empty(), |classes, label| {
            classes | RoadClasses::from_label(label)
        });
    RouteStep::new(road_names, step.distance)
        .with_mode(transport_mode(&step.mode))
        .with_classes(classes)
}

fn split_names(names: &str) -> Vec<String> {
    names
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

fn transport_mode(mode: &str) -> TransportMode {
    match mode {
        "driving" => TransportMode::Driving,
        "walking" | "pushing bike" => TransportMode::Walking,
        "cycling" => TransportMode::Cycling,
        "ferry" => TransportMode::Ferry,
        "train" => TransportMode::Train,
        _ => TransportMode::Other,
    }
}

fn is_routable(waypoint: &Waypoint) -> bool {
    let location = waypoint.location();
    location.x.is_finite() && location.y.is_finite()
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    async fn request_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<CandidateRoute>, ProviderError> {
        if !is_routable(&request.origin) || !is_routable(&request.destination) {
            return Err(ProviderError::EmptyInput);
        }

        let url = self.build_route_url(request);
        let mut builder = self.client.get(&url);
        if let Some(token) = &self.config.access_token {
            builder = builder.query(&[("access_token", token)]);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, &url))?;

        let route_response: RouteResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Parse {
                    message: err.to_string(),
                })?;

        Self::convert_response(request, route_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use scenic_core::RouteProfile;

    use crate::routing::osrm::{ResponseIntersection, ResponseLeg};

    #[fixture]
    fn request() -> RouteRequest {
        RouteRequest::new(
            Waypoint::new(Coord { x: -0.1, y: 51.5 }),
            Waypoint::new(Coord { x: -0.2, y: 51.6 }),
            RouteProfile::automobile(),
            RoutePreferences::default(),
        )
    }

    fn step(name: &str, reference: Option<&str>, mode: &str, classes: &[&str]) -> ResponseStep {
        ResponseStep {
            distance: 500.0,
            name: name.to_owned(),
            reference: reference.map(str::to_owned),
            mode: mode.to_owned(),
            intersections: vec![ResponseIntersection {
                classes: classes.iter().map(|class| (*class).to_owned()).collect(),
            }],
        }
    }

    #[rstest]
    fn build_route_url_requests_scenic_knobs(request: RouteRequest) {
        let provider =
            HttpRouteProvider::new("http://osrm.example.com").expect("provider should build");

        let url = provider.build_route_url(&request);

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/driving/-0.1,51.5;-0.2,51.6\
             ?alternatives=true&steps=true&overview=full&geometries=geojson\
             &annotations=duration,distance,speed&exclude=motorway"
        );
    }

    #[rstest]
    fn mapbox_dialect_requests_live_annotations(request: RouteRequest) {
        let config = HttpRouteProviderConfig::new("https://api.mapbox.com")
            .with_service_path("directions/v5/mapbox")
            .with_dialect(ServiceDialect::Mapbox);
        let provider = HttpRouteProvider::with_config(config).expect("provider should build");

        let url = provider.build_route_url(&request);

        assert!(
            url.contains("&annotations=congestion,duration,distance,maxspeed&"),
            "unexpected query in {url}"
        );
    }

    #[rstest]
    fn osrm_dialect_omits_annotations_it_cannot_serve(request: RouteRequest) {
        let provider =
            HttpRouteProvider::new("http://osrm.example.com").expect("provider should build");
        let congestion_only = RouteRequest {
            preferences: RoutePreferences::default()
                .with_step_attributes(vec![StepAttribute::Congestion]),
            ..request
        };

        let url = provider.build_route_url(&congestion_only);

        assert!(!url.contains("annotations"), "unexpected query in {url}");
    }

    #[rstest]
    #[case(StepAttribute::Congestion, None, Some("congestion"))]
    #[case(StepAttribute::TravelTime, Some("duration"), Some("duration"))]
    #[case(StepAttribute::Distance, Some("distance"), Some("distance"))]
    #[case(StepAttribute::SpeedLimit, Some("speed"), Some("maxspeed"))]
    fn dialects_name_annotations(
        #[case] attribute: StepAttribute,
        #[case] osrm: Option<&str>,
        #[case] mapbox: Option<&str>,
    ) {
        assert_eq!(ServiceDialect::Osrm.annotation(attribute), osrm);
        assert_eq!(ServiceDialect::Mapbox.annotation(attribute), mapbox);
    }

    #[rstest]
    fn build_errors_name_the_client() {
        use std::error::Error as _;

        let source = reqwest::Client::builder()
            .user_agent("bad\nagent")
            .build()
            .expect_err("a newline is not a valid header value");
        let err = ProviderBuildError::HttpClient(source);

        assert!(err.to_string().starts_with("failed to build HTTP client: "));
        assert!(err.source().is_some());
    }

    #[rstest]
    fn build_route_url_honours_preferences(request: RouteRequest) {
        let config = HttpRouteProviderConfig::new("https://api.mapbox.com/")
            .with_service_path("/directions/v5/mapbox/")
            .with_access_token("pk.test");
        let provider = HttpRouteProvider::with_config(config).expect("provider should build");
        let relaxed = RouteRequest {
            preferences: RoutePreferences::default()
                .with_avoid_motorways(false)
                .with_alternatives(false)
                .with_shape_resolution(ShapeResolution::Omitted)
                .with_step_attributes(Vec::new()),
            ..request
        };

        let url = provider.build_route_url(&relaxed);

        assert_eq!(
            url,
            "https://api.mapbox.com/directions/v5/mapbox/driving/-0.1,51.5;-0.2,51.6\
             ?alternatives=false&steps=true&overview=false&geometries=geojson"
        );
    }

    #[rstest]
    fn convert_response_stamps_provenance(request: RouteRequest) {
        let response = RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: vec![
                ResponseRoute {
                    distance: 1_000.0,
                    duration: 120.0,
                    legs: vec![ResponseLeg {
                        steps: vec![step("Mill Lane", None, "driving", &[])],
                    }],
                    geometry: Some(ResponseGeometry::GeoJson {
                        coordinates: vec![[-0.1, 51.5], [-0.2, 51.6]],
                    }),
                },
                ResponseRoute {
                    distance: 1_200.0,
                    duration: f64::NAN,
                    legs: Vec::new(),
                    geometry: None,
                },
            ],
        };

        let routes =
            HttpRouteProvider::convert_response(&request, response).expect("should convert");

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].provenance, Provenance::new(RouteProfile::automobile(), 0));
        assert_eq!(routes[1].provenance.index, 1);
        assert_eq!(routes[0].expected_travel_time, Duration::from_secs(120));
        assert_eq!(routes[1].expected_travel_time, Duration::ZERO);
        assert_eq!(routes[0].geometry.as_ref().map(|line| line.0.len()), Some(2));
        assert!(routes[1].legs.is_empty());
    }

    #[rstest]
    fn convert_response_treats_no_route_as_empty(request: RouteRequest) {
        let response = RouteResponse {
            code: "NoRoute".to_owned(),
            message: Some("Impossible route".to_owned()),
            routes: Vec::new(),
        };

        let routes =
            HttpRouteProvider::convert_response(&request, response).expect("should convert");

        assert!(routes.is_empty());
    }

    #[rstest]
    fn convert_response_handles_service_error(request: RouteRequest) {
        let response = RouteResponse {
            code: "InvalidQuery".to_owned(),
            message: Some("Query string malformed".to_owned()),
            routes: Vec::new(),
        };

        let err = HttpRouteProvider::convert_response(&request, response)
            .expect_err("should fail");

        assert_eq!(
            err,
            ProviderError::Service {
                code: "InvalidQuery".to_owned(),
                message: "Query string malformed".to_owned(),
            }
        );
    }

    #[rstest]
    #[case("Mill Lane", None, &["Mill Lane"])]
    #[case("Mill Lane; Old Road", None, &["Mill Lane", "Old Road"])]
    #[case("", Some("A 40"), &["A 40"])]
    #[case("  ", None, &[])]
    fn convert_step_splits_names(
        #[case] name: &str,
        #[case] reference: Option<&str>,
        #[case] expected: &[&str],
    ) {
        let converted = convert_step(step(name, reference, "driving", &[]));

        assert_eq!(converted.road_names, expected);
    }

    #[rstest]
    #[case("driving", TransportMode::Driving)]
    #[case("pushing bike", TransportMode::Walking)]
    #[case("ferry", TransportMode::Ferry)]
    #[case("train", TransportMode::Train)]
    #[case("hovercraft", TransportMode::Other)]
    fn convert_step_maps_modes(#[case] mode: &str, #[case] expected: TransportMode) {
        assert_eq!(convert_step(step("A", None, mode, &[])).mode, expected);
    }

    #[rstest]
    fn convert_step_collects_classes() {
        let converted = convert_step(step("A", None, "driving", &["motorway", "toll", "unknown"]));

        assert_eq!(converted.classes, RoadClasses::MOTORWAY | RoadClasses::TOLL);
    }

    #[rstest]
    #[tokio::test]
    async fn non_finite_waypoints_are_rejected(request: RouteRequest) {
        let provider =
            HttpRouteProvider::new("http://localhost:5000").expect("provider should build");
        let broken = RouteRequest {
            origin: Waypoint::new(Coord { x: f64::NAN, y: 51.5 }),
            ..request
        };

        let err = provider
            .request_routes(&broken)
            .await
            .expect_err("should fail");

        assert_eq!(err, ProviderError::EmptyInput);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpRouteProviderConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.service_path, DEFAULT_SERVICE_PATH);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.access_token, None);
        assert_eq!(config.dialect, ServiceDialect::Osrm);
    }
}

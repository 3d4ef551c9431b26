//! Response types for the OSRM Route service.
//!
//! Only the fields the engine consumes are modelled; everything else in the
//! payload is ignored. Mapbox Directions responses share this shape.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// Route service response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from the service.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"ProfileNotFound"` - The profile is not served
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    #[serde(default)]
    pub message: Option<String>,

    /// Computed routes, primary first.
    #[serde(default)]
    pub routes: Vec<ResponseRoute>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if the service found no route, which is not a failure.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code == "NoRoute"
    }
}

/// One route in the response.
#[derive(Debug, Deserialize)]
pub struct ResponseRoute {
    /// Total distance in metres.
    pub distance: f64,
    /// Expected travel time in seconds.
    pub duration: f64,
    /// Legs between consecutive waypoints.
    #[serde(default)]
    pub legs: Vec<ResponseLeg>,
    /// Overview geometry, absent when `overview=false`.
    #[serde(default)]
    pub geometry: Option<ResponseGeometry>,
}

/// Route geometry in either supported encoding.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponseGeometry {
    /// A GeoJSON `LineString` of `[lon, lat]` pairs.
    GeoJson {
        /// Path coordinates.
        coordinates: Vec<[f64; 2]>,
    },
    /// An encoded polyline, returned when GeoJSON was not requested.
    Encoded(String),
}

/// One leg of a route.
#[derive(Debug, Deserialize)]
pub struct ResponseLeg {
    /// Manoeuvre steps, present when `steps=true`.
    #[serde(default)]
    pub steps: Vec<ResponseStep>,
}

/// One manoeuvre step.
#[derive(Debug, Deserialize)]
pub struct ResponseStep {
    /// Step distance in metres.
    #[serde(default)]
    pub distance: f64,
    /// Road name; several names are separated by `;`.
    #[serde(default)]
    pub name: String,
    /// Road reference such as `"A 1"`, used when the name is empty.
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    /// Mode of transport, e.g. `"driving"` or `"ferry"`.
    #[serde(default)]
    pub mode: String,
    /// Intersections passed during the step.
    #[serde(default)]
    pub intersections: Vec<ResponseIntersection>,
}

/// An intersection along a step.
#[derive(Debug, Deserialize)]
pub struct ResponseIntersection {
    /// Road classes of the road leaving the intersection.
    #[serde(default)]
    pub classes: Vec<String>,
}

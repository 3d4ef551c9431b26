//! Named routing profiles.

use std::fmt;

/// A named routing preference set understood by the routing provider.
///
/// Profiles are opaque to the engine: the name is forwarded verbatim and only
/// compared for equality when tracing a candidate back to its source.
///
/// # Examples
/// ```
/// use scenic_core::RouteProfile;
///
/// let profile = RouteProfile::traffic_avoiding();
/// assert_eq!(profile.as_str(), "driving-traffic");
/// assert_ne!(profile, RouteProfile::automobile());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteProfile(String);

impl RouteProfile {
    /// Construct a profile from its provider-facing name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Plain automobile routing.
    #[must_use]
    pub fn automobile() -> Self {
        Self::new("driving")
    }

    /// Automobile routing that avoids live traffic.
    #[must_use]
    pub fn traffic_avoiding() -> Self {
        Self::new("driving-traffic")
    }

    /// Borrow the provider-facing name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteProfile {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

//! Provider doubles shared by the CLI tests.

use scenic_core::test_support::StubRouteProvider;
use scenic_core::{CandidateRoute, RouteProfile, RouteProvider};

use crate::CliError;
use crate::select::{SelectConfig, SelectProviderBuilder};

/// Hands out a fresh [`StubRouteProvider`] answering the configured profiles.
#[derive(Debug, Default)]
pub(super) struct StubSelectProviderBuilder {
    routes: Vec<(RouteProfile, Vec<CandidateRoute>)>,
}

impl StubSelectProviderBuilder {
    pub(super) fn with_routes(mut self, profile: RouteProfile, routes: Vec<CandidateRoute>) -> Self {
        self.routes.push((profile, routes));
        self
    }
}

impl SelectProviderBuilder for StubSelectProviderBuilder {
    fn build(&self, _config: &SelectConfig) -> Result<Box<dyn RouteProvider>, CliError> {
        let stub = self
            .routes
            .iter()
            .cloned()
            .fold(StubRouteProvider::new(), |stub, (profile, routes)| {
                stub.with_routes(profile, routes)
            });
        Ok(Box::new(stub))
    }
}

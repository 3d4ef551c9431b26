//! Behavioural coverage for candidate orchestration and selection.

use std::cell::RefCell;
use std::time::Duration;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use scenic_core::test_support::{StubRouteProvider, route_from_names};
use scenic_core::{CandidateRoute, ProviderError, RouteProfile, Waypoint};
use scenic_selector::{CandidateOrchestrator, SelectableRoute, Selection, SelectionError};
use tokio_util::sync::CancellationToken;

const LOCAL_ROAD: &str = "Glen Road";

/// Shared state for one scenario run.
pub struct TestContext {
    provider: RefCell<StubRouteProvider>,
    outcome: RefCell<Option<Result<Selection, SelectionError>>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        provider: RefCell::new(StubRouteProvider::new()),
        outcome: RefCell::new(None),
    }
}

fn configure(context: &TestContext, apply: impl FnOnce(StubRouteProvider) -> StubRouteProvider) {
    let provider = context.provider.replace(StubRouteProvider::new());
    *context.provider.borrow_mut() = apply(provider);
}

fn winding_local_route() -> CandidateRoute {
    route_from_names(
        &[LOCAL_ROAD, "Mill Lane", "Ridge Way", "Church Street", "Quarry Hill"],
        5_000.0,
    )
}

fn motorway_route() -> CandidateRoute {
    let names: Vec<&str> = ["Sunset Highway", "Harbor Freeway"]
        .iter()
        .copied()
        .cycle()
        .take(12)
        .collect();
    route_from_names(&names, 30_000.0)
}

fn network_error() -> ProviderError {
    ProviderError::Network {
        url: "http://routing.test/route".to_owned(),
        message: "connection reset".to_owned(),
    }
}

fn run_selection(context: &TestContext, cancel_after: Option<Duration>) {
    let provider = context.provider.replace(StubRouteProvider::new());
    let orchestrator = CandidateOrchestrator::new(provider, RouteProfile::automobile())
        .with_profile(RouteProfile::traffic_avoiding());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build");
    let cancel = CancellationToken::new();
    let outcome = runtime.block_on(async {
        if let Some(delay) = cancel_after {
            let trigger = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                trigger.cancel();
            });
        }
        orchestrator
            .select_route(
                Waypoint::new(Coord { x: -0.12, y: 51.5 }),
                Waypoint::new(Coord { x: -1.26, y: 51.75 }),
                &cancel,
            )
            .await
    });
    *context.outcome.borrow_mut() = Some(outcome);
}

fn selection(context: &TestContext) -> Selection {
    let outcome = context.outcome.borrow();
    match outcome.as_ref().expect("selection must run") {
        Ok(selection) => selection.clone(),
        Err(err) => panic!("selection failed: {err}"),
    }
}

fn failure(context: &TestContext) -> SelectionError {
    let outcome = context.outcome.borrow();
    match outcome.as_ref().expect("selection must run") {
        Ok(selection) => panic!("selection unexpectedly succeeded: {selection:?}"),
        Err(err) => err.clone(),
    }
}

#[given("the driving profile fails with a network error")]
fn driving_fails(context: &TestContext) {
    configure(context, |provider| {
        provider.with_error(RouteProfile::automobile(), network_error())
    });
}

#[given("the traffic-avoiding profile fails with a network error")]
fn traffic_fails(context: &TestContext) {
    configure(context, |provider| {
        provider.with_error(RouteProfile::traffic_avoiding(), network_error())
    });
}

#[given("the traffic-avoiding profile returns a winding local route")]
fn traffic_returns_local(context: &TestContext) {
    configure(context, |provider| {
        provider.with_routes(RouteProfile::traffic_avoiding(), vec![winding_local_route()])
    });
}

#[given("the driving profile returns a winding local route")]
fn driving_returns_local(context: &TestContext) {
    configure(context, |provider| {
        provider.with_routes(RouteProfile::automobile(), vec![winding_local_route()])
    });
}

#[given("the driving profile returns an all-motorway route")]
fn driving_returns_motorway(context: &TestContext) {
    configure(context, |provider| {
        provider.with_routes(RouteProfile::automobile(), vec![motorway_route()])
    });
}

#[given("the driving profile offers a motorway primary and a winding local alternative")]
fn driving_returns_motorway_and_local(context: &TestContext) {
    configure(context, |provider| {
        provider.with_routes(
            RouteProfile::automobile(),
            vec![motorway_route(), winding_local_route()],
        )
    });
}

#[given("the driving profile returns two identically scored routes")]
fn driving_returns_twins(context: &TestContext) {
    configure(context, |provider| {
        provider.with_routes(
            RouteProfile::automobile(),
            vec![
                route_from_names(&["A", "B", "C"], 3_000.0),
                route_from_names(&["D", "E", "F"], 3_000.0),
            ],
        )
    });
}

#[given("the traffic-avoiding profile never answers")]
fn traffic_pending(context: &TestContext) {
    configure(context, |provider| {
        provider.with_pending(RouteProfile::traffic_avoiding())
    });
}

#[when("I select a route")]
fn select(context: &TestContext) {
    run_selection(context, None);
}

#[when("I select a route and cancel the wait")]
fn select_and_cancel(context: &TestContext) {
    run_selection(context, Some(Duration::from_millis(20)));
}

#[then("the winding local route is selected")]
fn local_selected(context: &TestContext) {
    let selection = selection(context);
    assert_eq!(
        selection.winner.route.steps().next().and_then(|step| step.first_road_name()),
        Some(LOCAL_ROAD)
    );
}

#[then("the driving primary route is selected")]
fn primary_selected(context: &TestContext) {
    let selection = selection(context);
    assert_eq!(selection.winner.route.provenance.profile, RouteProfile::automobile());
    assert_eq!(selection.winner.route.provenance.index, 0);
}

#[then("it is addressed as the canonical route")]
fn canonical_target(context: &TestContext) {
    assert_eq!(selection(context).target, SelectableRoute::Canonical);
}

#[then("it is addressed as alternative 0")]
fn first_alternative_target(context: &TestContext) {
    assert_eq!(selection(context).target, SelectableRoute::Alternative(0));
}

#[then("selection fails with no candidates available")]
fn no_candidates(context: &TestContext) {
    assert!(matches!(
        failure(context),
        SelectionError::NoCandidatesAvailable { attempted: 2, ref failed, .. } if failed.len() == 2
    ));
}

#[then("selection fails as cancelled")]
fn cancelled(context: &TestContext) {
    assert_eq!(failure(context), SelectionError::Cancelled);
}

#[scenario(path = "tests/features/route_selection.feature", index = 0)]
fn partial_failure(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/route_selection.feature", index = 1)]
fn total_failure(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/route_selection.feature", index = 2)]
fn motorway_loses(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/route_selection.feature", index = 3)]
fn tie_break(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/route_selection.feature", index = 4)]
fn cancellation(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/route_selection.feature", index = 5)]
fn unmapped_winner_falls_back(context: TestContext) {
    let _ = context;
}

//! Focused unit tests covering select CLI configuration and output.

use super::helpers::StubSelectProviderBuilder;
use super::*;
use crate::select::{
    SelectArgs, SelectConfig, SelectionReport, TargetReport, config_from_layers_for_test,
    parse_coordinate, parse_dialect, run_select_with,
};
use geo::Coord;
use rstest::{fixture, rstest};
use scenic_core::RouteProfile;
use scenic_core::test_support::route_from_names;
use scenic_data::routing::ServiceDialect;

#[fixture]
fn args() -> SelectArgs {
    SelectArgs {
        origin: Some("-3.19,55.95".to_owned()),
        destination: Some("-2.97,56.46".to_owned()),
        ..SelectArgs::default()
    }
}

#[rstest]
#[case::origin(ARG_ORIGIN, ENV_ORIGIN)]
#[case::destination(ARG_DESTINATION, ENV_DESTINATION)]
fn converting_without_an_endpoint_errors(
    args: SelectArgs,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let incomplete = if expected_field == ARG_ORIGIN {
        SelectArgs {
            origin: None,
            ..args
        }
    } else {
        SelectArgs {
            destination: None,
            ..args
        }
    };

    let err = SelectConfig::try_from(incomplete).expect_err("missing endpoint should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn select_config_applies_defaults(args: SelectArgs) {
    let config = SelectConfig::try_from(args).expect("config should build");

    assert_eq!(config.origin, Coord { x: -3.19, y: 55.95 });
    assert_eq!(config.canonical_profile, RouteProfile::automobile());
    assert_eq!(config.profiles, vec![RouteProfile::traffic_avoiding()]);
    assert!(config.preferences.avoid_motorways);
    assert_eq!(config.provider.base_url, "http://localhost:5000");
    assert_eq!(config.provider.service_path, "route/v1");
    assert!(config.provider.access_token.is_none());
    assert_eq!(config.provider.dialect, ServiceDialect::Osrm);
}

#[rstest]
fn select_config_honours_overrides(args: SelectArgs) {
    let overridden = SelectArgs {
        base_url: Some("https://api.mapbox.com".to_owned()),
        service_path: Some("directions/v5/mapbox".to_owned()),
        access_token: Some("pk.test".to_owned()),
        dialect: Some("mapbox".to_owned()),
        canonical_profile: Some("driving-traffic".to_owned()),
        profiles: Some(" driving , ,cycling".to_owned()),
        avoid_motorways: Some(false),
        timeout_secs: Some(5),
        ..args
    };

    let config = SelectConfig::try_from(overridden).expect("config should build");

    assert_eq!(config.canonical_profile, RouteProfile::traffic_avoiding());
    assert_eq!(
        config.profiles,
        vec![RouteProfile::automobile(), RouteProfile::new("cycling")]
    );
    assert!(!config.preferences.avoid_motorways);
    assert_eq!(config.provider.base_url, "https://api.mapbox.com");
    assert_eq!(config.provider.service_path, "directions/v5/mapbox");
    assert_eq!(config.provider.access_token.as_deref(), Some("pk.test"));
    assert_eq!(config.provider.timeout.as_secs(), 5);
    assert_eq!(config.provider.dialect, ServiceDialect::Mapbox);
}

#[rstest]
#[case::osrm("osrm", ServiceDialect::Osrm)]
#[case::mapbox(" Mapbox ", ServiceDialect::Mapbox)]
fn parses_dialects(#[case] raw: &str, #[case] expected: ServiceDialect) {
    assert_eq!(parse_dialect(raw).expect("dialect should parse"), expected);
}

#[rstest]
fn rejects_unknown_dialects(args: SelectArgs) {
    let err = SelectConfig::try_from(SelectArgs {
        dialect: Some("valhalla".to_owned()),
        ..args
    })
    .expect_err("unknown dialect should be rejected");
    match err {
        CliError::InvalidDialect { field, value } => {
            assert_eq!(field, ARG_DIALECT);
            assert_eq!(value, "valhalla");
        }
        other => panic!("expected InvalidDialect, found {other:?}"),
    }
}

#[rstest]
#[case::plain("2.35,48.85", Coord { x: 2.35, y: 48.85 })]
#[case::spaced(" -122.42 , 37.77 ", Coord { x: -122.42, y: 37.77 })]
#[case::bounds("180,-90", Coord { x: 180.0, y: -90.0 })]
fn parses_coordinates(#[case] raw: &str, #[case] expected: Coord<f64>) {
    let parsed = parse_coordinate(ARG_ORIGIN, raw).expect("coordinate should parse");
    assert_eq!(parsed, expected);
}

#[rstest]
#[case::no_comma("2.35 48.85")]
#[case::not_a_number("east,48.85")]
#[case::latitude_out_of_range("2.35,91")]
#[case::longitude_out_of_range("-181,0")]
#[case::nan("NaN,0")]
#[case::extra_component("1,2,3")]
fn rejects_malformed_coordinates(#[case] raw: &str) {
    let err = parse_coordinate(ARG_DESTINATION, raw).expect_err("coordinate should be rejected");
    match err {
        CliError::InvalidCoordinate { field, value } => {
            assert_eq!(field, ARG_DESTINATION);
            assert_eq!(value, raw);
        }
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "origin": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "base_url": "http://from-file:5000",
            "origin": "0,0",
            "profiles": "cycling",
        }),
        None,
    );
    composer.push_environment(json!({
        "origin": "1,1",
        "destination": "2,2",
    }));
    composer.push_cli(json!({
        "destination": "3,3",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.origin, Coord { x: 1.0, y: 1.0 });
    assert_eq!(config.destination, Coord { x: 3.0, y: 3.0 });
    assert_eq!(config.provider.base_url, "http://from-file:5000");
    assert_eq!(config.profiles, vec![RouteProfile::new("cycling")]);
}

#[rstest]
fn prints_the_winner_as_json(args: SelectArgs) {
    let scenic = || route_from_names(&["Mill Lane", "Church Street", "Ridge Way"], 3_000.0);
    let builder = StubSelectProviderBuilder::default()
        .with_routes(
            RouteProfile::automobile(),
            vec![
                route_from_names(&["Coast Road", "Coast Road"], 4_000.0),
                scenic(),
            ],
        )
        .with_routes(RouteProfile::traffic_avoiding(), vec![scenic()]);
    let mut stdout = Vec::new();

    run_select_with(args, &builder, &mut stdout).expect("selection should succeed");

    let report: SelectionReport =
        serde_json::from_slice(&stdout).expect("output should be a JSON selection report");
    assert_eq!(report.profile, "driving");
    assert_eq!(report.index, 1);
    assert_eq!(report.target, TargetReport::Alternative { index: 0 });
    assert_eq!(report.roads, ["Mill Lane", "Church Street", "Ridge Way"]);
    assert_eq!(report.components.len(), 5);
    assert!(report.score > 0.0);
}

#[rstest]
fn target_kinds_serialise_with_a_tag() {
    let alternative =
        serde_json::to_value(TargetReport::Alternative { index: 2 }).expect("serialise target");
    let by_value = serde_json::to_value(TargetReport::ByValue).expect("serialise target");

    assert_eq!(alternative, serde_json::json!({ "kind": "alternative", "index": 2 }));
    assert_eq!(by_value, serde_json::json!({ "kind": "by_value" }));
}

use csg_kernel::{Kernel, MockKernel};
use engine_bridge::messages::*;
use engine_bridge::*;
use layout_engine::ErrorKind;
use solid_builder::{BuildConfig, PartKind};
use tray_types::{
    BoxParams, BuiltinShape, CustomShape, ShapeRef, TopLoadedStack, Tray, TrayParams,
};
use uuid::Uuid;

// ── Helper functions ─────────────────────────────────────────────────────

fn squares(counts: &[u32]) -> TrayParams {
    TrayParams {
        top_loaded_stacks: counts
            .iter()
            .map(|&c| TopLoadedStack::new(BuiltinShape::Square, c))
            .collect(),
        ..TrayParams::default()
    }
}

fn game_box() -> BoxParams {
    BoxParams::new("Game")
        .with_tray(Tray::new("Units", squares(&[12, 8])))
        .with_tray(Tray::new("Markers", squares(&[4])))
}

fn card_tray() -> Tray {
    Tray::new(
        "Cards",
        TrayParams {
            custom_shapes: vec![CustomShape::rectangle("Card", 30.0, 20.0)],
            top_loaded_stacks: vec![
                TopLoadedStack::new(ShapeRef::custom("Card"), 5),
                TopLoadedStack::new(BuiltinShape::Hex, 3),
                TopLoadedStack::new(ShapeRef::custom("Card"), 2),
            ],
            ..TrayParams::default()
        },
    )
}

fn expect_error(response: Response) -> (String, ErrorKind) {
    match response {
        Response::Error { message, kind } => (message, kind),
        other => panic!("expected Error, got {other:?}"),
    }
}

// ── Message serialization ────────────────────────────────────────────────

#[test]
fn request_is_tagged_by_type() {
    let request = Request::GenerateAll {
        box_params: game_box(),
        config: None,
    };
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains(r#""type":"GenerateAll""#), "{json}");
    assert!(json.contains(r#""box_params""#));

    let back: Request = serde_json::from_str(&json).unwrap();
    assert!(matches!(back, Request::GenerateAll { config: None, .. }));
}

#[test]
fn config_may_be_omitted() {
    let json = r#"{"type":"GenerateBox","box_params":{"name":"Empty"}}"#;
    let request: Request = serde_json::from_str(json).unwrap();
    match request {
        Request::GenerateBox { box_params, config } => {
            assert_eq!(box_params.name, "Empty");
            assert!(config.is_none());
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn error_response_carries_kind() {
    let response = Response::Error {
        message: "nope".into(),
        kind: ErrorKind::DimensionConflict,
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["type"], "Error");
    assert_eq!(json["kind"], "DimensionConflict");
}

// ── Dispatch ─────────────────────────────────────────────────────────────

#[test]
fn compute_layout_returns_every_tray() {
    let mut k = MockKernel::new();
    let response = dispatch(
        &mut k,
        Request::ComputeLayout {
            box_params: game_box(),
        },
    );
    match response {
        Response::LayoutComputed { layout } => {
            assert_eq!(layout.name, "Game");
            assert_eq!(layout.trays.len(), 2);
            assert!(layout.dimensions.width >= layout.dimensions.min_width);
        }
        other => panic!("expected LayoutComputed, got {other:?}"),
    }
    assert!(k.ops().is_empty());
}

#[test]
fn generate_tray_returns_one_part() {
    let params = game_box();
    let tray_id = params.trays[1].id;
    let mut k = MockKernel::new();
    let response = dispatch(
        &mut k,
        Request::GenerateTray {
            box_params: params,
            tray_id,
            config: Some(BuildConfig::preview()),
        },
    );
    match response {
        Response::PartsGenerated { parts } => {
            assert_eq!(parts.len(), 1);
            assert_eq!(parts[0].kind, PartKind::Tray);
            assert_eq!(parts[0].id, tray_id);
            assert_eq!(parts[0].name, "Markers");
        }
        other => panic!("expected PartsGenerated, got {other:?}"),
    }
    assert_eq!(k.solid_count(), 0);
}

#[test]
fn generate_all_orders_trays_box_lid() {
    let mut k = MockKernel::new();
    let response = dispatch(
        &mut k,
        Request::GenerateAll {
            box_params: game_box(),
            config: None,
        },
    );
    match response {
        Response::PartsGenerated { parts } => {
            let kinds: Vec<PartKind> = parts.iter().map(|p| p.kind).collect();
            assert_eq!(
                kinds,
                vec![PartKind::Tray, PartKind::Tray, PartKind::Box, PartKind::Lid]
            );
        }
        other => panic!("expected PartsGenerated, got {other:?}"),
    }
}

#[test]
fn analyze_reports_a_clean_box() {
    let mut k = MockKernel::new();
    let response = dispatch(
        &mut k,
        Request::Analyze {
            box_params: game_box(),
            config: Some(BuildConfig::preview()),
        },
    );
    match response {
        Response::AnalysisReady { report } => {
            assert_eq!(report.box_name, "Game");
            assert_eq!(report.meshes.len(), 4);
            assert!(report.is_clean(), "{:?}", report.combined_analysis.issues);
        }
        other => panic!("expected AnalysisReady, got {other:?}"),
    }
}

#[test]
fn unknown_tray_is_invalid_input() {
    let mut k = MockKernel::new();
    let (message, kind) = expect_error(dispatch(
        &mut k,
        Request::GenerateTray {
            box_params: game_box(),
            tray_id: Uuid::new_v4(),
            config: None,
        },
    ));
    assert_eq!(kind, ErrorKind::InvalidInput);
    assert!(message.contains("'Game'"), "{message}");
}

#[test]
fn undersized_box_is_a_dimension_conflict() {
    let mut params = game_box();
    params.custom_width = Some(10.0);
    let mut k = MockKernel::new();
    let (message, kind) = expect_error(dispatch(
        &mut k,
        Request::GenerateBox {
            box_params: params,
            config: None,
        },
    ));
    assert_eq!(kind, ErrorKind::DimensionConflict);
    assert!(message.contains("box 'Game'"), "{message}");
    assert!(k.ops().is_empty());
}

#[test]
fn empty_box_is_invalid_input() {
    let mut k = MockKernel::new();
    let (_, kind) = expect_error(dispatch(
        &mut k,
        Request::ComputeLayout {
            box_params: BoxParams::new("Empty"),
        },
    ));
    assert_eq!(kind, ErrorKind::InvalidInput);
}

#[test]
fn bad_config_is_rejected() {
    let config = BuildConfig {
        circle_segments: 2,
        ..BuildConfig::default()
    };
    let mut k = MockKernel::new();
    let (_, kind) = expect_error(dispatch(
        &mut k,
        Request::GenerateLid {
            box_params: game_box(),
            config: Some(config),
        },
    ));
    assert_eq!(kind, ErrorKind::InvalidInput);
    assert!(k.ops().is_empty());
}

// ── Custom shape deletion ────────────────────────────────────────────────

#[test]
fn deleting_a_custom_shape_migrates_stacks_to_square() {
    let params = BoxParams::new("Game").with_tray(card_tray());
    let tray_id = params.trays[0].id;
    let mut k = MockKernel::new();
    let response = dispatch(
        &mut k,
        Request::DeleteCustomShape {
            box_params: params,
            tray_id,
            shape_name: "Card".into(),
        },
    );
    match response {
        Response::ShapeDeleted {
            box_params,
            migrated_stacks,
        } => {
            assert_eq!(migrated_stacks, 2);
            let tray = &box_params.trays[0].params;
            assert!(tray.custom_shapes.is_empty());
            let shapes: Vec<&ShapeRef> =
                tray.top_loaded_stacks.iter().map(|s| &s.shape).collect();
            assert_eq!(
                shapes,
                vec![
                    &ShapeRef::Builtin(BuiltinShape::Square),
                    &ShapeRef::Builtin(BuiltinShape::Hex),
                    &ShapeRef::Builtin(BuiltinShape::Square),
                ]
            );
        }
        other => panic!("expected ShapeDeleted, got {other:?}"),
    }
}

#[test]
fn deleting_an_unknown_shape_is_invalid_input() {
    let params = BoxParams::new("Game").with_tray(card_tray());
    let tray_id = params.trays[0].id;
    let mut k = MockKernel::new();
    let (message, kind) = expect_error(dispatch(
        &mut k,
        Request::DeleteCustomShape {
            box_params: params,
            tray_id,
            shape_name: "Tile".into(),
        },
    ));
    assert_eq!(kind, ErrorKind::InvalidInput);
    assert!(message.contains("'Tile'"), "{message}");
}

// ── JSON entry point ─────────────────────────────────────────────────────

#[test]
fn malformed_json_becomes_error_response() {
    let out = dispatch_json("{not json");
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["type"], "Error");
    assert_eq!(value["kind"], "InvalidInput");
    assert!(value["message"]
        .as_str()
        .unwrap()
        .starts_with("serialization error"));
}

#[test]
fn json_round_trip_through_mock_kernel() {
    let request = Request::ComputeLayout {
        box_params: game_box(),
    };
    let json = serde_json::to_string(&request).unwrap();
    let out = dispatch_json_with(&mut MockKernel::new(), &json);
    let response: Response = serde_json::from_str(&out).unwrap();
    assert!(matches!(response, Response::LayoutComputed { .. }));
}

#[test]
fn json_generation_with_mesh_kernel() {
    let params = game_box();
    let request = Request::GenerateTray {
        tray_id: params.trays[0].id,
        box_params: params,
        config: Some(BuildConfig::preview()),
    };
    let out = dispatch_json(&serde_json::to_string(&request).unwrap());
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["type"], "PartsGenerated", "{out}");
    assert!(!value["parts"][0]["mesh"]["indices"]
        .as_array()
        .unwrap()
        .is_empty());
}

// ── Regeneration tracking ────────────────────────────────────────────────

#[test]
fn only_the_latest_regeneration_is_shown() {
    let params = game_box();
    let tray_id = params.trays[0].id;
    let mut tracker = RegenerationTracker::new();
    let mut k = MockKernel::new();

    let stale = tracker.begin(tray_id);
    let stale_response = dispatch(
        &mut k,
        Request::GenerateTray {
            box_params: params.clone(),
            tray_id,
            config: None,
        },
    );

    let mut edited = params;
    edited.trays[0].params.wall_thickness = 3.0;
    let fresh = tracker.begin(tray_id);
    let fresh_response = dispatch(
        &mut k,
        Request::GenerateTray {
            box_params: edited,
            tray_id,
            config: None,
        },
    );

    assert!(tracker.complete(stale, stale_response).is_none());
    assert!(matches!(
        tracker.complete(fresh, fresh_response),
        Some(Response::PartsGenerated { .. })
    ));
    assert_eq!(tracker.in_flight(), 0);
}

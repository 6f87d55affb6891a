//! End-to-end layout scenarios: trays planned, arranged and boxed.

use approx::assert_relative_eq;
use layout_engine::{
    arrange_trays, compute_box_layout, compute_tray_layout, plan_stacks, Dimension, ErrorKind,
    LayoutError, Row, TrayFootprint,
};
use tray_types::{
    BoxParams, BuiltinShape, CustomShape, EdgeLoadedStack, ShapeRef, TopLoadedStack, Tray,
    TrayParams,
};
use uuid::Uuid;

fn square_tray(name: &str, counts: &[u32]) -> Tray {
    Tray::new(
        name,
        TrayParams {
            top_loaded_stacks: counts
                .iter()
                .map(|&c| TopLoadedStack::new(BuiltinShape::Square, c))
                .collect(),
            ..TrayParams::default()
        },
    )
}

// ── Scenario A: two top-loaded square stacks ───────────────────────────

#[test]
fn two_square_stacks_make_one_column_two_rows() {
    let tray = square_tray("Units", &[12, 8]);
    let p = &tray.params;
    let layout = compute_tray_layout(&tray, None).unwrap();

    let rows: Vec<Row> = layout.stacks.placements.iter().map(|s| s.row).collect();
    assert_eq!(rows, vec![Row::Front, Row::Back]);
    assert_relative_eq!(
        layout.stacks.placements[0].x,
        layout.stacks.placements[1].x
    );

    let pocket = p.square_width + p.clearance;
    assert_relative_eq!(layout.dimensions.width, 2.0 * p.wall_thickness + pocket);
    assert_relative_eq!(
        layout.dimensions.height,
        p.floor_thickness + 12.0 * p.counter_thickness + p.rim_height,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        layout.dimensions.depth,
        3.0 * p.wall_thickness + 2.0 * pocket
    );
}

// ── Scenario B: one lengthwise edge-loaded stack ───────────────────────

#[test]
fn lone_lengthwise_stack_sets_front_row_length() {
    let params = TrayParams {
        counter_thickness: 1.3,
        edge_loaded_stacks: vec![EdgeLoadedStack::lengthwise(BuiltinShape::Square, 10)],
        ..TrayParams::default()
    };
    let layout = plan_stacks(&params, "tray 'Edge'").unwrap();
    let slot_depth = params.square_width + params.clearance;
    let radius = params.cutout_max.min(slot_depth * params.cutout_ratio);
    let wall = params.wall_thickness;

    assert_relative_eq!(
        layout.front_end_x,
        wall + 10.0 * 1.3 + radius + wall,
        epsilon = 1e-9
    );
    assert!(layout.in_row(Row::Back).next().is_none());
    assert_relative_eq!(layout.back_depth, 0.0);
}

// ── Scenario C: trays of width 80/50/50 in an 80-wide box ──────────────

#[test]
fn wide_tray_alone_then_one_row_per_narrow_tray() {
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let footprints: Vec<TrayFootprint> = [80.0, 50.0, 50.0]
        .iter()
        .zip(ids)
        .map(|(&width, tray_id)| TrayFootprint {
            tray_id,
            width,
            depth: 30.0,
            height: 20.0,
        })
        .collect();
    let arr = arrange_trays(&footprints, Some(80.0));

    let rows: Vec<usize> = arr.placements.iter().map(|p| p.row).collect();
    assert_eq!(rows, vec![0, 1, 2]);
    for p in &arr.placements {
        assert_relative_eq!(p.x, 0.0);
    }
    assert_relative_eq!(arr.placements[1].y, 30.0);
    assert_relative_eq!(arr.placements[2].y, 60.0);
    assert_relative_eq!(arr.packed_width, 80.0);
    assert_relative_eq!(arr.packed_depth, 90.0);
}

// ── Scenario D: custom width below minimum ─────────────────────────────

#[test]
fn narrow_custom_width_reports_unmet_minimum() {
    let mut params = BoxParams::new("Game").with_tray(square_tray("Units", &[12, 8]));
    params.custom_width = Some(10.0);
    let layout = compute_box_layout(&params).unwrap();
    let dims = &layout.dimensions;

    assert_relative_eq!(dims.width, 10.0);
    assert!(dims.min_width > 10.0);
    let err = dims.check("box 'Game'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DimensionConflict);
    match err {
        LayoutError::DimensionConflict {
            dimension,
            requested,
            minimum,
            ..
        } => {
            assert_eq!(dimension, Dimension::Width);
            assert_relative_eq!(requested, 10.0);
            assert_relative_eq!(minimum, dims.min_width);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── Gap fills ──────────────────────────────────────────────────────────

fn oversized_box(fill_solid: bool) -> BoxParams {
    let mut params = BoxParams::new("Game").with_tray(square_tray("Units", &[6]));
    params.custom_width = Some(80.0);
    params.custom_depth = Some(60.0);
    params.fill_solid_empty = fill_solid;
    params
}

#[test]
fn solid_fill_replaces_retaining_walls() {
    let layout = compute_box_layout(&oversized_box(true)).unwrap();
    let fills = &layout.gap_fills;
    assert!(fills.east_fill.unwrap().volume() > 0.0);
    assert!(fills.north_fill.unwrap().volume() > 0.0);
    assert!(fills.east_wall.is_none() && fills.north_wall.is_none());
    assert!(fills.hollowed().next().is_none());
}

#[test]
fn partition_walls_replace_solid_fill() {
    let layout = compute_box_layout(&oversized_box(false)).unwrap();
    let fills = &layout.gap_fills;
    assert!(fills.east_fill.is_none() && fills.north_fill.is_none());
    assert_relative_eq!(fills.fill_volume(), 0.0);
    let east = fills.east_wall.unwrap();
    assert_relative_eq!(east.size()[0], 3.0);
    assert!(fills.wall_volume() > 0.0);
    assert_eq!(fills.hollowed().count(), 2);
}

#[test]
fn flush_box_has_no_gap_regions() {
    let params = BoxParams::new("Game").with_tray(square_tray("Units", &[6]));
    let layout = compute_box_layout(&params).unwrap();
    assert_eq!(layout.gap_fills, Default::default());
}

// ── Errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_custom_shape_names_tray() {
    let tray = Tray::new(
        "Cards",
        TrayParams {
            top_loaded_stacks: vec![TopLoadedStack::new(ShapeRef::custom("Tarot"), 20)],
            ..TrayParams::default()
        },
    );
    let err = compute_tray_layout(&tray, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.to_string(), "tray 'Cards': shape 'Tarot' is not defined");
}

#[test]
fn deleted_shape_falls_back_to_square_layout() {
    let mut params = TrayParams {
        custom_shapes: vec![CustomShape::rectangle("Tarot", 70.0, 120.0)],
        top_loaded_stacks: vec![TopLoadedStack::new(ShapeRef::custom("Tarot"), 20)],
        ..TrayParams::default()
    };
    assert_eq!(params.delete_custom_shape("Tarot"), Some(1));
    let layout = plan_stacks(&params, "t").unwrap();
    assert_relative_eq!(layout.placements[0].width, 16.5);
}

#[test]
fn layout_serializes_as_camel_case() {
    let layout = compute_box_layout(
        &BoxParams::new("Game").with_tray(square_tray("Units", &[3])),
    )
    .unwrap();
    let json = serde_json::to_value(&layout).unwrap();
    assert!(json["dimensions"]["minWidth"].is_number());
    assert!(json["trays"][0]["stacks"]["placements"][0]["stackHeight"].is_number());
    assert_eq!(json["arrangement"]["rowCount"], 1);
}

// ── Mixed shapes: adding a stack may repack rows ───────────────────────

#[test]
fn adding_a_mixed_shape_stack_keeps_every_pocket_inside() {
    let mut params = TrayParams {
        wall_thickness: 1.0,
        counter_thickness: 0.8,
        square_width: 8.0,
        hex_width: 14.26,
        hex_pointy_top: true,
        edge_loaded_stacks: vec![EdgeLoadedStack::crosswise(BuiltinShape::Square, 21)],
        top_loaded_stacks: vec![
            TopLoadedStack::new(BuiltinShape::Circle, 1),
            TopLoadedStack::new(BuiltinShape::Hex, 1),
        ],
        ..TrayParams::default()
    };
    let before = plan_stacks(&params, "t").unwrap();
    params
        .top_loaded_stacks
        .push(TopLoadedStack::new(BuiltinShape::Circle, 1));
    let after = plan_stacks(&params, "t").unwrap();

    assert_eq!(after.placements.len(), before.placements.len() + 1);
    // Greedy row assignment is recomputed from scratch, so depth is not
    // monotonic here; only containment and width growth are guaranteed.
    assert!(after.packed_width() >= before.packed_width() - 1e-9);
    for p in &after.placements {
        assert!(p.x >= 0.0 && p.y >= 0.0, "{p:?}");
        assert!(p.x + p.width <= after.packed_width() + 1e-9, "{p:?}");
        assert!(p.y + p.depth <= after.depth + 1e-9, "{p:?}");
    }
}

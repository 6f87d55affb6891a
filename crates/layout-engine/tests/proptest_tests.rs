//! Property-based tests for layout invariants using the `proptest` crate.

use proptest::prelude::*;

use layout_engine::{
    arrange_trays, compute_box_layout, plan_stacks, tray_dimensions, TrayFootprint,
};
use tray_types::{BoxParams, BuiltinShape, EdgeLoadedStack, TopLoadedStack, Tray, TrayParams};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_builtin() -> impl Strategy<Value = BuiltinShape> {
    prop_oneof![
        Just(BuiltinShape::Square),
        Just(BuiltinShape::Hex),
        Just(BuiltinShape::Circle),
        Just(BuiltinShape::Triangle),
    ]
}

fn arb_top_stack() -> impl Strategy<Value = TopLoadedStack> {
    (arb_builtin(), 1u32..30).prop_map(|(shape, count)| TopLoadedStack::new(shape, count))
}

fn arb_edge_stack() -> impl Strategy<Value = EdgeLoadedStack> {
    (arb_builtin(), 1u32..25, any::<bool>()).prop_map(|(shape, count, lengthwise)| {
        if lengthwise {
            EdgeLoadedStack::lengthwise(shape, count)
        } else {
            EdgeLoadedStack::crosswise(shape, count)
        }
    })
}

/// Tray parameters with global shape sizes and a random mix of stacks.
fn arb_tray_params() -> impl Strategy<Value = TrayParams> {
    (
        8.0f64..30.0,
        8.0f64..30.0,
        any::<bool>(),
        0.8f64..3.0,
        1.0f64..4.0,
        prop::collection::vec(arb_top_stack(), 0..6),
        prop::collection::vec(arb_edge_stack(), 0..5),
    )
        .prop_filter("tray needs at least one stack", |t| !t.5.is_empty() || !t.6.is_empty())
        .prop_map(|(square, hex, pointy, thickness, wall, top, edge)| TrayParams {
            square_width: square,
            hex_width: hex,
            hex_pointy_top: pointy,
            counter_thickness: thickness,
            wall_thickness: wall,
            top_loaded_stacks: top,
            edge_loaded_stacks: edge,
            ..TrayParams::default()
        })
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Planned footprints never overlap and stay inside the tray
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn footprints_do_not_overlap(params in arb_tray_params()) {
        // Oversized crosswise stacks are a legitimate rejection.
        let Ok(layout) = plan_stacks(&params, "t") else {
            return Ok(());
        };
        let dims = tray_dimensions(&params, &layout, None);
        let items = &layout.placements;
        prop_assert_eq!(items.len(), params.stack_count());
        for (i, a) in items.iter().enumerate() {
            prop_assert!(a.x >= -TOL && a.y >= -TOL, "{:?}", a);
            prop_assert!(a.max_x() <= dims.width + TOL, "{:?} past width {}", a, dims.width);
            prop_assert!(a.max_y() <= dims.depth + TOL, "{:?} past depth {}", a, dims.depth);
            for b in &items[i + 1..] {
                prop_assert!(!a.overlaps(b, TOL), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Adding a stack of the same shape never shrinks the tray
//
// Holds for trays where every stack shares one built-in shape. Mixed shapes
// can repack rows and shrink depth; see the mixed-shape scenario test.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn adding_a_stack_never_shrinks(shape in arb_builtin(), counts in prop::collection::vec(1u32..30, 1..8), extra in 1u32..30) {
        let mut params = TrayParams {
            top_loaded_stacks: counts.iter().map(|&c| TopLoadedStack::new(shape, c)).collect(),
            ..TrayParams::default()
        };
        let before = tray_dimensions(&params, &plan_stacks(&params, "t").unwrap(), None);
        params.top_loaded_stacks.push(TopLoadedStack::new(shape, extra));
        let after = tray_dimensions(&params, &plan_stacks(&params, "t").unwrap(), None);
        prop_assert!(after.width >= before.width - TOL);
        prop_assert!(after.depth >= before.depth - TOL);
        prop_assert!(after.height >= before.height - TOL);
    }

    #[test]
    fn adding_a_lengthwise_slot_never_shrinks(shape in arb_builtin(), n in 1usize..8, count in 1u32..20) {
        let mut params = TrayParams {
            edge_loaded_stacks: vec![EdgeLoadedStack::lengthwise(shape, count); n],
            ..TrayParams::default()
        };
        let before = tray_dimensions(&params, &plan_stacks(&params, "t").unwrap(), None);
        params.edge_loaded_stacks.push(EdgeLoadedStack::lengthwise(shape, count));
        let after = tray_dimensions(&params, &plan_stacks(&params, "t").unwrap(), None);
        prop_assert!(after.width >= before.width - TOL);
        prop_assert!(after.depth >= before.depth - TOL);
    }
}

// ---------------------------------------------------------------------------
// 3. Layout is a pure function of its input
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn box_layout_is_idempotent(trays in prop::collection::vec(arb_tray_params(), 1..4), custom_w in prop::option::of(20.0f64..300.0)) {
        let mut params = BoxParams::new("Game");
        for (i, t) in trays.into_iter().enumerate() {
            params = params.with_tray(Tray::new(format!("Tray {i}"), t));
        }
        params.custom_width = custom_w;
        let first = compute_box_layout(&params);
        let second = compute_box_layout(&params);
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// 4. A target height only ever adds a floor spacer
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn target_height_adds_exact_spacer(params in arb_tray_params(), target in 0.0f64..120.0) {
        let Ok(layout) = plan_stacks(&params, "t") else {
            return Ok(());
        };
        let plain = tray_dimensions(&params, &layout, None);
        let raised = tray_dimensions(&params, &layout, Some(target));
        if target >= plain.base_height {
            prop_assert!((raised.height - (plain.height + target - plain.base_height)).abs() < TOL);
        } else {
            prop_assert!((raised.height - plain.base_height).abs() < TOL);
        }
        prop_assert!(raised.floor_spacer >= 0.0);
        prop_assert_eq!(raised.width, plain.width);
        prop_assert_eq!(raised.depth, plain.depth);
    }
}

// ---------------------------------------------------------------------------
// 5. Arranged trays never overlap
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn arranged_trays_do_not_overlap(sizes in prop::collection::vec((10.0f64..120.0, 10.0f64..80.0), 1..8), cap in prop::option::of(50.0f64..300.0)) {
        let footprints: Vec<TrayFootprint> = sizes
            .iter()
            .map(|&(width, depth)| TrayFootprint { tray_id: Uuid::new_v4(), width, depth, height: 10.0 })
            .collect();
        let arr = arrange_trays(&footprints, cap);
        for (i, a) in arr.placements.iter().enumerate() {
            prop_assert!(a.x + a.width <= arr.packed_width + TOL);
            prop_assert!(a.y + a.depth <= arr.packed_depth + TOL);
            for b in &arr.placements[i + 1..] {
                let apart = a.x + a.width <= b.x + TOL
                    || b.x + b.width <= a.x + TOL
                    || a.y + a.depth <= b.y + TOL
                    || b.y + b.depth <= a.y + TOL;
                prop_assert!(apart, "{:?} overlaps {:?}", a, b);
            }
        }
    }
}

//! Layout engine for counter trays and the boxes that hold them.
//!
//! Every function here is a pure computation over the parameter tree in
//! `tray-types`: shapes resolve to pocket metrics, stacks are planned into two
//! rows per tray, trays are arranged into rows inside a box, and the box is
//! sized around them. No geometry is built; the results are plain data that
//! the solid builder, a viewer or the analysis tools can consume.

pub mod box_dims;
pub mod box_layout;
pub mod error;
pub mod shape_metrics;
pub mod stack_layout;
pub mod tray_arrange;
pub mod tray_dims;
pub mod validate;

pub use box_dims::{box_dimensions, gap_fills, BoxDimensions, DimensionShortfall, FillRegion, GapFills};
pub use box_layout::{compute_box_layout, BoxLayout, PlacedTray};
pub use error::{subject_name, Dimension, ErrorKind, LayoutError, Result};
pub use shape_metrics::{resolve_shape, PocketOutline, ShapeMetrics};
pub use stack_layout::{plan_stacks, Row, SlotKind, StackLayout, StackPlacement};
pub use tray_arrange::{arrange_trays, Arrangement, TrayFootprint, TrayPlacement};
pub use tray_dims::{compute_tray_layout, scoop_cells, tray_dimensions, ScoopCell, TrayDimensions, TrayLayout};

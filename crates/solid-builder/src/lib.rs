//! Tray, box and lid solids built from a computed layout.
//!
//! Builders take any [`csg_kernel::Kernel`]; they gather every cutter for a
//! part and subtract them in one pass, then union any added features.
//! Kernel failures propagate unchanged as [`BuildError::Kernel`].

pub mod box_builder;
pub mod config;
pub mod error;
pub mod font;
pub mod generate;
pub mod lid;
pub mod seat;
pub mod text;
pub mod tray;

pub use box_builder::build_box;
pub use config::BuildConfig;
pub use error::BuildError;
pub use generate::{
    buildable_layout, generate_all, generate_box, generate_lid, generate_tray, PartKind, PartMesh,
};
pub use lid::{build_lid, build_lid_assembled, lid_height};
pub use text::TextOutline;
pub use tray::build_tray;

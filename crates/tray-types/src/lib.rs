//! Shared data model for counter trays, storage boxes and lids.
//!
//! Everything here is plain serializable data. Layout and geometry live in
//! `layout-engine` and `solid-builder`; this crate only describes what the
//! user asked for.

pub mod box_params;
pub mod lid;
pub mod migrate;
pub mod shape;
pub mod stack;
pub mod tray;

pub use box_params::*;
pub use lid::*;
pub use shape::*;
pub use stack::*;
pub use tray::*;

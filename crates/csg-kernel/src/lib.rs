//! Solid modeling kernel for the tray, box and lid builders.
//!
//! Solids are boundary meshes of convex polygons combined with BSP-tree
//! booleans. The [`Kernel`] trait is the seam the builders depend on, so the
//! geometry can be swapped for the bounding-box [`MockKernel`] in tests.

pub mod bsp;
pub mod bsp_kernel;
pub mod mock_kernel;
pub mod primitives;
pub mod solid;
pub mod traits;
pub mod types;

pub use bsp_kernel::BspKernel;
pub use mock_kernel::{MockKernel, MockOp};
pub use traits::Kernel;
pub use types::*;

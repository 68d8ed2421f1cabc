//! Software bit-plane graphics.

pub mod compose;
pub mod palette;
pub mod plane;
pub mod raster;

pub use compose::{Compositor, Framebuffer, compose_indices};
pub use palette::{Color, Palette};
pub use plane::{Plane, PlaneMask, PlaneStore};
pub use raster::{Placement, Rasterizer, SOURCE_HEIGHT, SOURCE_WIDTH};

//! Prelude module for `sota_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use sota_types::prelude::*;
//!
//! let revision = FormatRevision::four_plane();
//! let mut plane = Plane::new(0, 16, 16);
//! Rasterizer::new().fill(&mut plane, Polygon::from_pairs(&[(0, 0), (0, 8), (8, 0)]).vertices(), true);
//! assert_eq!(revision.plane_count, MAX_PLANES);
//! ```

// Script and decoding
#[doc(inline)]
pub use crate::anim::{
	CommandKind, DrawOp, FormatRevision, FrameDecoder, MAX_PLANES, Polygon, Script, TweenRef, UnknownPolicy, Vertex,
	tween,
};

// Graphics
#[doc(inline)]
pub use crate::gfx::{
	Color, Compositor, Framebuffer, Palette, Placement, Plane, PlaneMask, PlaneStore, Rasterizer, compose_indices,
};

// Errors
#[doc(inline)]
pub use crate::error::{SotaError, TweenFault};

// Rendering and playback
#[doc(inline)]
pub use crate::{
	playback::{DEFAULT_FRAME_INTERVAL, Playback, Tick},
	render::{FrameReport, Renderer},
};

// Re-export the module tree for advanced usage
#[doc(inline)]
pub use crate::{anim, gfx};

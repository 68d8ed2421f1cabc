//! This module is separated into its own crate to enable simple dynamic linking for `sota`, and should not be used directly.

/// `use sota::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export sota_types for convenience
pub use sota_types;

// Re-export commonly used types at crate root
pub use sota_types::{
	anim::{FormatRevision, Script},
	error::SotaError,
	render::{FrameReport, Renderer},
};

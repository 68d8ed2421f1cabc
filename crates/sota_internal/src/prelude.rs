//! Prelude module for `sota_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use sota_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let script = Script::new(vec![0], vec![1, 0xD2, 3, 0, 0, 0, 10, 10, 0]).unwrap();
//! let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 16, 16).unwrap();
//! let report = renderer.render_frame(0).unwrap();
//! assert!(report.is_clean());
//! ```

// Re-export everything from sota_types::prelude
#[doc(inline)]
pub use sota_types::prelude::*;

// Re-export the entire sota_types module for advanced usage
#[doc(inline)]
pub use sota_types;

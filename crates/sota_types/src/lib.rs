//! This crate provides the script format and software rendering pipeline for the `sota-rs` project.
//!
//! # Pipeline
//!
//! - **Script**: a frame index list plus a flat command stream ([`anim::script`])
//! - **Decode**: each frame's draw list becomes a sequence of draw operations ([`anim::decode`])
//! - **Tween**: shapes interpolated from two encoded polygons ([`anim::tween`])
//! - **Raster**: scanline XOR fill into simulated bit-planes ([`gfx::raster`])
//! - **Compose**: planes OR-ed into palette indices, then colors ([`gfx::compose`])
//!
//! [`render::Renderer`] runs the whole pipeline for one frame and [`playback::Playback`]
//! picks which frame is due.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use sota_types::prelude::*;
//!
//! # fn main() -> Result<(), SotaError> {
//! let script = Script::open("script067230.json")?;
//! let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 256, 204)?;
//! let mut playback = Playback::new(renderer.frame_count());
//!
//! while let Some(index) = playback.step() {
//!     let report = renderer.render_frame(index)?;
//!     let rgba = renderer.framebuffer().to_rgba_bytes();
//!     // hand `rgba` to a window or an encoder
//! #   let _ = (report, rgba);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use sota_types::anim::{FormatRevision, Script};
//!
//! let script = Script::open("script067230.bin").unwrap();
//! for op in script.frame(0, &FormatRevision::four_plane()).unwrap() {
//!     println!("{}", op.unwrap());
//! }
//! ```

pub mod anim;
pub mod error;
pub mod gfx;
pub mod playback;
pub mod render;

/// `use sota_types::prelude::*;` to import commonly used items.
pub mod prelude;

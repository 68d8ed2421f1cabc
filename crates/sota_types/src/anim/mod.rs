//! Animation script decoding.
//!
//! - [`script`]: the frame index list and command stream
//! - [`format`]: per-revision command tables
//! - [`decode`]: the lazy per-frame command decoder
//! - [`polygon`]: vertices and polygon records
//! - [`tween`]: shape interpolation between two encoded polygons

pub mod decode;
pub mod format;
pub mod polygon;
pub mod script;
pub mod tween;

pub use decode::{DrawOp, FrameDecoder, TweenRef};
pub use format::{CommandKind, FormatRevision, IgnoredCommand, MAX_PLANES, TweenCommand, UnknownPolicy};
pub use polygon::{Polygon, Vertex};
pub use script::Script;
pub use tween::{tween, tween_ref};

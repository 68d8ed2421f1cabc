//! Format revision tables.
//!
//! Different captures of the animation format use different subsets of the command byte
//! space. Rather than hard-coding one of them, the decoder is driven by a
//! [`FormatRevision`] table: which bytes draw polygons and into which plane, which bytes
//! tween, which bytes carry an opaque payload to skip, and what to do with anything else.
//!
//! Revisions are plain data and (de)serialize with `serde`, so a new capture can be
//! described in a TOML or JSON file without touching the decoder.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::SotaError;

/// Maximum number of planes a revision may declare (palette holds `1 << 4` entries).
pub const MAX_PLANES: usize = 4;

/// First command byte of the polygon range in every known capture.
pub const DEFAULT_POLYGON_BASE: u8 = 0xD0;

/// A tween command byte and the plane its synthesized polygon is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweenCommand {
	/// Command byte
	pub command: u8,
	/// Target plane
	pub plane: u8,
}

/// A command byte whose fixed-size payload is skipped without visible effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredCommand {
	/// Command byte
	pub command: u8,
	/// Payload size in bytes following the command byte
	pub payload: usize,
}

/// What the decoder does with a command byte outside every recognized set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum UnknownPolicy {
	/// Log the command, skip a fixed number of bytes and keep decoding
	Skip {
		/// Bytes to skip after the command byte
		bytes: usize,
	},
	/// Log the command and abandon the rest of the frame
	Abort,
}

/// Classification of a single command byte under a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
	/// Polygon draw into `plane`
	Polygon {
		/// Target plane
		plane: u8,
	},
	/// Tween draw into `plane`
	Tween {
		/// Target plane
		plane: u8,
	},
	/// Opaque payload of `payload` bytes
	Ignored {
		/// Payload size
		payload: usize,
	},
	/// Not recognized
	Unknown,
}

/// Command mapping for one revision of the animation format.
///
/// # Presets
///
/// - [`FormatRevision::four_plane`]: the full capture; `0xD2..=0xD5` select planes 0-3,
///   `0xE6`/`0xE8` tween into planes 0 and 2, `0xF2` carries a 6-byte payload.
/// - [`FormatRevision::single_plane`]: the reduced capture used by the native player;
///   every polygon command draws into the only plane, no tweens, at most 6 draws per
///   frame, and unknown commands abort the frame.
///
/// # Examples
///
/// ```
/// use sota_types::anim::format::{CommandKind, FormatRevision};
///
/// let revision = FormatRevision::four_plane();
/// assert_eq!(revision.classify(0xD3), CommandKind::Polygon { plane: 1 });
/// assert_eq!(revision.classify(0xE8), CommandKind::Tween { plane: 2 });
/// assert_eq!(revision.classify(0x42), CommandKind::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRevision {
	/// Human readable name
	pub name: String,
	/// Number of planes the compositor combines
	pub plane_count: usize,
	/// First byte of the contiguous polygon command range
	pub polygon_base: u8,
	/// Plane for each byte of the polygon range; its length is the range length
	pub plane_map: Vec<u8>,
	/// Recognized tween commands
	#[serde(default)]
	pub tweens: Vec<TweenCommand>,
	/// Recognized fixed-payload commands that draw nothing
	#[serde(default)]
	pub ignored: Vec<IgnoredCommand>,
	/// Handling of unrecognized command bytes
	pub unknown: UnknownPolicy,
	/// Upper bound on the per-frame draw count; `None` accepts any count including zero
	#[serde(default)]
	pub max_draws_per_frame: Option<u8>,
}

impl FormatRevision {
	/// Four planes, tweens and the `0xF2` payload command.
	pub fn four_plane() -> Self {
		let mut plane_map = vec![0u8; 16];
		plane_map[0x2] = 0;
		plane_map[0x3] = 1;
		plane_map[0x4] = 2;
		plane_map[0x5] = 3;

		Self {
			name: "four-plane".to_string(),
			plane_count: 4,
			polygon_base: DEFAULT_POLYGON_BASE,
			plane_map,
			tweens: vec![
				TweenCommand {
					command: 0xE6,
					plane: 0,
				},
				TweenCommand {
					command: 0xE8,
					plane: 2,
				},
			],
			ignored: vec![IgnoredCommand {
				command: 0xF2,
				payload: 6,
			}],
			unknown: UnknownPolicy::Skip {
				bytes: 6,
			},
			max_draws_per_frame: None,
		}
	}

	/// One plane, polygons only, 1 to 6 draws per frame.
	pub fn single_plane() -> Self {
		Self {
			name: "single-plane".to_string(),
			plane_count: 1,
			polygon_base: DEFAULT_POLYGON_BASE,
			plane_map: vec![0u8; 16],
			tweens: Vec::new(),
			ignored: Vec::new(),
			unknown: UnknownPolicy::Abort,
			max_draws_per_frame: Some(6),
		}
	}

	/// Command bytes that draw polygons.
	pub fn polygon_range(&self) -> RangeInclusive<u8> {
		let last = usize::from(self.polygon_base) + self.plane_map.len().saturating_sub(1);
		self.polygon_base..=last.min(0xFF) as u8
	}

	/// Returns `true` if `command` is in the polygon range.
	#[inline]
	pub fn is_polygon(&self, command: u8) -> bool {
		!self.plane_map.is_empty() && self.polygon_range().contains(&command)
	}

	/// Classifies a command byte.
	pub fn classify(&self, command: u8) -> CommandKind {
		if self.is_polygon(command) {
			let plane = self.plane_map[usize::from(command - self.polygon_base)];
			return CommandKind::Polygon {
				plane,
			};
		}

		if let Some(tween) = self.tweens.iter().find(|t| t.command == command) {
			return CommandKind::Tween {
				plane: tween.plane,
			};
		}

		if let Some(ignored) = self.ignored.iter().find(|i| i.command == command) {
			return CommandKind::Ignored {
				payload: ignored.payload,
			};
		}

		CommandKind::Unknown
	}

	/// Checks the table for internal consistency.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidFormat`] if the plane count is out of range, a mapping
	/// names a plane that does not exist, the polygon range overflows the byte space, or
	/// a command byte belongs to more than one set.
	pub fn validate(&self) -> Result<(), SotaError> {
		if self.plane_count == 0 || self.plane_count > MAX_PLANES {
			return Err(SotaError::InvalidFormat(format!(
				"plane count {} not in 1..={}",
				self.plane_count, MAX_PLANES
			)));
		}

		if self.plane_map.is_empty() {
			return Err(SotaError::InvalidFormat("empty polygon plane map".to_string()));
		}

		if usize::from(self.polygon_base) + self.plane_map.len() > 0x100 {
			return Err(SotaError::InvalidFormat(format!(
				"polygon range {:#04x}+{} exceeds the byte space",
				self.polygon_base,
				self.plane_map.len()
			)));
		}

		let planes = self.plane_map.iter().copied().chain(self.tweens.iter().map(|t| t.plane));
		for plane in planes {
			if usize::from(plane) >= self.plane_count {
				return Err(SotaError::InvalidFormat(format!(
					"plane {} not below plane count {}",
					plane, self.plane_count
				)));
			}
		}

		let mut seen = [false; 256];
		for command in self.polygon_range() {
			seen[usize::from(command)] = true;
		}
		let extra = self.tweens.iter().map(|t| t.command).chain(self.ignored.iter().map(|i| i.command));
		for command in extra {
			if seen[usize::from(command)] {
				return Err(SotaError::InvalidFormat(format!(
					"command {:#04x} assigned more than once",
					command
				)));
			}
			seen[usize::from(command)] = true;
		}

		Ok(())
	}
}

impl Default for FormatRevision {
	fn default() -> Self {
		Self::four_plane()
	}
}

impl std::fmt::Display for FormatRevision {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let range = self.polygon_range();
		write!(
			f,
			"{} ({} planes, polygons {:#04x}..={:#04x}, {} tween, {} ignored)",
			self.name,
			self.plane_count,
			range.start(),
			range.end(),
			self.tweens.len(),
			self.ignored.len()
		)
	}
}

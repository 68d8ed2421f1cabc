//! Command stream decoder.
//!
//! ## Frame Layout
//!
//! Each frame offset points at a draw list:
//!
//! ```text
//! Offset  Size  Field       Description
//! ------  ----  ----------  ------------------------------------------
//! +0x00   1     num_draws   Number of commands that follow
//! +0x01   ...   commands    num_draws commands, back to back
//! ```
//!
//! ## Commands
//!
//! | Kind     | Layout after the command byte                                   |
//! |----------|-----------------------------------------------------------------|
//! | Polygon  | `count`, then `count` × (`y`, `x`)                              |
//! | Tween    | `back: u16 BE`, `fwd: u16 BE`, `t: u8`, `t_max: u8`             |
//! | Ignored  | fixed payload, size from the [`FormatRevision`]                 |
//!
//! Tween deltas are measured from the byte right after the tween command:
//! `from = pos - back`, `to = pos + fwd`. Both must land on a polygon command byte.
//!
//! The decoder never draws anything; it only yields [`DrawOp`]s and advances its
//! cursor, so decoding the same `(data, offset)` always produces the same sequence.

use log::{debug, trace, warn};

use crate::error::{SotaError, TweenFault};

use super::{
	format::{CommandKind, FormatRevision, UnknownPolicy},
	polygon::Polygon,
};

/// Size of a tween command payload in bytes.
pub const TWEEN_PAYLOAD_SIZE: usize = 6;

/// Number of operand bytes shown when logging an unknown command.
const OPERAND_PREVIEW: usize = 8;

/// Parameters of a tween command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenRef {
	/// Offset of the source polygon command byte
	pub from_offset: usize,
	/// Offset of the destination polygon command byte
	pub to_offset: usize,
	/// Position in the tween
	pub t: u8,
	/// Length of the tween
	pub t_max: u8,
}

/// A decoded draw operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
	/// Fill a polygon into a plane
	Polygon {
		/// Offset of the command byte
		offset: usize,
		/// Command byte
		command: u8,
		/// Target plane
		plane: u8,
		/// Vertices
		polygon: Polygon,
	},

	/// Fill a polygon interpolated between two earlier polygon records
	Tween {
		/// Offset of the command byte
		offset: usize,
		/// Command byte
		command: u8,
		/// Target plane
		plane: u8,
		/// Tween parameters
		tween: TweenRef,
	},

	/// A command that draws nothing
	Skip {
		/// Offset of the command byte
		offset: usize,
		/// Command byte
		command: u8,
		/// Payload bytes skipped after the command byte
		skip_bytes: usize,
	},
}

impl DrawOp {
	/// Offset of the command byte.
	pub fn offset(&self) -> usize {
		match self {
			Self::Polygon {
				offset,
				..
			}
			| Self::Tween {
				offset,
				..
			}
			| Self::Skip {
				offset,
				..
			} => *offset,
		}
	}

	/// Command byte.
	pub fn command(&self) -> u8 {
		match self {
			Self::Polygon {
				command,
				..
			}
			| Self::Tween {
				command,
				..
			}
			| Self::Skip {
				command,
				..
			} => *command,
		}
	}

	/// Target plane, if the operation draws.
	pub fn plane(&self) -> Option<u8> {
		match self {
			Self::Polygon {
				plane,
				..
			}
			| Self::Tween {
				plane,
				..
			} => Some(*plane),
			Self::Skip {
				..
			} => None,
		}
	}
}

impl std::fmt::Display for DrawOp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Polygon {
				offset,
				command,
				plane,
				polygon,
			} => write!(f, "{:#06x} {:02X} polygon plane={} vertices={}", offset, command, plane, polygon.len()),
			Self::Tween {
				offset,
				command,
				plane,
				tween,
			} => write!(
				f,
				"{:#06x} {:02X} tween plane={} from={:#06x} to={:#06x} t={}/{}",
				offset, command, plane, tween.from_offset, tween.to_offset, tween.t, tween.t_max
			),
			Self::Skip {
				offset,
				command,
				skip_bytes,
			} => write!(f, "{:#06x} {:02X} skip {} bytes", offset, command, skip_bytes),
		}
	}
}

/// Lazy decoder over one frame's draw list.
///
/// The iterator yields `Result<DrawOp, SotaError>`; after the first error it yields
/// nothing more. Cloning the decoder restarts from the clone point.
///
/// # Examples
///
/// ```
/// use sota_types::anim::{decode::FrameDecoder, format::FormatRevision};
///
/// // one draw: polygon command 0xD2 with a single vertex
/// let data = [1, 0xD2, 1, 5, 6];
/// let revision = FormatRevision::four_plane();
/// let mut decoder = FrameDecoder::new(&data, 0, &revision);
///
/// let op = decoder.next().unwrap()?;
/// assert_eq!(op.plane(), Some(0));
/// assert!(decoder.next().is_none());
/// assert_eq!(decoder.end_offset(), Some(5));
/// # Ok::<(), sota_types::error::SotaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FrameDecoder<'a> {
	data: &'a [u8],
	revision: &'a FormatRevision,
	start: usize,
	position: usize,
	remaining: Option<u8>,
	state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Running,
	Finished,
	Failed,
}

impl<'a> FrameDecoder<'a> {
	/// Creates a decoder for the draw list at `offset`.
	pub fn new(data: &'a [u8], offset: usize, revision: &'a FormatRevision) -> Self {
		Self {
			data,
			revision,
			start: offset,
			position: offset,
			remaining: None,
			state: State::Running,
		}
	}

	/// Offset of the draw list header.
	pub fn start(&self) -> usize {
		self.start
	}

	/// Current read position.
	pub fn position(&self) -> usize {
		self.position
	}

	/// Offset just past the last operation, once every operation decoded cleanly.
	pub fn end_offset(&self) -> Option<usize> {
		(self.state == State::Finished).then_some(self.position)
	}

	/// Draw count from the header, once it has been read.
	pub fn draw_count(&self) -> Option<u8> {
		self.remaining.map(|_| self.data[self.start])
	}

	fn read_u8(&mut self) -> Result<u8, SotaError> {
		let byte = *self.data.get(self.position).ok_or_else(|| SotaError::unexpected_eof(self.position, 1))?;
		self.position += 1;
		Ok(byte)
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8], SotaError> {
		let data = self.data;
		let bytes = self
			.position
			.checked_add(len)
			.and_then(|end| data.get(self.position..end))
			.ok_or_else(|| SotaError::unexpected_eof(self.position, len))?;
		self.position += len;
		Ok(bytes)
	}

	fn read_header(&mut self) -> Result<u8, SotaError> {
		let offset = self.position;
		let count = self.read_u8()?;

		if let Some(max) = self.revision.max_draws_per_frame {
			if count == 0 || count > max {
				return Err(SotaError::InvalidDrawCount {
					offset,
					count,
					max,
				});
			}
		}

		debug!("draw list at {:#06x}: {} draws", offset, count);
		Ok(count)
	}

	fn read_op(&mut self) -> Result<DrawOp, SotaError> {
		let offset = self.position;
		let command = self.read_u8()?;

		let op = match self.revision.classify(command) {
			CommandKind::Polygon {
				plane,
			} => {
				let (polygon, end) = Polygon::read(self.data, self.position)?;
				self.position = end;
				DrawOp::Polygon {
					offset,
					command,
					plane,
					polygon,
				}
			}
			CommandKind::Tween {
				plane,
			} => {
				let base = self.position;
				let payload = self.take(TWEEN_PAYLOAD_SIZE)?;
				let back = u16::from_be_bytes([payload[0], payload[1]]);
				let fwd = u16::from_be_bytes([payload[2], payload[3]]);

				let from_offset = base.checked_sub(usize::from(back)).ok_or_else(|| {
					SotaError::invalid_tween(
						offset,
						TweenFault::BeforeStart {
							position: base,
							delta: back,
						},
					)
				})?;

				DrawOp::Tween {
					offset,
					command,
					plane,
					tween: TweenRef {
						from_offset,
						to_offset: base + usize::from(fwd),
						t: payload[4],
						t_max: payload[5],
					},
				}
			}
			CommandKind::Ignored {
				payload,
			} => {
				self.take(payload)?;
				DrawOp::Skip {
					offset,
					command,
					skip_bytes: payload,
				}
			}
			CommandKind::Unknown => {
				let preview_end = (self.position + OPERAND_PREVIEW).min(self.data.len());
				let preview = &self.data[self.position.min(preview_end)..preview_end];
				warn!(
					"unknown command {:#04x} at {:#06x} (revision {}), operands {:02X?}",
					command, offset, self.revision.name, preview
				);

				match self.revision.unknown {
					UnknownPolicy::Skip {
						bytes,
					} => {
						self.take(bytes)?;
						DrawOp::Skip {
							offset,
							command,
							skip_bytes: bytes,
						}
					}
					UnknownPolicy::Abort => {
						return Err(SotaError::UnknownCommand {
							offset,
							command,
						});
					}
				}
			}
		};

		trace!("{}", op);
		Ok(op)
	}
}

impl Iterator for FrameDecoder<'_> {
	type Item = Result<DrawOp, SotaError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.state != State::Running {
			return None;
		}

		let remaining = match self.remaining {
			Some(remaining) => remaining,
			None => match self.read_header() {
				Ok(count) => count,
				Err(err) => {
					self.state = State::Failed;
					return Some(Err(err));
				}
			},
		};

		if remaining == 0 {
			self.remaining = Some(0);
			self.state = State::Finished;
			return None;
		}
		self.remaining = Some(remaining - 1);

		let result = self.read_op();
		if result.is_err() {
			self.state = State::Failed;
		}
		Some(result)
	}
}

impl std::iter::FusedIterator for FrameDecoder<'_> {}

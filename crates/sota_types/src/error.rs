//! Error types for script loading, decoding and rendering.

use thiserror::Error;

/// Reasons a tween command cannot be resolved into a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TweenFault {
	/// The referenced offset lies outside the script data
	#[error("reference {target:#06x} is outside the script data")]
	OutOfBounds {
		/// Offset the tween pointed at
		target: usize,
	},

	/// The backward delta reaches before the start of the data
	#[error("backward delta {delta:#06x} from {position:#06x} reaches before the data")]
	BeforeStart {
		/// Position the delta is measured from
		position: usize,
		/// Backward delta
		delta: u16,
	},

	/// The referenced byte is not a polygon draw command
	#[error("reference {target:#06x} holds {tag:#04x}, not a polygon command")]
	NotAPolygon {
		/// Offset the tween pointed at
		target: usize,
		/// Byte found at that offset
		tag: u8,
	},

	/// The referenced polygon record is cut short by the end of the data
	#[error("polygon at {target:#06x} needs {needed} bytes but the data ends first")]
	Truncated {
		/// Offset of the polygon record
		target: usize,
		/// Bytes the record claims to occupy
		needed: usize,
	},

	/// One endpoint has no vertices while the other does, so there is nothing to resample
	#[error("polygon at {target:#06x} has no vertices to tween with")]
	EmptyShape {
		/// Offset of the empty polygon record
		target: usize,
	},

	/// `t_max` is zero, so the tween position is undefined
	#[error("tween duration is zero")]
	ZeroDuration,
}

/// Errors produced while loading, decoding or rendering an animation script.
#[derive(Debug, Error)]
pub enum SotaError {
	/// The byte stream ended in the middle of a record
	#[error("Unexpected end of data at {offset:#06x}: needed {needed} more bytes")]
	UnexpectedEof {
		/// Offset where the read started
		offset: usize,
		/// Number of bytes the read required
		needed: usize,
	},

	/// A command byte outside every recognized command set
	#[error("Unknown command {command:#04x} at {offset:#06x}")]
	UnknownCommand {
		/// Offset of the command byte
		offset: usize,
		/// The command byte
		command: u8,
	},

	/// The per-frame draw count is outside the range the format revision allows
	#[error("Invalid draw count {count} at {offset:#06x} (allowed 1..={max})")]
	InvalidDrawCount {
		/// Offset of the count byte
		offset: usize,
		/// Count that was read
		count: u8,
		/// Largest count the revision accepts
		max: u8,
	},

	/// A tween references something that is not a polygon record
	#[error("Invalid tween at {offset:#06x}: {fault}")]
	InvalidTweenReference {
		/// Offset of the tween command byte
		offset: usize,
		/// What was wrong with the reference
		fault: TweenFault,
	},

	/// A draw targeted a plane that does not exist
	#[error("Plane {plane} out of range (plane count: {plane_count})")]
	PlaneOutOfRange {
		/// Requested plane
		plane: u8,
		/// Number of planes available
		plane_count: usize,
	},

	/// The requested frame is past the end of the index list
	#[error("Frame {index} out of range (frame count: {frame_count})")]
	FrameIndexExhausted {
		/// Requested frame index
		index: usize,
		/// Number of frames in the script
		frame_count: usize,
	},

	/// The script container is inconsistent
	#[error("Invalid script: {0}")]
	InvalidScript(String),

	/// A format revision table is inconsistent
	#[error("Invalid format revision: {0}")]
	InvalidFormat(String),

	/// A palette is too large or a palette blend step is out of range
	#[error("Invalid palette: {0}")]
	InvalidPalette(String),

	/// JSON parse error
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl SotaError {
	/// Creates an [`SotaError::UnexpectedEof`] error.
	pub fn unexpected_eof(offset: usize, needed: usize) -> Self {
		Self::UnexpectedEof {
			offset,
			needed,
		}
	}

	/// Creates an [`SotaError::InvalidTweenReference`] error.
	pub fn invalid_tween(offset: usize, fault: TweenFault) -> Self {
		Self::InvalidTweenReference {
			offset,
			fault,
		}
	}

	/// Returns `true` if this error only affects the frame being decoded.
	///
	/// Frame-local errors are reported and the session continues with the next frame.
	pub fn is_frame_local(&self) -> bool {
		matches!(
			self,
			Self::UnexpectedEof { .. }
				| Self::UnknownCommand { .. }
				| Self::InvalidDrawCount { .. }
				| Self::InvalidTweenReference { .. }
				| Self::PlaneOutOfRange { .. }
		)
	}
}

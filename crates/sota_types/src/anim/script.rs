//! Animation script container.
//!
//! A script is an index list (one byte offset per animation frame) plus the flat
//! command byte stream every offset points into. Several frames may share an offset.
//!
//! # Sources
//!
//! ## JSON document
//!
//! ```text
//! { "indices": [0, 0, 12, ...], "data": [1, 210, 3, 0, 0, ...] }
//! ```
//!
//! ## Packed binary
//!
//! ```text
//! Offset      Size            Field       Description
//! ----------  --------------  ----------  ------------------------------------
//! 0x00        2               count       Frame count (u16, big-endian)
//! 0x02        count * 2       indices     Frame offsets (u16, big-endian)
//! 2+count*2   ...             data        Command stream; offsets are relative
//!                                         to the start of this region
//! ```
//!
//! ## Split files
//!
//! An index file holding only the big-endian u16 offsets, and a separate data file.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SotaError;

use super::{
	decode::{DrawOp, FrameDecoder},
	format::FormatRevision,
};

/// Raw JSON shape before validation.
#[derive(Debug, Deserialize)]
struct ScriptDocument {
	indices: Vec<usize>,
	data: Vec<u8>,
}

/// Immutable animation script.
///
/// # Examples
///
/// ```
/// use sota_types::anim::script::Script;
///
/// let script = Script::from_json_str(r#"{ "indices": [0], "data": [0] }"#)?;
/// assert_eq!(script.frame_count(), 1);
/// # Ok::<(), sota_types::error::SotaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScriptDocument")]
pub struct Script {
	indices: Vec<usize>,
	data: Vec<u8>,
}

impl TryFrom<ScriptDocument> for Script {
	type Error = SotaError;

	fn try_from(doc: ScriptDocument) -> Result<Self, Self::Error> {
		Self::new(doc.indices, doc.data)
	}
}

impl Script {
	/// Creates a script, checking that every frame offset lies inside `data`.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidScript`] if an offset points past the data.
	pub fn new(indices: Vec<usize>, data: Vec<u8>) -> Result<Self, SotaError> {
		if let Some((frame, &offset)) = indices.iter().enumerate().find(|&(_, &o)| o >= data.len()) {
			return Err(SotaError::InvalidScript(format!(
				"frame {} offset {:#x} is outside {} bytes of data",
				frame,
				offset,
				data.len()
			)));
		}

		Ok(Self {
			indices,
			data,
		})
	}

	/// Parses a JSON script document.
	pub fn from_json_str(json: &str) -> Result<Self, SotaError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a JSON script document.
	pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, SotaError> {
		Ok(serde_json::from_reader(reader)?)
	}

	/// Opens a script file, choosing the parser by name.
	///
	/// - `*.json`: JSON document
	/// - `*.idx` or `*_index.bin`: split index table, with the data stream read from the
	///   sibling `*.dat` or `*_anim.bin`
	/// - anything else: packed binary
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SotaError> {
		let path = path.as_ref();
		if let Some(data_path) = split_data_path(path) {
			return Self::open_split(path, data_path);
		}

		let bytes = std::fs::read(path)?;
		let is_json = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("json"));
		if is_json {
			Ok(serde_json::from_slice(&bytes)?)
		} else {
			Self::from_packed(&bytes)
		}
	}

	/// Opens the split form from an index table file and a data stream file.
	pub fn open_split<P: AsRef<Path>, Q: AsRef<Path>>(index_path: P, data_path: Q) -> Result<Self, SotaError> {
		let index_table = std::fs::read(index_path)?;
		let data = std::fs::read(data_path)?;
		Self::from_split(&index_table, data)
	}

	/// Parses the packed binary layout.
	///
	/// # Errors
	///
	/// Returns [`SotaError::UnexpectedEof`] if the header or index table is truncated,
	/// or [`SotaError::InvalidScript`] if an offset points past the data.
	pub fn from_packed(bytes: &[u8]) -> Result<Self, SotaError> {
		let header = bytes.get(..2).ok_or_else(|| SotaError::unexpected_eof(0, 2))?;
		let count = usize::from(u16::from_be_bytes([header[0], header[1]]));
		let table_end = 2 + count * 2;
		let table = bytes.get(2..table_end).ok_or_else(|| SotaError::unexpected_eof(2, count * 2))?;

		Self::new(read_be_offsets(table), bytes[table_end..].to_vec())
	}

	/// Builds a script from a separate index table and data stream.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidScript`] if the index table has an odd length or an
	/// offset points past the data.
	pub fn from_split(index_table: &[u8], data: Vec<u8>) -> Result<Self, SotaError> {
		if index_table.len() % 2 != 0 {
			return Err(SotaError::InvalidScript(format!(
				"index table length {} is not a multiple of 2",
				index_table.len()
			)));
		}

		Self::new(read_be_offsets(index_table), data)
	}

	/// Serializes to the packed binary layout.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidScript`] if the frame count or an offset does not fit
	/// in 16 bits.
	pub fn to_packed(&self) -> Result<Vec<u8>, SotaError> {
		let count = u16::try_from(self.indices.len())
			.map_err(|_| SotaError::InvalidScript(format!("{} frames do not fit in u16", self.indices.len())))?;

		let mut bytes = Vec::with_capacity(2 + self.indices.len() * 2 + self.data.len());
		bytes.extend_from_slice(&count.to_be_bytes());
		for &offset in &self.indices {
			bytes.extend_from_slice(&be_offset(offset)?);
		}
		bytes.extend_from_slice(&self.data);
		Ok(bytes)
	}

	/// Serializes to the split form: a big-endian `u16` index table and the data stream.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidScript`] if an offset does not fit in 16 bits.
	pub fn to_split(&self) -> Result<(Vec<u8>, Vec<u8>), SotaError> {
		let mut index_table = Vec::with_capacity(self.indices.len() * 2);
		for &offset in &self.indices {
			index_table.extend_from_slice(&be_offset(offset)?);
		}
		Ok((index_table, self.data.clone()))
	}

	/// Serializes to a JSON document.
	pub fn to_json_string(&self) -> Result<String, SotaError> {
		Ok(serde_json::to_string(self)?)
	}

	/// Number of frames.
	pub fn frame_count(&self) -> usize {
		self.indices.len()
	}

	/// Returns `true` if the script has no frames.
	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Frame offsets.
	pub fn indices(&self) -> &[usize] {
		&self.indices
	}

	/// Command byte stream.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Offset of frame `index`.
	///
	/// # Errors
	///
	/// Returns [`SotaError::FrameIndexExhausted`] if `index` is past the last frame.
	pub fn frame_offset(&self, index: usize) -> Result<usize, SotaError> {
		self.indices.get(index).copied().ok_or(SotaError::FrameIndexExhausted {
			index,
			frame_count: self.indices.len(),
		})
	}

	/// Returns a lazy decoder over the draw operations of frame `index`.
	pub fn frame<'a>(&'a self, index: usize, revision: &'a FormatRevision) -> Result<FrameDecoder<'a>, SotaError> {
		Ok(FrameDecoder::new(&self.data, self.frame_offset(index)?, revision))
	}

	/// Decodes every operation of frame `index` eagerly.
	///
	/// Returns the operations and the offset just past the last one. The first decode
	/// error aborts collection.
	pub fn decode_frame(&self, index: usize, revision: &FormatRevision) -> Result<(Vec<DrawOp>, usize), SotaError> {
		let mut decoder = self.frame(index, revision)?;
		let ops = decoder.by_ref().collect::<Result<Vec<_>, _>>()?;
		Ok((ops, decoder.position()))
	}
}

impl std::fmt::Display for Script {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Script({} frames, {} bytes)", self.indices.len(), self.data.len())
	}
}

fn be_offset(offset: usize) -> Result<[u8; 2], SotaError> {
	u16::try_from(offset)
		.map(u16::to_be_bytes)
		.map_err(|_| SotaError::InvalidScript(format!("offset {:#x} does not fit in u16", offset)))
}

/// Data stream path paired with a split index table path, if `path` names one.
fn split_data_path(path: &Path) -> Option<PathBuf> {
	let name = path.file_name()?.to_str()?;
	if let Some(stem) = name.strip_suffix("_index.bin") {
		return Some(path.with_file_name(format!("{}_anim.bin", stem)));
	}
	let is_index = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("idx"));
	is_index.then(|| path.with_extension("dat"))
}

fn read_be_offsets(table: &[u8]) -> Vec<usize> {
	table.chunks_exact(2).map(|pair| usize::from(u16::from_be_bytes([pair[0], pair[1]]))).collect()
}

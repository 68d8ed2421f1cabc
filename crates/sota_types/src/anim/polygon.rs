//! Polygon records.
//!
//! A polygon record in the byte stream is a vertex count followed by that many
//! `(y, x)` byte pairs:
//!
//! ```text
//! Offset  Size        Field         Description
//! ------  ----------  ------------  ---------------------------------
//! +0x00   1           count         Number of vertices
//! +0x01   count * 2   vertices      (y, x) pairs, one byte each
//! ```
//!
//! The polygon is implicitly closed: the last vertex connects back to the first.

use crate::error::SotaError;

/// A polygon vertex in plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vertex {
	/// Row
	pub y: i32,
	/// Column
	pub x: i32,
}

impl Vertex {
	/// Creates a vertex from `(y, x)`, the order used by the byte stream.
	#[inline]
	pub const fn new(y: i32, x: i32) -> Self {
		Self {
			y,
			x,
		}
	}
}

impl std::fmt::Display for Vertex {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.y, self.x)
	}
}

/// An implicitly closed polygon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polygon {
	vertices: Vec<Vertex>,
}

impl Polygon {
	/// Creates an empty polygon.
	pub fn new() -> Self {
		Self {
			vertices: Vec::new(),
		}
	}

	/// Creates a polygon from its vertices.
	pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
		Self {
			vertices,
		}
	}

	/// Creates a polygon from `(y, x)` tuples.
	///
	/// # Examples
	///
	/// ```
	/// use sota_types::anim::polygon::Polygon;
	///
	/// let triangle = Polygon::from_pairs(&[(0, 0), (0, 10), (10, 0)]);
	/// assert_eq!(triangle.len(), 3);
	/// ```
	pub fn from_pairs(pairs: &[(i32, i32)]) -> Self {
		Self {
			vertices: pairs.iter().map(|&(y, x)| Vertex::new(y, x)).collect(),
		}
	}

	/// Reads a polygon record (count byte plus pairs) starting at `offset`.
	///
	/// Returns the polygon and the offset just past the record.
	///
	/// # Errors
	///
	/// Returns [`SotaError::UnexpectedEof`] if the record runs past the end of `data`.
	pub fn read(data: &[u8], offset: usize) -> Result<(Self, usize), SotaError> {
		let count = *data.get(offset).ok_or_else(|| SotaError::unexpected_eof(offset, 1))?;
		let start = offset + 1;
		let end = start + usize::from(count) * 2;
		let pairs = data
			.get(start..end)
			.ok_or_else(|| SotaError::unexpected_eof(start, end - start))?;

		let vertices = pairs
			.chunks_exact(2)
			.map(|pair| Vertex::new(i32::from(pair[0]), i32::from(pair[1])))
			.collect();

		Ok((
			Self {
				vertices,
			},
			end,
		))
	}

	/// Serializes the polygon as a record (count byte plus pairs).
	///
	/// Coordinates saturate to `0..=255`, so extrapolated shapes are clamped to the byte
	/// range rather than wrapped. At most 255 vertices are written.
	pub fn to_bytes(&self) -> Vec<u8> {
		let count = self.vertices.len().min(0xFF);
		let mut bytes = Vec::with_capacity(1 + count * 2);
		bytes.push(count as u8);
		for vertex in &self.vertices[..count] {
			bytes.push(saturate(vertex.y));
			bytes.push(saturate(vertex.x));
		}
		bytes
	}

	/// Returns the vertices.
	pub fn vertices(&self) -> &[Vertex] {
		&self.vertices
	}

	/// Appends a vertex.
	pub fn push(&mut self, vertex: Vertex) {
		self.vertices.push(vertex);
	}

	/// Number of vertices.
	pub fn len(&self) -> usize {
		self.vertices.len()
	}

	/// Returns `true` if the polygon has no vertices.
	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}
}

impl From<Vec<Vertex>> for Polygon {
	fn from(vertices: Vec<Vertex>) -> Self {
		Self::from_vertices(vertices)
	}
}

impl std::fmt::Display for Polygon {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Polygon({} vertices)", self.vertices.len())
	}
}

fn saturate(coordinate: i32) -> u8 {
	coordinate.clamp(0, 0xFF) as u8
}

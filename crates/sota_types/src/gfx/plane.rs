//! Simulated bit-planes.
//!
//! Each [`Plane`] is a monochrome layer stored one byte per pixel. A lit pixel holds
//! exactly the plane's pen bit (`1 << index`), so OR-ing the bytes of every plane at
//! the same position yields the palette index directly.
//!
//! ```text
//!   data: |<------------ stride ------------>|
//!         +-------------------------+--------+
//!         | drawable (width)        | pad    |  row 0
//!         |      +------------+     |        |
//!         |      | viewport   |     |        |  offset = first displayed pixel
//!         |      +------------+     |        |
//!         +-------------------------+--------+  row height - 1
//! ```
//!
//! Drawing addresses the drawable area; anything outside it is discarded per pixel.
//! The compositor reads the viewport starting at `offset`, which pans a plane without
//! copying pixels.

use crate::error::SotaError;

/// One simulated bit-plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
	index: u8,
	width: usize,
	height: usize,
	stride: usize,
	offset: usize,
	data: Vec<u8>,
}

impl Plane {
	/// Creates a cleared plane whose stride equals its width.
	pub fn new(index: u8, width: usize, height: usize) -> Self {
		Self::with_stride(index, width, height, width)
	}

	/// Creates a cleared plane with an explicit row pitch.
	///
	/// A stride smaller than `width` is raised to `width`.
	pub fn with_stride(index: u8, width: usize, height: usize, stride: usize) -> Self {
		let stride = stride.max(width);
		Self {
			index,
			width,
			height,
			stride,
			offset: 0,
			data: vec![0; stride * height],
		}
	}

	/// Plane number.
	pub fn index(&self) -> u8 {
		self.index
	}

	/// Value stored in lit pixels.
	#[inline]
	pub fn pen(&self) -> u8 {
		1 << self.index
	}

	/// Drawable width.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Drawable height.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Row pitch in pixels.
	pub fn stride(&self) -> usize {
		self.stride
	}

	/// Index of the first displayed pixel.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Raw pixel buffer (`stride * height` bytes).
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Pans the viewport so it starts at drawable position `(x, y)`.
	pub fn set_scroll(&mut self, x: usize, y: usize) {
		self.offset = y * self.stride + x;
	}

	/// Zeroes the whole buffer, padding included.
	pub fn clear(&mut self) {
		self.data.fill(0);
	}

	/// Returns `true` if the drawable pixel at `(x, y)` is lit.
	///
	/// Positions outside the drawable area read as unlit.
	pub fn is_set(&self, x: i32, y: i32) -> bool {
		self.address(x, y).is_some_and(|i| self.data[i] != 0)
	}

	/// Toggles one pixel; out-of-range positions are ignored.
	pub fn xor_pixel(&mut self, x: i32, y: i32) {
		let pen = self.pen();
		if let Some(i) = self.address(x, y) {
			self.data[i] ^= pen;
		}
	}

	/// Toggles the pixels `x0..=x1` on row `y`.
	///
	/// Pixels outside the drawable area are discarded individually; an empty range
	/// (`x0 > x1`) draws nothing.
	pub fn xor_span(&mut self, y: i32, x0: i32, x1: i32) {
		if y < 0 || y as usize >= self.height || self.width == 0 {
			return;
		}

		let start = x0.max(0);
		let end = x1.min(self.width as i32 - 1);
		if start > end {
			return;
		}

		let pen = self.pen();
		let row = y as usize * self.stride;
		for pixel in &mut self.data[row + start as usize..=row + end as usize] {
			*pixel ^= pen;
		}
	}

	/// Reads the value displayed at viewport position `(x, y)`.
	///
	/// Addresses past the end of the buffer read as zero, as do columns that would
	/// run past the end of a row.
	#[inline]
	pub fn sample(&self, x: usize, y: usize) -> u8 {
		if self.stride == 0 || self.offset % self.stride + x >= self.stride {
			return 0;
		}
		self.data.get(self.offset + y * self.stride + x).copied().unwrap_or(0)
	}

	/// Number of lit pixels.
	pub fn lit_count(&self) -> usize {
		self.data.iter().filter(|&&p| p != 0).count()
	}

	#[inline]
	fn address(&self, x: i32, y: i32) -> Option<usize> {
		if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
			return None;
		}
		Some(y as usize * self.stride + x as usize)
	}
}

/// Set of planes, used to record which planes a frame touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlaneMask(u8);

impl PlaneMask {
	/// Empty set.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// Adds a plane.
	#[inline]
	pub fn insert(&mut self, plane: u8) {
		self.0 |= 1 << plane;
	}

	/// Returns `true` if `plane` is in the set.
	#[inline]
	pub fn contains(&self, plane: u8) -> bool {
		self.0 & (1 << plane) != 0
	}

	/// Raw bits; bit `n` is plane `n`.
	pub fn bits(&self) -> u8 {
		self.0
	}

	/// Number of planes in the set.
	pub fn count(&self) -> u32 {
		self.0.count_ones()
	}

	/// Returns `true` if no plane is in the set.
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	/// Planes in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
		(0..8u8).filter(|&p| self.contains(p))
	}
}

impl std::fmt::Display for PlaneMask {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:08b}", self.0)
	}
}

/// The planes a renderer draws into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneStore {
	planes: Vec<Plane>,
}

impl PlaneStore {
	/// Creates `count` cleared planes of `width` x `height`.
	pub fn new(count: usize, width: usize, height: usize) -> Self {
		Self::with_buffer_size(count, width, height, width)
	}

	/// Creates `count` cleared planes whose rows are `stride` pixels apart.
	///
	/// Combined with [`Plane::set_scroll`] this allows buffers larger than the
	/// displayed viewport.
	pub fn with_buffer_size(count: usize, width: usize, height: usize, stride: usize) -> Self {
		Self {
			planes: (0..count).map(|i| Plane::with_stride(i as u8, width, height, stride)).collect(),
		}
	}

	/// Number of planes.
	pub fn len(&self) -> usize {
		self.planes.len()
	}

	/// Returns `true` if there are no planes.
	pub fn is_empty(&self) -> bool {
		self.planes.is_empty()
	}

	/// Returns plane `plane`.
	///
	/// # Errors
	///
	/// Returns [`SotaError::PlaneOutOfRange`] if the plane does not exist.
	pub fn get(&self, plane: u8) -> Result<&Plane, SotaError> {
		self.planes.get(usize::from(plane)).ok_or(SotaError::PlaneOutOfRange {
			plane,
			plane_count: self.planes.len(),
		})
	}

	/// Returns plane `plane` mutably.
	///
	/// # Errors
	///
	/// Returns [`SotaError::PlaneOutOfRange`] if the plane does not exist.
	pub fn get_mut(&mut self, plane: u8) -> Result<&mut Plane, SotaError> {
		let plane_count = self.planes.len();
		self.planes.get_mut(usize::from(plane)).ok_or(SotaError::PlaneOutOfRange {
			plane,
			plane_count,
		})
	}

	/// Iterates over the planes in index order.
	pub fn iter(&self) -> std::slice::Iter<'_, Plane> {
		self.planes.iter()
	}

	/// Iterates mutably over the planes in index order.
	pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Plane> {
		self.planes.iter_mut()
	}

	/// Clears every plane.
	pub fn clear_all(&mut self) {
		for plane in &mut self.planes {
			plane.clear();
		}
	}
}

impl<'a> IntoIterator for &'a PlaneStore {
	type Item = &'a Plane;
	type IntoIter = std::slice::Iter<'a, Plane>;

	fn into_iter(self) -> Self::IntoIter {
		self.planes.iter()
	}
}

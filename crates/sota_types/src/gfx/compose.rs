//! Frame compositor.
//!
//! Every plane is sampled at the same viewport position, the samples are OR-ed into a
//! palette index, and the index is looked up in the [`Palette`]:
//!
//! ```text
//! plane 0 ─┐
//! plane 1 ─┤  OR   ┌─────────┐
//! plane 2 ─┼──────>│ palette │──> RGBA
//! plane 3 ─┘ index └─────────┘
//! ```
//!
//! All planes contribute whether or not the current frame drew into them.

use super::{
	palette::{Color, Palette},
	plane::PlaneStore,
};

/// RGBA output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
	width: usize,
	height: usize,
	pixels: Vec<Color>,
}

impl Framebuffer {
	/// Creates a black framebuffer.
	pub fn new(width: usize, height: usize) -> Self {
		Self {
			width,
			height,
			pixels: vec![Color::BLACK; width * height],
		}
	}

	/// Width in pixels.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Pixels in row-major order.
	pub fn pixels(&self) -> &[Color] {
		&self.pixels
	}

	/// Pixel at `(x, y)`, if inside the image.
	pub fn get(&self, x: usize, y: usize) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some(self.pixels[y * self.width + x])
	}

	/// Flattens the image to `r, g, b, a` bytes.
	pub fn to_rgba_bytes(&self) -> Vec<u8> {
		self.pixels.iter().flat_map(Color::to_array).collect()
	}
}

/// Combines the planes at viewport size `width` x `height` into palette indices.
pub fn compose_indices(planes: &PlaneStore, width: usize, height: usize) -> Vec<u8> {
	let mut indices = Vec::new();
	compose_indices_into(planes, width, height, &mut indices);
	indices
}

fn compose_indices_into(planes: &PlaneStore, width: usize, height: usize, indices: &mut Vec<u8>) {
	indices.clear();
	indices.resize(width * height, 0);
	for plane in planes {
		for y in 0..height {
			let row = &mut indices[y * width..(y + 1) * width];
			for (x, index) in row.iter_mut().enumerate() {
				*index |= plane.sample(x, y);
			}
		}
	}
}

/// Turns planes into colored frames, reusing its index buffer between frames.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
	indices: Vec<u8>,
}

impl Compositor {
	/// Creates a compositor.
	pub fn new() -> Self {
		Self::default()
	}

	/// Composites `planes` through `palette` into `framebuffer`.
	///
	/// The framebuffer size is the viewport size.
	pub fn compose(&mut self, planes: &PlaneStore, palette: &Palette, framebuffer: &mut Framebuffer) {
		compose_indices_into(planes, framebuffer.width, framebuffer.height, &mut self.indices);
		for (pixel, &index) in framebuffer.pixels.iter_mut().zip(&self.indices) {
			*pixel = palette.get(index);
		}
	}

	/// Palette indices of the last composited frame.
	pub fn indices(&self) -> &[u8] {
		&self.indices
	}
}

//! Scanline polygon rasterizer.
//!
//! Polygons are filled with the parity rule by XOR-ing horizontal spans into a
//! [`Plane`]. Overlapping polygons in the same plane therefore cancel, and filling
//! the same polygon twice restores the plane.
//!
//! ## Algorithm
//!
//! ```text
//! 1. Build one edge per consecutive vertex pair plus the closing edge.
//!    Horizontal edges are dropped; every edge runs top to bottom.
//! 2. Chain edges by their top row in a table indexed by `y - y_min`.
//! 3. For each row y in y_min..=y_max:
//!    a. retire edges whose bottom row is y (edges are half-open)
//!    b. activate the chain starting at y
//!    c. sort active edges by x
//!    d. pair them up left to right; a span runs from ceil(x_enter) to
//!       floor(x_leave), inclusive
//!    e. two edges that both start at y at the same x meet in a local minimum
//!       and are skipped together
//!    f. advance every active edge by its inverse slope
//! ```
//!
//! Edge positions are tracked as exact fractions (`x = num / dy`), so the rounding
//! in step 3d and the coincidence test in step 3e never suffer from accumulated
//! floating-point error.

use std::cmp::Ordering;

use log::trace;

use crate::anim::polygon::Vertex;

use super::plane::Plane;

/// Nominal width of the captured animation.
pub const SOURCE_WIDTH: i32 = 256;

/// Nominal height of the captured animation.
pub const SOURCE_HEIGHT: i32 = 204;

/// Integer scale and offset applied to vertices before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
	/// Integer scale factor, at least 1
	pub scale: i32,
	/// Horizontal offset added after scaling
	pub x: i32,
	/// Vertical offset added after scaling
	pub y: i32,
}

impl Placement {
	/// No scaling, no offset.
	pub const fn identity() -> Self {
		Self {
			scale: 1,
			x: 0,
			y: 0,
		}
	}

	/// Largest integer scale of the 256x204 source that fits the display.
	///
	/// The result is centred horizontally and touches the bottom edge. A display
	/// smaller than the source still gets scale 1.
	///
	/// # Examples
	///
	/// ```
	/// use sota_types::gfx::raster::Placement;
	///
	/// let placement = Placement::fit(640, 480);
	/// assert_eq!(placement.scale, 2);
	/// assert_eq!(placement.x, 64);
	/// assert_eq!(placement.y, 72);
	/// ```
	pub fn fit(display_width: i32, display_height: i32) -> Self {
		let scale = (display_width / SOURCE_WIDTH).min(display_height / SOURCE_HEIGHT).max(1);
		Self {
			scale,
			x: display_width / 2 - SOURCE_WIDTH * scale / 2,
			y: display_height - SOURCE_HEIGHT * scale,
		}
	}

	/// Maps a source vertex into display coordinates.
	#[inline]
	pub fn apply(&self, vertex: Vertex) -> Vertex {
		Vertex::new(vertex.y * self.scale + self.y, vertex.x * self.scale + self.x)
	}
}

impl Default for Placement {
	fn default() -> Self {
		Self::identity()
	}
}

/// One non-horizontal edge.
///
/// The current x position is `num / dy`; advancing one row adds `dx` to `num`,
/// which is the inverse slope expressed over the common denominator `dy`.
#[derive(Debug, Clone, Copy)]
struct Edge {
	num: i64,
	dx: i64,
	dy: i64,
	y_min: i32,
	y_max: i32,
	next: Option<usize>,
}

impl Edge {
	fn new(a: Vertex, b: Vertex) -> Option<Self> {
		if a.y == b.y {
			return None;
		}
		let (top, bottom) = if a.y < b.y {
			(a, b)
		} else {
			(b, a)
		};
		let dy = i64::from(bottom.y - top.y);
		Some(Self {
			num: i64::from(top.x) * dy,
			dx: i64::from(bottom.x - top.x),
			dy,
			y_min: top.y,
			y_max: bottom.y,
			next: None,
		})
	}

	#[inline]
	fn ceil_x(&self) -> i32 {
		let q = self.num.div_euclid(self.dy);
		let q = if self.num.rem_euclid(self.dy) != 0 {
			q + 1
		} else {
			q
		};
		clamp_i32(q)
	}

	#[inline]
	fn floor_x(&self) -> i32 {
		clamp_i32(self.num.div_euclid(self.dy))
	}

	#[inline]
	fn cmp_x(&self, other: &Self) -> Ordering {
		(i128::from(self.num) * i128::from(other.dy)).cmp(&(i128::from(other.num) * i128::from(self.dy)))
	}
}

#[inline]
fn clamp_i32(value: i64) -> i32 {
	value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Reusable scanline rasterizer.
///
/// The edge table and active list are kept between calls so steady-state rendering
/// does not allocate.
///
/// # Examples
///
/// ```
/// use sota_types::anim::polygon::Polygon;
/// use sota_types::gfx::{plane::Plane, raster::Rasterizer};
///
/// let triangle = Polygon::from_pairs(&[(0, 0), (0, 10), (10, 0)]);
/// let mut plane = Plane::new(0, 16, 16);
/// let mut rasterizer = Rasterizer::new();
///
/// rasterizer.fill(&mut plane, triangle.vertices(), true);
/// assert!(plane.is_set(0, 0));
/// assert!(plane.is_set(10, 0));
/// assert!(!plane.is_set(0, 10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
	placement: Placement,
	edges: Vec<Edge>,
	table: Vec<Option<usize>>,
	active: Vec<usize>,
}

impl Rasterizer {
	/// Creates a rasterizer with the identity placement.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a rasterizer that transforms every vertex by `placement`.
	pub fn with_placement(placement: Placement) -> Self {
		Self {
			placement,
			..Self::default()
		}
	}

	/// Current placement.
	pub fn placement(&self) -> Placement {
		self.placement
	}

	/// Replaces the placement used by later fills.
	pub fn set_placement(&mut self, placement: Placement) {
		self.placement = placement;
	}

	/// XOR-fills the closed polygon `vertices` into `plane`.
	///
	/// When `clear` is set the whole plane is zeroed first, even if the polygon
	/// turns out to be empty. Pixels outside the plane are discarded.
	pub fn fill(&mut self, plane: &mut Plane, vertices: &[Vertex], clear: bool) {
		if clear {
			plane.clear();
		}

		let Some((y_min, y_max)) = self.build_edges(vertices) else {
			return;
		};
		trace!("fill plane {}: {} edges, rows {}..={}", plane.index(), self.edges.len(), y_min, y_max);

		let Self {
			edges,
			table,
			active,
			..
		} = self;

		active.clear();
		for y in y_min..=y_max {
			active.retain(|&i| edges[i].y_max != y);

			let mut link = table[(y - y_min) as usize];
			while let Some(i) = link {
				active.push(i);
				link = edges[i].next;
			}

			active.sort_by(|&a, &b| edges[a].cmp_x(&edges[b]));
			scan_row(edges, active, plane, y);

			for &i in active.iter() {
				edges[i].num += edges[i].dx;
			}
		}
	}

	/// Builds the edge list and edge table, returning the row range they cover.
	fn build_edges(&mut self, vertices: &[Vertex]) -> Option<(i32, i32)> {
		self.edges.clear();

		let count = vertices.len();
		for i in 0..count {
			let a = self.placement.apply(vertices[i]);
			let b = self.placement.apply(vertices[(i + 1) % count]);
			if let Some(edge) = Edge::new(a, b) {
				self.edges.push(edge);
			}
		}

		let y_min = self.edges.iter().map(|e| e.y_min).min()?;
		let y_max = self.edges.iter().map(|e| e.y_max).max()?;

		self.table.clear();
		self.table.resize((y_max - y_min) as usize + 1, None);
		for (i, edge) in self.edges.iter_mut().enumerate() {
			let slot = &mut self.table[(edge.y_min - y_min) as usize];
			edge.next = *slot;
			*slot = Some(i);
		}

		Some((y_min, y_max))
	}
}

/// Walks one row of sorted active edges and XORs the spans between them.
fn scan_row(edges: &[Edge], active: &[usize], plane: &mut Plane, y: i32) {
	let mut drawing = false;
	let mut start = 0;
	let mut k = 0;

	while k < active.len() {
		let edge = &edges[active[k]];

		// shared local-minimum vertex: both edges start here at the same x
		if let Some(&next) = active.get(k + 1) {
			let other = &edges[next];
			if edge.y_min == y && other.y_min == y && edge.cmp_x(other) == Ordering::Equal {
				k += 2;
				continue;
			}
		}

		if drawing {
			plane.xor_span(y, start, edge.floor_x());
		} else {
			start = edge.ceil_x();
		}
		drawing = !drawing;
		k += 1;
	}
}

//! Shape tweening.
//!
//! A tween synthesizes a polygon between two polygon records that already exist in the
//! byte stream. The records are addressed by the offset of their command byte, so the
//! interpolator works on encoded data rather than on decoded geometry.
//!
//! Shapes with different vertex counts are matched by index scaling, not by any
//! geometric correspondence: output vertex `i` of `points = max(from_len, to_len)`
//! takes source vertex `floor(i * len / points)` from each side. Each coordinate is
//! then blended as `floor(from + t * (to - from) / t_max)`, evaluated exactly in
//! integers.

use crate::error::TweenFault;

use super::{
	decode::TweenRef,
	format::FormatRevision,
	polygon::{Polygon, Vertex},
};

/// Borrowed view of a polygon record's vertex bytes.
#[derive(Debug, Clone, Copy)]
struct RecordView<'a> {
	pairs: &'a [u8],
}

impl<'a> RecordView<'a> {
	/// Resolves the polygon record whose command byte is at `target`.
	fn resolve(data: &'a [u8], target: usize, revision: &FormatRevision) -> Result<Self, TweenFault> {
		let tag = *data.get(target).ok_or(TweenFault::OutOfBounds {
			target,
		})?;
		if !revision.is_polygon(tag) {
			return Err(TweenFault::NotAPolygon {
				target,
				tag,
			});
		}

		let count = *data.get(target + 1).ok_or(TweenFault::Truncated {
			target,
			needed: 2,
		})?;
		let start = target + 2;
		let end = start + usize::from(count) * 2;
		let pairs = data.get(start..end).ok_or(TweenFault::Truncated {
			target,
			needed: end - target,
		})?;

		Ok(Self {
			pairs,
		})
	}

	fn len(&self) -> usize {
		self.pairs.len() / 2
	}

	fn vertex(&self, index: usize) -> Vertex {
		Vertex::new(i32::from(self.pairs[index * 2]), i32::from(self.pairs[index * 2 + 1]))
	}
}

/// Blends one coordinate: `floor(from + t * (to - from) / t_max)`.
#[inline]
fn blend(from: i32, to: i32, t: i32, t_max: i32) -> i32 {
	(from * t_max + t * (to - from)).div_euclid(t_max)
}

/// Interpolates between the polygon records at `from_offset` and `to_offset`.
///
/// # Errors
///
/// - [`TweenFault::ZeroDuration`] if `t_max` is zero
/// - [`TweenFault::OutOfBounds`], [`TweenFault::NotAPolygon`] or
///   [`TweenFault::Truncated`] if either offset does not address a complete polygon
///   record under `revision`
/// - [`TweenFault::EmptyShape`] if exactly one of the records has no vertices; two
///   empty records tween to an empty polygon
///
/// # Examples
///
/// ```
/// use sota_types::anim::{format::FormatRevision, tween::tween};
///
/// // two single-vertex polygons: (0, 0) and (10, 20)
/// let data = [0xD2, 1, 0, 0, 0xD2, 1, 10, 20];
/// let mid = tween(&data, 0, 4, 1, 2, &FormatRevision::four_plane())?;
/// assert_eq!(mid.vertices()[0].y, 5);
/// assert_eq!(mid.vertices()[0].x, 10);
/// # Ok::<(), sota_types::error::TweenFault>(())
/// ```
pub fn tween(
	data: &[u8],
	from_offset: usize,
	to_offset: usize,
	t: u8,
	t_max: u8,
	revision: &FormatRevision,
) -> Result<Polygon, TweenFault> {
	if t_max == 0 {
		return Err(TweenFault::ZeroDuration);
	}

	let from = RecordView::resolve(data, from_offset, revision)?;
	let to = RecordView::resolve(data, to_offset, revision)?;

	match (from.len(), to.len()) {
		(0, n) if n > 0 => {
			return Err(TweenFault::EmptyShape {
				target: from_offset,
			});
		}
		(n, 0) if n > 0 => {
			return Err(TweenFault::EmptyShape {
				target: to_offset,
			});
		}
		_ => {}
	}

	let points = from.len().max(to.len());
	let (t, t_max) = (i32::from(t), i32::from(t_max));

	let mut polygon = Polygon::new();
	for i in 0..points {
		let a = from.vertex(i * from.len() / points);
		let b = to.vertex(i * to.len() / points);
		polygon.push(Vertex::new(blend(a.y, b.y, t, t_max), blend(a.x, b.x, t, t_max)));
	}

	Ok(polygon)
}

/// Interpolates using the parameters of a decoded tween command.
pub fn tween_ref(data: &[u8], tween_ref: &TweenRef, revision: &FormatRevision) -> Result<Polygon, TweenFault> {
	tween(data, tween_ref.from_offset, tween_ref.to_offset, tween_ref.t, tween_ref.t_max, revision)
}

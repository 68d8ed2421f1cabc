//! Benchmark helper utilities for sota-rs
//!
//! This module generates synthetic animation scripts so the benchmarks do not depend
//! on captured data files.
//!
//! # Script Layout
//!
//! ```text
//! +-----------------+----------+----------+-----+----------+---------------+
//! | source polygon  | frame 0  | frame 1  | ... | frame n  | target polygon|
//! +-----------------+----------+----------+-----+----------+---------------+
//!        ^                 every frame ends with a tween        ^
//!        +------------------ back ---------+--- fwd -------------+
//! ```
//!
//! Each frame draws `polygons_per_frame` star shapes spread over the four planes and
//! then one tween between the two shapes that bracket the frames.

use std::f64::consts::TAU;

/// Tween command used by the generator (draws into plane 2).
pub const TWEEN_COMMAND: u8 = 0xE8;

/// Builds a star polygon with `points` vertices as `(y, x)` byte pairs.
///
/// Odd vertices sit at half the radius. Coordinates are clamped to the byte range.
pub fn star(points: usize, radius: f64, center: (f64, f64), phase: f64) -> Vec<(u8, u8)> {
	(0..points)
		.map(|i| {
			let angle = TAU * i as f64 / points.max(1) as f64 + phase;
			let r = if i % 2 == 0 {
				radius
			} else {
				radius / 2.0
			};
			let y = (center.0 + r * angle.sin()).round().clamp(0.0, 255.0) as u8;
			let x = (center.1 + r * angle.cos()).round().clamp(0.0, 255.0) as u8;
			(y, x)
		})
		.collect()
}

/// Encodes a polygon draw command: command byte, vertex count, `(y, x)` pairs.
pub fn polygon_record(command: u8, vertices: &[(u8, u8)]) -> Vec<u8> {
	let mut record = Vec::with_capacity(2 + vertices.len() * 2);
	record.push(command);
	record.push(vertices.len() as u8);
	for &(y, x) in vertices {
		record.push(y);
		record.push(x);
	}
	record
}

/// Generates a four-plane script.
///
/// Returns the frame offsets and the command stream.
///
/// # Panics
///
/// Panics if the script would not fit the 16-bit tween deltas (keep it under 64 KiB)
/// or a frame would hold more than 254 polygons.
pub fn generate_script(frames: usize, polygons_per_frame: usize, vertices: usize) -> (Vec<usize>, Vec<u8>) {
	assert!(polygons_per_frame < 255, "too many polygons per frame");

	let mut data = polygon_record(0xD2, &star(vertices, 40.0, (100.0, 128.0), 0.0));
	let mut indices = Vec::with_capacity(frames);
	let mut forward_slots = Vec::with_capacity(frames);

	for frame in 0..frames {
		indices.push(data.len());
		data.push(polygons_per_frame as u8 + 1);

		for polygon in 0..polygons_per_frame {
			let command = 0xD2 + (polygon % 4) as u8;
			let radius = 20.0 + ((frame * 7 + polygon * 13) % 60) as f64;
			let center = (60.0 + ((polygon * 30) % 120) as f64, 40.0 + ((frame * 5) % 180) as f64);
			data.extend(polygon_record(command, &star(vertices, radius, center, (frame + polygon) as f64 * 0.1)));
		}

		data.push(TWEEN_COMMAND);
		let position = data.len();
		data.extend_from_slice(&(position as u16).to_be_bytes());
		forward_slots.push(position);
		data.extend_from_slice(&[0, 0, (frame % 16) as u8, 16]);
	}

	let target = data.len();
	data.extend(polygon_record(0xD2, &star(vertices, 80.0, (120.0, 128.0), 0.5)));
	assert!(data.len() <= usize::from(u16::MAX), "script too large for 16-bit tween deltas");

	for position in forward_slots {
		let fwd = (target - position) as u16;
		data[position + 2..position + 4].copy_from_slice(&fwd.to_be_bytes());
	}

	(indices, data)
}

/// Common benchmark workloads: `(frames, polygons_per_frame, vertices)`
pub mod sizes {
	/// A few simple shapes per frame
	pub const LIGHT: (usize, usize, usize) = (32, 2, 6);
	/// Typical captured density
	pub const TYPICAL: (usize, usize, usize) = (64, 4, 16);
	/// Many detailed shapes
	pub const HEAVY: (usize, usize, usize) = (64, 8, 48);
}

#[cfg(test)]
mod tests {
	use super::*;
	use sota_types::prelude::*;

	#[test]
	fn test_star_shape() {
		let shape = star(8, 40.0, (100.0, 100.0), 0.0);
		assert_eq!(shape.len(), 8);
		assert_eq!(shape[0], (100, 140));
	}

	#[test]
	fn test_polygon_record() {
		assert_eq!(polygon_record(0xD3, &[(1, 2), (3, 4)]), vec![0xD3, 2, 1, 2, 3, 4]);
	}

	#[test]
	fn test_generated_script_renders_cleanly() {
		let (frames, polygons, vertices) = sizes::TYPICAL;
		let (indices, data) = generate_script(frames, polygons, vertices);
		assert_eq!(indices.len(), frames);

		let script = Script::new(indices, data).unwrap();
		let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 256, 204).unwrap();
		for index in 0..frames {
			let report = renderer.render_frame(index).unwrap();
			assert!(report.is_clean(), "{}", report);
			assert_eq!(report.drawn, polygons + 1);
		}
	}

	#[test]
	fn test_sizes_fit_tween_range() {
		for (frames, polygons, vertices) in [sizes::LIGHT, sizes::TYPICAL, sizes::HEAVY] {
			let (_, data) = generate_script(frames, polygons, vertices);
			assert!(data.len() <= usize::from(u16::MAX));
		}
	}
}

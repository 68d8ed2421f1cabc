//! Invariants that must hold for any input

use sota_rs::prelude::*;

use crate::{polygon, script_from_frames};

/// Small deterministic generator so failures are reproducible.
struct Lcg(u64);

impl Lcg {
	fn next_byte(&mut self) -> u8 {
		self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
		(self.0 >> 56) as u8
	}

	fn polygon(&mut self, max_vertices: u8) -> Vec<(u8, u8)> {
		let count = self.next_byte() % (max_vertices + 1);
		(0..count).map(|_| (self.next_byte() % 64, self.next_byte() % 64)).collect()
	}
}

fn pairs(vertices: &[(u8, u8)]) -> Polygon {
	let pairs: Vec<(i32, i32)> = vertices.iter().map(|&(y, x)| (i32::from(y), i32::from(x))).collect();
	Polygon::from_pairs(&pairs)
}

#[test]
fn xor_involution_for_arbitrary_polygons() {
	let mut rng = Lcg(0x5074_a001);
	let mut rasterizer = Rasterizer::new();
	let mut plane = Plane::new(0, 64, 64);
	rasterizer.fill(&mut plane, pairs(&rng.polygon(12)).vertices(), true);

	for _ in 0..200 {
		let before = plane.clone();
		let shape = pairs(&rng.polygon(12));
		rasterizer.fill(&mut plane, shape.vertices(), false);
		rasterizer.fill(&mut plane, shape.vertices(), false);
		assert_eq!(plane, before, "{}", shape);
	}
}

#[test]
fn closure_edge_is_implicit() {
	let mut rng = Lcg(42);
	let mut rasterizer = Rasterizer::new();

	for _ in 0..100 {
		let open = rng.polygon(10);
		if open.is_empty() {
			continue;
		}
		let mut closed = open.clone();
		closed.push(open[0]);

		let mut a = Plane::new(0, 64, 64);
		let mut b = Plane::new(0, 64, 64);
		rasterizer.fill(&mut a, pairs(&open).vertices(), true);
		rasterizer.fill(&mut b, pairs(&closed).vertices(), true);
		assert_eq!(a, b);
	}
}

#[test]
fn fill_stays_inside_bounding_box() {
	let mut rng = Lcg(7);
	let mut rasterizer = Rasterizer::new();

	for _ in 0..100 {
		let shape = rng.polygon(8);
		let mut plane = Plane::new(0, 64, 64);
		rasterizer.fill(&mut plane, pairs(&shape).vertices(), true);

		let (Some(y_min), Some(y_max)) = (shape.iter().map(|v| v.0).min(), shape.iter().map(|v| v.0).max()) else {
			assert_eq!(plane.lit_count(), 0);
			continue;
		};
		let x_min = shape.iter().map(|v| v.1).min().unwrap_or(0);
		let x_max = shape.iter().map(|v| v.1).max().unwrap_or(0);
		for (x, y) in crate::lit(&plane) {
			assert!(y >= i32::from(y_min) && y < i32::from(y_max), "row {} outside {}..{}", y, y_min, y_max);
			assert!(x >= i32::from(x_min) && x <= i32::from(x_max));
		}
	}
}

#[test]
fn first_draw_clears_only_touched_planes() {
	let full = polygon(0xD2, &[(0, 0), (0, 16), (16, 16), (16, 0)]);
	let small = polygon(0xD2, &[(0, 0), (0, 2), (2, 2), (2, 0)]);
	let other = polygon(0xD4, &[(4, 4), (4, 8), (8, 8), (8, 4)]);
	let script = script_from_frames(&[vec![full, other], vec![small]]);
	let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 16, 16).unwrap();

	renderer.render_frame(0).unwrap();
	assert_eq!(renderer.planes().get(0).unwrap().lit_count(), 256);
	assert_eq!(renderer.planes().get(2).unwrap().lit_count(), 20);

	let report = renderer.render_frame(1).unwrap();
	assert_eq!(report.touched.bits(), 0b0001);
	// plane 0 was cleared before the small square, plane 2 kept its pixels
	assert_eq!(renderer.planes().get(0).unwrap().lit_count(), 6);
	assert_eq!(renderer.planes().get(2).unwrap().lit_count(), 20);
}

#[test]
fn empty_polygon_still_clears() {
	let square = polygon(0xD3, &[(0, 0), (0, 4), (4, 4), (4, 0)]);
	let script = script_from_frames(&[vec![square], vec![polygon(0xD3, &[])]]);
	let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 8, 8).unwrap();

	renderer.render_frame(0).unwrap();
	assert_eq!(renderer.planes().get(1).unwrap().lit_count(), 20);
	let report = renderer.render_frame(1).unwrap();
	assert!(report.touched.contains(1));
	assert_eq!(renderer.planes().get(1).unwrap().lit_count(), 0);
}

/// Source vertex `i * len / points` for each output vertex `i`.
fn resampled(vertices: &[(u8, u8)], points: usize) -> Polygon {
	let picked: Vec<(u8, u8)> = (0..points).map(|i| vertices[i * vertices.len() / points]).collect();
	pairs(&picked)
}

#[test]
fn tween_endpoints_match_sources() {
	let mut rng = Lcg(99);
	let revision = FormatRevision::four_plane();

	for from_len in 0..=6usize {
		for to_len in 0..=6usize {
			let from: Vec<(u8, u8)> = (0..from_len).map(|_| (rng.next_byte(), rng.next_byte())).collect();
			let to: Vec<(u8, u8)> = (0..to_len).map(|_| (rng.next_byte(), rng.next_byte())).collect();
			let mut data = polygon(0xD2, &from);
			let to_offset = data.len();
			data.extend(polygon(0xD5, &to));
			let t_max = rng.next_byte().max(1);

			let start = tween(&data, 0, to_offset, 0, t_max, &revision);
			let end = tween(&data, 0, to_offset, t_max, t_max, &revision);

			match (from_len, to_len) {
				(0, 0) => {
					assert!(start.unwrap().is_empty());
					assert!(end.unwrap().is_empty());
				}
				(0, _) => {
					assert_eq!(
						start,
						Err(TweenFault::EmptyShape {
							target: 0
						})
					);
					assert_eq!(end, start);
				}
				(_, 0) => {
					assert_eq!(
						start,
						Err(TweenFault::EmptyShape {
							target: to_offset
						})
					);
					assert_eq!(end, start);
				}
				_ => {
					let points = from_len.max(to_len);
					assert_eq!(start.unwrap(), resampled(&from, points), "{} -> {}", from_len, to_len);
					assert_eq!(end.unwrap(), resampled(&to, points), "{} -> {}", from_len, to_len);
				}
			}
		}
	}
}

#[test]
fn tween_resampling_is_deterministic() {
	let data = [polygon(0xD2, &[(0, 0), (5, 5), (9, 1)]), polygon(0xD2, &[(3, 3); 7])].concat();
	let revision = FormatRevision::four_plane();
	let first = tween(&data, 0, 8, 2, 5, &revision).unwrap();
	assert_eq!(first.len(), 7);
	for _ in 0..10 {
		assert_eq!(tween(&data, 0, 8, 2, 5, &revision).unwrap(), first);
	}
}

#[test]
fn decoding_is_pure() {
	let mut rng = Lcg(1234);
	let frames: Vec<Vec<Vec<u8>>> = (0..8)
		.map(|_| (0..3).map(|i| polygon(0xD2 + i, &rng.polygon(6))).collect())
		.collect();
	let script = script_from_frames(&frames);
	let revision = FormatRevision::four_plane();

	for index in 0..script.frame_count() {
		let first = script.decode_frame(index, &revision).unwrap();
		let second = script.decode_frame(index, &revision).unwrap();
		assert_eq!(first, second);

		let decoder = script.frame(index, &revision).unwrap();
		let replay: Vec<DrawOp> = decoder.clone().map(Result::unwrap).collect();
		assert_eq!(replay, first.0);
	}
}

#[test]
fn rendering_is_repeatable() {
	let mut rng = Lcg(555);
	let frames: Vec<Vec<Vec<u8>>> = (0..6)
		.map(|_| (0..4).map(|i| polygon(0xD2 + i, &rng.polygon(8))).collect())
		.collect();
	let script = script_from_frames(&frames);

	let mut a = Renderer::new(script.clone(), FormatRevision::four_plane(), 64, 64).unwrap();
	let mut b = Renderer::new(script, FormatRevision::four_plane(), 64, 64).unwrap();
	for index in 0..6 {
		a.render_frame(index).unwrap();
		b.render_frame(index).unwrap();
		assert_eq!(a.framebuffer(), b.framebuffer());
	}
}

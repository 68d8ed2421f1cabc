//! Worked examples through the whole pipeline

use sota_rs::prelude::*;

use crate::{lit, polygon, script_from_frames};

const TRIANGLE: [(u8, u8); 3] = [(0, 0), (0, 10), (10, 0)];
const SQUARE: [(u8, u8); 4] = [(0, 0), (0, 20), (20, 20), (20, 0)];

#[test]
fn triangle_fills_plane_zero_and_composites() {
	let script = script_from_frames(&[vec![polygon(0xD2, &TRIANGLE)]]);
	let ink = Color::rgb(0x12, 0x34, 0x56);
	let palette = Palette::from_colors(&[Color::BLACK, ink]).unwrap();
	let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 32, 32).unwrap().with_palette(palette);

	let mut framebuffer = Framebuffer::new(32, 32);
	let report = renderer.render_into(0, &mut framebuffer).unwrap();
	assert!(report.is_clean());
	assert_eq!(report.touched.bits(), 0b0001);

	// interior rows 0..=9, row y spans x in 0..=10-y
	let expected: Vec<(i32, i32)> = (0..10).flat_map(|y| (0..=10 - y).map(move |x| (x, y))).collect();
	assert_eq!(lit(renderer.planes().get(0).unwrap()), expected);
	for plane in 1..4 {
		assert!(lit(renderer.planes().get(plane).unwrap()).is_empty());
	}

	for y in 0..32 {
		for x in 0..32 {
			let inside = expected.contains(&(x as i32, y as i32));
			let want = if inside {
				ink
			} else {
				Color::BLACK
			};
			assert_eq!(framebuffer.get(x, y), Some(want), "pixel ({}, {})", x, y);
		}
	}
}

#[test]
fn triangle_to_square_tween() {
	// triangle at 0, then a frame holding one tween (0xE6 -> plane 0), then the square
	let mut data = polygon(0xD2, &TRIANGLE);
	let frame = data.len();
	data.extend_from_slice(&[1, 0xE6]);
	let position = data.len();
	let back = position as u16;
	let target = position + 6;
	let fwd = (target - position) as u16;
	data.extend_from_slice(&back.to_be_bytes());
	data.extend_from_slice(&fwd.to_be_bytes());
	data.extend_from_slice(&[1, 2]);
	data.extend(polygon(0xD2, &SQUARE));

	let revision = FormatRevision::four_plane();
	let script = Script::new(vec![frame], data).unwrap();

	let (ops, end) = script.decode_frame(0, &revision).unwrap();
	assert_eq!(end, target);
	let DrawOp::Tween {
		plane,
		tween: tween_ref,
		..
	} = &ops[0]
	else {
		panic!("expected a tween, got {}", ops[0]);
	};
	assert_eq!(*plane, 0);
	assert_eq!(tween_ref.from_offset, 0);
	assert_eq!(tween_ref.to_offset, target);

	let shape = tween(script.data(), 0, target, 1, 2, &revision).unwrap();
	assert_eq!(shape, Polygon::from_pairs(&[(0, 0), (0, 10), (10, 15), (15, 0)]));

	let mut renderer = Renderer::new(script.clone(), revision, 32, 32).unwrap();
	let report = renderer.render_frame(0).unwrap();
	assert!(report.is_clean());
	assert_eq!(report.drawn, 1);

	let mut expected = Plane::new(0, 32, 32);
	Rasterizer::new().fill(&mut expected, shape.vertices(), true);
	assert_eq!(renderer.planes().get(0).unwrap(), &expected);
}

#[test]
fn placement_scales_whole_frame() {
	let script = script_from_frames(&[vec![polygon(0xD2, &[(0, 0), (0, 4), (4, 4), (4, 0)])]]);
	let placement = Placement::fit(512, 408);
	assert_eq!(placement.scale, 2);

	let mut renderer =
		Renderer::new(script, FormatRevision::four_plane(), 512, 408).unwrap().with_placement(placement);
	renderer.render_frame(0).unwrap();
	assert_eq!(renderer.planes().get(0).unwrap().lit_count(), 8 * 9);
}

#[test]
fn single_plane_revision_limits_draw_count() {
	let revision = FormatRevision::single_plane();
	let seven = vec![polygon(0xD0, &[]); 7];
	let script = script_from_frames(&[vec![polygon(0xD7, &TRIANGLE)], seven]);
	let mut renderer = Renderer::new(script, revision, 16, 16).unwrap();

	let report = renderer.render_frame(0).unwrap();
	assert!(report.is_clean());
	assert_eq!(report.touched.bits(), 0b0001);

	let report = renderer.render_frame(1).unwrap();
	assert!(matches!(
		report.fault,
		Some(SotaError::InvalidDrawCount {
			count: 7,
			max: 6,
			..
		})
	));
	// nothing drawn, previous frame persists
	assert_eq!(report.drawn, 0);
	assert_eq!(renderer.planes().get(0).unwrap().lit_count(), 65);
}

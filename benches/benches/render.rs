//! Benchmark suite for the decode and render pipeline
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sota_benches::{generate_script, sizes, star};
use sota_types::prelude::*;
use std::hint::black_box;

fn star_polygon(points: usize) -> Polygon {
	let pairs: Vec<(i32, i32)> =
		star(points, 90.0, (102.0, 128.0), 0.0).into_iter().map(|(y, x)| (i32::from(y), i32::from(x))).collect();
	Polygon::from_pairs(&pairs)
}

fn script(size: (usize, usize, usize)) -> Script {
	let (indices, data) = generate_script(size.0, size.1, size.2);
	match Script::new(indices, data) {
		Ok(script) => script,
		Err(err) => panic!("generated script is invalid: {}", err),
	}
}

/// Benchmark the scanline fill with growing vertex counts
fn bench_raster_fill(c: &mut Criterion) {
	let mut group = c.benchmark_group("raster_fill");

	for points in [4, 16, 64, 200] {
		let polygon = star_polygon(points);
		let mut plane = Plane::new(0, 256, 204);
		let mut rasterizer = Rasterizer::new();

		group.throughput(Throughput::Elements(points as u64));
		group.bench_with_input(BenchmarkId::new("star", points), &polygon, |b, polygon| {
			b.iter(|| {
				rasterizer.fill(&mut plane, black_box(polygon.vertices()), false);
			});
		});
	}

	// scaled up to a 1024x816 display
	let polygon = star_polygon(16);
	let mut plane = Plane::new(0, 1024, 816);
	let mut rasterizer = Rasterizer::with_placement(Placement::fit(1024, 816));
	group.bench_function("star_scaled_x4", |b| {
		b.iter(|| {
			rasterizer.fill(&mut plane, black_box(polygon.vertices()), false);
		});
	});

	group.finish();
}

/// Benchmark command stream decoding alone
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("decode");
	let revision = FormatRevision::four_plane();

	for (name, size) in [("light", sizes::LIGHT), ("typical", sizes::TYPICAL), ("heavy", sizes::HEAVY)] {
		let script = script(size);
		group.throughput(Throughput::Bytes(script.data().len() as u64));
		group.bench_with_input(BenchmarkId::new("all_frames", name), &script, |b, script| {
			b.iter(|| {
				let mut ops = 0;
				for index in 0..script.frame_count() {
					if let Ok(decoder) = script.frame(index, &revision) {
						ops += decoder.filter(Result::is_ok).count();
					}
				}
				black_box(ops)
			});
		});
	}

	group.finish();
}

/// Benchmark tween synthesis
fn bench_tween(c: &mut Criterion) {
	let mut group = c.benchmark_group("tween");
	let revision = FormatRevision::four_plane();

	for points in [6, 48, 200] {
		let mut data = sota_benches::polygon_record(0xD2, &star(points / 2, 40.0, (100.0, 100.0), 0.0));
		let to = data.len();
		data.extend(sota_benches::polygon_record(0xD2, &star(points, 80.0, (100.0, 100.0), 0.3)));

		group.bench_with_input(BenchmarkId::new("resample", points), &data, |b, data| {
			b.iter(|| black_box(tween(black_box(data), 0, to, 3, 8, &revision)));
		});
	}

	group.finish();
}

/// Benchmark plane compositing
fn bench_compose(c: &mut Criterion) {
	let mut group = c.benchmark_group("compose");

	for (width, height) in [(256, 204), (640, 480), (1024, 816)] {
		let mut planes = PlaneStore::new(4, width, height);
		let mut rasterizer = Rasterizer::with_placement(Placement::fit(width as i32, height as i32));
		for (index, plane) in planes.iter_mut().enumerate() {
			rasterizer.fill(plane, star_polygon(8 + index * 4).vertices(), true);
		}
		let palette = Palette::layered();
		let mut framebuffer = Framebuffer::new(width, height);
		let mut compositor = Compositor::new();

		group.throughput(Throughput::Elements((width * height) as u64));
		group.bench_function(BenchmarkId::new("four_planes", format!("{}x{}", width, height)), |b| {
			b.iter(|| {
				compositor.compose(&planes, &palette, &mut framebuffer);
				black_box(framebuffer.pixels().len())
			});
		});
	}

	group.finish();
}

/// Full end-to-end benchmark: decode, tween, fill and composite every frame
fn bench_render_frames(c: &mut Criterion) {
	let mut group = c.benchmark_group("render");
	group.sample_size(50);

	for (name, size) in [("light", sizes::LIGHT), ("typical", sizes::TYPICAL), ("heavy", sizes::HEAVY)] {
		let script = script(size);
		let frames = script.frame_count();
		let renderer = match Renderer::new(script, FormatRevision::four_plane(), 256, 204) {
			Ok(renderer) => renderer,
			Err(err) => panic!("renderer setup failed: {}", err),
		};

		group.throughput(Throughput::Elements(frames as u64));
		group.bench_with_input(BenchmarkId::new("all_frames", name), &renderer, |b, renderer| {
			let mut renderer = renderer.clone();
			b.iter(|| {
				for index in 0..frames {
					let _ = black_box(renderer.render_frame(index));
				}
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_raster_fill, bench_decode, bench_tween, bench_compose, bench_render_frames);

criterion_main!(benches);

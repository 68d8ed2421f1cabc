//! Polygon Animation Example
//!
//! This example builds a small animation script in memory and walks it through the
//! whole pipeline.
//!
//! Features demonstrated:
//! - Encoding polygon and tween commands by hand
//! - Decoding a frame's draw list
//! - Rendering frames and reading back palette indices
//! - Stepping through the animation with a playback cursor
//! - Fading between palettes
//! - Exporting frames as PNG images

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use log::info;

use sota_internal::prelude::*;

/// Tween command drawing into plane 2.
const TWEEN: u8 = 0xE8;
/// Number of tween steps in the demo animation.
const STEPS: u8 = 8;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	info!("=== Polygon Animation Example ===\n");

	let cargo_root = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
	let out_root = PathBuf::from(&cargo_root).join("target").join("sota_example");
	std::fs::create_dir_all(&out_root).with_context(|| format!("Failed to create {}", out_root.display()))?;

	let script = build_script()?;

	// Example 1: Decode draw lists
	example_decode(&script)?;

	// Example 2: Render one frame as text
	example_ascii(&script)?;

	// Example 3: Step through the animation and export frames
	example_export(&script, &out_root)?;

	// Example 4: Palette fade
	example_palette_fade();

	info!("\n✓ Polygon animation examples complete!");
	Ok(())
}

/// Encodes a polygon command followed by its `(y, x)` pairs.
fn polygon_record(command: u8, pairs: &[(u8, u8)]) -> Vec<u8> {
	let mut record = vec![command, pairs.len() as u8];
	for &(y, x) in pairs {
		record.extend([y, x]);
	}
	record
}

/// Builds a script where a square on plane 0 stays put while a triangle on plane 2
/// morphs into a diamond.
///
/// ```text
/// [triangle][frame 0][frame 1]...[frame 8][diamond]
/// ```
fn build_script() -> Result<Script> {
	let mut data = polygon_record(0xD4, &[(40, 96), (160, 48), (160, 144)]);
	let square = polygon_record(0xD2, &[(60, 110), (60, 190), (140, 190), (140, 110)]);

	let mut indices = Vec::new();
	let mut tween_positions = Vec::new();
	for t in 0..=STEPS {
		indices.push(data.len());
		data.push(2);
		data.extend(&square);

		data.push(TWEEN);
		let position = data.len();
		tween_positions.push(position);
		data.extend((position as u16).to_be_bytes());
		data.extend([0, 0, t, STEPS]);
	}

	let target = data.len();
	data.extend(polygon_record(0xD4, &[(30, 128), (100, 200), (170, 128), (100, 56)]));

	for position in tween_positions {
		let forward = (target - position) as u16;
		data[position + 2..position + 4].copy_from_slice(&forward.to_be_bytes());
	}

	Ok(Script::new(indices, data)?)
}

/// Example 1: Decode draw lists
fn example_decode(script: &Script) -> Result<()> {
	info!("Example 1: Decoding draw lists\n");

	let revision = FormatRevision::four_plane();
	info!("  Script: {}", script);
	info!("  Revision: {}", revision);

	for index in [0, script.frame_count() - 1] {
		let (ops, end) = script.decode_frame(index, &revision)?;
		info!("  Frame {} ({} ops, ends at {:#06x}):", index, ops.len(), end);
		for op in &ops {
			info!("    {}", op);
		}
	}

	info!("");
	Ok(())
}

/// Example 2: Render one frame as text
fn example_ascii(script: &Script) -> Result<()> {
	info!("Example 2: Rendering a frame as text\n");

	let mut renderer = Renderer::new(script.clone(), FormatRevision::four_plane(), 256, 204)?;
	let report = renderer.render_frame(STEPS as usize / 2)?;
	info!("  {}", report);

	// one character per 8x8 cell: plane 0 only, plane 2 only, both
	let indices = compose_indices(renderer.planes(), 256, 204);
	for cy in (0..204).step_by(8) {
		let line: String = (0..256)
			.step_by(8)
			.map(|cx| match indices[(cy + 4) * 256 + cx + 4] {
				0 => '.',
				0b0001 => '#',
				0b0100 => 'o',
				_ => '@',
			})
			.collect();
		info!("  {}", line);
	}

	info!("");
	Ok(())
}

/// Example 3: Step through the animation and export frames
fn example_export(script: &Script, out_root: &Path) -> Result<()> {
	info!("Example 3: Exporting frames\n");

	let (width, height) = (512, 408);
	let mut renderer = Renderer::new(script.clone(), FormatRevision::four_plane(), width, height)?
		.with_placement(Placement::fit(width as i32, height as i32));
	let mut playback = Playback::new(renderer.frame_count());

	while let Some(index) = playback.step() {
		let report = renderer.render_frame(index)?;
		let framebuffer = renderer.framebuffer();

		let image = RgbaImage::from_raw(width as u32, height as u32, framebuffer.to_rgba_bytes())
			.context("Framebuffer size does not match its pixel data")?;
		let path = out_root.join(format!("frame_{:02}.png", index));
		image.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;

		let lit = renderer.planes().iter().map(Plane::lit_count).collect::<Vec<_>>();
		info!("  ✓ {} ({} draws, lit pixels per plane {:?})", path.display(), report.drawn, lit);
	}

	info!("");
	Ok(())
}

/// Example 4: Palette fade
fn example_palette_fade() {
	info!("Example 4: Fading from monochrome to layered\n");

	let from = Palette::monochrome();
	let to = Palette::layered();
	for step in 0..=4 {
		match Palette::lerp(&from, &to, step, 4) {
			Ok(palette) => info!("  step {}: {}", step, palette),
			Err(e) => info!("  ✗ step {}: {}", step, e),
		}
	}
}

//! Animation script CLI utility
//!
//! A command-line tool for inspecting, rendering and converting polygon animation scripts.
//!
//! # Features
//!
//! - **info**: Summarize a script and check that every frame decodes
//! - **dump**: List the draw operations of one or all frames
//! - **render**: Render frames to PNG images with a JSON manifest
//! - **play**: Drive timed playback and report how many frames were drawn
//! - **convert**: Convert between the JSON and packed binary containers
//!
//! # Format Revisions
//!
//! The command mapping starts from a built-in preset (`--preset`) and can be overridden
//! by a TOML or JSON file (`--revision`) and by `SOTA_REVISION_*` environment variables:
//!
//! ```toml
//! name = "two-plane"
//! plane_count = 2
//! plane_map = [0, 0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1]
//! max_draws_per_frame = 6
//!
//! [unknown]
//! policy = "abort"
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Summary of a script
//! cargo run --example sota_utils info script067230.json
//!
//! # Dump frame 12 with raw bytes
//! cargo run --example sota_utils dump script067230.json --frame 12 --hex
//!
//! # Render every frame, scaled to 640x480
//! cargo run --example sota_utils render script067230.json frames/ --width 640 --height 480 --fit
//!
//! # Convert to the packed container
//! cargo run --example sota_utils convert script067230.json script067230.bin
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
	time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::RgbaImage;
use log::{info, warn};
use serde::Serialize;
use sota_rs::prelude::*;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args),
		Command::Dump(args) => run_dump(args),
		Command::Render(args) => run_render(args),
		Command::Play(args) => run_play(args),
		Command::Convert(args) => run_convert(args),
	}
}

#[derive(Parser)]
#[command(name = "sota_utils")]
#[command(author = "sota-rs project")]
#[command(version)]
#[command(about = "Inspect, render and convert polygon animation scripts", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Summarize a script and check every frame
	Info(InfoArgs),
	/// List the draw operations of a script
	Dump(DumpArgs),
	/// Render frames to PNG images
	Render(RenderArgs),
	/// Simulate timed playback
	Play(PlayArgs),
	/// Convert between JSON and packed containers
	Convert(ConvertArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
	/// Four planes with tweens
	FourPlane,
	/// One plane, 1 to 6 draws per frame
	SinglePlane,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaletteChoice {
	/// Plane colors, highest plane on top
	Layered,
	/// White on black
	Monochrome,
}

#[derive(Args)]
struct ScriptArgs {
	/// Script file (`.json`, `.idx` with a sibling `.dat`, otherwise packed binary)
	#[arg(value_name = "SCRIPT")]
	script: PathBuf,

	/// Built-in format revision to start from
	#[arg(long, value_enum, default_value = "four-plane")]
	preset: Preset,

	/// TOML or JSON file overriding the format revision
	#[arg(long, value_name = "FILE")]
	revision: Option<PathBuf>,
}

#[derive(Args)]
struct InfoArgs {
	#[command(flatten)]
	script: ScriptArgs,

	/// List every frame that does not decode cleanly
	#[arg(short, long, default_value_t = false)]
	verbose: bool,
}

#[derive(Args)]
struct DumpArgs {
	#[command(flatten)]
	script: ScriptArgs,

	/// Only dump this frame
	#[arg(short, long, value_name = "INDEX")]
	frame: Option<usize>,

	/// Show the raw bytes of every operation
	#[arg(long, default_value_t = false)]
	hex: bool,
}

#[derive(Args)]
struct ViewArgs {
	/// Output width in pixels
	#[arg(long, default_value_t = 256)]
	width: usize,

	/// Output height in pixels
	#[arg(long, default_value_t = 204)]
	height: usize,

	/// Scale the 256x204 source to the output size (integer scale, bottom aligned)
	#[arg(long, default_value_t = false)]
	fit: bool,

	/// Palette preset
	#[arg(long, value_enum, default_value = "layered")]
	palette: PaletteChoice,

	/// Explicit palette, comma separated (e.g. `#000,#0f0,#00f,#0ff`)
	#[arg(long, value_name = "COLORS", value_delimiter = ',')]
	colors: Vec<String>,
}

#[derive(Args)]
struct RenderArgs {
	#[command(flatten)]
	script: ScriptArgs,

	/// Output directory
	#[arg(value_name = "OUTPUT_DIR")]
	output: PathBuf,

	#[command(flatten)]
	view: ViewArgs,

	/// Only render up to and including this frame
	#[arg(long, value_name = "INDEX")]
	last: Option<usize>,
}

#[derive(Args)]
struct PlayArgs {
	#[command(flatten)]
	script: ScriptArgs,

	#[command(flatten)]
	view: ViewArgs,

	/// Milliseconds per frame
	#[arg(long, default_value_t = 33)]
	interval: u64,

	/// Milliseconds between ticks
	#[arg(long, default_value_t = 10)]
	poll: u64,

	/// Sleep between ticks instead of simulating the clock
	#[arg(long, default_value_t = false)]
	realtime: bool,
}

#[derive(Args)]
struct ConvertArgs {
	/// Input script (`.json`, `.idx` with a sibling `.dat`, otherwise packed binary)
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Output script; `.json` writes JSON, anything else the packed container
	#[arg(value_name = "OUTPUT")]
	output: PathBuf,

	/// Write the index table and data stream as two files (`OUTPUT.idx`, `OUTPUT.dat`)
	#[arg(long, default_value_t = false)]
	split: bool,
}

/// Manifest written next to rendered frames
#[derive(Serialize)]
struct RenderManifest {
	script: String,
	revision: String,
	width: usize,
	height: usize,
	frames: Vec<FrameEntry>,
}

#[derive(Serialize)]
struct FrameEntry {
	index: usize,
	offset: usize,
	file: String,
	drawn: usize,
	skipped: usize,
	touched: u8,
	rejected: Vec<String>,
	fault: Option<String>,
}

impl FrameEntry {
	fn new(report: &FrameReport, file: String) -> Self {
		Self {
			index: report.frame,
			offset: report.offset,
			file,
			drawn: report.drawn,
			skipped: report.skipped,
			touched: report.touched.bits(),
			rejected: report.rejected.iter().map(ToString::to_string).collect(),
			fault: report.fault.as_ref().map(ToString::to_string),
		}
	}
}

fn load_script(args: &ScriptArgs) -> Result<Script> {
	let script =
		Script::open(&args.script).with_context(|| format!("Failed to load {}", args.script.display()))?;
	info!("Loaded {}: {}", args.script.display(), script);
	Ok(script)
}

fn load_revision(args: &ScriptArgs) -> Result<FormatRevision> {
	let preset = match args.preset {
		Preset::FourPlane => FormatRevision::four_plane(),
		Preset::SinglePlane => FormatRevision::single_plane(),
	};

	let mut builder = config::Config::builder().add_source(config::Config::try_from(&preset)?);
	if let Some(path) = &args.revision {
		if !path.exists() {
			bail!("Revision file {} does not exist", path.display());
		}
		builder = builder.add_source(config::File::from(path.as_path()));
	}
	builder = builder.add_source(config::Environment::with_prefix("SOTA_REVISION").try_parsing(true));

	let revision: FormatRevision =
		builder.build()?.try_deserialize().context("Invalid format revision configuration")?;
	revision.validate()?;
	info!("Format revision: {}", revision);
	Ok(revision)
}

fn build_palette(view: &ViewArgs) -> Result<Palette> {
	if !view.colors.is_empty() {
		let colors = view
			.colors
			.iter()
			.map(|c| c.parse::<Color>())
			.collect::<Result<Vec<_>, _>>()
			.context("Invalid --colors")?;
		return Ok(Palette::from_colors(&colors)?);
	}

	Ok(match view.palette {
		PaletteChoice::Layered => Palette::layered(),
		PaletteChoice::Monochrome => Palette::monochrome(),
	})
}

fn build_renderer(script: Script, revision: FormatRevision, view: &ViewArgs) -> Result<Renderer> {
	if view.width == 0 || view.height == 0 {
		bail!("Output size must be non-zero, got {}x{}", view.width, view.height);
	}

	let mut renderer = Renderer::new(script, revision, view.width, view.height)?.with_palette(build_palette(view)?);
	if view.fit {
		let placement = Placement::fit(view.width as i32, view.height as i32);
		info!("Placement: scale {}, offset ({}, {})", placement.scale, placement.x, placement.y);
		renderer = renderer.with_placement(placement);
	}
	Ok(renderer)
}

fn run_info(args: InfoArgs) -> Result<()> {
	let script = load_script(&args.script)?;
	let revision = load_revision(&args.script)?;

	let mut unique = script.indices().to_vec();
	unique.sort_unstable();
	unique.dedup();

	println!("Frames:         {}", script.frame_count());
	println!("Distinct lists: {}", unique.len());
	println!("Data size:      {} bytes", script.data().len());

	let mut ops = 0;
	let mut faulty = 0;
	for index in 0..script.frame_count() {
		match script.decode_frame(index, &revision) {
			Ok((frame_ops, _)) => ops += frame_ops.len(),
			Err(err) if !err.is_frame_local() => return Err(err.into()),
			Err(err) => {
				faulty += 1;
				if args.verbose {
					println!("  frame {:>5}: {}", index, err);
				}
			}
		}
	}

	println!("Operations:     {}", ops);
	println!("Faulty frames:  {}", faulty);
	Ok(())
}

fn run_dump(args: DumpArgs) -> Result<()> {
	let script = load_script(&args.script)?;
	let revision = load_revision(&args.script)?;

	let frames = match args.frame {
		Some(index) => {
			if index >= script.frame_count() {
				bail!("Frame {} out of range (frame count: {})", index, script.frame_count());
			}
			index..index + 1
		}
		None => 0..script.frame_count(),
	};

	for index in frames {
		let mut decoder = script.frame(index, &revision)?;
		println!("frame {} @ {:#06x}", index, decoder.start());

		while let Some(result) = decoder.next() {
			match result {
				Ok(op) => {
					println!("  {}", op);
					if args.hex {
						let bytes = &script.data()[op.offset()..decoder.position()];
						println!("    {}", hex::encode(bytes));
					}
				}
				Err(err) => {
					println!("  error: {}", err);
					break;
				}
			}
		}
		if let Some(end) = decoder.end_offset() {
			println!("  end @ {:#06x}", end);
		}
	}
	Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
	let script = load_script(&args.script)?;
	let revision = load_revision(&args.script)?;
	let revision_name = revision.name.clone();
	let mut renderer = build_renderer(script, revision, &args.view)?;

	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

	let last = match args.last {
		Some(last) => last.min(renderer.frame_count().saturating_sub(1)),
		None => renderer.frame_count().saturating_sub(1),
	};

	let mut framebuffer = Framebuffer::new(args.view.width, args.view.height);
	let mut entries = Vec::new();
	if renderer.frame_count() > 0 {
		for index in 0..=last {
			let report = renderer.render_into(index, &mut framebuffer)?;
			if !report.is_clean() {
				warn!("{}", report);
			}

			let file = format!("frame_{:05}.png", index);
			save_png(&framebuffer, &args.output.join(&file))?;
			entries.push(FrameEntry::new(&report, file));
		}
	}

	let manifest = RenderManifest {
		script: args.script.script.display().to_string(),
		revision: revision_name,
		width: args.view.width,
		height: args.view.height,
		frames: entries,
	};
	let manifest_path = args.output.join("manifest.json");
	fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
		.with_context(|| format!("Failed to write {}", manifest_path.display()))?;

	info!("Rendered {} frames to {}", manifest.frames.len(), args.output.display());
	Ok(())
}

fn save_png(framebuffer: &Framebuffer, path: &Path) -> Result<()> {
	let image = RgbaImage::from_raw(
		framebuffer.width() as u32,
		framebuffer.height() as u32,
		framebuffer.to_rgba_bytes(),
	)
	.context("Framebuffer size does not match its pixel data")?;
	image.save(path).with_context(|| format!("Failed to write {}", path.display()))?;
	Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
	let script = load_script(&args.script)?;
	let revision = load_revision(&args.script)?;
	let mut renderer = build_renderer(script, revision, &args.view)?;

	let poll = Duration::from_millis(args.poll.max(1));
	let mut playback =
		Playback::new(renderer.frame_count()).with_frame_interval(Duration::from_millis(args.interval));

	let start = Instant::now();
	let mut now = start;
	let mut rendered = 0usize;
	let mut unchanged = 0usize;
	let mut faulty = 0usize;
	playback.animate(start);

	loop {
		match playback.tick(now) {
			Tick::Render(index) => {
				let report = renderer.render_frame(index)?;
				if !report.is_clean() {
					faulty += 1;
					warn!("{}", report);
				}
				rendered += 1;
			}
			Tick::Unchanged(_) => unchanged += 1,
			Tick::Finished | Tick::Idle => break,
		}

		if args.realtime {
			std::thread::sleep(poll);
			now = Instant::now();
		} else {
			now += poll;
		}
	}

	let skipped = renderer.frame_count().saturating_sub(rendered);
	info!(
		"Played {} frames in {:?}: {} rendered, {} dropped, {} redundant ticks, {} faulty",
		renderer.frame_count(),
		now.duration_since(start),
		rendered,
		skipped,
		unchanged,
		faulty
	);
	Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
	let script = Script::open(&args.input).with_context(|| format!("Failed to load {}", args.input.display()))?;

	if args.split {
		let index_path = args.output.with_extension("idx");
		let data_path = args.output.with_extension("dat");
		let (index_table, data) = script.to_split()?;
		fs::write(&index_path, index_table)?;
		fs::write(&data_path, data)?;
		info!("Wrote {} and {}", index_path.display(), data_path.display());
		return Ok(());
	}

	let is_json = args.output.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("json"));
	let bytes = if is_json {
		script.to_json_string()?.into_bytes()
	} else {
		script.to_packed()?
	};
	fs::write(&args.output, bytes).with_context(|| format!("Failed to write {}", args.output.display()))?;
	info!("Converted {} -> {} ({})", args.input.display(), args.output.display(), script);
	Ok(())
}

//! Playback cursor.
//!
//! [`Playback`] decides which frame to show; it never renders anything itself and never
//! reads a clock. Callers feed it timestamps, which keeps it deterministic under test.
//!
//! Two modes are supported:
//!
//! - stepping: [`Playback::step`] hands out the next frame index each call;
//! - animating: after [`Playback::animate`], [`Playback::tick`] maps elapsed time to a
//!   frame index at a fixed interval, reporting repeated indices as unchanged so the
//!   caller can skip redundant redraws. Playback stops after the last frame; it does not
//!   loop.

use std::time::{Duration, Instant};

use log::debug;

/// Default time each frame stays on screen.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Result of [`Playback::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
	/// A new frame is due
	Render(usize),
	/// The frame on screen is still current
	Unchanged(usize),
	/// The animation ran past the last frame and stopped
	Finished,
	/// Not animating
	Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	Stepping,
	Animating {
		started: Instant,
		first: usize,
	},
}

/// Frame selection state for one script.
#[derive(Debug, Clone)]
pub struct Playback {
	frame_count: usize,
	cursor: usize,
	frame_interval: Duration,
	mode: Mode,
	last_rendered: Option<usize>,
}

impl Playback {
	/// Creates a stepping cursor at frame 0.
	pub fn new(frame_count: usize) -> Self {
		Self {
			frame_count,
			cursor: 0,
			frame_interval: DEFAULT_FRAME_INTERVAL,
			mode: Mode::Stepping,
			last_rendered: None,
		}
	}

	/// Uses `interval` per frame while animating.
	///
	/// A zero interval is raised to one millisecond.
	pub fn with_frame_interval(mut self, interval: Duration) -> Self {
		self.frame_interval = interval.max(Duration::from_millis(1));
		self
	}

	/// Number of frames.
	pub fn frame_count(&self) -> usize {
		self.frame_count
	}

	/// Time per frame while animating.
	pub fn frame_interval(&self) -> Duration {
		self.frame_interval
	}

	/// Index the next [`Playback::step`] will return.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Most recently handed-out frame.
	pub fn position(&self) -> Option<usize> {
		self.last_rendered
	}

	/// Returns `true` while animating.
	pub fn is_animating(&self) -> bool {
		matches!(self.mode, Mode::Animating { .. })
	}

	/// Returns `true` once every frame has been handed out.
	pub fn is_finished(&self) -> bool {
		self.cursor >= self.frame_count
	}

	/// Moves the cursor to `index`, clamped to the frame count.
	pub fn seek(&mut self, index: usize) {
		self.cursor = index.min(self.frame_count);
	}

	/// Moves the cursor back to frame 0 and stops animating.
	pub fn restart(&mut self) {
		self.cursor = 0;
		self.last_rendered = None;
		self.mode = Mode::Stepping;
	}

	/// Returns the frame at the cursor and advances it.
	///
	/// Returns `None` once the end is reached, and keeps returning `None`.
	pub fn step(&mut self) -> Option<usize> {
		if self.cursor >= self.frame_count {
			return None;
		}
		let index = self.cursor;
		self.cursor += 1;
		self.last_rendered = Some(index);
		Some(index)
	}

	/// Starts continuous playback from the cursor at time `now`.
	pub fn animate(&mut self, now: Instant) {
		debug!("animating from frame {} at {:?} per frame", self.cursor, self.frame_interval);
		self.mode = Mode::Animating {
			started: now,
			first: self.cursor,
		};
	}

	/// Stops continuous playback, leaving the cursor after the last frame shown.
	pub fn stop(&mut self) {
		self.mode = Mode::Stepping;
	}

	/// Selects the frame due at `now`.
	pub fn tick(&mut self, now: Instant) -> Tick {
		let Mode::Animating {
			started,
			first,
		} = self.mode
		else {
			return Tick::Idle;
		};

		let elapsed = now.saturating_duration_since(started);
		let advanced = (elapsed.as_nanos() / self.frame_interval.as_nanos()) as usize;
		let index = first.saturating_add(advanced);

		if index >= self.frame_count {
			debug!("animation finished after {} frames", self.frame_count.saturating_sub(first));
			self.mode = Mode::Stepping;
			self.cursor = self.frame_count;
			return Tick::Finished;
		}

		self.cursor = index + 1;
		if self.last_rendered == Some(index) {
			return Tick::Unchanged(index);
		}
		self.last_rendered = Some(index);
		Tick::Render(index)
	}
}

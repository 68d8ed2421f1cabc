//! Frame renderer.
//!
//! A [`Renderer`] owns everything one playback session needs: the script, the format
//! revision, the planes, the palette and the reusable rasterizer and compositor
//! buffers. Rendering frame `n` decodes its draw list, fills every polygon (synthesizing
//! tween shapes first) and composites the planes.
//!
//! ## Plane lifetime
//!
//! The first draw into a plane within a frame clears that plane; later draws in the
//! same frame XOR on top. Planes the frame never draws into keep the previous frame's
//! pixels and still take part in compositing.
//!
//! ## Faults
//!
//! Decode errors are local to the frame: the renderer logs them, stops decoding that
//! frame, composites whatever was drawn and returns the error in the [`FrameReport`].
//! Tweens whose references do not resolve are logged and skipped without touching
//! their plane.

use log::{debug, warn};

use crate::{
	anim::{
		decode::{DrawOp, FrameDecoder},
		format::FormatRevision,
		polygon::Vertex,
		script::Script,
		tween::tween_ref,
	},
	error::SotaError,
	gfx::{
		compose::{Compositor, Framebuffer},
		palette::Palette,
		plane::{PlaneMask, PlaneStore},
		raster::{Placement, Rasterizer},
	},
};

/// Outcome of rendering one frame.
#[derive(Debug)]
pub struct FrameReport {
	/// Frame index
	pub frame: usize,
	/// Offset of the frame's draw list
	pub offset: usize,
	/// Number of polygons filled, tweens included
	pub drawn: usize,
	/// Number of commands that drew nothing
	pub skipped: usize,
	/// Planes cleared and drawn into by this frame
	pub touched: PlaneMask,
	/// Offset just past the draw list, if it decoded completely
	pub end_offset: Option<usize>,
	/// Tweens that were skipped because their references did not resolve
	pub rejected: Vec<SotaError>,
	/// Error that ended the frame early
	pub fault: Option<SotaError>,
}

impl FrameReport {
	fn new(frame: usize, offset: usize) -> Self {
		Self {
			frame,
			offset,
			drawn: 0,
			skipped: 0,
			touched: PlaneMask::empty(),
			end_offset: None,
			rejected: Vec::new(),
			fault: None,
		}
	}

	/// Returns `true` if the frame decoded completely and every tween resolved.
	pub fn is_clean(&self) -> bool {
		self.fault.is_none() && self.rejected.is_empty()
	}
}

impl std::fmt::Display for FrameReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"frame {} @ {:#06x}: {} drawn, {} skipped, planes {}",
			self.frame, self.offset, self.drawn, self.skipped, self.touched
		)?;
		if !self.rejected.is_empty() {
			write!(f, ", {} tweens rejected", self.rejected.len())?;
		}
		if let Some(fault) = &self.fault {
			write!(f, ", stopped: {}", fault)?;
		}
		Ok(())
	}
}

/// Renders frames of one script.
///
/// # Examples
///
/// ```
/// use sota_types::anim::{format::FormatRevision, script::Script};
/// use sota_types::render::Renderer;
///
/// // one frame, one triangle into plane 0
/// let script = Script::new(vec![0], vec![1, 0xD2, 3, 0, 0, 0, 10, 10, 0])?;
/// let mut renderer = Renderer::new(script, FormatRevision::four_plane(), 16, 16)?;
///
/// let report = renderer.render_frame(0)?;
/// assert_eq!(report.drawn, 1);
/// assert!(report.touched.contains(0));
/// assert_ne!(renderer.framebuffer().get(1, 1), renderer.framebuffer().get(15, 15));
/// # Ok::<(), sota_types::error::SotaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
	script: Script,
	revision: FormatRevision,
	planes: PlaneStore,
	palette: Palette,
	rasterizer: Rasterizer,
	compositor: Compositor,
	framebuffer: Framebuffer,
}

impl Renderer {
	/// Creates a renderer with `revision.plane_count` cleared planes of
	/// `width` x `height` and the default palette.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidFormat`] if the revision table is inconsistent.
	pub fn new(script: Script, revision: FormatRevision, width: usize, height: usize) -> Result<Self, SotaError> {
		revision.validate()?;
		debug!("renderer: {}, revision {}, {}x{}", script, revision.name, width, height);

		Ok(Self {
			planes: PlaneStore::new(revision.plane_count, width, height),
			script,
			revision,
			palette: Palette::default(),
			rasterizer: Rasterizer::new(),
			compositor: Compositor::new(),
			framebuffer: Framebuffer::new(width, height),
		})
	}

	/// Replaces the palette.
	pub fn with_palette(mut self, palette: Palette) -> Self {
		self.palette = palette;
		self
	}

	/// Replaces the vertex placement.
	pub fn with_placement(mut self, placement: Placement) -> Self {
		self.rasterizer.set_placement(placement);
		self
	}

	/// Replaces the plane buffers, e.g. with larger scrollable ones.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidFormat`] if the store does not hold exactly
	/// `plane_count` planes.
	pub fn with_planes(mut self, planes: PlaneStore) -> Result<Self, SotaError> {
		if planes.len() != self.revision.plane_count {
			return Err(SotaError::InvalidFormat(format!(
				"{} planes given, revision {} uses {}",
				planes.len(),
				self.revision.name,
				self.revision.plane_count
			)));
		}
		self.planes = planes;
		Ok(self)
	}

	/// The script being rendered.
	pub fn script(&self) -> &Script {
		&self.script
	}

	/// The active format revision.
	pub fn revision(&self) -> &FormatRevision {
		&self.revision
	}

	/// The planes.
	pub fn planes(&self) -> &PlaneStore {
		&self.planes
	}

	/// The planes, mutably (for scrolling).
	pub fn planes_mut(&mut self) -> &mut PlaneStore {
		&mut self.planes
	}

	/// The palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Replaces the palette, e.g. while fading.
	pub fn set_palette(&mut self, palette: Palette) {
		self.palette = palette;
	}

	/// The internal framebuffer written by [`Renderer::render_frame`].
	pub fn framebuffer(&self) -> &Framebuffer {
		&self.framebuffer
	}

	/// Number of frames in the script.
	pub fn frame_count(&self) -> usize {
		self.script.frame_count()
	}

	/// Clears every plane.
	pub fn reset(&mut self) {
		self.planes.clear_all();
	}

	/// Draws frame `index` into the planes without compositing.
	///
	/// # Errors
	///
	/// Returns [`SotaError::FrameIndexExhausted`] if `index` is past the last frame, or
	/// any other error that is not [frame-local](SotaError::is_frame_local). Frame-local
	/// errors are reported through [`FrameReport::fault`].
	pub fn draw_frame(&mut self, index: usize) -> Result<FrameReport, SotaError> {
		let offset = self.script.frame_offset(index)?;
		let mut report = FrameReport::new(index, offset);

		let Self {
			script,
			revision,
			planes,
			rasterizer,
			..
		} = self;
		let (data, revision) = (script.data(), &*revision);

		let mut decoder = FrameDecoder::new(data, offset, revision);
		for result in decoder.by_ref() {
			let op = match result {
				Ok(op) => op,
				Err(err) if !err.is_frame_local() => return Err(err),
				Err(err) => {
					warn!("frame {}: {}", index, err);
					report.fault = Some(err);
					break;
				}
			};

			let drawn = match op {
				DrawOp::Polygon {
					plane,
					polygon,
					..
				} => fill(planes, rasterizer, &mut report.touched, plane, polygon.vertices()),
				DrawOp::Tween {
					offset,
					plane,
					tween,
					..
				} => match tween_ref(data, &tween, revision) {
					Ok(shape) => fill(planes, rasterizer, &mut report.touched, plane, shape.vertices()),
					Err(fault) => {
						let err = SotaError::invalid_tween(offset, fault);
						warn!("frame {}: skipping {}", index, err);
						report.rejected.push(err);
						report.skipped += 1;
						continue;
					}
				},
				DrawOp::Skip {
					..
				} => {
					report.skipped += 1;
					continue;
				}
			};

			match drawn {
				Ok(()) => report.drawn += 1,
				Err(err) if !err.is_frame_local() => return Err(err),
				Err(err) => {
					warn!("frame {}: {}", index, err);
					report.fault = Some(err);
					break;
				}
			}
		}
		report.end_offset = decoder.end_offset();

		debug!("{}", report);
		Ok(report)
	}

	/// Draws frame `index` and composites it into `framebuffer`.
	///
	/// The framebuffer size selects the viewport.
	pub fn render_into(&mut self, index: usize, framebuffer: &mut Framebuffer) -> Result<FrameReport, SotaError> {
		let report = self.draw_frame(index)?;
		self.compositor.compose(&self.planes, &self.palette, framebuffer);
		Ok(report)
	}

	/// Draws frame `index` and composites it into the internal framebuffer.
	pub fn render_frame(&mut self, index: usize) -> Result<FrameReport, SotaError> {
		let report = self.draw_frame(index)?;
		self.compositor.compose(&self.planes, &self.palette, &mut self.framebuffer);
		Ok(report)
	}

	/// Composites the current planes into `framebuffer` without drawing.
	pub fn composite(&mut self, framebuffer: &mut Framebuffer) {
		self.compositor.compose(&self.planes, &self.palette, framebuffer);
	}
}

/// Fills one shape, clearing the plane on its first draw this frame.
fn fill(
	planes: &mut PlaneStore,
	rasterizer: &mut Rasterizer,
	touched: &mut PlaneMask,
	plane: u8,
	vertices: &[Vertex],
) -> Result<(), SotaError> {
	let target = planes.get_mut(plane)?;
	let clear = !touched.contains(plane);
	touched.insert(plane);
	rasterizer.fill(target, vertices, clear);
	Ok(())
}

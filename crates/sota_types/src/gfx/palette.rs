//! Colours and the indexed palette.
//!
//! The compositor ORs the pen bits of up to four planes, so a palette needs at most
//! 16 entries. Index 0 is the background.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SotaError;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Opaque black.
	pub const BLACK: Self = Self::rgb(0, 0, 0);

	/// Opaque white.
	pub const WHITE: Self = Self::rgb(255, 255, 255);

	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Components in `[r, g, b, a]` order.
	pub const fn to_array(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}

	/// Blends each channel `step / total` of the way towards `to`.
	///
	/// The partial difference truncates towards zero and the result saturates at 255.
	fn lerp(self, to: Self, step: u32, total: u32) -> Self {
		if step == 0 {
			return self;
		}
		let channel = |from: u8, to: u8| -> u8 {
			let delta = (i64::from(to) - i64::from(from)) * i64::from(step) / i64::from(total);
			(i64::from(from) + delta).clamp(0, 0xFF) as u8
		};
		Self::new(channel(self.r, to.r), channel(self.g, to.g), channel(self.b, to.b), channel(self.a, to.a))
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::BLACK
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
		if self.a != 255 {
			write!(f, "{:02x}", self.a)?;
		}
		Ok(())
	}
}

impl FromStr for Color {
	type Err = SotaError;

	/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`; the leading `#` is optional.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let hex = s.trim().trim_start_matches('#');
		let invalid = || SotaError::InvalidPalette(format!("invalid color {:?}", s));
		let digit = |i: usize| -> Result<u8, SotaError> {
			let part = hex.get(i..i + 1).ok_or_else(invalid)?;
			u8::from_str_radix(part, 16).map_err(|_| invalid())
		};
		let byte = |i: usize| -> Result<u8, SotaError> {
			let part = hex.get(i..i + 2).ok_or_else(invalid)?;
			u8::from_str_radix(part, 16).map_err(|_| invalid())
		};

		match hex.len() {
			3 => Ok(Self::rgb(digit(0)? * 0x11, digit(1)? * 0x11, digit(2)? * 0x11)),
			6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
			8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
			_ => Err(invalid()),
		}
	}
}

/// Indexed palette for the combined plane bits.
///
/// # Examples
///
/// ```
/// use sota_types::gfx::palette::{Color, Palette};
///
/// let palette = Palette::layered();
/// assert_eq!(palette.get(0), Color::BLACK);
/// assert_eq!(palette.get(0b0001), Color::rgb(0, 255, 0));
/// // plane 2 is drawn above plane 0
/// assert_eq!(palette.get(0b0101), Color::rgb(255, 0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Largest number of entries (four planes).
	pub const MAX_COLORS: usize = 16;

	/// Colors assigned to planes 0-3 by [`Palette::layered`].
	pub const PLANE_COLORS: [Color; 4] = [
		Color::rgb(0x00, 0xFF, 0x00),
		Color::rgb(0x00, 0x00, 0xFF),
		Color::rgb(0xFF, 0x00, 0x00),
		Color::rgb(0xFF, 0xFF, 0x00),
	];

	/// Creates a palette with all 16 entries set to black.
	pub fn new() -> Self {
		Self {
			colors: vec![Color::BLACK; Self::MAX_COLORS],
		}
	}

	/// Creates a palette from explicit entries.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidPalette`] if more than 16 colors are given.
	pub fn from_colors(colors: &[Color]) -> Result<Self, SotaError> {
		if colors.len() > Self::MAX_COLORS {
			return Err(SotaError::InvalidPalette(format!(
				"{} colors given, at most {} allowed",
				colors.len(),
				Self::MAX_COLORS
			)));
		}
		Ok(Self {
			colors: colors.to_vec(),
		})
	}

	/// Black background, every lit index white.
	pub fn monochrome() -> Self {
		let mut colors = vec![Color::WHITE; Self::MAX_COLORS];
		colors[0] = Color::BLACK;
		Self {
			colors,
		}
	}

	/// Each index takes the color of its highest lit plane, as if the planes were
	/// painted in order with [`Palette::PLANE_COLORS`].
	pub fn layered() -> Self {
		let colors = (0..Self::MAX_COLORS)
			.map(|index| match (0..4).rev().find(|&plane| index & (1 << plane) != 0) {
				Some(plane) => Self::PLANE_COLORS[plane],
				None => Color::BLACK,
			})
			.collect();
		Self {
			colors,
		}
	}

	/// Number of defined entries.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` if no entries are defined.
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Color at `index`; undefined entries are black.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors.get(usize::from(index)).copied().unwrap_or_default()
	}

	/// Sets the color at `index`.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidPalette`] if `index` is 16 or more.
	pub fn set(&mut self, index: u8, color: Color) -> Result<(), SotaError> {
		let index = usize::from(index);
		if index >= Self::MAX_COLORS {
			return Err(SotaError::InvalidPalette(format!("index {} out of range", index)));
		}
		if index >= self.colors.len() {
			self.colors.resize(index + 1, Color::BLACK);
		}
		self.colors[index] = color;
		Ok(())
	}

	/// Defined entries.
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Fades from `from` to `to`, `step` out of `total` steps along.
	///
	/// Every channel of every entry moves by `(to - from) * step / total`, truncated
	/// towards zero. `step == 0` returns `from` unchanged and `step == total` returns
	/// `to`. Entries missing from one side are treated as black.
	///
	/// # Errors
	///
	/// Returns [`SotaError::InvalidPalette`] if `step > total`.
	///
	/// # Examples
	///
	/// ```
	/// use sota_types::gfx::palette::{Color, Palette};
	///
	/// let from = Palette::from_colors(&[Color::BLACK])?;
	/// let to = Palette::from_colors(&[Color::rgb(100, 200, 255)])?;
	/// let half = Palette::lerp(&from, &to, 1, 2)?;
	/// assert_eq!(half.get(0), Color::rgb(50, 100, 127));
	/// # Ok::<(), sota_types::error::SotaError>(())
	/// ```
	pub fn lerp(from: &Self, to: &Self, step: u32, total: u32) -> Result<Self, SotaError> {
		if step > total {
			return Err(SotaError::InvalidPalette(format!("blend step {} is past total {}", step, total)));
		}

		let len = from.len().max(to.len());
		let colors = (0..len)
			.map(|i| {
				let a = from.colors.get(i).copied().unwrap_or_default();
				let b = to.colors.get(i).copied().unwrap_or_default();
				a.lerp(b, step, total)
			})
			.collect();
		Ok(Self {
			colors,
		})
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::layered()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colors defined", self.colors.len())
	}
}

//! End-to-end tests for `sota-rs`

mod formats;
mod properties;
mod scenarios;

use sota_rs::prelude::*;

/// Encodes a polygon draw command.
pub(crate) fn polygon(command: u8, vertices: &[(u8, u8)]) -> Vec<u8> {
	let mut bytes = vec![command, vertices.len() as u8];
	for &(y, x) in vertices {
		bytes.extend_from_slice(&[y, x]);
	}
	bytes
}

/// Builds a script from frames given as lists of encoded commands, laid out back to back.
pub(crate) fn script_from_frames(frames: &[Vec<Vec<u8>>]) -> Script {
	let mut indices = Vec::new();
	let mut data = Vec::new();
	for commands in frames {
		indices.push(data.len());
		data.push(commands.len() as u8);
		for command in commands {
			data.extend_from_slice(command);
		}
	}
	Script::new(indices, data).unwrap()
}

/// Lit pixels of a plane as `(x, y)` pairs.
pub(crate) fn lit(plane: &Plane) -> Vec<(i32, i32)> {
	let mut pixels = Vec::new();
	for y in 0..plane.height() as i32 {
		for x in 0..plane.width() as i32 {
			if plane.is_set(x, y) {
				pixels.push((x, y));
			}
		}
	}
	pixels
}

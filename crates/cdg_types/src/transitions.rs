//! Block-order tables that define progressive tile reveal patterns.

use crate::error::TransitionError;
use crate::vram::{COLS, ROWS};
use std::io::{Read, Write};

/// A permutation (or subset) of tile positions, plus a flag describing
/// whether all positions share a single packet time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	/// Ordered `(col, row)` tile positions.
	pub order: Vec<(u8, u8)>,
	/// If true, every tile shares one packet time (used by text clips so all
	/// their blocks draw on the same tick).
	pub no_transition: bool,
}

impl Transition {
	/// The default transition: row-major order, one packet per tile.
	pub fn row_major() -> Self {
		let mut order = Vec::with_capacity(COLS * ROWS);
		for row in 0..ROWS as u8 {
			for col in 0..COLS as u8 {
				order.push((col, row));
			}
		}
		Self {
			order,
			no_transition: false,
		}
	}

	/// A transition marking that every tile position shares one packet time.
	/// Used for text clips: all glyph tiles appear on the same tick.
	pub fn no_transition() -> Self {
		let mut t = Self::row_major();
		t.no_transition = true;
		t
	}

	fn wipe(mut key: impl FnMut(u8, u8) -> (i32, i32, i32)) -> Self {
		let mut order: Vec<(u8, u8)> = (0..ROWS as u8).flat_map(|row| (0..COLS as u8).map(move |col| (col, row))).collect();
		order.sort_by_key(|&(col, row)| key(col, row));
		Self {
			order,
			no_transition: false,
		}
	}

	/// Reveals tiles column by column, left to right.
	pub fn wipe_left() -> Self {
		Self::wipe(|col, row| (col as i32, row as i32, 0))
	}

	/// Reveals tiles column by column, right to left.
	pub fn wipe_right() -> Self {
		Self::wipe(|col, row| (-(col as i32), row as i32, 0))
	}

	/// Reveals tiles row by row, top to bottom.
	pub fn wipe_top() -> Self {
		Self::wipe(|col, row| (row as i32, col as i32, 0))
	}

	/// Reveals tiles row by row, bottom to top.
	pub fn wipe_bottom() -> Self {
		Self::wipe(|col, row| (-(row as i32), col as i32, 0))
	}

	/// Reveals tiles along ascending `col + row` diagonals.
	pub fn diagonal() -> Self {
		Self::wipe(|col, row| ((col as i32) + (row as i32), col as i32, 0))
	}

	/// A deterministic pseudo-random shuffle of every tile position, seeded
	/// by `seed` so the same project always produces the same byte-for-byte
	/// stream (§5's reproducibility requirement).
	pub fn random(seed: u64) -> Self {
		let mut order: Vec<(u8, u8)> = Self::row_major().order;
		let mut state = seed | 1; // xorshift64 needs a nonzero state
		for i in (1..order.len()).rev() {
			state ^= state << 13;
			state ^= state >> 7;
			state ^= state << 17;
			let j = (state as usize) % (i + 1);
			order.swap(i, j);
		}
		Self {
			order,
			no_transition: false,
		}
	}

	/// Looks up a transition by name from the built-in registry.
	///
	/// Recognized names: `"row-major"` (also `"none"`, kept as an alias for
	/// existing callers), `"no_transition"`, `"wipe-left"`, `"wipe-right"`,
	/// `"wipe-top"`, `"wipe-bottom"`, `"diagonal"`, `"random"`.
	pub fn by_name(name: &str) -> Result<Self, TransitionError> {
		match name {
			"row-major" | "none" => Ok(Self::row_major()),
			"no_transition" => Ok(Self::no_transition()),
			"wipe-left" => Ok(Self::wipe_left()),
			"wipe-right" => Ok(Self::wipe_right()),
			"wipe-top" => Ok(Self::wipe_top()),
			"wipe-bottom" => Ok(Self::wipe_bottom()),
			"diagonal" => Ok(Self::diagonal()),
			"random" => Ok(Self::random(0x5EED_CAFE_u64)),
			other => Err(TransitionError::UnknownName(other.to_string())),
		}
	}

	/// Serializes the transition table to the on-disk format: a
	/// little-endian `u32` count followed by that many `(u8 col, u8 row)`
	/// pairs.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(4 + self.order.len() * 2);
		out.extend_from_slice(&(self.order.len() as u32).to_le_bytes());
		for &(col, row) in &self.order {
			out.push(col);
			out.push(row);
		}
		out
	}

	/// Writes the transition table to `writer` in the format documented in
	/// [`Self::to_bytes`].
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), TransitionError> {
		writer.write_all(&self.to_bytes())?;
		Ok(())
	}

	/// Parses a transition table from bytes in the format documented in
	/// [`Self::to_bytes`].
	pub fn from_bytes(data: &[u8]) -> Result<Self, TransitionError> {
		if data.len() < 4 {
			return Err(TransitionError::Malformed("buffer shorter than the 4-byte count prefix".into()));
		}
		let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
		let expected_len = 4 + count * 2;
		if data.len() < expected_len {
			return Err(TransitionError::Malformed(format!(
				"declared {count} entries but buffer has only {} bytes of pair data",
				data.len() - 4
			)));
		}
		let mut order = Vec::with_capacity(count);
		for i in 0..count {
			let base = 4 + i * 2;
			order.push((data[base], data[base + 1]));
		}
		Ok(Self {
			order,
			no_transition: false,
		})
	}

	/// Reads a transition table from any reader in the format documented in
	/// [`Self::to_bytes`].
	pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, TransitionError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}
}

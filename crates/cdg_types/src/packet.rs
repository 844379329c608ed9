//! The 24-byte CD+G subcode packet.

use crate::error::PacketError;

/// Fixed command byte for every CD+G "TV graphics" subcode packet.
pub const COMMAND: u8 = 0x09;

/// Recognized packet instructions (low 6 bits of the instruction byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
	/// Fill the entire screen with a single color.
	MemoryPreset = 0x01,
	/// Set the border color.
	BorderPreset = 0x02,
	/// Draw a 6x12 tile using COPY semantics (overwrite).
	TileBlockCopy = 0x06,
	/// Draw a 6x12 tile using XOR semantics (toggle).
	TileBlockXor = 0x26,
	/// Load palette entries 0..7.
	LoadPaletteLo = 0x04,
	/// Load palette entries 8..15.
	LoadPaletteHi = 0x0C,
	/// Scroll the screen by a quantised amount.
	ScrollPreset = 0x08,
	/// Mark a palette index as transparent for overlay compositing.
	TransparentColor = 0x1F,
	/// Private prelude marker written by the exporter: low palette load.
	LoadLow = 0x0E,
	/// Private prelude marker written by the exporter: high palette load.
	LoadHigh = 0x1E,
}

impl Instruction {
	/// Maps a raw instruction byte (already masked to 6 bits) to a known
	/// instruction, if recognized.
	pub fn from_u8(value: u8) -> Option<Self> {
		match value & 0x3F {
			0x01 => Some(Self::MemoryPreset),
			0x02 => Some(Self::BorderPreset),
			0x06 => Some(Self::TileBlockCopy),
			0x26 => Some(Self::TileBlockXor),
			0x04 => Some(Self::LoadPaletteLo),
			0x0C => Some(Self::LoadPaletteHi),
			0x08 => Some(Self::ScrollPreset),
			0x1F => Some(Self::TransparentColor),
			0x0E => Some(Self::LoadLow),
			0x1E => Some(Self::LoadHigh),
			_ => None,
		}
	}
}

/// Number of instruction-specific payload bytes in a packet.
const PAYLOAD_LEN: usize = 16;

/// A single 24-byte CD+G subcode record.
///
/// Layout: `command(1) | instruction(1) | parity_q(2) | payload(16) |
/// parity_p(4)`. Parity bytes are always written zero; this crate never
/// computes real CD subcode parity since playback hardware recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet {
	instruction: u8,
	payload: [u8; PAYLOAD_LEN],
}

impl Packet {
	/// Size of a serialized packet, in bytes.
	pub const SIZE: usize = 24;

	/// Creates a blank packet: command `0x09`, instruction `0`, all-zero payload.
	pub fn new() -> Self {
		Self {
			instruction: 0,
			payload: [0; PAYLOAD_LEN],
		}
	}

	/// Returns the low 6 bits of the instruction byte.
	#[inline]
	pub fn instruction(&self) -> u8 {
		self.instruction & 0x3F
	}

	/// Sets the instruction byte. Only the low 6 bits are kept; any higher
	/// bits are clamped away, mirroring how a real decoder masks the field.
	#[inline]
	pub fn set_instruction(&mut self, value: u8) {
		self.instruction = value & 0x3F;
	}

	/// Reads a payload byte by index. Out-of-range indices (`>= 16`) return 0.
	#[inline]
	pub fn data_byte(&self, i: usize) -> u8 {
		self.payload.get(i).copied().unwrap_or(0)
	}

	/// Writes a payload byte by index. Out-of-range indices (`>= 16`) are
	/// silently ignored.
	#[inline]
	pub fn set_data_byte(&mut self, i: usize, value: u8) {
		if let Some(slot) = self.payload.get_mut(i) {
			*slot = value;
		}
	}

	/// Serializes the packet to its fixed 24-byte wire form.
	pub fn serialize(&self) -> [u8; Self::SIZE] {
		let mut out = [0u8; Self::SIZE];
		out[0] = COMMAND;
		out[1] = self.instruction;
		// bytes 2..3 parity Q, left zero
		out[4..20].copy_from_slice(&self.payload);
		// bytes 20..23 parity P, left zero
		out
	}

	/// Parses a packet from a byte slice. Fails if fewer than 24 bytes are
	/// supplied. The command byte of the input is not validated here; callers
	/// that need strict conformance should check `command() == COMMAND`.
	pub fn deserialize(buf: &[u8]) -> Result<Self, PacketError> {
		if buf.len() < Self::SIZE {
			return Err(PacketError::BufferTruncated {
				actual: buf.len(),
			});
		}

		let mut payload = [0u8; PAYLOAD_LEN];
		payload.copy_from_slice(&buf[4..20]);

		Ok(Self {
			instruction: buf[1] & 0x3F,
			payload,
		})
	}

	/// Builds a `MEMORY_PRESET` packet with the given fill color and repeat
	/// index (both clamped to 4 bits).
	pub fn memory_preset(color: u8, repeat: u8) -> Self {
		let mut p = Self::new();
		p.set_instruction(Instruction::MemoryPreset as u8);
		p.set_data_byte(0, color & 0x0F);
		p.set_data_byte(1, repeat & 0x0F);
		p
	}

	/// Builds the decoder-safe idle packet used for padding and gap filling:
	/// a `MEMORY_PRESET` with repeat index 15.
	pub fn idle() -> Self {
		Self::memory_preset(0, 0x0F)
	}

	/// Builds a `BORDER_PRESET` packet with the given border color.
	pub fn border_preset(color: u8) -> Self {
		let mut p = Self::new();
		p.set_instruction(Instruction::BorderPreset as u8);
		p.set_data_byte(0, color & 0x0F);
		p
	}

	/// Builds a `TRANSPARENT_COLOR` packet marking `index` as transparent.
	pub fn transparent_color(index: u8) -> Self {
		let mut p = Self::new();
		p.set_instruction(Instruction::TransparentColor as u8);
		p.set_data_byte(0, index & 0x0F);
		p
	}

	/// Builds a `SCROLL_PRESET` packet with quantised horizontal/vertical
	/// scroll commands.
	pub fn scroll_preset(color: u8, h_scroll_cmd: u8, v_scroll_cmd: u8) -> Self {
		let mut p = Self::new();
		p.set_instruction(Instruction::ScrollPreset as u8);
		p.set_data_byte(0, color & 0x0F);
		p.set_data_byte(1, h_scroll_cmd);
		p.set_data_byte(2, v_scroll_cmd);
		p
	}

	/// Builds a `LOAD_PALETTE_LO` or `LOAD_PALETTE_HI` packet (depending on
	/// `hi`) encoding 8 consecutive RGB colors (6 bits/channel) starting at
	/// the appropriate palette offset.
	///
	/// `colors` must contain exactly 8 `(r, g, b)` tuples, each component
	/// already reduced to 6 bits (0..63).
	pub fn load_palette(hi: bool, colors: &[(u8, u8, u8); 8]) -> Self {
		let mut p = Self::new();
		p.set_instruction(if hi {
			Instruction::LoadPaletteHi as u8
		} else {
			Instruction::LoadPaletteLo as u8
		});
		for (i, &(r, g, b)) in colors.iter().enumerate() {
			let r = r & 0x3F;
			let g = g & 0x3F;
			let b = b & 0x3F;
			let byte_a = (r << 4) | (g >> 2);
			let byte_b = ((g & 0x03) << 4) | b;
			p.set_data_byte(i * 2, byte_a);
			p.set_data_byte(i * 2 + 1, byte_b);
		}
		p
	}

	/// Builds the exporter's private prelude marker packets. These carry the
	/// same payload shape as [`Self::load_palette`] but use the `LoadLow` /
	/// `LoadHigh` instruction codes that mark the first two prelude slots.
	pub fn prelude_load(hi: bool, colors: &[(u8, u8, u8); 8]) -> Self {
		let mut p = Self::load_palette(hi, colors);
		p.set_instruction(if hi {
			Instruction::LoadHigh as u8
		} else {
			Instruction::LoadLow as u8
		});
		p
	}

	/// Builds a tile-drawing packet (`TILE_COPY` or `TILE_XOR`).
	///
	/// `row` is clamped to 0..=17 (5 bits), `column` to 0..=49 (6 bits).
	/// `rows` holds 12 row bitmasks, each using only its low 6 bits
	/// (MSB = leftmost column).
	pub fn tile_block(xor: bool, color0: u8, color1: u8, row: u8, column: u8, rows: &[u8; 12]) -> Self {
		let mut p = Self::new();
		p.set_instruction(if xor {
			Instruction::TileBlockXor as u8
		} else {
			Instruction::TileBlockCopy as u8
		});
		p.set_data_byte(0, color0 & 0x0F);
		p.set_data_byte(1, color1 & 0x0F);
		p.set_data_byte(2, row.min(17) & 0x1F);
		p.set_data_byte(3, column.min(49) & 0x3F);
		for (i, &r) in rows.iter().enumerate() {
			p.set_data_byte(4 + i, r & 0x3F);
		}
		p
	}
}

impl Default for Packet {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_packet_is_all_zero_payload() {
		let p = Packet::new();
		assert_eq!(p.instruction(), 0);
		for i in 0..16 {
			assert_eq!(p.data_byte(i), 0);
		}
	}

	#[test]
	fn serialize_always_has_command_and_zero_reserved() {
		let p = Packet::memory_preset(3, 0);
		let bytes = p.serialize();
		assert_eq!(bytes.len(), Packet::SIZE);
		assert_eq!(bytes[0], COMMAND);
		assert_eq!(&bytes[2..4], &[0, 0]);
		assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
	}

	#[test]
	fn round_trip_preserves_fields() {
		let original = Packet::tile_block(false, 5, 9, 3, 40, &[0x3F; 12]);
		let bytes = original.serialize();
		let parsed = Packet::deserialize(&bytes).unwrap();
		assert_eq!(parsed, original);
	}

	#[test]
	fn deserialize_rejects_short_buffer() {
		let buf = [0u8; 10];
		let err = Packet::deserialize(&buf).unwrap_err();
		matches!(err, PacketError::BufferTruncated { actual: 10 });
	}

	#[test]
	fn instruction_clamps_to_six_bits() {
		let mut p = Packet::new();
		p.set_instruction(0x109 as u8); // truncates to u8 first: 0x09
		assert_eq!(p.instruction(), 0x09);
	}

	#[test]
	fn out_of_range_data_byte_reads_zero_and_writes_are_ignored() {
		let mut p = Packet::new();
		assert_eq!(p.data_byte(99), 0);
		p.set_data_byte(99, 42); // no panic, no effect
		assert_eq!(p.data_byte(99), 0);
	}

	#[test]
	fn idle_packet_is_memory_preset_with_repeat_fifteen() {
		let p = Packet::idle();
		assert_eq!(p.instruction(), Instruction::MemoryPreset as u8);
		assert_eq!(p.data_byte(1), 0x0F);
	}

	#[test]
	fn tile_block_clamps_row_and_column() {
		let p = Packet::tile_block(true, 0, 1, 200, 200, &[0; 12]);
		assert_eq!(p.data_byte(2), 17);
		assert_eq!(p.data_byte(3), 49);
		assert_eq!(p.instruction(), Instruction::TileBlockXor as u8);
	}

	#[test]
	fn load_palette_encodes_six_bit_channels() {
		let colors = [(0x3F, 0x00, 0x00); 8];
		let p = Packet::load_palette(false, &colors);
		assert_eq!(p.instruction(), Instruction::LoadPaletteLo as u8);
		// byte A = (R<<4)|(G>>2) = (0x3F<<4)|0 = 0xF0 (masked into payload byte, but data_byte returns raw)
		assert_eq!(p.data_byte(0), 0xF0);
		assert_eq!(p.data_byte(1), 0x00);
	}

	#[test]
	fn instruction_from_u8_recognizes_all_opcodes() {
		for &(raw, expected) in &[
			(0x01u8, Instruction::MemoryPreset),
			(0x02, Instruction::BorderPreset),
			(0x06, Instruction::TileBlockCopy),
			(0x26, Instruction::TileBlockXor),
			(0x04, Instruction::LoadPaletteLo),
			(0x0C, Instruction::LoadPaletteHi),
			(0x08, Instruction::ScrollPreset),
			(0x1F, Instruction::TransparentColor),
			(0x0E, Instruction::LoadLow),
			(0x1E, Instruction::LoadHigh),
		] {
			assert_eq!(Instruction::from_u8(raw), Some(expected));
		}
		assert_eq!(Instruction::from_u8(0x3E), None);
	}
}

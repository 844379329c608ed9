//! Decomposes a composited 6x12 block into the minimal sequence of CD+G
//! tile-drawing packets.
//!
//! ## Algorithm
//!
//! A block with 1 distinct color needs a single `TILE_COPY` filling every
//! row with `0x3F`. A block with exactly 2 colors needs a single
//! `TILE_COPY` whose row bits mark the second color. A block with 3 or more
//! colors is split into up to 4 bitplanes (CD+G's 16 colors fit in 4 bits):
//! the lowest set bitplane across all pixels is written with `TILE_COPY`,
//! every subsequent plane is XORed in.

use crate::packet::Packet;
use crate::tile::{TILE_HEIGHT, TILE_PIXELS, TILE_WIDTH};

/// Encodes a fully opaque 72-pixel block (palette indices `0..16`) at tile
/// position `(col, row)` into the packets that reproduce it on a decoder,
/// regardless of the decoder's prior state at that position.
///
/// `block` pixel values above 15 are masked to their low 4 bits: the CD+G
/// wire format only has 4-bit color indices.
pub fn encode_block(col: u32, row: u32, block: &[u8; TILE_PIXELS]) -> Vec<Packet> {
	let masked: [u8; TILE_PIXELS] = {
		let mut m = [0u8; TILE_PIXELS];
		for (i, &v) in block.iter().enumerate() {
			m[i] = v & 0x0F;
		}
		m
	};

	let mut distinct: Vec<u8> = Vec::new();
	for &v in &masked {
		if !distinct.contains(&v) {
			distinct.push(v);
		}
	}
	distinct.sort_unstable();

	match distinct.len() {
		0 => unreachable!("a 72-pixel block always has at least one color"),
		1 => vec![encode_solid(col, row, distinct[0])],
		2 => vec![encode_two_color(col, row, distinct[0], distinct[1], &masked)],
		_ => encode_bitplanes(col, row, &masked),
	}
}

fn encode_solid(col: u32, row: u32, color: u8) -> Packet {
	Packet::tile_block(false, color, color, row as u8, col as u8, &[0x3F; TILE_HEIGHT])
}

fn encode_two_color(col: u32, row: u32, a: u8, b: u8, masked: &[u8; TILE_PIXELS]) -> Packet {
	let mut rows = [0u8; TILE_HEIGHT];
	for y in 0..TILE_HEIGHT {
		let mut bits = 0u8;
		for x in 0..TILE_WIDTH {
			if masked[y * TILE_WIDTH + x] == b {
				bits |= 1 << (TILE_WIDTH - 1 - x);
			}
		}
		rows[y] = bits;
	}
	Packet::tile_block(false, a, b, row as u8, col as u8, &rows)
}

fn encode_bitplanes(col: u32, row: u32, masked: &[u8; TILE_PIXELS]) -> Vec<Packet> {
	let mut packets = Vec::with_capacity(4);
	let mut first = true;
	for p in 0..4u8 {
		let bit = 1u8 << p;
		let mut rows = [0u8; TILE_HEIGHT];
		let mut any_set = false;
		for y in 0..TILE_HEIGHT {
			let mut bits = 0u8;
			for x in 0..TILE_WIDTH {
				if masked[y * TILE_WIDTH + x] & bit != 0 {
					bits |= 1 << (TILE_WIDTH - 1 - x);
					any_set = true;
				}
			}
			rows[y] = bits;
		}
		if !any_set {
			continue;
		}
		packets.push(Packet::tile_block(!first, 0, bit, row as u8, col as u8, &rows));
		first = false;
	}
	packets
}

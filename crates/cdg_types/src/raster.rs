//! Samples a clip's pixel buffer into an ordered sequence of scheduled tiles.

use crate::clip::Clip;
use crate::tile::{Tile, TILE_HEIGHT, TILE_WIDTH};
use crate::transitions::Transition;

/// One clip's tiles, already stamped with absolute packet indices, in the
/// order the transition says they should be drawn.
pub fn bitmap_to_tiles(clip: &Clip, start_packet: i64, transition: &Transition) -> Vec<Tile> {
	let (x_offset, y_offset, xor_only) = match clip.kind() {
		crate::clip::ClipKind::Bitmap { x_offset, y_offset, xor_only, .. } => (*x_offset, *y_offset, *xor_only),
		crate::clip::ClipKind::Scroll { .. } => (0, 0, false),
		_ => (0, 0, false),
	};

	let mut tiles = Vec::with_capacity(transition.order.len());
	for (i, &(col, row)) in transition.order.iter().enumerate() {
		let packet_index = start_packet + if transition.no_transition { 0 } else { i as i64 };
		let origin_x = col as i64 * TILE_WIDTH as i64 - x_offset as i64;
		let origin_y = row as i64 * TILE_HEIGHT as i64 - y_offset as i64;

		let mut tile = Tile::new(col as u32, row as u32);
		tile.packet_index = packet_index;
		tile.z = clip.z();
		tile.channel = clip.channel();
		tile.xor = xor_only;

		for dy in 0..TILE_HEIGHT {
			for dx in 0..TILE_WIDTH {
				let px = clip.pixel(origin_x + dx as i64, origin_y + dy as i64).unwrap_or(0);
				tile.set_pixel(dx, dy, px as u16);
			}
		}
		tiles.push(tile);
	}
	tiles
}

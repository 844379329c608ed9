//! The Scheduler/Exporter: merges registered clips into one packet stream.

use crate::clip::{Clip, ClipKind};
use crate::compositor::Compositor;
use crate::diagnostics::{emit, DiagnosticsSink, Severity};
use crate::encoder::encode_block;
use crate::error::ExportError;
use crate::packet::{Packet, COMMAND};
use crate::palette::{Dissolve, Palette};
use crate::raster::bitmap_to_tiles;
use crate::text::{rasterize_text, BuiltinFont, GlyphSource};
use crate::tile::{Tile, TILE_HEIGHT, TILE_PIXELS, TILE_WIDTH};
use crate::vram::Vram;

/// Number of prelude packets reserved at the start of every stream.
pub const PRELUDE_LEN: usize = 4;

/// How far past the target duration a clip's computed packet index may land
/// before it's treated as a fatal arithmetic error rather than a routine,
/// recoverable slot-collision drop.
pub const TICK_BUDGET_PACKETS: i64 = 300;

/// Optional collaborators an export pass can be given.
#[derive(Default)]
pub struct ExportOptions<'a> {
	/// Total stream length, in packets. The actual length is
	/// `max(target_duration, last clip's end + padding)`.
	pub target_duration: Option<u32>,
	/// Glyph source used to rasterize `Text` clips. Defaults to
	/// [`BuiltinFont`] when not given.
	pub font: Option<&'a dyn GlyphSource>,
}

fn reborrow_sink<'a>(sink: &'a mut Option<&mut dyn DiagnosticsSink>) -> Option<&'a mut dyn DiagnosticsSink> {
	match sink {
		Some(s) => Some(&mut **s),
		None => None,
	}
}

/// Coordinates the Compositor, VRAM mirror, and Palette across a whole
/// export pass, turning a list of clips into a finished packet stream.
pub struct Exporter {
	palette: Palette,
	compositor: Compositor,
	vram: Vram,
}

impl Exporter {
	/// Creates an exporter with a fresh all-black palette, compositor, and
	/// VRAM mirror.
	pub fn new() -> Self {
		Self {
			palette: Palette::new(),
			compositor: Compositor::new(),
			vram: Vram::new(),
		}
	}

	/// The palette as it stands after the most recent export pass.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Registers, schedules, and encodes `clips` into a finished byte
	/// stream: a flat sequence of 24-byte packets with no header or trailer.
	pub fn export_to_binary(&mut self, clips: Vec<Clip>, options: &ExportOptions, mut sink: Option<&mut dyn DiagnosticsSink>) -> Result<Vec<u8>, ExportError> {
		let max_clip_end = clips.iter().map(Clip::end_packet).max().unwrap_or(0);
		let n = (options.target_duration.map(|d| d as i64).unwrap_or(0)).max((max_clip_end + PRELUDE_LEN as i64).max(PRELUDE_LEN as i64)) as usize;

		let mut stream: Vec<Option<Packet>> = vec![None; n];
		self.write_prelude(&mut stream);

		let mut ordered: Vec<(usize, Clip)> = clips.into_iter().enumerate().collect();
		ordered.sort_by_key(|(index, clip)| (clip.track(), *index));

		let font: &dyn GlyphSource = options.font.unwrap_or(&DEFAULT_FONT);

		for (_, mut clip) in ordered {
			clip.mark_registered();
			self.expand_clip(&clip, &mut stream, n, font, reborrow_sink(&mut sink))?;
			clip.mark_packets_emitted();
		}

		fill_padding(&mut stream);
		let finalized = validate_stream(&stream)?;

		let mut out = Vec::with_capacity(finalized.len() * Packet::SIZE);
		for p in &finalized {
			out.extend_from_slice(&p.serialize());
		}
		Ok(out)
	}

	fn write_prelude(&self, stream: &mut [Option<Packet>]) {
		let entries = self.palette.decoder_entries();
		let lo: Vec<(u8, u8, u8)> = entries[0..8].iter().map(|c| c.to_six_bit()).collect();
		let hi: Vec<(u8, u8, u8)> = entries[8..16].iter().map(|c| c.to_six_bit()).collect();
		stream[0] = Some(Packet::prelude_load(false, lo.as_slice().try_into().unwrap()));
		stream[1] = Some(Packet::prelude_load(true, hi.as_slice().try_into().unwrap()));
		stream[2] = Some(Packet::memory_preset(0, 0));
		stream[3] = Some(Packet::border_preset(0));
	}

	fn expand_clip(&mut self, clip: &Clip, stream: &mut [Option<Packet>], n: usize, font: &dyn GlyphSource, mut sink: Option<&mut dyn DiagnosticsSink>) -> Result<(), ExportError> {
		match clip.kind() {
			ClipKind::PaletteChange { palette } => {
				self.expand_palette_change(clip, palette, stream, n, reborrow_sink(&mut sink))?;
			}
			ClipKind::Bitmap { .. } => {
				let transition = clip.resolve_transition()?;
				let tiles = bitmap_to_tiles(clip, clip.start_packet() + clip.draw_delay(), &transition);
				self.place_tiles(&tiles, stream, n, reborrow_sink(&mut sink))?;
			}
			ClipKind::Text { font: _, size: _, fg, bg, outline, karaoke, events } => {
				for event in events {
					let raster = rasterize_text(&event.text, font, event.bbox.2, event.bbox.3, *fg, *bg, *outline, *karaoke, 1.0);
					let synthetic = Clip::new(
						clip.start_packet(),
						clip.duration(),
						clip.track(),
						clip.channel(),
						clip.z(),
						ClipKind::Bitmap {
							width: raster.width,
							height: raster.height,
							pixels: raster.pixels,
							x_offset: -(event.bbox.0 as i32),
							y_offset: -(event.bbox.1 as i32),
							xor_only: false,
							transition: None,
						},
					)
					.map_err(ExportError::Clip)?;
					let transition = synthetic.resolve_transition()?;
					let start = clip.start_packet() + clip.draw_delay() + event.offset;
					let tiles = bitmap_to_tiles(&synthetic, start, &transition);
					self.place_tiles(&tiles, stream, n, reborrow_sink(&mut sink))?;
				}
			}
			ClipKind::Scroll { direction, step, interval, .. } => {
				self.expand_scroll(clip, *direction, *step, *interval, stream, n, reborrow_sink(&mut sink))?;
			}
		}
		Ok(())
	}

	fn expand_palette_change(&mut self, clip: &Clip, palette: &Palette, stream: &mut [Option<Packet>], n: usize, mut sink: Option<&mut dyn DiagnosticsSink>) -> Result<(), ExportError> {
		let start = clip.start_packet() + clip.draw_delay();
		match palette.dissolve() {
			Some(Dissolve { interval, steps }) if steps > 0 => {
				let before = self.palette.clone();
				for i in 0..steps {
					let t = (i + 1) as f32 / steps as f32;
					let mut step_colors = [crate::palette::Color::black(); 16];
					for (idx, slot) in step_colors.iter_mut().enumerate() {
						*slot = before.get(idx as u8).lerp(palette.get(idx as u8), t);
					}
					let offset = ((i as u64 * interval as u64 + steps as u64 / 2) / steps as u64) as i64;
					self.emit_palette_pair(start + offset, &step_colors, stream, n, reborrow_sink(&mut sink))?;
				}
				self.palette.set_decoder_entries(&palette.decoder_entries());
			}
			_ => {
				self.emit_palette_pair(start, &palette.decoder_entries(), stream, n, reborrow_sink(&mut sink))?;
				self.palette.set_decoder_entries(&palette.decoder_entries());
			}
		}
		Ok(())
	}

	fn emit_palette_pair(&self, at: i64, colors: &[crate::palette::Color; 16], stream: &mut [Option<Packet>], n: usize, mut sink: Option<&mut dyn DiagnosticsSink>) -> Result<(), ExportError> {
		let lo: Vec<(u8, u8, u8)> = colors[0..8].iter().map(|c| c.to_six_bit()).collect();
		let hi: Vec<(u8, u8, u8)> = colors[8..16].iter().map(|c| c.to_six_bit()).collect();
		let lo_packet = Packet::load_palette(false, lo.as_slice().try_into().unwrap());
		let hi_packet = Packet::load_palette(true, hi.as_slice().try_into().unwrap());
		place_packet(at, lo_packet, stream, n, reborrow_sink(&mut sink))?;
		place_packet(at, hi_packet, stream, n, reborrow_sink(&mut sink))?;
		Ok(())
	}

	fn expand_scroll(&mut self, clip: &Clip, direction: crate::clip::ScrollDirection, step: u32, interval: u32, stream: &mut [Option<Packet>], n: usize, mut sink: Option<&mut dyn DiagnosticsSink>) -> Result<(), ExportError> {
		use crate::clip::ScrollDirection as D;
		let (dx, dy): (i32, i32) = match direction {
			D::None => (0, 0),
			D::Left => (-(step as i32), 0),
			D::Right => (step as i32, 0),
			D::Up => (0, -(step as i32)),
			D::Down => (0, step as i32),
		};
		let interval = interval.max(1) as i64;
		let mut segment_start = clip.start_packet() + clip.draw_delay();
		let end = clip.end_packet();
		let mut segment_index: i64 = 0;
		while segment_start < end {
			if segment_index > 0 {
				let h_cmd = (dx.rem_euclid(TILE_WIDTH as i32)) as u8;
				let v_cmd = (dy.rem_euclid(TILE_HEIGHT as i32)) as u8;
				let preset = Packet::scroll_preset(0, h_cmd, v_cmd);
				place_packet(segment_start, preset, stream, n, reborrow_sink(&mut sink))?;
			}
			let accumulated_x = dx * segment_index as i32;
			let accumulated_y = dy * segment_index as i32;
			let shifted = Clip::new(
				segment_start,
				interval.min(end - segment_start).max(1),
				clip.track(),
				clip.channel(),
				clip.z(),
				retarget_scroll_as_bitmap(clip, accumulated_x, accumulated_y),
			)
			.map_err(ExportError::Clip)?;
			let transition = shifted.resolve_transition()?;
			let tiles = bitmap_to_tiles(&shifted, segment_start, &transition);
			self.place_tiles(&tiles, stream, n, reborrow_sink(&mut sink))?;

			segment_start += interval;
			segment_index += 1;
		}
		Ok(())
	}

	fn place_tiles(&mut self, tiles: &[Tile], stream: &mut [Option<Packet>], n: usize, mut sink: Option<&mut dyn DiagnosticsSink>) -> Result<(), ExportError> {
		for tile in tiles {
			if tile.packet_index < 0 || tile.packet_index > n as i64 + TICK_BUDGET_PACKETS {
				return Err(ExportError::ArithmeticOverflow {
					index: tile.packet_index,
					duration: n as u32,
				});
			}

			let mut block = [0u16; TILE_PIXELS];
			block.copy_from_slice(tile.pixels());
			self.compositor.write_block(tile.col, tile.row, tile.z, &block)?;
			let composited = self.compositor.read_composited_block(tile.col, tile.row);

			if self.vram.block_matches(tile.col, tile.row, &composited) {
				emit(reborrow_sink(&mut sink), Some(tile.packet_index), Severity::Info, "skipped", "composited block matches vram; no packet emitted");
				continue;
			}

			let packets = encode_block(tile.col, tile.row, &composited);
			let mut cursor = tile.packet_index;
			let mut placed_any = false;
			for packet in packets {
				match find_free_slot(stream, cursor, n as i64) {
					Some(slot) => {
						stream[slot] = Some(packet);
						cursor = slot as i64 + 1;
						placed_any = true;
					}
					None => {
						emit(reborrow_sink(&mut sink), Some(tile.packet_index), Severity::Warning, "dropped", "no free slot within target duration");
					}
				}
			}
			if placed_any {
				self.vram.write_block(tile.col, tile.row, &composited);
			}
		}
		Ok(())
	}
}

impl Default for Exporter {
	fn default() -> Self {
		Self::new()
	}
}

static DEFAULT_FONT: OnceFont = OnceFont;

struct OnceFont;

impl GlyphSource for OnceFont {
	fn glyph_bitmap(&self, ch: char) -> Option<&crate::text::GlyphBitmap> {
		thread_local_font().glyph_bitmap(ch)
	}
	fn advance_width(&self, ch: char) -> u32 {
		thread_local_font().advance_width(ch)
	}
	fn line_height(&self) -> u32 {
		thread_local_font().line_height()
	}
}

fn thread_local_font() -> &'static BuiltinFont {
	use std::sync::OnceLock;
	static FONT: OnceLock<BuiltinFont> = OnceLock::new();
	FONT.get_or_init(BuiltinFont::new)
}

fn retarget_scroll_as_bitmap(clip: &Clip, extra_x: i32, extra_y: i32) -> ClipKind {
	match clip.kind() {
		ClipKind::Scroll { width, height, pixels, wrap: _, .. } => ClipKind::Bitmap {
			width: *width,
			height: *height,
			pixels: pixels.clone(),
			x_offset: extra_x,
			y_offset: extra_y,
			xor_only: false,
			transition: None,
		},
		other => other.clone(),
	}
}

fn place_packet(at: i64, packet: Packet, stream: &mut [Option<Packet>], n: usize, sink: Option<&mut dyn DiagnosticsSink>) -> Result<(), ExportError> {
	if at < 0 || at > n as i64 + TICK_BUDGET_PACKETS {
		return Err(ExportError::ArithmeticOverflow { index: at, duration: n as u32 });
	}
	match find_free_slot(stream, at, n as i64) {
		Some(slot) => {
			stream[slot] = Some(packet);
		}
		None => {
			emit(sink, Some(at), Severity::Warning, "dropped", "no free slot within target duration");
		}
	}
	Ok(())
}

fn find_free_slot(stream: &[Option<Packet>], from: i64, limit: i64) -> Option<usize> {
	let start = from.max(0) as usize;
	let limit = limit.max(0) as usize;
	(start..limit).find(|&t| stream[t].is_none())
}

fn fill_padding(stream: &mut [Option<Packet>]) {
	for slot in stream.iter_mut() {
		if slot.is_none() {
			*slot = Some(Packet::idle());
		}
	}
}

/// Validates that every slot in an assembled stream is occupied and every
/// packet's command byte is the fixed CD+G TV-graphics command, returning
/// the unwrapped packets on success.
pub fn validate_stream(stream: &[Option<Packet>]) -> Result<Vec<Packet>, ExportError> {
	let mut out = Vec::with_capacity(stream.len());
	for (slot, entry) in stream.iter().enumerate() {
		match entry {
			None => return Err(ExportError::UnfilledSlot { slot }),
			Some(packet) => {
				let command = packet.serialize()[0];
				if command != COMMAND {
					return Err(ExportError::InvalidCommandByte { slot, command });
				}
				out.push(*packet);
			}
		}
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clip::ClipKind;
	use crate::packet::Instruction;

	#[test]
	fn minimal_encode_with_no_clips_yields_prelude_plus_padding() {
		let mut exporter = Exporter::new();
		let bytes = exporter.export_to_binary(vec![], &ExportOptions { target_duration: Some(10), font: None }, None).unwrap();
		assert_eq!(bytes.len(), 10 * Packet::SIZE);
		let p0 = Packet::deserialize(&bytes[0..24]).unwrap();
		assert_eq!(p0.instruction(), Instruction::LoadLow as u8);
		let p2 = Packet::deserialize(&bytes[48..72]).unwrap();
		assert_eq!(p2.instruction(), Instruction::MemoryPreset as u8);
	}

	#[test]
	fn single_color_tile_clip_emits_exactly_one_tile_packet() {
		let mut exporter = Exporter::new();
		let clip = Clip::new(10, 20, 0, 0, 0, ClipKind::Bitmap {
			width: 6,
			height: 12,
			pixels: vec![5u8; 72],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap();
		let bytes = exporter.export_to_binary(vec![clip], &ExportOptions { target_duration: Some(50), font: None }, None).unwrap();
		let packet_at = |i: usize| Packet::deserialize(&bytes[i * 24..i * 24 + 24]).unwrap();
		let p = packet_at(10);
		assert_eq!(p.instruction(), Instruction::TileBlockCopy as u8);
		assert_eq!(p.data_byte(0), 5);
	}

	#[test]
	fn vram_skip_avoids_redundant_packets() {
		let mut exporter = Exporter::new();
		// Two bitmap clips on different tracks drawing the same solid tile
		// at different start times: the second must be a VRAM no-op.
		let clip1 = Clip::new(0, 30, 0, 0, 0, ClipKind::Bitmap {
			width: 6,
			height: 12,
			pixels: vec![3u8; 72],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap();
		let clip2 = Clip::new(20, 30, 1, 0, 0, ClipKind::Bitmap {
			width: 6,
			height: 12,
			pixels: vec![3u8; 72],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap();
		let bytes = exporter.export_to_binary(vec![clip1, clip2], &ExportOptions { target_duration: Some(60), font: None }, None).unwrap();
		let packet_at = |i: usize| Packet::deserialize(&bytes[i * 24..i * 24 + 24]).unwrap();
		// Slot 20 should be idle (memory preset repeat 15), not another tile packet.
		let p20 = packet_at(20);
		assert_eq!(p20.instruction(), Instruction::MemoryPreset as u8);
		assert_eq!(p20.data_byte(1), 0x0F);
	}

	#[test]
	fn padding_after_last_clip_is_idle() {
		let mut exporter = Exporter::new();
		let clip = Clip::new(0, 5, 0, 0, 0, ClipKind::Bitmap {
			width: 6,
			height: 12,
			pixels: vec![1u8; 72],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap();
		let bytes = exporter.export_to_binary(vec![clip], &ExportOptions { target_duration: Some(20), font: None }, None).unwrap();
		let packet_at = |i: usize| Packet::deserialize(&bytes[i * 24..i * 24 + 24]).unwrap();
		let last = packet_at(19);
		assert_eq!(last.instruction(), Instruction::MemoryPreset as u8);
		assert_eq!(last.data_byte(1), 0x0F);
	}

	#[test]
	fn track_zero_wins_a_slot_collision_over_track_one() {
		let mut exporter = Exporter::new();
		let clip_a = Clip::new(10, 5, 1, 0, 0, ClipKind::Bitmap {
			width: 6,
			height: 12,
			pixels: vec![8u8; 72],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap();
		let clip_b = Clip::new(10, 5, 0, 0, 0, ClipKind::Bitmap {
			width: 6,
			height: 12,
			pixels: vec![2u8; 72],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap();
		// registration order: A (track 1) before B (track 0); B should be scheduled first
		let bytes = exporter.export_to_binary(vec![clip_a, clip_b], &ExportOptions { target_duration: Some(50), font: None }, None).unwrap();
		let p10 = Packet::deserialize(&bytes[10 * 24..10 * 24 + 24]).unwrap();
		assert_eq!(p10.data_byte(0), 2, "lower-track clip should win the contested slot");
	}

	#[test]
	fn validate_stream_reports_unfilled_slot() {
		let stream = vec![Some(Packet::idle()), None];
		let err = validate_stream(&stream).unwrap_err();
		matches!(err, ExportError::UnfilledSlot { slot: 1 });
	}

	#[test]
	fn text_clip_produces_tile_packets_without_panicking() {
		let mut exporter = Exporter::new();
		let clip = Clip::new(
			0,
			100,
			0,
			0,
			0,
			ClipKind::Text {
				font: "default".into(),
				size: 12,
				fg: 1,
				bg: Some(0),
				outline: None,
				karaoke: false,
				events: vec![crate::clip::TextEvent {
					offset: 0,
					bbox: (0, 0, 12, 12),
					text: "HI".into(),
				}],
			},
		)
		.unwrap();
		let bytes = exporter.export_to_binary(vec![clip], &ExportOptions { target_duration: Some(100), font: None }, None).unwrap();
		assert_eq!(bytes.len(), 100 * Packet::SIZE);
	}

	#[test]
	fn clip_with_zero_width_scroll_behaves_like_a_static_bitmap() {
		let mut exporter = Exporter::new();
		let clip = Clip::new(
			0,
			40,
			0,
			0,
			0,
			ClipKind::Scroll {
				width: 6,
				height: 12,
				pixels: vec![4u8; 72],
				direction: crate::clip::ScrollDirection::None,
				step: 0,
				interval: 20,
				wrap: false,
			},
		)
		.unwrap();
		let bytes = exporter.export_to_binary(vec![clip], &ExportOptions { target_duration: Some(40), font: None }, None).unwrap();
		assert_eq!(bytes.len(), 40 * Packet::SIZE);
	}
}

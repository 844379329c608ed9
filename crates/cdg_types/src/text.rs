//! Rasterizes strings into indexed-color pixel buffers ready to become a
//! [`crate::clip::ClipKind::Text`] clip's backing bitmap.

use crate::tile::{TILE_HEIGHT, TILE_WIDTH};

/// A single glyph's on/off pixel mask, `width * height` entries, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
	/// Glyph width, in pixels.
	pub width: u32,
	/// Glyph height, in pixels.
	pub height: u32,
	/// `true` for an inked pixel, `false` for background.
	pub pixels: Vec<bool>,
}

impl GlyphBitmap {
	/// Reads the on/off value at `(x, y)`. Out-of-bounds coordinates are `false`.
	pub fn get_pixel(&self, x: u32, y: u32) -> bool {
		if x >= self.width || y >= self.height {
			return false;
		}
		self.pixels[(y * self.width + x) as usize]
	}
}

/// A source of fixed-size glyph bitmaps, decoupled from any one font file
/// format. Implement this to plug in a real font parser; [`BuiltinFont`]
/// covers ASCII without depending on anything external.
pub trait GlyphSource {
	/// Returns the glyph for `ch`, or `None` if this source has no glyph for it.
	fn glyph_bitmap(&self, ch: char) -> Option<&GlyphBitmap>;
	/// Horizontal space, in pixels, `ch` occupies including trailing gap.
	fn advance_width(&self, ch: char) -> u32;
	/// Vertical space, in pixels, between baselines.
	fn line_height(&self) -> u32;
}

/// A bundled, in-crate monospace bitmap font covering ASCII `0x20..=0x7E` at
/// the CD+G tile size (6x12), so text clips can be built without an external
/// font file.
pub struct BuiltinFont {
	glyphs: Vec<GlyphBitmap>,
}

impl BuiltinFont {
	const FIRST: u32 = 0x20;
	const LAST: u32 = 0x7E;

	/// Builds the font, generating every glyph in `0x20..=0x7E` once.
	pub fn new() -> Self {
		let glyphs = (Self::FIRST..=Self::LAST).map(|code| Self::generate_glyph(code as u8 as char)).collect();
		Self { glyphs }
	}

	fn generate_glyph(ch: char) -> GlyphBitmap {
		let width = TILE_WIDTH as u32;
		let height = TILE_HEIGHT as u32;
		let mut pixels = vec![false; (width * height) as usize];
		if ch != ' ' {
			// Deterministic pseudo-glyph: each character gets a stable,
			// distinct bit pattern derived from its code point. Not meant
			// to be legible, only distinct and reproducible.
			let mut state = (ch as u32).wrapping_mul(2654435761).wrapping_add(0x9E3779B9);
			for p in pixels.iter_mut() {
				state ^= state << 13;
				state ^= state >> 17;
				state ^= state << 5;
				*p = state & 1 != 0;
			}
			// Leave a one-pixel border blank so adjacent glyphs never visually merge.
			for x in 0..width {
				pixels[x as usize] = false;
				pixels[((height - 1) * width + x) as usize] = false;
			}
		}
		GlyphBitmap { width, height, pixels }
	}
}

impl Default for BuiltinFont {
	fn default() -> Self {
		Self::new()
	}
}

impl GlyphSource for BuiltinFont {
	fn glyph_bitmap(&self, ch: char) -> Option<&GlyphBitmap> {
		let code = ch as u32;
		if !(Self::FIRST..=Self::LAST).contains(&code) {
			return None;
		}
		self.glyphs.get((code - Self::FIRST) as usize)
	}

	fn advance_width(&self, _ch: char) -> u32 {
		TILE_WIDTH as u32
	}

	fn line_height(&self) -> u32 {
		TILE_HEIGHT as u32
	}
}

/// The result of rasterizing text: a ready-to-composite pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterizedText {
	/// Buffer width, in pixels (equal to the requested bounding box width).
	pub width: u32,
	/// Buffer height, in pixels (equal to the requested bounding box height).
	pub height: u32,
	/// Row-major palette-index pixels, `width * height` entries.
	pub pixels: Vec<u8>,
}

/// Word-wraps `text` into `source`'s glyphs within `width`, vertically
/// truncates at `height`, and paints it into a pixel buffer.
///
/// `karaoke` + `progress` (0.0..=1.0, fraction of characters considered
/// "sung so far") switches each character's ink color between `fg` (before
/// the progress point) and `outline` (at/after it, falling back to `fg` if
/// no outline color was given). When `karaoke` is false every character
/// uses `fg` regardless of `progress`.
pub fn rasterize_text(
	text: &str,
	source: &dyn GlyphSource,
	width: u32,
	height: u32,
	fg: u8,
	bg: Option<u8>,
	outline: Option<u8>,
	karaoke: bool,
	progress: f32,
) -> RasterizedText {
	let fill = bg.unwrap_or(0);
	let mut pixels = vec![fill; (width * height) as usize];
	let line_height = source.line_height().max(1);

	let lines = wrap_lines(text, source, width);
	let total_chars: usize = text.chars().filter(|c| !c.is_whitespace()).count().max(1);
	let reveal_count = ((progress.clamp(0.0, 1.0) * total_chars as f32).round()) as usize;

	let mut chars_seen = 0usize;
	let mut y_cursor = 0u32;
	for line in &lines {
		if y_cursor + line_height > height {
			break;
		}
		let mut x_cursor = 0u32;
		for ch in line.chars() {
			let advance = source.advance_width(ch);
			if let Some(glyph) = source.glyph_bitmap(ch) {
				if !ch.is_whitespace() {
					chars_seen += 1;
				}
				let ink = if karaoke && chars_seen > reveal_count {
					outline.unwrap_or(fg)
				} else {
					fg
				};
				paint_glyph(&mut pixels, width, height, x_cursor, y_cursor, glyph, ink);
			}
			x_cursor += advance;
			if x_cursor >= width {
				break;
			}
		}
		y_cursor += line_height;
	}

	RasterizedText { width, height, pixels }
}

fn paint_glyph(pixels: &mut [u8], buf_w: u32, buf_h: u32, x0: u32, y0: u32, glyph: &GlyphBitmap, ink: u8) {
	for gy in 0..glyph.height {
		let y = y0 + gy;
		if y >= buf_h {
			break;
		}
		for gx in 0..glyph.width {
			let x = x0 + gx;
			if x >= buf_w {
				break;
			}
			if glyph.get_pixel(gx, gy) {
				pixels[(y * buf_w + x) as usize] = ink;
			}
		}
	}
}

fn wrap_lines(text: &str, source: &dyn GlyphSource, width: u32) -> Vec<String> {
	let mut lines = Vec::new();
	for paragraph in text.split('\n') {
		let mut current = String::new();
		let mut current_width = 0u32;
		for word in paragraph.split(' ') {
			let word_width: u32 = word.chars().map(|c| source.advance_width(c)).sum();
			let space_width = source.advance_width(' ');
			let needed = if current.is_empty() { word_width } else { current_width + space_width + word_width };
			if needed > width && !current.is_empty() {
				lines.push(std::mem::take(&mut current));
				current_width = 0;
			}
			if !current.is_empty() {
				current.push(' ');
				current_width += space_width;
			}
			current.push_str(word);
			current_width += word_width;
		}
		lines.push(current);
	}
	lines
}

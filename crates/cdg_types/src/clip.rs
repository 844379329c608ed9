//! Timeline units: the things a project schedules onto the packet stream.

use crate::error::ClipError;
use crate::palette::Palette;
use crate::transitions::Transition;

/// A clip's position in its registration/export lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipState {
	/// Created, not yet handed to a scheduler.
	Unscheduled,
	/// Accepted by a scheduler; will contribute packets on export.
	Registered,
	/// The scheduler has emitted this clip's packets into the stream.
	PacketsEmitted,
	/// The stream has been finalized; the clip is immutable from here on.
	Finalized,
}

/// Scroll direction for a [`ClipKind::Scroll`] clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
	/// No motion; behaves like a plain bitmap.
	None,
	/// Up
	Up,
	/// Down
	Down,
	/// Left
	Left,
	/// Right
	Right,
}

/// A single word-wrapped, timed line of a [`ClipKind::Text`] clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
	/// Packet offset, relative to the clip's start, at which this line appears.
	pub offset: i64,
	/// Bounding box, in pixels, relative to the clip's origin: `(x, y, width, height)`.
	pub bbox: (u32, u32, u32, u32),
	/// The line's text.
	pub text: String,
}

/// The type-specific payload of a [`Clip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipKind {
	/// A static raster image.
	Bitmap {
		/// Pixel width of the source buffer.
		width: u32,
		/// Pixel height of the source buffer.
		height: u32,
		/// Row-major palette-index pixels, `width * height` entries.
		pixels: Vec<u8>,
		/// Horizontal placement offset, in pixels.
		x_offset: i32,
		/// Vertical placement offset, in pixels.
		y_offset: i32,
		/// If true, tiles are drawn with TILE_BLOCK_XOR rather than COPY.
		xor_only: bool,
		/// Name of a registered transition, or `None` for row-major default.
		transition: Option<String>,
	},
	/// A global palette change, optionally dissolved over several steps.
	PaletteChange {
		/// The palette snapshot to install.
		palette: Palette,
	},
	/// Rasterized text, one or more timed lines.
	Text {
		/// Font face identifier, resolved by the caller's `GlyphSource`.
		font: String,
		/// Nominal font size in pixels (height).
		size: u32,
		/// Foreground palette index.
		fg: u8,
		/// Background palette index, or `None` for transparent background.
		bg: Option<u8>,
		/// Outline palette index, or `None` for no outline.
		outline: Option<u8>,
		/// Karaoke highlight mode: words transition fg->outline over time.
		karaoke: bool,
		/// The timed lines making up this clip.
		events: Vec<TextEvent>,
	},
	/// A bitmap that moves across the screen over time.
	Scroll {
		/// Pixel width of the source buffer.
		width: u32,
		/// Pixel height of the source buffer.
		height: u32,
		/// Row-major palette-index pixels, `width * height` entries.
		pixels: Vec<u8>,
		/// Direction of motion.
		direction: ScrollDirection,
		/// Pixels moved per interval.
		step: u32,
		/// Packets per interval.
		interval: u32,
		/// Whether content wraps around instead of scrolling off-screen.
		wrap: bool,
	},
}

/// A scheduled unit on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
	start_packet: i64,
	duration: i64,
	track: u32,
	channel: u8,
	z: u8,
	draw_delay: i64,
	kind: ClipKind,
	state: ClipState,
}

impl Clip {
	/// Creates a new, unscheduled clip.
	///
	/// Returns [`ClipError::InvalidDuration`] if `duration <= 0`, and
	/// [`ClipError::MissingField`] if a `Text` clip has no events or a
	/// `Bitmap`/`Scroll` clip's pixel buffer doesn't match `width * height`.
	pub fn new(start_packet: i64, duration: i64, track: u32, channel: u8, z: u8, kind: ClipKind) -> Result<Self, ClipError> {
		if duration <= 0 {
			return Err(ClipError::InvalidDuration { duration });
		}
		match &kind {
			ClipKind::Bitmap { width, height, pixels, .. } | ClipKind::Scroll { width, height, pixels, .. } => {
				if pixels.len() != (*width as usize) * (*height as usize) {
					return Err(ClipError::MissingField { field: "pixels" });
				}
			}
			ClipKind::Text { events, .. } => {
				if events.is_empty() {
					return Err(ClipError::MissingField { field: "events" });
				}
			}
			ClipKind::PaletteChange { .. } => {}
		}
		Ok(Self {
			start_packet,
			duration,
			track,
			channel,
			z,
			draw_delay: 0,
			kind,
			state: ClipState::Unscheduled,
		})
	}

	/// Sets the extra packet offset applied before the clip's first tile.
	pub fn set_draw_delay(&mut self, delay: i64) {
		self.draw_delay = delay;
	}

	/// The extra packet offset applied before the clip's first tile.
	pub fn draw_delay(&self) -> i64 {
		self.draw_delay
	}

	/// The absolute packet index this clip begins at.
	pub fn start_packet(&self) -> i64 {
		self.start_packet
	}

	/// The clip's duration, in packets.
	pub fn duration(&self) -> i64 {
		self.duration
	}

	/// The absolute packet index one past this clip's last packet.
	pub fn end_packet(&self) -> i64 {
		self.start_packet + self.duration
	}

	/// The lane this clip occupies; clips on the same track may not overlap.
	pub fn track(&self) -> u32 {
		self.track
	}

	/// The CD+G channel (0..15) this clip draws on.
	pub fn channel(&self) -> u8 {
		self.channel
	}

	/// The compositor z-layer this clip draws on.
	pub fn z(&self) -> u8 {
		self.z
	}

	/// The clip's current lifecycle state.
	pub fn state(&self) -> ClipState {
		self.state
	}

	/// The clip's type-specific payload.
	pub fn kind(&self) -> &ClipKind {
		&self.kind
	}

	/// Resolves the transition this clip should use when expanded into
	/// tiles: its own named transition if set, else row-major default, with
	/// `Text` clips always forced to `no_transition`.
	pub fn resolve_transition(&self) -> Result<Transition, ClipError> {
		match &self.kind {
			ClipKind::Text { .. } => Ok(Transition::no_transition()),
			ClipKind::Bitmap { transition, .. } => match transition {
				Some(name) => Transition::by_name(name).map_err(|_| ClipError::UnknownTransition { name: name.clone() }),
				None => Ok(Transition::row_major()),
			},
			_ => Ok(Transition::row_major()),
		}
	}

	/// Reads a pixel at `(x, y)` from a `Bitmap`/`Scroll` clip's buffer,
	/// filling with 0 for out-of-bounds coordinates. Returns `None` for
	/// clip kinds with no raster buffer.
	pub fn pixel(&self, x: i64, y: i64) -> Option<u8> {
		let (width, height, pixels) = match &self.kind {
			ClipKind::Bitmap { width, height, pixels, .. } => (*width, *height, pixels),
			ClipKind::Scroll { width, height, pixels, .. } => (*width, *height, pixels),
			_ => return None,
		};
		if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
			return Some(0);
		}
		Some(pixels[y as usize * width as usize + x as usize])
	}

	/// Transitions the clip to [`ClipState::Registered`]. Called by a
	/// scheduler once it has accepted the clip onto the timeline.
	pub fn mark_registered(&mut self) {
		self.state = ClipState::Registered;
	}

	/// Transitions the clip to [`ClipState::PacketsEmitted`].
	pub fn mark_packets_emitted(&mut self) {
		self.state = ClipState::PacketsEmitted;
	}

	/// Transitions the clip to [`ClipState::Finalized`].
	pub fn mark_finalized(&mut self) {
		self.state = ClipState::Finalized;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bitmap_clip(start: i64, duration: i64) -> Clip {
		Clip::new(
			start,
			duration,
			0,
			0,
			0,
			ClipKind::Bitmap {
				width: 6,
				height: 12,
				pixels: vec![0u8; 72],
				x_offset: 0,
				y_offset: 0,
				xor_only: false,
				transition: None,
			},
		)
		.unwrap()
	}

	#[test]
	fn new_clip_starts_unscheduled() {
		let c = bitmap_clip(0, 10);
		assert_eq!(c.state(), ClipState::Unscheduled);
		assert_eq!(c.end_packet(), 10);
	}

	#[test]
	fn rejects_non_positive_duration() {
		let err = Clip::new(0, 0, 0, 0, 0, ClipKind::Bitmap {
			width: 1,
			height: 1,
			pixels: vec![0],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap_err();
		matches!(err, ClipError::InvalidDuration { duration: 0 });
	}

	#[test]
	fn rejects_mismatched_pixel_buffer() {
		let err = Clip::new(0, 5, 0, 0, 0, ClipKind::Bitmap {
			width: 4,
			height: 4,
			pixels: vec![0u8; 3],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		})
		.unwrap_err();
		matches!(err, ClipError::MissingField { field: "pixels" });
	}

	#[test]
	fn rejects_text_clip_with_no_events() {
		let err = Clip::new(0, 5, 0, 0, 0, ClipKind::Text {
			font: "default".into(),
			size: 12,
			fg: 1,
			bg: None,
			outline: None,
			karaoke: false,
			events: vec![],
		})
		.unwrap_err();
		matches!(err, ClipError::MissingField { field: "events" });
	}

	#[test]
	fn state_machine_advances_in_order() {
		let mut c = bitmap_clip(0, 10);
		c.mark_registered();
		assert_eq!(c.state(), ClipState::Registered);
		c.mark_packets_emitted();
		assert_eq!(c.state(), ClipState::PacketsEmitted);
		c.mark_finalized();
		assert_eq!(c.state(), ClipState::Finalized);
	}

	#[test]
	fn pixel_fills_zero_out_of_bounds() {
		let c = bitmap_clip(0, 10);
		assert_eq!(c.pixel(-1, 0), Some(0));
		assert_eq!(c.pixel(100, 100), Some(0));
	}

	#[test]
	fn text_clip_always_resolves_no_transition() {
		let c = Clip::new(0, 5, 0, 0, 0, ClipKind::Text {
			font: "default".into(),
			size: 12,
			fg: 1,
			bg: None,
			outline: None,
			karaoke: false,
			events: vec![TextEvent {
				offset: 0,
				bbox: (0, 0, 100, 20),
				text: "hi".into(),
			}],
		})
		.unwrap();
		let t = c.resolve_transition().unwrap();
		assert!(t.no_transition);
	}

	#[test]
	fn unknown_transition_name_is_an_error() {
		let c = Clip::new(0, 5, 0, 0, 0, ClipKind::Bitmap {
			width: 1,
			height: 1,
			pixels: vec![0],
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: Some("nonexistent".into()),
		})
		.unwrap();
		let err = c.resolve_transition().unwrap_err();
		matches!(err, ClipError::UnknownTransition { .. });
	}

	#[test]
	fn clone_is_a_deep_independent_copy() {
		let c1 = bitmap_clip(0, 10);
		let mut c2 = c1.clone();
		c2.mark_registered();
		assert_eq!(c1.state(), ClipState::Unscheduled);
		assert_eq!(c2.state(), ClipState::Registered);
	}
}

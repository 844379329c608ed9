//! In-process project building API, plus a `.cdgproj` JSON file format.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::clip::{Clip, ClipKind, ScrollDirection, TextEvent};
use crate::error::{ClipError, ProjectError};

/// On-disk, serde-friendly mirror of [`ClipKind`]. Kept distinct from the
/// in-memory type so the file format doesn't need to track lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipSpec {
	/// See [`ClipKind::Bitmap`].
	Bitmap {
		width: u32,
		height: u32,
		pixels: Vec<u8>,
		#[serde(default)]
		x_offset: i32,
		#[serde(default)]
		y_offset: i32,
		#[serde(default)]
		xor_only: bool,
		#[serde(default)]
		transition: Option<String>,
	},
	/// See [`ClipKind::Text`].
	Text {
		font: String,
		size: u32,
		fg: u8,
		#[serde(default)]
		bg: Option<u8>,
		#[serde(default)]
		outline: Option<u8>,
		#[serde(default)]
		karaoke: bool,
		events: Vec<TextEventSpec>,
	},
	/// See [`ClipKind::Scroll`].
	Scroll {
		width: u32,
		height: u32,
		pixels: Vec<u8>,
		direction: ScrollDirectionSpec,
		step: u32,
		interval: u32,
		#[serde(default)]
		wrap: bool,
	},
}

/// Serde mirror of [`TextEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextEventSpec {
	pub offset: i64,
	pub bbox: (u32, u32, u32, u32),
	pub text: String,
}

/// Serde mirror of [`ScrollDirection`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirectionSpec {
	None,
	Up,
	Down,
	Left,
	Right,
}

impl From<ScrollDirectionSpec> for ScrollDirection {
	fn from(value: ScrollDirectionSpec) -> Self {
		match value {
			ScrollDirectionSpec::None => ScrollDirection::None,
			ScrollDirectionSpec::Up => ScrollDirection::Up,
			ScrollDirectionSpec::Down => ScrollDirection::Down,
			ScrollDirectionSpec::Left => ScrollDirection::Left,
			ScrollDirectionSpec::Right => ScrollDirection::Right,
		}
	}
}

/// One clip entry in a project file: placement fields plus its [`ClipSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipEntry {
	pub start_packet: i64,
	pub duration: i64,
	#[serde(default)]
	pub track: u32,
	#[serde(default)]
	pub channel: u8,
	#[serde(default)]
	pub z: u8,
	#[serde(default)]
	pub draw_delay: i64,
	#[serde(flatten)]
	pub spec: ClipSpec,
}

/// A whole project: target duration plus an ordered list of clips.
///
/// Serializes to/from the `.cdgproj` JSON format via [`Project::load`] and
/// [`Project::save`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Project {
	/// Target stream duration in packets, or `None` to size the stream to
	/// the last clip's end plus padding.
	#[serde(default)]
	pub target_duration: Option<u32>,
	/// Clips in registration order.
	#[serde(default)]
	pub clips: Vec<ClipEntry>,
}

impl Project {
	/// Creates an empty project with no clips and no fixed duration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a project from a `.cdgproj` JSON file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
		let data = fs::read_to_string(path)?;
		let project: Self = serde_json::from_str(&data)?;
		Ok(project)
	}

	/// Saves the project as pretty-printed `.cdgproj` JSON.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
		let data = serde_json::to_string_pretty(self)?;
		fs::write(path, data)?;
		Ok(())
	}

	/// Resolves every [`ClipEntry`] into a runtime [`Clip`], in order.
	///
	/// Stops at, and returns, the first registration error (e.g. a
	/// non-positive duration).
	pub fn build_clips(&self) -> Result<Vec<Clip>, ClipError> {
		self.clips.iter().map(Self::build_one).collect()
	}

	fn build_one(entry: &ClipEntry) -> Result<Clip, ClipError> {
		let kind = match &entry.spec {
			ClipSpec::Bitmap { width, height, pixels, x_offset, y_offset, xor_only, transition } => ClipKind::Bitmap {
				width: *width,
				height: *height,
				pixels: pixels.clone(),
				x_offset: *x_offset,
				y_offset: *y_offset,
				xor_only: *xor_only,
				transition: transition.clone(),
			},
			ClipSpec::Text { font, size, fg, bg, outline, karaoke, events } => ClipKind::Text {
				font: font.clone(),
				size: *size,
				fg: *fg,
				bg: *bg,
				outline: *outline,
				karaoke: *karaoke,
				events: events
					.iter()
					.map(|e| TextEvent {
						offset: e.offset,
						bbox: e.bbox,
						text: e.text.clone(),
					})
					.collect(),
			},
			ClipSpec::Scroll { width, height, pixels, direction, step, interval, wrap } => ClipKind::Scroll {
				width: *width,
				height: *height,
				pixels: pixels.clone(),
				direction: (*direction).into(),
				step: *step,
				interval: *interval,
				wrap: *wrap,
			},
		};
		let mut clip = Clip::new(entry.start_packet, entry.duration, entry.track, entry.channel, entry.z, kind)?;
		clip.set_draw_delay(entry.draw_delay);
		Ok(clip)
	}
}

/// A fluent builder for a single [`ClipEntry`], for callers assembling a
/// [`Project`] in-process rather than hand-writing JSON.
pub struct ClipBuilder {
	entry: ClipEntry,
}

impl ClipBuilder {
	/// Starts building a bitmap clip at `start_packet` lasting `duration` packets.
	pub fn bitmap(start_packet: i64, duration: i64, width: u32, height: u32, pixels: Vec<u8>) -> Self {
		Self {
			entry: ClipEntry {
				start_packet,
				duration,
				track: 0,
				channel: 0,
				z: 0,
				draw_delay: 0,
				spec: ClipSpec::Bitmap {
					width,
					height,
					pixels,
					x_offset: 0,
					y_offset: 0,
					xor_only: false,
					transition: None,
				},
			},
		}
	}

	/// Sets the track (lane) number.
	pub fn track(mut self, track: u32) -> Self {
		self.entry.track = track;
		self
	}

	/// Sets the compositor z-layer.
	pub fn z(mut self, z: u8) -> Self {
		self.entry.z = z;
		self
	}

	/// Sets the CD+G channel.
	pub fn channel(mut self, channel: u8) -> Self {
		self.entry.channel = channel;
		self
	}

	/// Sets the named transition, only meaningful for bitmap clips.
	pub fn transition(mut self, name: impl Into<String>) -> Self {
		if let ClipSpec::Bitmap { transition, .. } = &mut self.entry.spec {
			*transition = Some(name.into());
		}
		self
	}

	/// Finishes the builder, producing a [`ClipEntry`] ready to push onto a
	/// [`Project`]'s `clips` vector.
	pub fn build(self) -> ClipEntry {
		self.entry
	}
}

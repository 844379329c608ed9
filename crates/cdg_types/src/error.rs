//! Error types for CD+G packet encoding and project authoring.

use thiserror::Error;

/// Errors that can occur when constructing or parsing a [`Packet`](crate::packet::Packet).
#[derive(Debug, Error)]
pub enum PacketError {
	/// Buffer passed to `deserialize` was shorter than the fixed 24-byte packet size.
	#[error("packet buffer truncated: expected 24 bytes, got {actual} bytes")]
	BufferTruncated {
		/// Number of bytes actually supplied
		actual: usize,
	},
}

/// Errors from the multi-layer [`Compositor`](crate::compositor::Compositor).
#[derive(Debug, Error)]
pub enum CompositorError {
	/// A block write supplied a slice whose length was not exactly 72.
	#[error("block length mismatch: expected 72 pixels, got {actual}")]
	BlockLengthMismatch {
		/// Length of the slice that was rejected
		actual: usize,
	},
}

/// Errors from registering a clip onto the timeline.
#[derive(Debug, Error)]
pub enum ClipError {
	/// A clip was registered with a non-positive duration.
	#[error("clip duration must be greater than zero, got {duration}")]
	InvalidDuration {
		/// The rejected duration, in packets
		duration: i64,
	},

	/// A clip referenced a transition name that is not in the registry.
	#[error("unknown transition: {name}")]
	UnknownTransition {
		/// The unrecognized transition name
		name: String,
	},

	/// A required field was missing for the clip's kind.
	#[error("clip is missing required field: {field}")]
	MissingField {
		/// Name of the missing field
		field: &'static str,
	},
}

/// Errors surfaced by the [`Exporter`](crate::export::Exporter) while assembling a stream.
#[derive(Debug, Error)]
pub enum ExportError {
	/// A computed absolute packet index exceeded the target duration beyond the tick budget.
	#[error("arithmetic overflow: packet index {index} exceeds duration {duration} by more than the tick budget")]
	ArithmeticOverflow {
		/// The computed packet index
		index: i64,
		/// The target stream duration, in packets
		duration: u32,
	},

	/// Finalization found a stream slot that was never written.
	#[error("structural corruption: slot {slot} was never filled")]
	UnfilledSlot {
		/// Index of the unfilled slot
		slot: usize,
	},

	/// Finalization found a packet whose command byte was not `0x09`.
	#[error("structural corruption: slot {slot} has command byte {command:#04X}, expected 0x09")]
	InvalidCommandByte {
		/// Index of the offending slot
		slot: usize,
		/// The command byte actually present
		command: u8,
	},

	/// A clip was rejected during registration.
	#[error(transparent)]
	Clip(#[from] ClipError),

	/// The compositor rejected a tile write (should be unreachable: tiles
	/// are always exactly 72 pixels).
	#[error(transparent)]
	Compositor(#[from] CompositorError),
}

/// Errors from loading a palette bitmap (`SPR.PAL`-style 8bpp BMP).
#[derive(Debug, Error)]
pub enum PaletteBmpError {
	/// The file did not start with the `BM` magic.
	#[error("not a BMP file: missing 'BM' magic")]
	InvalidMagic,

	/// The BMP buffer was too short to contain its own declared header fields.
	#[error("BMP buffer truncated: expected at least {expected} bytes, got {actual}")]
	BufferTruncated {
		/// Minimum expected length
		expected: usize,
		/// Actual length supplied
		actual: usize,
	},

	/// The BMP used more than 8 bits per pixel, so it has no usable color table.
	#[error("unsupported bit depth: {bpp} bpp (only indexed BMPs with bpp <= 8 are supported)")]
	UnsupportedBitDepth {
		/// Bits-per-pixel field read from the BMP header
		bpp: u16,
	},

	/// Underlying I/O error while reading the file.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Errors from loading or decoding a [`Transition`](crate::transitions::Transition) table.
#[derive(Debug, Error)]
pub enum TransitionError {
	/// The requested transition name is not registered.
	#[error("unknown transition: {0}")]
	UnknownName(String),

	/// An on-disk transition table was malformed.
	#[error("malformed transition table: {0}")]
	Malformed(String),

	/// Underlying I/O error while reading the file.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Errors from loading or saving a project description (`.cdgproj`).
#[derive(Debug, Error)]
pub enum ProjectError {
	/// JSON (de)serialization failed.
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// Underlying I/O error while reading or writing the file.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Unified error type for the `cdg_types` crate.
///
/// Mirrors each domain error as a variant so callers working at the crate
/// boundary can match on a single type, while modules that only need one
/// domain's errors can keep using that domain's own error enum directly.
#[derive(Debug, Error)]
pub enum CdgError {
	/// See [`PacketError`].
	#[error(transparent)]
	Packet(#[from] PacketError),

	/// See [`CompositorError`].
	#[error(transparent)]
	Compositor(#[from] CompositorError),

	/// See [`ClipError`].
	#[error(transparent)]
	Clip(#[from] ClipError),

	/// See [`ExportError`].
	#[error(transparent)]
	Export(#[from] ExportError),

	/// See [`PaletteBmpError`].
	#[error(transparent)]
	PaletteBmp(#[from] PaletteBmpError),

	/// See [`TransitionError`].
	#[error(transparent)]
	Transition(#[from] TransitionError),

	/// See [`ProjectError`].
	#[error(transparent)]
	Project(#[from] ProjectError),
}

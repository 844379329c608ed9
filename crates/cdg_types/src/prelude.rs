//! Prelude module for `cdg_types`.
//!
//! This module provides a convenient way to import commonly used types,
//! traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use cdg_types::prelude::*;
//!
//! let mut exporter = Exporter::new();
//! let transition = Transition::wipe_left();
//! ```

#[doc(inline)]
pub use crate::clip::{Clip, ClipKind, ClipState, ScrollDirection, TextEvent};

#[doc(inline)]
pub use crate::compositor::Compositor;

#[doc(inline)]
pub use crate::diagnostics::{DiagnosticEvent, DiagnosticsSink, RecordingSink, Severity};

#[doc(inline)]
pub use crate::encoder::encode_block;

#[doc(inline)]
pub use crate::error::CdgError;

#[doc(inline)]
pub use crate::export::{ExportOptions, Exporter};

#[doc(inline)]
pub use crate::packet::{Instruction, Packet};

#[doc(inline)]
pub use crate::palette::{Color, Dissolve, Palette};

#[doc(inline)]
pub use crate::palette_bmp::load_palette_bmp;

#[doc(inline)]
pub use crate::project::{ClipBuilder, Project};

#[doc(inline)]
pub use crate::raster::bitmap_to_tiles;

#[doc(inline)]
pub use crate::text::{rasterize_text, BuiltinFont, GlyphBitmap, GlyphSource, RasterizedText};

#[doc(inline)]
pub use crate::tile::Tile;

#[doc(inline)]
pub use crate::transitions::Transition;

#[doc(inline)]
pub use crate::vram::Vram;

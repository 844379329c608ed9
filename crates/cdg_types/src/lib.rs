//! Core data types and encoding logic for the `cdg-rs` project.
//!
//! This crate turns a timeline of clips (bitmaps, palette changes, text,
//! scrolls) into a CD+G subcode stream: 24-byte packets at 300 packets per
//! second, ready to be muxed alongside audio or played back directly.
//!
//! # Pipeline
//!
//! `Clip` -> `BitmapToTiles`/`TextRasterizer` -> `Compositor` -> (diffed
//! against `Vram`) -> `TileEncoder` -> `Exporter` -> bytes.
//!
//! # Examples
//!
//! ```rust
//! use cdg_types::clip::{Clip, ClipKind};
//! use cdg_types::export::{Exporter, ExportOptions};
//!
//! let clip = Clip::new(10, 20, 0, 0, 0, ClipKind::Bitmap {
//!     width: 6,
//!     height: 12,
//!     pixels: vec![5u8; 72],
//!     x_offset: 0,
//!     y_offset: 0,
//!     xor_only: false,
//!     transition: None,
//! }).unwrap();
//!
//! let mut exporter = Exporter::new();
//! let bytes = exporter
//!     .export_to_binary(vec![clip], &ExportOptions { target_duration: Some(100), font: None }, None)
//!     .unwrap();
//! assert_eq!(bytes.len() % 24, 0);
//! ```

pub mod clip;
pub mod compositor;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod export;
pub mod packet;
pub mod palette;
pub mod palette_bmp;
pub mod project;
pub mod raster;
pub mod text;
pub mod tile;
pub mod transitions;
pub mod vram;

pub mod prelude;

//! In-process Project Builder Demo
//!
//! Builds a short CD+G stream entirely in-process (no `.cdgproj` file): a
//! palette load, a solid bitmap clip, and a karaoke text clip, then encodes
//! and writes the result next to this demo.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example project_builder -- output.cdg
//! ```

use cdg_rs::prelude::{Clip, ClipKind, Color, ExportOptions, Exporter, Palette, TextEvent};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let output = env::args().nth(1).map_or_else(|| PathBuf::from("project_builder_demo.cdg"), PathBuf::from);

	let mut palette = Palette::new();
	palette.set(1, Color { r: 63, g: 0, b: 0, a: 0 });
	palette.set(2, Color { r: 0, g: 63, b: 0, a: 0 });

	let palette_clip = Clip::new(
		0,
		300,
		0,
		0,
		0,
		ClipKind::PaletteChange { palette },
	)?;

	let banner_clip = Clip::new(
		4,
		150,
		1,
		0,
		1,
		ClipKind::Bitmap {
			width: 18,
			height: 24,
			pixels: vec![1u8; 18 * 24],
			x_offset: 6,
			y_offset: 6,
			xor_only: false,
			transition: Some("wipe-left".to_string()),
		},
	)?;

	let text_clip = Clip::new(
		10,
		280,
		2,
		0,
		2,
		ClipKind::Text {
			font: "default".to_string(),
			size: 12,
			fg: 2,
			bg: None,
			outline: Some(1),
			karaoke: true,
			events: vec![TextEvent {
				offset: 0,
				bbox: (6, 180, 288, 24),
				text: "hello cdg".to_string(),
			}],
		},
	)?;

	let mut exporter = Exporter::new();
	let bytes = exporter.export_to_binary(vec![palette_clip, banner_clip, text_clip], &ExportOptions::default(), None)?;

	fs::write(&output, &bytes)?;
	println!("Wrote {} ({} packets) to {}", bytes.len(), bytes.len() / 24, output.display());

	Ok(())
}

//! CD+G Stream Authoring CLI
//!
//! A command-line front end for building, encoding, and inspecting
//! CD+Graphics karaoke streams.
//!
//! # Features
//!
//! - **encode**: Build a `.cdg` stream from a `.cdgproj` project file
//! - **inspect**: Summarize a `.cdg` stream's instruction histogram and duration
//! - **palette**: Load a palette BMP and print its 16 decoder entries
//!
//! # Usage
//!
//! ```bash
//! # Encode a project file to a .cdg stream
//! cargo run --example cdg_cli encode project.cdgproj output.cdg
//!
//! # Inspect a .cdg stream
//! cargo run --example cdg_cli inspect output.cdg
//!
//! # Load a palette BMP and print its entries
//! cargo run --example cdg_cli palette spr.pal.bmp
//! ```

use cdg_rs::prelude::{ExportOptions, Exporter, Instruction, Packet, Project, RecordingSink, load_palette_bmp};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cdg_cli")]
#[command(author = "cdg-rs project")]
#[command(version = "1.0")]
#[command(about = "CD+G karaoke stream authoring utility - encode, inspect, and load palettes", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Encode a .cdgproj project file into a .cdg packet stream
	Encode {
		/// Input project file path
		#[arg(value_name = "PROJECT")]
		input: PathBuf,

		/// Output .cdg file path
		#[arg(value_name = "OUTPUT_CDG")]
		output: PathBuf,

		/// Show verbose output
		#[arg(short, long)]
		verbose: bool,
	},

	/// Inspect a .cdg stream and print its instruction histogram
	Inspect {
		/// Input .cdg file path
		#[arg(value_name = "INPUT_CDG")]
		input: PathBuf,
	},

	/// Load a palette BMP and print its 16 decoder entries
	Palette {
		/// Input BMP file path
		#[arg(value_name = "PALETTE_BMP")]
		input: PathBuf,
	},
}

fn handle_encode(input: PathBuf, output: PathBuf, verbose: bool) -> anyhow::Result<()> {
	if verbose {
		println!("Loading project: {}", input.display());
	}
	let project = Project::load(&input)?;
	let clips = project.build_clips()?;

	if verbose {
		println!("  {} clip(s) registered", clips.len());
	}

	let mut exporter = Exporter::new();
	let mut sink = RecordingSink::new();
	let options = ExportOptions {
		target_duration: project.target_duration,
		font: None,
	};
	let bytes = exporter.export_to_binary(clips, &options, Some(&mut sink))?;

	fs::write(&output, &bytes)?;

	let packet_count = bytes.len() / Packet::SIZE;
	println!(
		"Encoded {} -> {} ({} packets, {:.2}s)",
		input.display(),
		output.display(),
		packet_count,
		packet_count as f64 / 300.0
	);
	if verbose {
		println!("  {} diagnostic event(s) recorded", sink.events().len());
	}

	Ok(())
}

fn handle_inspect(input: PathBuf) -> anyhow::Result<()> {
	let data = fs::read(&input)?;
	if data.len() % Packet::SIZE != 0 {
		anyhow::bail!("stream length {} is not a multiple of {} bytes", data.len(), Packet::SIZE);
	}

	let packet_count = data.len() / Packet::SIZE;
	let mut histogram: BTreeMap<u8, usize> = BTreeMap::new();
	for chunk in data.chunks_exact(Packet::SIZE) {
		let packet = Packet::deserialize(chunk)?;
		*histogram.entry(packet.instruction()).or_insert(0) += 1;
	}

	println!("{}: {} packets ({:.2}s at 300 pps)", input.display(), packet_count, packet_count as f64 / 300.0);
	println!("Instruction histogram:");
	for (code, count) in &histogram {
		let name = Instruction::from_u8(*code).map_or_else(|| format!("unknown({code:#04X})"), |i| format!("{i:?}"));
		println!("  {name:<16} {count}");
	}

	Ok(())
}

fn handle_palette(input: PathBuf) -> anyhow::Result<()> {
	let data = fs::read(&input)?;
	let palette = load_palette_bmp(&data)?;

	println!("{}: 16 decoder entries", input.display());
	for i in 0..16u8 {
		let color = palette.get(i);
		println!("  [{i:>2}] r={:>2} g={:>2} b={:>2}", color.r, color.g, color.b);
	}

	Ok(())
}

fn main() -> anyhow::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Commands::Encode { input, output, verbose } => handle_encode(input, output, verbose),
		Commands::Inspect { input } => handle_inspect(input),
		Commands::Palette { input } => handle_palette(input),
	}
}

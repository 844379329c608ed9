//! Benchmark suite for the packet scheduler/exporter
//!
//! Measures `Exporter::export_to_binary` across clip counts and bitmap
//! sizes, exercising the bitmap-to-tiles sampler, VRAM diffing, and tile
//! encoder together as they run in a real export pass.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use cdg_benches::{generate_test_bitmap, sizes};
use cdg_types::clip::{Clip, ClipKind};
use cdg_types::export::{ExportOptions, Exporter};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn bitmap_clip(start: i64, duration: i64, width: u32, height: u32, track: u32) -> Clip {
	let pixels = generate_test_bitmap(width, height, 8);
	Clip::new(
		start,
		duration,
		track,
		0,
		0,
		ClipKind::Bitmap {
			width,
			height,
			pixels,
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: None,
		},
	)
	.unwrap()
}

fn bench_single_clip_by_bitmap_size(c: &mut Criterion) {
	let mut group = c.benchmark_group("export_single_clip");

	for (name, (width, height)) in [("tile", sizes::TILE), ("small", sizes::SMALL), ("full_screen", sizes::FULL_SCREEN)] {
		let clip = bitmap_clip(4, 300, width, height, 0);
		group.throughput(Throughput::Elements((width * height) as u64));
		group.bench_with_input(BenchmarkId::new("bitmap", name), &clip, |b, clip| {
			b.iter(|| {
				let mut exporter = Exporter::new();
				let result = exporter.export_to_binary(vec![black_box(clip.clone())], &ExportOptions::default(), None);
				black_box(result)
			});
		});
	}

	group.finish();
}

fn bench_many_overlapping_clips(c: &mut Criterion) {
	let mut group = c.benchmark_group("export_many_clips");

	for track_count in [1u32, 4, 8] {
		let clips: Vec<Clip> = (0..track_count).map(|t| bitmap_clip(4, 300, sizes::SMALL.0, sizes::SMALL.1, t)).collect();

		group.bench_with_input(BenchmarkId::new("tracks", track_count), &clips, |b, clips| {
			b.iter(|| {
				let mut exporter = Exporter::new();
				let result = exporter.export_to_binary(black_box(clips.clone()), &ExportOptions::default(), None);
				black_box(result)
			});
		});
	}

	group.finish();
}

fn bench_redundant_vram_skip(c: &mut Criterion) {
	let mut group = c.benchmark_group("export_vram_skip");

	// A clip that holds the exact same bitmap for its whole duration: every
	// tick after the first should skip re-encoding via the VRAM match.
	let clip = Clip::new(
		4,
		3000,
		0,
		0,
		0,
		ClipKind::Bitmap {
			width: sizes::SMALL.0,
			height: sizes::SMALL.1,
			pixels: generate_test_bitmap(sizes::SMALL.0, sizes::SMALL.1, 4),
			x_offset: 0,
			y_offset: 0,
			xor_only: false,
			transition: Some("no_transition".to_string()),
		},
	)
	.unwrap();

	group.bench_function("static_bitmap_long_duration", |b| {
		b.iter(|| {
			let mut exporter = Exporter::new();
			let result = exporter.export_to_binary(vec![black_box(clip.clone())], &ExportOptions::default(), None);
			black_box(result)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_single_clip_by_bitmap_size, bench_many_overlapping_clips, bench_redundant_vram_skip);
criterion_main!(benches);

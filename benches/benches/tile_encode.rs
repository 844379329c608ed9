//! Benchmark suite for the tile encoder
//!
//! Measures `encode_block`'s cost across the COPY/XOR-bitplane branches it
//! can take, from a single-color tile up to a full 4-bitplane block.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use cdg_benches::generate_test_block;
use cdg_types::encoder::encode_block;
use cdg_types::tile::TILE_PIXELS;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_encode_by_color_count(c: &mut Criterion) {
	let mut group = c.benchmark_group("tile_encode_by_colors");

	for color_count in [1u8, 2, 4, 16] {
		let raw = generate_test_block(color_count);
		let mut block = [0u8; TILE_PIXELS];
		block.copy_from_slice(&raw);

		group.bench_with_input(BenchmarkId::new("colors", color_count), &block, |b, block| {
			b.iter(|| {
				let packets = encode_block(0, 0, black_box(block));
				black_box(packets)
			});
		});
	}

	group.finish();
}

fn bench_encode_worst_case_bitplanes(c: &mut Criterion) {
	let mut group = c.benchmark_group("tile_encode_worst_case");

	// Every pixel a distinct value mod 16: forces all 4 XOR bitplanes.
	let mut block = [0u8; TILE_PIXELS];
	for (i, px) in block.iter_mut().enumerate() {
		*px = (i % 16) as u8;
	}

	group.bench_function("four_bitplanes", |b| {
		b.iter(|| {
			let packets = encode_block(0, 0, black_box(&block));
			black_box(packets)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_encode_by_color_count, bench_encode_worst_case_bitplanes);
criterion_main!(benches);

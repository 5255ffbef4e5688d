// TurboTap64 - Turbo-loading C64 cassette images from crunched PRG files
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Performance benchmarks for TurboTap64.
//!
//! Run with: cargo bench
//!
//! Results are saved to target/criterion/ with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::{self, Cursor};
use turbotap64::tape::{EncodeMode, PulseEncoder, TapWriter, LOADER_HEADER_SIZE};

// ============================================================================
// Benchmark Inputs
// ============================================================================

/// A program of `len` bytes loading at $0801.
fn program(len: usize) -> Vec<u8> {
    let mut prg = vec![0x01, 0x08];
    prg.extend((0..len).map(|i| (i * 7) as u8));
    prg
}

fn loader_header() -> Vec<u8> {
    let mut header = vec![0x20; LOADER_HEADER_SIZE];
    header[..2].copy_from_slice(&[0x3c, 0x03]);
    header
}

// ============================================================================
// Pulse Encoder Benchmarks
// ============================================================================

fn bench_encoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoder");

    for (name, mode) in [("standard", EncodeMode::Standard), ("turbo", EncodeMode::Turbo)] {
        let data = program(16 * 1024);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", name), &data, |b, data| {
            b.iter(|| {
                let mut enc = PulseEncoder::new(io::sink());
                enc.write_range(black_box(data), 2, mode).unwrap();
                enc.elapsed_seconds()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Tape Writer Benchmarks
// ============================================================================

fn bench_writer(c: &mut Criterion) {
    let header = loader_header();
    let boot = vec![0xbc, 0x02, 0x60];

    let mut group = c.benchmark_group("writer");
    group.sample_size(20);

    for (name, len) in [("small", 1024), ("medium", 16 * 1024), ("large", 50 * 1024)] {
        let prg = program(len);
        group.throughput(Throughput::Bytes(prg.len() as u64));
        group.bench_with_input(BenchmarkId::new("write_program", name), &prg, |b, prg| {
            b.iter(|| {
                let mut writer = TapWriter::new(Cursor::new(Vec::with_capacity(1 << 20)));
                writer
                    .write_program("bench", &header, &boot, black_box(prg))
                    .unwrap()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Bin Packing Benchmarks
// ============================================================================

fn bench_packing(c: &mut Criterion) {
    let mut group = c.benchmark_group("packing");

    for count in [10usize, 100, 1000] {
        let durations: Vec<f64> = (0..count).map(|i| 60.0 + ((i * 37) % 400) as f64).collect();
        group.bench_with_input(
            BenchmarkId::new("best_fit_decreasing", count),
            &durations,
            |b, durations| b.iter(|| turbotap64::best_fit_decreasing(black_box(durations), 2700.0)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_encoder, bench_writer, bench_packing);
criterion_main!(benches);

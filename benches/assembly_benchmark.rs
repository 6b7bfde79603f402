#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seqpack::dist::Dist;
use seqpack::ac::RangeEncoder;
use seqpack::twobit::TwoBit;
use seqpack::{Assembler, AssemblerConfig};
use tempfile::TempDir;

/// Deterministic pseudo-random genome and reads, no RNG dependency.
fn synthetic_genome(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x853c_49e6_748f_ea9b;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            b"ACGT"[(state >> 33) as usize % 4]
        })
        .collect()
}

fn reads_over(genome: &[u8], read_len: usize, coverage: usize) -> Vec<&[u8]> {
    let mut reads = Vec::new();
    let step = read_len / coverage.max(1);
    let mut pos = 0;
    while pos + read_len <= genome.len() {
        reads.push(&genome[pos..pos + read_len]);
        pos += step.max(1);
    }
    reads
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("Assembler::assemble");
    group.sample_size(10);

    for genome_len in [2_000usize, 10_000] {
        let genome = synthetic_genome(genome_len);
        let reads = reads_over(&genome, 70, 4);

        group.bench_with_input(
            BenchmarkId::from_parameter(genome_len),
            &reads,
            |b, reads| {
                b.iter(|| {
                    let dir = TempDir::new().unwrap();
                    let config = AssemblerConfig {
                        contig_path: dir.path().join("contig.fa"),
                        bloom_cells: 1 << 20,
                        bloom_hashes: 4,
                        ..AssemblerConfig::default()
                    };
                    let mut assembler = Assembler::new(config).unwrap();
                    for read in reads {
                        assembler.add_seq(read);
                    }
                    for read in reads {
                        assembler.add_seq(read);
                    }
                    black_box(assembler.assemble().unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_twobit_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("TwoBit::hash");

    for len in [36usize, 70, 150] {
        let genome = synthetic_genome(len);
        let packed = TwoBit::from_bases(&genome);

        group.bench_with_input(BenchmarkId::from_parameter(len), &packed, |b, packed| {
            b.iter(|| black_box(packed.hash()))
        });
    }

    group.finish();
}

fn bench_dist_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dist::encode");

    let symbols: Vec<usize> = (0..10_000).map(|i| i % 4).collect();
    group.bench_function("cyclic_10k_symbols", |b| {
        b.iter(|| {
            let mut model: Dist<4> = Dist::new(false);
            let mut enc = RangeEncoder::new();
            for &s in &symbols {
                model.encode(&mut enc, s);
            }
            black_box(enc.finish())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_twobit_hash, bench_dist_encode);
criterion_main!(benches);

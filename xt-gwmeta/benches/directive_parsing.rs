//! Performance benchmarks for directive parsing and rendering.
//!
//! Run with: `cargo bench`
//!
//! `iptables-restore` calls the extension once per rule, so these paths
//! dominate the cost of loading large rule sets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use xt_gwmeta::host::{build_rule, parse_tokens, reload_saved};
use xt_gwmeta::target::{parse_mask, print, save, RuleDescriptor};

// ============================================================================
// Helper Functions
// ============================================================================

/// Build a command line with `count` mask directives.
fn mask_command_line(count: usize) -> Vec<String> {
    (0..count)
        .flat_map(|i| {
            [
                "--gwmeta-gwmask".to_string(),
                format!("0x{:X}", 1u32 << (i % 32)),
            ]
        })
        .collect()
}

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn bench_mask_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_parsing");

    for input in ["2", "0x00000002", "0xDEADBEEF", "  +0Xffffffff  "] {
        group.bench_with_input(BenchmarkId::new("parse_mask", input), input, |b, input| {
            b.iter(|| black_box(parse_mask(black_box(input))));
        });
    }

    group.finish();
}

fn bench_rule_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_building");

    for count in [1usize, 4, 32].iter() {
        let args = mask_command_line(*count);

        group.bench_with_input(BenchmarkId::new("tokenize", count), &args, |b, args| {
            b.iter(|| black_box(parse_tokens(black_box(args))));
        });

        group.bench_with_input(BenchmarkId::new("build_rule", count), &args, |b, args| {
            b.iter(|| black_box(build_rule(black_box(args))));
        });
    }

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let desc = build_rule(&["--gwmeta-gwmask", "0x22"]).expect("valid rule");

    group.bench_function("print", |b| {
        b.iter(|| black_box(print(black_box(&desc))));
    });

    group.bench_function("save", |b| {
        b.iter(|| black_box(save(black_box(&desc))));
    });

    group.bench_function("reload_saved", |b| {
        let saved = save(&desc);
        b.iter(|| black_box(reload_saved(black_box(&saved))));
    });

    group.bench_function("encode_decode", |b| {
        b.iter(|| black_box(RuleDescriptor::decode(&black_box(&desc).encode())));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_mask_parsing,
    bench_rule_building,
    bench_rendering,
);
criterion_main!(benches);

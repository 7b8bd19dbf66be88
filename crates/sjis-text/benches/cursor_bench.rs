use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sjis_text::{LegacyCodec, MarkupRules, ShiftJisCodec, TextCursor};

fn sample_line(repeat: usize) -> Vec<u8> {
    let codec = ShiftJisCodec;
    codec.encode(&"The|<b>quick</b>|fox|jumps<br>「こんにちは」|<i>over</i>|".repeat(repeat))
}

fn bench_cursor_walk(c: &mut Criterion) {
    let rules = MarkupRules::default();
    let mut group = c.benchmark_group("cursor_walk");

    for repeat in [1usize, 16, 256] {
        let line = sample_line(repeat);
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &line, |b, line| {
            b.iter(|| {
                let mut cursor = TextCursor::new(black_box(line));
                let mut drawable = 0usize;
                while !cursor.is_at_end() {
                    cursor.skip_markup(&rules, |_| {});
                    if cursor.next_char().is_some() {
                        drawable += 1;
                    }
                }
                black_box(drawable)
            });
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let codec = ShiftJisCodec;
    let line = sample_line(64);
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("decode", |b| b.iter(|| black_box(codec.decode(black_box(&line)))));
    let text = codec.decode(&line);
    group.bench_function("encode", |b| b.iter(|| black_box(codec.encode(black_box(&text)))));
    group.finish();
}

criterion_group!(benches, bench_cursor_walk, bench_codec);
criterion_main!(benches);

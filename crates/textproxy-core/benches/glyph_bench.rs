use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use textproxy_core::scripted_backend::{ScriptedGlyph, ScriptedTextApi};
use textproxy_core::{FontSpec, GlyphFlags, GlyphFormat, GlyphTransform, ProxyConfig, SurfaceId, TextProxy};

const SURFACE: SurfaceId = SurfaceId(1);

fn proxy(config: ProxyConfig) -> TextProxy<ScriptedTextApi> {
    let native = (b'a'..=b'z').fold(
        ScriptedTextApi::new().with_kerning("Georgia", &[('T', 'o', -1), ('a', 'v', -1)]),
        |api, ch| api.with_glyph(char::from(ch), ScriptedGlyph::new(0.4, 5.0 + f64::from(ch % 7) * 0.3, 0.35)),
    );
    let mut proxy = TextProxy::new(native, config);
    let font = proxy.create_font(FontSpec { height: 20, ..FontSpec::default() }, b"Georgia");
    proxy.select_font(SURFACE, font);
    proxy
}

/// Probe and render every character of `line`.
fn lay_out(proxy: &mut TextProxy<ScriptedTextApi>, line: &[u8], buffer: &mut [u8]) -> i64 {
    proxy.host_mut().set(line);
    let mut pen = 0i64;
    let mut in_tag = false;
    let visible = line.iter().copied().filter(|&b| {
        let keep = !in_tag && b != b'<';
        in_tag = (in_tag || b == b'<') && b != b'>';
        keep && b.is_ascii_lowercase()
    });
    for ch in visible.collect::<Vec<_>>() {
        for data in [None, Some(&mut buffer[..])] {
            let outline = proxy.glyph_outline(
                SURFACE,
                u32::from(ch),
                GlyphFormat::Gray8,
                GlyphFlags::default(),
                data,
                &GlyphTransform::IDENTITY,
            );
            pen += i64::from(outline.metrics.cell_inc_x);
        }
    }
    pen
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_layout");
    let mut buffer = vec![0u8; 512];

    for (name, config) in [
        ("plain", ProxyConfig::new()),
        ("override", ProxyConfig::new().with_override_face("Georgia")),
    ] {
        let line = b"the <b>quick</b> brown <i>fox</i> jumps over the lazy dog".repeat(4);
        let mut proxy = proxy(config);
        group.throughput(Throughput::Elements(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &line, |b, line| {
            b.iter(|| black_box(lay_out(&mut proxy, black_box(line), &mut buffer)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);

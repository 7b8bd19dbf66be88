#![no_main]
use libfuzzer_sys::fuzz_target;

use vntextproxy::scripted_backend::ScriptedTextApi;
use vntextproxy::sjis_text::TextCursor;
use vntextproxy::{FontSpec, GlyphFlags, GlyphFormat, GlyphTransform, ProxyConfig, SurfaceId, TextProxy};

// Lay out an arbitrary engine line character by character, the way the
// engine does, and check the pen never drifts.
fuzz_target!(|data: &[u8]| {
    let surface = SurfaceId(1);
    let config = ProxyConfig::new().with_override_face("Georgia");
    let mut proxy = TextProxy::new(ScriptedTextApi::new(), config);
    let font = proxy.create_font(FontSpec { height: 16, ..FontSpec::default() }, b"MS Gothic");
    proxy.select_font(surface, font);
    proxy.host_mut().set(data);

    let mut buffer = vec![0u8; 4096];
    for ch in TextCursor::new(data) {
        let code = ch.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        for format in [GlyphFormat::Metrics, GlyphFormat::Gray8, GlyphFormat::Bitmap] {
            proxy.glyph_outline(
                surface,
                code,
                format,
                GlyphFlags::default(),
                Some(&mut buffer[..]),
                &GlyphTransform::IDENTITY,
            );
            let pen = proxy.surface(surface).unwrap().pen();
            assert!(pen.advance_carry().abs() < 1.0);
            assert!(pen.nudge_carry().abs() < 1.0);
        }
    }
    assert!(proxy.line_offset() <= data.len());
});

//! Text measurement, drawing and font enumeration for legacy-encoded callers.

use tracing::{debug, warn};

use crate::font::{FontDescriptor, FontStyle, LegacyLogFont};
use crate::proxy::TextProxy;
use crate::traits::{EnumeratedFont, HostTextSource, NativeTextApi, SurfaceId, TextMetric, TextSize};

/// An enumerated font re-encoded for a legacy caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyEnumeratedFont {
    pub log_font: LegacyLogFont,
    pub full_name: Vec<u8>,
    pub style: Vec<u8>,
    pub script: Vec<u8>,
    pub metric: TextMetric,
    pub font_type: u32,
}

/// Narrow a wide text metric to what a single-byte record can hold.
pub fn narrow_text_metric(metric: &TextMetric) -> TextMetric {
    let narrow = |ch: u32| if ch >= 0x100 { u32::from(b'?') } else { ch };
    TextMetric {
        first_char: metric.first_char.min(0xFF),
        last_char: metric.last_char.min(0xFF),
        default_char: narrow(metric.default_char),
        break_char: narrow(metric.break_char),
        ..*metric
    }
}

impl<N: NativeTextApi, H: HostTextSource> TextProxy<N, H> {
    pub fn measure_text(&mut self, surface: SurfaceId, text: &[u8]) -> Option<TextSize> {
        let text = self.codec.decode(text);
        self.native.text_extent(surface, &text)
    }

    pub fn draw_text(&mut self, surface: SurfaceId, x: i32, y: i32, text: &[u8]) -> bool {
        let text = self.codec.decode(text);
        self.prepare_draw_font(surface);
        self.native.text_out(surface, x, y, &text)
    }

    /// Make sure a sensible font is selected before the engine draws.
    fn prepare_draw_font(&mut self, surface: SurfaceId) {
        let descriptor = match self.bound_font(surface) {
            None => FontDescriptor::new(
                &self.config.fallback_face,
                self.config.fallback_height,
                FontStyle::default(),
            ),
            Some(font) => match self.config.override_face.as_deref() {
                Some(face) if font.style() != self.style.style() => {
                    FontDescriptor::new(face, font.height(), self.style.style())
                }
                _ => return,
            },
        };

        match self.cache.fetch(&mut self.native, &descriptor) {
            Ok(font) => {
                let handle = font.handle();
                debug!("Selecting {:?} before drawing on {:?}", descriptor, surface);
                self.select_font(surface, handle);
            }
            Err(e) => warn!("No font for DrawText: {}", e),
        }
    }

    /// Enumerate fonts for a legacy caller. The filter face is decoded before
    /// the native enumeration and every result is re-encoded before
    /// `callback` sees it; the callback's return value drives the enumeration.
    pub fn enumerate_fonts(
        &mut self,
        surface: SurfaceId,
        filter: Option<&LegacyLogFont>,
        callback: &mut dyn FnMut(&LegacyEnumeratedFont) -> i32,
    ) -> i32 {
        let filter = filter.map(|f| f.decode(self.codec.as_ref()));
        let codec = self.codec.as_ref();
        let mut forward = |font: &EnumeratedFont| {
            let legacy = LegacyEnumeratedFont {
                log_font: font.log_font.encode(codec),
                full_name: codec.encode(&font.full_name),
                style: codec.encode(&font.style),
                script: codec.encode(&font.script),
                metric: narrow_text_metric(&font.metric),
                font_type: font.font_type,
            };
            callback(&legacy)
        };
        self.native.enumerate_fonts(surface, filter.as_ref(), &mut forward)
    }
}

//! Scripted native text API for testing the proxy without an OS.
//!
//! Glyph widths, kerning pairs and failures are set up front; every call is
//! recorded so tests can assert on what reached the "OS".

use std::collections::HashMap;

use crate::constants::GDI_ERROR;
use crate::font::LogFont;
use crate::glyph::bitmap_row_stride;
use crate::traits::{
    AbcWidths, EnumFontsCallback, EnumeratedFont, FontHandle, GlyphFlags, GlyphFormat, GlyphMetrics,
    GlyphOutline, GlyphTransform, KerningPair, NativeTextApi, SurfaceId, TextSize,
};

/// Scripted shape of one glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedGlyph {
    /// `None` makes the ABC width query fail for this glyph.
    pub abc: Option<AbcWidths>,
    pub black_box: (u32, u32),
    pub origin: (i32, i32),
}

impl ScriptedGlyph {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            abc: Some(AbcWidths { a, b, c }),
            black_box: (b.ceil().max(1.0) as u32, 16),
            origin: (a.floor() as i32, 13),
        }
    }

    pub fn with_black_box(mut self, width: u32, height: u32) -> Self {
        self.black_box = (width, height);
        self
    }

    pub fn without_abc(mut self) -> Self {
        self.abc = None;
        self
    }
}

impl Default for ScriptedGlyph {
    fn default() -> Self {
        Self::new(0.0, 8.0, 0.0)
    }
}

/// Recorded glyph query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCall {
    pub surface: SurfaceId,
    pub ch: char,
    pub format: GlyphFormat,
    pub with_buffer: bool,
}

pub struct ScriptedTextApi {
    next_handle: usize,
    fail_create: bool,
    delete_result: bool,
    fonts: HashMap<FontHandle, LogFont>,
    created: Vec<LogFont>,
    selected: HashMap<SurfaceId, FontHandle>,
    selections: Vec<(SurfaceId, FontHandle)>,
    deleted: Vec<FontHandle>,
    kerning: HashMap<String, Vec<KerningPair>>,
    kerning_queries: usize,
    glyphs: HashMap<char, ScriptedGlyph>,
    failing_glyphs: Vec<char>,
    glyph_calls: Vec<GlyphCall>,
    text_outs: Vec<(SurfaceId, i32, i32, String)>,
    enumerable: Vec<EnumeratedFont>,
}

impl Default for ScriptedTextApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTextApi {
    pub fn new() -> Self {
        ScriptedTextApi {
            next_handle: 0x1000,
            fail_create: false,
            delete_result: true,
            fonts: HashMap::new(),
            created: Vec::new(),
            selected: HashMap::new(),
            selections: Vec::new(),
            deleted: Vec::new(),
            kerning: HashMap::new(),
            kerning_queries: 0,
            glyphs: HashMap::new(),
            failing_glyphs: Vec::new(),
            glyph_calls: Vec::new(),
            text_outs: Vec::new(),
            enumerable: Vec::new(),
        }
    }

    pub fn with_glyph(mut self, ch: char, glyph: ScriptedGlyph) -> Self {
        self.glyphs.insert(ch, glyph);
        self
    }

    /// Kerning pairs reported for every font of `face`.
    pub fn with_kerning(mut self, face: &str, pairs: &[(char, char, i32)]) -> Self {
        self.kerning.insert(
            face.to_string(),
            pairs
                .iter()
                .map(|&(first, second, amount)| KerningPair { first, second, amount })
                .collect(),
        );
        self
    }

    pub fn with_enumerable_font(mut self, font: EnumeratedFont) -> Self {
        self.enumerable.push(font);
        self
    }

    pub fn fail_font_creation(&mut self, fail: bool) {
        self.fail_create = fail;
    }

    pub fn fail_glyph(&mut self, ch: char) {
        self.failing_glyphs.push(ch);
    }

    pub fn set_delete_result(&mut self, result: bool) {
        self.delete_result = result;
    }

    /// A handle the proxy never created, as if the engine made it directly.
    pub fn foreign_handle(&mut self) -> FontHandle {
        self.allocate_handle()
    }

    pub fn created_fonts(&self) -> &[LogFont] {
        &self.created
    }

    pub fn font_record(&self, handle: FontHandle) -> Option<&LogFont> {
        self.fonts.get(&handle)
    }

    pub fn selected(&self, surface: SurfaceId) -> Option<FontHandle> {
        self.selected.get(&surface).copied()
    }

    pub fn selections(&self) -> &[(SurfaceId, FontHandle)] {
        &self.selections
    }

    pub fn deleted(&self) -> &[FontHandle] {
        &self.deleted
    }

    pub fn kerning_queries(&self) -> usize {
        self.kerning_queries
    }

    pub fn glyph_calls(&self) -> &[GlyphCall] {
        &self.glyph_calls
    }

    pub fn text_outs(&self) -> &[(SurfaceId, i32, i32, String)] {
        &self.text_outs
    }

    /// Clear recorded operations
    pub fn clear_log(&mut self) {
        self.selections.clear();
        self.deleted.clear();
        self.glyph_calls.clear();
        self.text_outs.clear();
        self.kerning_queries = 0;
    }

    fn allocate_handle(&mut self) -> FontHandle {
        let handle = FontHandle(self.next_handle);
        self.next_handle += 0x10;
        handle
    }

    fn glyph(&self, ch: char) -> ScriptedGlyph {
        self.glyphs.get(&ch).copied().unwrap_or_default()
    }
}

impl NativeTextApi for ScriptedTextApi {
    fn create_font(&mut self, record: &LogFont) -> Option<FontHandle> {
        if self.fail_create {
            return None;
        }
        let handle = self.allocate_handle();
        self.fonts.insert(handle, record.clone());
        self.created.push(record.clone());
        Some(handle)
    }

    fn select_font(&mut self, surface: SurfaceId, font: FontHandle) -> FontHandle {
        self.selections.push((surface, font));
        self.selected.insert(surface, font).unwrap_or(FontHandle::NULL)
    }

    fn delete_font(&mut self, font: FontHandle) -> bool {
        self.deleted.push(font);
        self.delete_result
    }

    fn kerning_pairs(&mut self, surface: SurfaceId) -> Vec<KerningPair> {
        self.kerning_queries += 1;
        self.selected
            .get(&surface)
            .and_then(|handle| self.fonts.get(handle))
            .and_then(|record| self.kerning.get(&record.face_name))
            .cloned()
            .unwrap_or_default()
    }

    fn glyph_outline(
        &mut self,
        surface: SurfaceId,
        ch: char,
        format: GlyphFormat,
        _flags: GlyphFlags,
        buffer: Option<&mut [u8]>,
        _transform: &GlyphTransform,
    ) -> GlyphOutline {
        self.glyph_calls.push(GlyphCall {
            surface,
            ch,
            format,
            with_buffer: buffer.is_some(),
        });

        if self.failing_glyphs.contains(&ch) {
            return GlyphOutline {
                status: GDI_ERROR,
                metrics: GlyphMetrics::default(),
            };
        }

        let glyph = self.glyph(ch);
        let (width, height) = glyph.black_box;
        let advance = glyph.abc.map_or(f64::from(width), |abc| abc.advance());
        let metrics = GlyphMetrics {
            black_box_x: width,
            black_box_y: height,
            origin_x: glyph.origin.0,
            origin_y: glyph.origin.1,
            cell_inc_x: advance.round() as i16,
            cell_inc_y: 0,
        };

        let status = match bitmap_row_stride(format, width) {
            Some(stride) => {
                let size = stride * height as usize;
                if let Some(buffer) = buffer {
                    let end = size.min(buffer.len());
                    fill_ink(format, width, stride, &mut buffer[..end]);
                }
                size as u32
            }
            None => 0,
        };

        GlyphOutline { status, metrics }
    }

    fn char_abc_widths(&mut self, _surface: SurfaceId, ch: char) -> Option<AbcWidths> {
        self.glyph(ch).abc
    }

    fn text_extent(&mut self, _surface: SurfaceId, text: &str) -> Option<TextSize> {
        let cx = text
            .chars()
            .map(|ch| self.glyph(ch).abc.map_or(8.0, |abc| abc.advance()))
            .sum::<f64>();
        Some(TextSize {
            cx: cx.round() as i32,
            cy: 16,
        })
    }

    fn text_out(&mut self, surface: SurfaceId, x: i32, y: i32, text: &str) -> bool {
        self.text_outs.push((surface, x, y, text.to_string()));
        true
    }

    fn enumerate_fonts(
        &mut self,
        _surface: SurfaceId,
        filter: Option<&LogFont>,
        callback: &mut EnumFontsCallback<'_, EnumeratedFont>,
    ) -> i32 {
        let mut result = 1;
        for font in &self.enumerable {
            let wanted = filter.map_or(true, |f| f.face_name.is_empty() || f.face_name == font.log_font.face_name);
            if !wanted {
                continue;
            }
            result = callback(font);
            if result == 0 {
                break;
            }
        }
        result
    }
}

/// Solid ink over the whole black box.
fn fill_ink(format: GlyphFormat, width: u32, stride: usize, buffer: &mut [u8]) {
    for row in buffer.chunks_mut(stride) {
        for x in 0..width as usize {
            match format {
                GlyphFormat::Bitmap => {
                    if let Some(byte) = row.get_mut(x / 8) {
                        *byte |= 0x80 >> (x % 8);
                    }
                }
                _ => {
                    if let Some(px) = row.get_mut(x) {
                        *px = 0x40;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_returns_previous_handle() {
        let mut api = ScriptedTextApi::new();
        let surface = SurfaceId(1);
        let a = api.create_font(&LogFont::default()).unwrap();
        let b = api.create_font(&LogFont::default()).unwrap();

        assert_eq!(api.select_font(surface, a), FontHandle::NULL);
        assert_eq!(api.select_font(surface, b), a);
        assert_eq!(api.selected(surface), Some(b));
    }

    #[test]
    fn kerning_follows_selected_face() {
        let mut api = ScriptedTextApi::new().with_kerning("Georgia", &[('A', 'V', -3)]);
        let surface = SurfaceId(1);
        let georgia = api.create_font(&LogFont::new(Default::default(), "Georgia")).unwrap();
        let gothic = api.create_font(&LogFont::new(Default::default(), "MS Gothic")).unwrap();

        api.select_font(surface, georgia);
        assert_eq!(api.kerning_pairs(surface).len(), 1);
        api.select_font(surface, gothic);
        assert!(api.kerning_pairs(surface).is_empty());
        assert_eq!(api.kerning_queries(), 2);
    }

    #[test]
    fn bitmap_queries_report_padded_size() {
        let mut api = ScriptedTextApi::new().with_glyph('x', ScriptedGlyph::new(0.0, 5.0, 0.0).with_black_box(5, 2));
        let outline = api.glyph_outline(
            SurfaceId(1),
            'x',
            GlyphFormat::Gray8,
            GlyphFlags::default(),
            None,
            &GlyphTransform::IDENTITY,
        );
        assert_eq!(outline.status, 16);

        let mut buffer = vec![0u8; 8];
        let outline = api.glyph_outline(
            SurfaceId(1),
            'x',
            GlyphFormat::Bitmap,
            GlyphFlags::default(),
            Some(&mut buffer[..]),
            &GlyphTransform::IDENTITY,
        );
        assert_eq!(outline.status, 8);
        assert_eq!(buffer[0], 0b1111_1000);
        assert_eq!(buffer[4], 0b1111_1000);
    }

    #[test]
    fn short_buffers_are_filled_up_to_their_length() {
        let mut api = ScriptedTextApi::new().with_glyph('x', ScriptedGlyph::new(0.0, 3.0, 0.0).with_black_box(3, 4));
        let mut buffer = vec![0u8; 6];
        let outline = api.glyph_outline(
            SurfaceId(1),
            'x',
            GlyphFormat::Gray8,
            GlyphFlags::default(),
            Some(&mut buffer[..]),
            &GlyphTransform::IDENTITY,
        );
        assert_eq!(outline.status, 16);
        assert_eq!(buffer, vec![0x40, 0x40, 0x40, 0, 0x40, 0x40]);
    }

    #[test]
    fn enumeration_stops_when_callback_returns_zero() {
        let font = |face: &str| EnumeratedFont {
            log_font: LogFont::new(Default::default(), face),
            ..EnumeratedFont::default()
        };
        let mut api = ScriptedTextApi::new()
            .with_enumerable_font(font("A"))
            .with_enumerable_font(font("B"));

        let mut seen = Vec::new();
        let result = api.enumerate_fonts(SurfaceId(1), None, &mut |f: &EnumeratedFont| {
            seen.push(f.log_font.face_name.clone());
            0
        });
        assert_eq!(result, 0);
        assert_eq!(seen, vec!["A".to_string()]);
    }
}

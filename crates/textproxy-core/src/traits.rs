use crate::font::LogFont;

/// Identity of a drawing surface (a device context on Windows).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

/// Native font handle as the engine sees it; `0` is the null handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontHandle(pub usize);

impl FontHandle {
    pub const NULL: FontHandle = FontHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Glyph outline query formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphFormat {
    Metrics,
    /// 1 bit per pixel, rows padded to 32 bits.
    Bitmap,
    Native,
    Bezier,
    /// 8 bits per pixel with 5, 17 or 65 gray levels, rows padded to 32 bits.
    Gray2,
    Gray4,
    Gray8,
    Other(u32),
}

impl GlyphFormat {
    pub fn from_raw(raw: u32) -> Self {
        match raw & 0x7F {
            0 => GlyphFormat::Metrics,
            1 => GlyphFormat::Bitmap,
            2 => GlyphFormat::Native,
            3 => GlyphFormat::Bezier,
            4 => GlyphFormat::Gray2,
            5 => GlyphFormat::Gray4,
            6 => GlyphFormat::Gray8,
            other => GlyphFormat::Other(other),
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            GlyphFormat::Metrics => 0,
            GlyphFormat::Bitmap => 1,
            GlyphFormat::Native => 2,
            GlyphFormat::Bezier => 3,
            GlyphFormat::Gray2 => 4,
            GlyphFormat::Gray4 => 5,
            GlyphFormat::Gray8 => 6,
            GlyphFormat::Other(raw) => raw,
        }
    }

    pub fn is_bitmap(self) -> bool {
        matches!(self, GlyphFormat::Bitmap | GlyphFormat::Gray2 | GlyphFormat::Gray4 | GlyphFormat::Gray8)
    }
}

/// Option bits carried alongside the format (glyph index, unhinted).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphFlags(pub u32);

impl GlyphFlags {
    pub const GLYPH_INDEX: u32 = 0x0080;
    pub const UNHINTED: u32 = 0x0100;

    pub fn from_raw(raw: u32) -> Self {
        Self(raw & !0x7F)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub black_box_x: u32,
    pub black_box_y: u32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub cell_inc_x: i16,
    pub cell_inc_y: i16,
}

/// 16.16 fixed point 2x2 transform passed through to the native query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphTransform {
    pub m11: i32,
    pub m12: i32,
    pub m21: i32,
    pub m22: i32,
}

impl Default for GlyphTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GlyphTransform {
    pub const IDENTITY: GlyphTransform = GlyphTransform { m11: 0x1_0000, m12: 0, m21: 0, m22: 0x1_0000 };
}

/// Result of a native glyph query: byte size of the glyph data (or
/// `GDI_ERROR`) and the metrics written by the OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphOutline {
    pub status: u32,
    pub metrics: GlyphMetrics,
}

/// Floating point left bearing, black box width and right bearing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AbcWidths {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl AbcWidths {
    pub fn advance(&self) -> f64 {
        self.a + self.b + self.c
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KerningPair {
    pub first: char,
    pub second: char,
    pub amount: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextSize {
    pub cx: i32,
    pub cy: i32,
}

/// Text metrics reported during font enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextMetric {
    pub height: i32,
    pub ascent: i32,
    pub descent: i32,
    pub internal_leading: i32,
    pub external_leading: i32,
    pub ave_char_width: i32,
    pub max_char_width: i32,
    pub weight: i32,
    pub overhang: i32,
    pub digitized_aspect_x: i32,
    pub digitized_aspect_y: i32,
    pub first_char: u32,
    pub last_char: u32,
    pub default_char: u32,
    pub break_char: u32,
    pub italic: u8,
    pub underlined: u8,
    pub struck_out: u8,
    pub pitch_and_family: u8,
    pub charset: u8,
}

/// One font reported by native enumeration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumeratedFont {
    pub log_font: LogFont,
    pub full_name: String,
    pub style: String,
    pub script: String,
    pub metric: TextMetric,
    pub font_type: u32,
}

/// Callback run for each enumerated font; the return value is handed back to
/// the native enumeration (zero stops it).
pub type EnumFontsCallback<'a, T> = dyn FnMut(&T) -> i32 + 'a;

/// The system text API the proxy sits in front of.
///
/// One implementation forwards to the OS, the other is scripted for tests.
/// Every method takes the internal text representation; legacy bytes never
/// cross this seam.
pub trait NativeTextApi {
    /// Create a native font. `None` when the OS refuses.
    fn create_font(&mut self, record: &LogFont) -> Option<FontHandle>;

    /// Select `font` into `surface`, returning the handle previously selected.
    fn select_font(&mut self, surface: SurfaceId, font: FontHandle) -> FontHandle;

    fn delete_font(&mut self, font: FontHandle) -> bool;

    /// Every kerning pair of the font selected into `surface`. Empty when the
    /// font has none or the query fails.
    fn kerning_pairs(&mut self, surface: SurfaceId) -> Vec<KerningPair>;

    fn glyph_outline(
        &mut self,
        surface: SurfaceId,
        ch: char,
        format: GlyphFormat,
        flags: GlyphFlags,
        buffer: Option<&mut [u8]>,
        transform: &GlyphTransform,
    ) -> GlyphOutline;

    fn char_abc_widths(&mut self, surface: SurfaceId, ch: char) -> Option<AbcWidths>;

    fn text_extent(&mut self, surface: SurfaceId, text: &str) -> Option<TextSize>;

    fn text_out(&mut self, surface: SurfaceId, x: i32, y: i32, text: &str) -> bool;

    fn enumerate_fonts(
        &mut self,
        surface: SurfaceId,
        filter: Option<&LogFont>,
        callback: &mut EnumFontsCallback<'_, EnumeratedFont>,
    ) -> i32;
}

/// The engine's text line currently being laid out.
///
/// The engine owns the bytes; the proxy only reads them.
pub trait HostTextSource {
    fn current_line(&self) -> &[u8];

    /// Changes whenever the engine starts laying out a different line.
    fn line_id(&self) -> u64;
}

/// A captured copy of the engine's current line, fed by whatever hook
/// observes the engine's text submission.
#[derive(Clone, Debug, Default)]
pub struct CapturedLine {
    bytes: Vec<u8>,
    id: u64,
}

impl CapturedLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, bytes: &[u8]) {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.bytes.clear();
        self.bytes.extend_from_slice(&bytes[..end]);
        self.id = self.id.wrapping_add(1);
    }
}

impl HostTextSource for CapturedLine {
    fn current_line(&self) -> &[u8] {
        &self.bytes
    }

    fn line_id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_flags_split_the_raw_value() {
        let raw = 6 | GlyphFlags::GLYPH_INDEX;
        assert_eq!(GlyphFormat::from_raw(raw), GlyphFormat::Gray8);
        assert_eq!(GlyphFlags::from_raw(raw), GlyphFlags(GlyphFlags::GLYPH_INDEX));
        assert_eq!(GlyphFormat::from_raw(raw).to_raw() | GlyphFlags::from_raw(raw).0, raw);
        assert_eq!(GlyphFormat::from_raw(0x42), GlyphFormat::Other(0x42));
    }

    #[test]
    fn captured_line_stops_at_nul_and_counts_lines() {
        let mut line = CapturedLine::new();
        let first = line.line_id();
        line.set(b"abc\0def");
        assert_eq!(line.current_line(), b"abc");
        line.set(b"abc");
        assert_eq!(line.line_id(), first + 2);
    }
}

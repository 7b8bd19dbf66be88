//! Conversions between GDI records and the core's types.

use textproxy_core::{
    EnumeratedFont, FontSpec, GlyphMetrics, GlyphTransform, LegacyEnumeratedFont, LegacyLogFont, LogFont,
    TextMetric,
};
use windows_sys::Win32::Foundation::POINT;
use windows_sys::Win32::Graphics::Gdi::{
    ENUMLOGFONTEXA, ENUMLOGFONTEXW, FIXED, GLYPHMETRICS, LOGFONTA, LOGFONTW, MAT2, TEXTMETRICA, TEXTMETRICW,
};

use crate::wide::{copy_nul_terminated, from_wide, narrow_field, to_wide};

macro_rules! spec_from_record {
    ($lf:expr) => {
        FontSpec {
            height: $lf.lfHeight,
            width: $lf.lfWidth,
            escapement: $lf.lfEscapement,
            orientation: $lf.lfOrientation,
            weight: $lf.lfWeight,
            italic: $lf.lfItalic,
            underline: $lf.lfUnderline,
            strike_out: $lf.lfStrikeOut,
            charset: $lf.lfCharSet as u8,
            out_precision: $lf.lfOutPrecision as u8,
            clip_precision: $lf.lfClipPrecision as u8,
            quality: $lf.lfQuality as u8,
            pitch_and_family: $lf.lfPitchAndFamily,
        }
    };
}

macro_rules! spec_into_record {
    ($spec:expr, $lf:expr) => {{
        let spec = $spec;
        $lf.lfHeight = spec.height;
        $lf.lfWidth = spec.width;
        $lf.lfEscapement = spec.escapement;
        $lf.lfOrientation = spec.orientation;
        $lf.lfWeight = spec.weight;
        $lf.lfItalic = spec.italic;
        $lf.lfUnderline = spec.underline;
        $lf.lfStrikeOut = spec.strike_out;
        $lf.lfCharSet = spec.charset as _;
        $lf.lfOutPrecision = spec.out_precision as _;
        $lf.lfClipPrecision = spec.clip_precision as _;
        $lf.lfQuality = spec.quality as _;
        $lf.lfPitchAndFamily = spec.pitch_and_family;
    }};
}

pub fn log_font_from_w(lf: &LOGFONTW) -> LogFont {
    LogFont {
        spec: spec_from_record!(lf),
        face_name: from_wide(&lf.lfFaceName),
    }
}

pub fn log_font_to_w(record: &LogFont) -> LOGFONTW {
    // SAFETY: LOGFONTW is plain old data; all-zero is a valid value.
    let mut lf: LOGFONTW = unsafe { std::mem::zeroed() };
    spec_into_record!(record.spec, lf);
    copy_nul_terminated(&mut lf.lfFaceName, to_wide(&record.face_name));
    lf
}

pub fn legacy_log_font_from_a(lf: &LOGFONTA) -> LegacyLogFont {
    LegacyLogFont {
        spec: spec_from_record!(lf),
        face_name: narrow_field(&lf.lfFaceName),
    }
}

pub fn legacy_log_font_to_a(record: &LegacyLogFont) -> LOGFONTA {
    // SAFETY: LOGFONTA is plain old data; all-zero is a valid value.
    let mut lf: LOGFONTA = unsafe { std::mem::zeroed() };
    spec_into_record!(record.spec, lf);
    copy_nul_terminated(&mut lf.lfFaceName, record.face_name.iter().map(|&b| b as _));
    lf
}

pub fn text_metric_from_w(tm: &TEXTMETRICW) -> TextMetric {
    TextMetric {
        height: tm.tmHeight,
        ascent: tm.tmAscent,
        descent: tm.tmDescent,
        internal_leading: tm.tmInternalLeading,
        external_leading: tm.tmExternalLeading,
        ave_char_width: tm.tmAveCharWidth,
        max_char_width: tm.tmMaxCharWidth,
        weight: tm.tmWeight,
        overhang: tm.tmOverhang,
        digitized_aspect_x: tm.tmDigitizedAspectX,
        digitized_aspect_y: tm.tmDigitizedAspectY,
        first_char: u32::from(tm.tmFirstChar),
        last_char: u32::from(tm.tmLastChar),
        default_char: u32::from(tm.tmDefaultChar),
        break_char: u32::from(tm.tmBreakChar),
        italic: tm.tmItalic,
        underlined: tm.tmUnderlined,
        struck_out: tm.tmStruckOut,
        pitch_and_family: tm.tmPitchAndFamily as u8,
        charset: tm.tmCharSet as u8,
    }
}

/// Expects a metric already narrowed to single-byte character codes.
pub fn text_metric_to_a(tm: &TextMetric) -> TEXTMETRICA {
    TEXTMETRICA {
        tmHeight: tm.height,
        tmAscent: tm.ascent,
        tmDescent: tm.descent,
        tmInternalLeading: tm.internal_leading,
        tmExternalLeading: tm.external_leading,
        tmAveCharWidth: tm.ave_char_width,
        tmMaxCharWidth: tm.max_char_width,
        tmWeight: tm.weight,
        tmOverhang: tm.overhang,
        tmDigitizedAspectX: tm.digitized_aspect_x,
        tmDigitizedAspectY: tm.digitized_aspect_y,
        tmFirstChar: tm.first_char as _,
        tmLastChar: tm.last_char as _,
        tmDefaultChar: tm.default_char as _,
        tmBreakChar: tm.break_char as _,
        tmItalic: tm.italic,
        tmUnderlined: tm.underlined,
        tmStruckOut: tm.struck_out,
        tmPitchAndFamily: tm.pitch_and_family as _,
        tmCharSet: tm.charset as _,
    }
}

pub fn enumerated_font(elf: &ENUMLOGFONTEXW, tm: &TEXTMETRICW, font_type: u32) -> EnumeratedFont {
    EnumeratedFont {
        log_font: log_font_from_w(&elf.elfLogFont),
        full_name: from_wide(&elf.elfFullName),
        style: from_wide(&elf.elfStyle),
        script: from_wide(&elf.elfScript),
        metric: text_metric_from_w(tm),
        font_type,
    }
}

pub fn enum_log_font_to_a(font: &LegacyEnumeratedFont) -> ENUMLOGFONTEXA {
    // SAFETY: ENUMLOGFONTEXA is plain old data; all-zero is a valid value.
    let mut elf: ENUMLOGFONTEXA = unsafe { std::mem::zeroed() };
    elf.elfLogFont = legacy_log_font_to_a(&font.log_font);
    copy_nul_terminated(&mut elf.elfFullName, font.full_name.iter().map(|&b| b as _));
    copy_nul_terminated(&mut elf.elfStyle, font.style.iter().map(|&b| b as _));
    copy_nul_terminated(&mut elf.elfScript, font.script.iter().map(|&b| b as _));
    elf
}

fn fixed_to_i32(value: FIXED) -> i32 {
    (i32::from(value.value) << 16) | i32::from(value.fract)
}

fn i32_to_fixed(value: i32) -> FIXED {
    FIXED {
        fract: (value & 0xFFFF) as u16,
        value: (value >> 16) as i16,
    }
}

pub fn transform_from_mat2(mat: &MAT2) -> GlyphTransform {
    GlyphTransform {
        m11: fixed_to_i32(mat.eM11),
        m12: fixed_to_i32(mat.eM12),
        m21: fixed_to_i32(mat.eM21),
        m22: fixed_to_i32(mat.eM22),
    }
}

pub fn transform_to_mat2(transform: &GlyphTransform) -> MAT2 {
    MAT2 {
        eM11: i32_to_fixed(transform.m11),
        eM12: i32_to_fixed(transform.m12),
        eM21: i32_to_fixed(transform.m21),
        eM22: i32_to_fixed(transform.m22),
    }
}

pub fn glyph_metrics_from_native(gm: &GLYPHMETRICS) -> GlyphMetrics {
    GlyphMetrics {
        black_box_x: gm.gmBlackBoxX,
        black_box_y: gm.gmBlackBoxY,
        origin_x: gm.gmptGlyphOrigin.x,
        origin_y: gm.gmptGlyphOrigin.y,
        cell_inc_x: gm.gmCellIncX,
        cell_inc_y: gm.gmCellIncY,
    }
}

pub fn glyph_metrics_to_native(metrics: &GlyphMetrics) -> GLYPHMETRICS {
    GLYPHMETRICS {
        gmBlackBoxX: metrics.black_box_x,
        gmBlackBoxY: metrics.black_box_y,
        gmptGlyphOrigin: POINT {
            x: metrics.origin_x,
            y: metrics.origin_y,
        },
        gmCellIncX: metrics.cell_inc_x,
        gmCellIncY: metrics.cell_inc_y,
    }
}

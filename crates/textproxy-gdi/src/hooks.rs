//! `extern "system"` replacements for the engine's GDI imports.
//!
//! Each hook hands its call to the shared proxy. When the runtime is not
//! initialised (or its lock is poisoned) the call goes straight to gdi32, so
//! the engine never sees a difference beyond the proxy's own adjustments.

use std::ffi::c_void;
use std::slice;

use textproxy_core::constants::GDI_ERROR;
use textproxy_core::{
    FontHandle, FontSpec, GlyphFlags, GlyphFormat, LegacyEnumeratedFont, LegacyLogFont, LogFont,
};
use tracing::{trace, warn};
use windows_sys::Win32::Foundation::{LPARAM, SIZE};
use windows_sys::Win32::Graphics::Gdi::{
    CreateFontIndirectA, CreateFontIndirectW, DeleteObject, EnumFontFamiliesExA, EnumFontsA, GetGlyphOutlineA,
    GetTextExtentPoint32A, GetTextExtentPointA, SelectObject, TextOutA, FONTENUMPROCA, GLYPHMETRICS, HDC,
    HFONT, HGDIOBJ, LOGFONTA, LOGFONTW, MAT2,
};

use crate::backend::{font_handle, gdi_object, surface};
use crate::convert;
use crate::runtime::with_proxy;
use crate::wide;

/// Export names and addresses for the hook installer.
pub fn hook_table() -> [(&'static str, usize); 12] {
    [
        ("CreateFontA", create_font_a as usize),
        ("CreateFontW", create_font_w as usize),
        ("CreateFontIndirectA", create_font_indirect_a as usize),
        ("CreateFontIndirectW", create_font_indirect_w as usize),
        ("SelectObject", select_object as usize),
        ("DeleteObject", delete_object as usize),
        ("GetGlyphOutlineA", get_glyph_outline_a as usize),
        ("GetTextExtentPointA", get_text_extent_point_a as usize),
        ("GetTextExtentPoint32A", get_text_extent_point32_a as usize),
        ("TextOutA", text_out_a as usize),
        ("EnumFontsA", enum_fonts_a as usize),
        ("EnumFontFamiliesExA", enum_font_families_ex_a as usize),
    ]
}

pub fn hook_address(name: &str) -> Option<usize> {
    hook_table()
        .into_iter()
        .find(|(export, _)| *export == name)
        .map(|(_, address)| address)
}

/// NUL-terminated narrow string, empty for null.
unsafe fn c_bytes<'a>(text: *const u8) -> &'a [u8] {
    if text.is_null() {
        return &[];
    }
    std::ffi::CStr::from_ptr(text.cast()).to_bytes()
}

/// Counted narrow string, empty for null or a non-positive count.
unsafe fn counted_bytes<'a>(text: *const u8, count: i32) -> &'a [u8] {
    if text.is_null() || count <= 0 {
        return &[];
    }
    slice::from_raw_parts(text, count as usize)
}

/// NUL-terminated UTF-16 string, empty for null.
unsafe fn c_wide(text: *const u16) -> String {
    if text.is_null() {
        return String::new();
    }
    let mut len = 0;
    while *text.add(len) != 0 {
        len += 1;
    }
    wide::from_wide(slice::from_raw_parts(text, len))
}

fn font_to_hfont(font: FontHandle) -> HFONT {
    gdi_object(font) as HFONT
}

/// The attribute arguments shared by `CreateFontA` and `CreateFontW`.
#[allow(clippy::too_many_arguments)]
fn font_spec(
    height: i32,
    width: i32,
    escapement: i32,
    orientation: i32,
    weight: i32,
    italic: u32,
    underline: u32,
    strike_out: u32,
    charset: u32,
    out_precision: u32,
    clip_precision: u32,
    quality: u32,
    pitch_and_family: u32,
) -> FontSpec {
    FontSpec {
        height,
        width,
        escapement,
        orientation,
        weight,
        italic: italic as u8,
        underline: underline as u8,
        strike_out: strike_out as u8,
        charset: charset as u8,
        out_precision: out_precision as u8,
        clip_precision: clip_precision as u8,
        quality: quality as u8,
        pitch_and_family: pitch_and_family as u8,
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe extern "system" fn create_font_a(
    height: i32,
    width: i32,
    escapement: i32,
    orientation: i32,
    weight: i32,
    italic: u32,
    underline: u32,
    strike_out: u32,
    charset: u32,
    out_precision: u32,
    clip_precision: u32,
    quality: u32,
    pitch_and_family: u32,
    face: *const u8,
) -> HFONT {
    let record = LegacyLogFont {
        spec: font_spec(
            height,
            width,
            escapement,
            orientation,
            weight,
            italic,
            underline,
            strike_out,
            charset,
            out_precision,
            clip_precision,
            quality,
            pitch_and_family,
        ),
        face_name: c_bytes(face).to_vec(),
    };
    match with_proxy(|proxy| proxy.create_font_legacy(&record)) {
        Ok(font) => font_to_hfont(font),
        Err(e) => {
            trace!("CreateFontA passthrough: {}", e);
            CreateFontIndirectA(&convert::legacy_log_font_to_a(&record))
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe extern "system" fn create_font_w(
    height: i32,
    width: i32,
    escapement: i32,
    orientation: i32,
    weight: i32,
    italic: u32,
    underline: u32,
    strike_out: u32,
    charset: u32,
    out_precision: u32,
    clip_precision: u32,
    quality: u32,
    pitch_and_family: u32,
    face: *const u16,
) -> HFONT {
    let spec = font_spec(
        height,
        width,
        escapement,
        orientation,
        weight,
        italic,
        underline,
        strike_out,
        charset,
        out_precision,
        clip_precision,
        quality,
        pitch_and_family,
    );
    let record = LogFont::new(spec, &c_wide(face));
    match with_proxy(|proxy| proxy.create_font_record(&record)) {
        Ok(font) => font_to_hfont(font),
        Err(e) => {
            trace!("CreateFontW passthrough: {}", e);
            CreateFontIndirectW(&convert::log_font_to_w(&record))
        }
    }
}

pub unsafe extern "system" fn create_font_indirect_a(lf: *const LOGFONTA) -> HFONT {
    if lf.is_null() {
        return std::ptr::null_mut();
    }
    let record = convert::legacy_log_font_from_a(&*lf);
    match with_proxy(|proxy| proxy.create_font_legacy(&record)) {
        Ok(font) => font_to_hfont(font),
        Err(e) => {
            trace!("CreateFontIndirectA passthrough: {}", e);
            CreateFontIndirectA(lf)
        }
    }
}

pub unsafe extern "system" fn create_font_indirect_w(lf: *const LOGFONTW) -> HFONT {
    if lf.is_null() {
        return std::ptr::null_mut();
    }
    let record = convert::log_font_from_w(&*lf);
    match with_proxy(|proxy| proxy.create_font_record(&record)) {
        Ok(font) => font_to_hfont(font),
        Err(e) => {
            trace!("CreateFontIndirectW passthrough: {}", e);
            CreateFontIndirectW(lf)
        }
    }
}

pub unsafe extern "system" fn select_object(hdc: HDC, object: HGDIOBJ) -> HGDIOBJ {
    match with_proxy(|proxy| proxy.select_font(surface(hdc), font_handle(object))) {
        Ok(previous) => gdi_object(previous),
        Err(_) => SelectObject(hdc, object),
    }
}

pub unsafe extern "system" fn delete_object(object: HGDIOBJ) -> i32 {
    match with_proxy(|proxy| proxy.delete_font(font_handle(object))) {
        Ok(deleted) => i32::from(deleted),
        Err(_) => DeleteObject(object),
    }
}

pub unsafe extern "system" fn get_glyph_outline_a(
    hdc: HDC,
    code: u32,
    format: u32,
    gm: *mut GLYPHMETRICS,
    size: u32,
    buffer: *mut c_void,
    mat: *const MAT2,
) -> u32 {
    if gm.is_null() || mat.is_null() {
        return GetGlyphOutlineA(hdc, code, format, gm, size, buffer, mat);
    }

    let transform = convert::transform_from_mat2(&*mat);
    let data = (!buffer.is_null() && size > 0).then(|| slice::from_raw_parts_mut(buffer.cast::<u8>(), size as usize));
    let result = with_proxy(|proxy| {
        proxy.glyph_outline(
            surface(hdc),
            code,
            GlyphFormat::from_raw(format),
            GlyphFlags::from_raw(format),
            data,
            &transform,
        )
    });

    match result {
        Ok(outline) => {
            if outline.status != GDI_ERROR {
                *gm = convert::glyph_metrics_to_native(&outline.metrics);
            }
            outline.status
        }
        Err(e) => {
            trace!("GetGlyphOutlineA passthrough: {}", e);
            GetGlyphOutlineA(hdc, code, format, gm, size, buffer, mat)
        }
    }
}

/// Measure through the proxy; `None` when the runtime is unavailable.
/// `size` must be non-null.
unsafe fn proxy_text_extent(hdc: HDC, text: *const u8, count: i32, size: *mut SIZE) -> Option<i32> {
    let bytes = counted_bytes(text, count);
    match with_proxy(|proxy| proxy.measure_text(surface(hdc), bytes)) {
        Ok(Some(extent)) => {
            *size = SIZE {
                cx: extent.cx,
                cy: extent.cy,
            };
            Some(1)
        }
        Ok(None) => Some(0),
        Err(e) => {
            trace!("Text extent passthrough: {}", e);
            None
        }
    }
}

pub unsafe extern "system" fn get_text_extent_point32_a(
    hdc: HDC,
    text: *const u8,
    count: i32,
    size: *mut SIZE,
) -> i32 {
    if size.is_null() {
        return GetTextExtentPoint32A(hdc, text, count, size);
    }
    proxy_text_extent(hdc, text, count, size).unwrap_or_else(|| GetTextExtentPoint32A(hdc, text, count, size))
}

pub unsafe extern "system" fn get_text_extent_point_a(hdc: HDC, text: *const u8, count: i32, size: *mut SIZE) -> i32 {
    if size.is_null() {
        return GetTextExtentPointA(hdc, text, count, size);
    }
    proxy_text_extent(hdc, text, count, size).unwrap_or_else(|| GetTextExtentPointA(hdc, text, count, size))
}

pub unsafe extern "system" fn text_out_a(hdc: HDC, x: i32, y: i32, text: *const u8, count: i32) -> i32 {
    let bytes = counted_bytes(text, count);
    match with_proxy(|proxy| proxy.draw_text(surface(hdc), x, y, bytes)) {
        Ok(drawn) => i32::from(drawn),
        Err(_) => TextOutA(hdc, x, y, text, count),
    }
}

/// Enumerate through the proxy and replay the results to `callback`.
///
/// The proxy collects every font first and runs the engine's callback after
/// releasing its lock, so the callback may call back into hooked functions.
/// `None` when there is no callback or the runtime is unavailable.
unsafe fn replay_fonts(
    hdc: HDC,
    filter: Option<LegacyLogFont>,
    callback: FONTENUMPROCA,
    lparam: LPARAM,
) -> Option<i32> {
    let engine_callback = callback?;

    let mut fonts: Vec<LegacyEnumeratedFont> = Vec::new();
    let collected = with_proxy(|proxy| {
        proxy.enumerate_fonts(surface(hdc), filter.as_ref(), &mut |font: &LegacyEnumeratedFont| {
            fonts.push(font.clone());
            1
        })
    });
    let mut result = match collected {
        Ok(result) => result,
        Err(e) => {
            warn!("Font enumeration passthrough: {}", e);
            return None;
        }
    };

    for font in &fonts {
        let elf = convert::enum_log_font_to_a(font);
        let tm = convert::text_metric_to_a(&font.metric);
        result = engine_callback(
            (&elf as *const _).cast::<LOGFONTA>(),
            &tm,
            font.font_type,
            lparam,
        );
        if result == 0 {
            break;
        }
    }
    Some(result)
}

pub unsafe extern "system" fn enum_font_families_ex_a(
    hdc: HDC,
    lf: *const LOGFONTA,
    callback: FONTENUMPROCA,
    lparam: LPARAM,
    flags: u32,
) -> i32 {
    let filter = (!lf.is_null()).then(|| convert::legacy_log_font_from_a(&*lf));
    replay_fonts(hdc, filter, callback, lparam)
        .unwrap_or_else(|| EnumFontFamiliesExA(hdc, lf, callback, lparam, flags))
}

/// A null face enumerates every family.
pub unsafe extern "system" fn enum_fonts_a(
    hdc: HDC,
    face: *const u8,
    callback: FONTENUMPROCA,
    lparam: LPARAM,
) -> i32 {
    let filter = (!face.is_null()).then(|| LegacyLogFont {
        spec: FontSpec::default(),
        face_name: c_bytes(face).to_vec(),
    });
    replay_fonts(hdc, filter, callback, lparam).unwrap_or_else(|| EnumFontsA(hdc, face, callback, lparam))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_hooked_export_has_a_distinct_entry() {
        let table = hook_table();
        let names: HashSet<_> = table.iter().map(|(name, _)| *name).collect();
        let addresses: HashSet<_> = table.iter().map(|(_, address)| *address).collect();
        assert_eq!(names.len(), table.len());
        assert_eq!(addresses.len(), table.len());

        for name in ["EnumFontsA", "CreateFontW", "CreateFontIndirectW", "GetTextExtentPointA"] {
            assert!(hook_address(name).is_some(), "{name}");
        }
        assert_eq!(hook_address("GetTextExtentPoint32W"), None);
    }

    #[test]
    fn wide_face_names_stop_at_nul() {
        let face: Vec<u16> = "Georgia\0junk".encode_utf16().collect();
        assert_eq!(unsafe { c_wide(face.as_ptr()) }, "Georgia");
        assert_eq!(unsafe { c_wide(std::ptr::null()) }, "");
    }

    #[test]
    fn create_font_arguments_narrow_to_the_record() {
        let spec = font_spec(-16, 0, 0, 0, 700, 1, 0, 0, 128, 0, 0, 5, 0x31);
        assert_eq!(spec.height, -16);
        assert_eq!(spec.weight, 700);
        assert_eq!(spec.italic, 1);
        assert_eq!(spec.charset, 128);
        assert_eq!(spec.quality, 5);
        assert_eq!(spec.pitch_and_family, 0x31);
    }
}

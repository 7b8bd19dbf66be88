//! GDI implementation of the native text API.

use std::ptr;

use textproxy_core::{
    AbcWidths, EnumFontsCallback, EnumeratedFont, FontHandle, GlyphFlags, GlyphFormat, GlyphMetrics,
    GlyphOutline, GlyphTransform, KerningPair, LogFont, NativeTextApi, SurfaceId, TextSize,
};
use tracing::{debug, trace};
use windows_sys::Win32::Foundation::{LPARAM, SIZE};
use windows_sys::Win32::Graphics::Gdi::{
    CreateFontIndirectW, DeleteObject, EnumFontFamiliesExW, GetCharABCWidthsFloatW, GetGlyphOutlineW,
    GetKerningPairsW, GetTextExtentPoint32W, SelectObject, TextOutW, ABCFLOAT, ENUMLOGFONTEXW, GLYPHMETRICS,
    HDC, HGDIOBJ, KERNINGPAIR, LOGFONTW, TEXTMETRICW,
};

use crate::convert;
use crate::wide::to_wide;

pub(crate) fn hdc(surface: SurfaceId) -> HDC {
    surface.0 as HDC
}

pub(crate) fn surface(hdc: HDC) -> SurfaceId {
    SurfaceId(hdc as usize)
}

pub(crate) fn gdi_object(font: FontHandle) -> HGDIOBJ {
    font.0 as HGDIOBJ
}

pub(crate) fn font_handle(object: HGDIOBJ) -> FontHandle {
    FontHandle(object as usize)
}

/// Forwards every call to gdi32. Stateless; handles carry all state.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdiTextApi;

struct EnumContext<'a, 'b> {
    callback: &'a mut EnumFontsCallback<'b, EnumeratedFont>,
}

unsafe extern "system" fn enum_fonts_proc(
    lf: *const LOGFONTW,
    tm: *const TEXTMETRICW,
    font_type: u32,
    lparam: LPARAM,
) -> i32 {
    if lf.is_null() || tm.is_null() {
        return 1;
    }
    // SAFETY: lparam is the EnumContext passed by `enumerate_fonts`, alive for
    // the whole enumeration. Font families enumerated with the Ex variant
    // always come as ENUMLOGFONTEXW.
    let context = &mut *(lparam as *mut EnumContext<'_, '_>);
    let font = convert::enumerated_font(&*(lf as *const ENUMLOGFONTEXW), &*tm, font_type);
    (context.callback)(&font)
}

impl NativeTextApi for GdiTextApi {
    fn create_font(&mut self, record: &LogFont) -> Option<FontHandle> {
        let lf = convert::log_font_to_w(record);
        // SAFETY: `lf` is a valid LOGFONTW for the duration of the call.
        let handle = unsafe { CreateFontIndirectW(&lf) };
        (!handle.is_null()).then(|| font_handle(handle))
    }

    fn select_font(&mut self, surface: SurfaceId, font: FontHandle) -> FontHandle {
        // SAFETY: both handles come from the engine or from gdi32 itself.
        font_handle(unsafe { SelectObject(hdc(surface), gdi_object(font)) })
    }

    fn delete_font(&mut self, font: FontHandle) -> bool {
        // SAFETY: as above.
        unsafe { DeleteObject(gdi_object(font)) != 0 }
    }

    fn kerning_pairs(&mut self, surface: SurfaceId) -> Vec<KerningPair> {
        let hdc = hdc(surface);
        // SAFETY: a null buffer with size 0 only asks for the pair count.
        let count = unsafe { GetKerningPairsW(hdc, 0, ptr::null_mut()) };
        if count == 0 {
            return Vec::new();
        }

        let mut pairs = vec![
            KERNINGPAIR {
                wFirst: 0,
                wSecond: 0,
                iKernAmount: 0,
            };
            count as usize
        ];
        // SAFETY: `pairs` holds `count` entries.
        let written = unsafe { GetKerningPairsW(hdc, count, pairs.as_mut_ptr()) };
        pairs.truncate(written as usize);
        debug!("Font on {:?} reports {} kerning pairs", surface, pairs.len());

        pairs
            .into_iter()
            .filter_map(|pair| {
                Some(KerningPair {
                    first: char::from_u32(u32::from(pair.wFirst))?,
                    second: char::from_u32(u32::from(pair.wSecond))?,
                    amount: pair.iKernAmount,
                })
            })
            .collect()
    }

    fn glyph_outline(
        &mut self,
        surface: SurfaceId,
        ch: char,
        format: GlyphFormat,
        flags: GlyphFlags,
        buffer: Option<&mut [u8]>,
        transform: &GlyphTransform,
    ) -> GlyphOutline {
        // SAFETY: GLYPHMETRICS is plain old data.
        let mut gm: GLYPHMETRICS = unsafe { std::mem::zeroed() };
        let mat = convert::transform_to_mat2(transform);
        let (size, data) = match buffer {
            Some(buffer) => (buffer.len() as u32, buffer.as_mut_ptr().cast()),
            None => (0, ptr::null_mut()),
        };

        // SAFETY: `data` is either null with size 0 or valid for `size` bytes.
        let status = unsafe {
            GetGlyphOutlineW(hdc(surface), ch as u32, format.to_raw() | flags.0, &mut gm, size, data, &mat)
        };
        trace!("GetGlyphOutlineW({:?}, {:?}) = {:#x}", ch, format, status);
        GlyphOutline {
            status,
            metrics: if status == textproxy_core::constants::GDI_ERROR {
                GlyphMetrics::default()
            } else {
                convert::glyph_metrics_from_native(&gm)
            },
        }
    }

    fn char_abc_widths(&mut self, surface: SurfaceId, ch: char) -> Option<AbcWidths> {
        let mut abc = ABCFLOAT {
            abcfA: 0.0,
            abcfB: 0.0,
            abcfC: 0.0,
        };
        // SAFETY: one character requested into one ABCFLOAT.
        let ok = unsafe { GetCharABCWidthsFloatW(hdc(surface), ch as u32, ch as u32, &mut abc) } != 0;
        ok.then(|| AbcWidths {
            a: f64::from(abc.abcfA),
            b: f64::from(abc.abcfB),
            c: f64::from(abc.abcfC),
        })
    }

    fn text_extent(&mut self, surface: SurfaceId, text: &str) -> Option<TextSize> {
        let wide = to_wide(text);
        let mut size = SIZE { cx: 0, cy: 0 };
        // SAFETY: `wide` is valid for `wide.len()` code units.
        let ok =
            unsafe { GetTextExtentPoint32W(hdc(surface), wide.as_ptr(), wide.len() as i32, &mut size) } != 0;
        ok.then_some(TextSize {
            cx: size.cx,
            cy: size.cy,
        })
    }

    fn text_out(&mut self, surface: SurfaceId, x: i32, y: i32, text: &str) -> bool {
        let wide = to_wide(text);
        // SAFETY: as above.
        unsafe { TextOutW(hdc(surface), x, y, wide.as_ptr(), wide.len() as i32) != 0 }
    }

    fn enumerate_fonts(
        &mut self,
        surface: SurfaceId,
        filter: Option<&LogFont>,
        callback: &mut EnumFontsCallback<'_, EnumeratedFont>,
    ) -> i32 {
        let lf = convert::log_font_to_w(&filter.cloned().unwrap_or_default());
        let mut context = EnumContext { callback };
        // SAFETY: `context` outlives the synchronous enumeration.
        unsafe {
            EnumFontFamiliesExW(
                hdc(surface),
                &lf,
                Some(enum_fonts_proc),
                &mut context as *mut EnumContext<'_, '_> as LPARAM,
                0,
            )
        }
    }
}

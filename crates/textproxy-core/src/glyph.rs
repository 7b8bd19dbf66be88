//! Glyph metrics interception: proportional advances, sub-pixel carry and
//! nudge, kerning and inline style tracking for one character at a time.

use sjis_text::PackedChar;
use tracing::{debug, trace, warn};

use crate::constants::GDI_ERROR;
use crate::font::FontDescriptor;
use crate::pen::PenState;
use crate::proxy::TextProxy;
use crate::traits::{
    AbcWidths, GlyphFlags, GlyphFormat, GlyphOutline, GlyphTransform, HostTextSource, NativeTextApi,
    SurfaceId,
};

/// Bytes per bitmap row for the formats the proxy can shift.
pub fn bitmap_row_stride(format: GlyphFormat, width: u32) -> Option<usize> {
    let width = width as usize;
    match format {
        GlyphFormat::Bitmap => Some(width.div_ceil(32) * 4),
        GlyphFormat::Gray2 | GlyphFormat::Gray4 | GlyphFormat::Gray8 => Some((width + 3) & !3),
        _ => None,
    }
}

/// Shift the ink of a glyph bitmap `dx` pixels to the right (left when
/// negative) inside its `width` x `height` box. Ink pushed out of the box is
/// dropped and vacated pixels are blank.
pub fn shift_bitmap(format: GlyphFormat, width: u32, height: u32, buffer: &mut [u8], dx: i32) {
    let Some(stride) = bitmap_row_stride(format, width) else {
        return;
    };
    if dx == 0 || stride == 0 {
        return;
    }
    let width = width as usize;
    let dx = dx as isize;
    let source_x = |x: usize| x.checked_add_signed(-dx).filter(|&from| from < width);
    let mut source = vec![0u8; stride];

    for row in buffer.chunks_exact_mut(stride).take(height as usize) {
        source.copy_from_slice(row);
        row.fill(0);
        for x in 0..width {
            let Some(from) = source_x(x) else { continue };
            match format {
                GlyphFormat::Bitmap => {
                    if source[from / 8] & (0x80 >> (from % 8)) != 0 {
                        row[x / 8] |= 0x80 >> (x % 8);
                    }
                }
                _ => row[x] = source[from],
            }
        }
    }
}

/// The character a packed engine code stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedGlyph {
    /// Character the OS is asked to render.
    query: char,
    /// Character used for widths, kerning and the pen's previous character.
    ch: char,
    /// Rendered ink is discarded.
    blank: bool,
}

impl<N: NativeTextApi, H: HostTextSource> TextProxy<N, H> {
    fn resolve_glyph(&self, packed: &PackedChar) -> ResolvedGlyph {
        if let (true, Some(byte)) = (packed.is_single_byte(), packed.lead()) {
            if self.config.space_placeholder == Some(byte) {
                return ResolvedGlyph {
                    query: self.codec.decode_char(&[byte]),
                    ch: ' ',
                    blank: true,
                };
            }
            if let Some(placeholder) = self.config.placeholders.iter().find(|p| p.byte == byte) {
                return ResolvedGlyph {
                    query: placeholder.ch,
                    ch: placeholder.ch,
                    blank: false,
                };
            }
        }
        let ch = self.codec.decode_char(packed.as_bytes());
        ResolvedGlyph {
            query: ch,
            ch,
            blank: false,
        }
    }

    /// Intercepted glyph outline query.
    ///
    /// A call with no (or an empty) buffer, or a metrics-only format, is a
    /// probe: it reports the same metrics as the real call that follows but
    /// leaves every piece of state untouched.
    pub fn glyph_outline(
        &mut self,
        surface: SurfaceId,
        packed: u32,
        format: GlyphFormat,
        flags: GlyphFlags,
        mut buffer: Option<&mut [u8]>,
        transform: &GlyphTransform,
    ) -> GlyphOutline {
        let real = format != GlyphFormat::Metrics && buffer.as_deref().is_some_and(|b| !b.is_empty());
        let glyph = self.resolve_glyph(&PackedChar::unpack(packed));

        let mut outline =
            self.native
                .glyph_outline(surface, glyph.query, format, flags, buffer.as_deref_mut(), transform);
        if outline.status == GDI_ERROR {
            debug!("Glyph query failed for {:?} on {:?}", glyph.query, surface);
            return outline;
        }

        let abc = self.native.char_abc_widths(surface, glyph.ch).unwrap_or_else(|| {
            warn!("ABC width query failed for {:?}, using cell increment", glyph.ch);
            AbcWidths {
                a: 0.0,
                b: f64::from(outline.metrics.cell_inc_x),
                c: 0.0,
            }
        });

        let new_line = self.line_changed();
        let state = self.surface_mut(surface);
        let pen = if new_line { PenState::default() } else { state.pen };
        let kern = state.kerning.get(pen.previous(), glyph.ch);
        let step = pen.step(abc.advance() + f64::from(kern), abc.a);

        if let Some(buffer) = buffer.as_deref_mut() {
            let size = (outline.status as usize).min(buffer.len());
            if glyph.blank {
                buffer[..size].fill(0);
            } else if format.is_bitmap() && step.nudge != 0 {
                let metrics = &outline.metrics;
                shift_bitmap(format, metrics.black_box_x, metrics.black_box_y, &mut buffer[..size], step.nudge);
            }
        }
        if format.is_bitmap() {
            outline.metrics.origin_x += step.nudge;
        }

        let reported = if step.advance > 0 {
            step.advance - self.config.advance_correction
        } else {
            step.advance
        };
        outline.metrics.cell_inc_x = reported.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;

        trace!(
            "{} {:?}: abc=({}, {}, {}) kern={} advance={} nudge={} carry={:.3}",
            if real { "glyph" } else { "probe" },
            glyph.ch,
            abc.a,
            abc.b,
            abc.c,
            kern,
            reported,
            step.nudge,
            step.advance_carry()
        );

        if real {
            if new_line {
                self.start_line();
            }
            self.surface_mut(surface).pen.commit(&step);
            if self.advance_line() {
                self.reselect_for_style(surface);
            }
            self.surface_mut(surface).pen.set_previous(glyph.ch);
        }

        outline
    }

    /// Select the override face in the current inline style at the height of
    /// the font bound to `surface`. Resets the surface's pen.
    pub(crate) fn reselect_for_style(&mut self, surface: SurfaceId) {
        let Some(face) = self.config.override_face.as_deref() else {
            return;
        };
        let Some(height) = self.bound_font(surface).map(|font| font.height()) else {
            debug!("Style changed on {:?} with no managed font bound", surface);
            return;
        };

        let descriptor = FontDescriptor::new(face, height, self.style.style());
        match self.cache.fetch(&mut self.native, &descriptor) {
            Ok(font) => {
                let handle = font.handle();
                debug!("Reselecting {:?} for inline style {:?}", handle, descriptor.style);
                self.select_font(surface, handle);
            }
            Err(e) => warn!("Inline style font unavailable: {}", e),
        }
    }
}

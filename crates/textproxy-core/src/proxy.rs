//! The proxy context sitting between the engine and the native text API.
//!
//! All interceptor state lives here and nowhere else: the font cache, the
//! per-surface pen and kerning state, the inline style and the read position
//! in the engine's current line. The interceptors themselves are split over
//! `font_ops`, `glyph` and `text_ops`.

use std::collections::HashMap;

use sjis_text::{LegacyCodec, Markup, MarkupRules, ShiftJisCodec, TextCursor};
use tracing::{debug, trace};

use crate::config::ProxyConfig;
use crate::font::{FontCache, ManagedFont};
use crate::kerning::KerningTable;
use crate::pen::PenState;
use crate::style::InlineStyleState;
use crate::traits::{CapturedLine, FontHandle, HostTextSource, NativeTextApi, SurfaceId};

/// Font binding, pen and kerning of one drawing surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    pub(crate) font: Option<FontHandle>,
    pub(crate) pen: PenState,
    pub(crate) kerning: KerningTable,
}

impl SurfaceState {
    /// Managed font currently bound, if any.
    pub fn font(&self) -> Option<FontHandle> {
        self.font
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn kerning(&self) -> &KerningTable {
        &self.kerning
    }
}

/// Read position in the engine's current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LineCursor {
    pub(crate) line_id: u64,
    pub(crate) offset: usize,
}

pub struct TextProxy<N: NativeTextApi, H: HostTextSource = CapturedLine> {
    pub(crate) config: ProxyConfig,
    pub(crate) codec: Box<dyn LegacyCodec + Send>,
    pub(crate) native: N,
    pub(crate) host: H,
    pub(crate) cache: FontCache,
    pub(crate) surfaces: HashMap<SurfaceId, SurfaceState>,
    pub(crate) style: InlineStyleState,
    pub(crate) line: LineCursor,
    pub(crate) markup: MarkupRules,
    pub(crate) last_face: Option<String>,
}

impl<N: NativeTextApi> TextProxy<N> {
    /// Proxy reading the engine's text from a [`CapturedLine`].
    pub fn new(native: N, config: ProxyConfig) -> Self {
        Self::with_host(native, CapturedLine::new(), config)
    }
}

impl<N: NativeTextApi, H: HostTextSource> TextProxy<N, H> {
    pub fn with_host(native: N, host: H, config: ProxyConfig) -> Self {
        debug!(
            "Creating TextProxy: override_face={:?}, advance_correction={}, kerning={}",
            config.override_face, config.advance_correction, config.kerning
        );
        let line = LineCursor {
            line_id: host.line_id(),
            offset: 0,
        };
        Self {
            markup: config.markup_rules(),
            style: InlineStyleState::new(config.underline),
            codec: Box::new(ShiftJisCodec),
            native,
            host,
            cache: FontCache::new(),
            surfaces: HashMap::new(),
            line,
            last_face: None,
            config,
        }
    }

    /// Replace the legacy codec (Shift-JIS by default).
    pub fn with_codec(mut self, codec: impl LegacyCodec + Send + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn codec(&self) -> &dyn LegacyCodec {
        self.codec.as_ref()
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn cache(&self) -> &FontCache {
        &self.cache
    }

    pub fn style(&self) -> &InlineStyleState {
        &self.style
    }

    pub fn surface(&self, surface: SurfaceId) -> Option<&SurfaceState> {
        self.surfaces.get(&surface)
    }

    /// Managed font bound to `surface`.
    pub fn bound_font(&self, surface: SurfaceId) -> Option<&ManagedFont> {
        self.surfaces
            .get(&surface)
            .and_then(|s| s.font)
            .and_then(|handle| self.cache.get(handle))
    }

    /// Face name of the most recent font request.
    pub fn last_face(&self) -> Option<&str> {
        self.last_face.as_deref()
    }

    /// Byte offset of the next unread character in the engine's line.
    pub fn line_offset(&self) -> usize {
        self.line.offset
    }

    pub(crate) fn surface_mut(&mut self, surface: SurfaceId) -> &mut SurfaceState {
        self.surfaces.entry(surface).or_default()
    }

    pub(crate) fn reset_line(&mut self) {
        self.line.offset = 0;
    }

    /// The engine moved on to a line the cursor has not started reading.
    pub(crate) fn line_changed(&self) -> bool {
        self.host.line_id() != self.line.line_id
    }

    /// Start reading the engine's new line. Every surface's pen restarts so
    /// the first glyph neither kerns against nor carries from the old line.
    pub(crate) fn start_line(&mut self) {
        let line_id = self.host.line_id();
        trace!("Host line changed {} -> {}", self.line.line_id, line_id);
        self.line = LineCursor { line_id, offset: 0 };
        for state in self.surfaces.values_mut() {
            state.pen.reset();
        }
    }

    /// Move the line cursor past the character just drawn and consume the
    /// control codes following it. Returns whether a style flag flipped.
    pub(crate) fn advance_line(&mut self) -> bool {
        if self.line_changed() {
            self.start_line();
        }

        let mut cursor = TextCursor::at(self.host.current_line(), self.line.offset);
        let style = &mut self.style;
        let mut flipped = false;
        let mut on_markup = |markup: Markup<'_>| {
            if let Markup::Style(tag) = markup {
                flipped |= style.apply(tag);
            }
        };

        cursor.skip_markup(&self.markup, &mut on_markup);
        cursor.next_char();
        cursor.skip_markup(&self.markup, &mut on_markup);
        self.line.offset = cursor.position();

        if self.config.override_face.is_none() {
            self.style.reset();
            return false;
        }
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted_backend::ScriptedTextApi;

    fn proxy_with_override() -> TextProxy<ScriptedTextApi> {
        TextProxy::new(ScriptedTextApi::new(), ProxyConfig::new().with_override_face("Georgia"))
    }

    #[test]
    fn line_cursor_consumes_trailing_markup() {
        let mut proxy = proxy_with_override();
        proxy.host_mut().set(b"a<b>b</b><br>c");

        assert!(proxy.advance_line());
        assert_eq!(proxy.line_offset(), 4);
        assert!(proxy.style().is_bold());

        assert!(proxy.advance_line());
        assert_eq!(proxy.line_offset(), 13);
        assert!(!proxy.style().is_bold());

        assert!(!proxy.advance_line());
        assert_eq!(proxy.line_offset(), 14);
    }

    #[test]
    fn new_line_restarts_the_cursor() {
        let mut proxy = proxy_with_override();
        proxy.host_mut().set(b"ab");
        proxy.advance_line();
        assert_eq!(proxy.line_offset(), 1);

        proxy.host_mut().set(&[0x82, 0xA0, b'x']);
        proxy.advance_line();
        assert_eq!(proxy.line_offset(), 2);
    }

    #[test]
    fn unknown_markup_is_drawable() {
        let mut proxy = proxy_with_override();
        proxy.host_mut().set(b"a<u>b");
        proxy.advance_line();
        assert_eq!(proxy.line_offset(), 1);
        proxy.advance_line();
        assert_eq!(proxy.line_offset(), 2);
    }

    #[test]
    fn style_is_not_tracked_without_override() {
        let mut proxy = TextProxy::new(ScriptedTextApi::new(), ProxyConfig::new());
        proxy.host_mut().set(b"a<b>b");
        assert!(!proxy.advance_line());
        assert!(!proxy.style().is_bold());
        assert_eq!(proxy.line_offset(), 4);
    }

    #[test]
    fn cursor_stops_at_end_of_line() {
        let mut proxy = proxy_with_override();
        proxy.host_mut().set(b"a");
        proxy.advance_line();
        proxy.advance_line();
        assert_eq!(proxy.line_offset(), 1);
    }
}

//! CreateFont / SelectFont / DeleteFont interception.

use tracing::{debug, trace, warn};

use crate::font::{FontDescriptor, FontSpec, LegacyLogFont, LogFont};
use crate::proxy::TextProxy;
use crate::traits::{FontHandle, HostTextSource, NativeTextApi, SurfaceId};

impl<N: NativeTextApi, H: HostTextSource> TextProxy<N, H> {
    /// Font creation from individual attributes with a legacy-encoded face.
    pub fn create_font(&mut self, spec: FontSpec, face: &[u8]) -> FontHandle {
        let record = LogFont {
            spec,
            face_name: self.codec.decode(face),
        };
        self.create_font_record(&record)
    }

    pub fn create_font_legacy(&mut self, record: &LegacyLogFont) -> FontHandle {
        let record = record.decode(self.codec.as_ref());
        self.create_font_record(&record)
    }

    /// With an override face configured the requested face, weight and slant
    /// are ignored; only the height survives, styled by the inline state.
    pub fn create_font_record(&mut self, record: &LogFont) -> FontHandle {
        self.last_face = Some(record.face_name.clone());

        let fetched = match self.config.override_face.as_deref() {
            Some(face) => {
                let descriptor = FontDescriptor::new(face, record.spec.height, self.style.style());
                trace!("Overriding {:?} with {:?}", record.face_name, descriptor);
                self.cache.fetch(&mut self.native, &descriptor)
            }
            None => self.cache.fetch_record(&mut self.native, record),
        };

        match fetched {
            Ok(font) => font.handle(),
            Err(e) => {
                warn!("CreateFont failed: {}", e);
                FontHandle::NULL
            }
        }
    }

    /// Always delegates; only managed fonts bind the surface, reset its pen
    /// and rebuild its kerning table.
    pub fn select_font(&mut self, surface: SurfaceId, font: FontHandle) -> FontHandle {
        let managed = self.cache.contains(font);
        let previous = self.native.select_font(surface, font);
        if !managed {
            return previous;
        }

        let pairs = if self.config.kerning {
            self.native.kerning_pairs(surface)
        } else {
            Vec::new()
        };
        let state = self.surfaces.entry(surface).or_default();
        state.font = Some(font);
        state.pen.reset();
        state.kerning.rebuild(pairs);
        self.style.clear_changed();

        debug!(
            "Selected managed font {:?} into {:?} ({} kerning pairs)",
            font,
            surface,
            state.kerning.len()
        );
        previous
    }

    /// Managed fonts outlive the engine's delete requests.
    pub fn delete_font(&mut self, font: FontHandle) -> bool {
        self.reset_line();
        self.style.reset();

        if self.cache.contains(font) {
            trace!("Refusing to delete managed font {:?}", font);
            return true;
        }
        self.native.delete_font(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::constants::FW_BOLD;
    use crate::scripted_backend::ScriptedTextApi;
    use sjis_text::InlineTag;

    fn spec(height: i32) -> FontSpec {
        FontSpec { height, ..FontSpec::default() }
    }

    #[test]
    fn equal_requests_share_a_handle() {
        let mut proxy = TextProxy::new(ScriptedTextApi::new(), ProxyConfig::new());
        let a = proxy.create_font(spec(20), b"Georgia");
        let b = proxy.create_font(spec(20), b"Georgia");
        let c = proxy.create_font(spec(22), b"Georgia");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(proxy.native().created_fonts().len(), 2);
        assert_eq!(proxy.last_face(), Some("Georgia"));
    }

    #[test]
    fn override_keeps_only_the_height() {
        let config = ProxyConfig::new().with_override_face("Palatino Linotype");
        let mut proxy = TextProxy::new(ScriptedTextApi::new(), config);
        proxy.style.apply(InlineTag::BoldOn);

        let requested = FontSpec {
            height: -18,
            italic: 1,
            ..FontSpec::default()
        };
        let handle = proxy.create_font(requested, &[0x82, 0x6C, 0x82, 0x72]);

        let record = proxy.native().font_record(handle).unwrap();
        assert_eq!(record.face_name, "Palatino Linotype");
        assert_eq!(record.spec.height, -18);
        assert_eq!(record.spec.weight, FW_BOLD);
        assert_eq!(record.spec.italic, 0);
        assert_eq!(proxy.last_face(), Some("\u{FF2D}\u{FF33}"));
    }

    #[test]
    fn creation_failure_yields_null_handle() {
        let mut native = ScriptedTextApi::new();
        native.fail_font_creation(true);
        let mut proxy = TextProxy::new(native, ProxyConfig::new());
        assert!(proxy.create_font(spec(12), b"Nope").is_null());
    }

    #[test]
    fn managed_selection_rebuilds_kerning_and_resets_pen() {
        let native = ScriptedTextApi::new()
            .with_kerning("Georgia", &[('A', 'V', -3), ('T', 'o', -1)])
            .with_kerning("Verdana", &[('L', 'T', -2)]);
        let mut proxy = TextProxy::new(native, ProxyConfig::new());
        let surface = SurfaceId(7);
        let georgia = proxy.create_font(spec(20), b"Georgia");
        let verdana = proxy.create_font(spec(20), b"Verdana");

        assert_eq!(proxy.select_font(surface, georgia), FontHandle::NULL);
        assert_eq!(proxy.surface(surface).unwrap().kerning().len(), 2);

        proxy.surface_mut(surface).pen.set_previous('A');
        assert_eq!(proxy.select_font(surface, verdana), georgia);
        let state = proxy.surface(surface).unwrap();
        assert_eq!(state.font(), Some(verdana));
        assert_eq!(state.pen().previous(), None);
        assert_eq!(state.kerning().get(Some('A'), 'V'), 0);
        assert_eq!(state.kerning().get(Some('L'), 'T'), -2);
    }

    #[test]
    fn foreign_selection_only_delegates() {
        let mut proxy = TextProxy::new(ScriptedTextApi::new(), ProxyConfig::new());
        let surface = SurfaceId(1);
        let managed = proxy.create_font(spec(20), b"Georgia");
        proxy.select_font(surface, managed);
        let foreign = proxy.native_mut().foreign_handle();

        assert_eq!(proxy.select_font(surface, foreign), managed);
        assert_eq!(proxy.native().selected(surface), Some(foreign));
        assert_eq!(proxy.surface(surface).unwrap().font(), Some(managed));
        assert_eq!(proxy.native().kerning_queries(), 1);
    }

    #[test]
    fn kerning_can_be_disabled() {
        let native = ScriptedTextApi::new().with_kerning("Georgia", &[('A', 'V', -3)]);
        let mut proxy = TextProxy::new(native, ProxyConfig::new().with_kerning(false));
        let handle = proxy.create_font(spec(20), b"Georgia");
        proxy.select_font(SurfaceId(1), handle);

        assert!(proxy.surface(SurfaceId(1)).unwrap().kerning().is_empty());
        assert_eq!(proxy.native().kerning_queries(), 0);
    }

    #[test]
    fn delete_refuses_managed_fonts() {
        let mut proxy = TextProxy::new(ScriptedTextApi::new(), ProxyConfig::new());
        let managed = proxy.create_font(spec(20), b"Georgia");
        let foreign = proxy.native_mut().foreign_handle();

        assert!(proxy.delete_font(managed));
        assert!(proxy.native().deleted().is_empty());

        proxy.native_mut().set_delete_result(false);
        assert!(!proxy.delete_font(foreign));
        assert_eq!(proxy.native().deleted(), &[foreign]);
    }

    #[test]
    fn delete_resets_line_and_style() {
        let config = ProxyConfig::new().with_override_face("Georgia");
        let mut proxy = TextProxy::new(ScriptedTextApi::new(), config);
        proxy.host_mut().set(b"a<b>bc");
        proxy.advance_line();
        assert!(proxy.style().is_bold());
        assert_eq!(proxy.line_offset(), 4);

        let foreign = proxy.native_mut().foreign_handle();
        proxy.delete_font(foreign);
        assert_eq!(proxy.line_offset(), 0);
        assert!(!proxy.style().is_bold());
    }
}

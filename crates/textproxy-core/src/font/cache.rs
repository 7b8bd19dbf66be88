//! Font cache owning every font the proxy hands to the engine

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ProxyError, ProxyResult};
use crate::font::{FontDescriptor, FontStyle, LogFont};
use crate::traits::{FontHandle, NativeTextApi};

/// A live native font owned by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFont {
    handle: FontHandle,
    descriptor: FontDescriptor,
}

impl ManagedFont {
    pub fn handle(&self) -> FontHandle {
        self.handle
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn face(&self) -> &str {
        &self.descriptor.face
    }

    /// Requested pixel height (the record's `height`, sign preserved).
    pub fn height(&self) -> i32 {
        self.descriptor.height
    }

    pub fn style(&self) -> FontStyle {
        self.descriptor.style
    }

    pub fn is_bold(&self) -> bool {
        self.descriptor.style.is_bold()
    }

    pub fn is_italic(&self) -> bool {
        self.descriptor.style.is_italic()
    }

    pub fn is_underline(&self) -> bool {
        self.descriptor.style.underline
    }
}

/// Deduplicating font cache.
///
/// Fonts are keyed by their full native record, so two requests that lower to
/// the same record share one native font. Fonts live as long as the cache;
/// the engine's delete requests for them are refused.
#[derive(Debug, Default)]
pub struct FontCache {
    by_record: HashMap<LogFont, FontHandle>,
    fonts: HashMap<FontHandle, ManagedFont>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch<N>(&mut self, native: &mut N, descriptor: &FontDescriptor) -> ProxyResult<&ManagedFont>
    where
        N: NativeTextApi + ?Sized,
    {
        self.fetch_record(native, &descriptor.to_log_font())
    }

    pub fn fetch_record<N>(&mut self, native: &mut N, record: &LogFont) -> ProxyResult<&ManagedFont>
    where
        N: NativeTextApi + ?Sized,
    {
        let handle = match self.by_record.get(record) {
            Some(&handle) => handle,
            None => {
                let handle = native
                    .create_font(record)
                    .filter(|h| !h.is_null())
                    .ok_or_else(|| {
                        warn!("Native font creation failed: {:?} {}px", record.face_name, record.spec.height);
                        ProxyError::FontCreationFailed {
                            face: record.face_name.clone(),
                            height: record.spec.height,
                        }
                    })?;

                debug!("Created font {:?} for {:?} {}px", handle, record.face_name, record.spec.height);
                self.by_record.insert(record.clone(), handle);
                self.fonts.insert(
                    handle,
                    ManagedFont {
                        handle,
                        descriptor: record.descriptor(),
                    },
                );
                handle
            }
        };
        Ok(&self.fonts[&handle])
    }

    pub fn get(&self, handle: FontHandle) -> Option<&ManagedFont> {
        self.fonts.get(&handle)
    }

    pub fn contains(&self, handle: FontHandle) -> bool {
        self.fonts.contains_key(&handle)
    }

    /// Get number of fonts in cache
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted_backend::ScriptedTextApi;

    #[test]
    fn equal_descriptors_share_one_font() {
        let mut native = ScriptedTextApi::new();
        let mut cache = FontCache::new();
        let descriptor = FontDescriptor::new("Georgia", 20, FontStyle::default());

        let first = cache.fetch(&mut native, &descriptor).unwrap().handle();
        let second = cache.fetch(&mut native, &descriptor.clone()).unwrap().handle();

        assert_eq!(first, second);
        assert_eq!(cache.font_count(), 1);
        assert_eq!(native.created_fonts().len(), 1);
    }

    #[test]
    fn different_styles_get_different_fonts() {
        let mut native = ScriptedTextApi::new();
        let mut cache = FontCache::new();
        let regular = FontDescriptor::new("Georgia", 20, FontStyle::default());
        let bold = FontDescriptor::new("Georgia", 20, FontStyle::new(true, false, false));

        let a = cache.fetch(&mut native, &regular).unwrap().handle();
        let b = cache.fetch(&mut native, &bold).unwrap().handle();

        assert_ne!(a, b);
        assert!(cache.get(b).unwrap().is_bold());
        assert!(!cache.get(a).unwrap().is_bold());
    }

    #[test]
    fn creation_failure_is_not_cached() {
        let mut native = ScriptedTextApi::new();
        native.fail_font_creation(true);
        let mut cache = FontCache::new();
        let descriptor = FontDescriptor::new("Missing", 12, FontStyle::default());

        let err = cache.fetch(&mut native, &descriptor).unwrap_err();
        assert!(matches!(err, ProxyError::FontCreationFailed { height: 12, .. }));
        assert_eq!(cache.font_count(), 0);

        native.fail_font_creation(false);
        assert!(cache.fetch(&mut native, &descriptor).is_ok());
    }

    #[test]
    fn record_fetch_matches_descriptor_fetch() {
        let mut native = ScriptedTextApi::new();
        let mut cache = FontCache::new();
        let descriptor = FontDescriptor::new("MS Gothic", -18, FontStyle::default());

        let by_descriptor = cache.fetch(&mut native, &descriptor).unwrap().handle();
        let by_record = cache.fetch_record(&mut native, &descriptor.to_log_font()).unwrap().handle();
        assert_eq!(by_descriptor, by_record);
    }
}

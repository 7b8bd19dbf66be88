//! Font descriptions and the managed font cache.

pub mod cache;

pub use cache::{FontCache, ManagedFont};

use sjis_text::LegacyCodec;

use crate::constants::{
    CLIP_DEFAULT_PRECIS, DEFAULT_CHARSET, DEFAULT_PITCH, DEFAULT_QUALITY, FW_BOLD, FW_NORMAL,
    OUT_DEFAULT_PRECIS,
};

/// Font weight variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn from_weight(weight: i32) -> Self {
        if weight >= FW_BOLD {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }

    pub fn native(self) -> i32 {
        match self {
            FontWeight::Normal => FW_NORMAL,
            FontWeight::Bold => FW_BOLD,
        }
    }
}

/// Font slant variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
}

/// Bold/italic/underline combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub underline: bool,
}

impl FontStyle {
    pub fn new(bold: bool, italic: bool, underline: bool) -> Self {
        Self {
            weight: if bold { FontWeight::Bold } else { FontWeight::Normal },
            slant: if italic { FontSlant::Italic } else { FontSlant::Normal },
            underline,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.slant == FontSlant::Italic
    }
}

/// Face, pixel height and style. Equal descriptors resolve to the same
/// managed font.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    pub face: String,
    pub height: i32,
    pub style: FontStyle,
}

impl FontDescriptor {
    pub fn new(face: &str, height: i32, style: FontStyle) -> Self {
        Self {
            face: face.to_string(),
            height,
            style,
        }
    }

    /// Native record for this descriptor, every other field at its default.
    pub fn to_log_font(&self) -> LogFont {
        LogFont {
            spec: FontSpec {
                height: self.height,
                weight: self.style.weight.native(),
                italic: u8::from(self.style.is_italic()),
                underline: u8::from(self.style.underline),
                ..FontSpec::default()
            },
            face_name: self.face.clone(),
        }
    }
}

/// Numeric part of a native font record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub height: i32,
    pub width: i32,
    pub escapement: i32,
    pub orientation: i32,
    pub weight: i32,
    pub italic: u8,
    pub underline: u8,
    pub strike_out: u8,
    pub charset: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            height: 0,
            width: 0,
            escapement: 0,
            orientation: 0,
            weight: FW_NORMAL,
            italic: 0,
            underline: 0,
            strike_out: 0,
            charset: DEFAULT_CHARSET,
            out_precision: OUT_DEFAULT_PRECIS,
            clip_precision: CLIP_DEFAULT_PRECIS,
            quality: DEFAULT_QUALITY,
            pitch_and_family: DEFAULT_PITCH,
        }
    }
}

/// Full native font record with a decoded face name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LogFont {
    pub spec: FontSpec,
    pub face_name: String,
}

impl LogFont {
    pub fn new(spec: FontSpec, face_name: &str) -> Self {
        Self {
            spec,
            face_name: face_name.to_string(),
        }
    }

    pub fn descriptor(&self) -> FontDescriptor {
        FontDescriptor {
            face: self.face_name.clone(),
            height: self.spec.height,
            style: FontStyle::new(
                FontWeight::from_weight(self.spec.weight) == FontWeight::Bold,
                self.spec.italic != 0,
                self.spec.underline != 0,
            ),
        }
    }
}

/// A font record as the engine passes it, face name still legacy-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyLogFont {
    pub spec: FontSpec,
    pub face_name: Vec<u8>,
}

impl LegacyLogFont {
    pub fn decode(&self, codec: &dyn LegacyCodec) -> LogFont {
        LogFont {
            spec: self.spec,
            face_name: codec.decode(&self.face_name),
        }
    }
}

impl LogFont {
    pub fn encode(&self, codec: &dyn LegacyCodec) -> LegacyLogFont {
        LegacyLogFont {
            spec: self.spec,
            face_name: codec.encode(&self.face_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_lowers_to_default_record() {
        let descriptor = FontDescriptor::new("Georgia", 24, FontStyle::new(true, true, false));
        let record = descriptor.to_log_font();
        assert_eq!(record.face_name, "Georgia");
        assert_eq!(record.spec.height, 24);
        assert_eq!(record.spec.weight, FW_BOLD);
        assert_eq!(record.spec.italic, 1);
        assert_eq!(record.spec.underline, 0);
        assert_eq!(record.spec.charset, DEFAULT_CHARSET);
        assert_eq!(record.descriptor(), descriptor);
    }

    #[test]
    fn legacy_face_names_are_decoded() {
        let codec = sjis_text::ShiftJisCodec;
        // "ＭＳ ゴシック"
        let legacy = LegacyLogFont {
            spec: FontSpec { height: -16, ..FontSpec::default() },
            face_name: vec![0x82, 0x6C, 0x82, 0x72, 0x20, 0x83, 0x53, 0x83, 0x56, 0x83, 0x62, 0x83, 0x4E],
        };
        let record = legacy.decode(&codec);
        assert_eq!(record.face_name, "\u{FF2D}\u{FF33} \u{30B4}\u{30B7}\u{30C3}\u{30AF}");
        assert_eq!(record.spec.height, -16);
        assert_eq!(record.encode(&codec), legacy);
    }

    #[test]
    fn semi_bold_weights_are_not_bold() {
        assert_eq!(FontWeight::from_weight(600), FontWeight::Normal);
        assert_eq!(FontWeight::from_weight(800), FontWeight::Bold);
    }
}

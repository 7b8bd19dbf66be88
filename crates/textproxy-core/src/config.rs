// src/config.rs
use std::path::Path;

use serde::Deserialize;
use sjis_text::MarkupRules;

use crate::constants::{
    DEFAULT_ADVANCE_CORRECTION, DEFAULT_FALLBACK_FACE, DEFAULT_FALLBACK_HEIGHT,
    DEFAULT_HOST_CONTROL_CODES, DEFAULT_PLACEHOLDERS, DEFAULT_SPACE_PLACEHOLDER,
};
use crate::error::{ProxyError, ProxyResult};

/// A single-byte stand-in the script packer writes for a character the engine
/// cannot display through its normal code path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Placeholder {
    pub byte: u8,
    pub ch: char,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Face forced for all text; inline `<b>`/`<i>` drive its style.
    pub override_face: Option<String>,
    /// Pixels the engine adds after every glyph on its own.
    pub advance_correction: i32,
    /// Byte standing in for a space, which the engine would otherwise advance
    /// by a hardcoded width.
    pub space_placeholder: Option<u8>,
    pub placeholders: Vec<Placeholder>,
    /// Control codes the engine interprets itself, skipped during lookahead.
    pub host_control_codes: Vec<String>,
    /// Font selected when the engine draws on a surface with no font bound.
    pub fallback_face: String,
    pub fallback_height: i32,
    /// Underline flag used for override fonts.
    pub underline: bool,
    pub kerning: bool,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            override_face: None,
            advance_correction: DEFAULT_ADVANCE_CORRECTION,
            space_placeholder: Some(DEFAULT_SPACE_PLACEHOLDER),
            placeholders: DEFAULT_PLACEHOLDERS
                .iter()
                .map(|&(byte, ch)| Placeholder { byte, ch })
                .collect(),
            host_control_codes: DEFAULT_HOST_CONTROL_CODES.iter().map(|s| s.to_string()).collect(),
            fallback_face: DEFAULT_FALLBACK_FACE.to_string(),
            fallback_height: DEFAULT_FALLBACK_HEIGHT,
            underline: false,
            kerning: true,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl ProxyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> ProxyResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> ProxyResult<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ProxyError::ConfigRead { path: path.display().to_string(), source }),
        }
    }

    fn validate(&self) -> ProxyResult<()> {
        if matches!(self.override_face.as_deref(), Some("")) {
            return Err(ProxyError::ConfigurationError {
                field: "override_face".to_string(),
                value: "\"\"".to_string(),
            });
        }
        if self.fallback_height == 0 {
            return Err(ProxyError::ConfigurationError {
                field: "fallback_height".to_string(),
                value: self.fallback_height.to_string(),
            });
        }
        Ok(())
    }

    pub fn with_override_face(mut self, face: &str) -> Self {
        self.override_face = Some(face.to_string());
        self
    }

    pub fn with_advance_correction(mut self, pixels: i32) -> Self {
        self.advance_correction = pixels;
        self
    }

    pub fn with_space_placeholder(mut self, byte: Option<u8>) -> Self {
        self.space_placeholder = byte;
        self
    }

    pub fn with_placeholder(mut self, byte: u8, ch: char) -> Self {
        self.placeholders.retain(|p| p.byte != byte);
        self.placeholders.push(Placeholder { byte, ch });
        self
    }

    pub fn with_kerning(mut self, enabled: bool) -> Self {
        self.kerning = enabled;
        self
    }

    pub fn with_underline(mut self, enabled: bool) -> Self {
        self.underline = enabled;
        self
    }

    pub fn markup_rules(&self) -> MarkupRules {
        MarkupRules::new(self.host_control_codes.iter().map(String::as_bytes))
    }
}

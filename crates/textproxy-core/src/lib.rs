//! textproxy-core - platform-agnostic proportional text proxy
//!
//! Sits between a legacy engine that lays text out one character at a time
//! and the native text API. Restores proportional advances, kerning and
//! inline `<b>`/`<i>` styling while staying transparent to the engine.
//! The native API is reached only through [`NativeTextApi`].

pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod font_ops;
pub mod glyph;
pub mod kerning;
pub mod pen;
pub mod proxy;
#[cfg(any(test, feature = "scripted-backend"))]
pub mod scripted_backend;
pub mod style;
pub mod text_ops;
pub mod traits;

// Re-export main types
pub use config::{LogLevel, Placeholder, ProxyConfig};
pub use error::{ProxyError, ProxyResult};
pub use font::{FontCache, FontDescriptor, FontSpec, FontStyle, LegacyLogFont, LogFont, ManagedFont};
pub use kerning::KerningTable;
pub use pen::{PenState, PenStep};
pub use proxy::{SurfaceState, TextProxy};
pub use style::InlineStyleState;
pub use text_ops::{narrow_text_metric, LegacyEnumeratedFont};

// Re-export traits and types
pub use traits::*;

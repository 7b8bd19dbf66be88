//! # sjis-text
//!
//! Shift-JIS helpers for legacy engine text: a total codec, a read-only cursor
//! that walks 1-2 byte characters, and the inline `<...>` control code rules
//! embedded in script text.

pub mod codec;
pub mod cursor;
pub mod markup;

pub use codec::{LegacyCodec, PackedChar, ShiftJisCodec};
pub use cursor::{is_lead_byte, TextCursor};
pub use markup::{InlineTag, Markup, MarkupRules};

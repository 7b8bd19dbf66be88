// src/constants.rs

/// The engine adds one pixel after every glyph beyond the font's advance.
pub const DEFAULT_ADVANCE_CORRECTION: i32 = 1;

/// The script packer writes spaces as `|` because the engine hardcodes the
/// advance of a real space.
pub const DEFAULT_SPACE_PLACEHOLDER: u8 = b'|';

/// Half-width katakana bytes the script packer uses for characters that do not
/// survive the engine's normal Shift-JIS path.
pub const DEFAULT_PLACEHOLDERS: &[(u8, char)] = &[
    (0xB1, '%'),
    (0xAB, '\u{201C}'),
    (0xBB, '\u{201D}'),
    (0xA8, '\u{2018}'),
    (0xB4, '\u{2019}'),
    (0xB2, '\u{00E9}'),
];

pub const DEFAULT_HOST_CONTROL_CODES: &[&str] = &["br"];

pub const DEFAULT_FALLBACK_FACE: &str = "System";
pub const DEFAULT_FALLBACK_HEIGHT: i32 = 12;

// Native font record defaults
pub const FW_NORMAL: i32 = 400;
pub const FW_BOLD: i32 = 700;
pub const DEFAULT_CHARSET: u8 = 1;
pub const OUT_DEFAULT_PRECIS: u8 = 0;
pub const CLIP_DEFAULT_PRECIS: u8 = 0;
pub const DEFAULT_QUALITY: u8 = 0;
pub const DEFAULT_PITCH: u8 = 0;

/// Failure sentinel of the glyph outline query.
pub const GDI_ERROR: u32 = u32::MAX;

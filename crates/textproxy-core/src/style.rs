//! Style flags toggled by inline control codes in the engine's text.

use sjis_text::InlineTag;

use crate::font::FontStyle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyleState {
    bold: bool,
    italic: bool,
    underline: bool,
    /// Set when a flag flipped since the last font selection.
    changed: bool,
}

impl InlineStyleState {
    pub fn new(underline: bool) -> Self {
        Self {
            underline,
            ..Self::default()
        }
    }

    /// Apply one tag. Returns `true` only when a flag actually flipped; a tag
    /// that restates the current style is a no-op.
    pub fn apply(&mut self, tag: InlineTag) -> bool {
        let (flag, value) = match tag {
            InlineTag::BoldOn => (&mut self.bold, true),
            InlineTag::BoldOff => (&mut self.bold, false),
            InlineTag::ItalicOn => (&mut self.italic, true),
            InlineTag::ItalicOff => (&mut self.italic, false),
        };
        if *flag == value {
            return false;
        }
        *flag = value;
        self.changed = true;
        true
    }

    pub fn style(&self) -> FontStyle {
        FontStyle::new(self.bold, self.italic, self.underline)
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    /// Back to upright regular, keeping the configured underline.
    pub fn reset(&mut self) {
        *self = Self::new(self.underline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_tags_do_not_report_changes() {
        let mut state = InlineStyleState::default();
        assert!(state.apply(InlineTag::BoldOn));
        assert!(!state.apply(InlineTag::BoldOn));
        assert!(state.is_bold());
        assert!(state.apply(InlineTag::BoldOff));
        assert!(!state.apply(InlineTag::ItalicOff));
    }

    #[test]
    fn changed_marker_survives_until_cleared() {
        let mut state = InlineStyleState::default();
        state.apply(InlineTag::ItalicOn);
        assert!(state.changed());
        state.clear_changed();
        assert!(!state.changed());
        assert!(state.is_italic());
    }

    #[test]
    fn reset_keeps_configured_underline() {
        let mut state = InlineStyleState::new(true);
        state.apply(InlineTag::BoldOn);
        state.reset();
        assert_eq!(state.style(), FontStyle::new(false, false, true));
        assert!(!state.changed());
    }
}

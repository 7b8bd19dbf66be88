//! Inline control codes embedded in engine text (`<b>`, `</i>`, `<br>`, ...).

/// Style toggles the proxy acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineTag {
    BoldOn,
    BoldOff,
    ItalicOn,
    ItalicOff,
}

impl InlineTag {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"b" => Some(InlineTag::BoldOn),
            b"/b" => Some(InlineTag::BoldOff),
            b"i" => Some(InlineTag::ItalicOn),
            b"/i" => Some(InlineTag::ItalicOff),
            _ => None,
        }
    }
}

/// A recognized control code at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup<'a> {
    Style(InlineTag),
    /// A control code the engine handles itself; skipped without effect.
    Control(&'a [u8]),
}

/// Which `<...>` sequences count as control codes.
///
/// Anything not recognized here is left in place as drawable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRules {
    controls: Vec<Vec<u8>>,
}

impl Default for MarkupRules {
    fn default() -> Self {
        Self::new(["br"])
    }
}

impl MarkupRules {
    pub fn new<I, S>(controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            controls: controls.into_iter().map(|s| s.as_ref().to_vec()).collect(),
        }
    }

    /// Only the style tags; every other sequence is drawable.
    pub fn style_only() -> Self {
        Self { controls: Vec::new() }
    }

    /// Classify the markup starting at `bytes[0]`, returning it with its total
    /// length in bytes including both delimiters.
    pub fn classify<'a>(&self, bytes: &'a [u8]) -> Option<(Markup<'a>, usize)> {
        if bytes.first() != Some(&b'<') {
            return None;
        }
        // Shift-JIS trail bytes start at 0x40, so a '>' byte is always a delimiter.
        let close = memchr::memchr(b'>', bytes)?;
        let name = &bytes[1..close];
        let markup = match InlineTag::from_name(name) {
            Some(tag) => Markup::Style(tag),
            None if self.controls.iter().any(|c| c.as_slice() == name) => Markup::Control(name),
            None => return None,
        };
        Some((markup, close + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_style_tags() {
        let rules = MarkupRules::default();
        assert_eq!(rules.classify(b"<b>x"), Some((Markup::Style(InlineTag::BoldOn), 3)));
        assert_eq!(rules.classify(b"</b>"), Some((Markup::Style(InlineTag::BoldOff), 4)));
        assert_eq!(rules.classify(b"<i>"), Some((Markup::Style(InlineTag::ItalicOn), 3)));
        assert_eq!(rules.classify(b"</i>"), Some((Markup::Style(InlineTag::ItalicOff), 4)));
    }

    #[test]
    fn host_controls_are_recognized_but_inert() {
        let rules = MarkupRules::default();
        assert_eq!(rules.classify(b"<br>abc"), Some((Markup::Control(b"br"), 4)));
        assert_eq!(MarkupRules::style_only().classify(b"<br>"), None);
    }

    #[test]
    fn unknown_or_unterminated_sequences_are_text() {
        let rules = MarkupRules::default();
        assert_eq!(rules.classify(b"<3 you>"), None);
        assert_eq!(rules.classify(b"<b"), None);
        assert_eq!(rules.classify(b"b>"), None);
        assert_eq!(rules.classify(b"<<b>"), None);
    }
}

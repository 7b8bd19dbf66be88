//! Read-only cursor over the engine's current text line.
//!
//! The engine owns the buffer; the cursor only walks it. A NUL byte or the end
//! of the slice is an unconditional stop.

use crate::markup::{Markup, MarkupRules};

/// Lead bytes of a two byte character.
pub fn is_lead_byte(b: u8) -> bool {
    matches!(b, 0x81..=0x9F | 0xE0..=0xEF)
}

#[derive(Debug, Clone, Copy)]
pub struct TextCursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> TextCursor<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self::at(text, 0)
    }

    /// Cursor at byte offset `pos`, clamped to the terminator.
    pub fn at(text: &'a [u8], pos: usize) -> Self {
        let end = memchr::memchr(0, text).unwrap_or(text.len());
        let text = &text[..end];
        Self { text, pos: pos.min(text.len()) }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.text[self.pos..]
    }

    /// Byte length of the character at the cursor; 0 at the end.
    pub fn char_len(&self) -> usize {
        match self.remaining() {
            [] => 0,
            [lead, _, ..] if is_lead_byte(*lead) => 2,
            _ => 1,
        }
    }

    pub fn peek_char(&self) -> Option<&'a [u8]> {
        let len = self.char_len();
        (len > 0).then(|| &self.remaining()[..len])
    }

    pub fn next_char(&mut self) -> Option<&'a [u8]> {
        let ch = self.peek_char()?;
        self.pos += ch.len();
        Some(ch)
    }

    /// Consume one recognized control code at the cursor.
    pub fn take_markup(&mut self, rules: &MarkupRules) -> Option<Markup<'a>> {
        let (markup, len) = rules.classify(self.remaining())?;
        self.pos += len;
        Some(markup)
    }

    /// Consume every consecutive control code at the cursor, reporting each one.
    pub fn skip_markup(&mut self, rules: &MarkupRules, mut on_markup: impl FnMut(Markup<'a>)) -> usize {
        let mut count = 0;
        while let Some(markup) = self.take_markup(rules) {
            on_markup(markup);
            count += 1;
        }
        count
    }

    /// Next drawable character, looking past any control codes.
    pub fn peek_drawable(&self, rules: &MarkupRules) -> Option<&'a [u8]> {
        let mut ahead = *self;
        ahead.skip_markup(rules, |_| {});
        ahead.peek_char()
    }
}

impl<'a> Iterator for TextCursor<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.next_char()
    }
}

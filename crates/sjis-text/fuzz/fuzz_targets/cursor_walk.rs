#![no_main]
use libfuzzer_sys::fuzz_target;
use sjis_text::{MarkupRules, TextCursor};

fuzz_target!(|data: &[u8]| {
    let rules = MarkupRules::default();
    let mut cursor = TextCursor::new(data);

    while !cursor.is_at_end() {
        let before = cursor.position();
        let _ = cursor.peek_drawable(&rules);
        cursor.skip_markup(&rules, |_| {});
        cursor.next_char();
        assert!(cursor.position() > before || cursor.is_at_end());
    }
    assert!(cursor.position() <= data.len());
});

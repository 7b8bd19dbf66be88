#![no_main]
use libfuzzer_sys::fuzz_target;
use sjis_text::{LegacyCodec, ShiftJisCodec};

fuzz_target!(|data: &[u8]| {
    let codec = ShiftJisCodec;
    let text = codec.decode(data);
    if text.contains('\u{FFFD}') {
        return;
    }
    // Anything decoded cleanly must encode back to a stable byte sequence.
    let bytes = codec.encode(&text);
    assert_eq!(codec.encode(&codec.decode(&bytes)), bytes);
});

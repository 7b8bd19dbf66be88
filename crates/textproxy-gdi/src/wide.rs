//! Fixed-size, NUL-terminated string fields of native records.

/// Decode a UTF-16 field up to its first NUL.
pub fn from_wide(field: &[u16]) -> String {
    let end = field.iter().position(|&c| c == 0).unwrap_or(field.len());
    String::from_utf16_lossy(&field[..end])
}

pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Bytes of a narrow field up to its first NUL.
pub fn narrow_field<T: Copy + Into<i16>>(field: &[T]) -> Vec<u8> {
    field
        .iter()
        .map(|&c| c.into() as u8)
        .take_while(|&b| b != 0)
        .collect()
}

/// Fill `dst` from `src`, truncating so a terminating NUL always fits.
pub fn copy_nul_terminated<T: Copy + Default>(dst: &mut [T], src: impl IntoIterator<Item = T>) {
    let Some(capacity) = dst.len().checked_sub(1) else {
        return;
    };
    let mut written = 0;
    for (slot, value) in dst[..capacity].iter_mut().zip(src) {
        *slot = value;
        written += 1;
    }
    dst[written..].fill(T::default());
}

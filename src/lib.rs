//! vntextproxy - proportional text for legacy visual novel engines
//!
//! This crate bundles the text proxy into a DLL with:
//! - kerning and sub-pixel positioning for per-character GDI layout
//! - inline `<b>`/`<i>` styling with an override face
//! - Shift-JIS text handling
//!
//! On Windows it exports the runtime entry points a hook installer calls.

pub use sjis_text;
pub use textproxy_core::*;

#[cfg(windows)]
pub use textproxy_gdi::{hooks, runtime};

#[cfg(windows)]
mod exports {
    use std::ffi::{c_char, CStr};

    use textproxy_gdi::{hooks, runtime};
    use tracing::{error, trace};

    /// Load `vntextproxy.toml` and start the proxy. Returns 0 on success.
    #[no_mangle]
    pub extern "system" fn vntextproxy_init() -> i32 {
        match runtime::init() {
            Ok(()) => 0,
            Err(e) => {
                error!("Text proxy initialisation failed: {:#}", e);
                -1
            }
        }
    }

    #[no_mangle]
    pub extern "system" fn vntextproxy_shutdown() {
        runtime::shutdown();
    }

    /// Hand the proxy the engine's current line (NUL-terminated legacy bytes).
    ///
    /// # Safety
    /// `text` must be null or point to a NUL-terminated string.
    #[no_mangle]
    pub unsafe extern "system" fn vntextproxy_set_line(text: *const c_char) {
        if text.is_null() {
            return;
        }
        let bytes = CStr::from_ptr(text).to_bytes();
        if let Err(e) = runtime::set_host_line(bytes) {
            trace!("Host line dropped: {}", e);
        }
    }

    /// Address of the hook replacing the gdi32 export `name`, or 0.
    ///
    /// # Safety
    /// `name` must be null or point to a NUL-terminated string.
    #[no_mangle]
    pub unsafe extern "system" fn vntextproxy_hook_address(name: *const c_char) -> usize {
        if name.is_null() {
            return 0;
        }
        CStr::from_ptr(name)
            .to_str()
            .ok()
            .and_then(hooks::hook_address)
            .unwrap_or(0)
    }
}

//! textproxy-gdi - Windows GDI backend for textproxy-core
//!
//! Provides the gdi32 implementation of [`NativeTextApi`], the narrow
//! `extern "system"` hooks an installer patches into the engine, and the
//! process-wide runtime they share.

#[cfg(windows)]
mod backend;
#[cfg(windows)]
mod convert;
#[cfg(windows)]
pub mod hooks;
pub mod logging;
#[cfg(windows)]
pub mod runtime;
#[cfg_attr(not(windows), allow(dead_code))]
mod wide;

#[cfg(windows)]
pub use backend::GdiTextApi;

// Re-export textproxy-core types for convenience
pub use textproxy_core::*;

//! Process-wide proxy instance shared by the hook entry points.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use textproxy_core::{CapturedLine, ProxyConfig, ProxyError, ProxyResult, TextProxy};
use tracing::info;

use crate::backend::GdiTextApi;
use crate::logging;

pub const CONFIG_FILE_NAME: &str = "vntextproxy.toml";

type GdiProxy = TextProxy<GdiTextApi, CapturedLine>;

static PROXY: Mutex<Option<GdiProxy>> = Mutex::new(None);

/// `vntextproxy.toml` next to the host executable.
pub fn config_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locating host executable")?;
    Ok(exe.with_file_name(CONFIG_FILE_NAME))
}

/// Load the configuration, install logging and create the proxy. Calling it
/// again replaces the proxy and its state.
pub fn init() -> anyhow::Result<()> {
    let path = config_path()?;
    let config = ProxyConfig::load(&path).with_context(|| format!("loading {}", path.display()))?;
    logging::init(&config)?;
    info!(
        "Text proxy starting: config={}, override_face={:?}",
        path.display(),
        config.override_face
    );

    let mut guard = PROXY.lock().map_err(|e| ProxyError::StateLockError { message: e.to_string() })?;
    *guard = Some(TextProxy::new(GdiTextApi, config));
    Ok(())
}

pub fn shutdown() {
    if let Ok(mut guard) = PROXY.lock() {
        guard.take();
    }
}

/// Run `f` on the proxy. Fails when the runtime is not initialised, in which
/// case hooks fall back to plain gdi32.
pub fn with_proxy<R>(f: impl FnOnce(&mut GdiProxy) -> R) -> ProxyResult<R> {
    let mut guard = PROXY.lock().map_err(|e| ProxyError::StateLockError { message: e.to_string() })?;
    let proxy = guard.as_mut().ok_or(ProxyError::NotInitialized)?;
    Ok(f(proxy))
}

/// Record the line the engine is about to lay out.
pub fn set_host_line(bytes: &[u8]) -> ProxyResult<()> {
    with_proxy(|proxy| proxy.host_mut().set(bytes))
}

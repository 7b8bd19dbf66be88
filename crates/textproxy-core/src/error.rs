// src/error.rs
use thiserror::Error;

/// Failure modes inside the proxy.
///
/// None of these reach the engine: intercepted entry points log them and
/// answer with the native failure value (null handle, `false`, `GDI_ERROR`).
#[derive(Error, Debug)]
pub enum ProxyError {
    // Configuration
    #[error("Invalid configuration: {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {field} = {value}")]
    ConfigurationError { field: String, value: String },

    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead { path: String, source: std::io::Error },

    // Fonts
    #[error("Native font creation failed for face {face:?} at height {height}")]
    FontCreationFailed { face: String, height: i32 },


    // Runtime
    #[error("Proxy runtime not initialized")]
    NotInitialized,

    #[error("Proxy state lock poisoned: {message}")]
    StateLockError { message: String },
}

pub type ProxyResult<T> = Result<T, ProxyError>;

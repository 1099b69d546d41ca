//! Error types for browser-side canvas operations
//!
//! JS interop failures are captured as strings (the `JsValue` debug output) so
//! the errors stay `Clone` and can be logged from anywhere.

use thiserror::Error;

/// Errors raised while preparing or painting the canvas
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    #[error("window is not available")]
    WindowNotAvailable,

    #[error("document is not available")]
    DocumentNotAvailable,

    #[error("canvas element is not mounted")]
    NotMounted,

    #[error("canvas 2D context is not available: {0}")]
    ContextUnavailable(String),

    #[error("invalid device pixel ratio: {0}")]
    InvalidPixelRatio(f64),

    #[error("invalid surface size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("canvas draw call failed: {0}")]
    Draw(String),
}

impl CanvasError {
    /// Wrap a failed draw call.
    pub fn draw(err: &wasm_bindgen::JsValue) -> Self {
        Self::Draw(format!("{err:?}"))
    }
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;

//! Canvas 2D rendering context acquisition
//!
//! All JS interop operations return Results for proper error handling.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{CanvasError, Result};

/// Get 2D rendering context from canvas element
///
/// # Errors
///
/// Returns an error if:
/// - Getting context from canvas fails (JS error)
/// - Context creation returns None (browser doesn't support 2D context)
/// - Type casting to `CanvasRenderingContext2d` fails
pub fn get_2d_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| CanvasError::ContextUnavailable(format!("{e:?}")))?
        .ok_or_else(|| CanvasError::ContextUnavailable("context creation returned None".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CanvasError::ContextUnavailable("not a CanvasRenderingContext2d".to_string()))
}

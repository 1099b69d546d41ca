//! Surface size tracking
//!
//! The canvas fills the viewport. Its CSS size is the larger of the document
//! client size and the window inner size, measured on mount and on every
//! window `resize` event.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::window;

use crate::error::{CanvasError, Result};

/// Picks the surface size from the two browser measurements.
///
/// # Errors
///
/// Returns an error if the resulting size is not positive.
///
/// # Example
///
/// ```
/// use arbor_ui::components::canvas::resize::pick_surface_size;
///
/// assert_eq!(pick_surface_size((1280.0, 0.0), (1264.0, 720.0))?, (1280.0, 720.0));
/// # Ok::<(), arbor_ui::error::CanvasError>(())
/// ```
pub fn pick_surface_size(client: (f64, f64), inner: (f64, f64)) -> Result<(f64, f64)> {
    let width = client.0.max(inner.0);
    let height = client.1.max(inner.1);
    if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
        return Err(CanvasError::InvalidSize { width, height });
    }
    Ok((width, height))
}

/// Current surface size in CSS pixels
///
/// # Errors
///
/// Returns an error if the window or document is missing, or the measured
/// size is empty.
pub fn measure_surface() -> Result<(f64, f64)> {
    let window = window().ok_or(CanvasError::WindowNotAvailable)?;
    let root = window
        .document()
        .and_then(|d| d.document_element())
        .ok_or(CanvasError::DocumentNotAvailable)?;

    let inner_width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let inner_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    pick_surface_size(
        (f64::from(root.client_width()), f64::from(root.client_height())),
        (inner_width, inner_height),
    )
}

/// Handle for managing resize event listener cleanup
pub struct ResizeHandler {
    closure: Closure<dyn FnMut()>,
}

impl ResizeHandler {
    /// Remove the resize event listener from the window
    ///
    /// # Errors
    ///
    /// Returns an error if the window is missing or removal fails.
    pub fn remove(self) -> Result<()> {
        let window = window().ok_or(CanvasError::WindowNotAvailable)?;
        window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref())
            .map_err(|e| CanvasError::draw(&e))
    }

    /// Keeps the listener for the rest of the page's life.
    pub fn forget(self) {
        self.closure.forget();
    }
}

/// Calls `on_resize` with the new surface size on every window resize.
///
/// # Errors
///
/// Returns an error if the window is missing or the listener cannot be added.
pub fn attach_resize_listener<F>(on_resize: F) -> Result<ResizeHandler>
where
    F: Fn(f64, f64) + 'static,
{
    let window = window().ok_or(CanvasError::WindowNotAvailable)?;
    let closure = Closure::wrap(Box::new(move || match measure_surface() {
        Ok((width, height)) => on_resize(width, height),
        Err(error) => tracing::debug!(%error, "Resize ignored"),
    }) as Box<dyn FnMut()>);

    window
        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .map_err(|e| CanvasError::draw(&e))?;

    Ok(ResizeHandler { closure })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_surface_size_takes_larger() {
        assert_eq!(
            pick_surface_size((800.0, 650.0), (820.0, 600.0)),
            Ok((820.0, 650.0))
        );
    }

    #[test]
    fn test_pick_surface_size_rejects_empty() {
        assert!(pick_surface_size((0.0, 0.0), (0.0, 600.0)).is_err());
        assert!(pick_surface_size((f64::NAN, 10.0), (f64::NAN, 10.0)).is_err());
    }
}

//! HiDPI/Retina display scaling for crisp canvas rendering
//!
//! The canvas backing store is sized in device pixels while layout and the
//! viewport engine work in CSS pixels. Every paint starts from a base
//! transform of `scale(dpr)`.

use web_sys::{HtmlCanvasElement, window};

use crate::error::{CanvasError, Result};

/// Validates a device pixel ratio.
///
/// # Errors
///
/// Returns an error if the ratio is not a positive finite number.
pub fn validate_pixel_ratio(dpr: f64) -> Result<f64> {
    if !dpr.is_finite() || dpr <= 0.0 {
        return Err(CanvasError::InvalidPixelRatio(dpr));
    }
    Ok(dpr)
}

/// Detects the device pixel ratio from the browser window
///
/// # Errors
///
/// Returns an error if no window is available or the ratio is invalid.
pub fn detect_device_pixel_ratio() -> Result<f64> {
    let window = window().ok_or(CanvasError::WindowNotAvailable)?;
    validate_pixel_ratio(window.device_pixel_ratio())
}

/// Backing store size in device pixels for a CSS size.
///
/// # Errors
///
/// Returns an error if the CSS size is not positive and finite, or the
/// physical size does not fit in `u32`.
///
/// # Example
///
/// ```
/// use arbor_ui::components::canvas::dpi::backing_store_size;
///
/// assert_eq!(backing_store_size(1200.0, 800.0, 2.0)?, (2400, 1600));
/// assert_eq!(backing_store_size(1920.0, 1080.0, 1.5)?, (2880, 1620));
/// # Ok::<(), arbor_ui::error::CanvasError>(())
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn backing_store_size(css_width: f64, css_height: f64, dpr: f64) -> Result<(u32, u32)> {
    let dpr = validate_pixel_ratio(dpr)?;
    if !css_width.is_finite() || css_width <= 0.0 || !css_height.is_finite() || css_height <= 0.0 {
        return Err(CanvasError::InvalidSize {
            width: css_width,
            height: css_height,
        });
    }

    let physical_width = (css_width * dpr).round();
    let physical_height = (css_height * dpr).round();
    if physical_width > f64::from(u32::MAX) || physical_height > f64::from(u32::MAX) {
        return Err(CanvasError::InvalidSize {
            width: physical_width,
            height: physical_height,
        });
    }

    Ok((physical_width as u32, physical_height as u32))
}

/// Sizes the canvas backing store and CSS box for a CSS size.
///
/// Returns the device pixel ratio used.
///
/// # Errors
///
/// Returns an error if the ratio or size is invalid or the style cannot be set.
pub fn fit_canvas(canvas: &HtmlCanvasElement, css_width: f64, css_height: f64) -> Result<f64> {
    let dpr = detect_device_pixel_ratio()?;
    let (physical_width, physical_height) = backing_store_size(css_width, css_height, dpr)?;

    canvas.set_width(physical_width);
    canvas.set_height(physical_height);

    let style = canvas.style();
    style
        .set_property("width", &format!("{css_width}px"))
        .map_err(|e| CanvasError::draw(&e))?;
    style
        .set_property("height", &format!("{css_height}px"))
        .map_err(|e| CanvasError::draw(&e))?;

    Ok(dpr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pixel_ratio() {
        for dpr in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(validate_pixel_ratio(dpr).is_err(), "DPR {dpr} should be invalid");
        }
        assert_eq!(validate_pixel_ratio(2.0), Ok(2.0));
    }

    #[test]
    fn test_backing_store_size() {
        let cases = [
            (1200.0, 800.0, 1.0, (1200, 800)),
            (1200.0, 800.0, 2.0, (2400, 1600)),
            (1366.0, 768.0, 1.25, (1708, 960)),
        ];
        for (w, h, dpr, expected) in cases {
            assert_eq!(backing_store_size(w, h, dpr), Ok(expected));
        }
    }

    #[test]
    fn test_backing_store_rejects_bad_sizes() {
        assert!(backing_store_size(0.0, 800.0, 1.0).is_err());
        assert!(backing_store_size(800.0, f64::NAN, 1.0).is_err());
        assert!(backing_store_size(f64::from(u32::MAX), 10.0, 2.0).is_err());
    }
}

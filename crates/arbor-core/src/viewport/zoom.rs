//! Wheel zoom toward the pointer
//!
//! A zoom step multiplies the scale by `1 + delta * intensity` (positive delta
//! zooms in) and then moves the translate so the world point under the cursor
//! stays on the same screen pixel.

use super::bounds::ScaleLevel;
use super::coords::{ViewTransform, WorldPoint};
use crate::error::ValueError;

/// Default scale change per unit of wheel delta.
pub const DEFAULT_ZOOM_INTENSITY: f64 = 0.0015;

/// Result of a zoom step before translate clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomResult {
    /// Scale after the step, already clamped to [0.2, 6]
    pub new_scale: ScaleLevel,
    /// Translate that keeps `origin` under the cursor
    pub new_tx: f64,
    pub new_ty: f64,
    /// World point under the cursor before the step
    pub origin: WorldPoint,
}

/// Converts a signed wheel magnitude into a scale multiplier.
///
/// # Errors
///
/// Returns an error if `delta` is NaN or infinite.
///
/// # Examples
///
/// ```
/// use arbor_core::viewport::zoom::{zoom_factor, DEFAULT_ZOOM_INTENSITY};
///
/// assert!(zoom_factor(100.0, DEFAULT_ZOOM_INTENSITY)? > 1.0);
/// assert!(zoom_factor(-100.0, DEFAULT_ZOOM_INTENSITY)? < 1.0);
/// assert_eq!(zoom_factor(0.0, DEFAULT_ZOOM_INTENSITY)?, 1.0);
/// assert!(zoom_factor(f64::NAN, DEFAULT_ZOOM_INTENSITY).is_err());
/// # Ok::<(), arbor_core::error::ValueError>(())
/// ```
pub fn zoom_factor(delta: f64, intensity: f64) -> Result<f64, ValueError> {
    if !delta.is_finite() {
        return Err(ValueError::not_finite("wheel delta", delta));
    }
    Ok(1.0 + delta * intensity)
}

/// Computes the zoom step around a cursor position.
///
/// Extreme deltas that would produce a zero or negative factor are absorbed by
/// the scale clamp.
///
/// # Errors
///
/// Returns an error if the cursor position or delta is not finite.
pub fn zoom_at_point(
    current: ViewTransform,
    cursor_x: f64,
    cursor_y: f64,
    delta: f64,
    intensity: f64,
) -> Result<ZoomResult, ValueError> {
    if !cursor_x.is_finite() {
        return Err(ValueError::not_finite("cursor x", cursor_x));
    }
    if !cursor_y.is_finite() {
        return Err(ValueError::not_finite("cursor y", cursor_y));
    }

    let factor = zoom_factor(delta, intensity)?;
    let prev_scale = current.scale.value();
    let new_scale = ScaleLevel::new(prev_scale * factor)?;

    // new_t = cursor - ((cursor - t) / prev) * new
    let origin = current.screen_to_world(cursor_x, cursor_y);
    let new_tx = cursor_x - origin.x * new_scale.value();
    let new_ty = cursor_y - origin.y * new_scale.value();

    Ok(ZoomResult {
        new_scale,
        new_tx,
        new_ty,
        origin,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::viewport::bounds::{MAX_SCALE, MIN_SCALE};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_zoom_in_increases_scale() {
        let result =
            zoom_at_point(ViewTransform::default(), 400.0, 300.0, 100.0, DEFAULT_ZOOM_INTENSITY)
                .unwrap();
        assert!((result.new_scale.value() - 1.15).abs() < EPS);
    }

    #[test]
    fn test_zoom_out_decreases_scale() {
        let result =
            zoom_at_point(ViewTransform::default(), 400.0, 300.0, -100.0, DEFAULT_ZOOM_INTENSITY)
                .unwrap();
        assert!((result.new_scale.value() - 0.85).abs() < EPS);
    }

    #[test]
    fn test_extreme_deltas_are_clamped() {
        let current = ViewTransform::default();
        let out = zoom_at_point(current, 0.0, 0.0, -1.0e6, DEFAULT_ZOOM_INTENSITY).unwrap();
        assert_eq!(out.new_scale.value(), MIN_SCALE);

        let inward = zoom_at_point(current, 0.0, 0.0, 1.0e6, DEFAULT_ZOOM_INTENSITY).unwrap();
        assert_eq!(inward.new_scale.value(), MAX_SCALE);
    }

    #[test]
    fn test_origin_stays_under_cursor() {
        let current = ViewTransform::new(ScaleLevel::new(1.7).unwrap(), -220.0, 95.0);
        let result = zoom_at_point(current, 613.0, 171.0, 240.0, DEFAULT_ZOOM_INTENSITY).unwrap();

        let after = ViewTransform::new(result.new_scale, result.new_tx, result.new_ty);
        let screen = after.world_to_screen(result.origin.x, result.origin.y);
        assert!((screen.x - 613.0).abs() < EPS);
        assert!((screen.y - 171.0).abs() < EPS);
    }

    #[test]
    fn test_origin_is_pre_zoom_world_point() {
        let current = ViewTransform::new(ScaleLevel::new(2.0).unwrap(), 100.0, 50.0);
        let result = zoom_at_point(current, 400.0, 300.0, 10.0, DEFAULT_ZOOM_INTENSITY).unwrap();
        assert!((result.origin.x - 150.0).abs() < EPS);
        assert!((result.origin.y - 125.0).abs() < EPS);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let current = ViewTransform::default();
        assert!(zoom_at_point(current, f64::NAN, 0.0, 1.0, DEFAULT_ZOOM_INTENSITY).is_err());
        assert!(zoom_at_point(current, 0.0, f64::INFINITY, 1.0, DEFAULT_ZOOM_INTENSITY).is_err());
        assert!(zoom_at_point(current, 0.0, 0.0, f64::NAN, DEFAULT_ZOOM_INTENSITY).is_err());
    }
}

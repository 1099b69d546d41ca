//! Scale and translate bounds with type-level guarantees
//!
//! [`ScaleLevel`] keeps the zoom factor within [0.2, 6.0]. [`WorldBounds`] and
//! [`TranslateRange`] keep the world rectangle from drifting arbitrarily far
//! off-screen: the translate is restricted so that the padded world edge can
//! never move past the matching surface edge.

use serde::{Deserialize, Serialize};

use super::coords::SurfaceSize;
use crate::error::ValueError;

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.2;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 6.0;

/// A validated scale that guarantees values are within [0.2, 6.0].
///
/// Non-finite input is rejected, out-of-range input is clamped.
///
/// # Examples
///
/// ```
/// use arbor_core::viewport::bounds::ScaleLevel;
///
/// let scale = ScaleLevel::new(1.5)?;
/// assert_eq!(scale.value(), 1.5);
///
/// let scale = ScaleLevel::new(40.0)?;
/// assert_eq!(scale.value(), 6.0);
///
/// assert!(ScaleLevel::new(f64::NAN).is_err());
/// # Ok::<(), arbor_core::error::ValueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleLevel {
    value: f64,
}

impl ScaleLevel {
    /// Creates a new `ScaleLevel`, clamping the value to [`MIN_SCALE`, `MAX_SCALE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is NaN or infinite.
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::not_finite("scale", value));
        }
        Ok(Self {
            value: value.clamp(MIN_SCALE, MAX_SCALE),
        })
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Multiplies the scale by `factor`, clamping the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor or the product is not finite.
    pub fn multiply(&self, factor: f64) -> Result<Self, ValueError> {
        if !factor.is_finite() {
            return Err(ValueError::not_finite("zoom factor", factor));
        }
        Self::new(self.value * factor)
    }

    #[must_use]
    pub const fn min() -> Self {
        Self { value: MIN_SCALE }
    }

    #[must_use]
    pub const fn max() -> Self {
        Self { value: MAX_SCALE }
    }
}

impl Default for ScaleLevel {
    /// Returns the identity scale of 1.0 (100%).
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

/// Rectangle of world space the view may show, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl WorldBounds {
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: -5000.0,
            min_y: -5000.0,
            max_x: 5000.0,
            max_y: 5000.0,
        }
    }
}

/// Result of clamping a translate into its allowed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub tx: f64,
    pub ty: f64,
    /// Whether either coordinate had to move
    pub hit_edge: bool,
}

/// Allowed translate range for one scale and surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateRange {
    pub tx_min: f64,
    pub tx_max: f64,
    pub ty_min: f64,
    pub ty_max: f64,
}

impl TranslateRange {
    /// Computes the range for `scale`.
    ///
    /// `tx_min = width - max_x*scale - padding`, `tx_max = -min_x*scale + padding`,
    /// and the same for the vertical axis.
    #[must_use]
    pub fn compute(
        bounds: &WorldBounds,
        padding: f64,
        surface: SurfaceSize,
        scale: ScaleLevel,
    ) -> Self {
        let s = scale.value();
        Self {
            tx_min: surface.width() - bounds.max_x * s - padding,
            tx_max: -bounds.min_x * s + padding,
            ty_min: surface.height() - bounds.max_y * s - padding,
            ty_max: -bounds.min_y * s + padding,
        }
    }

    /// True when the surface is wider or taller than the padded world.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.tx_min > self.tx_max || self.ty_min > self.ty_max
    }

    #[must_use]
    pub fn contains(&self, tx: f64, ty: f64) -> bool {
        tx >= self.tx_min && tx <= self.tx_max && ty >= self.ty_min && ty <= self.ty_max
    }

    /// Clamps a translate into the range.
    ///
    /// An inverted axis pins to its minimum, so the result is still stable
    /// under repeated clamping.
    #[must_use]
    pub fn clamp(&self, tx: f64, ty: f64) -> Clamped {
        let clamped_tx = tx.min(self.tx_max).max(self.tx_min);
        let clamped_ty = ty.min(self.ty_max).max(self.ty_min);
        Clamped {
            tx: clamped_tx,
            ty: clamped_ty,
            hit_edge: (clamped_tx - tx).abs() > 0.0 || (clamped_ty - ty).abs() > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn surface() -> SurfaceSize {
        SurfaceSize::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn test_scale_level_clamps() {
        assert_eq!(ScaleLevel::new(0.01).unwrap().value(), MIN_SCALE);
        assert_eq!(ScaleLevel::new(-4.0).unwrap().value(), MIN_SCALE);
        assert_eq!(ScaleLevel::new(99.0).unwrap().value(), MAX_SCALE);
        assert_eq!(ScaleLevel::new(2.5).unwrap().value(), 2.5);
    }

    #[test]
    fn test_scale_level_rejects_non_finite() {
        assert!(ScaleLevel::new(f64::NAN).is_err());
        assert!(ScaleLevel::new(f64::INFINITY).is_err());
        assert!(ScaleLevel::default().multiply(f64::NAN).is_err());
    }

    #[test]
    fn test_translate_range_at_unit_scale() {
        let range = TranslateRange::compute(
            &WorldBounds::default(),
            100.0,
            surface(),
            ScaleLevel::default(),
        );
        assert_eq!(range.tx_min, 800.0 - 5000.0 - 100.0);
        assert_eq!(range.tx_max, 5100.0);
        assert_eq!(range.ty_min, 600.0 - 5000.0 - 100.0);
        assert_eq!(range.ty_max, 5100.0);
        assert!(!range.is_inverted());
    }

    #[test]
    fn test_clamp_inside_range_is_untouched() {
        let range = TranslateRange::compute(
            &WorldBounds::default(),
            100.0,
            surface(),
            ScaleLevel::default(),
        );
        let clamped = range.clamp(50.0, 30.0);
        assert_eq!((clamped.tx, clamped.ty), (50.0, 30.0));
        assert!(!clamped.hit_edge);
    }

    #[test]
    fn test_clamp_reports_edge_hit() {
        let range = TranslateRange::compute(
            &WorldBounds::default(),
            100.0,
            surface(),
            ScaleLevel::default(),
        );
        let clamped = range.clamp(90_000.0, 0.0);
        assert_eq!(clamped.tx, 5100.0);
        assert!(clamped.hit_edge);
    }

    #[test]
    fn test_inverted_range_pins_to_minimum() {
        let wide = SurfaceSize::new(4000.0, 600.0).unwrap();
        let range = TranslateRange::compute(
            &WorldBounds::default(),
            100.0,
            wide,
            ScaleLevel::min(),
        );
        assert!(range.is_inverted());
        let once = range.clamp(0.0, 0.0);
        assert_eq!(once.tx, range.tx_min);
        let twice = range.clamp(once.tx, once.ty);
        assert_eq!((once.tx, once.ty), (twice.tx, twice.ty));
        assert!(!twice.hit_edge);
    }

    #[test]
    fn test_world_bounds_validation() {
        assert!(WorldBounds::default().is_well_formed());
        let flipped = WorldBounds {
            min_x: 10.0,
            max_x: -10.0,
            ..WorldBounds::default()
        };
        assert!(!flipped.is_well_formed());
    }
}

//! Coordinate transformation between screen space and world space
//!
//! Screen coordinates are CSS pixels relative to the top-left corner of the
//! render surface. World coordinates are the unbounded logical space blocks
//! live in. A [`ViewTransform`] maps one to the other:
//!
//! - `screen = world * scale + translate`
//! - `world = (screen - translate) / scale`

use serde::{Deserialize, Serialize};

use super::bounds::ScaleLevel;
use crate::error::ValueError;

/// Position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[must_use]
    pub const fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Position on the render surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the render surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    width: f64,
    height: f64,
}

impl SurfaceSize {
    /// Creates a surface size.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height are not positive finite values.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::viewport::coords::SurfaceSize;
    ///
    /// let surface = SurfaceSize::new(1200.0, 800.0)?;
    /// assert_eq!(surface.center().x, 600.0);
    /// assert!(SurfaceSize::new(0.0, 800.0).is_err());
    /// # Ok::<(), arbor_core::error::ValueError>(())
    /// ```
    pub fn new(width: f64, height: f64) -> Result<Self, ValueError> {
        if !width.is_finite() {
            return Err(ValueError::not_finite("surface width", width));
        }
        if width <= 0.0 {
            return Err(ValueError::not_positive("surface width", width));
        }
        if !height.is_finite() {
            return Err(ValueError::not_finite("surface height", height));
        }
        if height <= 0.0 {
            return Err(ValueError::not_positive("surface height", height));
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Visual center of the surface.
    #[must_use]
    pub const fn center(&self) -> ScreenPoint {
        ScreenPoint {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

/// Immutable snapshot of the scale/translate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: ScaleLevel,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: ScaleLevel::default(),
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewTransform {
    #[must_use]
    pub const fn new(scale: ScaleLevel, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Converts a screen position to world coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::viewport::bounds::ScaleLevel;
    /// use arbor_core::viewport::coords::ViewTransform;
    ///
    /// let transform = ViewTransform::new(ScaleLevel::new(2.0)?, 100.0, 50.0);
    /// let world = transform.screen_to_world(300.0, 250.0);
    /// assert_eq!((world.x, world.y), (100.0, 100.0));
    /// # Ok::<(), arbor_core::error::ValueError>(())
    /// ```
    #[must_use]
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> WorldPoint {
        let scale = self.scale.value();
        WorldPoint {
            x: (screen_x - self.translate_x) / scale,
            y: (screen_y - self.translate_y) / scale,
        }
    }

    /// Converts a world position to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world_x: f64, world_y: f64) -> ScreenPoint {
        let scale = self.scale.value();
        ScreenPoint {
            x: world_x * scale + self.translate_x,
            y: world_y * scale + self.translate_y,
        }
    }
}

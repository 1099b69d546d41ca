//! Viewport transform engine.
//!
//! [`Viewport`] owns the one authoritative scale/translate pair for a canvas.
//! All mutation goes through its methods and is synchronous, so a handler that
//! reads after mutating always sees the new values. Time is passed in as a
//! millisecond timestamp (`performance.now()` in the browser) which keeps the
//! engine deterministic under test.
//!
//! # Modules
//!
//! - [`bounds`] - scale limits, world bounds and translate clamping
//! - [`coords`] - screen/world points and conversions
//! - [`zoom`] - zoom-toward-pointer math
//! - [`edge`] - transient "hit the edge" indicator

pub mod bounds;
pub mod coords;
pub mod edge;
pub mod zoom;

use tracing::debug;

use crate::animation::{Timeline, Tween};
use crate::config::ViewportConfig;
use crate::error::ValueError;

pub use bounds::{Clamped, MAX_SCALE, MIN_SCALE, ScaleLevel, TranslateRange, WorldBounds};
pub use coords::{ScreenPoint, SurfaceSize, ViewTransform, WorldPoint};
pub use edge::EdgeFlag;

/// Field animated by a view transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewField {
    Scale,
    TranslateX,
    TranslateY,
}

/// Read-only copy of the view state for bindings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub at_edge: bool,
    pub animating: bool,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            at_edge: false,
            animating: false,
        }
    }
}

impl ViewSnapshot {
    /// The transform this snapshot was taken at.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        ViewTransform::new(
            ScaleLevel::new(self.scale).unwrap_or_default(),
            self.translate_x,
            self.translate_y,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    scale: ScaleLevel,
    translate_x: f64,
    translate_y: f64,
    surface: Option<SurfaceSize>,
    config: ViewportConfig,
    edge: EdgeFlag,
    transitions: Timeline<ViewField>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    /// Creates a viewport at scale 1 and translate (0, 0) with no surface.
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            scale: ScaleLevel::default(),
            translate_x: 0.0,
            translate_y: 0.0,
            surface: None,
            edge: EdgeFlag::new(config.edge_flash_ms),
            config,
            transitions: Timeline::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Records the render surface size in CSS pixels.
    ///
    /// Returns `true` the first time a surface is attached, which is when the
    /// host should center the view. On later resizes the committed translate
    /// is clamped to the new range without raising the edge flag.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not a positive finite number.
    pub fn set_surface(&mut self, width: f64, height: f64) -> Result<bool, ValueError> {
        let size = SurfaceSize::new(width, height)?;
        let first = self.surface.is_none();
        self.surface = Some(size);
        if !first {
            let clamped = self.clamp(self.translate_x, self.translate_y, self.scale);
            self.translate_x = clamped.tx;
            self.translate_y = clamped.ty;
        }
        debug!(width, height, first, "Surface resized");
        Ok(first)
    }

    #[must_use]
    pub const fn surface(&self) -> Option<SurfaceSize> {
        self.surface
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale.value()
    }

    #[must_use]
    pub const fn translate(&self) -> (f64, f64) {
        (self.translate_x, self.translate_y)
    }

    #[must_use]
    pub const fn transform(&self) -> ViewTransform {
        ViewTransform::new(self.scale, self.translate_x, self.translate_y)
    }

    #[must_use]
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> WorldPoint {
        self.transform().screen_to_world(screen_x, screen_y)
    }

    #[must_use]
    pub fn world_to_screen(&self, world_x: f64, world_y: f64) -> ScreenPoint {
        self.transform().world_to_screen(world_x, world_y)
    }

    /// Allowed translate range at `scale`, if a surface is attached.
    #[must_use]
    pub fn translate_range(&self, scale: ScaleLevel) -> Option<TranslateRange> {
        self.surface.map(|surface| {
            TranslateRange::compute(
                &self.config.world_bounds,
                self.config.screen_padding,
                surface,
                scale,
            )
        })
    }

    /// Clamps a translate for `scale` without committing it.
    ///
    /// Without a surface the input is returned unchanged.
    #[must_use]
    pub fn clamp(&self, tx: f64, ty: f64, scale: ScaleLevel) -> Clamped {
        self.translate_range(scale).map_or(
            Clamped {
                tx,
                ty,
                hit_edge: false,
            },
            |range| range.clamp(tx, ty),
        )
    }

    /// Zooms by a signed wheel delta around a surface-relative point.
    ///
    /// Positive `delta` zooms in. Cancels any running view transition.
    /// Returns the committed translate, or `None` when the call was a no-op.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, delta: f64, now: f64) -> Option<Clamped> {
        if self.surface.is_none() {
            debug!("Zoom ignored: no render surface");
            return None;
        }
        let step = match zoom::zoom_at_point(
            self.transform(),
            screen_x,
            screen_y,
            delta,
            self.config.zoom_intensity,
        ) {
            Ok(step) => step,
            Err(error) => {
                debug!(%error, "Zoom ignored");
                return None;
            }
        };

        self.cancel_transition();
        let clamped = self.clamp(step.new_tx, step.new_ty, step.new_scale);
        self.scale = step.new_scale;
        self.commit(clamped, now);
        Some(clamped)
    }

    /// Moves the translate to `(tx, ty)`, clamped to the world bounds.
    ///
    /// Cancels any running view transition.
    pub fn pan_to(&mut self, tx: f64, ty: f64, now: f64) -> Option<Clamped> {
        if self.surface.is_none() {
            debug!("Pan ignored: no render surface");
            return None;
        }
        if !tx.is_finite() || !ty.is_finite() {
            debug!(tx, ty, "Pan ignored: non-finite translate");
            return None;
        }

        self.cancel_transition();
        let clamped = self.clamp(tx, ty, self.scale);
        self.commit(clamped, now);
        Some(clamped)
    }

    /// Jumps straight to `transform`, clamping the translate when a surface is
    /// attached. Cancels any running view transition.
    pub fn set_transform(&mut self, transform: ViewTransform, now: f64) -> Option<Clamped> {
        if !transform.translate_x.is_finite() || !transform.translate_y.is_finite() {
            debug!("Transform ignored: non-finite translate");
            return None;
        }

        self.cancel_transition();
        self.scale = transform.scale;
        let clamped = self.clamp(transform.translate_x, transform.translate_y, transform.scale);
        self.commit(clamped, now);
        Some(clamped)
    }

    /// Starts an animated transition to scale 1 with the world origin at the
    /// surface center.
    ///
    /// A transition that is already running is replaced. Returns `false` when
    /// no surface is attached.
    pub fn center_view(&mut self, now: f64) -> bool {
        let Some(surface) = self.surface else {
            debug!("Center ignored: no render surface");
            return false;
        };
        let target = surface.center();
        let duration = self.config.transition_ms;
        let easing = self.config.easing;
        let tween = |start: f64, end: f64| {
            Tween::new(start, end, now)
                .duration(duration)
                .easing(easing)
        };

        let replaced = self
            .transitions
            .animate(ViewField::Scale, tween(self.scale.value(), 1.0))
            .is_some();
        self.transitions
            .animate(ViewField::TranslateX, tween(self.translate_x, target.x));
        self.transitions
            .animate(ViewField::TranslateY, tween(self.translate_y, target.y));

        debug!(
            target_x = target.x,
            target_y = target.y,
            replaced,
            "Centering view"
        );
        true
    }

    /// Applies the running transition for this tick.
    ///
    /// Returns whether a transition is still running afterwards.
    pub fn advance(&mut self, now: f64) -> bool {
        for (field, value) in self.transitions.advance(now) {
            match field {
                ViewField::Scale => {
                    if let Ok(scale) = ScaleLevel::new(value) {
                        self.scale = scale;
                    }
                }
                ViewField::TranslateX => self.translate_x = value,
                ViewField::TranslateY => self.translate_y = value,
            }
        }
        self.edge.expire(now);
        !self.transitions.is_idle()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.transitions.is_idle()
    }

    #[must_use]
    pub fn is_at_edge(&self, now: f64) -> bool {
        self.edge.is_active(now)
    }

    /// When the edge flag will clear, if it is raised.
    #[must_use]
    pub const fn edge_deadline(&self) -> Option<f64> {
        self.edge.deadline()
    }

    #[must_use]
    pub fn snapshot(&self, now: f64) -> ViewSnapshot {
        ViewSnapshot {
            scale: self.scale.value(),
            translate_x: self.translate_x,
            translate_y: self.translate_y,
            at_edge: self.is_at_edge(now),
            animating: self.is_animating(),
        }
    }

    fn commit(&mut self, clamped: Clamped, now: f64) {
        self.translate_x = clamped.tx;
        self.translate_y = clamped.ty;
        if clamped.hit_edge {
            self.edge.trigger(now);
        }
    }

    fn cancel_transition(&mut self) {
        if !self.transitions.is_idle() {
            debug!("Cancelling view transition");
            self.transitions.clear();
        }
    }
}

//! Pointer and wheel input state machine.
//!
//! The controller turns raw event coordinates into [`Viewport`] calls. It holds
//! only the pan gesture; the viewport stays the single owner of view state.
//! Pointer capture is a host concern, so pointer-down and pointer-up return
//! the pointer id the host should capture or release.

use tracing::debug;

use crate::viewport::{Viewport, WorldPoint};

/// Current pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanGesture {
    #[default]
    Idle,
    /// Dragging with `pointer_id`; `anchor` is the client position minus the
    /// translate at the time the drag started.
    Panning { pointer_id: i32, anchor: (f64, f64) },
}

/// Pointer id the host should capture or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Request(i32),
    Release(i32),
}

#[derive(Debug, Clone, Default)]
pub struct InputController {
    gesture: PanGesture,
}

impl InputController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn gesture(&self) -> PanGesture {
        self.gesture
    }

    #[must_use]
    pub const fn is_panning(&self) -> bool {
        matches!(self.gesture, PanGesture::Panning { .. })
    }

    /// Handles a wheel event at a surface-relative position.
    ///
    /// Scrolling down (positive `delta_y`) zooms out. Returns whether the view
    /// changed.
    pub fn wheel(&self, viewport: &mut Viewport, x: f64, y: f64, delta_y: f64, now: f64) -> bool {
        viewport.zoom_at(x, y, -delta_y, now).is_some()
    }

    /// Starts a pan. Returns the pointer to capture.
    ///
    /// Ignored while another pointer is already panning.
    pub fn pointer_down(
        &mut self,
        viewport: &Viewport,
        pointer_id: i32,
        client_x: f64,
        client_y: f64,
    ) -> Option<Capture> {
        if let PanGesture::Panning { pointer_id: active, .. } = self.gesture {
            debug!(pointer_id, active, "Pointer down ignored: already panning");
            return None;
        }
        let (tx, ty) = viewport.translate();
        self.gesture = PanGesture::Panning {
            pointer_id,
            anchor: (client_x - tx, client_y - ty),
        };
        debug!(pointer_id, "Pan started");
        Some(Capture::Request(pointer_id))
    }

    /// Continues a pan. Moves from other pointers are ignored.
    ///
    /// Returns whether the view changed.
    pub fn pointer_move(
        &self,
        viewport: &mut Viewport,
        pointer_id: i32,
        client_x: f64,
        client_y: f64,
        now: f64,
    ) -> bool {
        match self.gesture {
            PanGesture::Panning {
                pointer_id: active,
                anchor: (ax, ay),
            } if active == pointer_id => viewport
                .pan_to(client_x - ax, client_y - ay, now)
                .is_some(),
            _ => false,
        }
    }

    /// Ends a pan. Returns the pointer to release; safe to call when idle.
    pub fn pointer_up(&mut self, pointer_id: i32) -> Option<Capture> {
        match self.gesture {
            PanGesture::Panning {
                pointer_id: active, ..
            } if active == pointer_id => {
                self.gesture = PanGesture::Idle;
                debug!(pointer_id, "Pan ended");
                Some(Capture::Release(pointer_id))
            }
            _ => None,
        }
    }

    /// Same as [`Self::pointer_up`]; a cancelled pointer ends the pan.
    pub fn pointer_cancel(&mut self, pointer_id: i32) -> Option<Capture> {
        self.pointer_up(pointer_id)
    }

    /// World position at the center of the surface, where new items go.
    #[must_use]
    pub fn add_item_position(viewport: &Viewport) -> Option<WorldPoint> {
        viewport.surface().map(|surface| {
            let center = surface.center();
            viewport.screen_to_world(center.x, center.y)
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn viewport() -> Viewport {
        let mut vp = Viewport::default();
        vp.set_surface(800.0, 600.0).unwrap();
        vp
    }

    #[test]
    fn test_drag_moves_translate() {
        let mut vp = viewport();
        let mut input = InputController::new();

        assert_eq!(
            input.pointer_down(&vp, 1, 100.0, 100.0),
            Some(Capture::Request(1))
        );
        assert!(input.pointer_move(&mut vp, 1, 150.0, 130.0, 0.0));
        assert_eq!(vp.translate(), (50.0, 30.0));

        assert_eq!(input.pointer_up(1), Some(Capture::Release(1)));
        assert!(!input.is_panning());
    }

    #[test]
    fn test_move_without_pan_is_ignored() {
        let mut vp = viewport();
        let input = InputController::new();
        assert!(!input.pointer_move(&mut vp, 1, 150.0, 130.0, 0.0));
        assert_eq!(vp.translate(), (0.0, 0.0));
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut vp = viewport();
        let mut input = InputController::new();
        input.pointer_down(&vp, 1, 0.0, 0.0);

        assert_eq!(input.pointer_down(&vp, 2, 10.0, 10.0), None);
        assert!(!input.pointer_move(&mut vp, 2, 90.0, 90.0, 0.0));
        assert_eq!(input.pointer_up(2), None);
        assert!(input.is_panning());
        assert_eq!(input.pointer_cancel(1), Some(Capture::Release(1)));
    }

    #[test]
    fn test_pointer_up_when_idle_is_safe() {
        let mut input = InputController::new();
        assert_eq!(input.pointer_up(7), None);
        assert_eq!(input.gesture(), PanGesture::Idle);
    }

    #[test]
    fn test_wheel_down_zooms_out() {
        let mut vp = viewport();
        let input = InputController::new();
        assert!(input.wheel(&mut vp, 400.0, 300.0, 100.0, 0.0));
        assert!(vp.scale() < 1.0);
        assert!(input.wheel(&mut vp, 400.0, 300.0, -300.0, 0.0));
        assert!(vp.scale() > 1.0);
    }

    #[test]
    fn test_add_item_position_is_surface_center() {
        let mut vp = viewport();
        vp.pan_to(100.0, 50.0, 0.0);
        let point = InputController::add_item_position(&vp).unwrap();
        assert_eq!(point, WorldPoint::new(300.0, 250.0));

        assert!(InputController::add_item_position(&Viewport::default()).is_none());
    }
}

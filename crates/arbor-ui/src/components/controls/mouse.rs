//! Pointer and wheel event extraction
//!
//! Wheel positions are made relative to the canvas box, which is what
//! [`arbor_core::Viewport::zoom_at`] expects. Pan gestures work on raw client
//! coordinates, so pointer data keeps them as-is.

use web_sys::{DomRect, HtmlCanvasElement, PointerEvent, WheelEvent};

/// Pointer event data in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEventData {
    pub pointer_id: i32,
    pub client_x: f64,
    pub client_y: f64,
    /// Mouse button: 0 = left, 1 = middle, 2 = right
    pub button: i16,
}

impl PointerEventData {
    #[must_use]
    pub fn from_event(event: &PointerEvent) -> Self {
        Self {
            pointer_id: event.pointer_id(),
            client_x: f64::from(event.client_x()),
            client_y: f64::from(event.client_y()),
            button: event.button(),
        }
    }

    /// Only the primary button starts a pan.
    #[must_use]
    pub const fn is_primary_button(&self) -> bool {
        self.button == 0
    }
}

/// Wheel event data with canvas-relative coordinates
///
/// # Examples
///
/// ```
/// use arbor_ui::components::controls::mouse::WheelEventData;
///
/// let data = WheelEventData {
///     delta_y: -100.0,
///     x: 100.0,
///     y: 200.0,
/// };
/// assert!(data.delta_y < 0.0); // Scroll up
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEventData {
    /// Vertical scroll delta (positive = down, negative = up)
    pub delta_y: f64,
    pub x: f64,
    pub y: f64,
}

/// Converts a client position to one relative to a box whose top-left corner
/// sits at `(left, top)`.
///
/// # Examples
///
/// ```
/// use arbor_ui::components::controls::mouse::relative_to;
///
/// assert_eq!(relative_to((150.0, 90.0), (50.0, 40.0)), (100.0, 50.0));
/// ```
#[must_use]
pub fn relative_to(client: (f64, f64), origin: (f64, f64)) -> (f64, f64) {
    (client.0 - origin.0, client.1 - origin.1)
}

fn rect_origin(rect: &DomRect) -> (f64, f64) {
    (rect.left(), rect.top())
}

/// Extracts the scroll delta and canvas-relative cursor position.
#[must_use]
pub fn extract_wheel_data(event: &WheelEvent, canvas: &HtmlCanvasElement) -> WheelEventData {
    let (x, y) = relative_to(
        (f64::from(event.client_x()), f64::from(event.client_y())),
        rect_origin(&canvas.get_bounding_client_rect()),
    );
    WheelEventData {
        delta_y: event.delta_y(),
        x,
        y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_subtracts_origin() {
        assert_eq!(relative_to((10.0, 10.0), (0.0, 0.0)), (10.0, 10.0));
        assert_eq!(relative_to((10.0, 10.0), (20.0, 5.0)), (-10.0, 5.0));
    }

    #[test]
    fn test_primary_button() {
        let data = PointerEventData {
            pointer_id: 1,
            client_x: 0.0,
            client_y: 0.0,
            button: 0,
        };
        assert!(data.is_primary_button());
        assert!(!PointerEventData { button: 2, ..data }.is_primary_button());
    }
}

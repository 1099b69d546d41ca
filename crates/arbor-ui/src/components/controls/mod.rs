//! Canvas input controls

pub mod mouse;

pub use mouse::{PointerEventData, WheelEventData, extract_wheel_data, relative_to};

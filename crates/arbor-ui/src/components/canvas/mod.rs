//! Canvas plumbing: context, pixel ratio, sizing, frame scheduling and grid
//! painting.

pub mod context;
pub mod dpi;
pub mod draw;
pub mod raf;
pub mod resize;

pub use context::get_2d_context;
pub use dpi::fit_canvas;
pub use draw::paint_grid;
pub use raf::{AnimationHandle, FrameScheduler, RafError, animate, now_ms, run_until};
pub use resize::{attach_resize_listener, measure_surface};

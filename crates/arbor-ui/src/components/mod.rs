//! UI components
//!
//! - `canvas`: low-level canvas plumbing (context, DPI, resize, frames, paint)
//! - `controls`: DOM event extraction
//! - `stage`: imperative host owning the viewport
//! - `board`, `block_card`, `toolbar`, `export_panel`: Leptos components

pub mod block_card;
pub mod board;
pub mod canvas;
pub mod controls;
pub mod export_panel;
pub mod stage;
pub mod toolbar;

pub use block_card::BlockCard;
pub use board::{BoardContext, CanvasBoard};
pub use export_panel::ExportPanel;
pub use stage::Stage;
pub use toolbar::{Toolbar, ZoomIndicator};

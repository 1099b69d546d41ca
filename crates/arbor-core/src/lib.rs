//! Arbor core: the target-independent half of the idea canvas.
//!
//! - [`viewport`] - scale/translate state, world bounds, zoom and centering
//! - [`animation`] - easing curves and keyed tween timelines
//! - [`input`] - pan/zoom gesture state machine
//! - [`tree`] - branch/leaf block tree and its text export
//! - [`render`] - grid and overlay planning for a frame
//! - [`store`] - idea store trait with in-memory implementation
//! - [`board`] - session logic tying the tree to a store
//! - [`config`] - runtime configuration

pub mod animation;
pub mod board;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod store;
pub mod tree;
pub mod viewport;

pub use board::{Board, CreatedBlock, NewBlock};
pub use config::{AppConfig, StoreConfig, ViewportConfig};
pub use error::{ConfigError, StoreError, TreeError, ValueError};
pub use input::{Capture, InputController, PanGesture};
pub use tree::{BlockAction, BlockId, BlockKind, CanvasBlock, CanvasModel, Direction, Item, traverse_export};
pub use viewport::{ViewSnapshot, Viewport};

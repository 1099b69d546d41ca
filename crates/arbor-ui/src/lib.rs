//! Leptos 0.7 CSR frontend for the Arbor idea canvas
//!
//! ## Architecture
//! - Pure CSR (Client-Side Rendering) with Leptos 0.7, compiled to
//!   `wasm32-unknown-unknown` by Trunk
//! - View math, input state and the block tree live in `arbor-core`; this
//!   crate wires them to the DOM
//! - Canvas painting for the grid, DOM overlays for blocks
//!
//! ## Module Structure
//! - `app`: root component
//! - `components`: canvas plumbing, stage host and Leptos components
//! - `state`: page configuration and idea store backends
//! - `logging`: `tracing` sink for the browser console
//! - `error`: canvas error types

#![forbid(unsafe_code)]

pub mod app;
pub mod components;
pub mod error;
pub mod logging;
pub mod state;

pub use app::App;

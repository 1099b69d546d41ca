//! Render planning.
//!
//! Computes what a frame needs (visible world rectangle, grid lines, overlay
//! placements, zoom label) from the viewport and the item list. Painting is
//! left to the host.

use crate::tree::{BlockId, Item};
use crate::viewport::{ViewTransform, Viewport};

/// Grid stroke colour.
pub const GRID_STROKE: &str = "rgba(128,128,128,0.12)";

/// World-space rectangle currently visible on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl VisibleRect {
    #[must_use]
    pub fn compute(transform: ViewTransform, width: f64, height: f64) -> Self {
        let s = transform.scale.value();
        Self {
            left: -transform.translate_x / s,
            top: -transform.translate_y / s,
            right: (width - transform.translate_x) / s,
            bottom: (height - transform.translate_y) / s,
        }
    }
}

/// Grid lines in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLines {
    pub vertical: Vec<f64>,
    pub horizontal: Vec<f64>,
    pub line_width: f64,
}

impl GridLines {
    /// Lines every `spacing` units covering `rect`, aligned to multiples of
    /// `spacing`.
    #[must_use]
    pub fn compute(rect: VisibleRect, spacing: f64, scale: f64) -> Self {
        Self {
            vertical: axis_lines(rect.left, rect.right, spacing),
            horizontal: axis_lines(rect.top, rect.bottom, spacing),
            line_width: 1.0 / scale.max(1.0),
        }
    }
}

fn axis_lines(from: f64, to: f64, spacing: f64) -> Vec<f64> {
    if !spacing.is_finite() || spacing <= 0.0 || !from.is_finite() || !to.is_finite() {
        return Vec::new();
    }
    let start = (from / spacing).floor() * spacing;
    let mut lines = Vec::new();
    let mut k = 0.0_f64;
    loop {
        let line = start + k * spacing;
        if line > to {
            break;
        }
        lines.push(line);
        k += 1.0;
    }
    lines
}

/// CSS placement of one block overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlacement {
    pub id: BlockId,
    pub left: f64,
    pub top: f64,
    pub scale: f64,
}

impl OverlayPlacement {
    #[must_use]
    pub fn for_item(transform: &ViewTransform, item: &Item) -> Self {
        let screen = transform.world_to_screen(item.x, item.y);
        Self {
            id: item.id.clone(),
            left: screen.x,
            top: screen.y,
            scale: transform.scale.value(),
        }
    }

    /// Inline style: centered on its anchor and visually scaled.
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "left: {}px; top: {}px; transform: translate(-50%, -50%) scale({});",
            self.left, self.top, self.scale
        )
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub transform: ViewTransform,
    pub visible: VisibleRect,
    pub grid: GridLines,
    pub overlays: Vec<OverlayPlacement>,
}

impl RenderPlan {
    /// Plans a frame. `None` when the viewport has no surface yet.
    #[must_use]
    pub fn build(viewport: &Viewport, items: &[Item]) -> Option<Self> {
        let surface = viewport.surface()?;
        let transform = viewport.transform();
        let rect = VisibleRect::compute(transform, surface.width(), surface.height());
        Some(Self {
            transform,
            visible: rect,
            grid: GridLines::compute(rect, viewport.config().grid_spacing, transform.scale.value()),
            overlays: items
                .iter()
                .map(|item| OverlayPlacement::for_item(&transform, item))
                .collect(),
        })
    }
}

/// Zoom indicator text, e.g. `Zoom: 150%`. Halves round up.
#[must_use]
pub fn zoom_label(scale: f64) -> String {
    format!("Zoom: {}%", (scale * 100.0).round())
}

//! Grid painting.
//!
//! The canvas only carries the background grid. Blocks are DOM overlays
//! positioned from the same [`RenderPlan`].

use arbor_core::render::{GRID_STROKE, RenderPlan};
use web_sys::CanvasRenderingContext2d;

use crate::error::{CanvasError, Result};

/// Clears the surface and strokes the grid for `plan`.
///
/// `width` and `height` are the surface size in CSS pixels; `dpr` is the base
/// scale between CSS and backing-store pixels.
///
/// # Errors
///
/// Returns an error if a transform call is rejected by the context.
pub fn paint_grid(
    ctx: &CanvasRenderingContext2d,
    plan: &RenderPlan,
    dpr: f64,
    width: f64,
    height: f64,
) -> Result<()> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
        .map_err(|e| CanvasError::draw(&e))?;
    ctx.clear_rect(0.0, 0.0, width, height);

    ctx.save();
    let result = stroke_grid(ctx, plan);
    ctx.restore();
    result
}

fn stroke_grid(ctx: &CanvasRenderingContext2d, plan: &RenderPlan) -> Result<()> {
    let transform = plan.transform;
    ctx.translate(transform.translate_x, transform.translate_y)
        .map_err(|e| CanvasError::draw(&e))?;
    let scale = transform.scale.value();
    ctx.scale(scale, scale).map_err(|e| CanvasError::draw(&e))?;

    ctx.set_stroke_style_str(GRID_STROKE);
    ctx.set_line_width(plan.grid.line_width);
    ctx.begin_path();

    let visible = plan.visible;
    for &x in &plan.grid.vertical {
        ctx.move_to(x, visible.top);
        ctx.line_to(x, visible.bottom);
    }
    for &y in &plan.grid.horizontal {
        ctx.move_to(visible.left, y);
        ctx.line_to(visible.right, y);
    }
    ctx.stroke();
    Ok(())
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use super::*;
    use crate::components::canvas::context::get_2d_context;
    use arbor_core::Viewport;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::HtmlCanvasElement;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_paint_grid_on_detached_canvas() -> Result<()> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(CanvasError::NotMounted)?;
        canvas.set_width(800);
        canvas.set_height(600);
        let ctx = get_2d_context(&canvas)?;

        let mut viewport = Viewport::default();
        viewport
            .set_surface(800.0, 600.0)
            .map_err(|e| CanvasError::Draw(e.to_string()))?;
        let plan = RenderPlan::build(&viewport, &[]).ok_or(CanvasError::NotMounted)?;

        paint_grid(&ctx, &plan, 1.0, 800.0, 600.0)
    }
}

//! Imperative canvas host
//!
//! [`Stage`] owns the viewport, the pan controller and the frame scheduler.
//! Leptos bindings never touch the viewport; they read the [`ViewSnapshot`]
//! signal, which is refreshed after every mutation and every frame. Input
//! paints go through the single-slot scheduler; a running view transition
//! owns a [`run_until`] loop that paints every frame until it settles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use arbor_core::render::RenderPlan;
use arbor_core::viewport::WorldPoint;
use arbor_core::{Capture, InputController, ViewSnapshot, Viewport, ViewportConfig};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use tracing::{debug, warn};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::components::canvas::{
    AnimationHandle, FrameScheduler, RafError, attach_resize_listener, fit_canvas, get_2d_context,
    measure_surface, now_ms, paint_grid, run_until,
};
use crate::components::controls::{PointerEventData, WheelEventData};
use crate::error::{CanvasError, Result};

struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

pub struct Stage {
    viewport: Rc<RefCell<Viewport>>,
    input: RefCell<InputController>,
    scheduler: FrameScheduler,
    transition: RefCell<Option<AnimationHandle>>,
    surface: RefCell<Option<Surface>>,
    edge_timer: RefCell<Option<Timeout>>,
    snapshot: RwSignal<ViewSnapshot>,
    this: Weak<Stage>,
}

impl Stage {
    /// Creates a stage with no surface. `snapshot` receives every view change.
    ///
    /// # Errors
    ///
    /// Returns [`RafError::WindowNotAvailable`] outside a browser.
    pub fn new(
        config: ViewportConfig,
        snapshot: RwSignal<ViewSnapshot>,
    ) -> std::result::Result<Rc<Self>, RafError> {
        let scheduler = FrameScheduler::new()?;
        Ok(Rc::new_cyclic(|this| Self {
            viewport: Rc::new(RefCell::new(Viewport::new(config))),
            input: RefCell::new(InputController::new()),
            scheduler,
            transition: RefCell::new(None),
            surface: RefCell::new(None),
            edge_timer: RefCell::new(None),
            snapshot,
            this: this.clone(),
        }))
    }

    /// Binds the stage to a mounted canvas and starts tracking window resizes.
    ///
    /// The first successful sizing centers the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the context, size or resize listener is unavailable.
    pub fn attach(&self, canvas: HtmlCanvasElement) -> Result<()> {
        let ctx = get_2d_context(&canvas)?;
        *self.surface.borrow_mut() = Some(Surface {
            canvas,
            ctx,
            dpr: 1.0,
        });

        let (width, height) = measure_surface()?;
        self.resize(width, height)?;

        let this = self.this.clone();
        attach_resize_listener(move |width, height| {
            if let Some(stage) = this.upgrade() {
                if let Err(error) = stage.resize(width, height) {
                    warn!(%error, "Canvas resize failed");
                }
            }
        })?
        .forget();
        Ok(())
    }

    /// Resizes the backing store and the viewport surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage is not attached or the size is invalid.
    pub fn resize(&self, width: f64, height: f64) -> Result<()> {
        {
            let mut surface = self.surface.borrow_mut();
            let surface = surface.as_mut().ok_or(CanvasError::NotMounted)?;
            surface.dpr = fit_canvas(&surface.canvas, width, height)?;
        }

        let first = self
            .viewport
            .borrow_mut()
            .set_surface(width, height)
            .map_err(|_| CanvasError::InvalidSize { width, height })?;
        debug!(width, height, first, "Surface sized");
        if first && self.viewport.borrow_mut().center_view(now_ms()) {
            self.start_transition();
        }
        self.changed();
        Ok(())
    }

    /// Publishes the current view and schedules a paint.
    pub fn changed(&self) {
        self.refresh();
        self.request_paint();
    }

    pub fn center(&self) {
        if self.viewport.borrow_mut().center_view(now_ms()) {
            self.start_transition();
            self.changed();
        }
    }

    /// World position for a new top-level block.
    #[must_use]
    pub fn add_item_position(&self) -> WorldPoint {
        InputController::add_item_position(&self.viewport.borrow()).unwrap_or_default()
    }

    pub fn wheel(&self, data: WheelEventData) {
        let changed = self.input.borrow().wheel(
            &mut self.viewport.borrow_mut(),
            data.x,
            data.y,
            data.delta_y,
            now_ms(),
        );
        if changed {
            self.changed();
        }
    }

    pub fn pointer_down(&self, data: PointerEventData) {
        if !data.is_primary_button() {
            return;
        }
        let capture = self.input.borrow_mut().pointer_down(
            &self.viewport.borrow(),
            data.pointer_id,
            data.client_x,
            data.client_y,
        );
        self.apply_capture(capture);
    }

    pub fn pointer_move(&self, data: PointerEventData) {
        let changed = self.input.borrow().pointer_move(
            &mut self.viewport.borrow_mut(),
            data.pointer_id,
            data.client_x,
            data.client_y,
            now_ms(),
        );
        if changed {
            self.changed();
        }
    }

    pub fn pointer_up(&self, pointer_id: i32) {
        let capture = self.input.borrow_mut().pointer_up(pointer_id);
        self.apply_capture(capture);
    }

    pub fn pointer_cancel(&self, pointer_id: i32) {
        let capture = self.input.borrow_mut().pointer_cancel(pointer_id);
        self.apply_capture(capture);
    }

    fn apply_capture(&self, capture: Option<Capture>) {
        let surface = self.surface.borrow();
        let (Some(capture), Some(surface)) = (capture, surface.as_ref()) else {
            return;
        };
        let result = match capture {
            Capture::Request(id) => surface.canvas.set_pointer_capture(id),
            Capture::Release(id) => surface.canvas.release_pointer_capture(id),
        };
        if let Err(error) = result {
            debug!(?capture, ?error, "Pointer capture change ignored");
        }
    }

    fn refresh(&self) {
        let snapshot = self.viewport.borrow().snapshot(now_ms());
        self.snapshot.set(snapshot);
        if snapshot.at_edge {
            self.arm_edge_timer();
        }
    }

    /// Repaints once the edge flag is due to clear. Replacing the timer
    /// cancels the previous one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn arm_edge_timer(&self) {
        let Some(deadline) = self.viewport.borrow().edge_deadline() else {
            return;
        };
        let delay = (deadline - now_ms()).ceil().max(0.0) as u32 + 1;
        let this = self.this.clone();
        let timer = Timeout::new(delay, move || {
            if let Some(stage) = this.upgrade() {
                stage.changed();
            }
        });
        *self.edge_timer.borrow_mut() = Some(timer);
    }

    fn is_transitioning(&self) -> bool {
        self.transition
            .borrow()
            .as_ref()
            .is_some_and(AnimationHandle::is_running)
    }

    /// Runs the transition loop, replacing a loop that is still going.
    fn start_transition(&self) {
        if let Some(previous) = self.transition.borrow_mut().take() {
            if let Err(error) = previous.stop() {
                debug!(%error, "Previous transition loop not cancelled");
            }
        }
        let this = self.this.clone();
        let started = run_until(move |timestamp| {
            this.upgrade()
                .is_some_and(|stage| stage.frame(timestamp))
        });
        match started {
            Ok(handle) => *self.transition.borrow_mut() = Some(handle),
            Err(error) => warn!(%error, "Transition loop not started"),
        }
    }

    /// Advances transitions, paints and publishes the view. Returns whether a
    /// transition is still running.
    fn frame(&self, timestamp: f64) -> bool {
        let animating = self.viewport.borrow_mut().advance(timestamp);
        if let Err(error) = self.paint() {
            warn!(%error, "Paint failed");
        }
        self.refresh();
        animating
    }

    fn request_paint(&self) {
        if self.is_transitioning() {
            return;
        }
        let this = self.this.clone();
        let requested = self.scheduler.request(move |timestamp| {
            if let Some(stage) = this.upgrade() {
                stage.frame(timestamp);
            }
        });
        if let Err(error) = requested {
            warn!(%error, "Paint not scheduled");
        }
    }

    fn paint(&self) -> Result<()> {
        let surface = self.surface.borrow();
        let Some(surface) = surface.as_ref() else {
            return Ok(());
        };
        let viewport = self.viewport.borrow();
        let (Some(size), Some(plan)) = (viewport.surface(), RenderPlan::build(&viewport, &[])) else {
            return Ok(());
        };
        paint_grid(&surface.ctx, &plan, surface.dpr, size.width(), size.height())
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn create_canvas() -> Result<HtmlCanvasElement> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(CanvasError::NotMounted)
    }

    #[wasm_bindgen_test]
    async fn test_first_attach_centers_through_frame_loop() -> Result<()> {
        let snapshot = RwSignal::new(ViewSnapshot::default());
        let stage = Stage::new(ViewportConfig::default(), snapshot)
            .map_err(|_| CanvasError::WindowNotAvailable)?;
        stage.attach(create_canvas()?)?;
        assert!(stage.is_transitioning());

        gloo_timers::future::TimeoutFuture::new(1000).await;
        assert!(!stage.is_transitioning());

        let view = snapshot.get_untracked();
        let size = stage
            .viewport
            .borrow()
            .surface()
            .ok_or(CanvasError::NotMounted)?;
        assert!(!view.animating);
        assert!((view.scale - 1.0).abs() < f64::EPSILON);
        assert!((view.translate_x - size.width() / 2.0).abs() < 1e-9);
        assert!((view.translate_y - size.height() / 2.0).abs() < 1e-9);
        Ok(())
    }
}

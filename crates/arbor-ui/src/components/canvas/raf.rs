//! RequestAnimationFrame scheduling
//!
//! [`FrameScheduler`] keeps at most one pending frame: requesting a frame while
//! one is queued cancels the queued one, so bursts of input cost one paint.
//! [`run_until`] builds multi-frame loops on top of it and drives the stage's
//! view transitions. [`animate`] is a standalone single-value tween driver for
//! callers outside the viewport, which animates through its own timeline.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbor_core::animation::{Easing, Tween};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

type FrameCallback = Box<dyn FnOnce(f64)>;

/// RAF scheduling errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RafError {
    /// Failed to get window object
    #[error("failed to get window: window is not available")]
    WindowNotAvailable,

    /// Failed to request animation frame
    #[error("failed to request animation frame: {0}")]
    RequestFailed(String),

    /// Failed to cancel animation frame
    #[error("failed to cancel animation frame: {0}")]
    CancelFailed(String),
}

/// Current time on the same clock as RAF timestamps, in milliseconds.
#[must_use]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

/// Single-slot animation frame scheduler.
#[derive(Clone)]
pub struct FrameScheduler {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
    closure: Rc<Closure<dyn FnMut(f64)>>,
}

impl FrameScheduler {
    /// Creates a scheduler bound to the current window.
    ///
    /// # Errors
    ///
    /// Returns [`RafError::WindowNotAvailable`] outside a browser.
    pub fn new() -> Result<Self, RafError> {
        let window = web_sys::window().ok_or(RafError::WindowNotAvailable)?;
        let pending = Rc::new(Cell::new(None::<i32>));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let closure = {
            let pending = pending.clone();
            let callback = callback.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                pending.set(None);
                let render = callback.borrow_mut().take();
                if let Some(render) = render {
                    render(timestamp);
                }
            }) as Box<dyn FnMut(f64)>)
        };

        Ok(Self {
            window,
            pending,
            callback,
            closure: Rc::new(closure),
        })
    }

    /// Runs `render` on the next animation frame, replacing any frame that is
    /// still queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the queued frame cannot be cancelled or the new one
    /// cannot be requested.
    pub fn request<F>(&self, render: F) -> Result<(), RafError>
    where
        F: FnOnce(f64) + 'static,
    {
        self.cancel()?;
        *self.callback.borrow_mut() = Some(Box::new(render));
        let js: &JsValue = (*self.closure).as_ref();
        let id = self
            .window
            .request_animation_frame(js.unchecked_ref())
            .map_err(|e| RafError::RequestFailed(format!("{e:?}")))?;
        self.pending.set(Some(id));
        Ok(())
    }

    /// Drops the queued frame, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser rejects the cancellation.
    pub fn cancel(&self) -> Result<(), RafError> {
        self.callback.borrow_mut().take();
        if let Some(id) = self.pending.take() {
            self.window
                .cancel_animation_frame(id)
                .map_err(|e| RafError::CancelFailed(format!("{e:?}")))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

/// Handle for a running frame loop
#[derive(Clone)]
pub struct AnimationHandle {
    scheduler: FrameScheduler,
    finished: Rc<Cell<bool>>,
}

impl AnimationHandle {
    /// Stop the loop before its next frame
    ///
    /// # Errors
    ///
    /// Returns error if cancellation fails
    pub fn stop(&self) -> Result<(), RafError> {
        self.finished.set(true);
        self.scheduler.cancel()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.finished.get()
    }
}

/// Calls `step` with the frame timestamp every frame until it returns `false`.
///
/// # Errors
///
/// Returns an error if the first frame cannot be scheduled.
pub fn run_until<F>(step: F) -> Result<AnimationHandle, RafError>
where
    F: FnMut(f64) -> bool + 'static,
{
    let handle = AnimationHandle {
        scheduler: FrameScheduler::new()?,
        finished: Rc::new(Cell::new(false)),
    };
    schedule_step(&handle, Rc::new(RefCell::new(step)))?;
    Ok(handle)
}

fn schedule_step<F>(handle: &AnimationHandle, step: Rc<RefCell<F>>) -> Result<(), RafError>
where
    F: FnMut(f64) -> bool + 'static,
{
    let next = handle.clone();
    handle.scheduler.request(move |timestamp| {
        if next.finished.get() {
            return;
        }
        let keep_going = {
            let mut step_fn = step.borrow_mut();
            (*step_fn)(timestamp)
        };
        if !keep_going {
            next.finished.set(true);
            return;
        }
        if let Err(error) = schedule_step(&next, step) {
            tracing::warn!(%error, "Animation loop stopped");
            next.finished.set(true);
        }
    })
}

/// Eases from `start` to `end`, calling `on_update` once per frame.
///
/// The clock starts at the first frame. The last call receives exactly `end`.
///
/// # Errors
///
/// Returns an error if the first frame cannot be scheduled.
pub fn animate<F>(
    start: f64,
    end: f64,
    on_update: F,
    duration_ms: f64,
    easing: Easing,
) -> Result<AnimationHandle, RafError>
where
    F: Fn(f64) + 'static,
{
    let mut tween: Option<Tween> = None;
    run_until(move |timestamp| {
        let current = *tween.get_or_insert_with(|| {
            Tween::new(start, end, timestamp)
                .duration(duration_ms)
                .easing(easing)
        });
        let sample = current.sample(timestamp);
        on_update(sample.value);
        !sample.finished
    })
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_request_keeps_single_pending_frame() -> Result<(), RafError> {
        let scheduler = FrameScheduler::new()?;
        let calls = Rc::new(Cell::new(0_u32));

        for _ in 0..5 {
            let calls = calls.clone();
            scheduler.request(move |_| calls.set(calls.get() + 1))?;
            assert!(scheduler.is_pending());
        }

        scheduler.cancel()?;
        assert!(!scheduler.is_pending());
        assert_eq!(calls.get(), 0);
        Ok(())
    }

    #[wasm_bindgen_test]
    async fn test_coalesced_requests_render_once() -> Result<(), RafError> {
        let scheduler = FrameScheduler::new()?;
        let calls = Rc::new(Cell::new(0_u32));
        for _ in 0..3 {
            let calls = calls.clone();
            scheduler.request(move |_| calls.set(calls.get() + 1))?;
        }

        gloo_timers::future::TimeoutFuture::new(100).await;
        assert_eq!(calls.get(), 1);
        assert!(!scheduler.is_pending());
        Ok(())
    }

    #[wasm_bindgen_test]
    async fn test_animate_reaches_end() -> Result<(), RafError> {
        let last = Rc::new(Cell::new(f64::NAN));
        let seen = last.clone();
        let handle = animate(0.0, 10.0, move |v| seen.set(v), 50.0, Easing::EaseInOut)?;

        gloo_timers::future::TimeoutFuture::new(300).await;
        assert!(!handle.is_running());
        assert!((last.get() - 10.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[wasm_bindgen_test]
    fn test_stop_is_idempotent() -> Result<(), RafError> {
        let handle = run_until(|_| true)?;
        handle.stop()?;
        handle.stop()?;
        assert!(!handle.is_running());
        Ok(())
    }
}

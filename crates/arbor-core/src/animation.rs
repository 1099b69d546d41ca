//! Time-bounded value interpolation.
//!
//! A [`Tween`] maps a timestamp (milliseconds, same clock as
//! `performance.now()`) to an eased value between two endpoints. A
//! [`Timeline`] keeps one running tween per key and is advanced once per
//! display-refresh tick by the host. Starting a tween on a key that is already
//! animating replaces the running one, so overlapping transitions never race.

use serde::{Deserialize, Serialize};

/// Default transition length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
#[inline]
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Ease-in-out (slow start and end), the default for view transitions.
#[inline]
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Named easing curves, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Returns the easing function for this curve.
    #[must_use]
    pub fn as_fn(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
        }
    }

    /// Applies the curve to a progress value.
    #[inline]
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        (self.as_fn())(t)
    }
}

/// One sampled frame of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    /// Interpolated value for this frame
    pub value: f64,
    /// Linear progress in [0, 1]
    pub progress: f64,
    /// True once progress has reached 1
    pub finished: bool,
}

/// Interpolation of a single value from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: f64,
    end: f64,
    started_at: f64,
    duration_ms: f64,
    easing: Easing,
}

impl Tween {
    /// Creates a tween with the default duration and easing.
    #[must_use]
    pub const fn new(start: f64, end: f64, started_at: f64) -> Self {
        Self {
            start,
            end,
            started_at,
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::EaseInOut,
        }
    }

    /// Sets the duration in milliseconds.
    #[must_use]
    pub const fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub const fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub const fn start_value(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub const fn end_value(&self) -> f64 {
        self.end
    }

    /// Linear progress at `now`, clamped to [0, 1].
    ///
    /// A zero, negative or non-finite duration completes immediately.
    #[must_use]
    pub fn progress(&self, now: f64) -> f64 {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return 1.0;
        }
        let raw = (now - self.started_at) / self.duration_ms;
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
    }

    /// Samples the tween at `now`.
    #[must_use]
    pub fn sample(&self, now: f64) -> TweenSample {
        let progress = self.progress(now);
        let finished = progress >= 1.0;
        let value = if finished {
            self.end
        } else {
            self.start + (self.end - self.start) * self.easing.apply(progress)
        };
        TweenSample {
            value,
            progress,
            finished,
        }
    }
}

/// A keyed set of running tweens.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<K> {
    running: Vec<(K, Tween)>,
}

impl<K> Default for Timeline<K> {
    fn default() -> Self {
        Self {
            running: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Timeline<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `tween` on `key`, returning the tween it cancelled, if any.
    pub fn animate(&mut self, key: K, tween: Tween) -> Option<Tween> {
        if let Some(slot) = self.running.iter_mut().find(|(k, _)| *k == key) {
            let cancelled = slot.1;
            slot.1 = tween;
            return Some(cancelled);
        }
        self.running.push((key, tween));
        None
    }

    /// Cancels the tween on `key`. Returns whether one was running.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.running.len();
        self.running.retain(|(k, _)| *k != key);
        before != self.running.len()
    }

    /// Cancels every running tween.
    pub fn clear(&mut self) {
        self.running.clear();
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    #[must_use]
    pub fn is_animating(&self, key: K) -> bool {
        self.running.iter().any(|(k, _)| *k == key)
    }

    /// Samples every running tween at `now`.
    ///
    /// Finished tweens emit their end value once and are then dropped.
    pub fn advance(&mut self, now: f64) -> Vec<(K, f64)> {
        let mut values = Vec::with_capacity(self.running.len());
        self.running.retain(|(key, tween)| {
            let sample = tween.sample(now);
            values.push((*key, sample.value));
            !sample.finished
        });
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_ease_in_out_reference_points() {
        assert!((ease_in_out(0.0) - 0.0).abs() < EPS);
        assert!((ease_in_out(0.25) - 0.125).abs() < EPS);
        assert!((ease_in_out(0.5) - 0.5).abs() < EPS);
        assert!((ease_in_out(0.75) - 0.875).abs() < EPS);
        assert!((ease_in_out(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_easings_clamp_input() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!((easing.apply(-3.0) - 0.0).abs() < EPS);
            assert!((easing.apply(7.0) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_easings_are_monotonic() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            let mut previous = easing.apply(0.0);
            for step in 1..=100 {
                let current = easing.apply(f64::from(step) / 100.0);
                assert!(current >= previous, "{easing:?} decreased at step {step}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_tween_samples_endpoints() {
        let tween = Tween::new(10.0, 20.0, 1000.0);

        let first = tween.sample(1000.0);
        assert!((first.value - 10.0).abs() < EPS);
        assert!(!first.finished);

        let middle = tween.sample(1250.0);
        assert!((middle.progress - 0.5).abs() < EPS);
        assert!((middle.value - 15.0).abs() < EPS);

        let last = tween.sample(1500.0);
        assert!(last.finished);
        assert!((last.value - 20.0).abs() < EPS);

        let late = tween.sample(9000.0);
        assert!(late.finished);
        assert!((late.value - 20.0).abs() < EPS);
    }

    #[test]
    fn test_tween_before_start_clamps_to_zero() {
        let tween = Tween::new(1.0, 2.0, 500.0);
        assert!((tween.progress(100.0) - 0.0).abs() < EPS);
        assert!((tween.sample(100.0).value - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let tween = Tween::new(0.0, 4.0, 0.0).duration(0.0);
        let sample = tween.sample(0.0);
        assert!(sample.finished);
        assert!((sample.value - 4.0).abs() < EPS);
    }

    #[test]
    fn test_timeline_replaces_running_tween() {
        let mut timeline = Timeline::new();
        assert!(timeline.animate('x', Tween::new(0.0, 10.0, 0.0)).is_none());

        let cancelled = timeline.animate('x', Tween::new(5.0, -5.0, 100.0));
        assert_eq!(cancelled.map(|t| t.end_value()), Some(10.0));

        let values = timeline.advance(100.0);
        assert_eq!(values, vec![('x', 5.0)]);
    }

    #[test]
    fn test_timeline_drops_finished_after_final_value() {
        let mut timeline = Timeline::new();
        timeline.animate(1_u8, Tween::new(0.0, 1.0, 0.0).duration(100.0));
        timeline.animate(2_u8, Tween::new(0.0, 1.0, 0.0).duration(300.0));

        let values = timeline.advance(150.0);
        assert_eq!(values.len(), 2);
        assert!(values.contains(&(1, 1.0)));
        assert!(!timeline.is_animating(1));
        assert!(timeline.is_animating(2));

        let values = timeline.advance(400.0);
        assert_eq!(values, vec![(2, 1.0)]);
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_timeline_cancel() {
        let mut timeline = Timeline::new();
        timeline.animate("scale", Tween::new(3.0, 1.0, 0.0));
        assert!(timeline.cancel("scale"));
        assert!(!timeline.cancel("scale"));
        assert!(timeline.advance(250.0).is_empty());
    }

    #[test]
    fn test_easing_deserializes_from_kebab_case() {
        let easing: Easing = serde_json::from_str("\"ease-out\"").unwrap_or_default();
        assert_eq!(easing, Easing::EaseOut);
    }
}

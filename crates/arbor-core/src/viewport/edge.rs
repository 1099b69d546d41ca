//! Transient "at edge" indicator.
//!
//! Raised whenever a clamp moves the translate; it stays raised until
//! `hold_ms` after the most recent hit. A new hit pushes the deadline out
//! instead of stacking another timer.

/// Default hold time after the last edge hit, in milliseconds.
pub const DEFAULT_EDGE_HOLD_MS: f64 = 450.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFlag {
    hold_ms: f64,
    until: Option<f64>,
}

impl EdgeFlag {
    #[must_use]
    pub const fn new(hold_ms: f64) -> Self {
        Self {
            hold_ms,
            until: None,
        }
    }

    /// Records an edge hit at `now`.
    pub fn trigger(&mut self, now: f64) {
        self.until = Some(now + self.hold_ms);
    }

    #[must_use]
    pub fn is_active(&self, now: f64) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Time at which the flag clears, if raised.
    #[must_use]
    pub const fn deadline(&self) -> Option<f64> {
        self.until
    }

    /// Drops an expired deadline. Returns whether the flag was lowered.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for EdgeFlag {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_HOLD_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_clears_after_hold() {
        let mut flag = EdgeFlag::default();
        assert!(!flag.is_active(0.0));

        flag.trigger(1000.0);
        assert!(flag.is_active(1000.0));
        assert!(flag.is_active(1449.0));
        assert!(!flag.is_active(1450.0));
    }

    #[test]
    fn test_new_hit_restarts_timer() {
        let mut flag = EdgeFlag::default();
        flag.trigger(0.0);
        flag.trigger(300.0);

        assert!(flag.is_active(600.0));
        assert_eq!(flag.deadline(), Some(750.0));
        assert!(!flag.is_active(750.0));
    }

    #[test]
    fn test_expire_only_after_deadline() {
        let mut flag = EdgeFlag::new(100.0);
        flag.trigger(0.0);
        assert!(!flag.expire(50.0));
        assert!(flag.expire(100.0));
        assert_eq!(flag.deadline(), None);
        assert!(!flag.expire(200.0));
    }
}

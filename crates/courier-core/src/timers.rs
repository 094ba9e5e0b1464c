//! Deferred Checks
//!
//! One-shot timestamp comparisons polled every tick. Arrest release, TTL
//! expiry, cooldown windows and crash recovery are all built from these, so
//! every wait is plain data and advancing the clock is enough to test them.

/// A scheduled one-shot check.
///
/// `poll` returns true exactly once, on the first call where the clock has
/// moved strictly past the due time.
///
/// ```
/// use courier_core::timers::DeferredCheck;
///
/// let mut check = DeferredCheck::idle();
/// check.schedule(0.0, 10.0);
/// assert!(!check.poll(10.0));
/// assert!(check.poll(10.01));
/// assert!(!check.poll(11.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeferredCheck {
    due_at: Option<f32>,
    fired: bool,
}

impl DeferredCheck {
    /// A check with nothing scheduled.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Schedules the check `delay` seconds after `now`, replacing any
    /// previous schedule.
    pub fn schedule(&mut self, now: f32, delay: f32) {
        self.schedule_at(now + delay);
    }

    /// Schedules the check at an absolute time.
    pub fn schedule_at(&mut self, due_at: f32) {
        self.due_at = Some(due_at);
        self.fired = false;
    }

    /// Clears the schedule so a stale check can never fire.
    pub fn cancel(&mut self) {
        self.due_at = None;
        self.fired = false;
    }

    /// Returns true the first time `now` is past the due time.
    pub fn poll(&mut self, now: f32) -> bool {
        match self.due_at {
            Some(due) if !self.fired && now > due => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some() && !self.fired
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn due_at(&self) -> Option<f32> {
        self.due_at
    }

    /// Seconds until the check is due, if it is still pending.
    pub fn remaining(&self, now: f32) -> Option<f32> {
        if !self.is_pending() {
            return None;
        }
        self.due_at.map(|due| (due - now).max(0.0))
    }
}

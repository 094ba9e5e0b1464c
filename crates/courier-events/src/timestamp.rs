//! Simulation Timestamp Types
//!
//! Simulation time is counted both in ticks (one per frame) and in simulated
//! seconds. Timers compare seconds; logs carry both.
//!
//! # Example
//!
//! ```
//! use courier_events::SimTimestamp;
//!
//! let ts = SimTimestamp::new(120, 2.0);
//! assert_eq!(ts.tick, 120);
//! assert_eq!(ts.to_string(), "tick_120@2.00s");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimTimestamp {
    /// Number of ticks since the run started
    pub tick: u64,
    /// Simulated seconds since the run started
    pub seconds: f32,
}

impl SimTimestamp {
    /// Creates a new timestamp.
    pub fn new(tick: u64, seconds: f32) -> Self {
        Self { tick, seconds }
    }

    /// Timestamp at the start of a run.
    pub fn start() -> Self {
        Self::default()
    }

    /// Returns the timestamp one tick later, `dt` seconds ahead.
    pub fn advanced(self, dt: f32) -> Self {
        Self {
            tick: self.tick + 1,
            seconds: self.seconds + dt,
        }
    }

    /// Seconds elapsed since an earlier timestamp (never negative).
    pub fn seconds_since(&self, earlier: &SimTimestamp) -> f32 {
        (self.seconds - earlier.seconds).max(0.0)
    }
}

impl fmt::Display for SimTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick_{}@{:.2}s", self.tick, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_zero() {
        let ts = SimTimestamp::start();
        assert_eq!(ts.tick, 0);
        assert_eq!(ts.seconds, 0.0);
    }

    #[test]
    fn test_advanced() {
        let ts = SimTimestamp::start().advanced(0.5).advanced(0.5);
        assert_eq!(ts.tick, 2);
        assert!((ts.seconds - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_seconds_since_clamps() {
        let early = SimTimestamp::new(10, 5.0);
        let late = SimTimestamp::new(20, 7.5);
        assert_eq!(late.seconds_since(&early), 2.5);
        assert_eq!(early.seconds_since(&late), 0.0);
    }

    #[test]
    fn test_serialization() {
        let ts = SimTimestamp::new(3, 0.25);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, r#"{"tick":3,"seconds":0.25}"#);
    }
}

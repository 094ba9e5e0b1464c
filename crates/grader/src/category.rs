//! A single weighted grading category.

use serde::{Deserialize, Serialize};

/// Exponent base used by zero-target, lower-is-better categories unless the
/// category overrides it.
pub const DEFAULT_PENALTY_EXPONENT: f32 = 0.95;

/// One line of the grading table.
///
/// Categories carry no identity between passes; they are rebuilt from the
/// current telemetry every time a run is graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCategory {
    pub name: String,
    /// Share of the total score, in percent
    pub weight_percent: i32,
    pub target_value: f32,
    pub current_value: f32,
    /// Higher is better when true, lower is better when false
    pub target_is_high: bool,
    /// Decay base for lower-is-better categories with a zero target
    pub penalty_exponent: f32,
}

impl ScoreCategory {
    /// Creates a higher-is-better category.
    pub fn high(name: impl Into<String>, weight_percent: i32, target: f32, current: f32) -> Self {
        Self {
            name: name.into(),
            weight_percent,
            target_value: target,
            current_value: current,
            target_is_high: true,
            penalty_exponent: DEFAULT_PENALTY_EXPONENT,
        }
    }

    /// Creates a lower-is-better category.
    pub fn low(name: impl Into<String>, weight_percent: i32, target: f32, current: f32) -> Self {
        Self {
            name: name.into(),
            weight_percent,
            target_value: target,
            current_value: current,
            target_is_high: false,
            penalty_exponent: DEFAULT_PENALTY_EXPONENT,
        }
    }

    /// Overrides the decay base.
    pub fn with_penalty_exponent(mut self, exponent: f32) -> Self {
        self.penalty_exponent = exponent;
        self
    }

    /// Points earned by this category, rounded half-to-even.
    ///
    /// A category that meets its target earns its full weight. Otherwise a
    /// higher-is-better category earns `weight * current / target`; a
    /// lower-is-better one earns `weight * target / current`, or
    /// `weight * exponent^current` when the target is zero.
    pub fn score(&self) -> i32 {
        let weight = self.weight_percent as f32;
        let target = self.target_value;
        let current = self.current_value;

        let raw = if self.target_is_high {
            if current >= target {
                weight
            } else {
                weight * (current / target)
            }
        } else if current <= target {
            weight
        } else if target == 0.0 {
            weight * self.penalty_exponent.powf(current)
        } else {
            weight * (target / current)
        };

        raw.round_ties_even() as i32
    }
}

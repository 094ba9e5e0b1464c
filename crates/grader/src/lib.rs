//! Run grading: weighted categories to a number and a letter.
//!
//! A grading pass takes a fresh set of [`ScoreCategory`] values built from
//! run telemetry, checks that their weights add up to 100, scores each one
//! and maps the total onto a fixed letter table.
//!
//! # Modules
//!
//! - [`category`]: A single weighted category and its scoring rule
//! - [`scorer`]: The grading pass and the letter table
//! - [`config`]: TOML-backed category table and telemetry inputs

pub mod category;
pub mod config;
pub mod scorer;

pub use category::{ScoreCategory, DEFAULT_PENALTY_EXPONENT};
pub use config::{
    default_config_toml, CategoryConfig, ConfigError, GradeInputs, GradingConfig, Metric,
};
pub use scorer::{calculate_score, letter_for, Grade, GradeError, GRADE_THRESHOLDS};

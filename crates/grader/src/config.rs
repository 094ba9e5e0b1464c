//! Grading configuration.
//!
//! The category table is loaded from TOML. Each entry names the telemetry
//! metric it reads, so a table can be rebalanced without code changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::category::{ScoreCategory, DEFAULT_PENALTY_EXPONENT};
use crate::scorer::{calculate_score, Grade, GradeError};

/// Errors loading or writing a grading table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Run statistic a category reads its current value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Average final health of delivered packages
    PackageHealth,
    /// Player health at the end of the run
    PlayerHealth,
    /// Attempt duration in seconds
    CompletionTime,
    /// Times the player was arrested
    PolicePullovers,
    /// Collisions of any kind
    Collisions,
    /// Packages stolen by bandits
    BanditSteals,
}

/// Telemetry values a grading pass draws on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeInputs {
    pub package_health: f32,
    pub player_health: f32,
    pub completion_time: f32,
    pub police_pullovers: f32,
    pub collisions: f32,
    pub bandit_steals: f32,
}

impl GradeInputs {
    /// Value of one metric.
    pub fn value(&self, metric: Metric) -> f32 {
        match metric {
            Metric::PackageHealth => self.package_health,
            Metric::PlayerHealth => self.player_health,
            Metric::CompletionTime => self.completion_time,
            Metric::PolicePullovers => self.police_pullovers,
            Metric::Collisions => self.collisions,
            Metric::BanditSteals => self.bandit_steals,
        }
    }
}

fn default_penalty_exponent() -> f32 {
    DEFAULT_PENALTY_EXPONENT
}

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub metric: Metric,
    pub weight_percent: i32,
    #[serde(default)]
    pub target_value: f32,
    #[serde(default = "default_high")]
    pub target_is_high: bool,
    #[serde(default = "default_penalty_exponent")]
    pub penalty_exponent: f32,
}

fn default_high() -> bool {
    true
}

impl CategoryConfig {
    /// Builds a category carrying the current value of its metric.
    pub fn to_category(&self, inputs: &GradeInputs) -> ScoreCategory {
        ScoreCategory {
            name: self.name.clone(),
            weight_percent: self.weight_percent,
            target_value: self.target_value,
            current_value: inputs.value(self.metric),
            target_is_high: self.target_is_high,
            penalty_exponent: self.penalty_exponent,
        }
    }
}

/// The category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig {
            name: "Package Health".to_string(),
            metric: Metric::PackageHealth,
            weight_percent: 25,
            target_value: 100.0,
            target_is_high: true,
            penalty_exponent: DEFAULT_PENALTY_EXPONENT,
        },
        CategoryConfig {
            name: "Player Health".to_string(),
            metric: Metric::PlayerHealth,
            weight_percent: 25,
            target_value: 100.0,
            target_is_high: true,
            penalty_exponent: DEFAULT_PENALTY_EXPONENT,
        },
        CategoryConfig {
            name: "Completion Time".to_string(),
            metric: Metric::CompletionTime,
            weight_percent: 25,
            target_value: 0.0,
            target_is_high: false,
            penalty_exponent: 0.999,
        },
        CategoryConfig {
            name: "Police Pullovers".to_string(),
            metric: Metric::PolicePullovers,
            weight_percent: 25,
            target_value: 0.0,
            target_is_high: false,
            penalty_exponent: 0.95,
        },
    ]
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl GradingConfig {
    /// Loads a table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses a table from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the table to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Sum of every category weight.
    pub fn weight_total(&self) -> i32 {
        self.categories.iter().map(|c| c.weight_percent).sum()
    }

    /// Builds a fresh category set for one grading pass.
    pub fn build_categories(&self, inputs: &GradeInputs) -> Vec<ScoreCategory> {
        self.categories
            .iter()
            .map(|c| c.to_category(inputs))
            .collect()
    }

    /// Grades a run.
    pub fn grade(&self, inputs: &GradeInputs) -> Result<Grade, GradeError> {
        calculate_score(&self.build_categories(inputs))
    }
}

/// Returns the default category table as a commented TOML template.
pub fn default_config_toml() -> &'static str {
    r#"# Grading table
#
# Weights must add up to 100. A lower-is-better category with a zero target
# decays as weight * penalty_exponent ^ current.
#
# metric: package_health | player_health | completion_time |
#         police_pullovers | collisions | bandit_steals

[[categories]]
name = "Package Health"
metric = "package_health"
weight_percent = 25
target_value = 100.0
target_is_high = true

[[categories]]
name = "Player Health"
metric = "player_health"
weight_percent = 25
target_value = 100.0
target_is_high = true

[[categories]]
name = "Completion Time"
metric = "completion_time"
weight_percent = 25
target_value = 0.0
target_is_high = false
penalty_exponent = 0.999

[[categories]]
name = "Police Pullovers"
metric = "police_pullovers"
weight_percent = 25
target_value = 0.0
target_is_high = false
penalty_exponent = 0.95
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_events::LetterGrade;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed = GradingConfig::from_str(default_config_toml()).unwrap();
        assert_eq!(parsed, GradingConfig::default());
        assert_eq!(parsed.weight_total(), 100);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let parsed = GradingConfig::from_str("").unwrap();
        assert_eq!(parsed.categories.len(), 4);
    }

    #[test]
    fn test_custom_table() {
        let toml = r#"
[[categories]]
name = "Collisions"
metric = "collisions"
weight_percent = 60
target_is_high = false

[[categories]]
name = "Package Health"
metric = "package_health"
weight_percent = 40
target_value = 100.0
"#;
        let config = GradingConfig::from_str(toml).unwrap();
        assert_eq!(config.categories[0].penalty_exponent, DEFAULT_PENALTY_EXPONENT);
        assert!(config.categories[1].target_is_high);

        let inputs = GradeInputs {
            package_health: 100.0,
            ..Default::default()
        };
        let grade = config.grade(&inputs).unwrap();
        assert_eq!(grade.total, 100);
        assert_eq!(grade.letter, LetterGrade::S);
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let toml = r#"
[[categories]]
name = "Style"
metric = "style_points"
weight_percent = 100
"#;
        assert!(matches!(
            GradingConfig::from_str(toml),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let config = GradingConfig::default();
        let toml = config.to_toml().unwrap();
        let parsed = GradingConfig::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_default_grade_perfect_run() {
        let inputs = GradeInputs {
            package_health: 100.0,
            player_health: 100.0,
            ..Default::default()
        };
        let grade = GradingConfig::default().grade(&inputs).unwrap();
        assert_eq!(grade.total, 100);
        assert_eq!(grade.letter, LetterGrade::S);
    }
}

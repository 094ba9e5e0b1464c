//! Configuration loading for the simulation.
//!
//! Every tunable lives in one TOML file. All sections and fields are
//! optional; a partial file overrides only the keys it names.

use grader::GradingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::npc::vision::VisionQuery;

/// Errors loading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub vision: VisionConfig,
    pub bandit: BanditConfig,
    pub police: PoliceConfig,
    pub wander: WanderConfig,
    pub cooldown: CooldownConfig,
    pub package: PackageConfig,
    pub player: PlayerConfig,
    pub collision: CollisionConfig,
    pub telemetry: TelemetryConfig,
    pub grading: GradingConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Vision test shared by bandits and police.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Minimum forward dot product for a target to be in view
    pub fov_min: f32,
    /// Targets this close are always visible
    pub range_min: f32,
    /// Targets further than this are never visible
    pub range_max: f32,
    /// Require an unobstructed ray to the target
    pub line_of_sight: bool,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            fov_min: 0.25,
            range_min: 10.0,
            range_max: 50.0,
            line_of_sight: true,
        }
    }
}

impl VisionConfig {
    /// Builds the vision query these settings describe.
    pub fn query(&self) -> VisionQuery {
        let query = VisionQuery::new()
            .with_fov(self.fov_min)
            .with_range(self.range_min, self.range_max);
        if self.line_of_sight {
            query.with_line_of_sight()
        } else {
            query
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditConfig {
    pub chase_speed: f32,
    pub flee_speed: f32,
    pub attack_range: f32,
    /// How far a fleeing bandit looks for its next waypoint
    pub flee_radius: f32,
    /// Chance per waypoint of heading for an HQ instead
    pub secure_package_chance: f32,
    /// Knockback impulse per unit of bandit speed
    pub knockback_scale: f32,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            chase_speed: 14.0,
            flee_speed: 14.0,
            attack_range: 4.0,
            flee_radius: 40.0,
            secure_package_chance: 0.33,
            knockback_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliceConfig {
    /// Player speed above which police give chase
    pub speed_limit: f32,
    pub chase_speed: f32,
    pub attack_range: f32,
    /// Seconds the player is held after an arrest
    pub arrest_duration: f32,
}

impl Default for PoliceConfig {
    fn default() -> Self {
        Self {
            speed_limit: 15.0,
            chase_speed: 18.0,
            attack_range: 4.0,
            arrest_duration: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub radius: f32,
    pub speed: f32,
    /// Consecutive wrong-way paths tolerated before traffic rules are waived
    pub traffic_patience: u32,
    /// Remaining distance that counts as arrived
    pub arrival_distance: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            speed: 8.0,
            traffic_patience: 5,
            arrival_distance: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    pub apprehended: f32,
    pub engine_failure: f32,
    /// Seconds before the end of an engine failure that the startup cue fires
    pub startup_cue_lead: f32,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            apprehended: 10.0,
            engine_failure: 10.0,
            startup_cue_lead: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub max_health: f32,
    /// Seconds a package may stay collected without being delivered
    pub ttl_after_pickup: f32,
    pub delivery_radius: f32,
    pub pickup_radius: f32,
    /// Fraction of player collision damage passed on to carried packages
    pub collision_damage_scale: f32,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            ttl_after_pickup: 120.0,
            delivery_radius: 5.0,
            pickup_radius: 3.0,
            collision_damage_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Impacts at or below this force do no damage
    pub min_hit_force: f32,
    pub hit_force_scale: f32,
    pub max_hit_damage: f32,
    /// Seconds after a hit during which further hits are ignored
    pub hit_debounce: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            min_hit_force: 10.0,
            hit_force_scale: 0.25,
            max_hit_damage: 40.0,
            hit_debounce: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Impulse above which an NPC stalls
    pub crash_impulse: f32,
    /// Seconds an NPC's navigation stays disabled after a crash
    pub crash_recovery: f32,
    /// Radius of a bandit HQ drop-off
    pub hq_radius: f32,
    /// Radius of a delivery location
    pub delivery_zone_radius: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            crash_impulse: 20.0,
            crash_recovery: 3.0,
            hq_radius: 6.0,
            delivery_zone_radius: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Seconds between player speed and health samples
    pub sample_interval: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sample_interval: 1.0,
        }
    }
}

/// Returns the default configuration as a commented TOML template.
pub fn default_config_toml() -> &'static str {
    r#"# Courier simulation configuration
# Every key is optional; missing keys take the values shown here.

[vision]
fov_min = 0.25
range_min = 10.0
range_max = 50.0
line_of_sight = true

[bandit]
chase_speed = 14.0
flee_speed = 14.0
attack_range = 4.0
flee_radius = 40.0
secure_package_chance = 0.33
knockback_scale = 2.0

[police]
speed_limit = 15.0
chase_speed = 18.0
attack_range = 4.0
arrest_duration = 5.0

[wander]
radius = 30.0
speed = 8.0
traffic_patience = 5
arrival_distance = 0.1

[cooldown]
apprehended = 10.0
engine_failure = 10.0
startup_cue_lead = 2.0

[package]
max_health = 100.0
ttl_after_pickup = 120.0
delivery_radius = 5.0
pickup_radius = 3.0
collision_damage_scale = 1.0

[player]
max_health = 100.0
min_hit_force = 10.0
hit_force_scale = 0.25
max_hit_damage = 40.0
hit_debounce = 0.5

[collision]
crash_impulse = 20.0
crash_recovery = 3.0
hq_radius = 6.0
delivery_zone_radius = 8.0

[telemetry]
sample_interval = 1.0

# Grading table. Weights must add up to 100.
[[grading.categories]]
name = "Package Health"
metric = "package_health"
weight_percent = 25
target_value = 100.0
target_is_high = true

[[grading.categories]]
name = "Player Health"
metric = "player_health"
weight_percent = 25
target_value = 100.0
target_is_high = true

[[grading.categories]]
name = "Completion Time"
metric = "completion_time"
weight_percent = 25
target_value = 0.0
target_is_high = false
penalty_exponent = 0.999

[[grading.categories]]
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

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed = SimConfig::from_str(default_config_toml()).unwrap();
        assert_eq!(parsed, SimConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let toml = r#"
[police]
arrest_duration = 8.0

[vision]
line_of_sight = false
"#;
        let config = SimConfig::from_str(toml).unwrap();
        assert_eq!(config.police.arrest_duration, 8.0);
        assert_eq!(config.police.speed_limit, 15.0);
        assert!(!config.vision.line_of_sight);
        assert_eq!(config.vision.fov_min, 0.25);
        assert_eq!(config.bandit, BanditConfig::default());
        assert_eq!(config.grading.weight_total(), 100);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut config = SimConfig::default();
        config.package.ttl_after_pickup = 45.0;
        let toml = config.to_toml().unwrap();
        let parsed = SimConfig::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_bad_type_rejected() {
        let result = SimConfig::from_str("[wander]\ntraffic_patience = \"lots\"\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_vision_query_from_config() {
        let query = VisionConfig::default().query();
        assert_eq!(query.fov_min, Some(0.25));
        assert_eq!(query.range_min, Some(10.0));
        assert_eq!(query.range_max, Some(50.0));
        assert!(query.line_of_sight);
    }
}

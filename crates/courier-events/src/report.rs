//! Run Report
//!
//! The fixed set of statistics reported when a run terminates. Transport is
//! somebody else's problem; this is just the snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::SessionId;
use crate::types::{LetterGrade, TerminatingState};

/// Score earned by one grading category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub weight_percent: i32,
    pub current_value: f32,
    pub score: i32,
}

/// Statistics for a single attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Spans multiple attempts
    pub session_id: SessionId,
    /// Unique per attempt
    pub attempt_id: String,
    pub terminating_state: TerminatingState,
    /// `I` unless the run was won and graded
    pub final_letter_grade: LetterGrade,
    /// -1 unless the run was won and graded
    pub final_number_grade: i32,
    #[serde(default)]
    pub category_scores: Vec<CategoryScore>,
    pub final_package_health: f32,
    pub final_player_health: f32,
    pub avg_player_health: f32,
    pub avg_speed: f32,
    pub attempt_duration_seconds: f32,
    pub num_bandit_steals: u32,
    pub num_reclaimed_packages: u32,
    pub num_destroyed_packages: u32,
    pub num_delivered_packages: u32,
    pub num_bandit_chases: u32,
    pub num_police_chases: u32,
    pub num_civilian_collisions: u32,
    pub num_bandit_collisions: u32,
    pub num_police_collisions: u32,
    pub num_collisions: u32,
    pub num_times_pulled_over: u32,
    pub total_damage_taken: f32,
}

impl RunReport {
    /// Creates an empty report for an attempt.
    pub fn new(session_id: SessionId, attempt_id: impl Into<String>) -> Self {
        Self {
            session_id,
            attempt_id: attempt_id.into(),
            terminating_state: TerminatingState::Quit,
            final_letter_grade: LetterGrade::I,
            final_number_grade: -1,
            category_scores: Vec::new(),
            final_package_health: 0.0,
            final_player_health: 0.0,
            avg_player_health: 0.0,
            avg_speed: 0.0,
            attempt_duration_seconds: 0.0,
            num_bandit_steals: 0,
            num_reclaimed_packages: 0,
            num_destroyed_packages: 0,
            num_delivered_packages: 0,
            num_bandit_chases: 0,
            num_police_chases: 0,
            num_civilian_collisions: 0,
            num_bandit_collisions: 0,
            num_police_collisions: 0,
            num_collisions: 0,
            num_times_pulled_over: 0,
            total_damage_taken: 0.0,
        }
    }

    /// Returns true if the run was graded.
    pub fn is_graded(&self) -> bool {
        self.final_letter_grade != LetterGrade::I
    }

    /// Flattens the report into plain key/value pairs.
    ///
    /// Category scores appear as `category.<name>` with spaces replaced by
    /// underscores and the name lowercased.
    pub fn to_key_values(&self) -> BTreeMap<String, String> {
        let mut kv = BTreeMap::new();
        let mut put = |k: &str, v: String| {
            kv.insert(k.to_string(), v);
        };

        put("session_id", self.session_id.to_string());
        put("attempt_id", self.attempt_id.clone());
        put("terminating_state", self.terminating_state.to_string());
        put("final_letter_grade", self.final_letter_grade.to_string());
        put("final_number_grade", self.final_number_grade.to_string());
        put("final_package_health", format!("{:.2}", self.final_package_health));
        put("final_player_health", format!("{:.2}", self.final_player_health));
        put("avg_player_health", format!("{:.2}", self.avg_player_health));
        put("avg_speed", format!("{:.2}", self.avg_speed));
        put(
            "attempt_duration_seconds",
            format!("{:.2}", self.attempt_duration_seconds),
        );
        put("num_bandit_steals", self.num_bandit_steals.to_string());
        put("num_reclaimed_packages", self.num_reclaimed_packages.to_string());
        put("num_destroyed_packages", self.num_destroyed_packages.to_string());
        put("num_delivered_packages", self.num_delivered_packages.to_string());
        put("num_bandit_chases", self.num_bandit_chases.to_string());
        put("num_police_chases", self.num_police_chases.to_string());
        put("num_civilian_collisions", self.num_civilian_collisions.to_string());
        put("num_bandit_collisions", self.num_bandit_collisions.to_string());
        put("num_police_collisions", self.num_police_collisions.to_string());
        put("num_collisions", self.num_collisions.to_string());
        put("num_times_pulled_over", self.num_times_pulled_over.to_string());
        put("total_damage_taken", format!("{:.2}", self.total_damage_taken));

        for category in &self.category_scores {
            let key = format!(
                "category.{}",
                category.name.to_lowercase().replace(' ', "_")
            );
            put(&key, category.score.to_string());
        }

        kv
    }
}

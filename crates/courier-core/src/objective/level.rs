//! Level Objective
//!
//! "Finish the level". Its own predicates are trivially satisfied, so the
//! outcome is decided entirely by its package prerequisites.

use courier_events::{Notification, ObjectiveId, ObjectiveStatus, PrereqOperator};
use tracing::info;

use super::{
    check_completion, check_failure, reset_status, start, Objective, ObjectiveRecord,
    PrerequisiteReset, PrerequisiteStatus,
};
use crate::notify::Notifier;

#[derive(Debug)]
pub struct Level {
    record: ObjectiveRecord,
    name: String,
    pub events: Notifier<Notification>,
}

impl Level {
    /// Creates a level that completes when every package completes and fails
    /// when every package fails.
    pub fn new(id: ObjectiveId, name: impl Into<String>) -> Self {
        Self {
            record: ObjectiveRecord::new(id)
                .with_completion_op(PrereqOperator::And)
                .with_failure_op(PrereqOperator::And),
            name: name.into(),
            events: Notifier::new(),
        }
    }

    pub fn with_operators(mut self, completion: PrereqOperator, failure: PrereqOperator) -> Self {
        self.record = ObjectiveRecord::new(self.record.id())
            .with_completion_op(completion)
            .with_failure_op(failure);
        self
    }

    pub fn id(&self) -> ObjectiveId {
        self.record.id()
    }

    /// Tracks another package objective.
    pub fn add_prerequisite(&mut self, objective: ObjectiveId) -> bool {
        self.record.add_prerequisite(objective)
    }

    pub fn tracked(&self) -> &[ObjectiveId] {
        self.record.prerequisites()
    }

    pub fn begin(&mut self, now: f32) -> bool {
        start(self, now)
    }

    /// Runs the completion and failure checks against a status source.
    ///
    /// A level that tracks nothing yet is left alone, so it cannot complete
    /// on its first check.
    pub fn evaluate(&mut self, prerequisites: &dyn PrerequisiteStatus, now: f32) -> ObjectiveStatus {
        if self.record.prerequisites().is_empty() {
            return self.status();
        }
        if check_completion(self, prerequisites, now) {
            info!(level = %self.name, elapsed = self.record.duration_at_complete(), "level complete");
        } else if check_failure(self, prerequisites, now) {
            info!(level = %self.name, "level failed");
        }
        self.status()
    }

    /// Resets every tracked package, then the level.
    pub fn reset(&mut self, packages: &mut dyn PrerequisiteReset) {
        reset_status(self, packages);
    }
}

impl Objective for Level {
    fn record(&self) -> &ObjectiveRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut ObjectiveRecord {
        &mut self.record
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Deliver all {} packages", self.record.prerequisites().len())
    }

    fn primary_completion_condition(&self, _now: f32) -> bool {
        true
    }

    fn primary_failure_condition(&self, _now: f32) -> bool {
        false
    }

    fn raise_updated(&mut self, status: ObjectiveStatus) {
        self.events.publish(Notification::ObjectiveUpdated {
            objective: self.record.id(),
            name: self.name.clone(),
            status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::StatusSnapshot;

    fn level_with_three() -> Level {
        let mut level = Level::new(ObjectiveId(0), "Downtown");
        for id in 1..=3 {
            level.add_prerequisite(ObjectiveId(id));
        }
        level.begin(0.0);
        level
    }

    fn snapshot(statuses: [ObjectiveStatus; 3]) -> StatusSnapshot {
        let mut snap = StatusSnapshot::new();
        for (i, status) in statuses.into_iter().enumerate() {
            snap.insert(ObjectiveId(i as u32 + 1), status);
        }
        snap
    }

    #[test]
    fn test_empty_level_stays_in_progress() {
        let mut level = Level::new(ObjectiveId(0), "Empty");
        level.begin(0.0);
        assert_eq!(
            level.evaluate(&StatusSnapshot::new(), 1.0),
            ObjectiveStatus::InProgress
        );
    }

    #[test]
    fn test_and_completion_needs_all_three() {
        use ObjectiveStatus::*;
        let mut level = level_with_three();

        assert_eq!(level.evaluate(&snapshot([Complete, Complete, InProgress]), 1.0), InProgress);
        assert_eq!(level.evaluate(&snapshot([Complete, Failed, Complete]), 2.0), InProgress);
        assert_eq!(level.evaluate(&snapshot([Complete, Complete, Complete]), 3.0), Complete);
    }

    #[test]
    fn test_single_failure_does_not_complete() {
        use ObjectiveStatus::*;
        let mut level = level_with_three();
        assert_eq!(level.evaluate(&snapshot([Failed, InProgress, InProgress]), 1.0), InProgress);
    }

    #[test]
    fn test_and_failure_needs_all_three() {
        use ObjectiveStatus::*;
        let mut level = level_with_three();
        assert_eq!(level.evaluate(&snapshot([Failed, Failed, Complete]), 1.0), InProgress);
        assert_eq!(level.evaluate(&snapshot([Failed, Failed, Failed]), 2.0), Failed);
    }

    #[test]
    fn test_or_failure_level() {
        use ObjectiveStatus::*;
        let mut level = Level::new(ObjectiveId(0), "Fragile")
            .with_operators(PrereqOperator::And, PrereqOperator::Or);
        level.add_prerequisite(ObjectiveId(1));
        level.add_prerequisite(ObjectiveId(2));
        level.begin(0.0);

        let mut snap = StatusSnapshot::new();
        snap.insert(ObjectiveId(1), InProgress);
        snap.insert(ObjectiveId(2), Failed);
        assert_eq!(level.evaluate(&snap, 1.0), Failed);
    }

    #[test]
    fn test_status_notifications() {
        let mut level = level_with_three();
        let notes = level.events.drain_unread();
        assert_eq!(notes.len(), 1);
        assert!(matches!(
            notes[0],
            Notification::ObjectiveUpdated {
                status: ObjectiveStatus::InProgress,
                ..
            }
        ));
    }
}

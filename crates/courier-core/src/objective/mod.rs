//! Objective Lifecycle
//!
//! An objective is a unit of work with a status, timestamps, optional
//! prerequisite objectives and two predicates. Concrete objectives (packages,
//! the level) implement the [`Objective`] hooks and own an
//! [`ObjectiveRecord`]; the lifecycle itself lives in the free functions
//! below and is written only in terms of those hooks.
//!
//! Prerequisites are referenced by id and resolved through
//! [`PrerequisiteStatus`], so an objective never holds pointers to its
//! prerequisites.

pub mod level;
pub mod package;

use courier_events::{ObjectiveId, ObjectiveStatus, PrereqOperator};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub use level::Level;
pub use package::{DeliveryTarget, Package, PackageRoster};

/// Status, timestamps and prerequisite wiring shared by every objective.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveRecord {
    id: ObjectiveId,
    status: ObjectiveStatus,
    start_time: Option<f32>,
    end_time: Option<f32>,
    prerequisites: Vec<ObjectiveId>,
    completion_op: PrereqOperator,
    failure_op: PrereqOperator,
}

impl ObjectiveRecord {
    pub fn new(id: ObjectiveId) -> Self {
        Self {
            id,
            status: ObjectiveStatus::NotStarted,
            start_time: None,
            end_time: None,
            prerequisites: Vec::new(),
            completion_op: PrereqOperator::And,
            failure_op: PrereqOperator::And,
        }
    }

    pub fn with_completion_op(mut self, op: PrereqOperator) -> Self {
        self.completion_op = op;
        self
    }

    pub fn with_failure_op(mut self, op: PrereqOperator) -> Self {
        self.failure_op = op;
        self
    }

    pub fn id(&self) -> ObjectiveId {
        self.id
    }

    pub fn status(&self) -> ObjectiveStatus {
        self.status
    }

    pub fn start_time(&self) -> Option<f32> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<f32> {
        self.end_time
    }

    pub fn prerequisites(&self) -> &[ObjectiveId] {
        &self.prerequisites
    }

    pub fn completion_op(&self) -> PrereqOperator {
        self.completion_op
    }

    pub fn failure_op(&self) -> PrereqOperator {
        self.failure_op
    }

    /// Appends a prerequisite, ignoring duplicates.
    pub fn add_prerequisite(&mut self, id: ObjectiveId) -> bool {
        if id == self.id || self.prerequisites.contains(&id) {
            return false;
        }
        self.prerequisites.push(id);
        true
    }

    /// Seconds since the objective started, 0 if it has not.
    pub fn elapsed_since_start(&self, now: f32) -> f32 {
        self.start_time.map(|start| now - start).unwrap_or(0.0)
    }

    /// Seconds between start and end, 0 unless both are set.
    pub fn duration_at_complete(&self) -> f32 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }
}

/// Hooks a concrete objective provides.
pub trait Objective {
    fn record(&self) -> &ObjectiveRecord;
    fn record_mut(&mut self) -> &mut ObjectiveRecord;
    fn name(&self) -> &str;
    fn description(&self) -> String;
    fn primary_completion_condition(&self, now: f32) -> bool;
    fn primary_failure_condition(&self, now: f32) -> bool;
    /// Called after every status change.
    fn raise_updated(&mut self, status: ObjectiveStatus);

    fn status(&self) -> ObjectiveStatus {
        self.record().status()
    }
}

/// Read access to the status of other objectives.
pub trait PrerequisiteStatus {
    fn status_of(&self, id: ObjectiveId) -> Option<ObjectiveStatus>;
}

/// Reset access to other objectives.
pub trait PrerequisiteReset {
    fn reset_prerequisite(&mut self, id: ObjectiveId);
}

/// Stand-in for objectives without prerequisites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrerequisites;

impl PrerequisiteStatus for NoPrerequisites {
    fn status_of(&self, _id: ObjectiveId) -> Option<ObjectiveStatus> {
        None
    }
}

impl PrerequisiteReset for NoPrerequisites {
    fn reset_prerequisite(&mut self, _id: ObjectiveId) {}
}

/// Frozen copy of objective statuses, taken before a grading or level pass
/// so the pass never sees the roster change underneath it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    statuses: BTreeMap<ObjectiveId, ObjectiveStatus>,
}

impl StatusSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ObjectiveId, status: ObjectiveStatus) {
        self.statuses.insert(id, status);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Returns true if every captured objective is terminal.
    pub fn all_terminal(&self) -> bool {
        self.statuses.values().all(|s| s.is_terminal())
    }
}

impl PrerequisiteStatus for StatusSnapshot {
    fn status_of(&self, id: ObjectiveId) -> Option<ObjectiveStatus> {
        self.statuses.get(&id).copied()
    }
}

/// Moves a not-started objective to `InProgress`.
///
/// Returns false and logs if the objective was already started.
pub fn start<O: Objective + ?Sized>(objective: &mut O, now: f32) -> bool {
    let status = objective.status();
    if status != ObjectiveStatus::NotStarted {
        warn!(
            objective = %objective.record().id(),
            name = objective.name(),
            %status,
            "start ignored: objective already started"
        );
        return false;
    }

    let record = objective.record_mut();
    record.status = ObjectiveStatus::InProgress;
    record.start_time = Some(now);
    record.end_time = None;
    objective.raise_updated(ObjectiveStatus::InProgress);
    true
}

fn prerequisites_match(
    record: &ObjectiveRecord,
    prerequisites: &dyn PrerequisiteStatus,
    op: PrereqOperator,
    wanted: ObjectiveStatus,
) -> bool {
    let matches = |id: &ObjectiveId| prerequisites.status_of(*id) == Some(wanted);
    match op {
        PrereqOperator::And => record.prerequisites.iter().all(matches),
        PrereqOperator::Or => record.prerequisites.iter().any(matches),
    }
}

/// Completes the objective if its prerequisites allow it and its own
/// completion condition holds. No-op unless `InProgress`.
///
/// With an `Or` combinator and at least one prerequisite, some prerequisite
/// must already be `Complete` before the primary condition is consulted.
pub fn check_completion<O: Objective + ?Sized>(
    objective: &mut O,
    prerequisites: &dyn PrerequisiteStatus,
    now: f32,
) -> bool {
    if objective.status() != ObjectiveStatus::InProgress {
        return false;
    }

    let record = objective.record();
    if !record.prerequisites.is_empty()
        && !prerequisites_match(
            record,
            prerequisites,
            record.completion_op,
            ObjectiveStatus::Complete,
        )
    {
        return false;
    }

    if objective.primary_completion_condition(now) {
        return complete(objective, now);
    }
    false
}

/// Fails the objective if its prerequisites or its own failure condition
/// call for it. No-op unless `InProgress`.
///
/// `And`: fails once every prerequisite has failed, and otherwise stops
/// without consulting the primary condition. `Or`: fails as soon as any
/// prerequisite has failed, and otherwise falls through to the primary
/// condition.
pub fn check_failure<O: Objective + ?Sized>(
    objective: &mut O,
    prerequisites: &dyn PrerequisiteStatus,
    now: f32,
) -> bool {
    if objective.status() != ObjectiveStatus::InProgress {
        return false;
    }

    let record = objective.record();
    if !record.prerequisites.is_empty() {
        let failed = prerequisites_match(
            record,
            prerequisites,
            record.failure_op,
            ObjectiveStatus::Failed,
        );
        match (record.failure_op, failed) {
            (_, true) => return fail(objective, now),
            (PrereqOperator::And, false) => return false,
            (PrereqOperator::Or, false) => {}
        }
    }

    if objective.primary_failure_condition(now) {
        return fail(objective, now);
    }
    false
}

fn finish<O: Objective + ?Sized>(objective: &mut O, now: f32, terminal: ObjectiveStatus) -> bool {
    let status = objective.status();
    if status != ObjectiveStatus::InProgress {
        warn!(
            objective = %objective.record().id(),
            name = objective.name(),
            %status,
            target = %terminal,
            "transition ignored: objective not in progress"
        );
        return false;
    }

    let record = objective.record_mut();
    record.status = terminal;
    record.end_time = Some(now);
    debug!(
        objective = %record.id,
        status = %terminal,
        duration = record.duration_at_complete(),
        "objective finished"
    );
    objective.raise_updated(terminal);
    true
}

/// Marks an in-progress objective `Complete`.
pub fn complete<O: Objective + ?Sized>(objective: &mut O, now: f32) -> bool {
    finish(objective, now, ObjectiveStatus::Complete)
}

/// Marks an in-progress objective `Failed`.
pub fn fail<O: Objective + ?Sized>(objective: &mut O, now: f32) -> bool {
    finish(objective, now, ObjectiveStatus::Failed)
}

/// Resets every prerequisite, then the objective itself, to `NotStarted`.
pub fn reset_status<O: Objective + ?Sized>(
    objective: &mut O,
    prerequisites: &mut dyn PrerequisiteReset,
) {
    let ids = objective.record().prerequisites.clone();
    for id in ids {
        prerequisites.reset_prerequisite(id);
    }

    let record = objective.record_mut();
    record.status = ObjectiveStatus::NotStarted;
    record.start_time = None;
    record.end_time = None;
    objective.raise_updated(ObjectiveStatus::NotStarted);
}

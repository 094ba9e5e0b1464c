//! Notification Log
//!
//! Every notification raised during a tick is stamped and appended here at
//! the end of the tick, and optionally mirrored to a JSONL file.

pub mod logger;

use courier_events::{generate_notification_id, LoggedNotification, Notification, SimTimestamp};

pub use logger::NotificationLogger;

/// In-memory, append-only notification history for one attempt.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<LoggedNotification>,
    next_seq: u64,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 1,
        }
    }

    /// Stamps and appends a notification.
    pub fn record(
        &mut self,
        notification: Notification,
        timestamp: SimTimestamp,
    ) -> &LoggedNotification {
        let id = generate_notification_id(self.next_seq);
        self.next_seq += 1;
        self.entries
            .push(LoggedNotification::new(id, timestamp, notification));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LoggedNotification] {
        &self.entries
    }

    /// Entries appended at or after `index`.
    pub fn since(&self, index: usize) -> &[LoggedNotification] {
        self.entries.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of one kind.
    pub fn count_kind(&self, kind: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.notification.kind() == kind)
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_assigns_sequential_ids() {
        let mut log = NotificationLog::new();
        let first = log
            .record(Notification::PlayerReleased, SimTimestamp::new(1, 0.05))
            .notification_id
            .clone();
        log.record(Notification::PlayerReleased, SimTimestamp::new(2, 0.1));

        assert_eq!(first, "ntf_00000001");
        assert_eq!(log.entries()[1].notification_id, "ntf_00000002");
        assert_eq!(log.count_kind("player_released"), 2);
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(5).is_empty());
    }
}

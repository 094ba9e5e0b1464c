//! Observer lists owned by the publishing entity.
//!
//! Subscribers are called synchronously on publish and are never awaited on.
//! Every published value is also queued so the simulation can drain it into
//! the notification log at the end of the tick.

use std::fmt;

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Notifier<T> {
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    unread: Vec<T>,
    next_id: u64,
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            unread: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a callback. It stays registered until unsubscribed or until
    /// the owning entity is dropped.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, value: T) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&value);
        }
        self.unread.push(value);
    }

    /// Takes every value published since the last drain.
    pub fn drain_unread(&mut self) -> Vec<T> {
        std::mem::take(&mut self.unread)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn unread_count(&self) -> usize {
        self.unread.len()
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .field("unread", &self.unread.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut notifier = Notifier::new();
        notifier.subscribe(move |v: &u32| sink.borrow_mut().push(*v));
        notifier.publish(3);
        notifier.publish(5);

        assert_eq!(*seen.borrow(), vec![3, 5]);
        assert_eq!(notifier.drain_unread(), vec![3, 5]);
        assert_eq!(notifier.unread_count(), 0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);

        let mut notifier = Notifier::new();
        let id = notifier.subscribe(move |_: &&str| *sink.borrow_mut() += 1);
        notifier.publish("a");
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.publish("b");

        assert_eq!(*count.borrow(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }
}

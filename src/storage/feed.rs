//! Change notifications for store readers
//!
//! Views that display store contents subscribe to the feed and re-query the
//! store when an event arrives. Events are delivered in publication order,
//! so a subscriber watching a rollover sees the old cycle close before the
//! new one opens.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::CycleId;

/// Something changed in the stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    CycleOpened(CycleId),
    CycleClosed(CycleId),
    /// Opening amount edited
    CycleUpdated(CycleId),
    CycleDeleted(CycleId),
    ExpensesChanged(CycleId),
    IncomesChanged(CycleId),
    CategoriesChanged,
    SettingsChanged,
}

/// Publish/subscribe hub for [`StoreEvent`]s
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        Subscription { receiver }
    }

    /// Deliver an event to every live subscriber, dropping the ones that
    /// have gone away
    pub fn publish(&self, event: StoreEvent) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

/// Receiving end of a feed subscription
pub struct Subscription {
    receiver: Receiver<StoreEvent>,
}

impl Subscription {
    /// Every event published since the last call, without blocking
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }

    /// Wait for the next event, up to `timeout`
    pub fn next_timeout(&self, timeout: Duration) -> Option<StoreEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_delivered_in_order() {
        let feed = ChangeFeed::new();
        let subscription = feed.subscribe();
        let closed = CycleId::new();
        let opened = CycleId::new();

        feed.publish(StoreEvent::CycleClosed(closed));
        feed.publish(StoreEvent::CycleOpened(opened));

        assert_eq!(
            subscription.drain(),
            vec![StoreEvent::CycleClosed(closed), StoreEvent::CycleOpened(opened)]
        );
        assert!(subscription.drain().is_empty());
    }

    #[test]
    fn test_every_subscriber_receives() {
        let feed = ChangeFeed::new();
        let first = feed.subscribe();
        let second = feed.subscribe();

        feed.publish(StoreEvent::CategoriesChanged);

        assert_eq!(first.drain(), vec![StoreEvent::CategoriesChanged]);
        assert_eq!(
            second.next_timeout(Duration::from_millis(10)),
            Some(StoreEvent::CategoriesChanged)
        );
    }

    #[test]
    fn test_dropped_subscribers_pruned() {
        let feed = ChangeFeed::new();
        let kept = feed.subscribe();
        drop(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 2);

        feed.publish(StoreEvent::SettingsChanged);

        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(kept.drain().len(), 1);
    }

    #[test]
    fn test_timeout_without_events() {
        let feed = ChangeFeed::new();
        let subscription = feed.subscribe();
        assert_eq!(subscription.next_timeout(Duration::from_millis(5)), None);
    }
}

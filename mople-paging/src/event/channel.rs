/// Per-entity broadcast channel.
///
/// One channel exists per entity type for the life of the process. It is
/// constructed once at startup and handed to consumers by reference or
/// clone; there is no global instance.
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::event::action::ActionEvent;
use crate::limits::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::page::Entity;

/// Publish/subscribe seam for action events of one entity type.
pub trait EventChannel<T: Entity>: Send + Sync {
    /// Fire-and-forget fan-out to every current subscriber. Never blocks.
    fn publish(&self, event: ActionEvent<T>);

    /// Join the channel. The subscription yields a neutral event first, then
    /// every event published while it is alive, in publish order.
    fn subscribe(&self) -> Subscription<T>;

    /// Leave the channel. Dropping the subscription has the same effect.
    fn unsubscribe(&self, subscription: Subscription<T>) {
        drop(subscription);
    }

    fn subscriber_count(&self) -> usize;
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A live handle on a channel.
pub struct Subscription<T: Entity> {
    rx: broadcast::Receiver<ActionEvent<T>>,
    channel: &'static str,
    primed: bool,
}

impl<T: Entity> Subscription<T> {
    fn new(rx: broadcast::Receiver<ActionEvent<T>>, channel: &'static str) -> Self {
        Subscription {
            rx,
            channel,
            primed: false,
        }
    }

    /// Wait for the next event. Returns `None` once the channel is gone.
    ///
    /// A subscriber that falls more than the channel capacity behind skips
    /// the overwritten events and continues with the oldest retained one.
    pub async fn recv(&mut self) -> Option<ActionEvent<T>> {
        if !self.primed {
            self.primed = true;
            return Some(ActionEvent::none());
        }
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!(
                        "Subscriber on '{}' lagged, {} event(s) skipped",
                        self.channel,
                        skipped
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of `recv`; `None` when nothing is pending.
    pub fn try_recv(&mut self) -> Option<ActionEvent<T>> {
        if !self.primed {
            self.primed = true;
            return Some(ActionEvent::none());
        }
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!(
                        "Subscriber on '{}' lagged, {} event(s) skipped",
                        self.channel,
                        skipped
                    );
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }
}

// ---------------------------------------------------------------------------
// BroadcastChannel
// ---------------------------------------------------------------------------

/// `EventChannel` backed by a tokio broadcast queue.
///
/// Cloning yields another handle on the same channel.
pub struct BroadcastChannel<T: Entity> {
    tx: broadcast::Sender<ActionEvent<T>>,
    name: &'static str,
}

impl<T: Entity> Clone for BroadcastChannel<T> {
    fn clone(&self) -> Self {
        BroadcastChannel {
            tx: self.tx.clone(),
            name: self.name,
        }
    }
}

impl<T: Entity> BroadcastChannel<T> {
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// `capacity` is the per-subscriber backlog; zero is bumped to one.
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        BroadcastChannel { tx, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Entity> EventChannel<T> for BroadcastChannel<T> {
    fn publish(&self, event: ActionEvent<T>) {
        let kind = event.action.name();
        match self.tx.send(event) {
            Ok(receivers) => {
                log::debug!("Published {} on '{}' to {} subscriber(s)", kind, self.name, receivers)
            }
            // Nobody listening; the event is simply missed.
            Err(_) => log::debug!("Published {} on '{}' with no subscribers", kind, self.name),
        }
    }

    fn subscribe(&self) -> Subscription<T> {
        Subscription::new(self.tx.subscribe(), self.name)
    }

    fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::action::Action;

    #[derive(Clone, Debug, PartialEq)]
    struct Note(u32);

    impl Entity for Note {
        type Id = u32;

        fn id(&self) -> u32 {
            self.0
        }
    }

    #[tokio::test]
    async fn test_subscriber_gets_neutral_then_events_in_order() {
        let channel = BroadcastChannel::<Note>::new("notes");
        let mut sub = channel.subscribe();

        channel.publish(ActionEvent::create(Note(1)));
        channel.publish(ActionEvent::delete(1));

        assert!(sub.recv().await.unwrap().is_none());
        assert_eq!(sub.recv().await.unwrap().action, Action::Create(Note(1)));
        assert_eq!(sub.recv().await.unwrap().action, Action::Delete(1));
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_neutral_not_replay() {
        let channel = BroadcastChannel::<Note>::new("notes");
        let _early = channel.subscribe();
        channel.publish(ActionEvent::update(Note(5)));
        channel.publish(ActionEvent::invalidate());

        let mut late = channel.subscribe();
        assert!(late.recv().await.unwrap().is_none());
        assert!(late.try_recv().is_none());

        channel.publish(ActionEvent::delete(5));
        assert_eq!(late.recv().await.unwrap().action, Action::Delete(5));
    }

    #[tokio::test]
    async fn test_subscribers_are_independent() {
        let channel = BroadcastChannel::<Note>::new("notes");
        let mut a = channel.subscribe();
        let mut b = channel.subscribe();
        channel.publish(ActionEvent::create(Note(9)));

        for sub in [&mut a, &mut b] {
            assert!(sub.recv().await.unwrap().is_none());
            assert_eq!(sub.recv().await.unwrap().action, Action::Create(Note(9)));
        }
    }

    #[test]
    fn test_publish_without_subscribers_does_not_block() {
        let channel = BroadcastChannel::<Note>::new("notes");
        for i in 0..=255u32 {
            channel.publish(ActionEvent::delete(i));
        }
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_releases_handle() {
        let channel = BroadcastChannel::<Note>::new("notes");
        let sub = channel.subscribe();
        let other = channel.clone().subscribe();
        assert_eq!(channel.subscriber_count(), 2);

        channel.unsubscribe(sub);
        assert_eq!(channel.subscriber_count(), 1);
        drop(other);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_lagging_subscriber_skips_overwritten_events() {
        let channel = BroadcastChannel::<Note>::with_capacity("notes", 2);
        let mut sub = channel.subscribe();
        for i in 0..5 {
            channel.publish(ActionEvent::delete(i));
        }
        assert!(sub.try_recv().unwrap().is_none());
        assert_eq!(sub.try_recv().unwrap().action, Action::Delete(3));
        assert_eq!(sub.try_recv().unwrap().action, Action::Delete(4));
        assert!(sub.try_recv().is_none());
    }
}

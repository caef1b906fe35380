/// Theme broadcast payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChange {
    pub is_night: bool,
}

/// Handle returned by [`Broadcast::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u32);

/// Typed publish/subscribe channel.
///
/// Each subscriber has its own pending queue, so a slow or absent reader
/// never hides a message from the others. Messages published before a
/// subscriber registered are not replayed to it.
#[derive(Debug)]
pub struct Broadcast<T: Clone> {
    queues: Vec<(SubscriberId, Vec<T>)>,
    next_id: u32,
    last: Option<T>,
}

impl<T: Clone> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            queues: Vec::new(),
            next_id: 1,
            last: None,
        }
    }

    pub fn subscribe(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.queues.push((id, Vec::new()));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.queues.retain(|(sub, _)| *sub != id);
    }

    pub fn publish(&mut self, message: T) {
        for (_, queue) in &mut self.queues {
            queue.push(message.clone());
        }
        self.last = Some(message);
    }

    /// Take every message pending for `id`, oldest first.
    pub fn drain(&mut self, id: SubscriberId) -> Vec<T> {
        self.queues
            .iter_mut()
            .find(|(sub, _)| *sub == id)
            .map(|(_, queue)| std::mem::take(queue))
            .unwrap_or_default()
    }

    /// The most recently published message, if any.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.queues.len()
    }
}

impl<T: Clone> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_every_message() {
        let mut bus = Broadcast::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(ThemeChange { is_night: true });
        bus.publish(ThemeChange { is_night: false });

        assert_eq!(bus.drain(a).len(), 2);
        let b_msgs = bus.drain(b);
        assert_eq!(b_msgs, vec![ThemeChange { is_night: true }, ThemeChange { is_night: false }]);
        assert!(bus.drain(a).is_empty());
    }

    #[test]
    fn late_subscriber_gets_no_replay() {
        let mut bus = Broadcast::new();
        bus.publish(ThemeChange { is_night: true });
        let late = bus.subscribe();
        assert!(bus.drain(late).is_empty());
        assert_eq!(bus.last(), Some(&ThemeChange { is_night: true }));
    }

    #[test]
    fn unsubscribed_reader_drains_nothing() {
        let mut bus: Broadcast<u32> = Broadcast::new();
        let a = bus.subscribe();
        bus.unsubscribe(a);
        bus.publish(3);
        assert!(bus.drain(a).is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }
}

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

use crate::constants::TIMELINE_EVENT_CAPACITY;

/// Who a timeline entry is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Backend replies and locally synthesized error notices
    Assistant,
}

/// Position of a message in the timeline; strictly increasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A timeline entry. Never changed once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Local>,
}

/// Change notifications for renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEvent {
    Appended(Message),
    PendingChanged(bool),
}

/// Ordered message sequence plus the in-flight flag
pub struct Timeline {
    messages: Vec<Message>,
    pending: bool,
    next_id: u64,
    events: broadcast::Sender<TimelineEvent>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(TIMELINE_EVENT_CAPACITY);
        Self {
            messages: Vec::new(),
            pending: false,
            next_id: 1,
            events,
        }
    }

    /// Subscribe to appends and pending changes made after this call
    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.events.subscribe()
    }

    /// Append a message at the end and return the whole sequence
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &[Message] {
        let message = Message {
            id: MessageId(self.next_id),
            role,
            content: content.into(),
            created_at: Local::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());

        // No subscribers is fine
        let _ = self.events.send(TimelineEvent::Appended(message));
        &self.messages
    }

    pub fn set_pending(&mut self, pending: bool) {
        if self.pending == pending {
            return;
        }
        self.pending = pending;
        let _ = self.events.send(TimelineEvent::PendingChanged(pending));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_preserves_order_and_ids() {
        let mut timeline = Timeline::new();
        timeline.append(Role::User, "hi");
        let all = timeline.append(Role::Assistant, "OK");

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].role, Role::User);
        assert_eq!(all[1].content, "OK");
        assert!(all[0].id < all[1].id);
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut timeline = Timeline::new();
        for i in 0..50 {
            timeline.append(Role::User, i.to_string());
        }
        let ids: Vec<MessageId> = timeline.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_events_are_published() {
        let mut timeline = Timeline::new();
        let mut rx = timeline.subscribe();

        timeline.set_pending(true);
        timeline.append(Role::User, "hi");
        timeline.set_pending(true); // unchanged, no event
        timeline.set_pending(false);

        assert_eq!(rx.try_recv().unwrap(), TimelineEvent::PendingChanged(true));
        match rx.try_recv().unwrap() {
            TimelineEvent::Appended(m) => assert_eq!(m.content, "hi"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(rx.try_recv().unwrap(), TimelineEvent::PendingChanged(false));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}

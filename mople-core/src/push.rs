//! Push message handling.
//!
//! Transport is the platform's job; the app hands over the data map of each
//! received message. Messages about meetings, plans or comments invalidate
//! the matching channel so open lists reload. Everything else only shows a
//! system notification and is ignored here.

use mople_paging::{ActionEvent, EventChannel};
use std::collections::HashMap;
use std::fmt;

use crate::events::EventHub;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    MeetingUpdated,
    PlanCreated,
    PlanUpdated,
    PlanDeleted,
    PlanRemind,
    ReviewUpdated,
    CommentReply,
    CommentMention,
}

impl PushKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "MEETING_UPDATE" | "MEETING_NEW_MEMBER" => Some(PushKind::MeetingUpdated),
            "PLAN_CREATE" => Some(PushKind::PlanCreated),
            "PLAN_UPDATE" => Some(PushKind::PlanUpdated),
            "PLAN_DELETE" => Some(PushKind::PlanDeleted),
            "PLAN_REMIND" => Some(PushKind::PlanRemind),
            "REVIEW_UPDATE" => Some(PushKind::ReviewUpdated),
            "COMMENT_REPLY" => Some(PushKind::CommentReply),
            "COMMENT_MENTION" => Some(PushKind::CommentMention),
            _ => None,
        }
    }

    /// Which lists a message of this kind makes stale.
    pub fn invalidates(&self) -> Option<Channel> {
        match self {
            PushKind::MeetingUpdated => Some(Channel::Meetings),
            PushKind::PlanCreated | PushKind::PlanUpdated | PushKind::PlanDeleted => {
                Some(Channel::Plans)
            }
            PushKind::CommentReply | PushKind::CommentMention => Some(Channel::Comments),
            PushKind::PlanRemind | PushKind::ReviewUpdated => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Meetings,
    Plans,
    Comments,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Meetings => "meetings",
            Channel::Plans => "plans",
            Channel::Comments => "comments",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub kind: PushKind,
    /// Id of the meeting, plan or post the message is about.
    pub target_id: Option<u64>,
}

impl PushMessage {
    /// Parse the push data map (`type`, `targetId`). Unknown types yield `None`.
    pub fn from_data(data: &HashMap<String, String>) -> Option<Self> {
        let raw = data.get("type")?;
        let Some(kind) = PushKind::parse(raw) else {
            log::debug!("Ignoring push of unknown type '{}'", raw);
            return None;
        };
        let target_id = data.get("targetId").and_then(|id| id.trim().parse().ok());
        Some(Self { kind, target_id })
    }
}

/// Publish the invalidation a push implies. Returns the channel touched.
pub fn dispatch_push(hub: &EventHub, message: &PushMessage) -> Option<Channel> {
    let channel = message.kind.invalidates()?;
    log::info!(
        "Push {:?} (target {:?}) invalidates {}",
        message.kind,
        message.target_id,
        channel
    );
    match channel {
        Channel::Meetings => hub.meetings.publish(ActionEvent::invalidate()),
        Channel::Plans => hub.plans.publish(ActionEvent::invalidate()),
        Channel::Comments => hub.comments.publish(ActionEvent::invalidate()),
    }
    Some(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mople_paging::Action;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_push_data() {
        let message = data(&[("type", "PLAN_CREATE"), ("targetId", "42")]);
        let message = PushMessage::from_data(&message).unwrap();
        assert_eq!(message.kind, PushKind::PlanCreated);
        assert_eq!(message.target_id, Some(42));

        let message = data(&[("type", "COMMENT_MENTION"), ("targetId", "x")]);
        let message = PushMessage::from_data(&message).unwrap();
        assert_eq!(message.target_id, None);

        assert!(PushMessage::from_data(&data(&[("type", "MARKETING")])).is_none());
        assert!(PushMessage::from_data(&data(&[("targetId", "1")])).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_invalidates_matching_channel() {
        let hub = EventHub::default();
        let mut plans = hub.plans.subscribe();
        let mut comments = hub.comments.subscribe();

        let message = PushMessage {
            kind: PushKind::PlanUpdated,
            target_id: Some(3),
        };
        assert_eq!(dispatch_push(&hub, &message), Some(Channel::Plans));

        plans.recv().await.unwrap();
        assert!(matches!(plans.recv().await.unwrap().action, Action::Invalidate));
        comments.recv().await.unwrap();
        assert!(comments.try_recv().is_none());
    }

    #[test]
    fn test_reminders_touch_no_list() {
        let hub = EventHub::default();
        let message = PushMessage {
            kind: PushKind::PlanRemind,
            target_id: Some(3),
        };
        assert_eq!(dispatch_push(&hub, &message), None);
    }
}

//! Process-wide event hub.
//!
//! One broadcast channel per entity type that can be mutated from more than
//! one screen. Built once at startup and shared by `Arc`; every view-model
//! and action helper receives it explicitly.

use mople_paging::{ActionEvent, BroadcastChannel, EventChannel};

use crate::config::AppConfig;
use crate::model::{Comment, Meeting, Plan};

pub struct EventHub {
    pub meetings: BroadcastChannel<Meeting>,
    pub plans: BroadcastChannel<Plan>,
    pub comments: BroadcastChannel<Comment>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            meetings: BroadcastChannel::with_capacity("meetings", capacity),
            plans: BroadcastChannel::with_capacity("plans", capacity),
            comments: BroadcastChannel::with_capacity("comments", capacity),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.event_channel_capacity)
    }

    /// Ask every live list to reload, e.g. after the signed-in user changed.
    pub fn invalidate_all(&self) {
        log::info!("Invalidating all lists");
        self.meetings.publish(ActionEvent::invalidate());
        self.plans.publish(ActionEvent::invalidate());
        self.comments.publish(ActionEvent::invalidate());
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(mople_paging::limits::DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

use chrono::{DateTime, Utc};
use mople_paging::Entity;
use serde::{Deserialize, Serialize};

use super::ids::{MeetingId, NotificationId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    /// Server notification type, same vocabulary as push payloads.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub meeting_id: Option<MeetingId>,
    #[serde(default)]
    pub target_id: Option<u64>,
    pub sent_at: DateTime<Utc>,
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> NotificationId {
        self.id
    }
}

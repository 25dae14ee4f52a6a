use chrono::{DateTime, Utc};
use mople_paging::{Entity, InsertPolicy};
use serde::{Deserialize, Serialize};

use super::ids::MeetingId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    /// Start time of the next upcoming plan, if any.
    #[serde(default)]
    pub next_plan_at: Option<DateTime<Utc>>,
}

impl Entity for Meeting {
    type Id = MeetingId;

    fn id(&self) -> MeetingId {
        self.id
    }
}

impl Meeting {
    /// Newly created meetings go to the top of the list.
    pub fn insert_policy() -> InsertPolicy<Meeting> {
        InsertPolicy::Head
    }
}

/// Body of a create or edit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

use chrono::{DateTime, Utc};
use mople_paging::Entity;
use serde::{Deserialize, Serialize};

use super::ids::{MeetingId, PostId, ReviewId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    /// The finished plan this review was written for.
    pub post_id: PostId,
    pub meeting_id: MeetingId,
    pub name: String,
    pub reviewed_at: DateTime<Utc>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub participant_count: u32,
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> ReviewId {
        self.id
    }
}

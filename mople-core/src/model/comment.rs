use chrono::{DateTime, Utc};
use mople_paging::{Entity, InsertPolicy};
use serde::{Deserialize, Serialize};

use super::ids::{CommentId, PostId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub writer_id: UserId,
    pub writer_nickname: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub mentions: Vec<UserId>,
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> CommentId {
        self.id
    }
}

impl Comment {
    /// Threads read oldest first; a new comment goes to the bottom.
    pub fn insert_policy() -> InsertPolicy<Comment> {
        InsertPolicy::Tail
    }

    pub fn belongs_to(&self, post_id: PostId) -> bool {
        self.post_id == post_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<UserId>,
}

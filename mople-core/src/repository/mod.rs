//! Remote data access.
//!
//! List endpoints are consumed through `mople_paging::PageSource`; mutating
//! endpoints through the per-domain API contracts below. The REST client
//! (`network` feature) implements all of them; tests use in-memory fakes.

use async_trait::async_trait;
use mople_paging::FetchError;

use crate::model::{
    Comment, CommentDraft, CommentId, Meeting, MeetingDraft, MeetingId, Plan, PlanDraft, PlanId,
    PostId,
};

pub mod envelope;
#[cfg(feature = "network")]
pub mod rest;

pub use envelope::{PageEnvelope, PageInfo};
#[cfg(feature = "network")]
pub use rest::{RemotePageSource, RestClient};

pub type Result<T> = std::result::Result<T, FetchError>;

// ---------------------------------------------------------------------------
// Mutation contracts
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MeetingApi: Send + Sync {
    async fn create_meeting(&self, draft: &MeetingDraft) -> Result<Meeting>;

    async fn update_meeting(&self, id: MeetingId, draft: &MeetingDraft) -> Result<Meeting>;

    async fn leave_meeting(&self, id: MeetingId) -> Result<()>;
}

#[async_trait]
pub trait PlanApi: Send + Sync {
    async fn create_plan(&self, draft: &PlanDraft) -> Result<Plan>;

    async fn update_plan(&self, id: PlanId, draft: &PlanDraft) -> Result<Plan>;

    async fn delete_plan(&self, id: PlanId) -> Result<()>;

    /// Join or leave; returns the plan with updated participation.
    async fn set_participation(&self, id: PlanId, join: bool) -> Result<Plan>;
}

#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn create_comment(&self, post_id: PostId, draft: &CommentDraft) -> Result<Comment>;

    async fn update_comment(&self, id: CommentId, draft: &CommentDraft) -> Result<Comment>;

    async fn delete_comment(&self, id: CommentId) -> Result<()>;

    /// Toggle the signed-in user's like; returns the updated comment.
    async fn toggle_like(&self, id: CommentId) -> Result<Comment>;
}

//! Mutations that other screens need to hear about.
//!
//! Each helper performs the remote call and, on success, publishes the
//! matching action on the hub so every live list patches itself. Deleting
//! something that is already gone counts as success: the delete is still
//! published so stale copies disappear.

use mople_paging::{ActionEvent, EventChannel, FetchError};
use std::sync::Arc;

use crate::events::EventHub;
use crate::model::{
    Comment, CommentDraft, CommentId, Meeting, MeetingDraft, MeetingId, Plan, PlanDraft, PlanId,
    PostId,
};
use crate::repository::{CommentApi, MeetingApi, PlanApi, Result};

fn tolerate_gone(result: Result<()>, what: &str) -> Result<()> {
    match result {
        Err(FetchError::Application(detail)) => {
            log::info!("{} already gone ({}), treating delete as done", what, detail);
            Ok(())
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Meetings
// ---------------------------------------------------------------------------

pub struct MeetingActions {
    api: Arc<dyn MeetingApi>,
    hub: Arc<EventHub>,
}

impl MeetingActions {
    pub fn new(api: Arc<dyn MeetingApi>, hub: Arc<EventHub>) -> Self {
        Self { api, hub }
    }

    pub async fn create(&self, draft: &MeetingDraft) -> Result<Meeting> {
        let meeting = self.api.create_meeting(draft).await?;
        log::info!("Meeting {} created", meeting.id);
        self.hub.meetings.publish(ActionEvent::create(meeting.clone()));
        Ok(meeting)
    }

    pub async fn update(&self, id: MeetingId, draft: &MeetingDraft) -> Result<Meeting> {
        let meeting = self.api.update_meeting(id, draft).await?;
        self.hub.meetings.publish(ActionEvent::update(meeting.clone()));
        Ok(meeting)
    }

    /// Leave the meeting; it disappears from the user's meeting list.
    pub async fn leave(&self, id: MeetingId) -> Result<()> {
        tolerate_gone(self.api.leave_meeting(id).await, &format!("Meeting {}", id))?;
        self.hub.meetings.publish(ActionEvent::delete(id));
        // Plans of a meeting the user left can no longer be shown.
        self.hub.plans.publish(ActionEvent::invalidate());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

pub struct PlanActions {
    api: Arc<dyn PlanApi>,
    hub: Arc<EventHub>,
}

impl PlanActions {
    pub fn new(api: Arc<dyn PlanApi>, hub: Arc<EventHub>) -> Self {
        Self { api, hub }
    }

    pub async fn create(&self, draft: &PlanDraft) -> Result<Plan> {
        let plan = self.api.create_plan(draft).await?;
        log::info!("Plan {} created in meeting {}", plan.id, plan.meeting_id);
        self.hub.plans.publish(ActionEvent::create(plan.clone()));
        Ok(plan)
    }

    pub async fn update(&self, id: PlanId, draft: &PlanDraft) -> Result<Plan> {
        let plan = self.api.update_plan(id, draft).await?;
        self.hub.plans.publish(ActionEvent::update(plan.clone()));
        Ok(plan)
    }

    pub async fn delete(&self, id: PlanId) -> Result<()> {
        tolerate_gone(self.api.delete_plan(id).await, &format!("Plan {}", id))?;
        self.hub.plans.publish(ActionEvent::delete(id));
        Ok(())
    }

    pub async fn join(&self, id: PlanId) -> Result<Plan> {
        self.set_participation(id, true).await
    }

    pub async fn leave(&self, id: PlanId) -> Result<Plan> {
        self.set_participation(id, false).await
    }

    async fn set_participation(&self, id: PlanId, join: bool) -> Result<Plan> {
        let plan = self.api.set_participation(id, join).await?;
        self.hub.plans.publish(ActionEvent::update(plan.clone()));
        Ok(plan)
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub struct CommentActions {
    api: Arc<dyn CommentApi>,
    hub: Arc<EventHub>,
}

impl CommentActions {
    pub fn new(api: Arc<dyn CommentApi>, hub: Arc<EventHub>) -> Self {
        Self { api, hub }
    }

    pub async fn create(&self, post_id: PostId, draft: &CommentDraft) -> Result<Comment> {
        let comment = self.api.create_comment(post_id, draft).await?;
        self.hub.comments.publish(ActionEvent::create(comment.clone()));
        Ok(comment)
    }

    pub async fn update(&self, id: CommentId, draft: &CommentDraft) -> Result<Comment> {
        let comment = self.api.update_comment(id, draft).await?;
        self.hub.comments.publish(ActionEvent::update(comment.clone()));
        Ok(comment)
    }

    pub async fn delete(&self, id: CommentId) -> Result<()> {
        tolerate_gone(self.api.delete_comment(id).await, &format!("Comment {}", id))?;
        self.hub.comments.publish(ActionEvent::delete(id));
        Ok(())
    }

    pub async fn toggle_like(&self, id: CommentId) -> Result<Comment> {
        let comment = self.api.toggle_like(id).await?;
        self.hub.comments.publish(ActionEvent::update(comment.clone()));
        Ok(comment)
    }
}

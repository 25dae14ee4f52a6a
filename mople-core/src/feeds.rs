//! Feed constructors, one per list screen.
//!
//! Meetings, plans and comments listen on their hub channel; reviews,
//! notifications and participants only page and refresh. All listening
//! feeds must be built inside a tokio runtime.

use mople_paging::{Feed, PageSource, Pager};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::events::EventHub;
use crate::model::{Comment, Meeting, MeetingId, Notification, Participant, Plan, PostId, Review};

#[derive(Clone)]
pub struct Feeds {
    hub: Arc<EventHub>,
    page_size: usize,
}

impl Feeds {
    pub fn new(hub: Arc<EventHub>, config: &AppConfig) -> Self {
        Self {
            hub,
            page_size: config.page_size,
        }
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    fn pager<T: mople_paging::Entity>(&self, source: impl PageSource<T> + 'static) -> Pager<T> {
        Pager::new(source, self.page_size)
    }

    /// The user's meetings; created meetings appear on top.
    pub fn meetings(&self, source: impl PageSource<Meeting> + 'static) -> Feed<Meeting> {
        Feed::builder(self.pager(source))
            .insert_policy(Meeting::insert_policy())
            .listen(&self.hub.meetings)
    }

    /// Plans ordered by start time. With `meeting_id`, plans created in
    /// other meetings are not inserted.
    pub fn plans(
        &self,
        source: impl PageSource<Plan> + 'static,
        meeting_id: Option<MeetingId>,
    ) -> Feed<Plan> {
        let builder = Feed::builder(self.pager(source)).insert_policy(Plan::insert_policy());
        match meeting_id {
            Some(meeting_id) => builder
                .accepts(move |plan: &Plan| plan.meeting_id == meeting_id)
                .listen(&self.hub.plans),
            None => builder.listen(&self.hub.plans),
        }
    }

    /// Comment thread of one post, oldest first.
    pub fn comments(
        &self,
        source: impl PageSource<Comment> + 'static,
        post_id: PostId,
    ) -> Feed<Comment> {
        Feed::builder(self.pager(source))
            .insert_policy(Comment::insert_policy())
            .accepts(move |comment: &Comment| comment.belongs_to(post_id))
            .listen(&self.hub.comments)
    }

    pub fn reviews(&self, source: impl PageSource<Review> + 'static) -> Feed<Review> {
        Feed::builder(self.pager(source)).build()
    }

    pub fn notifications(
        &self,
        source: impl PageSource<Notification> + 'static,
    ) -> Feed<Notification> {
        Feed::builder(self.pager(source)).build()
    }

    pub fn participants(
        &self,
        source: impl PageSource<Participant> + 'static,
    ) -> Feed<Participant> {
        Feed::builder(self.pager(source)).build()
    }
}

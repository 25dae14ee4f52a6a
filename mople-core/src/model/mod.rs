//! Domain models.
//!
//! Every list item implements `Entity` so the pager can de-duplicate it and
//! action events can patch it by id. Field names follow the REST payloads
//! (camelCase on the wire).

pub mod comment;
pub mod ids;
pub mod meeting;
pub mod notification;
pub mod participant;
pub mod plan;
pub mod review;

pub use comment::{Comment, CommentDraft};
pub use ids::{CommentId, MeetingId, NotificationId, PlanId, PostId, ReviewId, UserId};
pub use meeting::{Meeting, MeetingDraft};
pub use notification::Notification;
pub use participant::Participant;
pub use plan::{Plan, PlanDraft};
pub use review::Review;

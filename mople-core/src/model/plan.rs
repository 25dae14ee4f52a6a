use chrono::{DateTime, Utc};
use mople_paging::{Entity, InsertPolicy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ids::{MeetingId, PlanId, PostId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub meeting_id: MeetingId,
    pub name: String,
    pub plan_at: DateTime<Utc>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub participant_count: u32,
    /// Whether the signed-in user joined this plan.
    #[serde(default)]
    pub is_participant: bool,
}

impl Entity for Plan {
    type Id = PlanId;

    fn id(&self) -> PlanId {
        self.id
    }
}

impl Plan {
    /// Plans are listed by start time; a new plan lands before the first
    /// plan that starts later.
    pub fn insert_policy() -> InsertPolicy<Plan> {
        InsertPolicy::SortedBy(Plan::by_time)
    }

    pub fn by_time(a: &Plan, b: &Plan) -> Ordering {
        a.plan_at.cmp(&b.plan_at)
    }

    /// Comment threads of a plan are keyed by the plan id.
    pub fn post_id(&self) -> PostId {
        self.id.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    pub meeting_id: MeetingId,
    pub name: String,
    pub plan_at: DateTime<Utc>,
    pub address: String,
}

use mople_paging::Entity;
use serde::{Deserialize, Serialize};

use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserId,
    pub nickname: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_host: bool,
}

impl Entity for Participant {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.user_id
    }
}

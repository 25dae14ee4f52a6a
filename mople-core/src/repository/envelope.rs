//! Wire shape shared by every cursor list endpoint:
//!
//! ```json
//! { "content": [...], "page": { "nextCursor": "...", "isNext": true, "size": 30, "totalCount": 120 } }
//! ```

use mople_paging::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub next_cursor: Option<String>,
    pub is_next: bool,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    pub page: PageInfo,
}

impl<T> From<PageEnvelope<T>> for Page<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        let PageEnvelope { content, page } = envelope;
        if page.size != 0 && page.size != content.len() {
            log::debug!(
                "Page reports size {} but carries {} item(s)",
                page.size,
                content.len()
            );
        }
        // Blank cursors show up on the last page of some endpoints.
        let next_cursor = page.next_cursor.filter(|cursor| !cursor.is_empty());
        Page {
            items: content,
            next_cursor,
            has_next: page.is_next,
            total_count: page.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Meeting, MeetingId};

    #[test]
    fn test_decodes_list_envelope() {
        let json = r#"{
            "content": [{"id": 1, "name": "Climbing"}, {"id": 2, "name": "Books", "memberCount": 4}],
            "page": {"nextCursor": "Mg==", "isNext": true, "size": 2, "totalCount": 11}
        }"#;
        let envelope: PageEnvelope<Meeting> = serde_json::from_str(json).unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, MeetingId(2));
        assert_eq!(page.items[1].member_count, 4);
        assert_eq!(page.next_cursor.as_deref(), Some("Mg=="));
        assert!(page.has_next);
        assert_eq!(page.total_count, Some(11));
    }

    #[test]
    fn test_blank_cursor_is_no_cursor() {
        let json = r#"{"content": [], "page": {"nextCursor": "", "isNext": false}}"#;
        let page = Page::from(serde_json::from_str::<PageEnvelope<Meeting>>(json).unwrap());
        assert!(page.next_cursor.is_none());
        assert!(!page.has_next);
        assert!(page.total_count.is_none());
    }
}

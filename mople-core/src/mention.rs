//! `@nickname` mentions in comment text.

use std::collections::HashSet;

use crate::model::{Participant, UserId};

/// Users mentioned in `text`, in the order they first appear.
///
/// At every `@` the longest matching nickname wins, so `@kim` and
/// `@kimchi` in the same meeting resolve correctly. Unknown names are
/// ignored.
pub fn extract_mentions(text: &str, participants: &[Participant]) -> Vec<UserId> {
    let mut candidates: Vec<&Participant> = participants
        .iter()
        .filter(|p| !p.nickname.is_empty())
        .collect();
    candidates.sort_by(|a, b| b.nickname.len().cmp(&a.nickname.len()));

    let mut seen = HashSet::new();
    let mut mentioned = Vec::new();
    for (at, _) in text.match_indices('@') {
        let rest = &text[at + 1..];
        let found = candidates
            .iter()
            .find(|p| rest.starts_with(p.nickname.as_str()));
        if let Some(participant) = found {
            if seen.insert(participant.user_id) {
                mentioned.push(participant.user_id);
            }
        }
    }
    mentioned
}

#![no_main]
use arbitrary::Arbitrary;
use chrono::{Duration, Utc};
use libfuzzer_sys::fuzz_target;
use mople_paging::{
    ActionEvent, Entity, FetchError, InsertPolicy, LoadRequest, Page, PagingState, Phase,
};
use std::collections::HashSet;

#[derive(Clone, Debug)]
struct Row {
    id: u8,
    rank: u8,
}

impl Entity for Row {
    type Id = u8;

    fn id(&self) -> u8 {
        self.id
    }
}

#[derive(Arbitrary, Debug)]
enum Patch {
    Create { id: u8, rank: u8 },
    Update { id: u8, rank: u8 },
    Delete(u8),
    Stale(u8),
    FailRefresh,
    Reload(Vec<u8>),
}

fuzz_target!(|input: (Vec<u8>, Vec<Patch>, bool)| {
    let (initial, patches, sorted) = input;
    let policy = if sorted {
        InsertPolicy::SortedBy(|a: &Row, b: &Row| a.rank.cmp(&b.rank))
    } else {
        InsertPolicy::Head
    };

    let mut state = PagingState::<Row>::new();
    let rows = initial.into_iter().map(|id| Row { id, rank: id }).collect();
    state.complete(&LoadRequest::First, Ok(Page::last(rows)), Utc::now());

    for patch in patches.into_iter().take(128) {
        let before = state.len();
        let stale = matches!(patch, Patch::Stale(_));
        let event = match patch {
            Patch::FailRefresh => {
                state.reset_for_refresh();
                state.begin(&LoadRequest::First);
                let failure = Err(FetchError::network("fuzz"));
                state.complete(&LoadRequest::First, failure, Utc::now());
                continue;
            }
            Patch::Reload(ids) => {
                let rows = ids.into_iter().map(|id| Row { id, rank: id }).collect();
                state.reset_for_refresh();
                state.begin(&LoadRequest::First);
                state.complete(&LoadRequest::First, Ok(Page::last(rows)), Utc::now());
                continue;
            }
            Patch::Create { id, rank } => ActionEvent::create(Row { id, rank }),
            Patch::Update { id, rank } => ActionEvent::update(Row { id, rank }),
            Patch::Delete(id) => ActionEvent::delete(id),
            Patch::Stale(id) => ActionEvent::delete(id).stamped(Utc::now() - Duration::hours(1)),
        };
        state.apply_event(&event, &policy, None);

        if stale {
            assert_eq!(state.len(), before, "stale event changed the list");
        }
        if state.phase() == Phase::InitialError {
            assert!(state.is_empty(), "patch landed behind the error screen");
        }
        let mut seen = HashSet::new();
        assert!(state.items().iter().all(|row| seen.insert(row.id)));
    }
});

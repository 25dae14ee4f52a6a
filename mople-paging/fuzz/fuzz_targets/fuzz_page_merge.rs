#![no_main]
use arbitrary::Arbitrary;
use chrono::Utc;
use libfuzzer_sys::fuzz_target;
use mople_paging::{Entity, FetchError, LoadRequest, Page, PagingState, Phase};
use std::collections::HashSet;

#[derive(Clone, Debug)]
struct Row(u8);

impl Entity for Row {
    type Id = u8;

    fn id(&self) -> u8 {
        self.0
    }
}

#[derive(Arbitrary, Debug)]
enum Step {
    Page { ids: Vec<u8>, has_next: bool, cursor: bool },
    Fail,
    Refresh,
}

fuzz_target!(|steps: Vec<Step>| {
    let mut state = PagingState::<Row>::new();
    let mut was_last = false;

    for step in steps.into_iter().take(64) {
        if let Step::Refresh = step {
            state.reset_for_refresh();
            was_last = false;
            continue;
        }
        let Some(request) = state.next_request() else {
            // Exhausted lists never ask for more.
            assert!(state.is_last());
            continue;
        };
        state.begin(&request);

        let result = match step {
            Step::Page { ids, has_next, cursor } => {
                let items = ids.into_iter().map(Row).collect();
                let cursor = cursor.then(|| format!("c{}", state.len()));
                Ok(Page::new(items, cursor, has_next))
            }
            _ => Err(FetchError::network("fuzz")),
        };
        state.complete(&request, result, Utc::now());

        let mut seen = HashSet::new();
        assert!(
            state.items().iter().all(|row| seen.insert(row.id())),
            "duplicate id after merge"
        );
        if state.phase() == Phase::InitialError {
            assert!(state.is_empty() && !state.is_last());
        }
        if was_last {
            assert!(state.is_last(), "is_last regressed without a refresh");
        }
        was_last = state.is_last();
    }
});

/// Paging state machine.
///
/// `PagingState` is the single mutable value behind every paginated screen.
/// It is owned by one `Pager` and changes only through the transition
/// functions below:
///
/// ```text
/// InitialLoading --ok--> Ready --next ok--> Ready
/// InitialLoading --err-> InitialError --retry/refresh--> InitialLoading
/// Ready --next err--> Ready[footer=Error] --retry--> Ready[footer=Loading]
/// ```
///
/// Items are unique by entity id (first occurrence wins) and `is_last` only
/// ever flips to `true` until a refresh starts a new paging epoch.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::error::FetchError;
use crate::event::{Action, ActionEvent};
use crate::page::{Entity, Page};

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Whole-screen load region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    InitialLoading,
    InitialError,
    Ready,
}

/// "Load more" region at the end of an already-populated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FooterPhase {
    Idle,
    Loading,
    Error,
}

/// The fetch a state is ready to issue next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    First,
    Next { cursor: String },
}

impl LoadRequest {
    pub fn cursor(&self) -> Option<String> {
        match self {
            LoadRequest::First => None,
            LoadRequest::Next { cursor } => Some(cursor.clone()),
        }
    }

    pub fn is_first(&self) -> bool {
        matches!(self, LoadRequest::First)
    }
}

// ---------------------------------------------------------------------------
// InsertPolicy
// ---------------------------------------------------------------------------

/// Where a `Create` event lands in an already-loaded list.
pub enum InsertPolicy<T> {
    Head,
    Tail,
    /// Insert before the first existing entry that orders `Greater` than the
    /// new one (linear scan, first match wins); append if none does.
    SortedBy(fn(&T, &T) -> Ordering),
}

impl<T> Clone for InsertPolicy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for InsertPolicy<T> {}

impl<T> fmt::Debug for InsertPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertPolicy::Head => write!(f, "Head"),
            InsertPolicy::Tail => write!(f, "Tail"),
            InsertPolicy::SortedBy(_) => write!(f, "SortedBy(..)"),
        }
    }
}

impl<T> InsertPolicy<T> {
    pub fn position(&self, items: &[T], entity: &T) -> usize {
        match self {
            InsertPolicy::Head => 0,
            InsertPolicy::Tail => items.len(),
            InsertPolicy::SortedBy(cmp) => items
                .iter()
                .position(|existing| cmp(existing, entity) == Ordering::Greater)
                .unwrap_or(items.len()),
        }
    }
}

/// Result of feeding one action event into a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// The neutral subscription-start event.
    Neutral,
    /// Items were patched.
    Applied,
    /// The event referenced an entity this list does not hold.
    Unchanged,
    /// A create rejected by the owner's filter (e.g. another post's comment).
    Filtered,
    /// Issued before this list's data was loaded; already reflected or moot.
    Stale,
    /// The owner must reload from scratch.
    Refresh,
}

// ---------------------------------------------------------------------------
// PagingState
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct PagingState<T: Entity> {
    phase: Phase,
    items: Vec<T>,
    next_cursor: Option<String>,
    is_last: bool,
    footer_phase: FooterPhase,
    /// A refresh is running over a non-empty list.
    refreshing: bool,
    total_count: u64,
    /// Wall-clock time the current first page resolved.
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<FetchError>,
}

impl<T: Entity> Default for PagingState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> PagingState<T> {
    pub fn new() -> Self {
        PagingState {
            phase: Phase::InitialLoading,
            items: Vec::new(),
            next_cursor: None,
            is_last: false,
            footer_phase: FooterPhase::Idle,
            refreshing: false,
            total_count: 0,
            loaded_at: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn footer_phase(&self) -> FooterPhase {
        self.footer_phase
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// The most recent fetch failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| &item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// The fetch a "load more" trigger should issue, or `None` when the list
    /// is exhausted.
    ///
    /// A ready list without a cursor that is not exhausted is between
    /// epochs (a refresh never resolved), so it asks for the first page again.
    pub fn next_request(&self) -> Option<LoadRequest> {
        match self.phase {
            Phase::InitialLoading | Phase::InitialError => Some(LoadRequest::First),
            Phase::Ready if self.is_last => None,
            Phase::Ready => Some(match self.next_cursor.clone() {
                Some(cursor) => LoadRequest::Next { cursor },
                None => LoadRequest::First,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Enter the loading state for `request`.
    ///
    /// A first-page load over visible items keeps them on screen and only
    /// raises the refreshing flag.
    pub fn begin(&mut self, request: &LoadRequest) {
        self.footer_phase = FooterPhase::Idle;
        match request {
            LoadRequest::First if self.items.is_empty() => {
                self.phase = Phase::InitialLoading;
                self.refreshing = false;
            }
            LoadRequest::First => {
                self.phase = Phase::Ready;
                self.refreshing = true;
            }
            LoadRequest::Next { .. } => {
                self.footer_phase = FooterPhase::Loading;
            }
        }
    }

    /// Undo `begin` for a fetch that will never complete (the pager was
    /// closed or the fetch task died). Leaves a requestable state behind.
    pub fn abandon(&mut self) {
        if self.footer_phase == FooterPhase::Loading {
            self.footer_phase = FooterPhase::Idle;
        }
        self.refreshing = false;
    }

    /// Start a new paging epoch. Items stay visible until the first page
    /// of the new epoch resolves.
    pub fn reset_for_refresh(&mut self) {
        self.next_cursor = None;
        self.is_last = false;
    }

    /// Fold a fetch result into the state.
    pub fn complete(
        &mut self,
        request: &LoadRequest,
        result: Result<Page<T>, FetchError>,
        now: DateTime<Utc>,
    ) {
        match (request, result) {
            (LoadRequest::First, Ok(page)) => {
                self.items.clear();
                self.total_count = 0;
                self.is_last = false;
                self.accept_page(page);
                self.phase = Phase::Ready;
                self.refreshing = false;
                self.loaded_at = Some(now);
            }
            (LoadRequest::First, Err(err)) => {
                self.items.clear();
                self.next_cursor = None;
                self.is_last = false;
                self.total_count = 0;
                self.phase = Phase::InitialError;
                self.refreshing = false;
                self.footer_phase = FooterPhase::Idle;
                self.loaded_at = None;
                self.last_error = Some(err);
            }
            (LoadRequest::Next { .. }, Ok(page)) => {
                self.accept_page(page);
            }
            (LoadRequest::Next { .. }, Err(err)) => {
                self.footer_phase = FooterPhase::Error;
                self.last_error = Some(err);
            }
        }
    }

    fn accept_page(&mut self, page: Page<T>) {
        let Page {
            items,
            next_cursor,
            has_next,
            total_count,
        } = page;

        let added = self.merge(items);
        let exhausted = !has_next || added == 0 || next_cursor.is_none();

        self.next_cursor = next_cursor;
        self.is_last = self.is_last || exhausted;
        self.total_count =
            total_count.unwrap_or_else(|| (self.items.len() as u64).max(self.total_count));
        self.footer_phase = FooterPhase::Idle;
        self.last_error = None;
    }

    /// Append `incoming` in order, dropping ids already present.
    /// Returns the number of items actually added.
    fn merge(&mut self, incoming: Vec<T>) -> usize {
        let mut seen: HashSet<T::Id> = self.items.iter().map(Entity::id).collect();
        let before = self.items.len();
        for item in incoming {
            let id = item.id();
            if seen.insert(id) {
                self.items.push(item);
            } else {
                log::debug!("Dropping duplicate item {:?} from page", item.id());
            }
        }
        self.items.len() - before
    }

    // -----------------------------------------------------------------------
    // Local patches
    // -----------------------------------------------------------------------

    /// Replace the entry with the same id, keeping its position.
    pub fn replace(&mut self, entity: T) -> bool {
        let id = entity.id();
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &T::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id() != id);
        let removed = self.items.len() != before;
        if removed {
            self.total_count = self.total_count.saturating_sub(1);
        }
        removed
    }

    /// Insert a new entity per `policy`. An id that is already present is
    /// replaced in place instead, so items stay unique.
    pub fn insert(&mut self, entity: T, policy: &InsertPolicy<T>) -> bool {
        if self.contains(&entity.id()) {
            return self.replace(entity);
        }
        let at = policy.position(&self.items, &entity);
        self.items.insert(at, entity);
        self.total_count += 1;
        true
    }

    /// Apply a bus event.
    ///
    /// `Invalidate` always asks for a reload. Patches only touch a list that
    /// is on screen: they are dropped while the initial region is loading or
    /// failed, and when stamped before `loaded_at` (already reflected in the
    /// loaded page).
    pub fn apply_event(
        &mut self,
        event: &ActionEvent<T>,
        policy: &InsertPolicy<T>,
        accepts: Option<&(dyn Fn(&T) -> bool + Send + Sync)>,
    ) -> EventOutcome {
        match &event.action {
            Action::None => return EventOutcome::Neutral,
            Action::Invalidate => return EventOutcome::Refresh,
            Action::Update(_) | Action::Delete(_) | Action::Create(_) => {}
        }
        if self.phase != Phase::Ready {
            return EventOutcome::Stale;
        }
        match self.loaded_at {
            Some(loaded_at) if event.at >= loaded_at => {}
            _ => return EventOutcome::Stale,
        }

        let changed = match &event.action {
            Action::None => return EventOutcome::Neutral,
            Action::Invalidate => return EventOutcome::Refresh,
            Action::Update(entity) => self.replace(entity.clone()),
            Action::Delete(id) => self.remove(id),
            Action::Create(entity) => {
                if let Some(accepts) = accepts {
                    if !accepts(entity) {
                        return EventOutcome::Filtered;
                    }
                }
                self.insert(entity.clone(), policy)
            }
        };

        if changed {
            EventOutcome::Applied
        } else {
            EventOutcome::Unchanged
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u32,
        rank: u32,
    }

    impl Entity for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn item(id: u32) -> Item {
        Item { id, rank: id * 10 }
    }

    fn items(ids: impl IntoIterator<Item = u32>) -> Vec<Item> {
        ids.into_iter().map(item).collect()
    }

    fn ids(state: &PagingState<Item>) -> Vec<u32> {
        state.items().iter().map(|i| i.id).collect()
    }

    fn loaded(ids: impl IntoIterator<Item = u32>) -> PagingState<Item> {
        let mut state = PagingState::new();
        state.begin(&LoadRequest::First);
        state.complete(
            &LoadRequest::First,
            Ok(Page::with_next(items(ids), "c1")),
            Utc::now(),
        );
        state
    }

    fn next(cursor: &str) -> LoadRequest {
        LoadRequest::Next {
            cursor: cursor.into(),
        }
    }

    #[test]
    fn test_fresh_state_requests_first_page() {
        let state: PagingState<Item> = PagingState::new();
        assert_eq!(state.phase(), Phase::InitialLoading);
        assert_eq!(state.next_request(), Some(LoadRequest::First));
        assert!(state.loaded_at().is_none());
    }

    #[test]
    fn test_overlapping_pages_deduplicated_first_wins() {
        let mut state = loaded(1..=30);
        assert_eq!(state.len(), 30);
        assert!(!state.is_last());

        let mut overlap = items([28, 29, 30, 31]);
        overlap[0].rank = 999;
        state.begin(&next("c1"));
        state.complete(&next("c1"), Ok(Page::with_next(overlap, "c2")), Utc::now());

        assert_eq!(ids(&state), (1..=31).collect::<Vec<_>>());
        assert_eq!(state.get(&28).unwrap().rank, 280);
        assert_eq!(state.next_cursor(), Some("c2"));
        assert!(!state.is_last());

        state.begin(&next("c2"));
        state.complete(&next("c2"), Ok(Page::empty()), Utc::now());
        assert!(state.is_last());
        assert_eq!(state.len(), 31);
        assert_eq!(state.next_request(), None);
    }

    #[test]
    fn test_duplicates_within_one_page_dropped() {
        let mut state = PagingState::new();
        state.complete(
            &LoadRequest::First,
            Ok(Page::last(items([1, 2, 1, 3, 2]))),
            Utc::now(),
        );
        assert_eq!(ids(&state), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_with_no_new_items_is_last() {
        let mut state = loaded(1..=3);
        state.complete(
            &next("c1"),
            Ok(Page::with_next(items([2, 3]), "c2")),
            Utc::now(),
        );
        assert!(state.is_last());
    }

    #[test]
    fn test_has_next_without_cursor_is_last() {
        let mut state = PagingState::new();
        state.complete(
            &LoadRequest::First,
            Ok(Page::new(items([1]), None, true)),
            Utc::now(),
        );
        assert!(state.is_last());
        assert_eq!(state.next_request(), None);
    }

    #[test]
    fn test_first_page_failure_clears_and_errors() {
        let mut state = loaded(1..=5);
        state.reset_for_refresh();
        state.begin(&LoadRequest::First);
        assert!(state.is_refreshing());
        assert_eq!(state.len(), 5);

        state.complete(
            &LoadRequest::First,
            Err(FetchError::network("offline")),
            Utc::now(),
        );
        assert_eq!(state.phase(), Phase::InitialError);
        assert!(state.is_empty());
        assert!(!state.is_refreshing());
        assert_eq!(state.last_error(), Some(&FetchError::network("offline")));
        assert_eq!(state.next_request(), Some(LoadRequest::First));
    }

    #[test]
    fn test_footer_failure_keeps_items() {
        let mut state = loaded(1..=5);
        state.begin(&next("c1"));
        assert_eq!(state.footer_phase(), FooterPhase::Loading);
        state.complete(
            &next("c1"),
            Err(FetchError::server(Some(500), "oops")),
            Utc::now(),
        );
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.footer_phase(), FooterPhase::Error);
        assert_eq!(state.len(), 5);
        // Retry goes through the same cursor.
        assert_eq!(state.next_request(), Some(next("c1")));
    }

    #[test]
    fn test_total_count_prefers_server_value() {
        let mut state = PagingState::new();
        state.complete(
            &LoadRequest::First,
            Ok(Page::with_next(items([1, 2]), "c").with_total_count(40)),
            Utc::now(),
        );
        assert_eq!(state.total_count(), 40);

        let mut fallback = PagingState::new();
        fallback.complete(&LoadRequest::First, Ok(Page::last(items([1, 2]))), Utc::now());
        assert_eq!(fallback.total_count(), 2);
    }

    #[test]
    fn test_sorted_insert_before_first_later_entry() {
        let mut state = loaded([1, 3, 5]);
        let by_rank: InsertPolicy<Item> = InsertPolicy::SortedBy(|a, b| a.rank.cmp(&b.rank));

        assert!(state.insert(item(4), &by_rank));
        assert_eq!(ids(&state), vec![1, 3, 4, 5]);

        assert!(state.insert(item(9), &by_rank));
        assert_eq!(ids(&state), vec![1, 3, 4, 5, 9]);
        assert_eq!(state.total_count(), 5);
    }

    #[test]
    fn test_insert_existing_id_replaces_in_place() {
        let mut state = loaded([1, 2, 3]);
        let updated = Item { id: 2, rank: 7 };
        assert!(state.insert(updated.clone(), &InsertPolicy::Head));
        assert_eq!(ids(&state), vec![1, 2, 3]);
        assert_eq!(state.get(&2), Some(&updated));
    }

    #[test]
    fn test_apply_event_patches_and_guards_stale() {
        let mut state = loaded([1, 2, 3]);
        let policy = InsertPolicy::Head;

        let updated = Item { id: 2, rank: 1 };
        let outcome = state.apply_event(&ActionEvent::update(updated.clone()), &policy, None);
        assert_eq!(outcome, EventOutcome::Applied);
        assert_eq!(state.get(&2), Some(&updated));

        let old = Utc::now() - Duration::seconds(60);
        let stale = ActionEvent::delete(1).stamped(old);
        assert_eq!(state.apply_event(&stale, &policy, None), EventOutcome::Stale);
        assert!(state.contains(&1));

        assert_eq!(
            state.apply_event(&ActionEvent::delete(1), &policy, None),
            EventOutcome::Applied
        );
        assert_eq!(
            state.apply_event(&ActionEvent::delete(1), &policy, None),
            EventOutcome::Unchanged
        );
        assert_eq!(
            state.apply_event(&ActionEvent::create(item(8)), &policy, None),
            EventOutcome::Applied
        );
        assert_eq!(ids(&state), vec![8, 2, 3]);
        assert_eq!(
            state.apply_event(&ActionEvent::invalidate(), &policy, None),
            EventOutcome::Refresh
        );
        assert_eq!(
            state.apply_event(&ActionEvent::none(), &policy, None),
            EventOutcome::Neutral
        );
    }

    #[test]
    fn test_apply_event_before_load_is_stale() {
        let mut state: PagingState<Item> = PagingState::new();
        let outcome = state.apply_event(&ActionEvent::create(item(1)), &InsertPolicy::Head, None);
        assert_eq!(outcome, EventOutcome::Stale);
        assert!(state.is_empty());

        // A reload request is never dropped, even before anything loaded.
        assert_eq!(
            state.apply_event(&ActionEvent::invalidate(), &InsertPolicy::Head, None),
            EventOutcome::Refresh
        );
    }

    #[test]
    fn test_failed_refresh_rejects_patches() {
        let mut state = loaded([1, 2]);
        state.reset_for_refresh();
        state.begin(&LoadRequest::First);
        state.complete(
            &LoadRequest::First,
            Err(FetchError::network("offline")),
            Utc::now(),
        );
        assert!(state.loaded_at().is_none());

        let policy = InsertPolicy::Head;
        let later = Utc::now() + Duration::seconds(1);
        let create = ActionEvent::create(item(9)).stamped(later);
        assert_eq!(state.apply_event(&create, &policy, None), EventOutcome::Stale);
        assert_eq!(state.phase(), Phase::InitialError);
        assert!(state.is_empty());
        assert_eq!(
            state.apply_event(&ActionEvent::invalidate(), &policy, None),
            EventOutcome::Refresh
        );
    }

    #[test]
    fn test_patches_wait_out_initial_loading() {
        let mut state = loaded(Vec::new());
        state.reset_for_refresh();
        state.begin(&LoadRequest::First);
        assert_eq!(state.phase(), Phase::InitialLoading);

        let create = ActionEvent::create(item(4)).stamped(Utc::now() + Duration::seconds(1));
        assert_eq!(
            state.apply_event(&create, &InsertPolicy::Tail, None),
            EventOutcome::Stale
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_abandoned_fetch_leaves_requestable_state() {
        let mut state = loaded([1, 2]);
        state.begin(&next("c1"));
        state.abandon();
        assert_eq!(state.footer_phase(), FooterPhase::Idle);
        assert_eq!(state.next_request(), Some(next("c1")));

        state.reset_for_refresh();
        state.begin(&LoadRequest::First);
        state.abandon();
        assert!(!state.is_refreshing());
        assert_eq!(ids(&state), vec![1, 2]);
        assert_eq!(state.next_request(), Some(LoadRequest::First));
    }

    #[test]
    fn test_create_filtered_by_owner() {
        let mut state = loaded([1]);
        let only_even = |i: &Item| i.id % 2 == 0;
        let outcome = state.apply_event(
            &ActionEvent::create(item(3)),
            &InsertPolicy::Tail,
            Some(&only_even),
        );
        assert_eq!(outcome, EventOutcome::Filtered);
        assert_eq!(ids(&state), vec![1]);
    }
}

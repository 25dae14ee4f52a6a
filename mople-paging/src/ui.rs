/// Render-ready projection of `PagingState`.
///
/// Every paginated screen renders the same five affordances: initial
/// spinner, initial error, footer spinner, footer error, end-of-list. This
/// type exposes them as flags derived from the state's phases, so exactly
/// one of {loading, error, ready} holds for the initial region and exactly
/// one of {footer loading, footer error, footer idle} for the footer.
use serde::Serialize;

use crate::page::Entity;
use crate::state::{FooterPhase, PagingState, Phase};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PagingUiState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub is_error: bool,
    pub is_loading_footer: bool,
    pub is_error_footer: bool,
    pub is_refreshing: bool,
    pub is_last: bool,
    pub next_cursor: Option<String>,
    pub total_count: u64,
}

impl<T> PagingUiState<T> {
    pub fn is_ready(&self) -> bool {
        !self.is_loading && !self.is_error
    }

    pub fn is_footer_idle(&self) -> bool {
        !self.is_loading_footer && !self.is_error_footer
    }

    /// Whether a "load more" trigger at the list end should fire.
    pub fn can_load_more(&self) -> bool {
        self.is_ready() && !self.is_last && self.is_footer_idle()
    }

    /// Ready with nothing to show.
    pub fn is_empty_result(&self) -> bool {
        self.is_ready() && self.items.is_empty()
    }
}

impl<T: Entity> From<&PagingState<T>> for PagingUiState<T> {
    fn from(state: &PagingState<T>) -> Self {
        let phase = state.phase();
        // The footer only exists once the list is on screen.
        let footer = match phase {
            Phase::Ready => state.footer_phase(),
            Phase::InitialLoading | Phase::InitialError => FooterPhase::Idle,
        };
        PagingUiState {
            items: state.items().to_vec(),
            is_loading: phase == Phase::InitialLoading,
            is_error: phase == Phase::InitialError,
            is_loading_footer: footer == FooterPhase::Loading,
            is_error_footer: footer == FooterPhase::Error,
            is_refreshing: state.is_refreshing(),
            is_last: state.is_last(),
            next_cursor: state.next_cursor().map(str::to_owned),
            total_count: state.total_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::page::Page;
    use crate::state::LoadRequest;
    use chrono::Utc;

    #[derive(Clone, Debug, PartialEq)]
    struct Row(u8);

    impl Entity for Row {
        type Id = u8;

        fn id(&self) -> u8 {
            self.0
        }
    }

    fn exactly_one(flags: [bool; 3]) -> bool {
        flags.iter().filter(|f| **f).count() == 1
    }

    fn assert_regions(ui: &PagingUiState<Row>) {
        assert!(exactly_one([ui.is_loading, ui.is_error, ui.is_ready()]));
        assert!(exactly_one([
            ui.is_loading_footer,
            ui.is_error_footer,
            ui.is_footer_idle()
        ]));
    }

    #[test]
    fn test_regions_are_exclusive_through_lifecycle() {
        let next = LoadRequest::Next {
            cursor: "c1".into(),
        };
        let mut state = PagingState::new();
        let ui = PagingUiState::from(&state);
        assert!(ui.is_loading);
        assert_regions(&ui);

        state.complete(
            &LoadRequest::First,
            Err(FetchError::network("offline")),
            Utc::now(),
        );
        let ui = PagingUiState::from(&state);
        assert!(ui.is_error);
        assert!(!ui.can_load_more());
        assert_regions(&ui);

        state.begin(&LoadRequest::First);
        state.complete(
            &LoadRequest::First,
            Ok(Page::with_next(vec![Row(1)], "c1")),
            Utc::now(),
        );
        let ui = PagingUiState::from(&state);
        assert!(ui.is_ready());
        assert!(ui.can_load_more());
        assert_regions(&ui);

        state.begin(&next);
        let ui = PagingUiState::from(&state);
        assert!(ui.is_loading_footer);
        assert!(!ui.can_load_more());
        assert_regions(&ui);

        state.complete(&next, Err(FetchError::network("offline")), Utc::now());
        let ui = PagingUiState::from(&state);
        assert!(ui.is_error_footer);
        assert_eq!(ui.items, vec![Row(1)]);
        assert_regions(&ui);

        state.begin(&next);
        state.complete(&next, Ok(Page::last(vec![Row(2)])), Utc::now());
        let ui = PagingUiState::from(&state);
        assert!(ui.is_last);
        assert!(!ui.can_load_more());
        assert_regions(&ui);
    }

    #[test]
    fn test_empty_result() {
        let mut state = PagingState::<Row>::new();
        state.complete(&LoadRequest::First, Ok(Page::empty()), Utc::now());
        let ui = PagingUiState::from(&state);
        assert!(ui.is_empty_result());
        assert!(ui.is_last);
    }
}

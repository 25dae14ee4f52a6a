//! Debounced member search.
//!
//! Each keyword gets a fresh pager, so end-of-list and cursors never leak
//! from one keyword into the next. Replacing the pager closes the old one,
//! abandoning whatever it was still fetching.

use mople_paging::{Debouncer, PageSource, Pager, PagingUiState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::AppConfig;
use crate::model::Participant;

type SourceFactory = Arc<dyn Fn(&str) -> Arc<dyn PageSource<Participant>> + Send + Sync>;

struct ActiveSearch {
    keyword: String,
    pager: Arc<Pager<Participant>>,
}

pub struct ParticipantSearch {
    factory: SourceFactory,
    debouncer: Debouncer,
    page_size: usize,
    active: Mutex<Option<ActiveSearch>>,
}

impl ParticipantSearch {
    /// `factory` builds the page source for one keyword.
    pub fn new(
        factory: impl Fn(&str) -> Arc<dyn PageSource<Participant>> + Send + Sync + 'static,
        config: &AppConfig,
    ) -> Self {
        Self {
            factory: Arc::new(factory),
            debouncer: Debouncer::new(config.search_debounce()),
            page_size: config.page_size,
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveSearch>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, next: Option<ActiveSearch>) {
        let previous = std::mem::replace(&mut *self.active(), next);
        if let Some(previous) = previous {
            log::debug!("Search for '{}' replaced", previous.keyword);
            previous.pager.close();
        }
    }

    /// Keyword changed. Resolves to the first page once the user stops
    /// typing, or `None` when a later keystroke superseded this one or the
    /// keyword is blank.
    pub async fn search(&self, keyword: &str) -> Option<PagingUiState<Participant>> {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() {
            self.clear();
            return None;
        }
        self.debouncer
            .run(|| async move {
                let pager = Arc::new(Pager::with_source((self.factory)(&keyword), self.page_size));
                log::debug!("Searching members for '{}'", keyword);
                self.replace(Some(ActiveSearch {
                    keyword,
                    pager: pager.clone(),
                }));
                PagingUiState::from(&pager.load_next().await)
            })
            .await
    }

    /// Next page of the current keyword.
    pub async fn load_more(&self) -> Option<PagingUiState<Participant>> {
        let pager = self.active().as_ref().map(|active| active.pager.clone())?;
        Some(PagingUiState::from(&pager.load_next().await))
    }

    pub fn keyword(&self) -> Option<String> {
        self.active().as_ref().map(|active| active.keyword.clone())
    }

    pub fn ui_state(&self) -> Option<PagingUiState<Participant>> {
        self.active().as_ref().map(|active| active.pager.ui_state())
    }

    /// Drop the pending keystroke and the current results.
    pub fn clear(&self) {
        self.debouncer.cancel();
        self.replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use mople_paging::{source_fn, FetchError, Page};
    use std::time::Duration;

    const NICKNAMES: [&str; 5] = ["kim", "kimchi", "kimbap", "lee", "park"];

    fn members_matching(keyword: &str) -> Vec<Participant> {
        NICKNAMES
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(keyword))
            .map(|(i, name)| Participant {
                user_id: UserId(i as u64),
                nickname: name.to_string(),
                image_url: None,
                is_host: i == 0,
            })
            .collect()
    }

    /// Serves matches two per page, cursor = offset. Records the keywords it was built for.
    fn search(built: Arc<Mutex<Vec<String>>>) -> Arc<ParticipantSearch> {
        let factory = move |keyword: &str| -> Arc<dyn PageSource<Participant>> {
            built.lock().unwrap().push(keyword.to_string());
            let all = members_matching(keyword);
            Arc::new(source_fn(move |cursor: Option<String>, size: usize| {
                let offset: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
                let items: Vec<Participant> = all.iter().skip(offset).take(size).cloned().collect();
                let end = offset + items.len();
                let page = if end < all.len() {
                    Page::with_next(items, end.to_string())
                } else {
                    Page::last(items)
                };
                async move { Ok::<_, FetchError>(page) }
            }))
        };
        let config = AppConfig {
            page_size: 2,
            ..AppConfig::default()
        };
        Arc::new(ParticipantSearch::new(factory, &config))
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_keystroke_fetches() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let search = search(built.clone());

        let typing = {
            let search = search.clone();
            tokio::spawn(async move { search.search("k").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let ui = search.search("kim").await.unwrap();

        assert!(typing.await.unwrap().is_none());
        assert_eq!(*built.lock().unwrap(), vec!["kim".to_string()]);
        assert_eq!(ui.items.len(), 2);
        assert!(!ui.is_last);
        assert_eq!(search.keyword().as_deref(), Some("kim"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_keyword_gets_fresh_pager() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let search = search(built);

        search.search("kim").await.unwrap();
        let ui = search.load_more().await.unwrap();
        assert_eq!(ui.items.len(), 3);
        assert!(ui.is_last);

        let ui = search.search("lee").await.unwrap();
        assert_eq!(ui.items.len(), 1);
        assert_eq!(ui.items[0].nickname, "lee");
        assert!(ui.is_last);
        let ui = search.search("park").await.unwrap();
        assert_eq!(ui.items[0].nickname, "park");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_keyword_clears() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let search = search(built);

        search.search("park").await.unwrap();
        assert!(search.ui_state().is_some());

        assert!(search.search("   ").await.is_none());
        assert!(search.keyword().is_none());
        assert!(search.load_more().await.is_none());
    }
}

/// Cursor pager. Drives a `PagingState` from a `PageSource`.
///
/// One `Pager` per list screen. It issues at most one fetch at a time
/// (single-flight): a `load_next` that arrives while a fetch is running is a
/// no-op, and a `refresh` that arrives while a fetch is running is coalesced
/// into the running task, which performs it as soon as its own fetch
/// resolves. Failures never escape; they become `InitialError` or a footer
/// error in the state.
///
/// Fetches run on a task owned by the pager, so a caller that stops waiting
/// (an aborted UI task) neither strands the flight nor loses a coalesced
/// refresh. Only `close()` abandons a fetch. Must be used inside a tokio
/// runtime.
///
/// Observers get every transition through `watch()`.
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::event::ActionEvent;
use crate::limits::clamp_page_size;
use crate::page::{Entity, PageSource};
use crate::state::{EventOutcome, InsertPolicy, LoadRequest, PagingState};
use crate::ui::PagingUiState;

// ---------------------------------------------------------------------------
// Single-flight bookkeeping
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Flight {
    in_flight: bool,
    refresh_pending: bool,
}

/// Held by the task that owns the current fetch.
struct FlightGuard<T: Entity> {
    shared: Arc<Shared<T>>,
    released: bool,
}

impl<T: Entity> FlightGuard<T> {
    /// Release the flight, unless a refresh was requested meanwhile, in
    /// which case the flight is kept and `true` is returned.
    fn release_or_take_refresh(&mut self) -> bool {
        let mut flight = lock(&self.shared.flight);
        if flight.refresh_pending {
            flight.refresh_pending = false;
            true
        } else {
            flight.in_flight = false;
            self.released = true;
            false
        }
    }
}

impl<T: Entity> Drop for FlightGuard<T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let dropped_refresh = {
            let mut flight = lock(&self.shared.flight);
            flight.in_flight = false;
            std::mem::take(&mut flight.refresh_pending)
        };
        if dropped_refresh {
            log::debug!("Pager {}: pending refresh dropped with the fetch", self.shared.id);
        }
        self.shared.state.send_modify(PagingState::abandon);
    }
}

fn lock(flight: &Mutex<Flight>) -> MutexGuard<'_, Flight> {
    flight.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Shared pager core
// ---------------------------------------------------------------------------

struct Shared<T: Entity> {
    id: Uuid,
    source: Arc<dyn PageSource<T>>,
    page_size: usize,
    state: watch::Sender<PagingState<T>>,
    flight: Mutex<Flight>,
    cancel: CancellationToken,
}

impl<T: Entity> Shared<T> {
    /// Fetch loop of one flight. `request` has already been begun.
    async fn drive(self: Arc<Self>, mut guard: FlightGuard<T>, mut request: LoadRequest) {
        loop {
            log::debug!(
                "Pager {}: fetching {} (size {})",
                self.id,
                request.cursor().as_deref().unwrap_or("<first>"),
                self.page_size
            );

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    log::debug!("Pager {}: closed mid-fetch, result discarded", self.id);
                    return;
                }
                result = self.source.fetch(request.cursor(), self.page_size) => result,
            };

            if let Err(err) = &result {
                log::warn!("Pager {}: fetch failed: {}", self.id, err);
            }

            let superseded = {
                let mut flight = lock(&self.flight);
                std::mem::take(&mut flight.refresh_pending)
            };
            if !superseded {
                let now = Utc::now();
                self.state
                    .send_modify(|state| state.complete(&request, result, now));
                if !guard.release_or_take_refresh() {
                    return;
                }
            } else {
                log::info!("Pager {}: refresh requested mid-fetch, page discarded", self.id);
            }

            request = LoadRequest::First;
            self.state.send_modify(|state| {
                state.reset_for_refresh();
                state.begin(&request);
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Pager
// ---------------------------------------------------------------------------

pub struct Pager<T: Entity> {
    shared: Arc<Shared<T>>,
}

impl<T: Entity> Pager<T> {
    pub fn new(source: impl PageSource<T> + 'static, page_size: usize) -> Self {
        Self::with_source(Arc::new(source), page_size)
    }

    /// Build over a shared source (one repository serving several screens).
    pub fn with_source(source: Arc<dyn PageSource<T>>, page_size: usize) -> Self {
        let (state, _) = watch::channel(PagingState::new());
        Pager {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                source,
                page_size: clamp_page_size(page_size),
                state,
                flight: Mutex::new(Flight::default()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn page_size(&self) -> usize {
        self.shared.page_size
    }

    pub fn snapshot(&self) -> PagingState<T> {
        self.shared.state.borrow().clone()
    }

    pub fn ui_state(&self) -> PagingUiState<T> {
        PagingUiState::from(&*self.shared.state.borrow())
    }

    /// Receiver notified on every state transition.
    pub fn watch(&self) -> watch::Receiver<PagingState<T>> {
        self.shared.state.subscribe()
    }

    pub fn is_in_flight(&self) -> bool {
        lock(&self.shared.flight).in_flight
    }

    /// Tear down: any in-flight fetch is abandoned and its result discarded.
    pub fn close(&self) {
        if !self.shared.cancel.is_cancelled() {
            log::debug!("Pager {} closed", self.shared.id);
        }
        self.shared.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Fetch the next page (or retry the failed one).
    ///
    /// No-op when a fetch is already running, the list is exhausted, or the
    /// pager is closed.
    pub async fn load_next(&self) -> PagingState<T> {
        if self.is_closed() {
            return self.snapshot();
        }
        let Some(mut guard) = self.try_acquire(false) else {
            log::debug!("Pager {}: fetch in flight, load_next ignored", self.id());
            return self.snapshot();
        };
        let next = self.shared.state.borrow().next_request();
        let request = match next {
            Some(request) => request,
            None => {
                log::debug!("Pager {}: list exhausted, load_next ignored", self.id());
                if !guard.release_or_take_refresh() {
                    return self.snapshot();
                }
                self.shared.state.send_modify(PagingState::reset_for_refresh);
                LoadRequest::First
            }
        };
        self.run(guard, request).await
    }

    /// Restart from the first page, keeping current items visible until the
    /// new first page resolves.
    pub async fn refresh(&self) -> PagingState<T> {
        if self.is_closed() {
            return self.snapshot();
        }
        let Some(guard) = self.try_acquire(true) else {
            log::info!("Pager {}: fetch in flight, refresh coalesced", self.id());
            return self.snapshot();
        };
        self.shared.state.send_modify(PagingState::reset_for_refresh);
        self.run(guard, LoadRequest::First).await
    }

    /// Feed a bus event into the state; notifies observers only on change.
    pub fn apply_event(
        &self,
        event: &ActionEvent<T>,
        policy: &InsertPolicy<T>,
        accepts: Option<&(dyn Fn(&T) -> bool + Send + Sync)>,
    ) -> EventOutcome {
        let mut outcome = EventOutcome::Neutral;
        self.shared.state.send_if_modified(|state| {
            outcome = state.apply_event(event, policy, accepts);
            outcome == EventOutcome::Applied
        });
        outcome
    }

    fn try_acquire(&self, for_refresh: bool) -> Option<FlightGuard<T>> {
        let mut flight = lock(&self.shared.flight);
        if flight.in_flight {
            if for_refresh {
                flight.refresh_pending = true;
            }
            return None;
        }
        flight.in_flight = true;
        flight.refresh_pending = false;
        Some(FlightGuard {
            shared: self.shared.clone(),
            released: false,
        })
    }

    /// Begin `request` and hand the flight to a pager-owned task.
    async fn run(&self, guard: FlightGuard<T>, request: LoadRequest) -> PagingState<T> {
        self.shared.state.send_modify(|state| state.begin(&request));
        let task = tokio::spawn(Shared::drive(self.shared.clone(), guard, request));
        if let Err(err) = task.await {
            log::error!("Pager {}: fetch task failed: {}", self.id(), err);
        }
        self.snapshot()
    }
}

impl<T: Entity> Drop for Pager<T> {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

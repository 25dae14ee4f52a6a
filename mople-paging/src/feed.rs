/// The view-model half of a paginated screen.
///
/// A `Feed` owns a `Pager` and, optionally, one subscription on the entity's
/// event channel. The subscription is serviced by a spawned listener that
/// patches the pager's items in place (`Update`, `Delete`, `Create`), reloads
/// on `Invalidate`, and drops anything stamped before the current page load.
/// Closing or dropping the feed cancels both the listener and any in-flight
/// fetch.
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::event::{EventChannel, Subscription};
use crate::page::Entity;
use crate::pager::Pager;
use crate::state::{EventOutcome, InsertPolicy, PagingState};
use crate::ui::PagingUiState;

type Accepts<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

pub struct FeedBuilder<T: Entity> {
    pager: Pager<T>,
    policy: InsertPolicy<T>,
    accepts: Option<Accepts<T>>,
}

impl<T: Entity> FeedBuilder<T> {
    /// Where `Create` events land. Defaults to the head of the list.
    pub fn insert_policy(mut self, policy: InsertPolicy<T>) -> Self {
        self.policy = policy;
        self
    }

    /// Only `Create` events passing `accepts` are inserted.
    pub fn accepts(mut self, accepts: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.accepts = Some(Arc::new(accepts));
        self
    }

    /// A feed that only pages; nothing else can patch it.
    pub fn build(self) -> Feed<T> {
        Feed {
            pager: Arc::new(self.pager),
            cancel: CancellationToken::new(),
            listener: None,
        }
    }

    /// A feed kept in sync through `channel`. Must be called inside a tokio
    /// runtime.
    pub fn listen<C>(self, channel: &C) -> Feed<T>
    where
        C: EventChannel<T> + ?Sized,
    {
        let subscription = channel.subscribe();
        let pager = Arc::new(self.pager);
        let cancel = CancellationToken::new();
        let listener = tokio::spawn(run_listener(
            pager.clone(),
            subscription,
            self.policy,
            self.accepts,
            cancel.clone(),
        ));
        Feed {
            pager,
            cancel,
            listener: Some(listener),
        }
    }
}

pub struct Feed<T: Entity> {
    pager: Arc<Pager<T>>,
    cancel: CancellationToken,
    listener: Option<JoinHandle<()>>,
}

impl<T: Entity> Feed<T> {
    pub fn builder(pager: Pager<T>) -> FeedBuilder<T> {
        FeedBuilder {
            pager,
            policy: InsertPolicy::Head,
            accepts: None,
        }
    }

    pub fn pager(&self) -> &Arc<Pager<T>> {
        &self.pager
    }

    pub async fn load_next(&self) -> PagingUiState<T> {
        PagingUiState::from(&self.pager.load_next().await)
    }

    pub async fn refresh(&self) -> PagingUiState<T> {
        PagingUiState::from(&self.pager.refresh().await)
    }

    pub fn ui_state(&self) -> PagingUiState<T> {
        self.pager.ui_state()
    }

    pub fn watch(&self) -> watch::Receiver<PagingState<T>> {
        self.pager.watch()
    }

    pub fn is_listening(&self) -> bool {
        self.listener
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Tear down: stop listening and abandon any in-flight fetch.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.pager.close();
        self.listener = None;
    }

    /// Like `close`, but waits for the listener to release its subscription.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        self.pager.close();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
    }
}

impl<T: Entity> Drop for Feed<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.pager.close();
    }
}

async fn run_listener<T: Entity>(
    pager: Arc<Pager<T>>,
    mut subscription: Subscription<T>,
    policy: InsertPolicy<T>,
    accepts: Option<Accepts<T>>,
    cancel: CancellationToken,
) {
    let channel = subscription.channel();
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = subscription.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        let kind = event.action.name();
        match pager.apply_event(&event, &policy, accepts.as_deref()) {
            EventOutcome::Refresh => {
                log::info!("Pager {}: '{}' invalidated, reloading", pager.id(), channel);
                pager.refresh().await;
            }
            EventOutcome::Stale => {
                log::debug!("Pager {}: stale {} on '{}' dropped", pager.id(), kind, channel)
            }
            EventOutcome::Applied => {
                log::debug!("Pager {}: applied {} from '{}'", pager.id(), kind, channel)
            }
            EventOutcome::Neutral | EventOutcome::Unchanged | EventOutcome::Filtered => {}
        }
    }
    log::debug!("Pager {}: listener on '{}' stopped", pager.id(), channel);
}

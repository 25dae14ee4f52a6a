/// Last-call-wins debounce gate for keyword search.
///
/// Each `run` cancels whatever the previous `run` was doing, whether it is
/// still waiting out the delay or already fetching, and then waits the delay
/// itself. Only the most recent call ever produces a value.
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Debouncer {
    delay: Duration,
    current: Mutex<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Supersede the pending call without starting a new one.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Run `f` after the delay unless another `run` (or `cancel`) comes in
    /// first. Returns `None` when superseded.
    pub async fn run<F, Fut>(&self, f: F) -> Option<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let token = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            current.cancel();
            *current = CancellationToken::new();
            current.clone()
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            _ = tokio::time::sleep(self.delay) => {}
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            output = f() => Some(output),
        }
    }
}

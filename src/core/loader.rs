//! One-shot rate loading and the loading/loaded state it drives

use crate::core::rates::{BASE_CURRENCY, RateProvider, RateSnapshot, RateTable, UpdateWindow};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Rates could not be loaded. Carries no detail; the cause is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Exchange rates could not be loaded")]
pub struct LoadFailure;

pub type LoadOutcome = Result<RateSnapshot, LoadFailure>;

/// Fetches the USD rate table once, collapsing every error into [`LoadFailure`].
pub async fn load(provider: &dyn RateProvider) -> LoadOutcome {
    match provider.fetch_rates(BASE_CURRENCY).await {
        Ok(snapshot) => {
            debug!(currencies = snapshot.rates.len(), "Rates loaded");
            Ok(snapshot)
        }
        Err(e) => {
            warn!(error = %e, "Rate load failed");
            Err(LoadFailure)
        }
    }
}

/// An in-flight load whose outcome has not been consumed yet.
pub struct PendingLoad {
    rx: oneshot::Receiver<LoadOutcome>,
}

impl PendingLoad {
    /// Returns the outcome if the load has finished, without waiting.
    pub fn try_take(&mut self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            // The loading task died without reporting
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(LoadFailure)),
        }
    }

    pub async fn wait(self) -> LoadOutcome {
        self.rx.await.unwrap_or(Err(LoadFailure))
    }
}

/// Starts [`load`] on a background task.
///
/// If the receiving side is dropped before the fetch completes, the outcome is discarded.
pub fn spawn_load(provider: Arc<dyn RateProvider>) -> PendingLoad {
    let (pending, _task) = spawn_load_task(provider);
    pending
}

/// Like [`spawn_load`], also returning the task handle. The task resolves to
/// whether the outcome reached the receiver.
fn spawn_load_task(provider: Arc<dyn RateProvider>) -> (PendingLoad, JoinHandle<bool>) {
    let (tx, rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        let outcome = load(provider.as_ref()).await;
        match tx.send(outcome) {
            Ok(()) => true,
            Err(_) => {
                debug!("Session closed before rates arrived, discarding");
                false
            }
        }
    });
    (PendingLoad { rx }, task)
}

/// Loading flag plus whatever the load produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState {
    loading: bool,
    loaded: bool,
    rates: RateTable,
    update_window: Option<UpdateWindow>,
}

impl LoadState {
    pub fn new() -> Self {
        Self {
            loading: true,
            loaded: false,
            rates: RateTable::new(),
            update_window: None,
        }
    }

    /// Records the load outcome. Only the first outcome is kept.
    pub fn apply(&mut self, outcome: LoadOutcome) {
        if !self.loading {
            debug!("Ignoring repeated load outcome");
            return;
        }
        self.loading = false;
        if let Ok(snapshot) = outcome {
            self.loaded = true;
            self.rates = snapshot.rates;
            self.update_window = Some(snapshot.update_window);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The loaded rates; empty while loading or after a failed load.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn update_window(&self) -> Option<&UpdateWindow> {
        self.update_window.as_ref()
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}

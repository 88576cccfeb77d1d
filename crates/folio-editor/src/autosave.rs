//! Debounced autosave scheduler.
//!
//! [`Autosave::spawn`] starts one tokio task per open note. The caller feeds
//! it the latest watched value through [`AutosaveHandle::watch`]; a value that
//! differs from the last one seen restarts the quiet-period timer, and when the
//! timer runs out the [`SaveAction`] is invoked with the newest value.
//!
//! Saves are spawned detached from the scheduler task, so tearing the handle
//! down cancels a pending timer but never interrupts a save already running.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

use folio_core::defaults::AUTOSAVE_DELAY_MS;

/// Work performed when the quiet period elapses.
#[async_trait]
pub trait SaveAction<T>: Send + Sync + 'static {
    async fn save(&self, value: T);
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last change before saving.
    pub delay: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(AUTOSAVE_DELAY_MS),
        }
    }
}

impl AutosaveConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `FOLIO_AUTOSAVE_DELAY_MS` | `1500` | Quiet period before saving |
    pub fn from_env() -> Self {
        let delay = std::env::var("FOLIO_AUTOSAVE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Self::default().delay);
        Self { delay }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Entry point for starting schedulers.
pub struct Autosave;

impl Autosave {
    /// Start a scheduler. `initial` counts as already seen, so it never
    /// triggers a save by itself.
    pub fn spawn<T, A>(config: AutosaveConfig, action: Arc<A>, initial: T) -> AutosaveHandle<T>
    where
        T: Clone + PartialEq + Send + 'static,
        A: SaveAction<T> + ?Sized,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(config.delay, action, initial, rx));
        AutosaveHandle {
            tx: Some(tx),
            task: Some(task),
        }
    }
}

/// Handle to a running scheduler. Dropping it cancels any pending save.
pub struct AutosaveHandle<T> {
    tx: Option<mpsc::UnboundedSender<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> AutosaveHandle<T> {
    /// Report the current watched value.
    pub fn watch(&self, value: T) {
        if let Some(tx) = &self.tx {
            // Closed only after shutdown, when changes no longer matter.
            let _ = tx.send(value);
        }
    }

    /// Stop the scheduler, discarding any pending save.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.tx.take();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for AutosaveHandle<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[instrument(skip_all, fields(subsystem = "editor", component = "autosave", delay_ms = delay.as_millis() as u64))]
async fn run<T, A>(
    delay: Duration,
    action: Arc<A>,
    initial: T,
    mut rx: mpsc::UnboundedReceiver<T>,
) where
    T: Clone + PartialEq + Send + 'static,
    A: SaveAction<T> + ?Sized,
{
    let mut last = initial;
    let mut pending = false;
    let timer = sleep(delay);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(value) => {
                    if value != last {
                        last = value;
                        pending = true;
                        timer.as_mut().reset(Instant::now() + delay);
                    }
                }
                None => break,
            },
            _ = timer.as_mut(), if pending => {
                pending = false;
                debug!(op = "fire", "Autosave timer elapsed");
                let action = action.clone();
                let value = last.clone();
                tokio::spawn(async move {
                    action.save(value).await;
                });
            }
        }
    }

    if pending {
        debug!(op = "cancel", "Pending autosave discarded");
    }
}

//! Background page poller for a mounted stories screen.
//!
//! One poller task exists per mount. It requests page 0 immediately, then one
//! page per interval, and reports every step as a [`ListEvent`] tagged with
//! the mount generation. Requests are awaited in sequence, so two fetches
//! from the same poller never overlap.
use crate::app::AppEvent;
use crate::list::ListEvent;
use crate::source::StorySource;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default time between page requests.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Owns the poller task of one stories-screen mount.
///
/// Dropping the handle aborts the task, so a screen that is torn down
/// without an explicit [`PollerHandle::stop`] still stops polling.
pub struct PollerHandle {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once the task has exited (aborted, channel closed, or panicked).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Abort the poller. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "Stopped story poller");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the poller for mount `generation`.
///
/// The task ends on its own when the event receiver is dropped.
pub fn spawn_poller<S: StorySource>(
    source: Arc<S>,
    interval: Duration,
    generation: u64,
    event_tx: mpsc::Sender<AppEvent>,
) -> PollerHandle {
    tracing::debug!(generation, interval_ms = interval.as_millis() as u64, "Starting story poller");

    let tx_panic = event_tx.clone();
    let handle = tokio::spawn(async move {
        let run = AssertUnwindSafe(poll_pages(source, interval, generation, event_tx));
        if let Err(panic) = run.catch_unwind().await {
            let error = panic_message(panic);
            tracing::error!(task = "story_poller", generation, error = %error, "Background task panicked");
            let _ = tx_panic
                .send(AppEvent::TaskPanicked {
                    task: "story_poller",
                    error,
                })
                .await;
        }
    });

    PollerHandle {
        generation,
        handle: Some(handle),
    }
}

async fn poll_pages<S: StorySource>(
    source: Arc<S>,
    interval: Duration,
    generation: u64,
    event_tx: mpsc::Sender<AppEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut page: u32 = 0;

    loop {
        // First tick completes immediately.
        ticker.tick().await;

        if !send(&event_tx, generation, ListEvent::FetchStarted { page }).await {
            break;
        }

        let event = match source.fetch_page(page).await {
            Ok(hits) => {
                let event = ListEvent::FetchSucceeded { page, hits };
                page = page.saturating_add(1);
                event
            }
            Err(e) => ListEvent::FetchFailed {
                page,
                message: e.to_string(),
            },
        };

        if !send(&event_tx, generation, event).await {
            break;
        }
    }

    tracing::debug!(generation, "Story poller exiting (receiver dropped)");
}

/// Returns false once the receiver is gone.
async fn send(tx: &mpsc::Sender<AppEvent>, generation: u64, event: ListEvent) -> bool {
    tx.send(AppEvent::Stories { generation, event }).await.is_ok()
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

//! Autosave service: debounced write of the project snapshot.
//!
//! DESIGN
//! ======
//! A single background task owns one debounce timer. Every edit sends the
//! latest snapshot down a channel; the task replaces whatever was pending
//! and pushes the deadline out to `delay` from now. Only when edits stop for
//! the full delay is the snapshot written with update-by-id. Superseded
//! snapshots are never written.
//!
//! Dirty tracking is revision based. The editor bumps `SaveTracker` on each
//! edit and tags the job with that revision; a successful write marks the
//! revision saved, so an edit that lands while a write is in flight keeps the
//! project dirty.
//!
//! ERROR HANDLING
//! ==============
//! Writes go through the fallback facade: a failed write is logged and the
//! project stays dirty. The next edit schedules another attempt.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::project::{ProjectId, ProjectPatch};
use crate::store::{ProjectStore, update_project};

// =============================================================================
// SAVE TRACKER
// =============================================================================

/// Edit and save revision counters shared by the editor and the autosaver.
#[derive(Debug, Default)]
pub struct SaveTracker {
    revision: AtomicU64,
    saved: AtomicU64,
}

impl SaveTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit and return its revision.
    pub fn mark_dirty(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record that everything up to and including `revision` is persisted.
    pub fn mark_saved(&self, revision: u64) {
        self.saved.fetch_max(revision, Ordering::SeqCst);
    }

    /// Treat the current state as persisted.
    pub fn mark_clean(&self) {
        self.mark_saved(self.revision());
    }

    /// Latest edit revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Whether any edit is newer than the last save.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.revision() > self.saved.load(Ordering::SeqCst)
    }
}

// =============================================================================
// JOBS
// =============================================================================

/// One snapshot waiting to be written.
#[derive(Debug, Clone)]
pub struct AutosaveJob {
    pub project_id: ProjectId,
    pub patch: ProjectPatch,
    /// Edit revision this snapshot reflects.
    pub revision: u64,
}

enum Command {
    Touch(AutosaveJob),
    Cancel,
    Flush(oneshot::Sender<()>),
}

// =============================================================================
// AUTOSAVER
// =============================================================================

/// Handle to the debounce task.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the debounce task. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn ProjectStore>, tracker: Arc<SaveTracker>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        info!(delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "autosave configured");
        let handle = tokio::spawn(run(rx, store, tracker, delay));
        Self { tx, handle }
    }

    /// Schedule `job`, replacing anything pending and restarting the timer.
    pub fn touch(&self, job: AutosaveJob) {
        if self.tx.send(Command::Touch(job)).is_err() {
            warn!("autosave task stopped; edit not scheduled");
        }
    }

    /// Drop the pending snapshot without writing it.
    pub fn cancel(&self) {
        if self.tx.send(Command::Cancel).is_err() {
            warn!("autosave task stopped; cancel ignored");
        }
    }

    /// Write the pending snapshot now, if there is one, and wait for it.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_err() {
            warn!("autosave task stopped; flush ignored");
            return;
        }
        if done_rx.await.is_err() {
            warn!("autosave task dropped flush acknowledgement");
        }
    }

    /// Flush whatever is pending and stop the task.
    pub async fn shutdown(self) {
        let Self { tx, handle } = self;
        drop(tx);
        if let Err(e) = handle.await {
            warn!(error = %e, "autosave task ended abnormally");
        }
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<Command>,
    store: Arc<dyn ProjectStore>,
    tracker: Arc<SaveTracker>,
    delay: Duration,
) {
    let mut pending: Option<AutosaveJob> = None;
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(Command::Touch(job)) => {
                    pending = Some(job);
                    deadline = Instant::now() + delay;
                }
                Some(Command::Cancel) => {
                    if pending.take().is_some() {
                        debug!("pending autosave cancelled");
                    }
                }
                Some(Command::Flush(done)) => {
                    if let Some(job) = pending.take() {
                        write(store.as_ref(), &tracker, job).await;
                    }
                    if done.send(()).is_err() {
                        debug!("flush requester went away");
                    }
                }
                None => {
                    if let Some(job) = pending.take() {
                        write(store.as_ref(), &tracker, job).await;
                    }
                    break;
                }
            },
            () = tokio::time::sleep_until(deadline), if pending.is_some() => {
                if let Some(job) = pending.take() {
                    write(store.as_ref(), &tracker, job).await;
                }
            }
        }
    }
}

async fn write(store: &dyn ProjectStore, tracker: &SaveTracker, job: AutosaveJob) {
    let AutosaveJob { project_id, patch, revision } = job;
    if update_project(store, &project_id, &patch).await.is_some() {
        tracker.mark_saved(revision);
        debug!(id = %project_id, revision, "autosaved");
    }
}

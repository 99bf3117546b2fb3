//! Scan progress poller.
//!
//! The backend never pushes progress, so the progress view polls it on a
//! fixed interval. [`PollState`] is the pure state machine; [`ProgressPoller`]
//! drives it from a spawned task whose lifetime is owned by a [`PollHandle`].
//!
//! ```text
//! Loading ──ok──▶ Displaying ──ok(terminal)──▶ Terminal (timer cancelled)
//!    │                │  ▲
//!   err              err │ok
//!    ▼                ▼  │
//!  Error { last: None }  Error { last: Some(snapshot) }   (polling continues)
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, ScanProgress, ScanStatus};
use crate::notify::Notification;

/// Anything that can produce a progress snapshot for a scan.
pub trait ProgressSource: Send + Sync + 'static {
    fn fetch_progress(
        &self,
        scan_result_id: u64,
    ) -> impl Future<Output = Result<ScanProgress, ApiError>> + Send;
}

impl ProgressSource for ApiClient {
    fn fetch_progress(
        &self,
        scan_result_id: u64,
    ) -> impl Future<Output = Result<ScanProgress, ApiError>> + Send {
        self.scan_progress(scan_result_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// No snapshot yet
    Loading,
    Displaying(ScanProgress),
    /// COMPLETED or FAILED was observed; polling has stopped
    Terminal(ScanProgress),
    /// Last fetch failed; the previous snapshot, if any, is kept
    Error {
        last: Option<ScanProgress>,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PollState,
    pub notification: Option<Notification>,
}

impl PollState {
    pub fn snapshot(&self) -> Option<&ScanProgress> {
        match self {
            PollState::Loading => None,
            PollState::Displaying(snapshot) | PollState::Terminal(snapshot) => Some(snapshot),
            PollState::Error { last, .. } => last.as_ref(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Terminal(_))
    }

    /// Applies one tick's outcome. The terminal notification is produced only
    /// on the transition into [`PollState::Terminal`].
    pub fn apply(&self, outcome: Result<ScanProgress, String>) -> Transition {
        if self.is_terminal() {
            return Transition {
                state: self.clone(),
                notification: None,
            };
        }

        match outcome {
            Ok(snapshot) if snapshot.status.is_terminal() => {
                let notification = match snapshot.status {
                    ScanStatus::Completed => Notification::success("Scan completed successfully"),
                    _ => Notification::error("Scan failed"),
                };

                Transition {
                    state: PollState::Terminal(snapshot),
                    notification: Some(notification),
                }
            }
            Ok(snapshot) => Transition {
                state: PollState::Displaying(snapshot),
                notification: None,
            },
            Err(message) => Transition {
                state: PollState::Error {
                    last: self.snapshot().cloned(),
                    message,
                },
                notification: None,
            },
        }
    }
}

/// Display-only breakdown of the overall progress into the two scan phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spidering { percent: u32 },
    ActiveScan { percent: u32 },
}

impl Phase {
    pub fn from_progress(progress: f64) -> Self {
        if progress < 50.0 {
            Phase::Spidering {
                percent: (progress * 2.0).round() as u32,
            }
        } else {
            Phase::ActiveScan {
                percent: ((progress - 50.0) * 2.0).round() as u32,
            }
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Spidering { percent } => {
                write!(f, "Crawling site pages (spider scan: {percent}%)")
            }
            Phase::ActiveScan { percent } => {
                write!(f, "Scanning for vulnerabilities (active scan: {percent}%)")
            }
        }
    }
}

/// What the view receives after each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    pub state: PollState,
    pub notification: Option<Notification>,
}

pub struct ProgressPoller<S> {
    source: Arc<S>,
    scan_result_id: u64,
    interval: Duration,
}

impl<S: ProgressSource> ProgressPoller<S> {
    pub fn new(source: Arc<S>, scan_result_id: u64, interval: Duration) -> Self {
        Self {
            source,
            scan_result_id,
            interval,
        }
    }

    /// Starts polling. The first fetch happens immediately, then once per
    /// interval. Dropping or unmounting the returned handle stops it.
    pub fn mount(self) -> (PollHandle, mpsc::UnboundedReceiver<PollUpdate>) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_loop(
            self.source,
            self.scan_result_id,
            self.interval,
            shutdown_rx,
            tx,
        ));

        let handle = PollHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        };

        (handle, rx)
    }
}

async fn run_loop<S: ProgressSource>(
    source: Arc<S>,
    scan_result_id: u64,
    interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
    updates: mpsc::UnboundedSender<PollUpdate>,
) -> PollState {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut state = PollState::Loading;

    info!(scan = scan_result_id, ?interval, "progress polling started");

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        // a response arriving after unmount is dropped with the future
        let outcome = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            outcome = source.fetch_progress(scan_result_id) => outcome,
        };

        let outcome = outcome.map_err(|e| {
            warn!(scan = scan_result_id, error = %e, "progress fetch failed");
            format!("could not fetch scan progress: {e}")
        });

        let transition = state.apply(outcome);
        state = transition.state.clone();

        debug!(scan = scan_result_id, ?state, "poll tick");

        let update = PollUpdate {
            state: transition.state,
            notification: transition.notification,
        };

        if updates.send(update).is_err() {
            debug!(scan = scan_result_id, "view is gone");
            break;
        }

        if state.is_terminal() {
            info!(scan = scan_result_id, "scan reached a terminal state, polling stopped");
            break;
        }
    }

    state
}

/// Owns the polling task of one mounted progress view. Dropping it drops
/// the shutdown sender, which stops the task as well.
pub struct PollHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PollState>>,
}

impl PollHandle {
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancels the timer and waits for the task to wind down, returning the
    /// last state it held.
    pub async fn unmount(mut self) -> Option<PollState> {
        if let Some(shutdown) = self.shutdown.take() {
            // the task may already be gone after a terminal state
            let _ = shutdown.send(());
        }

        let task = self.task.take()?;
        task.await.ok()
    }
}

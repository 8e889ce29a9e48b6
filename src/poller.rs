//! Preview polling.
//!
//! A [`PreviewPoller`] owns at most one polling task. Starting a poll cancels
//! the previous one, and every result is checked against the poll generation
//! it belongs to before it may touch the presenter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::ClientConfig;
use crate::download::DownloadLink;
use crate::error::LuminousError;
use crate::presenter::Presenter;
use crate::service::GenerationService;
use crate::types::{JobId, PreviewStatus};

/// Shown when a status query fails at the transport level.
pub const POLL_ERROR_MESSAGE: &str = "Error loading preview";
/// Shown when the service reports success but sends no preview URL.
pub const MISSING_URL_MESSAGE: &str = "Preview finished without an image";
/// Shown when the service reports the job failed.
pub const JOB_FAILED_MESSAGE: &str = "Wallpaper generation failed";
/// Shown when the poll timeout or attempt ceiling is hit.
pub const TIMEOUT_MESSAGE: &str = "Timed out waiting for preview";

/// Cadence and optional ceilings for a poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Option<Duration>,
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            timeout: None,
            max_attempts: None,
        }
    }
}

impl PollSettings {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max);
        self
    }
}

impl From<&ClientConfig> for PollSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval,
            timeout: config.poll_timeout,
            max_attempts: config.max_attempts,
        }
    }
}

/// Lifecycle of the poller: `Idle -> Polling -> {Done, Failed}`.
#[derive(Debug, Clone)]
pub enum PollState {
    Idle,
    Polling {
        job_id: JobId,
    },
    Done {
        job_id: JobId,
        link: DownloadLink,
    },
    Failed {
        job_id: JobId,
        message: String,
        error: Arc<LuminousError>,
    },
}

impl PollState {
    /// Done and Failed are terminal: no more queries are issued for the job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }

    pub fn is_polling(&self) -> bool {
        matches!(self, Self::Polling { .. })
    }

    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Self::Idle => None,
            Self::Polling { job_id } | Self::Done { job_id, .. } | Self::Failed { job_id, .. } => {
                Some(job_id)
            }
        }
    }
}

struct PollTask {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    task: Mutex<PollTask>,
    state: watch::Sender<PollState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PollTask> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a terminal state if `generation` is still the current poll.
    ///
    /// The presenter is called under the task lock, so a concurrent
    /// `cancel()` or `start()` either runs first and the result is dropped,
    /// or runs after the UI has been updated.
    fn finish<P: Presenter>(&self, generation: u64, terminal: PollState, presenter: &P) -> bool {
        let mut task = self.lock();
        if task.generation != generation {
            tracing::warn!(
                job_id = ?terminal.job_id(),
                "Discarding result from a superseded poll"
            );
            return false;
        }

        match &terminal {
            PollState::Done { link, .. } => presenter.show_result(link),
            PollState::Failed { message, .. } => presenter.show_error(message),
            PollState::Idle | PollState::Polling { .. } => {}
        }
        self.state.send_replace(terminal);
        task.handle = None;
        true
    }
}

/// Polls a job's preview status until it is ready, fails, or is cancelled.
///
/// The poll handle is owned by the instance, so restarts go through
/// [`start()`](Self::start) which always stops the previous loop first.
pub struct PreviewPoller<S, P> {
    service: Arc<S>,
    presenter: Arc<P>,
    settings: PollSettings,
    shared: Arc<Shared>,
}

impl<S, P> PreviewPoller<S, P>
where
    S: GenerationService + 'static,
    P: Presenter + 'static,
{
    pub fn new(service: Arc<S>, presenter: Arc<P>, settings: PollSettings) -> Self {
        let (state, _) = watch::channel(PollState::Idle);
        Self {
            service,
            presenter,
            settings,
            shared: Arc::new(Shared {
                task: Mutex::new(PollTask {
                    generation: 0,
                    handle: None,
                }),
                state,
            }),
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PollState {
        self.shared.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.shared.state.subscribe()
    }

    /// Begin polling `job_id`, cancelling any poll already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, job_id: JobId) {
        let mut task = self.shared.lock();
        task.generation += 1;
        if let Some(previous) = task.handle.take() {
            previous.abort();
            tracing::debug!("Cancelled previous poll before starting a new one");
        }

        tracing::info!(job_id = %job_id, interval = ?self.settings.interval, "Polling for preview");
        self.shared.state.send_replace(PollState::Polling {
            job_id: job_id.clone(),
        });

        let run = PollRun {
            service: Arc::clone(&self.service),
            presenter: Arc::clone(&self.presenter),
            shared: Arc::clone(&self.shared),
            settings: self.settings,
            job_id,
            generation: task.generation,
        };
        task.handle = Some(tokio::spawn(run.run()));
    }

    /// Stop polling. Safe to call when nothing is running.
    ///
    /// Returns `true` if a poll loop was stopped. A Polling state goes back
    /// to Idle; terminal states are left as they are.
    pub fn cancel(&self) -> bool {
        let mut task = self.shared.lock();
        task.generation += 1;
        let stopped = match task.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        };
        self.shared.state.send_if_modified(|state| {
            if state.is_polling() {
                *state = PollState::Idle;
                true
            } else {
                false
            }
        });
        if stopped {
            tracing::debug!("Preview polling cancelled");
        }
        stopped
    }

    /// Wait until the poller leaves the Polling state and return where it landed.
    pub async fn wait(&self) -> PollState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_polling()).await {
            Ok(state) => state.clone(),
            Err(_) => PollState::Idle,
        };
        settled
    }
}

impl<S, P> Drop for PreviewPoller<S, P> {
    fn drop(&mut self) {
        if let Some(handle) = self.shared.lock().handle.take() {
            handle.abort();
        }
    }
}

/// Everything one poll loop needs, moved into its task.
struct PollRun<S, P> {
    service: Arc<S>,
    presenter: Arc<P>,
    shared: Arc<Shared>,
    settings: PollSettings,
    job_id: JobId,
    generation: u64,
}

impl<S, P> PollRun<S, P>
where
    S: GenerationService,
    P: Presenter,
{
    async fn run(self) {
        let interval = self.settings.interval;
        if interval.is_zero() {
            tracing::error!(job_id = %self.job_id, "Poll interval must be greater than zero");
            self.fail(
                POLL_ERROR_MESSAGE,
                LuminousError::InvalidConfig("poll interval must be greater than zero".into()),
            );
            return;
        }

        let started = Instant::now();
        let deadline = self.settings.timeout.map(|timeout| started + timeout);
        let mut ticker = tokio::time::interval_at(started + interval, interval);
        // A slow query must not be followed by a burst of catch-up queries.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut attempts: u32 = 0;

        loop {
            ticker.tick().await;

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                self.fail(TIMEOUT_MESSAGE, LuminousError::Timeout);
                return;
            }

            attempts += 1;
            tracing::debug!(job_id = %self.job_id, attempt = attempts, "Querying preview status");

            let query = self.service.poll_preview(&self.job_id);
            let outcome = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, query).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        tracing::warn!(job_id = %self.job_id, "Preview query outlived the poll timeout");
                        self.fail(TIMEOUT_MESSAGE, LuminousError::Timeout);
                        return;
                    }
                },
                None => query.await,
            };

            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(job_id = %self.job_id, error = %e, "Preview query failed");
                    self.fail(POLL_ERROR_MESSAGE, e);
                    return;
                }
            };

            match result.status {
                PreviewStatus::Success => match result.ready_url() {
                    Some(url) => {
                        tracing::info!(job_id = %self.job_id, url, attempts, "Preview ready");
                        let terminal = PollState::Done {
                            job_id: self.job_id.clone(),
                            link: DownloadLink::new(url),
                        };
                        self.shared.finish(self.generation, terminal, &*self.presenter);
                        return;
                    }
                    None => {
                        tracing::warn!(
                            job_id = %self.job_id,
                            "Service reported success without a preview URL"
                        );
                        self.fail(
                            MISSING_URL_MESSAGE,
                            LuminousError::MissingPreviewUrl {
                                job_id: self.job_id.to_string(),
                            },
                        );
                        return;
                    }
                },
                PreviewStatus::Error(status) => {
                    let reason = result.message.unwrap_or(status);
                    tracing::warn!(job_id = %self.job_id, reason = %reason, "Job failed");
                    self.fail(JOB_FAILED_MESSAGE, LuminousError::GenerationFailed(reason));
                    return;
                }
                PreviewStatus::Pending(status) => {
                    tracing::debug!(job_id = %self.job_id, status = %status, "Preview not ready");
                }
            }

            if let Some(max) = self.settings.max_attempts {
                if attempts >= max {
                    self.fail(TIMEOUT_MESSAGE, LuminousError::Timeout);
                    return;
                }
            }
        }
    }

    fn fail(&self, message: &str, error: LuminousError) {
        let terminal = PollState::Failed {
            job_id: self.job_id.clone(),
            message: message.to_string(),
            error: Arc::new(error),
        };
        self.shared.finish(self.generation, terminal, &*self.presenter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPresenter {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl CountingPresenter {
        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }

        fn bump(&self) {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl Presenter for CountingPresenter {
        fn show_loading(&self) {
            self.bump();
        }

        fn hide_download(&self) {
            self.bump();
        }

        fn show_error(&self, _message: &str) {
            self.bump();
        }

        fn show_result(&self, _link: &DownloadLink) {
            self.bump();
        }
    }

    fn shared_at(generation: u64) -> Shared {
        let (state, _) = watch::channel(PollState::Idle);
        Shared {
            task: Mutex::new(PollTask {
                generation,
                handle: None,
            }),
            state,
        }
    }

    #[test]
    fn test_finish_discards_superseded_generation() {
        let shared = shared_at(2);
        let presenter = CountingPresenter::default();
        let stale = PollState::Done {
            job_id: JobId::new("old"),
            link: DownloadLink::new("/old.png"),
        };

        assert!(!shared.finish(1, stale, &presenter));
        assert_eq!(presenter.calls(), 0);
        assert!(matches!(*shared.state.borrow(), PollState::Idle));
    }

    #[test]
    fn test_finish_applies_current_generation() {
        let shared = shared_at(2);
        let presenter = CountingPresenter::default();
        let current = PollState::Failed {
            job_id: JobId::new("new"),
            message: POLL_ERROR_MESSAGE.into(),
            error: Arc::new(LuminousError::Timeout),
        };

        assert!(shared.finish(2, current, &presenter));
        assert_eq!(presenter.calls(), 1);
        assert!(matches!(*shared.state.borrow(), PollState::Failed { .. }));
    }

    #[test]
    fn test_settings_from_config() {
        let config = ClientConfig::builder()
            .with_poll_interval(Duration::from_millis(250))
            .with_max_attempts(8)
            .build();
        let settings = PollSettings::from(&config);
        assert_eq!(settings.interval, Duration::from_millis(250));
        assert_eq!(settings.max_attempts, Some(8));
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn test_default_cadence_is_one_second() {
        assert_eq!(PollSettings::default().interval, Duration::from_secs(1));
    }

    #[test]
    fn test_state_classification() {
        let job = JobId::new("j");
        assert!(!PollState::Idle.is_terminal());
        assert!(PollState::Polling { job_id: job.clone() }.is_polling());
        let done = PollState::Done {
            job_id: job.clone(),
            link: DownloadLink::new("/p.png"),
        };
        assert!(done.is_terminal());
        assert_eq!(done.job_id(), Some(&job));
        let failed = PollState::Failed {
            job_id: job,
            message: TIMEOUT_MESSAGE.into(),
            error: Arc::new(LuminousError::Timeout),
        };
        assert!(failed.is_terminal());
    }
}

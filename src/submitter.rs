use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{LuminousError, Result};
use crate::poller::{PollSettings, PreviewPoller};
use crate::presenter::Presenter;
use crate::service::GenerationService;
use crate::types::{FormFields, GenerationRequest, JobId};

/// Shown when the service answers but refuses the request.
pub const REJECTED_MESSAGE: &str = "Failed to generate wallpaper";
/// Shown when the request never got a usable answer.
pub const SUBMIT_ERROR_MESSAGE: &str = "Error generating wallpaper";

/// Sends generation requests and hands accepted jobs to a [`PreviewPoller`].
pub struct RequestSubmitter<S, P> {
    service: Arc<S>,
    presenter: Arc<P>,
    poller: PreviewPoller<S, P>,
    latest: AtomicU64,
}

impl<S, P> RequestSubmitter<S, P>
where
    S: GenerationService + 'static,
    P: Presenter + 'static,
{
    pub fn new(service: Arc<S>, presenter: Arc<P>, settings: PollSettings) -> Self {
        let poller = PreviewPoller::new(Arc::clone(&service), Arc::clone(&presenter), settings);
        Self {
            service,
            presenter,
            poller,
            latest: AtomicU64::new(0),
        }
    }

    pub fn poller(&self) -> &PreviewPoller<S, P> {
        &self.poller
    }

    /// Validate the raw form values and submit them.
    ///
    /// An invalid field is reported once through the presenter and no request
    /// is sent.
    pub async fn submit_form(&self, form: &FormFields) -> Result<JobId> {
        let request = match GenerationRequest::try_from(form) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected form before submission");
                self.presenter.show_error(&e.to_string());
                return Err(e);
            }
        };
        self.submit(&request).await
    }

    /// Create a job for `request` and start polling it.
    ///
    /// Any poll still running for an earlier job is cancelled first. On
    /// failure exactly one error is shown and polling does not start. If a
    /// newer submission begins while this one is in flight, this one returns
    /// [`LuminousError::Superseded`] and leaves the UI alone.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobId> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.poller.cancel();
        self.presenter.show_loading();
        self.presenter.hide_download();

        tracing::debug!(
            color = %request.color(),
            style = %request.style(),
            resolution = %request.resolution(),
            color_temp = request.color_temp().kelvin(),
            "Submitting generation request"
        );

        let outcome = self.service.create_job(request).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!("Dropping response for a superseded submission");
            return Err(LuminousError::Superseded);
        }

        match outcome {
            Ok(job_id) => {
                self.poller.start(job_id.clone());
                Ok(job_id)
            }
            Err(e) => {
                let message = match &e {
                    LuminousError::Rejected(_) | LuminousError::Http { .. } => REJECTED_MESSAGE,
                    _ => SUBMIT_ERROR_MESSAGE,
                };
                tracing::warn!(error = %e, "Generation request failed");
                self.presenter.show_error(message);
                Err(e)
            }
        }
    }
}

use std::future::Future;

use crate::error::Result;
use crate::types::{GenerationRequest, JobId, PreviewResult};

/// The two calls the controller makes against the generation service.
///
/// [`LuminousClient`](crate::LuminousClient) implements this over HTTP.
/// Tests and alternative transports can implement it directly.
pub trait GenerationService: Send + Sync {
    /// Create a generation job and return its id.
    fn create_job(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<JobId>> + Send;

    /// Query the status of a job once.
    fn poll_preview(&self, job_id: &JobId) -> impl Future<Output = Result<PreviewResult>> + Send;
}

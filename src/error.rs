use thiserror::Error;

/// Errors returned by Luminous client operations.
#[derive(Error, Debug)]
pub enum LuminousError {
    /// The generation service returned a non-success HTTP status.
    #[error("Luminous returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response was missing expected fields or had the wrong shape.
    #[error("{0}")]
    InvalidResponse(String),

    /// The service answered `/generate` with a non-success status.
    #[error("Generation request rejected: {0}")]
    Rejected(String),

    /// A form field could not be turned into a request value.
    #[error("Invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// The service reported success for a job but sent no preview URL.
    #[error("Job {job_id} finished without a preview URL")]
    MissingPreviewUrl { job_id: String },

    /// The service reported that the job itself failed.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A newer submission started before this one was accepted.
    #[error("Submission superseded by a newer request")]
    Superseded,

    /// Polling exceeded the configured timeout or attempt ceiling.
    #[error("Timed out waiting for preview")]
    Timeout,

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a downloaded wallpaper failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LuminousError>;

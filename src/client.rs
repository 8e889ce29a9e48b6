use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::download::{self, DownloadLink};
use crate::error::{LuminousError, Result};
use crate::service::GenerationService;
use crate::types::*;

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// Async client for a Luminous wallpaper generation service.
///
/// Wraps the service's REST surface: job creation, preview status, and
/// image downloads. Polling lives in [`PreviewPoller`](crate::PreviewPoller),
/// which drives this client through [`GenerationService`].
///
/// # Example
/// ```no_run
/// use luminous_client::{Color, GenerationRequest, LuminousClient, Style};
///
/// # async fn example() -> luminous_client::Result<()> {
/// let client = LuminousClient::new("http://127.0.0.1:8000");
/// let request = GenerationRequest::new(Color::Blue, Style::Gradient, "calm ocean");
/// let job_id = client.generate(&request).await?;
/// let status = client.preview(&job_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LuminousClient {
    http: Client,
    endpoint: String,
    request_timeout: Duration,
}

impl LuminousClient {
    /// Create a new client pointing at the given service endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: normalize(endpoint.into()),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Create a client from the endpoint and request timeout in `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.endpoint.clone()).with_request_timeout(config.request_timeout)
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connect_error(&self, source: reqwest::Error) -> LuminousError {
        LuminousError::Network {
            context: format!(
                "Cannot connect to Luminous at {} \u{2014} is the service running?",
                self.endpoint
            ),
            source,
        }
    }

    /// `{endpoint}/{route}/{job_id}` with the id escaped as a single path segment.
    fn job_url(&self, route: &str, job_id: &JobId) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| LuminousError::InvalidConfig(format!("Bad endpoint URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                LuminousError::InvalidConfig(format!("Endpoint {} cannot hold a path", self.endpoint))
            })?
            .pop_if_empty()
            .push(route)
            .push(job_id.as_str());
        Ok(url)
    }

    /// Resolve a preview URL against the endpoint.
    ///
    /// The service hands out site-relative paths such as
    /// `/static/previews/wallpaper_ab12.png`; absolute URLs pass through.
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Url::parse(url)
                .map_err(|e| LuminousError::InvalidResponse(format!("Bad preview URL {}: {}", url, e)));
        }
        let base = Url::parse(&format!("{}/", self.endpoint))
            .map_err(|e| LuminousError::InvalidConfig(format!("Bad endpoint URL: {}", e)))?;
        base.join(url.trim_start_matches('/'))
            .map_err(|e| LuminousError::InvalidResponse(format!("Bad preview URL {}: {}", url, e)))
    }

    // ── Health ──────────────────────────────────────────────────────

    /// Check whether the service answers on its landing page.
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/", self.endpoint);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        Ok(resp.status().is_success())
    }

    // ── Generate ────────────────────────────────────────────────────

    /// Submit a generation request. Returns the job id the service assigned.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<JobId> {
        let url = format!("{}/generate", self.endpoint);
        let resp = self
            .http
            .post(&url)
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LuminousError::Http { status, body });
        }

        let text = resp.text().await.map_err(|e| LuminousError::Network {
            context: "Failed to read Luminous /generate response".into(),
            source: e,
        })?;
        let parsed: GenerateResponse = serde_json::from_str(&text)?;

        if parsed.status != "success" {
            return Err(LuminousError::Rejected(
                parsed.message.unwrap_or(parsed.status),
            ));
        }

        let job_id = parsed
            .job_id
            .ok_or_else(|| LuminousError::InvalidResponse("Response missing jobId".into()))?;
        tracing::info!(job_id = %job_id, "Generation job accepted");
        Ok(job_id)
    }

    // ── Preview ─────────────────────────────────────────────────────

    /// Fetch the current preview status of a job.
    pub async fn preview(&self, job_id: &JobId) -> Result<PreviewResult> {
        let url = self.job_url("preview", job_id)?;
        let resp = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| LuminousError::Network {
                context: format!("Failed to fetch preview for job {}", job_id),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LuminousError::Http { status, body });
        }

        let text = resp.text().await.map_err(|e| LuminousError::Network {
            context: "Failed to read Luminous /preview response".into(),
            source: e,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    // ── Downloads ───────────────────────────────────────────────────

    async fn fetch_bytes(&self, url: Url, what: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| LuminousError::Network {
                context: format!("Failed to fetch {}", what),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(LuminousError::Http {
                status: resp.status().as_u16(),
                body: format!("Failed to fetch {}", what),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| LuminousError::Network {
            context: "Failed to read image bytes".into(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    /// Download the image behind a preview link. Returns raw bytes.
    pub async fn fetch_preview(&self, link: &DownloadLink) -> Result<Vec<u8>> {
        let url = self.resolve_url(link.url())?;
        self.fetch_bytes(url, link.url()).await
    }

    /// Save the image behind a preview link into `dir` as `luminous-wallpaper.png`.
    pub async fn download_preview(&self, link: &DownloadLink, dir: &Path) -> Result<PathBuf> {
        let bytes = self.fetch_preview(link).await?;
        download::save_bytes(dir, link.filename(), &bytes).await
    }

    /// Save the final image of a finished job via `/download/{jobId}`.
    pub async fn download_job(&self, job_id: &JobId, dir: &Path) -> Result<PathBuf> {
        let url = self.job_url("download", job_id)?;
        let bytes = self
            .fetch_bytes(url, &format!("wallpaper for job {}", job_id))
            .await?;
        download::save_bytes(dir, &download::job_filename(job_id.as_str()), &bytes).await
    }
}

impl GenerationService for LuminousClient {
    async fn create_job(&self, request: &GenerationRequest) -> Result<JobId> {
        self.generate(request).await
    }

    async fn poll_preview(&self, job_id: &JobId) -> Result<PreviewResult> {
        self.preview(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize("http://localhost:8000/".into()), "http://localhost:8000");
        assert_eq!(normalize("http://localhost:8000".into()), "http://localhost:8000");
        assert_eq!(normalize("http://host:8000///".into()), "http://host:8000");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::builder()
            .with_endpoint("http://gen.local:9000/")
            .with_request_timeout(Duration::from_secs(5))
            .build();
        let client = LuminousClient::from_config(&config);
        assert_eq!(client.endpoint(), "http://gen.local:9000");
        assert_eq!(client.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_job_url_escapes_id() {
        let client = LuminousClient::new("http://localhost:8000");
        let url = client.job_url("preview", &JobId::new("a/b c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/preview/a%2Fb%20c");
    }

    #[test]
    fn test_job_url_keeps_base_path() {
        let client = LuminousClient::new("http://localhost:8000/luminous/");
        let url = client.job_url("download", &JobId::new("42")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/luminous/download/42");
    }

    #[test]
    fn test_resolve_relative_preview_url() {
        let client = LuminousClient::new("http://localhost:8000");
        let url = client.resolve_url("/static/previews/wallpaper_1.png").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/static/previews/wallpaper_1.png");
    }

    #[test]
    fn test_resolve_absolute_preview_url() {
        let client = LuminousClient::new("http://localhost:8000");
        let url = client.resolve_url("https://x/y.png").unwrap();
        assert_eq!(url.as_str(), "https://x/y.png");
    }
}

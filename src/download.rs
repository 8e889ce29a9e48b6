use std::path::{Path, PathBuf};

use crate::error::{LuminousError, Result};

/// Suggested filename for every wallpaper downloaded from a preview.
pub const DOWNLOAD_FILENAME: &str = "luminous-wallpaper.png";

/// A download action bound to a finished preview.
///
/// Creating one has no side effects; it only pairs the preview URL with the
/// filename the wallpaper should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    url: String,
    filename: &'static str,
}

impl DownloadLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: DOWNLOAD_FILENAME,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn filename(&self) -> &str {
        self.filename
    }

    /// Where the wallpaper lands when saved into `dir`.
    pub fn target_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.filename)
    }
}

/// Filename the service uses for the final image of a job.
pub fn job_filename(job_id: &str) -> String {
    format!("luminous-wallpaper-{}.png", job_id)
}

/// Write downloaded bytes into `dir` under `filename`, creating `dir` if needed.
pub async fn save_bytes(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    if bytes.is_empty() {
        return Err(LuminousError::InvalidResponse(format!(
            "Downloaded {} was empty",
            filename
        )));
    }
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wallpaper saved");
    Ok(path)
}

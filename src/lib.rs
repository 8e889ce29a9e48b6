//! # luminous-client
//!
//! Async Rust client and controller for the Luminous wallpaper generator.
//!
//! Collects the five form inputs into a [`GenerationRequest`], submits it,
//! polls the job until a preview is ready, and offers the wallpaper for
//! download. UI side effects go through the [`Presenter`] port, and the
//! service is reached through [`GenerationService`], so the whole lifecycle
//! runs (and is tested) without a real UI or server.
//!
//! ## Quick Start
//!
//! ```no_run
//! use luminous_client::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> luminous_client::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = Arc::new(LuminousClient::from_config(&config));
//! let controller = WallpaperController::new(
//!     Arc::clone(&client),
//!     Arc::new(ConsolePresenter),
//!     PollSettings::from(&config),
//!     ColorTemp::default(),
//! );
//!
//! let form = FormFields {
//!     color: "violet".into(),
//!     style: "gradient".into(),
//!     description: "aurora over a quiet lake".into(),
//!     resolution: "1920x1080".into(),
//!     color_temp: "6500".into(),
//! };
//! controller.on_submit(&form).await?;
//!
//! if let PollState::Done { link, .. } = controller.wait().await {
//!     client.download_preview(&link, &config.download_dir).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod download;
pub mod error;
pub mod poller;
pub mod presenter;
pub mod service;
pub mod submitter;
pub mod theme;
pub mod types;

pub use client::LuminousClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use controller::WallpaperController;
pub use download::{DownloadLink, DOWNLOAD_FILENAME};
pub use error::{LuminousError, Result};
pub use poller::{PollSettings, PollState, PreviewPoller};
pub use presenter::{ConsolePresenter, Presenter};
pub use service::GenerationService;
pub use submitter::RequestSubmitter;
pub use types::{
    Color, ColorTemp, FormFields, GenerationRequest, JobId, PreviewResult, PreviewStatus,
    Resolution, Style,
};

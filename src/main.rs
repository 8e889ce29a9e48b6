//! `luminous` -- generate a wallpaper from the command line.
//!
//! Submits one request, follows the preview until it is ready, and saves the
//! result as `luminous-wallpaper.png`. Settings not given as flags come from
//! `LUMINOUS_*` environment variables (or `.env`).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use luminous_client::{
    ClientConfig, ColorTemp, ConsolePresenter, FormFields, LuminousClient, PollSettings,
    PollState, WallpaperController,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base color: violet, indigo, blue, green, yellow, orange or red
    #[arg(short, long)]
    color: String,

    /// Style: gradient, geometric or abstract
    #[arg(short, long, default_value = "gradient")]
    style: String,

    /// Free-text description of the wallpaper
    #[arg(short, long, default_value = "")]
    description: String,

    /// Output resolution as WIDTHxHEIGHT, e.g. 1280x720, 1920x1080, 2560x1440 or 3840x2160
    #[arg(short, long, default_value = "1920x1080")]
    resolution: String,

    /// Color temperature in kelvin
    #[arg(long, default_value = "6500")]
    color_temp: String,

    /// Generation service URL (overrides LUMINOUS_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Milliseconds between preview checks (overrides LUMINOUS_POLL_INTERVAL_MS)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Give up after this many seconds (overrides LUMINOUS_POLL_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory to save the wallpaper into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Print the preview URL without downloading
    #[arg(long)]
    no_download: bool,
}

fn config_from(args: &Args) -> luminous_client::Result<ClientConfig> {
    let base = ClientConfig::from_env()?;
    let mut builder = ClientConfig::builder()
        .with_endpoint(args.endpoint.clone().unwrap_or(base.endpoint))
        .with_poll_interval(
            args.interval_ms
                .map(Duration::from_millis)
                .unwrap_or(base.poll_interval),
        )
        .with_request_timeout(base.request_timeout)
        .with_download_dir(args.output.clone());
    if let Some(timeout) = args.timeout_secs.map(Duration::from_secs).or(base.poll_timeout) {
        builder = builder.with_poll_timeout(timeout);
    }
    if let Some(max) = base.max_attempts {
        builder = builder.with_max_attempts(max);
    }
    builder.try_build()
}

async fn run(args: Args) -> luminous_client::Result<bool> {
    let config = config_from(&args)?;
    let client = Arc::new(LuminousClient::from_config(&config));
    let initial_temp = args.color_temp.parse().unwrap_or_else(|_| ColorTemp::default());
    let controller = WallpaperController::new(
        Arc::clone(&client),
        Arc::new(ConsolePresenter),
        PollSettings::from(&config),
        initial_temp,
    );

    let form = FormFields {
        color: args.color,
        style: args.style,
        description: args.description,
        resolution: args.resolution,
        color_temp: args.color_temp,
    };
    controller.on_style_change(&form.style);
    controller.on_submit(&form).await?;

    match controller.wait().await {
        PollState::Done { link, .. } => {
            if !args.no_download {
                let path = client.download_preview(&link, &config.download_dir).await?;
                println!("Saved {}", path.display());
            }
            Ok(true)
        }
        PollState::Failed { error, .. } => {
            tracing::error!(error = %error, "Wallpaper was not generated");
            Ok(false)
        }
        PollState::Idle | PollState::Polling { .. } => Ok(false),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luminous_client=info,luminous=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Args::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "luminous failed");
            ExitCode::FAILURE
        }
    }
}

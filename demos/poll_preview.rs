//! Submit one wallpaper request and follow its preview with the raw client.
//!
//! Requires a running Luminous service at http://127.0.0.1:8000.
//!
//! ```sh
//! cargo run --example poll_preview
//! ```

use luminous_client::{Color, GenerationRequest, LuminousClient, Resolution, Style};
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let client = LuminousClient::new("http://127.0.0.1:8000");

    if !client.health().await? {
        eprintln!("Luminous is not responding");
        return Ok(());
    }
    println!("Luminous is online");

    let request = GenerationRequest::new(Color::Indigo, Style::Abstract, "city lights at night")
        .with_resolution(Resolution::new(2560, 1440)?);
    let job_id = client.generate(&request).await?;
    println!("Queued job: {}", job_id);

    for attempt in 1..=60 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let status = client.preview(&job_id).await?;
        match status.ready_url() {
            Some(url) => {
                println!("Preview ready after {} checks: {}", attempt, url);
                let path = client.download_job(&job_id, Path::new(".")).await?;
                println!("Saved: {}", path.display());
                return Ok(());
            }
            None => println!("Still working ({:?})", status.status),
        }
    }

    eprintln!("Gave up after 60 checks");
    Ok(())
}

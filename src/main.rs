use anyhow::{Context, Result};
use blob_thumbnailer::app::App;
use blob_thumbnailer::pipeline::ProcessOutcome;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "blob-thumbnailer")]
#[command(about = "Generate thumbnails for newly created storage objects")]
struct CliArgs {
    /// Event Grid or S3 notification JSON. Reads stdin when omitted or `-`.
    #[arg(value_name = "EVENT_FILE", conflicts_with = "url")]
    event_file: Option<PathBuf>,

    /// Process a single object URL instead of an event payload.
    #[arg(long, value_name = "URL")]
    url: Option<String>,
}

fn read_payload(event_file: Option<&Path>) -> Result<String> {
    match event_file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display())),
        _ => std::io::read_to_string(std::io::stdin()).context("Failed to read event from stdin"),
    }
}

/// Returns (thumbnails written, events skipped as unsupported).
fn summarize(outcomes: &[ProcessOutcome]) -> (usize, usize) {
    outcomes
        .iter()
        .fold((0, 0), |(written, skipped), outcome| match outcome {
            ProcessOutcome::Unsupported => (written, skipped + 1),
            ProcessOutcome::Processed(uploads) => (written + uploads.len(), skipped),
        })
}

async fn run(app: &App, args: &CliArgs) -> Result<Vec<ProcessOutcome>> {
    match &args.url {
        Some(url) => Ok(vec![app.handle_url(url).await?]),
        None => {
            let payload = read_payload(args.event_file.as_deref())?;
            Ok(app.handle_payload(&payload).await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blob_thumbnailer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting blob-thumbnailer");

    let args = CliArgs::parse();

    match App::new().await {
        Ok(app) => match run(&app, &args).await {
            Ok(outcomes) => {
                let (written, skipped) = summarize(&outcomes);
                info!(
                    "Done: {} thumbnails written, {} unsupported objects skipped",
                    written, skipped
                );
                Ok(())
            }
            Err(e) => {
                error!("Thumbnail generation failed: {:#}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blob_thumbnailer::pipeline::UploadResult;

    fn upload(name: &str) -> UploadResult {
        UploadResult {
            name: name.to_string(),
            width: 10,
            height: 10,
            content_type: "image/png".to_string(),
            location: format!("mock://{}", name),
        }
    }

    #[test]
    fn test_cli_accepts_event_file_or_url() {
        let args = CliArgs::try_parse_from(["blob-thumbnailer", "event.json"]).unwrap();
        assert_eq!(args.event_file, Some(PathBuf::from("event.json")));

        let args =
            CliArgs::try_parse_from(["blob-thumbnailer", "--url", "s3://b/cat.png"]).unwrap();
        assert_eq!(args.url.as_deref(), Some("s3://b/cat.png"));

        assert!(
            CliArgs::try_parse_from(["blob-thumbnailer", "event.json", "--url", "s3://b/c.png"])
                .is_err()
        );
    }

    #[test]
    fn test_read_payload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, "{}").unwrap();

        assert_eq!(read_payload(Some(&path)).unwrap(), "{}");
        assert!(read_payload(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_summarize() {
        let outcomes = vec![
            ProcessOutcome::Processed(vec![upload("a_1.png"), upload("a_2.png")]),
            ProcessOutcome::Unsupported,
            ProcessOutcome::Processed(Vec::new()),
        ];
        assert_eq!(summarize(&outcomes), (2, 1));
    }
}

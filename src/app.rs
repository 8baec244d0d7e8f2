//! Wiring from configuration to a ready-to-run thumbnail pipeline.

use crate::image::{ImageProcessor, ImageService};
use crate::models::{parse_events, Config, SourceEvent};
use crate::pipeline::{ProcessOutcome, ThumbnailPipeline, ThumbnailSettings};
use crate::storage::{DryRunStorage, LocalStorage, S3Storage, StorageService};
use crate::Result;
use tracing::{info, warn};

/// Handles trigger payloads with one pipeline and one set of settings.
pub struct App {
    pipeline: ThumbnailPipeline,
    settings: ThumbnailSettings,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub storage: Box<dyn StorageService>,
    pub image: Box<dyn ImageService>,
}

impl App {
    pub fn with_services(services: AppServices, settings: ThumbnailSettings) -> Self {
        Self {
            pipeline: ThumbnailPipeline::new(services.storage, services.image),
            settings,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub async fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Self::from_config(&config).await
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        info!(
            "Thumbnail widths {:?} into container {}",
            config.thumbnail_widths, config.thumbnail_container
        );

        let storage = Self::build_storage(config).await?;

        Ok(Self::with_services(
            AppServices {
                storage,
                image: Box::new(ImageProcessor::new()),
            },
            config.thumbnail_settings(),
        ))
    }

    async fn build_storage(config: &Config) -> Result<Box<dyn StorageService>> {
        let storage: Box<dyn StorageService> = if config.uses_local_storage() {
            let local = LocalStorage::from_url(&config.storage_service_url)?;
            info!("Using local storage at {}", local.root().display());
            Box::new(local)
        } else {
            info!(
                "Using S3-compatible storage at {} ({})",
                config.storage_service_url, config.storage_region
            );
            Box::new(
                S3Storage::new(
                    config.storage_service_url.clone(),
                    config.storage_region.clone(),
                    config.storage_credentials.clone(),
                )
                .await?,
            )
        };

        if config.dry_run {
            info!("DRY_RUN enabled, uploads will be skipped");
            Ok(Box::new(DryRunStorage::new(storage)))
        } else {
            Ok(storage)
        }
    }

    /// Process every object-created event in a trigger payload, in order.
    ///
    /// Stops at the first failing event so the caller's retry policy sees it.
    pub async fn handle_payload(&self, payload: &str) -> Result<Vec<ProcessOutcome>> {
        let events = parse_events(payload)?;
        if events.is_empty() {
            warn!("Payload contained no object-created events");
        }

        let mut outcomes = Vec::with_capacity(events.len());
        for event in &events {
            outcomes.push(self.handle_event(event).await?);
        }
        Ok(outcomes)
    }

    pub async fn handle_url(&self, url: &str) -> Result<ProcessOutcome> {
        self.handle_event(&SourceEvent::from_url(url)).await
    }

    pub async fn handle_event(&self, event: &SourceEvent) -> Result<ProcessOutcome> {
        info!("Processing {} (event {})", event.url, event.id);
        self.pipeline.process(event, &self.settings).await
    }
}

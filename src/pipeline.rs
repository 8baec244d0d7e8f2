//! Thumbnail generation for a single source object.
//!
//! The source is read once into a shared buffer. Each configured width is then
//! rendered from its own view of that buffer and uploaded before the next
//! width starts. The first failure stops the run and is returned to the
//! caller; thumbnails already uploaded are left in place.

use crate::format::{self, FormatSupport, ThumbnailFormat};
use crate::image::ImageService;
use crate::models::SourceEvent;
use crate::naming::{self, ObjectLocation};
use crate::storage::StorageService;
use crate::Result;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// What to generate and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSettings {
    pub widths: Vec<u32>,
    pub container: String,
}

/// An encoded thumbnail waiting to be uploaded.
#[derive(Debug, Clone)]
pub struct ResizedArtifact {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The extension has no encoder; nothing was read or written.
    Unsupported,
    Processed(Vec<UploadResult>),
}

impl ProcessOutcome {
    pub fn uploads(&self) -> &[UploadResult] {
        match self {
            ProcessOutcome::Unsupported => &[],
            ProcessOutcome::Processed(uploads) => uploads,
        }
    }
}

pub struct ThumbnailPipeline {
    storage: Box<dyn StorageService>,
    image: Box<dyn ImageService>,
}

impl ThumbnailPipeline {
    pub fn new(storage: Box<dyn StorageService>, image: Box<dyn ImageService>) -> Self {
        Self { storage, image }
    }

    #[instrument(skip_all, fields(event_id = %event.id))]
    pub async fn process(
        &self,
        event: &SourceEvent,
        settings: &ThumbnailSettings,
    ) -> Result<ProcessOutcome> {
        let format = match format::resolve(&event.extension) {
            FormatSupport::Supported(format) => format,
            FormatSupport::Unsupported => {
                info!("No encoder support for: {}", event.url);
                return Ok(ProcessOutcome::Unsupported);
            }
        };

        match self.generate(event, format, settings).await {
            Ok(uploads) => Ok(ProcessOutcome::Processed(uploads)),
            Err(e) => {
                error!("Thumbnail generation failed for {}: {}", event.url, e);
                Err(e)
            }
        }
    }

    async fn generate(
        &self,
        event: &SourceEvent,
        format: ThumbnailFormat,
        settings: &ThumbnailSettings,
    ) -> Result<Vec<UploadResult>> {
        if settings.widths.is_empty() {
            info!("No thumbnail widths configured, skipping {}", event.url);
            return Ok(Vec::new());
        }

        let location = ObjectLocation::parse(&event.url)?;
        let source: Arc<[u8]> = self.storage.read_object(&location).await?.into();
        info!("Read {} bytes from {}", source.len(), event.url);

        let base_name = naming::base_name(&event.url);
        let mut uploads = Vec::with_capacity(settings.widths.len());

        for &width in &settings.widths {
            let artifact = self
                .render(source.clone(), format, width, &base_name, &event.extension)
                .await?;

            let location = self
                .storage
                .write_object(
                    &settings.container,
                    &artifact.name,
                    &artifact.data,
                    artifact.content_type,
                )
                .await?;
            info!(
                "Uploaded {} ({}x{}) to {}",
                artifact.name, artifact.width, artifact.height, location
            );

            uploads.push(UploadResult {
                name: artifact.name,
                width: artifact.width,
                height: artifact.height,
                content_type: artifact.content_type.to_string(),
                location,
            });
        }

        Ok(uploads)
    }

    async fn render(
        &self,
        source: Arc<[u8]>,
        format: ThumbnailFormat,
        width: u32,
        base_name: &str,
        extension: &str,
    ) -> Result<ResizedArtifact> {
        let rendered = self.image.render(source, format, width).await?;

        Ok(ResizedArtifact {
            name: naming::output_name(base_name, width, extension),
            width: rendered.width,
            height: rendered.height,
            data: rendered.data,
            content_type: format::mime_type(extension),
        })
    }
}

//! Thumbnail rendering
//!
//! Decodes a source image, scales it to one target width and re-encodes it in
//! the source's format. The codec work itself is delegated to the `image`
//! crate.

pub mod mock;
pub mod processor;

pub use mock::MockImageProcessor;
pub use processor::ImageProcessor;

use crate::format::ThumbnailFormat;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One encoded thumbnail and the dimensions it was encoded at.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Every call decodes `source` from its first byte, so calls for
    /// different widths never observe each other.
    async fn render(
        &self,
        source: Arc<[u8]>,
        format: ThumbnailFormat,
        target_width: u32,
    ) -> Result<RenderedImage>;
}

use super::{ImageService, RenderedImage};
use crate::format::ThumbnailFormat;
use crate::resize::ResizePlan;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Renders placeholder bytes for a fixed source size without touching a codec.
#[derive(Clone)]
pub struct MockImageProcessor {
    source_size: (u32, u32),
    rendered_widths: Arc<Mutex<Vec<u32>>>,
    fail_on_call: Option<usize>,
}

impl MockImageProcessor {
    pub fn new() -> Self {
        Self {
            source_size: (400, 200),
            rendered_widths: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: None,
        }
    }

    pub fn with_source_size(mut self, width: u32, height: u32) -> Self {
        self.source_size = (width, height);
        self
    }

    /// Fail the n-th render (1-based) with a decode error.
    pub fn with_failure_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn get_rendered_widths(&self) -> Vec<u32> {
        self.rendered_widths.lock().unwrap().clone()
    }
}

impl Default for MockImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for MockImageProcessor {
    async fn render(
        &self,
        _source: Arc<[u8]>,
        format: ThumbnailFormat,
        target_width: u32,
    ) -> Result<RenderedImage> {
        let call = {
            let mut widths = self.rendered_widths.lock().unwrap();
            widths.push(target_width);
            widths.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(Error::Decode(image::ImageError::IoError(
                std::io::Error::other("Mock failure"),
            )));
        }

        let (width, height) = self.source_size;
        let plan = ResizePlan::compute(width, height, target_width)
            .ok_or_else(|| Error::Invariant("Mock cannot plan resize".to_string()))?;

        Ok(RenderedImage {
            width: plan.width,
            height: plan.height,
            data: format!("{}:{}x{}", format.mime_type(), plan.width, plan.height).into_bytes(),
        })
    }
}

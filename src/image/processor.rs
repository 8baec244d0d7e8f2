use super::{ImageService, RenderedImage};
use crate::format::ThumbnailFormat;
use crate::resize::ResizePlan;
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::error::{DecodingError, ImageFormatHint};
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, ColorType, Frame, ImageDecoder, ImageError, ImageFormat, Limits};
use std::io::Cursor;
use std::sync::Arc;

const FILTER: FilterType = FilterType::Lanczos3;

/// Renders thumbnails with the `image` crate on the blocking thread pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    fn render_sync(
        source: &[u8],
        format: ThumbnailFormat,
        target_width: u32,
    ) -> Result<RenderedImage> {
        match format {
            ThumbnailFormat::Gif => Self::render_animation(source, target_width),
            ThumbnailFormat::Png | ThumbnailFormat::Jpeg => {
                Self::render_still(source, format, target_width)
            }
        }
    }

    fn plan(width: u32, height: u32, target_width: u32) -> Result<ResizePlan> {
        ResizePlan::compute(width, height, target_width).ok_or_else(|| {
            Error::Invariant(format!(
                "Cannot scale a {}x{} image to width {}",
                width, height, target_width
            ))
        })
    }

    /// Rejects outputs whose pixel buffers would exceed the default `image`
    /// allocation limit, before anything is allocated.
    fn reserve_output(
        limits: &mut Limits,
        plan: &ResizePlan,
        height: u32,
        color: ColorType,
    ) -> Result<()> {
        limits
            .reserve_buffer(plan.width, height, color)
            .map_err(Error::TooLarge)
    }

    fn render_still(
        source: &[u8],
        format: ThumbnailFormat,
        target_width: u32,
    ) -> Result<RenderedImage> {
        let image = image::load_from_memory_with_format(source, format.image_format())
            .map_err(Error::Decode)?;

        let plan = Self::plan(image.width(), image.height(), target_width)?;
        // Codecs cannot write an empty image
        let height = plan.height.max(1);
        Self::reserve_output(&mut Limits::default(), &plan, height, image.color())?;

        let resized = image.resize_exact(plan.width, height, FILTER);

        let mut data = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut data), format.image_format())
            .map_err(Error::Encode)?;

        Ok(RenderedImage {
            width: plan.width,
            height,
            data,
        })
    }

    /// GIFs are resized frame by frame so animations survive.
    fn render_animation(source: &[u8], target_width: u32) -> Result<RenderedImage> {
        let mut decoder = GifDecoder::new(Cursor::new(source)).map_err(Error::Decode)?;
        decoder
            .set_limits(Limits::default())
            .map_err(Error::TooLarge)?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(Error::Decode)?;

        let (width, height) = frames
            .first()
            .map(|frame| frame.buffer().dimensions())
            .ok_or_else(|| {
                Error::Decode(ImageError::Decoding(DecodingError::new(
                    ImageFormatHint::Exact(ImageFormat::Gif),
                    "GIF contains no frames",
                )))
            })?;

        let plan = Self::plan(width, height, target_width)?;
        let out_height = plan.height.max(1);

        let mut limits = Limits::default();
        for _ in &frames {
            Self::reserve_output(&mut limits, &plan, out_height, ColorType::Rgba8)?;
        }

        let resized = frames.into_iter().map(|frame| {
            let delay = frame.delay();
            let buffer = imageops::resize(frame.buffer(), plan.width, out_height, FILTER);
            Frame::from_parts(buffer, 0, 0, delay)
        });

        let mut data = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut data);
            encoder.set_repeat(Repeat::Infinite).map_err(Error::Encode)?;
            encoder.encode_frames(resized).map_err(Error::Encode)?;
        }

        Ok(RenderedImage {
            width: plan.width,
            height: out_height,
            data,
        })
    }
}

#[async_trait]
impl ImageService for ImageProcessor {
    async fn render(
        &self,
        source: Arc<[u8]>,
        format: ThumbnailFormat,
        target_width: u32,
    ) -> Result<RenderedImage> {
        tokio::task::spawn_blocking(move || Self::render_sync(&source, format, target_width))
            .await
            .map_err(|e| Error::Invariant(format!("Image processing task join error: {}", e)))?
    }
}

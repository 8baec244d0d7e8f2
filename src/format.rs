//! Maps file extensions to the raster formats thumbnails can be encoded in.

use image::ImageFormat;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFormat {
    Png,
    Jpeg,
    Gif,
}

impl ThumbnailFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            ThumbnailFormat::Png => ImageFormat::Png,
            ThumbnailFormat::Jpeg => ImageFormat::Jpeg,
            ThumbnailFormat::Gif => ImageFormat::Gif,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ThumbnailFormat::Png => "image/png",
            ThumbnailFormat::Jpeg => "image/jpeg",
            ThumbnailFormat::Gif => "image/gif",
        }
    }
}

/// Whether an extension can be re-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSupport {
    Supported(ThumbnailFormat),
    Unsupported,
}

/// Resolve an extension such as `.JPG` or `png`.
pub fn resolve(extension: &str) -> FormatSupport {
    let extension = extension.strip_prefix('.').unwrap_or(extension);

    match extension.to_ascii_lowercase().as_str() {
        "png" => FormatSupport::Supported(ThumbnailFormat::Png),
        "jpg" | "jpeg" => FormatSupport::Supported(ThumbnailFormat::Jpeg),
        "gif" => FormatSupport::Supported(ThumbnailFormat::Gif),
        _ => FormatSupport::Unsupported,
    }
}

/// Content type to store alongside an object with this extension.
pub fn mime_type(extension: &str) -> &'static str {
    match resolve(extension) {
        FormatSupport::Supported(format) => format.mime_type(),
        FormatSupport::Unsupported => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_extensions() {
        for ext in ["png", ".png", "PNG", ".Png"] {
            assert_eq!(resolve(ext), FormatSupport::Supported(ThumbnailFormat::Png));
        }
        for ext in ["jpg", ".jpg", "JPEG", ".jpeg", ".JpG"] {
            assert_eq!(resolve(ext), FormatSupport::Supported(ThumbnailFormat::Jpeg));
        }
        for ext in ["gif", ".GIF"] {
            assert_eq!(resolve(ext), FormatSupport::Supported(ThumbnailFormat::Gif));
        }
    }

    #[test]
    fn test_resolve_unsupported_extensions() {
        for ext in ["", ".", ".bmp", "webp", "tiff", ".pngx", "xpng", "jpe", "..png", "png "] {
            assert_eq!(resolve(ext), FormatSupport::Unsupported, "{:?}", ext);
        }
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(".png"), "image/png");
        assert_eq!(mime_type("JPG"), "image/jpeg");
        assert_eq!(mime_type(".jpeg"), "image/jpeg");
        assert_eq!(mime_type(".gif"), "image/gif");
    }

    #[test]
    fn test_mime_type_falls_back_to_octet_stream() {
        assert_eq!(mime_type(".bmp"), "application/octet-stream");
        assert_eq!(mime_type(""), "application/octet-stream");
    }

    #[test]
    fn test_image_format_mapping() {
        assert_eq!(ThumbnailFormat::Png.image_format(), ImageFormat::Png);
        assert_eq!(ThumbnailFormat::Jpeg.image_format(), ImageFormat::Jpeg);
        assert_eq!(ThumbnailFormat::Gif.image_format(), ImageFormat::Gif);
    }
}

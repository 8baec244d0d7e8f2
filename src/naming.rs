//! Object naming: where a source object lives and what its thumbnails are called.
//!
//! Object URLs come in two shapes:
//!
//! * `s3://bucket/dir/photo.png`, where the host is the container;
//! * path-style URLs such as `https://acct.blob.core.windows.net/images/dir/photo.png`
//!   or `https://s3.example.com/images/dir/photo.png`, where the first path
//!   segment is the container.
//!
//! Anything that is not an absolute URL is treated as a `container/key`
//! identifier. Virtual-hosted S3 URLs (`https://bucket.s3.amazonaws.com/key`)
//! are not recognised: their first path segment is taken as the container.
//!
//! Extensions follow the last dot of the file name, so `.png` has an empty
//! base name and the extension `.png`.

use crate::{Error, Result};
use url::Url;

/// A source object's container and key, percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub container: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn parse(url_or_identifier: &str) -> Result<Self> {
        let (authority, mut segments) = split_segments(url_or_identifier);

        let container = match authority {
            Some(bucket) => bucket,
            None if !segments.is_empty() => segments.remove(0),
            None => String::new(),
        };

        if container.is_empty() || segments.is_empty() {
            return Err(Error::InvalidObjectUrl(url_or_identifier.to_string()));
        }

        Ok(Self {
            container,
            key: segments.join("/"),
        })
    }

    /// Last segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Splits the input into an optional authority container (for `s3://`) and
/// its non-empty, decoded path segments.
///
/// Escapes that are not valid UTF-8 decode to U+FFFD so the extension of the
/// segment survives.
fn split_segments(input: &str) -> (Option<String>, Vec<String>) {
    match Url::parse(input) {
        Ok(url) => {
            let segments = url
                .path_segments()
                .map(|parts| {
                    parts
                        .filter(|part| !part.is_empty())
                        .map(decode_segment)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            let authority = if url.scheme() == "s3" {
                url.host_str().map(str::to_string)
            } else {
                None
            };

            (authority, segments)
        }
        Err(_) => (
            None,
            input
                .split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    }
}

fn decode_segment(segment: &str) -> String {
    let bytes = urlencoding::decode_binary(segment.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Splits a file name at its last dot. A trailing dot yields no extension.
fn split_file_name(url_or_identifier: &str) -> (String, String) {
    let (_, mut segments) = split_segments(url_or_identifier);
    let file_name = segments.pop().unwrap_or_default();

    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => {
            (file_name[..dot].to_string(), file_name[dot..].to_string())
        }
        Some(dot) => (file_name[..dot].to_string(), String::new()),
        None => (file_name, String::new()),
    }
}

/// The object's file name with host, container, directories and extension removed.
pub fn base_name(url_or_identifier: &str) -> String {
    split_file_name(url_or_identifier).0
}

/// The object's extension including the leading dot, case preserved, or an
/// empty string.
pub fn extension(url_or_identifier: &str) -> String {
    split_file_name(url_or_identifier).1
}

/// Destination object name for one thumbnail width.
///
/// The same inputs always produce the same name, so re-processing a source
/// overwrites its earlier thumbnails.
pub fn output_name(base_name: &str, width: u32, extension: &str) -> String {
    format!("{}_{}{}", base_name, width, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_blob_url() {
        let location =
            ObjectLocation::parse("https://acct.blob.core.windows.net/container/photo.png")
                .unwrap();
        assert_eq!(location.container, "container");
        assert_eq!(location.key, "photo.png");
        assert_eq!(location.file_name(), "photo.png");
    }

    #[test]
    fn test_parse_nested_key_and_encoding() {
        let location = ObjectLocation::parse(
            "https://s3.example.com/uploads/2024/summer%20trip/beach.JPG?versionId=3",
        )
        .unwrap();
        assert_eq!(location.container, "uploads");
        assert_eq!(location.key, "2024/summer trip/beach.JPG");
        assert_eq!(location.file_name(), "beach.JPG");
    }

    #[test]
    fn test_parse_s3_url() {
        let location = ObjectLocation::parse("s3://my-bucket/images/cat.gif").unwrap();
        assert_eq!(location.container, "my-bucket");
        assert_eq!(location.key, "images/cat.gif");
    }

    #[test]
    fn test_parse_plain_identifier() {
        let location = ObjectLocation::parse("images/cat.gif").unwrap();
        assert_eq!(location.container, "images");
        assert_eq!(location.key, "cat.gif");
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        assert!(ObjectLocation::parse("https://acct.blob.core.windows.net/container").is_err());
        assert!(ObjectLocation::parse("https://acct.blob.core.windows.net/").is_err());
        assert!(ObjectLocation::parse("s3://bucket").is_err());
        assert!(ObjectLocation::parse("photo.png").is_err());
        assert!(ObjectLocation::parse("").is_err());
    }

    #[test]
    fn test_base_name() {
        assert_eq!(
            base_name("https://acct.blob.core.windows.net/container/photo.png"),
            "photo"
        );
        assert_eq!(base_name("https://host/c/a/b/archive.tar.gz"), "archive.tar");
        assert_eq!(base_name("https://host/c/summer%20trip.jpg?sig=abc"), "summer trip");
        assert_eq!(base_name("s3://bucket/dir/no_extension"), "no_extension");
        assert_eq!(base_name("photo.png"), "photo");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("https://host/c/photo.png"), ".png");
        assert_eq!(extension("https://host/c/PHOTO.JPEG?x=1#frag"), ".JPEG");
        assert_eq!(extension("https://host/c/readme"), "");
        assert_eq!(extension("https://host/c/trailing."), "");
        assert_eq!(extension("c/photo.gif"), ".gif");
    }

    #[test]
    fn test_non_utf8_escape_keeps_extension() {
        let url = "https://acct.blob.core.windows.net/images/caf%E9.png";
        assert_eq!(extension(url), ".png");
        assert_eq!(base_name(url), "caf\u{FFFD}");

        let location = ObjectLocation::parse(url).unwrap();
        assert_eq!(location.container, "images");
        assert_eq!(location.key, "caf\u{FFFD}.png");
    }

    #[test]
    fn test_dot_file_is_all_extension() {
        let url = "https://acct.blob.core.windows.net/images/.png";
        assert_eq!(extension(url), ".png");
        assert_eq!(base_name(url), "");
        assert_eq!(output_name(&base_name(url), 100, &extension(url)), "_100.png");
        assert_eq!(base_name("https://host/c/trailing."), "trailing");
    }

    #[test]
    fn test_virtual_hosted_url_uses_first_segment() {
        let location =
            ObjectLocation::parse("https://bucket.s3.amazonaws.com/dir/photo.png").unwrap();
        assert_eq!(location.container, "dir");
        assert_eq!(location.key, "photo.png");
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("photo", 200, ".jpg"), "photo_200.jpg");
        assert_eq!(output_name("photo", 200, ""), "photo_200");
        assert_eq!(output_name("Holiday Pic", 64, ".PNG"), "Holiday Pic_64.PNG");
    }

    #[test]
    fn test_output_name_is_deterministic() {
        let url = "https://acct.blob.core.windows.net/container/photo.png";
        let first = output_name(&base_name(url), 100, &extension(url));
        let second = output_name(&base_name(url), 100, &extension(url));
        assert_eq!(first, "photo_100.png");
        assert_eq!(first, second);
    }
}

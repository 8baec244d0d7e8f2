use super::StorageService;
use crate::naming::ObjectLocation;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use url::Url;

/// Stores objects as files under `root/container/key`.
///
/// Content types are not persisted; the file extension carries the format.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Builds a store from a `file://` URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let root = Url::parse(url)
            .ok()
            .filter(|parsed| parsed.scheme() == "file")
            .and_then(|parsed| parsed.to_file_path().ok())
            .ok_or_else(|| Error::Config(format!("Not a local directory URL: {}", url)))?;

        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();

        for part in std::iter::once(container).chain(key.split('/')) {
            let is_plain = !part.is_empty()
                && Path::new(part)
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)));
            if !is_plain || part.contains('\\') {
                return Err(Error::InvalidObjectUrl(format!("{}/{}", container, key)));
            }
            path.push(part);
        }

        Ok(path)
    }
}

#[async_trait]
impl StorageService for LocalStorage {
    async fn read_object(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        let path = self.object_path(&location.container, &location.key)?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))
    }

    async fn write_object(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String> {
        let path = self.object_path(container, name)?;
        let upload_error = |e: std::io::Error| Error::Upload {
            name: name.to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(upload_error)?;
        }
        tokio::fs::write(&path, data).await.map_err(upload_error)?;

        debug!("Wrote {} ({}, {} bytes)", path.display(), content_type, data.len());
        Ok(path.display().to_string())
    }
}

use super::StorageService;
use crate::naming::ObjectLocation;
use crate::Result;
use async_trait::async_trait;
use tracing::info;

/// Reads through to a real store but only logs writes.
pub struct DryRunStorage {
    inner: Box<dyn StorageService>,
}

impl DryRunStorage {
    pub fn new(inner: Box<dyn StorageService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StorageService for DryRunStorage {
    async fn read_object(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        self.inner.read_object(location).await
    }

    async fn write_object(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String> {
        info!(
            "DRY_RUN: skipping upload of {}/{} ({}, {} bytes)",
            container,
            name,
            content_type,
            data.len()
        );
        Ok(format!("dry-run://{}/{}", container, name))
    }
}

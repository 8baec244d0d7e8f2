//! Object storage gateways
//!
//! Reads source images and writes thumbnails to S3-compatible storage, a
//! local directory tree, or memory.

pub mod dry_run;
pub mod local;
pub mod mock;
pub mod s3;

pub use dry_run::DryRunStorage;
pub use local::LocalStorage;
pub use mock::{MockStorage, StoredObject};
pub use s3::S3Storage;

use crate::naming::ObjectLocation;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Reads the whole object into memory.
    async fn read_object(&self, location: &ObjectLocation) -> Result<Vec<u8>>;

    /// Creates or overwrites `container/name` and returns where it was written.
    async fn write_object(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String>;
}

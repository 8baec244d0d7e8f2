use super::StorageService;
use crate::models::StorageCredentials;
use crate::naming::ObjectLocation;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{
    config::{Credentials, Region},
    Client as S3Client,
};
use tracing::debug;

pub struct S3Storage {
    client: S3Client,
    endpoint: String,
}

impl S3Storage {
    /// Connects to an S3-compatible endpoint using path-style addressing.
    ///
    /// Without explicit credentials the SDK's default provider chain is used
    /// (environment, profile, instance metadata).
    pub async fn new(
        endpoint: String,
        region: String,
        credentials: Option<StorageCredentials>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .endpoint_url(endpoint.clone());

        if let Some(credentials) = credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id,
                credentials.secret_access_key,
                None,
                None,
                "blob-thumbnailer",
            ));
        }

        let shared_config = loader.load().await;
        let config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: S3Client::from_conf(config),
            endpoint,
        })
    }

    fn object_url(&self, container: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, container, key)
    }
}

#[async_trait]
impl StorageService for S3Storage {
    async fn read_object(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&location.container)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!(
                    "Failed to read {}/{}: {}",
                    location.container,
                    location.key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Storage(format!("Failed to read body: {}", e)))?
            .to_vec();

        debug!(
            "Read {} bytes from {}/{}",
            data.len(),
            location.container,
            location.key
        );
        Ok(data)
    }

    async fn write_object(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String> {
        let body = ByteStream::from(data.to_vec());

        self.client
            .put_object()
            .bucket(container)
            .key(name)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::Upload {
                name: name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(self.object_url(container, name))
    }
}

//! Data models and structures
//!
//! Defines the trigger payloads the thumbnailer accepts, the event record the
//! pipeline consumes, and the environment-backed configuration.

use crate::naming;
use crate::pipeline::ThumbnailSettings;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

pub const BLOB_CREATED_EVENT: &str = "Microsoft.Storage.BlobCreated";
const S3_CREATED_EVENT_PREFIX: &str = "ObjectCreated:";
const DEFAULT_REGION: &str = "us-east-1";

/// One "object created" notification, reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub id: String,
    pub url: String,
    /// Extension of the object name including the dot, e.g. `.png`.
    pub extension: String,
    pub event_time: Option<DateTime<Utc>>,
}

impl SourceEvent {
    pub fn new(id: String, url: String, event_time: Option<DateTime<Utc>>) -> Self {
        let extension = naming::extension(&url);
        Self {
            id,
            url,
            extension,
            event_time,
        }
    }

    pub fn from_url(url: &str) -> Self {
        Self::new(Uuid::new_v4().to_string(), url.to_string(), None)
    }
}

// Event Grid schema
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEvent {
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: GridEventData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEventData {
    pub url: Option<String>,
    pub api: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl GridEvent {
    fn into_source_event(self) -> Option<SourceEvent> {
        if self.event_type != BLOB_CREATED_EVENT {
            info!("Skipping {} event {}", self.event_type, self.id);
            return None;
        }

        match self.data.url {
            Some(url) => Some(SourceEvent::new(self.id, url, self.event_time)),
            None => {
                warn!(
                    "Event {} has no data.url (subject: {})",
                    self.id,
                    self.subject.as_deref().unwrap_or("-")
                );
                None
            }
        }
    }
}

// S3 event notification schema
#[derive(Debug, Deserialize)]
pub struct S3Notification {
    #[serde(rename = "Records")]
    pub records: Vec<S3Record>,
}

#[derive(Debug, Deserialize)]
pub struct S3Record {
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "eventTime", default)]
    pub event_time: Option<DateTime<Utc>>,
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    /// URL-encoded, with spaces as `+`.
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl S3Record {
    fn into_source_event(self) -> Option<SourceEvent> {
        if !self.event_name.starts_with(S3_CREATED_EVENT_PREFIX) {
            info!(
                "Skipping {} event for {}/{}",
                self.event_name, self.s3.bucket.name, self.s3.object.key
            );
            return None;
        }

        let url = format!(
            "s3://{}/{}",
            self.s3.bucket.name,
            self.s3.object.key.replace('+', "%20")
        );
        Some(SourceEvent::new(
            Uuid::new_v4().to_string(),
            url,
            self.event_time,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventPayload {
    S3(S3Notification),
    Batch(Vec<GridEvent>),
    Single(GridEvent),
}

/// Extracts the object-created events from an Event Grid or S3 payload.
///
/// Events of any other type are skipped.
pub fn parse_events(payload: &str) -> Result<Vec<SourceEvent>> {
    let events = match serde_json::from_str::<EventPayload>(payload)? {
        EventPayload::S3(notification) => notification
            .records
            .into_iter()
            .filter_map(S3Record::into_source_event)
            .collect(),
        EventPayload::Batch(events) => events
            .into_iter()
            .filter_map(GridEvent::into_source_event)
            .collect(),
        EventPayload::Single(event) => event.into_source_event().into_iter().collect(),
    };

    Ok(events)
}

// Configuration
#[derive(Clone)]
pub struct StorageCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub thumbnail_widths: Vec<u32>,
    pub thumbnail_container: String,
    pub storage_service_url: String,
    pub storage_region: String,
    pub storage_credentials: Option<StorageCredentials>,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds and validates the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &str| var(key).ok_or_else(|| Error::Config(format!("{} not set", key)));

        let raw_widths = required("THUMBNAIL_WIDTHS")?;
        let thumbnail_widths = parse_widths(&raw_widths);
        if thumbnail_widths.is_empty() {
            warn!(
                "THUMBNAIL_WIDTHS {:?} contains no usable widths; nothing will be generated",
                raw_widths
            );
        }

        let thumbnail_container = required("THUMBNAIL_CONTAINER_NAME")?;

        let storage_service_url = required("STORAGE_SERVICE_URL")?
            .trim_end_matches('/')
            .to_string();
        Url::parse(&storage_service_url).map_err(|e| {
            Error::Config(format!(
                "STORAGE_SERVICE_URL {:?} is not a valid URL: {}",
                storage_service_url, e
            ))
        })?;

        let storage_credentials = match (
            var("STORAGE_ACCESS_KEY_ID"),
            var("STORAGE_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StorageCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "STORAGE_ACCESS_KEY_ID and STORAGE_SECRET_ACCESS_KEY must be set together"
                        .to_string(),
                ))
            }
        };

        let storage_region = var("STORAGE_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        let dry_run = match var("DRY_RUN") {
            Some(value) => parse_flag("DRY_RUN", &value)?,
            None => false,
        };

        Ok(Self {
            thumbnail_widths,
            thumbnail_container,
            storage_service_url,
            storage_region,
            storage_credentials,
            dry_run,
        })
    }

    pub fn thumbnail_settings(&self) -> ThumbnailSettings {
        ThumbnailSettings {
            widths: self.thumbnail_widths.clone(),
            container: self.thumbnail_container.clone(),
        }
    }

    /// Whether storage is a local directory rather than an S3 endpoint.
    pub fn uses_local_storage(&self) -> bool {
        self.storage_service_url.starts_with("file:")
    }
}

/// Parses a comma-delimited width list, keeping order.
///
/// Entries that are not positive integers are skipped.
pub fn parse_widths(raw: &str) -> Vec<u32> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u32>() {
            Ok(width) if width > 0 => Some(width),
            _ => {
                warn!("Skipping invalid thumbnail width {:?}", entry);
                None
            }
        })
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{} must be true or false, got {:?}",
            key, value
        ))),
    }
}

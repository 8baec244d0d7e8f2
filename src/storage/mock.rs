use super::StorageService;
use crate::naming::ObjectLocation;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

type ObjectKey = (String, String);

#[derive(Clone)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<ObjectKey, StoredObject>>>,
    base_url: String,
    upload_count: Arc<Mutex<usize>>,
    read_count: Arc<Mutex<usize>>,
    fail_upload_on: Option<usize>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://mock-storage.example.com".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            read_count: Arc::new(Mutex::new(0)),
            fail_upload_on: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_object(self, container: &str, key: &str, data: Vec<u8>) -> Self {
        self.objects.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: "application/octet-stream".to_string(),
            },
        );
        self
    }

    /// Reject the n-th upload attempt (1-based) as if the service refused it.
    pub fn with_upload_failure_on(mut self, attempt: usize) -> Self {
        self.fail_upload_on = Some(attempt);
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_read_count(&self) -> usize {
        *self.read_count.lock().unwrap()
    }

    pub fn get_object(&self, container: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys of every object in `container`, sorted.
    pub fn get_keys(&self, container: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorage {
    async fn read_object(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        *self.read_count.lock().unwrap() += 1;

        let key = (location.container.clone(), location.key.clone());
        match self.objects.lock().unwrap().get(&key) {
            Some(object) => Ok(object.data.clone()),
            None => Err(Error::Storage(format!(
                "Object not found: {}/{}",
                location.container, location.key
            ))),
        }
    }

    async fn write_object(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String> {
        let attempt = {
            let mut count = self.upload_count.lock().unwrap();
            *count += 1;
            *count
        };

        if self.fail_upload_on == Some(attempt) {
            return Err(Error::Upload {
                name: name.to_string(),
                message: "Mock upload failure".to_string(),
            });
        }

        self.objects.lock().unwrap().insert(
            (container.to_string(), name.to_string()),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}/{}/{}", self.base_url, container, name))
    }
}

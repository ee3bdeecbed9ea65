//! Durable storage for synthesized audio.
//!
//! Objects are written to an S3-compatible bucket (Cloudflare R2 in production,
//! `object_store::memory::InMemory` in tests) and served from a public base URL.

mod key;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{error, info};

pub use key::{
    AUDIO_KEY_PREFIX, DEFAULT_USER_ID, build_object_key, public_url, sanitize_user_id,
};

use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Audio storage is not configured")]
    NotConfigured,

    #[error("Refusing to store an empty audio buffer")]
    EmptyPayload,

    #[error("Audio of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Object storage error: {0}")]
    Backend(#[from] object_store::Error),
}

/// Reference to an uploaded audio object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAudioRef {
    pub uri: String,
    pub size: u64,
    pub content_type: String,
}

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub timeout: Duration,
}

impl Drop for S3Settings {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.access_key_id.zeroize();
        self.secret_access_key.zeroize();
    }
}

/// Uploads audio buffers under time-ordered keys.
#[derive(Debug, Clone)]
pub struct AudioStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
    max_bytes: usize,
}

impl AudioStore {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
            max_bytes,
        }
    }

    /// Build the R2/S3 backed store from configuration.
    ///
    /// Returns `Ok(None)` when bucket, credentials or public base URL are missing.
    pub fn from_config(config: &ServerConfig) -> Result<Option<Self>, StorageError> {
        let (Some(settings), Some(base_url)) = (config.s3_settings(), config.r2_public_base_url.as_deref())
        else {
            return Ok(None);
        };

        let store = AmazonS3Builder::new()
            .with_bucket_name(&settings.bucket)
            .with_endpoint(&settings.endpoint)
            .with_region(&settings.region)
            .with_access_key_id(&settings.access_key_id)
            .with_secret_access_key(&settings.secret_access_key)
            .with_client_options(ClientOptions::new().with_timeout(settings.timeout))
            .build()?;

        info!(
            bucket = %settings.bucket,
            endpoint = %settings.endpoint,
            "Audio storage configured"
        );
        Ok(Some(Self::new(Arc::new(store), base_url, config.max_audio_bytes)))
    }

    /// Check a buffer against the upload rules without touching the backend.
    pub fn check_payload(&self, size: usize) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::EmptyPayload);
        }
        if size > self.max_bytes {
            return Err(StorageError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Upload `bytes` under a fresh key for `user_id`. Single attempt, no retry.
    pub async fn store(
        &self,
        bytes: Bytes,
        user_id: &str,
        extension: &str,
        content_type: &str,
    ) -> Result<StoredAudioRef, StorageError> {
        self.store_at(bytes, user_id, extension, content_type, OffsetDateTime::now_utc())
            .await
    }

    pub(crate) async fn store_at(
        &self,
        bytes: Bytes,
        user_id: &str,
        extension: &str,
        content_type: &str,
        now: OffsetDateTime,
    ) -> Result<StoredAudioRef, StorageError> {
        self.check_payload(bytes.len())?;

        let key = build_object_key(user_id, extension, now);
        let location = ObjectPath::parse(&key).map_err(|e| StorageError::InvalidKey(e.to_string()))?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let mut opts = PutOptions::default();
        opts.attributes = attributes;

        let size = bytes.len() as u64;
        if let Err(e) = self
            .store
            .put_opts(&location, PutPayload::from(bytes), opts)
            .await
        {
            error!(key = %key, error = %e, "Audio upload failed");
            return Err(e.into());
        }

        let uri = public_url(&self.public_base_url, &key);
        info!(key = %key, size, content_type, "Audio uploaded");

        Ok(StoredAudioRef {
            uri,
            size,
            content_type: content_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use time::macros::datetime;

    fn memory_store(max_bytes: usize) -> (Arc<InMemory>, AudioStore) {
        let backend = Arc::new(InMemory::new());
        let store = AudioStore::new(backend.clone(), "https://cdn.example.com/", max_bytes);
        (backend, store)
    }

    #[tokio::test]
    async fn test_store_writes_object_and_returns_ref() {
        let (backend, store) = memory_store(1024);
        let now = datetime!(2024-03-07 14:05:09.123 UTC);

        let stored = store
            .store_at(Bytes::from_static(b"ID3audio"), "user@x.y!!", "mp3", "audio/mpeg", now)
            .await
            .unwrap();

        assert_eq!(
            stored.uri,
            "https://cdn.example.com/audios/2024/03/07/user@x.y___1709820309123.mp3"
        );
        assert_eq!(stored.size, 8);
        assert_eq!(stored.content_type, "audio/mpeg");

        let path = ObjectPath::from("audios/2024/03/07/user@x.y___1709820309123.mp3");
        let object = backend.get(&path).await.unwrap();
        let content_type: &str = object.attributes.get(&Attribute::ContentType).unwrap().as_ref();
        assert_eq!(content_type, "audio/mpeg");
        assert_eq!(object.bytes().await.unwrap().as_ref(), b"ID3audio");
    }

    #[tokio::test]
    async fn test_store_rejects_empty_payload() {
        let (_, store) = memory_store(1024);
        let err = store
            .store(Bytes::new(), DEFAULT_USER_ID, "mp3", "audio/mpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::EmptyPayload));
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_payload() {
        let (backend, store) = memory_store(4);
        let err = store
            .store(Bytes::from_static(b"12345"), DEFAULT_USER_ID, "mp3", "audio/mpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { size: 5, max: 4 }));

        let listed = backend.list_with_delimiter(None).await.unwrap();
        assert!(listed.objects.is_empty() && listed.common_prefixes.is_empty());
    }
}

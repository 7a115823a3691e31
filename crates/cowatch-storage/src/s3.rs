use crate::keys::{normalize_prefix, object_path};
use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStoreExt, PutOptions, PutPayload, Result as ObjectResult,
};
use std::time::Duration;

/// Static credentials, used instead of the default AWS provider chain when set.
#[derive(Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    prefix: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `prefix` - Namespace prefix prepended to every key (e.g., "videos/")
    /// * `credentials` - Static credentials; when `None` the environment/instance
    ///   provider chain is used
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        prefix: &str,
        credentials: Option<S3Credentials>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        if let Some(creds) = credentials {
            builder = builder
                .with_access_key_id(creds.access_key_id)
                .with_secret_access_key(creds.secret_access_key);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            prefix: normalize_prefix(prefix)?,
        })
    }

    fn location(&self, key: &str) -> StorageResult<(String, Path)> {
        let full_key = object_path(&self.prefix, key)?;
        let location = Path::from(full_key.clone());
        Ok((full_key, location))
    }

    /// Canonical object URL
    ///
    /// AWS: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// S3-compatible providers use path-style: `{endpoint}/{bucket}/{key}`.
    fn generate_url(&self, full_key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, full_key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, full_key
            )
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        size_hint: Option<u64>,
    ) -> StorageResult<String> {
        let (full_key, location) = self.location(key)?;
        let size = data.len() as u64;
        if let Some(hint) = size_hint.filter(|hint| *hint != size) {
            tracing::warn!(
                key = %full_key,
                size_bytes = size,
                size_hint = hint,
                "Upload size differs from declared size"
            );
        }

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> =
            object_store::ObjectStore::put_opts(&self.store, &location, PutPayload::from(data), opts)
                .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %full_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %full_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.generate_url(&full_key))
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let (full_key, location) = self.location(key)?;
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %full_key,
                    "S3 presign failed"
                );
                StorageError::BackendError(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let (full_key, location) = self.location(key)?;
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bucket = self.bucket.clone();

        let stream = result.into_stream().map(move |res| match res {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::error!(
                    bucket = %bucket,
                    key = %full_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
                Err(StorageError::DownloadFailed(e.to_string()))
            }
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let (full_key, location) = self.location(key)?;
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %full_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %full_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let (_, location) = self.location(key)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Option<S3Credentials> {
        Some(S3Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        })
    }

    #[tokio::test]
    async fn test_canonical_url_aws() {
        let storage = S3Storage::new(
            "cowatch-media".to_string(),
            "us-east-1".to_string(),
            None,
            "videos/",
            creds(),
        )
        .await
        .unwrap();

        assert_eq!(
            storage.generate_url("videos/abc.mp4"),
            "https://cowatch-media.s3.us-east-1.amazonaws.com/videos/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_canonical_url_custom_endpoint() {
        let storage = S3Storage::new(
            "cowatch-media".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000/".to_string()),
            "videos",
            creds(),
        )
        .await
        .unwrap();

        let (full_key, _) = storage.location("abc.mp4").unwrap();
        assert_eq!(full_key, "videos/abc.mp4");
        assert_eq!(
            storage.generate_url(&full_key),
            "http://localhost:9000/cowatch-media/videos/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_presigned_url_is_signed_for_prefixed_key() {
        let storage = S3Storage::new(
            "cowatch-media".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
            "videos/",
            creds(),
        )
        .await
        .unwrap();

        let url = storage
            .presigned_url("abc.mp4", Duration::from_secs(3600))
            .await
            .unwrap();

        assert!(url.contains("videos/abc.mp4"));
        assert!(url.contains("X-Amz-Signature="));
        assert!(url.contains("X-Amz-Expires=3600"));
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_before_backend_call() {
        let storage = S3Storage::new(
            "cowatch-media".to_string(),
            "us-east-1".to_string(),
            None,
            "videos/",
            creds(),
        )
        .await
        .unwrap();

        let result = storage
            .presigned_url("../secrets", Duration::from_secs(60))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}

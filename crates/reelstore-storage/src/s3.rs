use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of the buffers the object body is read into.
const BODY_CHUNK_BYTES: usize = 8 * 1024 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Public URL for an object.
///
/// AWS uses virtual-hosted style `https://{bucket}.s3.{region}.amazonaws.com/{key}`;
/// S3-compatible endpoints use path style `{endpoint}/{bucket}/{key}`.
pub(crate) fn object_url(
    bucket: &str,
    region: &str,
    endpoint_url: Option<&str>,
    key: &str,
) -> String {
    match endpoint_url {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

/// Read `reader` to EOF into fixed-size chunks. The chunks are sent as one
/// body; nothing is copied into a single contiguous buffer.
pub(crate) async fn read_payload(
    mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    content_length: Option<u64>,
    chunk_size: usize,
) -> StorageResult<PutPayload> {
    let read_err =
        |e: std::io::Error| StorageError::UploadFailed(format!("Failed to read upload body: {}", e));

    let expected_chunks = content_length.map_or(1, |len| len as usize / chunk_size + 1);
    let mut chunks: Vec<Bytes> = Vec::with_capacity(expected_chunks);

    let mut eof = false;
    while !eof {
        let mut chunk = BytesMut::with_capacity(chunk_size);
        while chunk.len() < chunk_size {
            if reader.read_buf(&mut chunk).await.map_err(read_err)? == 0 {
                eof = true;
                break;
            }
        }
        if !chunk.is_empty() {
            chunks.push(chunk.freeze());
        }
    }

    Ok(chunks.into_iter().collect())
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_object(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        let start = std::time::Instant::now();

        // Whole-object put: collect the body, then issue exactly one request.
        let payload = read_payload(reader, content_length, BODY_CHUNK_BYTES).await?;
        let size = payload.content_length() as u64;
        let location = Path::from(storage_key.to_string());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, payload, opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.public_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    fn public_url(&self, storage_key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

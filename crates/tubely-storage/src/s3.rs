use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    cdn_domain: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `cdn_domain` - Optional distribution domain (e.g. "d111111abcdef8.cloudfront.net")
    ///   used for public URLs instead of the bucket address
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        cdn_domain: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS_* environment variables.
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
            cdn_domain,
        })
    }
}

/// Public URL for an S3 object.
///
/// A CDN domain wins when configured. Otherwise custom endpoints use
/// path-style `{endpoint}/{bucket}/{key}` and AWS uses the virtual-hosted
/// `https://{bucket}.s3.{region}.amazonaws.com/{key}` form.
pub(crate) fn format_public_url(
    bucket: &str,
    region: &str,
    endpoint_url: Option<&str>,
    cdn_domain: Option<&str>,
    key: &str,
) -> String {
    if let Some(domain) = cdn_domain {
        let domain = domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        format!("https://{}/{}", domain, key)
    } else if let Some(endpoint) = endpoint_url {
        format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
    } else {
        format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(storage_key)?;

        let size = data.len() as u64;
        let location = Path::from(storage_key);
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
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

        Ok(())
    }

    fn url_for(&self, storage_key: &str) -> String {
        format_public_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            self.cdn_domain.as_deref(),
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

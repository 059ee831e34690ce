//! S3-compatible attachment store.
//!
//! Works against AWS S3 and against self-hosted S3 APIs (MinIO, Supabase
//! storage) when an endpoint override is configured.

use std::fmt;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use club_core::locator::LocatorFormat;
use club_core::store::{AttachmentStore, AttachmentStoreError};

/// Connection settings for [`S3AttachmentStore`].
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    /// Custom endpoint for S3-compatible services. Enables path-style
    /// addressing.
    pub endpoint_url: Option<String>,
    /// Region override; otherwise resolved from the AWS environment.
    pub region: Option<String>,
}

pub struct S3AttachmentStore {
    client: aws_sdk_s3::Client,
    locators: LocatorFormat,
}

impl S3AttachmentStore {
    /// Build a client from the AWS environment (credentials, region) plus
    /// the given overrides.
    pub async fn connect(settings: &S3Settings, locators: LocatorFormat) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            locators,
        }
    }

    fn bucket(&self) -> &str {
        self.locators.bucket()
    }
}

/// Service-side refusals are `Rejected`; everything else (dispatch,
/// timeout, malformed response) is `Unavailable`.
fn classify<E, R>(err: SdkError<E, R>) -> AttachmentStoreError
where
    E: std::error::Error + 'static,
    R: fmt::Debug,
{
    let detail = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(_) => AttachmentStoreError::Rejected(detail),
        _ => AttachmentStoreError::Unavailable(detail),
    }
}

#[async_trait]
impl AttachmentStore for S3AttachmentStore {
    fn backend_tag(&self) -> &'static str {
        "s3"
    }

    async fn write(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AttachmentStoreError> {
        self.client
            .put_object()
            .bucket(self.bucket())
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AttachmentStoreError> {
        self.client
            .delete_object()
            .bucket(self.bucket())
            .key(path)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.locators.render(path)
    }
}

//! Storage API.

use std::sync::Arc;

use crate::{
    client::ClientInner,
    error::{Error, Result},
};

/// API for blob storage uploads.
pub struct StorageApi {
    client: Arc<ClientInner>,
}

impl StorageApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Upload a file under a bucket path and return its public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        if bucket.is_empty() || path.is_empty() {
            return Err(Error::InvalidArgument("bucket and path are required".into()));
        }

        self.client
            .executor()
            .upload_object(bucket, path, bytes, content_type)
            .await
            .map_err(|e| annotate_upload_error(e, bucket))?;

        let url = self.client.config.public_object_url(bucket, path)?;
        Ok(url.to_string())
    }

    /// Public URL for an object, without uploading.
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<String> {
        Ok(self.client.config.public_object_url(bucket, path)?.to_string())
    }
}

/// Attach a remediation hint when the failure indicates a missing storage
/// location.
fn annotate_upload_error(error: Error, bucket: &str) -> Error {
    match error {
        Error::Upload(message) if message.to_lowercase().contains("bucket") => Error::Upload(
            format!("{}. Create the \"{}\" bucket and retry.", message, bucket),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bucket_gets_hint() {
        let annotated = annotate_upload_error(Error::Upload("Bucket not found".into()), "avatars");
        match annotated {
            Error::Upload(message) => {
                assert!(message.contains("Bucket not found"));
                assert!(message.contains("\"avatars\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_upload_errors_untouched() {
        let annotated = annotate_upload_error(Error::Upload("payload too large".into()), "avatars");
        match annotated {
            Error::Upload(message) => assert_eq!(message, "payload too large"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

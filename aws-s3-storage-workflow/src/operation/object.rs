/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
use aws_sdk_s3::primitives::ByteStream;
use tracing::Instrument;

use crate::error::Error;

/// Response type for [`upload_object`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadOutput {
    e_tag: Option<String>,
    version_id: Option<String>,
}

impl UploadOutput {
    /// Entity tag assigned to the uploaded object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Version of the object, when bucket versioning is enabled
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }
}

impl From<aws_sdk_s3::operation::put_object::PutObjectOutput> for UploadOutput {
    fn from(value: aws_sdk_s3::operation::put_object::PutObjectOutput) -> Self {
        UploadOutput {
            e_tag: value.e_tag,
            version_id: value.version_id,
        }
    }
}

/// Response type for [`download_object`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadOutput {
    path: PathBuf,
    bytes_written: u64,
    e_tag: Option<String>,
}

impl DownloadOutput {
    /// Local file the object was written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes written to [`path`](Self::path)
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Entity tag of the downloaded object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }
}

/// Upload the file at `path` to `bucket`/`key` with a single `PutObject` request.
pub async fn upload_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    path: &Path,
) -> Result<UploadOutput, Error> {
    upload_body(client, bucket, key, ByteStream::from_path(path).await?).await
}

/// Upload `body` to `bucket`/`key` with a single `PutObject` request.
pub async fn upload_body(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: ByteStream,
) -> Result<UploadOutput, Error> {
    let output = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body)
        .send()
        .instrument(tracing::info_span!("send-put-object", bucket, key))
        .await?;
    tracing::info!("file uploaded: {key}");
    Ok(output.into())
}

/// Download `bucket`/`key` into the file at `path`, replacing any existing content.
///
/// The body is written to a temporary file next to `path` and moved into place once complete,
/// so a failed request or a body that fails partway leaves an existing file untouched.
pub async fn download_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    path: &Path,
) -> Result<DownloadOutput, Error> {
    let output = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .instrument(tracing::info_span!("send-get-object", bucket, key))
        .await?;

    let e_tag = output.e_tag;
    let bytes_written = crate::io::write_body(output.body, path)
        .instrument(tracing::debug_span!("write-output"))
        .await?;
    tracing::info!("file downloaded to: {}", path.display());

    Ok(DownloadOutput {
        path: path.to_path_buf(),
        bytes_written,
        e_tag,
    })
}

/// Delete `bucket`/`key`.
pub async fn delete_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
) -> Result<DeleteObjectOutput, Error> {
    let output = client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .instrument(tracing::info_span!("send-delete-object", bucket, key))
        .await?;
    tracing::info!("object deleted: {key}");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
    use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_sdk_s3::primitives::ByteStream;
    use aws_sdk_s3::types::error::NoSuchKey;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use aws_smithy_types::error::ErrorMetadata;

    use super::{delete_object, download_object, upload_body, upload_object};
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_upload_body_exposes_e_tag() {
        let put = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| r.bucket() == Some("test-bucket") && r.key() == Some("file.txt"))
            .then_output(|| PutObjectOutput::builder().e_tag("12345").build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put]);

        let output = upload_body(
            &client,
            "test-bucket",
            "file.txt",
            ByteStream::from_static(b"Test content"),
        )
        .await
        .unwrap();

        assert_eq!(Some("12345"), output.e_tag());
        assert_eq!(None, output.version_id());
        assert_eq!(1, put.num_calls());
    }

    #[tokio::test]
    async fn test_upload_object_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.txt");
        std::fs::write(&path, b"Test content").unwrap();

        let put = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| r.key() == Some("file.txt"))
            .then_output(|| PutObjectOutput::builder().e_tag("12345").build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put]);

        let output = upload_object(&client, "test-bucket", "file.txt", &path)
            .await
            .unwrap();

        assert_eq!(Some("12345"), output.e_tag());
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let put = mock!(aws_sdk_s3::Client::put_object)
            .then_output(|| PutObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put]);

        let err = upload_object(
            &client,
            "test-bucket",
            "file.txt",
            &dir.path().join("does-not-exist.txt"),
        )
        .await
        .unwrap_err();

        assert_eq!(&ErrorKind::IOError, err.kind());
        assert_eq!(0, put.num_calls());
    }

    #[tokio::test]
    async fn test_download_object_writes_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("downloaded.txt");
        std::fs::write(&path, b"previous download, much longer than the object").unwrap();

        let get = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|r| r.bucket() == Some("test-bucket") && r.key() == Some("file.txt"))
            .then_output(|| {
                GetObjectOutput::builder()
                    .e_tag("12345")
                    .body(ByteStream::from_static(b"Test content"))
                    .build()
            });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get]);

        let output = download_object(&client, "test-bucket", "file.txt", &path)
            .await
            .unwrap();

        assert_eq!(12, output.bytes_written());
        assert_eq!(Some("12345"), output.e_tag());
        assert_eq!(path.as_path(), output.path());
        assert_eq!(b"Test content".to_vec(), std::fs::read(&path).unwrap());
    }

    #[tokio::test]
    async fn test_failed_download_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("downloaded.txt");
        std::fs::write(&path, b"previous download").unwrap();

        let get = mock!(aws_sdk_s3::Client::get_object).then_error(|| {
            GetObjectError::NoSuchKey(
                NoSuchKey::builder()
                    .meta(ErrorMetadata::builder().code("NoSuchKey").build())
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get]);

        let err = download_object(&client, "test-bucket", "file.txt", &path)
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::NotFound, err.kind());
        assert_eq!(b"previous download".to_vec(), std::fs::read(&path).unwrap());
    }

    #[tokio::test]
    async fn test_delete_object() {
        let delete = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|r| r.bucket() == Some("test-bucket") && r.key() == Some("file.txt"))
            .then_output(|| DeleteObjectOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&delete]);

        let output = delete_object(&client, "test-bucket", "file.txt").await;

        assert!(output.is_ok());
        assert_eq!(1, delete.num_calls());
    }
}

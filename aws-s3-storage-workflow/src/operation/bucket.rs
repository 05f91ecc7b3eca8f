/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::operation::delete_bucket::DeleteBucketOutput;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_types::region::Region;
use tracing::Instrument;

use crate::error::Error;
use crate::types::CreateBucketStatus;

/// `us-east-1` is the default location and S3 rejects it as an explicit constraint.
const DEFAULT_LOCATION: &str = "us-east-1";

/// Create `bucket` in `region`.
///
/// A bucket that already exists, whether owned by the caller or by someone else, is not an
/// error: the conflict is logged and reported through [`CreateBucketStatus`]. Every other
/// failure is returned.
pub async fn create_bucket(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    region: &Region,
) -> Result<CreateBucketStatus, Error> {
    let mut req = client.create_bucket().bucket(bucket);
    if region.as_ref() != DEFAULT_LOCATION {
        let config = CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region.as_ref()))
            .build();
        req = req.create_bucket_configuration(config);
    }

    let result = req
        .send()
        .instrument(tracing::info_span!("send-create-bucket", bucket))
        .await;

    match result {
        Ok(output) => {
            tracing::info!("bucket created: {bucket}");
            Ok(CreateBucketStatus::Created {
                location: output.location,
            })
        }
        Err(err) => match err.as_service_error() {
            Some(service_err) if service_err.is_bucket_already_owned_by_you() => {
                tracing::warn!("bucket {bucket} already exists and is owned by you");
                Ok(CreateBucketStatus::AlreadyOwned)
            }
            Some(service_err) if service_err.is_bucket_already_exists() => {
                tracing::warn!("bucket {bucket} already exists");
                Ok(CreateBucketStatus::AlreadyExists)
            }
            _ => Err(err.into()),
        },
    }
}

/// Delete `bucket`. The bucket must be empty.
pub async fn delete_bucket(
    client: &aws_sdk_s3::Client,
    bucket: &str,
) -> Result<DeleteBucketOutput, Error> {
    let output = client
        .delete_bucket()
        .bucket(bucket)
        .send()
        .instrument(tracing::info_span!("send-delete-bucket", bucket))
        .await?;
    tracing::info!("bucket deleted: {bucket}");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::create_bucket::{CreateBucketError, CreateBucketOutput};
    use aws_sdk_s3::operation::delete_bucket::{DeleteBucketError, DeleteBucketOutput};
    use aws_sdk_s3::types::error::{BucketAlreadyExists, BucketAlreadyOwnedByYou};
    use aws_sdk_s3::types::BucketLocationConstraint;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use aws_smithy_runtime::test_util::capture_test_logs::capture_test_logs;
    use aws_smithy_types::error::ErrorMetadata;
    use aws_types::region::Region;

    use super::{create_bucket, delete_bucket};
    use crate::error::ErrorKind;
    use crate::types::CreateBucketStatus;

    #[tokio::test]
    async fn test_create_bucket_success() {
        let create = mock!(aws_sdk_s3::Client::create_bucket)
            .match_requests(|r| {
                r.bucket() == Some("test-bucket")
                    && r.create_bucket_configuration()
                        .and_then(|c| c.location_constraint())
                        == Some(&BucketLocationConstraint::EuWest1)
            })
            .then_output(|| {
                CreateBucketOutput::builder()
                    .location("http://test-bucket.s3.amazonaws.com/")
                    .build()
            });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&create]);

        let status = create_bucket(&client, "test-bucket", &Region::from_static("eu-west-1"))
            .await
            .unwrap();

        assert_eq!(
            CreateBucketStatus::Created {
                location: Some("http://test-bucket.s3.amazonaws.com/".to_owned())
            },
            status
        );
        assert_eq!(1, create.num_calls());
    }

    #[tokio::test]
    async fn test_create_bucket_omits_default_location() {
        let create = mock!(aws_sdk_s3::Client::create_bucket)
            .match_requests(|r| {
                r.bucket() == Some("test-bucket") && r.create_bucket_configuration().is_none()
            })
            .then_output(|| CreateBucketOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&create]);

        let status = create_bucket(&client, "test-bucket", &Region::from_static("us-east-1"))
            .await
            .unwrap();

        assert!(status.is_created());
        assert_eq!(1, create.num_calls());
    }

    #[tokio::test]
    async fn test_create_bucket_already_owned_is_tolerated() {
        let (_guard, rx) = capture_test_logs();
        let create = mock!(aws_sdk_s3::Client::create_bucket).then_error(|| {
            CreateBucketError::BucketAlreadyOwnedByYou(BucketAlreadyOwnedByYou::builder().build())
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&create]);

        let status = create_bucket(&client, "test-bucket", &Region::from_static("us-east-1"))
            .await
            .unwrap();

        assert_eq!(CreateBucketStatus::AlreadyOwned, status);
        assert!(rx.contents().contains("already exists and is owned by you"));
    }

    #[tokio::test]
    async fn test_create_bucket_already_exists_is_tolerated() {
        let create = mock!(aws_sdk_s3::Client::create_bucket).then_error(|| {
            CreateBucketError::BucketAlreadyExists(BucketAlreadyExists::builder().build())
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&create]);

        let status = create_bucket(&client, "test-bucket", &Region::from_static("us-east-1"))
            .await
            .unwrap();

        assert_eq!(CreateBucketStatus::AlreadyExists, status);
    }

    #[tokio::test]
    async fn test_create_bucket_other_errors_propagate() {
        let create = mock!(aws_sdk_s3::Client::create_bucket).then_error(|| {
            CreateBucketError::generic(
                ErrorMetadata::builder()
                    .code("InvalidLocationConstraint")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&create]);

        let err = create_bucket(&client, "test-bucket", &Region::from_static("mars-north-1"))
            .await
            .unwrap_err();

        assert_eq!(&ErrorKind::ServiceError, err.kind());
        assert_eq!(1, create.num_calls());
    }

    #[tokio::test]
    async fn test_delete_bucket() {
        let delete = mock!(aws_sdk_s3::Client::delete_bucket)
            .match_requests(|r| r.bucket() == Some("test-bucket"))
            .then_output(|| DeleteBucketOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&delete]);

        let output = delete_bucket(&client, "test-bucket").await;

        assert!(output.is_ok());
        assert_eq!(1, delete.num_calls());
    }

    #[tokio::test]
    async fn test_delete_non_empty_bucket() {
        let delete = mock!(aws_sdk_s3::Client::delete_bucket).then_error(|| {
            DeleteBucketError::generic(ErrorMetadata::builder().code("BucketNotEmpty").build())
        });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&delete]);

        let err = delete_bucket(&client, "test-bucket").await.unwrap_err();

        assert_eq!(&ErrorKind::BucketNotEmpty, err.kind());
    }
}

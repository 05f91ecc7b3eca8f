/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_types::region::Region;

use crate::config::{WorkflowConfig, DEFAULT_REGION};
use crate::error::{self, Error};
use crate::operation::bucket::{create_bucket, delete_bucket};
use crate::operation::list_objects::{list_objects, ListObjectsInput};
use crate::operation::object::{
    delete_object, download_object, upload_object, DownloadOutput, UploadOutput,
};
use crate::types::{CreateBucketStatus, ObjectSummary, Step, WorkflowState};

/// Runs the bucket and object round trip:
/// create bucket, upload, list, download, delete object, delete bucket.
///
/// Steps run one after another and the first failure aborts the run. Unless
/// [`cleanup_on_failure`](crate::config::Builder::cleanup_on_failure) is set, whatever was
/// created before the failure is left in place.
///
/// The S3 client is owned by the workflow and released when the workflow is dropped.
#[derive(Debug)]
pub struct Workflow {
    client: aws_sdk_s3::Client,
    config: WorkflowConfig,
    state: WorkflowState,
    started: bool,
}

/// Per-step results of a completed workflow run
#[derive(Debug, Clone)]
pub struct WorkflowOutput {
    bucket_status: CreateBucketStatus,
    upload: UploadOutput,
    objects: Vec<ObjectSummary>,
    download: DownloadOutput,
    state: WorkflowState,
}

impl WorkflowOutput {
    /// Whether the bucket was created or already existed
    pub fn bucket_status(&self) -> &CreateBucketStatus {
        &self.bucket_status
    }

    /// Response to the object upload
    pub fn upload(&self) -> &UploadOutput {
        &self.upload
    }

    /// Objects found in the bucket after the upload
    pub fn objects(&self) -> &[ObjectSummary] {
        &self.objects
    }

    /// Result of downloading the object
    pub fn download(&self) -> &DownloadOutput {
        &self.download
    }

    /// State reached by the run
    pub fn state(&self) -> WorkflowState {
        self.state
    }
}

impl Workflow {
    /// Create a workflow that will use `client` for every request.
    pub fn new(client: aws_sdk_s3::Client, config: WorkflowConfig) -> Self {
        Self {
            client,
            config,
            state: WorkflowState::Init,
            started: false,
        }
    }

    /// The workflow configuration
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// The position reached so far, useful to see how far a failed run got.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Execute the workflow.
    ///
    /// The upload file is created empty first if it does not exist. A workflow runs once,
    /// whether or not the first run succeeded; calling `run` again returns an
    /// [`InputInvalid`](crate::error::ErrorKind::InputInvalid) error.
    pub async fn run(&mut self) -> Result<WorkflowOutput, Error> {
        if self.started {
            return Err(error::invalid_input(format!(
                "workflow already ran (state: {:?})",
                self.state
            )));
        }
        self.started = true;

        crate::io::create_sample_file(self.config.upload_path()).await?;

        match self.run_steps().await {
            Ok(output) => Ok(output),
            Err(err) => {
                tracing::debug!("workflow aborted in state {:?}: {err}", self.state);
                if self.config.cleanup_on_failure() {
                    self.cleanup().await;
                }
                Err(err)
            }
        }
    }

    async fn run_steps(&mut self) -> Result<WorkflowOutput, Error> {
        let client = &self.client;
        let config = &self.config;
        let bucket = config.bucket();
        let key = config.key();

        let region = self.location_region();
        let bucket_status = create_bucket(client, bucket, &region)
            .await
            .map_err(|err| err.with_step(Step::CreateBucket))?;
        self.state = advance(self.state, Step::CreateBucket);

        let upload = upload_object(client, bucket, key, config.upload_path())
            .await
            .map_err(|err| err.with_step(Step::UploadObject))?;
        self.state = advance(self.state, Step::UploadObject);

        tracing::info!("objects in bucket {bucket}:");
        let input = ListObjectsInput::new(bucket).page_size(config.page_size());
        let objects = list_objects(client, input)
            .await
            .map_err(|err| err.with_step(Step::ListObjects))?;
        self.state = advance(self.state, Step::ListObjects);

        let download = download_object(client, bucket, key, config.download_path())
            .await
            .map_err(|err| err.with_step(Step::DownloadObject))?;
        self.state = advance(self.state, Step::DownloadObject);

        delete_object(client, bucket, key)
            .await
            .map_err(|err| err.with_step(Step::DeleteObject))?;
        self.state = advance(self.state, Step::DeleteObject);

        delete_bucket(client, bucket)
            .await
            .map_err(|err| err.with_step(Step::DeleteBucket))?;
        self.state = advance(self.state, Step::DeleteBucket);

        Ok(WorkflowOutput {
            bucket_status,
            upload,
            objects,
            download,
            state: self.state,
        })
    }

    /// The configured region, falling back to the client's region.
    fn location_region(&self) -> Region {
        self.config
            .region()
            .or_else(|| self.client.config().region())
            .cloned()
            .unwrap_or_else(|| Region::from_static(DEFAULT_REGION))
    }

    /// Best effort removal of the object and bucket left behind by a failed run.
    ///
    /// Failures are logged and otherwise ignored. Successful deletes move the state straight
    /// to `ObjectAbsent` / `BucketAbsent`.
    async fn cleanup(&mut self) {
        let bucket = self.config.bucket();
        let key = self.config.key();

        if self.state.object_may_exist() {
            tracing::info!("cleanup: deleting object {key}");
            match delete_object(&self.client, bucket, key).await {
                Ok(_) => self.state = WorkflowState::ObjectAbsent,
                Err(err) => tracing::warn!("cleanup: failed to delete object {key}: {err}"),
            }
        }

        if self.state.bucket_exists() {
            tracing::info!("cleanup: deleting bucket {bucket}");
            match delete_bucket(&self.client, bucket).await {
                Ok(_) => self.state = WorkflowState::BucketAbsent,
                Err(err) => tracing::warn!("cleanup: failed to delete bucket {bucket}: {err}"),
            }
        }
    }
}

fn advance(state: WorkflowState, step: Step) -> WorkflowState {
    let next = state.advance(step);
    debug_assert!(next.is_some(), "{step} is not valid from {state:?}");
    next.unwrap_or(state)
}

impl Drop for Workflow {
    fn drop(&mut self) {
        tracing::debug!(
            "releasing S3 client - bucket: {}, final state: {:?}",
            self.config.bucket(),
            self.state
        );
    }
}

/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// One of the operations executed by a [`Workflow`](crate::workflow::Workflow), in run order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Step {
    /// `CreateBucket` with a location constraint
    CreateBucket,
    /// `PutObject` from a local file
    UploadObject,
    /// `ListObjectsV2` over the whole bucket
    ListObjects,
    /// `GetObject` into a local file
    DownloadObject,
    /// `DeleteObject`
    DeleteObject,
    /// `DeleteBucket`
    DeleteBucket,
}

impl Step {
    /// All steps in the order a workflow executes them.
    pub const ALL: [Step; 6] = [
        Step::CreateBucket,
        Step::UploadObject,
        Step::ListObjects,
        Step::DownloadObject,
        Step::DeleteObject,
        Step::DeleteBucket,
    ];

    /// Short, stable name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateBucket => "create-bucket",
            Step::UploadObject => "upload-object",
            Step::ListObjects => "list-objects",
            Step::DownloadObject => "download-object",
            Step::DeleteObject => "delete-object",
            Step::DeleteBucket => "delete-bucket",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position reached by a workflow run.
///
/// Transitions are strictly linear; completing a [`Step`] moves the state forward by one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub enum WorkflowState {
    /// Nothing has been sent yet
    #[default]
    Init,
    /// The bucket was created or already existed
    BucketReady,
    /// The object has been uploaded
    ObjectPresent,
    /// The bucket contents have been listed
    Listed,
    /// The object has been written to the local download path
    Downloaded,
    /// The object has been deleted
    ObjectAbsent,
    /// The bucket has been deleted
    BucketAbsent,
}

impl WorkflowState {
    /// The step that moves the workflow out of this state, `None` once the run is finished.
    pub fn next_step(&self) -> Option<Step> {
        match self {
            WorkflowState::Init => Some(Step::CreateBucket),
            WorkflowState::BucketReady => Some(Step::UploadObject),
            WorkflowState::ObjectPresent => Some(Step::ListObjects),
            WorkflowState::Listed => Some(Step::DownloadObject),
            WorkflowState::Downloaded => Some(Step::DeleteObject),
            WorkflowState::ObjectAbsent => Some(Step::DeleteBucket),
            WorkflowState::BucketAbsent => None,
        }
    }

    /// The state reached once `step` completes from this state.
    ///
    /// Returns `None` if `step` is not the next step for this state.
    pub fn advance(&self, step: Step) -> Option<WorkflowState> {
        if self.next_step() != Some(step) {
            return None;
        }
        let next = match step {
            Step::CreateBucket => WorkflowState::BucketReady,
            Step::UploadObject => WorkflowState::ObjectPresent,
            Step::ListObjects => WorkflowState::Listed,
            Step::DownloadObject => WorkflowState::Downloaded,
            Step::DeleteObject => WorkflowState::ObjectAbsent,
            Step::DeleteBucket => WorkflowState::BucketAbsent,
        };
        Some(next)
    }

    /// True while the uploaded object may still exist in the bucket.
    pub fn object_may_exist(&self) -> bool {
        matches!(
            self,
            WorkflowState::ObjectPresent | WorkflowState::Listed | WorkflowState::Downloaded
        )
    }

    /// True while the bucket is known to exist.
    pub fn bucket_exists(&self) -> bool {
        !matches!(self, WorkflowState::Init | WorkflowState::BucketAbsent)
    }
}

/// Outcome of a `CreateBucket` request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CreateBucketStatus {
    /// The bucket was created, with the location reported by the service (if any)
    Created {
        /// The `Location` header returned by S3
        location: Option<String>,
    },
    /// The bucket name is already taken
    AlreadyExists,
    /// The caller already owns a bucket with this name
    AlreadyOwned,
}

impl CreateBucketStatus {
    /// True if this request created the bucket.
    pub fn is_created(&self) -> bool {
        matches!(self, CreateBucketStatus::Created { .. })
    }
}

/// Summary of an object returned by listing a bucket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectSummary {
    key: String,
    size: i64,
    e_tag: Option<String>,
}

impl ObjectSummary {
    /// The object key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Object size in bytes
    pub fn size(&self) -> i64 {
        self.size
    }

    /// The entity tag reported by the listing, if any
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }
}

impl From<aws_sdk_s3::types::Object> for ObjectSummary {
    fn from(value: aws_sdk_s3::types::Object) -> Self {
        ObjectSummary {
            key: value.key.unwrap_or_default(),
            size: value.size.unwrap_or_default(),
            e_tag: value.e_tag,
        }
    }
}

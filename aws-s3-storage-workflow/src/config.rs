/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use aws_types::region::Region;

use crate::error::{self, Error};

/// Loading an S3 client from the environment
pub mod loader;

/// Region used when neither the configuration nor the client names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for a [`Workflow`](crate::workflow::Workflow)
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    bucket: String,
    key: String,
    upload_path: PathBuf,
    download_path: PathBuf,
    region: Option<Region>,
    page_size: Option<i32>,
    cleanup_on_failure: bool,
}

impl WorkflowConfig {
    /// Create a new `WorkflowConfig` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The bucket created, used, then deleted by the workflow
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The object key uploaded, downloaded, then deleted by the workflow
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Local file used as the upload source
    pub fn upload_path(&self) -> &Path {
        &self.upload_path
    }

    /// Local file the object is downloaded to
    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    /// Region used as the bucket location constraint, if set.
    ///
    /// When unset the workflow uses the region of its client.
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Maximum number of keys requested per `ListObjectsV2` page, if set
    pub fn page_size(&self) -> Option<i32> {
        self.page_size
    }

    /// Whether a failed run attempts to delete the object and bucket it left behind
    pub fn cleanup_on_failure(&self) -> bool {
        self.cleanup_on_failure
    }
}

/// Fluent style builder for [WorkflowConfig]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    bucket: Option<String>,
    key: Option<String>,
    upload_path: Option<PathBuf>,
    download_path: Option<PathBuf>,
    region: Option<Region>,
    page_size: Option<i32>,
    cleanup_on_failure: bool,
}

impl Builder {
    /// Set the bucket name. Required.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the object key. Required.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the local file to upload. Required.
    ///
    /// The file is created empty if it does not exist.
    pub fn upload_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.upload_path = Some(path.into());
        self
    }

    /// Set the local file to download the object to. Required.
    ///
    /// An existing file at this path is overwritten.
    pub fn download_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_path = Some(path.into());
        self
    }

    /// Set the region used as the bucket location constraint.
    ///
    /// Default is the region the S3 client is configured with.
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Set the maximum number of keys requested per listing page.
    ///
    /// Default lets the service decide (up to 1,000).
    pub fn page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Attempt to delete whatever the run left behind when a step fails.
    ///
    /// Default is `false`: a failed run leaves the bucket and object in place.
    pub fn cleanup_on_failure(mut self, cleanup: bool) -> Self {
        self.cleanup_on_failure = cleanup;
        self
    }

    /// Consumes the builder and constructs a [`WorkflowConfig`]
    pub fn build(self) -> Result<WorkflowConfig, Error> {
        let bucket = required("bucket", self.bucket)?;
        let key = required("key", self.key)?;
        let upload_path = required_path("upload_path", self.upload_path)?;
        let download_path = required_path("download_path", self.download_path)?;

        if let Some(page_size) = self.page_size {
            if page_size < 1 {
                return Err(error::invalid_input(format!(
                    "page_size must be positive, got {page_size}"
                )));
            }
        }

        Ok(WorkflowConfig {
            bucket,
            key,
            upload_path,
            download_path,
            region: self.region,
            page_size: self.page_size,
            cleanup_on_failure: self.cleanup_on_failure,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(error::invalid_input(format!("{field} is required"))),
    }
}

fn required_path(field: &str, value: Option<PathBuf>) -> Result<PathBuf, Error> {
    match value {
        Some(value) if !value.as_os_str().is_empty() => Ok(value),
        _ => Err(error::invalid_input(format!("{field} is required"))),
    }
}

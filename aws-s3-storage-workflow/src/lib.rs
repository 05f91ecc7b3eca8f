/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! A bucket and object round trip against Amazon S3.
//!
//! A [`Workflow`] drives six requests against the [service API] in a fixed order: create a
//! bucket, upload a local file, list the bucket, download the object to a local file, delete
//! the object and delete the bucket. A bucket that already exists is tolerated; any other
//! failure aborts the run.
//!
//! [service API]: https://docs.aws.amazon.com/AmazonS3/latest/API/API_Operations_Amazon_Simple_Storage_Service.html
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), aws_s3_storage_workflow::error::Error> {
//! use aws_s3_storage_workflow::{Workflow, WorkflowConfig};
//!
//! let client = aws_s3_storage_workflow::from_env().load().await;
//! let config = WorkflowConfig::builder()
//!     .bucket("my-bucket")
//!     .key("sample-upload.txt")
//!     .upload_path("upload.txt")
//!     .download_path("downloaded.txt")
//!     .build()?;
//!
//! let output = Workflow::new(client, config).run().await?;
//! println!("uploaded e-tag: {:?}", output.upload().e_tag());
//! # Ok(())
//! # }
//! ```
//!
//! Each step is also available on its own, see [`operation`].

/// Error types emitted by `aws-s3-storage-workflow`
pub mod error;

/// Common types used by `aws-s3-storage-workflow`
pub mod types;

/// Local file helpers
pub mod io;

/// Workflow configuration
pub mod config;

/// Individual S3 operations used by the workflow
pub mod operation;

/// The workflow runner
pub mod workflow;

use self::config::loader::ConfigLoader;
pub use self::config::WorkflowConfig;
pub use self::workflow::{Workflow, WorkflowOutput};

/// Create a loader for an S3 client configured from the environment
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}

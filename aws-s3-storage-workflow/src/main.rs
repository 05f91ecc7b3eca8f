/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use aws_s3_storage_workflow::types::CreateBucketStatus;
use aws_s3_storage_workflow::{Workflow, WorkflowConfig};
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_types::region::Region;
use clap::Parser;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "s3-storage-demo")]
#[command(
    about = "Creates a bucket, uploads, lists, downloads and deletes an object, then deletes the bucket."
)]
struct Args {
    /// Bucket to create, use and delete
    #[arg(long, default_value = "my-s3-bucket-java-demo-2025")]
    bucket: String,

    /// Object key to upload, download and delete
    #[arg(long, default_value = "sample-upload.txt")]
    key: String,

    /// Local file to upload (created empty if missing)
    #[arg(long, default_value = "upload.txt")]
    upload_path: PathBuf,

    /// Local file to download the object to (overwritten)
    #[arg(long, default_value = "downloaded.txt")]
    download_path: PathBuf,

    /// Region to send requests to and create the bucket in
    #[arg(long, default_value = aws_s3_storage_workflow::config::DEFAULT_REGION)]
    region: String,

    /// Named profile from the shared AWS config files
    #[arg(long)]
    profile: Option<String>,

    /// Custom endpoint for S3 compatible stores
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Maximum keys per listing page
    #[arg(long)]
    page_size: Option<i32>,

    /// Delete the object and bucket if a step fails
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    cleanup_on_failure: bool,
}

async fn run(args: Args) -> Result<(), BoxError> {
    let region = Region::new(args.region);

    let mut loader = aws_s3_storage_workflow::from_env().region(region.clone());
    if let Some(profile) = args.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint_url) = args.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let client = loader.load().await;

    let mut config = WorkflowConfig::builder()
        .bucket(args.bucket)
        .key(args.key)
        .upload_path(args.upload_path)
        .download_path(args.download_path)
        .region(region)
        .cleanup_on_failure(args.cleanup_on_failure);
    if let Some(page_size) = args.page_size {
        config = config.page_size(page_size);
    }

    let mut workflow = Workflow::new(client, config.build()?);
    let output = workflow.run().await?;

    let bucket = workflow.config().bucket();
    match output.bucket_status() {
        CreateBucketStatus::Created { .. } => println!("bucket created: {bucket}"),
        _ => println!("bucket already existed: {bucket}"),
    }
    println!(
        "uploaded {} (e-tag {})",
        workflow.config().key(),
        output.upload().e_tag().unwrap_or("-")
    );
    println!("objects listed: {}", output.objects().len());
    println!(
        "downloaded {} bytes to {}",
        output.download().bytes_written(),
        output.download().path().display()
    );
    println!("object and bucket deleted; final state: {:?}", output.state());
    Ok(())
}

/// Log a failed run with its full cause chain and map the outcome to an exit code.
fn report(result: Result<(), BoxError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("workflow failed: {}", DisplayErrorContext(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("running with {args:?}");

    report(run(args).await)
}

/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use aws_sdk_s3::primitives::ByteStream;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::Error;

/// Ensure a file exists at `path`, creating an empty one if it is absent.
///
/// An existing file is left untouched. Returns `true` if the file was created.
pub async fn create_sample_file(path: impl AsRef<Path>) -> Result<bool, Error> {
    let path = path.as_ref();
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(_) => {
            tracing::debug!("created empty sample file {}", path.display());
            Ok(true)
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!("sample file {} already exists", path.display());
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Write `body` to the file at `path`, replacing any existing content.
///
/// The body is streamed into a `.part` file next to `path` which is renamed over `path`
/// once complete. If the body fails the partial file is removed and `path` is left as it was.
///
/// Returns the number of bytes written.
pub(crate) async fn write_body(body: ByteStream, path: &Path) -> Result<u64, Error> {
    let part = part_path(path);
    match stream_to_file(body, &part).await {
        Ok(written) => {
            fs::rename(&part, path).await?;
            Ok(written)
        }
        Err(err) => {
            if let Err(rm_err) = fs::remove_file(&part).await {
                tracing::debug!("failed to remove {}: {rm_err}", part.display());
            }
            Err(err)
        }
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

async fn stream_to_file(mut body: ByteStream, path: &Path) -> Result<u64, Error> {
    let mut dest = fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = body.try_next().await? {
        dest.write_all(&chunk).await?;
        written += chunk.len() as u64;
        tracing::trace!("wrote chunk of {} bytes", chunk.len());
    }
    dest.flush().await?;
    Ok(written)
}

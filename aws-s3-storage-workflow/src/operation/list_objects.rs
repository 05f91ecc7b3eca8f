/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::mem;

use aws_sdk_s3::{
    error::SdkError,
    operation::list_objects_v2::{ListObjectsV2Error, ListObjectsV2Output},
};
use aws_smithy_runtime_api::http::Response;
use tracing::Instrument;

use crate::error::Error;
use crate::types::ObjectSummary;

/// Input for listing the contents of a bucket
#[derive(Clone, Debug)]
pub struct ListObjectsInput {
    bucket: String,
    prefix: Option<String>,
    page_size: Option<i32>,
}

impl ListObjectsInput {
    /// List every object in `bucket`
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: None,
            page_size: None,
        }
    }

    /// Only list keys starting with `prefix`
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Request at most `page_size` keys per `ListObjectsV2` call
    pub fn page_size(mut self, page_size: Option<i32>) -> Self {
        self.page_size = page_size;
        self
    }
}

#[derive(Debug, PartialEq)]
enum State {
    Paginating {
        // next continuation token to use
        next_token: Option<String>,
    },
    Done,
}

impl State {
    fn next_state(self, output: &ListObjectsV2Output) -> State {
        let is_truncated =
            output.is_truncated().unwrap_or(false) && output.next_continuation_token().is_some();

        match self {
            State::Paginating { .. } if is_truncated => State::Paginating {
                next_token: output.next_continuation_token.to_owned(),
            },
            _ => State::Done,
        }
    }
}

/// Paginator for the `ListObjectsV2` operation driven by continuation tokens.
#[derive(Debug)]
struct ListObjectsPaginator {
    client: aws_sdk_s3::Client,
    input: ListObjectsInput,
    state: State,
}

impl ListObjectsPaginator {
    fn new(client: aws_sdk_s3::Client, input: ListObjectsInput) -> Self {
        Self {
            client,
            input,
            state: State::Paginating { next_token: None },
        }
    }

    async fn next_page(
        &mut self,
    ) -> Option<Result<ListObjectsV2Output, SdkError<ListObjectsV2Error, Response>>> {
        let next_token = match &self.state {
            State::Done => return None,
            State::Paginating { next_token } => next_token.clone(),
        };

        let list_result = self
            .client
            .list_objects_v2()
            .bucket(&self.input.bucket)
            .set_prefix(self.input.prefix.clone())
            .set_max_keys(self.input.page_size)
            .set_continuation_token(next_token)
            .send()
            .instrument(tracing::debug_span!(
                "send-list-objects-v2",
                bucket = self.input.bucket.as_str()
            ))
            .await;

        match list_result {
            Ok(output) => {
                let prev_state = mem::replace(&mut self.state, State::Done);
                self.state = prev_state.next_state(&output);
                Some(Ok(output))
            }
            Err(err) => {
                self.state = State::Done;
                Some(Err(err))
            }
        }
    }
}

/// Lazy stream over every object in a bucket.
///
/// Pages are requested one at a time as the objects of the previous page are consumed.
#[derive(Debug)]
pub struct ListObjectsStream {
    paginator: ListObjectsPaginator,
    current_page: Option<std::vec::IntoIter<aws_sdk_s3::types::Object>>,
}

impl ListObjectsStream {
    /// Create a stream listing the bucket described by `input`
    pub fn new(client: aws_sdk_s3::Client, input: ListObjectsInput) -> Self {
        Self {
            paginator: ListObjectsPaginator::new(client, input),
            current_page: None,
        }
    }

    /// Returns the next object, `None` once the listing is exhausted.
    ///
    /// A failed request ends the stream after the error is returned.
    pub async fn next(&mut self) -> Option<Result<ObjectSummary, Error>> {
        loop {
            if let Some(object) = self.current_page.as_mut().and_then(Iterator::next) {
                return Some(Ok(object.into()));
            }

            match self.paginator.next_page().await? {
                Ok(mut page) => {
                    tracing::trace!("received page with {:?} keys", page.key_count());
                    self.current_page = page.contents.take().map(Vec::into_iter);
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

/// List every object in the bucket described by `input`, following continuation tokens
/// until the listing is complete.
pub async fn list_objects(
    client: &aws_sdk_s3::Client,
    input: ListObjectsInput,
) -> Result<Vec<ObjectSummary>, Error> {
    let mut stream = ListObjectsStream::new(client.clone(), input);
    let mut objects = Vec::new();
    while let Some(object) = stream.next().await {
        let object = object?;
        tracing::info!("  - {} ({} bytes)", object.key(), object.size());
        objects.push(object);
    }
    Ok(objects)
}

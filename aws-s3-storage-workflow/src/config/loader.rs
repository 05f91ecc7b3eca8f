/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_types::region::Region;

/// Load an Amazon S3 client from the environment.
///
/// Credentials and any setting not overridden here are resolved by the default
/// [`aws_config`] provider chains (environment variables, shared config/credentials
/// files, IMDS, etc).
#[derive(Default, Debug)]
pub struct ConfigLoader {
    region: Option<Region>,
    profile_name: Option<String>,
    endpoint_url: Option<String>,
}

impl ConfigLoader {
    /// Override the region requests are signed for and sent to.
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Resolve credentials and settings from a named profile of the shared config files.
    pub fn profile_name(mut self, profile_name: impl Into<String>) -> Self {
        self.profile_name = Some(profile_name.into());
        self
    }

    /// Send requests to a custom endpoint, such as an S3 compatible object store.
    ///
    /// Path style addressing is enabled when an endpoint is set.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Load the shared configuration and construct an S3 client from it
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> aws_sdk_s3::Client {
        let mut loader = aws_config::from_env();
        if let Some(region) = self.region {
            loader = loader.region(region);
        }
        if let Some(profile_name) = &self.profile_name {
            loader = loader.profile_name(profile_name);
        }
        let shared_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint_url) = self.endpoint_url {
            tracing::debug!("using custom endpoint {endpoint_url} with path style addressing");
            s3_config = s3_config.endpoint_url(endpoint_url).force_path_style(true);
        }

        aws_sdk_s3::Client::from_conf(s3_config.build())
    }
}

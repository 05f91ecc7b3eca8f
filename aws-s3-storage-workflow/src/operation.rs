/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Bucket create and delete
pub mod bucket;

/// Single object upload, download and delete
pub mod object;

/// Paginated bucket listing
pub mod list_objects;

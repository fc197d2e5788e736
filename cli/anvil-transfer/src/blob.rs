// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Azure Blob storage operations over SAS-signed URLs
//!
//! Only the three calls the transfer needs are implemented, straight against
//! the Blob service REST API:
//!
//! - `HEAD` Get Blob Properties, for existence
//! - `PUT` Copy Blob From URL with `x-ms-requires-sync`, which only returns
//!   once the copy reaches a terminal state
//! - `DELETE` Delete Blob

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::{Client, StatusCode};

use crate::error::{Result, TransferError};
use crate::types::{CopyOutcome, CopyStatus};

/// Blob service REST version sent on every request
pub const AZURE_STORAGE_API_VERSION: &str = "2021-08-06";

const HEADER_API_VERSION: &str = "x-ms-version";
const HEADER_COPY_SOURCE: &str = "x-ms-copy-source";
const HEADER_REQUIRES_SYNC: &str = "x-ms-requires-sync";
const HEADER_COPY_STATUS: &str = "x-ms-copy-status";
const HEADER_COPY_ID: &str = "x-ms-copy-id";

/// Storage operations the transfer depends on. All URLs carry their SAS
/// token in the query string.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn exists(&self, url: &str) -> Result<bool>;

    /// Server-side copy of `source_url` into `destination_url`, blocking
    /// until the service reports a terminal status.
    async fn copy_from_url(&self, destination_url: &str, source_url: &str)
    -> Result<CopyOutcome>;

    async fn delete(&self, url: &str) -> Result<()>;
}

/// Strip the query string so SAS signatures never reach logs or errors.
pub fn redact_sas(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Blob REST client
#[derive(Clone)]
pub struct AzureBlobClient {
    client: Client,
    /// Applied to HEAD and DELETE. The synchronous copy runs unbounded.
    request_timeout: Duration,
}

impl AzureBlobClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = gcp_auth::http_client_builder()
            .user_agent(concat!("anvil-transfer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[async_trait]
impl BlobStore for AzureBlobClient {
    async fn exists(&self, url: &str) -> Result<bool> {
        let response = self
            .client
            .head(url)
            .header(HEADER_API_VERSION, AZURE_STORAGE_API_VERSION)
            .timeout(self.request_timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(TransferError::Blob {
                operation: "existence check",
                url: redact_sas(url).to_string(),
                status: status.as_u16(),
                // HEAD responses have no body; the reason is in a header
                body: error_code(response.headers()),
            }),
        }
    }

    async fn copy_from_url(
        &self,
        destination_url: &str,
        source_url: &str,
    ) -> Result<CopyOutcome> {
        tracing::debug!(
            source = %redact_sas(source_url),
            destination = %redact_sas(destination_url),
            "Starting synchronous copy"
        );

        let response = self
            .client
            .put(destination_url)
            .header(HEADER_API_VERSION, AZURE_STORAGE_API_VERSION)
            .header(HEADER_COPY_SOURCE, source_url)
            .header(HEADER_REQUIRES_SYNC, "true")
            .header(CONTENT_LENGTH, 0)
            .send()
            .await?;

        let http_status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        let copy_status = header_str(&headers, HEADER_COPY_STATUS)
            .and_then(|v| CopyStatus::from_str(v).ok());
        let copy_id = header_str(&headers, HEADER_COPY_ID).map(str::to_string);

        Ok(CopyOutcome {
            http_status,
            copy_status,
            copy_id,
            body,
        })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .delete(url)
            .header(HEADER_API_VERSION, AZURE_STORAGE_API_VERSION)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            return Err(TransferError::Blob {
                operation: "delete",
                url: redact_sas(url).to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn error_code(headers: &HeaderMap) -> String {
    header_str(headers, "x-ms-error-code")
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_sas() {
        assert_eq!(
            redact_sas("https://acct.blob.core.windows.net/c/a.bam?sv=2021&sig=secret"),
            "https://acct.blob.core.windows.net/c/a.bam"
        );
        assert_eq!(redact_sas("https://a/b"), "https://a/b");
    }

    #[test]
    fn test_error_code_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(error_code(&headers), "");
        headers.insert(
            "x-ms-error-code",
            reqwest::header::HeaderValue::from_static("AuthorizationFailure"),
        );
        assert_eq!(error_code(&headers), "AuthorizationFailure");
    }
}

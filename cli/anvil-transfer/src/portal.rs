// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Portal (metadata catalog) client
//!
//! The portal is the source of truth for which files need moving. Its
//! `upload_status` field doubles as the idempotency marker between runs:
//! once a file is `deposited` it no longer carries the audit that puts it
//! in the search results.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, TransferError};
use crate::types::{FileRecord, IndexerInfo, SearchResponse, UploadStatusPatch};

/// Search for files flagged with the "incorrect anvil workspace" audit,
/// returning only the fields the transfer needs.
pub const MISPLACED_FILES_SEARCH_PATH: &str = "/search/?type=File&audit.INTERNAL_ACTION.category=incorrect+anvil+workspace&field=@id&field=anvil_source_url&field=anvil_destination_url&field=upload_status&limit=all";

pub const INDEXER_INFO_PATH: &str = "/indexer-info";

/// Portal access key pair
#[derive(Clone)]
pub struct PortalAuth {
    key: String,
    secret: SecretString,
}

impl PortalAuth {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}

impl fmt::Debug for PortalAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalAuth")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Catalog operations the transfer depends on.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Whether the portal is currently reindexing
    async fn is_indexing(&self) -> Result<bool>;

    /// Files flagged as living in the wrong workspace, in portal order
    async fn query_misplaced_files(&self) -> Result<Vec<FileRecord>>;

    /// Set `upload_status` to `deposited` on `file_id`
    async fn mark_deposited(&self, file_id: &str) -> Result<()>;
}

/// HTTP client for the portal REST API
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    auth: PortalAuth,
}

impl PortalClient {
    /// Create a new portal client
    pub fn new(base_url: impl Into<String>, auth: PortalAuth, timeout_secs: u64) -> Result<Self> {
        let client = gcp_auth::http_client_builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("anvil-transfer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Catalog for PortalClient {
    async fn is_indexing(&self) -> Result<bool> {
        let response = self.client.get(self.url(INDEXER_INFO_PATH)).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransferError::Portal {
                operation: "indexer-info",
                status: status.as_u16(),
                body,
            });
        }

        let info: IndexerInfo =
            serde_json::from_str(&body).map_err(|e| TransferError::PortalResponse {
                operation: "indexer-info",
                reason: e.to_string(),
            })?;

        tracing::debug!(is_indexing = info.is_indexing, "Checked portal indexer");
        Ok(info.is_indexing)
    }

    async fn query_misplaced_files(&self) -> Result<Vec<FileRecord>> {
        let response = self
            .client
            .get(self.url(MISPLACED_FILES_SEARCH_PATH))
            .basic_auth(&self.auth.key, Some(self.auth.secret.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The portal answers an empty search with 404 and an empty @graph.
        // Any 404 without a @graph is a real error.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(TransferError::Portal {
                operation: "search",
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if status == StatusCode::NOT_FOUND => {
                return Err(TransferError::Portal {
                    operation: "search",
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => {
                return Err(TransferError::PortalResponse {
                    operation: "search",
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(count = parsed.graph.len(), "Got files to transfer");
        Ok(parsed.graph)
    }

    async fn mark_deposited(&self, file_id: &str) -> Result<()> {
        let response = self
            .client
            .patch(self.url(file_id))
            .basic_auth(&self.auth.key, Some(self.auth.secret.expose_secret()))
            .json(&UploadStatusPatch::deposited())
            .send()
            .await
            .map_err(|e| TransferError::FileStep {
                file_id: file_id.to_string(),
                step: "Patching upload_status",
                source: Box::new(e.into()),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(TransferError::PatchFailed {
                file_id: file_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(file_id = %file_id, "Marked file deposited");
        Ok(())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Wire and bookkeeping types shared by the transfer components.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Portal file identifier, e.g. `/files/IGVFFI0000ABCD/`
pub type FileId = String;

// ============================================================================
// Portal Types
// ============================================================================

/// One portal file record selected for transfer.
///
/// Only the four fields requested from the search endpoint are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "@id")]
    pub id: FileId,
    pub anvil_source_url: String,
    pub anvil_destination_url: String,
    pub upload_status: UploadStatus,
}

/// Portal `upload_status` values.
///
/// Unknown values are kept verbatim in `Other` so a vocabulary change on
/// the portal side does not break parsing of the search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UploadStatus {
    Pending,
    FileNotFound,
    Invalidated,
    Validated,
    ValidationExempted,
    Deposited,
    Other(String),
}

impl UploadStatus {
    pub fn as_str(&self) -> &str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::FileNotFound => "file not found",
            UploadStatus::Invalidated => "invalidated",
            UploadStatus::Validated => "validated",
            UploadStatus::ValidationExempted => "validation exempted",
            UploadStatus::Deposited => "deposited",
            UploadStatus::Other(s) => s,
        }
    }
}

impl From<String> for UploadStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => UploadStatus::Pending,
            "file not found" => UploadStatus::FileNotFound,
            "invalidated" => UploadStatus::Invalidated,
            "validated" => UploadStatus::Validated,
            "validation exempted" => UploadStatus::ValidationExempted,
            "deposited" => UploadStatus::Deposited,
            _ => UploadStatus::Other(s),
        }
    }
}

impl From<UploadStatus> for String {
    fn from(status: UploadStatus) -> Self {
        match status {
            UploadStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a portal search response. Only `@graph` is read, and it must be
/// present: portal error bodies are JSON too but carry no `@graph`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "@graph")]
    pub graph: Vec<FileRecord>,
}

/// Body of the portal `/indexer-info` endpoint.
#[derive(Debug, Deserialize)]
pub struct IndexerInfo {
    pub is_indexing: bool,
}

/// Body sent to the portal to mark a file as relocated.
#[derive(Debug, Serialize)]
pub struct UploadStatusPatch {
    pub upload_status: UploadStatus,
}

impl UploadStatusPatch {
    pub fn deposited() -> Self {
        Self {
            upload_status: UploadStatus::Deposited,
        }
    }
}

// ============================================================================
// Terra Types
// ============================================================================

/// Body of the Terra `getSasToken` endpoint.
///
/// Depending on the workspace manager version the token is returned on its
/// own, inside `url` after the `?`, or both.
#[derive(Debug, Deserialize)]
pub struct SasTokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ============================================================================
// Blob Types
// ============================================================================

/// Values of the `x-ms-copy-status` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CopyStatus {
    Success,
    Pending,
    Aborted,
    Failed,
}

/// What the storage service reported for a synchronous copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    /// HTTP status of the copy request
    pub http_status: u16,
    /// Parsed `x-ms-copy-status`, `None` if absent or unrecognized
    pub copy_status: Option<CopyStatus>,
    pub copy_id: Option<String>,
    /// Response body, usually empty on success and an XML error otherwise
    pub body: String,
}

impl CopyOutcome {
    pub fn is_success(&self) -> bool {
        self.copy_status == Some(CopyStatus::Success)
    }
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self
            .copy_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        write!(
            f,
            "http_status={} copy_status={} copy_id={}",
            self.http_status,
            status,
            self.copy_id.as_deref().unwrap_or("-")
        )?;
        if !self.body.is_empty() {
            write!(f, " body={}", self.body)?;
        }
        Ok(())
    }
}

// ============================================================================
// Run Bookkeeping
// ============================================================================

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Source object not present yet; nothing was done
    SourceMissing,
    /// Copied and marked deposited; `deleted` if the source was removed
    Transferred { deleted: bool },
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub candidates: usize,
    pub skipped: usize,
    pub transferred: usize,
    pub deleted: usize,
}

impl TransferSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::SourceMissing => self.skipped += 1,
            FileOutcome::Transferred { deleted } => {
                self.transferred += 1;
                if deleted {
                    self.deleted += 1;
                }
            }
        }
    }
}

/// Result of a whole invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The portal was reindexing; nothing was attempted
    PortalIndexing,
    Completed(TransferSummary),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for anvil-transfer
//!
//! Every variant is fatal to the run. The only non-error early exits are
//! the portal indexing gate and a missing source object, neither of which
//! is represented here.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{CopyOutcome, FileId};

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] gcp_auth::AuthError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "Failed to get SAS token for workspace {workspace_id} resource {resource_id}: {reason}"
    )]
    SasToken {
        workspace_id: String,
        resource_id: String,
        reason: String,
    },

    #[error("Portal {operation} failed with status {status}: {body}")]
    Portal {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected portal {operation} response: {reason}")]
    PortalResponse {
        operation: &'static str,
        reason: String,
    },

    #[error("Error patching upload_status: deposited on file {file_id} (status {status}): {body}")]
    PatchFailed {
        file_id: FileId,
        status: u16,
        body: String,
    },

    #[error("Copying file {file_id} failed: {outcome}")]
    CopyFailed {
        file_id: FileId,
        outcome: CopyOutcome,
    },

    #[error("Blob {operation} on {url} failed with status {status}: {body}")]
    Blob {
        operation: &'static str,
        /// SAS-redacted URL
        url: String,
        status: u16,
        body: String,
    },

    #[error("{step} failed for file {file_id}")]
    FileStep {
        file_id: FileId,
        step: &'static str,
        #[source]
        source: Box<TransferError>,
    },

    #[error("{which} SAS token expired at {expired_at}; rerun to continue with fresh tokens")]
    TokenExpired {
        which: &'static str,
        expired_at: DateTime<Utc>,
    },
}

impl TransferError {
    /// Portal file the error is about, if any
    pub fn file_id(&self) -> Option<&str> {
        match self {
            TransferError::PatchFailed { file_id, .. }
            | TransferError::CopyFailed { file_id, .. }
            | TransferError::FileStep { file_id, .. } => Some(file_id),
            _ => None,
        }
    }
}

pub type Result<T, E = TransferError> = std::result::Result<T, E>;

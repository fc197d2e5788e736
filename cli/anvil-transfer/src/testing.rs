// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! In-memory catalog and blob store for sequencing tests.
//!
//! Both mocks append to a call log so tests can assert on ordering across
//! the two services.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::blob::BlobStore;
use crate::config::{Environment, TransferConfig};
use crate::context::RunContext;
use crate::error::{Result, TransferError};
use crate::portal::{Catalog, PortalAuth};
use crate::terra::{SasToken, SasTokens};
use crate::types::{CopyOutcome, CopyStatus, FileRecord, UploadStatus};

pub(crate) type CallLog = Arc<Mutex<Vec<Call>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    IsIndexing,
    Query,
    Patch(String),
    Exists(String),
    Copy { destination: String, source: String },
    Delete(String),
}

impl Call {
    fn is_blob(&self) -> bool {
        matches!(self, Call::Exists(_) | Call::Copy { .. } | Call::Delete(_))
    }
}

pub(crate) fn file(id: &str, name: &str) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        anvil_source_url: format!("https://src/{}", name),
        anvil_destination_url: format!("https://dst/{}", name),
        upload_status: UploadStatus::Pending,
    }
}

pub(crate) fn run_context(delete_source_files: bool) -> RunContext {
    run_context_expiring(delete_source_files, Utc::now() + Duration::hours(8))
}

pub(crate) fn run_context_expiring(
    delete_source_files: bool,
    expires_at: DateTime<Utc>,
) -> RunContext {
    RunContext::new(
        TransferConfig::new(Environment::Sandbox).with_delete_source_files(delete_source_files),
        PortalAuth::new("key", "secret"),
        SasTokens {
            source: SasToken::new("src-sas", expires_at),
            destination: SasToken::new("dst-sas", expires_at),
        },
    )
}

pub(crate) struct MockCatalog {
    files: Vec<FileRecord>,
    indexing: bool,
    failing_patch: Option<String>,
    log: CallLog,
}

impl MockCatalog {
    pub(crate) fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            indexing: false,
            failing_patch: None,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn indexing(mut self) -> Self {
        self.indexing = true;
        self
    }

    pub(crate) fn failing_patch_for(mut self, file_id: &str) -> Self {
        self.failing_patch = Some(file_id.to_string());
        self
    }

    pub(crate) fn files(&self) -> Vec<FileRecord> {
        self.files.clone()
    }

    pub(crate) fn log(&self) -> CallLog {
        Arc::clone(&self.log)
    }

    pub(crate) fn log_entries(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    /// File ids successfully patched, in order
    pub(crate) fn patched(&self) -> Vec<String> {
        self.log_entries()
            .into_iter()
            .filter_map(|c| match c {
                Call::Patch(id) if Some(&id) != self.failing_patch.as_ref() => Some(id),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn is_indexing(&self) -> Result<bool> {
        self.push(Call::IsIndexing);
        Ok(self.indexing)
    }

    async fn query_misplaced_files(&self) -> Result<Vec<FileRecord>> {
        self.push(Call::Query);
        Ok(self.files.clone())
    }

    async fn mark_deposited(&self, file_id: &str) -> Result<()> {
        self.push(Call::Patch(file_id.to_string()));
        if self.failing_patch.as_deref() == Some(file_id) {
            return Err(TransferError::PatchFailed {
                file_id: file_id.to_string(),
                status: 422,
                body: "{\"status\":\"error\"}".to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) struct MockBlobStore {
    missing: HashSet<String>,
    copy_status: CopyStatus,
    fail_delete: bool,
    log: CallLog,
}

impl MockBlobStore {
    pub(crate) fn new() -> Self {
        Self {
            missing: HashSet::new(),
            copy_status: CopyStatus::Success,
            fail_delete: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record into another mock's log to observe cross-service ordering
    pub(crate) fn with_shared_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub(crate) fn with_missing(mut self, signed_url: &str) -> Self {
        self.missing.insert(signed_url.to_string());
        self
    }

    pub(crate) fn with_copy_status(mut self, status: CopyStatus) -> Self {
        self.copy_status = status;
        self
    }

    pub(crate) fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Blob calls only, in order
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_blob())
            .cloned()
            .collect()
    }

    fn push(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn exists(&self, url: &str) -> Result<bool> {
        self.push(Call::Exists(url.to_string()));
        Ok(!self.missing.contains(url))
    }

    async fn copy_from_url(
        &self,
        destination_url: &str,
        source_url: &str,
    ) -> Result<CopyOutcome> {
        self.push(Call::Copy {
            destination: destination_url.to_string(),
            source: source_url.to_string(),
        });
        Ok(CopyOutcome {
            http_status: 202,
            copy_status: Some(self.copy_status),
            copy_id: Some("copy-1".to_string()),
            body: String::new(),
        })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.push(Call::Delete(url.to_string()));
        if self.fail_delete {
            return Err(TransferError::Blob {
                operation: "delete",
                url: url.to_string(),
                status: 403,
                body: "AuthorizationPermissionMismatch".to_string(),
            });
        }
        Ok(())
    }
}

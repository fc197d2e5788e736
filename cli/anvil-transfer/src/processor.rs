// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Transfer pipeline
//!
//! Moves each candidate file in four steps: existence check, synchronous
//! copy, mark deposited, optional source delete. Files are handled one at
//! a time in the order the portal returned them. A missing source skips
//! the file; every other failure ends the run.

use chrono::Utc;

use crate::blob::{BlobStore, redact_sas};
use crate::context::RunContext;
use crate::error::{Result, TransferError};
use crate::portal::Catalog;
use crate::types::{FileOutcome, FileRecord, TransferSummary};

/// Runs the per-file sequence against a catalog and a blob store
pub struct TransferProcessor<'a> {
    ctx: &'a RunContext,
    catalog: &'a dyn Catalog,
    blobs: &'a dyn BlobStore,
}

impl<'a> TransferProcessor<'a> {
    pub fn new(ctx: &'a RunContext, catalog: &'a dyn Catalog, blobs: &'a dyn BlobStore) -> Self {
        Self {
            ctx,
            catalog,
            blobs,
        }
    }

    /// Process every file, stopping at the first fatal error
    pub async fn process_files(&self, files: &[FileRecord]) -> Result<TransferSummary> {
        let mut summary = TransferSummary {
            candidates: files.len(),
            ..Default::default()
        };

        for file in files {
            self.ctx.ensure_tokens_valid(Utc::now())?;
            let outcome = self.process_file(file).await?;
            summary.record(outcome);
        }

        tracing::info!(
            candidates = summary.candidates,
            skipped = summary.skipped,
            transferred = summary.transferred,
            deleted = summary.deleted,
            "Transfer complete"
        );

        Ok(summary)
    }

    /// Process a single file
    pub async fn process_file(&self, file: &FileRecord) -> Result<FileOutcome> {
        let source_url = self.ctx.signed_source_url(file);

        let exists = self
            .blobs
            .exists(&source_url)
            .await
            .map_err(|e| step_error(file, "Checking source existence", e))?;

        if !exists {
            tracing::warn!(
                file_id = %file.id,
                source = %file.anvil_source_url,
                "Source URL does not exist. Has it been submitted yet? Skipping"
            );
            return Ok(FileOutcome::SourceMissing);
        }

        self.copy_to_destination(file, &source_url).await?;
        self.catalog.mark_deposited(&file.id).await?;
        let deleted = self.maybe_delete_source(file, &source_url).await?;

        Ok(FileOutcome::Transferred { deleted })
    }

    async fn copy_to_destination(&self, file: &FileRecord, source_url: &str) -> Result<()> {
        tracing::info!(
            file_id = %file.id,
            source = %file.anvil_source_url,
            destination = %file.anvil_destination_url,
            "Copying file"
        );

        let destination_url = self.ctx.signed_destination_url(file);
        let outcome = self
            .blobs
            .copy_from_url(&destination_url, source_url)
            .await
            .map_err(|e| step_error(file, "Copying", e))?;

        if !outcome.is_success() {
            return Err(TransferError::CopyFailed {
                file_id: file.id.clone(),
                outcome,
            });
        }

        tracing::debug!(
            file_id = %file.id,
            copy_id = outcome.copy_id.as_deref().unwrap_or("-"),
            "Copy succeeded"
        );
        Ok(())
    }

    /// Returns whether the source was deleted
    async fn maybe_delete_source(&self, file: &FileRecord, source_url: &str) -> Result<bool> {
        if !self.ctx.delete_source_files() {
            tracing::info!(file_id = %file.id, "Not deleting source file");
            return Ok(false);
        }

        tracing::info!(
            file_id = %file.id,
            source = %redact_sas(source_url),
            "Deleting source file"
        );
        self.blobs
            .delete(source_url)
            .await
            .map_err(|e| step_error(file, "Deleting source", e))?;

        Ok(true)
    }
}

fn step_error(file: &FileRecord, step: &'static str, source: TransferError) -> TransferError {
    TransferError::FileStep {
        file_id: file.id.clone(),
        step,
        source: Box::new(source),
    }
}

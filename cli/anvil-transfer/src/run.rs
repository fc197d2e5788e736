// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Run setup and top-level sequencing

use std::time::Duration;

use gcp_auth::{AuthorizedSession, DEFAULT_SCOPES, ServiceAccountKey};

use crate::blob::BlobStore;
use crate::config::TransferConfig;
use crate::context::RunContext;
use crate::error::Result;
use crate::portal::{Catalog, PortalAuth};
use crate::processor::TransferProcessor;
use crate::terra;
use crate::types::RunOutcome;

/// Authorize the service account and mint both SAS tokens.
pub async fn setup(
    config: TransferConfig,
    key: &ServiceAccountKey,
    portal_auth: PortalAuth,
) -> Result<RunContext> {
    let client = gcp_auth::http_client_builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;
    let session = AuthorizedSession::authorize_with_client(client, key, DEFAULT_SCOPES).await?;

    let tokens = terra::init_sas_tokens(&session, &config).await?;

    Ok(RunContext::new(config, portal_auth, tokens))
}

/// Transfer every misplaced file unless the portal is reindexing.
pub async fn run_transfer(
    ctx: &RunContext,
    catalog: &dyn Catalog,
    blobs: &dyn BlobStore,
) -> Result<RunOutcome> {
    if catalog.is_indexing().await? {
        tracing::info!("Portal is indexing, will try again later");
        return Ok(RunOutcome::PortalIndexing);
    }
    tracing::info!("Portal not indexing");

    let files = catalog.query_misplaced_files().await?;
    let summary = TransferProcessor::new(ctx, catalog, blobs)
        .process_files(&files)
        .await?;

    Ok(RunOutcome::Completed(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockBlobStore, MockCatalog, file, run_context};
    use crate::types::TransferSummary;

    #[tokio::test]
    async fn test_indexing_portal_gets_no_further_calls() {
        let ctx = run_context(true);
        let catalog = MockCatalog::new(vec![file("/files/A/", "a.bam")]).indexing();
        let blobs = MockBlobStore::new().with_shared_log(catalog.log());

        let outcome = run_transfer(&ctx, &catalog, &blobs).await.unwrap();

        assert_eq!(outcome, RunOutcome::PortalIndexing);
        assert_eq!(catalog.log_entries(), vec![Call::IsIndexing]);
    }

    #[tokio::test]
    async fn test_idle_portal_runs_pipeline_once() {
        let ctx = run_context(false);
        let catalog = MockCatalog::new(vec![
            file("/files/A/", "a.bam"),
            file("/files/B/", "b.bam"),
        ]);
        let blobs = MockBlobStore::new().with_shared_log(catalog.log());

        let outcome = run_transfer(&ctx, &catalog, &blobs).await.unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Completed(TransferSummary {
                candidates: 2,
                skipped: 0,
                transferred: 2,
                deleted: 0,
            })
        );
        let log = catalog.log_entries();
        assert_eq!(&log[..2], &[Call::IsIndexing, Call::Query]);
        assert_eq!(log.iter().filter(|c| **c == Call::Query).count(), 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_completes() {
        let ctx = run_context(true);
        let catalog = MockCatalog::new(Vec::new());
        let blobs = MockBlobStore::new();

        let outcome = run_transfer(&ctx, &catalog, &blobs).await.unwrap();

        assert_eq!(outcome, RunOutcome::Completed(TransferSummary::default()));
        assert!(blobs.calls().is_empty());
    }
}

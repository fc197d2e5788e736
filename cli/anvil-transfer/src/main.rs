// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! AnVIL transfer job
//!
//! One-shot batch job that relocates files the portal flags as being in the
//! wrong AnVIL workspace. Meant to be run on a schedule; each run picks up
//! whatever is still flagged.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use anvil_transfer::blob::AzureBlobClient;
use anvil_transfer::config::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SAS_EXPIRATION_SECS, Environment, TransferConfig,
};
use anvil_transfer::portal::{PortalAuth, PortalClient};
use anvil_transfer::types::RunOutcome;
use gcp_auth::ServiceAccountKey;

#[derive(Parser)]
#[command(name = "anvil-transfer")]
#[command(about = "Move misplaced portal files between AnVIL workspaces", long_about = None)]
#[command(version)]
struct Cli {
    /// Environment to run against
    #[arg(long, value_enum, env = "ANVIL_TRANSFER_ENV")]
    env: Environment,

    /// Google service account credentials linked to the Terra workspace, base64 encoded
    #[arg(
        long,
        env = "GOOGLE_SERVICE_ACCOUNT_CREDENTIALS_BASE64",
        hide_env_values = true
    )]
    google_service_account_credentials_base64: String,

    /// Portal access key of the transfer service account user
    #[arg(long, env = "PORTAL_KEY")]
    portal_key: String,

    /// Portal secret key of the transfer service account user
    #[arg(long, env = "PORTAL_SECRET_KEY", hide_env_values = true)]
    portal_secret_key: String,

    /// Delete source files after copying
    #[arg(long)]
    delete_source_files: bool,

    /// Override the Terra workspace manager URL
    #[arg(long, env = "TERRA_API_URL")]
    terra_api_url: Option<String>,

    /// Override the portal API URL for the chosen environment
    #[arg(long, env = "PORTAL_API_URL")]
    portal_api_url: Option<String>,

    /// Lifetime of the SAS tokens requested from Terra, in seconds
    #[arg(long, default_value_t = DEFAULT_SAS_EXPIRATION_SECS)]
    sas_expiration_secs: u64,

    /// Timeout for portal, Terra and blob metadata requests, in seconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    http_timeout_secs: u64,
}

impl Cli {
    fn transfer_config(&self) -> TransferConfig {
        let mut config = TransferConfig::new(self.env)
            .with_delete_source_files(self.delete_source_files)
            .with_sas_expiration_secs(self.sas_expiration_secs)
            .with_http_timeout_secs(self.http_timeout_secs);
        if let Some(url) = &self.terra_api_url {
            config = config.with_terra_api_url(url.as_str());
        }
        if let Some(url) = &self.portal_api_url {
            config = config.with_portal_api_url(url.as_str());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "anvil_transfer=info,gcp_auth=info".to_string()),
        ))
        .init();

    let config = cli.transfer_config();
    info!(
        env = %config.environment,
        portal = %config.portal_api_url,
        delete_source_files = config.delete_source_files,
        "Starting transfer"
    );

    let key = ServiceAccountKey::from_base64(&cli.google_service_account_credentials_base64)
        .context("Failed to load Google service account credentials")?;
    let portal_auth = PortalAuth::new(cli.portal_key.as_str(), cli.portal_secret_key.as_str());

    let ctx = anvil_transfer::setup(config, &key, portal_auth)
        .await
        .context("Failed to set up transfer")?;

    let portal = PortalClient::new(
        ctx.config().portal_api_url.as_str(),
        ctx.portal_auth().clone(),
        ctx.config().http_timeout_secs,
    )
    .context("Failed to create portal client")?;
    let blobs = AzureBlobClient::new(ctx.config().http_timeout_secs)
        .context("Failed to create blob client")?;

    match anvil_transfer::run_transfer(&ctx, &portal, &blobs)
        .await
        .context("Transfer aborted")?
    {
        RunOutcome::PortalIndexing => info!("Nothing done; portal is indexing"),
        RunOutcome::Completed(summary) => info!(
            candidates = summary.candidates,
            skipped = summary.skipped,
            transferred = summary.transferred,
            deleted = summary.deleted,
            "Run finished"
        ),
    }

    Ok(())
}

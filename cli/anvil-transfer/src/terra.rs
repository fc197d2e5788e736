// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Terra workspace manager client
//!
//! Mints container-scoped SAS tokens for the Azure storage containers
//! backing the source and destination workspaces.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use gcp_auth::AuthorizedSession;
use secrecy::{ExposeSecret, SecretString};

use crate::config::TransferConfig;
use crate::error::{Result, TransferError};
use crate::types::SasTokenResponse;

/// A container SAS token and the moment it stops working.
#[derive(Clone)]
pub struct SasToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl SasToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `{blob_url}?{token}`
    pub fn sign(&self, blob_url: &str) -> String {
        format!("{}?{}", blob_url, self.token.expose_secret())
    }
}

impl fmt::Debug for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SasToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The token pair a run needs.
#[derive(Clone, Debug)]
pub struct SasTokens {
    pub source: SasToken,
    pub destination: SasToken,
}

pub fn sas_token_url(
    terra_api_url: &str,
    workspace_id: &str,
    resource_id: &str,
    expiration_secs: u64,
) -> String {
    format!(
        "{}/api/workspaces/v1/{}/resources/controlled/azure/storageContainer/{}/getSasToken?sasExpirationDuration={}",
        terra_api_url, workspace_id, resource_id, expiration_secs
    )
}

/// Ask Terra for a SAS token on one storage container.
pub async fn get_sas_token(
    session: &AuthorizedSession,
    terra_api_url: &str,
    workspace_id: &str,
    resource_id: &str,
    expiration_secs: u64,
) -> Result<SasToken> {
    let fail = |reason: String| TransferError::SasToken {
        workspace_id: workspace_id.to_string(),
        resource_id: resource_id.to_string(),
        reason,
    };

    let url = sas_token_url(terra_api_url, workspace_id, resource_id, expiration_secs);
    let requested_at = Utc::now();

    tracing::debug!(
        workspace_id = %workspace_id,
        resource_id = %resource_id,
        expiration_secs,
        "Requesting SAS token"
    );

    let response = session.post(&url).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(fail(format!("status {}: {}", status.as_u16(), body)));
    }

    let parsed: SasTokenResponse = serde_json::from_str(&body)
        .map_err(|e| fail(format!("malformed response body: {}", e)))?;
    let token = token_from_response(parsed)
        .ok_or_else(|| fail("response carried neither 'token' nor a signed 'url'".to_string()))?;

    let lifetime = i64::try_from(expiration_secs).unwrap_or(i64::MAX);
    let expires_at = Duration::try_seconds(lifetime)
        .and_then(|d| requested_at.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    Ok(SasToken::new(token, expires_at))
}

/// Prefer the bare `token`; fall back to the query part of `url`.
fn token_from_response(response: SasTokenResponse) -> Option<String> {
    if let Some(token) = response.token.filter(|t| !t.is_empty()) {
        return Some(token);
    }
    response
        .url
        .as_deref()
        .and_then(|url| url.split_once('?'))
        .map(|(_, query)| query.to_string())
        .filter(|query| !query.is_empty())
}

/// Mint the source token, then the destination token.
pub async fn init_sas_tokens(
    session: &AuthorizedSession,
    config: &TransferConfig,
) -> Result<SasTokens> {
    let workspaces = config.workspaces();

    let source = get_sas_token(
        session,
        &config.terra_api_url,
        workspaces.source_workspace_id,
        workspaces.source_storage_resource_id,
        config.sas_expiration_secs,
    )
    .await?;

    let destination = get_sas_token(
        session,
        &config.terra_api_url,
        workspaces.destination_workspace_id,
        workspaces.destination_storage_resource_id,
        config.sas_expiration_secs,
    )
    .await?;

    tracing::info!(
        source_expires_at = %source.expires_at(),
        destination_expires_at = %destination.expires_at(),
        "Obtained SAS tokens"
    );

    Ok(SasTokens {
        source,
        destination,
    })
}

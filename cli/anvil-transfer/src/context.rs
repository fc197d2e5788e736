// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Run context for a transfer
//!
//! Built once during setup and then only read. Components look SAS tokens
//! up here rather than carrying them on file records.

use chrono::{DateTime, Utc};

use crate::config::TransferConfig;
use crate::error::{Result, TransferError};
use crate::portal::PortalAuth;
use crate::terra::{SasToken, SasTokens};
use crate::types::FileRecord;

/// Everything a run needs after credentials have been exchanged
#[derive(Clone, Debug)]
pub struct RunContext {
    config: TransferConfig,
    portal_auth: PortalAuth,
    tokens: SasTokens,
}

impl RunContext {
    pub fn new(config: TransferConfig, portal_auth: PortalAuth, tokens: SasTokens) -> Self {
        Self {
            config,
            portal_auth,
            tokens,
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn portal_auth(&self) -> &PortalAuth {
        &self.portal_auth
    }

    pub fn delete_source_files(&self) -> bool {
        self.config.delete_source_files
    }

    pub fn source_token(&self) -> &SasToken {
        &self.tokens.source
    }

    pub fn destination_token(&self) -> &SasToken {
        &self.tokens.destination
    }

    /// Source blob URL with the source SAS token appended
    pub fn signed_source_url(&self, file: &FileRecord) -> String {
        self.tokens.source.sign(&file.anvil_source_url)
    }

    /// Destination blob URL with the destination SAS token appended
    pub fn signed_destination_url(&self, file: &FileRecord) -> String {
        self.tokens.destination.sign(&file.anvil_destination_url)
    }

    /// Fail if either token has lapsed. Tokens are never refreshed in-run.
    pub fn ensure_tokens_valid(&self, now: DateTime<Utc>) -> Result<()> {
        for (which, token) in [
            ("source", &self.tokens.source),
            ("destination", &self.tokens.destination),
        ] {
            if token.is_expired(now) {
                return Err(TransferError::TokenExpired {
                    which,
                    expired_at: token.expires_at(),
                });
            }
        }
        Ok(())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Service account key loading
//!
//! Keys arrive as the JSON document Google hands out when a key is created
//! for a service account, usually base64-encoded so it survives being
//! passed through a CLI flag or environment variable.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;

use crate::error::AuthError;

/// Token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Raw key file fields we care about. Everything else is ignored.
#[derive(Deserialize)]
struct KeyFile {
    #[serde(rename = "type")]
    key_type: String,
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// A parsed and validated service account key.
///
/// The PEM private key is converted to a signing key up front, so a key
/// that parses here is one that can sign assertions.
#[derive(Clone)]
pub struct ServiceAccountKey {
    client_email: String,
    private_key_id: Option<String>,
    token_uri: String,
    encoding_key: EncodingKey,
}

impl ServiceAccountKey {
    /// Decode a base64-encoded key file and parse it.
    pub fn from_base64(encoded: &str) -> Result<Self, AuthError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::CredentialEncoding(format!("base64: {}", e)))?;
        let json = String::from_utf8(bytes)
            .map_err(|e| AuthError::CredentialEncoding(format!("utf-8: {}", e)))?;
        Self::from_json(&json)
    }

    /// Parse a key file from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let file: KeyFile = serde_json::from_str(json)
            .map_err(|e| AuthError::InvalidKey(format!("malformed key JSON: {}", e)))?;

        if file.key_type != SERVICE_ACCOUNT_TYPE {
            return Err(AuthError::InvalidKey(format!(
                "expected key type '{}', got '{}'",
                SERVICE_ACCOUNT_TYPE, file.key_type
            )));
        }
        if file.client_email.is_empty() {
            return Err(AuthError::InvalidKey("client_email is empty".to_string()));
        }

        let encoding_key = EncodingKey::from_rsa_pem(file.private_key.as_bytes())
            .map_err(|e| AuthError::InvalidKey(format!("private_key: {}", e)))?;

        Ok(Self {
            client_email: file.client_email,
            private_key_id: file.private_key_id,
            token_uri: file
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            encoding_key,
        })
    }

    /// The service account identity (`iss` of the assertion)
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn private_key_id(&self) -> Option<&str> {
        self.private_key_id.as_deref()
    }

    /// OAuth token endpoint the assertion is exchanged at
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

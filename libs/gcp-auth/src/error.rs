// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for gcp-auth

use thiserror::Error;

/// Errors that can occur while loading credentials or authorizing a session
#[derive(Error, Debug)]
pub enum AuthError {
    /// The credential payload could not be decoded (base64 or UTF-8)
    #[error("Invalid credential encoding: {0}")]
    CredentialEncoding(String),

    /// The decoded payload is not a usable service account key
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    /// Error while signing the JWT assertion
    #[error("Signing error: {0}")]
    SigningError(#[from] jsonwebtoken::errors::Error),

    /// Transport-level failure talking to the token endpoint
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint refused the assertion
    #[error("Token request rejected with status {status}: {body}")]
    TokenRejected { status: u16, body: String },
}

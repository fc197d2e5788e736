// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Google Service Account Authentication Library
//!
//! Turns a service account key into an [`AuthorizedSession`] that can call
//! APIs accepting Google identity tokens, such as the Terra workspace
//! manager.
//!
//! # Authentication Flow
//!
//! 1. Parse the key with [`ServiceAccountKey::from_base64`] (or `from_json`)
//! 2. Sign an RS256 assertion with the key's private key:
//!    `iss` is the client email, `aud` the token URI, `scope` the
//!    space-separated scopes
//! 3. Exchange the assertion at the token URI using the
//!    `urn:ietf:params:oauth:grant-type:jwt-bearer` grant
//! 4. Attach the returned access token as a bearer token to later requests
//!
//! # Example
//!
//! ```ignore
//! use gcp_auth::{AuthorizedSession, ServiceAccountKey, DEFAULT_SCOPES};
//!
//! let key = ServiceAccountKey::from_base64(&encoded)?;
//! let session = AuthorizedSession::authorize(&key, DEFAULT_SCOPES).await?;
//! let response = session.post(&url).send().await?;
//! ```

pub mod error;
pub mod key;
pub mod session;

pub use error::AuthError;
pub use key::{DEFAULT_TOKEN_URI, ServiceAccountKey};
pub use session::AuthorizedSession;

/// Identity scopes requested for Terra workspace API access.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// A reqwest client builder with the workspace's rustls crypto provider
/// installed.
///
/// reqwest is built with `rustls-no-provider`, so the `ring` provider must
/// be installed process-wide before the first client is built. Installing
/// twice is harmless.
pub fn http_client_builder() -> reqwest::ClientBuilder {
    let _ = rustls::crypto::ring::default_provider().install_default();
    reqwest::Client::builder()
}

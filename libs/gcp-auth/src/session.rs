// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OAuth2 JWT-bearer exchange and the resulting authorized session

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, Header};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::key::ServiceAccountKey;

/// Grant type for exchanging a signed assertion (RFC 7523).
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the assertion. Google caps this at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the self-signed assertion sent to the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// An HTTP client bound to a service account identity.
///
/// Every request built through [`AuthorizedSession::post`] carries the
/// bearer token obtained at authorization time. The token is not refreshed.
#[derive(Clone)]
pub struct AuthorizedSession {
    client: Client,
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl AuthorizedSession {
    /// Exchange a signed assertion for an access token using a fresh client.
    pub async fn authorize(key: &ServiceAccountKey, scopes: &[&str]) -> Result<Self, AuthError> {
        let client = crate::http_client_builder().build()?;
        Self::authorize_with_client(client, key, scopes).await
    }

    /// Exchange a signed assertion for an access token using `client`.
    ///
    /// The same client is reused for every request made through the
    /// returned session.
    pub async fn authorize_with_client(
        client: Client,
        key: &ServiceAccountKey,
        scopes: &[&str],
    ) -> Result<Self, AuthError> {
        let now = Utc::now();
        let assertion = sign_assertion(key, scopes, now)?;

        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT_TYPE),
            urlencoding::encode(&assertion)
        );

        tracing::debug!(
            client_email = %key.client_email(),
            token_uri = %key.token_uri(),
            "Requesting service account access token"
        );

        let response = client
            .post(key.token_uri())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&text).map_err(|e| AuthError::TokenRejected {
                status: status.as_u16(),
                body: format!("unexpected token response ({}): {}", e, text),
            })?;

        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(now);
        let session = Self {
            client,
            access_token: SecretString::from(token.access_token),
            expires_at,
        };

        tracing::info!(
            client_email = %key.client_email(),
            expires_at = %session.expires_at,
            "Authorized service account session"
        );

        Ok(session)
    }

    /// Start a POST request carrying the session's bearer token.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// When the access token stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for AuthorizedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedSession")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Build and sign the RS256 assertion for `key`.
pub fn sign_assertion(
    key: &ServiceAccountKey,
    scopes: &[&str],
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: key.client_email().to_string(),
        scope: scopes.join(" "),
        aud: key.token_uri().to_string(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id().map(str::to_string);

    Ok(jsonwebtoken::encode(&header, &claims, key.encoding_key())?)
}

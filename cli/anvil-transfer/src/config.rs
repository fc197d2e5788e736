// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Transfer configuration
//!
//! The per-environment workspace and container identifiers are fixed; only
//! the API endpoints and a few tunables can be overridden at startup.

use clap::ValueEnum;
use strum::Display;

/// Default Terra workspace manager endpoint (shared by all environments)
pub const DEFAULT_TERRA_API_URL: &str = "https://workspace.dsde-prod.broadinstitute.org";

/// Default SAS token lifetime requested from Terra (8 hours)
pub const DEFAULT_SAS_EXPIRATION_SECS: u64 = 28800;

/// Default HTTP timeout for everything except the synchronous copy
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Deployment the transfer runs against
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Prod,
}

/// Fixed identifiers for one environment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Portal API base URL (no trailing slash)
    pub portal_api_url: &'static str,
    pub source_workspace_id: &'static str,
    pub destination_workspace_id: &'static str,
    pub source_storage_resource_id: &'static str,
    pub destination_storage_resource_id: &'static str,
}

const SANDBOX: EnvironmentConfig = EnvironmentConfig {
    portal_api_url: "https://api.sandbox.igvf.org",
    source_workspace_id: "0f7ac85e-9aef-482c-9fb1-73c14877c2f8",
    destination_workspace_id: "7d3c9ef1-99c2-4948-9811-fe79d626219f",
    source_storage_resource_id: "33cc593d-bd19-4d1b-8bd4-7891a71293fb",
    destination_storage_resource_id: "d72ebb65-b7a9-4ebe-9815-3fe948715498",
};

const PROD: EnvironmentConfig = EnvironmentConfig {
    portal_api_url: "https://api.data.igvf.org",
    source_workspace_id: "3201e576-2410-4dd8-9799-cb5e431333ae",
    destination_workspace_id: "b7c48e0a-02df-4e12-b026-4070c017359e",
    source_storage_resource_id: "14be87fd-0130-4064-85b8-dceb8972ab11",
    destination_storage_resource_id: "121eb709-b2e6-4d85-a76e-91fcb422654e",
};

impl Environment {
    pub fn config(self) -> &'static EnvironmentConfig {
        match self {
            Environment::Sandbox => &SANDBOX,
            Environment::Prod => &PROD,
        }
    }
}

/// Settings for one transfer run
#[derive(Clone, Debug)]
pub struct TransferConfig {
    pub environment: Environment,
    /// Portal API base URL, defaults to the environment's
    pub portal_api_url: String,
    /// Terra workspace manager base URL
    pub terra_api_url: String,
    /// Lifetime requested for each SAS token
    pub sas_expiration_secs: u64,
    /// Timeout for portal, Terra and blob metadata requests
    pub http_timeout_secs: u64,
    /// Remove the source blob once the copy is recorded in the portal
    pub delete_source_files: bool,
}

impl TransferConfig {
    /// Configuration for `environment` with every tunable at its default
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            portal_api_url: environment.config().portal_api_url.to_string(),
            terra_api_url: DEFAULT_TERRA_API_URL.to_string(),
            sas_expiration_secs: DEFAULT_SAS_EXPIRATION_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            delete_source_files: false,
        }
    }

    pub fn with_portal_api_url(mut self, url: impl Into<String>) -> Self {
        self.portal_api_url = trim_base_url(url.into());
        self
    }

    pub fn with_terra_api_url(mut self, url: impl Into<String>) -> Self {
        self.terra_api_url = trim_base_url(url.into());
        self
    }

    pub fn with_sas_expiration_secs(mut self, secs: u64) -> Self {
        self.sas_expiration_secs = secs;
        self
    }

    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    pub fn with_delete_source_files(mut self, delete: bool) -> Self {
        self.delete_source_files = delete;
        self
    }

    /// Workspace and container identifiers for the configured environment
    pub fn workspaces(&self) -> &'static EnvironmentConfig {
        self.environment.config()
    }
}

/// Paths are appended directly (`{base}/search/`, `{base}{file_id}`), so a
/// trailing slash would double up.
fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

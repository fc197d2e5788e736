// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! AnVIL Transfer Library
//!
//! Moves portal files that were uploaded to the wrong AnVIL workspace into
//! the right one. A run:
//!
//! - Authorizes a Google service account and mints SAS tokens for the
//!   source and destination storage containers through Terra
//! - Exits early if the portal is reindexing
//! - Fetches every file flagged with the "incorrect anvil workspace" audit
//! - For each file: checks the source blob exists, copies it server-side,
//!   marks the portal record `deposited`, and optionally deletes the source
//!
//! # Modules
//!
//! - [`config`] - Environment table and run tunables
//! - [`context`] - Immutable per-run state (tokens, portal credentials)
//! - [`terra`] - SAS token exchange with the Terra workspace manager
//! - [`portal`] - Portal search, indexer probe and status patch
//! - [`blob`] - Azure Blob existence, synchronous copy and delete
//! - [`processor`] - The per-file transfer sequence
//! - [`run`] - Setup and the indexing gate

pub mod blob;
pub mod config;
pub mod context;
pub mod error;
pub mod portal;
pub mod processor;
pub mod run;
pub mod terra;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, TransferError};
pub use run::{run_transfer, setup};

/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Shared utilities for steamroll
 */

//! Version strings shared by the CLI and the HTTP client.
//!
//! - Cargo.toml version: 0.x.y while the document format may still change
//! - CLI reported version: the Cargo version with a `-dev` suffix during 0.x
//! - User agent: `steamroll/<cargo version>`, sent with every API request

mod version;

pub use version::{cargo_version, cli_version, user_agent};

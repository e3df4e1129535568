/*
 * auth.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-host credentials
 */

//! Credentials file.
//!
//! ```yaml
//! https://pretix.example:
//!   Authorization: Token abc123
//! http://localhost:8000:
//!   Authorization: Token dev
//! ```
//!
//! Keys are API base URLs after [`normalize_base`], values are the headers
//! sent with every request to that base.

use crate::error::{ApiError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Prefix a scheme when the base URL has none: `http://` for
/// `localhost:<port>`, `https://` otherwise.
pub fn normalize_base(base: &str) -> String {
    if base.starts_with("http:") || base.starts_with("https:") {
        base.to_string()
    } else if base.starts_with("localhost:") {
        format!("http://{}", base)
    } else {
        format!("https://{}", base)
    }
}

/// Headers to send, per API base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AuthConfig {
    hosts: BTreeMap<String, BTreeMap<String, String>>,
}

impl AuthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a credentials document. An empty document has no hosts.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_yaml::from_str(text).map_err(|err| ApiError::Config(err.to_string()))
    }

    /// Read and parse a credentials file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ApiError::Config(format!("{}: {}", path.display(), err)))?;
        Self::from_yaml_str(&text)
    }

    /// Add or replace one header for `base` (normalized first).
    pub fn insert(&mut self, base: &str, name: impl Into<String>, value: impl Into<String>) {
        self.hosts
            .entry(normalize_base(base))
            .or_default()
            .insert(name.into(), value.into());
    }

    /// The headers for `base` (normalized first).
    pub fn headers_for(&self, base: &str) -> Result<&BTreeMap<String, String>> {
        let base = normalize_base(base);
        self.hosts
            .get(&base)
            .ok_or(ApiError::MissingAuth { base })
    }
}

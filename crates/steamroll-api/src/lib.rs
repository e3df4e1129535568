/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! # steamroll-api
//!
//! A small blocking client for the `/api/v1/` REST interface of the
//! ticketing system.
//!
//! Resources are addressed by a [`Resource`], a list of path components such
//! as `organizers/acme/events/conf/items`. Bodies are plain
//! [`serde_json::Value`]s; the [`Api`] trait is the seam the export and
//! import pipelines are written against, and [`HttpApi`] is its network
//! implementation.
//!
//! Credentials come from an [`AuthConfig`] mapping each API base URL to the
//! headers sent with every request to it.

mod auth;
mod client;
mod error;
mod resource;

pub use auth::{AuthConfig, normalize_base};
pub use client::{Api, HttpApi};
pub use error::{ApiError, Result};
pub use resource::Resource;

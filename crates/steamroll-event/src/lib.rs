/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! # steamroll-event
//!
//! Export an event with everything that belongs to it into one document, and
//! recreate it from that document on the same or another server.
//!
//! - [`fetch_event`] downloads the event, its settings and every sub-resource
//!   list, then replaces foreign keys by references ([`link_rules`])
//! - [`create_event`] posts the document back section by section, merging
//!   each response so later references see the new ids
//! - [`update_event`] patches the root fields and settings of an existing
//!   event
//!
//! All three work against any [`steamroll_api::Api`].

mod error;
mod export;
mod import;
mod links;

pub use error::{EventError, Result};
pub use export::{ExportOptions, fetch_event, strip_ids};
pub use import::{CreateOptions, create_event, update_event};
pub use links::{LINKS, link_all, link_rules};

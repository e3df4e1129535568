/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for the steamroll CLI
//!
//! Each command module handles the CLI interface and delegates to
//! steamroll-event for the actual work.

pub mod event;

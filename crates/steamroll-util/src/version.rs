/*
 * version.rs
 * Copyright (c) 2025 Posit, PBC
 */

/// Get the version string that should be reported by the CLI
///
/// During development (version 0.x.y) the exported document layout is not
/// yet frozen, so the CLI reports `0.x.y-dev` to make that visible in bug
/// reports. From 1.0.0 on the plain Cargo version is reported.
pub fn cli_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const DEV_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-dev");

    if VERSION.starts_with("0.") {
        DEV_VERSION
    } else {
        VERSION
    }
}

/// Get the Cargo package version (for internal use)
pub fn cargo_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// User agent sent by the API client.
pub fn user_agent() -> String {
    format!("steamroll/{}", cargo_version())
}

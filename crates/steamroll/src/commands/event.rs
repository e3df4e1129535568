/*
 * event.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Event subcommands
 */

//! Event command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use steamroll_api::{AuthConfig, HttpApi, Resource};
use steamroll_event::{CreateOptions, ExportOptions, create_event, fetch_event, update_event};
use steamroll_tree::{DefaultRules, Node, yaml};

/// The event a command works on and where its document lives.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// API host, e.g. pretix.eu or localhost:8000
    pub base: String,

    /// Organizer slug
    pub organizer: String,

    /// Event slug
    pub event: String,

    /// Document file (defaults to organizers_<organizer>_events_<event>.yml)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Credentials file
    #[arg(long, default_value = "auth.yml")]
    pub auth: PathBuf,
}

impl Target {
    fn resource(&self) -> Resource {
        Resource::event(&self.organizer, &self.event)
    }

    fn document_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.yml", self.resource().file_stem())))
    }

    fn api(&self) -> Result<HttpApi> {
        let auth = AuthConfig::load(&self.auth)
            .with_context(|| format!("Failed to load credentials from {}", self.auth.display()))?;
        Ok(HttpApi::new(&self.base, &auth)?)
    }
}

pub fn fetch(
    target: &Target,
    keep_defaults: bool,
    strip_ids: bool,
    defaults: &Path,
) -> Result<()> {
    let defaults = if keep_defaults {
        None
    } else {
        Some(read_defaults(defaults)?)
    };
    let api = target.api()?;

    let options = ExportOptions {
        defaults,
        strip_ids,
    };
    let document = fetch_event(&api, &target.resource(), &options)
        .with_context(|| format!("Failed to fetch {}", target.resource()))?;

    let path = target.document_path();
    write_document(&path, &document)?;
    tracing::info!(path = %path.display(), "Wrote event document");
    Ok(())
}

pub fn create(target: &Target, force: bool) -> Result<()> {
    let path = target.document_path();
    let mut document = read_document(&path)?;
    let api = target.api()?;

    let created = create_event(
        &api,
        &target.organizer,
        &target.event,
        &mut document,
        CreateOptions { force },
    )
    .with_context(|| {
        format!(
            "Failed to create {} from {}",
            target.resource(),
            path.display()
        )
    })?;

    let public_url = created
        .get("public_url")
        .and_then(|url| url.as_str())
        .unwrap_or_default();
    println!("Success: {}", public_url);
    Ok(())
}

pub fn update(target: &Target) -> Result<()> {
    let path = target.document_path();
    let document = read_document(&path)?;
    let api = target.api()?;

    let updated = update_event(&api, &target.resource(), &document).with_context(|| {
        format!(
            "Failed to update {} from {}",
            target.resource(),
            path.display()
        )
    })?;

    let public_url = updated
        .get("public_url")
        .and_then(|url| url.as_str())
        .unwrap_or_default();
    println!("Success: {}", public_url);
    Ok(())
}

fn read_document(path: &Path) -> Result<Node> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    yaml::load(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_document(path: &Path, document: &Node) -> Result<()> {
    let text = yaml::dump(document)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn read_defaults(path: &Path) -> Result<DefaultRules> {
    let text = fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read default values from {} (use --keep-defaults to skip)",
            path.display()
        )
    })?;
    DefaultRules::from_yaml_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

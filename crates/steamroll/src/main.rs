/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! steamroll CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::event::Target;

#[derive(Parser)]
#[command(name = "steamroll")]
#[command(version = steamroll_util::cli_version())]
#[command(about = "Export events to YAML and recreate them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export, create or update a single event
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Download an event and everything that belongs to it into a YAML file
    Fetch {
        #[command(flatten)]
        target: Target,

        /// Keep fields that still hold their default value
        #[arg(long)]
        keep_defaults: bool,

        /// Remove entity ids from the exported document
        #[arg(long)]
        strip_ids: bool,

        /// Default values to strip
        #[arg(long, default_value = "defaults.yml")]
        defaults: PathBuf,
    },

    /// Create an event from a YAML file
    Create {
        #[command(flatten)]
        target: Target,

        /// Delete an existing event with the same slug first
        #[arg(long)]
        force: bool,
    },

    /// Update the settings of an existing event from a YAML file
    Update {
        #[command(flatten)]
        target: Target,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steamroll=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Event { command } => match command {
            EventCommands::Fetch {
                target,
                keep_defaults,
                strip_ids,
                defaults,
            } => commands::event::fetch(&target, keep_defaults, strip_ids, &defaults),
            EventCommands::Create { target, force } => commands::event::create(&target, force),
            EventCommands::Update { target } => commands::event::update(&target),
        },
    }
}

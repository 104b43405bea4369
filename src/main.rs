//! Polysite - a dual-mode content resolver that serves a localized site
//! live or materializes it to disk through one shared pipeline.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod i18n;
mod logger;
mod page;
mod reload;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(SiteConfig::load(cli)?);

    match &cli.command {
        Commands::Init { .. } => cli::init::new_site(&config),
        Commands::Serve { .. } => cli::serve::run(config),
        Commands::Generate => cli::generate::run(&config),
    }
}

//! CLI module for Donativa
//!
//! Provides subcommands for running and operating the service:
//! - `serve`: run the HTTP API server
//! - `migrate`: apply (or revert) database schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Donativa - donation matching service
#[derive(Parser)]
#[command(name = "donativa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),
}

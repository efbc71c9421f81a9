//! CLI module for the person registry
//!
//! Currently a single subcommand:
//! - `serve`: run the HTTP API server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Person Registry - person records and identity documents over HTTP
#[derive(Parser)]
#[command(name = "person-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,
}

//! CLI argument parsing for the despacho-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "despacho-worker", about = "Despacho field-operations dispatch worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Call each configured routing backend once and exit
    Probe,
}

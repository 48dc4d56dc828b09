//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// geoip-lookup - Resolve IP addresses to two-letter country codes
#[derive(Parser)]
#[command(name = "geoip-lookup")]
#[command(version)]
#[command(about = "Resolve IP addresses to two-letter country codes", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one or more IP addresses
    Lookup {
        /// IP addresses (IPv4 or IPv6)
        #[arg(required = true)]
        ips: Vec<String>,

        /// Skip ipinfo.io and use the local database only
        #[arg(long)]
        no_remote: bool,

        /// Print one JSON object per address
        #[arg(long)]
        json: bool,
    },

    /// Show which local database is active (never queries ipinfo.io)
    Source,

    /// Generate a sample configuration file
    ConfigGen {
        /// Output path (prints to stdout if omitted)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

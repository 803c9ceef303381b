//! docsync CLI
//!
//! Command-line front end for the docsync bridge.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP server (search page + sync trigger)
//! - `sync` - Run one full resync and exit
//! - `render` - Print the rendered search page
//! - `check` - Validate the configuration without touching the network

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirror a document database collection into a search index.
#[derive(Parser)]
#[command(name = "docsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the page template
    #[arg(global = true, long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the search page and the sync trigger over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "DOCSYNC_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// Run one full resync and exit
    Sync {
        /// Document database API key
        #[arg(long, env = "SOURCE_ADMIN_KEY", hide_env_values = true)]
        admin_key: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the rendered search page
    Render {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration without network access
    Check {
        /// Also require the settings the sync path needs
        #[arg(short, long)]
        sync: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { bind } => {
            commands::serve::run(bind, &cli.static_dir)?;
        }
        Commands::Sync { admin_key, format } => {
            commands::sync::run(admin_key.as_deref(), &format)?;
        }
        Commands::Render { output } => {
            commands::render::run(&cli.static_dir, output.as_deref())?;
        }
        Commands::Check { sync, format } => {
            commands::check::run(sync, &format)?;
        }
        Commands::Version => {
            println!("docsync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

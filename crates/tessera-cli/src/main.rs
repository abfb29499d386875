//! Tessera CLI - Command-line interface for Tessera
//!
//! Runs the grid analysis server, or acts as a one-shot client against a
//! running one.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tessera_core::Cell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(author = "Tessera Contributors")]
#[command(version)]
#[command(about = "Connected-region and path analysis for integer grids", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Tessera server
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Headless mode: bind to 0.0.0.0 for remote access (WSL/Docker/Server)
        #[arg(long)]
        headless: bool,

        /// Maximum number of concurrent sessions (overrides the config file)
        #[arg(long)]
        max_sessions: Option<usize>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Upload a grid to a running server and print the analysis
    Query {
        /// JSON file holding the grid as an array of rows
        grid: PathBuf,

        /// Server URL
        #[arg(short, long, default_value = "ws://127.0.0.1:8010")]
        url: String,

        /// Path start as `row,col`
        #[arg(long, value_parser = commands::parse_cell, requires = "to")]
        from: Option<Cell>,

        /// Path end as `row,col`
        #[arg(long, value_parser = commands::parse_cell, requires = "from")]
        to: Option<Cell>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Serve {
            port,
            headless,
            max_sessions,
            config,
        } => commands::serve(port, headless, max_sessions, config.as_deref()).await,
        Commands::Query {
            grid,
            url,
            from,
            to,
        } => commands::query(&grid, &url, from.zip(to)).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

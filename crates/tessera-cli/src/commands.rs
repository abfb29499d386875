//! CLI command implementations.

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use tessera_core::Cell;
use tessera_graph::Component;
use tessera_server::{GridClient, GridServer, ServerConfig};
use tracing::{debug, warn};

/// Parses a `row,col` pair.
pub fn parse_cell(s: &str) -> std::result::Result<Cell, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected row,col but got '{}'", s))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("bad row in '{}'", s))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("bad column in '{}'", s))?;
    Ok(Cell::new(row, col))
}

/// Merges the config file with command-line overrides.
fn server_config(
    port: Option<u16>,
    headless: bool,
    max_sessions: Option<usize>,
    config_path: Option<&Path>,
) -> Result<ServerConfig> {
    let mut config = match config_path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if headless {
        config.addr.set_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
    if let Some(port) = port {
        config.addr.set_port(port);
    }
    if let Some(max) = max_sessions {
        config.max_sessions = max;
    }

    config.validate()?;
    Ok(config)
}

/// Start the Tessera server.
pub async fn serve(
    port: Option<u16>,
    headless: bool,
    max_sessions: Option<usize>,
    config_path: Option<&Path>,
) -> Result<()> {
    if headless {
        println!("{}", "Starting Tessera server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Tessera server...".cyan());
    }

    let config = server_config(port, headless, max_sessions, config_path)?;
    debug!("Server config: {:?}", config);
    let server = GridServer::new(config);

    println!("{} Listening on ws://{}", "✓".green(), server.config().addr);
    println!(
        "  Up to {} concurrent sessions",
        server.config().max_sessions
    );
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
        .map_err(|e| anyhow!(e))?;

    println!("{} Server stopped", "✓".green());
    Ok(())
}

/// Upload a grid file and print what the server reports.
pub async fn query(grid_path: &Path, url: &str, endpoints: Option<(Cell, Cell)>) -> Result<()> {
    if let Some((start, end)) = endpoints {
        if start == end {
            bail!("--from and --to must name different cells");
        }
    }

    let text = fs::read_to_string(grid_path)
        .with_context(|| format!("reading {}", grid_path.display()))?;
    let rows: Vec<Vec<i32>> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of rows", grid_path.display()))?;
    debug!("Read {} rows from {}", rows.len(), grid_path.display());

    let mut client = GridClient::connect(url)
        .await
        .with_context(|| format!("connecting to {}", url))?;

    let grid = client.load_grid(rows).await?;
    println!("{}", "Grid".cyan().bold());
    print!("{}", grid);
    println!();

    let components = client.components().await?;
    println!(
        "{} ({})",
        "Components".cyan().bold(),
        components.len().to_string().cyan()
    );
    for component in &components {
        println!("  {}", describe(component));
    }
    println!();

    let count = client.pattern_count().await?;
    println!("{} {}", "Pattern count:".dimmed(), count);

    if let Some((start, end)) = endpoints {
        println!();
        let shortest = client.shortest_path(start, end).await?;
        print_path("Shortest path", shortest.as_deref());
        let weighted = client.weighted_path(start, end).await?;
        print_path("Weighted path", weighted.as_deref());
    }

    client.stop().await?;
    Ok(())
}

fn describe(component: &Component) -> String {
    let cells: Vec<String> = component.iter().map(ToString::to_string).collect();
    format!("{} cells: {}", component.len(), cells.join(" "))
}

fn print_path(label: &str, path: Option<&[Cell]>) {
    match path {
        Some(cells) => {
            let steps: Vec<String> = cells.iter().map(ToString::to_string).collect();
            println!(
                "{} {} ({} cells)",
                format!("{}:", label).dimmed(),
                steps.join(" -> "),
                cells.len()
            );
        }
        None => println!("{} {}", format!("{}:", label).dimmed(), "unreachable".yellow()),
    }
}

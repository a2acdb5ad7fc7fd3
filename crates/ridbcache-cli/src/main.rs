//! ridbcache - browse RIDB facilities and campsites from the command line.
//!
//! Every invocation builds one `CatalogCache`; the `shell` command keeps it
//! alive across many requests so repeated lookups are served from memory.

mod render;
mod utils;

use std::io::{self, Write};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ridbcache_core::{CatalogCache, Config, RemoteCatalog};

/// Prompt printed before each shell command
const SHELL_PROMPT: &str = "ridb> ";

#[derive(Parser, Debug)]
#[command(name = "ridbcache", version)]
#[command(about = "Browse recreation.gov facilities and campsites through a local cache")]
struct Cli {
    /// Print records as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// A line typed at the shell prompt, parsed with the same subcommands.
#[derive(Parser, Debug)]
#[command(name = "ridbcache", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Show a facility and its campsites
    Facility {
        /// RIDB facility id
        id: String,
        /// Fetch again even if the facility is cached
        #[arg(long)]
        refresh: bool,
    },
    /// List a facility's campsites
    Campsites {
        /// RIDB facility id
        facility_id: String,
        /// Only campsites matching this search text
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Show a single campsite
    Campsite {
        /// RIDB campsite id
        id: String,
        /// Fetch again even if the campsite is cached
        #[arg(long)]
        refresh: bool,
    },
    /// Look up a cached facility or campsite by its exact name
    Find {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// List the facilities currently cached
    Cached,
    /// Read commands from stdin against one long-lived cache
    Shell,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=ridbcache_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let config = Config::load()?;
    let mut cache = CatalogCache::from_config(&config)?;
    info!(base_url = %config.base_url, "ridbcache starting");

    match cli.command {
        Command::Shell => run_shell(&mut cache, cli.json).await,
        command => {
            let output = execute(&mut cache, &command, cli.json).await?;
            println!("{}", output);
            Ok(())
        }
    }
}

/// Read commands line by line until EOF or `quit`.
async fn run_shell<C: RemoteCatalog>(cache: &mut CatalogCache<C>, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "quit" | "exit" => break,
            _ => match ShellLine::try_parse_from(line.split_whitespace()) {
                Ok(ShellLine {
                    command: Command::Shell,
                }) => eprintln!("Already in a shell"),
                Ok(parsed) => match execute(cache, &parsed.command, json).await {
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("Error: {:#}", e),
                },
                // Help and usage errors both land here; a failed write to
                // the terminal is not worth ending the shell over
                Err(e) => {
                    e.print().ok();
                }
            },
        }
        prompt()?;
    }

    debug!(
        facilities = cache.facilities().len(),
        campsites = cache.campsites().len(),
        "Shell finished"
    );
    Ok(())
}

fn prompt() -> Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", SHELL_PROMPT)?;
    stdout.flush()?;
    Ok(())
}

/// Run one command against the cache and return the text to print.
async fn execute<C: RemoteCatalog>(
    cache: &mut CatalogCache<C>,
    command: &Command,
    json: bool,
) -> Result<String> {
    match command {
        Command::Facility { id, refresh } => {
            let facility = cache
                .get_facility(id, *refresh)
                .await?
                .ok_or_else(|| anyhow!("Facility {} not found", id))?;
            show(facility, json, render::facility_page)
        }
        Command::Campsites {
            facility_id,
            query: None,
        } => {
            let campsites = cache
                .get_all_campsites(facility_id)
                .await?
                .ok_or_else(|| anyhow!("Facility {} not found", facility_id))?;
            show(campsites, json, render::campsite_list)
        }
        Command::Campsites {
            facility_id,
            query: Some(query),
        } => {
            let matches = cache.search_campsites(facility_id, query).await?;
            show(&matches, json, render::campsite_list)
        }
        Command::Campsite { id, refresh } => {
            let campsite = cache
                .get_campsite(id, *refresh)
                .await?
                .ok_or_else(|| anyhow!("Campsite {} not found", id))?;
            show(campsite, json, render::campsite_detail)
        }
        Command::Find { name } => {
            let name = name.join(" ");
            if let Some(facility) = cache.facility_by_name(&name) {
                show(facility, json, render::facility_page)
            } else if let Some(campsite) = cache.campsite_by_name(&name) {
                show(campsite, json, render::campsite_detail)
            } else {
                bail!("Nothing cached under the name {:?}", name)
            }
        }
        Command::Cached => {
            let facilities = cache.facilities().sorted_by_id();
            if json {
                return Ok(serde_json::to_string_pretty(&facilities)?);
            }
            let mut out = format!(
                "{} facilities, {} campsites cached",
                facilities.len(),
                cache.campsites().len()
            );
            for facility in facilities {
                out.push_str(&format!(
                    "\n  {:>8}  {}  ({} campsites, {})",
                    facility.id(),
                    facility.name(),
                    facility.campsites.len(),
                    facility.age_display()
                ));
            }
            Ok(out)
        }
        Command::Shell => bail!("The shell cannot be started from here"),
    }
}

fn show<T: Serialize>(value: &T, json: bool, text: fn(&T) -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value).trim_end().to_string())
    }
}

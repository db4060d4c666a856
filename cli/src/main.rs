//! sixdeg - fewest-clicks path finder over a preloaded page link graph.

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sixdeg_core::{load_graph, BfsEngine, Graph, LoadReport, Resolver, TitleResolver};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;
mod resolver;

use commands::Session;
use config::{GraphOptions, Settings};
use resolver::CommandResolver;

/// Find the shortest chain of links between two pages.
#[derive(Parser)]
#[command(name = "sixdeg")]
#[command(author, version)]
#[command(about = "Find the shortest chain of links between two pages")]
#[command(after_help = "Examples:
  sixdeg path Kevin_Bacon Rust_(programming_language)
  sixdeg --data-dir /srv/wiki interactive
  sixdeg --timeout 30 path 1 4242 --json")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    graph: GraphOptions,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search once between two pages (names or numeric ids)
    Path {
        start: String,
        target: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prompt for page pairs until end of input
    #[command(visible_alias = "i")]
    Interactive,

    /// Load the graph and report its size
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn,sixdeg=info,sixdeg_core=info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Load both inputs and enforce the memory cap.
fn start_up(settings: &Settings) -> Result<(Graph, LoadReport)> {
    let (graph, report) = load_graph(&settings.titles, &settings.links, &settings.load)
        .context("failed to load the link graph")?;

    let memory_mb = graph.memory_usage() as u64 / (1024 * 1024);
    if memory_mb > settings.max_memory_mb {
        bail!(
            "loaded graph uses ~{}MB, exceeds --max-memory-mb={}MB",
            memory_mb,
            settings.max_memory_mb
        );
    }

    info!(
        nodes = report.nodes,
        edges = report.edges,
        memory_mb,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "graph ready"
    );
    Ok((graph, report))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let settings = Settings::from_options(&cli.graph);
    let (graph, report) = start_up(&settings)?;
    let engine = BfsEngine::new(settings.threads).context("failed to start BFS workers")?;

    let title_resolver = TitleResolver::new(&graph);
    let command_resolver = settings.resolver.as_ref().map(CommandResolver::new);
    let resolver: &dyn Resolver = match &command_resolver {
        Some(r) => r,
        None => &title_resolver,
    };

    let session = Session {
        graph: &graph,
        engine: &engine,
        resolver,
        settings: &settings,
    };

    match cli.command {
        Commands::Path {
            start,
            target,
            json,
        } => commands::path(&session, &start, &target, json),
        Commands::Interactive => commands::interactive(&session).map(|_| ExitCode::SUCCESS),
        Commands::Status { json } => {
            commands::status(&session, &report, json).map(|_| ExitCode::SUCCESS)
        }
    }
}

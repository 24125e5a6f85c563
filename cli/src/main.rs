//! tldr-hooks CLI
//!
//! Manual client for the daemon adapter, for running the same queries the
//! hooks run and for checking the installation.
//!
//! Commands:
//! - tldr-hooks context <symbol>
//! - tldr-hooks impact <symbol>
//! - tldr-hooks semantic "<query>"
//! - tldr-hooks slice <location> / cfg <function> / dead / warm
//! - tldr-hooks daemon start|status
//! - tldr-hooks doctor

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tldr_hooks_core::{DaemonHandle, Query, QueryCommand, QueryDispatcher, QueryResult};

#[derive(Parser)]
#[command(name = "tldr-hooks")]
#[command(about = "Code-analysis context for hooks, via the tldr daemon")]
#[command(version)]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Language filter passed to the tool
    #[arg(long, global = true)]
    language: Option<String>,

    /// Print the bounded summary instead of the full output
    #[arg(long, global = true)]
    summary: bool,

    /// Print the raw result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prime the daemon's indexes for the project
    Warm,

    /// Structured context for a symbol
    Context {
        /// Symbol name
        symbol: String,
    },

    /// Semantic search over the indexed codebase
    Semantic {
        /// Search query
        query: String,
    },

    /// Change-impact analysis for a symbol
    Impact {
        /// Symbol name
        symbol: String,
    },

    /// Program slice for a location
    Slice {
        /// Positional arguments forwarded to the tool (e.g. file:line var)
        args: Vec<String>,
    },

    /// Control-flow graph for a function
    Cfg {
        /// Function name
        function: String,
    },

    /// Dead-code detection across the project
    Dead,

    /// Daemon management
    Daemon {
        #[command(subcommand)]
        command: DaemonCommands,
    },

    /// Run diagnostics
    Doctor,
}

#[derive(Subcommand)]
enum DaemonCommands {
    /// Start the daemon for this project
    Start,

    /// Check daemon status
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let project = match &cli.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("could not determine current directory")?,
    };

    let dispatcher = QueryDispatcher::new();

    let query = match &cli.command {
        Commands::Warm => Query::new(QueryCommand::Warm),
        Commands::Context { symbol } => Query::new(QueryCommand::Context).arg(symbol),
        Commands::Semantic { query } => Query::new(QueryCommand::Semantic).arg(query),
        Commands::Impact { symbol } => Query::new(QueryCommand::Impact).arg(symbol),
        Commands::Slice { args } => {
            let mut query = Query::new(QueryCommand::Slice);
            for arg in args {
                query = query.arg(arg);
            }
            query
        }
        Commands::Cfg { function } => Query::new(QueryCommand::Cfg).arg(function),
        Commands::Dead => Query::new(QueryCommand::Dead),

        Commands::Daemon { command } => {
            let daemon = DaemonHandle::new(tldr_hooks_core::DEFAULT_TOOL, &project);
            match command {
                DaemonCommands::Start => {
                    if daemon.ensure_live() {
                        println!("Daemon is running");
                    } else {
                        eprintln!("Daemon did not come up");
                        eprintln!("Hint: is `tldr` on your PATH?");
                        std::process::exit(1);
                    }
                }
                DaemonCommands::Status => {
                    if daemon.is_live() {
                        println!("Daemon: Running");
                    } else {
                        println!("Daemon: Not running");
                    }
                    println!("Socket: {}", daemon.socket().display());
                }
            }
            return Ok(());
        }

        Commands::Doctor => {
            run_doctor(&project);
            return Ok(());
        }
    };

    let query = match &cli.language {
        Some(language) => query.language(language),
        None => query,
    };

    let result = dispatcher.dispatch(&project, &query);
    print_result(&result, cli.summary, cli.json);
    Ok(())
}

fn print_result(result: &QueryResult, summary: bool, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        if !result.success {
            std::process::exit(1);
        }
        return;
    }

    if result.success {
        let text = if summary {
            result.summary.as_deref().unwrap_or(&result.output)
        } else {
            &result.output
        };
        println!("{text}");
    } else {
        if let Some(kind) = result.error_kind {
            eprintln!("Error ({}): {}", kind.as_str(), result.error.as_deref().unwrap_or("unknown"));
        } else {
            eprintln!("Error: {}", result.error.as_deref().unwrap_or("unknown"));
        }
        std::process::exit(1);
    }
}

fn run_doctor(project: &PathBuf) {
    println!("tldr-hooks Diagnostics");
    println!("======================\n");

    let daemon = DaemonHandle::new(tldr_hooks_core::DEFAULT_TOOL, project);
    println!("Project: {}", project.display());
    println!("Socket: {}", daemon.socket().display());
    if daemon.socket().exists() {
        println!("  Status: ✓ exists");
    } else {
        println!("  Status: ✗ not found");
    }

    println!("\nDaemon:");
    if daemon.is_live() {
        println!("  Status: ✓ running");
    } else {
        println!("  Status: ✗ not running");
        println!("  Hint: Start with 'tldr-hooks daemon start'");
    }

    // Hook binary installed next to the host's settings
    let hook_path = dirs::home_dir().map(|h| h.join(".claude/hooks/tldr-hook"));
    if let Some(path) = hook_path {
        println!("\nHook Binary:");
        if path.exists() {
            println!("  Status: ✓ {:?}", path);
        } else {
            println!("  Status: ✗ not found");
            println!("  Path: {:?}", path);
        }
    }

    println!("\n--- End Diagnostics ---");
}

// fsgate - Main Entry Point
//
// CLI and stdio server.
// Usage:
//   fsgate serve                 # Run the server (stdio, JSON per line)
//   fsgate tools                 # Print the advertised tool catalog
//   fsgate check <path>          # One-shot guard check, exit 1 on deny
//   fsgate --root DIR serve      # Override the default safe roots

use anyhow::Result;
use clap::{Parser, Subcommand};
use fsgate::config::ServerConfig;
use fsgate::confirm::PendingConfirmation;
use fsgate::tools::Dispatcher;
use fsgate::mcp;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fsgate")]
#[command(version)]
#[command(about = "Sandboxed filesystem tool server over line-delimited JSON")]
struct Cli {
    /// Safe roots the server may access (default: demos/, test/, docs/,
    /// temp dir, ~/Downloads, ~/Documents)
    #[arg(short, long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (stdio, one JSON request per line)
    Serve,

    /// Print the advertised tool catalog as JSON
    Tools,

    /// One-shot guard check — is this path inside the safe roots?
    Check {
        /// Path to check
        path: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging (safe if already init). stdout is protocol —
    // env_logger writes to stderr.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();

    let cli = Cli::parse();

    let config = if cli.roots.is_empty() {
        ServerConfig::default()
    } else {
        ServerConfig::from_roots(cli.roots)
    };

    let dispatcher = Dispatcher::new(&config, Box::new(PendingConfirmation));
    log::info!(
        "safe roots in effect: {}",
        dispatcher
            .guard()
            .roots()
            .iter()
            .map(|r| r.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            mcp::run(&dispatcher)?;
        }

        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(dispatcher.list_tools())?);
        }

        Commands::Check { path } => {
            if dispatcher.guard().is_safe(&path) {
                println!("ALLOWED: {}", path);
            } else {
                println!("DENIED: {}", path);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

//! Pipeparse CLI - pipeline analysis server and offline checker

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use pipeparse::{analyze, server, FixSuggestion, PipeError, Pipeline, ServerConfig};

#[derive(Parser)]
#[command(name = "pipeparse")]
#[command(about = "Pipeparse - pipeline graph analysis: node/edge counts and DAG check")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP analysis server
    Serve {
        /// Address to listen on (overrides config and PIPEPARSE_BIND)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Origin allowed to call the API from a browser
        #[arg(long)]
        allowed_origin: Option<String>,

        /// Path to config.toml (default: ~/.config/pipeparse/config.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Analyze a pipeline JSON file without starting a server
    Check {
        /// Path to a JSON file with `nodes` and `edges`
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Path to config.toml (limits are read from it)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `check --json` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            bind,
            allowed_origin,
            config,
        } => run_server(bind, allowed_origin, config.as_deref()).await,
        Commands::Check { file, json, config } => check_pipeline(&file, json, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ServerConfig, PipeError> {
    ServerConfig::load(path)?.with_env()
}

async fn run_server(
    bind: Option<SocketAddr>,
    allowed_origin: Option<String>,
    config_path: Option<&Path>,
) -> Result<(), PipeError> {
    let mut config = load_config(config_path)?;

    // Apply CLI overrides
    if let Some(addr) = bind {
        config.server.bind = addr;
    }
    if let Some(origin) = allowed_origin {
        config.server.allowed_origin = origin;
    }

    server::serve(config.validate()?).await
}

fn check_pipeline(file: &Path, as_json: bool, config_path: Option<&Path>) -> Result<(), PipeError> {
    let config = load_config(config_path)?;
    let content = fs::read_to_string(file)?;
    let pipeline: Pipeline = serde_json::from_str(&content)?;
    let report = analyze(&pipeline, config.limits())?;

    if as_json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    let verdict = if report.is_dag {
        "yes".green().bold()
    } else {
        "no (cycle detected)".red().bold()
    };
    println!("{} Pipeline '{}'", "→".cyan(), file.display());
    println!("  Nodes: {}", report.num_nodes);
    println!("  Edges: {}", report.num_edges);
    println!("  Is DAG: {}", verdict);

    Ok(())
}

//! # Routewise CLI
//!
//! Command-line interface for the routewise library.
//! Serves the comparison page, or plans a single route from the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};
use routewise::{
    AppState, ComparisonSession, Config, GoogleDirections, GroqChat, Result, RouteForm,
    SessionSlot,
};

mod cli;

/// Command-line interface for routewise
#[derive(Parser)]
#[command(name = "routewise")]
#[command(about = "Compare a delivery route as uploaded against its optimized stop order")]
#[command(long_about = "Compares a multi-stop route in upload order against the order the
directions service picks when allowed to reorder the stops:
  routewise serve                                   # Web UI on 0.0.0.0:8501
  routewise serve --port 8080                       # Web UI on another port
  routewise plan --start Depot --end Depot --stops stops.xlsx

Keys are read from secrets.toml or the environment:
  GOOGLE_MAPS_API_KEY                               # Required
  GROQ_API_KEY                                      # Enables route Q&A")]
#[command(version = env!("ROUTEWISE_VERSION"))]
struct Cli {
    /// Path to the secrets file holding the API keys
    #[arg(long, env = "ROUTEWISE_SECRETS", global = true)]
    secrets: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the comparison page
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8501)]
        port: u16,
    },
    /// Compare one route and print the result
    Plan {
        /// Start address
        #[arg(long)]
        start: String,

        /// End address
        #[arg(long)]
        end: String,

        /// Stops sheet (.xlsx or .csv), one address per row under a header
        #[arg(long)]
        stops: PathBuf,

        /// Question to ask about the optimized route
        #[arg(short, long)]
        question: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli.verbose)))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🧭 Routewise v{} starting...", env!("ROUTEWISE_VERSION"));
    }

    let config = Config::load(cli.secrets.as_deref())?;
    let directions = routewise::directions_from_config(&config)?;
    let assistant = routewise::assistant_from_config(&config)?;
    if assistant.is_none() {
        info!("GROQ_API_KEY is not set, route Q&A is disabled");
    }

    match cli.command {
        Command::Serve { bind, port } => {
            let state = AppState::new(directions, assistant);
            routewise::run_server(state, &format!("{bind}:{port}")).await
        }
        Command::Plan {
            start,
            end,
            stops,
            question,
        } => plan_once(&directions, assistant.as_ref(), start, end, stops, question).await,
    }
}

fn log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

async fn plan_once(
    directions: &GoogleDirections,
    assistant: Option<&GroqChat>,
    start: String,
    end: String,
    stops_path: PathBuf,
    question: Option<String>,
) -> Result<()> {
    let bytes = std::fs::read(&stops_path)?;
    let file_name = stops_path.file_name().and_then(|name| name.to_str());
    let stops = routewise::parse_stops_upload(file_name, &bytes)?;
    info!("📍 Read {} stops from {}", stops.len(), stops_path.display());

    let form = RouteForm::new(start, end, stops);
    let slot = SessionSlot::new();
    let session = routewise::submit(directions, &form, &slot).await?;

    let mut stdout = std::io::stdout().lock();
    cli::print_comparison(&mut stdout, &session)?;

    if let Some(question) = question {
        answer_question(assistant, &session, &question).await?;
    }

    Ok(())
}

async fn answer_question(
    assistant: Option<&GroqChat>,
    session: &ComparisonSession,
    question: &str,
) -> Result<()> {
    let Some(model) = assistant else {
        return Err(routewise::Error::ConfigError(
            "route Q&A is disabled, GROQ_API_KEY is not set".to_string(),
        ));
    };
    let answer = routewise::ask_about_route(model, &session.comparison.optimized, question).await?;
    println!();
    println!("❓ {}", question.trim());
    println!("{answer}");
    Ok(())
}

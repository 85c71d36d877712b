use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carewatch_core::AdminApiClient;

mod commands;
mod config;

use commands::{handle_rooms_command, handle_watch_command};
use config::CliConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "carewatch")]
#[command(version = VERSION)]
#[command(about = "Carewatch - realtime call room monitoring console")]
#[command(long_about = r#"
Carewatch tracks the active call rooms of an elder-care monitoring service,
joins every room that has a real visitor in it, and merges the live
participant state into one operator console.

Use 'carewatch rooms' to list active rooms, 'carewatch watch' to monitor
them continuously, and 'carewatch-tui' for the tiled live dashboard.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List currently active call rooms")]
    Rooms {
        #[arg(short, long)]
        json: bool,
    },

    #[command(about = "Monitor call rooms continuously, printing changes")]
    Watch,

    #[command(about = "Issue a room-scoped host credential (debugging aid)")]
    Token {
        #[arg(short, long)]
        room: String,
    },

    #[command(about = "Show the signed-in operator identity")]
    Whoami,

    #[command(about = "Show version information")]
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load();

    match cli.command {
        Commands::Rooms { json } => handle_rooms_command(&config, json).await,
        Commands::Watch => handle_watch_command(&config).await,
        Commands::Token { room } => cmd_token(&config, &room).await,
        Commands::Whoami => cmd_whoami(&config).await,
        Commands::Version => cmd_version(),
    }
}

async fn cmd_token(config: &CliConfig, room: &str) -> anyhow::Result<()> {
    let client = AdminApiClient::new(config.api_url.clone(), config.token_store());
    let grant = client.issue_room_token(room).await?;

    println!("{}", "Room credential issued".cyan().bold());
    println!("  {:<10} {}", "Room:".bold(), room);
    println!("  {:<10} {}", "Server:".bold(), grant.livekit_url);
    println!("  {:<10} {}", "Token:".bold(), grant.token);

    Ok(())
}

async fn cmd_whoami(config: &CliConfig) -> anyhow::Result<()> {
    let client = AdminApiClient::new(config.api_url.clone(), config.token_store());
    let identity = client.fetch_operator().await?;

    println!("{}", "Operator".cyan().bold());
    println!("  {:<10} {}", "Name:".bold(), identity.display_name);
    println!("  {:<10} {}", "Identity:".bold(), identity.identity());

    Ok(())
}

fn cmd_version() -> anyhow::Result<()> {
    println!("carewatch {}", VERSION);
    Ok(())
}

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "keepsake-cli", version, about = "Keepsake CLI")]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reason cards
    Card {
        #[command(subcommand)]
        action: commands::card::CardAction,
    },
    /// Hidden secrets
    Secret {
        #[command(subcommand)]
        action: commands::secret::SecretAction,
    },
    /// Progress statistics
    Stats,
    /// Reset, clear or export stored progress
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Anniversary clock
    Anniversary {
        #[command(subcommand)]
        action: commands::anniversary::AnniversaryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries JSON, so logs go to stderr.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Card { action } => commands::card::run(action).await,
        Commands::Secret { action } => commands::secret::run(action).await,
        Commands::Stats => commands::stats::run().await,
        Commands::Progress { action } => commands::progress::run(action).await,
        Commands::Anniversary { action } => commands::anniversary::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fetch_state_cli::commands::{
    config_cmd::{self, ConfigCommands},
    get_cmd::{self, GetArgs},
    watch_cmd::{self, WatchArgs},
};

/// fetch-state CLI: Retrieve and watch remote JSON resources
#[derive(Parser)]
#[command(name = "fetch-state")]
#[command(about = "Retrieve and watch remote JSON resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Retrieve a resource once and print it
    Get(GetArgs),

    /// Keep a resource under watch and drive it from standard input
    Watch(WatchArgs),

    /// Show the CLI version
    Version,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("FETCH_STATE_LOG"))
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Config(cmd) => config_cmd::execute(cmd).await,
        Commands::Get(args) => get_cmd::execute(args).await,
        Commands::Watch(args) => watch_cmd::execute(args).await,
        Commands::Version => {
            println!("fetch-state version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

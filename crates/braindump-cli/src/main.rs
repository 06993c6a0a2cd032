use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "braindump", version, about = "Brain Dump Mode CLI")]
struct Cli {
    /// Settings file (defaults to ~/.config/braindump/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Flip the content guard and the rate meter together
    Toggle,
    /// Preview the progress track for a rate
    Render(commands::render::RenderArgs),
    /// Replay a keystroke script against an empty document
    Replay(commands::replay::ReplayArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = commands::open_store(cli.config);
    let result = store.and_then(|store| match cli.command {
        Commands::Config { action } => commands::config::run(action, &store),
        Commands::Toggle => commands::toggle::run(&store),
        Commands::Render(args) => commands::render::run(args, &store),
        Commands::Replay(args) => commands::replay::run(args, &store),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

use clap::Args;
use braindump_core::{render, render_track, CoreError, FileStore, SettingsStore};

#[derive(Args)]
pub struct RenderArgs {
    /// Typing rate in types per minute
    #[arg(long)]
    rate: f64,
    /// Goal in types per minute (defaults to the configured goal)
    #[arg(long)]
    goal: Option<f64>,
    /// Print position and label as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: RenderArgs, store: &FileStore) -> Result<(), CoreError> {
    let goal = match args.goal {
        Some(goal) => goal,
        None => store.load().meter.goal_tpm,
    };
    let progress = render(args.rate.max(0.0), goal);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
    } else {
        println!("{}", render_track(&progress));
    }
    Ok(())
}

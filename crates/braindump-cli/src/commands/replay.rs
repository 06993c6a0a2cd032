use std::path::PathBuf;

use clap::Args;
use braindump_core::{parse_script, replay, CoreError, FileStore, SettingsStore};

#[derive(Args)]
pub struct ReplayArgs {
    /// Script file, one `<t_ms> <key>` per line
    script: PathBuf,
    /// Seed for notice selection
    #[arg(long, default_value = "0")]
    seed: u64,
    /// Force the guard and meter on regardless of settings
    #[arg(long)]
    enable: bool,
    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ReplayArgs, store: &FileStore) -> Result<(), CoreError> {
    let src = std::fs::read_to_string(&args.script)?;
    let steps = parse_script(&src)?;

    let mut config = store.load();
    if args.enable {
        config.guard.enabled = true;
        config.meter.enabled = true;
    }

    let report = replay(config, &steps, args.seed);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.document);
    println!("---");
    for notice in &report.notices {
        println!("notice: {notice}");
    }
    println!("peak: {} types/min over {} samples", report.peak_tpm, report.samples);
    println!("{}", report.status);
    Ok(())
}

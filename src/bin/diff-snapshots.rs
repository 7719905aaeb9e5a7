use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use artist_tracker::pipeline::diff::{diff, render_message};
use artist_tracker::pipeline::snapshot::parse_csv;

/// Print the change notification between two artists.csv files.
#[derive(Parser, Debug)]
#[command(name = "diff-snapshots", version, about = "Compare two artists.csv snapshots")]
struct Cli {
    /// Older snapshot
    old: PathBuf,
    /// Newer snapshot
    new: PathBuf,
}

fn read_snapshot(path: &PathBuf) -> Result<artist_tracker::types::Snapshot> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_csv(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let old = read_snapshot(&args.old)?;
    let new = read_snapshot(&args.new)?;
    if old.is_empty() && new.is_empty() {
        bail!("both snapshots are empty");
    }

    let delta = diff(&old, &new);
    if delta.is_empty() {
        println!("no changes ({} records)", new.len());
    } else {
        println!("{}", render_message(&delta));
    }
    Ok(())
}

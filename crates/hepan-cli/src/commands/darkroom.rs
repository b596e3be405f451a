//! Darkroom command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct DarkroomArgs {
    /// Output one JSON object per entry
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: DarkroomArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    let darkroom = session.darkroom().await.context("Failed to read darkroom")?;

    if darkroom.0.is_empty() {
        eprintln!("{}", "The darkroom is empty.".dimmed());
        return Ok(());
    }

    for entry in &darkroom.0 {
        if args.json {
            output::json(entry)?;
            continue;
        }
        println!(
            "{} {} {} {}",
            entry.name.bold(),
            format!("(uid {})", entry.uid).dimmed(),
            entry.action.red(),
            format!("{} → {}", entry.time, entry.expiration).dimmed(),
        );
        println!("  {}", entry.reason);
    }

    Ok(())
}

//! Formhash command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;

#[derive(Args, Debug)]
pub struct FormhashArgs {}

pub async fn run(_args: FormhashArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.connect().await?;

    let formhash = session
        .refresh_formhash()
        .await
        .context("Failed to read formhash")?;
    println!("{}", formhash.as_str());

    Ok(())
}

//! Login command implementation.

use anyhow::Result;
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {}

/// Check that the configured account can log in. Nothing is persisted;
/// every command logs in on its own.
pub async fn run(_args: LoginArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    output::success("Logged in successfully");
    println!();
    output::field("Username", session.username());
    output::field("Forum", session.forum().as_str());

    Ok(())
}

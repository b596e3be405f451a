//! Rate and comment commands.

use anyhow::{Context as _, Result};
use clap::Args;

use hepan::{FormHashPolicy, PostId, ThreadId};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RateArgs {
    /// Thread id the post belongs to
    pub tid: ThreadId,

    /// Post id
    pub pid: PostId,

    /// Water drops to give (negative to take)
    #[arg(allow_hyphen_values = true)]
    pub score: i32,

    /// Reason shown with the rating
    #[arg(long, default_value = "")]
    pub reason: String,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Thread id the post belongs to
    pub tid: ThreadId,

    /// Post id
    pub pid: PostId,

    /// Comment text
    pub content: String,
}

pub async fn run_rate(args: RateArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.connect().await?;

    session
        .rate(
            args.tid,
            args.pid,
            args.score,
            &args.reason,
            FormHashPolicy::Refresh,
        )
        .await
        .with_context(|| format!("Failed to rate post {} of thread {}", args.pid, args.tid))?;

    output::success(&format!("Rated post {} with {}", args.pid, args.score));
    Ok(())
}

pub async fn run_comment(args: CommentArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.connect().await?;

    session
        .comment(args.tid, args.pid, &args.content, FormHashPolicy::Refresh)
        .await
        .with_context(|| format!("Failed to comment on post {}", args.pid))?;

    // The forum gives no confirmation beyond the HTTP status.
    output::success(&format!("Comment submitted to post {}", args.pid));
    Ok(())
}

//! Keep-alive loop.
//!
//! Logs every account in, then touches the home page of each (refreshing
//! its formhash) every `refresh_interval_secs`, and logs all of them in
//! again every `login_cycle_secs`. Runs until interrupted.

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use hepan::Session;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct KeepaliveArgs {
    /// Seconds between refreshes (overrides the config file)
    #[arg(long)]
    pub interval: Option<u64>,
}

pub async fn run(args: KeepaliveArgs, ctx: &Context) -> Result<()> {
    let mut keepalive = ctx.config.keepalive.clone();
    if let Some(interval) = args.interval {
        keepalive.refresh_interval_secs = interval.max(1);
    }

    let mut sessions: Vec<Session> = Vec::new();
    for credentials in ctx.all_credentials()? {
        sessions.push(ctx.connect_as(credentials).await?);
    }
    output::success(&format!("{} account(s) online", sessions.len()));

    loop {
        for _ in 0..keepalive.rounds_per_cycle() {
            for session in &mut sessions {
                println!("[{}] refreshing {}", output::now(), session.username());
                if let Err(e) = session.refresh_formhash().await {
                    warn!(username = session.username(), error = %e, "Refresh failed");
                    output::warning(&format!("{}: {}", session.username(), e));
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(keepalive.refresh_interval()) => {}
                _ = tokio::signal::ctrl_c() => {
                    eprintln!("Interrupted");
                    return Ok(());
                }
            }
        }

        for session in &mut sessions {
            println!("[{}] logging in {} again", output::now(), session.username());
            match session.login().await {
                Ok(()) => info!(username = session.username(), "Re-login succeeded"),
                Err(e) => output::warning(&format!("{}: {}", session.username(), e)),
            }
        }
    }
}

//! Ranking board commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;

use hepan::extract::Ranking;
use hepan::{ForumRankView, PollRankView, ThreadRankView, UserRankView};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RankCommand {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub board: RankBoard,
}

#[derive(Subcommand, Debug)]
pub enum RankBoard {
    /// Member boards: credit, post, onlinetime, water
    User {
        view: UserRankView,

        /// Order or category, e.g. `all`, `2`, `thismonth`, `202503`
        #[arg(long)]
        order: Option<String>,
    },

    /// Thread boards: replies, views, favtimes, heats
    Thread {
        view: ThreadRankView,

        /// Period, e.g. `all`, `thismonth`, `today`
        #[arg(long, default_value = "all")]
        order: String,
    },

    /// Poll boards: heats
    Poll {
        view: PollRankView,

        #[arg(long)]
        order: Option<String>,
    },

    /// Forum section boards: threads, post, today
    Forum { view: ForumRankView },
}

pub async fn handle(cmd: RankCommand, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    match cmd.board {
        RankBoard::User { view, order } => {
            let ranking = session
                .user_rank(view, order.as_deref())
                .await
                .with_context(|| format!("Failed to read member ranking '{view}'"))?;
            print(&ranking, cmd.json, |e| {
                format!(
                    "{:>4}  {} {}  {}",
                    e.rank,
                    e.name.bold(),
                    format!("(uid {})", e.uid).dimmed(),
                    e.msg
                )
            })
        }
        RankBoard::Thread { view, order } => {
            let ranking = session
                .thread_rank(view, Some(&order))
                .await
                .with_context(|| format!("Failed to read thread ranking '{view}'"))?;
            print(&ranking, cmd.json, |e| {
                let tid = e.tid.map(|t| t.to_string()).unwrap_or_default();
                format!(
                    "{:>4}  {:>8}  {} {}  {}",
                    e.rank,
                    e.count,
                    e.title.bold(),
                    format!("[{}] {} {}", e.forum, e.author, e.time).dimmed(),
                    tid.cyan()
                )
            })
        }
        RankBoard::Poll { view, order } => {
            let ranking = session
                .poll_rank(view, order.as_deref())
                .await
                .with_context(|| format!("Failed to read poll ranking '{view}'"))?;
            print(&ranking, cmd.json, |e| {
                format!(
                    "{:>4}  {:>8}  {} {}  {} voters",
                    e.rank,
                    e.count,
                    e.title.bold(),
                    format!("{} {}", e.author, e.time).dimmed(),
                    e.voters
                )
            })
        }
        RankBoard::Forum { view } => {
            let ranking = session
                .forum_rank(view)
                .await
                .with_context(|| format!("Failed to read forum ranking '{view}'"))?;
            print(&ranking, cmd.json, |e| {
                format!("{:>4}  {:>8}  {}", e.rank, e.count, e.forum)
            })
        }
    }
}

fn print<T: Serialize>(
    ranking: &Ranking<T>,
    json: bool,
    line: impl Fn(&T) -> String,
) -> Result<()> {
    if json {
        return output::json_pretty(ranking);
    }

    eprintln!("{}", ranking.notice.dimmed());
    for entry in &ranking.entries {
        println!("{}", line(entry));
    }
    Ok(())
}

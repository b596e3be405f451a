//! Floor reward loop.
//!
//! Watches a thread and rates every reply whose floor is a multiple of
//! `--every`, with a cap per author and in total, until the thread is
//! older than `--time-limit` seconds.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use tracing::{debug, info, warn};

use hepan::extract::Reply;
use hepan::{FormHashPolicy, ThreadId, UserId};

use crate::context::Context;
use crate::output;

/// Water drops one member may hand out per day.
const DAILY_CAP: i64 = 400;

/// Ratings of one floor the server may refuse before the floor is dropped.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Args, Debug)]
pub struct RewardArgs {
    /// Thread to watch
    pub tid: ThreadId,

    /// Water drops per reward
    #[arg(long, default_value_t = 5, allow_hyphen_values = true)]
    pub score: i32,

    /// Reward floors that are a multiple of this
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub every: u32,

    /// Maximum rewards per author
    #[arg(long, default_value_t = 1)]
    pub per_user: u32,

    /// Maximum rewards in total
    #[arg(long, default_value_t = 80)]
    pub max_total: u32,

    /// Stop once the thread is this many seconds old
    #[arg(long, default_value_t = 3600)]
    pub time_limit: i64,

    /// Seconds between checks
    #[arg(long, default_value_t = 3)]
    pub interval: u64,

    /// Fetch the formhash once instead of before every rating
    #[arg(long)]
    pub reuse_formhash: bool,

    /// Print what would be rated without rating
    #[arg(long)]
    pub dry_run: bool,
}

/// Refuse plans that could exceed the daily rating allowance.
fn check_budget(score: i32, max_total: u32) -> Result<()> {
    let budget = i64::from(score).abs() * i64::from(max_total);
    if budget > DAILY_CAP {
        bail!(
            "{} x {} = {} exceeds the daily rating cap of {}",
            score.abs(),
            max_total,
            budget,
            DAILY_CAP
        );
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Decision {
    /// Not eligible, or already handled.
    Skip,
    /// Eligible, but the author has had their share.
    AuthorLimit,
    /// Rate with this reason.
    Reward { reason: String },
}

/// Bookkeeping of one reward run. Nothing is persisted; a restarted run
/// starts from scratch.
///
/// Only ratings the server accepted count towards the per-author and total
/// limits.
#[derive(Debug)]
struct RewardPlan {
    score: i32,
    every: u32,
    per_user: u32,
    max_total: u32,
    me: String,
    handled: HashSet<u32>,
    failures: HashMap<u32, u32>,
    per_author: HashMap<UserId, u32>,
    total: u32,
}

impl RewardPlan {
    fn new(args: &RewardArgs, me: &str) -> Self {
        Self {
            score: args.score,
            every: args.every,
            per_user: args.per_user,
            max_total: args.max_total,
            me: me.to_string(),
            // Floor 1 is the opening post.
            handled: HashSet::from([1]),
            failures: HashMap::new(),
            per_author: HashMap::new(),
            total: 0,
        }
    }

    fn consider(&mut self, reply: &Reply) -> Decision {
        if self.handled.contains(&reply.position)
            || reply.author == self.me
            || reply.position % self.every != 0
        {
            return Decision::Skip;
        }

        let given = self.per_author.get(&reply.uid).copied().unwrap_or(0);
        if given >= self.per_user {
            self.handled.insert(reply.position);
            return Decision::AuthorLimit;
        }

        Decision::Reward {
            reason: format!(
                "[{}] {}楼奖励，当前用户已奖励{}水滴",
                self.total + 1,
                reply.position,
                i64::from(given + 1) * i64::from(self.score)
            ),
        }
    }

    /// The server accepted the rating of `reply`.
    fn rewarded(&mut self, reply: &Reply) {
        self.handled.insert(reply.position);
        *self.per_author.entry(reply.uid).or_default() += 1;
        self.total += 1;
    }

    /// The server refused the rating of `reply`. Returns `true` once the
    /// floor has used up its attempts and will not be tried again.
    fn refused(&mut self, reply: &Reply) -> bool {
        let attempts = self.failures.entry(reply.position).or_default();
        *attempts += 1;
        if *attempts >= MAX_ATTEMPTS {
            self.handled.insert(reply.position);
            true
        } else {
            false
        }
    }

    fn exhausted(&self) -> bool {
        self.total >= self.max_total
    }
}

pub async fn run(args: RewardArgs, ctx: &Context) -> Result<()> {
    check_budget(args.score, args.max_total)?;

    let mut session = ctx.connect().await?;
    let info = session
        .thread_info(args.tid)
        .await
        .with_context(|| format!("Failed to read thread {}", args.tid))?;
    output::field("Thread", &info.title);
    output::field("Created", &output::timestamp(info.created_at));

    let policy = if args.reuse_formhash {
        FormHashPolicy::Reuse
    } else {
        FormHashPolicy::Refresh
    };
    let mut plan = RewardPlan::new(&args, session.username());
    let mut page = 1;

    loop {
        match session.reply_page(args.tid, page).await {
            Ok(replies) => {
                for reply in &replies.items {
                    let reason = match plan.consider(reply) {
                        Decision::Skip => continue,
                        Decision::AuthorLimit => {
                            println!(
                                "[{}] #{} {} reached the per-author limit of {}",
                                output::now(),
                                reply.position,
                                reply.author,
                                args.per_user
                            );
                            continue;
                        }
                        Decision::Reward { reason } => reason,
                    };

                    if args.dry_run {
                        println!(
                            "[{}] would rate #{}: {}",
                            output::now(),
                            reply.position,
                            reason
                        );
                        plan.rewarded(reply);
                    } else {
                        let rated = session
                            .rate(args.tid, reply.pid, args.score, &reason, policy)
                            .await;
                        match rated {
                            Ok(()) => {
                                plan.rewarded(reply);
                                output::success(&format!(
                                    "[{}] rated #{} {} ({})",
                                    output::now(),
                                    reply.position,
                                    reply.author,
                                    reason
                                ));
                            }
                            Err(e) if e.content_message().is_some() => {
                                let dropped = plan.refused(reply);
                                output::warning(&format!("#{}: {}", reply.position, e));
                                if dropped {
                                    warn!(floor = reply.position, "Giving up on floor");
                                }
                            }
                            Err(e) => return Err(e).context("Rating failed"),
                        }
                    }

                    if plan.exhausted() {
                        output::success(&format!(
                            "Reached the total of {} rewards",
                            args.max_total
                        ));
                        return Ok(());
                    }
                }

                if replies.has_next {
                    page += 1;
                    debug!(page, "Advancing to next page");
                }
            }
            Err(e) if e.is_transient() => {
                output::warning(&format!("Page {page}: {e}"));
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read page {page}")),
        }

        let age = chrono::Utc::now().timestamp() - info.created_at;
        if age > args.time_limit {
            output::success("Reached the time limit");
            return Ok(());
        }
        info!(page, rewarded = plan.total, remaining = args.time_limit - age, "Checked");

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(args.interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Interrupted after {} rewards", plan.total);
                return Ok(());
            }
        }
    }
}

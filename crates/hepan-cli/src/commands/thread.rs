//! Thread and reply commands.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use hepan::extract::Reply;
use hepan::{PageLimit, ThreadId};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct ThreadArgs {
    /// Thread id
    pub tid: ThreadId,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RepliesArgs {
    /// Thread id
    pub tid: ThreadId,

    /// Fetch this page only
    #[arg(long, conflicts_with = "limit")]
    pub page: Option<u32>,

    /// Maximum number of pages to fetch (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: u32,

    /// Output one JSON object per reply
    #[arg(long)]
    pub json: bool,
}

pub async fn run_info(args: ThreadArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    let info = session
        .thread_info(args.tid)
        .await
        .with_context(|| format!("Failed to read thread {}", args.tid))?;

    if args.json {
        return output::json_pretty(&info);
    }

    output::heading(&info.title);
    output::field("Thread", &info.tid.to_string());
    output::field("Post", &info.pid.to_string());
    output::field("Author", &format!("{} (uid {})", info.author, info.uid));
    output::field("Created", &output::timestamp(info.created_at));
    output::field("Replies", &info.reply_count.to_string());
    if !info.first_paragraph.is_empty() {
        println!();
        println!("{}", info.first_paragraph);
    }

    Ok(())
}

pub async fn run_replies(args: RepliesArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    let replies = match args.page {
        Some(page) => {
            let page = session
                .reply_page(args.tid, page)
                .await
                .with_context(|| format!("Failed to read page {page} of thread {}", args.tid))?;
            if page.has_next {
                eprintln!("{}", "More pages follow.".dimmed());
            }
            page.items
        }
        None => session
            .replies(args.tid, PageLimit(args.limit))
            .await
            .with_context(|| format!("Failed to read replies of thread {}", args.tid))?,
    };

    if replies.is_empty() {
        eprintln!("{}", "No replies found.".dimmed());
        return Ok(());
    }

    for reply in &replies {
        if args.json {
            output::json(reply)?;
        } else {
            print_reply(reply);
        }
    }

    Ok(())
}

fn print_reply(reply: &Reply) {
    println!(
        "{} {} {} {}",
        format!("#{}", reply.position).cyan(),
        reply.author.bold(),
        format!("(uid {}, pid {})", reply.uid, reply.pid).dimmed(),
        output::timestamp(reply.time).dimmed(),
    );
    println!("{}", reply.content);
    println!();
}

//! Home page lists command.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use hepan::extract::TopPost;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct TopArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: TopArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    let top = session
        .top_posts()
        .await
        .context("Failed to read home page")?;

    if args.json {
        return output::json_pretty(&top);
    }

    for (title, posts) in [
        ("最新回复", &top.new_reply),
        ("最新发表", &top.new_post),
        ("热门", &top.hot),
        ("活动", &top.activity),
        ("直播", &top.live),
        ("秀", &top.show),
    ] {
        output::heading(title);
        print_block(posts);
        println!();
    }

    Ok(())
}

fn print_block(posts: &[TopPost]) {
    if posts.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for post in posts {
        let author = match post.uid {
            Some(uid) => format!("{} (uid {})", post.uname, uid),
            None => String::new(),
        };
        println!(
            "  {} {} {}",
            post.tid.to_string().cyan(),
            post.title,
            author.dimmed()
        );
    }
}

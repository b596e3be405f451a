//! Subcommand implementations.

mod darkroom;
mod formhash;
mod keepalive;
mod login;
mod rank;
mod rate;
mod reward;
mod tasks;
mod thread;
mod top;

use anyhow::Result;
use clap::Subcommand;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and exchange for an API authorization
    Login(login::LoginArgs),

    /// Print a fresh formhash
    Formhash(formhash::FormhashArgs),

    /// Show details of a thread
    Thread(thread::ThreadArgs),

    /// List the replies of a thread
    Replies(thread::RepliesArgs),

    /// Rate a post (give or take water drops)
    Rate(rate::RateArgs),

    /// Post a review comment under a post
    Comment(rate::CommentArgs),

    /// Show the home page thread lists
    Top(top::TopArgs),

    /// List users under moderation sanctions
    Darkroom(darkroom::DarkroomArgs),

    /// Show a ranking board
    Rank(rank::RankCommand),

    /// List tasks of the task centre
    Tasks(tasks::TasksArgs),

    /// Inspect, apply for or finish a task
    Task(tasks::TaskCommand),

    /// Reward replies of a thread as they come in
    Reward(reward::RewardArgs),

    /// Keep accounts online
    Keepalive(keepalive::KeepaliveArgs),
}

pub async fn handle(cmd: Commands, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::Login(args) => login::run(args, ctx).await,
        Commands::Formhash(args) => formhash::run(args, ctx).await,
        Commands::Thread(args) => thread::run_info(args, ctx).await,
        Commands::Replies(args) => thread::run_replies(args, ctx).await,
        Commands::Rate(args) => rate::run_rate(args, ctx).await,
        Commands::Comment(args) => rate::run_comment(args, ctx).await,
        Commands::Top(args) => top::run(args, ctx).await,
        Commands::Darkroom(args) => darkroom::run(args, ctx).await,
        Commands::Rank(cmd) => rank::handle(cmd, ctx).await,
        Commands::Tasks(args) => tasks::run_list(args, ctx).await,
        Commands::Task(cmd) => tasks::handle(cmd, ctx).await,
        Commands::Reward(args) => reward::run(args, ctx).await,
        Commands::Keepalive(args) => keepalive::run(args, ctx).await,
    }
}

//! Task centre commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use hepan::extract::TaskStatus;
use hepan::{TaskId, TaskListMode};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct TasksArgs {
    /// Which tab to list: new, doing, done
    #[arg(long, default_value_t = TaskListMode::New)]
    pub mode: TaskListMode,

    /// Output one JSON object per task
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Show a task and this account's progress
    Info {
        id: TaskId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply for a task
    Apply { id: TaskId },

    /// Claim the reward of a completed task
    Finish { id: TaskId },
}

pub async fn run_list(args: TasksArgs, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    let tasks = session
        .tasks(args.mode)
        .await
        .with_context(|| format!("Failed to list {} tasks", args.mode))?;

    if tasks.0.is_empty() {
        eprintln!("{}", format!("No {} tasks.", args.mode).dimmed());
        return Ok(());
    }

    for task in &tasks.0 {
        if args.json {
            output::json(task)?;
            continue;
        }
        println!(
            "{} {} {}",
            task.id.to_string().cyan(),
            task.name.bold(),
            task.reward.green()
        );
        println!("  {}", task.description);
    }

    Ok(())
}

pub async fn handle(cmd: TaskCommand, ctx: &Context) -> Result<()> {
    let session = ctx.connect().await?;

    match cmd.action {
        TaskAction::Info { id, json } => {
            let task = session
                .task_info(id)
                .await
                .with_context(|| format!("Failed to read task {id}"))?;

            if json {
                return output::json_pretty(&task);
            }

            output::heading(&task.name);
            output::field("Status", status_label(task.status));
            output::field("Progress", &task.progress);
            output::field("Reward", &task.reward);
            output::field("Mission", &task.mission);
            output::field("Requirement", &task.requirement);
            println!();
            println!("{}", task.description);
        }
        TaskAction::Apply { id } => {
            let message = session
                .apply_task(id)
                .await
                .with_context(|| format!("Failed to apply for task {id}"))?;
            output::success(&message);
        }
        TaskAction::Finish { id } => {
            let message = session
                .finish_task(id)
                .await
                .with_context(|| format!("Failed to finish task {id}"))?;
            output::success(&message);
        }
    }

    Ok(())
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Doing => "in progress",
        TaskStatus::Done => "done",
        TaskStatus::Applicable => "can apply",
        TaskStatus::NotApplicable => "cannot apply",
    }
}

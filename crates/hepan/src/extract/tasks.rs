//! Task centre adapters (`home.php?mod=task`).

use serde::Serialize;

use crate::error::ParseError;
use crate::types::TaskId;

use super::{Extract, attr, document, find, find_all, find_opt, text, trailing_id};

/// A task as listed in the task centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    /// Reward as displayed (e.g. `水滴 10 滴`).
    pub reward: String,
}

/// One tab of the task centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList(pub Vec<TaskSummary>);

/// Where the current account stands with a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Doing,
    Done,
    Applicable,
    NotApplicable,
}

/// Full description of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetail {
    pub name: String,
    pub description: String,
    pub reward: String,
    /// What has to be done.
    pub mission: String,
    /// Who may apply.
    pub requirement: String,
    pub status: TaskStatus,
    /// Progress text. Only tasks in progress show a percentage.
    pub progress: String,
}

/// The notice shown after applying for or drawing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMessage(pub String);

const CONTENT: &str = "div.bm.bw0";

const CANCEL_IMG: &str = "static/image/task/cancel.gif";
const REWARD_IMG: &str = "static/image/task/reward.gif";
const APPLY_IMG: &str = "static/image/task/apply.gif";

impl Extract for TaskList {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let content = find(html.root_element(), CONTENT)?;

        // An empty tab renders a message instead of a table.
        let Some(table) = find_opt(content, "table")? else {
            return Ok(TaskList(Vec::new()));
        };

        let tasks = find_all(table, "tr")?
            .into_iter()
            .map(|row| {
                let cell = find(row, "td.bbda.ptm.pbm")?;
                let link = find(cell, "a")?;
                Ok(TaskSummary {
                    id: TaskId(trailing_id(attr(link, "href")?)?),
                    name: text(link),
                    description: text(find(cell, "p")?),
                    reward: text(find(row, "td.xi1.bbda.hm")?),
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(TaskList(tasks))
    }
}

impl Extract for TaskDetail {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let content = find(html.root_element(), CONTENT)?;
        let table = find(content, "table")?;

        // Includes the rows of the nested reward table.
        let rows = find_all(table, "tr")?;
        if rows.len() < 3 {
            return Err(ParseError::missing("task detail rows"));
        }

        let header = find(rows[0], "td.bbda")?;
        let name = text(find(header, "h1.xs2.ptm.pbm")?);
        let description = find_all(header, "div")?
            .last()
            .map(|div| text(*div))
            .ok_or_else(|| ParseError::missing("task description"))?;

        let facts = find_all(find(rows[1], "table")?, "tr")?;
        let fact = |i: usize, what: &str| -> Result<String, ParseError> {
            let row = facts
                .get(i)
                .ok_or_else(|| ParseError::missing(format!("task {what}")))?;
            Ok(text(find(*row, "td.bbda")?))
        };
        let reward = fact(0, "reward")?;
        let mission = fact(1, "mission")?;
        let requirement = fact(2, "requirement")?;

        let action_row = rows[rows.len() - 2];
        let button = find_all(action_row, "img")?.last().copied();
        let (status, progress) = match button {
            Some(img) => match attr(img, "src")? {
                CANCEL_IMG | REWARD_IMG => (
                    TaskStatus::Doing,
                    text(find(action_row, r#"span[id^="csc_"]"#)?),
                ),
                src => {
                    let status = if src == APPLY_IMG {
                        TaskStatus::Applicable
                    } else {
                        TaskStatus::NotApplicable
                    };
                    (status, text(find(action_row, "p.xg2.mbn")?))
                }
            },
            None => (TaskStatus::Done, text(find(action_row, "p.xg2.mbn")?)),
        };

        Ok(TaskDetail {
            name,
            description,
            reward,
            mission,
            requirement,
            status,
            progress,
        })
    }
}

impl Extract for TaskMessage {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        let html = document(raw);
        let message = find(html.root_element(), "div#messagetext.alert_info")?;
        Ok(TaskMessage(text(message)))
    }
}

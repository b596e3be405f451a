//! Post list adapter (`/star/api/v1/post/list`).
//!
//! One endpoint feeds two records: the reply pages of a thread, and (from
//! the first row of page 1) the thread's own details.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::fetch::Page;
use crate::types::{PostId, ThreadId, UserId};

use super::Extract;

/// `data` member of a post list response.
#[derive(Debug, Clone, Deserialize)]
pub struct PostList {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub rows: Vec<PostRow>,
}

/// One row of a post list.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRow {
    pub position: u32,
    pub post_id: u64,
    pub author: String,
    pub author_id: u64,
    pub dateline: i64,
    pub message: String,
    /// Only present on the opening post.
    #[serde(default)]
    pub subject: Option<String>,
}

/// A reply within a thread.
///
/// Floor 1 of page 1 is the opening post itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Floor (display position within the thread).
    pub position: u32,
    pub pid: PostId,
    pub author: String,
    pub uid: UserId,
    /// Unix timestamp, seconds.
    pub time: i64,
    /// Message text, trimmed.
    pub content: String,
}

/// Details of a thread, taken from its opening post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadInfo {
    pub tid: ThreadId,
    pub title: String,
    /// Post id of the opening post.
    pub pid: PostId,
    /// First line of the opening post.
    pub first_paragraph: String,
    /// Number of replies, excluding the opening post.
    pub reply_count: u64,
    pub author: String,
    pub uid: UserId,
    /// Unix timestamp of the opening post, seconds.
    pub created_at: i64,
}

impl Extract for PostList {
    fn extract(raw: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl PostList {
    /// Whether rows exist beyond this page.
    pub fn has_next(&self) -> bool {
        self.total > u64::from(self.page) * u64::from(self.page_size)
    }

    /// Convert into a page of replies in strictly increasing floor order.
    ///
    /// Two rows claiming the same floor fail the page.
    pub fn into_reply_page(self) -> Result<Page<Reply>, ParseError> {
        let has_next = self.has_next();

        let mut replies: Vec<Reply> = self
            .rows
            .into_iter()
            .map(|row| Reply {
                position: row.position,
                pid: PostId(row.post_id),
                author: row.author,
                uid: UserId(row.author_id),
                time: row.dateline,
                content: row.message.trim().to_string(),
            })
            .collect();

        replies.sort_by_key(|r| r.position);
        if let Some(pair) = replies.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(ParseError::invalid(
                "reply position",
                format!("duplicate floor {}", pair[0].position),
            ));
        }

        Ok(Page::new(replies, has_next))
    }

    /// Thread details from the first row of page 1.
    pub fn thread_info(&self, tid: ThreadId) -> Result<ThreadInfo, ParseError> {
        let opening = self
            .rows
            .first()
            .ok_or_else(|| ParseError::missing("rows[0]"))?;
        let title = opening
            .subject
            .clone()
            .ok_or_else(|| ParseError::missing("rows[0].subject"))?;
        let first_paragraph = opening
            .message
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(ThreadInfo {
            tid,
            title,
            pid: PostId(opening.post_id),
            first_paragraph,
            reply_count: self.total.saturating_sub(1),
            author: opening.author.clone(),
            uid: UserId(opening.author_id),
            created_at: opening.dateline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(position: u32) -> serde_json::Value {
        json!({
            "position": position,
            "post_id": 1000 + position,
            "author": format!("user{position}"),
            "author_id": 10 + position,
            "dateline": 1_700_000_000 + i64::from(position),
            "message": format!("  floor {position}\n"),
        })
    }

    fn list(total: u64, page: u32, rows: Vec<serde_json::Value>) -> PostList {
        let raw = json!({ "total": total, "page": page, "page_size": 20, "rows": rows });
        PostList::extract(&raw.to_string()).unwrap()
    }

    #[test]
    fn has_next_compares_total_with_page_span() {
        assert!(list(41, 2, vec![]).has_next());
        assert!(!list(40, 2, vec![]).has_next());
        assert!(!list(3, 1, vec![]).has_next());
    }

    #[test]
    fn reply_page_is_sorted_and_trimmed() {
        let page = list(3, 1, vec![row(3), row(1), row(2)])
            .into_reply_page()
            .unwrap();

        let floors: Vec<u32> = page.items.iter().map(|r| r.position).collect();
        assert_eq!(floors, vec![1, 2, 3]);
        assert_eq!(page.items[0].content, "floor 1");
        assert_eq!(page.items[0].pid, PostId(1001));
        assert!(!page.has_next);
    }

    #[test]
    fn duplicate_floor_is_rejected() {
        let err = list(2, 1, vec![row(2), row(2)]).into_reply_page().unwrap_err();
        assert!(err.to_string().contains("duplicate floor 2"));
    }

    #[test]
    fn thread_info_from_opening_post() {
        let mut opening = row(1);
        opening["subject"] = json!("抢楼活动");
        opening["message"] = json!("第一段\n第二段");

        let info = list(57, 1, vec![opening, row(2)])
            .thread_info(ThreadId(2287221))
            .unwrap();

        assert_eq!(info.title, "抢楼活动");
        assert_eq!(info.first_paragraph, "第一段");
        assert_eq!(info.reply_count, 56);
        assert_eq!(info.pid, PostId(1001));
        assert_eq!(info.created_at, 1_700_000_001);
    }

    #[test]
    fn thread_info_without_subject_fails() {
        let err = list(1, 1, vec![row(1)]).thread_info(ThreadId(1)).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { .. }));
    }

    #[test]
    fn missing_field_is_fatal() {
        let raw = json!({ "total": 1, "page": 1, "rows": [] }).to_string();
        assert!(matches!(PostList::extract(&raw), Err(ParseError::Json(_))));
    }
}

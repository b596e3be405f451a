//! Validated primitive types.

mod forum_url;
mod ids;
mod views;

pub use forum_url::{DEFAULT_FORUM, ForumUrl};
pub use ids::{PostId, TaskId, ThreadId, UserId};
pub use views::{ForumRankView, PollRankView, TaskListMode, ThreadRankView, UserRankView};

//! hepan - Client library for the Qingshuihepan forum
//!
//! This library logs in to `bbs.uestc.edu.cn` (a Discuz site with a newer
//! JSON API bolted on), reads threads, replies, rankings, the darkroom and
//! the task centre into typed records, and performs the write operations
//! automation scripts need: rating posts, posting comments, applying for
//! and finishing tasks. Everything flows through a [`Session`].
//!
//! # Example
//!
//! ```no_run
//! use hepan::{Credentials, FormHashPolicy, ForumUrl, PageLimit, Session, ThreadId};
//!
//! # async fn example() -> Result<(), hepan::Error> {
//! let forum = ForumUrl::new("https://bbs.uestc.edu.cn")?;
//! let mut session = Session::connect(forum, Credentials::new("range6", "hunter2")).await?;
//!
//! let thread = ThreadId(2287221);
//! for reply in session.replies(thread, PageLimit::UNLIMITED).await? {
//!     if reply.position % 10 == 0 {
//!         session
//!             .rate(thread, reply.pid, 1, "整十楼", FormHashPolicy::Refresh)
//!             .await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod markers;
pub mod types;

mod client;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, FormHashPolicy, ReplyPages, Session};
pub use config::ClientConfig;
pub use error::Error;
pub use fetch::{Page, PageLimit, PageSource, fetch_all};
pub use types::{
    DEFAULT_FORUM, ForumRankView, ForumUrl, PollRankView, PostId, TaskId, TaskListMode, ThreadId,
    ThreadRankView, UserId, UserRankView,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Ranking views and task list modes.
//!
//! These map one to one onto the `view=` / `item=` query values of the
//! legacy pages. The `orderby=` values are open ended (e.g. `202503` for a
//! monthly popularity board) and stay plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

macro_rules! query_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $value)] $variant),+
        }

        impl $name {
            /// Returns the query string value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(InvalidInputError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }
                    .into()),
                }
            }
        }
    };
}

query_enum!(
    /// Member ranking boards (`type=member`).
    ///
    /// Common orders: credit `all`, `1` (prestige), `2` (water drops),
    /// `6` (vouchers); post `posts`, `digestposts`, `thismonth`, `today`;
    /// onlinetime `thismonth`, `all`; water `30` or a `YYYYMM` month.
    UserRankView, "user ranking view" {
        Credit => "credit",
        Post => "post",
        OnlineTime => "onlinetime",
        Water => "water",
    }
);

query_enum!(
    /// Thread ranking boards (`type=thread`); orders `all`, `thisweek`,
    /// `thismonth`, `today`.
    ThreadRankView, "thread ranking view" {
        Replies => "replies",
        Views => "views",
        FavTimes => "favtimes",
        Heats => "heats",
    }
);

query_enum!(
    /// Poll ranking boards (`type=poll`).
    PollRankView, "poll ranking view" {
        Heats => "heats",
    }
);

query_enum!(
    /// Forum section ranking boards (`type=forum`).
    ForumRankView, "forum ranking view" {
        Threads => "threads",
        Posts => "post",
        Today => "today",
    }
);

query_enum!(
    /// Which task list to show.
    TaskListMode, "task list mode" {
        /// Tasks that can be applied for.
        New => "new",
        /// Tasks in progress.
        Doing => "doing",
        /// Completed tasks.
        Done => "done",
    }
);

impl Default for TaskListMode {
    fn default() -> Self {
        TaskListMode::New
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_query_values() {
        assert_eq!("onlinetime".parse::<UserRankView>().unwrap(), UserRankView::OnlineTime);
        assert_eq!(ForumRankView::Posts.as_str(), "post");
        assert_eq!(TaskListMode::default().to_string(), "new");
    }

    #[test]
    fn unknown_value_is_invalid_input() {
        let err = "likes".parse::<ThreadRankView>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("likes"));
    }
}

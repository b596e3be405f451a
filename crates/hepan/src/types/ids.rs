//! Numeric identifiers used by the forum.
//!
//! The forum exposes plain integers for threads (`tid`), posts (`pid`),
//! tasks and users (`uid`). Wrapping them keeps a post id from being passed
//! where a thread id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

macro_rules! forum_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw integer.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self).map_err(|_| {
                    InvalidInputError::Id {
                        value: s.to_string(),
                    }
                    .into()
                })
            }
        }
    };
}

forum_id!(
    /// Thread id (`tid`).
    ThreadId
);
forum_id!(
    /// Post id (`pid`); the opening post of a thread has one too.
    PostId
);
forum_id!(
    /// Task id.
    TaskId
);
forum_id!(
    /// User id (`uid`).
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let tid: ThreadId = " 2287221 ".parse().unwrap();
        assert_eq!(tid, ThreadId(2287221));
        assert_eq!(tid.to_string(), "2287221");
    }

    #[test]
    fn rejects_non_numeric() {
        assert!("abc".parse::<PostId>().is_err());
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&UserId(7)).unwrap();
        assert_eq!(json, "7");
    }
}

//! Forum base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// The public Qingshuihepan forum.
pub const DEFAULT_FORUM: &str = "https://bbs.uestc.edu.cn";

/// A validated forum base URL.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for localhost),
/// and is normalized so endpoint paths can be appended.
///
/// # Example
///
/// ```
/// use hepan::ForumUrl;
///
/// let forum = ForumUrl::new("https://bbs.uestc.edu.cn").unwrap();
/// assert_eq!(forum.endpoint("forum.php?mod=misc"),
///            "https://bbs.uestc.edu.cn/forum.php?mod=misc");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForumUrl(Url);

impl ForumUrl {
    /// Create a new forum URL from a string, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ForumUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the absolute URL of an endpoint given relative to the forum root.
    ///
    /// `path` may carry a query string; leading slashes are ignored.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/", base)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ForumUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::ForumUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ForumUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidInputError::ForumUrl {
                value: original.to_string(),
                reason: "must not carry a query or fragment".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for ForumUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_FORUM).expect("default forum URL is valid"))
    }
}

impl fmt::Display for ForumUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ForumUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ForumUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ForumUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ForumUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_public_forum() {
        assert_eq!(ForumUrl::default().host(), Some("bbs.uestc.edu.cn"));
    }

    #[test]
    fn valid_localhost_http() {
        let forum = ForumUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(forum.endpoint("/"), "http://127.0.0.1:8080/");
    }

    #[test]
    fn endpoint_joins_with_query() {
        let forum = ForumUrl::new("https://bbs.uestc.edu.cn/").unwrap();
        assert_eq!(
            forum.endpoint("/star/api/v1/post/list?thread_id=1"),
            "https://bbs.uestc.edu.cn/star/api/v1/post/list?thread_id=1"
        );
    }

    #[test]
    fn endpoint_respects_sub_path() {
        let forum = ForumUrl::new("https://example.com/bbs").unwrap();
        assert_eq!(
            forum.endpoint("home.php?mod=task"),
            "https://example.com/bbs/home.php?mod=task"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ForumUrl::new("http://bbs.uestc.edu.cn").is_err());
    }

    #[test]
    fn invalid_with_query() {
        assert!(ForumUrl::new("https://bbs.uestc.edu.cn/?mod=x").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ForumUrl::new("/forum.php").is_err());
    }
}

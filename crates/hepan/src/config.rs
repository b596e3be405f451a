//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};
use crate::types::ForumUrl;

/// HTTP behaviour of a [`Session`](crate::Session).
///
/// Every request uses `timeout_secs`; the login form uses the shorter
/// `login_timeout_secs` so a dead login endpoint fails fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Forum base URL
    #[serde(default)]
    pub forum: ForumUrl,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout for every request, in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Timeout for the login form submission, in seconds
    #[serde(default = "defaults::login_timeout")]
    pub login_timeout_secs: u64,
}

impl ClientConfig {
    /// Default settings pointed at another forum root.
    pub fn for_forum(forum: ForumUrl) -> Self {
        Self {
            forum,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<(), Error> {
        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs must be > 0"));
        }
        if self.login_timeout_secs == 0 {
            return Err(invalid("login_timeout_secs must be > 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    InvalidInputError::Client {
        message: message.to_string(),
    }
    .into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            forum: ForumUrl::default(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            login_timeout_secs: defaults::login_timeout(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        concat!("hepan/", env!("CARGO_PKG_VERSION")).to_string()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn login_timeout() -> u64 {
        10
    }
}

//! Config file for the CLI.
//!
//! ```toml
//! [client]
//! forum = "https://bbs.uestc.edu.cn"
//! timeout_secs = 30
//!
//! [accounts]
//! range6 = "hunter2"
//!
//! [keepalive]
//! refresh_interval_secs = 120
//! login_cycle_secs = 86400
//! ```
//!
//! Every section is optional. Passwords are stored in plain text, so the
//! file should be readable by its owner only.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use hepan::ClientConfig;

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub client: ClientConfig,

    /// Username to password.
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,

    #[serde(default)]
    pub keepalive: KeepaliveConfig,
}

/// Timing of the keep-alive loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepaliveConfig {
    /// Seconds between formhash refreshes of each account
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Seconds between full re-logins of each account
    #[serde(default = "default_login_cycle")]
    pub login_cycle_secs: u64,
}

fn default_refresh_interval() -> u64 {
    120
}

fn default_login_cycle() -> u64 {
    24 * 60 * 60
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            login_cycle_secs: default_login_cycle(),
        }
    }
}

impl KeepaliveConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Refresh rounds between two re-logins; at least one.
    pub fn rounds_per_cycle(&self) -> u64 {
        (self.login_cycle_secs / self.refresh_interval_secs.max(1)).max(1)
    }
}

/// Default config file location.
pub fn default_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "hepan").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

impl CliConfig {
    /// Load the config from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; a
    /// missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_path()?, false),
        };

        if !path.exists() {
            if explicit {
                bail!("Config file {} does not exist", path.display());
            }
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CliConfig = toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        config.client.validate().context("Invalid [client] settings")?;
        if config.keepalive.refresh_interval_secs == 0 {
            bail!("keepalive.refresh_interval_secs must be > 0");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        let config = CliConfig::load(Some(file.path())).unwrap();

        assert!(config.accounts.is_empty());
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.keepalive.refresh_interval_secs, 120);
    }

    #[test]
    fn reads_accounts_and_client() {
        let file = write_config(
            r#"
[client]
forum = "http://localhost:8080"
timeout_secs = 5

[accounts]
range6 = "hunter2"
alice = "secret"
"#,
        );
        let config = CliConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.client.forum.as_str(), "http://localhost:8080/");
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.client.login_timeout_secs, 10);
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts["range6"], "hunter2");
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(CliConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn invalid_client_settings_rejected() {
        let file = write_config("[client]\ntimeout_secs = 0\n");
        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("timeout_secs"));
    }

    #[test]
    fn rounds_per_cycle() {
        let keepalive = KeepaliveConfig {
            refresh_interval_secs: 120,
            login_cycle_secs: 3600,
        };
        assert_eq!(keepalive.rounds_per_cycle(), 30);

        let keepalive = KeepaliveConfig {
            refresh_interval_secs: 600,
            login_cycle_secs: 60,
        };
        assert_eq!(keepalive.rounds_per_cycle(), 1);
    }
}

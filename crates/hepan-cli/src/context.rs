//! Resolved settings shared by all commands.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result, bail};
use colored::Colorize;

use hepan::{ClientConfig, Credentials, ForumUrl, Session};

use crate::cli::AccountArgs;
use crate::config::CliConfig;

/// The config file merged with command line overrides.
#[derive(Debug)]
pub struct Context {
    pub config: CliConfig,
    account: AccountArgs,
}

impl Context {
    pub fn load(account: AccountArgs) -> Result<Self> {
        let config = CliConfig::load(account.config.as_deref())?;
        Ok(Self { config, account })
    }

    /// Client settings with the `--forum` override applied.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut client = self.config.client.clone();
        if let Some(forum) = &self.account.forum {
            client.forum = ForumUrl::new(forum).context("Invalid forum URL")?;
        }
        Ok(client)
    }

    /// The account commands act as.
    pub fn credentials(&self) -> Result<Credentials> {
        resolve_credentials(
            &self.config.accounts,
            self.account.username.as_deref(),
            self.account.password.as_deref(),
        )
    }

    /// Every account to keep alive: the one named on the command line, or
    /// all configured accounts.
    pub fn all_credentials(&self) -> Result<Vec<Credentials>> {
        if self.account.username.is_some() {
            return Ok(vec![self.credentials()?]);
        }
        if self.config.accounts.is_empty() {
            bail!("No account configured; pass --username and --password");
        }
        Ok(self
            .config
            .accounts
            .iter()
            .map(|(username, password)| Credentials::new(username, password))
            .collect())
    }

    /// Log in as `credentials`.
    pub async fn connect_as(&self, credentials: Credentials) -> Result<Session> {
        let username = credentials.username().to_string();
        let mut session = Session::with_config(credentials, self.client_config()?)
            .context("Failed to create session")?;

        eprintln!("{}", format!("Logging in as {username}...").dimmed());
        session
            .login()
            .await
            .with_context(|| format!("Failed to log in as {username}"))?;
        Ok(session)
    }

    /// Log in as the selected account.
    pub async fn connect(&self) -> Result<Session> {
        self.connect_as(self.credentials()?).await
    }
}

fn resolve_credentials(
    accounts: &BTreeMap<String, String>,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Credentials> {
    match (username, password) {
        (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
        (Some(username), None) => accounts
            .get(username)
            .map(|password| Credentials::new(username, password))
            .with_context(|| {
                format!("No password for {username}; pass --password or add it to [accounts]")
            }),
        (None, Some(_)) => bail!("--password given without --username"),
        (None, None) => {
            let mut configured = accounts.iter();
            match (configured.next(), configured.next()) {
                (Some((username, password)), None) => Ok(Credentials::new(username, password)),
                (None, _) => bail!("No account configured; pass --username and --password"),
                (Some(_), Some(_)) => {
                    bail!("Several accounts configured; pick one with --username")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(u, p)| (u.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn command_line_wins() {
        let creds =
            resolve_credentials(&accounts(&[("alice", "a")]), Some("bob"), Some("b")).unwrap();
        assert_eq!(creds.username(), "bob");
    }

    #[test]
    fn password_looked_up_by_username() {
        let configured = accounts(&[("alice", "a"), ("bob", "b")]);
        let creds = resolve_credentials(&configured, Some("bob"), None).unwrap();
        assert_eq!(creds.username(), "bob");

        assert!(resolve_credentials(&configured, Some("carol"), None).is_err());
    }

    #[test]
    fn single_account_is_implicit() {
        let creds = resolve_credentials(&accounts(&[("alice", "a")]), None, None).unwrap();
        assert_eq!(creds.username(), "alice");
    }

    #[test]
    fn ambiguous_or_missing_account_fails() {
        let configured = accounts(&[("alice", "a"), ("bob", "b")]);
        let err = resolve_credentials(&configured, None, None).unwrap_err();
        assert!(err.to_string().contains("--username"));

        assert!(resolve_credentials(&BTreeMap::new(), None, None).is_err());
        assert!(resolve_credentials(&BTreeMap::new(), None, Some("x")).is_err());
    }
}

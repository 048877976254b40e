//! `GitIdentity` backed by the `git` binary.
//!
//! Reads go through `git config --list` (effective values, last one wins)
//! and `git config --list --show-origin` (one identity per file). Writes are
//! plain `git config <scope> key value` / `--unset` calls.

use std::path::PathBuf;
use std::process::Output;

use git_whoami::git::{COMMIT_GPG_SIGN, GPG_FORMAT, USER_EMAIL, USER_NAME, USER_SIGNING_KEY};
use git_whoami::{AuthorRecord, ConfigScope, GitIdentity, Registry, Result, WhoamiError};

/// `git config --unset` exit status when the key is not set.
const UNSET_MISSING_KEY: i32 = 5;

/// Runs `git config` in an optional working directory.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    repo: Option<PathBuf>,
}

impl GitCli {
    pub fn new(repo: Option<PathBuf>) -> Self {
        Self { repo }
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = tokio::process::Command::new("git");
        if let Some(repo) = &self.repo {
            cmd.current_dir(repo);
        }
        log::debug!("git {}", args.join(" "));
        cmd.args(args)
            .output()
            .await
            .map_err(|e| WhoamiError::Git(format!("failed to run git: {e}")))
    }

    async fn run_ok(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(WhoamiError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn set(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        self.run_ok(&["config", scope.flag(), key, value]).await?;
        Ok(())
    }

    async fn unset(&self, scope: ConfigScope, key: &str, value: Option<&str>) -> Result<()> {
        let mut args = vec!["config", scope.flag(), "--unset", key];
        args.extend(value);
        let output = self.run(&args).await?;
        match output.status.code() {
            Some(0) | Some(UNSET_MISSING_KEY) => Ok(()),
            _ => Err(WhoamiError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

impl GitIdentity for GitCli {
    async fn current_author(&self) -> Result<AuthorRecord> {
        let listing = self.run_ok(&["config", "--list"]).await?;
        Ok(effective_author(&listing))
    }

    async fn available_authors(&self) -> Result<Registry> {
        let listing = self.run_ok(&["config", "--list", "--show-origin"]).await?;
        Ok(authors_by_origin(&listing))
    }

    async fn save(&self, record: &AuthorRecord, scope: ConfigScope) -> Result<()> {
        if !record.email.is_empty() {
            self.set(scope, USER_EMAIL, &record.email).await?;
        }
        if let Some(name) = record.name() {
            self.set(scope, USER_NAME, name).await?;
        }

        match record.signing_key() {
            Some(key) => {
                self.set(scope, USER_SIGNING_KEY, key).await?;
                self.set(scope, GPG_FORMAT, "ssh").await?;
                self.set(scope, COMMIT_GPG_SIGN, "true").await?;
            }
            None => {
                self.unset(scope, USER_SIGNING_KEY, None).await?;
                self.unset(scope, GPG_FORMAT, Some("ssh")).await?;
                self.unset(scope, COMMIT_GPG_SIGN, Some("true")).await?;
            }
        }
        Ok(())
    }
}

/// Split a `key=value` line. Keys are lowercased as git prints them.
fn split_entry(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_ascii_lowercase(), value))
}

/// Identity in effect according to `git config --list`.
pub fn effective_author(listing: &str) -> AuthorRecord {
    let mut record = AuthorRecord::default();
    for (key, value) in listing.lines().filter_map(split_entry) {
        match key.as_str() {
            USER_NAME => record.name = Some(value.to_string()),
            USER_EMAIL => record.email = value.to_string(),
            USER_SIGNING_KEY => record.private_key_path = Some(value.to_string()),
            _ => {}
        }
    }
    record.private_key_path = record.signing_key().map(str::to_string);
    record
}

/// One identity per origin file in `git config --list --show-origin`.
///
/// Files lacking either name or email contribute nothing. When several files
/// share an email, the later file (higher precedence) wins.
pub fn authors_by_origin(listing: &str) -> Registry {
    let mut origins: Vec<(&str, AuthorRecord)> = Vec::new();

    for line in listing.lines() {
        let Some((origin, entry)) = line.split_once('\t') else {
            continue;
        };
        let Some((key, value)) = split_entry(entry) else {
            continue;
        };

        let index = match origins.iter().position(|(o, _)| *o == origin) {
            Some(index) => index,
            None => {
                origins.push((origin, AuthorRecord::default()));
                origins.len() - 1
            }
        };
        let record = &mut origins[index].1;
        match key.as_str() {
            USER_NAME => record.name = Some(value.to_string()),
            USER_EMAIL => record.email = value.to_string(),
            USER_SIGNING_KEY => record.private_key_path = Some(value.to_string()),
            _ => {}
        }
    }

    let mut registry = Registry::new();
    for (_, mut record) in origins {
        if !record.is_usable() {
            continue;
        }
        record.private_key_path = record.signing_key().map(str::to_string);
        registry.insert(record.email.clone(), record);
    }
    registry
}

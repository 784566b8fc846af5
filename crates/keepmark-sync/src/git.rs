//! Git sink for the archive repository.
//!
//! Drives the `git` binary as a subprocess. The SSH command, when
//! configured, is passed per invocation via `GIT_SSH_COMMAND` on the
//! child process environment; nothing mutates the parent environment.
//! One working copy, one branch: callers serialize commit/push globally.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use keepmark_core::{Config, Error, Result, VcsSink};

/// Git-backed [`VcsSink`].
pub struct GitSink {
    repo_dir: PathBuf,
    remote_url: String,
    remote: String,
    branch: String,
    base_branch: String,
    ssh_command: Option<String>,
}

impl GitSink {
    /// Create a sink from sync configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            repo_dir: config.repo_dir.clone(),
            remote_url: config.repo_remote_url.clone(),
            remote: config.git_remote.clone(),
            branch: config.git_branch.clone(),
            base_branch: config.git_base_branch.clone(),
            ssh_command: config.git_ssh_command.clone(),
        }
    }

    fn command(&self, args: &[&str], cwd: &PathBuf) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(cwd);
        if let Some(ref ssh) = self.ssh_command {
            cmd.env("GIT_SSH_COMMAND", ssh);
        }
        cmd
    }

    /// Run git in the working copy, failing on a non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<String> {
        self.run_in(args, &self.repo_dir).await
    }

    async fn run_in(&self, args: &[&str], cwd: &PathBuf) -> Result<String> {
        let output = self
            .command(args, cwd)
            .output()
            .await
            .map_err(|e| Error::Vcs(format!("git {}: {}", args.join(" "), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Vcs(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// True when `git diff --cached --quiet` reports staged changes.
    async fn has_staged_changes(&self) -> Result<bool> {
        let status = self
            .command(&["diff", "--cached", "--quiet"], &self.repo_dir)
            .status()
            .await
            .map_err(|e| Error::Vcs(format!("git diff: {}", e)))?;
        // Exit code 1 means the staged diff is non-empty.
        Ok(!status.success())
    }

    /// True when the configured branch exists locally or on the remote.
    /// Matches whole branch names, so similarly named branches never
    /// satisfy the check.
    async fn branch_exists(&self) -> Result<bool> {
        let listing = self
            .run(&["branch", "-a", "--format=%(refname:short)"])
            .await?;
        let remote_branch = format!("{}/{}", self.remote, self.branch);
        Ok(listing
            .lines()
            .map(str::trim)
            .any(|name| name == self.branch || name == remote_branch))
    }

    /// Check the configured branch out, creating it from the base branch
    /// (and pushing upstream) if it does not exist anywhere yet.
    async fn checkout_branch(&self) -> Result<()> {
        if self.branch_exists().await? {
            self.run(&["checkout", &self.branch]).await?;
            if let Err(e) = self.run(&["pull", &self.remote, &self.branch]).await {
                // The branch may exist locally only; push establishes it.
                warn!("Pull of {} failed, continuing: {}", self.branch, e);
            }
        } else {
            self.run(&["checkout", &self.base_branch]).await?;
            self.run(&["pull", &self.remote, &self.base_branch]).await?;
            self.run(&["checkout", "-b", &self.branch]).await?;
            self.run(&["push", "-u", &self.remote, &self.branch]).await?;
            info!(branch = %self.branch, "Created export branch");
        }
        Ok(())
    }
}

#[async_trait]
impl VcsSink for GitSink {
    async fn ensure_local_copy(&self) -> Result<()> {
        if self.repo_dir.join(".git").exists() {
            debug!(dir = %self.repo_dir.display(), "Found existing working copy, pulling");
            self.run(&["pull"]).await?;
            return Ok(());
        }

        info!(
            dir = %self.repo_dir.display(),
            "No working copy found, cloning"
        );
        if let Some(parent) = self.repo_dir.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Vcs(format!("Cannot create {}: {}", parent.display(), e)))?;
        }
        let dir = self
            .repo_dir
            .to_str()
            .ok_or_else(|| Error::Vcs("Repository path is not valid UTF-8".to_string()))?;
        self.run_in(
            &["clone", &self.remote_url, dir],
            &PathBuf::from("."),
        )
        .await?;
        Ok(())
    }

    async fn commit_and_push(&self, message: &str) -> Result<()> {
        self.checkout_branch().await?;
        self.run(&["add", "--all"]).await?;

        if !self.has_staged_changes().await? {
            debug!("Nothing staged, skipping commit");
        } else {
            self.run(&["commit", "-m", message]).await?;
        }

        self.run(&["push", &self.remote, &self.branch]).await?;
        info!(branch = %self.branch, "Pushed archive changes");
        Ok(())
    }
}

//! GitHub access: changed files, the base branch, and PR comments.
//!
//! [`PullRequestHost`] is the seam the report publisher talks to. [`GhCli`]
//! implements it with `gh api`, which picks up `GH_TOKEN`/`GITHUB_TOKEN`
//! from the environment.

use std::{io, process::Command};

use serde::Deserialize;
use tracing::debug;

/// Errors talking to GitHub.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("failed to run gh: {0}")]
    Spawn(#[from] io::Error),

    #[error("gh {command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("unexpected gh output: {0}")]
    Json(#[from] serde_json::Error),
}

/// A top-level comment on a PR.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
}

/// What the report needs from the code host.
pub trait PullRequestHost {
    /// Paths changed by the PR, in the order the host reports them.
    fn changed_files(&self, pr: u64) -> Result<Vec<String>, GitHubError>;

    /// Changed paths that still exist at the PR head. Deleted files are left out.
    fn present_files(&self, pr: u64) -> Result<Vec<String>, GitHubError> {
        self.changed_files(pr)
    }

    /// The branch the PR targets.
    fn base_branch(&self, pr: u64) -> Result<String, GitHubError>;

    /// Top-level comments on the PR, oldest first.
    fn comments(&self, pr: u64) -> Result<Vec<IssueComment>, GitHubError>;

    fn create_comment(&self, pr: u64, body: &str) -> Result<(), GitHubError>;

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), GitHubError>;
}

/// [`PullRequestHost`] backed by the `gh` CLI.
#[derive(Debug, Clone, Default)]
pub struct GhCli {
    /// `owner/name`. When unset, `gh` resolves the repository from the working directory.
    repository: Option<String>,
}

impl GhCli {
    pub fn new(repository: Option<String>) -> Self {
        Self { repository }
    }

    /// Run `gh` with the given args and return stdout.
    fn gh(&self, args: &[&str]) -> Result<String, GitHubError> {
        debug!(args = %args.join(" "), "running gh");

        let mut command = Command::new("gh");
        command.args(args);
        if let Some(repo) = &self.repository {
            command.env("GH_REPO", repo);
        }

        let output = command.output()?;
        if !output.status.success() {
            return Err(GitHubError::Failed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn pull_files(&self, pr: u64) -> Result<Vec<GhChangedFile>, GitHubError> {
        let endpoint = format!("repos/{{owner}}/{{repo}}/pulls/{pr}/files?per_page=100");
        let output = self.gh(&["api", "--paginate", &endpoint])?;
        parse_pages(&output)
    }
}

/// JSON shape for `pulls/{n}/files` entries.
#[derive(Deserialize)]
struct GhChangedFile {
    filename: String,
    #[serde(default)]
    status: String,
}

fn without_removed(files: Vec<GhChangedFile>) -> Vec<String> {
    files
        .into_iter()
        .filter(|f| f.status != "removed")
        .map(|f| f.filename)
        .collect()
}

/// JSON shape for `pulls/{n}`, trimmed to the base ref.
#[derive(Deserialize)]
struct GhPullRequest {
    base: GhRef,
}

#[derive(Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    name: String,
}

/// Parse `gh api --paginate` output: one JSON array per page, back to back.
fn parse_pages<T: for<'de> Deserialize<'de>>(output: &str) -> Result<Vec<T>, GitHubError> {
    let mut items = Vec::new();
    for page in serde_json::Deserializer::from_str(output).into_iter::<Vec<T>>() {
        items.extend(page?);
    }
    Ok(items)
}

impl PullRequestHost for GhCli {
    fn changed_files(&self, pr: u64) -> Result<Vec<String>, GitHubError> {
        let files = self.pull_files(pr)?;
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    fn present_files(&self, pr: u64) -> Result<Vec<String>, GitHubError> {
        Ok(without_removed(self.pull_files(pr)?))
    }

    fn base_branch(&self, pr: u64) -> Result<String, GitHubError> {
        let endpoint = format!("repos/{{owner}}/{{repo}}/pulls/{pr}");
        let output = self.gh(&["api", &endpoint])?;
        let pull: GhPullRequest = serde_json::from_str(&output)?;
        Ok(pull.base.name)
    }

    fn comments(&self, pr: u64) -> Result<Vec<IssueComment>, GitHubError> {
        let endpoint = format!("repos/{{owner}}/{{repo}}/issues/{pr}/comments?per_page=100");
        let output = self.gh(&["api", "--paginate", &endpoint])?;
        parse_pages(&output)
    }

    fn create_comment(&self, pr: u64, body: &str) -> Result<(), GitHubError> {
        let endpoint = format!("repos/{{owner}}/{{repo}}/issues/{pr}/comments");
        let field = format!("body={body}");
        self.gh(&["api", "--method", "POST", &endpoint, "-f", &field])?;
        Ok(())
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), GitHubError> {
        let endpoint = format!("repos/{{owner}}/{{repo}}/issues/comments/{comment_id}");
        let field = format!("body={body}");
        self.gh(&["api", "--method", "PATCH", &endpoint, "-f", &field])?;
        Ok(())
    }
}

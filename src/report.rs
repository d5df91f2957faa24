//! Publishing sections of the report comment.
//!
//! Each run re-reads the PR's comments, reconciles one section into the
//! report comment's body, and writes it back only when something changed.
//! Concurrent runs race; the last writer wins.

use tracing::info;

use crate::comment::{self, IDENTIFIER, SectionKind};
use crate::github::{GitHubError, IssueComment, PullRequestHost};

/// What publishing a section did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No report comment exists and there was nothing to say.
    Skipped,
    /// The reconciled body equals the current one.
    Unchanged,
    Created,
    Updated,
    /// Dry run: the body that would have been written.
    Preview(String),
}

/// The report comment among a PR's comments: the first one carrying the identifier.
pub fn find_report(comments: &[IssueComment]) -> Option<&IssueComment> {
    comments.iter().find(|c| c.body.contains(IDENTIFIER))
}

/// Set `kind`'s section of the report on `pr` to `content`.
///
/// Empty content removes the section. The comment is created the first time
/// there is something to report and is never deleted.
pub fn publish_section(
    host: &impl PullRequestHost,
    pr: u64,
    kind: SectionKind,
    content: &str,
    dry_run: bool,
) -> Result<Outcome, GitHubError> {
    let comments = host.comments(pr)?;
    let existing = find_report(&comments);

    if existing.is_none() && content.trim().is_empty() {
        info!(pr, section = kind.label(), "nothing to report");
        return Ok(Outcome::Skipped);
    }

    let body = comment::reconcile(existing.map(|c| c.body.as_str()), kind, content);

    if existing.is_some_and(|c| c.body == body) {
        info!(pr, section = kind.label(), "report already up to date");
        return Ok(Outcome::Unchanged);
    }

    if dry_run {
        return Ok(Outcome::Preview(body));
    }

    match existing {
        Some(report) => {
            host.update_comment(report.id, &body)?;
            info!(pr, comment = report.id, section = kind.label(), "updated report");
            Ok(Outcome::Updated)
        }
        None => {
            host.create_comment(pr, &body)?;
            info!(pr, section = kind.label(), "created report");
            Ok(Outcome::Created)
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`PullRequestHost`] for tests.

    use std::cell::RefCell;

    use crate::github::{GitHubError, IssueComment, PullRequestHost};

    #[derive(Debug, Default)]
    pub struct FakeHost {
        pub files: Vec<String>,
        pub removed: Vec<String>,
        pub base: String,
        pub comments: RefCell<Vec<IssueComment>>,
        pub writes: RefCell<usize>,
    }

    impl FakeHost {
        pub fn new(base: &str, files: &[&str]) -> Self {
            Self {
                files: files.iter().map(ToString::to_string).collect(),
                base: base.to_string(),
                ..Self::default()
            }
        }

        /// Record `path` as changed by deleting it.
        pub fn with_removed(mut self, path: &str) -> Self {
            self.files.push(path.to_string());
            self.removed.push(path.to_string());
            self
        }

        pub fn with_comment(self, id: u64, body: &str) -> Self {
            self.comments.borrow_mut().push(IssueComment {
                id,
                body: body.to_string(),
            });
            self
        }

        pub fn body(&self, id: u64) -> Option<String> {
            self.comments
                .borrow()
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.body.clone())
        }
    }

    impl PullRequestHost for FakeHost {
        fn changed_files(&self, _pr: u64) -> Result<Vec<String>, GitHubError> {
            Ok(self.files.clone())
        }

        fn present_files(&self, _pr: u64) -> Result<Vec<String>, GitHubError> {
            Ok(self
                .files
                .iter()
                .filter(|f| !self.removed.contains(f))
                .cloned()
                .collect())
        }

        fn base_branch(&self, _pr: u64) -> Result<String, GitHubError> {
            Ok(self.base.clone())
        }

        fn comments(&self, _pr: u64) -> Result<Vec<IssueComment>, GitHubError> {
            Ok(self.comments.borrow().clone())
        }

        fn create_comment(&self, _pr: u64, body: &str) -> Result<(), GitHubError> {
            let mut comments = self.comments.borrow_mut();
            let id = comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            comments.push(IssueComment {
                id,
                body: body.to_string(),
            });
            *self.writes.borrow_mut() += 1;
            Ok(())
        }

        fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), GitHubError> {
            let mut comments = self.comments.borrow_mut();
            if let Some(comment) = comments.iter_mut().find(|c| c.id == comment_id) {
                comment.body = body.to_string();
            }
            *self.writes.borrow_mut() += 1;
            Ok(())
        }
    }
}

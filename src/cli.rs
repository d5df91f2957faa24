//! CLI interface for Cerebrus.
//!
//! One subcommand per validator. Each one gathers its inputs (from flags or
//! from GitHub), runs the pure check, and publishes its own section of the
//! report comment.
//!
//! ```text
//! cerebrus paths --pr 42
//! cerebrus change-notes --pr 42 --root .
//! cerebrus needs-change-note --file core/boot.js
//! cerebrus build-size --pr 42 --base-file base/empty.html --pr-file pr/empty.html
//! ```

mod format;

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::build_size::{self, SizeComparison};
use crate::change_note::{self, ReleasesInfo};
use crate::comment::SectionKind;
use crate::config::{Config, Context};
use crate::github::{GhCli, PullRequestHost};
use crate::report;
use crate::rules::{self, Severity};

use format::{format_needs_change_note, format_outcome, format_validation};

/// Cerebrus: PR path rules, change-note validation, and build-size reports.
#[derive(Debug, Parser)]
#[command(name = "cerebrus", version)]
pub struct Cli {
    /// Config file. Defaults to `.github/cerebrus.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository as `owner/name`.
    #[arg(long, global = true, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// Print the report comment instead of writing it.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Debug logging (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check the changed paths against the branch rules.
    Paths {
        #[command(flatten)]
        target: PrArgs,

        /// Base branch. Fetched from the PR when omitted.
        #[arg(long)]
        base: Option<String>,

        #[command(flatten)]
        files: FileArgs,
    },

    /// Validate the change notes and impact notes added by the PR.
    ChangeNotes {
        #[command(flatten)]
        target: PrArgs,

        #[command(flatten)]
        files: FileArgs,

        /// Root of the checked-out PR.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Print whether the changed files call for a change note.
    NeedsChangeNote {
        /// PR to fetch the changed files from, when no files are given.
        #[arg(long, env = "PR_NUMBER")]
        pr: Option<u64>,

        #[command(flatten)]
        files: FileArgs,

        /// Print JSON instead of `true`/`false`.
        #[arg(long)]
        json: bool,
    },

    /// Report how the PR changes the size of a build artifact.
    BuildSize {
        #[command(flatten)]
        target: PrArgs,

        /// Artifact name shown in the report.
        #[arg(long, default_value = "empty.html")]
        artifact: String,

        /// Artifact size from the base branch, in bytes.
        #[arg(long, conflicts_with = "base_file", requires = "pr_size")]
        base_size: Option<u64>,

        /// Artifact size from the PR, in bytes.
        #[arg(long, conflicts_with = "pr_file", requires = "base_size")]
        pr_size: Option<u64>,

        /// Artifact built from the base branch.
        #[arg(long, requires = "pr_file")]
        base_file: Option<PathBuf>,

        /// Artifact built from the PR.
        #[arg(long, requires = "base_file")]
        pr_file: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct PrArgs {
    /// Pull request number.
    #[arg(long, env = "PR_NUMBER")]
    pr: u64,
}

/// Changed files given on the command line instead of fetched from GitHub.
#[derive(Debug, Args)]
struct FileArgs {
    /// A changed file. Repeatable.
    #[arg(long = "file")]
    files: Vec<String>,

    /// Read changed files from this file, one per line.
    #[arg(long)]
    files_from: Option<PathBuf>,
}

impl FileArgs {
    /// The files given on the command line, or `None` to fetch them.
    fn given(&self) -> Result<Option<Vec<String>>, String> {
        let mut files = self.files.clone();
        if let Some(path) = &self.files_from {
            let contents = fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            files.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            );
        }

        if files.is_empty() && self.files_from.is_none() {
            Ok(None)
        } else {
            Ok(Some(files))
        }
    }

    fn resolve(&self, host: &impl PullRequestHost, pr: u64) -> Result<Vec<String>, String> {
        match self.given()? {
            Some(files) => Ok(files),
            None => host
                .changed_files(pr)
                .map_err(|e| format!("failed to list changed files of PR #{pr}: {e}")),
        }
    }

    /// Like [`FileArgs::resolve`], but files the PR deletes are dropped when fetched.
    fn resolve_present(
        &self,
        host: &impl PullRequestHost,
        pr: u64,
    ) -> Result<Vec<String>, String> {
        match self.given()? {
            Some(files) => Ok(files),
            None => host
                .present_files(pr)
                .map_err(|e| format!("failed to list changed files of PR #{pr}: {e}")),
        }
    }
}

/// Whether the checks passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Passed,
    Failed,
}

/// `--repo` (or `GITHUB_REPOSITORY`) wins over the config file.
fn repository(flag: Option<String>, config: &Config) -> Option<String> {
    flag.or_else(|| config.repository.clone())
}

/// Run the parsed CLI, returning an error message on failure.
pub fn run(cli: Cli) -> Result<Status, String> {
    let config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let host = GhCli::new(repository(cli.repo, &config));
    let dry_run = cli.dry_run;

    let context = |pr: u64, root: PathBuf| Context {
        pr,
        root,
        dry_run,
    };

    match cli.command {
        Command::Paths {
            target,
            base,
            files,
        } => cmd_paths(
            &config,
            &context(target.pr, PathBuf::from(".")),
            &host,
            base,
            &files,
        ),
        Command::ChangeNotes {
            target,
            files,
            root,
        } => cmd_change_notes(&config, &context(target.pr, root), &host, &files),
        Command::NeedsChangeNote { pr, files, json } => {
            cmd_needs_change_note(&host, pr, &files, json)
        }
        Command::BuildSize {
            target,
            artifact,
            base_size,
            pr_size,
            base_file,
            pr_file,
        } => {
            let sizes = match (base_size, pr_size, base_file, pr_file) {
                (Some(base), Some(pr), _, _) => SizeComparison::new(base, pr),
                (_, _, Some(base), Some(pr)) => {
                    let size = |path: &PathBuf| {
                        build_size::artifact_size(path)
                            .map_err(|e| format!("failed to read {}: {e}", path.display()))
                    };
                    SizeComparison::new(size(&base)?, size(&pr)?)
                }
                _ => {
                    return Err(
                        "give either --base-size and --pr-size, or --base-file and --pr-file"
                            .to_string(),
                    );
                }
            };
            cmd_build_size(&context(target.pr, PathBuf::from(".")), &host, &artifact, sizes)
        }
    }
}

fn cmd_paths(
    config: &Config,
    context: &Context,
    host: &impl PullRequestHost,
    base: Option<String>,
    files: &FileArgs,
) -> Result<Status, String> {
    let files = files.resolve(host, context.pr)?;
    let base = match base {
        Some(base) => base,
        None => host
            .base_branch(context.pr)
            .map_err(|e| format!("failed to read base branch of PR #{}: {e}", context.pr))?,
    };

    info!(pr = context.pr, base = %base, files = files.len(), "checking path rules");
    let evaluation = rules::evaluate(&base, &files, &rules::canonical_rules());

    for m in &evaluation.matches {
        match m.severity {
            Severity::Error => warn!(rule = m.id, name = m.name, "path rule failed"),
            Severity::Warning => info!(rule = m.id, name = m.name, "path rule warning"),
        }
    }

    publish(context, host, SectionKind::PathRules, &evaluation.render())?;

    let failed =
        evaluation.has_errors() || (config.fail_on_warnings && !evaluation.is_clean());
    Ok(if failed { Status::Failed } else { Status::Passed })
}

fn cmd_change_notes(
    config: &Config,
    context: &Context,
    host: &impl PullRequestHost,
    files: &FileArgs,
) -> Result<Status, String> {
    let releases = ReleasesInfo::load(&context.root.join(&config.releases_info))
        .map_err(|e| e.to_string())?;

    let changed = files.resolve(host, context.pr)?;
    let present = files.resolve_present(host, context.pr)?;
    let result = change_note::validate(&present, &releases, |path| {
        fs::read_to_string(context.root.join(path)).ok()
    });
    eprintln!("{}", format_validation(&result));

    let needs_note = change_note::check_needs_change_note(&changed);
    let content = change_note::render_report(&result, needs_note);
    publish(context, host, SectionKind::ChangeNotes, &content)?;

    Ok(if result.success {
        Status::Passed
    } else {
        Status::Failed
    })
}

fn cmd_needs_change_note(
    host: &impl PullRequestHost,
    pr: Option<u64>,
    files: &FileArgs,
    json: bool,
) -> Result<Status, String> {
    let files = match (files.given()?, pr) {
        (Some(files), _) => files,
        (None, Some(pr)) => files.resolve(host, pr)?,
        (None, None) => return Err("give --pr, --file, or --files-from".to_string()),
    };

    let needs = change_note::check_needs_change_note(&files);
    println!("{}", format_needs_change_note(needs, files.len(), json));
    Ok(Status::Passed)
}

fn cmd_build_size(
    context: &Context,
    host: &impl PullRequestHost,
    artifact: &str,
    sizes: SizeComparison,
) -> Result<Status, String> {
    info!(
        base = sizes.base,
        pr = sizes.pr,
        diff = sizes.diff(),
        "compared build sizes"
    );
    publish(context, host, SectionKind::BuildSize, &sizes.render(artifact))?;
    Ok(Status::Passed)
}

/// Publish one section, printing the body on a dry run.
fn publish(
    context: &Context,
    host: &impl PullRequestHost,
    kind: SectionKind,
    content: &str,
) -> Result<(), String> {
    let outcome = report::publish_section(host, context.pr, kind, content, context.dry_run)
        .map_err(|e| format!("failed to publish {} report: {e}", kind.label()))?;

    if let report::Outcome::Preview(body) = &outcome {
        println!("{body}");
    }
    eprintln!("{}", format_outcome(kind, &outcome, context.pr));
    Ok(())
}

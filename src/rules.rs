//! Path rules: declarative checks over a PR's base branch and changed files.
//!
//! Rules run in list order. A matching rule contributes its message; a
//! matching rule with `stop_processing` ends the pass early.

mod catalog;

pub use catalog::{DEVELOPMENT_BRANCH, DOCS_BRANCH, canonical_rules};

use tracing::debug;

/// How serious a rule match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The PR should not be merged as-is.
    Error,
    /// Worth a second look, not blocking.
    Warning,
}

/// A single path rule.
///
/// `condition` must be pure and total: any branch name, any (possibly empty)
/// file list.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: u32,
    pub name: &'static str,
    pub condition: fn(&str, &[String]) -> bool,
    /// Markdown message. `{base_branch}` is substituted when rendered.
    pub message: &'static str,
    pub severity: Severity,
    pub stop_processing: bool,
}

impl Rule {
    fn render_message(&self, base_branch: &str) -> String {
        self.message.replace("{base_branch}", base_branch)
    }
}

/// A rule that matched during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub id: u32,
    pub name: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub matches: Vec<RuleMatch>,

    /// A matching rule stopped the pass before every rule was consulted.
    pub aborted: bool,
}

impl Evaluation {
    pub fn messages(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.message.as_str()).collect()
    }

    pub fn matched_ids(&self) -> Vec<u32> {
        self.matches.iter().map(|m| m.id).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.matches.iter().any(|m| m.severity == Severity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }

    /// Render the matches as the Markdown body of the path section.
    ///
    /// A clean evaluation renders to an empty string so the section is
    /// removed from the report.
    pub fn render(&self) -> String {
        if self.matches.is_empty() {
            return String::new();
        }

        let mut out = String::from("### Path validation\n");
        for m in &self.matches {
            let marker = match m.severity {
                Severity::Error => ":x:",
                Severity::Warning => ":warning:",
            };
            out.push('\n');
            out.push_str(&format!("{marker} {}", m.message));
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

/// A PR consisting of a single `licenses/` file against the CLA branch is a
/// CLA signature and skips path validation entirely.
pub fn is_cla_signature(base_branch: &str, changed_files: &[String]) -> bool {
    base_branch == DOCS_BRANCH
        && matches!(changed_files, [only] if only.starts_with("licenses/"))
}

/// Run `rules` in order against the base branch and changed files.
pub fn evaluate(base_branch: &str, changed_files: &[String], rules: &[Rule]) -> Evaluation {
    let mut evaluation = Evaluation::default();

    if is_cla_signature(base_branch, changed_files) {
        debug!(base_branch, "CLA signature, skipping path rules");
        return evaluation;
    }

    for rule in rules {
        let matched = (rule.condition)(base_branch, changed_files);
        debug!(rule = rule.id, name = rule.name, matched, "evaluated path rule");

        if !matched {
            continue;
        }

        evaluation.matches.push(RuleMatch {
            id: rule.id,
            name: rule.name,
            severity: rule.severity,
            message: rule.render_message(base_branch),
        });

        if rule.stop_processing {
            evaluation.aborted = true;
            break;
        }
    }

    evaluation
}

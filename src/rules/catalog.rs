//! The canonical path rules, in evaluation order.
//!
//! Rule ids are stable: they appear in logs and tests.

use super::{Rule, Severity};

/// Branch that publishes the tiddlywiki.com documentation.
pub const DOCS_BRANCH: &str = "tiddlywiki-com";

/// Branch that receives code changes.
pub const DEVELOPMENT_BRANCH: &str = "master";

/// Files generated from the documentation edition. Matched exactly.
const GENERATED_FILES: &[&str] = &[
    "readme.md",
    "/readme.md",
    "bin/readme.md",
    "/bin/readme.md",
    "contributing.md",
    "/contributing.md",
    "license",
    "/license",
];

fn is_edition(path: &str) -> bool {
    path.starts_with("editions/")
}

fn is_license(path: &str) -> bool {
    path.starts_with("licenses/")
}

/// Only documentation (and CLA files, which rule 3 owns) may target the docs branch.
fn code_on_docs_branch(base_branch: &str, changed_files: &[String]) -> bool {
    base_branch == DOCS_BRANCH
        && !changed_files
            .iter()
            .all(|f| is_edition(f) || is_license(f))
}

fn docs_on_development_branch(base_branch: &str, changed_files: &[String]) -> bool {
    base_branch == DEVELOPMENT_BRANCH
        && !changed_files.is_empty()
        && changed_files.iter().all(|f| is_edition(f))
}

fn misplaced_cla(base_branch: &str, changed_files: &[String]) -> bool {
    changed_files.iter().any(|f| is_license(f))
        && (base_branch != DOCS_BRANCH || changed_files.len() > 1)
}

fn generated_files_touched(_base_branch: &str, changed_files: &[String]) -> bool {
    changed_files
        .iter()
        .any(|f| GENERATED_FILES.contains(&f.as_str()))
}

/// The rule set every PR is checked against.
pub fn canonical_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: 1,
            name: "editions-only-on-docs-branch",
            condition: code_on_docs_branch,
            message: "This PR targets `{base_branch}`, which only accepts changes under \
                      `editions/`. Please retarget it to `master` or split out the \
                      documentation changes.",
            severity: Severity::Error,
            stop_processing: true,
        },
        Rule {
            id: 2,
            name: "docs-on-development-branch",
            condition: docs_on_development_branch,
            message: "This PR only changes documentation under `editions/`. Consider \
                      targeting the `tiddlywiki-com` branch so the changes are published \
                      straight away.",
            severity: Severity::Warning,
            stop_processing: false,
        },
        Rule {
            id: 3,
            name: "cla-signature",
            condition: misplaced_cla,
            message: "This PR changes a file under `licenses/`. Signing the Contributor \
                      License Agreement should be a separate PR against `tiddlywiki-com` \
                      that touches only your CLA line.",
            severity: Severity::Warning,
            stop_processing: true,
        },
        Rule {
            id: 4,
            name: "generated-files",
            condition: generated_files_touched,
            message: "This PR edits a file that is generated from the documentation \
                      edition (`readme.md`, `bin/readme.md`, `contributing.md` or \
                      `license`). Edit the corresponding tiddlers under `editions/` instead.",
            severity: Severity::Error,
            stop_processing: false,
        },
    ]
}

//! Output formatting for CLI display.

use serde::Serialize;

use crate::change_note::ValidationResult;
use crate::comment::SectionKind;
use crate::report::Outcome;

/// One line describing what happened to the report.
pub(super) fn format_outcome(kind: SectionKind, outcome: &Outcome, pr: u64) -> String {
    let what = match outcome {
        Outcome::Skipped => "nothing to report",
        Outcome::Unchanged => "report unchanged",
        Outcome::Created => "created report",
        Outcome::Updated => "updated report",
        Outcome::Preview(_) => "dry run, report not written",
    };
    format!("PR #{pr} [{}]: {what}", kind.label())
}

/// Console summary of a change-note validation.
pub(super) fn format_validation(result: &ValidationResult) -> String {
    if result.success {
        return format!("{} release note(s) valid", result.notes.len());
    }

    let mut out = format!("{} file(s) with issues", result.errors.len());
    for file in &result.errors {
        out.push_str(&format!("\n  {}", file.file));
        for issue in &file.issues {
            out.push_str(&format!("\n    - {issue}"));
        }
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NeedsChangeNote {
    needs_change_note: bool,
    files_checked: usize,
}

/// `true`/`false`, or a JSON object when `json` is set.
pub(super) fn format_needs_change_note(needs: bool, files_checked: usize, json: bool) -> String {
    if !json {
        return needs.to_string();
    }
    serde_json::to_string(&NeedsChangeNote {
        needs_change_note: needs,
        files_checked,
    })
    .unwrap_or_else(|_| needs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::change_note::FileIssues;

    #[test]
    fn format_outcomes() {
        let cases = [
            (Outcome::Skipped, "PR #3 [path rules]: nothing to report"),
            (Outcome::Unchanged, "PR #3 [path rules]: report unchanged"),
            (Outcome::Created, "PR #3 [path rules]: created report"),
            (Outcome::Updated, "PR #3 [path rules]: updated report"),
            (
                Outcome::Preview(String::new()),
                "PR #3 [path rules]: dry run, report not written",
            ),
        ];
        for (outcome, expected) in cases {
            assert_eq!(format_outcome(SectionKind::PathRules, &outcome, 3), expected);
        }
    }

    #[test]
    fn format_failed_validation() {
        let result = ValidationResult {
            success: false,
            errors: vec![FileIssues {
                file: "a.tid".to_string(),
                issues: vec!["one".to_string(), "two".to_string()],
            }],
            notes: Vec::new(),
        };
        assert_eq!(
            format_validation(&result),
            "1 file(s) with issues\n  a.tid\n    - one\n    - two"
        );
    }

    #[test]
    fn format_needs_plain_and_json() {
        assert_eq!(format_needs_change_note(true, 2, false), "true");
        assert_eq!(
            format_needs_change_note(false, 2, true),
            r#"{"needsChangeNote":false,"filesChecked":2}"#
        );
    }
}

//! Markdown for the change-note section of the report.

use super::{CheckedNote, NoteKind, ValidationResult};

/// Render the change-note section.
///
/// - validation failures list each file and its issues;
/// - valid notes are summarised in a table;
/// - no notes at all gives a reminder when the PR needs one, and nothing otherwise.
pub fn render_report(result: &ValidationResult, needs_change_note: bool) -> String {
    if !result.success {
        return render_failures(result);
    }

    if result.notes.is_empty() {
        if needs_change_note {
            return "### Change notes\n\n\
                :memo: This PR changes code but does not include a change note. \
                Please add one under `editions/tw5.com/tiddlers/releasenotes/`."
                .to_string();
        }
        return String::new();
    }

    render_summary(&result.notes)
}

fn render_failures(result: &ValidationResult) -> String {
    let mut out = String::from("### Change notes\n\n:x: Change note validation failed.\n");
    for file in &result.errors {
        out.push_str(&format!("\n**`{}`**\n\n", file.file));
        for issue in &file.issues {
            out.push_str(&format!("- {issue}\n"));
        }
    }
    out.trim_end().to_string()
}

fn render_summary(notes: &[CheckedNote]) -> String {
    let mut out = String::from("### Change notes\n\n:white_check_mark: All change notes are valid.\n");

    let changes: Vec<&CheckedNote> = notes
        .iter()
        .filter(|n| n.kind == NoteKind::ChangeNote)
        .collect();
    if !changes.is_empty() {
        out.push_str("\n| Change | Type | Category | Release |\n|---|---|---|---|\n");
        for note in changes {
            let field = |name| cell(note.fields.get(name));
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                field("description"),
                field("change-type"),
                field("change-category"),
                field("release"),
            ));
        }
    }

    let impacts: Vec<&CheckedNote> = notes
        .iter()
        .filter(|n| n.kind == NoteKind::ImpactNote)
        .collect();
    if !impacts.is_empty() {
        out.push_str("\n**Impacts**\n\n");
        for note in impacts {
            out.push_str(&format!(
                "- **{}**: {}\n",
                cell(note.fields.get("impact-type")),
                cell(note.fields.get("description")),
            ));
        }
    }

    out.trim_end().to_string()
}

/// Table-safe cell text.
fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.replace('|', "\\|"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::change_note::FileIssues;
    use crate::tiddler;

    fn note(kind: NoteKind, content: &str) -> CheckedNote {
        CheckedNote {
            file: "editions/tw5.com/tiddlers/releasenotes/5.4.0/x.tid".to_string(),
            kind,
            fields: tiddler::parse(content).unwrap(),
        }
    }

    #[test]
    fn nothing_to_say_renders_empty() {
        let result = ValidationResult {
            success: true,
            ..Default::default()
        };
        assert_eq!(render_report(&result, false), "");
    }

    #[test]
    fn reminder_when_note_needed() {
        let result = ValidationResult {
            success: true,
            ..Default::default()
        };
        assert!(render_report(&result, true).contains("does not include a change note"));
    }

    #[test]
    fn failures_list_files_and_issues() {
        let result = ValidationResult {
            success: false,
            errors: vec![FileIssues {
                file: "a.tid".to_string(),
                issues: vec!["Missing required field `release`".to_string()],
            }],
            notes: Vec::new(),
        };
        let rendered = render_report(&result, true);
        assert!(rendered.contains(":x:"));
        assert!(rendered.contains("**`a.tid`**"));
        assert!(rendered.ends_with("- Missing required field `release`"));
    }

    #[test]
    fn summary_tables_change_and_impact_notes() {
        let result = ValidationResult {
            success: true,
            errors: Vec::new(),
            notes: vec![
                note(
                    NoteKind::ChangeNote,
                    "description: Pipes | in text\nchange-type: bugfix\nchange-category: widget\nrelease: 5.4.0\n",
                ),
                note(
                    NoteKind::ImpactNote,
                    "description: Old API removed\nimpact-type: compatibility-break\n",
                ),
            ],
        };
        let rendered = render_report(&result, true);
        assert!(rendered.contains("| Pipes \\| in text | bugfix | widget | 5.4.0 |"));
        assert!(rendered.contains("- **compatibility-break**: Old API removed"));
    }
}

//! Change-note validation.
//!
//! Release notes are tiddlers under `editions/<edition>/tiddlers/releasenotes/`.
//! Each one is either a change note or an impact note, told apart by its
//! `tags` field, and is checked against that kind's field schema.

mod needs;
mod releases;
mod render;
mod schema;

pub use needs::check_needs_change_note;
pub use releases::{Enumeration, ReleasesInfo, ReleasesInfoError};
pub use render::render_report;
pub use schema::{FieldRule, schema, validate_fields};

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::tiddler::{self, TiddlerFields};

pub const CHANGE_NOTE_TAG: &str = "$:/tags/ChangeNote";
pub const IMPACT_NOTE_TAG: &str = "$:/tags/ImpactNote";

/// Issue recorded when a release note can't be read or is empty.
pub const UNREADABLE: &str = "File not found or could not be read";

static RELEASE_NOTE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^editions/[^/]+/tiddlers/releasenotes/.+\.tid$").expect("valid path regex")
});

/// The two kinds of release note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    ChangeNote,
    ImpactNote,
}

impl NoteKind {
    /// Classify a note by its raw `tags` field.
    ///
    /// Tags are matched by substring; a change-note tag wins over an impact-note tag.
    pub fn from_tags(tags: &str) -> Option<Self> {
        if tags.contains(CHANGE_NOTE_TAG) {
            Some(Self::ChangeNote)
        } else if tags.contains(IMPACT_NOTE_TAG) {
            Some(Self::ImpactNote)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ChangeNote => "change note",
            Self::ImpactNote => "impact note",
        }
    }
}

/// Issues found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIssues {
    pub file: String,
    pub issues: Vec<String>,
}

/// A release note that was recognised and checked, valid or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedNote {
    pub file: String,
    pub kind: NoteKind,
    pub fields: TiddlerFields,
}

/// Outcome of validating the release notes in a PR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub success: bool,

    /// Files with at least one issue, in input order.
    pub errors: Vec<FileIssues>,

    /// Every recognised note, in input order.
    pub notes: Vec<CheckedNote>,
}

/// Whether a path lies where release notes live.
pub fn is_release_note(path: &str) -> bool {
    RELEASE_NOTE_PATH.is_match(path)
}

/// Validate the release notes among `files`.
///
/// `read` returns the content of a repository-relative path. Files that are
/// not release notes, or whose tags name neither note kind, are ignored.
pub fn validate(
    files: &[String],
    releases: &ReleasesInfo,
    read: impl Fn(&str) -> Option<String>,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut notes = Vec::new();

    for file in files.iter().filter(|f| is_release_note(f)) {
        let Some(fields) = read(file.as_str()).as_deref().and_then(tiddler::parse) else {
            errors.push(FileIssues {
                file: file.clone(),
                issues: vec![UNREADABLE.to_string()],
            });
            continue;
        };

        let Some(kind) = NoteKind::from_tags(fields.get("tags").unwrap_or_default()) else {
            debug!(file = file.as_str(), "release note without a note tag, skipping");
            continue;
        };

        let issues = validate_fields(kind, &fields, releases);
        debug!(
            file = file.as_str(),
            kind = kind.label(),
            issues = issues.len(),
            "validated release note"
        );

        if !issues.is_empty() {
            errors.push(FileIssues {
                file: file.clone(),
                issues,
            });
        }
        notes.push(CheckedNote {
            file: file.clone(),
            kind,
            fields,
        });
    }

    ValidationResult {
        success: errors.is_empty(),
        errors,
        notes,
    }
}

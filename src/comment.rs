//! The Cerebrus report comment: one PR comment, several independently owned sections.
//!
//! The comment starts with [`IDENTIFIER`] so later runs can find it again.
//! Each validator owns exactly one [`SectionKind`] and only ever rewrites the
//! text between its own marker pair.

mod section;

pub use section::{Section, reconcile, render_section, tokenize};

/// Marker that identifies the report comment among all PR comments.
pub const IDENTIFIER: &str = "<!-- Cerebrus PR report -->";

/// The validators that contribute to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    PathRules,
    ChangeNotes,
    BuildSize,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [Self::PathRules, Self::ChangeNotes, Self::BuildSize];

    pub fn start_marker(self) -> &'static str {
        match self {
            Self::PathRules => "<!-- Path Validation Section -->",
            Self::ChangeNotes => "<!-- Change Note Validation Section -->",
            Self::BuildSize => "<!-- Build Size Section -->",
        }
    }

    pub fn end_marker(self) -> &'static str {
        match self {
            Self::PathRules => "<!-- End Path Validation Section -->",
            Self::ChangeNotes => "<!-- End Change Note Validation Section -->",
            Self::BuildSize => "<!-- End Build Size Section -->",
        }
    }

    /// Human-readable name, used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::PathRules => "path rules",
            Self::ChangeNotes => "change notes",
            Self::BuildSize => "build size",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_marker_contains_another() {
        let mut markers = vec![IDENTIFIER];
        for kind in SectionKind::ALL {
            markers.push(kind.start_marker());
            markers.push(kind.end_marker());
        }

        for (i, a) in markers.iter().enumerate() {
            for (j, b) in markers.iter().enumerate() {
                if i != j {
                    assert!(!a.contains(b), "{a:?} contains {b:?}");
                }
            }
        }
    }
}

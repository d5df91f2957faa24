//! Does a PR need a change note?

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Files that never call for a change note.
static SKIP: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\.md$",
        r"(^|/)\.",
        r"^licenses/",
        r"^license$",
        r"^editions/[^/]+/tiddlers/releasenotes/",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid skip regex"))
    .collect()
});

static EDITION_TIDDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^editions/[^/]+/tiddlers/").expect("valid edition regex"));

/// Edition tiddlers that ship code rather than documentation.
static EDITION_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|/)(core|modules)/|plugin\.info$").expect("valid edition code regex")
});

/// Whether the changed files include anything that should be described by a change note.
///
/// Documentation, dotfiles, CI configuration, licenses, and the release notes
/// themselves are exempt. Edition tiddlers only count when they carry code.
pub fn check_needs_change_note(files: &[String]) -> bool {
    for file in files {
        if SKIP.iter().any(|re| re.is_match(file)) {
            continue;
        }

        if EDITION_TIDDLER.is_match(file) {
            if EDITION_CODE.is_match(file) {
                debug!(file = file.as_str(), "edition tiddler carries code");
                return true;
            }
            continue;
        }

        debug!(file = file.as_str(), "file needs a change note");
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needs(paths: &[&str]) -> bool {
        let files: Vec<String> = paths.iter().map(ToString::to_string).collect();
        check_needs_change_note(&files)
    }

    #[test]
    fn core_code_needs_a_note() {
        assert!(needs(&["core/boot.js"]));
        assert!(needs(&["boot/boot.js"]));
        assert!(needs(&["plugins/tiddlywiki/markdown/wrapper.js"]));
    }

    #[test]
    fn documentation_does_not() {
        assert!(!needs(&["README.md"]));
        assert!(!needs(&["editions/tw5.com/tiddlers/foo.tid"]));
        assert!(!needs(&[]));
    }

    #[test]
    fn dotfiles_and_ci_config_are_skipped() {
        assert!(!needs(&[".gitignore", ".github/workflows/ci.yml", "bin/.eslintrc"]));
    }

    #[test]
    fn licenses_and_release_notes_are_skipped() {
        assert!(!needs(&[
            "licenses/cla-individual.md",
            "license",
            "editions/tw5.com/tiddlers/releasenotes/5.4.0/#9000.tid",
        ]));
    }

    #[test]
    fn edition_tiddlers_with_code_need_a_note() {
        assert!(needs(&["editions/tw5.com/tiddlers/system/modules/foo.js"]));
        assert!(needs(&["editions/dev/tiddlers/plugins/x/plugin.info"]));
        assert!(needs(&["editions/dev/tiddlers/core/ui.tid"]));
    }

    #[test]
    fn any_other_file_wins() {
        assert!(needs(&["README.md", "editions/tw5.com/tiddlers/a.tid", "languages/de-DE/Misc.multids"]));
        assert!(needs(&["editions/tw5.com/tiddlywiki.info"]));
    }
}

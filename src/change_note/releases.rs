//! The enumeration source: valid change types, categories, and impact types.
//!
//! Read from `ReleasesInfo.multids`, whose lines look like
//! `change-types/bugfix/caption: Bugfix`. Only the ids matter.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

static CHANGE_TYPE: LazyLock<Regex> = LazyLock::new(|| caption_regex("change-types"));
static CATEGORY: LazyLock<Regex> = LazyLock::new(|| caption_regex("categories"));
static IMPACT_TYPE: LazyLock<Regex> = LazyLock::new(|| caption_regex("impact-types"));

fn caption_regex(prefix: &str) -> Regex {
    Regex::new(&format!(r"(?m)^{prefix}/([^/\s]+)/caption:")).expect("valid caption regex")
}

/// Errors loading the enumeration source. Fatal for change-note validation.
#[derive(Debug, thiserror::Error)]
pub enum ReleasesInfoError {
    #[error("releases info not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read releases info at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// Which enumeration a field's value must come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enumeration {
    ChangeTypes,
    ChangeCategories,
    ImpactTypes,
}

/// Valid values for the enumerated change-note fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasesInfo {
    pub change_types: BTreeSet<String>,
    pub change_categories: BTreeSet<String>,
    pub impact_types: BTreeSet<String>,
}

impl ReleasesInfo {
    /// Collect the ids from every caption line in `content`.
    pub fn parse(content: &str) -> Self {
        let ids = |re: &Regex| -> BTreeSet<String> {
            re.captures_iter(content)
                .map(|caps| caps[1].to_string())
                .collect()
        };

        Self {
            change_types: ids(&CHANGE_TYPE),
            change_categories: ids(&CATEGORY),
            impact_types: ids(&IMPACT_TYPE),
        }
    }

    /// Load and parse the enumeration source from disk.
    pub fn load(path: &Path) -> Result<Self, ReleasesInfoError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReleasesInfoError::NotFound(path.to_path_buf())
            } else {
                ReleasesInfoError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(Self::parse(&content))
    }

    pub fn values(&self, enumeration: Enumeration) -> &BTreeSet<String> {
        match enumeration {
            Enumeration::ChangeTypes => &self.change_types,
            Enumeration::ChangeCategories => &self.change_categories,
            Enumeration::ImpactTypes => &self.impact_types,
        }
    }

    pub fn contains(&self, enumeration: Enumeration, value: &str) -> bool {
        self.values(enumeration).contains(value)
    }

    /// The valid values, sorted and joined with `, `.
    pub fn describe(&self, enumeration: Enumeration) -> String {
        self.values(enumeration)
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    const SAMPLE: &str = "title: $:/tw5.com/releases/info/\n\
        \n\
        change-types/bugfix/caption: Bugfix\n\
        change-types/feature/caption: Feature\n\
        change-types/feature/colour: #faf\n\
        categories/widget/caption: Widgets\n\
        categories/filters/caption: Filters\n\
        impact-types/deprecation/caption: Deprecation\n\
        impact-types/compatibility-break/caption: Compatibility Break\n";

    #[test]
    fn parses_all_three_enumerations() {
        let info = ReleasesInfo::parse(SAMPLE);
        assert_eq!(info.describe(Enumeration::ChangeTypes), "bugfix, feature");
        assert_eq!(info.describe(Enumeration::ChangeCategories), "filters, widget");
        assert!(info.contains(Enumeration::ImpactTypes, "compatibility-break"));
        assert!(!info.contains(Enumeration::ImpactTypes, "bugfix"));
    }

    #[test]
    fn non_caption_lines_are_ignored() {
        let info = ReleasesInfo::parse("change-types/feature/colour: #faf\ncaption: nope\n");
        assert!(info.change_types.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ReleasesInfo::load(&dir.path().join("ReleasesInfo.multids")).unwrap_err();
        assert!(matches!(err, ReleasesInfoError::NotFound(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ReleasesInfo.multids");
        fs::write(&path, SAMPLE).unwrap();
        let info = ReleasesInfo::load(&path).unwrap();
        assert_eq!(info.impact_types.len(), 2);
    }
}

//! Build-size comparison between the base branch and the PR.
//!
//! Producing the artifacts (clone, checkout, build) happens elsewhere; this
//! module only compares the two sizes and renders the report section.

use std::{fs, io, path::Path};

/// Read an artifact's size in bytes.
pub fn artifact_size(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Sizes of the same artifact built from the base branch and from the PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeComparison {
    pub base: u64,
    pub pr: u64,
}

impl SizeComparison {
    pub fn new(base: u64, pr: u64) -> Self {
        Self { base, pr }
    }

    /// Signed change from base to PR, in bytes.
    pub fn diff(&self) -> i64 {
        i64::try_from(self.pr).unwrap_or(i64::MAX) - i64::try_from(self.base).unwrap_or(i64::MAX)
    }

    /// Change relative to the base size, in percent. Zero when the base is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.base == 0 {
            return 0.0;
        }
        self.diff() as f64 / self.base as f64 * 100.0
    }

    fn badge(&self) -> &'static str {
        match self.diff() {
            d if d > 0 => ":arrow_up:",
            d if d < 0 => ":arrow_down:",
            _ => ":white_check_mark:",
        }
    }

    /// Render the build-size section body.
    pub fn render(&self, artifact: &str) -> String {
        let diff = self.diff();
        let sign = if diff > 0 { "+" } else if diff < 0 { "-" } else { "" };
        let change = if diff == 0 {
            "No change".to_string()
        } else {
            format!(
                "{sign}{} ({sign}{:.2}%)",
                format_bytes(diff.unsigned_abs()),
                self.percent().abs()
            )
        };

        format!(
            "### Build size: `{artifact}`\n\n\
             | Branch | Size |\n\
             |---|---|\n\
             | Base | {} |\n\
             | PR | {} |\n\n\
             {} **{change}**",
            format_bytes(self.base),
            format_bytes(self.pr),
            self.badge(),
        )
    }
}

/// Human-readable size with 1024-based units.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

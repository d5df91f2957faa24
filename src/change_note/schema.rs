//! Field schemas for change notes and impact notes.
//!
//! Each note kind maps to an ordered list of [`FieldRule`]s. Rules are checked
//! in order and each field reports at most one issue.

use std::sync::LazyLock;

use regex::Regex;

use super::NoteKind;
use super::releases::{Enumeration, ReleasesInfo};
use crate::tiddler::TiddlerFields;

/// A regex with a name to show in messages.
#[derive(Debug)]
pub struct NamedPattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl NamedPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("valid schema regex"),
        }
    }
}

/// How one field is validated.
///
/// Messages may use `{field}`, `{value}`, `{pattern}` and `{valid}`.
#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub pattern: Option<NamedPattern>,
    pub contains: Option<&'static str>,
    pub valid_values: Option<Enumeration>,
    pub error_message: &'static str,
    pub missing_message: Option<&'static str>,
}

impl FieldRule {
    fn required(name: &'static str, error_message: &'static str) -> Self {
        Self {
            name,
            required: true,
            pattern: None,
            contains: None,
            valid_values: None,
            error_message,
            missing_message: None,
        }
    }

    fn pattern(mut self, name: &'static str, pattern: &str) -> Self {
        self.pattern = Some(NamedPattern::new(name, pattern));
        self
    }

    fn contains(mut self, needle: &'static str) -> Self {
        self.contains = Some(needle);
        self
    }

    fn valid_values(mut self, enumeration: Enumeration) -> Self {
        self.valid_values = Some(enumeration);
        self
    }

    fn missing(mut self, message: &'static str) -> Self {
        self.missing_message = Some(message);
        self
    }

    fn render(&self, template: &str, value: &str, releases: &ReleasesInfo) -> String {
        let mut message = template
            .replace("{field}", self.name)
            .replace("{value}", value);
        if let Some(pattern) = &self.pattern {
            message = message.replace("{pattern}", pattern.name);
        }
        if let Some(enumeration) = self.valid_values {
            message = message.replace("{valid}", &releases.describe(enumeration));
        }
        message
    }

    /// Check one field, returning the issue it raises, if any.
    pub fn check(&self, fields: &TiddlerFields, releases: &ReleasesInfo) -> Option<String> {
        let value = fields.get(self.name).filter(|v| !v.trim().is_empty());

        let Some(value) = value else {
            if self.required {
                let template = self.missing_message.unwrap_or(self.error_message);
                return Some(self.render(template, "", releases));
            }
            return None;
        };

        if let Some(pattern) = &self.pattern
            && !pattern.regex.is_match(value)
        {
            return Some(self.render(self.error_message, value, releases));
        }

        if let Some(needle) = self.contains
            && !value.contains(needle)
        {
            return Some(self.render(self.error_message, value, releases));
        }

        if let Some(enumeration) = self.valid_values
            && !releases.contains(enumeration, value)
        {
            return Some(self.render(self.error_message, value, releases));
        }

        None
    }
}

static CHANGE_NOTE_SCHEMA: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::required(
            "title",
            "`title` must look like `$:/changenotes/<release>/<name>`, found `{value}`",
        )
        .pattern("change note title", r"^\$:/changenotes/5\.\d+\.\d+/.+")
        .missing("Missing required field `title`"),
        FieldRule::required("tags", "`tags` must include `$:/tags/ChangeNote`")
            .contains(super::CHANGE_NOTE_TAG)
            .missing("Missing required field `tags`"),
        FieldRule::required(
            "release",
            "`release` must be a version like `5.4.0`, found `{value}`",
        )
        .pattern("release version", r"^5\.\d+\.\d+$")
        .missing("Missing required field `release`"),
        FieldRule::required("description", "Missing required field `description`"),
        FieldRule::required(
            "change-type",
            "Invalid `change-type` `{value}`. Valid values: {valid}",
        )
        .valid_values(Enumeration::ChangeTypes)
        .missing("Missing required field `change-type`. Valid values: {valid}"),
        FieldRule::required(
            "change-category",
            "Invalid `change-category` `{value}`. Valid values: {valid}",
        )
        .valid_values(Enumeration::ChangeCategories)
        .missing("Missing required field `change-category`. Valid values: {valid}"),
        FieldRule::required(
            "github-links",
            "`github-links` must contain GitHub URLs, found `{value}`",
        )
        .pattern("GitHub URL", r"^\[?\[?https://github\.com/")
        .missing("Missing required field `github-links`"),
        FieldRule::required(
            "github-contributors",
            "Missing required field `github-contributors`",
        ),
    ]
});

static IMPACT_NOTE_SCHEMA: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        FieldRule::required(
            "title",
            "`title` must look like `$:/changenotes/<release>/<name>/impacts/<impact>`, found `{value}`",
        )
        .pattern("impact note title", r"^\$:/changenotes/5\.\d+\.\d+/.+/impacts/.+")
        .missing("Missing required field `title`"),
        FieldRule::required("tags", "`tags` must include `$:/tags/ImpactNote`")
            .contains(super::IMPACT_NOTE_TAG)
            .missing("Missing required field `tags`"),
        FieldRule::required(
            "changenote",
            "Missing required field `changenote` (the title of the change note this impact belongs to)",
        ),
        FieldRule::required("description", "Missing required field `description`"),
        FieldRule::required(
            "impact-type",
            "Invalid `impact-type` `{value}`. Valid values: {valid}",
        )
        .valid_values(Enumeration::ImpactTypes)
        .missing("Missing required field `impact-type`. Valid values: {valid}"),
    ]
});

/// The field rules for a note kind, in check order.
pub fn schema(kind: NoteKind) -> &'static [FieldRule] {
    match kind {
        NoteKind::ChangeNote => &CHANGE_NOTE_SCHEMA,
        NoteKind::ImpactNote => &IMPACT_NOTE_SCHEMA,
    }
}

/// Check every field of `fields` against `kind`'s schema.
pub fn validate_fields(
    kind: NoteKind,
    fields: &TiddlerFields,
    releases: &ReleasesInfo,
) -> Vec<String> {
    schema(kind)
        .iter()
        .filter_map(|rule| rule.check(fields, releases))
        .collect()
}

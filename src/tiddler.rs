//! Tiddler parsing: `key: value` header lines, a blank line, then the body.
//!
//! Only the narrow `.tid` shape is understood. Anything fancier (wikitext,
//! JSON tiddlers, `.multids`) is out of reach and not needed here.

use std::{collections::BTreeMap, fs, path::Path, sync::LazyLock};

use regex::Regex;

/// Header line shape: field name up to the first colon, then the value.
static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+):\s*(.*)$").expect("valid field regex"));

/// Fields parsed from a tiddler file.
///
/// The body lives under the reserved `text` key and is reachable through
/// [`TiddlerFields::get`] like any other field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TiddlerFields {
    fields: BTreeMap<String, String>,
    text: Option<String>,
}

impl TiddlerFields {
    /// Look up a field by name. `text` returns the body.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name == "text" {
            return self.text.as_deref();
        }
        self.fields.get(name).map(String::as_str)
    }

    /// The tiddler body, if the file had one.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// Number of header fields (the body is not counted).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.text.is_none()
    }
}

/// Parse tiddler content.
///
/// Returns `None` when the content is empty. The header ends at the first
/// line that is blank after trimming; later duplicate fields overwrite
/// earlier ones. Without a blank line there is no body.
pub fn parse(content: &str) -> Option<TiddlerFields> {
    if content.trim().is_empty() {
        return None;
    }

    let lines: Vec<&str> = content.lines().collect();
    let boundary = lines.iter().position(|line| line.trim().is_empty());

    let (header, body) = match boundary {
        Some(index) => (&lines[..index], Some(&lines[index + 1..])),
        None => (&lines[..], None),
    };

    let mut fields = BTreeMap::new();
    for line in header {
        if let Some(caps) = FIELD_LINE.captures(line) {
            fields.insert(caps[1].trim().to_string(), caps[2].trim_end().to_string());
        }
    }

    let text = body.map(|lines| lines.join("\n").trim().to_string());

    Some(TiddlerFields { fields, text })
}

/// Read and parse a tiddler file. Unreadable files yield `None`.
pub fn parse_file(path: &Path) -> Option<TiddlerFields> {
    let content = fs::read_to_string(path).ok()?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn parses_fields_and_body() {
        let tiddler = parse(
            "title: $:/changenotes/5.4.0/#1234\n\
             tags: $:/tags/ChangeNote\n\
             release: 5.4.0\n\
             \n\
             Fixed the widget.\n\
             Second line.\n",
        )
        .unwrap();

        assert_eq!(tiddler.title(), Some("$:/changenotes/5.4.0/#1234"));
        assert_eq!(tiddler.get("tags"), Some("$:/tags/ChangeNote"));
        assert_eq!(tiddler.get("release"), Some("5.4.0"));
        assert_eq!(tiddler.text(), Some("Fixed the widget.\nSecond line."));
        assert_eq!(tiddler.get("text"), tiddler.text());
        assert_eq!(tiddler.len(), 3);
    }

    #[test]
    fn empty_content_is_none() {
        assert!(parse("").is_none());
        assert!(parse("  \n\n ").is_none());
    }

    #[test]
    fn no_blank_line_means_no_body() {
        let tiddler = parse("title: Foo\ncaption: Bar").unwrap();
        assert_eq!(tiddler.get("caption"), Some("Bar"));
        assert_eq!(tiddler.text(), None);
    }

    #[test]
    fn field_name_stops_at_first_colon() {
        let tiddler = parse("github-links: https://github.com/a/b/pull/1\n").unwrap();
        assert_eq!(
            tiddler.get("github-links"),
            Some("https://github.com/a/b/pull/1")
        );
    }

    #[test]
    fn field_names_are_trimmed() {
        let tiddler = parse("title : $:/changenotes/5.4.0/x\n tags: $:/tags/ChangeNote\n").unwrap();
        assert_eq!(tiddler.title(), Some("$:/changenotes/5.4.0/x"));
        assert_eq!(tiddler.get("tags"), Some("$:/tags/ChangeNote"));
        assert_eq!(tiddler.get("title "), None);
    }

    #[test]
    fn duplicate_fields_last_wins() {
        let tiddler = parse("release: 5.3.0\nrelease: 5.4.0\n").unwrap();
        assert_eq!(tiddler.get("release"), Some("5.4.0"));
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let tiddler = parse("title: Foo\nnot a field\n\nbody").unwrap();
        assert_eq!(tiddler.len(), 1);
        assert_eq!(tiddler.text(), Some("body"));
    }

    #[test]
    fn whitespace_only_line_ends_header() {
        let tiddler = parse("title: Foo\n   \nafter: not a field").unwrap();
        assert_eq!(tiddler.get("after"), None);
        assert_eq!(tiddler.text(), Some("after: not a field"));
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.tid");
        fs::write(&path, "title: Foo\n\nBody").unwrap();

        let tiddler = parse_file(&path).unwrap();
        assert_eq!(tiddler.title(), Some("Foo"));
        assert!(parse_file(&dir.path().join("missing.tid")).is_none());
    }
}

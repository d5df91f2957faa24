//! Section tokenizing and reconciliation.

use tracing::debug;

use super::{IDENTIFIER, SectionKind};

/// A marker-delimited section found in a comment body.
///
/// `start..end` covers both markers; `content` is the text between them
/// without the newline that follows the start marker and precedes the end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
    pub content: &'a str,
}

/// Render a section with its marker pair.
pub fn render_section(kind: SectionKind, content: &str) -> String {
    format!("{}\n{}\n{}", kind.start_marker(), content, kind.end_marker())
}

/// Split a comment body into its sections, in order of appearance.
///
/// A start marker pairs with the first matching end marker after it, unless
/// another start of the same kind comes first. Markers inside another
/// section's content are part of that content. A start marker with no end
/// marker is skipped.
pub fn tokenize(body: &str) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut pos = 0;

    while let Some((start, kind)) = next_start(body, pos) {
        let content_start = start + kind.start_marker().len();

        let Some(offset) = body[content_start..].find(kind.end_marker()) else {
            debug!(section = kind.label(), at = start, "unterminated section marker");
            pos = content_start;
            continue;
        };

        let content_end = content_start + offset;

        // A second start of the same kind before the end marker means this one
        // was never closed; the later start owns the end marker.
        if body[content_start..content_end].contains(kind.start_marker()) {
            debug!(section = kind.label(), at = start, "unterminated section marker");
            pos = content_start;
            continue;
        }

        let end = content_end + kind.end_marker().len();
        let content = &body[content_start..content_end];
        let content = content.strip_prefix('\n').unwrap_or(content);
        let content = content.strip_suffix('\n').unwrap_or(content);

        sections.push(Section {
            kind,
            start,
            end,
            content,
        });
        pos = end;
    }

    sections
}

/// Earliest start marker of any kind at or after `pos`.
fn next_start(body: &str, pos: usize) -> Option<(usize, SectionKind)> {
    SectionKind::ALL
        .iter()
        .filter_map(|&kind| {
            body[pos..]
                .find(kind.start_marker())
                .map(|offset| (pos + offset, kind))
        })
        .min_by_key(|&(start, _)| start)
}

/// Produce the updated comment body after setting `kind`'s section to `new_content`.
///
/// Blank content removes the section. Only the first section of `kind` is
/// touched; text outside it is left as it was, except for whitespace trimmed
/// around a removed section.
pub fn reconcile(existing: Option<&str>, kind: SectionKind, new_content: &str) -> String {
    let new_content = new_content.trim();

    let Some(body) = existing else {
        if new_content.is_empty() {
            return IDENTIFIER.to_string();
        }
        return format!("{IDENTIFIER}\n\n{}", render_section(kind, new_content));
    };

    let current = tokenize(body).into_iter().find(|s| s.kind == kind);

    match (current, new_content.is_empty()) {
        (Some(section), false) => {
            let mut updated = String::with_capacity(body.len() + new_content.len());
            updated.push_str(&body[..section.start]);
            updated.push_str(&render_section(kind, new_content));
            updated.push_str(&body[section.end..]);
            updated
        }
        (Some(section), true) => {
            let before = body[..section.start].trim_end();
            let after = body[section.end..].trim_start();
            if before.is_empty() || after.is_empty() {
                format!("{before}{after}")
            } else {
                format!("{before}\n\n{after}")
            }
        }
        (None, false) => format!("{body}\n\n{}", render_section(kind, new_content)),
        (None, true) => body.to_string(),
    }
}

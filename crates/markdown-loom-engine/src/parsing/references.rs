//! Link reference definitions: parsing them from paragraph starts and the
//! per-document map used to resolve reference links.

use std::{collections::HashMap, ops::Range};

use super::link_syntax::{
    line_end, scan_link_destination, scan_link_label, scan_link_title, skip_spaces_and_newline,
};

/// Destination and title a label resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub destination: String,
    pub title: Option<String>,
}

/// Definitions collected during block parsing, keyed by normalized label.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    entries: HashMap<String, LinkReference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition. The first definition of a label wins; later
    /// ones are ignored and `false` is returned.
    pub fn define(&mut self, label: &str, reference: LinkReference) -> bool {
        let key = normalize_label(label);
        if self.entries.contains_key(&key) {
            log::trace!("ignoring duplicate link reference definition [{key}]");
            return false;
        }
        self.entries.insert(key, reference);
        true
    }

    pub fn get(&self, label: &str) -> Option<&LinkReference> {
        self.entries.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-folds and collapses internal whitespace so that `[Foo  Bar]` and
/// `[foo bar]` match.
pub fn normalize_label(label: &str) -> String {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase().to_uppercase()
}

/// One definition found at the start of paragraph text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDefinition {
    /// Raw label text between the brackets.
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
    /// Byte range of the definition in the paragraph text, without its line
    /// ending.
    pub range: Range<usize>,
}

/// Parses consecutive definitions from the start of `text`.
///
/// Returns them with the byte offset at which the remaining paragraph text
/// begins.
pub fn parse_definitions(text: &str) -> (Vec<ParsedDefinition>, usize) {
    let mut defs = Vec::new();
    let mut pos = 0;
    while let Some((def, next)) = parse_definition(text, pos) {
        defs.push(def);
        pos = next;
    }
    (defs, pos)
}

fn parse_definition(s: &str, start: usize) -> Option<(ParsedDefinition, usize)> {
    let label_end = scan_link_label(s, start)?;
    if s.as_bytes().get(label_end) != Some(&b':') {
        return None;
    }
    let dest_start = skip_spaces_and_newline(s, label_end + 1);
    let (dest_end, destination) = scan_link_destination(s, dest_start)?;
    if dest_end == dest_start {
        return None;
    }
    let label = s[start + 1..label_end - 1].to_string();

    let title_start = skip_spaces_and_newline(s, dest_end);
    if title_start > dest_end
        && let Some((title_end, title)) = scan_link_title(s, title_start)
        && let Some(next) = line_end(s, title_end)
    {
        let def = ParsedDefinition {
            label,
            destination,
            title: Some(title),
            range: start..content_end(s, title_end, next),
        };
        return Some((def, next));
    }

    let next = line_end(s, dest_end)?;
    let def = ParsedDefinition {
        label,
        destination,
        title: None,
        range: start..content_end(s, dest_end, next),
    };
    Some((def, next))
}

/// End of a definition's own text: `after` plus trailing spaces, minus the
/// line ending that `next` skipped.
fn content_end(s: &str, after: usize, next: usize) -> usize {
    let line = &s[after..next];
    after + line.trim_end_matches(['\n', '\r']).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_definition_with_title() {
        let (defs, rest) = parse_definitions("[foo]: /url \"title\"\nbar");
        assert_eq!(
            defs,
            [ParsedDefinition {
                label: "foo".into(),
                destination: "/url".into(),
                title: Some("title".into()),
                range: 0..19,
            }]
        );
        assert_eq!(rest, 20);
    }

    #[test]
    fn consecutive_definitions() {
        let text = "[a]: /a\n[b]:\n  <b b>\n'tb'";
        let (defs, rest) = parse_definitions(text);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].destination, "b b");
        assert_eq!(defs[1].title.as_deref(), Some("tb"));
        assert_eq!(rest, text.len());
    }

    #[test]
    fn bad_title_falls_back_to_title_less_definition() {
        let (defs, rest) = parse_definitions("[a]: /a\n\"not closed\nmore");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].title, None);
        assert_eq!(rest, 8);
    }

    #[test]
    fn trailing_junk_is_not_a_definition() {
        let (defs, rest) = parse_definitions("[a]: /a junk");
        assert!(defs.is_empty());
        assert_eq!(rest, 0);
    }

    #[test]
    fn missing_destination_is_not_a_definition() {
        assert!(parse_definitions("[a]:\n").0.is_empty());
    }

    #[test]
    fn first_definition_wins_and_labels_normalize() {
        let mut refs = ReferenceMap::new();
        let first = LinkReference {
            destination: "/1".into(),
            title: None,
        };
        assert!(refs.define("Foo  Bar", first.clone()));
        assert!(!refs.define(
            "foo bar",
            LinkReference {
                destination: "/2".into(),
                title: None
            }
        ));
        assert_eq!(refs.get("FOO\nbar"), Some(&first));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn normalization_folds_case() {
        assert_eq!(normalize_label("  Straße \t x "), normalize_label("STRASSE x"));
    }
}

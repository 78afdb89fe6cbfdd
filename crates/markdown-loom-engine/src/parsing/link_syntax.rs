//! Scanners for the pieces of link syntax shared by inline links and link
//! reference definitions.
//!
//! All functions take the full text and a byte position, and return the
//! position just past what they matched.

/// Maximum bytes inside a link label.
const MAX_LABEL_LEN: usize = 999;

/// Maximum nesting of unescaped parentheses in a bare destination.
const MAX_PAREN_DEPTH: usize = 32;

fn escaped_at(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'\\' && bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation)
}

/// Scans `[label]` starting at `pos`.
pub fn scan_link_label(s: &str, pos: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            _ if escaped_at(bytes, i) => i += 2,
            b'[' => return None,
            b']' => {
                let inner = &s[pos + 1..i];
                if inner.len() > MAX_LABEL_LEN || inner.trim().is_empty() {
                    return None;
                }
                return Some(i + 1);
            }
            _ => i += 1,
        }
    }
    None
}

/// Scans a destination, either `<...>` or a bare run with balanced
/// parentheses. A bare destination may be empty.
pub fn scan_link_destination(s: &str, pos: usize) -> Option<(usize, String)> {
    let bytes = s.as_bytes();
    if bytes.get(pos) == Some(&b'<') {
        let mut i = pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                _ if escaped_at(bytes, i) => i += 2,
                b'>' => return Some((i + 1, unescape(&s[pos + 1..i]))),
                b'<' | b'\n' | b'\r' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            _ if escaped_at(bytes, i) => i += 2,
            b'(' => {
                depth += 1;
                if depth > MAX_PAREN_DEPTH {
                    return None;
                }
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            b if b <= b' ' || b == 0x7f => break,
            _ => i += 1,
        }
    }
    if depth != 0 {
        return None;
    }
    Some((i, unescape(&s[pos..i])))
}

/// Scans a title delimited by `"`, `'` or parentheses.
pub fn scan_link_title(s: &str, pos: usize) -> Option<(usize, String)> {
    let bytes = s.as_bytes();
    let close = match bytes.get(pos)? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            _ if escaped_at(bytes, i) => i += 2,
            b if b == close => return Some((i + 1, unescape(&s[pos + 1..i]))),
            b'(' if close == b')' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Skips spaces and tabs with at most one line ending among them.
pub fn skip_spaces_and_newline(s: &str, pos: usize) -> usize {
    let bytes = s.as_bytes();
    let mut i = super::chars::skip_space_tab(s, pos);
    match bytes.get(i) {
        Some(b'\r') if bytes.get(i + 1) == Some(&b'\n') => i += 2,
        Some(b'\n' | b'\r') => i += 1,
        _ => return i,
    }
    super::chars::skip_space_tab(s, i)
}

/// Position after the line ending that follows optional spaces and tabs, or
/// the end of `s`. `None` when anything else comes first.
pub fn line_end(s: &str, pos: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let i = super::chars::skip_space_tab(s, pos);
    match bytes.get(i) {
        None => Some(i),
        Some(b'\r') if bytes.get(i + 1) == Some(&b'\n') => Some(i + 2),
        Some(b'\n' | b'\r') => Some(i + 1),
        Some(_) => None,
    }
}

/// Removes backslashes that escape ASCII punctuation.
pub fn unescape(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        if escaped_at(bytes, i) {
            out.push_str(&s[last..i]);
            last = i + 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    out.push_str(&s[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("[foo]", Some(5))]
    #[case("[foo] bar", Some(5))]
    #[case("[fo\\]o]", Some(7))]
    #[case("[fo[o]", None)]
    #[case("[  ]", None)]
    #[case("[open", None)]
    #[case("foo]", None)]
    fn labels(#[case] input: &str, #[case] expected: Option<usize>) {
        assert_eq!(scan_link_label(input, 0), expected);
    }

    #[rstest]
    #[case("/url rest", Some((4, "/url")))]
    #[case("<my url>x", Some((8, "my url")))]
    #[case("a(b(c))d)", Some((8, "a(b(c))d")))]
    #[case("a(b", None)]
    #[case("<a\nb>", None)]
    #[case(")", Some((0, "")))]
    #[case("\\(x", Some((3, "(x")))]
    fn destinations(#[case] input: &str, #[case] expected: Option<(usize, &str)>) {
        let got = scan_link_destination(input, 0);
        assert_eq!(
            got.as_ref().map(|(end, dest)| (*end, dest.as_str())),
            expected
        );
    }

    #[rstest]
    #[case("\"t\" x", Some((3, "t")))]
    #[case("'it\\'s'", Some((7, "it's")))]
    #[case("(a)", Some((3, "a")))]
    #[case("(a(b)", None)]
    #[case("\"open", None)]
    fn titles(#[case] input: &str, #[case] expected: Option<(usize, &str)>) {
        let got = scan_link_title(input, 0);
        assert_eq!(
            got.as_ref().map(|(end, title)| (*end, title.as_str())),
            expected
        );
    }

    #[test]
    fn spnl_allows_one_newline() {
        assert_eq!(skip_spaces_and_newline("  \n  x", 0), 5);
        assert_eq!(skip_spaces_and_newline(" \n\nx", 0), 2);
        assert_eq!(skip_spaces_and_newline(" \r\n x", 0), 4);
    }

    #[test]
    fn unescape_only_touches_punctuation() {
        assert_eq!(unescape("a\\*b\\c"), "a*b\\c");
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("\\\\"), "\\");
    }

    #[test]
    fn line_end_accepts_trailing_space() {
        assert_eq!(line_end("x  \nnext", 1), Some(4));
        assert_eq!(line_end("x  ", 1), Some(3));
        assert_eq!(line_end("x y", 1), None);
    }
}

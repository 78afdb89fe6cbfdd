/// Read-only view of inline content at the position where a content parser
/// is tried.
///
/// Positions are byte offsets into the leaf block's content. Parsers report
/// how far they matched through [`ParsedInline`](super::ParsedInline); the
/// engine moves the scanner.
#[derive(Debug, Clone, Copy)]
pub struct InlineScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> InlineScanner<'a> {
    pub(crate) fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    /// The whole inline content.
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Content from the current position on.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The character at the current position.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character `n` characters past the current one.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// The character just before the current position.
    pub fn char_before(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    pub fn starts_with(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    /// Number of consecutive `c` characters at the current position.
    pub fn count_run(&self, c: char) -> usize {
        self.rest().chars().take_while(|&x| x == c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_basics() {
        let scanner = InlineScanner::new("ab**cd", 2);
        assert_eq!(scanner.position(), 2);
        assert_eq!(scanner.rest(), "**cd");
        assert_eq!(scanner.peek(), Some('*'));
        assert_eq!(scanner.peek_nth(2), Some('c'));
        assert_eq!(scanner.char_before(), Some('b'));
        assert_eq!(scanner.count_run('*'), 2);
        assert!(scanner.starts_with("**c"));
        assert!(!scanner.is_at_end());
    }

    #[test]
    fn scanner_at_the_edges() {
        let start = InlineScanner::new("é", 0);
        assert_eq!(start.char_before(), None);
        assert_eq!(start.peek(), Some('é'));

        let end = InlineScanner::new("é", 2);
        assert!(end.is_at_end());
        assert_eq!(end.peek(), None);
        assert_eq!(end.char_before(), Some('é'));
        assert_eq!(end.count_run('x'), 0);
    }
}

use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::inline::{InlineContentParser, InlineScanner, ParsedInline},
};

/// `\` before ASCII punctuation makes it literal; before a line ending it
/// forces a hard line break.
pub struct BackslashEscape;

impl BackslashEscape {
    pub const BACKSLASH: char = '\\';
}

impl InlineContentParser for BackslashEscape {
    fn triggers(&self) -> &[char] {
        &[Self::BACKSLASH]
    }

    fn try_parse(&self, scanner: &InlineScanner<'_>) -> Result<Option<ParsedInline>, ParseError> {
        let rest = scanner.rest();
        let after = &rest[1..];
        let eol = if after.starts_with("\r\n") {
            2
        } else if after.starts_with(['\n', '\r']) {
            1
        } else {
            0
        };
        if eol > 0 {
            let indent = after[eol..]
                .bytes()
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
            let len = 1 + eol + indent;
            return Ok(Some(ParsedInline::new(NodeKind::HardLineBreak, len)));
        }
        Ok(after
            .chars()
            .next()
            .filter(char::is_ascii_punctuation)
            .map(|c| ParsedInline::new(NodeKind::text(c), 2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Option<(String, usize)> {
        BackslashEscape
            .try_parse(&InlineScanner::new(text, 0))
            .expect("escape never fails")
            .map(|p| (p.kind().describe(), p.len()))
    }

    #[test]
    fn escapes_ascii_punctuation_only() {
        assert_eq!(parse("\\*x"), Some(("Text \"*\"".to_string(), 2)));
        assert_eq!(parse("\\a"), None);
        assert_eq!(parse("\\"), None);
    }

    #[test]
    fn backslash_before_line_ending_is_a_hard_break() {
        assert_eq!(parse("\\\n  next"), Some(("HardLineBreak".to_string(), 4)));
        assert_eq!(parse("\\\r\nnext"), Some(("HardLineBreak".to_string(), 3)));
    }
}

use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::inline::{InlineContentParser, InlineScanner, ParsedInline},
};

/// Code spans are raw zones: nothing else is parsed between the backtick
/// runs.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: char = '`';

    /// Normalizes span content: line endings become spaces, and one space
    /// is stripped from each side when both sides have one and the content
    /// is not all spaces.
    fn literal(raw: &str) -> String {
        let mut literal = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
        if literal.len() >= 2
            && literal.starts_with(' ')
            && literal.ends_with(' ')
            && literal.bytes().any(|b| b != b' ')
        {
            literal = literal[1..literal.len() - 1].to_string();
        }
        literal
    }
}

impl InlineContentParser for CodeSpan {
    fn triggers(&self) -> &[char] {
        &[Self::TICK]
    }

    fn try_parse(&self, scanner: &InlineScanner<'_>) -> Result<Option<ParsedInline>, ParseError> {
        let ticks = scanner.count_run(Self::TICK);
        let rest = scanner.rest();
        let bytes = rest.as_bytes();

        let mut i = ticks;
        while i < bytes.len() {
            if bytes[i] != b'`' {
                i += 1;
                continue;
            }
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == ticks {
                let kind = NodeKind::Code {
                    literal: Self::literal(&rest[ticks..i]),
                };
                return Ok(Some(ParsedInline::new(kind, i + run)));
            }
            i += run;
        }
        // No closing run: the opening backticks are literal.
        Ok(Some(ParsedInline::text(&rest[..ticks])))
    }
}

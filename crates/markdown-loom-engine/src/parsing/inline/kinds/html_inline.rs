use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        html::INLINE_HTML,
        inline::{InlineContentParser, InlineScanner, ParsedInline},
    },
};

/// Raw inline HTML: tags, comments, processing instructions, declarations
/// and CDATA sections, kept verbatim.
pub struct HtmlInline;

impl InlineContentParser for HtmlInline {
    fn triggers(&self) -> &[char] {
        &['<']
    }

    fn try_parse(&self, scanner: &InlineScanner<'_>) -> Result<Option<ParsedInline>, ParseError> {
        Ok(INLINE_HTML.find(scanner.rest()).map(|m| {
            let literal = m.as_str().to_string();
            ParsedInline::new(NodeKind::HtmlInline { literal }, m.end())
        }))
    }
}

use std::ops::Range;

use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, LineState,
            MatchedBlock,
        },
        chars::{CODE_BLOCK_INDENT, skip_space_tab, trim_space_tab_end},
    },
    sequence::SegmentedSequence,
};

/// A single-line heading; content is known when it starts.
pub struct HeadingParser {
    level: u8,
    setext: bool,
    content: SegmentedSequence,
}

impl BlockParser for HeadingParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::Heading {
            level: self.level,
            setext: self.setext,
        }
    }

    fn try_continue(&mut self, _state: &LineState) -> Result<BlockContinue, ParseError> {
        Ok(BlockContinue::NoMatch)
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        if !self.content.is_empty() {
            ctx.parse_inlines(self.content.clone());
        }
        Ok(())
    }
}

/// `# Heading` through `###### Heading`, with an optional closing sequence.
pub struct AtxHeadingFactory;

impl AtxHeadingFactory {
    /// Level and content range of an ATX heading line starting at `#`.
    fn parse(s: &str) -> Option<(u8, Range<usize>)> {
        let level = s.bytes().take_while(|&b| b == b'#').count();
        if level == 0 || level > 6 {
            return None;
        }
        let level_u8 = u8::try_from(level).ok()?;
        match s.as_bytes().get(level) {
            None => return Some((level_u8, level..level)),
            Some(b' ' | b'\t') => {}
            Some(_) => return None,
        }
        let start = skip_space_tab(s, level);
        let mut end = trim_space_tab_end(s);
        if end <= start {
            return Some((level_u8, start..start));
        }
        let hashes = s[start..end].bytes().rev().take_while(|&b| b == b'#').count();
        if hashes > 0 {
            let before = end - hashes;
            if before == start {
                end = start;
            } else if matches!(s.as_bytes()[before - 1], b' ' | b'\t') {
                end = start + trim_space_tab_end(&s[start..before]);
            }
        }
        Some((level_u8, start..end))
    }
}

impl BlockParserFactory for AtxHeadingFactory {
    fn try_start(
        &self,
        state: &LineState,
        _matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        if state.indent() >= CODE_BLOCK_INDENT {
            return Ok(None);
        }
        let offset = state.next_non_space_index();
        let Some((level, range)) = Self::parse(&state.text()[offset..]) else {
            return Ok(None);
        };
        let content = state
            .line()
            .sub_sequence(offset + range.start, offset + range.end)?
            .into();
        let parser = HeadingParser {
            level,
            setext: false,
            content,
        };
        Ok(Some(BlockStart::of(parser).at_index(state.line().len())))
    }
}

/// A `===` or `---` underline that turns the matched paragraph into a
/// heading.
pub struct SetextHeadingFactory;

impl SetextHeadingFactory {
    fn level(s: &str) -> Option<u8> {
        let marker = s.bytes().next()?;
        let level = match marker {
            b'=' => 1,
            b'-' => 2,
            _ => return None,
        };
        let run = s.bytes().take_while(|&b| b == marker).count();
        (skip_space_tab(s, run) == s.len()).then_some(level)
    }
}

impl BlockParserFactory for SetextHeadingFactory {
    fn try_start(
        &self,
        state: &LineState,
        matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        if state.indent() >= CODE_BLOCK_INDENT || !matches!(matched.kind(), NodeKind::Paragraph) {
            return Ok(None);
        }
        let Some(level) = Self::level(&state.text()[state.next_non_space_index()..]) else {
            return Ok(None);
        };
        let Some(content) = matched.paragraph_content() else {
            return Ok(None);
        };
        let parser = HeadingParser {
            level,
            setext: true,
            content,
        };
        Ok(Some(
            BlockStart::of(parser)
                .at_index(state.line().len())
                .replace_active_block(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("# foo", Some((1, "foo")))]
    #[case("###### foo", Some((6, "foo")))]
    #[case("####### foo", None)]
    #[case("#5 bolt", None)]
    #[case("#", Some((1, "")))]
    #[case("## foo ##  ", Some((2, "foo")))]
    #[case("# foo#", Some((1, "foo#")))]
    #[case("# foo \\#", Some((1, "foo \\#")))]
    #[case("## ###", Some((2, "")))]
    #[case("#\tfoo", Some((1, "foo")))]
    fn atx_lines(#[case] line: &str, #[case] expected: Option<(u8, &str)>) {
        let got = AtxHeadingFactory::parse(line).map(|(level, r)| (level, &line[r]));
        assert_eq!(got, expected);
    }

    #[rstest]
    #[case("===", Some(1))]
    #[case("-  ", Some(2))]
    #[case("= =", None)]
    #[case("--x", None)]
    #[case("***", None)]
    fn setext_underlines(#[case] line: &str, #[case] expected: Option<u8>) {
        assert_eq!(SetextHeadingFactory::level(line), expected);
    }
}

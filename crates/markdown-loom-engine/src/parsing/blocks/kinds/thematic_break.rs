use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContinue, BlockParser, BlockParserFactory, BlockStart, LineState, MatchedBlock,
        },
        chars::CODE_BLOCK_INDENT,
    },
};

/// Three or more matching `-`, `_` or `*`, optionally separated by spaces.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [u8; 3] = [b'-', b'_', b'*'];

    pub fn matches(s: &str) -> bool {
        let mut marker = None;
        let mut count = 0;
        for b in s.bytes() {
            match b {
                b' ' | b'\t' => {}
                b if Self::MARKERS.contains(&b) => {
                    if marker.is_some_and(|m| m != b) {
                        return false;
                    }
                    marker = Some(b);
                    count += 1;
                }
                _ => return false,
            }
        }
        count >= 3
    }
}

impl BlockParser for ThematicBreak {
    fn create_node(&self) -> NodeKind {
        NodeKind::ThematicBreak
    }

    fn try_continue(&mut self, _state: &LineState) -> Result<BlockContinue, ParseError> {
        Ok(BlockContinue::NoMatch)
    }
}

pub struct ThematicBreakFactory;

impl BlockParserFactory for ThematicBreakFactory {
    fn try_start(
        &self,
        state: &LineState,
        _matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        if state.indent() >= CODE_BLOCK_INDENT
            || !ThematicBreak::matches(&state.text()[state.next_non_space_index()..])
        {
            return Ok(None);
        }
        Ok(Some(
            BlockStart::of(ThematicBreak).at_index(state.line().len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("***", true)]
    #[case("- - -", true)]
    #[case("_____", true)]
    #[case("**", false)]
    #[case("*-*", false)]
    #[case("--- a", false)]
    fn thematic_breaks(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(ThematicBreak::matches(line), expected);
    }
}

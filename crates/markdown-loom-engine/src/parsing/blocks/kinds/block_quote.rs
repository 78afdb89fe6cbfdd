use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContinue, BlockParser, BlockParserFactory, BlockStart, LineState, MatchedBlock,
        },
        chars::{CODE_BLOCK_INDENT, is_space_or_tab},
    },
};

/// Block quote container. Every line of the quote must repeat the marker,
/// apart from lazy paragraph continuations.
pub struct BlockQuote;

impl BlockQuote {
    /// The block quote marker character.
    pub const MARKER: char = '>';

    /// Column just past the marker and its optional following space, when
    /// the line continues or starts a quote.
    fn content_column(state: &LineState) -> Option<usize> {
        let marker = state.next_non_space_index();
        if state.indent() >= CODE_BLOCK_INDENT || state.char_at(marker) != Some(Self::MARKER) {
            return None;
        }
        let mut column = state.column() + state.indent() + 1;
        if is_space_or_tab(state.char_at(marker + 1)) {
            column += 1;
        }
        Some(column)
    }
}

impl BlockParser for BlockQuote {
    fn create_node(&self) -> NodeKind {
        NodeKind::BlockQuote
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, _kind: &NodeKind) -> bool {
        true
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        Ok(match Self::content_column(state) {
            Some(column) => BlockContinue::AtColumn(column),
            None => BlockContinue::NoMatch,
        })
    }
}

pub struct BlockQuoteFactory;

impl BlockParserFactory for BlockQuoteFactory {
    fn try_start(
        &self,
        state: &LineState,
        _matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        Ok(BlockQuote::content_column(state)
            .map(|column| BlockStart::of(BlockQuote).at_column(column)))
    }
}

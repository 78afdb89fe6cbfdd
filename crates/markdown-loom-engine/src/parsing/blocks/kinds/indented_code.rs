use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, Line,
            LineState, MatchedBlock,
        },
        chars::{CODE_BLOCK_INDENT, is_blank},
    },
};

/// Lines indented by four or more columns. Trailing blank lines are dropped
/// when the block closes.
#[derive(Debug, Default)]
pub struct IndentedCodeParser {
    lines: Vec<String>,
}

impl BlockParser for IndentedCodeParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::IndentedCodeBlock {
            literal: String::new(),
        }
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        Ok(if state.indent() >= CODE_BLOCK_INDENT {
            BlockContinue::AtColumn(state.column() + CODE_BLOCK_INDENT)
        } else if state.is_blank() {
            BlockContinue::AtIndex(state.next_non_space_index())
        } else {
            BlockContinue::NoMatch
        })
    }

    fn add_line(&mut self, line: Line) {
        self.lines.push(line.content.to_string());
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        let kept = self
            .lines
            .iter()
            .rposition(|line| !is_blank(line))
            .map_or(0, |last| last + 1);
        let mut text = String::new();
        for line in &self.lines[..kept] {
            text.push_str(line);
            text.push('\n');
        }
        if let NodeKind::IndentedCodeBlock { literal } = ctx.kind_mut() {
            *literal = text;
        }
        Ok(())
    }
}

pub struct IndentedCodeFactory;

impl BlockParserFactory for IndentedCodeFactory {
    fn try_start(
        &self,
        state: &LineState,
        _matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        // Indented lines cannot interrupt a paragraph, not even a lazy one.
        if state.indent() < CODE_BLOCK_INDENT
            || state.is_blank()
            || state.active_block_is_paragraph()
        {
            return Ok(None);
        }
        Ok(Some(
            BlockStart::of(IndentedCodeParser::default())
                .at_column(state.column() + CODE_BLOCK_INDENT),
        ))
    }
}

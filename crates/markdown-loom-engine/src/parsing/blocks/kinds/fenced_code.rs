use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, Line,
            LineState, MatchedBlock,
        },
        chars::{CODE_BLOCK_INDENT, skip_space_tab},
        link_syntax::unescape,
    },
};

/// Fenced code is a raw zone: its lines never reach block or inline
/// parsing.
pub struct FencedCodeParser {
    fence_char: char,
    fence_len: usize,
    /// Indent of the opening fence, stripped from content lines.
    fence_indent: usize,
    info: Option<String>,
    literal: String,
}

impl FencedCodeParser {
    /// Opening fence at the start of `s`: the fence character and run
    /// length.
    fn opener(s: &str) -> Option<(char, usize)> {
        let fence_char = match s.bytes().next()? {
            b'`' => '`',
            b'~' => '~',
            _ => return None,
        };
        let len = s.chars().take_while(|&c| c == fence_char).count();
        if len < 3 {
            return None;
        }
        // A backtick fence's info string may not contain backticks.
        if fence_char == '`' && s[len..].contains('`') {
            return None;
        }
        Some((fence_char, len))
    }

    fn is_closing(&self, s: &str) -> bool {
        let len = s.chars().take_while(|&c| c == self.fence_char).count();
        len >= self.fence_len && skip_space_tab(s, len) == s.len()
    }
}

impl BlockParser for FencedCodeParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::FencedCodeBlock {
            fence_char: self.fence_char,
            fence_len: self.fence_len,
            info: String::new(),
            literal: String::new(),
        }
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        let offset = state.next_non_space_index();
        if state.indent() < CODE_BLOCK_INDENT && self.is_closing(&state.text()[offset..]) {
            return Ok(BlockContinue::Finished);
        }
        let mut index = state.index();
        let mut strip = self.fence_indent;
        while strip > 0 && state.char_at(index) == Some(' ') {
            index += 1;
            strip -= 1;
        }
        Ok(BlockContinue::AtIndex(index))
    }

    fn add_line(&mut self, line: Line) {
        // The rest of the opening line is the info string.
        if self.info.is_none() {
            self.info = Some(unescape(line.content.to_string().trim()));
        } else {
            self.literal.push_str(&line.content.to_string());
            self.literal.push('\n');
        }
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        if let NodeKind::FencedCodeBlock { info, literal, .. } = ctx.kind_mut() {
            *info = self.info.take().unwrap_or_default();
            *literal = std::mem::take(&mut self.literal);
        }
        Ok(())
    }
}

pub struct FencedCodeFactory;

impl BlockParserFactory for FencedCodeFactory {
    fn try_start(
        &self,
        state: &LineState,
        _matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        if state.indent() >= CODE_BLOCK_INDENT {
            return Ok(None);
        }
        let offset = state.next_non_space_index();
        let Some((fence_char, fence_len)) = FencedCodeParser::opener(&state.text()[offset..])
        else {
            return Ok(None);
        };
        let parser = FencedCodeParser {
            fence_char,
            fence_len,
            fence_indent: state.indent(),
            info: None,
            literal: String::new(),
        };
        Ok(Some(
            BlockStart::of(parser).at_index(offset + fence_len * fence_char.len_utf8()),
        ))
    }
}

use regex::Regex;

use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, Line,
            LineState, MatchedBlock,
        },
        chars::CODE_BLOCK_INDENT,
        html::HTML_BLOCK_KINDS,
    },
};

/// Raw HTML kept verbatim until its end condition: a closing pattern on
/// some line (kinds 1 to 5) or a blank line (kinds 6 and 7).
pub struct HtmlBlockParser {
    closer: Option<&'static Regex>,
    finished: bool,
    lines: Vec<String>,
}

impl BlockParser for HtmlBlockParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::HtmlBlock {
            literal: String::new(),
        }
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        if self.finished || (state.is_blank() && self.closer.is_none()) {
            Ok(BlockContinue::NoMatch)
        } else {
            Ok(BlockContinue::Continue)
        }
    }

    fn add_line(&mut self, line: Line) {
        let text = line.content.to_string();
        if self.closer.is_some_and(|closer| closer.is_match(&text)) {
            self.finished = true;
        }
        self.lines.push(text);
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        if let NodeKind::HtmlBlock { literal } = ctx.kind_mut() {
            *literal = self.lines.join("\n");
        }
        Ok(())
    }
}

pub struct HtmlBlockFactory;

impl BlockParserFactory for HtmlBlockFactory {
    fn try_start(
        &self,
        state: &LineState,
        matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        let offset = state.next_non_space_index();
        if state.indent() >= CODE_BLOCK_INDENT || state.char_at(offset) != Some('<') {
            return Ok(None);
        }
        let rest = &state.text()[offset..];
        for (kind, (opener, closer)) in HTML_BLOCK_KINDS.iter().enumerate() {
            // The last kind cannot interrupt a paragraph, lazy or not.
            let last_kind = kind == HTML_BLOCK_KINDS.len() - 1;
            if last_kind
                && (matches!(matched.kind(), NodeKind::Paragraph)
                    || state.active_block_accepts_lazy_lines())
            {
                continue;
            }
            if opener.is_match(rest) {
                let parser = HtmlBlockParser {
                    closer: closer.as_ref(),
                    finished: false,
                    lines: Vec::new(),
                };
                return Ok(Some(BlockStart::of(parser).at_index(state.index())));
            }
        }
        Ok(None)
    }
}

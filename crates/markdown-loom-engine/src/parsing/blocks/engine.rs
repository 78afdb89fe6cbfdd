use super::{
    kinds::{document::DocumentParser, paragraph::ParagraphParser},
    state::LineState,
    traits::{
        BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock,
        PendingInline,
    },
};
use crate::{
    ast::{Ast, NodeId, NodeKind},
    error::ParseError,
    options::LineEndings,
    parsing::{chars::is_blank, references::ReferenceMap},
    registry::Descriptor,
    sequence::{BasedSequence, SegmentedSequence},
};

/// What the engine did with one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// A block consumed the line as its last one.
    Closed,
    /// The line continued a paragraph although some enclosing containers
    /// did not match it. Those containers stay open.
    LazyContinuation,
    /// The line was added to a matched or newly started block.
    Content,
    Blank,
}

/// An open block: its parser, its node and the local source offsets it
/// spans so far.
struct OpenBlock {
    parser: Box<dyn BlockParser>,
    node: NodeId,
    start: usize,
    end: usize,
}

/// Result of the block phase: the block tree, the link reference
/// definitions and the leaf contents waiting for inline parsing.
pub(crate) struct BlockOutput {
    pub ast: Ast,
    pub references: ReferenceMap,
    pub pending: Vec<PendingInline>,
}

/// Line-at-a-time block tree construction over a stack of open blocks.
pub(crate) struct BlockBuilder<'a> {
    factories: &'a [Descriptor<dyn BlockParserFactory>],
    source: BasedSequence,
    ast: Ast,
    open: Vec<OpenBlock>,
    references: ReferenceMap,
    pending: Vec<PendingInline>,
    state: LineState,
    line_number: usize,
}

impl<'a> BlockBuilder<'a> {
    pub(crate) fn new(
        factories: &'a [Descriptor<dyn BlockParserFactory>],
        source: BasedSequence,
        tab_width: usize,
    ) -> Self {
        let ast = Ast::new(SegmentedSequence::empty());
        let document = OpenBlock {
            parser: Box::new(DocumentParser),
            node: ast.root(),
            start: 0,
            end: source.len(),
        };
        Self {
            factories,
            source,
            ast,
            open: vec![document],
            references: ReferenceMap::new(),
            pending: Vec::new(),
            state: LineState::new(tab_width),
            line_number: 0,
        }
    }

    /// Runs the block phase over every line of `source`.
    pub(crate) fn parse(
        factories: &'a [Descriptor<dyn BlockParserFactory>],
        source: BasedSequence,
        tab_width: usize,
        line_endings: LineEndings,
    ) -> Result<BlockOutput, ParseError> {
        let mut builder = Self::new(factories, source.clone(), tab_width);
        for (line, eol) in split_lines(&source) {
            let eol = match line_endings {
                LineEndings::Normalize if !eol.is_empty() => SegmentedSequence::literal("\n"),
                _ => eol.into(),
            };
            builder.push_line(line, eol)?;
        }
        builder.finish()
    }

    pub(crate) fn push_line(
        &mut self,
        line: BasedSequence,
        eol: SegmentedSequence,
    ) -> Result<LineOutcome, ParseError> {
        self.line_number += 1;
        self.state.set_line(line, eol);
        let outcome = self.parse_line()?;
        log::trace!("line {}: {outcome:?}", self.line_number);
        Ok(outcome)
    }

    /// Closes every open block, the document last.
    pub(crate) fn finish(mut self) -> Result<BlockOutput, ParseError> {
        self.close_blocks(self.open.len())?;
        Ok(BlockOutput {
            ast: self.ast,
            references: self.references,
            pending: self.pending,
        })
    }

    fn parse_line(&mut self) -> Result<LineOutcome, ParseError> {
        let blank_line = is_blank(self.state.text());

        // Continue open blocks outermost first; the document always matches.
        let mut matches = 1;
        for i in 1..self.open.len() {
            self.state.find_next_non_space();
            self.sync_active();
            match self.open[i].parser.try_continue(&self.state)? {
                BlockContinue::NoMatch => break,
                BlockContinue::Finished => {
                    self.extend_open_blocks();
                    self.close_blocks(self.open.len() - i)?;
                    return Ok(LineOutcome::Closed);
                }
                BlockContinue::Continue => {}
                BlockContinue::AtIndex(index) => self.state.set_new_index(index),
                BlockContinue::AtColumn(column) => self.state.set_new_column(column),
            }
            matches += 1;
        }

        let mut unmatched = self.open.len() - matches;
        let mut current = matches - 1;
        let mut started = false;
        let mut try_starts = {
            let block = &self.open[current];
            block.parser.is_container() || matches!(self.ast.kind(block.node), NodeKind::Paragraph)
        };

        while try_starts {
            self.state.find_next_non_space();
            self.sync_active();
            let next_non_space = self.state.next_non_space_index();
            if self.state.is_blank() {
                self.state.set_new_index(next_non_space);
                break;
            }
            let Some(start) = self.find_block_start(current)? else {
                self.state.set_new_index(next_non_space);
                break;
            };
            started = true;
            let begin = self.offset(next_non_space);

            if unmatched > 0 {
                self.close_blocks(unmatched)?;
                unmatched = 0;
            }
            let BlockStart {
                parsers,
                new_index,
                new_column,
                replace_active_block,
            } = start;
            if let Some(index) = new_index {
                self.state.set_new_index(index);
            } else if let Some(column) = new_column {
                self.state.set_new_column(column);
            }
            let mut replaced_start = None;
            if replace_active_block {
                replaced_start = self.replace_active_block()?;
            }
            for parser in parsers {
                self.add_child(parser, replaced_start.take().unwrap_or(begin))?;
            }
            current = self.open.len() - 1;
            try_starts = self.open[current].parser.is_container();
        }

        // Blank after the matched container prefixes, e.g. a bare `>`.
        self.state.find_next_non_space();
        let rest_blank = self.state.is_blank();
        let outcome = if !started && !rest_blank && self.active_accepts_lazy_lines() {
            // Unmatched containers stay open around the continued paragraph.
            self.add_line();
            if unmatched > 0 {
                LineOutcome::LazyContinuation
            } else {
                LineOutcome::Content
            }
        } else {
            if unmatched > 0 {
                self.close_blocks(unmatched)?;
            }
            let top_is_container = self
                .open
                .last()
                .is_some_and(|block| block.parser.is_container());
            if !top_is_container {
                self.add_line();
            } else if !self.state.is_blank() {
                let begin = self.offset(self.state.index());
                self.add_child(Box::new(ParagraphParser::new()), begin)?;
                self.add_line();
            }
            if !started && rest_blank {
                LineOutcome::Blank
            } else {
                LineOutcome::Content
            }
        };

        if !blank_line {
            self.extend_open_blocks();
        }
        Ok(outcome)
    }

    /// Consults the factories in resolved order; the first start wins.
    fn find_block_start(&self, current: usize) -> Result<Option<BlockStart>, ParseError> {
        let block = &self.open[current];
        let matched = MatchedBlock {
            kind: self.ast.kind(block.node),
            parser: block.parser.as_ref(),
        };
        for factory in self.factories {
            if let Some(start) = factory.item().try_start(&self.state, &matched)? {
                log::trace!("line {}: `{}` starts a block", self.line_number, factory.id());
                return Ok(Some(start));
            }
        }
        Ok(None)
    }

    /// Tells the line state about the innermost open block.
    fn sync_active(&mut self) {
        let Some(top) = self.open.last() else {
            return;
        };
        let kind = self.ast.kind(top.node);
        let paragraph = matches!(kind, NodeKind::Paragraph);
        let list_item = matches!(kind, NodeKind::ListItem { .. });
        let lazy = top.parser.can_have_lazy_continuation_lines();
        self.state.set_active(paragraph, list_item, lazy);
    }

    fn active_accepts_lazy_lines(&self) -> bool {
        self.open
            .last()
            .is_some_and(|block| block.parser.can_have_lazy_continuation_lines())
    }

    fn add_line(&mut self) {
        let line = self.state.rest();
        if let Some(top) = self.open.last_mut() {
            top.parser.add_line(line);
        }
    }

    /// Opens a block under the innermost open block that can contain it,
    /// closing the blocks that cannot.
    fn add_child(&mut self, parser: Box<dyn BlockParser>, start: usize) -> Result<(), ParseError> {
        let kind = parser.create_node();
        while let Some(top) = self.open.last_mut()
            && !top.parser.can_contain(&kind)
        {
            self.close_blocks(1)?;
        }
        let parent = self.open.last().map_or(self.ast.root(), |block| block.node);
        let node = self.ast.create(kind, SegmentedSequence::empty());
        self.ast.append_child(parent, node);
        self.open.push(OpenBlock {
            parser,
            node,
            start,
            end: start,
        });
        Ok(())
    }

    /// Finalizes and detaches the active block, returning where its
    /// replacement starts.
    fn replace_active_block(&mut self) -> Result<Option<usize>, ParseError> {
        let Some(block) = self.open.pop() else {
            return Ok(None);
        };
        let base = self.source.start_offset();
        let start = block
            .parser
            .paragraph_content()
            .and_then(|content| content.source_range())
            .map_or(block.start, |range| range.start - base);
        let node = block.node;
        self.finalize(block)?;
        // Its queued inline content is skipped once the node is detached.
        self.ast.unlink(node);
        Ok(Some(start))
    }

    fn close_blocks(&mut self, count: usize) -> Result<(), ParseError> {
        for _ in 0..count {
            let Some(block) = self.open.pop() else {
                break;
            };
            self.finalize(block)?;
        }
        Ok(())
    }

    fn finalize(&mut self, mut block: OpenBlock) -> Result<(), ParseError> {
        let end = block.end.max(block.start);
        self.ast[block.node].chars = self.source.view(block.start, end).into();
        let mut ctx = BlockContext {
            ast: &mut self.ast,
            node: block.node,
            references: &mut self.references,
            pending: &mut self.pending,
        };
        block.parser.close_block(&mut ctx)
    }

    /// Every open block now spans the current line.
    fn extend_open_blocks(&mut self) {
        let end = self.state.line().end_offset() - self.source.start_offset();
        for block in &mut self.open {
            block.end = block.end.max(end);
        }
    }

    /// Local source offset of byte `index` of the current line.
    fn offset(&self, index: usize) -> usize {
        self.state.absolute(index) - self.source.start_offset()
    }
}

/// Splits `source` into lines and their endings (`\n`, `\r\n` or `\r`).
/// A final line ending does not start another, empty line.
fn split_lines(source: &BasedSequence) -> impl Iterator<Item = (BasedSequence, BasedSequence)> + '_ {
    let bytes = source.as_str().as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        let end = bytes[start..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .map_or(bytes.len(), |i| start + i);
        let eol_end = match bytes.get(end) {
            Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => end + 2,
            Some(_) => end + 1,
            None => end,
        };
        pos = eol_end;
        Some((source.view(start, end), source.view(end, eol_end)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parsing::blocks::kinds,
        registry::{DescriptorKind, Registrar, resolve},
    };
    use pretty_assertions::assert_eq;

    fn core_factories() -> Vec<Descriptor<dyn BlockParserFactory>> {
        let mut registrar = Registrar::default();
        kinds::register(&mut registrar);
        resolve(DescriptorKind::BlockFactory, registrar.block_factories)
            .expect("core factories resolve")
    }

    fn outcomes(input: &str) -> Vec<LineOutcome> {
        let factories = core_factories();
        let source = BasedSequence::new(input);
        let mut builder = BlockBuilder::new(&factories, source.clone(), 4);
        let outcomes = split_lines(&source)
            .map(|(line, eol)| builder.push_line(line, eol.into()))
            .collect::<Result<Vec<_>, _>>()
            .expect("lines parse");
        builder.finish().expect("blocks close");
        outcomes
    }

    fn blocks(input: &str) -> BlockOutput {
        let factories = core_factories();
        BlockBuilder::parse(&factories, BasedSequence::new(input), 4, LineEndings::Preserve)
            .expect("blocks parse")
    }

    fn names(output: &BlockOutput) -> Vec<&'static str> {
        output
            .ast
            .descendants(output.ast.root())
            .map(|id| output.ast.kind(id).name())
            .collect()
    }

    #[test]
    fn splits_every_line_ending_style() {
        let source = BasedSequence::new("a\r\nb\rc\nd");
        let lines: Vec<_> = split_lines(&source)
            .map(|(line, eol)| (line.to_string(), eol.to_string()))
            .collect();
        assert_eq!(
            lines,
            [
                ("a".to_string(), "\r\n".to_string()),
                ("b".to_string(), "\r".to_string()),
                ("c".to_string(), "\n".to_string()),
                ("d".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        assert_eq!(split_lines(&BasedSequence::new("a\n")).count(), 1);
        assert_eq!(split_lines(&BasedSequence::new("")).count(), 0);
    }

    #[test]
    fn paragraph_continues_lazily_inside_a_quote() {
        assert_eq!(
            outcomes("> foo\nbar\n\nbaz"),
            [
                LineOutcome::Content,
                LineOutcome::LazyContinuation,
                LineOutcome::Blank,
                LineOutcome::Content,
            ]
        );
        let output = blocks("> foo\nbar");
        assert_eq!(names(&output), ["Document", "BlockQuote", "Paragraph"]);
    }

    #[test]
    fn bare_quote_marker_ends_the_paragraph() {
        assert_eq!(
            outcomes("> foo\n>\n> bar"),
            [LineOutcome::Content, LineOutcome::Blank, LineOutcome::Content]
        );
        let output = blocks("> foo\n>\n> bar");
        assert_eq!(
            names(&output),
            ["Document", "BlockQuote", "Paragraph", "Paragraph"]
        );
        let contents: Vec<_> = output.pending.iter().map(|p| p.content.to_string()).collect();
        assert_eq!(contents, ["foo", "bar"]);
    }

    #[test]
    fn bare_quote_marker_ends_a_nested_list_item() {
        let output = blocks("> - a\n>\n> b");
        assert_eq!(
            names(&output),
            [
                "Document",
                "BlockQuote",
                "BulletList",
                "ListItem",
                "Paragraph",
                "Paragraph"
            ]
        );
        let quote = output.ast.children(output.ast.root()).next().expect("quote");
        assert_eq!(output.ast.children(quote).count(), 2);
    }

    #[test]
    fn closing_fence_finishes_the_block() {
        assert_eq!(
            outcomes("```\ncode\n```\nafter"),
            [
                LineOutcome::Content,
                LineOutcome::Content,
                LineOutcome::Closed,
                LineOutcome::Content,
            ]
        );
        let output = blocks("```rust\ncode\n```\n");
        let fence = output.ast.children(output.ast.root()).next().expect("fence");
        assert_eq!(output.ast[fence].chars.to_string(), "```rust\ncode\n```");
        match output.ast.kind(fence) {
            NodeKind::FencedCodeBlock { info, literal, .. } => {
                assert_eq!(info, "rust");
                assert_eq!(literal, "code\n");
            }
            other => panic!("expected a fenced code block, got {other:?}"),
        }
    }

    #[test]
    fn nested_quotes_strip_exactly_their_markers() {
        let output = blocks("> > > text");
        assert_eq!(
            names(&output),
            ["Document", "BlockQuote", "BlockQuote", "BlockQuote", "Paragraph"]
        );
        assert_eq!(output.pending.len(), 1);
        assert_eq!(output.pending[0].content.to_string(), "text");
        assert_eq!(output.pending[0].content.source_range(), Some(6..10));
    }

    #[test]
    fn setext_underline_replaces_the_paragraph() {
        let output = blocks("Title\n=====\n");
        let root = output.ast.root();
        let children: Vec<_> = output.ast.children(root).collect();
        assert_eq!(children.len(), 1);
        assert!(matches!(
            output.ast.kind(children[0]),
            NodeKind::Heading {
                level: 1,
                setext: true
            }
        ));
        assert_eq!(output.ast[children[0]].chars.to_string(), "Title\n=====");
        let attached: Vec<_> = output
            .pending
            .iter()
            .filter(|p| output.ast.is_attached(p.node))
            .map(|p| p.content.to_string())
            .collect();
        assert_eq!(attached, ["Title"]);
    }

    #[test]
    fn blank_line_between_items_makes_the_list_loose() {
        let tight = blocks("- a\n- b\n");
        let list = tight.ast.children(tight.ast.root()).next().expect("list");
        assert!(matches!(
            tight.ast.kind(list),
            NodeKind::BulletList { tight: true, .. }
        ));

        let loose = blocks("- a\n\n- b\n");
        let list = loose.ast.children(loose.ast.root()).next().expect("list");
        assert!(matches!(
            loose.ast.kind(list),
            NodeKind::BulletList { tight: false, .. }
        ));
        assert_eq!(loose.ast.children(list).count(), 2);
    }

    #[test]
    fn indented_code_cannot_interrupt_a_paragraph() {
        let output = blocks("para\n    more\n");
        assert_eq!(names(&output), ["Document", "Paragraph"]);
        assert_eq!(output.pending[0].content.to_string(), "para\nmore");
    }

    #[test]
    fn indented_code_drops_trailing_blank_lines() {
        let output = blocks("    a\n\n    b\n\n\n");
        let code = output.ast.children(output.ast.root()).next().expect("code");
        match output.ast.kind(code) {
            NodeKind::IndentedCodeBlock { literal } => assert_eq!(literal, "a\n\nb\n"),
            other => panic!("expected indented code, got {other:?}"),
        }
    }

    #[test]
    fn reference_definitions_leave_the_paragraph() {
        let output = blocks("[foo]: /url \"t\"\n");
        assert_eq!(names(&output), ["Document", "LinkReferenceDefinition"]);
        assert!(output.references.get("FOO").is_some());
    }

    #[test]
    fn empty_document_is_just_the_root() {
        let output = blocks("");
        assert_eq!(output.ast.len(), 1);
        assert!(output.pending.is_empty());
    }
}

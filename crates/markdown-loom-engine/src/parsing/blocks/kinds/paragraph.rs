use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{BlockContext, BlockContinue, BlockParser, Line, LineState},
        references::{LinkReference, parse_definitions},
    },
    sequence::{SegmentedSequence, SequenceBuilder},
};

/// Accumulates paragraph lines. Paragraphs are the only blocks that accept
/// lazy continuation lines.
///
/// Link reference definitions at the start of the paragraph are split off
/// when it closes; a paragraph made only of definitions disappears.
#[derive(Debug, Default)]
pub struct ParagraphParser {
    lines: Vec<Line>,
}

impl ParagraphParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines joined by their own line endings; the last ending is dropped.
    fn content(&self) -> SegmentedSequence {
        let mut builder = SequenceBuilder::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                builder.push_sequence(&self.lines[i - 1].eol);
            }
            builder.push_sequence(&line.content);
        }
        builder.build()
    }
}

impl BlockParser for ParagraphParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::Paragraph
    }

    fn can_have_lazy_continuation_lines(&self) -> bool {
        true
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        if state.is_blank() {
            Ok(BlockContinue::NoMatch)
        } else {
            Ok(BlockContinue::Continue)
        }
    }

    fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    fn paragraph_content(&self) -> Option<SegmentedSequence> {
        let content = self.content();
        let (_, rest) = parse_definitions(&content.to_string());
        let remaining = content.sub_sequence_from(rest).ok()?.trim_end();
        (!remaining.is_empty()).then_some(remaining)
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        let content = self.content();
        let (defs, rest) = parse_definitions(&content.to_string());
        let had_definitions = !defs.is_empty();
        for def in defs {
            let chars = content.sub_sequence(def.range.start, def.range.end)?;
            ctx.insert_before(
                NodeKind::LinkReferenceDefinition {
                    label: def.label.clone(),
                    destination: def.destination.clone(),
                    title: def.title.clone(),
                },
                chars,
            );
            ctx.define_reference(
                &def.label,
                LinkReference {
                    destination: def.destination,
                    title: def.title,
                },
            );
        }

        let remaining = content.sub_sequence_from(rest)?.trim_end();
        if remaining.is_empty() {
            ctx.remove_node();
            return Ok(());
        }
        if had_definitions {
            *ctx.chars_mut() = remaining.clone();
        }
        ctx.parse_inlines(remaining);
        Ok(())
    }
}

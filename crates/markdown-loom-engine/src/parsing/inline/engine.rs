use std::collections::HashMap;

use super::{
    delimiters::{Content, DelimiterStack, NewDelimiter},
    scanner::InlineScanner,
    traits::{DelimiterProcessor, InlineContentParser},
};
use crate::{
    ast::{Ast, NodeId, NodeKind},
    error::{ConfigError, ParseError},
    parsing::{
        chars::{Flanking, skip_space_tab},
        link_syntax::{
            scan_link_destination, scan_link_label, scan_link_title, skip_spaces_and_newline,
        },
        references::ReferenceMap,
    },
    registry::Descriptor,
    sequence::{SegmentedSequence, SequenceBuilder},
};

/// The resolved inline configuration, indexed for lookup by character.
#[derive(Default)]
pub(crate) struct InlineSyntax {
    content_parsers: HashMap<char, Vec<Descriptor<dyn InlineContentParser>>>,
    openers: HashMap<char, Descriptor<dyn DelimiterProcessor>>,
    closers: HashMap<char, Descriptor<dyn DelimiterProcessor>>,
}

impl InlineSyntax {
    /// Indexes content parsers by trigger, keeping resolved order, and
    /// delimiter processors by their characters. A character claimed by two
    /// processors is a conflict.
    pub(crate) fn new(
        parsers: &[Descriptor<dyn InlineContentParser>],
        processors: &[Descriptor<dyn DelimiterProcessor>],
    ) -> Result<Self, ConfigError> {
        let mut syntax = Self::default();
        for parser in parsers {
            for &trigger in parser.item().triggers() {
                syntax
                    .content_parsers
                    .entry(trigger)
                    .or_default()
                    .push(parser.clone());
            }
        }
        for processor in processors {
            let item = processor.item();
            for (map, ch) in [
                (&mut syntax.openers, item.opening_char()),
                (&mut syntax.closers, item.closing_char()),
            ] {
                if let Some(existing) = map.get(&ch) {
                    return Err(ConfigError::DelimiterConflict {
                        ch,
                        first: existing.id().to_string(),
                        second: processor.id().to_string(),
                    });
                }
                map.insert(ch, processor.clone());
            }
        }
        Ok(syntax)
    }

    fn is_delimiter(&self, c: char) -> bool {
        self.openers.contains_key(&c) || self.closers.contains_key(&c)
    }

    fn is_special(&self, c: char) -> bool {
        matches!(c, '[' | ']' | '!' | '\n' | '\r')
            || self.is_delimiter(c)
            || self.content_parsers.contains_key(&c)
    }
}

/// An unclosed `[` or `![`.
#[derive(Debug)]
struct Bracket {
    node: NodeId,
    image: bool,
    position: usize,
    /// Cleared inside a link so links cannot nest.
    active: bool,
    /// Another bracket follows, so a shortcut reference is not possible.
    bracket_after: bool,
}

/// Parses `chars` into inline children of `block`.
pub(crate) fn parse_inlines(
    syntax: &InlineSyntax,
    references: &ReferenceMap,
    ast: &mut Ast,
    block: NodeId,
    chars: &SegmentedSequence,
) -> Result<(), ParseError> {
    let text = chars.to_string();
    let mut parser = InlineParser {
        syntax,
        references,
        ast,
        block,
        content: Content {
            text: &text,
            chars,
        },
        pos: 0,
        delimiters: DelimiterStack::default(),
        brackets: Vec::new(),
    };
    parser.run()
}

struct InlineParser<'a> {
    syntax: &'a InlineSyntax,
    references: &'a ReferenceMap,
    ast: &'a mut Ast,
    block: NodeId,
    content: Content<'a>,
    pos: usize,
    delimiters: DelimiterStack,
    brackets: Vec<Bracket>,
}

impl InlineParser<'_> {
    fn run(&mut self) -> Result<(), ParseError> {
        let text = self.content.text;
        while let Some(c) = text[self.pos..].chars().next() {
            if self.try_content_parsers(c)? {
                continue;
            }
            match c {
                '[' => self.open_bracket(false)?,
                '!' if text[self.pos + 1..].starts_with('[') => self.open_bracket(true)?,
                ']' => self.close_bracket()?,
                '\n' | '\r' => self.line_break()?,
                c if self.syntax.is_delimiter(c) => self.delimiter_run(c)?,
                _ => self.text_run()?,
            }
        }
        self.process_delimiters(0)?;
        merge_text_nodes(self.ast, self.block);
        Ok(())
    }

    fn try_content_parsers(&mut self, c: char) -> Result<bool, ParseError> {
        let Some(parsers) = self.syntax.content_parsers.get(&c) else {
            return Ok(false);
        };
        let scanner = InlineScanner::new(self.content.text, self.pos);
        for parser in parsers {
            let Some(parsed) = parser.item().try_parse(&scanner)? else {
                continue;
            };
            let start = self.pos;
            let end = start + parsed.len;
            let child_fits = parsed
                .text_child
                .as_ref()
                .is_none_or(|r| r.start <= r.end && r.end <= parsed.len);
            if parsed.len == 0 || end > self.content.text.len() || !child_fits {
                return Err(ParseError::Extension {
                    extension: parser.id().to_string(),
                    message: format!("invalid match of {} bytes at offset {start}", parsed.len),
                });
            }
            log::trace!("inline `{}` matched {start}..{end}", parser.id());
            let node = self.append(parsed.kind, start, end)?;
            if let Some(range) = parsed.text_child {
                let (from, to) = (start + range.start, start + range.end);
                let child = self.ast.create(
                    NodeKind::text(&self.content.text[from..to]),
                    self.content.chars.sub_sequence(from, to)?,
                );
                self.ast.append_child(node, child);
            }
            self.pos = end;
            return Ok(true);
        }
        Ok(false)
    }

    /// Appends a node covering `start..end` to the block.
    fn append(&mut self, kind: NodeKind, start: usize, end: usize) -> Result<NodeId, ParseError> {
        let node = self
            .ast
            .create(kind, self.content.chars.sub_sequence(start, end)?);
        self.ast.append_child(self.block, node);
        Ok(node)
    }

    fn append_text(&mut self, start: usize, end: usize) -> Result<NodeId, ParseError> {
        let kind = NodeKind::text(&self.content.text[start..end]);
        self.append(kind, start, end)
    }

    /// Plain text up to the next special character. Spaces before a line
    /// ending belong to the line break.
    fn text_run(&mut self) -> Result<(), ParseError> {
        let text = self.content.text;
        let start = self.pos;
        let mut end = start;
        for (i, c) in text[start..].char_indices() {
            if i > 0 && self.syntax.is_special(c) {
                break;
            }
            end = start + i + c.len_utf8();
        }
        if text[end..].starts_with(['\n', '\r']) {
            end = start + text[start..end].trim_end_matches(' ').len();
            if end == start {
                return self.line_break();
            }
        }
        self.append_text(start, end)?;
        self.pos = end;
        Ok(())
    }

    /// Trailing spaces, the line ending and the next line's indentation.
    fn line_break(&mut self) -> Result<(), ParseError> {
        let text = self.content.text;
        let start = self.pos;
        let spaces = text[start..].bytes().take_while(|&b| b == b' ').count();
        let mut end = start + spaces;
        end += if text[end..].starts_with("\r\n") {
            2
        } else {
            usize::from(text[end..].starts_with(['\n', '\r']))
        };
        end = skip_space_tab(text, end);
        let kind = if spaces >= 2 {
            NodeKind::HardLineBreak
        } else {
            NodeKind::SoftLineBreak
        };
        self.append(kind, start, end)?;
        self.pos = end;
        Ok(())
    }

    fn delimiter_run(&mut self, c: char) -> Result<(), ParseError> {
        let text = self.content.text;
        let start = self.pos;
        let len = text[start..].chars().take_while(|&x| x == c).count();
        let end = start + len * c.len_utf8();
        let node = self.append_text(start, end)?;
        self.pos = end;

        let opener = self.syntax.openers.get(&c);
        let Some(processor) = opener.or_else(|| self.syntax.closers.get(&c)) else {
            return Ok(());
        };
        let processor = processor.item();
        if len < processor.min_length() {
            return Ok(());
        }
        let flanking = Flanking::of(text[..start].chars().next_back(), text[end..].chars().next());
        let (can_open, can_close) = if processor.allows_intraword() {
            flanking.intraword()
        } else {
            flanking.word_bounded()
        };
        let can_open = can_open && opener.is_some();
        let can_close = can_close && self.syntax.closers.contains_key(&c);
        if can_open || can_close {
            self.delimiters.push(NewDelimiter {
                ch: c,
                node,
                start,
                end,
                len,
                can_open,
                can_close,
            });
        }
        Ok(())
    }

    fn process_delimiters(&mut self, bottom: usize) -> Result<(), ParseError> {
        self.delimiters
            .process(bottom, self.ast, &self.content, &self.syntax.closers)
    }

    fn open_bracket(&mut self, image: bool) -> Result<(), ParseError> {
        let start = self.pos;
        let end = start + if image { 2 } else { 1 };
        let node = self.append_text(start, end)?;
        if let Some(previous) = self.brackets.last_mut() {
            previous.bracket_after = true;
        }
        self.brackets.push(Bracket {
            node,
            image,
            position: start,
            active: true,
            bracket_after: false,
        });
        self.pos = end;
        Ok(())
    }

    fn close_bracket(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let Some(bracket) = self.brackets.pop() else {
            self.append_text(start, start + 1)?;
            self.pos = start + 1;
            return Ok(());
        };
        let link = if bracket.active {
            self.inline_link(start + 1)
                .or_else(|| self.reference_link(&bracket, start))
        } else {
            None
        };
        let Some((destination, title, end)) = link else {
            self.append_text(start, start + 1)?;
            self.pos = start + 1;
            return Ok(());
        };

        let kind = if bracket.image {
            NodeKind::Image { destination, title }
        } else {
            NodeKind::Link { destination, title }
        };
        let link = self
            .ast
            .create(kind, self.content.chars.sub_sequence(bracket.position, end)?);
        let mut child = self.ast[bracket.node].next_sibling();
        while let Some(id) = child {
            child = self.ast[id].next_sibling();
            self.ast.unlink(id);
            self.ast.append_child(link, id);
        }
        self.ast.insert_after(bracket.node, link);
        self.process_delimiters(bracket.position)?;
        self.ast.unlink(bracket.node);
        if !bracket.image {
            for earlier in self.brackets.iter_mut().filter(|b| !b.image) {
                earlier.active = false;
            }
        }
        log::trace!("link {}..{end}", bracket.position);
        self.pos = end;
        Ok(())
    }

    /// `(destination "title")` right after the closing bracket.
    fn inline_link(&self, after: usize) -> Option<(String, Option<String>, usize)> {
        let text = self.content.text;
        if !text[after..].starts_with('(') {
            return None;
        }
        let dest_start = skip_spaces_and_newline(text, after + 1);
        let (dest_end, destination) = scan_link_destination(text, dest_start)?;
        let mut pos = skip_spaces_and_newline(text, dest_end);
        let mut title = None;
        if pos > dest_end
            && let Some((title_end, parsed)) = scan_link_title(text, pos)
        {
            title = Some(parsed);
            pos = skip_spaces_and_newline(text, title_end);
        }
        text[pos..]
            .starts_with(')')
            .then_some((destination, title, pos + 1))
    }

    /// Full `[text][label]`, collapsed `[text][]` or shortcut `[text]`
    /// reference.
    fn reference_link(
        &self,
        bracket: &Bracket,
        close: usize,
    ) -> Option<(String, Option<String>, usize)> {
        let text = self.content.text;
        let after = close + 1;
        let label_start = bracket.position + if bracket.image { 2 } else { 1 };
        let (label, end) = match scan_link_label(text, after) {
            Some(label_end) => (&text[after + 1..label_end - 1], label_end),
            None if text[after..].starts_with("[]") && !bracket.bracket_after => {
                (&text[label_start..close], after + 2)
            }
            None if !bracket.bracket_after => (&text[label_start..close], after),
            None => return None,
        };
        let reference = self.references.get(label)?;
        Some((reference.destination.clone(), reference.title.clone(), end))
    }
}

/// Joins adjacent text siblings everywhere under `root`. Each run of text
/// nodes is rebuilt once, so merging stays linear in the run's length.
fn merge_text_nodes(ast: &mut Ast, root: NodeId) {
    let parents: Vec<NodeId> = ast.descendants(root).collect();
    for parent in parents {
        let mut child = ast[parent].first_child();
        while let Some(first) = child {
            let mut run = vec![first];
            let mut next = ast[first].next_sibling();
            if matches!(ast.kind(first), NodeKind::Text { .. }) {
                while let Some(id) = next
                    && matches!(ast.kind(id), NodeKind::Text { .. })
                {
                    run.push(id);
                    next = ast[id].next_sibling();
                }
            }
            if run.len() > 1 {
                let mut literal = String::new();
                let mut chars = SequenceBuilder::new();
                for &id in &run {
                    if let NodeKind::Text { literal: part } = ast.kind(id) {
                        literal.push_str(part);
                    }
                    chars.push_sequence(&ast[id].chars);
                }
                for &id in &run[1..] {
                    ast.unlink(id);
                }
                let node = &mut ast[first];
                node.kind = NodeKind::Text { literal };
                node.chars = chars.build();
            }
            child = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::BasedSequence;
    use pretty_assertions::assert_eq;

    fn text_child(ast: &mut Ast, parent: NodeId, source: &BasedSequence, start: usize, end: usize) {
        let view = source.view(start, end);
        let node = ast.create(NodeKind::text(view.as_str()), view.into());
        ast.append_child(parent, node);
    }

    fn texts(ast: &Ast, parent: NodeId) -> Vec<(String, String)> {
        ast.children(parent)
            .map(|id| match ast.kind(id) {
                NodeKind::Text { literal } => (literal.clone(), ast[id].chars.to_string()),
                other => (other.name().to_string(), ast[id].chars.to_string()),
            })
            .collect()
    }

    #[test]
    fn text_runs_merge_at_every_level() {
        let source = BasedSequence::new("ab[cd*ef*gh");
        let mut ast = Ast::new(source.clone().into());
        let root = ast.root();
        let para = ast.create(NodeKind::Paragraph, source.clone().into());
        ast.append_child(root, para);
        text_child(&mut ast, para, &source, 0, 2);
        text_child(&mut ast, para, &source, 2, 3);
        text_child(&mut ast, para, &source, 3, 5);
        let emphasis = ast.create(
            NodeKind::Emphasis { delimiter: '*' },
            source.view(5, 9).into(),
        );
        ast.append_child(para, emphasis);
        text_child(&mut ast, emphasis, &source, 6, 7);
        text_child(&mut ast, emphasis, &source, 7, 8);
        text_child(&mut ast, para, &source, 9, 11);

        merge_text_nodes(&mut ast, para);

        assert_eq!(
            texts(&ast, para),
            [
                ("ab[cd".to_string(), "ab[cd".to_string()),
                ("Emphasis".to_string(), "*ef*".to_string()),
                ("gh".to_string(), "gh".to_string()),
            ]
        );
        assert_eq!(texts(&ast, emphasis), [("ef".to_string(), "ef".to_string())]);
        let first = ast[para].first_child().expect("merged text");
        assert_eq!(ast[first].chars.segments().len(), 1);
        assert_eq!(ast[first].chars.source_range(), Some(0..5));
    }

    #[test]
    fn long_bracket_run_becomes_one_text_node() {
        let input = "ab[".repeat(2_000);
        let source = BasedSequence::new(input.as_str());
        let syntax = InlineSyntax::default();
        let references = ReferenceMap::new();
        let mut ast = Ast::new(source.clone().into());
        let root = ast.root();
        let para = ast.create(NodeKind::Paragraph, source.clone().into());
        ast.append_child(root, para);

        parse_inlines(&syntax, &references, &mut ast, para, &source.clone().into())
            .expect("inline parse");

        let children: Vec<_> = ast.children(para).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(ast[children[0]].chars.source_range(), Some(0..input.len()));
        assert!(matches!(ast.kind(children[0]), NodeKind::Text { literal } if *literal == input));
    }
}

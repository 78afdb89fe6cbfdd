use std::collections::HashMap;

use super::traits::{DelimiterProcessor, DelimiterRun};
use crate::{
    ast::{Ast, NodeId, NodeKind},
    error::ParseError,
    registry::Descriptor,
    sequence::SegmentedSequence,
};

/// A delimiter run waiting for a partner. `start..end` is the unused part
/// of the run in the inline content; `node` is the text node holding it.
#[derive(Debug, Clone)]
struct Delimiter {
    ch: char,
    node: NodeId,
    /// Where the run started, used to bound searches.
    position: usize,
    start: usize,
    end: usize,
    len: usize,
    orig_len: usize,
    can_open: bool,
    can_close: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A new delimiter run for [`DelimiterStack::push`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewDelimiter {
    pub ch: char,
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
    pub len: usize,
    pub can_open: bool,
    pub can_close: bool,
}

/// The inline content being resolved: its text and the sequence node chars
/// are cut from.
pub(crate) struct Content<'a> {
    pub text: &'a str,
    pub chars: &'a SegmentedSequence,
}

/// Doubly linked delimiter stack stored in an arena. Removed entries are
/// unlinked and never revisited.
#[derive(Debug, Default)]
pub(crate) struct DelimiterStack {
    entries: Vec<Delimiter>,
    last: Option<usize>,
}

impl DelimiterStack {
    pub(crate) fn push(&mut self, new: NewDelimiter) {
        let index = self.entries.len();
        self.entries.push(Delimiter {
            ch: new.ch,
            node: new.node,
            position: new.start,
            start: new.start,
            end: new.end,
            len: new.len,
            orig_len: new.len,
            can_open: new.can_open,
            can_close: new.can_close,
            prev: self.last,
            next: None,
        });
        if let Some(last) = self.last {
            self.entries[last].next = Some(index);
        }
        self.last = Some(index);
    }

    fn remove(&mut self, index: usize) {
        let (prev, next) = (self.entries[index].prev, self.entries[index].next);
        if let Some(p) = prev {
            self.entries[p].next = next;
        }
        match next {
            Some(n) => self.entries[n].prev = prev,
            None => self.last = prev,
        }
    }

    fn run(&self, index: usize) -> DelimiterRun {
        let d = &self.entries[index];
        DelimiterRun {
            ch: d.ch,
            len: d.len,
            orig_len: d.orig_len,
            can_open: d.can_open,
            can_close: d.can_close,
        }
    }

    /// The lowest delimiter that started at or after `bottom`.
    fn first_from(&self, bottom: usize) -> Option<usize> {
        let mut first = None;
        let mut current = self.last;
        while let Some(i) = current {
            if self.entries[i].position < bottom {
                break;
            }
            first = Some(i);
            current = self.entries[i].prev;
        }
        first
    }

    /// Matches closers with openers among the delimiters that started at or
    /// after `bottom`, wrapping each matched pair's content, then drops every
    /// delimiter from `bottom` on. Unmatched runs remain plain text.
    pub(crate) fn process(
        &mut self,
        bottom: usize,
        ast: &mut Ast,
        content: &Content<'_>,
        closers: &HashMap<char, Descriptor<dyn DelimiterProcessor>>,
    ) -> Result<(), ParseError> {
        // Lowest position an opener may have, per (char, closer can open,
        // original length mod 3).
        let mut openers_bottom: HashMap<(char, bool, usize), usize> = HashMap::new();
        let mut closer = self.first_from(bottom);

        while let Some(c) = closer {
            let run = self.run(c);
            let Some(processor) = closers.get(&run.ch).filter(|_| run.can_close) else {
                closer = self.entries[c].next;
                continue;
            };
            let processor = processor.item();
            let key = (run.ch, run.can_open, run.orig_len % 3);
            let floor = openers_bottom.get(&key).copied().unwrap_or(bottom).max(bottom);

            let mut found = None;
            let mut rejected = false;
            let mut candidate = self.entries[c].prev;
            while let Some(o) = candidate {
                let opener = &self.entries[o];
                if opener.position < floor {
                    break;
                }
                if opener.can_open && opener.ch == processor.opening_char() {
                    let used = processor.process(&self.run(o), &run);
                    if used > 0 {
                        found = Some((o, used));
                        break;
                    }
                    rejected = true;
                }
                candidate = opener.prev;
            }

            let Some((o, used)) = found else {
                if !rejected {
                    openers_bottom.insert(key, self.entries[c].position);
                }
                let next = self.entries[c].next;
                if !run.can_open {
                    self.remove(c);
                }
                closer = next;
                continue;
            };

            let used = used.min(self.entries[o].len).min(self.entries[c].len);
            self.entries[o].len -= used;
            self.entries[o].end -= used * self.entries[o].ch.len_utf8();
            self.entries[c].len -= used;
            self.entries[c].start += used * run.ch.len_utf8();
            self.refresh_text(o, ast, content)?;
            self.refresh_text(c, ast, content)?;

            // Delimiters between the pair can no longer match anything.
            let mut between = self.entries[o].next;
            while let Some(i) = between {
                if i == c {
                    break;
                }
                between = self.entries[i].next;
                self.remove(i);
            }

            let (opener_node, closer_node) = (self.entries[o].node, self.entries[c].node);
            let wrapped = ast.create(
                processor.wrap(used),
                content
                    .chars
                    .sub_sequence(self.entries[o].end, self.entries[c].start)?,
            );
            let mut child = ast[opener_node].next_sibling();
            while let Some(id) = child {
                if id == closer_node {
                    break;
                }
                child = ast[id].next_sibling();
                ast.unlink(id);
                ast.append_child(wrapped, id);
            }
            ast.insert_after(opener_node, wrapped);
            log::trace!(
                "delimiters {:?} at {} and {} wrap {used}",
                run.ch,
                self.entries[o].position,
                self.entries[c].position
            );

            if self.entries[o].len == 0 {
                ast.unlink(opener_node);
                self.remove(o);
            }
            if self.entries[c].len == 0 {
                let next = self.entries[c].next;
                ast.unlink(closer_node);
                self.remove(c);
                closer = next;
            }
        }

        while let Some(last) = self.last {
            if self.entries[last].position < bottom {
                break;
            }
            self.remove(last);
        }
        Ok(())
    }

    /// Resets a delimiter's text node to the unused part of its run.
    fn refresh_text(
        &self,
        index: usize,
        ast: &mut Ast,
        content: &Content<'_>,
    ) -> Result<(), ParseError> {
        let d = &self.entries[index];
        let node = &mut ast[d.node];
        node.kind = NodeKind::text(&content.text[d.start..d.end]);
        node.chars = content.chars.sub_sequence(d.start, d.end)?;
        Ok(())
    }
}

use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::{
        blocks::{
            BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, LineState,
            MatchedBlock,
        },
        chars::{CODE_BLOCK_INDENT, columns_to_next_tab_stop, is_space_tab_or_end},
    },
};

/// Most digits an ordered list marker may have.
const MAX_ORDERED_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Bullet(char),
    Ordered { start: u32, delimiter: char },
}

impl Marker {
    /// Marker at the start of `s` and its byte length. The marker must be
    /// followed by a space, a tab or the end of the line.
    fn parse(s: &str) -> Option<(Self, usize)> {
        let first = s.chars().next()?;
        let (marker, len) = match first {
            '-' | '+' | '*' => (Marker::Bullet(first), 1),
            '0'..='9' => {
                let digits = s.bytes().take_while(u8::is_ascii_digit).count();
                if digits > MAX_ORDERED_DIGITS {
                    return None;
                }
                let delimiter = match s.as_bytes().get(digits) {
                    Some(b'.') => '.',
                    Some(b')') => ')',
                    _ => return None,
                };
                let start = s[..digits].parse().ok()?;
                (Marker::Ordered { start, delimiter }, digits + 1)
            }
            _ => return None,
        };
        is_space_tab_or_end(s[len..].chars().next()).then_some((marker, len))
    }

    fn continues(self, kind: &NodeKind) -> bool {
        match (self, kind) {
            (Marker::Bullet(c), NodeKind::BulletList { marker, .. }) => c == *marker,
            (Marker::Ordered { delimiter, .. }, NodeKind::OrderedList { delimiter: d, .. }) => {
                delimiter == *d
            }
            _ => false,
        }
    }
}

/// A bullet or ordered list. The list only contains items; it turns loose
/// when items are separated by blank lines.
pub struct ListParser {
    marker: Marker,
    had_blank_line: bool,
    lines_after_blank: usize,
    loose: bool,
}

impl BlockParser for ListParser {
    fn create_node(&self) -> NodeKind {
        match self.marker {
            Marker::Bullet(marker) => NodeKind::BulletList {
                marker,
                tight: true,
            },
            Marker::Ordered { start, delimiter } => NodeKind::OrderedList {
                start,
                delimiter,
                tight: true,
            },
        }
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, kind: &NodeKind) -> bool {
        if !matches!(kind, NodeKind::ListItem { .. }) {
            return false;
        }
        if self.had_blank_line && self.lines_after_blank == 1 {
            self.loose = true;
            self.had_blank_line = false;
        }
        true
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        if state.is_blank() {
            self.had_blank_line = true;
            self.lines_after_blank = 0;
        } else if self.had_blank_line {
            self.lines_after_blank += 1;
        }
        Ok(BlockContinue::Continue)
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        if self.loose {
            set_loose(ctx.kind_mut());
        }
        Ok(())
    }
}

/// One list item. Continuation lines must be indented to the item's
/// content column; the item may start with at most one blank line.
pub struct ListItemParser {
    marker_indent: usize,
    content_indent: usize,
    had_blank_line: bool,
    has_children: bool,
    loose: bool,
}

impl ListItemParser {
    fn new(marker_indent: usize, content_indent: usize) -> Self {
        Self {
            marker_indent,
            content_indent,
            had_blank_line: false,
            has_children: false,
            loose: false,
        }
    }
}

impl BlockParser for ListItemParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::ListItem {
            marker_indent: self.marker_indent,
            content_indent: self.content_indent,
        }
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, _kind: &NodeKind) -> bool {
        // Two children separated by a blank line make the list loose.
        if self.had_blank_line {
            self.loose = true;
        }
        self.has_children = true;
        true
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError> {
        if state.is_blank() {
            if !self.has_children {
                return Ok(BlockContinue::NoMatch);
            }
            self.had_blank_line =
                state.active_block_is_paragraph() || state.active_block_is_list_item();
            return Ok(BlockContinue::AtIndex(state.next_non_space_index()));
        }
        if state.indent() >= self.content_indent {
            Ok(BlockContinue::AtColumn(state.column() + self.content_indent))
        } else {
            Ok(BlockContinue::NoMatch)
        }
    }

    fn close_block(&mut self, ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        if self.loose
            && let Some(list) = ctx.parent_kind_mut()
        {
            set_loose(list);
        }
        Ok(())
    }
}

fn set_loose(kind: &mut NodeKind) {
    if let NodeKind::BulletList { tight, .. } | NodeKind::OrderedList { tight, .. } = kind {
        *tight = false;
    }
}

/// Starts list items, and a new list around them when the marker does not
/// continue the matched list.
pub struct ListFactory;

impl BlockParserFactory for ListFactory {
    fn try_start(
        &self,
        state: &LineState,
        matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError> {
        if state.indent() >= CODE_BLOCK_INDENT {
            return Ok(None);
        }
        let marker_index = state.next_non_space_index();
        let marker_column = state.column() + state.indent();
        let Some((marker, marker_len)) = Marker::parse(&state.text()[marker_index..]) else {
            return Ok(None);
        };
        let after_marker = marker_column + marker_len;

        let mut content_column = after_marker;
        let mut has_content = false;
        for c in state.text()[marker_index + marker_len..].chars() {
            match c {
                '\t' => content_column += columns_to_next_tab_stop(content_column, state.tab_width()),
                ' ' => content_column += 1,
                _ => {
                    has_content = true;
                    break;
                }
            }
        }

        // Interrupting a paragraph takes a non-empty item, and an ordered
        // one must start at 1.
        if matched.paragraph_content().is_some()
            && (matches!(marker, Marker::Ordered { start, .. } if start != 1) || !has_content)
        {
            return Ok(None);
        }

        if !has_content || content_column - after_marker > CODE_BLOCK_INDENT {
            content_column = after_marker + 1;
        }

        let item = ListItemParser::new(state.indent(), content_column - state.column());
        let start = if marker.continues(matched.kind()) {
            BlockStart::of(item)
        } else {
            let list = ListParser {
                marker,
                had_blank_line: false,
                lines_after_blank: 0,
                loose: false,
            };
            BlockStart::nested(vec![Box::new(list), Box::new(item)])
        };
        Ok(Some(start.at_column(content_column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("- foo", Some((Marker::Bullet('-'), 1)))]
    #[case("*", Some((Marker::Bullet('*'), 1)))]
    #[case("+\tfoo", Some((Marker::Bullet('+'), 1)))]
    #[case("-foo", None)]
    #[case("1. foo", Some((Marker::Ordered { start: 1, delimiter: '.' }, 2)))]
    #[case("42) foo", Some((Marker::Ordered { start: 42, delimiter: ')' }, 3)))]
    #[case("123456789. x", Some((Marker::Ordered { start: 123456789, delimiter: '.' }, 10)))]
    #[case("1234567890. x", None)]
    #[case("1.foo", None)]
    #[case("1 foo", None)]
    fn markers(#[case] line: &str, #[case] expected: Option<(Marker, usize)>) {
        assert_eq!(Marker::parse(line), expected);
    }

    #[test]
    fn marker_continues_only_a_matching_list() {
        let dash = Marker::Bullet('-');
        assert!(dash.continues(&NodeKind::BulletList {
            marker: '-',
            tight: true
        }));
        assert!(!dash.continues(&NodeKind::BulletList {
            marker: '*',
            tight: true
        }));
        let paren = Marker::Ordered {
            start: 3,
            delimiter: ')',
        };
        assert!(paren.continues(&NodeKind::OrderedList {
            start: 1,
            delimiter: ')',
            tight: true
        }));
        assert!(!paren.continues(&NodeKind::Paragraph));
    }
}

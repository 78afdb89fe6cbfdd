use crate::{
    parsing::chars::columns_to_next_tab_stop,
    sequence::{BasedSequence, SegmentedSequence, SequenceBuilder},
};

/// Text handed to a block parser for one line.
#[derive(Debug, Clone)]
pub struct Line {
    /// The unconsumed rest of the line. Columns left over from a partially
    /// consumed tab appear as synthetic leading spaces.
    pub content: SegmentedSequence,
    /// The line ending, empty on the last line. Synthetic `"\n"` when line
    /// endings are normalized.
    pub eol: SegmentedSequence,
}

/// Position of the block engine within the current line.
///
/// `index` is a byte offset into the line, `column` the visual column with
/// tabs expanded to the configured tab width. Parsers read this to decide
/// whether they continue or start; only the engine moves it.
#[derive(Debug, Clone)]
pub struct LineState {
    line: BasedSequence,
    eol: SegmentedSequence,
    tab_width: usize,
    index: usize,
    column: usize,
    partial_tab: bool,
    next_non_space: usize,
    next_non_space_column: usize,
    indent: usize,
    blank: bool,
    active_is_paragraph: bool,
    active_is_list_item: bool,
    active_accepts_lazy_lines: bool,
}

impl LineState {
    pub(crate) fn new(tab_width: usize) -> Self {
        Self {
            line: BasedSequence::empty(),
            eol: SegmentedSequence::empty(),
            tab_width,
            index: 0,
            column: 0,
            partial_tab: false,
            next_non_space: 0,
            next_non_space_column: 0,
            indent: 0,
            blank: true,
            active_is_paragraph: false,
            active_is_list_item: false,
            active_accepts_lazy_lines: false,
        }
    }

    pub(crate) fn set_line(&mut self, line: BasedSequence, eol: SegmentedSequence) {
        self.line = line;
        self.eol = eol;
        self.index = 0;
        self.column = 0;
        self.partial_tab = false;
        self.find_next_non_space();
    }

    pub(crate) fn set_active(&mut self, paragraph: bool, list_item: bool, lazy: bool) {
        self.active_is_paragraph = paragraph;
        self.active_is_list_item = list_item;
        self.active_accepts_lazy_lines = lazy;
    }

    /// The current line without its line ending.
    pub fn line(&self) -> &BasedSequence {
        &self.line
    }

    pub fn text(&self) -> &str {
        self.line.as_str()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn next_non_space_index(&self) -> usize {
        self.next_non_space
    }

    pub fn next_non_space_column(&self) -> usize {
        self.next_non_space_column
    }

    /// Columns of whitespace between the current position and the next
    /// non-space character.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// True when nothing but spaces and tabs remain.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Character at byte `index` of the line.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.line.char_at(index)
    }

    /// The innermost open block is a paragraph.
    pub fn active_block_is_paragraph(&self) -> bool {
        self.active_is_paragraph
    }

    /// The innermost open block is a list item.
    pub fn active_block_is_list_item(&self) -> bool {
        self.active_is_list_item
    }

    /// The innermost open block accepts lazy continuation lines.
    pub fn active_block_accepts_lazy_lines(&self) -> bool {
        self.active_accepts_lazy_lines
    }

    pub(crate) fn find_next_non_space(&mut self) {
        let bytes = self.line.as_str().as_bytes();
        let mut i = self.index;
        let mut cols = self.column;
        self.blank = true;
        while let Some(&b) = bytes.get(i) {
            match b {
                b' ' => cols += 1,
                b'\t' => cols += columns_to_next_tab_stop(cols, self.tab_width),
                _ => {
                    self.blank = false;
                    break;
                }
            }
            i += 1;
        }
        self.next_non_space = i;
        self.next_non_space_column = cols;
        self.indent = cols - self.column;
    }

    pub(crate) fn set_new_index(&mut self, new_index: usize) {
        if new_index >= self.next_non_space {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        while self.index < new_index && self.index < self.line.len() {
            self.advance();
        }
        self.partial_tab = false;
    }

    pub(crate) fn set_new_column(&mut self, new_column: usize) {
        if new_column >= self.next_non_space_column {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        while self.column < new_column && self.index < self.line.len() {
            self.advance();
        }
        if self.column > new_column {
            // Stopped inside a tab: step back onto it.
            self.index -= 1;
            self.column = new_column;
            self.partial_tab = true;
        } else {
            self.partial_tab = false;
        }
    }

    fn advance(&mut self) {
        let Some(c) = self.line.char_at(self.index) else {
            return;
        };
        self.index += c.len_utf8();
        if c == '\t' {
            self.column += columns_to_next_tab_stop(self.column, self.tab_width);
        } else {
            self.column += 1;
        }
    }

    /// The rest of the line from the current position.
    pub(crate) fn rest(&self) -> Line {
        let mut builder = SequenceBuilder::new();
        if self.partial_tab {
            let spaces = columns_to_next_tab_stop(self.column, self.tab_width);
            builder.push_literal(&" ".repeat(spaces));
            builder.push_based(self.line.view(self.index + 1, self.line.len()));
        } else {
            builder.push_based(self.line.view(self.index, self.line.len()));
        }
        Line {
            content: builder.build(),
            eol: self.eol.clone(),
        }
    }

    /// Absolute source offset of byte `index` of the line.
    pub(crate) fn absolute(&self, index: usize) -> usize {
        self.line.start_offset() + index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(line: &str) -> LineState {
        let mut s = LineState::new(4);
        s.set_line(BasedSequence::new(line), SegmentedSequence::empty());
        s
    }

    #[test]
    fn next_non_space_expands_tabs() {
        let s = state(" \tfoo");
        assert_eq!(s.next_non_space_index(), 2);
        assert_eq!(s.next_non_space_column(), 4);
        assert_eq!(s.indent(), 4);
        assert!(!s.is_blank());
    }

    #[test]
    fn blank_line() {
        assert!(state("  \t ").is_blank());
        assert!(state("").is_blank());
    }

    #[test]
    fn column_inside_tab_leaves_synthetic_spaces() {
        // `>` then a tab: the quote consumes one column of the tab.
        let mut s = state(">\tfoo");
        s.set_new_index(1);
        s.find_next_non_space();
        s.set_new_column(2);
        assert_eq!(s.index(), 1);
        assert_eq!(s.column(), 2);
        let rest = s.rest();
        assert_eq!(rest.content.to_string(), "  foo");
        assert_eq!(rest.content.base_offset(0), Ok(None));
        assert_eq!(rest.content.base_offset(2), Ok(Some(2)));
    }

    #[test]
    fn set_new_index_skips_to_target() {
        let mut s = state("- item");
        s.set_new_index(2);
        assert_eq!(s.index(), 2);
        assert_eq!(s.column(), 2);
        assert_eq!(s.rest().content.to_string(), "item");
    }
}

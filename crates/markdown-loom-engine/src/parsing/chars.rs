//! Character classes shared by the block and inline engines.

use unicode_categories::UnicodeCategories;

/// Indent at which a line becomes indented code.
pub const CODE_BLOCK_INDENT: usize = 4;

/// Unicode punctuation for delimiter flanking: general categories P* and S*.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_punctuation() || c.is_symbol()
}

/// Unicode `White_Space`.
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_space_or_tab(c: Option<char>) -> bool {
    matches!(c, Some(' ' | '\t'))
}

/// True for a space, a tab or the end of the line.
pub fn is_space_tab_or_end(c: Option<char>) -> bool {
    matches!(c, None | Some(' ' | '\t' | '\n' | '\r'))
}

pub fn is_blank(s: &str) -> bool {
    s.bytes()
        .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c'))
}

pub fn columns_to_next_tab_stop(column: usize, tab_width: usize) -> usize {
    tab_width - column % tab_width
}

/// Byte index of the first character at or after `from` that is not a space
/// or tab.
pub fn skip_space_tab(s: &str, from: usize) -> usize {
    from + s[from..]
        .bytes()
        .take_while(|b| matches!(b, b' ' | b'\t'))
        .count()
}

/// Byte index after the last character of `s` that is not a space or tab.
pub fn trim_space_tab_end(s: &str) -> usize {
    s.trim_end_matches([' ', '\t']).len()
}

/// Flanking classification of a delimiter run.
///
/// The start and end of the inline content count as whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flanking {
    pub left: bool,
    pub right: bool,
    pub before_punctuation: bool,
    pub after_punctuation: bool,
}

impl Flanking {
    pub fn of(before: Option<char>, after: Option<char>) -> Self {
        let before_ws = before.is_none_or(is_whitespace);
        let after_ws = after.is_none_or(is_whitespace);
        let before_punctuation = before.is_some_and(is_punctuation);
        let after_punctuation = after.is_some_and(is_punctuation);

        let left = !after_ws && (!after_punctuation || before_ws || before_punctuation);
        let right = !before_ws && (!before_punctuation || after_ws || after_punctuation);
        Self {
            left,
            right,
            before_punctuation,
            after_punctuation,
        }
    }

    /// `(can_open, can_close)` for a run whose marker may open and close
    /// inside a word.
    pub fn intraword(self) -> (bool, bool) {
        (self.left, self.right)
    }

    /// `(can_open, can_close)` for a run whose marker must not open or close
    /// inside a word, like `_`.
    pub fn word_bounded(self) -> (bool, bool) {
        (
            self.left && (!self.right || self.before_punctuation),
            self.right && (!self.left || self.after_punctuation),
        )
    }
}

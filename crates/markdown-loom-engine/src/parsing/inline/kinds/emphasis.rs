use crate::{
    ast::NodeKind,
    parsing::inline::{DelimiterProcessor, DelimiterRun},
};

/// `*` and `_` emphasis: one delimiter for regular emphasis, two for
/// strong.
pub struct EmphasisProcessor {
    delimiter: char,
}

impl EmphasisProcessor {
    pub const STAR: char = '*';
    pub const UNDERSCORE: char = '_';

    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl DelimiterProcessor for EmphasisProcessor {
    fn opening_char(&self) -> char {
        self.delimiter
    }

    fn closing_char(&self) -> char {
        self.delimiter
    }

    fn allows_intraword(&self) -> bool {
        self.delimiter != Self::UNDERSCORE
    }

    fn process(&self, opener: &DelimiterRun, closer: &DelimiterRun) -> usize {
        // Rule of three: a run that can both open and close only pairs with
        // one whose combined length is not a multiple of 3, unless both are.
        if (opener.can_close || closer.can_open)
            && closer.orig_len % 3 != 0
            && (opener.orig_len + closer.orig_len) % 3 == 0
        {
            return 0;
        }
        if opener.len >= 2 && closer.len >= 2 { 2 } else { 1 }
    }

    fn wrap(&self, used: usize) -> NodeKind {
        if used == 2 {
            NodeKind::StrongEmphasis {
                delimiter: self.delimiter,
            }
        } else {
            NodeKind::Emphasis {
                delimiter: self.delimiter,
            }
        }
    }
}

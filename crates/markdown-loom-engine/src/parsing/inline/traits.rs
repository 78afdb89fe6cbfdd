use std::ops::Range;

use super::scanner::InlineScanner;
use crate::{ast::NodeKind, error::ParseError};

/// A span recognized by an [`InlineContentParser`].
#[derive(Debug)]
pub struct ParsedInline {
    pub(crate) kind: NodeKind,
    pub(crate) len: usize,
    pub(crate) text_child: Option<Range<usize>>,
}

impl ParsedInline {
    /// A node of `kind` covering `len` bytes from the current position.
    pub fn new(kind: NodeKind, len: usize) -> Self {
        Self {
            kind,
            len,
            text_child: None,
        }
    }

    /// Literal text covering exactly `literal`'s own bytes.
    pub fn text(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        let len = literal.len();
        Self::new(NodeKind::Text { literal }, len)
    }

    /// Gives the node a single text child for `range`, relative to the
    /// match start, like a link's visible label.
    pub fn with_text_child(mut self, range: Range<usize>) -> Self {
        self.text_child = Some(range);
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Single-shot matcher for a self-contained inline span such as a code span
/// or an autolink.
///
/// Parsers are tried when the current character is one of their triggers,
/// in resolved order; the first match wins. Returning `Ok(None)` leaves the
/// position unchanged.
pub trait InlineContentParser: Send + Sync {
    fn triggers(&self) -> &[char];

    fn try_parse(&self, scanner: &InlineScanner<'_>) -> Result<Option<ParsedInline>, ParseError>;
}

/// A run of one delimiter character as seen by a [`DelimiterProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterRun {
    pub ch: char,
    /// Characters still unused.
    pub len: usize,
    /// Characters in the run as written.
    pub orig_len: usize,
    pub can_open: bool,
    pub can_close: bool,
}

/// Pairs opening and closing delimiter runs into wrapper nodes, the way
/// `*` and `_` produce emphasis.
pub trait DelimiterProcessor: Send + Sync {
    fn opening_char(&self) -> char;

    fn closing_char(&self) -> char;

    /// Shortest run that counts as a delimiter; shorter runs stay text.
    fn min_length(&self) -> usize {
        1
    }

    /// Whether runs may open or close inside a word.
    fn allows_intraword(&self) -> bool {
        true
    }

    /// Number of characters to use from each run, or 0 when the pair does
    /// not match.
    fn process(&self, opener: &DelimiterRun, closer: &DelimiterRun) -> usize;

    /// The node wrapping the content between a matched pair.
    fn wrap(&self, used: usize) -> NodeKind;
}

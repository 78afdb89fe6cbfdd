use super::state::{Line, LineState};
use crate::{
    ast::{Ast, NodeId, NodeKind},
    error::ParseError,
    parsing::references::{LinkReference, ReferenceMap},
    sequence::SegmentedSequence,
};

/// How an open block responds to the start of a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContinue {
    /// The block matches; stay at the current position.
    Continue,
    /// The block matches after consuming its prefix up to a byte index.
    AtIndex(usize),
    /// The block matches after consuming its prefix up to a column.
    AtColumn(usize),
    /// The line is the block's last one (a closing fence) and is consumed.
    Finished,
    /// The block does not match and closes, unless the line turns out to be
    /// a lazy paragraph continuation.
    NoMatch,
}

/// One or more new blocks beginning on the current line.
pub struct BlockStart {
    pub(crate) parsers: Vec<Box<dyn BlockParser>>,
    pub(crate) new_index: Option<usize>,
    pub(crate) new_column: Option<usize>,
    pub(crate) replace_active_block: bool,
}

impl BlockStart {
    pub fn of(parser: impl BlockParser + 'static) -> Self {
        Self::nested(vec![Box::new(parser)])
    }

    /// Starts several blocks, each nested in the previous one.
    pub fn nested(parsers: Vec<Box<dyn BlockParser>>) -> Self {
        Self {
            parsers,
            new_index: None,
            new_column: None,
            replace_active_block: false,
        }
    }

    /// Continue with the rest of the line from byte `index`.
    pub fn at_index(mut self, index: usize) -> Self {
        self.new_index = Some(index);
        self
    }

    /// Continue with the rest of the line from `column`.
    pub fn at_column(mut self, column: usize) -> Self {
        self.new_column = Some(column);
        self
    }

    /// The new block replaces the active paragraph, as a setext underline
    /// turns a paragraph into a heading.
    pub fn replace_active_block(mut self) -> Self {
        self.replace_active_block = true;
        self
    }
}

/// The innermost block that matched the current line.
pub struct MatchedBlock<'a> {
    pub(crate) kind: &'a NodeKind,
    pub(crate) parser: &'a dyn BlockParser,
}

impl MatchedBlock<'_> {
    pub fn kind(&self) -> &NodeKind {
        self.kind
    }

    /// Text of the matched paragraph that could still become something
    /// else, with leading link reference definitions removed.
    pub fn paragraph_content(&self) -> Option<SegmentedSequence> {
        self.parser.paragraph_content()
    }
}

/// Recognizes the start of a block. Factories are stateless and shared by
/// every parse; the engine consults them in resolved order and the first
/// that returns a [`BlockStart`] wins.
pub trait BlockParserFactory: Send + Sync {
    fn try_start(
        &self,
        state: &LineState,
        matched: &MatchedBlock<'_>,
    ) -> Result<Option<BlockStart>, ParseError>;
}

/// Per-block parsing state for one open block.
pub trait BlockParser {
    /// Node created when the block opens. Payload fields that depend on the
    /// block's content are filled in by [`close_block`](Self::close_block).
    fn create_node(&self) -> NodeKind;

    fn is_container(&self) -> bool {
        false
    }

    fn can_have_lazy_continuation_lines(&self) -> bool {
        false
    }

    /// Whether a new child of `kind` may open inside this block. Called on
    /// the innermost open block; returning `false` closes it.
    fn can_contain(&mut self, _kind: &NodeKind) -> bool {
        false
    }

    fn try_continue(&mut self, state: &LineState) -> Result<BlockContinue, ParseError>;

    fn add_line(&mut self, _line: Line) {}

    /// Content that a setext underline would turn into a heading.
    fn paragraph_content(&self) -> Option<SegmentedSequence> {
        None
    }

    /// Finalizes the block once no further lines can belong to it.
    fn close_block(&mut self, _ctx: &mut BlockContext<'_>) -> Result<(), ParseError> {
        Ok(())
    }
}

/// A leaf block's content waiting for the inline phase.
#[derive(Debug)]
pub(crate) struct PendingInline {
    pub node: NodeId,
    pub content: SegmentedSequence,
}

/// What a closing block may do to the tree and the document state.
pub struct BlockContext<'a> {
    pub(crate) ast: &'a mut Ast,
    pub(crate) node: NodeId,
    pub(crate) references: &'a mut ReferenceMap,
    pub(crate) pending: &'a mut Vec<PendingInline>,
}

impl BlockContext<'_> {
    /// The node of the closing block.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.ast[self.node].kind
    }

    /// Source text of the closing block, preset to its full line span.
    pub fn chars_mut(&mut self) -> &mut SegmentedSequence {
        &mut self.ast[self.node].chars
    }

    /// The kind of the closing block's parent.
    pub fn parent_kind_mut(&mut self) -> Option<&mut NodeKind> {
        let parent = self.ast.parent(self.node)?;
        Some(&mut self.ast[parent].kind)
    }

    /// Queues `content` for inline parsing into children of this block.
    pub fn parse_inlines(&mut self, content: SegmentedSequence) {
        self.pending.push(PendingInline {
            node: self.node,
            content,
        });
    }

    /// Registers a link reference definition; the first one for a label
    /// wins.
    pub fn define_reference(&mut self, label: &str, reference: LinkReference) -> bool {
        self.references.define(label, reference)
    }

    /// Creates a sibling immediately before this block.
    pub fn insert_before(&mut self, kind: NodeKind, chars: SegmentedSequence) -> NodeId {
        let sibling = self.ast.create(kind, chars);
        self.ast.insert_before(self.node, sibling);
        sibling
    }

    /// Removes this block from the tree.
    pub fn remove_node(&mut self) {
        self.ast.unlink(self.node);
    }
}

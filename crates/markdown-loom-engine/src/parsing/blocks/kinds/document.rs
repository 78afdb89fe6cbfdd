use crate::{
    ast::NodeKind,
    error::ParseError,
    parsing::blocks::{BlockContinue, BlockParser, LineState},
};

/// The root container. It matches every line and accepts any block.
pub struct DocumentParser;

impl BlockParser for DocumentParser {
    fn create_node(&self) -> NodeKind {
        NodeKind::Document
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&mut self, _kind: &NodeKind) -> bool {
        true
    }

    fn try_continue(&mut self, _state: &LineState) -> Result<BlockContinue, ParseError> {
        Ok(BlockContinue::Continue)
    }
}

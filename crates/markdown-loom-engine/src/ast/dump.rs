use std::fmt;

use super::{
    node::NodeId,
    tree::{Ast, NodeEdge},
};

/// Indented textual rendering of a (sub)tree.
///
/// ```text
/// Document @0..11
///   Paragraph @0..11
///     Text "hello" @0..5
/// ```
///
/// Nodes whose text is entirely synthetic print no range.
pub struct TreeDump<'a> {
    ast: &'a Ast,
    root: NodeId,
    ranges: bool,
}

impl<'a> TreeDump<'a> {
    pub fn new(ast: &'a Ast, root: NodeId) -> Self {
        Self {
            ast,
            root,
            ranges: true,
        }
    }

    /// Omits source ranges, handy for structural assertions.
    pub fn without_ranges(mut self) -> Self {
        self.ranges = false;
        self
    }
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0usize;
        for edge in self.ast.traverse(self.root) {
            match edge {
                NodeEdge::Enter(id) => {
                    let node = &self.ast[id];
                    write!(f, "{:indent$}{}", "", node.kind.describe(), indent = depth * 2)?;
                    if self.ranges
                        && let Some(range) = node.chars.source_range()
                    {
                        write!(f, " @{}..{}", range.start, range.end)?;
                    }
                    writeln!(f)?;
                    depth += 1;
                }
                NodeEdge::Leave(_) => depth -= 1,
            }
        }
        Ok(())
    }
}

impl Ast {
    pub fn dump(&self) -> TreeDump<'_> {
        TreeDump::new(self, self.root())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Ast, NodeKind},
        sequence::{BasedSequence, SegmentedSequence},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn dump_indents_children() {
        let src = BasedSequence::new("hello");
        let mut ast = Ast::new(src.clone().into());
        let root = ast.root();
        let para = ast.create(NodeKind::Paragraph, src.clone().into());
        ast.append_child(root, para);
        let text = ast.create(NodeKind::text("hello"), src.into());
        ast.append_child(para, text);
        let synthetic = ast.create(NodeKind::SoftLineBreak, SegmentedSequence::literal("\n"));
        ast.append_child(para, synthetic);

        assert_eq!(
            ast.dump().to_string(),
            "Document @0..5\n  Paragraph @0..5\n    Text \"hello\" @0..5\n    SoftLineBreak\n"
        );
        assert_eq!(
            ast.dump().without_ranges().to_string(),
            "Document\n  Paragraph\n    Text \"hello\"\n    SoftLineBreak\n"
        );
    }
}

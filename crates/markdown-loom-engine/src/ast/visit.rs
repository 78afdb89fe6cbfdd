use super::{
    node::NodeId,
    tree::{Ast, NodeEdge},
};

/// What a [`Visitor`] wants to happen after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    /// Do not descend; `leave` is still called for this node.
    SkipChildren,
    /// Abort the walk immediately.
    Stop,
}

/// Document-order callbacks over a tree.
///
/// Renderers implement this and dispatch on [`NodeKind`](super::NodeKind)
/// with an exhaustive `match`.
pub trait Visitor {
    fn enter(&mut self, ast: &Ast, id: NodeId) -> VisitControl;

    fn leave(&mut self, _ast: &Ast, _id: NodeId) {}
}

impl Ast {
    /// Walks the whole document.
    pub fn walk(&self, visitor: &mut impl Visitor) {
        self.walk_from(self.root(), visitor);
    }

    /// Walks the subtree rooted at `start`.
    pub fn walk_from(&self, start: NodeId, visitor: &mut impl Visitor) {
        let mut next = Some(NodeEdge::Enter(start));
        while let Some(edge) = next {
            next = match edge {
                NodeEdge::Enter(id) => match visitor.enter(self, id) {
                    VisitControl::Stop => return,
                    VisitControl::SkipChildren => Some(NodeEdge::Leave(id)),
                    VisitControl::Continue => match self[id].first_child() {
                        Some(child) => Some(NodeEdge::Enter(child)),
                        None => Some(NodeEdge::Leave(id)),
                    },
                },
                NodeEdge::Leave(id) => {
                    visitor.leave(self, id);
                    self.next_after_leave(start, id)
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::NodeKind, sequence::SegmentedSequence};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Option<NodeId>,
        stop_at: Option<NodeId>,
    }

    impl Visitor for Recorder {
        fn enter(&mut self, ast: &Ast, id: NodeId) -> VisitControl {
            self.events.push(format!("+{}", ast.kind(id).name()));
            if self.stop_at == Some(id) {
                VisitControl::Stop
            } else if self.skip == Some(id) {
                VisitControl::SkipChildren
            } else {
                VisitControl::Continue
            }
        }

        fn leave(&mut self, ast: &Ast, id: NodeId) {
            self.events.push(format!("-{}", ast.kind(id).name()));
        }
    }

    fn sample() -> (Ast, NodeId, NodeId) {
        let mut ast = Ast::new(SegmentedSequence::empty());
        let root = ast.root();
        let quote = ast.create(NodeKind::BlockQuote, SegmentedSequence::empty());
        let para = ast.create(NodeKind::Paragraph, SegmentedSequence::empty());
        let brk = ast.create(NodeKind::ThematicBreak, SegmentedSequence::empty());
        ast.append_child(root, quote);
        ast.append_child(quote, para);
        ast.append_child(root, brk);
        (ast, quote, brk)
    }

    #[test]
    fn visits_in_document_order() {
        let (ast, _, _) = sample();
        let mut rec = Recorder::default();
        ast.walk(&mut rec);
        assert_eq!(
            rec.events,
            [
                "+Document",
                "+BlockQuote",
                "+Paragraph",
                "-Paragraph",
                "-BlockQuote",
                "+ThematicBreak",
                "-ThematicBreak",
                "-Document"
            ]
        );
    }

    #[test]
    fn skip_children_still_leaves() {
        let (ast, quote, _) = sample();
        let mut rec = Recorder {
            skip: Some(quote),
            ..Default::default()
        };
        ast.walk(&mut rec);
        assert!(!rec.events.iter().any(|e| e == "+Paragraph"));
        assert!(rec.events.iter().any(|e| e == "-BlockQuote"));
    }

    #[test]
    fn stop_aborts_walk() {
        let (ast, _, brk) = sample();
        let mut rec = Recorder {
            stop_at: Some(brk),
            ..Default::default()
        };
        ast.walk(&mut rec);
        assert_eq!(rec.events.last().map(String::as_str), Some("+ThematicBreak"));
    }
}

use crate::{
    ast::{Ast, NodeId, NodeKind},
    error::ParseError,
    registry::Descriptor,
};

/// Rewrites finished nodes after inline parsing.
///
/// Each processor sees the nodes it [applies to](Self::applies_to) in
/// document order. A processor may restructure the tree below or around the
/// node; nodes it detaches are skipped.
pub trait NodePostProcessor: Send + Sync {
    fn applies_to(&self, kind: &NodeKind) -> bool;

    fn process(&self, ast: &mut Ast, node: NodeId) -> Result<(), ParseError>;
}

/// Runs every processor, in resolved order, over the whole tree.
pub(crate) fn run(
    processors: &[Descriptor<dyn NodePostProcessor>],
    ast: &mut Ast,
) -> Result<(), ParseError> {
    for descriptor in processors {
        let processor = descriptor.item();
        let targets: Vec<NodeId> = ast
            .descendants(ast.root())
            .filter(|&id| processor.applies_to(ast.kind(id)))
            .collect();
        log::trace!("post-processor `{}`: {} nodes", descriptor.id(), targets.len());
        for id in targets {
            if ast.is_attached(id) && processor.applies_to(ast.kind(id)) {
                processor.process(ast, id)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{BasedSequence, SegmentedSequence};
    use std::sync::Arc;

    /// Drops every paragraph that is empty of children.
    struct DropEmptyParagraphs;

    impl NodePostProcessor for DropEmptyParagraphs {
        fn applies_to(&self, kind: &NodeKind) -> bool {
            matches!(kind, NodeKind::Paragraph)
        }

        fn process(&self, ast: &mut Ast, node: NodeId) -> Result<(), ParseError> {
            if ast[node].first_child().is_none() {
                ast.unlink(node);
            }
            Ok(())
        }
    }

    #[test]
    fn processors_see_matching_nodes_only() {
        let src = BasedSequence::new("ab");
        let mut ast = Ast::new(src.clone().into());
        let root = ast.root();
        let empty = ast.create(NodeKind::Paragraph, SegmentedSequence::empty());
        let full = ast.create(NodeKind::Paragraph, src.clone().into());
        let text = ast.create(NodeKind::text("ab"), src.into());
        ast.append_child(root, empty);
        ast.append_child(root, full);
        ast.append_child(full, text);

        let processors = vec![Descriptor::new(
            "test.drop_empty",
            Arc::new(DropEmptyParagraphs) as Arc<dyn NodePostProcessor>,
        )];
        run(&processors, &mut ast).expect("post-process");

        assert!(!ast.is_attached(empty));
        assert!(ast.is_attached(full));
        assert_eq!(ast.children(root).collect::<Vec<_>>(), vec![full]);
    }
}

use markdown_loom_engine::{
    Document, NodeId, NodeKind, Parser, ParserOptions,
    extensions::{StrikethroughExtension, TaskListExtension, WikiLinkExtension},
};

/// Parser with the core syntax only.
pub fn core_parser() -> Parser {
    Parser::new(ParserOptions::default()).expect("core syntax builds")
}

/// Parser with every bundled extension.
#[allow(dead_code)]
pub fn full_parser() -> Parser {
    Parser::builder()
        .extension(StrikethroughExtension)
        .extension(WikiLinkExtension)
        .extension(TaskListExtension)
        .build()
        .expect("bundled extensions build")
}

/// Validates tree invariants of a parsed document.
///
/// Asserts that:
/// - Every attached node's children point back at it as their parent
/// - Sibling links are symmetric
/// - Node ranges are within the source
/// - A child's range lies within its parent's range
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(document: &Document) {
    let ast = &document.ast;
    let source = document.source.source_range();
    assert!(ast.parent(ast.root()).is_none(), "root has a parent");

    for id in ast.descendants(ast.root()) {
        let mut prev: Option<NodeId> = None;
        for child in ast.children(id) {
            assert_eq!(ast.parent(child), Some(id), "{child} is not a child of {id}");
            assert_eq!(ast[child].prev_sibling(), prev, "broken sibling link at {child}");
            prev = Some(child);
        }
        assert_eq!(ast[id].last_child(), prev, "last child of {id}");

        let Some(range) = ast[id].chars.source_range() else {
            continue;
        };
        assert!(
            source.start <= range.start && range.end <= source.end,
            "{id} range {range:?} is outside the source {source:?}"
        );
        if let Some(parent) = ast.parent(id)
            && let Some(outer) = ast[parent].chars.source_range()
        {
            assert!(
                outer.start <= range.start && range.end <= outer.end,
                "{id} {} range {range:?} escapes parent {} range {outer:?}",
                ast.kind(id).name(),
                ast.kind(parent).name()
            );
        }
    }
}

/// Text of the inline children of `block`, concatenated.
#[allow(dead_code)]
pub fn inline_text(document: &Document, block: NodeId) -> String {
    document
        .ast
        .children(block)
        .map(|child| document.ast[child].chars.to_string())
        .collect()
}

/// The first node of the given kind, in document order.
#[allow(dead_code)]
pub fn first(document: &Document, matches: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
    document
        .ast
        .descendants(document.ast.root())
        .find(|&id| matches(document.ast.kind(id)))
}

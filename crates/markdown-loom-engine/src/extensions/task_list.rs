use std::any::Any;

use crate::{
    ast::{Ast, ExtensionNode, NodeId, NodeKind},
    error::ParseError,
    parsing::post_process::NodePostProcessor,
    registry::{Extension, Registrar},
};

/// A list item opened with a `[ ]` or `[x]` checkbox. Replaces the
/// `ListItem` it came from and keeps its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskListItem {
    pub checked: bool,
    pub marker_indent: usize,
    pub content_indent: usize,
}

impl ExtensionNode for TaskListItem {
    fn name(&self) -> &'static str {
        "TaskListItem"
    }

    fn is_block(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self) -> String {
        if self.checked {
            "TaskListItem checked".to_string()
        } else {
            "TaskListItem".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskListProcessor;

impl TaskListProcessor {
    /// Checkbox markers and whether they are checked; each is followed by a
    /// space.
    const MARKERS: [(&'static str, bool); 3] = [("[ ] ", false), ("[x] ", true), ("[X] ", true)];

    /// The first text of the item's leading paragraph, when its source starts
    /// with a checkbox. An escaped `\[` is not one.
    fn checkbox(ast: &Ast, item: NodeId) -> Option<(NodeId, NodeId, bool)> {
        let paragraph = ast[item].first_child()?;
        if !matches!(ast.kind(paragraph), NodeKind::Paragraph) {
            return None;
        }
        let text = ast[paragraph].first_child()?;
        let NodeKind::Text { literal } = ast.kind(text) else {
            return None;
        };
        let chars = &ast[text].chars;
        Self::MARKERS
            .iter()
            .find(|(marker, _)| chars.starts_with(marker) && literal.starts_with(marker))
            .map(|&(_, checked)| (paragraph, text, checked))
    }
}

impl NodePostProcessor for TaskListProcessor {
    fn applies_to(&self, kind: &NodeKind) -> bool {
        matches!(kind, NodeKind::ListItem { .. })
    }

    fn process(&self, ast: &mut Ast, item: NodeId) -> Result<(), ParseError> {
        let NodeKind::ListItem {
            marker_indent,
            content_indent,
        } = *ast.kind(item)
        else {
            return Ok(());
        };
        let Some((paragraph, text, checked)) = Self::checkbox(ast, item) else {
            return Ok(());
        };

        let marker_len = Self::MARKERS[0].0.len();
        let node = &mut ast[text];
        if let NodeKind::Text { literal } = &mut node.kind {
            literal.replace_range(..marker_len, "");
        }
        node.chars = node.chars.sub_sequence_from(marker_len)?;
        if node.chars.is_empty() {
            ast.unlink(text);
        }
        // The paragraph's content starts with the checkbox too.
        let paragraph = &mut ast[paragraph];
        paragraph.chars = paragraph.chars.sub_sequence_from(marker_len)?;

        let chars = ast[item].chars.clone();
        let task = ast.create(
            NodeKind::extension(TaskListItem {
                checked,
                marker_indent,
                content_indent,
            }),
            chars,
        );
        ast.insert_after(item, task);
        ast.reparent_children(item, task);
        ast.unlink(item);
        log::trace!("list item {item} is a task (checked: {checked})");
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TaskListExtension;

impl Extension for TaskListExtension {
    fn name(&self) -> &str {
        "tasklist"
    }

    fn extend(&self, registrar: &mut Registrar) {
        registrar.post_processor("tasklist.items", TaskListProcessor);
    }
}

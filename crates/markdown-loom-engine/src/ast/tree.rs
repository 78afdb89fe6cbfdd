use std::ops::{Index, IndexMut};

use super::node::{NodeId, NodeKind};
use crate::sequence::SegmentedSequence;

/// A node stored in the arena.
///
/// `kind` and `chars` are freely editable; the structural links are only
/// changed through [`Ast`] so they stay consistent.
#[derive(Debug)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Source text covered by the node.
    pub chars: SegmentedSequence,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind, chars: SegmentedSequence) -> Self {
        Self {
            kind,
            chars,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }
}

/// Arena-backed document tree.
///
/// Index 0 is always the `Document` root. Nodes are never freed: an unlinked
/// node keeps its slot (and its own subtree) but is no longer reachable from
/// the root.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<NodeData>,
}

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEdge {
    Enter(NodeId),
    Leave(NodeId),
}

impl Ast {
    pub fn new(chars: SegmentedSequence) -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document, chars)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a detached node.
    pub fn create(&mut self, kind: NodeKind, chars: SegmentedSequence) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind, chars));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Appends `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(!self.is_ancestor_or_self(child, parent), "{child} would contain itself");
        self.unlink(child);
        let last = self[parent].last_child;
        self[child].parent = Some(parent);
        self[child].prev_sibling = last;
        match last {
            Some(last) => self[last].next_sibling = Some(child),
            None => self[parent].first_child = Some(child),
        }
        self[parent].last_child = Some(child);
    }

    /// Inserts `child` as the first child of `parent`, detaching it first.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(!self.is_ancestor_or_self(child, parent), "{child} would contain itself");
        match self[parent].first_child {
            Some(first) => self.insert_before(first, child),
            None => self.append_child(parent, child),
        }
    }

    /// Inserts `node` immediately before `sibling`, detaching it first.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        debug_assert!(!self.is_ancestor_or_self(node, sibling), "{node} would contain itself");
        self.unlink(node);
        let parent = self[sibling].parent;
        let prev = self[sibling].prev_sibling;
        self[node].parent = parent;
        self[node].prev_sibling = prev;
        self[node].next_sibling = Some(sibling);
        self[sibling].prev_sibling = Some(node);
        match prev {
            Some(prev) => self[prev].next_sibling = Some(node),
            None => {
                if let Some(parent) = parent {
                    self[parent].first_child = Some(node);
                }
            }
        }
    }

    /// Inserts `node` immediately after `sibling`, detaching it first.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        debug_assert!(!self.is_ancestor_or_self(node, sibling), "{node} would contain itself");
        self.unlink(node);
        let parent = self[sibling].parent;
        let next = self[sibling].next_sibling;
        self[node].parent = parent;
        self[node].prev_sibling = Some(sibling);
        self[node].next_sibling = next;
        self[sibling].next_sibling = Some(node);
        match next {
            Some(next) => self[next].prev_sibling = Some(node),
            None => {
                if let Some(parent) = parent {
                    self[parent].last_child = Some(node);
                }
            }
        }
    }

    /// Detaches `id` (with its subtree) from its parent and siblings.
    pub fn unlink(&mut self, id: NodeId) {
        let NodeData {
            parent,
            prev_sibling,
            next_sibling,
            ..
        } = self[id];
        match prev_sibling {
            Some(prev) => self[prev].next_sibling = next_sibling,
            None => {
                if let Some(parent) = parent {
                    self[parent].first_child = next_sibling;
                }
            }
        }
        match next_sibling {
            Some(next) => self[next].prev_sibling = prev_sibling,
            None => {
                if let Some(parent) = parent {
                    self[parent].last_child = prev_sibling;
                }
            }
        }
        let node = &mut self[id];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Moves every child of `from` to the end of `to`, keeping their order.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        while let Some(child) = self[from].first_child {
            self.append_child(to, child);
        }
    }

    /// True when `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// True when `id` is the root or hangs off it.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(self.root())
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            ast: self,
            next: self[id].first_child,
        }
    }

    /// `id` and its ancestors up to the root, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: Some(id),
        }
    }

    /// Depth-first edges of the subtree rooted at `id`.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        Traverse {
            ast: self,
            root: id,
            next: Some(NodeEdge::Enter(id)),
        }
    }

    /// `id` and its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse(id).filter_map(|edge| match edge {
            NodeEdge::Enter(id) => Some(id),
            NodeEdge::Leave(_) => None,
        })
    }

    /// The edge following `Leave(id)` in a walk rooted at `root`.
    pub(crate) fn next_after_leave(&self, root: NodeId, id: NodeId) -> Option<NodeEdge> {
        if id == root {
            return None;
        }
        match self[id].next_sibling {
            Some(next) => Some(NodeEdge::Enter(next)),
            None => self[id].parent.map(NodeEdge::Leave),
        }
    }
}

impl Index<NodeId> for Ast {
    type Output = NodeData;

    fn index(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Ast {
    fn index_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }
}

pub struct Children<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.ast[id].next_sibling;
        Some(id)
    }
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.ast[id].parent;
        Some(id)
    }
}

pub struct Traverse<'a> {
    ast: &'a Ast,
    root: NodeId,
    next: Option<NodeEdge>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeEdge;

    fn next(&mut self) -> Option<NodeEdge> {
        let edge = self.next.take()?;
        self.next = match edge {
            NodeEdge::Enter(id) => match self.ast[id].first_child {
                Some(child) => Some(NodeEdge::Enter(child)),
                None => Some(NodeEdge::Leave(id)),
            },
            NodeEdge::Leave(id) => self.ast.next_after_leave(self.root, id),
        };
        Some(edge)
    }
}

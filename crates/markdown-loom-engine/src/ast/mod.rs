//! # Node Tree
//!
//! Arena-allocated AST. Nodes live in one `Vec` and refer to each other by
//! [`NodeId`]; parent links are plain indices, so there is no shared
//! ownership and the finished tree is `Send + Sync`.
//!
//! ## Modules
//!
//! - **`node`**: `NodeId`, the closed `NodeKind` sum type and the
//!   `ExtensionNode` capability for extension-defined kinds
//! - **`tree`**: `Ast` with insertion, unlinking and traversal iterators
//! - **`visit`**: `Visitor` callbacks for renderers
//! - **`dump`**: indented text rendering used by tests and the CLI
//!
//! ## Key Invariants
//!
//! - The `Document` root is node 0 and has no parent
//! - Every attached node has exactly one parent
//! - Child order is document order

pub mod dump;
pub mod node;
pub mod tree;
pub mod visit;

pub use dump::TreeDump;
pub use node::{ExtensionNode, NodeId, NodeKind};
pub use tree::{Ancestors, Ast, Children, NodeData, NodeEdge, Traverse};
pub use visit::{VisitControl, Visitor};

//! # Extension Registry
//!
//! Extensions contribute behaviour through a [`Registrar`] as
//! [`Descriptor`]s: an identity, `before`/`after` constraints and the
//! behaviour itself. [`resolve`] turns each kind's descriptors into one
//! total order that the parsing engines consult in sequence.
//!
//! Resolution happens once, when a parser is built. The resolved lists are
//! immutable afterwards and shared by every parse.

pub mod descriptor;
pub mod extension;
pub mod resolve;

pub use descriptor::Descriptor;
pub use extension::{Extension, Registrar};
pub use resolve::resolve;

use std::fmt;

/// The kinds of descriptor an extension can contribute. Constraints only
/// relate descriptors of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    BlockFactory,
    InlineParser,
    DelimiterProcessor,
    PostProcessor,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DescriptorKind::BlockFactory => "block factory",
            DescriptorKind::InlineParser => "inline parser",
            DescriptorKind::DelimiterProcessor => "delimiter processor",
            DescriptorKind::PostProcessor => "post-processor",
        })
    }
}

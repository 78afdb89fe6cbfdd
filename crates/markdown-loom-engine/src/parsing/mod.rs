//! # Parsing
//!
//! Two-phase CommonMark-style parsing over [`BasedSequence`](crate::sequence::BasedSequence)
//! input.
//!
//! ## Architecture
//!
//! 1. **Blocks** (`blocks`): lines are fed through a stack of open block
//!    parsers; each line continues, closes or starts blocks. Leaf block
//!    content is kept as a sequence, unparsed
//! 2. **Inlines** (`inline`): once every block is closed and all link
//!    reference definitions are known, each leaf's content becomes inline
//!    nodes
//! 3. **Post-processing** (`post_process`): extension hooks rewrite the
//!    finished tree
//!
//! ## Modules
//!
//! - **`chars`**: character classes and column arithmetic shared by both
//!   phases
//! - **`link_syntax`**: link labels, destinations and titles
//! - **`references`**: the link reference map and definition parsing
//! - **`html`**: the raw HTML patterns for blocks and inlines
//!
//! ## Key Invariants
//!
//! - Every node's chars are views of the input, except for normalized line
//!   endings and the synthetic text an extension creates
//! - Malformed markup never fails; it degrades to text

pub mod blocks;
pub mod chars;
pub mod html;
pub mod inline;
pub mod link_syntax;
pub mod post_process;
pub mod references;

use crate::registry::{Extension, Registrar};

/// The CommonMark core: every block kind, escapes, code spans, autolinks,
/// raw HTML and emphasis. Links and images are built into the inline engine.
///
/// A [`Parser`](crate::Parser) always registers this first.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreSyntax;

impl Extension for CoreSyntax {
    fn name(&self) -> &str {
        "core"
    }

    fn extend(&self, registrar: &mut Registrar) {
        blocks::kinds::register(registrar);
        inline::kinds::register(registrar);
    }
}

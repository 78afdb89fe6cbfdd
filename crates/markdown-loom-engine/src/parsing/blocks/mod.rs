//! # Block Parsing
//!
//! First phase of a parse: the document is read line by line into a tree of
//! block nodes. Leaf contents are queued for the inline phase.
//!
//! ## Per-line Algorithm
//!
//! 1. **Continue**: each open block, outermost first, decides whether the
//!    line continues it (`BlockContinue`), consuming its prefix
//! 2. **Start**: factories are tried in resolved order at the innermost
//!    matched block; the first `BlockStart` wins, repeated while the new
//!    block is a container
//! 3. **Add**: the rest of the line goes to the innermost block, or to a
//!    new paragraph; a lazy paragraph continuation keeps unmatched
//!    containers open
//!
//! ## Modules
//!
//! - **`state`**: `LineState`, the engine's position within the line
//! - **`traits`**: `BlockParserFactory`, `BlockParser` and the values they
//!   exchange with the engine
//! - **`engine`**: `BlockBuilder`, the open block stack
//! - **`kinds`**: the core block parsers and factories
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded (lists in block quotes in lists, etc.)
//! - Fenced and indented code are raw zones: no block or inline parsing inside
//! - Block nodes' chars are contiguous views of the source

pub mod engine;
pub mod kinds;
pub mod state;
pub mod traits;

pub use engine::LineOutcome;
pub(crate) use engine::BlockBuilder;
pub use state::{Line, LineState};
pub use traits::{
    BlockContext, BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock,
};

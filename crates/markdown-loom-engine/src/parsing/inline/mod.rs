//! # Inline Parsing
//!
//! Second phase of a parse: the content of each leaf block is turned into
//! inline children once all blocks, and so all link reference definitions,
//! are known.
//!
//! ## Architecture
//!
//! A single left-to-right pass over the content:
//! - **Content parsers** (`InlineContentParser`) match self-contained spans
//!   such as code spans and autolinks. They are tried first, by trigger
//!   character, in resolved order
//! - **Delimiter runs** (`*`, `_`, extension characters) become text nodes
//!   on a delimiter stack and are paired by their `DelimiterProcessor`
//!   when a link closes and at the end of the content
//! - **Brackets** open links and images; a `]` looks for an inline
//!   destination or a reference
//!
//! ## Modules
//!
//! - **`scanner`**: `InlineScanner`, the read-only view given to content
//!   parsers
//! - **`traits`**: the extension points and the values they return
//! - **`delimiters`**: the delimiter stack and pairing
//! - **`engine`**: the main loop, brackets and line breaks
//! - **`kinds`**: the core content parsers and emphasis
//!
//! ## Key Invariants
//!
//! - The top-level inline chars of a leaf block concatenate to its content
//! - Adjacent text nodes are merged after parsing
//! - Code spans are raw zones: nothing inside them is parsed

mod delimiters;
mod engine;
pub mod kinds;
pub mod scanner;
pub mod traits;

pub(crate) use engine::{InlineSyntax, parse_inlines};
pub use scanner::InlineScanner;
pub use traits::{DelimiterProcessor, DelimiterRun, InlineContentParser, ParsedInline};

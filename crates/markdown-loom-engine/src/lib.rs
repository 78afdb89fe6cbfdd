//! Extensible two-phase Markdown parser.
//!
//! Input is wrapped in a [`BasedSequence`] and every node of the resulting
//! [`Ast`] keeps a view of the text it came from, so source offsets survive
//! any amount of slicing. Syntax is contributed by [`Extension`]s; the
//! CommonMark core is just the first one.

pub mod ast;
pub mod error;
pub mod extensions;
pub mod options;
pub mod parser;
pub mod parsing;
pub mod registry;
pub mod sequence;

// Re-export key types for easier usage
pub use ast::{Ast, NodeId, NodeKind};
pub use error::{ConfigError, ParseError, SequenceError};
pub use options::{LineEndings, ParserOptions};
pub use parser::{Document, Parser, ParserBuilder};
pub use registry::{Extension, Registrar};
pub use sequence::{BasedSequence, SegmentedSequence};

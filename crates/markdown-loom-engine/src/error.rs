use crate::registry::DescriptorKind;

/// Misuse of a sequence: an index or range outside the sequence, or one that
/// splits a UTF-8 character.
///
/// These are programming errors in the engine or in an extension, never a
/// consequence of malformed markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("range {start}..{end} is out of range for a sequence of length {len}")]
    OutOfRange { start: usize, end: usize, len: usize },

    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("index {index} does not fall on a character boundary")]
    NotCharBoundary { index: usize },
}

/// Errors raised while building a parser configuration.
///
/// All of these abort construction; no document is parsed with a
/// configuration that failed to build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cyclic ordering constraints among {kind} descriptors: {}", .cycle.join(" -> "))]
    CyclicDependency {
        kind: DescriptorKind,
        cycle: Vec<String>,
    },

    #[error("{kind} `{id}` is registered more than once")]
    DuplicateIdentity { kind: DescriptorKind, id: String },

    #[error("delimiter character {ch:?} is claimed by both `{first}` and `{second}`")]
    DelimiterConflict {
        ch: char,
        first: String,
        second: String,
    },

    #[error("unknown extension `{0}`")]
    UnknownExtension(String),

    #[error("tab width must be at least 1")]
    InvalidTabWidth,
}

/// Errors that abort a single parse.
///
/// Markup itself never fails to parse; these only surface when the engine or
/// an extension misuses the sequence or tree APIs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("extension `{extension}` failed: {message}")]
    Extension { extension: String, message: String },
}

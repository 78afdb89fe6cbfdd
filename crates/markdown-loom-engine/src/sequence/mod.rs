//! # Source Sequences
//!
//! Zero-copy views over the original document buffer.
//!
//! ## Types
//!
//! - **`BasedSequence`**: a `(buffer, start, end)` view. Sub-sequencing shares
//!   the buffer, so every node in the tree can point at its source text
//!   without copying characters.
//! - **`SegmentedSequence`**: an ordered list of based views and synthetic
//!   literals. Produced by structural edits (splice, join, replace) while
//!   keeping a back-reference from every non-synthetic byte to its absolute
//!   offset in the source.
//! - **`SequenceBuilder`**: accumulates segments, merging adjacent views of
//!   the same buffer.
//!
//! ## Offsets
//!
//! All indices are UTF-8 byte offsets. Ranges must start and end on
//! character boundaries; anything else is a [`SequenceError`].
//!
//! ## Equality
//!
//! Both sequence types compare and hash by logical text, never by identity:
//! two sequences over different buffers with the same characters are equal.
//!
//! [`SequenceError`]: crate::error::SequenceError

pub mod based;
pub mod builder;
pub mod segmented;

pub use based::BasedSequence;
pub use builder::SequenceBuilder;
pub use segmented::{Segment, SegmentedSequence};

use std::hash::Hasher;

use crate::error::SequenceError;

/// Validates `start..end` against a sequence of `len` bytes.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), SequenceError> {
    if start > end || end > len {
        return Err(SequenceError::OutOfRange { start, end, len });
    }
    Ok(())
}

/// Hashes text delivered in arbitrary chunks so that the result only depends
/// on the concatenated bytes.
pub(crate) fn hash_chunks<'a, H: Hasher>(chunks: impl Iterator<Item = &'a str>, state: &mut H) {
    for chunk in chunks {
        for b in chunk.bytes() {
            state.write_u8(b);
        }
    }
    state.write_u8(0xff);
}

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Range,
    sync::Arc,
};

use super::{SegmentedSequence, SequenceBuilder, check_range, hash_chunks};
use crate::error::SequenceError;

/// An immutable view `[start, end)` over a shared source buffer.
///
/// Cloning and sub-sequencing never copy characters; the buffer is held by
/// an `Arc` and is read-only for its whole lifetime.
#[derive(Clone)]
pub struct BasedSequence {
    buffer: Arc<str>,
    start: usize,
    end: usize,
}

impl BasedSequence {
    /// Creates a sequence covering the whole of `text`.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let buffer = text.into();
        let end = buffer.len();
        Self {
            buffer,
            start: 0,
            end,
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_str(&self) -> &str {
        &self.buffer[self.start..self.end]
    }

    /// Absolute offset of the first byte in the backing buffer.
    pub fn start_offset(&self) -> usize {
        self.start
    }

    /// Absolute offset one past the last byte in the backing buffer.
    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// Absolute `start..end` range in the backing buffer.
    pub fn source_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The sequence covering the entire backing buffer.
    pub fn base_sequence(&self) -> BasedSequence {
        Self {
            buffer: self.buffer.clone(),
            start: 0,
            end: self.buffer.len(),
        }
    }

    /// True when both views share one backing buffer.
    pub fn same_buffer(&self, other: &BasedSequence) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Returns the zero-copy view `[start, end)` relative to this sequence.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<Self, SequenceError> {
        check_range(start, end, self.len())?;
        let text = self.as_str();
        for index in [start, end] {
            if !text.is_char_boundary(index) {
                return Err(SequenceError::NotCharBoundary { index });
            }
        }
        Ok(self.view(start, end))
    }

    /// Returns the view from `start` to the end of this sequence.
    pub fn sub_sequence_from(&self, start: usize) -> Result<Self, SequenceError> {
        self.sub_sequence(start, self.len())
    }

    /// Maps a local index to its absolute offset in the backing buffer.
    ///
    /// `index == len()` is allowed and maps to [`end_offset`](Self::end_offset).
    /// Based sequences never contain synthetic characters, so the result is
    /// always `Some`.
    pub fn base_offset(&self, index: usize) -> Result<Option<usize>, SequenceError> {
        if index > self.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(Some(self.start + index))
    }

    /// The character starting at local byte `index`, if any.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.as_str().get(index..)?.chars().next()
    }

    pub fn trim(&self) -> Self {
        self.trim_start().trim_end()
    }

    pub fn trim_start(&self) -> Self {
        let text = self.as_str();
        let skipped = text.len() - text.trim_start().len();
        self.view(skipped, text.len())
    }

    pub fn trim_end(&self) -> Self {
        let kept = self.as_str().trim_end().len();
        self.view(0, kept)
    }

    /// Replaces `range` with `replacement`, leaving `self` untouched.
    pub fn splice(
        &self,
        range: Range<usize>,
        replacement: &SegmentedSequence,
    ) -> Result<SegmentedSequence, SequenceError> {
        SegmentedSequence::from(self.clone()).splice(range, replacement)
    }

    /// Concatenates `other` after this sequence.
    pub fn append(&self, other: impl Into<SegmentedSequence>) -> SegmentedSequence {
        let mut builder = SequenceBuilder::new();
        builder.push_based(self.clone());
        builder.push_sequence(&other.into());
        builder.build()
    }

    /// Creates a view with already validated local bounds.
    pub(crate) fn view(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= self.len());
        Self {
            buffer: self.buffer.clone(),
            start: self.start + start,
            end: self.start + end,
        }
    }

    /// Extends the view to absolute `end`, used when merging adjacent views.
    pub(crate) fn extend_to(&mut self, end: usize) {
        debug_assert!(end >= self.end && end <= self.buffer.len());
        self.end = end;
    }
}

impl Default for BasedSequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for BasedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{}", self.as_str(), self.start, self.end)
    }
}

impl fmt::Display for BasedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for BasedSequence {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for BasedSequence {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl PartialEq for BasedSequence {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for BasedSequence {}

impl Hash for BasedSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_chunks(std::iter::once(self.as_str()), state);
    }
}

impl PartialEq<str> for BasedSequence {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for BasedSequence {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<SegmentedSequence> for BasedSequence {
    fn eq(&self, other: &SegmentedSequence) -> bool {
        other == self
    }
}

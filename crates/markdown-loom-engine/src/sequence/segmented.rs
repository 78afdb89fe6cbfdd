use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Range,
    sync::Arc,
};

use super::{BasedSequence, SequenceBuilder, check_range, hash_chunks};
use crate::error::SequenceError;

/// One part of a [`SegmentedSequence`].
#[derive(Debug, Clone)]
pub enum Segment {
    /// A view into a source buffer.
    Based(BasedSequence),
    /// Synthetic text inserted by an edit; it has no source position.
    Literal(Arc<str>),
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Based(seq) => seq.as_str(),
            Segment::Literal(text) => text,
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }

    /// Slices with bounds already validated by the caller.
    fn slice(&self, start: usize, end: usize) -> Segment {
        match self {
            Segment::Based(seq) => Segment::Based(seq.view(start, end)),
            Segment::Literal(text) => Segment::Literal(Arc::from(&text[start..end])),
        }
    }
}

/// Text assembled from source views and synthetic literals.
///
/// A segmented sequence is persistent: every edit returns a new sequence and
/// leaves the receiver untouched. Cloning is cheap since the segment list is
/// shared.
#[derive(Clone, Default)]
pub struct SegmentedSequence {
    segments: Arc<[Segment]>,
    /// Local offset at which each segment starts.
    offsets: Arc<[usize]>,
    len: usize,
}

impl SegmentedSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A sequence made only of synthetic text.
    pub fn literal(text: &str) -> Self {
        let mut builder = SequenceBuilder::new();
        builder.push_literal(text);
        builder.build()
    }

    pub(crate) fn from_segments(segments: Vec<Segment>) -> Self {
        let mut offsets = Vec::with_capacity(segments.len());
        let mut len = 0;
        for segment in &segments {
            offsets.push(len);
            len += segment.len();
        }
        Self {
            segments: segments.into(),
            offsets: offsets.into(),
            len,
        }
    }

    /// Joins `parts` in order.
    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a SegmentedSequence>) -> Self {
        let mut builder = SequenceBuilder::new();
        for part in parts {
            builder.push_sequence(part);
        }
        builder.build()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterates the text in chunks without materialising it.
    pub fn chunks(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(Segment::as_str)
    }

    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.chunks().flat_map(str::bytes)
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chunks().flat_map(str::chars)
    }

    /// True when at least one segment is synthetic.
    pub fn has_synthetic(&self) -> bool {
        self.segments.iter().any(Segment::is_synthetic)
    }

    /// Index of the segment containing local byte `index` (`index < len`).
    fn locate(&self, index: usize) -> (usize, usize) {
        let seg = self.offsets.partition_point(|&start| start <= index) - 1;
        (seg, index - self.offsets[seg])
    }

    /// Maps a local index to an absolute source offset, or `None` when the
    /// character at `index` is synthetic.
    ///
    /// `index == len()` maps to the end of the last segment when that segment
    /// is based.
    pub fn base_offset(&self, index: usize) -> Result<Option<usize>, SequenceError> {
        if index > self.len {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        if index == self.len {
            return Ok(match self.segments.last() {
                Some(Segment::Based(seq)) => Some(seq.end_offset()),
                _ => None,
            });
        }
        let (seg, local) = self.locate(index);
        Ok(match &self.segments[seg] {
            Segment::Based(seq) => Some(seq.start_offset() + local),
            Segment::Literal(_) => None,
        })
    }

    /// Returns the part `[start, end)` of this sequence.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<Self, SequenceError> {
        check_range(start, end, self.len)?;
        for index in [start, end] {
            if !self.is_char_boundary(index) {
                return Err(SequenceError::NotCharBoundary { index });
            }
        }
        let mut builder = SequenceBuilder::new();
        self.push_range(&mut builder, start, end);
        Ok(builder.build())
    }

    pub fn sub_sequence_from(&self, start: usize) -> Result<Self, SequenceError> {
        self.sub_sequence(start, self.len)
    }

    /// Replaces `range` with `replacement`, returning a new sequence.
    pub fn splice(
        &self,
        range: Range<usize>,
        replacement: &SegmentedSequence,
    ) -> Result<Self, SequenceError> {
        check_range(range.start, range.end, self.len)?;
        for index in [range.start, range.end] {
            if !self.is_char_boundary(index) {
                return Err(SequenceError::NotCharBoundary { index });
            }
        }
        let mut builder = SequenceBuilder::new();
        self.push_range(&mut builder, 0, range.start);
        builder.push_sequence(replacement);
        self.push_range(&mut builder, range.end, self.len);
        Ok(builder.build())
    }

    /// Replaces every occurrence of `pattern` with the synthetic `with`.
    pub fn replace(&self, pattern: &str, with: &str) -> Self {
        if pattern.is_empty() {
            return self.clone();
        }
        let text = self.to_string();
        let mut builder = SequenceBuilder::new();
        let mut last = 0;
        for (at, _) in text.match_indices(pattern) {
            self.push_range(&mut builder, last, at);
            builder.push_literal(with);
            last = at + pattern.len();
        }
        self.push_range(&mut builder, last, self.len);
        builder.build()
    }

    pub fn trim(&self) -> Self {
        self.trim_start().trim_end()
    }

    pub fn trim_start(&self) -> Self {
        let text = self.to_string();
        let skipped = text.len() - text.trim_start().len();
        let mut builder = SequenceBuilder::new();
        self.push_range(&mut builder, skipped, self.len);
        builder.build()
    }

    pub fn trim_end(&self) -> Self {
        self.trim_end_matches(char::is_whitespace)
    }

    /// Drops trailing characters accepted by `pred`.
    pub fn trim_end_matches(&self, pred: impl Fn(char) -> bool) -> Self {
        let text = self.to_string();
        let kept = text.trim_end_matches(pred).len();
        let mut builder = SequenceBuilder::new();
        self.push_range(&mut builder, 0, kept);
        builder.build()
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.len {
            return None;
        }
        let (seg, local) = self.locate(index);
        self.segments[seg].as_str().get(local..)?.chars().next()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        prefix.len() <= self.len && self.bytes().take(prefix.len()).eq(prefix.bytes())
    }

    /// The single based view this sequence consists of, if it is one
    /// contiguous range of one buffer.
    pub fn as_based(&self) -> Option<BasedSequence> {
        match &*self.segments {
            [Segment::Based(seq)] => Some(seq.clone()),
            _ => None,
        }
    }

    /// Smallest absolute range covering every based segment.
    pub fn source_range(&self) -> Option<Range<usize>> {
        let mut based = self.segments.iter().filter_map(|s| match s {
            Segment::Based(seq) => Some(seq.source_range()),
            Segment::Literal(_) => None,
        });
        let first = based.next()?;
        Some(based.fold(first, |acc, r| acc.start.min(r.start)..acc.end.max(r.end)))
    }

    fn is_char_boundary(&self, index: usize) -> bool {
        if index == 0 || index == self.len {
            return true;
        }
        let (seg, local) = self.locate(index);
        self.segments[seg].as_str().is_char_boundary(local)
    }

    /// Pushes `[start, end)` into `builder`; bounds must be valid.
    pub(crate) fn push_range(&self, builder: &mut SequenceBuilder, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let first = self.offsets.partition_point(|&s| s <= start) - 1;
        for (seg, segment) in self.segments.iter().enumerate().skip(first) {
            let seg_start = self.offsets[seg];
            if seg_start >= end {
                break;
            }
            let seg_end = seg_start + segment.len();
            let from = start.max(seg_start) - seg_start;
            let to = end.min(seg_end) - seg_start;
            if from < to {
                builder.push_segment(segment.slice(from, to));
            }
        }
    }
}

impl fmt::Display for SegmentedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SegmentedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}

impl From<BasedSequence> for SegmentedSequence {
    fn from(seq: BasedSequence) -> Self {
        let mut builder = SequenceBuilder::new();
        builder.push_based(seq);
        builder.build()
    }
}

impl From<&BasedSequence> for SegmentedSequence {
    fn from(seq: &BasedSequence) -> Self {
        Self::from(seq.clone())
    }
}

impl PartialEq for SegmentedSequence {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes().eq(other.bytes())
    }
}

impl Eq for SegmentedSequence {}

impl Hash for SegmentedSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_chunks(self.chunks(), state);
    }
}

impl PartialEq<BasedSequence> for SegmentedSequence {
    fn eq(&self, other: &BasedSequence) -> bool {
        self.len == other.len() && self.bytes().eq(other.as_str().bytes())
    }
}

impl PartialEq<str> for SegmentedSequence {
    fn eq(&self, other: &str) -> bool {
        self.len == other.len() && self.bytes().eq(other.bytes())
    }
}

impl PartialEq<&str> for SegmentedSequence {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

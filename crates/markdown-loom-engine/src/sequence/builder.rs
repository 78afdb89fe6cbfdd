use std::sync::Arc;

use super::{BasedSequence, Segment, SegmentedSequence};

/// Accumulates segments into a [`SegmentedSequence`].
///
/// Empty parts are dropped. A based view that starts exactly where the
/// previous view of the same buffer ended is merged into it, and consecutive
/// literals are joined, so the segment list stays minimal.
#[derive(Debug, Default, Clone)]
pub struct SequenceBuilder {
    segments: Vec<Segment>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push_based(&mut self, seq: BasedSequence) {
        if seq.is_empty() {
            return;
        }
        if let Some(Segment::Based(last)) = self.segments.last_mut()
            && last.same_buffer(&seq)
            && last.end_offset() == seq.start_offset()
        {
            last.extend_to(seq.end_offset());
            return;
        }
        self.segments.push(Segment::Based(seq));
    }

    /// Appends synthetic text that has no source position.
    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            let mut joined = String::with_capacity(last.len() + text.len());
            joined.push_str(last);
            joined.push_str(text);
            *last = Arc::from(joined);
            return;
        }
        self.segments.push(Segment::Literal(Arc::from(text)));
    }

    pub fn push_segment(&mut self, segment: Segment) {
        match segment {
            Segment::Based(seq) => self.push_based(seq),
            Segment::Literal(text) => self.push_literal(&text),
        }
    }

    pub fn push_sequence(&mut self, seq: &SegmentedSequence) {
        for segment in seq.segments() {
            self.push_segment(segment.clone());
        }
    }

    pub fn build(self) -> SegmentedSequence {
        SegmentedSequence::from_segments(self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_views_merge() {
        let src = BasedSequence::new("abcdef");
        let mut b = SequenceBuilder::new();
        b.push_based(src.sub_sequence(0, 2).unwrap());
        b.push_based(src.sub_sequence(2, 4).unwrap());
        let seq = b.build();
        assert_eq!(seq.segments().len(), 1);
        assert_eq!(seq.to_string(), "abcd");
    }

    #[test]
    fn gaps_keep_separate_segments() {
        let src = BasedSequence::new("abcdef");
        let mut b = SequenceBuilder::new();
        b.push_based(src.sub_sequence(0, 2).unwrap());
        b.push_based(src.sub_sequence(3, 4).unwrap());
        assert_eq!(b.build().segments().len(), 2);
    }

    #[test]
    fn literals_join_and_empties_vanish() {
        let mut b = SequenceBuilder::new();
        b.push_literal("a");
        b.push_literal("");
        b.push_based(BasedSequence::empty());
        b.push_literal("b");
        let seq = b.build();
        assert_eq!(seq.segments().len(), 1);
        assert_eq!(seq.to_string(), "ab");
    }

    #[test]
    fn different_buffers_never_merge() {
        let a = BasedSequence::new("ab");
        let b = BasedSequence::new("ab");
        let mut builder = SequenceBuilder::new();
        builder.push_based(a.sub_sequence(0, 1).unwrap());
        builder.push_based(b.sub_sequence(1, 2).unwrap());
        assert_eq!(builder.build().segments().len(), 2);
    }
}

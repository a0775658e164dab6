//! Byte ranges into document text.

/// A half-open byte range `start..end` into the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of `len` bytes starting at `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self { start, end: start + len }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shift both ends by `delta` bytes.
    pub fn offset_by(self, delta: usize) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_offset() {
        let span = Span::at(4, 3);
        assert_eq!(span, Span::new(4, 7));
        assert_eq!(span.len(), 3);
        assert_eq!(span.offset_by(10), Span::new(14, 17));
        assert!(Span::new(5, 5).is_empty());
    }
}
